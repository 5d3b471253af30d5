use std::collections::BTreeSet;

use shared_types::{GapType, Priority, SectionKey, UpdateRecord};

use crate::patterns::{BUGFIX_TAG, MAJOR_FEATURE_TAGS};
use crate::topics::is_foundation;

/// First matching rule wins.
pub fn assess_priority(
    update: &UpdateRecord,
    gap_type: GapType,
    sections: &BTreeSet<SectionKey>,
) -> Priority {
    if gap_type == GapType::Deprecated {
        return Priority::High;
    }

    // Consolidated bugfix summaries from the release feed
    if update.source.is_release_feed() && update.has_tag(BUGFIX_TAG) {
        return Priority::Low;
    }

    if gap_type == GapType::NewFeature {
        if update.source.is_editorial() {
            return Priority::High;
        }
        if update.source.is_release_feed() {
            return Priority::Medium;
        }
    }

    if sections.iter().any(|key| is_foundation(*key)) {
        return Priority::High;
    }

    if update.source.is_social()
        && update
            .tags
            .iter()
            .any(|tag| MAJOR_FEATURE_TAGS.contains(&tag.as_str()))
    {
        return Priority::Medium;
    }

    Priority::Low
}
