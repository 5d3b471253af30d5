use shared_types::{GapType, UpdateRecord};

use crate::coverage::{check_coverage, CoverageSignal, Reference};
use crate::patterns::{
    contains_any, DEPRECATION_SIGNALS, GENERIC_TAGS, NEW_FEATURE_SIGNALS, UPDATE_SIGNALS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    AlreadyCovered(CoverageSignal),
    Gap(GapType),
}

/// Decide what kind of gap an update represents, if any.
///
/// Deprecations are never suppressed by coverage: a removed feature that the
/// curriculum still teaches is exactly what needs fixing.
pub fn classify(
    update: &UpdateRecord,
    text: &str,
    reference: Option<&Reference<'_>>,
) -> Classification {
    if contains_any(text, DEPRECATION_SIGNALS) {
        return Classification::Gap(GapType::Deprecated);
    }

    if let Some(reference) = reference {
        if let Some(signal) = check_coverage(update, text, reference) {
            return Classification::AlreadyCovered(signal);
        }
    }

    if contains_any(text, NEW_FEATURE_SIGNALS) {
        return Classification::Gap(GapType::NewFeature);
    }

    if contains_any(text, UPDATE_SIGNALS) {
        return Classification::Gap(GapType::Updated);
    }

    if let Some(reference) = reference {
        let key_terms: Vec<&String> = update
            .tags
            .iter()
            .filter(|tag| !GENERIC_TAGS.contains(&tag.as_str()))
            .collect();
        let tag_known = key_terms
            .iter()
            .any(|tag| reference.lower().contains(&tag.replace('-', " ")));
        if !key_terms.is_empty() && !tag_known {
            return Classification::Gap(GapType::NewTopic);
        }
    }

    Classification::Gap(GapType::NewFeature)
}
