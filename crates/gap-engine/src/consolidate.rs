//! Release-feed consolidation
//!
//! The release feed publishes several versions a week. Instead of one gap
//! per version, feature releases collapse into a single summary and
//! bugfix-only releases into a second, low-detail record.

use std::collections::BTreeSet;
use std::sync::Arc;

use shared_types::{Source, UpdateRecord};
use tracing::debug;

use crate::patterns::{
    contains_any, BUGFIX_TAG, FEATURE_KEYWORDS, FIX_LINE, NOTABLE_LINE_PREFIXES, RELEASE_VERSION,
};

/// Notable lines kept in the feature summary before eliding the rest.
pub const MAX_FEATURE_LINES: usize = 15;

/// Versions listed by name in the bugfix summary title.
pub const MAX_LISTED_VERSIONS: usize = 5;

const RELEASES_FALLBACK_URL: &str = "https://github.com/anthropics/claude-code/releases";

/// True when a release body carries nothing but fixes.
///
/// An empty body counts as bugfix-only. A body without bullets is bugfix-only
/// unless it uses feature wording. A bulleted body is bugfix-only when every
/// bullet starts with fix, fixed, hotfix or patch.
pub fn is_bugfix_release(body: &str) -> bool {
    if body.trim().is_empty() {
        return true;
    }

    let bullets: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-'))
        .map(|line| line.trim_start_matches(['-', ' ']))
        .filter(|line| !line.is_empty())
        .collect();

    if bullets.is_empty() {
        return !contains_any(&body.to_lowercase(), FEATURE_KEYWORDS);
    }

    bullets.iter().all(|line| FIX_LINE.is_match(line))
}

/// Collapse release-feed records into at most two synthetic records.
///
/// Input is expected newest first, the order the feed publishes in.
pub fn consolidate_releases(releases: &[Arc<UpdateRecord>]) -> Vec<Arc<UpdateRecord>> {
    let (bugfix, feature): (Vec<&Arc<UpdateRecord>>, Vec<&Arc<UpdateRecord>>) = releases
        .iter()
        .partition(|release| is_bugfix_release(&release.content));

    debug!(
        feature = feature.len(),
        bugfix = bugfix.len(),
        "Splitting release feed"
    );

    let mut out = Vec::with_capacity(2);
    if !feature.is_empty() {
        out.push(Arc::new(feature_summary(&feature)));
    }
    if !bugfix.is_empty() {
        out.push(Arc::new(bugfix_summary(&bugfix)));
    }
    out
}

fn release_version(release: &UpdateRecord) -> Option<&str> {
    RELEASE_VERSION.find(&release.title).map(|m| m.as_str())
}

fn notable_lines(release: &UpdateRecord) -> impl Iterator<Item = &str> {
    release
        .content
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', ' ']))
        .filter(|line| {
            let lower = line.to_lowercase();
            NOTABLE_LINE_PREFIXES
                .iter()
                .any(|prefix| lower.starts_with(prefix))
        })
}

fn feature_summary(releases: &[&Arc<UpdateRecord>]) -> UpdateRecord {
    let count = releases.len();

    let versions: Vec<&str> = releases.iter().filter_map(|r| release_version(r)).collect();
    let range = match versions.as_slice() {
        [] => String::new(),
        [only] => format!(" ({})", only),
        [newest, .., oldest] => format!(" ({} to {})", oldest, newest),
    };

    let mut features: Vec<String> = releases
        .iter()
        .flat_map(|r| notable_lines(r))
        .map(str::to_string)
        .collect();
    if features.is_empty() {
        features = releases.iter().map(|r| r.title.clone()).collect();
    }
    if features.len() > MAX_FEATURE_LINES {
        let hidden = features.len() - MAX_FEATURE_LINES;
        features.truncate(MAX_FEATURE_LINES);
        features.push(format!("... and {} more", hidden));
    }

    let body = features
        .iter()
        .map(|f| format!("- {}", f))
        .collect::<Vec<_>>()
        .join("\n");

    let tags: BTreeSet<&str> = releases
        .iter()
        .flat_map(|r| r.tags.iter().map(String::as_str))
        .collect();

    UpdateRecord::new(
        Source::ReleaseFeed,
        format!("Claude Code releases{}: {} feature releases", range, count),
        format!("Key features across {} releases:\n{}", count, body),
    )
    .with_url(first_url(releases))
    .with_date(releases[0].date.clone())
    .with_tags(tags)
}

fn bugfix_summary(releases: &[&Arc<UpdateRecord>]) -> UpdateRecord {
    let count = releases.len();

    let versions: Vec<&str> = releases.iter().filter_map(|r| release_version(r)).collect();
    let mut listed = versions
        .iter()
        .take(MAX_LISTED_VERSIONS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if versions.len() > MAX_LISTED_VERSIONS {
        listed.push_str(&format!(" + {} more", versions.len() - MAX_LISTED_VERSIONS));
    }
    let listed = if listed.is_empty() {
        String::new()
    } else {
        format!(" ({})", listed)
    };

    UpdateRecord::new(
        Source::ReleaseFeed,
        format!("Claude Code: {} bugfix-only releases{}", count, listed),
        format!(
            "{} releases containing only bugfixes. No new curriculum-relevant features.",
            count
        ),
    )
    .with_url(first_url(releases))
    .with_date(releases[0].date.clone())
    .with_tags(["claude-code", "release", BUGFIX_TAG])
}

fn first_url(releases: &[&Arc<UpdateRecord>]) -> String {
    releases
        .iter()
        .map(|r| r.url.as_str())
        .find(|url| !url.is_empty())
        .unwrap_or(RELEASES_FALLBACK_URL)
        .to_string()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn body_strategy() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                "[a-z ]{0,20}".prop_map(|s| format!("- Fixed {}", s)),
                "[a-z ]{0,20}".prop_map(|s| format!("- Added {}", s)),
                "[a-z ]{0,20}".prop_map(|s| format!("- New {}", s)),
                "[a-z .]{0,30}",
            ],
            0..6,
        )
        .prop_map(|lines| lines.join("\n"))
    }

    fn releases_strategy() -> impl Strategy<Value = Vec<Arc<UpdateRecord>>> {
        prop::collection::vec(body_strategy(), 0..12).prop_map(|bodies| {
            bodies
                .into_iter()
                .enumerate()
                .map(|(i, body)| {
                    Arc::new(UpdateRecord::new(
                        Source::ReleaseFeed,
                        format!("v2.1.{}", 40 - i),
                        body,
                    ))
                })
                .collect()
        })
    }

    proptest! {
        /// Property: consolidation never yields more than two records
        #[test]
        fn at_most_two_records(releases in releases_strategy()) {
            let result = consolidate_releases(&releases);
            prop_assert!(result.len() <= 2);
            prop_assert_eq!(result.is_empty(), releases.is_empty());
        }

        /// Property: input records are left untouched
        #[test]
        fn inputs_are_not_mutated(releases in releases_strategy()) {
            let before: Vec<UpdateRecord> = releases.iter().map(|r| (**r).clone()).collect();
            consolidate_releases(&releases);
            let after: Vec<UpdateRecord> = releases.iter().map(|r| (**r).clone()).collect();
            prop_assert_eq!(before, after);
        }

        /// Property: fix-only feeds collapse to one bugfix record
        #[test]
        fn fix_only_feed_is_one_bugfix_record(count in 1usize..10) {
            let releases: Vec<Arc<UpdateRecord>> = (0..count)
                .map(|i| {
                    Arc::new(UpdateRecord::new(
                        Source::ReleaseFeed,
                        format!("v2.1.{}", 40 - i),
                        "- Fixed a crash",
                    ))
                })
                .collect();
            let result = consolidate_releases(&releases);
            prop_assert_eq!(result.len(), 1);
            prop_assert!(result[0].has_tag(BUGFIX_TAG));
        }
    }
}
