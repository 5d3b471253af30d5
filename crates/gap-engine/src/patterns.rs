//! Keyword tables and regex patterns used by the gap rules

use lazy_static::lazy_static;
use regex::Regex;

/// Wording that marks something as going away
pub const DEPRECATION_SIGNALS: &[&str] = &[
    "deprecated",
    "removed",
    "no longer",
    "replaced by",
    "breaking change",
    "sunset",
];

/// Launch wording
pub const NEW_FEATURE_SIGNALS: &[&str] = &[
    "introducing",
    "new feature",
    "now available",
    "just shipped",
    "launched",
    "announcing",
    "release",
];

/// Incremental-change wording
pub const UPDATE_SIGNALS: &[&str] = &[
    "updated",
    "improved",
    "enhanced",
    "faster",
    "better",
    "changed",
    "upgrade",
];

/// Tags carried by nearly every record; they say nothing about the topic
pub const GENERIC_TAGS: &[&str] = &["claude-code"];

/// Tags that make a social post worth a second look
pub const MAJOR_FEATURE_TAGS: &[&str] = &["claude-code", "mcp", "agent-teams", "model-update"];

pub const BUGFIX_TAG: &str = "bugfix";

/// Body wording that makes an unbulleted release more than a bugfix
pub const FEATURE_KEYWORDS: &[&str] = &["added", "new", "introducing", "support for"];

/// Release-note lines worth carrying into the feature summary
pub const NOTABLE_LINE_PREFIXES: &[&str] = &[
    "added",
    "new",
    "support",
    "introduced",
    "claude opus",
    "claude sonnet",
];

/// High-signal topics used to group reports from different sources.
/// Order matters: more specific phrases come first.
pub const KNOWN_TOPICS: &[&str] = &[
    "opus 4.6",
    "opus 4",
    "sonnet 4.5",
    "haiku 4.5",
    "agent teams",
    "agent sdk",
    "cowork",
    "auto memory",
    "fast mode",
    "plan mode",
    "task management",
    "mcp",
];

/// Trigger phrase in the update -> any of these in the curriculum means covered
pub const COVERAGE_PHRASES: &[(&str, &[&str])] = &[
    ("opus 4.6", &["opus 4.6"]),
    ("sonnet 4.5", &["sonnet 4.5"]),
    ("haiku 4.5", &["haiku 4.5"]),
    ("agent sdk", &["agent sdk"]),
    ("claudedesk", &["claudedesk"]),
    ("rtk", &["rtk"]),
    ("token killer", &["rtk", "token killer"]),
    ("obsidian", &["obsidian"]),
    ("cleanup script", &["cleanup strategies", "~/.claude directory"]),
    ("developer platform", &["developer platform", "platform.claude.com"]),
    ("model context protocol", &["model context protocol", "mcp"]),
    ("cowork", &["cowork"]),
    ("hooks", &["hook events", "hook types", "/hooks"]),
    ("skills", &["skill frontmatter", "skill.md", "custom slash"]),
    ("subagent", &["subagent", "built-in subagent"]),
    ("custom command", &["custom commands", ".claude/commands"]),
    ("permission", &["permission mode", "allowedtools", "bypasspermissions"]),
    ("mcp server", &["mcp server", "mcp serve", "mcp tool"]),
    ("ide integration", &["vs code", "jetbrains", "ide integration"]),
    (
        "environment variable",
        &["claude_model", "anthropic_api_key", "environment variable"],
    ),
    ("v2.1.", &["v2.1."]),
];

lazy_static! {
    /// Dotted semantic version with a leading `v`
    pub static ref VERSION: Regex = Regex::new(r"\bv\d+(?:\.\d+)+").unwrap();

    /// Loose version token as written in release titles
    pub static ref RELEASE_VERSION: Regex = Regex::new(r"v[\d.]+").unwrap();

    /// Release-note bullet that only fixes something
    pub static ref FIX_LINE: Regex = Regex::new(r"(?i)^(?:fixed|fix|hotfix|patch)\b").unwrap();
}

/// Check whether any needle occurs in already lower-cased text
pub fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

/// First needle (in table order) that occurs in the text
pub fn first_match<'a>(text: &str, needles: &[&'a str]) -> Option<&'a str> {
    needles.iter().copied().find(|needle| text.contains(needle))
}

/// Prefix of at most `max` characters, never splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
