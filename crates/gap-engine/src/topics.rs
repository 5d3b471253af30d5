//! Fixed twelve-week topic map

use std::collections::BTreeSet;

use shared_types::{SectionKey, TopicEntry, NEW_SECTION};

/// Weeks every learner goes through first; changes here are urgent.
pub const FOUNDATION_SECTIONS: &[SectionKey] = &[1, 2, 3];

pub const CURRICULUM_TOPIC_MAP: &[TopicEntry] = &[
    TopicEntry {
        key: 1,
        title: "The Terminal & File System",
        phase: "Foundation",
        topics: &["terminal", "bash", "file system", "node.js", "npm", "command line", "cli"],
    },
    TopicEntry {
        key: 2,
        title: "Git & Version Control",
        phase: "Foundation",
        topics: &["git", "github", "version control", "branches", "pull requests", "commits"],
    },
    TopicEntry {
        key: 3,
        title: "Claude Code: First Contact",
        phase: "Foundation",
        topics: &[
            "claude code install",
            "authentication",
            "plan mode",
            "diffs",
            "/compact",
            "/clear",
            "/help",
            "/model",
            "claude.md",
        ],
    },
    TopicEntry {
        key: 4,
        title: "First Full Application",
        phase: "Building",
        topics: &["react", "next.js", "web app", "vercel", "deployment", "components"],
    },
    TopicEntry {
        key: 5,
        title: "Databases & APIs",
        phase: "Building",
        topics: &["database", "supabase", "sql", "api", "rest", "crud", "schema"],
    },
    TopicEntry {
        key: 6,
        title: "Authentication & Dashboards",
        phase: "Building",
        topics: &["auth", "authentication", "dashboard", "login", "protected routes", "responsive"],
    },
    TopicEntry {
        key: 7,
        title: "Testing & Quality",
        phase: "Building",
        topics: &["testing", "unit test", "integration test", "verification loop", "/code-review"],
    },
    TopicEntry {
        key: 8,
        title: "Second Project: Domain Deep Dive",
        phase: "Building",
        topics: &["project scoping", "external apis", "data visualization", "documentation", "readme"],
    },
    TopicEntry {
        key: 9,
        title: "Skills, Hooks & Custom Commands",
        phase: "Mastery",
        topics: &[
            "skills",
            "skill.md",
            "hooks",
            "pretooluse",
            "posttooluse",
            "custom commands",
            "slash commands",
            ".claude/commands",
        ],
    },
    TopicEntry {
        key: 10,
        title: "MCP Servers & Plugins",
        phase: "Mastery",
        topics: &["mcp", "model context protocol", "mcp server", "fastmcp", "plugins", "external tools"],
    },
    TopicEntry {
        key: 11,
        title: "Agent Teams & Parallel Sessions",
        phase: "Mastery",
        topics: &[
            "agent teams",
            "multi-agent",
            "parallel sessions",
            "headless mode",
            "orchestration",
            "background tasks",
        ],
    },
    TopicEntry {
        key: 12,
        title: "Capstone & Portfolio",
        phase: "Mastery",
        topics: &["capstone", "portfolio", "production", "ci/cd", "professional workflow", "full project"],
    },
];

/// Weeks whose topic keywords occur in the lower-cased text, or `{0}`.
pub fn find_affected_sections(text: &str) -> BTreeSet<SectionKey> {
    let mut sections: BTreeSet<SectionKey> = CURRICULUM_TOPIC_MAP
        .iter()
        .filter(|entry| entry.topics.iter().any(|topic| text.contains(topic)))
        .map(|entry| entry.key)
        .collect();

    if sections.is_empty() {
        sections.insert(NEW_SECTION);
    }
    sections
}

pub fn section_title(key: SectionKey) -> Option<&'static str> {
    CURRICULUM_TOPIC_MAP
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| entry.title)
}

pub fn is_foundation(key: SectionKey) -> bool {
    FOUNDATION_SECTIONS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_matches_week2() {
        assert!(find_affected_sections("improved git integration").contains(&2));
    }

    #[test]
    fn test_mcp_matches_week10() {
        assert!(find_affected_sections("new mcp server feature").contains(&10));
    }

    #[test]
    fn test_hooks_matches_week9() {
        assert!(find_affected_sections("new hooks feature pretooluse").contains(&9));
    }

    #[test]
    fn test_no_match_returns_new_section() {
        assert_eq!(
            find_affected_sections("completely unrelated topic xyz"),
            BTreeSet::from([NEW_SECTION])
        );
    }

    #[test]
    fn test_multiple_weeks_sorted() {
        let sections = find_affected_sections("git hooks and mcp integration");
        let keys: Vec<SectionKey> = sections.into_iter().collect();
        assert_eq!(keys, vec![2, 9, 10]);
    }

    #[test]
    fn test_topic_map_is_complete() {
        let keys: Vec<SectionKey> = CURRICULUM_TOPIC_MAP.iter().map(|e| e.key).collect();
        assert_eq!(keys, (1..=12).collect::<Vec<_>>());
        assert_eq!(section_title(10), Some("MCP Servers & Plugins"));
        assert_eq!(section_title(0), None);
        assert!(is_foundation(3));
        assert!(!is_foundation(4));
    }
}
