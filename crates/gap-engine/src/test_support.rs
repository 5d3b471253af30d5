//! Fixtures shared by the unit tests in this crate

use std::collections::BTreeSet;
use std::sync::Arc;

use shared_types::{Gap, GapType, Priority, SectionKey, Source, UpdateRecord};

pub fn sample_curriculum() -> &'static str {
    "
# 12-Week Claude Code Mastery Curriculum v2.1

## Phase 1: Foundation (Weeks 1-3)

### WEEK 1: The Terminal & File System
**Topics:**
- Terminal basics, bash commands
- Node.js and npm setup
- Token optimization and /compact

### WEEK 2: Git & Version Control
**Topics:**
- Git fundamentals, branches
- GitHub pull requests

### WEEK 3: Claude Code: First Contact
**Topics:**
- Claude Code installation and auth
- Plan mode, diffs, /clear, /help
- Models: Opus 4.6, Sonnet 4.5, Haiku 4.5
- CLAUDE.md project context

## Phase 2: Building (Weeks 4-8)

### WEEK 9: Skills, Hooks & Custom Commands
**Topics:**
- Skill frontmatter, SKILL.MD
- Hook events and hook types (command, prompt, agent)
- /hooks menu
- Custom slash commands via .claude/commands

### WEEK 10: MCP Servers & Plugins
**Topics:**
- MCP server setup, MCP tool, MCP serve
- Model Context Protocol
- fastmcp

### WEEK 11: Agent Teams & Parallel Sessions
**Topics:**
- Built-in subagent types
- Custom agents
- Agent SDK

## Appendix B: CLI Reference
| Flag | Description |
| --print | Output-only mode |
| --model | Select model |
| CLAUDE_MODEL | Environment variable |
| ANTHROPIC_API_KEY | Auth key |

## Appendix G: Permissions
- Permission mode, allowedTools
- bypassPermissions
- Sandbox configuration

## Appendix I: IDE Integrations
- VS Code, JetBrains integration
- IDE integration settings
"
}

pub fn update(title: &str, content: &str, source: Source) -> UpdateRecord {
    let content = if content.is_empty() { title } else { content };
    UpdateRecord::new(source, title, content).with_date("2026-02-01")
}

pub fn gap(
    title: &str,
    content: &str,
    source: Source,
    sections: &[SectionKey],
    gap_type: GapType,
    priority: Priority,
) -> Gap {
    Gap::new(
        Arc::new(update(title, content, source)),
        sections.iter().copied().collect::<BTreeSet<_>>(),
        gap_type,
        priority,
        format!("Suggestion for {}", title),
    )
}
