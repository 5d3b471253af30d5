use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::types::UpdateRecord;

/// Week number of a curriculum section. Zero means "needs a new section".
pub type SectionKey = u32;

pub const NEW_SECTION: SectionKey = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapType {
    NewFeature,
    Deprecated,
    Updated,
    NewTopic,
}

impl GapType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GapType::NewFeature => "new_feature",
            GapType::Deprecated => "deprecated",
            GapType::Updated => "updated",
            GapType::NewTopic => "new_topic",
        }
    }
}

impl fmt::Display for GapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering follows urgency: `High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// True when `self` is at least as urgent as `threshold`.
    pub fn meets(&self, threshold: Priority) -> bool {
        self.rank() <= threshold.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("Unknown priority '{}'", other)),
        }
    }
}

/// An actionable discrepancy between one update and the curriculum.
///
/// The update is shared, never copied: consolidation hands out synthetic
/// records and every gap built from them points at the same allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gap {
    pub update: Arc<UpdateRecord>,
    pub affected_sections: BTreeSet<SectionKey>,
    pub gap_type: GapType,
    pub priority: Priority,
    pub suggestion: String,
    pub source_count: u32,
}

impl Gap {
    pub fn new(
        update: Arc<UpdateRecord>,
        affected_sections: BTreeSet<SectionKey>,
        gap_type: GapType,
        priority: Priority,
        suggestion: String,
    ) -> Self {
        let mut affected_sections = affected_sections;
        if affected_sections.is_empty() {
            affected_sections.insert(NEW_SECTION);
        }
        Self {
            update,
            affected_sections,
            gap_type,
            priority,
            suggestion,
            source_count: 1,
        }
    }

    /// Lowest affected section key; `NEW_SECTION` sorts first.
    pub fn primary_section(&self) -> SectionKey {
        self.affected_sections
            .iter()
            .next()
            .copied()
            .unwrap_or(NEW_SECTION)
    }

    pub fn needs_new_section(&self) -> bool {
        self.affected_sections.contains(&NEW_SECTION)
    }
}
