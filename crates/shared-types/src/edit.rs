use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gap::SectionKey;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid action '{0}'. Use 'append', 'replace', or 'new'.")]
pub struct InvalidAction(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum EditAction {
    /// Insert at the end of an existing week, before its trailing separator.
    Append,
    /// Swap out a titled span up to the next heading.
    Replace,
    /// Add a fresh appendix block at the end of the document.
    New,
}

impl EditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditAction::Append => "append",
            EditAction::Replace => "replace",
            EditAction::New => "new",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditAction {
    type Err = InvalidAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "append" => Ok(EditAction::Append),
            "replace" => Ok(EditAction::Replace),
            "new" => Ok(EditAction::New),
            other => Err(InvalidAction(other.to_string())),
        }
    }
}

impl TryFrom<String> for EditAction {
    type Error = InvalidAction;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A targeted change to the curriculum document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditInstruction {
    pub section_key: SectionKey,
    /// Section title: used as the appendix heading for `new` and as the
    /// search needle for `replace`.
    pub title: String,
    pub action: EditAction,
    pub body: String,
    #[serde(default)]
    pub reason: String,
}

impl EditInstruction {
    /// Build from an untyped action string, failing on anything unknown.
    pub fn from_parts(
        section_key: SectionKey,
        title: impl Into<String>,
        action: &str,
        body: impl Into<String>,
        reason: impl Into<String>,
    ) -> Result<Self, InvalidAction> {
        Ok(Self {
            section_key,
            title: title.into(),
            action: action.parse()?,
            body: body.into(),
            reason: reason.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_action_names_the_value() {
        let err = EditInstruction::from_parts(3, "x", "delete", "body", "").unwrap_err();
        assert_eq!(err, InvalidAction("delete".to_string()));
        assert!(err.to_string().contains("'delete'"));
    }

    #[test]
    fn test_action_deserialization_rejects_unknown() {
        let ok: EditInstruction = serde_json::from_str(
            r#"{"section_key": 2, "title": "Git", "action": "append", "body": "b"}"#,
        )
        .unwrap();
        assert_eq!(ok.action, EditAction::Append);
        assert_eq!(ok.reason, "");

        let bad = serde_json::from_str::<EditInstruction>(
            r#"{"section_key": 2, "title": "Git", "action": "upsert", "body": "b"}"#,
        );
        assert!(bad.unwrap_err().to_string().contains("upsert"));
    }
}
