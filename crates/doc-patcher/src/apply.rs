//! Apply edit instructions to curriculum text

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use shared_types::{EditAction, EditInstruction, NEW_SECTION};
use tracing::{debug, warn};

use crate::error::PatchError;

lazy_static! {
    static ref ANY_HEADING: Regex = Regex::new(r"(?m)^#{1,3}\s+").unwrap();
}

/// Result of applying several instructions in sequence.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub text: String,
    pub applied: Vec<EditInstruction>,
    pub failures: Vec<(EditInstruction, PatchError)>,
}

impl BatchOutcome {
    pub fn changed(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Apply one instruction and return the new text.
///
/// `append` and `new` only ever insert; `replace` fails without touching
/// the text when the titled section cannot be found.
pub fn apply_instruction(text: &str, instruction: &EditInstruction) -> Result<String, PatchError> {
    let block = format!("\n\n{}\n", instruction.body);

    match instruction.action {
        EditAction::Append if instruction.section_key != NEW_SECTION => {
            append_to_week(text, instruction.section_key, &block)
        }
        EditAction::Append | EditAction::New => Ok(append_appendix(text, instruction)),
        EditAction::Replace if instruction.section_key == NEW_SECTION => {
            Ok(append_appendix(text, instruction))
        }
        EditAction::Replace => replace_section(text, &instruction.title, &block),
    }
}

/// Apply instructions in order against the evolving text. A failed
/// instruction is recorded and skipped; earlier edits are kept.
pub fn apply_batch(text: &str, instructions: &[EditInstruction]) -> BatchOutcome {
    let mut outcome = BatchOutcome {
        text: text.to_string(),
        ..Default::default()
    };

    for instruction in instructions {
        match apply_instruction(&outcome.text, instruction) {
            Ok(next) => {
                debug!(
                    section = instruction.section_key,
                    action = %instruction.action,
                    title = %instruction.title,
                    "Applied edit"
                );
                outcome.text = next;
                outcome.applied.push(instruction.clone());
            }
            Err(err) => {
                warn!(title = %instruction.title, error = %err, "Edit failed");
                outcome.failures.push((instruction.clone(), err));
            }
        }
    }

    outcome
}

fn append_to_week(text: &str, week: u32, block: &str) -> Result<String, PatchError> {
    let heading = Regex::new(&format!(r"(?mi)^#{{1,3}}\s+week\s+{}\b", week))?;
    let Some(found) = heading.find(text) else {
        return Ok(format!("{}{}", text, block));
    };

    // The last representable week has no successor heading to stop at
    let next_week = week
        .checked_add(1)
        .map(|next| format!(r"week\s+{}\b|", next))
        .unwrap_or_default();
    let next_section = Regex::new(&format!(
        r"(?mi)^#{{1,3}}\s+(?:{}phase|appendix)",
        next_week
    ))?;
    let boundary = next_section
        .find_at(text, found.end())
        .map(|m| m.start())
        .unwrap_or(text.len());

    // Keep the inserted block inside the section, ahead of its separator
    let insert_at = text[found.start()..boundary]
        .rfind("\n---")
        .map(|offset| found.start() + offset)
        .unwrap_or(boundary);

    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..insert_at]);
    out.push_str(block);
    out.push_str(&text[insert_at..]);
    Ok(out)
}

fn append_appendix(text: &str, instruction: &EditInstruction) -> String {
    format!(
        "{}\n\n---\n\n### Appendix: {}\n\n{}\n",
        text, instruction.title, instruction.body
    )
}

fn replace_section(text: &str, title: &str, block: &str) -> Result<String, PatchError> {
    let needle = RegexBuilder::new(&regex::escape(title))
        .case_insensitive(true)
        .build()?;
    let found = needle
        .find(text)
        .filter(|_| !title.is_empty())
        .ok_or_else(|| PatchError::SectionNotFound {
            title: title.to_string(),
        })?;

    match ANY_HEADING.find_at(text, found.end()) {
        Some(next) => Ok(format!(
            "{}{}\n{}",
            &text[..found.start()],
            block,
            &text[next.start()..]
        )),
        None => Ok(format!("{}{}", &text[..found.start()], block)),
    }
}
