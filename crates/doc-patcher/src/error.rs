use shared_types::InvalidAction;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("Could not find section '{title}' in curriculum. Use action='append' instead.")]
    SectionNotFound { title: String },

    #[error(transparent)]
    InvalidAction(#[from] InvalidAction),

    #[error("Failed to build heading pattern: {0}")]
    Pattern(#[from] regex::Error),
}
