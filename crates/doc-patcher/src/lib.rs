//! Structured edits to the curriculum markdown
//!
//! Patching is a pure function from (text, instruction) to new text. The
//! caller owns persistence and must serialize concurrent writers.

pub mod apply;
pub mod error;
pub mod instruction;

pub use apply::{apply_batch, apply_instruction, BatchOutcome};
pub use error::PatchError;
pub use instruction::{instruction_for_gap, instructions_for_gaps};
