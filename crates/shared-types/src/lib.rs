pub mod audit;
pub mod document;
pub mod edit;
pub mod gap;
pub mod types;

pub use document::{ReferenceDocument, Section, SectionLabel, TopicEntry};
pub use edit::{EditAction, EditInstruction, InvalidAction};
pub use gap::{Gap, GapType, Priority, SectionKey, NEW_SECTION};
pub use types::{RawUpdate, Source, UpdateRecord, ValidationError};
