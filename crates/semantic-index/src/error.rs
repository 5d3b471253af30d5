use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("No week or appendix sections found in reference document")]
    NoSections,

    #[error("Vocabulary is empty after stop-word removal")]
    EmptyVocabulary,
}
