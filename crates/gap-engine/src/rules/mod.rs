pub mod classify;
pub mod priority;
pub mod suggestion;
