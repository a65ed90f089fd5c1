//! Retrieval-augmented answering.

pub mod assistant;
pub mod types;

pub use assistant::Assistant;
pub use types::{Answer, CompletionOutcome};
