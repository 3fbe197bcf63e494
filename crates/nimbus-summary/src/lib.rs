//! AI weather narrative for Nimbus
//!
//! Builds a meteorologist prompt from a snapshot, sends it to a text-generation
//! service and guarantees a displayable string back. [`SummaryTracker`] decides
//! when a new request is needed and drops responses that arrive too late.

pub mod client;
pub mod error;
pub mod prompt;
pub mod summarizer;
pub mod tracker;

pub use client::{GeminiClient, TextGenerator};
pub use error::SummarizationError;
pub use prompt::build_prompt;
pub use summarizer::{Summarizer, ERROR_FALLBACK, UNAVAILABLE_FALLBACK};
pub use tracker::{Begin, SnapshotId, SummaryKey, SummaryTracker, Ticket};
