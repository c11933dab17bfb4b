//! Ceremony Core
//!
//! Classifies agile meeting transcripts (Daily Scrum, Sprint Planning,
//! Sprint Review, Retrospective, or "Autre" for Kanban / SAFe and unknown
//! meetings) with a deterministic multi-layer rule engine.
//!
//! ```rust,ignore
//! let result = ceremony_core::classify(transcript);
//! println!("{} ({}%)", result.ceremony, result.confidence);
//! ```

pub mod ceremony;
pub mod config;
pub mod error;
pub mod text_extract;

#[cfg(test)]
mod tests;

pub use ceremony::{classify, CeremonyClassifier, ClassificationResult};
pub use config::ClassifierConfig;
pub use error::AppError;
