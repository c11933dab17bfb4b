//! # Ceremony Module
//!
//! Deterministic, explainable classification of meeting transcripts into
//! agile ceremony types. No LLM, no model: regex rules over a fixed string.
//!
//! ## Components
//! - `patterns`: Pattern Registry (vocabulary fields, marker rules, verbs, framework detectors)
//! - `density`: Semantic density per vocabulary field
//! - `structure`: Round-table shape, open questions and synthesis statements
//! - `intention`: Boolean intention flags and their compositions
//! - `comparative`: Similarity to the Retrospective and Planning profiles
//! - `framework`: Kanban / SAFe early exit
//! - `scorer`: Weighted score sheets per ceremony
//! - `resolver`: Conflict resolution between confusable ceremonies
//! - `result`: Output data structure
//! - `classifier`: Main orchestrator

pub mod classifier;
pub mod comparative;
pub mod density;
pub mod framework;
pub mod intention;
pub mod patterns;
pub mod resolver;
pub mod result;
pub mod scorer;
pub mod structure;

pub use classifier::{classify, CeremonyClassifier, ClassificationReport, LayerReport};
pub use comparative::ComparativeScores;
pub use density::SemanticDensity;
pub use framework::Framework;
pub use intention::IntentionSignals;
pub use patterns::{registry, PatternRegistry, RegistrySnapshot};
pub use resolver::{Outcome, Override, Resolution};
pub use result::{Ceremony, ClassificationResult, ScoreEntry};
pub use scorer::{CeremonyScore, ScoreBoard};
pub use structure::ConversationalStructure;
