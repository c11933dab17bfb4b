//! Ceremony Classifier - Main orchestrator for the ceremony module.
//!
//! Pipeline:
//! 1. Short-text floor
//! 2. Early-exit framework detection (Kanban, SAFe)
//! 3. Analysis layers (density, structure, intention, comparative)
//! 4. Per-ceremony scoring
//! 5. Conflict resolution
//! 6. Result building

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info};

use super::comparative::{self, ComparativeScores};
use super::density::{self, SemanticDensity};
use super::framework;
use super::intention::{self, IntentionSignals};
use super::resolver::{self, Outcome, Resolution};
use super::result::ClassificationResult;
use super::scorer::{self, LayerSignals, ScoreBoard};
use super::structure::{self, ConversationalStructure};
use crate::config::ClassifierConfig;

/// Intermediate outputs of a full analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerReport {
    pub density: SemanticDensity,
    pub structure: ConversationalStructure,
    pub intentions: IntentionSignals,
    pub comparative: ComparativeScores,
    pub scores: ScoreBoard,
    /// None when the best score stayed below the threshold
    pub resolution: Option<Resolution>,
}

/// Classification result with the layer details that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationReport {
    pub result: ClassificationResult,
    /// None for short-text and early-exit outcomes
    pub layers: Option<LayerReport>,
    pub processing_time_ms: u64,
}

/// Fold typographic apostrophes so patterns only need `'`
pub fn normalize_transcript(text: &str) -> String {
    text.replace(['\u{2019}', '\u{2018}', '\u{02BC}'], "'")
}

/// Deterministic ceremony classifier
#[derive(Debug, Clone, Default)]
pub struct CeremonyClassifier {
    config: ClassifierConfig,
}

impl CeremonyClassifier {
    /// Create a classifier with the default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a transcript
    pub fn classify(&self, transcript: &str) -> ClassificationResult {
        self.explain(transcript).result
    }

    /// Classify a transcript and keep every intermediate layer
    pub fn explain(&self, transcript: &str) -> ClassificationReport {
        let start = Instant::now();
        let text = normalize_transcript(transcript);

        let (result, layers) = self.run(&text);
        info!("Ceremony classified: {}", result.summary());

        ClassificationReport {
            result,
            layers,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn run(&self, text: &str) -> (ClassificationResult, Option<LayerReport>) {
        let length = text.trim().chars().count();
        if length < self.config.min_transcript_chars {
            debug!(length, "Transcript too short");
            return (ClassificationResult::too_short(), None);
        }

        if let Some(framework) = framework::detect(text) {
            return (framework.result(self.config.framework_confidence), None);
        }

        let density = density::analyze(text);
        let structure = structure::analyze(text);
        let intentions = intention::analyze(text);
        let comparative = comparative::analyze(text, &density);

        let scores = scorer::score_all(&LayerSignals {
            text,
            density: &density,
            structure: &structure,
            intentions: &intentions,
            comparative: &comparative,
        });

        let outcome = resolver::resolve(
            text,
            &scores,
            &intentions,
            &comparative,
            self.config.min_confidence,
        );

        let (result, resolution) = match outcome {
            Outcome::Insufficient(best) => {
                debug!(best, "Best score below threshold");
                (ClassificationResult::insufficient(best, &scores), None)
            }
            Outcome::Resolved(resolution) => {
                let markers = scores
                    .get(resolution.winner)
                    .map(|s| s.markers.as_slice())
                    .unwrap_or(&[]);
                let result = ClassificationResult::ceremony(
                    resolution.winner,
                    resolution.score,
                    markers,
                    self.config.max_justifications,
                    &scores,
                );
                (result, Some(resolution))
            }
        };

        let layers = LayerReport {
            density,
            structure,
            intentions,
            comparative,
            scores,
            resolution,
        };
        (result, Some(layers))
    }
}

/// Classify a transcript with the default configuration
pub fn classify(transcript: &str) -> ClassificationResult {
    CeremonyClassifier::new().classify(transcript)
}
