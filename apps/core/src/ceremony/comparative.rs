//! Comparative Analysis.
//!
//! Compares a transcript's semantic densities with the Retrospective and
//! Planning reference profiles using fixed linear weights.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

use super::density::SemanticDensity;

// Retrospective profile weights
const RETRO_EVAL_WEIGHT: f64 = 0.4;
const RETRO_FACILITATION_WEIGHT: f64 = 0.3;
const RETRO_PLANNING_PENALTY: f64 = 0.3;

// Planning profile weights
const PLANNING_SELECT_WEIGHT: f64 = 0.5;
const PLANNING_RETRO_PENALTY: f64 = 0.3;
const PLANNING_FACILITATION_PENALTY: f64 = 0.2;

// NOTE: expect() is acceptable here per STANDARDS.md: static pattern.
static PLANNING_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(backlog|user stor(y|ies)|estimation|story points?|points|capacity|capacité|velocity|vélocité)\b",
    )
    .expect("Invalid regex: planning markers")
});

/// Similarity of a transcript to the reference profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparativeScores {
    /// Always >= 0
    pub retro_similarity: f64,
    /// Always >= 0
    pub planning_similarity: f64,
    pub differential_score: f64,
    pub no_planning_markers: bool,
}

/// Whether the text carries any planning marker
pub fn has_planning_markers(text: &str) -> bool {
    PLANNING_MARKERS.is_match(text)
}

/// Compute profile similarities from precomputed densities
pub fn analyze(text: &str, density: &SemanticDensity) -> ComparativeScores {
    let retro_eval = density.retro_eval as f64;
    let planning_select = density.planning_select as f64;
    let facilitation = density.facilitation as f64;

    let retro_similarity = (RETRO_EVAL_WEIGHT * retro_eval
        + RETRO_FACILITATION_WEIGHT * facilitation
        - RETRO_PLANNING_PENALTY * planning_select)
        .max(0.0);
    let planning_similarity = (PLANNING_SELECT_WEIGHT * planning_select
        - PLANNING_RETRO_PENALTY * retro_eval
        - PLANNING_FACILITATION_PENALTY * facilitation)
        .max(0.0);

    let scores = ComparativeScores {
        retro_similarity,
        planning_similarity,
        differential_score: retro_similarity - planning_similarity,
        no_planning_markers: !has_planning_markers(text),
    };
    debug!(?scores, "comparative scores");
    scores
}
