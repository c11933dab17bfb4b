//! Semantic Density Analysis.
//!
//! Counts, per semantic field, how many distinct vocabulary terms occur in a
//! transcript. Matching is case-insensitive and word-boundary anchored.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patterns::{registry, Field};

/// Distinct matched terms per semantic field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticDensity {
    pub retro_eval: usize,
    pub planning_select: usize,
    pub facilitation: usize,
}

/// Count the distinct terms of one field present in the text
pub fn field_density(field: Field, text: &str) -> usize {
    registry()
        .field(field)
        .map(|f| f.terms().filter(|term| term.is_match(text)).count())
        .unwrap_or(0)
}

/// Analyze the three semantic fields of a transcript
pub fn analyze(text: &str) -> SemanticDensity {
    let density = SemanticDensity {
        retro_eval: field_density(Field::RetroEvaluation, text),
        planning_select: field_density(Field::PlanningSelection, text),
        facilitation: field_density(Field::Facilitation, text),
    };
    debug!(?density, "semantic density");
    density
}
