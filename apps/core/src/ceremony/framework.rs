//! Early-exit detection of non-Scrum frameworks.
//!
//! Runs before any ceremony scoring. Kanban is checked first, then SAFe;
//! either one terminates classification.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::patterns::registry;
use super::result::ClassificationResult;

/// Non-Scrum framework detected ahead of scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Framework {
    Kanban,
    Safe,
}

impl Framework {
    pub fn subtype(&self) -> &'static str {
        match self {
            Framework::Kanban => "#Kanban",
            Framework::Safe => "#SAFe",
        }
    }

    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            Framework::Kanban => &["#Kanban", "#FluxContinu", "#WIP"],
            Framework::Safe => &["#SAFe", "#GrandeEchelle", "#Programme"],
        }
    }

    fn justifications(&self) -> &'static [&'static str] {
        match self {
            Framework::Kanban => &[
                "Vocabulaire Kanban détecté (WIP, flux, lead time)",
                "Aucun marqueur Scrum (sprint, vélocité, story points)",
            ],
            Framework::Safe => &[
                "Vocabulaire SAFe détecté (PI Planning, ART, programme)",
                "Coordination multi-équipes à grande échelle",
            ],
        }
    }

    /// Early-exit result with the configured fixed confidence
    pub fn result(&self, confidence: u8) -> ClassificationResult {
        ClassificationResult::framework(
            self.subtype(),
            confidence,
            self.justifications(),
            self.tags(),
        )
    }
}

/// Detect a non-Scrum framework, Kanban taking precedence
pub fn detect(text: &str) -> Option<Framework> {
    let patterns = registry().frameworks();

    if patterns.kanban.is_match(text) && !patterns.scrum_core.is_match(text) {
        info!("Kanban vocabulary without Scrum markers, early exit");
        return Some(Framework::Kanban);
    }

    if patterns.safe_explicit.is_match(text)
        || (patterns.safe_program.is_match(text) && patterns.safe_scale.is_match(text))
    {
        info!("SAFe vocabulary detected, early exit");
        return Some(Framework::Safe);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kanban_detection() {
        let text = "Revue du tableau kanban : le WIP est trop haut et le lead time explose.";
        assert_eq!(detect(text), Some(Framework::Kanban));
    }

    #[test]
    fn test_kanban_blocked_by_scrum_vocabulary() {
        let text = "Le WIP du tableau kanban déborde sur le sprint en cours.";
        assert_eq!(detect(text), None);
    }

    #[test]
    fn test_safe_explicit() {
        assert_eq!(
            detect("Préparation du PI Planning avec les product owners"),
            Some(Framework::Safe)
        );
    }

    #[test]
    fn test_safe_program_at_scale() {
        let text = "Synchronisation du programme entre plusieurs équipes pour aligner le portefeuille.";
        assert_eq!(detect(text), Some(Framework::Safe));

        // Program vocabulary alone is not enough
        assert_eq!(detect("Point sur le programme de formation interne"), None);
    }

    #[test]
    fn test_kanban_wins_over_safe() {
        let text = "Le flux kanban du programme à grande échelle, le WIP des équipes";
        assert_eq!(detect(text), Some(Framework::Kanban));
    }

    #[test]
    fn test_result_shape() {
        let result = Framework::Safe.result(85);
        assert_eq!(result.subtype.as_deref(), Some("#SAFe"));
        assert_eq!(result.confidence, 85);
        assert_eq!(result.tags, vec!["#SAFe", "#GrandeEchelle", "#Programme"]);
        assert!(result.all_scores.is_none());
    }
}
