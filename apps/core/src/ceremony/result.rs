//! Classification Result - Output structure of the ceremony classifier.
//!
//! Maps the resolved winner to its display label and tag set, and builds the
//! fixed-shape results used by the short-text, early-exit and
//! below-threshold outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::scorer::ScoreBoard;

/// Ceremony type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ceremony {
    #[serde(rename = "Daily Scrum")]
    DailyScrum,
    #[serde(rename = "Sprint Planning")]
    SprintPlanning,
    #[serde(rename = "Sprint Review")]
    SprintReview,
    #[serde(rename = "Rétrospective")]
    Retrospective,
    /// Catch-all, including Kanban and SAFe meetings
    #[serde(rename = "Autre")]
    Other,
}

impl fmt::Display for Ceremony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Ceremony {
    /// The four scored Scrum ceremonies, in tie-break order
    pub const SCRUM: [Ceremony; 4] = [
        Ceremony::DailyScrum,
        Ceremony::SprintPlanning,
        Ceremony::SprintReview,
        Ceremony::Retrospective,
    ];

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Ceremony::DailyScrum => "Daily Scrum",
            Ceremony::SprintPlanning => "Sprint Planning",
            Ceremony::SprintReview => "Sprint Review",
            Ceremony::Retrospective => "Rétrospective",
            Ceremony::Other => "Autre",
        }
    }

    /// Display hashtags
    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            Ceremony::DailyScrum => &["#Standup", "#Quotidien", "#TourDeTable"],
            Ceremony::SprintPlanning => &["#Planification", "#Backlog", "#Estimation"],
            Ceremony::SprintReview => &["#Demo", "#Increment", "#Feedback"],
            Ceremony::Retrospective => &["#Retrospective", "#AmeliorationContinue", "#Actions"],
            Ceremony::Other => &[],
        }
    }

    /// Analysis focus handed to the downstream LLM prompt
    pub fn prompt_focus(&self) -> &'static str {
        match self {
            Ceremony::DailyScrum => {
                "Focus on blockers, dependencies between team members and daily coordination."
            }
            Ceremony::SprintPlanning => {
                "Focus on sprint scope, estimation quality, capacity and commitment risks."
            }
            Ceremony::SprintReview => {
                "Focus on the delivered increment, stakeholder feedback and backlog impact."
            }
            Ceremony::Retrospective => {
                "Focus on improvement opportunities, team dynamics and follow-up actions."
            }
            Ceremony::Other => "Focus on overall agile health, risks and recommendations.",
        }
    }
}

/// Rounded score of one ceremony, reported for transparency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(rename = "type")]
    pub ceremony: Ceremony,
    pub score: u8,
}

/// Final classification of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub ceremony: Ceremony,
    /// Framework variant for `Autre` results (`#Kanban`, `#SAFe`)
    pub subtype: Option<String>,
    /// 0 - 100
    pub confidence: u8,
    pub justifications: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_scores: Option<Vec<ScoreEntry>>,
}

/// Justification used when the winner collected no marker
pub const DEFAULT_JUSTIFICATION: &str = "Patterns agiles identifiés";

/// Convert an internal score to a bounded integer confidence
pub fn to_confidence(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl ClassificationResult {
    /// Transcript too short to analyse
    pub fn too_short() -> Self {
        Self {
            ceremony: Ceremony::Other,
            subtype: None,
            confidence: 0,
            justifications: vec!["Texte trop court pour être analysé".to_string()],
            tags: vec![],
            all_scores: None,
        }
    }

    /// Early exit for a non-Scrum framework
    pub fn framework(subtype: &str, confidence: u8, justifications: &[&str], tags: &[&str]) -> Self {
        Self {
            ceremony: Ceremony::Other,
            subtype: Some(subtype.to_string()),
            confidence,
            justifications: to_strings(justifications),
            tags: to_strings(tags),
            all_scores: None,
        }
    }

    /// Best score below the confidence threshold
    pub fn insufficient(best_score: f64, board: &ScoreBoard) -> Self {
        Self {
            ceremony: Ceremony::Other,
            subtype: None,
            confidence: to_confidence(best_score),
            justifications: vec!["Patterns Scrum insuffisants".to_string()],
            tags: vec![],
            all_scores: Some(board.entries()),
        }
    }

    /// Result for a resolved Scrum ceremony
    pub fn ceremony(
        winner: Ceremony,
        score: f64,
        markers: &[String],
        max_justifications: usize,
        board: &ScoreBoard,
    ) -> Self {
        let justifications = if markers.is_empty() {
            vec![DEFAULT_JUSTIFICATION.to_string()]
        } else {
            markers.iter().take(max_justifications).cloned().collect()
        };

        Self {
            ceremony: winner,
            subtype: None,
            confidence: to_confidence(score),
            justifications,
            tags: to_strings(winner.tags()),
            all_scores: Some(board.entries()),
        }
    }

    /// Focus string for the downstream analysis prompt
    pub fn prompt_focus(&self) -> &'static str {
        self.ceremony.prompt_focus()
    }

    /// One-line summary for logging
    pub fn summary(&self) -> String {
        match &self.subtype {
            Some(subtype) => format!("{} {} ({}%)", self.ceremony, subtype, self.confidence),
            None => format!("{} ({}%)", self.ceremony, self.confidence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_tags() {
        assert_eq!(Ceremony::DailyScrum.label(), "Daily Scrum");
        assert_eq!(
            Ceremony::DailyScrum.tags(),
            &["#Standup", "#Quotidien", "#TourDeTable"]
        );
        assert_eq!(Ceremony::Other.label(), "Autre");
        assert!(Ceremony::Other.tags().is_empty());
    }

    #[test]
    fn test_serialization_shape() {
        let result = ClassificationResult::framework(
            "#Kanban",
            85,
            &["Vocabulaire Kanban"],
            &["#Kanban", "#FluxContinu", "#WIP"],
        );
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["type"], "Autre");
        assert_eq!(json["subtype"], "#Kanban");
        assert_eq!(json["confidence"], 85);
        assert!(json.get("allScores").is_none());
    }

    #[test]
    fn test_too_short_has_null_subtype() {
        let json = serde_json::to_value(ClassificationResult::too_short()).unwrap();
        assert!(json["subtype"].is_null());
        assert_eq!(json["confidence"], 0);
    }

    #[test]
    fn test_to_confidence_rounds_and_clamps() {
        assert_eq!(to_confidence(72.5), 73);
        assert_eq!(to_confidence(-4.0), 0);
        assert_eq!(to_confidence(180.0), 100);
    }

    #[test]
    fn test_summary() {
        let result = ClassificationResult::too_short();
        assert_eq!(result.summary(), "Autre (0%)");
    }
}
