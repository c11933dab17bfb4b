//! Ceremony Scoring.
//!
//! Each Scrum ceremony is scored by an ordered sheet of `(predicate, weight)`
//! steps built from the analysis layers. A single generic evaluator sums the
//! sheet: bonuses add points and record their justification, penalties floor
//! the running score at zero. Final scores are clamped to [0, 100].
//!
//! Layer order per sheet: lexical, structural, intentional, comparative,
//! legacy markers, verbs.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::comparative::ComparativeScores;
use super::density::SemanticDensity;
use super::intention::IntentionSignals;
use super::patterns::{registry, RuleKind};
use super::result::{to_confidence, Ceremony, ScoreEntry};
use super::structure::ConversationalStructure;

/// Maximum justifications collected per ceremony
pub const MAX_MARKERS: usize = 5;

const MAX_SCORE: f64 = 100.0;
const LEXICAL_CAP: f64 = 25.0;
const MARKER_BONUS: f64 = 8.0;
const EXCLUSION_PENALTY: f64 = 3.0;
const EXCLUSION_TOLERANCE: usize = 2;

/// Score change applied by one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// Adds points and records the step label
    Bonus(f64),
    /// Removes points, never going below zero
    Penalty(f64),
}

/// One weighted predicate of a score sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreStep {
    pub label: String,
    pub applies: bool,
    pub adjustment: Adjustment,
}

/// Ordered steps for one ceremony
#[derive(Debug, Clone)]
pub struct ScoreSheet {
    ceremony: Ceremony,
    steps: Vec<ScoreStep>,
}

impl ScoreSheet {
    pub fn new(ceremony: Ceremony) -> Self {
        Self {
            ceremony,
            steps: Vec::new(),
        }
    }

    pub fn bonus(mut self, applies: bool, weight: f64, label: impl Into<String>) -> Self {
        self.steps.push(ScoreStep {
            label: label.into(),
            applies,
            adjustment: Adjustment::Bonus(weight),
        });
        self
    }

    pub fn penalty(mut self, applies: bool, weight: f64, label: impl Into<String>) -> Self {
        self.steps.push(ScoreStep {
            label: label.into(),
            applies,
            adjustment: Adjustment::Penalty(weight),
        });
        self
    }

    /// Evaluate the sheet in order
    pub fn total(&self) -> CeremonyScore {
        let mut score: f64 = 0.0;
        let mut markers = Vec::new();

        for step in self.steps.iter().filter(|s| s.applies) {
            match step.adjustment {
                Adjustment::Bonus(weight) if weight > 0.0 => {
                    score += weight;
                    if markers.len() < MAX_MARKERS {
                        markers.push(step.label.clone());
                    }
                }
                Adjustment::Bonus(_) => {}
                Adjustment::Penalty(weight) => {
                    score = (score - weight).max(0.0);
                }
            }
        }

        CeremonyScore {
            ceremony: self.ceremony,
            score: score.clamp(0.0, MAX_SCORE),
            markers,
        }
    }
}

/// Score of one ceremony
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CeremonyScore {
    pub ceremony: Ceremony,
    /// 0.0 - 100.0
    pub score: f64,
    /// Justifications in the order their bonuses fired (at most 5)
    pub markers: Vec<String>,
}

impl CeremonyScore {
    pub fn new(ceremony: Ceremony, score: f64) -> Self {
        Self {
            ceremony,
            score,
            markers: vec![],
        }
    }
}

/// Scores of the four Scrum ceremonies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBoard {
    scores: Vec<CeremonyScore>,
}

impl ScoreBoard {
    pub fn new(scores: Vec<CeremonyScore>) -> Self {
        Self { scores }
    }

    pub fn get(&self, ceremony: Ceremony) -> Option<&CeremonyScore> {
        self.scores.iter().find(|s| s.ceremony == ceremony)
    }

    /// Score of a ceremony, 0 when absent
    pub fn score_of(&self, ceremony: Ceremony) -> f64 {
        self.get(ceremony).map(|s| s.score).unwrap_or(0.0)
    }

    /// Highest score; ties go to the earliest ceremony
    pub fn best(&self) -> Option<&CeremonyScore> {
        self.scores.iter().fold(None, |best: Option<&CeremonyScore>, s| match best {
            Some(b) if b.score >= s.score => Some(b),
            _ => Some(s),
        })
    }

    /// Rounded scores for reporting
    pub fn entries(&self) -> Vec<ScoreEntry> {
        self.scores
            .iter()
            .map(|s| ScoreEntry {
                ceremony: s.ceremony,
                score: to_confidence(s.score),
            })
            .collect()
    }
}

/// Outputs of the analysis layers for one transcript
#[derive(Debug, Clone, Copy)]
pub struct LayerSignals<'a> {
    pub text: &'a str,
    pub density: &'a SemanticDensity,
    pub structure: &'a ConversationalStructure,
    pub intentions: &'a IntentionSignals,
    pub comparative: &'a ComparativeScores,
}

fn lexical_bonus(count: usize) -> f64 {
    (count as f64 * 2.0).min(LEXICAL_CAP)
}

/// Inclusion rules add a fixed bonus each; exclusion rules only weigh on the
/// Retrospective, once more than two of them match.
fn with_markers(mut sheet: ScoreSheet, text: &str) -> ScoreSheet {
    let ceremony = sheet.ceremony;
    let mut exclusions = 0;

    for rule in registry().markers(ceremony) {
        if !rule.matches(text) {
            continue;
        }
        match rule.kind {
            RuleKind::Inclusion => sheet = sheet.bonus(true, MARKER_BONUS, rule.justification),
            RuleKind::Exclusion => exclusions += 1,
        }
    }

    if ceremony == Ceremony::Retrospective {
        sheet = sheet.penalty(
            exclusions > EXCLUSION_TOLERANCE,
            EXCLUSION_PENALTY * exclusions as f64,
            "Vocabulaire d'une autre cérémonie",
        );
    }
    sheet
}

fn with_verbs(sheet: ScoreSheet, text: &str, label: &str) -> ScoreSheet {
    let verbs = registry().verb_matches(sheet.ceremony, text);
    sheet
        .bonus(verbs >= 3, 20.0, format!("{} ({} occurrences)", label, verbs))
        .bonus((1..3).contains(&verbs), 10.0, format!("{} ({} occurrences)", label, verbs))
}

pub fn daily_sheet(signals: &LayerSignals) -> ScoreSheet {
    let intentions = signals.intentions;

    let sheet = ScoreSheet::new(Ceremony::DailyScrum)
        .bonus(
            intentions.is_daily_intention,
            30.0,
            "Coordination quotidienne avec urgence du jour",
        )
        .bonus(
            intentions.has_coordination_intent,
            15.0,
            "Tour de coordination (hier / aujourd'hui)",
        )
        .penalty(
            intentions.is_retrospective_intention,
            25.0,
            "Intention rétrospective détectée",
        );

    with_markers(sheet, signals.text)
}

pub fn planning_sheet(signals: &LayerSignals) -> ScoreSheet {
    let intentions = signals.intentions;
    let comparative = signals.comparative;
    let planning_select = signals.density.planning_select;

    let sheet = ScoreSheet::new(Ceremony::SprintPlanning)
        .bonus(
            planning_select > 0,
            lexical_bonus(planning_select),
            format!("Vocabulaire de sélection et d'estimation ({} termes)", planning_select),
        )
        .bonus(
            intentions.is_planning_intention,
            25.0,
            "Sélection ou estimation avec engagement d'équipe",
        )
        .bonus(
            !intentions.is_retrospective_intention,
            10.0,
            "Pas d'intention rétrospective",
        )
        .bonus(
            comparative.planning_similarity > 0.0,
            comparative.planning_similarity,
            "Profil proche d'un sprint planning",
        )
        .bonus(
            !comparative.no_planning_markers
                && comparative.planning_similarity > comparative.retro_similarity,
            10.0,
            "Marqueurs de planification dominants",
        );

    let sheet = with_markers(sheet, signals.text);
    with_verbs(sheet, signals.text, "Verbes de planification")
}

pub fn review_sheet(signals: &LayerSignals) -> ScoreSheet {
    let intentions = signals.intentions;
    let review_verbs = registry().verb_matches(Ceremony::SprintReview, signals.text);

    let sheet = ScoreSheet::new(Ceremony::SprintReview)
        .bonus(
            intentions.is_review_intention,
            35.0,
            "Démonstration produit soumise à validation externe",
        )
        .bonus(
            intentions.has_external_participation,
            20.0,
            "Participation de parties prenantes externes",
        )
        .bonus(
            intentions.has_backlog_impact,
            15.0,
            "Impact sur le backlog produit",
        )
        .penalty(
            intentions.is_retrospective_intention,
            30.0,
            "Intention rétrospective détectée",
        )
        .bonus(
            review_verbs >= 3,
            15.0,
            format!("Verbes de démonstration ({} occurrences)", review_verbs),
        );

    with_markers(sheet, signals.text)
}

pub fn retrospective_sheet(signals: &LayerSignals) -> ScoreSheet {
    let intentions = signals.intentions;
    let comparative = signals.comparative;
    let retro_eval = signals.density.retro_eval;

    let sheet = ScoreSheet::new(Ceremony::Retrospective)
        .bonus(
            retro_eval > 0,
            lexical_bonus(retro_eval),
            format!("Vocabulaire d'évaluation rétrospective ({} termes)", retro_eval),
        )
        .bonus(
            signals.structure.likes_facilitated_retro,
            20.0,
            "Animation facilitée : questions ouvertes et synthèse",
        )
        .bonus(
            intentions.is_retrospective_intention,
            25.0,
            "Intention d'apprentissage et d'amélioration",
        )
        .bonus(
            intentions.reflection_dominant,
            15.0,
            "Réflexion dominante sans sélection de backlog",
        )
        .penalty(
            intentions.is_daily_intention,
            20.0,
            "Intention de coordination quotidienne",
        )
        .bonus(
            comparative.retro_similarity > 0.0,
            comparative.retro_similarity,
            "Profil proche d'une rétrospective",
        )
        .bonus(
            comparative.no_planning_markers,
            15.0,
            "Aucun marqueur de planification",
        )
        .bonus(
            comparative.differential_score > 10.0,
            10.0,
            "Écart net avec le profil planning",
        );

    let sheet = with_markers(sheet, signals.text);
    with_verbs(sheet, signals.text, "Verbes de rétrospective")
}

/// Score every Scrum ceremony
pub fn score_all(signals: &LayerSignals) -> ScoreBoard {
    let board = ScoreBoard::new(vec![
        daily_sheet(signals).total(),
        planning_sheet(signals).total(),
        review_sheet(signals).total(),
        retrospective_sheet(signals).total(),
    ]);

    debug!(
        daily = board.score_of(Ceremony::DailyScrum),
        planning = board.score_of(Ceremony::SprintPlanning),
        review = board.score_of(Ceremony::SprintReview),
        retrospective = board.score_of(Ceremony::Retrospective),
        "ceremony scores"
    );
    board
}
