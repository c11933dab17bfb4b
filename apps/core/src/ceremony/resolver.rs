//! Conflict Resolution.
//!
//! Applies ordered override rules on top of the provisional winner. Each rule
//! sees the winner left by the previous one:
//! 1. Daily Scrum vs Retrospective
//! 2. Sprint Planning vs Retrospective (close scores)
//! 3. Sprint Planning veto when critical planning markers are missing
//! 4. Retrospective confirmation boost

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::info;

use super::comparative::ComparativeScores;
use super::intention::IntentionSignals;
use super::patterns::registry;
use super::result::Ceremony;
use super::scorer::ScoreBoard;

const DAILY_OUTRIGHT_MIN: f64 = 50.0;
const DAILY_RETRO_MARGIN: f64 = 10.0;
const PLANNING_RETRO_MARGIN: f64 = 15.0;
const RETRO_OVER_PLANNING_BOOST: f64 = 10.0;
const PLANNING_VETO_MIN: f64 = 40.0;
const PLANNING_VETO_RETRO_MIN: f64 = 35.0;
const CONFIRMATION_MIN: f64 = 40.0;
const CONFIRMATION_SIGNALS: usize = 3;
const CONFIRMATION_VERBS: usize = 2;
const CONFIRMATION_BOOST: f64 = 20.0;

// NOTE: expect() is acceptable here per STANDARDS.md: static patterns.
static CRITICAL_PLANNING_MARKERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(backlog|user stor(y|ies)|estimation|story points?|points)\b")
        .expect("Invalid regex: critical planning markers")
});

static RETRO_CONFIRMATION_SIGNALS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        // Sprint ending
        Regex::new(r"(?i)\b(fin du sprint|fin de sprint|ce sprint|dernier sprint|sprint (dernier|écoulé|précédent)|last sprint|this sprint)\b")
            .expect("Invalid regex: sprint ending"),
        // Went well / went wrong
        Regex::new(r"(?i)\b(bien|mal) (fonctionné|marché|passé)\b|\bwent (well|wrong)\b|\bce qui (n'a pas|a) (marché|fonctionné)\b")
            .expect("Invalid regex: went well"),
        // Improvement
        Regex::new(r"(?i)\b(amélior\w*|axes? de progrès|improve\w*)")
            .expect("Invalid regex: improvement"),
        // Resolution, owner, action
        Regex::new(r"(?i)\b(responsable|s'occupe|owner|plan d'action|action items?|actions?|on décide|décision)\b")
            .expect("Invalid regex: owner and action"),
        // Team pronouns
        Regex::new(r"(?i)\b(nous|notre|nos|l'équipe|équipe|we|our|team)\b")
            .expect("Invalid regex: team pronouns"),
    ]
});

/// Override applied by a resolution rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Override {
    DailyOverRetrospective,
    RetrospectiveOverPlanning,
    PlanningVeto,
    RetrospectiveConfirmed,
}

/// Winner after conflict resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub winner: Ceremony,
    pub score: f64,
    pub overrides: Vec<Override>,
}

/// Outcome of the resolution stage
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Best provisional score below the threshold
    Insufficient(f64),
    Resolved(Resolution),
}

/// Whether the text carries any critical planning marker
pub fn has_critical_planning_markers(text: &str) -> bool {
    CRITICAL_PLANNING_MARKERS.is_match(text)
}

/// Number of independent retrospective signals (0 - 5)
pub fn confirmation_signals(text: &str) -> usize {
    RETRO_CONFIRMATION_SIGNALS
        .iter()
        .filter(|r| r.is_match(text))
        .count()
}

impl Resolution {
    fn switch(&mut self, winner: Ceremony, score: f64, rule: Override) {
        info!(
            from = %self.winner,
            to = %winner,
            ?rule,
            "Conflict resolution override"
        );
        self.winner = winner;
        self.score = score;
        self.overrides.push(rule);
    }
}

fn daily_vs_retrospective(
    resolution: &mut Resolution,
    board: &ScoreBoard,
    intentions: &IntentionSignals,
) {
    if !matches!(
        resolution.winner,
        Ceremony::DailyScrum | Ceremony::Retrospective
    ) {
        return;
    }
    let (Some(daily), Some(retro)) = (
        board.get(Ceremony::DailyScrum),
        board.get(Ceremony::Retrospective),
    ) else {
        return;
    };

    let daily_wins = (intentions.is_daily_intention && daily.score >= DAILY_OUTRIGHT_MIN)
        || (!intentions.is_retrospective_intention
            && daily.score > retro.score - DAILY_RETRO_MARGIN);

    if daily_wins && resolution.winner != Ceremony::DailyScrum {
        resolution.switch(
            Ceremony::DailyScrum,
            daily.score,
            Override::DailyOverRetrospective,
        );
    }
}

fn planning_vs_retrospective(
    resolution: &mut Resolution,
    board: &ScoreBoard,
    intentions: &IntentionSignals,
    comparative: &ComparativeScores,
) {
    if resolution.winner != Ceremony::SprintPlanning {
        return;
    }
    let planning = resolution.score;
    let retro = board.score_of(Ceremony::Retrospective);
    if !(retro < planning && planning - retro <= PLANNING_RETRO_MARGIN) {
        return;
    }

    if intentions.is_retrospective_intention && comparative.no_planning_markers {
        resolution.switch(
            Ceremony::Retrospective,
            (retro + RETRO_OVER_PLANNING_BOOST).min(100.0),
            Override::RetrospectiveOverPlanning,
        );
    } else if comparative.retro_similarity > 0.0 && !intentions.is_planning_intention {
        resolution.switch(
            Ceremony::Retrospective,
            retro,
            Override::RetrospectiveOverPlanning,
        );
    }
}

fn planning_veto(resolution: &mut Resolution, board: &ScoreBoard, text: &str) {
    if resolution.winner != Ceremony::SprintPlanning || resolution.score < PLANNING_VETO_MIN {
        return;
    }
    let retro = board.score_of(Ceremony::Retrospective);
    if !has_critical_planning_markers(text) && retro >= PLANNING_VETO_RETRO_MIN {
        resolution.switch(Ceremony::Retrospective, retro, Override::PlanningVeto);
    }
}

fn confirm_retrospective(resolution: &mut Resolution, text: &str) {
    if resolution.winner != Ceremony::Retrospective || resolution.score < CONFIRMATION_MIN {
        return;
    }
    let signals = confirmation_signals(text);
    let verbs = registry().verb_matches(Ceremony::Retrospective, text);

    if signals >= CONFIRMATION_SIGNALS || verbs >= CONFIRMATION_VERBS {
        info!(signals, verbs, "Retrospective confirmed, boosting score");
        resolution.score = (resolution.score + CONFIRMATION_BOOST).min(100.0);
        resolution.overrides.push(Override::RetrospectiveConfirmed);
    }
}

/// Resolve the final winner from the provisional scores
pub fn resolve(
    text: &str,
    board: &ScoreBoard,
    intentions: &IntentionSignals,
    comparative: &ComparativeScores,
    min_confidence: f64,
) -> Outcome {
    let Some(best) = board.best() else {
        return Outcome::Insufficient(0.0);
    };
    if best.score < min_confidence {
        return Outcome::Insufficient(best.score);
    }

    let mut resolution = Resolution {
        winner: best.ceremony,
        score: best.score,
        overrides: Vec::new(),
    };

    daily_vs_retrospective(&mut resolution, board, intentions);
    planning_vs_retrospective(&mut resolution, board, intentions, comparative);
    planning_veto(&mut resolution, board, text);
    confirm_retrospective(&mut resolution, text);

    Outcome::Resolved(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ceremony::scorer::CeremonyScore;

    fn board(daily: f64, planning: f64, review: f64, retro: f64) -> ScoreBoard {
        ScoreBoard::new(vec![
            CeremonyScore::new(Ceremony::DailyScrum, daily),
            CeremonyScore::new(Ceremony::SprintPlanning, planning),
            CeremonyScore::new(Ceremony::SprintReview, review),
            CeremonyScore::new(Ceremony::Retrospective, retro),
        ])
    }

    fn resolved(outcome: Outcome) -> Resolution {
        match outcome {
            Outcome::Resolved(resolution) => resolution,
            Outcome::Insufficient(score) => panic!("unexpected insufficient outcome ({})", score),
        }
    }

    #[test]
    fn test_below_threshold_is_insufficient() {
        let outcome = resolve(
            "",
            &board(10.0, 39.4, 0.0, 20.0),
            &IntentionSignals::default(),
            &ComparativeScores::default(),
            40.0,
        );
        assert_eq!(outcome, Outcome::Insufficient(39.4));
    }

    #[test]
    fn test_daily_wins_outright_with_daily_intention() {
        let intentions = IntentionSignals {
            is_daily_intention: true,
            is_retrospective_intention: true,
            ..Default::default()
        };
        let resolution = resolved(resolve(
            "",
            &board(55.0, 0.0, 0.0, 70.0),
            &intentions,
            &ComparativeScores::default(),
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::DailyScrum);
        assert_eq!(resolution.score, 55.0);
        assert_eq!(resolution.overrides, vec![Override::DailyOverRetrospective]);
    }

    #[test]
    fn test_daily_wins_within_margin_without_retro_intention() {
        let resolution = resolved(resolve(
            "",
            &board(52.0, 0.0, 0.0, 60.0),
            &IntentionSignals::default(),
            &ComparativeScores::default(),
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::DailyScrum);
        assert_eq!(resolution.score, 52.0);
    }

    #[test]
    fn test_retro_kept_with_retro_intention() {
        let intentions = IntentionSignals {
            is_retrospective_intention: true,
            ..Default::default()
        };
        let resolution = resolved(resolve(
            "",
            &board(52.0, 0.0, 0.0, 60.0),
            &intentions,
            &ComparativeScores::default(),
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::Retrospective);
        assert!(resolution.overrides.is_empty());
    }

    #[test]
    fn test_retro_over_close_planning_with_boost() {
        let intentions = IntentionSignals {
            is_retrospective_intention: true,
            ..Default::default()
        };
        let comparative = ComparativeScores {
            no_planning_markers: true,
            ..Default::default()
        };
        let resolution = resolved(resolve(
            "",
            &board(0.0, 60.0, 0.0, 50.0),
            &intentions,
            &comparative,
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::Retrospective);
        assert_eq!(resolution.score, 60.0);
        assert_eq!(resolution.overrides, vec![Override::RetrospectiveOverPlanning]);
    }

    #[test]
    fn test_retro_over_close_planning_by_similarity() {
        let comparative = ComparativeScores {
            retro_similarity: 1.0,
            ..Default::default()
        };
        let resolution = resolved(resolve(
            "backlog",
            &board(0.0, 60.0, 0.0, 50.0),
            &IntentionSignals::default(),
            &comparative,
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::Retrospective);
        assert_eq!(resolution.score, 50.0);
    }

    #[test]
    fn test_planning_kept_with_planning_intention() {
        let intentions = IntentionSignals {
            is_planning_intention: true,
            ..Default::default()
        };
        let comparative = ComparativeScores {
            retro_similarity: 1.0,
            ..Default::default()
        };
        let resolution = resolved(resolve(
            "backlog en story points",
            &board(0.0, 60.0, 0.0, 50.0),
            &intentions,
            &comparative,
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::SprintPlanning);
        assert_eq!(resolution.score, 60.0);
    }

    #[test]
    fn test_planning_veto_without_critical_markers() {
        let resolution = resolved(resolve(
            "On parle de capacité et d'engagement",
            &board(0.0, 55.0, 0.0, 36.0),
            &IntentionSignals::default(),
            &ComparativeScores::default(),
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::Retrospective);
        assert_eq!(resolution.score, 36.0);
        assert_eq!(resolution.overrides, vec![Override::PlanningVeto]);
    }

    #[test]
    fn test_planning_veto_needs_retro_score() {
        let resolution = resolved(resolve(
            "On parle de capacité et d'engagement",
            &board(0.0, 55.0, 0.0, 30.0),
            &IntentionSignals::default(),
            &ComparativeScores::default(),
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::SprintPlanning);
    }

    #[test]
    fn test_retrospective_confirmation_boost() {
        let text = "Fin du sprint : ce qui a bien marché, nos axes d'amélioration, \
                    Marc est responsable de l'action.";
        assert_eq!(confirmation_signals(text), 5);

        let intentions = IntentionSignals {
            is_retrospective_intention: true,
            ..Default::default()
        };
        let resolution = resolved(resolve(
            text,
            &board(0.0, 0.0, 0.0, 60.0),
            &intentions,
            &ComparativeScores::default(),
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::Retrospective);
        assert_eq!(resolution.score, 80.0);
        assert_eq!(resolution.overrides, vec![Override::RetrospectiveConfirmed]);
    }

    #[test]
    fn test_confirmation_boost_is_clamped() {
        let text = "Il faut améliorer, nous avons appris beaucoup";
        let intentions = IntentionSignals {
            is_retrospective_intention: true,
            ..Default::default()
        };
        let resolution = resolved(resolve(
            text,
            &board(0.0, 0.0, 0.0, 95.0),
            &intentions,
            &ComparativeScores::default(),
            40.0,
        ));
        assert_eq!(resolution.score, 100.0);
    }

    #[test]
    fn test_daily_outright_win_boundary() {
        let intentions = IntentionSignals {
            is_daily_intention: true,
            is_retrospective_intention: true,
            ..Default::default()
        };

        let resolution = resolved(resolve(
            "",
            &board(49.0, 0.0, 0.0, 70.0),
            &intentions,
            &ComparativeScores::default(),
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::Retrospective);
        assert!(resolution.overrides.is_empty());

        let resolution = resolved(resolve(
            "",
            &board(50.0, 0.0, 0.0, 70.0),
            &intentions,
            &ComparativeScores::default(),
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::DailyScrum);
        assert_eq!(resolution.score, 50.0);
    }

    #[test]
    fn test_planning_retro_margin_boundary() {
        let comparative = ComparativeScores {
            retro_similarity: 1.0,
            ..Default::default()
        };

        let resolution = resolved(resolve(
            "backlog",
            &board(0.0, 60.0, 0.0, 45.0),
            &IntentionSignals::default(),
            &comparative,
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::Retrospective);
        assert_eq!(resolution.score, 45.0);
        assert_eq!(resolution.overrides, vec![Override::RetrospectiveOverPlanning]);

        let resolution = resolved(resolve(
            "backlog",
            &board(0.0, 61.0, 0.0, 45.0),
            &IntentionSignals::default(),
            &comparative,
            40.0,
        ));
        assert_eq!(resolution.winner, Ceremony::SprintPlanning);
        assert_eq!(resolution.score, 61.0);
        assert!(resolution.overrides.is_empty());
    }

    fn retro_outcome(text: &str) -> Resolution {
        let intentions = IntentionSignals {
            is_retrospective_intention: true,
            ..Default::default()
        };
        resolved(resolve(
            text,
            &board(0.0, 0.0, 0.0, 60.0),
            &intentions,
            &ComparativeScores::default(),
            40.0,
        ))
    }

    #[test]
    fn test_confirmation_needs_three_signals_or_two_verbs() {
        // Sprint ending and team pronoun, one verb
        let text = "Ce sprint, nous avons appris.";
        assert_eq!(confirmation_signals(text), 2);
        assert_eq!(registry().verb_matches(Ceremony::Retrospective, text), 1);
        let resolution = retro_outcome(text);
        assert_eq!(resolution.score, 60.0);
        assert!(resolution.overrides.is_empty());

        // Sprint ending, went well and team pronoun, no verb
        let text = "Fin du sprint, nous avons bien marché.";
        assert_eq!(confirmation_signals(text), 3);
        assert_eq!(registry().verb_matches(Ceremony::Retrospective, text), 0);
        assert_eq!(retro_outcome(text).score, 80.0);

        // No signal, two verbs
        let text = "Il faut apprendre et partager.";
        assert_eq!(confirmation_signals(text), 0);
        assert_eq!(registry().verb_matches(Ceremony::Retrospective, text), 2);
        let resolution = retro_outcome(text);
        assert_eq!(resolution.score, 80.0);
        assert_eq!(resolution.overrides, vec![Override::RetrospectiveConfirmed]);
    }
}
