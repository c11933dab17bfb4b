//! Intention Analysis.
//!
//! Derives boolean intention flags from regex presence tests, then composes
//! them into per-ceremony intentions. Pure boolean logic, no weighting.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

/// Primitive intention families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    Learning,
    Improvement,
    Reflection,
    ProcessReflection,
    Selection,
    Estimation,
    Commitment,
    Coordination,
    DailyUrgency,
    ImmediateAction,
    Demonstration,
    FeedbackProduct,
    ExternalValidation,
    ExternalParticipation,
    BacklogImpact,
}

// NOTE: expect() is acceptable here per STANDARDS.md: static patterns.
static PRIMITIVES: LazyLock<Vec<(Primitive, Regex)>> = LazyLock::new(|| {
    let table: &[(Primitive, &str)] = &[
        // Retrospective family
        (
            Primitive::Learning,
            r"(?i)\b(appris|apprendre|apprentissage|leçons?|retenir|retient|retenons|learned|learning|lessons?)\b",
        ),
        (
            Primitive::Improvement,
            r"(?i)\b(amélior\w*|mieux faire|faire mieux|optimiser|improve\w*|better)\b",
        ),
        (
            Primitive::Reflection,
            r"(?i)\b(bien|mal) (fonctionné|marché|passé)\b|\bwent (well|wrong)\b|\b(recul|ressenti|rétrospective|retrospective|rétro|bilan)\b",
        ),
        (
            Primitive::ProcessReflection,
            r"(?i)\b(notre (façon|manière) de travailler|processus|process|fonctionnement de l'équipe|collaboration|communication|ways of working)\b",
        ),
        // Planning family
        (
            Primitive::Selection,
            r"(?i)\b(backlog|prioris\w*|sélectionn\w*|user stor(y|ies)|objectif du sprint|sprint goal)\b",
        ),
        (
            Primitive::Estimation,
            r"(?i)\b(estimation|estimer|estime|story points?|points|planning poker|complexité)\b",
        ),
        (
            Primitive::Commitment,
            r"(?i)\b(engage\w*|capacité|capacity|vélocité|velocity|prochain sprint|next sprint|embarqu\w*|commit\w*)\b",
        ),
        // Daily family
        (
            Primitive::Coordination,
            r"(?i)\b(hier|aujourd'hui|yesterday|today|je (travaille|vais|continue|termine|fais)|j'ai (terminé|fini|fait|avancé))\b",
        ),
        (
            Primitive::DailyUrgency,
            r"(?i)\b(bloqué\w*|bloquant|blocage|blocker|blocked|urgent|aujourd'hui|today|ce matin|cet après-midi)\b",
        ),
        (
            Primitive::ImmediateAction,
            r"(?i)\b(je (vais|fais|m'occupe|prends)|je m'en occupe|dans la journée|d'ici ce soir|tout de suite|I will|I'm working on)\b",
        ),
        // Review family
        (
            Primitive::Demonstration,
            r"(?i)\b(démo|demo|démonstration|montrer|présenter|showcase|incrément|increment)\b",
        ),
        (
            Primitive::FeedbackProduct,
            r"(?i)\b(feedback|retours? (des utilisateurs|du client|des clients|produit)|avis|fonctionnalités?|features?)\b",
        ),
        (
            Primitive::ExternalValidation,
            r"(?i)\b(parties prenantes|stakeholders?|clients?|sponsors?|utilisateurs|valider|validation|accepté)\b",
        ),
        (
            Primitive::ExternalParticipation,
            r"(?i)\b(parties prenantes|stakeholders?|clients?|sponsors?|direction|invités?|guests?)\b",
        ),
        (
            Primitive::BacklogImpact,
            r"(?i)\b(ajouter au backlog|mettre à jour le backlog|backlog (mis à jour|ajusté)|nouvelles? (stories|user stories)|repriorit\w*|update the backlog)\b",
        ),
    ];

    table
        .iter()
        .map(|(primitive, pattern)| {
            (
                *primitive,
                Regex::new(pattern).expect("Invalid regex: intention primitive"),
            )
        })
        .collect()
});

fn detect(primitive: Primitive, text: &str) -> bool {
    PRIMITIVES
        .iter()
        .any(|(p, regex)| *p == primitive && regex.is_match(text))
}

/// Intention flags of a transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentionSignals {
    // Primitive flags
    pub learning_intent: bool,
    pub improvement_intent: bool,
    pub reflection_intent: bool,
    pub process_reflection: bool,
    pub selection_intent: bool,
    pub estimation_intent: bool,
    pub commitment_intent: bool,
    pub has_coordination_intent: bool,
    pub daily_urgency: bool,
    pub immediate_action: bool,
    pub demonstration_intent: bool,
    pub feedback_product_intent: bool,
    pub external_validation_intent: bool,
    pub has_external_participation: bool,
    pub has_backlog_impact: bool,

    // Compound flags
    pub is_retrospective_intention: bool,
    pub is_planning_intention: bool,
    pub reflection_dominant: bool,
    pub is_daily_intention: bool,
    pub is_review_intention: bool,
    pub has_product_focus: bool,
}

impl IntentionSignals {
    /// Compose compound flags from already-set primitive flags
    pub fn compose(mut self) -> Self {
        self.is_retrospective_intention = self.learning_intent
            && self.improvement_intent
            && (self.reflection_intent || self.process_reflection);
        self.is_planning_intention =
            (self.selection_intent || self.estimation_intent) && self.commitment_intent;
        self.reflection_dominant = self.reflection_intent && !self.selection_intent;
        self.is_daily_intention =
            self.has_coordination_intent && (self.daily_urgency || self.immediate_action);
        self.is_review_intention = self.demonstration_intent
            && self.feedback_product_intent
            && self.external_validation_intent;
        self.has_product_focus = self.demonstration_intent && self.feedback_product_intent;
        self
    }
}

/// Analyze the intentions expressed in a transcript
pub fn analyze(text: &str) -> IntentionSignals {
    let signals = IntentionSignals {
        learning_intent: detect(Primitive::Learning, text),
        improvement_intent: detect(Primitive::Improvement, text),
        reflection_intent: detect(Primitive::Reflection, text),
        process_reflection: detect(Primitive::ProcessReflection, text),
        selection_intent: detect(Primitive::Selection, text),
        estimation_intent: detect(Primitive::Estimation, text),
        commitment_intent: detect(Primitive::Commitment, text),
        has_coordination_intent: detect(Primitive::Coordination, text),
        daily_urgency: detect(Primitive::DailyUrgency, text),
        immediate_action: detect(Primitive::ImmediateAction, text),
        demonstration_intent: detect(Primitive::Demonstration, text),
        feedback_product_intent: detect(Primitive::FeedbackProduct, text),
        external_validation_intent: detect(Primitive::ExternalValidation, text),
        has_external_participation: detect(Primitive::ExternalParticipation, text),
        has_backlog_impact: detect(Primitive::BacklogImpact, text),
        ..Default::default()
    }
    .compose();

    debug!(
        retro = signals.is_retrospective_intention,
        planning = signals.is_planning_intention,
        daily = signals.is_daily_intention,
        review = signals.is_review_intention,
        "intention signals"
    );
    signals
}
