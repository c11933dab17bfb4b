//! Pattern Registry.
//!
//! Declarative vocabulary and rule tables shared by every analysis layer:
//! semantic word fields, per-ceremony marker rules, ceremony verb lists and
//! the Kanban / SAFe framework detectors.
//!
//! Everything is compiled once on first access and never mutated afterwards.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

use super::result::Ceremony;

/// Semantic field identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Retrospective evaluation language (went well, lessons, improvement)
    RetroEvaluation,
    /// Planning selection language (backlog, estimation, capacity)
    PlanningSelection,
    /// Facilitation and closing language (round table, votes, summaries)
    Facilitation,
}

/// Whether a marker rule rewards or flags its match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Inclusion,
    /// Antagonistic vocabulary. Rule names carry a `no_` prefix.
    Exclusion,
}

/// A vocabulary term with its word-boundary anchored matcher
#[derive(Debug, Clone)]
pub struct Term {
    pub word: &'static str,
    pattern: Regex,
}

impl Term {
    fn new(word: &'static str) -> Self {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(word)))
            .expect("Invalid regex: semantic term");
        Self { word, pattern }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// A semantic field made of named sub-fields
#[derive(Debug, Clone)]
pub struct SemanticField {
    pub field: Field,
    pub subfields: Vec<(&'static str, Vec<Term>)>,
}

impl SemanticField {
    /// All terms of every sub-field, deduplicated by word
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        let mut seen = HashSet::new();
        self.subfields
            .iter()
            .flat_map(|(_, terms)| terms.iter())
            .filter(move |term| seen.insert(term.word))
    }
}

/// A single marker rule
#[derive(Debug, Clone)]
pub struct MarkerRule {
    pub name: &'static str,
    pub kind: RuleKind,
    /// Shown to the user when an inclusion rule fires
    pub justification: &'static str,
    pattern: Regex,
}

impl MarkerRule {
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Early-exit vocabulary for non-Scrum frameworks
#[derive(Debug, Clone)]
pub struct FrameworkPatterns {
    pub kanban: Regex,
    pub scrum_core: Regex,
    pub safe_explicit: Regex,
    pub safe_program: Regex,
    pub safe_scale: Regex,
}

/// Read-only registry of every pattern table
#[derive(Debug)]
pub struct PatternRegistry {
    fields: Vec<SemanticField>,
    markers: Vec<(Ceremony, Vec<MarkerRule>)>,
    verbs: Vec<(Ceremony, Vec<Regex>)>,
    frameworks: FrameworkPatterns,
}

/// Comparable description of the registry contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    pub fields: Vec<(String, Vec<String>)>,
    pub markers: Vec<(String, String, String)>,
    pub verbs: Vec<(String, Vec<String>)>,
    pub frameworks: Vec<String>,
}

// --- Vocabulary tables ---

type SubField = (&'static str, &'static [&'static str]);

const RETRO_EVALUATION: &[SubField] = &[
    (
        "evaluation",
        &[
            "bien fonctionné",
            "mal fonctionné",
            "bien marché",
            "a marché",
            "n'a pas marché",
            "went well",
            "went wrong",
            "réussite",
            "échec",
            "points positifs",
            "points négatifs",
            "frustration",
            "satisfaction",
        ],
    ),
    (
        "reflection",
        &[
            "rétrospective",
            "retrospective",
            "rétro",
            "retro",
            "recul",
            "bilan",
            "ressenti",
            "leçon",
            "leçons",
            "apprentissage",
            "lessons learned",
        ],
    ),
    (
        "improvement",
        &[
            "amélioration",
            "améliorations",
            "améliorer",
            "expérimenter",
            "keep doing",
            "stop doing",
            "start doing",
            "axe de progrès",
        ],
    ),
];

const PLANNING_SELECTION: &[SubField] = &[
    (
        "selection",
        &[
            "backlog",
            "priorité",
            "prioriser",
            "priorisé",
            "priorisation",
            "sélectionner",
            "user story",
            "user stories",
            "objectif du sprint",
            "sprint goal",
        ],
    ),
    (
        "estimation",
        &[
            "estimation",
            "estimer",
            "story point",
            "story points",
            "points",
            "complexité",
            "planning poker",
        ],
    ),
    (
        "commitment",
        &[
            "capacité",
            "capacity",
            "vélocité",
            "velocity",
            "engagement",
            "prochain sprint",
            "next sprint",
        ],
    ),
];

const FACILITATION: &[SubField] = &[
    (
        "animation",
        &[
            "facilitateur",
            "facilitatrice",
            "tour de table",
            "post-it",
            "dot voting",
            "vote",
            "timebox",
        ],
    ),
    (
        "closing",
        &[
            "pour résumer",
            "en résumé",
            "pour conclure",
            "plan d'action",
            "prochaines étapes",
        ],
    ),
];

// --- Marker tables ---

struct MarkerDef {
    name: &'static str,
    kind: RuleKind,
    pattern: &'static str,
    justification: &'static str,
}

const RETRO_VOCABULARY: &str = r"(?i)\b(rétrospective|retrospective|rétro|retro)\b";
const ESTIMATION_VOCABULARY: &str = r"(?i)\b(estimation|estimer|story points?|planning poker)\b";

const DAILY_MARKERS: &[MarkerDef] = &[
    MarkerDef {
        name: "hier_aujourdhui",
        kind: RuleKind::Inclusion,
        pattern: r"(?is)\b(hier|yesterday)\b.*\b(aujourd'hui|today)\b",
        justification: "Tour hier / aujourd'hui",
    },
    MarkerDef {
        name: "blocages",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(bloqué|bloquée|bloqués|bloquant|blocage|blocages|blocker|blockers|blocked)\b",
        justification: "Blocages remontés",
    },
    MarkerDef {
        name: "standup",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(daily|stand-?up|point quotidien|mêlée quotidienne)\b",
        justification: "Format stand-up explicite",
    },
    MarkerDef {
        name: "no_retro",
        kind: RuleKind::Exclusion,
        pattern: RETRO_VOCABULARY,
        justification: "Vocabulaire de rétrospective",
    },
];

const PLANNING_MARKERS: &[MarkerDef] = &[
    MarkerDef {
        name: "backlog",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\bbacklog\b",
        justification: "Revue du backlog produit",
    },
    MarkerDef {
        name: "estimation",
        kind: RuleKind::Inclusion,
        pattern: ESTIMATION_VOCABULARY,
        justification: "Estimation des éléments",
    },
    MarkerDef {
        name: "objectif_sprint",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(objectif du sprint|sprint goal)\b",
        justification: "Objectif de sprint défini",
    },
    MarkerDef {
        name: "capacite",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(capacité|capacity|vélocité|velocity)\b",
        justification: "Capacité ou vélocité de l'équipe",
    },
    MarkerDef {
        name: "no_retro",
        kind: RuleKind::Exclusion,
        pattern: RETRO_VOCABULARY,
        justification: "Vocabulaire de rétrospective",
    },
];

const REVIEW_MARKERS: &[MarkerDef] = &[
    MarkerDef {
        name: "demo",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(démo|demo|démonstration)\b",
        justification: "Démonstration de l'incrément",
    },
    MarkerDef {
        name: "parties_prenantes",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(parties prenantes|stakeholders?|clients?|sponsors?)\b",
        justification: "Présence des parties prenantes",
    },
    MarkerDef {
        name: "increment",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(incrément|increment|livrable|livré|livrée)\b",
        justification: "Incrément produit présenté",
    },
    MarkerDef {
        name: "feedback",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(feedback|retours? (des utilisateurs|du client|des clients|produit))\b",
        justification: "Feedback sur le produit",
    },
    MarkerDef {
        name: "no_estimation",
        kind: RuleKind::Exclusion,
        pattern: ESTIMATION_VOCABULARY,
        justification: "Vocabulaire d'estimation",
    },
];

const RETRO_MARKERS: &[MarkerDef] = &[
    MarkerDef {
        name: "bien_mal_fonctionne",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(bien|mal) (fonctionné|marché|passé)\b|\bwent (well|wrong)\b",
        justification: "Évaluation de ce qui a bien ou mal fonctionné",
    },
    MarkerDef {
        name: "amelioration",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(amélior\w*|axes? de progrès|improve\w*)",
        justification: "Recherche d'amélioration continue",
    },
    MarkerDef {
        name: "retro_explicite",
        kind: RuleKind::Inclusion,
        pattern: RETRO_VOCABULARY,
        justification: "Rétrospective mentionnée explicitement",
    },
    MarkerDef {
        name: "plan_action",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(plan d'action|actions? d'amélioration|action items?)\b",
        justification: "Plan d'action défini",
    },
    MarkerDef {
        name: "ressenti",
        kind: RuleKind::Inclusion,
        pattern: r"(?i)\b(ressenti|humeur|météo de l'équipe|mood)\b",
        justification: "Partage du ressenti de l'équipe",
    },
    MarkerDef {
        name: "no_estimation",
        kind: RuleKind::Exclusion,
        pattern: ESTIMATION_VOCABULARY,
        justification: "Vocabulaire d'estimation",
    },
    MarkerDef {
        name: "no_backlog",
        kind: RuleKind::Exclusion,
        pattern: r"(?i)\bbacklog\b",
        justification: "Vocabulaire de backlog",
    },
    MarkerDef {
        name: "no_velocity",
        kind: RuleKind::Exclusion,
        pattern: r"(?i)\b(vélocité|velocity|capacité|capacity)\b",
        justification: "Vocabulaire de capacité",
    },
    MarkerDef {
        name: "no_demo",
        kind: RuleKind::Exclusion,
        pattern: r"(?i)\b(démo|demo|démonstration)\b",
        justification: "Vocabulaire de démonstration",
    },
];

// --- Verb tables ---

const RETRO_VERBS: &[&str] = &[
    r"(?i)\b(améliorer|améliorons)\b",
    r"(?i)\b(apprendre|appris)\b",
    r"(?i)\b(retenir|retient|retenons)\b",
    r"(?i)\b(réfléchir|réfléchissons)\b",
    r"(?i)\b(expérimenter|essayer)\b",
    r"(?i)\b(changer|changeons)\b",
    r"(?i)\b(célébrer|remercier)\b",
    r"(?i)\b(partager|partageons)\b",
];

const PLANNING_VERBS: &[&str] = &[
    r"(?i)\b(planifier|planifions)\b",
    r"(?i)\b(prioriser|priorisons|priorisé|priorisée)\b",
    r"(?i)\b(estimer|estimons|estime)\b",
    r"(?i)\b(sélectionner|sélectionnons)\b",
    r"(?i)\b(découper|découpons)\b",
    r"(?i)\b(embarquer|embarquons|embarque)\b",
    r"(?i)\bs'engage\w*",
];

const REVIEW_VERBS: &[&str] = &[
    r"(?i)\b(présenter|présente|présentons)\b",
    r"(?i)\b(montrer|montre|montrons)\b",
    r"(?i)\b(démontrer|démontre)\b",
    r"(?i)\b(valider|valide|validons|validé)\b",
    r"(?i)\b(livrer|livrons)\b",
    r"(?i)\b(tester|testé|testez)\b",
];

// --- Framework detectors ---

const KANBAN_VOCABULARY: &str =
    r"(?i)\b(wip|work[- ]in[- ]progress|kanban|lead time|cycle time|flux|flow)\b";
const SCRUM_CORE_VOCABULARY: &str = r"(?i)\b(sprints?|planning|story points?|vélocité|velocity)\b";
// ART and SAFe stay case-sensitive: "art" and "safe" are ordinary words.
const SAFE_EXPLICIT_VOCABULARY: &str =
    r"\b(PI[- ]?[Pp]lanning|ART|SAFe)\b|(?i:\b(agile release train|program increment)\b)";
const SAFE_PROGRAM_VOCABULARY: &str = r"(?i)\b(programme|program|trains?|portfolio|portefeuille|multi-équipes?|multi-teams?|inter-équipes)\b";
const SAFE_SCALE_VOCABULARY: &str = r"(?i)\b(grande échelle|large scale|à l'échelle|at scale|scaled|plusieurs équipes|multiple teams)\b";

// NOTE: expect() is acceptable here per STANDARDS.md: the tables are static and a bad
// pattern is unrecoverable.
static REGISTRY: LazyLock<PatternRegistry> = LazyLock::new(PatternRegistry::build);

/// Global read-only registry
pub fn registry() -> &'static PatternRegistry {
    &REGISTRY
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid regex: registry pattern")
}

fn build_field(field: Field, table: &[SubField]) -> SemanticField {
    SemanticField {
        field,
        subfields: table
            .iter()
            .map(|(name, words)| (*name, words.iter().map(|w| Term::new(w)).collect()))
            .collect(),
    }
}

fn build_markers(table: &[MarkerDef]) -> Vec<MarkerRule> {
    table
        .iter()
        .map(|def| MarkerRule {
            name: def.name,
            kind: def.kind,
            justification: def.justification,
            pattern: compile(def.pattern),
        })
        .collect()
}

fn build_verbs(table: &[&str]) -> Vec<Regex> {
    table.iter().map(|p| compile(p)).collect()
}

impl PatternRegistry {
    fn build() -> Self {
        Self {
            fields: vec![
                build_field(Field::RetroEvaluation, RETRO_EVALUATION),
                build_field(Field::PlanningSelection, PLANNING_SELECTION),
                build_field(Field::Facilitation, FACILITATION),
            ],
            markers: vec![
                (Ceremony::DailyScrum, build_markers(DAILY_MARKERS)),
                (Ceremony::SprintPlanning, build_markers(PLANNING_MARKERS)),
                (Ceremony::SprintReview, build_markers(REVIEW_MARKERS)),
                (Ceremony::Retrospective, build_markers(RETRO_MARKERS)),
            ],
            verbs: vec![
                (Ceremony::SprintPlanning, build_verbs(PLANNING_VERBS)),
                (Ceremony::SprintReview, build_verbs(REVIEW_VERBS)),
                (Ceremony::Retrospective, build_verbs(RETRO_VERBS)),
            ],
            frameworks: FrameworkPatterns {
                kanban: compile(KANBAN_VOCABULARY),
                scrum_core: compile(SCRUM_CORE_VOCABULARY),
                safe_explicit: compile(SAFE_EXPLICIT_VOCABULARY),
                safe_program: compile(SAFE_PROGRAM_VOCABULARY),
                safe_scale: compile(SAFE_SCALE_VOCABULARY),
            },
        }
    }

    /// Semantic field by identifier
    pub fn field(&self, field: Field) -> Option<&SemanticField> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Marker rules for a ceremony (empty for `Other`)
    pub fn markers(&self, ceremony: Ceremony) -> &[MarkerRule] {
        self.markers
            .iter()
            .find(|(c, _)| *c == ceremony)
            .map(|(_, rules)| rules.as_slice())
            .unwrap_or(&[])
    }

    /// Total number of verb occurrences for a ceremony's verb list
    pub fn verb_matches(&self, ceremony: Ceremony, text: &str) -> usize {
        self.verbs
            .iter()
            .find(|(c, _)| *c == ceremony)
            .map(|(_, verbs)| verbs.iter().map(|v| v.find_iter(text).count()).sum())
            .unwrap_or(0)
    }

    pub fn frameworks(&self) -> &FrameworkPatterns {
        &self.frameworks
    }

    /// Structural description used to check the registry never changes
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            fields: self
                .fields
                .iter()
                .map(|f| {
                    (
                        format!("{:?}", f.field),
                        f.terms().map(|t| t.word.to_string()).collect(),
                    )
                })
                .collect(),
            markers: self
                .markers
                .iter()
                .flat_map(|(ceremony, rules)| {
                    rules.iter().map(move |r| {
                        (
                            ceremony.label().to_string(),
                            r.name.to_string(),
                            r.pattern.as_str().to_string(),
                        )
                    })
                })
                .collect(),
            verbs: self
                .verbs
                .iter()
                .map(|(ceremony, verbs)| {
                    (
                        ceremony.label().to_string(),
                        verbs.iter().map(|v| v.as_str().to_string()).collect(),
                    )
                })
                .collect(),
            frameworks: [
                &self.frameworks.kanban,
                &self.frameworks.scrum_core,
                &self.frameworks.safe_explicit,
                &self.frameworks.safe_program,
                &self.frameworks.safe_scale,
            ]
            .iter()
            .map(|r| r.as_str().to_string())
            .collect(),
        }
    }
}
