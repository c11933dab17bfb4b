//! Configuration Tests
//!
//! `ClassifierConfig::from_env` overrides and their validation.

use crate::ceremony::{Ceremony, CeremonyClassifier};
use crate::config::{
    ClassifierConfig, ENV_FRAMEWORK_CONFIDENCE, ENV_MAX_JUSTIFICATIONS, ENV_MIN_CONFIDENCE,
    ENV_MIN_TRANSCRIPT_CHARS,
};
use crate::error::AppError;

const ALL_VARS: [&str; 4] = [
    ENV_MIN_TRANSCRIPT_CHARS,
    ENV_MIN_CONFIDENCE,
    ENV_FRAMEWORK_CONFIDENCE,
    ENV_MAX_JUSTIFICATIONS,
];

fn unset_all() -> Vec<(&'static str, Option<&'static str>)> {
    ALL_VARS.iter().map(|name| (*name, None)).collect()
}

#[cfg(test)]
mod env_config_tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        temp_env::with_vars(unset_all(), || {
            let config = ClassifierConfig::from_env().unwrap();
            assert_eq!(config, ClassifierConfig::default());
        });
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                (ENV_MIN_TRANSCRIPT_CHARS, Some("50")),
                (ENV_MIN_CONFIDENCE, Some(" 25.5 ")),
                (ENV_FRAMEWORK_CONFIDENCE, Some("90")),
                (ENV_MAX_JUSTIFICATIONS, Some("3")),
            ],
            || {
                let config = ClassifierConfig::from_env().unwrap();
                assert_eq!(config.min_transcript_chars, 50);
                assert_eq!(config.min_confidence, 25.5);
                assert_eq!(config.framework_confidence, 90);
                assert_eq!(config.max_justifications, 3);
            },
        );
    }

    #[test]
    fn test_unparsable_value_is_config_error() {
        temp_env::with_var(ENV_MIN_CONFIDENCE, Some("beaucoup"), || {
            let result = ClassifierConfig::from_env();
            assert!(
                matches!(result, Err(AppError::Config(ref msg)) if msg.contains(ENV_MIN_CONFIDENCE)),
                "Expected Config error, got {:?}",
                result
            );
        });
    }

    #[test]
    fn test_out_of_range_value_is_validation_error() {
        temp_env::with_var(ENV_MAX_JUSTIFICATIONS, Some("42"), || {
            let result = ClassifierConfig::from_env();
            assert!(matches!(result, Err(AppError::Validation(_))));
        });
    }

    #[test]
    fn test_malformed_json_config_is_json_error() {
        let result: Result<ClassifierConfig, AppError> =
            serde_json::from_str(r#"{"min_confidence": "#).map_err(AppError::from);
        assert!(matches!(result, Err(AppError::Json(_))));
    }

    #[test]
    fn test_framework_confidence_flows_into_results() {
        temp_env::with_var(ENV_FRAMEWORK_CONFIDENCE, Some("70"), || {
            let classifier = CeremonyClassifier::with_config(ClassifierConfig::from_env().unwrap());
            let result = classifier.classify("Le WIP de la colonne kanban a encore explosé cette semaine.");
            assert_eq!(result.ceremony, Ceremony::Other);
            assert_eq!(result.confidence, 70);
        });
    }

    #[test]
    fn test_max_justifications_truncates() {
        let classifier = CeremonyClassifier::with_config(ClassifierConfig {
            max_justifications: 2,
            ..Default::default()
        });
        let result = classifier.classify(
            "Alice: Hier j'ai terminé l'écran de connexion, aujourd'hui je fais les tests.\n\
             Bob: Hier j'ai fini la migration, aujourd'hui je suis bloqué par la base.",
        );
        assert_eq!(result.ceremony, Ceremony::DailyScrum);
        assert_eq!(result.justifications.len(), 2);
    }

    #[test]
    fn test_min_transcript_chars_override() {
        let classifier = CeremonyClassifier::with_config(ClassifierConfig {
            min_transcript_chars: 500,
            ..Default::default()
        });
        let result = classifier.classify("Hier j'ai terminé X, aujourd'hui je fais Y, bloqué par Z");
        assert_eq!(result.confidence, 0);
        assert_eq!(result.justifications, vec!["Texte trop court pour être analysé"]);
    }
}
