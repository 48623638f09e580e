//! Mock classifier for unit testing.
//!
//! Deterministic in-process stand-in so that handler and client tests never
//! need a model artifact on disk.

use crate::error::ModelError;
use crate::record::FEATURE_COUNT;

use super::Classifier;

/// Configuration for mock classifier behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Return this (label, probability) pair instead of scoring.
    pub fixed: Option<(i64, f64)>,
    /// Whether to fail every invocation.
    pub fail: bool,
}

/// Mock classifier for testing.
///
/// Without a fixed outcome it scores records with a simple weighted rule on
/// glucose, BMI and age, which is deterministic and stays in [0, 1].
#[derive(Debug, Clone, Default)]
pub struct MockClassifier {
    /// Mock configuration.
    config: MockConfig,
}

impl MockClassifier {
    /// Create a mock with the default scoring rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self { config }
    }

    /// Create a mock that always returns the given label and probability.
    pub fn fixed(label: i64, probability: f64) -> Self {
        Self::with_config(MockConfig {
            fixed: Some((label, probability)),
            fail: false,
        })
    }

    /// Create a mock whose every invocation fails.
    pub fn failing() -> Self {
        Self::with_config(MockConfig {
            fixed: None,
            fail: true,
        })
    }

    fn score(features: &[f64; FEATURE_COUNT]) -> f64 {
        let glucose = features[1];
        let bmi = features[5];
        let age = features[7];

        (glucose / 200.0 * 0.5 + bmi / 60.0 * 0.3 + age / 100.0 * 0.2).clamp(0.0, 1.0)
    }

    fn outcome(&self, features: &[f64; FEATURE_COUNT]) -> Result<(i64, f64), ModelError> {
        if self.config.fail {
            return Err(ModelError::InferenceFailed(
                "mock classifier configured to fail".to_string(),
            ));
        }

        if let Some((label, probability)) = self.config.fixed {
            return Ok((label, probability));
        }

        let probability = Self::score(features);
        let label = i64::from(probability >= 0.5);
        Ok((label, probability))
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<i64, ModelError> {
        self.outcome(features).map(|(label, _)| label)
    }

    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        self.outcome(features).map(|(_, probability)| probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PatientRecord;

    #[test]
    fn default_score_stays_in_unit_interval() {
        let extremes = [
            [0.0; FEATURE_COUNT],
            [1000.0; FEATURE_COUNT],
            PatientRecord::sample().to_features(),
        ];

        let mock = MockClassifier::new();
        for features in extremes {
            let p = mock.predict_proba(&features).unwrap();
            assert!((0.0..=1.0).contains(&p), "probability {p} out of range");

            let label = mock.predict(&features).unwrap();
            assert!(label == 0 || label == 1);
        }
    }

    #[test]
    fn scoring_is_deterministic() {
        let mock = MockClassifier::new();
        let features = PatientRecord::sample().to_features();

        let first = (mock.predict(&features).unwrap(), mock.predict_proba(&features).unwrap());
        let second = (mock.predict(&features).unwrap(), mock.predict_proba(&features).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn fixed_outcome_overrides_scoring() {
        let mock = MockClassifier::fixed(1, 0.93);
        let features = [0.0; FEATURE_COUNT];

        assert_eq!(mock.predict(&features).unwrap(), 1);
        assert_eq!(mock.predict_proba(&features).unwrap(), 0.93);
    }

    #[test]
    fn failing_mock_fails_both_calls() {
        let mock = MockClassifier::failing();
        let features = [0.0; FEATURE_COUNT];

        assert!(mock.predict(&features).is_err());
        assert!(mock.predict_proba(&features).is_err());
    }
}
