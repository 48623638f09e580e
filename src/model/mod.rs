//! Classifier handle shared by request handlers.
//!
//! The model artifact itself is opaque: it was trained elsewhere and is
//! loaded from disk once at startup. Everything above this module talks to
//! the [`Classifier`] trait, never to a concrete runtime.

pub mod mock;
pub mod onnx;

use std::sync::Arc;

use crate::config::Config;
use crate::error::ModelError;
use crate::record::FEATURE_COUNT;

/// Binary decision model mapping a feature vector to a label and a
/// positive-class probability.
///
/// Implementations must be safe for concurrent read-only invocation; the
/// service shares one instance across all request handlers and never
/// reloads or mutates it.
pub trait Classifier: Send + Sync {
    /// Class label for the record: 0 or 1.
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<i64, ModelError>;

    /// Probability of the positive class, in [0, 1].
    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError>;
}

/// Load the configured model artifact into a shareable classifier handle.
pub fn load_classifier(config: &Config) -> crate::error::Result<Arc<dyn Classifier>> {
    let classifier = OnnxClassifier::load(&config.model_path)?;
    Ok(Arc::new(classifier))
}

pub use mock::{MockClassifier, MockConfig};
pub use onnx::OnnxClassifier;
