//! ONNX-backed classifier.
//!
//! Loads the pre-trained artifact once and runs it through tract. The export
//! is expected to carry two outputs: the label tensor (int64, shape `[1]`)
//! and the per-class probability tensor (float32, shape `[1, 2]`), i.e. a
//! scikit-learn classifier converted with plain-tensor probabilities.

use tract_onnx::prelude::*;
use tracing::{debug, info};

use crate::error::ModelError;
use crate::record::FEATURE_COUNT;

use super::Classifier;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Classifier backed by an ONNX model file.
#[derive(Debug)]
pub struct OnnxClassifier {
    /// Optimized, runnable inference plan.
    plan: OnnxPlan,
    /// Path the model was loaded from.
    path: String,
}

impl OnnxClassifier {
    /// Load and optimize the model artifact.
    ///
    /// The input fact is pinned to a single row of [`FEATURE_COUNT`]
    /// float32 values so that batch-dynamic exports optimize cleanly.
    pub fn load(path: &str) -> Result<Self, ModelError> {
        info!("Loading classifier from {}", path);

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact([1, FEATURE_COUNT]).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| ModelError::LoadFailed {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Classifier loaded and optimized");

        Ok(Self {
            plan,
            path: path.to_string(),
        })
    }

    /// Path the model was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Run the plan once and decode both outputs.
    fn run(&self, features: &[f64; FEATURE_COUNT]) -> Result<(i64, f64), ModelError> {
        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input = tract_ndarray::Array2::from_shape_vec((1, FEATURE_COUNT), row)
            .map_err(|e| ModelError::InferenceFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(Tensor::from(input).into()))
            .map_err(|e| ModelError::InferenceFailed(e.to_string()))?;

        if outputs.len() < 2 {
            return Err(ModelError::UnexpectedOutput(format!(
                "expected label and probability outputs, got {}",
                outputs.len()
            )));
        }

        let label = outputs[0]
            .to_array_view::<i64>()
            .map_err(|e| ModelError::UnexpectedOutput(format!("label tensor: {e}")))?
            .iter()
            .next()
            .copied()
            .ok_or_else(|| ModelError::UnexpectedOutput("empty label tensor".to_string()))?;

        let probabilities = outputs[1]
            .to_array_view::<f32>()
            .map_err(|e| ModelError::UnexpectedOutput(format!("probability tensor: {e}")))?;

        // Row-major [1, 2]: index 1 is the positive class.
        let positive = probabilities
            .iter()
            .nth(1)
            .copied()
            .ok_or_else(|| {
                ModelError::UnexpectedOutput("probability tensor has fewer than 2 classes".to_string())
            })?;

        Ok((label, f64::from(positive)))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<i64, ModelError> {
        self.run(features).map(|(label, _)| label)
    }

    fn predict_proba(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ModelError> {
        self.run(features).map(|(_, probability)| probability)
    }
}
