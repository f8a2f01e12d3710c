// Classifier trait: the seam between the HTTP layer and the pretrained model.
//
// The default implementation runs an exported ONNX graph. Tests plug in
// stubs so the web layer can be exercised without any model file.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

use crate::features::traits::FeatureVector;

/// Tolerance for the probability-sum invariant.
pub const PROBABILITY_EPSILON: f64 = 1e-6;

/// Output of a binary duplicate classifier.
///
/// Probabilities are always in [0, 1] and sum to 1. Build one with
/// `from_probabilities` to get that guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub is_duplicate: bool,
    pub probability_not_duplicate: f64,
    pub probability_duplicate: f64,
}

impl Prediction {
    /// Build a prediction from a raw probability row.
    ///
    /// The row is ordered (not-duplicate, duplicate, ...); only the first two
    /// columns are used. Values are renormalised so float noise from the model
    /// can't break the sum invariant. When `label` is `None` the flag is
    /// derived from the duplicate probability.
    pub fn from_probabilities(label: Option<bool>, row: &[f32]) -> Result<Self> {
        if row.len() < 2 {
            anyhow::bail!(
                "Classifier returned {} probability column(s), expected 2",
                row.len()
            );
        }

        let not_dup = f64::from(row[0]);
        let dup = f64::from(row[1]);

        if !not_dup.is_finite() || !dup.is_finite() {
            anyhow::bail!("Classifier returned non-finite probabilities");
        }
        if not_dup < 0.0 || dup < 0.0 {
            anyhow::bail!("Classifier returned negative probabilities");
        }

        let total = not_dup + dup;
        if total <= 0.0 {
            anyhow::bail!("Classifier returned all-zero probabilities");
        }

        let probability_duplicate = (dup / total).clamp(0.0, 1.0);
        let probability_not_duplicate = 1.0 - probability_duplicate;

        Ok(Self {
            is_duplicate: label.unwrap_or(probability_duplicate >= 0.5),
            probability_not_duplicate,
            probability_duplicate,
        })
    }
}

/// Trait for a pretrained duplicate classifier. Async because inference is
/// CPU-bound and implementations offload it to a blocking thread.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a single feature vector.
    async fn classify(&self, features: &FeatureVector) -> Result<Prediction>;
}
