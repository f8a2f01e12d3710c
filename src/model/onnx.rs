// Local ONNX duplicate classifier.
//
// The pretrained model is exported from scikit-learn with zipmap disabled,
// which gives two outputs:
//   label          int64 [1]     predicted class (0 = not duplicate, 1 = duplicate)
//   probabilities  float [1, 2]  class probabilities in the same order
//
// The float input name depends on how the model was exported, so it comes
// from configuration (DUPECHECK_MODEL_INPUT, default "float_input").

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::{DynValue, Tensor};
use tracing::debug;

use super::traits::{Classifier, Prediction};
use crate::features::traits::FeatureVector;

const LABEL_OUTPUT: &str = "label";
const PROBABILITIES_OUTPUT: &str = "probabilities";

/// ONNX-backed classifier. The session sits behind Arc<Mutex> because
/// `Session::run` takes `&mut self` and inference runs on spawn_blocking,
/// which needs a 'static handle.
pub struct OnnxClassifier {
    session: Arc<Mutex<Session>>,
    input_name: Arc<str>,
}

impl OnnxClassifier {
    /// Load the classifier graph from `model_path`.
    pub fn load(model_path: &Path, input_name: &str) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nSet MODEL_URL or run `dupecheck download-model`.",
                model_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        debug!(input = input_name, "Loaded ONNX classifier from {}", model_path.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name: Arc::from(input_name),
        })
    }
}

#[async_trait]
impl Classifier for OnnxClassifier {
    async fn classify(&self, features: &FeatureVector) -> Result<Prediction> {
        let session = Arc::clone(&self.session);
        let input_name = Arc::clone(&self.input_name);
        let values = features.values().to_vec();

        tokio::task::spawn_blocking(move || {
            let shape = [1_i64, values.len() as i64];
            let input = Tensor::from_array((shape, values))
                .context("Failed to create classifier input tensor")?;

            let mut session = session
                .lock()
                .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

            let outputs = session
                .run(ort::inputs! { &*input_name => input })
                .context("Classifier inference failed")?;

            let label = extract_label(outputs.get(LABEL_OUTPUT));

            let probabilities = outputs
                .get(PROBABILITIES_OUTPUT)
                .with_context(|| format!("Model has no '{PROBABILITIES_OUTPUT}' output"))?;
            let (_shape, row) = probabilities
                .try_extract_tensor::<f32>()
                .context("Failed to extract probability tensor")?;

            let prediction = Prediction::from_probabilities(label, row)?;

            debug!(
                is_duplicate = prediction.is_duplicate,
                probability_duplicate = prediction.probability_duplicate,
                "ONNX classified pair"
            );

            Ok(prediction)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// The label output is optional; models exported with string class labels
/// won't yield an int64 tensor and fall back to the probability threshold.
fn extract_label(value: Option<&DynValue>) -> Option<bool> {
    let (_shape, labels) = value?.try_extract_tensor::<i64>().ok()?;
    labels.first().map(|&label| label_to_flag(label))
}

fn label_to_flag(label: i64) -> bool {
    label == 1
}
