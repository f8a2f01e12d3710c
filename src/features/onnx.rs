// Local ONNX feature builder.
//
// The feature pipeline (token/length/fuzzy features plus bag-of-words) is
// exported as a single ONNX graph with two string inputs, "q1" and "q2",
// each of shape [1, 1]. Its first output holds the feature row the
// classifier was trained on.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use super::traits::{FeatureBuilder, FeatureVector};
use crate::output::truncate_chars;

/// ONNX-backed feature builder. Same session handling as OnnxClassifier.
pub struct OnnxFeatureBuilder {
    session: Arc<Mutex<Session>>,
}

impl OnnxFeatureBuilder {
    /// Load the feature pipeline graph from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Feature builder file not found: {}\n\
                 Set FEATURES_URL or run `dupecheck download-model`.",
                path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load feature builder from {}", path.display()))?;

        debug!("Loaded ONNX feature builder from {}", path.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }
}

#[async_trait]
impl FeatureBuilder for OnnxFeatureBuilder {
    async fn build(&self, q1: &str, q2: &str) -> Result<FeatureVector> {
        let session = Arc::clone(&self.session);
        let q1 = q1.to_string();
        let q2 = q2.to_string();

        tokio::task::spawn_blocking(move || {
            debug!(
                q1 = %truncate_chars(&q1, 50),
                q2 = %truncate_chars(&q2, 50),
                "Building features"
            );

            let shape = [1_i64, 1];
            let q1_tensor = Tensor::from_string_array((shape, &[q1][..]))
                .context("Failed to create q1 tensor")?;
            let q2_tensor = Tensor::from_string_array((shape, &[q2][..]))
                .context("Failed to create q2 tensor")?;

            let values = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! {
                        "q1" => q1_tensor,
                        "q2" => q2_tensor
                    })
                    .context("Feature builder inference failed")?;

                let (_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract feature tensor")?;

                data.to_vec()
            };

            FeatureVector::new(values)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxFeatureBuilder::load(&dir.path().join("features.onnx"));
        assert!(result.is_err());
    }
}
