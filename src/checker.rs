// Duplicate checker: validates a question pair and runs it through the
// feature builder and classifier.
//
// Both components are optional: a failed load at startup leaves the slot
// empty, the server keeps running, and checks fail with ServiceUnavailable
// until an operator fixes the artifact and restarts.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::config::Config;
use crate::error::CheckError;
use crate::features::onnx::OnnxFeatureBuilder;
use crate::features::traits::FeatureBuilder;
use crate::model::download::{ensure_artifact, ArtifactSource};
use crate::model::onnx::OnnxClassifier;
use crate::model::traits::{Classifier, Prediction};

pub const NO_JSON: &str = "No JSON data provided";
pub const NOT_AN_OBJECT: &str = "Request body must be a JSON object";
pub const NOT_STRINGS: &str = "q1 and q2 must be strings";
pub const BOTH_REQUIRED: &str = "Both q1 and q2 are required";
pub const MODEL_NOT_LOADED: &str = "Model not loaded";
pub const HELPER_NOT_LOADED: &str = "Feature builder not loaded";

/// Two questions, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPair {
    q1: String,
    q2: String,
}

impl QuestionPair {
    pub fn new(q1: &str, q2: &str) -> Result<Self, CheckError> {
        let q1 = q1.trim();
        let q2 = q2.trim();
        if q1.is_empty() || q2.is_empty() {
            return Err(CheckError::invalid(BOTH_REQUIRED));
        }
        Ok(Self {
            q1: q1.to_string(),
            q2: q2.to_string(),
        })
    }

    /// Parse a raw request body.
    ///
    /// Unparseable bodies and "empty" JSON values (null, {}, [], "", 0, false)
    /// are all reported as missing data. A JSON null field counts as absent.
    pub fn from_json(body: &[u8]) -> Result<Self, CheckError> {
        let data: Value =
            serde_json::from_slice(body).map_err(|_| CheckError::invalid(NO_JSON))?;

        if is_empty_value(&data) {
            return Err(CheckError::invalid(NO_JSON));
        }

        let Value::Object(fields) = data else {
            return Err(CheckError::invalid(NOT_AN_OBJECT));
        };

        let q1 = string_field(fields.get("q1"))?;
        let q2 = string_field(fields.get("q2"))?;
        Self::new(q1, q2)
    }

    pub fn q1(&self) -> &str {
        &self.q1
    }

    pub fn q2(&self) -> &str {
        &self.q2
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn string_field(value: Option<&Value>) -> Result<&str, CheckError> {
    match value {
        None | Some(Value::Null) => Ok(""),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(CheckError::invalid(NOT_STRINGS)),
    }
}

/// Response body of a successful check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub q1: String,
    pub q2: String,
    #[serde(flatten)]
    pub prediction: Prediction,
}

/// Shared, read-only view of the loaded feature builder and classifier.
pub struct DuplicateChecker {
    features: Option<Arc<dyn FeatureBuilder>>,
    classifier: Option<Arc<dyn Classifier>>,
}

impl DuplicateChecker {
    pub fn new(
        features: Option<Arc<dyn FeatureBuilder>>,
        classifier: Option<Arc<dyn Classifier>>,
    ) -> Self {
        Self {
            features,
            classifier,
        }
    }

    /// Load both artifacts described by `config`, fetching missing ones from
    /// their URLs. Failures are logged and leave the component unloaded.
    pub async fn load(config: &Config) -> Self {
        let features = match load_features(config).await {
            Ok(builder) => Some(builder),
            Err(e) => {
                error!(error = ?e, "Error loading feature builder");
                None
            }
        };

        let classifier = match load_classifier(config).await {
            Ok(classifier) => Some(classifier),
            Err(e) => {
                error!(error = ?e, "Error loading model");
                None
            }
        };

        Self::new(features, classifier)
    }

    pub fn model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    pub fn helper_loaded(&self) -> bool {
        self.features.is_some()
    }

    /// Classify a validated pair.
    pub async fn check(&self, pair: QuestionPair) -> Result<CheckResult, CheckError> {
        let classifier = self
            .classifier
            .as_ref()
            .ok_or_else(|| CheckError::unavailable(MODEL_NOT_LOADED))?;
        let features = self
            .features
            .as_ref()
            .ok_or_else(|| CheckError::unavailable(HELPER_NOT_LOADED))?;

        let vector = features.build(pair.q1(), pair.q2()).await?;
        let prediction = classifier.classify(&vector).await?;

        Ok(CheckResult {
            q1: pair.q1,
            q2: pair.q2,
            prediction,
        })
    }
}

async fn load_features(config: &Config) -> Result<Arc<dyn FeatureBuilder>> {
    let source = ensure_artifact(
        &config.features_path,
        config.features_url.as_deref(),
        false,
    )
    .await?;
    let builder = OnnxFeatureBuilder::load(&config.features_path)?;
    log_loaded("feature builder", &config.features_path, source);
    Ok(Arc::new(builder))
}

async fn load_classifier(config: &Config) -> Result<Arc<dyn Classifier>> {
    let source = ensure_artifact(&config.model_path, config.model_url.as_deref(), false).await?;
    let classifier = OnnxClassifier::load(&config.model_path, &config.model_input)?;
    log_loaded("model", &config.model_path, source);
    Ok(Arc::new(classifier))
}

fn log_loaded(what: &str, path: &std::path::Path, source: ArtifactSource) {
    let downloaded = source == ArtifactSource::Downloaded;
    info!(path = %path.display(), downloaded, "Loaded {what}");
}
