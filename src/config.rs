use std::env;
use std::path::PathBuf;

use anyhow::Result;

/// Default tensor name skl2onnx gives a classifier's float input.
pub const DEFAULT_MODEL_INPUT: &str = "float_input";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy, so every
/// field here can also be set there.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the classifier artifact (DUPECHECK_MODEL_PATH)
    pub model_path: PathBuf,
    /// Remote source for the classifier when it's missing locally (MODEL_URL)
    pub model_url: Option<String>,
    /// Name of the classifier's float input tensor (DUPECHECK_MODEL_INPUT)
    pub model_input: String,
    /// Path of the feature builder artifact (DUPECHECK_FEATURES_PATH)
    pub features_path: PathBuf,
    /// Remote source for the feature builder (FEATURES_URL)
    pub features_url: Option<String>,
    /// Directory holding the landing page's index.html (DUPECHECK_PUBLIC_DIR)
    pub public_dir: PathBuf,
    /// Enables the /api/test diagnostics route (DEBUG=True)
    pub debug: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Nothing is required: every field has a default, and a missing artifact
    /// only surfaces later as an unloaded component.
    pub fn load() -> Result<Self> {
        let model_path = env::var("DUPECHECK_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::model::download::default_model_path());

        let features_path = env::var("DUPECHECK_FEATURES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::model::download::default_features_path());

        Ok(Self {
            model_path,
            model_url: non_empty_var("MODEL_URL"),
            model_input: non_empty_var("DUPECHECK_MODEL_INPUT")
                .unwrap_or_else(|| DEFAULT_MODEL_INPUT.to_string()),
            features_path,
            features_url: non_empty_var("FEATURES_URL"),
            public_dir: env::var("DUPECHECK_PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public")),
            debug: parse_debug(env::var("DEBUG").ok().as_deref()),
        })
    }
}

/// Only the exact string "True" turns debug on, same as the Flask config
/// this service replaces.
fn parse_debug(value: Option<&str>) -> bool {
    value == Some("True")
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
