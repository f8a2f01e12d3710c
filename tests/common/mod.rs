// Shared stubs for the integration tests. None of them touch ONNX Runtime,
// so the tests run without any model file on disk.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use dupecheck::checker::DuplicateChecker;
use dupecheck::config::{Config, DEFAULT_MODEL_INPUT};
use dupecheck::features::traits::{FeatureBuilder, FeatureVector};
use dupecheck::model::traits::{Classifier, Prediction};
use dupecheck::web::{build_router, AppState};

/// Features are the two question lengths.
pub struct LengthFeatures;

#[async_trait]
impl FeatureBuilder for LengthFeatures {
    async fn build(&self, q1: &str, q2: &str) -> Result<FeatureVector> {
        FeatureVector::new(vec![q1.chars().count() as f32, q2.chars().count() as f32])
    }
}

/// Treats the first two features as unnormalised class weights.
pub struct RatioClassifier;

#[async_trait]
impl Classifier for RatioClassifier {
    async fn classify(&self, features: &FeatureVector) -> Result<Prediction> {
        Prediction::from_probabilities(None, features.values())
    }
}

pub struct FailingClassifier;

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _features: &FeatureVector) -> Result<Prediction> {
        anyhow::bail!("inference exploded")
    }
}

pub struct PanickingFeatures;

#[async_trait]
impl FeatureBuilder for PanickingFeatures {
    async fn build(&self, _q1: &str, _q2: &str) -> Result<FeatureVector> {
        panic!("tokenizer blew up")
    }
}

pub fn test_config(public_dir: PathBuf, debug: bool) -> Config {
    Config {
        model_path: public_dir.join("model.onnx"),
        model_url: None,
        model_input: DEFAULT_MODEL_INPUT.to_string(),
        features_path: public_dir.join("features.onnx"),
        features_url: None,
        public_dir,
        debug,
    }
}

pub fn loaded_checker() -> DuplicateChecker {
    DuplicateChecker::new(Some(Arc::new(LengthFeatures)), Some(Arc::new(RatioClassifier)))
}

pub fn app_with(checker: DuplicateChecker, config: Config) -> axum::Router {
    build_router(AppState::new(config, checker))
}

pub fn app(checker: DuplicateChecker) -> axum::Router {
    app_with(
        checker,
        test_config(PathBuf::from("/nonexistent/dupecheck-public"), false),
    )
}
