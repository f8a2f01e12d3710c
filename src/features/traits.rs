// Feature builder trait: turns a question pair into the numeric vector the
// classifier was trained on.
//
// The feature pipeline itself is an exported artifact. This crate only
// loads and invokes it, so the trait is the whole contract.

use anyhow::Result;
use async_trait::async_trait;

/// A numeric feature vector for one question pair.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    /// Wrap raw feature values. An empty vector is rejected since no
    /// classifier accepts zero-width input.
    pub fn new(values: Vec<f32>) -> Result<Self> {
        if values.is_empty() {
            anyhow::bail!("Feature builder produced an empty feature vector");
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Trait for building classifier input from two questions.
#[async_trait]
pub trait FeatureBuilder: Send + Sync {
    /// Build the feature vector for a (q1, q2) pair. Both strings are
    /// already trimmed and non-empty.
    async fn build(&self, q1: &str, q2: &str) -> Result<FeatureVector>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_vector_rejected() {
        assert!(FeatureVector::new(Vec::new()).is_err());
    }

    #[test]
    fn test_vector_keeps_values() {
        let v = FeatureVector::new(vec![1.0, 0.5, 3.0]).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v.values(), &[1.0, 0.5, 3.0]);
    }
}
