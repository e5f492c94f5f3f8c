//! Similarity scoring between embedding vectors.
//!
//! The metric is a store-wide configuration constant: every search against
//! a given [`ChunkStore`](crate::store::ChunkStore) uses the same scheme.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// The scheme used to score relatedness between two equal-length vectors.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMetric {
    /// Cosine of the angle between the vectors; 0.0 when either has zero
    /// magnitude.
    #[default]
    Cosine,
    /// Raw dot product, unbounded range, no normalization.
    Dot,
    /// `1 / (1 + euclidean distance)` — distance 0 maps to 1, growing
    /// distance approaches 0.
    Euclidean,
}

impl SimilarityMetric {
    /// Score the relatedness of two vectors under this metric.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if the vectors have
    /// different lengths.
    pub fn score(&self, a: &[f32], b: &[f32]) -> Result<f32> {
        if a.len() != b.len() {
            return Err(RagError::DimensionMismatch {
                context: "similarity score".to_string(),
                expected: a.len(),
                actual: b.len(),
            });
        }
        Ok(match self {
            SimilarityMetric::Cosine => cosine_similarity(a, b),
            SimilarityMetric::Dot => dot_product(a, b),
            SimilarityMetric::Euclidean => euclidean_similarity(a, b),
        })
    }
}

fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot = dot_product(a, b);
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn euclidean_similarity(a: &[f32], b: &[f32]) -> f32 {
    let distance: f32 =
        a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum::<f32>().sqrt();
    1.0 / (1.0 + distance)
}
