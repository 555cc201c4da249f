//! Sentence-embedding inference seam.
//!
//! The scoring engine never owns a model; it holds an injected
//! [`SentenceEncoder`] handle constructed by the process entry point. The
//! default build ships no inference backend; enable the `onnx` feature for
//! the ONNX Runtime encoder.

use anyhow::Result;

#[cfg(feature = "onnx")]
mod onnx;
#[cfg(feature = "onnx")]
pub use onnx::OnnxEncoder;

/// A sentence-embedding backend.
///
/// Implementations must be deterministic for fixed inputs and safe to call
/// from concurrent scoring calls. Returned vectors should be
/// unit-normalized; `cosine_similarity` does not assume it.
pub trait SentenceEncoder: Send + Sync {
    /// Embed each text, returning one vector per input in order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use std::collections::HashMap;

    /// Deterministic encoder for tests: maps exact texts to fixed vectors.
    /// Unknown texts embed to the zero vector (similarity 0 to everything).
    pub struct FakeEncoder {
        vectors: HashMap<String, Vec<f32>>,
        dim: usize,
    }

    impl FakeEncoder {
        pub fn new(entries: &[(&str, &[f32])]) -> Self {
            let dim = entries.first().map(|(_, v)| v.len()).unwrap_or(3);
            FakeEncoder {
                vectors: entries
                    .iter()
                    .map(|(t, v)| (t.to_string(), v.to_vec()))
                    .collect(),
                dim,
            }
        }
    }

    impl SentenceEncoder for FakeEncoder {
        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    self.vectors
                        .get(*t)
                        .cloned()
                        .unwrap_or_else(|| vec![0.0; self.dim])
                })
                .collect())
        }
    }

    /// Encoder whose inference always fails, for error-path tests.
    pub struct FailingEncoder;

    impl SentenceEncoder for FailingEncoder {
        fn embed_batch(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
            anyhow::bail!("inference runtime unavailable")
        }
    }
}
