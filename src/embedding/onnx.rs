//! ONNX Runtime sentence encoder.
//!
//! Runs a sentence-transformers model (e.g. all-MiniLM-L6-v2) with
//! mean-pooled, L2-normalized outputs. The model directory must contain
//! `model.onnx` and `tokenizer.json`.

use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use ort::session::Session;
use ort::value::Tensor;
use tokenizers::{Encoding, Tokenizer};
use tracing::info;

use super::SentenceEncoder;

/// Maximum token length for MiniLM-family models.
const MAX_TOKENS: usize = 256;

/// Sentence encoder backed by ONNX Runtime.
///
/// The session is guarded by a mutex so inference can be issued through a
/// shared reference; concurrent scoring calls serialize on it.
pub struct OnnxEncoder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    dim: usize,
}

impl OnnxEncoder {
    /// Load a model from a directory containing `model.onnx` and
    /// `tokenizer.json`.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        anyhow::ensure!(model_path.exists(), "model.onnx not found in {model_dir:?}");

        let session = Session::builder()?.commit_from_file(&model_path)?;
        let dim = infer_dim(session.outputs()[0].dtype()).unwrap_or(384);
        let tokenizer = load_tokenizer(&model_dir.join("tokenizer.json"))?;

        info!(dim, model = %model_path.display(), "loaded embedding model");
        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dim,
        })
    }

    /// Embedding dimensionality (384 for all-MiniLM-L6-v2).
    pub fn dim(&self) -> usize {
        self.dim
    }
}

fn load_tokenizer(path: &Path) -> Result<Tokenizer> {
    anyhow::ensure!(path.exists(), "tokenizer.json not found at {path:?}");

    let mut tokenizer =
        Tokenizer::from_file(path).map_err(|e| anyhow::anyhow!("load tokenizer: {e}"))?;
    tokenizer
        .with_truncation(Some(tokenizers::TruncationParams {
            max_length: MAX_TOKENS,
            ..Default::default()
        }))
        .map_err(|e| anyhow::anyhow!("set truncation: {e}"))?;
    tokenizer.with_padding(Some(tokenizers::PaddingParams::default()));
    Ok(tokenizer)
}

impl SentenceEncoder for OnnxEncoder {
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("tokenize: {e}"))?;

        let batch = encodings.len();
        let seq_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        // Flatten one per-token field across the batch into a [batch, seq_len]
        // row-major buffer. Short rows stay zero-padded.
        let flatten = |field: for<'a> fn(&'a Encoding) -> &'a [u32]| -> Vec<i64> {
            let mut flat = vec![0i64; batch * seq_len];
            for (row, encoding) in encodings.iter().enumerate() {
                for (col, &v) in field(encoding).iter().enumerate() {
                    flat[row * seq_len + col] = i64::from(v);
                }
            }
            flat
        };

        let input_ids = flatten(Encoding::get_ids);
        let attention_mask = flatten(Encoding::get_attention_mask);
        let token_type_ids = flatten(Encoding::get_type_ids);

        let shape = [batch as i64, seq_len as i64];
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("embedding session poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => Tensor::from_array((shape, input_ids.into_boxed_slice()))?,
            "attention_mask" => Tensor::from_array((shape, attention_mask.clone().into_boxed_slice()))?,
            "token_type_ids" => Tensor::from_array((shape, token_type_ids.into_boxed_slice()))?,
        ])?;

        // Token embeddings come back as [batch, seq_len, dim].
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        anyhow::ensure!(
            dims == &[batch as i64, seq_len as i64, self.dim as i64][..],
            "unexpected output shape: {dims:?}, expected [{batch}, {seq_len}, {}]",
            self.dim
        );

        let row_len = seq_len * self.dim;
        let embeddings = (0..batch)
            .map(|row| {
                let tokens = &output_data[row * row_len..(row + 1) * row_len];
                let mask = &attention_mask[row * seq_len..(row + 1) * seq_len];
                mean_pool(tokens, mask, self.dim)
            })
            .collect();

        Ok(embeddings)
    }
}

/// Average the unmasked token vectors, then unit-normalize.
fn mean_pool(tokens: &[f32], mask: &[i64], dim: usize) -> Vec<f32> {
    let mut pooled = vec![0.0f32; dim];
    let mut count = 0.0f32;

    for (token, &m) in tokens.chunks_exact(dim).zip(mask) {
        if m > 0 {
            for (p, x) in pooled.iter_mut().zip(token) {
                *p += x;
            }
            count += 1.0;
        }
    }

    if count > 0.0 {
        for p in &mut pooled {
            *p /= count;
        }
    }
    normalize(&mut pooled);
    pooled
}

/// L2-normalize a vector in place.
fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Try to infer the embedding dimension from the model output type.
fn infer_dim(output_type: &ort::value::ValueType) -> Option<usize> {
    match output_type {
        ort::value::ValueType::Tensor { shape, .. } => shape
            .last()
            .and_then(|&d| if d > 0 { Some(d as usize) } else { None }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::cosine_similarity;
    use std::path::PathBuf;

    // These tests exercise the real model and are skipped when it has not
    // been downloaded:
    //   curl -L -o models/all-MiniLM-L6-v2/model.onnx \
    //     https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/onnx/model.onnx
    //   curl -L -o models/all-MiniLM-L6-v2/tokenizer.json \
    //     https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main/tokenizer.json
    fn model_dir() -> Option<PathBuf> {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("models")
            .join("all-MiniLM-L6-v2");
        dir.join("model.onnx").exists().then_some(dir)
    }

    #[test]
    fn load_model() {
        let Some(dir) = model_dir() else { return };
        let encoder = OnnxEncoder::load(&dir).unwrap();
        assert_eq!(encoder.dim(), 384);
    }

    #[test]
    fn embed_returns_unit_vectors() {
        let Some(dir) = model_dir() else { return };
        let encoder = OnnxEncoder::load(&dir).unwrap();
        let vecs = encoder
            .embed_batch(&["Hello everyone, my name is Anna"])
            .unwrap();
        assert_eq!(vecs[0].len(), 384);
        let norm: f32 = vecs[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4, "expected unit norm, got {norm}");
    }

    #[test]
    fn greetings_embed_closer_than_unrelated_text() {
        let Some(dir) = model_dir() else { return };
        let encoder = OnnxEncoder::load(&dir).unwrap();
        let vecs = encoder
            .embed_batch(&[
                "Hello everyone, I am happy to introduce myself",
                "Good morning, I am excited to be here",
                "The quarterly revenue declined by four percent",
            ])
            .unwrap();
        let sim_greetings = cosine_similarity(&vecs[0], &vecs[1]);
        let sim_unrelated = cosine_similarity(&vecs[0], &vecs[2]);
        assert!(sim_greetings > sim_unrelated);
    }

    #[test]
    fn embed_empty_batch() {
        let Some(dir) = model_dir() else { return };
        let encoder = OnnxEncoder::load(&dir).unwrap();
        assert!(encoder.embed_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn mean_pool_ignores_masked_tokens() {
        // Two tokens, second masked out: pooling sees only the first.
        let tokens = [3.0, 0.0, 100.0, 100.0];
        let pooled = mean_pool(&tokens, &[1, 0], 2);
        assert_eq!(pooled, vec![1.0, 0.0]);
    }

    #[test]
    fn mean_pool_all_masked_is_zero() {
        let pooled = mean_pool(&[1.0, 2.0], &[0], 2);
        assert_eq!(pooled, vec![0.0, 0.0]);
    }
}
