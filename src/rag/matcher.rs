//! Nearest-neighbour match over a tenant's knowledge rows

use serde_json::Value;
use tracing::debug;

use crate::knowledge::KnowledgeEntry;

/// Score reported when nothing could be compared; below any real threshold
pub const NO_MATCH_SCORE: f64 = -1.0;

/// Best knowledge row for a query
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub content: String,
    pub score: f64,
}

impl MatchResult {
    pub fn none() -> Self {
        Self {
            content: String::new(),
            score: NO_MATCH_SCORE,
        }
    }
}

/// Cosine similarity of two vectors.
///
/// Returns `None` for length mismatch, empty input, zero-norm vectors or a
/// non-finite result.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.is_empty() || a.len() != b.len() {
        return None;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        return None;
    }

    let score = dot / denom;
    score.is_finite().then_some(score)
}

/// Decode a stored embedding.
///
/// Accepts a JSON number array or a string holding one (`"[0.1, 0.2]"`, the
/// text form pgvector columns come back in).
pub fn parse_embedding(value: &Value) -> Option<Vec<f32>> {
    let values: Vec<f64> = match value {
        Value::Array(items) => items.iter().map(Value::as_f64).collect::<Option<_>>()?,
        Value::String(text) => serde_json::from_str(text.trim()).ok()?,
        _ => return None,
    };

    if values.is_empty() || values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    #[allow(clippy::cast_possible_truncation)]
    let embedding = values.into_iter().map(|v| v as f32).collect();
    Some(embedding)
}

/// Linear scan for the row most similar to `query`.
///
/// Ties keep the earlier row. Rows whose embedding cannot be decoded or
/// compared are skipped. With nothing comparable the result is
/// [`MatchResult::none`].
pub fn best_match(query: &[f32], entries: &[KnowledgeEntry]) -> MatchResult {
    let mut best = MatchResult::none();
    let mut skipped = 0usize;

    for entry in entries {
        let score = parse_embedding(&entry.embedding)
            .and_then(|embedding| cosine_similarity(query, &embedding));

        match score {
            Some(score) if score > best.score => {
                best = MatchResult {
                    content: entry.content.clone(),
                    score,
                };
            }
            Some(_) => {}
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} knowledge rows with unusable embeddings", skipped);
    }
    best
}
