//! Turning raw classifier outputs into a labelled prediction.
//!
//! Two export styles are understood:
//!
//! * a single `f32` score tensor (`[1, n]`), decoded by argmax. Scores
//!   that are not already a probability distribution go through softmax.
//! * an `i64` label tensor followed by an optional `f32` probability
//!   tensor, as produced by scikit-learn converters.

use tract_onnx::prelude::*;

use crate::error::InferenceError;
use crate::ClassPrediction;

/// Tolerance when deciding whether scores already sum to one.
const PROBABILITY_EPSILON: f32 = 1e-3;

pub(crate) fn decode_outputs(
    outputs: &[TValue],
    labels: &[String],
) -> Result<ClassPrediction, InferenceError> {
    let first = outputs
        .first()
        .ok_or_else(|| InferenceError::Execution("model produced no outputs".into()))?;

    let (index, confidence) = if first.datum_type() == i64::datum_type() {
        let view = first
            .to_array_view::<i64>()
            .map_err(|e| InferenceError::Execution(e.to_string()))?;
        let raw = *view
            .iter()
            .next()
            .ok_or_else(|| InferenceError::Execution("empty label output".into()))?;
        let index = usize::try_from(raw)
            .map_err(|_| InferenceError::Execution(format!("negative class index {raw}")))?;
        let confidence = match outputs.get(1) {
            Some(probs) => probability_at(probs, index)?,
            None => 1.0,
        };
        (index, confidence)
    } else {
        let scores = f32_values(first)?;
        argmax_probability(&scores)
            .ok_or_else(|| InferenceError::Execution("empty score output".into()))?
    };

    let label = labels
        .get(index)
        .cloned()
        .ok_or(InferenceError::UnknownClass {
            index,
            count: labels.len(),
        })?;

    Ok(ClassPrediction {
        index,
        label,
        confidence,
    })
}

fn f32_values(value: &TValue) -> Result<Vec<f32>, InferenceError> {
    let view = value
        .to_array_view::<f32>()
        .map_err(|e| InferenceError::Execution(e.to_string()))?;
    Ok(view.iter().copied().collect())
}

fn probability_at(value: &TValue, index: usize) -> Result<f32, InferenceError> {
    let probs = f32_values(value)?;
    probs
        .get(index)
        .copied()
        .ok_or(InferenceError::UnknownClass {
            index,
            count: probs.len(),
        })
}

/// Index of the best score and its probability.
pub(crate) fn argmax_probability(scores: &[f32]) -> Option<(usize, f32)> {
    let (index, _) = scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))?;

    let probs = if is_distribution(scores) {
        scores.to_vec()
    } else {
        softmax(scores)
    };
    Some((index, probs[index]))
}

fn is_distribution(scores: &[f32]) -> bool {
    let in_range = scores.iter().all(|s| (0.0..=1.0).contains(s));
    let sum: f32 = scores.iter().sum();
    in_range && (sum - 1.0).abs() <= PROBABILITY_EPSILON
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
