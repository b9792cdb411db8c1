//! Yield regression over one-hot categories plus numeric inputs.

use std::path::Path;

use seedsync_core::crop_yield::YieldInput;
use tract_onnx::prelude::*;

use crate::artifact::{Artifact, Plan, YieldCategories};
use crate::error::InferenceError;
use crate::tabular::prepare_row;
use crate::YieldRegressor;

/// Rainfall, fertilizer and pesticide follow the one-hot blocks.
const NUMERIC_COLUMNS: usize = 3;

pub struct OnnxYieldRegressor {
    plan: Plan,
    categories: YieldCategories,
    width: usize,
}

impl std::fmt::Debug for OnnxYieldRegressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxYieldRegressor")
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

impl OnnxYieldRegressor {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let artifact = Artifact::open(dir)?;
        let categories = artifact.metadata.categories.clone().ok_or_else(|| {
            InferenceError::Metadata("yield artifact has no category vocabularies".into())
        })?;
        let width = encoded_width(&categories);
        let plan = artifact.load_plan(&[1, width])?;
        Ok(Self {
            plan,
            categories,
            width,
        })
    }
}

impl YieldRegressor for OnnxYieldRegressor {
    fn predict(&self, input: &YieldInput) -> Result<f64, InferenceError> {
        let features = encode(&self.categories, input);
        let row = prepare_row(&features, self.width, None)?;
        let tensor = tract_ndarray::Array2::from_shape_vec((1, self.width), row)
            .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into_tensor().into()))
            .map_err(|e| InferenceError::Execution(e.to_string()))?;
        let output = outputs
            .first()
            .ok_or_else(|| InferenceError::Execution("model produced no outputs".into()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Execution(e.to_string()))?;
        let value = view
            .iter()
            .next()
            .copied()
            .ok_or_else(|| InferenceError::Execution("empty regression output".into()))?;

        Ok(f64::from(value))
    }
}

fn encoded_width(categories: &YieldCategories) -> usize {
    categories.crop.len() + categories.state.len() + categories.season.len() + NUMERIC_COLUMNS
}

/// Build the model row. Unknown category values encode as all zeros.
pub fn encode(categories: &YieldCategories, input: &YieldInput) -> Vec<f32> {
    let mut row = Vec::with_capacity(encoded_width(categories));
    one_hot(&mut row, &categories.crop, &input.crop);
    one_hot(&mut row, &categories.state, &input.state);
    one_hot(&mut row, &categories.season, &input.season);
    row.extend([
        input.rainfall as f32,
        input.fertilizer as f32,
        input.pesticide as f32,
    ]);
    row
}

fn one_hot(row: &mut Vec<f32>, vocabulary: &[String], value: &str) {
    let value = value.trim();
    row.extend(vocabulary.iter().map(|v| {
        if v.trim().eq_ignore_ascii_case(value) {
            1.0
        } else {
            0.0
        }
    }));
}
