//! Classifiers over a fixed-width numeric feature vector.

use std::path::Path;

use tract_onnx::prelude::*;

use crate::artifact::{Artifact, Plan, Scaler};
use crate::decode::decode_outputs;
use crate::error::InferenceError;
use crate::{ClassPrediction, Classifier};

/// An ONNX classifier taking a `[1, width]` `f32` row.
pub struct OnnxClassifier {
    plan: Plan,
    labels: Vec<String>,
    scaler: Option<Scaler>,
    width: usize,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("labels", &self.labels.len())
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    pub fn load(dir: impl AsRef<Path>, width: usize) -> Result<Self, InferenceError> {
        let artifact = Artifact::open(dir)?;
        let labels = artifact.require_labels()?;
        let scaler = artifact.scaler_for(width)?;
        let plan = artifact.load_plan(&[1, width])?;
        Ok(Self {
            plan,
            labels,
            scaler,
            width,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, features: &[f32]) -> Result<ClassPrediction, InferenceError> {
        let row = prepare_row(features, self.width, self.scaler.as_ref())?;
        let input = tract_ndarray::Array2::from_shape_vec((1, self.width), row)
            .map_err(|e| InferenceError::InvalidInput(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into_tensor().into()))
            .map_err(|e| InferenceError::Execution(e.to_string()))?;

        decode_outputs(&outputs, &self.labels)
    }
}

/// Check the feature count, reject non-finite values and apply the scaler.
pub(crate) fn prepare_row(
    features: &[f32],
    width: usize,
    scaler: Option<&Scaler>,
) -> Result<Vec<f32>, InferenceError> {
    if features.len() != width {
        return Err(InferenceError::InvalidInput(format!(
            "expected {width} features, got {}",
            features.len()
        )));
    }
    if let Some(pos) = features.iter().position(|x| !x.is_finite()) {
        return Err(InferenceError::InvalidInput(format!(
            "feature {pos} is not a finite number"
        )));
    }

    let mut row = features.to_vec();
    if let Some(scaler) = scaler {
        scaler.apply(&mut row);
    }
    Ok(row)
}
