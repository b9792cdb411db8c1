//! On-disk model artifacts.
//!
//! An artifact is a directory holding `model.onnx` and a `metadata.json`
//! sidecar that describes how to feed the graph and read its output:
//!
//! ```text
//! models/crop/
//!   model.onnx
//!   metadata.json   {"labels": [...], "scaler": {"mean": [...], "scale": [...]}}
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tract_onnx::prelude::*;

use crate::error::InferenceError;

pub const MODEL_FILE: &str = "model.onnx";
pub const METADATA_FILE: &str = "metadata.json";

/// An optimized, runnable tract plan.
pub type Plan = TypedRunnableModel<TypedModel>;

/// Sidecar metadata for one artifact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactMetadata {
    /// Class names, indexed by model output position.
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub scaler: Option<Scaler>,
    #[serde(default)]
    pub image: Option<ImageSpec>,
    #[serde(default)]
    pub categories: Option<YieldCategories>,
}

/// Standard scaling fitted at training time: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

impl Scaler {
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    fn check(&self) -> Result<(), InferenceError> {
        if self.mean.len() != self.scale.len() {
            return Err(InferenceError::Metadata(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.scale.iter().any(|s| *s == 0.0) {
            return Err(InferenceError::Metadata("scaler contains a zero scale".into()));
        }
        Ok(())
    }

    pub fn apply(&self, features: &mut [f32]) {
        for ((x, mean), scale) in features.iter_mut().zip(&self.mean).zip(&self.scale) {
            *x = (*x - mean) / scale;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// `[1, size, size, 3]`, as exported from Keras.
    #[default]
    Nhwc,
    /// `[1, 3, size, size]`, as exported from PyTorch.
    Nchw,
}

/// Input geometry of an image model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ImageSpec {
    #[serde(default = "ImageSpec::default_size")]
    pub size: u32,
    #[serde(default)]
    pub layout: Layout,
    /// Multiplier applied to raw `0..=255` channel values.
    #[serde(default = "ImageSpec::default_pixel_scale")]
    pub pixel_scale: f32,
}

impl ImageSpec {
    fn default_size() -> u32 {
        224
    }

    fn default_pixel_scale() -> f32 {
        1.0
    }

    pub fn input_shape(&self) -> [usize; 4] {
        let s = self.size as usize;
        match self.layout {
            Layout::Nhwc => [1, s, s, 3],
            Layout::Nchw => [1, 3, s, s],
        }
    }
}

impl Default for ImageSpec {
    fn default() -> Self {
        Self {
            size: Self::default_size(),
            layout: Layout::default(),
            pixel_scale: Self::default_pixel_scale(),
        }
    }
}

/// Category vocabularies for one-hot encoding yield rows, in column order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct YieldCategories {
    pub crop: Vec<String>,
    pub state: Vec<String>,
    pub season: Vec<String>,
}

/// An artifact directory whose metadata has been read and checked.
#[derive(Debug, Clone)]
pub struct Artifact {
    dir: PathBuf,
    pub metadata: ArtifactMetadata,
}

impl Artifact {
    /// Locate the model file and parse the metadata sidecar.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let dir = dir.as_ref().to_path_buf();
        let model_path = dir.join(MODEL_FILE);
        if !model_path.is_file() {
            return Err(InferenceError::MissingArtifact(
                model_path.display().to_string(),
            ));
        }

        let metadata_path = dir.join(METADATA_FILE);
        let raw = std::fs::read_to_string(&metadata_path).map_err(|e| {
            InferenceError::MissingArtifact(format!("{}: {e}", metadata_path.display()))
        })?;
        let metadata: ArtifactMetadata = serde_json::from_str(&raw)
            .map_err(|e| InferenceError::Metadata(format!("{}: {e}", metadata_path.display())))?;
        if let Some(scaler) = &metadata.scaler {
            scaler.check()?;
        }

        Ok(Self { dir, metadata })
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(MODEL_FILE)
    }

    /// Labels, which a classifier artifact must provide.
    pub fn require_labels(&self) -> Result<Vec<String>, InferenceError> {
        if self.metadata.labels.is_empty() {
            return Err(InferenceError::Metadata(format!(
                "{} has no labels",
                self.dir.display()
            )));
        }
        Ok(self.metadata.labels.clone())
    }

    /// Check that a configured scaler matches the model's feature count.
    pub fn scaler_for(&self, width: usize) -> Result<Option<Scaler>, InferenceError> {
        match &self.metadata.scaler {
            Some(scaler) if scaler.width() != width => Err(InferenceError::Metadata(format!(
                "scaler width {} does not match {width} features",
                scaler.width()
            ))),
            other => Ok(other.clone()),
        }
    }

    /// Load, type and optimize the ONNX graph for a single `f32` input.
    pub fn load_plan(&self, input_shape: &[usize]) -> Result<Plan, InferenceError> {
        let path = self.model_path();
        let load_err = |e: TractError| InferenceError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let shape: TVec<usize> = input_shape.iter().copied().collect();
        let plan = tract_onnx::onnx()
            .model_for_path(&path)
            .map_err(load_err)?
            .with_input_fact(0, InferenceFact::dt_shape(f32::datum_type(), shape))
            .map_err(load_err)?
            .into_optimized()
            .map_err(load_err)?
            .into_runnable()
            .map_err(load_err)?;

        tracing::info!(path = %path.display(), ?input_shape, "Loaded model");
        Ok(plan)
    }
}
