//! Image classification: decoding, resizing and tensor layout.

use std::path::Path;

use image::imageops::FilterType;
use image::RgbImage;
use tract_onnx::prelude::*;

use crate::artifact::{Artifact, ImageSpec, Layout, Plan};
use crate::decode::decode_outputs;
use crate::error::InferenceError;
use crate::{ClassPrediction, ImageClassifier};

pub struct OnnxImageClassifier {
    plan: Plan,
    labels: Vec<String>,
    spec: ImageSpec,
}

impl std::fmt::Debug for OnnxImageClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxImageClassifier")
            .field("labels", &self.labels.len())
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl OnnxImageClassifier {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let artifact = Artifact::open(dir)?;
        let labels = artifact.require_labels()?;
        let spec = artifact.metadata.image.unwrap_or_default();
        if spec.size == 0 {
            return Err(InferenceError::Metadata("image size must be positive".into()));
        }
        let plan = artifact.load_plan(&spec.input_shape())?;
        Ok(Self { plan, labels, spec })
    }
}

impl ImageClassifier for OnnxImageClassifier {
    fn classify_image(&self, bytes: &[u8]) -> Result<ClassPrediction, InferenceError> {
        let input = preprocess(bytes, &self.spec)?;
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::Execution(e.to_string()))?;
        decode_outputs(&outputs, &self.labels)
    }
}

/// Decode any supported image format, convert to RGB, resize to the model's
/// square input and lay the pixels out as a batch of one.
pub fn preprocess(bytes: &[u8], spec: &ImageSpec) -> Result<Tensor, InferenceError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| InferenceError::InvalidImage(e.to_string()))?;
    let rgb = image::imageops::resize(
        &decoded.to_rgb8(),
        spec.size,
        spec.size,
        FilterType::CatmullRom,
    );
    Ok(to_tensor(&rgb, spec))
}

fn to_tensor(rgb: &RgbImage, spec: &ImageSpec) -> Tensor {
    let size = spec.size as usize;
    let scale = spec.pixel_scale;
    let channel = |x: usize, y: usize, c: usize| rgb.get_pixel(x as u32, y as u32)[c] as f32 * scale;

    match spec.layout {
        Layout::Nhwc => {
            tract_ndarray::Array4::from_shape_fn((1, size, size, 3), |(_, y, x, c)| channel(x, y, c))
                .into_tensor()
        }
        Layout::Nchw => {
            tract_ndarray::Array4::from_shape_fn((1, 3, size, size), |(_, c, y, x)| channel(x, y, c))
                .into_tensor()
        }
    }
}
