//! Crop recommendation input.

use serde::Deserialize;
use validator::Validate;

/// Soil and climate measurements for crop recommendation.
///
/// Field names follow the training dataset columns (`N`, `P`, `K`, ...).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CropInput {
    #[serde(rename = "N")]
    #[validate(range(min = 0.0))]
    pub n: f64,
    #[serde(rename = "P")]
    #[validate(range(min = 0.0))]
    pub p: f64,
    #[serde(rename = "K")]
    #[validate(range(min = 0.0))]
    pub k: f64,
    #[validate(range(min = -50.0, max = 70.0))]
    pub temperature: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: f64,
    #[validate(range(min = 0.0, max = 14.0))]
    pub ph: f64,
    #[validate(range(min = 0.0))]
    pub rainfall: f64,
}

impl CropInput {
    /// Feature vector in training column order.
    pub fn features(&self) -> [f32; 7] {
        [
            self.n as f32,
            self.p as f32,
            self.k as f32,
            self.temperature as f32,
            self.humidity as f32,
            self.ph as f32,
            self.rainfall as f32,
        ]
    }
}
