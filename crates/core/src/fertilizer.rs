//! Fertilizer recommendation input and the static fertilizer guide.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Field conditions for fertilizer recommendation.
///
/// `soil_type` and `crop_type` are the integer codes used at training time.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FertilizerInput {
    #[validate(range(min = -50.0, max = 70.0))]
    pub temperature: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub moisture: f64,
    #[validate(range(min = 0))]
    pub soil_type: i32,
    #[validate(range(min = 0))]
    pub crop_type: i32,
    #[validate(range(min = 0.0))]
    pub nitrogen: f64,
    #[validate(range(min = 0.0))]
    pub potassium: f64,
    #[validate(range(min = 0.0))]
    pub phosphorous: f64,
}

impl FertilizerInput {
    /// Feature vector in training column order.
    pub fn features(&self) -> [f32; 8] {
        [
            self.temperature as f32,
            self.humidity as f32,
            self.moisture as f32,
            self.soil_type as f32,
            self.crop_type as f32,
            self.nitrogen as f32,
            self.potassium as f32,
            self.phosphorous as f32,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FertilizerInfo {
    pub description: &'static str,
    pub tips: &'static str,
}

const UNKNOWN_FERTILIZER: FertilizerInfo = FertilizerInfo {
    description: "No description available.",
    tips: "No tips available.",
};

const FERTILIZER_GUIDE: &[(&str, FertilizerInfo)] = &[
    (
        "10-26-26",
        FertilizerInfo {
            description: "High phosphorus and potassium mix for flowering and fruiting stages.",
            tips: "Apply before flowering. Not suitable for early vegetative stages.",
        },
    ),
    (
        "10-10-10",
        FertilizerInfo {
            description: "Balanced NPK fertilizer suitable for general crop use.",
            tips: "Great for gardens and lawns. Apply during early stages of plant growth.",
        },
    ),
    (
        "14-14-14",
        FertilizerInfo {
            description: "Uniform nutrient blend for general purpose use.",
            tips: "Apply monthly. Water the soil after application.",
        },
    ),
    (
        "14-35-14",
        FertilizerInfo {
            description: "Promotes blooming and root development.",
            tips: "Apply before flowering for best results.",
        },
    ),
    (
        "15-15-15",
        FertilizerInfo {
            description: "Triple mix for balanced crop development.",
            tips: "Spread evenly and water the plant base after use.",
        },
    ),
    (
        "17-17-17",
        FertilizerInfo {
            description: "High strength fertilizer for cereals and legumes.",
            tips: "Use during vegetative stages. Avoid overuse.",
        },
    ),
    (
        "20-20",
        FertilizerInfo {
            description: "High nitrogen and phosphorus for strong early growth.",
            tips: "Apply in moist soil. Avoid excessive use.",
        },
    ),
    (
        "28-28",
        FertilizerInfo {
            description: "Strong NPK mix for rapid plant development.",
            tips: "Good for fast-growing plants. Use with caution.",
        },
    ),
    (
        "DAP",
        FertilizerInfo {
            description: "Diammonium phosphate, rich in phosphorus.",
            tips: "Best used at planting time. Do not mix with urea in storage.",
        },
    ),
    (
        "Potassium chloride",
        FertilizerInfo {
            description: "Potassium source improving drought resistance.",
            tips: "Avoid use on chloride-sensitive crops like potatoes.",
        },
    ),
    (
        "Potassium sulfate",
        FertilizerInfo {
            description: "Chlorine-free potassium, ideal for sensitive crops.",
            tips: "Use on fruits, vegetables, and high-value crops.",
        },
    ),
    (
        "Superphosphate",
        FertilizerInfo {
            description: "Enriches soil with phosphorus and calcium.",
            tips: "Apply during soil preparation. Mix well into soil.",
        },
    ),
    (
        "TSP",
        FertilizerInfo {
            description: "Triple super phosphate for phosphorus-deficient soils.",
            tips: "Apply in furrows near the seed. Do not mix with alkaline substances.",
        },
    ),
    (
        "Urea",
        FertilizerInfo {
            description: "High nitrogen fertilizer for leafy crops.",
            tips: "Use in moist soil. Split dosage for best results.",
        },
    ),
];

/// Description and usage tips for a fertilizer label (exact match).
pub fn fertilizer_info(name: &str) -> FertilizerInfo {
    FERTILIZER_GUIDE
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, info)| *info)
        .unwrap_or(UNKNOWN_FERTILIZER)
}
