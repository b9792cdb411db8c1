//! Yield prediction input and the rule-based fallback estimator.
//!
//! The estimator is used whenever the trained yield artifact is unavailable.
//! It multiplies a per-crop base yield by rainfall, fertilizer and season
//! factors, then applies bounded random jitter.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use validator::Validate;

/// Unit reported for every yield figure.
pub const YIELD_UNIT: &str = "quintals/hectare";

/// Base yield for crops missing from [`BASE_YIELDS`].
pub const DEFAULT_BASE_YIELD: f64 = 20.0;

/// Jitter applied to the heuristic estimate (±10%).
pub const JITTER_RANGE: (f64, f64) = (0.9, 1.1);

/// Range the reported fallback confidence is drawn from.
pub const FALLBACK_CONFIDENCE_RANGE: (f64, f64) = (0.85, 0.98);

pub const FALLBACK_NOTE: &str = "Prediction based on agricultural data";

/// Base yields in quintals/hectare, keyed by lowercase crop name.
pub const BASE_YIELDS: &[(&str, f64)] = &[
    ("arecanut", 15.0),
    ("arhar/tur", 12.0),
    ("castor seed", 18.0),
    ("coconut", 120.0),
    ("cotton(lint)", 15.0),
    ("dry chillies", 8.0),
    ("gram", 12.0),
    ("jute", 20.0),
    ("linseed", 6.0),
    ("maize", 30.0),
    ("mesta", 25.0),
    ("niger seed", 4.0),
    ("onion", 180.0),
    ("other rabi pulses", 10.0),
    ("potato", 250.0),
    ("rapeseed &mustard", 12.0),
    ("rice", 25.0),
    ("sesamum", 4.0),
    ("small millets", 8.0),
    ("sugarcane", 700.0),
    ("sweet potato", 200.0),
    ("tapioca", 300.0),
    ("tobacco", 20.0),
    ("turmeric", 25.0),
    ("wheat", 35.0),
    ("bajra", 12.0),
    ("black pepper", 2.0),
    ("cardamom", 1.5),
    ("coriander", 8.0),
    ("garlic", 60.0),
    ("ginger", 30.0),
    ("groundnut", 15.0),
    ("horse-gram", 6.0),
    ("jowar", 12.0),
    ("ragi", 15.0),
    ("cashewnut", 8.0),
    ("banana", 400.0),
    ("soyabean", 12.0),
    ("barley", 25.0),
    ("khesari", 8.0),
    ("masoor", 10.0),
    ("moong(green gram)", 8.0),
    ("other kharif pulses", 8.0),
    ("safflower", 8.0),
    ("sannhamp", 20.0),
    ("sunflower", 12.0),
    ("urad", 8.0),
    ("peas & beans (pulses)", 12.0),
    ("other oilseeds", 10.0),
    ("other cereals", 20.0),
    ("cowpea(lobia)", 8.0),
    ("oilseeds total", 12.0),
    ("guar seed", 8.0),
    ("other summer pulses", 8.0),
    ("moth", 6.0),
];

/// One tabular row submitted for yield prediction.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct YieldInput {
    #[validate(length(min = 1, max = 100))]
    pub crop: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 50))]
    pub season: String,
    /// Annual rainfall in millimetres.
    #[validate(range(min = 0.0))]
    pub rainfall: f64,
    /// Fertilizer in kg/hectare.
    #[validate(range(min = 0.0))]
    pub fertilizer: f64,
    /// Pesticide in kg/hectare.
    #[validate(range(min = 0.0))]
    pub pesticide: f64,
}

/// Base yield for a crop, matched case-insensitively after trimming.
pub fn base_yield(crop: &str) -> f64 {
    let key = crop.trim().to_lowercase();
    BASE_YIELDS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, y)| *y)
        .unwrap_or(DEFAULT_BASE_YIELD)
}

/// Optimal band is 1000-1500 mm.
pub fn rainfall_factor(rainfall: f64) -> f64 {
    if (1000.0..=1500.0).contains(&rainfall) {
        1.2
    } else if rainfall < 500.0 {
        0.7
    } else if rainfall > 2000.0 {
        0.9
    } else {
        1.0
    }
}

/// Optimal band is 100-200 kg/ha.
pub fn fertilizer_factor(fertilizer: f64) -> f64 {
    if (100.0..=200.0).contains(&fertilizer) {
        1.3
    } else if fertilizer < 50.0 {
        0.8
    } else if fertilizer > 300.0 {
        1.1
    } else {
        1.0
    }
}

pub fn season_factor(season: &str) -> f64 {
    let season = season.trim().to_lowercase();
    if season.contains("rabi") {
        1.1
    } else if season.contains("kharif") {
        1.0
    } else if season.contains("autumn") {
        0.95
    } else if season.contains("summer") {
        0.9
    } else if season.contains("winter") {
        1.05
    } else {
        1.0
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Result of the heuristic estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldEstimate {
    pub predicted_yield: f64,
    pub confidence: f64,
}

/// Heuristic yield estimate with jitter drawn from `rng`.
pub fn estimate_yield<R: Rng + ?Sized>(input: &YieldInput, rng: &mut R) -> YieldEstimate {
    let deterministic = base_yield(&input.crop)
        * rainfall_factor(input.rainfall)
        * fertilizer_factor(input.fertilizer)
        * season_factor(&input.season);

    let jitter = rng.random_range(JITTER_RANGE.0..=JITTER_RANGE.1);
    let confidence = rng.random_range(FALLBACK_CONFIDENCE_RANGE.0..=FALLBACK_CONFIDENCE_RANGE.1);

    YieldEstimate {
        predicted_yield: round2(deterministic * jitter),
        confidence: round2(confidence),
    }
}

/// Fallback estimator with an optional fixed seed.
///
/// With a seed, every call starts from the same RNG state, so identical
/// inputs produce identical estimates.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEstimator {
    seed: Option<u64>,
}

impl FallbackEstimator {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub fn estimate(&self, input: &YieldInput) -> YieldEstimate {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        estimate_yield(input, &mut rng)
    }
}
