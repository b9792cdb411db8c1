//! Crop-rotation advice: prompt construction and response parsing.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extraction::{clean_item, list_items, SectionLayout};

pub const NEXT_CROP: &str = "NEXT CROP";
pub const JUSTIFICATION: &str = "JUSTIFICATION";
pub const ADVANTAGES: &str = "ADVANTAGES";
pub const ROTATION_PLAN: &str = "ROTATION PLAN";
pub const ADDITIONAL_NOTES: &str = "ADDITIONAL NOTES";

/// Placeholder for a next crop heading that was present but empty.
pub const NOT_SPECIFIED: &str = "Not specified";
/// Sentinel next crop when the response could not be parsed at all.
pub const SEE_FULL_RESPONSE: &str = "See Full Response";
/// Sentinel next crop when the response was blank.
pub const PARSING_ERROR: &str = "Parsing Error";

const NO_JUSTIFICATION: &str = "No justification provided.";
const PARSE_FAILURE_NOTICE: &str = "Could not automatically parse the AI's response. \
     The full response has been logged for review.";
const EMPTY_RESPONSE_NOTICE: &str = "The advice service returned an empty response.";

static ROTATION_LAYOUT: LazyLock<SectionLayout> = LazyLock::new(|| {
    SectionLayout::new(&[
        NEXT_CROP,
        JUSTIFICATION,
        ADVANTAGES,
        ROTATION_PLAN,
        ADDITIONAL_NOTES,
    ])
});

/// Field and crop parameters submitted for rotation advice.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RotationInput {
    #[validate(length(min = 1, max = 100))]
    pub current_crop: String,
    #[serde(default)]
    pub previous_crops: Vec<String>,
    #[validate(length(min = 1, max = 100))]
    pub soil_type: String,
    #[validate(range(min = 0.0))]
    pub nitrogen: f64,
    #[validate(range(min = 0.0))]
    pub phosphorus: f64,
    #[validate(range(min = 0.0))]
    pub potassium: f64,
    #[serde(rename = "soilpH")]
    #[validate(range(min = 0.0, max = 14.0))]
    pub soil_ph: f64,
    pub climate_zone: String,
    pub season: String,
    pub water_availability: String,
    pub irrigation_type: String,
    #[serde(default)]
    pub pest_disease_history: Vec<String>,
    pub target_goal: String,
}

/// Structured rotation advice returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationAdvice {
    pub next_crop: String,
    pub justification: String,
    pub advantages: Vec<String>,
    pub rotation_plan: Vec<String>,
}

/// Render the rotation prompt. The headings here must match [`ROTATION_LAYOUT`].
pub fn rotation_prompt(input: &RotationInput) -> String {
    let pest_history = if input.pest_disease_history.is_empty() {
        "None".to_string()
    } else {
        input.pest_disease_history.join(", ")
    };

    format!(
        "You're an expert agricultural advisor. Based on the following field and crop \
parameters, generate an AI-assisted crop rotation plan.

**Input Details:**
- Current Crop: {current}
- Previous Crop(s): {previous}
- Soil Type: {soil}
- Nitrogen (N): {n} mg/kg
- Phosphorus (P): {p} mg/kg
- Potassium (K): {k} mg/kg
- Soil pH: {ph}
- Climate Zone: {climate}
- Season: {season}
- Water Availability: {water}
- Irrigation Type: {irrigation}
- Pest/Disease History: {pest_history}
- Target Goal: {goal}

**Please provide your response in the following structured format:**

**NEXT CROP:** [Name the specific crop you recommend for the next season]

**JUSTIFICATION:** [Explain why this crop is the best choice for the given conditions, \
considering soil health, nutrient balance, and pest control]

**ADVANTAGES:**
1. [First advantage of choosing this crop]
2. [Second advantage]
3. [Third advantage]
4. [Fourth advantage]

**ROTATION PLAN:**
1. [First year/season recommendation]
2. [Second year/season recommendation]
3. [Third year/season recommendation]

**ADDITIONAL NOTES:** [Any important precautions, soil management tips, or considerations]

Keep the response educational, clear, and easy for farmers to understand. \
Focus on practical, actionable advice.",
        current = input.current_crop,
        previous = input.previous_crops.join(", "),
        soil = input.soil_type,
        n = input.nitrogen,
        p = input.phosphorus,
        k = input.potassium,
        ph = input.soil_ph,
        climate = input.climate_zone,
        season = input.season,
        water = input.water_availability,
        irrigation = input.irrigation_type,
        goal = input.target_goal,
    )
}

/// Parse a generated rotation response into [`RotationAdvice`].
///
/// Never fails. When the NEXT CROP heading is missing, the whole response is
/// returned in `advantages` under the [`SEE_FULL_RESPONSE`] sentinel.
pub fn parse_rotation_advice(text: &str) -> RotationAdvice {
    if text.trim().is_empty() {
        tracing::warn!("Rotation advice response was empty");
        return RotationAdvice {
            next_crop: PARSING_ERROR.to_string(),
            justification: EMPTY_RESPONSE_NOTICE.to_string(),
            advantages: Vec::new(),
            rotation_plan: Vec::new(),
        };
    }

    let sections = ROTATION_LAYOUT.extract(text);
    let rotation_plan = sections
        .non_empty(ROTATION_PLAN)
        .map(list_items)
        .unwrap_or_default();

    let Some(next_crop) = sections.get(NEXT_CROP) else {
        tracing::warn!(
            response_len = text.len(),
            response = %text,
            "Could not locate NEXT CROP in rotation advice",
        );
        return RotationAdvice {
            next_crop: SEE_FULL_RESPONSE.to_string(),
            justification: PARSE_FAILURE_NOTICE.to_string(),
            advantages: vec![text.to_string()],
            rotation_plan,
        };
    };

    let next_crop = clean_item(next_crop);

    RotationAdvice {
        next_crop: if next_crop.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            next_crop
        },
        justification: sections
            .non_empty(JUSTIFICATION)
            .unwrap_or(NO_JUSTIFICATION)
            .to_string(),
        advantages: sections
            .non_empty(ADVANTAGES)
            .map(list_items)
            .unwrap_or_default(),
        rotation_plan,
    }
}
