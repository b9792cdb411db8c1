//! Pest and disease risk advice: prompt construction and response parsing.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extraction::{limit_lines, strip_bold, SectionLayout};

pub const LIKELY_PESTS: &str = "LIKELY PESTS OR DISEASES";
pub const SYMPTOMS: &str = "SYMPTOMS TO WATCH";
pub const PREVENTIVE_MEASURES: &str = "PREVENTIVE MEASURES";

/// Maximum number of lines kept per section.
pub const MAX_SECTION_LINES: usize = 4;

pub const NOT_SPECIFIED: &str = "Not specified";
pub const SEE_FULL_RESPONSE: &str = "See Full Response";
pub const PARSING_ERROR: &str = "Parsing Error";

const NO_SYMPTOMS: &str = "No symptoms provided.";
const NO_MEASURES: &str = "No measures provided.";
const PARSE_FAILURE_NOTICE: &str = "Could not automatically parse the AI's response. \
     The full response has been logged for review.";

static PEST_LAYOUT: LazyLock<SectionLayout> =
    LazyLock::new(|| SectionLayout::new(&[LIKELY_PESTS, SYMPTOMS, PREVENTIVE_MEASURES]));

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PestDiseaseInput {
    #[validate(length(min = 1, max = 100))]
    pub crop: String,
    pub crop_variety: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    pub season: String,
    pub soil_type: String,
    #[validate(range(min = 0.0))]
    pub nitrogen: f64,
    #[validate(range(min = 0.0))]
    pub phosphorus: f64,
    #[validate(range(min = 0.0))]
    pub potassium: f64,
    #[validate(range(min = 0.0, max = 14.0))]
    pub soil_ph: f64,
    pub previous_issues: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PestDiseaseAdvice {
    pub likely_pests: String,
    pub symptoms: String,
    pub preventive_measures: String,
}

pub fn pest_disease_prompt(input: &PestDiseaseInput) -> String {
    let variety = non_blank(input.crop_variety.as_deref()).unwrap_or("Not specified");
    let previous = non_blank(input.previous_issues.as_deref()).unwrap_or("None");

    format!(
        "You're an expert plant health advisor. Based on the provided field conditions and \
crop information, predict likely pest or disease threats and suggest preventive measures.

**Input Details:**
- Crop: {crop}
- Crop Variety: {variety}
- Region/Location: {location}
- Season: {season}
- Soil Type: {soil}
- Nitrogen (N): {n} mg/kg
- Phosphorus (P): {p} mg/kg
- Potassium (K): {k} mg/kg
- Soil pH: {ph}
- Previous Issues: {previous}

**Provide output in this format:**

**LIKELY PESTS OR DISEASES:**
[List of threats with brief description and risk level]

**SYMPTOMS TO WATCH:**
[List common early indicators farmers should monitor]

**PREVENTIVE MEASURES:**
[Bullet points on field practices, natural remedies, and treatments]

Keep the response practical and clear for Indian farmers and extension officers.",
        crop = input.crop,
        location = input.location,
        season = input.season,
        soil = input.soil_type,
        n = input.nitrogen,
        p = input.phosphorus,
        k = input.potassium,
        ph = input.soil_ph,
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a generated pest/disease response into [`PestDiseaseAdvice`].
///
/// Bold markers are removed before matching and each section keeps at most
/// [`MAX_SECTION_LINES`] lines. Never fails: when the likely-pests heading is
/// missing, the raw response is returned in `symptoms`.
pub fn parse_pest_disease_advice(text: &str) -> PestDiseaseAdvice {
    if text.trim().is_empty() {
        tracing::warn!("Pest/disease advice response was empty");
        return PestDiseaseAdvice {
            likely_pests: PARSING_ERROR.to_string(),
            symptoms: String::new(),
            preventive_measures: String::new(),
        };
    }

    let cleaned = strip_bold(text);
    let sections = PEST_LAYOUT.extract(&cleaned);
    let capped = |label: &str| {
        sections
            .non_empty(label)
            .map(|body| limit_lines(body, MAX_SECTION_LINES))
    };

    let Some(likely_pests) = sections.get(LIKELY_PESTS) else {
        tracing::warn!(
            response_len = text.len(),
            response = %text,
            "Could not locate LIKELY PESTS OR DISEASES in pest advice",
        );
        return PestDiseaseAdvice {
            likely_pests: SEE_FULL_RESPONSE.to_string(),
            symptoms: text.to_string(),
            preventive_measures: PARSE_FAILURE_NOTICE.to_string(),
        };
    };

    let likely_pests = limit_lines(likely_pests, MAX_SECTION_LINES);

    PestDiseaseAdvice {
        likely_pests: if likely_pests.is_empty() {
            NOT_SPECIFIED.to_string()
        } else {
            likely_pests
        },
        symptoms: capped(SYMPTOMS).unwrap_or_else(|| NO_SYMPTOMS.to_string()),
        preventive_measures: capped(PREVENTIVE_MEASURES)
            .unwrap_or_else(|| NO_MEASURES.to_string()),
    }
}
