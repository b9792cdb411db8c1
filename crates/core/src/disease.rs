//! Plant disease display names, prevention-tip prompts and tip parsing.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::extraction::clean_item;

/// Words that mark an already well-formed disease name.
const KEEP_AS_IS_MARKERS: &[&str] = &["Blight", "Rust", "Mildew", "Spot", "Rot"];

/// Overview lines must be longer than this many characters unless they mention a keyword.
const MIN_OVERVIEW_LEN: usize = 50;

const OVERVIEW_KEYWORDS: &[&str] = &["prevention", "guide", "approach"];

/// A numbered section heading such as `**2. Immediate Actions (What to do NOW):**`.
static NUMBERED_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s*#]*\d{1,2}\.\s+(.+?)[\s*:]*$").expect("valid regex"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-•*]\s+(.+)$").expect("valid regex"));

/// Turn a classifier label such as `Tomato___Late_blight` into a display name.
///
/// Underscores become spaces. Names that already carry a recognisable
/// disease word are kept as-is, everything else is title-cased.
pub fn format_disease_name(raw: &str) -> String {
    let formatted = raw.replace('_', " ");
    if KEEP_AS_IS_MARKERS.iter().any(|m| formatted.contains(m)) {
        formatted
    } else {
        title_case(&formatted)
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Whether a (formatted) label denotes a healthy plant.
pub fn is_healthy(disease_name: &str) -> bool {
    disease_name.to_lowercase().contains("healthy")
}

/// Message returned in place of tips when generation fails.
pub fn tips_unavailable_message(disease_name: &str) -> String {
    format!("Unable to generate tips for {disease_name} due to technical issues.")
}

pub fn prevention_tips_prompt(disease_name: &str) -> String {
    if is_healthy(disease_name) {
        return "The uploaded plant image has been classified as **Healthy**.

You are an expert agronomist assistant helping farmers maintain healthy crops. \
Provide valuable tips and preventive measures in the following format:

**Crop Status: Healthy**

**1. General Tips to Maintain Healthy Plants:**
- Best practices for watering, sunlight, and ventilation
- How to monitor leaf color, shape, and moisture

**2. Soil & Fertilizer Management:**
- Recommended NPK ratios for general crop health
- Organic practices to enrich soil over time

**3. Pest & Disease Prevention:**
- Natural barriers or companion plants to prevent pests
- How to spot early signs of common infections

**4. Seasonal Care & Monitoring:**
- What to watch for in different seasons
- Tools or schedules for weekly plant health checks

Format the response in farmer-friendly language with bullet points. \
Keep it clear, short, and immediately actionable."
            .to_string();
    }

    format!(
        "The uploaded image has been classified as infected with the plant disease: **{disease_name}**.

You are an expert agricultural AI. Provide a structured, useful guide for farmers. \
Follow this format:

**Detected Disease: {disease_name}**

**1. Disease Overview:**
- What is {disease_name} and which crops are usually affected?
- Early symptoms, mid-stage signs, and advanced-stage damage
- Common causes (weather, pests, fungi, bacteria, etc.)

**2. Immediate Actions (What to do NOW):**
- Steps to prevent spread
- Isolation, pruning, or crop removal if necessary

**3. Treatment Recommendations:**
- Chemical and organic treatments with usage tips
- Application method and safety warnings

**4. Long-term Prevention Plan:**
- Soil, spacing, and rotation tips
- Using resistant varieties and hygiene practices

**5. Monitoring & Follow-up:**
- What signs to look for each week
- How to track recovery or reinfection

The tone should be clear, confident, and actionable for real farmers. \
Avoid academic jargon. Bullet-point formatting preferred."
    )
}

/// Prevention tips broken into display sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiseaseTips {
    pub overview: String,
    pub immediate_actions: Vec<String>,
    pub cultural_practices: Vec<String>,
    pub chemical_controls: Vec<String>,
    pub monitoring: Vec<String>,
    pub resistant_varieties: Vec<String>,
}

#[derive(Clone, Copy)]
enum TipSection {
    Immediate,
    Chemical,
    Monitoring,
    Cultural,
}

impl TipSection {
    fn from_heading(heading: &str) -> Option<Self> {
        let heading = heading.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| heading.contains(w));

        if has(&["immediate"]) {
            Some(Self::Immediate)
        } else if has(&["treatment", "chemical"]) {
            Some(Self::Chemical)
        } else if has(&["monitor", "follow", "seasonal"]) {
            Some(Self::Monitoring)
        } else if has(&["prevention", "soil", "cultural", "general tips", "maintain"]) {
            Some(Self::Cultural)
        } else {
            None
        }
    }
}

/// Structure generated prevention tips for display.
///
/// The overview is the first introductory line of the response. Bullets are
/// filed under the numbered heading they follow, and any bullet mentioning
/// resistant varieties is also collected separately.
pub fn parse_disease_tips(text: &str, disease_name: &str) -> DiseaseTips {
    let mut tips = DiseaseTips {
        overview: find_overview(text)
            .unwrap_or_else(|| format!("{disease_name}: A comprehensive guide for farmers.")),
        ..Default::default()
    };

    let mut section: Option<TipSection> = None;
    for line in text.lines() {
        let bullet = match NUMBERED_HEADING_RE.captures(line) {
            Some(caps) => match TipSection::from_heading(&caps[1]) {
                Some(heading) => {
                    section = Some(heading);
                    continue;
                }
                None if is_decorated_heading(line) => {
                    section = None;
                    continue;
                }
                // A plain numbered sub-item under the current heading.
                None => clean_item(&caps[1]),
            },
            None => match BULLET_RE.captures(line) {
                Some(caps) => clean_item(&caps[1]),
                None => continue,
            },
        };
        if bullet.is_empty() {
            continue;
        }

        if bullet.to_lowercase().contains("resistant") {
            tips.resistant_varieties.push(bullet.clone());
        }
        let target = match section {
            Some(TipSection::Immediate) => &mut tips.immediate_actions,
            Some(TipSection::Chemical) => &mut tips.chemical_controls,
            Some(TipSection::Monitoring) => &mut tips.monitoring,
            Some(TipSection::Cultural) => &mut tips.cultural_practices,
            None => continue,
        };
        target.push(bullet);
    }

    tips
}

/// Bold, `#` or colon-terminated numbered lines are headings even when
/// their title is not one we file bullets under.
fn is_decorated_heading(line: &str) -> bool {
    let line = line.trim();
    line.starts_with('*') || line.starts_with('#') || line.trim_end_matches('*').ends_with(':')
}

fn find_overview(text: &str) -> Option<String> {
    const NUMBERED_PREFIXES: &[&str] = &["1.", "2.", "3.", "4."];

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with('*'))
        .filter(|line| !NUMBERED_PREFIXES.iter().any(|p| line.starts_with(p)))
        .find(|line| {
            let lower = line.to_lowercase();
            OVERVIEW_KEYWORDS.iter().any(|k| lower.contains(k))
                || line.chars().count() > MIN_OVERVIEW_LEN
        })
        .map(clean_item)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_names_with_known_disease_words() {
        assert_eq!(format_disease_name("Corn_Common_Rust"), "Corn Common Rust");
        assert_eq!(format_disease_name("Apple_scab_Spot"), "Apple scab Spot");
    }

    #[test]
    fn marker_match_is_case_sensitive() {
        assert_eq!(
            format_disease_name("Tomato___Late_blight"),
            "Tomato   Late Blight"
        );
    }

    #[test]
    fn title_cases_other_names() {
        assert_eq!(format_disease_name("potato_healthy"), "Potato Healthy");
        assert_eq!(
            format_disease_name("tomato_YELLOW_leaf_curl_virus"),
            "Tomato Yellow Leaf Curl Virus"
        );
    }

    #[test]
    fn healthy_detection_is_case_insensitive() {
        assert!(is_healthy("Potato Healthy"));
        assert!(is_healthy("healthy"));
        assert!(!is_healthy("Early Blight"));
    }

    #[test]
    fn prompt_varies_by_health() {
        assert!(prevention_tips_prompt("Healthy").contains("Crop Status: Healthy"));
        let infected = prevention_tips_prompt("Late Blight");
        assert!(infected.contains("Detected Disease: Late Blight"));
    }

    #[test]
    fn overview_uses_first_substantial_line() {
        let text = "**Detected Disease: Late Blight**\n\
This guide explains how to stop late blight from spreading in your field.\n\
**1. Disease Overview:**";
        let tips = parse_disease_tips(text, "Late Blight");
        assert_eq!(
            tips.overview,
            "This guide explains how to stop late blight from spreading in your field."
        );
    }

    #[test]
    fn overview_falls_back_to_generic_text() {
        let tips = parse_disease_tips("* short\n1. item", "Leaf Spot");
        assert_eq!(tips.overview, "Leaf Spot: A comprehensive guide for farmers.");
    }

    #[test]
    fn bullets_are_filed_under_their_headings() {
        let text = "\
**1. Disease Overview:**
- Fungal disease of potato
**2. Immediate Actions (What to do NOW):**
- Remove infected leaves
**3. Treatment Recommendations:**
* Spray **mancozeb** at 2 g/L
**4. Long-term Prevention Plan:**
- Use resistant varieties such as Kufri Jyoti
- Rotate with cereals
**5. Monitoring & Follow-up:**
- Inspect weekly";
        let tips = parse_disease_tips(text, "Late Blight");
        assert_eq!(tips.immediate_actions, vec!["Remove infected leaves"]);
        assert_eq!(tips.chemical_controls, vec!["Spray mancozeb at 2 g/L"]);
        assert_eq!(
            tips.cultural_practices,
            vec!["Use resistant varieties such as Kufri Jyoti", "Rotate with cereals"]
        );
        assert_eq!(tips.monitoring, vec!["Inspect weekly"]);
        assert_eq!(
            tips.resistant_varieties,
            vec!["Use resistant varieties such as Kufri Jyoti"]
        );
    }

    #[test]
    fn numbered_sub_items_stay_in_their_section() {
        let text = "\
**2. Immediate Actions:**
1. Remove infected leaves
2. Burn the debris
- Disinfect tools
**3. Disease Overview:**
- Not filed";
        let tips = parse_disease_tips(text, "Late Blight");
        assert_eq!(
            tips.immediate_actions,
            vec!["Remove infected leaves", "Burn the debris", "Disinfect tools"]
        );
        assert!(tips.cultural_practices.is_empty());
        assert!(tips.chemical_controls.is_empty());
    }

    #[test]
    fn overview_length_counts_characters() {
        // 33 characters but 81 bytes.
        let short = "पत्ती झुलसा रोग का उपचार करें ...";
        assert!(short.chars().count() <= MIN_OVERVIEW_LEN);
        assert!(short.len() > MIN_OVERVIEW_LEN);
        let tips = parse_disease_tips(short, "Leaf Spot");
        assert_eq!(tips.overview, "Leaf Spot: A comprehensive guide for farmers.");
    }
}
