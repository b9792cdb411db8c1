//! Labeled-section extraction for generated advice text.
//!
//! Advice prompts ask the model to answer under fixed headings such as
//! `**NEXT CROP:**` or `SYMPTOMS TO WATCH:`. A [`SectionLayout`] knows the
//! full set of headings for one prompt template and slices a response into
//! the content between them. The list helpers then turn a section body into
//! clean items.
//!
//! Everything here is pure: no I/O and no failure paths. Callers decide what
//! a missing section means.

use std::sync::LazyLock;

use regex::Regex;

/// A numbered list marker at line start: one or two digits, a dot, whitespace.
static NUMBERED_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d{1,2}\.\s+").expect("valid regex"));

/// A bullet list marker at line start (`-`, `*` or `•` followed by whitespace).
static BULLET_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-•*]\s+").expect("valid regex"));

// ---------------------------------------------------------------------------
// Section layout
// ---------------------------------------------------------------------------

/// The ordered set of headings a prompt template asks the model to use.
///
/// Labels that are never read (e.g. a trailing `ADDITIONAL NOTES`) still
/// belong in the layout: they terminate the section before them.
pub struct SectionLayout {
    headings: Vec<(&'static str, Regex)>,
}

impl SectionLayout {
    /// Compile a heading matcher for each label.
    ///
    /// A heading is the label at the start of a line, case-insensitive,
    /// optionally wrapped in markdown decoration (`**`, `#`, `_`, `>`) or
    /// numbered (`1. `), and followed by a colon. Only a closing bold marker
    /// is consumed after the colon, so emphasis on the body survives.
    pub fn new(labels: &[&'static str]) -> Self {
        let headings = labels
            .iter()
            .map(|label| (*label, heading_regex(label)))
            .collect();
        Self { headings }
    }

    /// Slice `text` into the sections this layout knows about.
    ///
    /// The first occurrence of each heading wins. A section runs until the
    /// next occurrence of any known heading, or the end of the text.
    pub fn extract<'t>(&self, text: &'t str) -> Sections<'t> {
        let mut boundaries: Vec<usize> = self
            .headings
            .iter()
            .flat_map(|(_, re)| re.find_iter(text).map(|m| m.start()))
            .collect();
        boundaries.sort_unstable();

        let found = self
            .headings
            .iter()
            .filter_map(|(label, re)| {
                let heading = re.find(text)?;
                let body_start = heading.end();
                let body_end = boundaries
                    .iter()
                    .copied()
                    .find(|&b| b >= body_start)
                    .unwrap_or(text.len());
                Some((*label, text[body_start..body_end].trim()))
            })
            .collect();

        Sections { found }
    }
}

fn heading_regex(label: &str) -> Regex {
    let words: Vec<String> = label.split_whitespace().map(regex::escape).collect();
    let pattern = format!(
        r"(?im)^[ \t>#*_]*(?:\d{{1,2}}\.[ \t]+[ \t>#*_]*)?{}[ \t*_]*:[ \t]*(?:\*\*|__)?[ \t]*",
        words.join(r"[ \t]+")
    );
    Regex::new(&pattern).expect("escaped label forms a valid regex")
}

/// Section bodies located in one response, keyed by label.
#[derive(Debug)]
pub struct Sections<'t> {
    found: Vec<(&'static str, &'t str)>,
}

impl<'t> Sections<'t> {
    /// Trimmed body of the section, or `None` if its heading never appeared.
    ///
    /// A heading followed directly by another heading yields `Some("")`.
    pub fn get(&self, label: &str) -> Option<&'t str> {
        self.found
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, body)| *body)
    }

    /// Like [`Sections::get`], but treats an empty body as absent.
    pub fn non_empty(&self, label: &str) -> Option<&'t str> {
        self.get(label).filter(|body| !body.is_empty())
    }
}

// ---------------------------------------------------------------------------
// List and text helpers
// ---------------------------------------------------------------------------

/// Split a section body into list items.
///
/// Numbered markers (`1. `) take precedence; when none are present, bullet
/// markers are used instead. Text before the first marker is dropped and
/// continuation lines are folded into the current item. Items are cleaned
/// with [`clean_item`] and empty ones removed.
pub fn list_items(section: &str) -> Vec<String> {
    let numbered = split_on_marker(section, &NUMBERED_MARKER_RE);
    if !numbered.is_empty() {
        return numbered;
    }
    split_on_marker(section, &BULLET_MARKER_RE)
}

fn split_on_marker(section: &str, marker: &Regex) -> Vec<String> {
    let mut raw_items: Vec<String> = Vec::new();
    let mut current: Option<String> = None;

    for line in section.lines() {
        if let Some(m) = marker.find(line) {
            if let Some(item) = current.take() {
                raw_items.push(item);
            }
            current = Some(line[m.end()..].to_string());
        } else if let Some(item) = current.as_mut() {
            item.push('\n');
            item.push_str(line);
        }
    }
    raw_items.extend(current);

    raw_items
        .iter()
        .map(|item| clean_item(item))
        .filter(|item| !item.is_empty())
        .collect()
}

/// Remove markdown bold markers and collapse internal whitespace.
pub fn clean_item(text: &str) -> String {
    collapse_whitespace(&strip_bold(text))
}

/// Remove `**` bold markers. Single asterisks are left untouched.
pub fn strip_bold(text: &str) -> String {
    text.replace("**", "")
}

/// Collapse every run of whitespace (including newlines) into one space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max` non-empty lines, trimmed and joined with `\n`.
pub fn limit_lines(text: &str, max: usize) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> SectionLayout {
        SectionLayout::new(&["NEXT CROP", "JUSTIFICATION", "ADVANTAGES", "NOTES"])
    }

    #[test]
    fn extracts_bold_headings_with_inline_content() {
        let text = "**NEXT CROP:** Soybean\n\n**JUSTIFICATION:** Fixes nitrogen.\n";
        let sections = layout().extract(text);
        assert_eq!(sections.get("NEXT CROP"), Some("Soybean"));
        assert_eq!(sections.get("JUSTIFICATION"), Some("Fixes nitrogen."));
        assert_eq!(sections.get("ADVANTAGES"), None);
    }

    #[test]
    fn headings_are_case_insensitive() {
        let text = "next crop: Mustard\njustification: dry season";
        let sections = layout().extract(text);
        assert_eq!(sections.get("NEXT CROP"), Some("Mustard"));
        assert_eq!(sections.get("JUSTIFICATION"), Some("dry season"));
    }

    #[test]
    fn tolerates_markdown_heading_variants() {
        let text = "## NEXT CROP:\nGram\n**JUSTIFICATION**: legumes restore soil";
        let sections = layout().extract(text);
        assert_eq!(sections.get("NEXT CROP"), Some("Gram"));
        assert_eq!(sections.get("JUSTIFICATION"), Some("legumes restore soil"));
    }

    #[test]
    fn emphasis_on_the_heading_line_is_kept() {
        let text = "**NEXT CROP:** *Soybean*\n**JUSTIFICATION:** _legume_\n";
        let sections = layout().extract(text);
        assert_eq!(sections.get("NEXT CROP"), Some("*Soybean*"));
        assert_eq!(sections.get("JUSTIFICATION"), Some("_legume_"));
        assert_eq!(clean_item(sections.get("NEXT CROP").unwrap()), "*Soybean*");
    }

    #[test]
    fn numbered_headings_are_recognised() {
        let text = "1. **NEXT CROP:** Soybean\n**2. JUSTIFICATION:** fixes nitrogen";
        let sections = layout().extract(text);
        assert_eq!(sections.get("NEXT CROP"), Some("Soybean"));
        assert_eq!(sections.get("JUSTIFICATION"), Some("fixes nitrogen"));
    }

    #[test]
    fn multi_line_section_runs_until_next_heading() {
        let text = "**JUSTIFICATION:** line one\nline two\n\n**NOTES:** trailing";
        let sections = layout().extract(text);
        assert_eq!(sections.get("JUSTIFICATION"), Some("line one\nline two"));
        assert_eq!(sections.get("NOTES"), Some("trailing"));
    }

    #[test]
    fn sections_may_appear_out_of_order() {
        let text = "JUSTIFICATION: why\nNEXT CROP: Maize";
        let sections = layout().extract(text);
        assert_eq!(sections.get("NEXT CROP"), Some("Maize"));
        assert_eq!(sections.get("JUSTIFICATION"), Some("why"));
    }

    #[test]
    fn label_mentioned_mid_sentence_is_not_a_heading() {
        let text = "We discuss the next crop: later.\nNEXT CROP: Rice";
        let sections = layout().extract(text);
        assert_eq!(sections.get("NEXT CROP"), Some("Rice"));
    }

    #[test]
    fn empty_section_is_present_but_not_non_empty() {
        let text = "NEXT CROP:\nJUSTIFICATION: text";
        let sections = layout().extract(text);
        assert_eq!(sections.get("NEXT CROP"), Some(""));
        assert_eq!(sections.non_empty("NEXT CROP"), None);
    }

    #[test]
    fn numbered_items_are_split_in_order() {
        assert_eq!(list_items("1. A\n2. B\n3. C"), vec!["A", "B", "C"]);
    }

    #[test]
    fn numbered_items_strip_bold_and_collapse_whitespace() {
        let section = "1. **Nitrogen fixation:** adds   N\n   to the soil\n2. **Pest break**";
        assert_eq!(
            list_items(section),
            vec!["Nitrogen fixation: adds N to the soil", "Pest break"]
        );
    }

    #[test]
    fn decimal_numbers_do_not_start_items() {
        let section = "1. Apply\n1.5 kg per acre\n2. Water";
        assert_eq!(list_items(section), vec!["Apply 1.5 kg per acre", "Water"]);
    }

    #[test]
    fn years_do_not_start_items() {
        let section = "1. Plant wheat in\n2024. then rotate\n2. Plant gram";
        assert_eq!(
            list_items(section),
            vec!["Plant wheat in 2024. then rotate", "Plant gram"]
        );
    }

    #[test]
    fn single_asterisks_survive_cleaning() {
        assert_eq!(clean_item("ratio 2*3 is **fine**"), "ratio 2*3 is fine");
    }

    #[test]
    fn falls_back_to_bullets_when_not_numbered() {
        let section = "Intro line\n- first\n* second\n• third";
        assert_eq!(list_items(section), vec!["first", "second", "third"]);
    }

    #[test]
    fn text_before_first_marker_is_ignored() {
        assert_eq!(list_items("Here they are:\n1. X"), vec!["X"]);
    }

    #[test]
    fn no_markers_yields_no_items() {
        assert!(list_items("just prose").is_empty());
    }

    #[test]
    fn limit_lines_keeps_first_non_empty_lines() {
        let text = "a\n\nb\n c \nd\ne\nf";
        assert_eq!(limit_lines(text, 4), "a\nb\nc\nd");
    }
}
