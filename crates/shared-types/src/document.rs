//! Section view over a curriculum markdown document.
//!
//! Two heading families delimit sections: `## WEEK <n>: Title` and
//! `## Appendix <Letter>: Title`. Every section runs from its heading to the
//! next heading of either family, so sections never overlap and
//! `preamble + sections` reconstructs the text exactly.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use crate::gap::{SectionKey, NEW_SECTION};

lazy_static! {
    static ref WEEK_HEADING: Regex =
        Regex::new(r"(?mi)^#{1,3}[ \t]+week[ \t]+(\d+)\b[ \t]*[:\-—]?[ \t]*(.*)$").unwrap();
    static ref APPENDIX_HEADING: Regex =
        Regex::new(r"(?m)^#{1,3}[ \t]+(?:Appendix|APPENDIX)[ \t]+([A-Z])\b[ \t]*[:\-—]?[ \t]*(.*)$")
            .unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLabel {
    Week(u32),
    Appendix(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Week number, or `NEW_SECTION` for appendices.
    pub key: SectionKey,
    pub label: SectionLabel,
    pub title: String,
    /// Byte range of the heading line (without its newline).
    pub heading: Range<usize>,
    /// Byte range from heading start to the next section heading or EOF.
    pub span: Range<usize>,
}

impl Section {
    /// Title as shown in reports and index results.
    pub fn display_title(&self) -> String {
        match self.label {
            SectionLabel::Week(n) if self.title.is_empty() => format!("Week {}", n),
            SectionLabel::Week(n) => format!("Week {}: {}", n, self.title),
            SectionLabel::Appendix(letter) if self.title.is_empty() => {
                format!("Appendix {}", letter)
            }
            SectionLabel::Appendix(letter) => format!("Appendix {}: {}", letter, self.title),
        }
    }
}

/// A fixed topic-map entry that describes what a week is expected to teach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicEntry {
    pub key: SectionKey,
    pub title: &'static str,
    pub phase: &'static str,
    pub topics: &'static [&'static str],
}

/// Borrowed, read-only section index over a document.
#[derive(Debug, Clone)]
pub struct ReferenceDocument<'a> {
    text: &'a str,
    sections: Vec<Section>,
}

impl<'a> ReferenceDocument<'a> {
    pub fn parse(text: &'a str) -> Self {
        let mut headings: Vec<(Range<usize>, SectionKey, SectionLabel, String)> = Vec::new();

        for caps in WEEK_HEADING.captures_iter(text) {
            let (Some(whole), Some(num)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Ok(week) = num.as_str().parse::<u32>() else {
                continue;
            };
            let title = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            headings.push((whole.range(), week, SectionLabel::Week(week), title.to_string()));
        }

        for caps in APPENDIX_HEADING.captures_iter(text) {
            let (Some(whole), Some(letter)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let Some(letter) = letter.as_str().chars().next() else {
                continue;
            };
            let title = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
            headings.push((
                whole.range(),
                NEW_SECTION,
                SectionLabel::Appendix(letter),
                title.to_string(),
            ));
        }

        headings.sort_by_key(|(range, ..)| range.start);

        let mut sections = Vec::with_capacity(headings.len());
        for (i, (heading, key, label, title)) in headings.iter().enumerate() {
            let end = headings
                .get(i + 1)
                .map(|(next, ..)| next.start)
                .unwrap_or(text.len());
            sections.push(Section {
                key: *key,
                label: *label,
                title: title.clone(),
                heading: heading.clone(),
                span: heading.start..end,
            });
        }

        Self { text, sections }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Everything before the first recognised heading.
    pub fn preamble(&self) -> &'a str {
        let end = self
            .sections
            .first()
            .map(|s| s.span.start)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    /// Heading plus body.
    pub fn section_text(&self, section: &Section) -> &'a str {
        &self.text[section.span.clone()]
    }

    /// Body only, excluding the heading line.
    pub fn body(&self, section: &Section) -> &'a str {
        &self.text[section.heading.end..section.span.end]
    }

    pub fn find_week(&self, week: u32) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| s.label == SectionLabel::Week(week))
    }
}
