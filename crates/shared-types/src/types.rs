use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an update was observed.
///
/// The legacy feed names are accepted as aliases so previously stored
/// records keep deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    #[serde(alias = "github_releases")]
    ReleaseFeed,
    #[serde(alias = "anthropic_blog")]
    Blog,
    #[serde(alias = "anthropic_changelog")]
    Changelog,
    #[serde(alias = "anthropic_docs")]
    Docs,
    DocsDiff,
    #[serde(alias = "x_boris")]
    Social,
    #[serde(alias = "youtube_anthropic")]
    Video,
    #[serde(alias = "reddit_claude")]
    Forum,
    #[serde(alias = "discord_anthropic")]
    Chat,
}

impl Source {
    pub const ALL: [Source; 9] = [
        Source::ReleaseFeed,
        Source::Blog,
        Source::Changelog,
        Source::Docs,
        Source::DocsDiff,
        Source::Social,
        Source::Video,
        Source::Forum,
        Source::Chat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::ReleaseFeed => "release_feed",
            Source::Blog => "blog",
            Source::Changelog => "changelog",
            Source::Docs => "docs",
            Source::DocsDiff => "docs_diff",
            Source::Social => "social",
            Source::Video => "video",
            Source::Forum => "forum",
            Source::Chat => "chat",
        }
    }

    fn legacy_name(&self) -> Option<&'static str> {
        match self {
            Source::ReleaseFeed => Some("github_releases"),
            Source::Blog => Some("anthropic_blog"),
            Source::Changelog => Some("anthropic_changelog"),
            Source::Docs => Some("anthropic_docs"),
            Source::DocsDiff => None,
            Source::Social => Some("x_boris"),
            Source::Video => Some("youtube_anthropic"),
            Source::Forum => Some("reddit_claude"),
            Source::Chat => Some("discord_anthropic"),
        }
    }

    /// High-volume, low-signal feed that gets consolidated before analysis.
    pub fn is_release_feed(&self) -> bool {
        matches!(self, Source::ReleaseFeed)
    }

    /// Official, editorially curated announcements.
    pub fn is_editorial(&self) -> bool {
        matches!(self, Source::Blog | Source::Changelog)
    }

    pub fn is_social(&self) -> bool {
        matches!(self, Source::Social)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Source::ALL
            .into_iter()
            .find(|source| source.as_str() == tag || source.legacy_name() == Some(tag.as_str()))
            .ok_or_else(|| ValidationError::UnknownSource(s.to_string()))
    }
}

/// Rejection reasons for records arriving from a fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Unknown source tag: {0}")]
    UnknownSource(String),
}

/// One observed announcement, validated and ready for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub source: Source,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub url: String,
    /// ISO-8601 when the producer knew it; may be empty or malformed.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl UpdateRecord {
    pub fn new(source: Source, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source,
            title: title.into(),
            content: content.into(),
            url: String::new(),
            date: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedup_tags(tags.into_iter().map(Into::into));
        self
    }

    /// Lower-cased `title content`, the text every heuristic works on.
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.content).to_lowercase()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Best-effort parse of `date`.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_loose_date(&self.date)
    }

    /// Records with a missing or unparseable date are always inside the window.
    pub fn is_within_window(&self, days_back: u32, now: DateTime<Utc>) -> bool {
        match self.published_at() {
            Some(published) => published >= now - Duration::days(i64::from(days_back)),
            None => true,
        }
    }
}

/// Untrusted record shape as produced by fetchers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUpdate {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl TryFrom<RawUpdate> for UpdateRecord {
    type Error = ValidationError;

    fn try_from(raw: RawUpdate) -> Result<Self, Self::Error> {
        if raw.source.trim().is_empty() {
            return Err(ValidationError::MissingField("source"));
        }
        let source: Source = raw.source.parse()?;

        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::MissingField("title"))?;

        // Producers that only have a headline leave the body empty
        let content = raw
            .content
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| title.clone());

        Ok(UpdateRecord {
            source,
            title,
            content,
            url: raw.url.unwrap_or_default().trim().to_string(),
            date: raw.date.unwrap_or_default().trim().to_string(),
            tags: dedup_tags(raw.tags.unwrap_or_default()),
        })
    }
}

fn dedup_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn parse_loose_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn raw(source: &str, title: Option<&str>) -> RawUpdate {
        RawUpdate {
            source: source.to_string(),
            title: title.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_source_accepts_legacy_names() {
        assert_eq!("github_releases".parse::<Source>(), Ok(Source::ReleaseFeed));
        assert_eq!("x_boris".parse::<Source>(), Ok(Source::Social));
        assert_eq!("blog".parse::<Source>(), Ok(Source::Blog));

        let parsed: Source = serde_json::from_str("\"anthropic_changelog\"").unwrap();
        assert_eq!(parsed, Source::Changelog);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"changelog\"");
    }

    #[test]
    fn test_validation_rejects_unknown_source() {
        let err = UpdateRecord::try_from(raw("mailing_list", Some("Hi"))).unwrap_err();
        assert_eq!(err, ValidationError::UnknownSource("mailing_list".to_string()));
    }

    #[test]
    fn test_validation_rejects_blank_title() {
        let err = UpdateRecord::try_from(raw("blog", Some("   "))).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("title"));

        let err = UpdateRecord::try_from(raw("", Some("Title"))).unwrap_err();
        assert_eq!(err, ValidationError::MissingField("source"));
    }

    #[test]
    fn test_validation_fills_content_and_dedups_tags() {
        let mut input = raw("forum", Some("Plan mode tips"));
        input.tags = Some(vec!["mcp".into(), "mcp".into(), " hooks ".into(), "".into()]);

        let record = UpdateRecord::try_from(input).unwrap();
        assert_eq!(record.content, "Plan mode tips");
        assert_eq!(record.tags, vec!["mcp".to_string(), "hooks".to_string()]);
    }

    #[test]
    fn test_combined_text_is_lowercase() {
        let record = UpdateRecord::new(Source::Blog, "Agent SDK", "Now GA");
        assert_eq!(record.combined_text(), "agent sdk now ga");
    }

    #[test]
    fn test_date_window_is_permissive() {
        let now = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();

        let recent = UpdateRecord::new(Source::Blog, "a", "b").with_date("2026-02-08");
        let stale = UpdateRecord::new(Source::Blog, "a", "b").with_date("2026-01-01T00:00:00Z");
        let garbage = UpdateRecord::new(Source::Blog, "a", "b").with_date("last tuesday");
        let missing = UpdateRecord::new(Source::Blog, "a", "b");
        let rss = UpdateRecord::new(Source::Blog, "a", "b").with_date("Mon, 09 Feb 2026 08:00:00 +0000");

        assert!(recent.is_within_window(7, now));
        assert!(!stale.is_within_window(7, now));
        assert!(garbage.is_within_window(7, now));
        assert!(missing.is_within_window(7, now));
        assert!(rss.is_within_window(7, now));
    }
}
