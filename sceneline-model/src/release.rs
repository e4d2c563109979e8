//! Permissive release parsing.
//!
//! A [`ParsedRelease`] is extracted once per file and never mutated. Parsing
//! never fails: when nothing in the name is recognizable the release tokens
//! still echo the raw name and every other field stays empty.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ids::ForeignId;
use crate::quality::{QualitySource, Resolution};

static EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(mkv|mp4|avi|mov|wmv|flv|webm|m4v|mpg|mpeg|ts)$").unwrap()
});

static EMBEDDED_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\[(?:stash(?:id)?[-_ ]?)?([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})\]",
    )
    .unwrap()
});

static BRACKET_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());

static RELEASE_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})[-_. ](\d{1,2})[-_. ](\d{1,2})").unwrap()
});

// Everything from the first quality/format token onward is noise for the
// title fragment.
static QUALITY_CUTOFF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\s*[\(\[]?\s*(BluRay|BDRip|BRRip|WEBRip|WEB-?DL|HDTV|SDTV|DVDRip|DVD|HDRip|x264|x265|h264|h265|hevc|10\s*bit|HDR10?|AC3|AAC|DTS|Remux|VR180|VR|4320p|2160p|1080p|720p|576p|480p|[456]K|UHD)\b.*$",
    )
    .unwrap()
});

static SOURCE_TOKENS: &[(&str, QualitySource)] = &[
    ("webrip", QualitySource::WebRip),
    ("web-dl", QualitySource::Web),
    ("webdl", QualitySource::Web),
    ("web", QualitySource::Web),
    ("bluray", QualitySource::Bluray),
    ("blu-ray", QualitySource::Bluray),
    ("bdrip", QualitySource::Bluray),
    ("dvdrip", QualitySource::Dvd),
    ("dvd", QualitySource::Dvd),
    ("hdtv", QualitySource::Television),
    ("sdtv", QualitySource::Television),
    ("vr180", QualitySource::Vr),
    ("vr", QualitySource::Vr),
];

// Sample markers stay visible in the raw tokens (the decision chain keys
// on them) but are noise for title matching.
static SAMPLE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[\s._-]sample\b").unwrap());

static RESOLUTION_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(4320p|2160p|1080p|720p|576p|480p|[4568]K|UHD)\b").unwrap()
});

/// Immutable record extracted from a raw filename or folder string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedRelease {
    /// The raw tokens this release was parsed from. Never empty.
    pub release_tokens: String,
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub performer: Option<String>,
    pub studio: Option<String>,
    pub foreign_id: Option<ForeignId>,
}

impl ParsedRelease {
    /// Parse a raw release name permissively. Never fails.
    pub fn parse(raw: &str) -> Self {
        let release_tokens = if raw.trim().is_empty() {
            "(unparsed)".to_string()
        } else {
            raw.to_string()
        };

        let mut working = EXTENSION.replace(raw.trim(), "").to_string();

        let foreign_id = EMBEDDED_ID
            .captures(&working)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<ForeignId>().ok());
        working = EMBEDDED_ID.replace_all(&working, " ").to_string();
        working = BRACKET_NOISE.replace_all(&working, " ").to_string();

        let release_date = extract_date(&working);

        let (studio, performer, title) = split_segments(&working, release_date);

        ParsedRelease {
            release_tokens,
            title,
            release_date,
            performer,
            studio,
            foreign_id,
        }
    }

    /// Resolution rung named in the raw tokens, if any.
    pub fn resolution_token(&self) -> Option<Resolution> {
        RESOLUTION_TOKEN
            .find(&self.release_tokens)
            .and_then(|m| Resolution::from_token(m.as_str()))
    }

    /// Source named in the raw tokens, if any. Longer tokens are checked
    /// first so "webrip" does not read as plain web.
    pub fn source_token(&self) -> QualitySource {
        let lower = self.release_tokens.to_ascii_lowercase();
        for (token, source) in SOURCE_TOKENS {
            if lower.contains(token) {
                return *source;
            }
        }
        QualitySource::Unknown
    }
}

fn extract_date(s: &str) -> Option<NaiveDate> {
    let caps = RELEASE_DATE.captures(s)?;
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Split a `Studio - Date - Performer - Title` style name into its parts.
///
/// Names without ` - ` groups fall back to treating the whole cleaned
/// string as the title fragment.
fn split_segments(
    working: &str,
    date: Option<NaiveDate>,
) -> (Option<String>, Option<String>, Option<String>) {
    let parts: Vec<&str> = working
        .split(" - ")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() < 2 {
        return (None, None, clean_fragment(working));
    }

    let studio = clean_fragment(parts[0]);
    let date_idx = date.and_then(|_| {
        parts.iter().position(|p| RELEASE_DATE.is_match(p))
    });

    let (performer, title) = match date_idx {
        Some(idx) => {
            let after = &parts[idx + 1..];
            match after {
                [] => (None, None),
                [title] => (None, clean_fragment(title)),
                [performer, rest @ ..] => {
                    // Last segment is the title, first after the date the
                    // credited performer.
                    let title = rest.last().copied().unwrap_or(performer);
                    (clean_fragment(performer), clean_fragment(title))
                }
            }
        }
        None => (None, clean_fragment(parts[parts.len() - 1])),
    };

    (studio, performer, title)
}

/// Strip quality noise and separator artifacts from a free-text fragment.
fn clean_fragment(raw: &str) -> Option<String> {
    let mut cleaned = QUALITY_CUTOFF.replace(raw, "").to_string();
    cleaned = SAMPLE_MARKER.replace_all(&cleaned, " ").to_string();
    cleaned = RELEASE_DATE.replace_all(&cleaned, " ").to_string();
    cleaned = cleaned.replace(['.', '_'], " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = cleaned
        .trim_matches(|c: char| c.is_whitespace() || c == '-' || c == '_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_scene_name() {
        let parsed = ParsedRelease::parse(
            "Example Studio - 2025-11-25 - Jane Doe - Scene Title 1080p WEB-DL.mp4",
        );
        assert_eq!(parsed.studio.as_deref(), Some("Example Studio"));
        assert_eq!(
            parsed.release_date,
            NaiveDate::from_ymd_opt(2025, 11, 25)
        );
        assert_eq!(parsed.performer.as_deref(), Some("Jane Doe"));
        assert_eq!(parsed.title.as_deref(), Some("Scene Title"));
        assert_eq!(parsed.foreign_id, None);
        assert_eq!(parsed.resolution_token(), Some(Resolution::R1080p));
        assert_eq!(parsed.source_token(), QualitySource::Web);
    }

    #[test]
    fn embedded_foreign_id_is_extracted() {
        let parsed = ParsedRelease::parse(
            "Scene Title [stashid-4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11].mp4",
        );
        let id = parsed.foreign_id.expect("foreign id");
        assert_eq!(
            id.to_string(),
            "4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11"
        );
        assert_eq!(parsed.title.as_deref(), Some("Scene Title"));
    }

    #[test]
    fn unparseable_name_echoes_raw_tokens() {
        let parsed = ParsedRelease::parse("x264.1080p.mkv");
        assert!(!parsed.release_tokens.is_empty());
        assert_eq!(parsed.release_tokens, "x264.1080p.mkv");
        assert_eq!(parsed.studio, None);
        assert_eq!(parsed.release_date, None);
    }

    #[test]
    fn empty_input_still_has_tokens() {
        let parsed = ParsedRelease::parse("");
        assert!(!parsed.release_tokens.is_empty());
    }

    #[test]
    fn dotted_date_is_recognized() {
        let parsed =
            ParsedRelease::parse("Studio - 2024.03.09 - Another Title.mkv");
        assert_eq!(
            parsed.release_date,
            NaiveDate::from_ymd_opt(2024, 3, 9)
        );
        assert_eq!(parsed.title.as_deref(), Some("Another Title"));
    }

    #[test]
    fn invalid_calendar_date_is_ignored() {
        let parsed = ParsedRelease::parse("Studio - 2024-13-40 - Title.mkv");
        assert_eq!(parsed.release_date, None);
    }

    #[test]
    fn sample_marker_is_title_noise_but_stays_in_tokens() {
        let parsed =
            ParsedRelease::parse("Studio - Scene Title-sample.mp4");
        assert_eq!(parsed.title.as_deref(), Some("Scene Title"));
        assert!(parsed.release_tokens.contains("sample"));
    }

    #[test]
    fn webrip_is_not_plain_web() {
        let parsed = ParsedRelease::parse("Studio - Title WEBRip.mp4");
        assert_eq!(parsed.source_token(), QualitySource::WebRip);
    }
}
