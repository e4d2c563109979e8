//! Naming token engine.
//!
//! Resolves configurable templates into concrete folder and file names for
//! an entity plus its quality attributes. Pure string work: no I/O, no
//! caching, total over every recognized token.

pub mod template;

use once_cell::sync::Lazy;
use regex::Regex;

use sceneline_model::{
    CandidateEntity, CharReplacement, NamingConfig, QualityDetermination,
};

use crate::error::Result;
use template::{Segment, Token};

/// Read-only composite for a single naming resolution call.
///
/// Scoped to one file; templates can change between calls, so contexts are
/// never reused.
#[derive(Debug, Clone, Copy)]
pub struct NamingContext<'a> {
    pub entity: &'a CandidateEntity,
    pub quality: Option<&'a QualityDetermination>,
    pub config: &'a NamingConfig,
}

static EMPTY_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*\]|\(\s*\)").unwrap());
static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s*-\s*){2,}").unwrap());
static TRAILING_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[0-9a-fA-F-]{36}\]$").unwrap());

/// Resolve a template against a context, producing one name component.
pub fn resolve(template: &str, ctx: &NamingContext<'_>) -> Result<String> {
    let rendered = render(template, ctx)?;
    Ok(truncate(&rendered, ctx.config.max_file_len))
}

/// Resolve the folder template down to the leaf folder component.
///
/// Only the leaf entity folder is created relative to the caller-supplied
/// library root, so any path-separator-bearing prefix the template renders
/// is stripped.
pub fn build_folder(ctx: &NamingContext<'_>) -> Result<String> {
    let rendered = render(&ctx.config.folder_template, ctx)?;
    let leaf = rendered
        .split(['/', '\\'])
        .rev()
        .find(|part| !part.trim().is_empty())
        .unwrap_or("")
        .trim()
        .to_string();
    Ok(truncate(&leaf, ctx.config.max_folder_len))
}

fn render(template: &str, ctx: &NamingContext<'_>) -> Result<String> {
    let segments = template::scan(template)?;
    let mut out = String::new();

    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(&text),
            Segment::Token(token) => {
                out.push_str(&resolve_token(token, ctx));
            }
        }
    }

    Ok(cleanup(&out))
}

fn resolve_token(token: Token, ctx: &NamingContext<'_>) -> String {
    let entity = ctx.entity;
    let value = match token {
        Token::Title => entity.title().to_string(),
        Token::CleanTitle => clean_text(entity.title()),
        Token::Year => entity
            .date()
            .map(|d| d.format("%Y").to_string())
            .unwrap_or_default(),
        Token::ReleaseDate => entity
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Token::Studio => entity.studio().unwrap_or_default().to_string(),
        Token::CleanStudio => clean_text(entity.studio().unwrap_or_default()),
        Token::Performer => entity
            .performers()
            .first()
            .cloned()
            .unwrap_or_default(),
        Token::QualityTitle => ctx
            .quality
            .map(|q| q.to_string())
            .unwrap_or_default(),
        Token::QualitySource => ctx
            .quality
            .map(|q| q.source.to_string())
            .unwrap_or_default(),
        // Identifier tokens are emitted verbatim; they carry no illegal
        // characters and must survive truncation.
        Token::Id => return entity.foreign_id().to_string(),
    };
    sanitize(&value, ctx.config.replacement)
}

/// "Clean" token variant: strip punctuation and apostrophes, keep word
/// characters and spaces.
fn clean_text(s: &str) -> String {
    let replaced = s.replace('\'', "").replace('&', "and");
    let stripped: String = replaced
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply the illegal-character replacement policy to a token value.
///
/// Colons follow the configured policy; path separators become '+' so a
/// title never splits a component; the remaining reserved characters and
/// control characters are dropped.
fn sanitize(value: &str, policy: CharReplacement) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' => match policy {
                CharReplacement::Delete => {}
                CharReplacement::Dash => out.push('-'),
                CharReplacement::SpaceDash => out.push_str(" -"),
                CharReplacement::SpaceDashSpace => out.push_str(" - "),
                CharReplacement::Smart => {
                    if chars.peek() == Some(&' ') {
                        out.push_str(" -");
                    }
                    // Otherwise the colon is deleted.
                }
            },
            '/' | '\\' => out.push('+'),
            '<' | '>' | '"' | '|' | '?' | '*' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}

/// Collapse the artifacts left behind by empty token values.
fn cleanup(s: &str) -> String {
    let mut out = EMPTY_BRACKETS.replace_all(s, "").to_string();
    out = SEPARATOR_RUN.replace_all(&out, " - ").to_string();
    out = out.split(['/', '\\']).map(str::trim).collect::<Vec<_>>().join("/");
    let collapsed = out
        .split('/')
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("/");
    collapsed
        .trim_matches(|c: char| {
            c.is_whitespace() || c == '-' || c == '.'
        })
        .to_string()
}

/// Truncate a component to `max` bytes on a char boundary.
///
/// A trailing bracketed identifier is mandatory and survives; the free-text
/// prefix gives way first.
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }

    if let Some(id) = TRAILING_ID.find(s) {
        let suffix = id.as_str();
        if suffix.len() + 1 < max {
            let prefix =
                cut_at_boundary(&s[..id.start()], max - suffix.len() - 1);
            let prefix = prefix.trim_end_matches([' ', '-', '.']);
            return format!("{prefix} {suffix}");
        }
    }

    cut_at_boundary(s, max)
        .trim_end_matches([' ', '-', '.'])
        .to_string()
}

fn cut_at_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sceneline_model::{
        Confidence, ForeignId, QualitySource, Resolution,
    };

    fn scene() -> CandidateEntity {
        CandidateEntity::Scene {
            foreign_id: "4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11"
                .parse()
                .unwrap(),
            title: "Scene Title".to_string(),
            release_date: NaiveDate::from_ymd_opt(2025, 11, 25),
            studio: Some("Example Studio".to_string()),
            performers: vec!["Jane Doe".to_string()],
        }
    }

    fn quality() -> QualityDetermination {
        QualityDetermination {
            source: QualitySource::Web,
            resolution: Some(Resolution::R1080p),
            confidence: Confidence::Name,
        }
    }

    fn ctx<'a>(
        entity: &'a CandidateEntity,
        quality: Option<&'a QualityDetermination>,
        config: &'a NamingConfig,
    ) -> NamingContext<'a> {
        NamingContext {
            entity,
            quality,
            config,
        }
    }

    #[test]
    fn resolves_default_file_template() {
        let entity = scene();
        let quality = quality();
        let config = NamingConfig::default();
        let name = resolve(
            &config.file_template,
            &ctx(&entity, Some(&quality), &config),
        )
        .unwrap();
        assert_eq!(
            name,
            "Example Studio - 2025-11-25 - Scene Title [WEB-DL 1080p]"
        );
    }

    #[test]
    fn resolve_is_idempotent_on_a_fixed_context() {
        let entity = scene();
        let quality = quality();
        let config = NamingConfig::default();
        let context = ctx(&entity, Some(&quality), &config);
        let first = resolve(&config.file_template, &context).unwrap();
        let second = resolve(&config.file_template, &context).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn absent_optional_data_resolves_empty() {
        let entity = CandidateEntity::Scene {
            foreign_id: ForeignId::new(),
            title: "Bare".to_string(),
            release_date: None,
            studio: None,
            performers: vec![],
        };
        let config = NamingConfig::default();
        let name = resolve(
            "{Studio} - {Release Date} - {Title} [{Quality Title}]",
            &ctx(&entity, None, &config),
        )
        .unwrap();
        assert_eq!(name, "Bare");
    }

    #[test]
    fn clean_tokens_strip_punctuation() {
        let entity = CandidateEntity::Scene {
            foreign_id: ForeignId::new(),
            title: "Don't Stop & Go!".to_string(),
            release_date: None,
            studio: Some("O'Reilly's".to_string()),
            performers: vec![],
        };
        let config = NamingConfig::default();
        let name = resolve(
            "{Clean Studio} - {Clean Title}",
            &ctx(&entity, None, &config),
        )
        .unwrap();
        assert_eq!(name, "OReillys - Dont Stop and Go");
    }

    #[test]
    fn smart_colon_policy() {
        let entity = CandidateEntity::Movie {
            foreign_id: ForeignId::new(),
            title: "Title: The Sequel (4:3)".to_string(),
            release_date: None,
            studio: None,
        };
        let config = NamingConfig::default();
        let name =
            resolve("{Title}", &ctx(&entity, None, &config)).unwrap();
        assert_eq!(name, "Title - The Sequel (43)");
    }

    #[test]
    fn dash_colon_policy() {
        let entity = CandidateEntity::Movie {
            foreign_id: ForeignId::new(),
            title: "A:B".to_string(),
            release_date: None,
            studio: None,
        };
        let config = NamingConfig {
            replacement: CharReplacement::Dash,
            ..NamingConfig::default()
        };
        let name =
            resolve("{Title}", &ctx(&entity, None, &config)).unwrap();
        assert_eq!(name, "A-B");
    }

    #[test]
    fn remaining_colon_policies() {
        let cases = [
            (CharReplacement::Delete, "AB"),
            (CharReplacement::SpaceDash, "A -B"),
            (CharReplacement::SpaceDashSpace, "A - B"),
        ];
        for (replacement, expected) in cases {
            let entity = CandidateEntity::Movie {
                foreign_id: ForeignId::new(),
                title: "A:B".to_string(),
                release_date: None,
                studio: None,
            };
            let config = NamingConfig {
                replacement,
                ..NamingConfig::default()
            };
            let name =
                resolve("{Title}", &ctx(&entity, None, &config)).unwrap();
            assert_eq!(name, expected, "policy {replacement:?}");
        }
    }

    #[test]
    fn build_folder_keeps_only_the_leaf() {
        let entity = scene();
        let config = NamingConfig::default();
        let folder = build_folder(&ctx(&entity, None, &config)).unwrap();
        assert_eq!(folder, "Scene Title (2025)");
    }

    #[test]
    fn truncation_protects_trailing_identifier() {
        let entity = CandidateEntity::Scene {
            foreign_id: "4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11"
                .parse()
                .unwrap(),
            title: "T".repeat(300),
            release_date: None,
            studio: None,
            performers: vec![],
        };
        let config = NamingConfig {
            max_file_len: 80,
            ..NamingConfig::default()
        };
        let name = resolve(
            "{Title} [{Id}]",
            &ctx(&entity, None, &config),
        )
        .unwrap();
        assert!(name.len() <= 80, "len was {}", name.len());
        assert!(name.ends_with("[4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11]"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let entity = CandidateEntity::Movie {
            foreign_id: ForeignId::new(),
            title: "é".repeat(200),
            release_date: None,
            studio: None,
        };
        let config = NamingConfig {
            max_file_len: 101,
            ..NamingConfig::default()
        };
        let name =
            resolve("{Title}", &ctx(&entity, None, &config)).unwrap();
        assert!(name.len() <= 101);
        // Would panic at assembly time if a multi-byte char was split.
        assert!(name.chars().all(|c| c == 'é'));
    }

    #[test]
    fn rendered_name_round_trips_identifying_fields() {
        use sceneline_model::ParsedRelease;

        let entity = scene();
        let quality = quality();
        let config = NamingConfig::default();
        let name = resolve(
            &config.file_template,
            &ctx(&entity, Some(&quality), &config),
        )
        .unwrap();

        let reparsed = ParsedRelease::parse(&name);
        assert_eq!(reparsed.title.as_deref(), Some("Scene Title"));
        assert_eq!(reparsed.studio.as_deref(), Some("Example Studio"));
        assert_eq!(reparsed.release_date, entity.date());
    }

    #[test]
    fn unknown_token_surfaces_as_error() {
        let entity = scene();
        let config = NamingConfig::default();
        let err = resolve("{Nope}", &ctx(&entity, None, &config));
        assert!(err.is_err());
    }
}
