//! Candidate matching: strategy selection, provider search, and
//! tie-refusing candidate selection.

use std::path::Path;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use sceneline_model::{
    CandidateEntity, MatchResult, ParsedRelease, SearchStrategy,
};

use crate::error::Result;
use crate::providers::MetadataSearch;

static DATED_FOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})[-_. ](\d{1,2})[-_. ](\d{1,2})(.*)$").unwrap()
});

/// Pick the search strategy for a parsed release, in priority order:
/// dated parent folder, embedded foreign identifier, composed title search.
pub fn select_strategy(parsed: &ParsedRelease, path: &Path) -> SearchStrategy {
    if let Some(strategy) = dated_folder_strategy(path) {
        return strategy;
    }

    if let Some(id) = parsed.foreign_id {
        return SearchStrategy::ForeignId(id);
    }

    let mut parts: Vec<String> = Vec::new();
    if let Some(studio) = &parsed.studio {
        parts.push(clean_term(studio));
    }
    if let Some(date) = parsed.release_date {
        parts.push(date.format("%Y-%m-%d").to_string());
    }
    if let Some(performer) = &parsed.performer {
        parts.push(performer.clone());
    }
    if let Some(title) = &parsed.title {
        parts.push(title.clone());
    }
    if parts.is_empty() {
        parts.push(parsed.release_tokens.clone());
    }

    SearchStrategy::TitleSearch {
        term: parts.join(" "),
    }
}

fn dated_folder_strategy(path: &Path) -> Option<SearchStrategy> {
    let folder = path.parent()?.file_name()?.to_str()?;
    let caps = DATED_FOLDER.captures(folder)?;

    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    let day: u32 = caps.get(3)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let remainder = normalize_separators(caps.get(4)?.as_str());
    let term = if remainder.is_empty() {
        date.format("%Y-%m-%d").to_string()
    } else {
        format!("{} {}", date.format("%Y-%m-%d"), remainder)
    };

    debug!(folder, %date, term, "dated folder strategy selected");
    Some(SearchStrategy::DatedFolder { date, term })
}

/// Match a parsed release against the metadata provider.
///
/// Exactly one surviving candidate is accepted; zero or several survivors
/// never produce a guess. Foreign-identifier hits are authoritative and
/// skip scoring entirely.
pub async fn match_release(
    parsed: &ParsedRelease,
    path: &Path,
    search: &dyn MetadataSearch,
) -> Result<MatchResult> {
    let strategy = select_strategy(parsed, path);

    match &strategy {
        SearchStrategy::ForeignId(id) => {
            let mut candidates = search.search_by_id(*id).await?;
            match candidates.len() {
                1 => {
                    let candidate = candidates.remove(0);
                    info!(%id, title = candidate.title(), "authoritative id match");
                    Ok(MatchResult::matched(candidate, strategy))
                }
                0 => {
                    debug!(%id, "foreign id returned no candidates");
                    Ok(MatchResult::unmatched(strategy))
                }
                n => {
                    info!(%id, candidates = n, "foreign id lookup ambiguous");
                    Ok(MatchResult::ambiguous(strategy))
                }
            }
        }
        SearchStrategy::DatedFolder { date, term } => {
            let title = folder_title(term);
            score(search, &strategy, term, title.as_deref(), Some(*date)).await
        }
        SearchStrategy::TitleSearch { term } => {
            score(
                search,
                &strategy,
                term,
                parsed.title.as_deref(),
                parsed.release_date,
            )
            .await
        }
    }
}

async fn score(
    search: &dyn MetadataSearch,
    strategy: &SearchStrategy,
    term: &str,
    title: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<MatchResult> {
    let mut survivors = filter(search.search_scenes(term).await?, title, date);
    if survivors.is_empty() {
        survivors = filter(search.search_movies(term).await?, title, date);
    }

    match survivors.len() {
        1 => {
            let candidate = survivors.remove(0);
            info!(term, title = candidate.title(), "matched single candidate");
            Ok(MatchResult::matched(candidate, strategy.clone()))
        }
        0 => {
            debug!(term, "no surviving candidates");
            Ok(MatchResult::unmatched(strategy.clone()))
        }
        n => {
            info!(term, survivors = n, "refusing to guess among ties");
            Ok(MatchResult::ambiguous(strategy.clone()))
        }
    }
}

fn filter(
    candidates: Vec<CandidateEntity>,
    title: Option<&str>,
    date: Option<NaiveDate>,
) -> Vec<CandidateEntity> {
    let wanted = title.map(normalize_title);
    candidates
        .into_iter()
        .filter(|c| {
            if let Some(wanted) = &wanted {
                if &normalize_title(c.title()) != wanted {
                    return false;
                }
            }
            match (date, c.date()) {
                (Some(want), Some(have)) => {
                    // Provider dates occasionally differ by a timezone day.
                    (want - have).num_days().abs() <= 1
                }
                _ => true,
            }
        })
        .collect()
}

/// Title portion of a dated-folder search term (everything after the date).
fn folder_title(term: &str) -> Option<String> {
    let rest = term.splitn(2, ' ').nth(1)?.trim();
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

/// Normalization used for title equality: case, punctuation, and
/// apostrophes are insignificant.
pub fn normalize_title(s: &str) -> String {
    let lowered = s.to_lowercase().replace('\'', "").replace('&', "and");
    let stripped: String = lowered
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

/// Case-preserving variant of [`normalize_title`] used when composing
/// provider search terms.
fn clean_term(s: &str) -> String {
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

fn normalize_separators(s: &str) -> String {
    s.replace(['-', '_', '.'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sceneline_model::ForeignId;

    use crate::providers::ProviderResult;

    struct StubSearch {
        scenes: Vec<CandidateEntity>,
        movies: Vec<CandidateEntity>,
    }

    #[async_trait]
    impl MetadataSearch for StubSearch {
        async fn search_movies(
            &self,
            _term: &str,
        ) -> ProviderResult<Vec<CandidateEntity>> {
            Ok(self.movies.clone())
        }

        async fn search_scenes(
            &self,
            _term: &str,
        ) -> ProviderResult<Vec<CandidateEntity>> {
            Ok(self.scenes.clone())
        }

        async fn search_by_id(
            &self,
            id: ForeignId,
        ) -> ProviderResult<Vec<CandidateEntity>> {
            Ok(self
                .scenes
                .iter()
                .filter(|c| c.foreign_id() == id)
                .cloned()
                .collect())
        }
    }

    fn scene(title: &str, date: Option<NaiveDate>) -> CandidateEntity {
        CandidateEntity::Scene {
            foreign_id: ForeignId::new(),
            title: title.to_string(),
            release_date: date,
            studio: Some("Example Studio".to_string()),
            performers: vec![],
        }
    }

    #[test]
    fn dated_folder_term_normalizes_separators() {
        let parsed = ParsedRelease::parse("video.mp4");
        let strategy = select_strategy(
            &parsed,
            Path::new("/library/2025-11-25 - Scene Title/video.mp4"),
        );
        match strategy {
            SearchStrategy::DatedFolder { date, term } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 11, 25).unwrap());
                assert_eq!(term, "2025-11-25 Scene Title");
            }
            other => panic!("expected dated folder, got {other:?}"),
        }
    }

    #[test]
    fn embedded_id_beats_title_search() {
        let parsed = ParsedRelease::parse(
            "Title [stashid-4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11].mp4",
        );
        let strategy = select_strategy(&parsed, Path::new("/library/Title.mp4"));
        assert!(matches!(strategy, SearchStrategy::ForeignId(_)));
    }

    #[tokio::test]
    async fn two_tied_candidates_are_ambiguous() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 25);
        let search = StubSearch {
            scenes: vec![
                scene("Example Title", date),
                scene("Example Title", date),
            ],
            movies: vec![],
        };
        let parsed = ParsedRelease::parse("Studio - Example Title.mp4");
        let result = match_release(
            &parsed,
            Path::new("/library/loose/Studio - Example Title.mp4"),
            &search,
        )
        .await
        .unwrap();
        assert!(result.ambiguous);
        assert!(result.candidate.is_none());
    }

    #[tokio::test]
    async fn single_survivor_is_selected() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 25);
        let search = StubSearch {
            scenes: vec![
                scene("Example Title", date),
                scene("Different Title", date),
            ],
            movies: vec![],
        };
        let parsed = ParsedRelease::parse("Studio - Example Title.mp4");
        let result = match_release(
            &parsed,
            Path::new("/library/loose/Studio - Example Title.mp4"),
            &search,
        )
        .await
        .unwrap();
        let candidate = result.candidate.expect("matched");
        assert_eq!(candidate.title(), "Example Title");
        assert!(!result.ambiguous);
    }

    #[tokio::test]
    async fn authoritative_id_skips_title_scoring() {
        let id: ForeignId = "4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11"
            .parse()
            .unwrap();
        let search = StubSearch {
            scenes: vec![CandidateEntity::Scene {
                foreign_id: id,
                title: "Completely Different Canonical Title".to_string(),
                release_date: None,
                studio: None,
                performers: vec![],
            }],
            movies: vec![],
        };
        let parsed = ParsedRelease::parse(
            "Mislabeled Junk [4f2d4f66-92c4-4b5a-8bd1-7c1a3f0f5a11].mp4",
        );
        let result = match_release(
            &parsed,
            Path::new("/library/loose/whatever.mp4"),
            &search,
        )
        .await
        .unwrap();
        let candidate = result.candidate.expect("authoritative match");
        assert_eq!(candidate.foreign_id(), id);
    }

    #[tokio::test]
    async fn date_mismatch_filters_candidates() {
        let search = StubSearch {
            scenes: vec![scene(
                "Example Title",
                NaiveDate::from_ymd_opt(2020, 1, 1),
            )],
            movies: vec![],
        };
        let parsed =
            ParsedRelease::parse("Studio - 2025-11-25 - Example Title.mp4");
        let result = match_release(
            &parsed,
            Path::new("/library/loose/x.mp4"),
            &search,
        )
        .await
        .unwrap();
        assert!(result.candidate.is_none());
        assert!(!result.ambiguous);
    }

    #[test]
    fn normalization_ignores_case_and_punctuation() {
        assert_eq!(
            normalize_title("Don't Stop!"),
            normalize_title("dont stop")
        );
    }
}
