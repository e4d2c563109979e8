//! Canonical entities returned by metadata search and stored in the library.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::ids::ForeignId;

/// A search result from the metadata provider.
///
/// Union over the entity kinds the provider can return. Every variant
/// carries a stable foreign identifier and a displayable title.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CandidateEntity {
    Movie {
        foreign_id: ForeignId,
        title: String,
        release_date: Option<NaiveDate>,
        studio: Option<String>,
    },
    Scene {
        foreign_id: ForeignId,
        title: String,
        release_date: Option<NaiveDate>,
        studio: Option<String>,
        performers: Vec<String>,
    },
    Performer {
        foreign_id: ForeignId,
        name: String,
    },
    Studio {
        foreign_id: ForeignId,
        name: String,
    },
}

impl CandidateEntity {
    pub fn foreign_id(&self) -> ForeignId {
        match self {
            CandidateEntity::Movie { foreign_id, .. }
            | CandidateEntity::Scene { foreign_id, .. }
            | CandidateEntity::Performer { foreign_id, .. }
            | CandidateEntity::Studio { foreign_id, .. } => *foreign_id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            CandidateEntity::Movie { title, .. }
            | CandidateEntity::Scene { title, .. } => title,
            CandidateEntity::Performer { name, .. }
            | CandidateEntity::Studio { name, .. } => name,
        }
    }

    /// Release/air date, where the entity kind has one.
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            CandidateEntity::Movie { release_date, .. }
            | CandidateEntity::Scene { release_date, .. } => *release_date,
            CandidateEntity::Performer { .. }
            | CandidateEntity::Studio { .. } => None,
        }
    }

    pub fn studio(&self) -> Option<&str> {
        match self {
            CandidateEntity::Movie { studio, .. }
            | CandidateEntity::Scene { studio, .. } => studio.as_deref(),
            CandidateEntity::Studio { name, .. } => Some(name),
            CandidateEntity::Performer { .. } => None,
        }
    }

    pub fn performers(&self) -> &[String] {
        match self {
            CandidateEntity::Scene { performers, .. } => performers,
            _ => &[],
        }
    }
}

/// An entity persisted in the library, together with the file backing it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LibraryEntity {
    pub foreign_id: ForeignId,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub studio: Option<String>,
    pub path: Option<PathBuf>,
}

impl LibraryEntity {
    pub fn from_candidate(candidate: &CandidateEntity) -> Self {
        Self {
            foreign_id: candidate.foreign_id(),
            title: candidate.title().to_string(),
            release_date: candidate.date(),
            studio: candidate.studio().map(str::to_string),
            path: None,
        }
    }
}
