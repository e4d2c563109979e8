//! Match results, decisions, and the subject a decision chain evaluates.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::entities::CandidateEntity;
use crate::ids::ForeignId;
use crate::quality::QualityDetermination;
use crate::release::ParsedRelease;

/// How the matcher arrived at its candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStrategy {
    /// The file sits inside a dated folder; the folder name is the search
    /// term and the folder date the release date.
    DatedFolder {
        date: NaiveDate,
        term: String,
    },
    /// A stable foreign identifier was embedded in the name. Authoritative,
    /// exempt from scoring.
    ForeignId(ForeignId),
    /// Composed fuzzy title search.
    TitleSearch {
        term: String,
    },
}

/// Outcome of matching one parsed release against the metadata provider.
///
/// `ambiguous` is set when more than one candidate ties for best score.
/// The matcher never guesses among ties.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchResult {
    pub candidate: Option<CandidateEntity>,
    pub ambiguous: bool,
    pub strategy: SearchStrategy,
}

impl MatchResult {
    pub fn matched(candidate: CandidateEntity, strategy: SearchStrategy) -> Self {
        Self {
            candidate: Some(candidate),
            ambiguous: false,
            strategy,
        }
    }

    pub fn unmatched(strategy: SearchStrategy) -> Self {
        Self {
            candidate: None,
            ambiguous: false,
            strategy,
        }
    }

    pub fn ambiguous(strategy: SearchStrategy) -> Self {
        Self {
            candidate: None,
            ambiguous: true,
            strategy,
        }
    }
}

/// Whether a rejection may be retried after external state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RejectionType {
    /// Never retried against the same input.
    Permanent,
    /// May be retried after a config toggle or similar.
    Temporary,
}

/// Verdict of a single rule or of the whole decision chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub accepted: bool,
    pub reason: Option<String>,
    pub rejection_type: Option<RejectionType>,
}

impl Decision {
    pub fn accept() -> Self {
        Self {
            accepted: true,
            reason: None,
            rejection_type: None,
        }
    }

    pub fn reject(reason: impl Into<String>, rejection_type: RejectionType) -> Self {
        Self {
            accepted: false,
            reason: Some(reason.into()),
            rejection_type: Some(rejection_type),
        }
    }
}

/// The candidate file under evaluation by the decision chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportSubject {
    pub path: PathBuf,
    pub size: u64,
    /// Probed runtime in seconds, when media inspection ran.
    pub runtime: Option<f64>,
    pub release: ParsedRelease,
    pub candidate: Option<CandidateEntity>,
    pub quality: QualityDetermination,
}
