//! Quality ladder, signals, and the fused determination.
//!
//! Resolution is a closed ladder: probed pixel counts are mapped onto a
//! named rung and never leak through as raw dimensions.

use std::fmt;

/// One discrete level in the resolution ladder.
///
/// Variants are ordered lowest to highest so `Ord` matches the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Resolution {
    R480p,
    R576p,
    R720p,
    R1080p,
    R2160p,
    R5k,
    /// 6K off a RED sensor (wider, shorter frame than the BMD rung).
    R6kRed,
    /// 6K off a Blackmagic sensor (taller frame).
    R6kBmd,
    R4320p,
}

impl Resolution {
    /// Map probed dimensions onto the ladder.
    ///
    /// Returns `None` when neither dimension is positive - callers must be
    /// able to tell "not measurable" apart from the 480p floor.
    ///
    /// Rungs above 4K require both dimensions to cross the bar; 4K and
    /// below accept either dimension, which tolerates anamorphic and
    /// cropped sources.
    pub fn from_dimensions(width: i32, height: i32) -> Option<Resolution> {
        if width <= 0 && height <= 0 {
            return None;
        }

        let rung = if width >= 7500 && height >= 4300 {
            Resolution::R4320p
        } else if width >= 6000 && height >= 3300 {
            Resolution::R6kBmd
        } else if width >= 6100 && height >= 3100 {
            Resolution::R6kRed
        } else if width >= 5100 && height >= 2800 {
            Resolution::R5k
        } else if width >= 3200 || height >= 2100 {
            Resolution::R2160p
        } else if width >= 1800 || height >= 1000 {
            Resolution::R1080p
        } else if width >= 1200 || height >= 700 {
            Resolution::R720p
        } else if width >= 1000 || height >= 560 {
            Resolution::R576p
        } else {
            Resolution::R480p
        };

        Some(rung)
    }

    /// Parse a named rung token as it appears in release names.
    pub fn from_token(token: &str) -> Option<Resolution> {
        match token.to_ascii_lowercase().as_str() {
            "480p" => Some(Resolution::R480p),
            "576p" => Some(Resolution::R576p),
            "720p" => Some(Resolution::R720p),
            "1080p" => Some(Resolution::R1080p),
            "2160p" | "4k" | "uhd" => Some(Resolution::R2160p),
            "5k" => Some(Resolution::R5k),
            "6k" => Some(Resolution::R6kRed),
            "4320p" | "8k" => Some(Resolution::R4320p),
            _ => None,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Resolution::R480p => "480p",
            Resolution::R576p => "576p",
            Resolution::R720p => "720p",
            Resolution::R1080p => "1080p",
            Resolution::R2160p => "2160p",
            Resolution::R5k => "5K",
            Resolution::R6kRed => "6K RED",
            Resolution::R6kBmd => "6K BMD",
            Resolution::R4320p => "4320p",
        };
        write!(f, "{label}")
    }
}

/// Where a release was sourced from, independent of its resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QualitySource {
    #[default]
    Unknown,
    Television,
    Dvd,
    WebRip,
    Web,
    Bluray,
    Vr,
}

impl fmt::Display for QualitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QualitySource::Unknown => "Unknown",
            QualitySource::Television => "TV",
            QualitySource::Dvd => "DVD",
            QualitySource::WebRip => "WEBRip",
            QualitySource::Web => "WEB-DL",
            QualitySource::Bluray => "Bluray",
            QualitySource::Vr => "VR",
        };
        write!(f, "{label}")
    }
}

/// How trustworthy a signal is. Higher ranks win conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Confidence {
    #[default]
    Fallback,
    Extension,
    Name,
    MediaInfo,
}

/// Which stage of inspection produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SignalOrigin {
    /// Container extension only.
    Extension,
    /// Tokens parsed out of the release name.
    Name,
    /// Probed stream metadata.
    MediaInfo,
}

/// Resolution evidence carried by a signal: either a rung named in the
/// release, or raw probed dimensions awaiting ladder mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionEvidence {
    Rung(Resolution),
    Dimensions { width: i32, height: i32 },
}

/// One independent piece of evidence about a file's quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualitySignal {
    pub origin: SignalOrigin,
    pub source: QualitySource,
    pub resolution: Option<ResolutionEvidence>,
    pub confidence: Confidence,
}

impl QualitySignal {
    pub fn from_name(source: QualitySource, resolution: Option<Resolution>) -> Self {
        Self {
            origin: SignalOrigin::Name,
            source,
            resolution: resolution.map(ResolutionEvidence::Rung),
            confidence: Confidence::Name,
        }
    }

    pub fn from_media_info(width: i32, height: i32) -> Self {
        Self {
            origin: SignalOrigin::MediaInfo,
            source: QualitySource::Unknown,
            resolution: Some(ResolutionEvidence::Dimensions { width, height }),
            confidence: Confidence::MediaInfo,
        }
    }

    pub fn from_extension(source: QualitySource) -> Self {
        Self {
            origin: SignalOrigin::Extension,
            source,
            resolution: None,
            confidence: Confidence::Extension,
        }
    }
}

/// The fused quality verdict for a single file.
///
/// `resolution: None` means no signal was measurable, which is distinct
/// from the 480p ladder floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualityDetermination {
    pub source: QualitySource,
    pub resolution: Option<Resolution>,
    pub confidence: Confidence,
}

impl fmt::Display for QualityDetermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.resolution {
            Some(res) => write!(f, "{} {}", self.source, res),
            None => write!(f, "{}", self.source),
        }
    }
}
