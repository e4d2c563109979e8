//! Signal fusion: many weighted quality signals in, one determination out.

use tracing::debug;

use sceneline_model::{
    Confidence, QualityDetermination, QualitySignal, QualitySource,
    Resolution, ResolutionEvidence,
};

/// Fuse zero or more quality signals into a single determination.
///
/// Resolution and source are independent dimensions: the winning signal for
/// one never drags the other along. With no signals at all the result sits
/// on the ladder floor; with signals whose dimension evidence is all
/// non-positive the resolution is explicitly not computable.
///
/// The same multiset of signals fuses identically regardless of order:
/// candidates are ranked by a total order before selection.
pub fn fuse(signals: &[QualitySignal]) -> QualityDetermination {
    if signals.is_empty() {
        return QualityDetermination {
            source: QualitySource::Unknown,
            resolution: Some(Resolution::R480p),
            confidence: Confidence::Fallback,
        };
    }

    // Total order makes tie-breaking deterministic for equal confidence.
    let mut ranked: Vec<&QualitySignal> = signals.iter().collect();
    ranked.sort_unstable_by_key(|s| {
        (s.confidence, s.origin, s.source, s.resolution)
    });
    ranked.reverse();

    let mut resolution = None;
    let mut resolution_confidence = None;
    for signal in &ranked {
        match signal.resolution {
            Some(ResolutionEvidence::Rung(rung)) => {
                resolution = Some(rung);
                resolution_confidence = Some(signal.confidence);
                break;
            }
            Some(ResolutionEvidence::Dimensions { width, height }) => {
                if let Some(rung) = Resolution::from_dimensions(width, height) {
                    resolution = Some(rung);
                    resolution_confidence = Some(signal.confidence);
                    break;
                }
                // Unusable probe; keep looking at weaker signals.
            }
            None => {}
        }
    }

    let mut source = QualitySource::Unknown;
    let mut source_confidence = None;
    for signal in &ranked {
        if signal.source != QualitySource::Unknown {
            source = signal.source;
            source_confidence = Some(signal.confidence);
            break;
        }
    }

    let confidence = resolution_confidence
        .or(source_confidence)
        .unwrap_or(Confidence::Fallback);

    let determination = QualityDetermination {
        source,
        resolution,
        confidence,
    };
    debug!(?determination, signal_count = signals.len(), "fused quality");
    determination
}
