//! Shipped decision rules.

use once_cell::sync::Lazy;
use regex::Regex;

use sceneline_model::{Decision, ImportSubject, RejectionType};

use super::Rule;

/// Read-only configuration snapshot consulted by the rules.
#[derive(Debug, Clone)]
pub struct DecisionCriteria {
    /// When set, sample detection defers to the runtime validator instead
    /// of the size heuristic.
    pub runtime_validation: bool,
    /// Minimum plausible runtime in seconds for a real release.
    pub minimum_runtime_secs: f64,
    /// Files at or below this size with a sample marker are rejected.
    pub sample_max_size: u64,
}

impl Default for DecisionCriteria {
    fn default() -> Self {
        Self {
            runtime_validation: false,
            minimum_runtime_secs: 90.0,
            sample_max_size: 70 * 1024 * 1024,
        }
    }
}

static SAMPLE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bsample\b").unwrap());

/// Reject small files whose release tokens carry a sample marker.
///
/// Always accepts when runtime validation is enabled; the runtime rule
/// owns sample detection in that configuration.
#[derive(Debug, Default)]
pub struct SampleSizeRule;

impl Rule for SampleSizeRule {
    fn name(&self) -> &'static str {
        "sample_size"
    }

    fn priority(&self) -> u8 {
        20
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Permanent
    }

    fn is_satisfied_by(
        &self,
        subject: &ImportSubject,
        criteria: &DecisionCriteria,
    ) -> Decision {
        if criteria.runtime_validation {
            return Decision::accept();
        }
        if SAMPLE_MARKER.is_match(&subject.release.release_tokens)
            && subject.size < criteria.sample_max_size
        {
            return Decision::reject("Sample", self.rejection_type());
        }
        Decision::accept()
    }
}

/// Reject files whose probed runtime is implausibly short.
///
/// Only active when runtime validation is enabled; a file without probed
/// runtime is accepted (nothing to validate against).
#[derive(Debug, Default)]
pub struct RuntimeSampleRule;

impl Rule for RuntimeSampleRule {
    fn name(&self) -> &'static str {
        "runtime_sample"
    }

    fn priority(&self) -> u8 {
        21
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Temporary
    }

    fn is_satisfied_by(
        &self,
        subject: &ImportSubject,
        criteria: &DecisionCriteria,
    ) -> Decision {
        if !criteria.runtime_validation {
            return Decision::accept();
        }
        match subject.runtime {
            Some(runtime) if runtime < criteria.minimum_runtime_secs => {
                Decision::reject(
                    format!(
                        "Runtime {runtime:.0}s below minimum {:.0}s",
                        criteria.minimum_runtime_secs
                    ),
                    self.rejection_type(),
                )
            }
            _ => Decision::accept(),
        }
    }
}

const PARTIAL_EXTENSIONS: &[&str] = &["part", "partial", "!ut", "crdownload"];

/// Reject files still being written by a download client.
#[derive(Debug, Default)]
pub struct PartialFileRule;

impl Rule for PartialFileRule {
    fn name(&self) -> &'static str {
        "partial_file"
    }

    fn priority(&self) -> u8 {
        10
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Temporary
    }

    fn is_satisfied_by(
        &self,
        subject: &ImportSubject,
        _criteria: &DecisionCriteria,
    ) -> Decision {
        let extension = subject
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        if let Some(ext) = extension {
            if PARTIAL_EXTENSIONS.contains(&ext.as_str()) {
                return Decision::reject(
                    "Download in progress",
                    self.rejection_type(),
                );
            }
        }
        Decision::accept()
    }
}

/// Reject empty files outright.
#[derive(Debug, Default)]
pub struct ZeroByteRule;

impl Rule for ZeroByteRule {
    fn name(&self) -> &'static str {
        "zero_byte"
    }

    fn priority(&self) -> u8 {
        11
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Permanent
    }

    fn is_satisfied_by(
        &self,
        subject: &ImportSubject,
        _criteria: &DecisionCriteria,
    ) -> Decision {
        if subject.size == 0 {
            return Decision::reject("Empty file", self.rejection_type());
        }
        Decision::accept()
    }
}

/// Guard against subjects that slipped through without a matched entity.
#[derive(Debug, Default)]
pub struct MatchedRule;

impl Rule for MatchedRule {
    fn name(&self) -> &'static str {
        "matched"
    }

    fn priority(&self) -> u8 {
        5
    }

    fn rejection_type(&self) -> RejectionType {
        RejectionType::Permanent
    }

    fn is_satisfied_by(
        &self,
        subject: &ImportSubject,
        _criteria: &DecisionCriteria,
    ) -> Decision {
        if subject.candidate.is_none() {
            return Decision::reject("Unknown release", self.rejection_type());
        }
        Decision::accept()
    }
}

/// The default chain, in registration order.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(MatchedRule),
        Box::new(PartialFileRule),
        Box::new(ZeroByteRule),
        Box::new(SampleSizeRule),
        Box::new(RuntimeSampleRule),
    ]
}
