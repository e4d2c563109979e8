//! Decision specification chain.
//!
//! An ordered list of independent accept/reject rules folded over a
//! candidate file. The first rejection short-circuits the rest of the
//! chain; rules never mutate the subject or any shared state.

pub mod rules;

use tracing::{debug, info};

use sceneline_model::{Decision, ImportSubject, RejectionType};

pub use rules::{
    DecisionCriteria, MatchedRule, PartialFileRule, RuntimeSampleRule,
    SampleSizeRule, ZeroByteRule, default_rules,
};

/// A single accept/reject specification in the decision chain.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Ordering hint; lower runs earlier.
    fn priority(&self) -> u8 {
        50
    }

    fn rejection_type(&self) -> RejectionType;

    fn is_satisfied_by(
        &self,
        subject: &ImportSubject,
        criteria: &DecisionCriteria,
    ) -> Decision;
}

/// Run the chain in ascending priority order, stopping at the first
/// rejection. All rules accepting means the subject is accepted.
pub fn evaluate(
    subject: &ImportSubject,
    criteria: &DecisionCriteria,
    rules: &[Box<dyn Rule>],
) -> Decision {
    let mut ordered: Vec<&dyn Rule> = rules.iter().map(|r| r.as_ref()).collect();
    // Stable: registration order breaks priority ties.
    ordered.sort_by_key(|rule| rule.priority());

    for rule in ordered {
        let decision = rule.is_satisfied_by(subject, criteria);
        if !decision.accepted {
            info!(
                rule = rule.name(),
                reason = decision.reason.as_deref().unwrap_or(""),
                rejection = ?decision.rejection_type,
                path = %subject.path.display(),
                "import rejected"
            );
            return decision;
        }
        debug!(rule = rule.name(), "rule accepted");
    }

    Decision::accept()
}
