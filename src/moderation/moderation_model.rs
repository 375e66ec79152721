use serde::{Deserialize, Serialize};

/// Which of the two screening checks a field tripped. Strong takes
/// precedence when both trip.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SpamReason {
    Weak,
    Strong,
}

/// Per-field screening outcome, keyed by field name in the report returned
/// to the calling mutation flow.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", tag = "outcome", content = "reason")]
pub enum FieldOutcome {
    Pass,
    Fail(SpamReason),
}

impl FieldOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, FieldOutcome::Pass)
    }
}
