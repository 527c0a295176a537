//! Wizard state
//!
//! Plain data. All transitions go through `reducer::reduce`; the controller
//! only decides which action to apply and performs the backend call.

use serde::Serialize;
use std::collections::BTreeMap;

use super::validation::FieldErrors;
use crate::error::SubmissionFailure;

/// The submission axis, independent of the current step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Submission {
    #[default]
    Idle,
    InFlight,
    Succeeded,
    Failed(SubmissionFailure),
}

impl Submission {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Submission::InFlight)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Submission::Succeeded)
    }

    pub fn failure(&self) -> Option<&SubmissionFailure> {
        match self {
            Submission::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Snapshot handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardState {
    /// 1-based, within `[1, N]`
    pub current_step: u8,
    /// Raw input, kept across steps until reset
    pub fields: BTreeMap<String, String>,
    pub validation_errors: FieldErrors,
    pub submission: Submission,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            current_step: 1,
            fields: BTreeMap::new(),
            validation_errors: FieldErrors::new(),
            submission: Submission::Idle,
        }
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_pristine(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = WizardState::new();
        assert_eq!(state.current_step, 1);
        assert!(state.fields.is_empty());
        assert!(state.validation_errors.is_empty());
        assert_eq!(state.submission, Submission::Idle);
        assert!(state.is_pristine());
    }

    #[test]
    fn test_submission_helpers() {
        assert!(Submission::InFlight.is_in_flight());
        assert!(Submission::Succeeded.is_succeeded());

        let failed = Submission::Failed(SubmissionFailure::Network("down".to_string()));
        assert_eq!(
            failed.failure(),
            Some(&SubmissionFailure::Network("down".to_string()))
        );
        assert!(Submission::Idle.failure().is_none());
    }

    #[test]
    fn test_submission_serialization() {
        let json = serde_json::to_value(Submission::InFlight).unwrap();
        assert_eq!(json, serde_json::json!({"status": "in_flight"}));

        let failed = Submission::Failed(SubmissionFailure::Timeout(30_000));
        let json = serde_json::to_value(failed).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "failed", "reason": {"kind": "timeout", "detail": 30_000}})
        );
    }
}
