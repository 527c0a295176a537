//! Pure reducer for wizard transitions
//!
//! `(form, state, action) -> state`. No I/O, no clocks, no backend calls:
//! the controller performs the submission and feeds the outcome back in as
//! `SubmitFinished`. Every guard of the state machine lives here, so an
//! action that is not allowed from the current state returns it unchanged.
//!
//! While a submission is in flight the step and the values are frozen, so
//! the outcome always lands on the last step next to the values that were
//! sent. A succeeded submission stays until `Reset`.

use super::form::FormSpec;
use super::state::{Submission, WizardState};
use super::validation::{validate_all, validate_step};
use crate::error::SubmissionFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardAction {
    /// Store a raw input value
    SetField { name: String, value: String },

    /// Validate the current step and advance if it passes
    Next,

    /// Go back one step, keeping values
    Back,

    /// Validate everything and move to `InFlight` if valid
    Submit,

    /// The backend call returned
    SubmitFinished(Result<(), SubmissionFailure>),

    /// Back to a fresh wizard
    Reset,
}

pub fn reduce(form: &FormSpec, state: WizardState, action: WizardAction) -> WizardState {
    let last = form.len();

    match action {
        WizardAction::SetField { name, value } => {
            if form.field(&name).is_none() || state.submission.is_in_flight() {
                return state;
            }
            let mut fields = state.fields;
            fields.insert(name, value);
            WizardState { fields, ..state }
        }

        WizardAction::Next => {
            if state.current_step >= last || state.submission.is_in_flight() {
                return state;
            }
            let step_errors = validate_step(form, state.current_step, &state.fields);
            let mut validation_errors = state.validation_errors;

            // Errors of this step are recomputed; other steps' errors stay
            if let Some(step) = form.step(state.current_step) {
                for field in &step.fields {
                    validation_errors.remove(&field.name);
                }
            }

            if step_errors.is_empty() {
                WizardState {
                    current_step: state.current_step + 1,
                    validation_errors,
                    ..state
                }
            } else {
                validation_errors.extend(step_errors);
                WizardState {
                    validation_errors,
                    ..state
                }
            }
        }

        WizardAction::Back => {
            if state.current_step <= 1 || state.submission.is_in_flight() {
                return state;
            }
            WizardState {
                current_step: state.current_step - 1,
                ..state
            }
        }

        WizardAction::Submit => {
            if state.current_step != last
                || state.submission.is_in_flight()
                || state.submission.is_succeeded()
            {
                return state;
            }
            let validation_errors = validate_all(form, &state.fields);
            if validation_errors.is_empty() {
                WizardState {
                    validation_errors,
                    submission: Submission::InFlight,
                    ..state
                }
            } else {
                WizardState {
                    validation_errors,
                    ..state
                }
            }
        }

        WizardAction::SubmitFinished(outcome) => {
            if !state.submission.is_in_flight() {
                return state;
            }
            let submission = match outcome {
                Ok(()) => Submission::Succeeded,
                Err(reason) => Submission::Failed(reason),
            };
            WizardState { submission, ..state }
        }

        WizardAction::Reset => WizardState::default(),
    }
}
