//! Async wizard controller
//!
//! Owns one `WizardState` behind a mutex and applies `reducer::reduce` for
//! every command. The mutex is never held across the backend call: `submit`
//! moves the state to `InFlight`, releases the lock, awaits the backend and
//! then re-locks to apply the outcome. A second `submit` arriving in between
//! sees `InFlight` and is rejected, so the backend runs once per accepted
//! submit. Edits and navigation are refused until the outcome is in, and a
//! succeeded submission cannot be sent again before `acknowledge`.
//!
//! `reset` bumps a generation counter; a backend result that comes back for
//! an older generation is dropped instead of overwriting the fresh wizard.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use super::backend::{Payload, SubmissionBackend};
use super::events::{EventBus, EventReceiver, WizardEvent};
use super::form::FormSpec;
use super::reducer::{reduce, WizardAction};
use super::state::{Submission, WizardState};
use crate::error::{Result, SubmissionFailure, WizardError};

/// Default bound on a single backend call
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of a navigation command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved between steps
    Moved { from: u8, to: u8 },
    /// Validation failed; the wizard stayed on `step`
    Blocked { step: u8 },
    /// Already at the first or last step
    Stayed { step: u8 },
}

struct Inner {
    state: WizardState,
    generation: u64,
}

pub struct Wizard {
    id: Uuid,
    form: Arc<FormSpec>,
    backend: Arc<dyn SubmissionBackend>,
    inner: Mutex<Inner>,
    events: EventBus,
    timeout: Duration,
}

impl Wizard {
    pub fn new(form: FormSpec, backend: Arc<dyn SubmissionBackend>) -> Self {
        Self {
            id: Uuid::new_v4(),
            form: Arc::new(form),
            backend,
            inner: Mutex::new(Inner {
                state: WizardState::new(),
                generation: 0,
            }),
            events: EventBus::default(),
            timeout: DEFAULT_SUBMIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn form(&self) -> &FormSpec {
        &self.form
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Copy of the current state for rendering
    pub fn snapshot(&self) -> WizardState {
        self.lock().state.clone()
    }

    pub fn current_step(&self) -> u8 {
        self.lock().state.current_step
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Store a value for a field declared by the form
    pub fn set_field(&self, name: &str, value: &str) -> Result<()> {
        if self.form.field(name).is_none() {
            return Err(WizardError::UnknownField(name.to_string()).into());
        }
        let mut inner = self.lock();
        if inner.state.submission.is_in_flight() {
            return Err(WizardError::AlreadyInFlight.into());
        }
        self.apply(
            &mut inner,
            WizardAction::SetField {
                name: name.to_string(),
                value: value.to_string(),
            },
        );
        Ok(())
    }

    /// Validate the current step and advance if it passes
    pub fn go_next(&self) -> Transition {
        let mut inner = self.lock();
        let from = inner.state.current_step;
        if from >= self.form.len() || inner.state.submission.is_in_flight() {
            return Transition::Stayed { step: from };
        }

        self.apply(&mut inner, WizardAction::Next);
        let to = inner.state.current_step;

        if to != from {
            tracing::debug!(wizard = %self.id, from, to, "Step advanced");
            self.events.emit(WizardEvent::StepChanged {
                wizard_id: self.id,
                from,
                to,
            });
            Transition::Moved { from, to }
        } else {
            let fields = self.failing_fields(&inner.state, Some(from));
            tracing::debug!(wizard = %self.id, step = from, ?fields, "Step blocked by validation");
            self.events.emit(WizardEvent::ValidationFailed {
                wizard_id: self.id,
                step: from,
                fields,
            });
            Transition::Blocked { step: from }
        }
    }

    /// Go back one step; never validates
    pub fn go_back(&self) -> Transition {
        let mut inner = self.lock();
        let from = inner.state.current_step;
        if from <= 1 || inner.state.submission.is_in_flight() {
            return Transition::Stayed { step: from };
        }

        self.apply(&mut inner, WizardAction::Back);
        let to = inner.state.current_step;
        tracing::debug!(wizard = %self.id, from, to, "Step back");
        self.events.emit(WizardEvent::StepChanged {
            wizard_id: self.id,
            from,
            to,
        });
        Transition::Moved { from, to }
    }

    /// Validate every step and hand the values to the backend once
    ///
    /// Returns the resulting `Submission` (`Succeeded` or `Failed`). Errors:
    /// `AlreadyInFlight` while another submit is pending, `AlreadySucceeded`
    /// until a success is acknowledged, `NotAtFinalStep`
    /// away from the last step, `Incomplete` when validation fails (the
    /// errors are in the state and `step` is the first step holding one).
    pub async fn submit(&self) -> Result<Submission> {
        let (payload, generation) = self.begin_submit()?;

        tracing::info!(wizard = %self.id, backend = self.backend.name(), "Submitting");
        self.events.emit(WizardEvent::SubmissionStarted { wizard_id: self.id });

        let outcome = match tokio::time::timeout(self.timeout, self.backend.submit(&payload)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(SubmissionFailure::Timeout(
                u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        };

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(wizard = %self.id, "Discarding result of a submission made before reset");
            return Ok(inner.state.submission.clone());
        }

        self.apply(&mut inner, WizardAction::SubmitFinished(outcome));
        match &inner.state.submission {
            Submission::Succeeded => {
                tracing::info!(wizard = %self.id, "Submission succeeded");
                self.events
                    .emit(WizardEvent::SubmissionSucceeded { wizard_id: self.id });
            }
            Submission::Failed(reason) => {
                tracing::warn!(wizard = %self.id, %reason, "Submission failed");
                self.events.emit(WizardEvent::SubmissionFailed {
                    wizard_id: self.id,
                    reason: reason.clone(),
                });
            }
            _ => {}
        }
        Ok(inner.state.submission.clone())
    }

    fn begin_submit(&self) -> Result<(Payload, u64)> {
        let mut inner = self.lock();
        let last = self.form.len();

        if inner.state.submission.is_in_flight() {
            return Err(WizardError::AlreadyInFlight.into());
        }
        if inner.state.submission.is_succeeded() {
            return Err(WizardError::AlreadySucceeded.into());
        }
        if inner.state.current_step != last {
            return Err(WizardError::NotAtFinalStep {
                current: inner.state.current_step,
                last,
            }
            .into());
        }

        self.apply(&mut inner, WizardAction::Submit);

        if !inner.state.submission.is_in_flight() {
            let fields = self.failing_fields(&inner.state, None);
            let step = fields
                .iter()
                .filter_map(|name| self.form.step_of(name))
                .min()
                .unwrap_or(last);
            tracing::debug!(wizard = %self.id, step, ?fields, "Submit blocked by validation");
            self.events.emit(WizardEvent::ValidationFailed {
                wizard_id: self.id,
                step,
                fields,
            });
            return Err(WizardError::Incomplete { step }.into());
        }

        Ok((inner.state.fields.clone(), inner.generation))
    }

    /// Back to step 1 with no values, no errors and an idle submission
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.generation += 1;
        self.apply(&mut inner, WizardAction::Reset);
        tracing::debug!(wizard = %self.id, "Wizard reset");
        self.events.emit(WizardEvent::Reset { wizard_id: self.id });
    }

    /// Dismiss a successful submission, which resets the wizard
    pub fn acknowledge(&self) -> Result<()> {
        if !self.lock().state.submission.is_succeeded() {
            return Err(WizardError::NotSucceeded.into());
        }
        self.reset();
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(&self, inner: &mut Inner, action: WizardAction) {
        let state = std::mem::take(&mut inner.state);
        inner.state = reduce(&self.form, state, action);
    }

    fn failing_fields(&self, state: &WizardState, step: Option<u8>) -> Vec<String> {
        state
            .validation_errors
            .keys()
            .filter(|name| step.is_none() || self.form.step_of(name) == step)
            .cloned()
            .collect()
    }
}

impl std::fmt::Debug for Wizard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wizard")
            .field("id", &self.id)
            .field("kind", &self.form.kind)
            .field("backend", &self.backend.name())
            .field("state", &self.snapshot())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PriceIntelError;
    use crate::wizard::mock::MockBackend;

    fn purchase(backend: &MockBackend) -> Wizard {
        Wizard::new(FormSpec::purchase(), Arc::new(backend.clone()))
    }

    fn fill_account(wizard: &Wizard) {
        wizard.set_field("firstName", "John").unwrap();
        wizard.set_field("lastName", "Doe").unwrap();
        wizard.set_field("email", "john@company.com").unwrap();
        wizard.set_field("company", "Acme").unwrap();
    }

    fn fill_payment(wizard: &Wizard) {
        wizard.set_field("cardNumber", "4242 4242 4242 4242").unwrap();
        wizard.set_field("expiry", "12/30").unwrap();
        wizard.set_field("cvv", "123").unwrap();
        wizard.set_field("cardName", "John Doe").unwrap();
        wizard.set_field("billingAddress", "1 Main St").unwrap();
    }

    fn at_review(backend: &MockBackend) -> Wizard {
        let wizard = purchase(backend);
        fill_account(&wizard);
        assert_eq!(wizard.go_next(), Transition::Moved { from: 1, to: 2 });
        fill_payment(&wizard);
        assert_eq!(wizard.go_next(), Transition::Moved { from: 2, to: 3 });
        wizard
    }

    #[test]
    fn test_unknown_field_rejected() {
        let wizard = purchase(&MockBackend::success());
        let result = wizard.set_field("shoeSize", "42");
        assert!(matches!(
            result,
            Err(PriceIntelError::Wizard(WizardError::UnknownField(ref name))) if name == "shoeSize"
        ));
    }

    #[test]
    fn test_navigation_bounds() {
        let wizard = purchase(&MockBackend::success());
        assert_eq!(wizard.go_back(), Transition::Stayed { step: 1 });
        assert_eq!(wizard.go_next(), Transition::Blocked { step: 1 });
        assert_eq!(wizard.current_step(), 1);

        let wizard = at_review(&MockBackend::success());
        assert_eq!(wizard.go_next(), Transition::Stayed { step: 3 });
        assert_eq!(wizard.go_back(), Transition::Moved { from: 3, to: 2 });
    }

    #[tokio::test]
    async fn test_submit_not_at_last_step() {
        let backend = MockBackend::success();
        let wizard = purchase(&backend);
        fill_account(&wizard);

        let result = wizard.submit().await;
        assert!(matches!(
            result,
            Err(PriceIntelError::Wizard(WizardError::NotAtFinalStep { current: 1, last: 3 }))
        ));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_success_then_acknowledge() {
        let backend = MockBackend::success();
        let wizard = at_review(&backend);

        let submission = wizard.submit().await.unwrap();
        assert_eq!(submission, Submission::Succeeded);
        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.payloads()[0]["company"], "Acme");

        wizard.acknowledge().unwrap();
        assert!(wizard.snapshot().is_pristine());
    }

    #[test]
    fn test_acknowledge_requires_success() {
        let wizard = purchase(&MockBackend::success());
        assert!(matches!(
            wizard.acknowledge(),
            Err(PriceIntelError::Wizard(WizardError::NotSucceeded))
        ));
    }

    #[tokio::test]
    async fn test_submit_reports_first_incomplete_step() {
        let backend = MockBackend::success();
        let wizard = at_review(&backend);
        wizard.set_field("email", "broken").unwrap();
        wizard.set_field("cvv", "").unwrap();

        let result = wizard.submit().await;
        assert!(matches!(
            result,
            Err(PriceIntelError::Wizard(WizardError::Incomplete { step: 1 }))
        ));
        let state = wizard.snapshot();
        assert_eq!(state.current_step, 3);
        assert_eq!(state.submission, Submission::Idle);
        assert!(state.validation_errors.contains_key("email"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_timeout_becomes_failure() {
        let backend = MockBackend::with_delay(Duration::from_millis(500));
        let wizard = at_review(&backend).with_timeout(Duration::from_millis(20));

        let submission = wizard.submit().await.unwrap();
        assert_eq!(submission, Submission::Failed(SubmissionFailure::Timeout(20)));
        assert_eq!(
            submission.failure().map(ToString::to_string).as_deref(),
            Some("Submission timed out after 20ms")
        );
        assert_eq!(wizard.current_step(), 3);
    }

    #[tokio::test]
    async fn test_commands_refused_while_in_flight() {
        let backend = MockBackend::with_delay(Duration::from_millis(50));
        let wizard = at_review(&backend);

        let (submission, ()) = tokio::join!(wizard.submit(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            assert_eq!(wizard.go_back(), Transition::Stayed { step: 3 });
            assert_eq!(wizard.go_next(), Transition::Stayed { step: 3 });
            assert!(matches!(
                wizard.set_field("cvv", "999"),
                Err(PriceIntelError::Wizard(WizardError::AlreadyInFlight))
            ));
        });

        assert_eq!(submission.unwrap(), Submission::Succeeded);
        let state = wizard.snapshot();
        assert_eq!(state.current_step, 3);
        assert_eq!(state.field("cvv"), Some("123"));
    }

    #[tokio::test]
    async fn test_second_submit_after_success_rejected() {
        let backend = MockBackend::success();
        let wizard = at_review(&backend);
        wizard.submit().await.unwrap();

        assert!(matches!(
            wizard.submit().await,
            Err(PriceIntelError::Wizard(WizardError::AlreadySucceeded))
        ));
        assert_eq!(wizard.snapshot().submission, Submission::Succeeded);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_reset_during_flight_discards_result() {
        let backend = MockBackend::with_delay(Duration::from_millis(50));
        let wizard = at_review(&backend);

        let (submission, ()) = tokio::join!(wizard.submit(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            wizard.reset();
        });

        assert_eq!(submission.unwrap(), Submission::Idle);
        assert!(wizard.snapshot().is_pristine());
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_events_follow_transitions() {
        let backend = MockBackend::success();
        let wizard = purchase(&backend);
        let mut events = wizard.subscribe();

        wizard.go_next();
        fill_account(&wizard);
        wizard.go_next();

        match events.recv().await.unwrap() {
            WizardEvent::ValidationFailed { step, fields, .. } => {
                assert_eq!(step, 1);
                assert!(fields.contains(&"firstName".to_string()));
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
        assert!(matches!(
            events.recv().await.unwrap(),
            WizardEvent::StepChanged { from: 1, to: 2, .. }
        ));
    }
}
