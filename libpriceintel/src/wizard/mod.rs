//! Multi-step form wizard
//!
//! A wizard walks the user through the steps of a `FormSpec`, validating
//! each step before it may advance, and finally hands every collected value
//! to a `SubmissionBackend`. The step position and the submission status
//! are independent axes of `WizardState`:
//!
//! - `go_next` validates the current step and advances only when it passes
//! - `go_back` always moves back and keeps entered values
//! - `submit` is accepted only on the last step, validates every field and
//!   calls the backend once; a failure stays on the last step for retry
//! - `reset` returns to a fresh wizard from any state
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use libpriceintel::wizard::{FormSpec, SimulatedBackend, Wizard};
//!
//! # async fn example() -> libpriceintel::error::Result<()> {
//! let backend = Arc::new(SimulatedBackend::new("contact", Duration::from_secs(1)));
//! let wizard = Wizard::new(FormSpec::contact(), backend);
//!
//! wizard.set_field("firstName", "Ana")?;
//! wizard.set_field("lastName", "Ruiz")?;
//! wizard.set_field("email", "ana@example.org")?;
//! wizard.set_field("reason", "demo")?;
//! wizard.set_field("message", "Could we book a demo?")?;
//!
//! let submission = wizard.submit().await?;
//! println!("{:?}", submission);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod controller;
pub mod events;
pub mod form;
pub mod reducer;
pub mod state;
pub mod validation;

// Mock backend is available for all builds to support integration tests
pub mod mock;

pub use backend::{Payload, SimulatedBackend, SubmissionBackend};
pub use controller::{Transition, Wizard, DEFAULT_SUBMIT_TIMEOUT};
pub use events::{EventBus, EventReceiver, WizardEvent};
pub use form::{FieldSpec, FormKind, FormSpec, Rule, RuleKind, StepSpec};
pub use mock::MockBackend;
pub use reducer::{reduce, WizardAction};
pub use state::{Submission, WizardState};
pub use validation::{validate_all, validate_field, validate_step, FieldError, FieldErrors};
