//! PriceIntel - core of the PriceIntelligence marketing site
//!
//! This library holds the behavior behind the site's pages: resolving UI
//! text for the visitor's language, and driving the multi-step purchase and
//! contact forms through validation and submission.

pub mod config;
pub mod demo;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod plans;
pub mod service;
pub mod wizard;

// Re-export commonly used types
pub use config::Config;
pub use error::{PriceIntelError, Result, SubmissionFailure};
pub use i18n::{Locale, LocaleResolver};
pub use plans::{Plan, PlanId};
pub use service::PriceIntelService;
pub use wizard::{FormSpec, Submission, Wizard, WizardState};
