//! Error types for PriceIntel

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PriceIntelError>;

#[derive(Error, Debug)]
pub enum PriceIntelError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Locale error: {0}")]
    Locale(#[from] LocaleError),

    #[error("Preference store error: {0}")]
    Store(#[from] StoreError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("{0}")]
    Submission(#[from] SubmissionFailure),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PriceIntelError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PriceIntelError::InvalidInput(_) => 3,
            PriceIntelError::Locale(LocaleError::Unsupported(_)) => 3,
            PriceIntelError::Wizard(WizardError::Incomplete { .. }) => 3,
            PriceIntelError::Wizard(WizardError::UnknownField(_)) => 3,
            PriceIntelError::Submission(_) => 2,
            PriceIntelError::Locale(_) => 1,
            PriceIntelError::Wizard(_) => 1,
            PriceIntelError::Config(_) => 1,
            PriceIntelError::Store(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("Unsupported locale '{0}'. Supported locales: en, es, zh")]
    Unsupported(String),

    #[error("Invalid catalog: {0}")]
    Catalog(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Preference file error: {0}")]
    StateFile(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("A submission is already in flight")]
    AlreadyInFlight,

    #[error("Already submitted; acknowledge the result before submitting again")]
    AlreadySucceeded,

    #[error("Submit is only allowed from the last step (current: {current}, last: {last})")]
    NotAtFinalStep { current: u8, last: u8 },

    #[error("Step {step} has invalid fields")]
    Incomplete { step: u8 },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Nothing to acknowledge: submission has not succeeded")]
    NotSucceeded,
}

/// Why the submission backend rejected a payload.
///
/// Carried as data inside `Submission::Failed`, never returned as an `Err`
/// from the wizard, so it is cheap to clone and serializable for events.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SubmissionFailure {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rejected by backend: {0}")]
    Validation(String),

    #[error("Server error: {0}")]
    Server(String),

    /// Elapsed bound in milliseconds
    #[error("Submission timed out after {0}ms")]
    Timeout(u64),
}
