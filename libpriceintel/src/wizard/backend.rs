//! Submission backend abstraction
//!
//! The wizard hands the collected field values to a `SubmissionBackend`
//! exactly once per accepted submit. Failures are data
//! (`SubmissionFailure`), never panics, so the wizard can keep them in its
//! state and allow a retry.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::SubmissionFailure;

/// Field values sent to the backend, keyed by field name
pub type Payload = BTreeMap<String, String>;

#[async_trait]
pub trait SubmissionBackend: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Deliver one payload
    async fn submit(&self, payload: &Payload) -> std::result::Result<(), SubmissionFailure>;
}

/// Stand-in backend that accepts everything after a fixed delay
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    name: String,
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(name: &str, delay: Duration) -> Self {
        Self {
            name: name.to_string(),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl SubmissionBackend for SimulatedBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn submit(&self, payload: &Payload) -> std::result::Result<(), SubmissionFailure> {
        tracing::debug!(backend = %self.name, delay_ms = self.delay.as_millis() as u64, "Simulating submission");
        tokio::time::sleep(self.delay).await;
        tracing::info!(backend = %self.name, fields = payload.len(), "Submission accepted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_backend_always_succeeds() {
        let backend = SimulatedBackend::new("purchase", Duration::from_millis(5));
        let mut payload = Payload::new();
        payload.insert("email".to_string(), "a@b.com".to_string());

        assert_eq!(backend.name(), "purchase");
        assert!(backend.submit(&payload).await.is_ok());
        assert!(backend.submit(&Payload::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_simulated_backend_waits_for_delay() {
        let backend = SimulatedBackend::new("contact", Duration::from_millis(30));
        let started = std::time::Instant::now();
        backend.submit(&Payload::new()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
