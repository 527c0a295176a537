//! Mock submission backend for testing
//!
//! Records every payload it receives and replies from a script of outcomes,
//! so tests can drive the failure and retry paths of the wizard without the
//! simulated delay. Clones share their counters.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::sleep;

use super::backend::{Payload, SubmissionBackend};
use crate::error::SubmissionFailure;

type Outcome = std::result::Result<(), SubmissionFailure>;

/// Configuration for mock backend behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Backend name (e.g., "mock-purchase")
    pub name: String,

    /// Outcomes returned in order, one per call
    pub script: Arc<Mutex<VecDeque<Outcome>>>,

    /// Outcome once the script is exhausted
    pub fallback: Outcome,

    /// Delay before replying (simulates network latency)
    pub delay: Duration,

    /// Number of times submit has been called
    pub call_count: Arc<Mutex<usize>>,

    /// Payloads received (for verification)
    pub payloads: Arc<Mutex<Vec<Payload>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Ok(()),
            delay: Duration::from_millis(0),
            call_count: Arc::new(Mutex::new(0)),
            payloads: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock backend for testing
#[derive(Debug, Clone)]
pub struct MockBackend {
    config: MockConfig,
}

impl MockBackend {
    pub fn new(config: MockConfig) -> Self {
        Self { config }
    }

    /// A backend that always succeeds
    pub fn success() -> Self {
        Self::new(MockConfig::default())
    }

    /// A backend that always fails with `failure`
    pub fn failure(failure: SubmissionFailure) -> Self {
        Self::new(MockConfig {
            fallback: Err(failure),
            ..Default::default()
        })
    }

    /// A backend that succeeds after `delay`
    pub fn with_delay(delay: Duration) -> Self {
        Self::new(MockConfig {
            delay,
            ..Default::default()
        })
    }

    /// Replies with `outcomes` in order, then succeeds
    pub fn scripted(outcomes: Vec<Outcome>) -> Self {
        Self::new(MockConfig {
            script: Arc::new(Mutex::new(outcomes.into())),
            ..Default::default()
        })
    }

    pub fn call_count(&self) -> usize {
        *self
            .config
            .call_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn payloads(&self) -> Vec<Payload> {
        self.config
            .payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SubmissionBackend for MockBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn submit(&self, payload: &Payload) -> Outcome {
        *self
            .config
            .call_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        self.config
            .payloads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.clone());

        if !self.config.delay.is_zero() {
            sleep(self.config.delay).await;
        }

        let scripted = self
            .config
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        scripted.unwrap_or_else(|| self.config.fallback.clone())
    }
}
