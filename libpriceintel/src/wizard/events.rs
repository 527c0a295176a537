//! Wizard event bus
//!
//! Every wizard publishes its transitions on a `tokio::sync::broadcast`
//! channel so a rendering surface can redraw without polling.
//!
//! Emission never blocks and never fails: with no subscribers the event is
//! dropped, and a lagging subscriber loses the oldest events first.
//!
//! # Example
//!
//! ```
//! use libpriceintel::wizard::{EventBus, WizardEvent};
//! use uuid::Uuid;
//!
//! # async fn example() {
//! let bus = EventBus::new(16);
//! let mut receiver = bus.subscribe();
//!
//! bus.emit(WizardEvent::Reset { wizard_id: Uuid::new_v4() });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::SubmissionFailure;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<WizardEvent>;

/// Default buffer per subscriber
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<WizardEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Receive every event emitted after this call
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: WizardEvent) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WizardEvent {
    StepChanged {
        wizard_id: Uuid,
        from: u8,
        to: u8,
    },

    /// A step or the whole form failed validation
    ValidationFailed {
        wizard_id: Uuid,
        step: u8,
        fields: Vec<String>,
    },

    SubmissionStarted {
        wizard_id: Uuid,
    },

    SubmissionSucceeded {
        wizard_id: Uuid,
    },

    SubmissionFailed {
        wizard_id: Uuid,
        reason: SubmissionFailure,
    },

    Reset {
        wizard_id: Uuid,
    },
}

impl WizardEvent {
    pub fn wizard_id(&self) -> Uuid {
        match self {
            WizardEvent::StepChanged { wizard_id, .. }
            | WizardEvent::ValidationFailed { wizard_id, .. }
            | WizardEvent::SubmissionStarted { wizard_id }
            | WizardEvent::SubmissionSucceeded { wizard_id }
            | WizardEvent::SubmissionFailed { wizard_id, .. }
            | WizardEvent::Reset { wizard_id } => *wizard_id,
        }
    }
}
