//! Notification collaborator seam. The coordinator hands a templated message
//! descriptor to whatever delivery mechanism the host wires in; delivery
//! failure never rolls back a save.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A templated message. An empty template means "send nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDescriptor {
    pub template: String,
    pub subject: String,
    pub context: BTreeMap<String, String>,
}

impl MessageDescriptor {
    pub fn new(template: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            subject: subject.into(),
            context: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.template.trim().is_empty()
    }
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct NotifyError(pub String);

pub trait Notifier {
    fn send(&self, descriptor: &MessageDescriptor, recipient: &str) -> Result<(), NotifyError>;
}

/// Discards every message. For callers without mail delivery.
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn send(&self, _descriptor: &MessageDescriptor, _recipient: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}
