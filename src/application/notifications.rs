//! Toast notifications shown over the UI.

use crate::domain::RegistryEvent;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Destructive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    pub raised_at: Instant,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        description: impl Into<String>,
        raised_at: Instant,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
            raised_at,
        }
    }

    pub fn from_event(event: &RegistryEvent, raised_at: Instant) -> Self {
        match event {
            RegistryEvent::RegistrationSubmitted { .. } => Self::new(
                NotificationLevel::Info,
                "Registration Submitted",
                "Your property registration is being processed on the ledger...",
                raised_at,
            ),
            RegistryEvent::PropertyConfirmed { address, .. } => Self::new(
                NotificationLevel::Success,
                "Property Registered",
                format!("Property at {address} has been successfully registered on the ledger."),
                raised_at,
            ),
            RegistryEvent::TransferInitiated { .. } => Self::new(
                NotificationLevel::Info,
                "Transfer Initiated",
                "Property transfer is being processed on the ledger...",
                raised_at,
            ),
            RegistryEvent::TransferCompleted { new_owner, .. } => Self::new(
                NotificationLevel::Success,
                "Transfer Completed",
                format!("Property ownership has been successfully transferred to {new_owner}."),
                raised_at,
            ),
        }
    }

    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.raised_at) >= ttl
    }
}
