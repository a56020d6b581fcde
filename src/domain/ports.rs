use crate::domain::model::{OutboundEmail, SessionData, Submission};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local};

/// Anything able to deliver a composed message to its recipient.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<()>;
}

/// Per-client key/value storage for session data.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> Option<SessionData>;
    async fn save(&self, id: &str, data: SessionData);
}

/// Append-only sinks for delivered submissions and dispatch failures.
#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record_delivery(&self, submission: &Submission) -> Result<()>;
    async fn record_failure(&self, mailbox: &str, at: DateTime<Local>) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
