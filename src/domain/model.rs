use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Raw form fields exactly as they arrived on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl ContactFields {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            message: message.into(),
        }
    }

    /// Assigns a field by its form name. Unknown names are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "name" => self.name = value,
            "email" => self.email = value,
            "phone" => self.phone = value,
            "message" => self.message = value,
            _ => {}
        }
    }
}

/// A sanitized, validated contact request. Every text field is already
/// HTML-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub received_at: DateTime<Local>,
    pub source_address: String,
}

/// JSON payload returned by the endpoint for every outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: String,
}

impl SubmitResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// A composed message ready to hand to a mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub from_name: String,
    pub from_address: String,
    pub reply_to_name: String,
    pub reply_to_address: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
    pub high_priority: bool,
}

/// Per-client session data. Only the rate-limit timestamp is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionData {
    pub last_submission: Option<DateTime<Local>>,
}

/// The session a request runs under, handed explicitly to the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub id: String,
    pub data: SessionData,
    /// The client did not present a known session id.
    pub created: bool,
    pub dirty: bool,
}

impl SessionContext {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data: SessionData::default(),
            created: true,
            dirty: false,
        }
    }

    pub fn resumed(id: impl Into<String>, data: SessionData) -> Self {
        Self {
            id: id.into(),
            data,
            created: false,
            dirty: false,
        }
    }

    pub fn last_submission(&self) -> Option<DateTime<Local>> {
        self.data.last_submission
    }

    pub fn record_submission(&mut self, at: DateTime<Local>) {
        self.data.last_submission = Some(at);
        self.dirty = true;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Bg,
}
