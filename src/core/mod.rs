pub mod handler;
pub mod messages;
pub mod rate_limit;
pub mod sanitize;
pub mod template;
pub mod validator;

pub use crate::domain::model::{ContactFields, OutboundEmail, SessionContext, SubmitResponse, Submission};
pub use crate::domain::ports::{ActivityLog, Clock, MailTransport, SessionStore};
pub use crate::utils::error::Result;
