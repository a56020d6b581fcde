pub mod adapters;
pub mod app;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, SubmitArgs};

pub use crate::config::TomlConfig;
pub use crate::core::handler::{ContactHandler, ContactSettings, SubmitError};
pub use crate::domain::model::{ContactFields, Locale, SubmitResponse, Submission};
pub use crate::utils::error::{ContactError, Result};
