use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContactError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Mail composition failed: {0}")]
    MailBuildError(#[from] lettre::error::Error),

    #[error("Invalid mail address: {0}")]
    AddressError(#[from] lettre::address::AddressError),

    #[error("SMTP transport failed: {0}")]
    SmtpError(#[from] lettre::transport::smtp::Error),

    #[error("File transport failed: {0}")]
    FileTransportError(#[from] lettre::transport::file::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl ContactError {
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ContactError::IoError(_) => "Check that the log and outbox paths exist and are writable",
            ContactError::HttpError(_) => "Check that the contact endpoint is reachable",
            ContactError::SerializationError(_) => "The endpoint did not answer with the expected JSON payload",
            ContactError::TomlError(_) | ContactError::ConfigValidationError { .. } => {
                "Fix the configuration file syntax and try again"
            }
            ContactError::MailBuildError(_) | ContactError::AddressError(_) => {
                "Check the configured mailbox and sender name"
            }
            ContactError::SmtpError(_) => "Check the SMTP host, port and credentials",
            ContactError::FileTransportError(_) => "Check that the outbox directory is writable",
            ContactError::InvalidConfigValueError { .. } | ContactError::MissingConfigError { .. } => {
                "Review the [mail], [server] and [transport] sections of the configuration"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ContactError>;
