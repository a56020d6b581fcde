use crate::adapters::mail::{SmtpSecurity, SmtpSettings};
use crate::core::handler::ContactSettings;
use crate::core::rate_limit::DEFAULT_MIN_INTERVAL_SECS;
use crate::domain::model::Locale;
use crate::utils::error::{ContactError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub mail: MailConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default = "default_origin")]
    pub allowed_origin: String,
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Destination mailbox, also used as the From address.
    pub to: String,
    pub from_name: String,
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default)]
    pub locale: Locale,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Smtp,
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default)]
    pub kind: TransportKind,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub security: SmtpSecurity,
    pub outbox_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_min_interval")]
    pub min_interval_seconds: u64,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_activity_log")]
    pub activity_log: String,
    #[serde(default = "default_error_log")]
    pub error_log: String,
    #[serde(default)]
    pub json: bool,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_path() -> String {
    "/contact".to_string()
}

fn default_origin() -> String {
    "*".to_string()
}

fn default_site_name() -> String {
    "SyperWeb".to_string()
}

fn default_min_interval() -> u64 {
    DEFAULT_MIN_INTERVAL_SECS
}

fn default_session_ttl() -> u64 {
    1440
}

fn default_activity_log() -> String {
    "./contact_log.txt".to_string()
}

fn default_error_log() -> String {
    "./contact_error.log".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            path: default_path(),
            allowed_origin: default_origin(),
            trust_forwarded_for: false,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval_seconds: default_min_interval(),
            session_ttl_seconds: default_session_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            activity_log: default_activity_log(),
            error_log: default_error_log(),
            json: false,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${SMTP_PASSWORD})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn contact_settings(&self) -> ContactSettings {
        ContactSettings {
            mailbox: self.mail.to.clone(),
            sender_name: self.mail.from_name.clone(),
            site_name: self.mail.site_name.clone(),
            locale: self.mail.locale,
            min_interval_secs: self.rate_limit.min_interval_seconds,
        }
    }

    /// 命令列旗標或設定檔任一要求即輸出 JSON 日誌
    pub fn json_logs(&self, cli_flag: bool) -> bool {
        cli_flag || self.logging.json
    }

    pub fn smtp_settings(&self) -> Result<SmtpSettings> {
        let host = validation::validate_required_field("transport.host", &self.transport.host)?;
        Ok(SmtpSettings {
            host: host.clone(),
            port: self.transport.port,
            username: self.transport.username.clone(),
            password: self.transport.password.clone(),
            security: self.transport.security,
        })
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind", &self.server.bind)?;
        validation::validate_route_path("server.path", &self.server.path)?;
        validation::validate_non_empty_string("server.allowed_origin", &self.server.allowed_origin)?;

        validation::validate_mailbox("mail.to", &self.mail.to)?;
        validation::validate_non_empty_string("mail.from_name", &self.mail.from_name)?;

        match self.transport.kind {
            TransportKind::Smtp => {
                let host = validation::validate_required_field("transport.host", &self.transport.host)?;
                validation::validate_non_empty_string("transport.host", host)?;
                if self.transport.username.is_some() != self.transport.password.is_some() {
                    return Err(ContactError::ConfigValidationError {
                        field: "transport".to_string(),
                        message: "username and password must be set together".to_string(),
                    });
                }
            }
            TransportKind::File => {
                let dir = validation::validate_required_field(
                    "transport.outbox_dir",
                    &self.transport.outbox_dir,
                )?;
                validation::validate_path("transport.outbox_dir", dir)?;
            }
        }

        validation::validate_positive_number(
            "rate_limit.min_interval_seconds",
            self.rate_limit.min_interval_seconds,
            1,
        )?;
        validation::validate_positive_number(
            "rate_limit.session_ttl_seconds",
            self.rate_limit.session_ttl_seconds,
            self.rate_limit.min_interval_seconds,
        )?;

        validation::validate_path("logging.activity_log", &self.logging.activity_log)?;
        validation::validate_path("logging.error_log", &self.logging.error_log)?;
        Ok(())
    }
}
