use crate::domain::model::OutboundEmail;
use crate::domain::ports::MailTransport;
use crate::utils::error::Result;
use async_trait::async_trait;
use lettre::message::header::{Header, HeaderName, HeaderValue};
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{
    Address, AsyncFileTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

macro_rules! text_header {
    ($ty:ident, $name:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $ty(pub String);

        impl Header for $ty {
            fn name() -> HeaderName {
                HeaderName::new_from_ascii_str($name)
            }

            fn parse(s: &str) -> std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> {
                Ok(Self(s.to_string()))
            }

            fn display(&self) -> HeaderValue {
                HeaderValue::new(Self::name(), self.0.clone())
            }
        }
    };
}

text_header!(XPriority, "X-Priority");
text_header!(Importance, "Importance");
text_header!(XMailer, "X-Mailer");

const MAILER_NAME: &str = concat!("contact-form/", env!("CARGO_PKG_VERSION"));

/// Builds a multipart/alternative message (plaintext + UTF-8 HTML).
pub fn build_message(email: &OutboundEmail) -> Result<Message> {
    let from = Mailbox::new(
        Some(email.from_name.clone()),
        email.from_address.parse::<Address>()?,
    );
    let reply_to = Mailbox::new(
        Some(email.reply_to_name.clone()),
        email.reply_to_address.parse::<Address>()?,
    );
    let to = Mailbox::new(None, email.to.parse::<Address>()?);

    let mut builder = Message::builder()
        .from(from)
        .reply_to(reply_to)
        .to(to)
        .subject(email.subject.clone())
        .header(XMailer(MAILER_NAME.to_string()));

    if email.high_priority {
        builder = builder
            .header(XPriority("1".to_string()))
            .header(Importance("High".to_string()));
    }

    let message = builder.multipart(MultiPart::alternative_plain_html(
        email.text_body.clone(),
        email.html_body.clone(),
    ))?;
    Ok(message)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Implicit TLS (usually port 465).
    Tls,
    #[default]
    Starttls,
    /// Plain connection, for local relays only.
    Plain,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub security: SmtpSecurity,
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let mut builder = match settings.security {
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?,
            SmtpSecurity::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            }
            SmtpSecurity::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host),
        };

        if let Some(port) = settings.port {
            builder = builder.port(port);
        }
        if let (Some(user), Some(pass)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        let message = build_message(email)?;
        let response = self.transport.send(message).await?;
        tracing::debug!("SMTP relay accepted message: {:?}", response.code());
        Ok(())
    }
}

/// Writes every message as an `.eml` file into a directory.
pub struct OutboxMailer {
    dir: PathBuf,
    transport: AsyncFileTransport<Tokio1Executor>,
}

impl OutboxMailer {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        let transport = AsyncFileTransport::<Tokio1Executor>::new(&dir);
        Ok(Self { dir, transport })
    }
}

#[async_trait]
impl MailTransport for OutboxMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        let message = build_message(email)?;
        let id = self.transport.send(message).await?;
        tracing::debug!("Message {} written to {}", id, self.dir.display());
        Ok(())
    }
}
