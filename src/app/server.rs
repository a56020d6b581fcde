use crate::adapters::http::{self, AppState, RouteOptions};
use crate::adapters::log_sink::FileActivityLog;
use crate::adapters::mail::{OutboxMailer, SmtpMailer};
use crate::adapters::session::{InMemorySessionStore, SessionLocks};
use crate::config::toml_config::{TomlConfig, TransportKind};
use crate::core::handler::ContactHandler;
use crate::domain::ports::MailTransport;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

pub fn build_mailer(config: &TomlConfig) -> Result<Arc<dyn MailTransport>> {
    match config.transport.kind {
        TransportKind::Smtp => {
            let smtp = config.smtp_settings()?;
            tracing::info!("📮 Using SMTP relay {} ({:?})", smtp.host, smtp.security);
            Ok(Arc::new(SmtpMailer::new(&smtp)?))
        }
        TransportKind::File => {
            let dir = validation::validate_required_field(
                "transport.outbox_dir",
                &config.transport.outbox_dir,
            )?;
            tracing::info!("📂 Writing outgoing mail to {}", dir);
            Ok(Arc::new(OutboxMailer::new(dir)?))
        }
    }
}

/// Wires handler, session store, logs and transport into the router.
pub fn build_app(config: &TomlConfig, mailer: Arc<dyn MailTransport>) -> Result<Router> {
    let activity = Arc::new(FileActivityLog::new(
        &config.logging.activity_log,
        &config.logging.error_log,
    ));
    let handler = ContactHandler::new(config.contact_settings(), mailer, activity);

    let state = AppState {
        handler: Arc::new(handler),
        sessions: Arc::new(InMemorySessionStore::new(
            config.rate_limit.session_ttl_seconds,
        )),
        locks: SessionLocks::default(),
        trust_forwarded_for: config.server.trust_forwarded_for,
    };
    let options = RouteOptions {
        path: config.server.path.clone(),
        allowed_origin: config.server.allowed_origin.clone(),
    };

    http::router(state, &options)
}

pub async fn run(mut config: TomlConfig, bind_override: Option<String>) -> Result<()> {
    if let Some(bind) = bind_override {
        config.server.bind = bind;
    }
    config.validate()?;

    let addr = validation::validate_socket_addr("server.bind", &config.server.bind)?;
    let mailer = build_mailer(&config)?;
    let app = build_app(&config, mailer)?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(
        "🚀 Contact endpoint listening on http://{}{} (mailbox: {})",
        listener.local_addr()?,
        config.server.path,
        config.mail.to
    );

    http::serve(listener, app).await
}
