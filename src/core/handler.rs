use crate::core::messages::METHOD_NOT_ALLOWED;
use crate::core::rate_limit::RateLimiter;
use crate::core::sanitize::sanitize_fields;
use crate::core::template::EmailRenderer;
use crate::core::validator::validate_fields;
use crate::domain::model::{ContactFields, Locale, SessionContext, SubmitResponse, Submission};
use crate::domain::ports::{ActivityLog, Clock, MailTransport, SystemClock};
use crate::utils::error::ContactError;
use axum::http::{Method, StatusCode};
use std::sync::Arc;
use thiserror::Error;

/// Fixed values read once at startup.
#[derive(Debug, Clone)]
pub struct ContactSettings {
    pub mailbox: String,
    pub sender_name: String,
    pub site_name: String,
    pub locale: Locale,
    pub min_interval_secs: u64,
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("submission rate limited")]
    RateLimited,

    #[error("mail dispatch failed: {0}")]
    Dispatch(ContactError),
}

impl SubmitError {
    pub fn status(&self) -> StatusCode {
        match self {
            SubmitError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            SubmitError::Validation(_) => StatusCode::BAD_REQUEST,
            SubmitError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SubmitError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub status: StatusCode,
    pub body: SubmitResponse,
}

pub struct ContactHandler {
    settings: ContactSettings,
    renderer: EmailRenderer,
    limiter: RateLimiter,
    mailer: Arc<dyn MailTransport>,
    activity: Arc<dyn ActivityLog>,
    clock: Arc<dyn Clock>,
}

impl ContactHandler {
    pub fn new(
        settings: ContactSettings,
        mailer: Arc<dyn MailTransport>,
        activity: Arc<dyn ActivityLog>,
    ) -> Self {
        let renderer = EmailRenderer::new(
            settings.mailbox.clone(),
            settings.sender_name.clone(),
            settings.site_name.clone(),
            settings.locale,
        );
        let limiter = RateLimiter::new(settings.min_interval_secs);
        Self {
            settings,
            renderer,
            limiter,
            mailer,
            activity,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn settings(&self) -> &ContactSettings {
        &self.settings
    }

    /// Runs one request to completion and maps the result onto the wire.
    pub async fn handle(
        &self,
        method: &Method,
        fields: &ContactFields,
        source_address: &str,
        session: &mut SessionContext,
    ) -> SubmitOutcome {
        if *method != Method::POST {
            return self.outcome(Err(SubmitError::MethodNotAllowed));
        }
        let result = self.submit(fields, source_address, session).await;
        self.outcome(result)
    }

    pub async fn submit(
        &self,
        raw: &ContactFields,
        source_address: &str,
        session: &mut SessionContext,
    ) -> Result<SubmitResponse, SubmitError> {
        let catalog = self.settings.locale.catalog();
        let fields = sanitize_fields(raw);

        let errors = validate_fields(&fields, catalog);
        if !errors.is_empty() {
            tracing::warn!(
                source = source_address,
                "Rejected contact submission: {}",
                errors.join(" ")
            );
            return Err(SubmitError::Validation(errors));
        }

        let now = self.clock.now();
        if !self.limiter.check_and_record(session, now) {
            tracing::warn!(
                session = %session.id,
                source = source_address,
                "Contact submission rate limited"
            );
            return Err(SubmitError::RateLimited);
        }

        let submission = Submission {
            phone: (!fields.phone.is_empty()).then(|| fields.phone.clone()),
            name: fields.name,
            email: fields.email,
            message: fields.message,
            received_at: now,
            source_address: source_address.to_string(),
        };

        let email = self.renderer.render(&submission);
        tracing::debug!("Dispatching contact email '{}' to {}", email.subject, email.to);

        if let Err(e) = self.mailer.send(&email).await {
            tracing::error!(
                "Contact form error: Failed to send email to {}: {}",
                self.settings.mailbox,
                e
            );
            if let Err(log_err) = self.activity.record_failure(&self.settings.mailbox, now).await {
                tracing::warn!("Could not write error log entry: {}", log_err);
            }
            return Err(SubmitError::Dispatch(e));
        }

        tracing::info!(
            name = %submission.name,
            email = %submission.email,
            "Contact message delivered"
        );
        if let Err(e) = self.activity.record_delivery(&submission).await {
            tracing::warn!("Could not append to activity log: {}", e);
        }

        Ok(SubmitResponse::ok(catalog.thank_you(&submission.name)))
    }

    fn outcome(&self, result: Result<SubmitResponse, SubmitError>) -> SubmitOutcome {
        let catalog = self.settings.locale.catalog();
        match result {
            Ok(body) => SubmitOutcome {
                status: StatusCode::OK,
                body,
            },
            Err(err) => {
                let message = match &err {
                    SubmitError::MethodNotAllowed => METHOD_NOT_ALLOWED.to_string(),
                    SubmitError::Validation(errors) => errors.join(" "),
                    SubmitError::RateLimited => catalog.rate_limited.to_string(),
                    SubmitError::Dispatch(_) => catalog.dispatch_failed(&self.settings.mailbox),
                };
                SubmitOutcome {
                    status: err.status(),
                    body: SubmitResponse::failed(message),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::OutboundEmail;
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use chrono::{DateTime, Local, TimeDelta};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutboundEmail>>,
        fail: bool,
    }

    #[async_trait]
    impl MailTransport for RecordingMailer {
        async fn send(&self, email: &OutboundEmail) -> Result<()> {
            if self.fail {
                return Err(ContactError::IoError(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "smtp down",
                )));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingLog {
        deliveries: Mutex<Vec<(String, String)>>,
        failures: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ActivityLog for RecordingLog {
        async fn record_delivery(&self, submission: &Submission) -> Result<()> {
            self.deliveries
                .lock()
                .unwrap()
                .push((submission.name.clone(), submission.email.clone()));
            Ok(())
        }

        async fn record_failure(&self, mailbox: &str, _at: DateTime<Local>) -> Result<()> {
            self.failures.lock().unwrap().push(mailbox.to_string());
            Ok(())
        }
    }

    struct ManualClock {
        now: Mutex<DateTime<Local>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Local::now()),
            }
        }

        fn advance(&self, delta: TimeDelta) {
            let mut now = self.now.lock().unwrap();
            *now += delta;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Local> {
            *self.now.lock().unwrap()
        }
    }

    struct Fixture {
        handler: ContactHandler,
        mailer: Arc<RecordingMailer>,
        log: Arc<RecordingLog>,
        clock: Arc<ManualClock>,
    }

    fn settings() -> ContactSettings {
        ContactSettings {
            mailbox: "office@example.com".to_string(),
            sender_name: "Contact Form".to_string(),
            site_name: "SyperWeb".to_string(),
            locale: Locale::En,
            min_interval_secs: 3,
        }
    }

    fn fixture(fail: bool) -> Fixture {
        let mailer = Arc::new(RecordingMailer {
            fail,
            ..Default::default()
        });
        let log = Arc::new(RecordingLog::default());
        let clock = Arc::new(ManualClock::new());
        let handler = ContactHandler::new(settings(), mailer.clone(), log.clone())
            .with_clock(clock.clone());
        Fixture {
            handler,
            mailer,
            log,
            clock,
        }
    }

    fn ivan() -> ContactFields {
        ContactFields::new(
            "Ivan Petrov",
            "ivan@example.com",
            "",
            "Hello, I need a website quote.",
        )
    }

    #[tokio::test]
    async fn test_valid_submission_is_delivered() {
        let fx = fixture(false);
        let mut session = SessionContext::new("s1");

        let outcome = fx
            .handler
            .handle(&Method::POST, &ivan(), "203.0.113.7", &mut session)
            .await;

        assert_eq!(outcome.status, StatusCode::OK);
        assert!(outcome.body.success);
        assert!(outcome.body.message.starts_with("Thank you, Ivan Petrov!"));

        let sent = fx.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "office@example.com");
        assert!(sent[0].text_body.contains("203.0.113.7"));
        assert_eq!(
            *fx.log.deliveries.lock().unwrap(),
            vec![("Ivan Petrov".to_string(), "ivan@example.com".to_string())]
        );
        assert!(session.dirty);
    }

    #[tokio::test]
    async fn test_non_post_is_rejected_without_side_effects() {
        let fx = fixture(false);
        let mut session = SessionContext::new("s1");

        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let outcome = fx
                .handler
                .handle(&method, &ivan(), "203.0.113.7", &mut session)
                .await;
            assert_eq!(outcome.status, StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(outcome.body, SubmitResponse::failed("Method not allowed"));
        }

        assert!(fx.mailer.sent.lock().unwrap().is_empty());
        assert!(!session.dirty);
    }

    #[tokio::test]
    async fn test_validation_errors_are_joined() {
        let fx = fixture(false);
        let mut session = SessionContext::new("s1");
        let fields = ContactFields::new("I", "ivan-at-example", "", "Hello, I need a website quote.");

        let outcome = fx
            .handler
            .handle(&Method::POST, &fields, "203.0.113.7", &mut session)
            .await;

        assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
        assert!(!outcome.body.success);
        assert_eq!(
            outcome.body.message,
            "Name must be at least 2 characters. Please enter a valid email address."
        );
        assert!(fx.mailer.sent.lock().unwrap().is_empty());
        assert!(fx.log.deliveries.lock().unwrap().is_empty());
        // 驗證失敗不會動到 session
        assert!(session.last_submission().is_none());
    }

    #[tokio::test]
    async fn test_whitespace_only_fields_count_as_empty() {
        let fx = fixture(false);
        let mut session = SessionContext::new("s1");
        let fields = ContactFields::new("   ", "ivan@example.com", "", "\n\t  ");

        let outcome = fx
            .handler
            .handle(&Method::POST, &fields, "203.0.113.7", &mut session)
            .await;

        assert_eq!(outcome.status, StatusCode::BAD_REQUEST);
        assert_eq!(outcome.body.message, "Please enter your name. Please write a message.");
    }

    #[tokio::test]
    async fn test_rapid_resubmission_is_rate_limited() {
        let fx = fixture(false);
        let mut session = SessionContext::new("s1");

        let first = fx
            .handler
            .handle(&Method::POST, &ivan(), "203.0.113.7", &mut session)
            .await;
        assert_eq!(first.status, StatusCode::OK);

        fx.clock.advance(TimeDelta::seconds(1));
        let second = fx
            .handler
            .handle(&Method::POST, &ivan(), "203.0.113.7", &mut session)
            .await;
        assert_eq!(second.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            second.body.message,
            "Please wait a moment before sending another message."
        );
        assert_eq!(fx.mailer.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_spaced_submissions_both_succeed() {
        let fx = fixture(false);
        let mut session = SessionContext::new("s1");

        let first = fx
            .handler
            .handle(&Method::POST, &ivan(), "203.0.113.7", &mut session)
            .await;
        fx.clock.advance(TimeDelta::seconds(3));
        let second = fx
            .handler
            .handle(&Method::POST, &ivan(), "203.0.113.7", &mut session)
            .await;

        assert_eq!(first.status, StatusCode::OK);
        assert_eq!(second.status, StatusCode::OK);
        assert_eq!(fx.mailer.sent.lock().unwrap().len(), 2);
        assert_eq!(fx.log.deliveries.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_separate_sessions_are_not_throttled_together() {
        let fx = fixture(false);
        let mut alice = SessionContext::new("a");
        let mut bob = SessionContext::new("b");

        let first = fx
            .handler
            .handle(&Method::POST, &ivan(), "203.0.113.7", &mut alice)
            .await;
        let second = fx
            .handler
            .handle(&Method::POST, &ivan(), "203.0.113.7", &mut bob)
            .await;

        assert_eq!(first.status, StatusCode::OK);
        assert_eq!(second.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_dispatch_failure_logs_once_and_names_mailbox() {
        let fx = fixture(true);
        let mut session = SessionContext::new("s1");

        let outcome = fx
            .handler
            .handle(&Method::POST, &ivan(), "203.0.113.7", &mut session)
            .await;

        assert_eq!(outcome.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!outcome.body.success);
        assert!(outcome.body.message.contains("office@example.com"));
        assert_eq!(
            *fx.log.failures.lock().unwrap(),
            vec!["office@example.com".to_string()]
        );
        assert!(fx.log.deliveries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_markup_is_escaped_before_rendering() {
        let fx = fixture(false);
        let mut session = SessionContext::new("s1");
        let fields = ContactFields::new(
            "<script>",
            "ivan@example.com",
            "",
            "<script>alert('x')</script>",
        );

        let outcome = fx
            .handler
            .handle(&Method::POST, &fields, "203.0.113.7", &mut session)
            .await;
        assert_eq!(outcome.status, StatusCode::OK);
        assert!(outcome.body.message.contains("&lt;script&gt;"));

        let sent = fx.mailer.sent.lock().unwrap();
        assert!(!sent[0].html_body.contains("<script>"));
        assert!(sent[0].html_body.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"));
    }

    #[tokio::test]
    async fn test_empty_phone_is_omitted() {
        let fx = fixture(false);
        let mut session = SessionContext::new("s1");

        fx.handler
            .handle(&Method::POST, &ivan(), "203.0.113.7", &mut session)
            .await;

        let sent = fx.mailer.sent.lock().unwrap();
        assert!(!sent[0].html_body.contains("tel:"));
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(SubmitError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(SubmitError::Validation(vec![]).status(), StatusCode::BAD_REQUEST);
        assert_eq!(SubmitError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
