use crate::client::form::{Banner, BannerClass, ContactForm};
use crate::client::transport::SubmitTransport;
use crate::core::messages::Catalog;
use crate::domain::model::{ContactFields, Locale, SubmitResponse};
use regex::Regex;
use std::sync::{Arc, LazyLock, Mutex};

static EMAIL_SHAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email shape pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The control was already disabled; nothing happened.
    Ignored,
    /// The local pre-check failed; no request was made.
    Rejected(String),
    /// The endpoint answered with JSON.
    Answered(SubmitResponse),
    /// The request never completed.
    NetworkFailed,
}

/// Cheap shape check before any network call. The server stays authoritative.
pub fn precheck(fields: &ContactFields, catalog: &Catalog) -> Result<(), &'static str> {
    if fields.name.is_empty() || fields.email.is_empty() || fields.message.is_empty() {
        return Err(catalog.required_fields);
    }
    if !EMAIL_SHAPE_RE.is_match(&fields.email) {
        return Err(catalog.email_invalid);
    }
    Ok(())
}

/// Drives one contact form: pre-check, submit, banner.
pub struct FormController<T: SubmitTransport> {
    transport: T,
    form: Arc<Mutex<ContactForm>>,
    banner: Banner,
    catalog: &'static Catalog,
}

impl<T: SubmitTransport> FormController<T> {
    pub fn new(transport: T, locale: Locale) -> Self {
        Self {
            transport,
            form: Arc::new(Mutex::new(ContactForm::new("Send Message"))),
            banner: Banner::default(),
            catalog: locale.catalog(),
        }
    }

    pub fn with_banner(mut self, banner: Banner) -> Self {
        self.banner = banner;
        self
    }

    pub fn with_button_label(self, label: impl Into<String>) -> Self {
        if let Ok(mut form) = self.form.lock() {
            form.button.label = label.into();
        }
        self
    }

    pub fn fill(&self, fields: ContactFields) {
        if let Ok(mut form) = self.form.lock() {
            form.fields = fields;
        }
    }

    pub fn form(&self) -> Option<ContactForm> {
        self.form.lock().ok().map(|form| form.clone())
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    /// Handles the form's submit event.
    pub async fn submit(&self) -> SubmitOutcome {
        // 在送出請求前同步停用按鈕
        let (fields, original_label) = {
            let Ok(mut form) = self.form.lock() else {
                return SubmitOutcome::Ignored;
            };
            if form.button.disabled {
                return SubmitOutcome::Ignored;
            }
            if let Err(reason) = precheck(&form.fields, self.catalog) {
                drop(form);
                self.banner.show(reason, BannerClass::Error);
                return SubmitOutcome::Rejected(reason.to_string());
            }
            form.button.disabled = true;
            let original = std::mem::replace(&mut form.button.label, self.catalog.sending.to_string());
            (form.fields.clone(), original)
        };

        let result = self.transport.submit(&fields).await;

        if let Ok(mut form) = self.form.lock() {
            form.button.disabled = false;
            form.button.label = original_label;
            if matches!(&result, Ok(response) if response.success) {
                form.reset();
            }
        }

        match result {
            Ok(response) => {
                let class = if response.success {
                    BannerClass::Success
                } else {
                    BannerClass::Error
                };
                self.banner.show(response.message.clone(), class);
                SubmitOutcome::Answered(response)
            }
            Err(e) => {
                tracing::error!("Form submission error: {}", e);
                self.banner.show(self.catalog.network_failure, BannerClass::Error);
                SubmitOutcome::NetworkFailed
            }
        }
    }
}
