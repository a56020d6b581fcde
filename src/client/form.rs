use crate::domain::model::ContactFields;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BANNER_CLEAR_AFTER: Duration = Duration::from_secs(5);
const BANNER_BASE_CLASS: &str = "form__message";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerClass {
    Success,
    Error,
}

impl BannerClass {
    pub fn as_str(self) -> &'static str {
        match self {
            BannerClass::Success => "success",
            BannerClass::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannerState {
    pub text: String,
    pub class: Option<BannerClass>,
}

impl BannerState {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.class.is_none()
    }

    /// The element's full class attribute, e.g. `form__message error`.
    pub fn css_class(&self) -> String {
        match self.class {
            Some(class) => format!("{} {}", BANNER_BASE_CLASS, class.as_str()),
            None => BANNER_BASE_CLASS.to_string(),
        }
    }
}

/// Transient message region under the form.
///
/// Every call to [`Banner::show`] schedules its own clear. Earlier timers are
/// not cancelled, so a message shown late in another message's window is
/// cleared when that earlier window ends.
#[derive(Debug, Clone)]
pub struct Banner {
    state: Arc<Mutex<BannerState>>,
    clear_after: Duration,
}

impl Banner {
    pub fn new(clear_after: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(BannerState::default())),
            clear_after,
        }
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, text: impl Into<String>, class: BannerClass) {
        if let Ok(mut state) = self.state.lock() {
            state.text = text.into();
            state.class = Some(class);
        }

        let state = Arc::clone(&self.state);
        let clear_after = self.clear_after;
        tokio::spawn(async move {
            tokio::time::sleep(clear_after).await;
            if let Ok(mut state) = state.lock() {
                *state = BannerState::default();
            }
        });
    }

    pub fn snapshot(&self) -> BannerState {
        self.state
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }
}

impl Default for Banner {
    fn default() -> Self {
        Self::new(BANNER_CLEAR_AFTER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub disabled: bool,
    pub label: String,
}

/// What the page holds: the entered values and the submit control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactForm {
    pub fields: ContactFields,
    pub button: SubmitButton,
}

impl ContactForm {
    pub fn new(button_label: impl Into<String>) -> Self {
        Self {
            fields: ContactFields::default(),
            button: SubmitButton {
                disabled: false,
                label: button_label.into(),
            },
        }
    }

    pub fn reset(&mut self) {
        self.fields = ContactFields::default();
    }
}
