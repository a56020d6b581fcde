use crate::domain::model::Locale;

/// Static user-facing texts for one locale.
#[derive(Debug)]
pub struct Catalog {
    pub name_missing: &'static str,
    pub name_too_short: &'static str,
    pub email_missing: &'static str,
    pub email_invalid: &'static str,
    pub message_missing: &'static str,
    pub message_too_short: &'static str,
    pub rate_limited: &'static str,
    pub required_fields: &'static str,
    pub sending: &'static str,
    pub network_failure: &'static str,
    pub email_heading: &'static str,
    pub email_intro: &'static str,
    pub label_name: &'static str,
    pub label_email: &'static str,
    pub label_phone: &'static str,
    pub label_message: &'static str,
    pub label_received: &'static str,
    pub label_address: &'static str,
    thank_you: (&'static str, &'static str),
    dispatch_failed: &'static str,
    subject: (&'static str, &'static str),
    text_heading: &'static str,
}

static EN: Catalog = Catalog {
    name_missing: "Please enter your name.",
    name_too_short: "Name must be at least 2 characters.",
    email_missing: "Please enter your email.",
    email_invalid: "Please enter a valid email address.",
    message_missing: "Please write a message.",
    message_too_short: "Message must be at least 10 characters.",
    rate_limited: "Please wait a moment before sending another message.",
    required_fields: "Please fill in all required fields.",
    sending: "Sending...",
    network_failure: "An error occurred while sending. Please try again or contact us directly.",
    email_heading: "New Message",
    email_intro: "From the contact form of",
    label_name: "Name",
    label_email: "Email",
    label_phone: "Phone",
    label_message: "Message",
    label_received: "Received at",
    label_address: "IP address",
    thank_you: (
        "Thank you, ",
        "! Your message has been sent successfully. We will get back to you soon.",
    ),
    dispatch_failed: "An error occurred while sending your message. Please try again or contact us directly at ",
    subject: ("New message from ", " - "),
    text_heading: "New message from the contact form of",
};

static BG: Catalog = Catalog {
    name_missing: "Моля, въведете вашето име.",
    name_too_short: "Името трябва да е поне 2 символа.",
    email_missing: "Моля, въведете вашия email.",
    email_invalid: "Моля, въведете валиден email адрес.",
    message_missing: "Моля, напишете съобщение.",
    message_too_short: "Съобщението трябва да е поне 10 символа.",
    rate_limited: "Моля, изчакайте малко преди да изпратите ново съобщение.",
    required_fields: "Моля, попълнете всички задължителни полета.",
    sending: "Изпраща се...",
    network_failure: "Възникна грешка при изпращането. Моля, опитайте отново или се свържете с нас директно.",
    email_heading: "Ново Съобщение",
    email_intro: "От контактната форма на",
    label_name: "Име",
    label_email: "Email",
    label_phone: "Телефон",
    label_message: "Съобщение",
    label_received: "Получено на",
    label_address: "IP адрес",
    thank_you: (
        "Благодарим ви, ",
        "! Вашето съобщение беше изпратено успешно. Ще се свържем с вас скоро.",
    ),
    dispatch_failed: "Възникна грешка при изпращането на съобщението. Моля, опитайте отново или се свържете с нас директно на ",
    subject: ("Ново съобщение от ", " - "),
    text_heading: "Ново съобщение от контактната форма на",
};

/// Never localized.
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

impl Locale {
    pub fn catalog(self) -> &'static Catalog {
        match self {
            Locale::En => &EN,
            Locale::Bg => &BG,
        }
    }
}

impl Catalog {
    pub fn thank_you(&self, name: &str) -> String {
        format!("{}{}{}", self.thank_you.0, name, self.thank_you.1)
    }

    pub fn dispatch_failed(&self, mailbox: &str) -> String {
        format!("{}{}", self.dispatch_failed, mailbox)
    }

    pub fn subject(&self, name: &str, site_name: &str) -> String {
        format!("{}{}{}{}", self.subject.0, name, self.subject.1, site_name)
    }

    pub fn text_heading(&self, site_name: &str) -> String {
        format!("{} {}", self.text_heading, site_name)
    }
}
