use crate::core::messages::Catalog;
use crate::domain::model::{Locale, OutboundEmail, Submission};

pub const RECEIVED_AT_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
        .container { max-width: 600px; margin: 0 auto; padding: 20px; }
        .header { background: linear-gradient(135deg, #FF6B35 0%, #E55A2B 100%); color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }
        .content { background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px; }
        .field { margin-bottom: 20px; }
        .label { font-weight: bold; color: #FF6B35; margin-bottom: 5px; }
        .value { background: white; padding: 10px; border-radius: 5px; border-left: 3px solid #FF6B35; }
        .footer { text-align: center; margin-top: 20px; color: #666; font-size: 12px; }
"#;

/// Renders a [`Submission`] into the outbound notification.
///
/// Field values are expected to be HTML-escaped already; the renderer never
/// escapes a second time and never interpolates raw input.
#[derive(Debug, Clone)]
pub struct EmailRenderer {
    mailbox: String,
    sender_name: String,
    site_name: String,
    locale: Locale,
}

impl EmailRenderer {
    pub fn new(
        mailbox: impl Into<String>,
        sender_name: impl Into<String>,
        site_name: impl Into<String>,
        locale: Locale,
    ) -> Self {
        Self {
            mailbox: mailbox.into(),
            sender_name: sender_name.into(),
            site_name: site_name.into(),
            locale,
        }
    }

    pub fn render(&self, submission: &Submission) -> OutboundEmail {
        let catalog = self.locale.catalog();
        OutboundEmail {
            to: self.mailbox.clone(),
            from_name: self.sender_name.clone(),
            from_address: self.mailbox.clone(),
            reply_to_name: submission.name.clone(),
            reply_to_address: submission.email.clone(),
            subject: catalog.subject(&submission.name, &self.site_name),
            html_body: self.render_html(submission, catalog),
            text_body: self.render_text(submission, catalog),
            high_priority: true,
        }
    }

    fn render_html(&self, submission: &Submission, catalog: &Catalog) -> String {
        let received = submission.received_at.format(RECEIVED_AT_FORMAT);
        let mut fields = String::new();

        fields.push_str(&html_field(&format!("👤 {}:", catalog.label_name), &submission.name));
        fields.push_str(&html_field(
            &format!("📧 {}:", catalog.label_email),
            &format!("<a href='mailto:{0}'>{0}</a>", submission.email),
        ));
        if let Some(phone) = &submission.phone {
            fields.push_str(&html_field(
                &format!("📱 {}:", catalog.label_phone),
                &format!("<a href='tel:{0}'>{0}</a>", phone),
            ));
        }
        fields.push_str(&html_field(
            &format!("💬 {}:", catalog.label_message),
            &nl2br(&submission.message),
        ));

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset='UTF-8'>
    <style>{style}</style>
</head>
<body>
    <div class='container'>
        <div class='header'>
            <h1>📧 {heading}</h1>
            <p>{intro} {site}</p>
        </div>
        <div class='content'>
{fields}
            <div class='footer'>
                <p>{received_label}: {received}</p>
                <p>{address_label}: {address}</p>
            </div>
        </div>
    </div>
</body>
</html>
"#,
            style = STYLE,
            heading = catalog.email_heading,
            intro = catalog.email_intro,
            site = self.site_name,
            fields = fields,
            received_label = catalog.label_received,
            received = received,
            address_label = catalog.label_address,
            address = submission.source_address,
        )
    }

    fn render_text(&self, submission: &Submission, catalog: &Catalog) -> String {
        let heading = catalog.text_heading(&self.site_name);
        let mut text = String::new();

        text.push_str(&heading);
        text.push('\n');
        text.push_str(&"=".repeat(heading.chars().count()));
        text.push_str("\n\n");
        text.push_str(&format!("{}: {}\n", catalog.label_name, submission.name));
        text.push_str(&format!("{}: {}\n", catalog.label_email, submission.email));
        if let Some(phone) = &submission.phone {
            text.push_str(&format!("{}: {}\n", catalog.label_phone, phone));
        }
        text.push_str(&format!("\n{}:\n{}\n\n---\n", catalog.label_message, submission.message));
        text.push_str(&format!(
            "{}: {}\n",
            catalog.label_received,
            submission.received_at.format(RECEIVED_AT_FORMAT)
        ));
        text.push_str(&format!("{}: {}\n", catalog.label_address, submission.source_address));
        text
    }
}

fn html_field(label: &str, value: &str) -> String {
    format!(
        "            <div class='field'>\n                <div class='label'>{}</div>\n                <div class='value'>{}</div>\n            </div>\n",
        label, value
    )
}

/// Inserts `<br />` before every line break, keeping the break itself.
pub fn nl2br(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                out.push_str("<br />\r\n");
            }
            '\r' | '\n' => {
                out.push_str("<br />");
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sanitize::sanitize_input;
    use chrono::{Local, TimeZone};

    fn submission(name: &str, phone: Option<&str>, message: &str) -> Submission {
        Submission {
            name: sanitize_input(name),
            email: "ivan@example.com".to_string(),
            phone: phone.map(sanitize_input),
            message: sanitize_input(message),
            received_at: Local.with_ymd_and_hms(2025, 3, 14, 9, 5, 7).unwrap(),
            source_address: "203.0.113.7".to_string(),
        }
    }

    fn renderer() -> EmailRenderer {
        EmailRenderer::new("office@example.com", "Contact Form", "SyperWeb", Locale::En)
    }

    #[test]
    fn test_headers_and_subject() {
        let email = renderer().render(&submission("Ivan Petrov", None, "Hello there, friends"));

        assert_eq!(email.to, "office@example.com");
        assert_eq!(email.from_address, "office@example.com");
        assert_eq!(email.from_name, "Contact Form");
        assert_eq!(email.reply_to_name, "Ivan Petrov");
        assert_eq!(email.reply_to_address, "ivan@example.com");
        assert_eq!(email.subject, "New message from Ivan Petrov - SyperWeb");
        assert!(email.high_priority);
    }

    #[test]
    fn test_markup_in_fields_is_escaped() {
        let email = renderer().render(&submission(
            "<script>alert(1)</script>",
            Some("<b>123</b>"),
            "<img src=x onerror=alert(1)>",
        ));

        assert!(!email.html_body.contains("<script>"));
        assert!(!email.html_body.contains("<img"));
        assert!(!email.html_body.contains("<b>123"));
        assert!(email.html_body.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(email.subject.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_phone_block_only_when_present() {
        let without = renderer().render(&submission("Ivan", None, "Hello there, friends"));
        assert!(!without.html_body.contains("tel:"));
        assert!(!without.text_body.contains("Phone:"));

        let with = renderer().render(&submission("Ivan", Some("+359 888 123 456"), "Hello there, friends"));
        assert!(with.html_body.contains("<a href='tel:+359 888 123 456'>"));
        assert!(with.text_body.contains("Phone: +359 888 123 456\n"));
    }

    #[test]
    fn test_message_line_breaks_preserved() {
        let email = renderer().render(&submission("Ivan", None, "line one\nline two"));
        assert!(email.html_body.contains("line one<br />\nline two"));
        assert!(email.text_body.contains("line one\nline two"));
    }

    #[test]
    fn test_plaintext_has_timestamp_and_address() {
        let email = renderer().render(&submission("Ivan", None, "Hello there, friends"));
        assert!(email.text_body.contains("Received at: 14.03.2025 09:05:07"));
        assert!(email.text_body.contains("IP address: 203.0.113.7"));
        assert!(email.html_body.contains("14.03.2025 09:05:07"));
    }

    #[test]
    fn test_bulgarian_labels() {
        let email = EmailRenderer::new("office@example.com", "Форма", "SyperWeb", Locale::Bg)
            .render(&submission("Иван", None, "Здравейте, искам оферта"));
        assert_eq!(email.subject, "Ново съобщение от Иван - SyperWeb");
        assert!(email.html_body.contains("Съобщение:"));
    }

    #[test]
    fn test_nl2br() {
        assert_eq!(nl2br("a\r\nb"), "a<br />\r\nb");
        assert_eq!(nl2br("a\nb\rc"), "a<br />\nb<br />\rc");
        assert_eq!(nl2br("plain"), "plain");
    }
}
