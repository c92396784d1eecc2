//! Contact form model

use serde::{Deserialize, Serialize};

use crate::models::validation::{require_text, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDto {
    pub subject: Option<String>,
    pub message: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// A contact message rendered for delivery to the administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub subject: String,
    pub html_body: String,
}

impl EmailDto {
    pub fn validate(&self) -> Result<ContactMessage, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let subject = require_text(&mut errors, "subject", self.subject.as_deref());
        let message = require_text(&mut errors, "message", self.message.as_deref());

        match (subject, message) {
            (Some(subject), Some(message)) => Ok(ContactMessage {
                subject: format!("Contact Form - {}", subject),
                html_body: format!(
                    "{} - {} <br/><br/>{}",
                    html_escape(self.name.as_deref().unwrap_or_default()),
                    html_escape(self.email.as_deref().unwrap_or_default()),
                    html_escape(message)
                ),
            }),
            _ => Err(errors),
        }
    }
}

/// Escapes text interpolated into the HTML body.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
