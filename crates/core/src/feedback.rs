//! Feedback form submission and the plain-text mail body built from it.

use serde::Deserialize;
use validator::Validate;

/// Subject line of every feedback mail.
pub const FEEDBACK_SUBJECT: &str = "New feedback from the website";

/// A feedback form as submitted by a visitor. Never persisted.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSubmission {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    pub city_or_region: Option<String>,
    pub organization: Option<String>,
    pub position: Option<String>,
    pub gratitude_expression: Option<String>,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}

impl FeedbackSubmission {
    /// Plain-text body. Optional fields are appended only when supplied
    /// and non-blank.
    pub fn compose_body(&self) -> String {
        let mut body = format!("{FEEDBACK_SUBJECT}\n\n");
        body.push_str(&format!("Name: {}\n", self.name));
        body.push_str(&format!("Email: {}\n", self.email));

        let optional = [
            ("City/Region", &self.city_or_region),
            ("Organization", &self.organization),
            ("Position", &self.position),
            ("Expression of gratitude", &self.gratitude_expression),
        ];
        for (label, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                body.push_str(&format!("{label}: {value}\n"));
            }
        }

        body.push_str(&format!("Message: {}\n", self.message));
        body
    }
}
