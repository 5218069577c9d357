use std::sync::Arc;

use wealthlist_core::feedback::{FeedbackSubmission, FEEDBACK_SUBJECT};

use crate::mail::{MailError, Mailer, OutgoingMail};

/// Forwards feedback submissions by email. Input is validated by the
/// handler before it gets here.
#[derive(Clone)]
pub struct FeedbackService {
    mailer: Arc<dyn Mailer>,
}

impl FeedbackService {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    pub async fn send(&self, submission: &FeedbackSubmission) -> Result<(), MailError> {
        tracing::info!(op = "feedback.send", from = %submission.email, "Sending feedback");

        let mail = OutgoingMail {
            subject: FEEDBACK_SUBJECT.to_string(),
            body: submission.compose_body(),
            reply_to: Some(submission.email.clone()),
        };

        self.mailer.send(mail).await.inspect_err(|e| {
            tracing::error!(op = "feedback.send", from = %submission.email, error = %e, "Feedback delivery failed");
        })?;

        tracing::info!(op = "feedback.send", "Feedback sent");
        Ok(())
    }
}
