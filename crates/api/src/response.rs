//! Small response bodies shared by several handlers.

use serde::Serialize;

/// `{ "message": "..." }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Returned after a photo is stored and attached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoStored {
    pub message: String,
    pub photo_path: String,
}

/// Returned by the batch photo path update.
#[derive(Debug, Serialize)]
pub struct BatchUpdated {
    pub updated: u64,
}
