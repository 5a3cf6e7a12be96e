//! Response bodies shared by the media handlers.

use serde::Serialize;
use utoipa::ToSchema;
use vitrine_core::MediaRecord;

/// A media record together with a human-readable confirmation.
#[derive(Debug, Serialize, ToSchema)]
pub struct MediaEnvelope {
    pub media: MediaRecord,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
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
