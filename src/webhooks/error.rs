use rocket::{
    http::Status,
    response::{self, status, Responder},
    serde::json::Json,
    Request,
};
use serde_json::json;
use thiserror::Error;
use tracing::warn;

use crate::webhooks::github::GitHubEventType;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("request header needs an event type")]
    MissingEventType,
    #[error("request header needs exactly one event type, got {0}")]
    AmbiguousEventType(usize),
    #[error("unsupported event type `{0}`")]
    UnsupportedEventType(String),
    #[error("couldn't read payload: {0}")]
    Read(#[from] std::io::Error),
    #[error("payload exceeds the size limit")]
    PayloadTooLarge,
    #[error("couldn't decode {event_type} payload: {source}")]
    Decode {
        event_type: GitHubEventType,
        source: serde_json::Error,
    },
    #[error("relay isn't running, can't accept events")]
    RelayClosed,
}

impl WebhookError {
    pub fn status(&self) -> Status {
        match self {
            Self::MissingEventType
            | Self::AmbiguousEventType(_)
            | Self::UnsupportedEventType(_)
            | Self::Read(_)
            | Self::Decode { .. } => Status::BadRequest,
            Self::PayloadTooLarge => Status::PayloadTooLarge,
            Self::RelayClosed => Status::ServiceUnavailable,
        }
    }
}

impl<'r> Responder<'r, 'static> for WebhookError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        warn!("rejecting webhook: {}", self);

        let body = Json(json!({ "error": self.to_string() }));
        status::Custom(self.status(), body).respond_to(request)
    }
}
