use rocket::{
    data::{ByteUnit, Limits},
    http::Status,
    request::{FromRequest, Outcome},
    Data, Request, State,
};
use tracing::{debug, info, trace};

mod events;
pub use events::*;

use crate::webhooks::{Event, EventSender, WebhookError};

const X_GITHUB_EVENT: &str = "X-GitHub-Event";

const LIMIT: ByteUnit = ByteUnit::Mebibyte(1);

#[rocket::post("/webhook", data = "<payload>")]
pub async fn github_webhook(
    event_type: Result<GitHubEventType, WebhookError>,
    limits: &Limits,
    payload: Data<'_>,
    sender: &State<EventSender>,
) -> Result<&'static str, WebhookError> {
    let event_type = event_type?;
    info!("received {} event", event_type);

    let size_limit = limits.get("json").unwrap_or(LIMIT);
    let payload = payload.open(size_limit).into_string().await?;
    if !payload.is_complete() {
        trace!("payload was too big");
        return Err(WebhookError::PayloadTooLarge);
    }
    let payload = payload.into_inner();
    trace!("payload: {}", payload);

    let event = GitHubEvent::from_payload(event_type, &payload)?;
    debug!(
        "decoded {} event for {}:{}",
        event.event_type(),
        event.repository().full_name,
        event.deployment().sha
    );

    sender
        .0
        .send(Event::GitHub(event))
        .map_err(|_| WebhookError::RelayClosed)?;

    Ok("OK")
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for GitHubEventType {
    type Error = WebhookError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let event_types = request.headers().get(X_GITHUB_EVENT).collect::<Vec<_>>();
        let event_type = match event_types.as_slice() {
            [event_type] => *event_type,
            [] => {
                trace!("couldn't locate {} header", X_GITHUB_EVENT);
                return Outcome::Error((Status::BadRequest, WebhookError::MissingEventType));
            }
            _ => {
                return Outcome::Error((
                    Status::BadRequest,
                    WebhookError::AmbiguousEventType(event_types.len()),
                ))
            }
        };

        match event_type.parse::<GitHubEventType>() {
            Ok(ev_type) => Outcome::Success(ev_type),
            Err(e) => Outcome::Error((e.status(), e)),
        }
    }
}
