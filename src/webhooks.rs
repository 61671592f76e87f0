use tokio::sync::mpsc::UnboundedSender;

mod error;
pub use error::WebhookError;

pub mod github;
pub use github::{github_webhook, GitHubEvent};

pub struct EventSender(pub UnboundedSender<Event>);

#[derive(Debug)]
pub enum Event {
    GitHub(GitHubEvent),
}
