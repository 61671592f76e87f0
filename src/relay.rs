use anyhow::Context;
use tokio::{sync::mpsc::UnboundedReceiver, task::JoinSet};
use tracing::{debug, info, trace, warn};

use crate::{config::DatadogConfig, webhooks::Event};

mod datadog;
use datadog::{DatadogClient, DatadogError};

mod github;
use github::handle_github_event;

#[cfg(test)]
mod stub;

/// Turns received webhook events into Datadog events.
pub struct Relay {
    datadog: DatadogClient,
}

impl Relay {
    /// Creates a new [`Relay`] posting to the Datadog API described by the provided
    /// [`DatadogConfig`].
    pub fn new(config: DatadogConfig) -> anyhow::Result<Self> {
        let datadog = DatadogClient::new(config).context("couldn't create Datadog client")?;
        if !datadog.has_credentials() {
            warn!("Datadog credentials are missing, received events won't be submitted");
        }

        Ok(Self { datadog })
    }

    /// Handles events until every [`crate::webhooks::EventSender`] has been dropped, then waits
    /// for pending submissions.
    ///
    /// Each event is submitted from its own task, so a slow answer from Datadog only delays the
    /// event it belongs to.
    pub async fn run(&self, mut events: UnboundedReceiver<Event>) {
        debug!("running...");
        let mut submissions = JoinSet::new();

        loop {
            tokio::select! {
                event = events.recv() => {
                    let event = match event {
                        Some(event) => event,
                        None => {
                            info!("all channel senders were dropped, exiting receive loop");
                            break;
                        }
                    };
                    debug!("received event: {:?}", event);

                    let datadog = self.datadog.clone();
                    submissions.spawn(async move {
                        if let Err(e) = Self::handle_event(&datadog, event).await {
                            warn!("encountered error while submitting event: {}", e);
                        }
                    });
                }
                Some(result) = submissions.join_next(), if !submissions.is_empty() => {
                    if let Err(e) = result {
                        warn!("submission task failed: {}", e);
                    }
                }
            }
        }

        while let Some(result) = submissions.join_next().await {
            if let Err(e) = result {
                warn!("submission task failed: {}", e);
            }
        }
    }

    async fn handle_event(datadog: &DatadogClient, event: Event) -> Result<(), DatadogError> {
        let notification = match event {
            Event::GitHub(event) => handle_github_event(event),
        };

        if !datadog.has_credentials() {
            warn!(
                "no Datadog credentials, skipping event `{}`",
                notification.title
            );
            return Ok(());
        }

        trace!("submitting event `{}`", notification.title);
        datadog.post_event(&notification).await
    }
}
