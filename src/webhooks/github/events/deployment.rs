use serde::Deserialize;

use crate::webhooks::github::events::{Deployment, GitHubEvent, Repository};

#[derive(Debug, Deserialize)]
pub struct DeploymentEvent {
    pub repository: Repository,
    pub deployment: Deployment,
}

impl From<DeploymentEvent> for GitHubEvent {
    fn from(event: DeploymentEvent) -> Self {
        GitHubEvent::DeploymentCreated {
            repository: event.repository,
            deployment: event.deployment,
        }
    }
}
