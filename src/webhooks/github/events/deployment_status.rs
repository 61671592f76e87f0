use serde::Deserialize;

use crate::webhooks::github::events::{Deployment, GitHubEvent, Repository};

#[derive(Debug, Deserialize)]
pub struct DeploymentStatusEvent {
    pub repository: Repository,
    pub deployment: Deployment,
    pub deployment_status: DeploymentStatus,
}

#[derive(Debug, Deserialize)]
pub struct DeploymentStatus {
    /// `pending`, `success`, `failure`, `error`, ... kept as a string since GitHub keeps adding
    /// new states
    pub state: String,
    // GitHub sends either null or an empty string when no URL was given
    pub target_url: Option<String>,
}

impl DeploymentStatus {
    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref().filter(|url| !url.is_empty())
    }
}

impl From<DeploymentStatusEvent> for GitHubEvent {
    fn from(event: DeploymentStatusEvent) -> Self {
        GitHubEvent::DeploymentStatusChanged {
            repository: event.repository,
            deployment: event.deployment,
            status: event.deployment_status,
        }
    }
}
