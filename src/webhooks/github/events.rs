use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

use crate::webhooks::WebhookError;

mod deployment;
mod deployment_status;

pub use deployment::*;
pub use deployment_status::*;

/// Value of the `X-GitHub-Event` header for the events we relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitHubEventType {
    Deployment,
    DeploymentStatus,
}

impl GitHubEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::DeploymentStatus => "deployment_status",
        }
    }
}

impl Display for GitHubEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GitHubEventType {
    type Err = WebhookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deployment" => Ok(Self::Deployment),
            "deployment_status" => Ok(Self::DeploymentStatus),
            other => Err(WebhookError::UnsupportedEventType(other.to_owned())),
        }
    }
}

#[derive(Debug)]
pub enum GitHubEvent {
    DeploymentCreated {
        repository: Repository,
        deployment: Deployment,
    },
    DeploymentStatusChanged {
        repository: Repository,
        deployment: Deployment,
        status: DeploymentStatus,
    },
}

impl GitHubEvent {
    /// Decodes `payload` with the schema matching `event_type`.
    pub fn from_payload(event_type: GitHubEventType, payload: &str) -> Result<Self, WebhookError> {
        let event = match event_type {
            GitHubEventType::Deployment => {
                serde_json::from_str::<DeploymentEvent>(payload).map(Self::from)
            }
            GitHubEventType::DeploymentStatus => {
                serde_json::from_str::<DeploymentStatusEvent>(payload).map(Self::from)
            }
        };

        event.map_err(|source| WebhookError::Decode { event_type, source })
    }

    pub fn event_type(&self) -> GitHubEventType {
        match self {
            Self::DeploymentCreated { .. } => GitHubEventType::Deployment,
            Self::DeploymentStatusChanged { .. } => GitHubEventType::DeploymentStatus,
        }
    }

    pub fn repository(&self) -> &Repository {
        match self {
            Self::DeploymentCreated { repository, .. }
            | Self::DeploymentStatusChanged { repository, .. } => repository,
        }
    }

    pub fn deployment(&self) -> &Deployment {
        match self {
            Self::DeploymentCreated { deployment, .. }
            | Self::DeploymentStatusChanged { deployment, .. } => deployment,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub full_name: String,
}

#[derive(Debug, Deserialize)]
pub struct Deployment {
    pub sha: String,
    pub environment: Option<String>,
}
