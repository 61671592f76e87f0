use crate::{
    relay::datadog::{AlertType, Notification},
    webhooks::github::{Deployment, DeploymentStatus, GitHubEvent, Repository},
};

pub fn handle_github_event(event: GitHubEvent) -> Notification {
    match event {
        GitHubEvent::DeploymentCreated {
            repository,
            deployment,
        } => Notification {
            title: format!(
                "Deployment of {} started.",
                deployment_ref(&repository, &deployment)
            ),
            text: String::new(),
            alert_type: AlertType::Info,
            tags: tags(&repository, &deployment),
        },
        GitHubEvent::DeploymentStatusChanged {
            repository,
            deployment,
            status,
        } => Notification {
            title: format!(
                "Deployment of {} is {}.",
                deployment_ref(&repository, &deployment),
                status.state
            ),
            text: status_text(&status),
            alert_type: alert_type(&status.state),
            tags: tags(&repository, &deployment),
        },
    }
}

fn deployment_ref(repository: &Repository, deployment: &Deployment) -> String {
    format!("{}:{}", repository.full_name, deployment.sha)
}

fn status_text(status: &DeploymentStatus) -> String {
    match status.target_url() {
        Some(url) => format!("Status: [{}]({})", status.state, url),
        None => format!("Status: {}", status.state),
    }
}

fn alert_type(state: &str) -> AlertType {
    match state {
        "success" => AlertType::Success,
        "failure" | "error" => AlertType::Error,
        "inactive" => AlertType::Warning,
        _ => AlertType::Info,
    }
}

fn tags(repository: &Repository, deployment: &Deployment) -> Vec<String> {
    let mut tags = vec![
        format!("repo:{}", repository.full_name),
        format!("sha:{}", deployment.sha),
    ];
    if let Some(environment) = &deployment.environment {
        tags.push(format!("environment:{}", environment));
    }

    tags
}
