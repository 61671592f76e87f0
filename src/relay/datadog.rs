use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;
use tracing::trace;
use url::Url;

use crate::config::{DatadogConfig, DatadogCredentials};

const EVENTS_ENDPOINT: &str = "api/v1/events";
const DD_API_KEY: &str = "DD-API-KEY";
const DD_APPLICATION_KEY: &str = "DD-APPLICATION-KEY";
const SOURCE_TYPE_NAME: &str = "github";

#[derive(Debug, Error)]
pub enum DatadogError {
    #[error("no Datadog API and application keys configured")]
    MissingCredentials,
    #[error("couldn't build events endpoint URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request to Datadog failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Datadog rejected event with status {status}: {body}")]
    Rejected { status: StatusCode, body: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Info,
    Success,
    Warning,
    Error,
}

/// An event as shown in the Datadog event stream.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    /// Markdown body, empty when there's nothing more to say than the title
    pub text: String,
    pub alert_type: AlertType,
    pub tags: Vec<String>,
}

#[derive(Serialize)]
struct EventBody<'a> {
    #[serde(flatten)]
    notification: &'a Notification,
    source_type_name: &'static str,
}

#[derive(Clone)]
pub struct DatadogClient {
    http: Client,
    endpoint: Url,
    credentials: Option<DatadogCredentials>,
}

impl DatadogClient {
    pub fn new(config: DatadogConfig) -> Result<Self, DatadogError> {
        let endpoint = config.host.join(EVENTS_ENDPOINT)?;
        let http = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            credentials: config.credentials,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    fn build_request(&self, notification: &Notification) -> Result<reqwest::Request, DatadogError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(DatadogError::MissingCredentials)?;

        let request = self
            .http
            .post(self.endpoint.clone())
            .header(DD_API_KEY, &credentials.api_key)
            .header(DD_APPLICATION_KEY, &credentials.app_key)
            .json(&EventBody {
                notification,
                source_type_name: SOURCE_TYPE_NAME,
            })
            .build()?;

        Ok(request)
    }

    /// Submits `notification` once, failures are returned as is and never retried.
    pub async fn post_event(&self, notification: &Notification) -> Result<(), DatadogError> {
        let request = self.build_request(notification)?;
        trace!("posting event to {}", request.url());

        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DatadogError::Rejected { status, body });
        }

        trace!("Datadog accepted event with status {}", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::{json, Value};

    use crate::relay::stub;

    use super::*;

    fn credentials() -> Option<DatadogCredentials> {
        Some(DatadogCredentials {
            api_key: "api".to_string(),
            app_key: "app".to_string(),
        })
    }

    fn client_for(host: Url, credentials: Option<DatadogCredentials>) -> DatadogClient {
        DatadogClient::new(DatadogConfig {
            host,
            credentials,
            timeout: Duration::from_millis(300),
        })
        .expect("valid client")
    }

    fn client(credentials: Option<DatadogCredentials>) -> DatadogClient {
        client_for(Url::parse("https://api.datadoghq.eu").unwrap(), credentials)
    }

    fn notification() -> Notification {
        Notification {
            title: "Deployment of acme/app:abc123 is success.".to_string(),
            text: "Status: [success](https://ci.example.com/42)".to_string(),
            alert_type: AlertType::Success,
            tags: vec!["repo:acme/app".to_string(), "sha:abc123".to_string()],
        }
    }

    fn request_body(request: &reqwest::Request) -> Value {
        let body = request.body().and_then(|b| b.as_bytes()).expect("buffered body");
        serde_json::from_slice(body).unwrap()
    }

    #[test]
    fn test_build_request() {
        let client = client(credentials());

        let request = client.build_request(&notification()).unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(
            request.url().as_str(),
            "https://api.datadoghq.eu/api/v1/events"
        );
        assert_eq!(request.headers()[DD_API_KEY], "api");
        assert_eq!(request.headers()[DD_APPLICATION_KEY], "app");
        assert_eq!(
            request_body(&request),
            json!({
                "title": "Deployment of acme/app:abc123 is success.",
                "text": "Status: [success](https://ci.example.com/42)",
                "alert_type": "success",
                "tags": ["repo:acme/app", "sha:abc123"],
                "source_type_name": "github",
            })
        );
    }

    #[test]
    fn test_empty_text_is_sent() {
        let client = client(credentials());
        let notification = Notification {
            text: String::new(),
            alert_type: AlertType::Info,
            ..notification()
        };

        let body = request_body(&client.build_request(&notification).unwrap());

        assert_eq!(body["text"], "");
        assert_eq!(body["alert_type"], "info");
    }

    #[test]
    fn test_missing_credentials() {
        let client = client(None);

        assert!(!client.has_credentials());
        assert!(matches!(
            client.build_request(&notification()),
            Err(DatadogError::MissingCredentials)
        ));
    }

    #[tokio::test]
    async fn test_post_event() {
        let (host, mut bodies) = stub::responding(vec![202]).await;
        let client = client_for(host, credentials());

        client.post_event(&notification()).await.unwrap();

        let body: Value = serde_json::from_str(&bodies.recv().await.unwrap()).unwrap();
        assert_eq!(body["title"], "Deployment of acme/app:abc123 is success.");
    }

    #[tokio::test]
    async fn test_rejected_event() {
        let (host, _bodies) = stub::responding(vec![500]).await;
        let client = client_for(host, credentials());

        match client.post_event(&notification()).await {
            Err(DatadogError::Rejected { status, body }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "stub failure");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unresponsive_api_times_out() {
        let (host, _accepted) = stub::silent().await;
        let client = client_for(host, credentials());

        match client.post_event(&notification()).await {
            Err(DatadogError::Request(e)) => assert!(e.is_timeout()),
            other => panic!("unexpected result {:?}", other),
        }
    }
}
