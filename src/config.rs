use std::{net::IpAddr, time::Duration};

use url::Url;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the webhook endpoint listens on
    pub address: IpAddr,
    /// Port the webhook endpoint listens on
    pub port: u16,
    pub datadog: DatadogConfig,
}

#[derive(Debug, Clone)]
pub struct DatadogConfig {
    /// Base URL of the Datadog API, e.g. `https://api.datadoghq.eu`
    pub host: Url,
    /// Keys used to authenticate against the events API. Events are not submitted at all when
    /// they're missing.
    pub credentials: Option<DatadogCredentials>,
    /// Upper bound for a single submission, connecting included
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct DatadogCredentials {
    pub api_key: String,
    pub app_key: String,
}

impl DatadogCredentials {
    /// Only returns credentials if both keys are present and non-empty.
    pub fn from_keys(api_key: Option<String>, app_key: Option<String>) -> Option<Self> {
        let api_key = api_key.filter(|key| !key.is_empty())?;
        let app_key = app_key.filter(|key| !key.is_empty())?;

        Some(Self { api_key, app_key })
    }
}

// keys must never end up in logs
impl std::fmt::Debug for DatadogCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatadogCredentials")
            .field("api_key", &"<redacted>")
            .field("app_key", &"<redacted>")
            .finish()
    }
}
