use std::{net::IpAddr, time::Duration};

use anyhow::Context;
use clap::Parser;
use rocket::routes;
use tokio::sync::mpsc::unbounded_channel;
use url::Url;

mod config;
use config::{DatadogConfig, DatadogCredentials, RelayConfig};

mod relay;
use relay::Relay;

mod webhooks;
use webhooks::{github_webhook, EventSender};

#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// Port the webhook endpoint listens on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    port: u16,
    /// Address the webhook endpoint listens on
    #[arg(short, long, env = "ADDRESS", default_value = "0.0.0.0")]
    address: IpAddr,
    /// Datadog API key
    #[arg(long, env = "DATADOG_API_KEY", hide_env_values = true)]
    datadog_api_key: Option<String>,
    /// Datadog application key
    #[arg(long, env = "DATADOG_APP_KEY", hide_env_values = true)]
    datadog_app_key: Option<String>,
    /// Base URL of the Datadog API
    #[arg(long, env = "DATADOG_HOST", default_value = "https://api.datadoghq.com")]
    datadog_host: Url,
    /// Seconds to wait for Datadog before giving up on an event
    #[arg(long, env = "DATADOG_TIMEOUT", default_value_t = 10)]
    datadog_timeout: u64,
}

impl From<Opts> for RelayConfig {
    fn from(opts: Opts) -> Self {
        RelayConfig {
            address: opts.address,
            port: opts.port,
            datadog: DatadogConfig {
                host: opts.datadog_host,
                credentials: DatadogCredentials::from_keys(
                    opts.datadog_api_key,
                    opts.datadog_app_key,
                ),
                timeout: Duration::from_secs(opts.datadog_timeout),
            },
        }
    }
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = RelayConfig::from(Opts::parse());

    let (sender, receiver) = unbounded_channel();

    let relay = Relay::new(config.datadog.clone()).context("failed to create relay")?;
    tokio::spawn(async move { relay.run(receiver).await });

    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port));
    let rocket = rocket::custom(figment)
        .mount("/", routes![github_webhook])
        .manage(EventSender(sender));
    rocket
        .launch()
        .await
        .map(|_| ())
        .map_err(|err| anyhow::anyhow!(err))
}
