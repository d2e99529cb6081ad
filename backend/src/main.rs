//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use std::env;
use std::net::SocketAddr;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use backend::inbound::http::health::HealthState;
use backend::server::{CompletionConfig, ServerConfig, create_server};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4-turbo-preview";

fn parse_env_url(name: &str) -> std::io::Result<Option<Url>> {
    match env::var(name) {
        Ok(raw) => Url::parse(&raw)
            .map(Some)
            .map_err(|e| std::io::Error::other(format!("invalid {name}: {e}"))),
        Err(_) => Ok(None),
    }
}

fn config_from_env() -> std::io::Result<ServerConfig> {
    let bind_addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
        .parse()
        .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

    let mut config = ServerConfig::new(bind_addr);

    if let Ok(api_key) = env::var("OPENAI_API_KEY") {
        let endpoint = parse_env_url("OPENAI_ENDPOINT")?.map_or_else(
            || Url::parse(DEFAULT_OPENAI_ENDPOINT).map_err(std::io::Error::other),
            Ok,
        )?;
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into());
        config = config.with_completions(CompletionConfig {
            endpoint,
            api_key,
            model,
        });
    }

    if let Some(endpoint) = parse_env_url("IDENTITY_LOOKUP_URL")? {
        config = config.with_identity_endpoint(endpoint);
    }

    Ok(config)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = config_from_env()?;
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}
