//! MoveCar Invoke - run one serverless platform event through the adapters.
//!
//! Reads a platform event as JSON (stdin or `--event`), picks the adapter by
//! platform detection (or `--platform`), and prints the platform response
//! as JSON on stdout. Logs go to stderr.
//!
//! Event shapes:
//! - vercel: `{"method": "POST", "body": {...}}`
//! - netlify: `{"httpMethod": "POST", "body": "{...}", "isBase64Encoded": false}`
//! - cloudflare: `{"method": "POST", "body": "{...}"}`

use std::{collections::BTreeMap, io::Read, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use movecar::platform::{
    handle_fetch, handle_netlify, handle_vercel, FetchRequest, NetlifyEvent, VercelRequest,
};
use movecar::{AppState, Config, Endpoint, Platform};

#[derive(Debug, Parser)]
#[command(name = "movecar-invoke", about = "Invoke a MoveCar function with a platform event")]
struct Args {
    /// Function to invoke: notification | valid-reqid
    #[arg(long, default_value = "notification")]
    endpoint: Endpoint,

    /// Override platform detection: vercel | netlify | cloudflare
    #[arg(long)]
    platform: Option<Platform>,

    /// Read the event from a file instead of stdin
    #[arg(long)]
    event: Option<PathBuf>,
}

/// Fetch-style response rendered as JSON.
#[derive(Serialize)]
struct FetchOutput {
    status: u16,
    headers: BTreeMap<String, String>,
    body: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true).with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let platform = args.platform.unwrap_or_else(|| Platform::detect(&config));

    info!(platform = %platform, endpoint = %args.endpoint, "invoke_starting");

    let raw = match &args.event {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read event file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            buf
        }
    };

    let state = AppState::new(config);

    let output = match platform {
        Platform::Vercel => {
            let request: VercelRequest =
                serde_json::from_str(&raw).context("Invalid Vercel request event")?;
            serde_json::to_string(&handle_vercel(args.endpoint, request, &state).await)?
        }
        Platform::Netlify => {
            let event: NetlifyEvent =
                serde_json::from_str(&raw).context("Invalid Netlify event")?;
            serde_json::to_string(&handle_netlify(args.endpoint, event, &state).await)?
        }
        Platform::Cloudflare => {
            let request: FetchRequest =
                serde_json::from_str(&raw).context("Invalid fetch request event")?;
            let response = handle_fetch(args.endpoint, request, &state).await;
            let headers = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
                .collect();
            serde_json::to_string(&FetchOutput {
                status: response.status().as_u16(),
                headers,
                body: response.into_body(),
            })?
        }
    };

    println!("{output}");

    info!("invoke_complete");

    Ok(())
}
