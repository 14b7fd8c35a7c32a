//! `aula` — smart-classroom facility dashboards for the terminal.

mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use aula_api::{GatewayClient, TransportConfig};
use aula_core::{Facility, SessionStore};
use aula_config::{CredentialCache, load_config};

use crate::cli::{Cli, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match commands::run(cli).await {
        Ok(()) => {}
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(code);
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aula={default}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the facility service from config plus CLI overrides, then
/// restore any persisted session.
fn build_facility(global: &GlobalOpts) -> Result<Facility, CliError> {
    let mut config = load_config()?;
    if let Some(backend) = &global.backend {
        config.backend = backend.clone();
    }
    if let Some(timeout) = global.timeout {
        config.timeout = timeout;
    }
    if global.insecure {
        config.insecure = true;
    }

    let transport = TransportConfig {
        timeout: Duration::from_secs(config.timeout),
        accept_invalid_certs: config.insecure,
    };
    let gateway = GatewayClient::new(config.backend_url()?, &transport)
        .map_err(|e| CliError::Internal(e.to_string()))?;
    let session = SessionStore::new(Box::new(CredentialCache::new()));

    let facility = Facility::new(gateway, session);
    facility.restore();
    Ok(facility)
}
