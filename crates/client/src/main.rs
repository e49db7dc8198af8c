//! `scanstock`: drive the cartridge scan core from stdin.

use std::sync::Arc;

use anyhow::Context;
use scanstock_client::{ClientConfig, run};
use scanstock_gateway::{GraphqlGateway, HttpDocsGateway};
use scanstock_store::{State, Store};
use scanstock_sync::ScanController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging comes up first so configuration warnings are not lost.
    let log_format = std::env::var("SCANSTOCK_LOG_FORMAT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_default();
    scanstock_observability::init_with(log_format);

    let config = ClientConfig::from_env();

    tracing::info!(
        cartridge_server_url = %config.cartridge_server_url,
        docs_server_url = %config.docs_server_url,
        trigger = ?config.trigger,
        "starting scanstock client"
    );

    let gateway =
        GraphqlGateway::new(config.http_timeout).context("failed to build cartridge gateway")?;
    let docs =
        HttpDocsGateway::new(config.http_timeout).context("failed to build documents gateway")?;

    let store = Store::new(State::with_settings(config.settings()));
    let mut controller = ScanController::new(store, Arc::new(gateway), config.trigger)
        .context("failed to attach scan controller")?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout().lock();
    run(&mut controller, &docs, stdin, &mut stdout).await?;

    tracing::info!("input closed; exiting");
    Ok(())
}
