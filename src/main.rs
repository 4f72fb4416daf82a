use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use ceptemp::service::{forwarder, orchestrator};
use ceptemp::{
    providers, telemetry, web, ForwarderState, OrchestratorState, ServiceConfig, ViaCepClient,
    WttrClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::load()?;

    let tracer_provider =
        telemetry::init(&config.telemetry).context("initializing telemetry")?;

    let timeout = Duration::from_secs(config.providers.timeout_seconds);
    let insecure = config.providers.insecure_tls;

    let addresses = Arc::new(ViaCepClient::new(
        providers::build_client(timeout, insecure)?,
        config.providers.viacep_base_url.clone(),
    ));
    let temperatures = Arc::new(WttrClient::new(
        providers::build_client(timeout, insecure)?,
        config.providers.wttr_base_url.clone(),
    ));

    let resolver_app = orchestrator::router(OrchestratorState::new(
        addresses,
        temperatures,
        config.resolver.include_city,
    ));
    let entry_app = forwarder::router(ForwarderState::new(
        providers::build_client(timeout, insecure)?,
        config.entry.downstream_url.clone(),
    ));

    web::run(
        &config.entry.listen_addr,
        &config.resolver.listen_addr,
        entry_app,
        resolver_app,
    )
    .await?;

    if let Err(error) = tracer_provider.shutdown() {
        warn!(%error, "tracer shutdown error");
    }

    Ok(())
}
