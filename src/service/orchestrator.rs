//! Orchestration handler: validate, resolve address, resolve
//! temperature, convert units.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::{info_span, Instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::error::ServiceError;
use crate::models::{PostalCode, TemperatureRequest, TemperatureResponse};
use crate::providers::{AddressResolver, TemperatureResolver};
use crate::telemetry;

/// Shared state of the resolver service.
#[derive(Clone)]
pub struct OrchestratorState {
    addresses: Arc<dyn AddressResolver>,
    temperatures: Arc<dyn TemperatureResolver>,
    include_city: bool,
}

impl OrchestratorState {
    pub fn new(
        addresses: Arc<dyn AddressResolver>,
        temperatures: Arc<dyn TemperatureResolver>,
        include_city: bool,
    ) -> Self {
        Self {
            addresses,
            temperatures,
            include_city,
        }
    }
}

/// Routes of the resolver service. Both input shapes share the same
/// validation rule and pipeline.
pub fn router(state: OrchestratorState) -> Router {
    Router::new()
        .route("/temperature", post(temperature_from_body))
        .route("/temperature/{postal_code}", get(temperature_from_path))
        .with_state(state)
}

async fn temperature_from_body(
    State(state): State<OrchestratorState>,
    headers: HeaderMap,
    payload: Result<Json<TemperatureRequest>, JsonRejection>,
) -> Result<Json<TemperatureResponse>, ServiceError> {
    // A body that is not valid JSON counts as a malformed postal code,
    // same as the path variant failing validation.
    let Json(request) = payload.map_err(|_| ServiceError::InvalidPostalCode)?;
    handle(state, &headers, &request.cep).await
}

async fn temperature_from_path(
    State(state): State<OrchestratorState>,
    headers: HeaderMap,
    Path(postal_code): Path<String>,
) -> Result<Json<TemperatureResponse>, ServiceError> {
    handle(state, &headers, &postal_code).await
}

/// Run the lookup pipeline under a span parented on the propagated
/// inbound trace context.
async fn handle(
    state: OrchestratorState,
    headers: &HeaderMap,
    raw_code: &str,
) -> Result<Json<TemperatureResponse>, ServiceError> {
    let parent = telemetry::extract_context(headers);
    let span = info_span!("handle-temperature");
    span.set_parent(parent);

    async move {
        let postal_code = PostalCode::parse(raw_code)?;

        let location = state.addresses.resolve(&postal_code).await?;
        let celsius = state.temperatures.resolve(&location).await?;

        tracing::info!(%postal_code, %location, celsius, "lookup complete");

        let city = state.include_city.then_some(location);
        Ok(Json(TemperatureResponse::from_celsius(city, celsius)))
    }
    .instrument(span)
    .await
}
