//! Forwarding handler: the entry service validates the postal code and
//! relays the request to the resolver service, carrying the trace
//! context across the hop. Past validation it is a transparent proxy:
//! downstream status and body are passed back unchanged.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{info_span, Instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::error::ServiceError;
use crate::models::{PostalCode, TemperatureRequest};
use crate::telemetry;

/// Shared state of the entry service.
#[derive(Clone)]
pub struct ForwarderState {
    client: reqwest::Client,
    downstream_url: String,
}

impl ForwarderState {
    pub fn new(client: reqwest::Client, downstream_url: impl Into<String>) -> Self {
        Self {
            client,
            downstream_url: downstream_url.into(),
        }
    }
}

/// Routes of the entry service.
pub fn router(state: ForwarderState) -> Router {
    Router::new()
        .route("/temperature", post(forward_temperature))
        .with_state(state)
}

async fn forward_temperature(
    State(state): State<ForwarderState>,
    payload: Result<Json<TemperatureRequest>, JsonRejection>,
) -> Result<Response, ServiceError> {
    let Json(request) = payload.map_err(|_| ServiceError::InvalidPostalCode)?;
    let postal_code = PostalCode::parse(&request.cep)?;

    let span = info_span!("forward-temperature", postal_code = %postal_code);

    async move {
        let mut headers = HeaderMap::new();
        telemetry::inject_context(&tracing::Span::current().context(), &mut headers);

        let response = state
            .client
            .post(&state.downstream_url)
            .headers(headers)
            .json(&TemperatureRequest {
                cep: postal_code.to_string(),
            })
            .send()
            .await
            .map_err(ServiceError::Relay)?;

        let status = response.status();

        // Decode and re-emit instead of streaming so the response goes
        // out with a correct JSON content type.
        let body: serde_json::Value = response.json().await.map_err(ServiceError::Relay)?;

        Ok((status, Json(body)).into_response())
    }
    .instrument(span)
    .await
}
