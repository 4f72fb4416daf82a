//! Adapters for the two external lookup providers.
//!
//! The handlers only depend on the [`AddressResolver`] and
//! [`TemperatureResolver`] seams; the concrete clients live in
//! [`viacep`] and [`wttr`]. Each client owns its own explicitly
//! configured HTTP client rather than sharing process-global transport
//! state.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::PostalCode;

pub mod viacep;
pub mod wttr;

pub use viacep::ViaCepClient;
pub use wttr::WttrClient;

/// Maps a postal code to a locality name.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, postal_code: &PostalCode) -> Result<String, ServiceError>;
}

/// Maps a locality name to a current Celsius temperature.
#[async_trait]
pub trait TemperatureResolver: Send + Sync {
    async fn resolve(&self, location: &str) -> Result<f64, ServiceError>;
}

/// Build the HTTP client a provider adapter runs on.
///
/// `insecure_tls` disables certificate verification for local test
/// setups that front the providers with self-signed endpoints.
pub fn build_client(timeout: Duration, insecure_tls: bool) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(insecure_tls)
        .user_agent(concat!("ceptemp/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("building provider HTTP client")
}
