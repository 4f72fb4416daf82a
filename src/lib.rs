//! `ceptemp` - CEP to current temperature lookup service
//!
//! Resolves an 8-digit Brazilian postal code to a city via an address
//! provider, fetches the city's current temperature from a weather
//! provider, and answers in Celsius, Fahrenheit and Kelvin. Runs as two
//! cooperating HTTP services with trace context propagated across the
//! hop between them.

pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod service;
pub mod telemetry;
pub mod web;

// Re-export core types for the public API
pub use config::ServiceConfig;
pub use error::ServiceError;
pub use models::{PostalCode, TemperatureRequest, TemperatureResponse};
pub use providers::{AddressResolver, TemperatureResolver, ViaCepClient, WttrClient};
pub use service::{ForwarderState, OrchestratorState};

/// Core result type used throughout the library.
pub type Result<T> = std::result::Result<T, ServiceError>;
