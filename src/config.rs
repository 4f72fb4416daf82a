//! Configuration for both services.
//!
//! Settings come from an optional `config.toml` next to the binary plus
//! `CEPTEMP_`-prefixed environment variables, with sensible defaults for
//! a local two-service deployment.

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Root configuration for the temperature lookup process.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Entry (forwarding) service settings
    pub entry: EntryConfig,
    /// Resolver (orchestration) service settings
    pub resolver: ResolverConfig,
    /// External provider settings
    pub providers: ProvidersConfig,
    /// Trace export settings
    pub telemetry: TelemetryConfig,
}

/// Entry service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntryConfig {
    /// Listen address for the entry service
    pub listen_addr: String,
    /// URL of the downstream resolver service's temperature endpoint
    pub downstream_url: String,
}

/// Resolver service settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Listen address for the resolver service
    pub listen_addr: String,
    /// Whether responses carry the resolved city name
    pub include_city: bool,
}

/// External provider settings, applied per resolver client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Base URL of the address provider
    pub viacep_base_url: String,
    /// Base URL of the weather provider
    pub wttr_base_url: String,
    /// Outbound request timeout in seconds
    pub timeout_seconds: u64,
    /// Accept invalid upstream certificates (local testing only)
    pub insecure_tls: bool,
}

/// Trace export settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// OTLP collector base URL
    pub otlp_endpoint: String,
    /// Service name reported on exported spans
    pub service_name: String,
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            downstream_url: "http://localhost:8080/temperature".to_string(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            include_city: true,
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            viacep_base_url: "http://viacep.com.br/ws".to_string(),
            wttr_base_url: "https://wttr.in".to_string(),
            timeout_seconds: 30,
            insecure_tls: false,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4318".to_string()),
            service_name: "weather-service".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from `config.toml` (if present) and the
    /// environment, then validate it.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(
                Environment::with_prefix("CEPTEMP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("building configuration")?;

        let config: ServiceConfig = settings
            .try_deserialize()
            .context("deserializing configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate all settings.
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("entry.downstream_url", &self.entry.downstream_url),
            ("providers.viacep_base_url", &self.providers.viacep_base_url),
            ("providers.wttr_base_url", &self.providers.wttr_base_url),
            ("telemetry.otlp_endpoint", &self.telemetry.otlp_endpoint),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("{name} must be an HTTP or HTTPS URL, got {url:?}");
            }
        }

        if self.providers.timeout_seconds == 0 {
            bail!("providers.timeout_seconds must be greater than zero");
        }

        if self.telemetry.service_name.is_empty() {
            bail!("telemetry.service_name must not be empty");
        }

        Ok(())
    }
}
