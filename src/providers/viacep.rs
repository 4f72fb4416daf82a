//! ViaCEP address lookup client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::ServiceError;
use crate::models::PostalCode;
use crate::providers::AddressResolver;

/// Client for the ViaCEP-shaped address provider.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    client: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn lookup_url(&self, postal_code: &PostalCode) -> String {
        format!("{}/{}/json", self.base_url, postal_code)
    }
}

#[async_trait]
impl AddressResolver for ViaCepClient {
    /// Resolve a postal code to its locality name.
    ///
    /// A non-empty `erro` field is the provider's not-found signal and
    /// becomes [`ServiceError::PostalCodeNotFound`]; an empty locality
    /// with no error indicator passes through unchanged.
    #[instrument(name = "get-address", skip(self), fields(postal_code = %postal_code))]
    async fn resolve(&self, postal_code: &PostalCode) -> Result<String, ServiceError> {
        let url = self.lookup_url(postal_code);
        debug!(%url, "querying address provider");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UpstreamStatus { status });
        }

        let body: ViaCepResponse = response.json().await.map_err(ServiceError::UpstreamDecode)?;

        if !body.erro.is_empty() {
            return Err(ServiceError::PostalCodeNotFound);
        }

        Ok(body.localidade)
    }
}

/// Full ViaCEP response shape. Only `erro` and `localidade` drive the
/// pipeline; the rest is decoded for schema fidelity.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct ViaCepResponse {
    erro: String,
    cep: String,
    logradouro: String,
    complemento: String,
    unidade: String,
    bairro: String,
    localidade: String,
    uf: String,
    estado: String,
    regiao: String,
    ibge: String,
    gia: String,
    ddd: String,
    siafi: String,
}
