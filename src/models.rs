//! Request-scoped data model: postal codes, request/response bodies and
//! temperature unit conversion.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

/// A validated 8-digit Brazilian postal code (CEP).
///
/// The only way to obtain one is [`PostalCode::parse`], so every value of
/// this type already satisfies the format invariant. Both services apply
/// this same rule, whether the code arrives as a path segment or a JSON
/// body field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse a raw string, accepting only exactly 8 ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        if raw.len() == 8 && raw.chars().all(|c| c.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ServiceError::InvalidPostalCode)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body accepted by both services on `POST /temperature`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureRequest {
    pub cep: String,
}

/// Successful lookup response.
///
/// Fahrenheit and Kelvin are always derived from the canonical Celsius
/// value at construction time; they are never stored independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureResponse {
    /// Resolved city name; omitted in the single-service deployment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "temp_C")]
    pub temp_c: f64,
    #[serde(rename = "temp_F")]
    pub temp_f: f64,
    #[serde(rename = "temp_K")]
    pub temp_k: f64,
}

impl TemperatureResponse {
    /// Build a response from the canonical Celsius reading.
    #[must_use]
    pub fn from_celsius(city: Option<String>, celsius: f64) -> Self {
        Self {
            city,
            temp_c: celsius,
            temp_f: celsius * 1.8 + 32.0,
            temp_k: celsius + 273.0,
        }
    }
}

/// Failure response body shared by every handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    #[must_use]
    pub fn new(error: String) -> Self {
        Self { error }
    }
}
