//! wttr.in weather lookup client.
//!
//! The provider returns a large `format=j1` report; only the Celsius
//! temperature of the first current-condition entry feeds the pipeline,
//! but the whole shape is decoded so schema drift surfaces as a decode
//! error instead of silently reading garbage.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::ServiceError;
use crate::providers::TemperatureResolver;

/// Client for the wttr.in-shaped weather provider.
#[derive(Debug, Clone)]
pub struct WttrClient {
    client: reqwest::Client,
    base_url: String,
}

impl WttrClient {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn report_url(&self, location: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(location))
    }
}

#[async_trait]
impl TemperatureResolver for WttrClient {
    /// Resolve a locality name to its current Celsius temperature.
    #[instrument(name = "get-temperature", skip(self), fields(location = %location))]
    async fn resolve(&self, location: &str) -> Result<f64, ServiceError> {
        let url = self.report_url(location);
        debug!(%url, "querying weather provider");

        let response = self
            .client
            .get(&url)
            .query(&[("format", "j1")])
            .send()
            .await
            .map_err(ServiceError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::UpstreamStatus { status });
        }

        let report: WeatherReport = response.json().await.map_err(ServiceError::UpstreamDecode)?;

        let current = report
            .current_condition
            .first()
            .ok_or(ServiceError::NoConditionData)?;

        current
            .temp_c
            .parse::<f64>()
            .map_err(ServiceError::TemperatureFormat)
    }
}

/// `format=j1` weather report. wttr.in encodes every numeric field as a
/// string. Decoded in full for schema fidelity; most fields are unused.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct WeatherReport {
    current_condition: Vec<CurrentCondition>,
    nearest_area: Vec<NearestArea>,
    request: Vec<RequestEcho>,
    weather: Vec<DailyWeather>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct CurrentCondition {
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    #[serde(rename = "FeelsLikeF")]
    feels_like_f: String,
    cloudcover: String,
    humidity: String,
    #[serde(rename = "localObsDateTime")]
    local_obs_date_time: String,
    observation_time: String,
    #[serde(rename = "precipInches")]
    precip_inches: String,
    #[serde(rename = "precipMM")]
    precip_mm: String,
    pressure: String,
    #[serde(rename = "pressureInches")]
    pressure_inches: String,
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(rename = "uvIndex")]
    uv_index: String,
    visibility: String,
    #[serde(rename = "visibilityMiles")]
    visibility_miles: String,
    #[serde(rename = "weatherCode")]
    weather_code: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<ValueEntry>,
    #[serde(rename = "weatherIconUrl")]
    weather_icon_url: Vec<ValueEntry>,
    #[serde(rename = "winddir16Point")]
    winddir16_point: String,
    #[serde(rename = "winddirDegree")]
    winddir_degree: String,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
    #[serde(rename = "windspeedMiles")]
    windspeed_miles: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct NearestArea {
    #[serde(rename = "areaName")]
    area_name: Vec<ValueEntry>,
    country: Vec<ValueEntry>,
    latitude: String,
    longitude: String,
    population: String,
    region: Vec<ValueEntry>,
    #[serde(rename = "weatherUrl")]
    weather_url: Vec<ValueEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct RequestEcho {
    query: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct DailyWeather {
    astronomy: Vec<Astronomy>,
    #[serde(rename = "avgtempC")]
    avgtemp_c: String,
    #[serde(rename = "avgtempF")]
    avgtemp_f: String,
    date: String,
    hourly: Vec<HourlyWeather>,
    #[serde(rename = "maxtempC")]
    maxtemp_c: String,
    #[serde(rename = "maxtempF")]
    maxtemp_f: String,
    #[serde(rename = "mintempC")]
    mintemp_c: String,
    #[serde(rename = "mintempF")]
    mintemp_f: String,
    #[serde(rename = "sunHour")]
    sun_hour: String,
    #[serde(rename = "totalSnow_cm")]
    total_snow_cm: String,
    #[serde(rename = "uvIndex")]
    uv_index: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct Astronomy {
    moon_illumination: String,
    moon_phase: String,
    moonrise: String,
    moonset: String,
    sunrise: String,
    sunset: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct HourlyWeather {
    #[serde(rename = "DewPointC")]
    dew_point_c: String,
    #[serde(rename = "DewPointF")]
    dew_point_f: String,
    #[serde(rename = "FeelsLikeC")]
    feels_like_c: String,
    #[serde(rename = "FeelsLikeF")]
    feels_like_f: String,
    #[serde(rename = "HeatIndexC")]
    heat_index_c: String,
    #[serde(rename = "HeatIndexF")]
    heat_index_f: String,
    #[serde(rename = "WindChillC")]
    wind_chill_c: String,
    #[serde(rename = "WindChillF")]
    wind_chill_f: String,
    #[serde(rename = "WindGustKmph")]
    wind_gust_kmph: String,
    #[serde(rename = "WindGustMiles")]
    wind_gust_miles: String,
    chanceoffog: String,
    chanceoffrost: String,
    chanceofhightemp: String,
    chanceofovercast: String,
    chanceofrain: String,
    chanceofremdry: String,
    chanceofsnow: String,
    chanceofsunshine: String,
    chanceofthunder: String,
    chanceofwindy: String,
    cloudcover: String,
    humidity: String,
    #[serde(rename = "precipInches")]
    precip_inches: String,
    #[serde(rename = "precipMM")]
    precip_mm: String,
    pressure: String,
    #[serde(rename = "pressureInches")]
    pressure_inches: String,
    #[serde(rename = "tempC")]
    temp_c: String,
    #[serde(rename = "tempF")]
    temp_f: String,
    time: String,
    #[serde(rename = "uvIndex")]
    uv_index: String,
    visibility: String,
    #[serde(rename = "visibilityMiles")]
    visibility_miles: String,
    #[serde(rename = "weatherCode")]
    weather_code: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<ValueEntry>,
    #[serde(rename = "weatherIconUrl")]
    weather_icon_url: Vec<ValueEntry>,
    #[serde(rename = "winddir16Point")]
    winddir16_point: String,
    #[serde(rename = "winddirDegree")]
    winddir_degree: String,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
    #[serde(rename = "windspeedMiles")]
    windspeed_miles: String,
}

/// wttr.in wraps several scalar values in `[{"value": "..."}]` lists.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
struct ValueEntry {
    value: String,
}
