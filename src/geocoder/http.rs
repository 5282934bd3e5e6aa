//! Shared blocking HTTP client and JSON coordinate helpers.

use geo_types::Point;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::config::HttpConfig;
use crate::error::GeocoderError;

/// One connection pool shared by every web backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with the configured user agent and timeout
    pub fn new(config: &HttpConfig) -> Result<Self, GeocoderError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| GeocoderError::Http {
                backend: "http",
                source,
            })?;
        Ok(Self { client })
    }

    /// GET `url` and decode the body as JSON
    pub fn get_json(&self, backend: &'static str, url: Url) -> Result<Value, GeocoderError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| GeocoderError::Http { backend, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocoderError::Status { backend, status });
        }

        response
            .json::<Value>()
            .map_err(|source| GeocoderError::Http { backend, source })
    }
}

/// Build `base?key=value&...` with proper escaping
pub(crate) fn query_url(
    backend: &'static str,
    base: &str,
    params: &[(&str, &str)],
) -> Result<Url, GeocoderError> {
    Url::parse_with_params(base, params).map_err(|source| GeocoderError::Url { backend, source })
}

/// Every `[x, y]` pair in a (possibly nested) GeoJSON coordinates array
pub fn coordinates(value: &Value) -> Vec<Point<f64>> {
    let mut points = Vec::new();
    collect_coordinates(value, &mut points);
    points
}

fn collect_coordinates(value: &Value, points: &mut Vec<Point<f64>>) {
    let Some(items) = value.as_array() else {
        return;
    };
    match items.as_slice() {
        [x, y, ..] if x.is_number() && y.is_number() => {
            if let (Some(x), Some(y)) = (x.as_f64(), y.as_f64()) {
                points.push(Point::new(x, y));
            }
        }
        _ => {
            for item in items {
                collect_coordinates(item, points);
            }
        }
    }
}

/// A JSON number, or a string holding one (Nominatim sends `"41.9"`)
pub(crate) fn as_coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
