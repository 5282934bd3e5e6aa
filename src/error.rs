//! Error types for location parsing, geometry assembly and geocoding.

use thiserror::Error;

use crate::models::LocationFormat;

/// Why a single location piece produced no geometry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// Text matches no known location grammar
    #[error("no location format matches '{text}'")]
    FormatUnidentified { text: String },

    /// Text was handed to an extractor for a format it does not have
    #[error("'{text}' does not have the {format} shape")]
    MalformedExtraction { format: LocationFormat, text: String },

    /// The geocoder found nothing for a well-formed entity
    #[error("geocoder found no coordinates for '{entity}'")]
    GeocodeMiss { entity: String },

    /// Too few alley corners resolved to build a polygon
    #[error("only {resolved} alley corners resolved, need at least 3")]
    AlleyUnderConstrained { resolved: usize },
}

impl LocationError {
    /// `text` did not have the shape of `format`
    pub fn malformed(format: LocationFormat, text: &str) -> Self {
        LocationError::MalformedExtraction {
            format,
            text: text.to_string(),
        }
    }

    /// No coordinates for `entity`
    pub fn miss(entity: impl ToString) -> Self {
        LocationError::GeocodeMiss {
            entity: entity.to_string(),
        }
    }
}

/// Failure talking to a geocoding backend
#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("request to {backend} failed: {source}")]
    Http {
        backend: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{backend} returned status {status}")]
    Status {
        backend: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("invalid url for {backend}: {source}")]
    Url {
        backend: &'static str,
        #[source]
        source: url::ParseError,
    },
}
