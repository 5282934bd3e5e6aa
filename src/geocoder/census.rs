//! US Census Bureau one-line address geocoder.

use geo_types::Point;
use serde_json::Value;
use tracing::warn;

use super::http::{as_coordinate, query_url, HttpClient};
use super::Geocoder;
use crate::models::{Intersection, StreetAddress};

const ONELINE_URL: &str = "https://geocoding.geo.census.gov/geocoder/locations/onelineaddress";
/// Public_AR_Current
const BENCHMARK: &str = "4";

/// Census one-line geocoder, for addresses and `A & B` intersections
pub struct CensusGeocoder {
    client: HttpClient,
    city_suffix: String,
}

impl CensusGeocoder {
    const NAME: &'static str = "census";

    /// Create a backend appending `city_suffix` to every query
    pub fn new(client: HttpClient, city_suffix: &str) -> Self {
        Self {
            client,
            city_suffix: city_suffix.to_string(),
        }
    }

    fn lookup(&self, text: &str) -> Option<Point<f64>> {
        let address = format!("{}, {}", text, self.city_suffix);
        let response = query_url(
            Self::NAME,
            ONELINE_URL,
            &[
                ("address", address.as_str()),
                ("benchmark", BENCHMARK),
                ("format", "json"),
            ],
        )
        .and_then(|url| self.client.get_json(Self::NAME, url));

        match response {
            Ok(body) => parse_match(&body),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

/// Coordinates of the first address match
fn parse_match(body: &Value) -> Option<Point<f64>> {
    let coordinates = body.pointer("/result/addressMatches/0/coordinates")?;
    Some(Point::new(
        as_coordinate(coordinates.get("x")?)?,
        as_coordinate(coordinates.get("y")?)?,
    ))
}

impl Geocoder for CensusGeocoder {
    fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>> {
        self.lookup(&address.to_string())
    }

    fn intersection_coordinates(&self, intersection: &Intersection) -> Option<Point<f64>> {
        self.lookup(&intersection.to_string())
    }
}
