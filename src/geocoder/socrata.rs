//! Cook County / City of Chicago open-data (Socrata) backends.

use geo_types::Point;
use serde_json::Value;
use tracing::{debug, warn};

use super::http::{coordinates, query_url, HttpClient};
use super::Geocoder;
use crate::error::GeocoderError;
use crate::models::{Intersection, StreetAddress};

const ADDRESS_POINTS_URL: &str = "https://datacatalog.cookcountyil.gov/resource/78yw-iddh.json";
const STREET_CENTER_LINES_URL: &str = "https://data.cityofchicago.org/resource/pr57-gg9e.json";

/// Quote a value for a SoQL string literal
fn soql_literal(value: &str) -> String {
    format!("'{}'", value.to_uppercase().replace('\'', "''"))
}

/// `the_geom.coordinates` of the first row
fn first_row_coordinates(rows: &Value) -> Vec<Point<f64>> {
    rows.get(0)
        .and_then(|row| row.get("the_geom"))
        .and_then(|geom| geom.get("coordinates"))
        .map(coordinates)
        .unwrap_or_default()
}

fn run_query(
    client: &HttpClient,
    backend: &'static str,
    base: &str,
    clause: &str,
) -> Result<Value, GeocoderError> {
    let url = query_url(backend, base, &[("$where", clause), ("$limit", "1")])?;
    client.get_json(backend, url)
}

/// Cook County address points: exact `cmpaddabrv` match on the full address
pub struct AddressPointsApi {
    client: HttpClient,
}

impl AddressPointsApi {
    const NAME: &'static str = "address_points_api";

    /// Create a backend on the shared HTTP client
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub(crate) fn where_clause(address: &StreetAddress) -> String {
        format!("cmpaddabrv like {}", soql_literal(&address.to_string()))
    }

    pub(crate) fn parse_point(rows: &Value) -> Option<Point<f64>> {
        first_row_coordinates(rows).first().copied()
    }
}

impl Geocoder for AddressPointsApi {
    fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>> {
        let clause = Self::where_clause(address);
        match run_query(&self.client, Self::NAME, ADDRESS_POINTS_URL, &clause) {
            Ok(rows) => Self::parse_point(&rows),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn intersection_coordinates(&self, _intersection: &Intersection) -> Option<Point<f64>> {
        None
    }
}

/// Chicago street center lines: intersections from segment cross-street fields.
///
/// A segment of street A whose `f_cross` names B starts at the corner; failing
/// that, a segment of B whose `t_cross` names A ends at it.
pub struct StreetCenterLinesApi {
    client: HttpClient,
}

impl StreetCenterLinesApi {
    const NAME: &'static str = "street_center_lines_api";

    /// Create a backend on the shared HTTP client
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub(crate) fn from_cross_clause(street: &str, cross: &str) -> String {
        format!(
            "street_nam like {} AND f_cross like {}",
            soql_literal(street),
            soql_literal(&format!("%{}%", cross))
        )
    }

    pub(crate) fn to_cross_clause(street: &str, cross: &str) -> String {
        format!(
            "street_nam like {} AND t_cross like {}",
            soql_literal(street),
            soql_literal(&format!("%{}%", cross))
        )
    }

    fn query(&self, clause: &str) -> Option<Value> {
        match run_query(&self.client, Self::NAME, STREET_CENTER_LINES_URL, clause) {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

impl Geocoder for StreetCenterLinesApi {
    fn street_address_coordinates(&self, _address: &StreetAddress) -> Option<Point<f64>> {
        None
    }

    fn intersection_coordinates(&self, intersection: &Intersection) -> Option<Point<f64>> {
        let a = intersection.street1.name.as_str();
        let b = intersection.street2.name.as_str();

        let from = self
            .query(&Self::from_cross_clause(a, b))
            .and_then(|rows| first_row_coordinates(&rows).first().copied());
        if from.is_some() {
            return from;
        }

        debug!("No segment of {} starts at {}, trying {}", a, b, b);
        self.query(&Self::to_cross_clause(b, a))
            .and_then(|rows| first_row_coordinates(&rows).last().copied())
    }
}
