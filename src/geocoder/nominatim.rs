//! OpenStreetMap Nominatim search, throttled per the usage policy.

use geo_types::Point;
use serde_json::Value;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::http::{as_coordinate, query_url, HttpClient};
use super::Geocoder;
use crate::models::{Intersection, StreetAddress};

const SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Runs closures one at a time, at least `interval` apart
pub struct Throttle {
    interval: Duration,
    /// When the last call finished; held across a call so callers from
    /// several workers go one at a time
    last_call: Mutex<Option<Instant>>,
}

impl Throttle {
    /// Create a throttle; the first call never waits
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait out the interval since the previous call, then run `f`
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let mut last = self.last_call.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(wait) = remaining_wait(*last, self.interval, Instant::now()) {
            debug!("Throttle: sleeping {:?}", wait);
            thread::sleep(wait);
        }
        let result = f();
        *last = Some(Instant::now());
        result
    }
}

/// Nominatim search, addresses only
pub struct NominatimGeocoder {
    client: HttpClient,
    city_suffix: String,
    throttle: Throttle,
}

impl NominatimGeocoder {
    const NAME: &'static str = "nominatim";

    /// Create a backend sending at most one request per `interval`
    pub fn new(client: HttpClient, city_suffix: &str, interval: Duration) -> Self {
        Self {
            client,
            city_suffix: city_suffix.to_string(),
            throttle: Throttle::new(interval),
        }
    }

    fn search(&self, text: &str) -> Option<Point<f64>> {
        let query = format!("{}, {}", text, self.city_suffix);
        let url = match query_url(
            Self::NAME,
            SEARCH_URL,
            &[("q", query.as_str()), ("format", "jsonv2"), ("limit", "1")],
        ) {
            Ok(url) => url,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        let response = self.throttle.run(|| self.client.get_json(Self::NAME, url));

        match response {
            Ok(body) => parse_place(&body),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }
}

/// How long to wait before the next request may go out
fn remaining_wait(last: Option<Instant>, interval: Duration, now: Instant) -> Option<Duration> {
    let elapsed = now.saturating_duration_since(last?);
    interval.checked_sub(elapsed).filter(|d| !d.is_zero())
}

/// `lon`/`lat` of the first place; Nominatim sends them as strings
fn parse_place(body: &Value) -> Option<Point<f64>> {
    let place = body.get(0)?;
    Some(Point::new(
        as_coordinate(place.get("lon")?)?,
        as_coordinate(place.get("lat")?)?,
    ))
}

impl Geocoder for NominatimGeocoder {
    fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>> {
        self.search(&address.to_string())
    }

    fn intersection_coordinates(&self, _intersection: &Intersection) -> Option<Point<f64>> {
        None
    }
}
