//! Geocoding backends that turn addresses and intersections into points.
//!
//! The assembler only depends on the [`Geocoder`] trait. Concrete backends
//! query the Cook County / City of Chicago open-data APIs, the US Census
//! geocoder, Nominatim, or a local address-points CSV, and are tried in
//! order through a [`GeocoderChain`].

mod census;
mod http;
mod local;
mod nominatim;
mod socrata;

pub use census::CensusGeocoder;
pub use http::{coordinates, HttpClient};
pub use local::AddressPointsFile;
pub use nominatim::NominatimGeocoder;
pub use socrata::{AddressPointsApi, StreetCenterLinesApi};

use std::sync::Arc;

use anyhow::{Context, Result};
use geo_types::Point;
use tracing::{debug, info};

use crate::config::{BackendKind, Config};
use crate::models::{Intersection, StreetAddress};

/// Resolves location entities to (longitude, latitude) points.
///
/// "Not found" is `None`; implementations log transport failures and report
/// them as misses.
pub trait Geocoder {
    fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>>;

    fn intersection_coordinates(&self, intersection: &Intersection) -> Option<Point<f64>>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>> {
        (**self).street_address_coordinates(address)
    }

    fn intersection_coordinates(&self, intersection: &Intersection) -> Option<Point<f64>> {
        (**self).intersection_coordinates(intersection)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>> {
        (**self).street_address_coordinates(address)
    }

    fn intersection_coordinates(&self, intersection: &Intersection) -> Option<Point<f64>> {
        (**self).intersection_coordinates(intersection)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Arc<G> {
    fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>> {
        (**self).street_address_coordinates(address)
    }

    fn intersection_coordinates(&self, intersection: &Intersection) -> Option<Point<f64>> {
        (**self).intersection_coordinates(intersection)
    }
}

/// A backend usable from the batch worker pool
pub type SharedGeocoder = Box<dyn Geocoder + Send + Sync>;

/// Ordered list of backends; the first one with an answer wins
pub struct GeocoderChain {
    backends: Vec<(BackendKind, SharedGeocoder)>,
}

impl GeocoderChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Append a backend; it is tried after every backend already present
    pub fn push(&mut self, kind: BackendKind, backend: SharedGeocoder) {
        self.backends.push((kind, backend));
    }

    /// Build the chain configured in `[geocoder] backends`
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut chain = Self::new();
        let mut client: Option<HttpClient> = None;

        for kind in &config.geocoder.backends {
            let backend: SharedGeocoder = match kind {
                BackendKind::AddressPointsFile => {
                    let path = config
                        .local
                        .address_points
                        .as_ref()
                        .context("address_points_file backend needs [local] address_points")?;
                    Box::new(AddressPointsFile::load(path, config.local.fuzziness)?)
                }
                BackendKind::AddressPointsApi => Box::new(AddressPointsApi::new(shared_client(
                    &mut client,
                    config,
                )?)),
                BackendKind::StreetCenterLinesApi => Box::new(StreetCenterLinesApi::new(
                    shared_client(&mut client, config)?,
                )),
                BackendKind::Census => Box::new(CensusGeocoder::new(
                    shared_client(&mut client, config)?,
                    &config.geocoder.city_suffix,
                )),
                BackendKind::Nominatim => Box::new(NominatimGeocoder::new(
                    shared_client(&mut client, config)?,
                    &config.geocoder.city_suffix,
                    config.geocoder.nominatim_interval(),
                )),
            };
            chain.push(*kind, backend);
        }

        info!(
            "Geocoder chain: {}",
            chain
                .backends
                .iter()
                .map(|(kind, _)| kind.as_str())
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        Ok(chain)
    }

    /// Whether no backend is configured
    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }
}

/// One HTTP client shared by every web backend of a chain
fn shared_client(slot: &mut Option<HttpClient>, config: &Config) -> Result<HttpClient> {
    if let Some(client) = slot {
        return Ok(client.clone());
    }
    let client = HttpClient::new(&config.http).context("Failed to create HTTP client")?;
    *slot = Some(client.clone());
    Ok(client)
}

impl Default for GeocoderChain {
    fn default() -> Self {
        Self::new()
    }
}

impl Geocoder for GeocoderChain {
    fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>> {
        self.backends.iter().find_map(|(kind, backend)| {
            let point = backend.street_address_coordinates(address);
            if point.is_some() {
                debug!("{} resolved '{}'", kind.as_str(), address);
            }
            point
        })
    }

    fn intersection_coordinates(&self, intersection: &Intersection) -> Option<Point<f64>> {
        self.backends.iter().find_map(|(kind, backend)| {
            let point = backend.intersection_coordinates(intersection);
            if point.is_some() {
                debug!("{} resolved '{}'", kind.as_str(), intersection);
            }
            point
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Street};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every address with a fixed point and counts calls
    struct Fixed {
        point: Option<Point<f64>>,
        calls: Arc<AtomicUsize>,
    }

    impl Geocoder for Fixed {
        fn street_address_coordinates(&self, _: &StreetAddress) -> Option<Point<f64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.point
        }

        fn intersection_coordinates(&self, _: &Intersection) -> Option<Point<f64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            None
        }
    }

    fn address() -> StreetAddress {
        StreetAddress::new(1110, Street::new(Some(Direction::N), "STATE", "ST"))
    }

    #[test]
    fn test_chain_first_hit_wins() {
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let third_calls = Arc::new(AtomicUsize::new(0));

        let mut chain = GeocoderChain::new();
        chain.push(
            BackendKind::AddressPointsApi,
            Box::new(Fixed {
                point: None,
                calls: first_calls.clone(),
            }),
        );
        chain.push(
            BackendKind::Census,
            Box::new(Fixed {
                point: Some(Point::new(-87.6, 41.9)),
                calls: second_calls.clone(),
            }),
        );
        chain.push(
            BackendKind::Nominatim,
            Box::new(Fixed {
                point: Some(Point::new(0.0, 0.0)),
                calls: third_calls.clone(),
            }),
        );

        assert_eq!(
            chain.street_address_coordinates(&address()),
            Some(Point::new(-87.6, 41.9))
        );
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 1);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_chain_misses() {
        let chain = GeocoderChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.street_address_coordinates(&address()), None);
    }

    #[test]
    fn test_file_backend_requires_path() {
        let mut config = Config::default();
        config.geocoder.backends = vec![BackendKind::AddressPointsFile];
        config.local.address_points = None;
        assert!(GeocoderChain::from_config(&config).is_err());
    }
}
