//! Offline address lookup against the Cook County address points CSV.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use geo_types::Point;
use hashbrown::HashMap;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use super::Geocoder;
use crate::models::{Intersection, Street, StreetAddress};

#[derive(Debug, Deserialize)]
struct AddressPointRow {
    #[serde(rename = "Add_Number")]
    number: String,
    #[serde(rename = "LSt_PreDir", default)]
    direction: String,
    #[serde(rename = "St_Name")]
    name: String,
    #[serde(rename = "LSt_Type", default)]
    street_type: String,
    #[serde(rename = "Long")]
    lon: Option<f64>,
    #[serde(rename = "Lat")]
    lat: Option<f64>,
}

/// (direction, name, type), upper case
type StreetKey = (String, String, String);

fn street_key(direction: &str, name: &str, street_type: &str) -> StreetKey {
    (
        direction.trim().to_uppercase(),
        name.trim().to_uppercase(),
        street_type.trim().to_uppercase(),
    )
}

fn key_of(street: &Street) -> StreetKey {
    street_key(
        street.direction.map(|d| d.as_str()).unwrap_or(""),
        &street.name,
        &street.street_type,
    )
}

/// Address points indexed by street, house numbers sorted per street
pub struct AddressPointsFile {
    streets: HashMap<StreetKey, Vec<(u32, Point<f64>)>>,
    fuzziness: u32,
}

impl AddressPointsFile {
    /// Load and index an address points CSV file
    pub fn load(path: &Path, fuzziness: u32) -> Result<Self> {
        info!("Loading address points from {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("Failed to open address points file {}", path.display()))?;
        let index = Self::from_reader(file, fuzziness)?;
        info!(
            "Loaded {} address points on {} streets",
            index.len(),
            index.streets.len()
        );
        Ok(index)
    }

    /// Index address points read from any CSV source
    pub fn from_reader<R: Read>(reader: R, fuzziness: u32) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let mut streets: HashMap<StreetKey, Vec<(u32, Point<f64>)>> = HashMap::new();
        let mut skipped = 0usize;

        for result in csv_reader.deserialize::<AddressPointRow>() {
            let row = result.context("Failed to read address point row")?;
            let (Ok(number), Some(lon), Some(lat)) = (row.number.trim().parse::<u32>(), row.lon, row.lat)
            else {
                skipped += 1;
                continue;
            };
            streets
                .entry(street_key(&row.direction, &row.name, &row.street_type))
                .or_default()
                .push((number, Point::new(lon, lat)));
        }

        for points in streets.values_mut() {
            points.sort_by_key(|(number, _)| *number);
        }

        if skipped > 0 {
            debug!("Skipped {} address points without number or coordinates", skipped);
        }

        Ok(Self { streets, fuzziness })
    }

    /// Total number of indexed address points
    pub fn len(&self) -> usize {
        self.streets.values().map(Vec::len).sum()
    }

    /// Whether no street was indexed
    pub fn is_empty(&self) -> bool {
        self.streets.is_empty()
    }

    /// Exact house number, else the closest one within the fuzziness window
    fn closest(&self, address: &StreetAddress) -> Option<Point<f64>> {
        let points = self.streets.get(&key_of(&address.street))?;
        let target = address.number;

        let exact = points.partition_point(|(number, _)| *number < target);
        if let Some((number, point)) = points.get(exact) {
            if *number == target {
                return Some(*point);
            }
        }

        let low = target.saturating_sub(self.fuzziness);
        let high = target.saturating_add(self.fuzziness);
        points
            .iter()
            .filter(|(number, _)| (low..=high).contains(number))
            .min_by_key(|(number, _)| number.abs_diff(target))
            .map(|(_, point)| *point)
    }
}

impl Geocoder for AddressPointsFile {
    fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>> {
        self.closest(address)
    }

    /// The address points file has no street topology
    fn intersection_coordinates(&self, _intersection: &Intersection) -> Option<Point<f64>> {
        None
    }
}
