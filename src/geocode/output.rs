//! GeoJSON output for geocoded spending records.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, JsonObject, JsonValue};

use ward_geocode::models::{LocationFormat, ProcessedRecord};

/// One record as a feature; unresolved records get a null geometry
pub fn record_feature(
    record: &ProcessedRecord,
    formats: &[LocationFormat],
    geometry: Option<&geo::Geometry<f64>>,
) -> Result<Feature> {
    let mut properties = match serde_json::to_value(record)? {
        JsonValue::Object(map) => map,
        _ => JsonObject::new(),
    };
    properties.insert(
        "location_formats".to_string(),
        JsonValue::from(
            formats
                .iter()
                .map(|f| f.as_str().to_string())
                .collect::<Vec<_>>(),
        ),
    );

    Ok(Feature {
        bbox: None,
        geometry: geometry.map(|g| geojson::Geometry::new(geojson::Value::from(g))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}

/// Write all features as one FeatureCollection
pub fn write_collection(path: &Path, features: Vec<Feature>) -> Result<()> {
    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    fs::write(path, collection.to_string())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
