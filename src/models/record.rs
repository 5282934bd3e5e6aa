//! Ward spending records as extracted from the menu-money reports.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Trailing report year on an item, e.g. `"Street Resurfacing (2019)"`
static ITEM_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s\(\d+\)").expect("item year pattern"));

/// Currency decoration on a cost cell, e.g. `"$12,500.00"`
static COST_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$,]").expect("cost pattern"));

/// Fallback category for items matching no keyword
pub const MISC_CATEGORY: &str = "Misc.";

/// Keyword table for standard categories. Checked in order against the
/// lowercased item; the first keyword contained in the item wins.
const CATEGORY_KEYWORDS: &[(&[&str], &str)] = &[
    (&["pedestrian", "bump outs"], "Pedestrian Infrastructure"),
    (
        &["bicycle", "bike", "neighborhood greenway"],
        "Bicycle Infrastructure",
    ),
    (&["light"], "Lighting"),
    (
        &[
            "street resurfacing",
            "street speed hump replacement",
            "curb & gutter",
        ],
        "Street Resurfacing",
    ),
    (&["alley"], "Alleys"),
    (&["miscellaneous cdot projects"], "Misc. CDOT"),
    (&["mural", "public art", "tree planting"], "Beautification"),
    (
        &[
            "turn arrow",
            "street speed hump menu",
            "pavement markings",
            "traffic circle",
            "cul-de-sac",
            "diagnol parking",
        ],
        "Street Redesign",
    ),
    (&["sidewalk"], "Sidewalk Repair"),
    (&["pod camera"], "Police Cameras"),
    (&["park", "playground", "garden"], "Parks"),
    (&["viaduct"], "Viaducts"),
];

/// One row of the extracted spending table (`ward,item,location,cost`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpendingRecord {
    pub ward: String,
    pub item: String,
    pub location: String,
    pub cost: String,
}

/// A spending record after clean-up, ready to be geocoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub ward: String,
    pub item: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    pub category: String,
}

impl SpendingRecord {
    /// Normalize item and cost, assign a category and tag the report year
    pub fn process(self, year: Option<u16>) -> ProcessedRecord {
        let item = ITEM_YEAR.replace_all(&self.item, "").trim().to_string();
        let category = categorize(&item).to_string();
        ProcessedRecord {
            ward: self.ward.trim().to_string(),
            location: self.location.trim().to_string(),
            cost: parse_cost(&self.cost),
            year,
            category,
            item,
        }
    }
}

/// Parse a cost cell such as `"$12,500.00"`
pub fn parse_cost(raw: &str) -> Option<f64> {
    let cleaned = COST_NOISE.replace_all(raw.trim(), "");
    cleaned.parse::<f64>().ok()
}

/// Standard category for a menu item
pub fn categorize(item: &str) -> &'static str {
    let item = item.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| item.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(MISC_CATEGORY)
}

/// Find a four-digit 20xx year in a file name, e.g. `"2019 Menu Posting.csv"`
pub fn year_from_file_name(name: &str) -> Option<u16> {
    name.as_bytes()
        .windows(4)
        .position(|w| w[0] == b'2' && w[1] == b'0' && w[2..].iter().all(u8::is_ascii_digit))
        .and_then(|i| name[i..i + 4].parse().ok())
}
