//! Location description formats.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grammatical shape of a single location description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationFormat {
    /// `1640 N MAPLEWOOD AVE`
    StreetAddress,
    /// `434-442 E 46TH PL`
    StreetAddressRange,
    /// `N ASHLAND AVE & W CHESTNUT ST`
    Intersection,
    /// `ON N LEAVITT ST FROM W DIVISION ST (1200 N) TO W NORTH AVE (1600 N)`
    StreetSegmentIntersections,
    /// `ON W 52ND PL FROM 322 W TO S PRINCETON AVE (300 W)`
    StreetSegmentAddressIntersection,
    /// `ON W 52ND PL FROM S PRINCETON AVE (300 W) TO 322 W`
    StreetSegmentIntersectionAddress,
    /// `N WOOD ST & W AUGUSTA BLVD & W CORTEZ ST & N HERMITAGE AVE`
    Alley,
    /// Matches none of the above
    Unidentified,
}

impl LocationFormat {
    /// Order in which the grammar rules are tried; the first match wins.
    ///
    /// `Alley` must be tried before `Intersection`.
    pub const PRIORITY: [LocationFormat; 7] = [
        LocationFormat::StreetAddress,
        LocationFormat::StreetAddressRange,
        LocationFormat::Alley,
        LocationFormat::StreetSegmentIntersections,
        LocationFormat::StreetSegmentAddressIntersection,
        LocationFormat::StreetSegmentIntersectionAddress,
        LocationFormat::Intersection,
    ];

    /// Upper snake case name, matching the serde form
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationFormat::StreetAddress => "STREET_ADDRESS",
            LocationFormat::StreetAddressRange => "STREET_ADDRESS_RANGE",
            LocationFormat::Intersection => "INTERSECTION",
            LocationFormat::StreetSegmentIntersections => "STREET_SEGMENT_INTERSECTIONS",
            LocationFormat::StreetSegmentAddressIntersection => {
                "STREET_SEGMENT_ADDRESS_INTERSECTION"
            }
            LocationFormat::StreetSegmentIntersectionAddress => {
                "STREET_SEGMENT_INTERSECTION_ADDRESS"
            }
            LocationFormat::Alley => "ALLEY",
            LocationFormat::Unidentified => "UNIDENTIFIED",
        }
    }
}

impl fmt::Display for LocationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
