//! Location format classification and entity extraction.
//!
//! A location description is tokenized once and matched against the grammar
//! rules in [`LocationFormat::PRIORITY`] order; the first rule that matches
//! the whole piece decides its format and yields its entities.

mod grammar;
mod token;

pub use grammar::{is_street_suffix, STREET_SUFFIXES};
pub use token::{tokenize, Token};

use tracing::debug;

use crate::error::LocationError;
use crate::models::{Intersection, LocationFormat, StreetAddress};

/// A classified location piece together with its extracted entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    StreetAddress(StreetAddress),
    StreetAddressRange(StreetAddress, StreetAddress),
    Intersection(Intersection),
    StreetSegmentIntersections(Intersection, Intersection),
    StreetSegmentAddressIntersection(StreetAddress, Intersection),
    StreetSegmentIntersectionAddress(Intersection, StreetAddress),
    /// All six pairings of the four bounding streets
    Alley(Vec<Intersection>),
    Unidentified,
}

impl Location {
    /// Classify a single trimmed location piece and extract its entities
    pub fn parse(text: &str) -> Self {
        let tokens = tokenize(text);
        let location = LocationFormat::PRIORITY
            .iter()
            .find_map(|format| match_format(*format, &tokens))
            .unwrap_or(Location::Unidentified);
        debug!("'{}' classified as {}", text, location.format());
        location
    }

    /// Format this location was classified as
    pub fn format(&self) -> LocationFormat {
        match self {
            Location::StreetAddress(..) => LocationFormat::StreetAddress,
            Location::StreetAddressRange(..) => LocationFormat::StreetAddressRange,
            Location::Intersection(..) => LocationFormat::Intersection,
            Location::StreetSegmentIntersections(..) => LocationFormat::StreetSegmentIntersections,
            Location::StreetSegmentAddressIntersection(..) => {
                LocationFormat::StreetSegmentAddressIntersection
            }
            Location::StreetSegmentIntersectionAddress(..) => {
                LocationFormat::StreetSegmentIntersectionAddress
            }
            Location::Alley(..) => LocationFormat::Alley,
            Location::Unidentified => LocationFormat::Unidentified,
        }
    }
}

/// Try a single grammar rule against the tokens of a piece
fn match_format(format: LocationFormat, tokens: &[Token]) -> Option<Location> {
    match format {
        LocationFormat::StreetAddress => grammar::street_address(tokens).map(Location::StreetAddress),
        LocationFormat::StreetAddressRange => grammar::street_address_range(tokens)
            .map(|(start, end)| Location::StreetAddressRange(start, end)),
        LocationFormat::Intersection => grammar::intersection(tokens).map(Location::Intersection),
        LocationFormat::StreetSegmentIntersections => grammar::segment_intersections(tokens)
            .map(|(from, to)| Location::StreetSegmentIntersections(from, to)),
        LocationFormat::StreetSegmentAddressIntersection => {
            grammar::segment_address_intersection(tokens)
                .map(|(from, to)| Location::StreetSegmentAddressIntersection(from, to))
        }
        LocationFormat::StreetSegmentIntersectionAddress => {
            grammar::segment_intersection_address(tokens)
                .map(|(from, to)| Location::StreetSegmentIntersectionAddress(from, to))
        }
        LocationFormat::Alley => grammar::alley(tokens).map(Location::Alley),
        LocationFormat::Unidentified => None,
    }
}

/// Detect the format of a single trimmed location piece
pub fn classify(text: &str) -> LocationFormat {
    Location::parse(text).format()
}

/// Formats of every `;`-separated piece of a location text, empty pieces skipped
pub fn classify_pieces(text: &str) -> Vec<(String, LocationFormat)> {
    split_pieces(text)
        .map(|piece| (piece.to_string(), classify(piece)))
        .collect()
}

/// Split a location text on `;` and trim each piece
pub fn split_pieces(text: &str) -> impl Iterator<Item = &str> {
    text.split(';').map(str::trim).filter(|piece| !piece.is_empty())
}

/// `1640 N MAPLEWOOD AVE`
pub fn extract_street_address(text: &str) -> Result<StreetAddress, LocationError> {
    grammar::street_address(&tokenize(text))
        .ok_or_else(|| LocationError::malformed(LocationFormat::StreetAddress, text))
}

/// Both ends of `434-442 E 46TH PL`, sharing the street
pub fn extract_address_range_street_addresses(
    text: &str,
) -> Result<(StreetAddress, StreetAddress), LocationError> {
    grammar::street_address_range(&tokenize(text))
        .ok_or_else(|| LocationError::malformed(LocationFormat::StreetAddressRange, text))
}

/// The two streets of `N ASHLAND AVE & W CHESTNUT ST`
pub fn extract_intersection(text: &str) -> Result<Intersection, LocationError> {
    grammar::intersection(&tokenize(text))
        .ok_or_else(|| LocationError::malformed(LocationFormat::Intersection, text))
}

/// Primary street crossed with the `FROM` and `TO` streets
pub fn extract_segment_intersections(
    text: &str,
) -> Result<(Intersection, Intersection), LocationError> {
    grammar::segment_intersections(&tokenize(text))
        .ok_or_else(|| LocationError::malformed(LocationFormat::StreetSegmentIntersections, text))
}

/// Address on the primary street at the `FROM` number, and the `TO` crossing
pub fn extract_segment_address_intersection(
    text: &str,
) -> Result<(StreetAddress, Intersection), LocationError> {
    grammar::segment_address_intersection(&tokenize(text)).ok_or_else(|| {
        LocationError::malformed(LocationFormat::StreetSegmentAddressIntersection, text)
    })
}

/// The `FROM` crossing, and the address on the primary street at the `TO` number
pub fn extract_segment_intersection_address(
    text: &str,
) -> Result<(Intersection, StreetAddress), LocationError> {
    grammar::segment_intersection_address(&tokenize(text)).ok_or_else(|| {
        LocationError::malformed(LocationFormat::StreetSegmentIntersectionAddress, text)
    })
}

/// Every pairing of the four streets around an alley
pub fn extract_alley_intersections(text: &str) -> Result<Vec<Intersection>, LocationError> {
    grammar::alley(&tokenize(text))
        .ok_or_else(|| LocationError::malformed(LocationFormat::Alley, text))
}
