//! Ward Geocode - geocoding for Chicago aldermanic menu-money spending locations
//!
//! This library parses free-text location descriptions ("1640 N MAPLEWOOD AVE",
//! "N WOOD ST & W AUGUSTA BLVD & W CORTEZ ST & N HERMITAGE AVE", ...) into
//! structured street entities and assembles geometries from them through a
//! pluggable [`Geocoder`].

pub mod config;
pub mod error;
pub mod geocoder;
pub mod geometry;
pub mod models;
pub mod parse;

pub use error::{GeocoderError, LocationError};
pub use geocoder::{Geocoder, GeocoderChain};
pub use geometry::{resolve, LocationGeocoder};
pub use models::{Direction, Intersection, LocationFormat, Street, StreetAddress};
pub use parse::{classify, Location};
