//! Core data models for location descriptions and spending records.

pub mod format;
pub mod record;
pub mod street;

pub use format::LocationFormat;
pub use record::{ProcessedRecord, SpendingRecord};
pub use street::{Direction, Intersection, Street, StreetAddress};
