//! Geometry assembly: location text in, geocoded geometry out.
//!
//! Each `;`-separated piece is parsed into its entities, the entities are
//! geocoded and shaped by format (point, line or alley polygon), and the
//! piece geometries are combined with [`combine`]. Failures are per piece:
//! they are logged and the piece contributes nothing.

mod ring;
mod union;

pub use ring::{alley_polygon, distinct_points};
pub use union::combine;

use geo::{Geometry, LineString, Point};
use tracing::{debug, error, warn};

use crate::error::LocationError;
use crate::geocoder::Geocoder;
use crate::models::{Intersection, LocationFormat, StreetAddress};
use crate::parse::{split_pieces, Location};

/// One `;`-separated piece with its format and geometry
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPiece {
    pub text: String,
    pub format: LocationFormat,
    pub geometry: Result<Geometry<f64>, LocationError>,
}

impl ResolvedPiece {
    /// The geometry, logging the failure when there is none
    pub fn into_geometry(self) -> Option<Geometry<f64>> {
        match self.geometry {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                log_failure(&self.text, &e);
                None
            }
        }
    }
}

/// Turns location descriptions into geometries through a [`Geocoder`]
pub struct LocationGeocoder<G> {
    geocoder: G,
}

impl<G: Geocoder> LocationGeocoder<G> {
    /// Create an assembler resolving entities through `geocoder`
    pub fn new(geocoder: G) -> Self {
        Self { geocoder }
    }

    /// Geometry of a whole location text, `None` if no piece resolved
    pub fn resolve(&self, text: &str) -> Option<Geometry<f64>> {
        let pieces = self
            .resolve_pieces(text)
            .into_iter()
            .filter_map(ResolvedPiece::into_geometry)
            .collect();
        combine(pieces)
    }

    /// Per-piece outcome, in piece order
    pub fn resolve_pieces(&self, text: &str) -> Vec<ResolvedPiece> {
        split_pieces(text)
            .map(|piece| {
                let location = Location::parse(piece);
                ResolvedPiece {
                    text: piece.to_string(),
                    format: location.format(),
                    geometry: self.resolve_location(piece, location),
                }
            })
            .collect()
    }

    /// Geometry of one trimmed piece
    pub fn resolve_piece(&self, piece: &str) -> Result<Geometry<f64>, LocationError> {
        self.resolve_location(piece, Location::parse(piece))
    }

    fn resolve_location(
        &self,
        piece: &str,
        location: Location,
    ) -> Result<Geometry<f64>, LocationError> {
        let geometry = match location {
            Location::StreetAddress(address) => Geometry::Point(self.address(&address)?),
            Location::StreetAddressRange(start, end) => {
                segment(self.address(&start)?, self.address(&end)?)
            }
            Location::Intersection(intersection) => {
                Geometry::Point(self.intersection(&intersection)?)
            }
            Location::StreetSegmentIntersections(from, to) => {
                segment(self.intersection(&from)?, self.intersection(&to)?)
            }
            Location::StreetSegmentAddressIntersection(from, to) => {
                segment(self.address(&from)?, self.intersection(&to)?)
            }
            Location::StreetSegmentIntersectionAddress(from, to) => {
                segment(self.intersection(&from)?, self.address(&to)?)
            }
            Location::Alley(candidates) => Geometry::Polygon(self.alley(&candidates)?),
            Location::Unidentified => {
                return Err(LocationError::FormatUnidentified {
                    text: piece.to_string(),
                })
            }
        };
        debug!("'{}' resolved", piece);
        Ok(geometry)
    }

    fn address(&self, address: &StreetAddress) -> Result<Point<f64>, LocationError> {
        self.geocoder
            .street_address_coordinates(address)
            .ok_or_else(|| LocationError::miss(address))
    }

    fn intersection(&self, intersection: &Intersection) -> Result<Point<f64>, LocationError> {
        self.geocoder
            .intersection_coordinates(intersection)
            .ok_or_else(|| LocationError::miss(intersection))
    }

    /// Corners of the alley block; pairings that do not cross simply miss
    fn alley(&self, candidates: &[Intersection]) -> Result<geo::Polygon<f64>, LocationError> {
        let corners = candidates
            .iter()
            .filter_map(|candidate| self.geocoder.intersection_coordinates(candidate));
        alley_polygon(corners)
    }
}

/// Line from the FROM end to the TO end
fn segment(from: Point<f64>, to: Point<f64>) -> Geometry<f64> {
    Geometry::LineString(LineString::from(vec![from, to]))
}

/// Unidentified text and misses are warnings, malformed extraction an error
fn log_failure(piece: &str, e: &LocationError) {
    match e {
        LocationError::MalformedExtraction { .. } => error!("'{}': {}", piece, e),
        _ => warn!("'{}': {}", piece, e),
    }
}

/// Resolve `text` with a borrowed geocoder
pub fn resolve<G: Geocoder>(text: &str, geocoder: &G) -> Option<Geometry<f64>> {
    LocationGeocoder::new(geocoder).resolve(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Street};
    use geo::{point, Winding};
    use std::collections::HashMap;

    /// Answers from fixed tables, misses everything else
    #[derive(Default)]
    struct Table {
        addresses: HashMap<StreetAddress, Point<f64>>,
        intersections: HashMap<Intersection, Point<f64>>,
    }

    impl Table {
        fn address(mut self, number: u32, street: Street, point: Point<f64>) -> Self {
            self.addresses.insert(StreetAddress::new(number, street), point);
            self
        }

        fn corner(mut self, a: Street, b: Street, point: Point<f64>) -> Self {
            self.intersections.insert(Intersection::new(a, b), point);
            self
        }
    }

    impl Geocoder for Table {
        fn street_address_coordinates(&self, address: &StreetAddress) -> Option<Point<f64>> {
            self.addresses.get(address).copied()
        }

        fn intersection_coordinates(&self, intersection: &Intersection) -> Option<Point<f64>> {
            self.intersections.get(intersection).copied()
        }
    }

    struct AlwaysMiss;

    impl Geocoder for AlwaysMiss {
        fn street_address_coordinates(&self, _: &StreetAddress) -> Option<Point<f64>> {
            None
        }

        fn intersection_coordinates(&self, _: &Intersection) -> Option<Point<f64>> {
            None
        }
    }

    fn st(direction: Direction, name: &str, street_type: &str) -> Street {
        Street::new(Some(direction), name, street_type)
    }

    fn state_st() -> Street {
        st(Direction::N, "STATE", "ST")
    }

    fn leavitt_table() -> Table {
        Table::default()
            .corner(
                st(Direction::N, "LEAVITT", "ST"),
                st(Direction::W, "DIVISION", "ST"),
                point!(x: -87.6819, y: 41.9030),
            )
            .corner(
                st(Direction::N, "LEAVITT", "ST"),
                st(Direction::W, "NORTH", "AVE"),
                point!(x: -87.6826, y: 41.9104),
            )
    }

    #[test]
    fn test_two_addresses_multipoint() {
        let table = Table::default()
            .address(1110, state_st(), point!(x: -87.6281, y: 41.9019))
            .address(1030, state_st(), point!(x: -87.6280, y: 41.9007));

        match resolve("1110 N STATE ST; 1030 N STATE ST", &table) {
            Some(Geometry::MultiPoint(mp)) => {
                assert_eq!(
                    mp.0,
                    vec![point!(x: -87.6281, y: 41.9019), point!(x: -87.6280, y: 41.9007)]
                );
            }
            other => panic!("expected MultiPoint, got {:?}", other),
        }
    }

    #[test]
    fn test_three_addresses_multipoint() {
        let table = Table::default()
            .address(1110, state_st(), point!(x: 1.0, y: 1.0))
            .address(1030, state_st(), point!(x: 2.0, y: 2.0))
            .address(1000, state_st(), point!(x: 3.0, y: 3.0));

        match resolve("1110 N STATE ST;1030 N STATE ST ; 1000 N STATE ST;", &table) {
            Some(Geometry::MultiPoint(mp)) => assert_eq!(mp.0.len(), 3),
            other => panic!("expected MultiPoint, got {:?}", other),
        }
    }

    #[test]
    fn test_single_piece_not_wrapped() {
        let table = Table::default().address(
            1640,
            st(Direction::N, "MAPLEWOOD", "AVE"),
            point!(x: -87.6893, y: 41.9110),
        );
        assert_eq!(
            resolve("1640 N MAPLEWOOD AVE", &table),
            Some(Geometry::Point(point!(x: -87.6893, y: 41.9110)))
        );
    }

    #[test]
    fn test_always_miss_is_none() {
        let texts = [
            "1640 N MAPLEWOOD AVE",
            "434-442 E 46TH PL",
            "N ASHLAND AVE & W CHESTNUT ST",
            "ON N LEAVITT ST FROM W DIVISION ST (1200 N) TO W NORTH AVE (1600 N)",
            "N WOOD ST & W AUGUSTA BLVD & W CORTEZ ST & N HERMITAGE AVE",
            "1110 N STATE ST; 1030 N STATE ST",
        ];
        for text in texts {
            assert_eq!(resolve(text, &AlwaysMiss), None, "{}", text);
        }
    }

    #[test]
    fn test_bad_input_never_panics() {
        for text in ["", ";;", "   ", "&&&", "( ) (", "ON FROM TO", "12-", "N & S & E & W", "é ñ ü"] {
            assert_eq!(resolve(text, &AlwaysMiss), None, "{}", text);
        }
    }

    #[test]
    fn test_range_is_line_in_order() {
        let street = st(Direction::E, "46TH", "PL");
        let table = Table::default()
            .address(434, street.clone(), point!(x: 0.0, y: 0.0))
            .address(442, street, point!(x: 1.0, y: 0.0));

        assert_eq!(
            resolve("434-442 E 46TH PL", &table),
            Some(Geometry::LineString(LineString::from(vec![
                point!(x: 0.0, y: 0.0),
                point!(x: 1.0, y: 0.0)
            ])))
        );
    }

    #[test]
    fn test_range_with_one_miss() {
        let table = Table::default().address(434, st(Direction::E, "46TH", "PL"), point!(x: 0.0, y: 0.0));
        let geocoder = LocationGeocoder::new(table);

        assert_eq!(geocoder.resolve("434-442 E 46TH PL"), None);
        let pieces = geocoder.resolve_pieces("434-442 E 46TH PL");
        assert_eq!(
            pieces[0].geometry,
            Err(LocationError::GeocodeMiss {
                entity: "442 E 46TH PL".to_string()
            })
        );
    }

    #[test]
    fn test_segment_from_then_to() {
        let geometry = resolve(
            "ON N LEAVITT ST FROM W DIVISION ST (1200 N) TO W NORTH AVE (1600 N)",
            &leavitt_table(),
        );
        assert_eq!(
            geometry,
            Some(Geometry::LineString(LineString::from(vec![
                point!(x: -87.6819, y: 41.9030),
                point!(x: -87.6826, y: 41.9104)
            ])))
        );
    }

    #[test]
    fn test_segment_address_to_intersection() {
        let street = st(Direction::W, "52ND", "PL");
        let table = Table::default()
            .address(322, street.clone(), point!(x: -87.6339, y: 41.7983))
            .corner(
                street,
                st(Direction::S, "PRINCETON", "AVE"),
                point!(x: -87.6331, y: 41.7983),
            );

        match resolve("ON W 52ND PL FROM 322 W TO S PRINCETON AVE (300 W)", &table) {
            Some(Geometry::LineString(line)) => {
                assert_eq!(line.0.len(), 2);
                assert_eq!(line.0[0].x, -87.6339);
                assert_eq!(line.0[1].x, -87.6331);
            }
            other => panic!("expected LineString, got {:?}", other),
        }
    }

    #[test]
    fn test_alley_polygon() {
        let wood = st(Direction::N, "WOOD", "ST");
        let hermitage = st(Direction::N, "HERMITAGE", "AVE");
        let augusta = st(Direction::W, "AUGUSTA", "BLVD");
        let cortez = st(Direction::W, "CORTEZ", "ST");

        // the parallel pairs (WOOD/HERMITAGE, AUGUSTA/CORTEZ) never meet
        let table = Table::default()
            .corner(wood.clone(), augusta.clone(), point!(x: -87.6721, y: 41.8995))
            .corner(wood.clone(), cortez.clone(), point!(x: -87.6722, y: 41.9003))
            .corner(hermitage.clone(), augusta, point!(x: -87.6709, y: 41.8995))
            .corner(hermitage, cortez, point!(x: -87.6710, y: 41.9003));

        match resolve(
            "N WOOD ST & W AUGUSTA BLVD & W CORTEZ ST & N HERMITAGE AVE",
            &table,
        ) {
            Some(Geometry::Polygon(polygon)) => {
                assert_eq!(polygon.exterior().0.len(), 5);
                assert!(polygon.exterior().is_ccw());
            }
            other => panic!("expected Polygon, got {:?}", other),
        }
    }

    #[test]
    fn test_alley_under_constrained() {
        let table = Table::default()
            .corner(
                st(Direction::N, "WOOD", "ST"),
                st(Direction::W, "AUGUSTA", "BLVD"),
                point!(x: 0.0, y: 0.0),
            )
            .corner(
                st(Direction::N, "WOOD", "ST"),
                st(Direction::W, "CORTEZ", "ST"),
                point!(x: 0.0, y: 1.0),
            );
        let geocoder = LocationGeocoder::new(table);
        let text = "N WOOD ST & W AUGUSTA BLVD & W CORTEZ ST & N HERMITAGE AVE";

        assert_eq!(geocoder.resolve(text), None);
        assert_eq!(
            geocoder.resolve_pieces(text)[0].geometry,
            Err(LocationError::AlleyUnderConstrained { resolved: 2 })
        );
    }

    #[test]
    fn test_mixed_pieces_collection() {
        let table = leavitt_table().address(1110, state_st(), point!(x: -87.6281, y: 41.9019));
        let text = "1110 N STATE ST; ON N LEAVITT ST FROM W DIVISION ST (1200 N) TO W NORTH AVE (1600 N)";

        match resolve(text, &table) {
            Some(Geometry::GeometryCollection(gc)) => {
                assert_eq!(gc.0.len(), 2);
                assert!(matches!(gc.0[0], Geometry::Point(_)));
                assert!(matches!(gc.0[1], Geometry::LineString(_)));
            }
            other => panic!("expected GeometryCollection, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_piece_skipped() {
        let table = Table::default().address(1110, state_st(), point!(x: 1.0, y: 2.0));
        let geocoder = LocationGeocoder::new(table);
        let text = "1110 N STATE ST; SOMEWHERE NICE; 1030 N STATE ST";

        assert_eq!(geocoder.resolve(text), Some(Geometry::Point(point!(x: 1.0, y: 2.0))));

        let pieces = geocoder.resolve_pieces(text);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[1].text, "SOMEWHERE NICE");
        assert_eq!(pieces[1].format, LocationFormat::Unidentified);
        assert_eq!(pieces[2].format, LocationFormat::StreetAddress);
        assert_eq!(
            pieces[1].geometry,
            Err(LocationError::FormatUnidentified {
                text: "SOMEWHERE NICE".to_string()
            })
        );
        assert!(matches!(pieces[2].geometry, Err(LocationError::GeocodeMiss { .. })));
    }

    #[test]
    fn test_intersection_symmetric_lookup() {
        let table = Table::default().corner(
            st(Direction::W, "CHESTNUT", "ST"),
            st(Direction::N, "ASHLAND", "AVE"),
            point!(x: -87.6671, y: 41.8980),
        );
        assert_eq!(
            resolve("N ASHLAND AVE & W CHESTNUT ST", &table),
            Some(Geometry::Point(point!(x: -87.6671, y: 41.8980)))
        );
    }
}
