//! Street, address and intersection value types.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Cardinal direction prefix of a Chicago street name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    N,
    S,
    E,
    W,
}

impl Direction {
    /// Parse a single-letter direction token. Matching is case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "N" => Some(Direction::N),
            "S" => Some(Direction::S),
            "E" => Some(Direction::E),
            "W" => Some(Direction::W),
            _ => None,
        }
    }

    /// Single-letter abbreviation as written in location text
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::S => "S",
            Direction::E => "E",
            Direction::W => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named street, e.g. `N MAPLEWOOD AVE`.
///
/// All three fields take part in equality and ordering, so `N STATE ST` and
/// `S STATE ST` are different streets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Street {
    /// Direction prefix, `None` when the text carried none
    pub direction: Option<Direction>,
    /// Street name, possibly several words (`COTTAGE GROVE`)
    pub name: String,
    /// Suffix abbreviation (`AVE`, `ST`, ...), empty when absent
    pub street_type: String,
}

impl Street {
    /// Create a street; pass `""` for a missing type
    pub fn new(direction: Option<Direction>, name: &str, street_type: &str) -> Self {
        Self {
            direction,
            name: name.to_string(),
            street_type: street_type.to_string(),
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if let Some(direction) = &self.direction {
            parts.push(direction.as_str());
        }
        if !self.name.is_empty() {
            parts.push(&self.name);
        }
        if !self.street_type.is_empty() {
            parts.push(&self.street_type);
        }
        f.write_str(&parts.join(" "))
    }
}

/// A single numbered address on a street, e.g. `1640 N MAPLEWOOD AVE`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreetAddress {
    pub number: u32,
    pub street: Street,
}

impl StreetAddress {
    /// Create an address from a house number and its street
    pub fn new(number: u32, street: Street) -> Self {
        Self { number, street }
    }
}

impl fmt::Display for StreetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.street)
    }
}

/// The crossing of two streets.
///
/// The pair is unordered: `Intersection::new(a, b) == Intersection::new(b, a)`,
/// and hashing/ordering agree with that. The stored order is kept so callers
/// can still tell the primary street (`street1`) of a segment apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intersection {
    pub street1: Street,
    pub street2: Street,
}

impl Intersection {
    /// Create an intersection; `street1` is the primary street of a segment
    pub fn new(street1: Street, street2: Street) -> Self {
        Self { street1, street2 }
    }

    /// Both streets, smaller one first
    fn sorted(&self) -> (&Street, &Street) {
        if self.street1 <= self.street2 {
            (&self.street1, &self.street2)
        } else {
            (&self.street2, &self.street1)
        }
    }
}

impl PartialEq for Intersection {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Eq for Intersection {}

impl Hash for Intersection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

impl PartialOrd for Intersection {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Intersection {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sorted().cmp(&other.sorted())
    }
}

impl fmt::Display for Intersection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} & {}", self.street1, self.street2)
    }
}
