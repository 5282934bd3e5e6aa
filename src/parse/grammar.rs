//! Phrase grammar for location descriptions.
//!
//! Each rule takes the full token slice of one location piece and either
//! matches it completely or returns `None`. Street phrases are parsed on
//! sub-slices already bounded by `&`, `FROM`, `TO` or `(`, so a greedy name
//! never runs across those delimiters.

use super::token::Token;
use crate::models::{Intersection, Street, StreetAddress};

/// Street type abbreviations that end a street phrase
pub const STREET_SUFFIXES: [&str; 22] = [
    "AVE", "BLVD", "CRES", "CT", "DR", "ER", "EXPY", "HWY", "LN", "PKWY", "PL", "PLZ", "RD", "RL",
    "ROW", "SQ", "SR", "ST", "TER", "TOLL", "WAY", "XR",
];

/// Whether `word` is one of [`STREET_SUFFIXES`]
pub fn is_street_suffix(word: &str) -> bool {
    STREET_SUFFIXES.contains(&word)
}

fn is_direction(word: &str) -> bool {
    crate::models::Direction::from_token(word).is_some()
}

/// House numbers are positive; `0` only appears as a grid coordinate
fn house_number(token: &Token) -> Option<u32> {
    token.as_number().filter(|n| *n > 0)
}

/// Every token a word, or `None`
fn words<'a>(tokens: &[Token<'a>]) -> Option<Vec<&'a str>> {
    tokens.iter().map(Token::word).collect()
}

/// `<dir> <name...> <suffix> [<dir>]`
///
/// The name is everything between the direction and the last suffix token.
/// A trailing direction (`N HUMBOLDT BLVD W`) is accepted and dropped.
pub fn street(tokens: &[Token]) -> Option<Street> {
    let (first, rest) = tokens.split_first()?;
    let direction = first.as_direction()?;
    let words = words(rest)?;

    let body = match words.split_last() {
        Some((last, init)) if is_direction(last) => init,
        _ => &words[..],
    };
    let (suffix, name) = body.split_last()?;
    if !is_street_suffix(suffix) || name.is_empty() {
        return None;
    }

    Some(Street::new(Some(direction), &name.join(" "), suffix))
}

/// Street phrase whose suffix may be missing (`E MADISON PARK`).
///
/// The trailing direction and then the suffix are peeled off the end as long
/// as at least one name word remains.
pub fn alley_street(tokens: &[Token]) -> Option<Street> {
    let (first, rest) = tokens.split_first()?;
    let direction = first.as_direction()?;
    let words = words(rest)?;

    let mut name = &words[..];
    if let Some((last, init)) = name.split_last() {
        if !init.is_empty() && is_direction(last) {
            name = init;
        }
    }
    let mut suffix = "";
    if let Some((last, init)) = name.split_last() {
        if !init.is_empty() && is_street_suffix(last) {
            suffix = *last;
            name = init;
        }
    }
    if name.is_empty() {
        return None;
    }

    Some(Street::new(Some(direction), &name.join(" "), suffix))
}

/// Split on `&`
fn split_amp<'t, 'a>(tokens: &'t [Token<'a>]) -> Vec<&'t [Token<'a>]> {
    tokens.split(|t| *t == Token::Amp).collect()
}

/// `<number> <street>`
pub fn street_address(tokens: &[Token]) -> Option<StreetAddress> {
    let (first, rest) = tokens.split_first()?;
    let number = house_number(first)?;
    Some(StreetAddress::new(number, street(rest)?))
}

/// `<number>-<number> <street>`
pub fn street_address_range(tokens: &[Token]) -> Option<(StreetAddress, StreetAddress)> {
    let (first, rest) = tokens.split_first()?;
    let (start, end) = first.as_range()?;
    if start == 0 || end == 0 {
        return None;
    }
    let street = street(rest)?;
    Some((
        StreetAddress::new(start, street.clone()),
        StreetAddress::new(end, street),
    ))
}

/// `<street> & <street>`
pub fn intersection(tokens: &[Token]) -> Option<Intersection> {
    match split_amp(tokens)[..] {
        [a, b] => Some(Intersection::new(street(a)?, street(b)?)),
        _ => None,
    }
}

/// Four alley streets joined by `&`, expanded to every pair.
///
/// The streets are not listed in any particular order around the block, so
/// all six pairings are returned and the caller keeps the ones that exist.
pub fn alley(tokens: &[Token]) -> Option<Vec<Intersection>> {
    let parts = split_amp(tokens);
    if parts.len() != 4 {
        return None;
    }
    let streets = parts
        .into_iter()
        .map(alley_street)
        .collect::<Option<Vec<Street>>>()?;

    let mut intersections = Vec::with_capacity(6);
    for i in 0..streets.len() {
        for j in (i + 1)..streets.len() {
            intersections.push(Intersection::new(streets[i].clone(), streets[j].clone()));
        }
    }
    Some(intersections)
}

/// `ON <street> FROM <rest>`: the primary street and the tokens after `FROM`
fn segment<'t, 'a>(tokens: &'t [Token<'a>]) -> Option<(Street, &'t [Token<'a>])> {
    let (first, rest) = tokens.split_first()?;
    if !first.is_keyword("ON") {
        return None;
    }
    let from = rest.iter().position(|t| t.is_keyword("FROM"))?;
    Some((street(&rest[..from])?, &rest[from + 1..]))
}

/// `<street> ( <number> <dir> )` followed by anything
fn cross_street<'t, 'a>(tokens: &'t [Token<'a>]) -> Option<(Street, &'t [Token<'a>])> {
    let open = tokens.iter().position(|t| *t == Token::Open)?;
    let street = street(&tokens[..open])?;
    match tokens[open + 1..] {
        [number, dir, Token::Close, ref rest @ ..]
            if number.as_number().is_some() && dir.as_direction().is_some() =>
        {
            Some((street, rest))
        }
        _ => None,
    }
}

/// `<number> <dir>` followed by anything
fn block_number<'t, 'a>(tokens: &'t [Token<'a>]) -> Option<(u32, &'t [Token<'a>])> {
    match tokens {
        [number, dir, rest @ ..] if dir.as_direction().is_some() => {
            Some((house_number(number)?, rest))
        }
        _ => None,
    }
}

/// Leading `TO` keyword
fn to_keyword<'t, 'a>(tokens: &'t [Token<'a>]) -> Option<&'t [Token<'a>]> {
    match tokens {
        [to, rest @ ..] if to.is_keyword("TO") => Some(rest),
        _ => None,
    }
}

/// `ON <street> FROM <street> (<n> <dir>) TO <street> (<n> <dir>)`
pub fn segment_intersections(tokens: &[Token]) -> Option<(Intersection, Intersection)> {
    let (primary, rest) = segment(tokens)?;
    let (from_cross, rest) = cross_street(rest)?;
    let (to_cross, rest) = cross_street(to_keyword(rest)?)?;
    if !rest.is_empty() {
        return None;
    }
    Some((
        Intersection::new(primary.clone(), from_cross),
        Intersection::new(primary, to_cross),
    ))
}

/// `ON <street> FROM <n> <dir> TO <street> (<n> <dir>)`
pub fn segment_address_intersection(tokens: &[Token]) -> Option<(StreetAddress, Intersection)> {
    let (primary, rest) = segment(tokens)?;
    let (number, rest) = block_number(rest)?;
    let (to_cross, rest) = cross_street(to_keyword(rest)?)?;
    if !rest.is_empty() {
        return None;
    }
    Some((
        StreetAddress::new(number, primary.clone()),
        Intersection::new(primary, to_cross),
    ))
}

/// `ON <street> FROM <street> (<n> <dir>) TO <n> <dir>`
pub fn segment_intersection_address(tokens: &[Token]) -> Option<(Intersection, StreetAddress)> {
    let (primary, rest) = segment(tokens)?;
    let (from_cross, rest) = cross_street(rest)?;
    let (number, rest) = block_number(to_keyword(rest)?)?;
    if !rest.is_empty() {
        return None;
    }
    Some((
        Intersection::new(primary.clone(), from_cross),
        StreetAddress::new(number, primary),
    ))
}
