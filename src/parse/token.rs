//! Tokenizer for location descriptions.

use crate::models::Direction;

/// A lexical token borrowed from the location text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Any whitespace-delimited run that is not a delimiter
    Word(&'a str),
    /// `&`
    Amp,
    /// `(`
    Open,
    /// `)`
    Close,
}

impl<'a> Token<'a> {
    /// Text of a word token
    pub fn word(&self) -> Option<&'a str> {
        match *self {
            Token::Word(w) => Some(w),
            _ => None,
        }
    }

    /// Word equal to `keyword` (case-sensitive)
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.word() == Some(keyword)
    }

    /// Street number: ASCII digits only
    pub fn as_number(&self) -> Option<u32> {
        self.word().and_then(parse_digits)
    }

    /// Address range `<digits>-<digits>`
    pub fn as_range(&self) -> Option<(u32, u32)> {
        let (start, end) = self.word()?.split_once('-')?;
        Some((parse_digits(start)?, parse_digits(end)?))
    }

    /// Direction letter (`N`, `S`, `E`, `W`)
    pub fn as_direction(&self) -> Option<Direction> {
        self.word().and_then(Direction::from_token)
    }
}

fn parse_digits(word: &str) -> Option<u32> {
    if word.is_empty() || !word.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    word.parse().ok()
}

/// Split a location description into tokens.
///
/// Whitespace separates words; `&`, `(` and `)` always stand alone, so
/// `"ST&W"` and `"ST (1200 N)"` tokenize the same as their spaced forms.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let delimiter = match c {
            '&' => Some(Token::Amp),
            '(' => Some(Token::Open),
            ')' => Some(Token::Close),
            _ => None,
        };

        if c.is_whitespace() || delimiter.is_some() {
            if let Some(s) = start.take() {
                tokens.push(Token::Word(&text[s..i]));
            }
            if let Some(d) = delimiter {
                tokens.push(d);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }

    if let Some(s) = start {
        tokens.push(Token::Word(&text[s..]));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_segment() {
        let tokens = tokenize("FROM W DIVISION ST  (1200 N)TO");
        assert_eq!(
            tokens,
            vec![
                Token::Word("FROM"),
                Token::Word("W"),
                Token::Word("DIVISION"),
                Token::Word("ST"),
                Token::Open,
                Token::Word("1200"),
                Token::Word("N"),
                Token::Close,
                Token::Word("TO"),
            ]
        );
    }

    #[test]
    fn test_tokenize_glued_ampersand() {
        let tokens = tokenize("N ASHLAND AVE&W CHESTNUT ST");
        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[3], Token::Amp);
    }

    #[test]
    fn test_numbers_and_ranges() {
        assert_eq!(Token::Word("1640").as_number(), Some(1640));
        assert_eq!(Token::Word("46TH").as_number(), None);
        assert_eq!(Token::Word("434-442").as_range(), Some((434, 442)));
        assert_eq!(Token::Word("434-").as_range(), None);
        assert_eq!(Token::Word("-442").as_range(), None);
        assert_eq!(Token::Word("99999999999").as_number(), None);
    }

    #[test]
    fn test_direction_is_case_sensitive() {
        assert_eq!(Token::Word("N").as_direction(), Some(Direction::N));
        assert_eq!(Token::Word("n").as_direction(), None);
        assert_eq!(Token::Amp.as_direction(), None);
    }
}
