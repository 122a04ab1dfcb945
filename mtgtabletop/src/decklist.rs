extern crate regex;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::fmt;
use std::path::Path;

use crate::error::{Error, ParseError, ParseErrorKind};

const COMMENT_MARKER: &str = "//";
const SIDEBOARD_MARKER: &str = "SB";

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DeckEntry {
    pub quantity: u32,
    pub name: String,
}

impl DeckEntry {
    pub fn new(quantity: u32, name: &str) -> DeckEntry {
        DeckEntry {
            quantity,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for DeckEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} x '{}'", self.quantity, self.name)
    }
}

fn is_data_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with(COMMENT_MARKER) && !line.starts_with(SIDEBOARD_MARKER)
}

fn parse_quantity(token: &str) -> Result<u32, ParseErrorKind> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseErrorKind::InvalidQuantity);
    }
    // only digits left, so a failed parse means the count doesn't fit
    match token.parse::<u32>() {
        Ok(0) => Err(ParseErrorKind::InvalidQuantity),
        Ok(q) => Ok(q),
        Err(_) => Err(ParseErrorKind::QuantityTooLarge),
    }
}

/// Parses a single data line, `line_number` is only used for the error.
pub fn parse_line(line: &str, line_number: usize) -> Result<DeckEntry, ParseError> {
    lazy_static! {
        static ref QUANTITY_NAME: Regex = Regex::new(r"^(\S+)(?:\s+(.*))?$").unwrap();
    }

    let error = |kind| ParseError {
        line_number,
        line: line.to_string(),
        kind,
    };

    let captures = QUANTITY_NAME
        .captures(line)
        .ok_or_else(|| error(ParseErrorKind::InvalidQuantity))?;
    let quantity = captures
        .get(1)
        .map_or(Err(ParseErrorKind::InvalidQuantity), |m| {
            parse_quantity(m.as_str())
        })
        .map_err(error)?;
    let name = captures
        .get(2)
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| error(ParseErrorKind::MissingCardName))?;

    Ok(DeckEntry::new(quantity, name))
}

pub fn parse_decklist(decklist: &str) -> Result<Vec<DeckEntry>, ParseError> {
    decklist
        .trim_start_matches('\u{feff}')
        .lines()
        .enumerate()
        .map(|(i, s)| (i + 1, s.trim()))
        .filter(|(_, s)| is_data_line(s))
        .map(|(line_number, s)| parse_line(s, line_number))
        .collect()
}

pub fn read_decklist(path: &Path) -> Result<Vec<DeckEntry>, Error> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::ReadDeck {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_decklist(&contents)?;
    debug!("read {} entries from {}", entries.len(), path.display());
    Ok(entries)
}
