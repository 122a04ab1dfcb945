use std::path::PathBuf;
use thiserror::Error;

/// A deck list line that is neither a comment, a sideboard line nor blank and
/// still doesn't read as `<quantity> <card name>`.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("line {line_number}: {kind}: '{line}'")]
pub struct ParseError {
    pub line_number: usize,
    pub line: String,
    pub kind: ParseErrorKind,
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseErrorKind {
    #[error("quantity is not a positive integer")]
    InvalidQuantity,
    #[error("quantity doesn't fit in 32 bits")]
    QuantityTooLarge,
    #[error("no card name after the quantity")]
    MissingCardName,
}

/// Failure of a single lookup or download against the card database.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("couldn't decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("couldn't read {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected response: {0}")]
    Response(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not read deck list {}: {source}", .path.display())]
    ReadDeck {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed deck list, {0}")]
    Parse(#[from] ParseError),

    #[error("Could not find an image for card: '{name}'! ({reason})")]
    UnavailableImage { name: String, reason: String },

    #[error("could not fetch the hidden card image from {location}: {source}")]
    Placeholder {
        location: String,
        source: FetchError,
    },

    #[error("could not write deck face {}: {source}", .path.display())]
    WriteSheet {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("invalid sheet configuration: {0}")]
    Config(String),

    #[error("could not read sheet configuration {}: {reason}", .path.display())]
    ReadConfig { path: PathBuf, reason: String },
}

impl Error {
    pub fn unavailable(name: &str, reason: impl ToString) -> Error {
        Error::UnavailableImage {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
