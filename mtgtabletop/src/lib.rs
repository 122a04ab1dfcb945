extern crate image;
extern crate log;
extern crate reqwest;
extern crate serde;
extern crate serde_json;

use log::LevelFilter;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

mod config;
pub use crate::config::SheetConfig;

mod deck;
pub use crate::deck::{
    DeckReport, Options, SheetReport, deck_basename, export_sheets, process_deck, process_decks,
    sheet_path,
};

mod decklist;
pub use crate::decklist::{DeckEntry, parse_decklist, parse_line, read_decklist};

mod error;
pub use crate::error::{Error, FetchError, ParseError, ParseErrorKind, Result};

mod lands;
pub use crate::lands::{BASIC_LANDS, draw_variants, is_basic_land};

mod resolve;
pub use crate::resolve::{ImageCache, ResolvedEntry, Resolver, fit_to_cell};

mod scryfall;
pub use crate::scryfall::{ScryfallSource, border_crop};

mod scryfall_client;
pub use crate::scryfall_client::ScryfallClient;

mod sheet;
pub use crate::sheet::{
    CardCount, compose_sheet, expand_quantities, no_of_cards, split_into_sheets, write_sheet,
};

mod source;
pub use crate::source::{CardImageSource, load_placeholder};

/// Progress goes to stdout as plain lines, verbose mode adds debug output
/// with timestamps.
pub fn setup_logger(verbose: bool) -> std::result::Result<(), log::SetLoggerError> {
    let dispatch = if verbose {
        fern::Dispatch::new()
            .format(|out, message, record| {
                let now = OffsetDateTime::now_utc()
                    .format(&Rfc3339)
                    .unwrap_or_default();
                out.finish(format_args!(
                    "[{}][{}][{}] {}",
                    now,
                    record.target(),
                    record.level(),
                    message
                ))
            })
            .level(LevelFilter::Debug)
    } else {
        fern::Dispatch::new()
            .format(|out, message, record| match record.level() {
                log::Level::Info => out.finish(format_args!("{}", message)),
                level => out.finish(format_args!("[{}] {}", level, message)),
            })
            .level(LevelFilter::Info)
    };
    dispatch
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("hyper_util", LevelFilter::Warn)
        .level_for("rustls", LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()
}
