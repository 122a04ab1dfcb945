use log::{debug, error, info};
use rand::Rng;
use std::path::{Path, PathBuf};

use crate::config::SheetConfig;
use crate::decklist::read_decklist;
use crate::error::{Error, Result};
use crate::resolve::{ResolvedEntry, Resolver};
use crate::sheet::{compose_sheet, expand_quantities, no_of_cards, split_into_sheets, write_sheet};
use crate::source::{CardImageSource, load_placeholder};

#[derive(Debug, Clone)]
pub struct Options {
    pub config: SheetConfig,
    pub randomise_lands: bool,
    /// Where the deck faces go, next to the deck list if unset.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetReport {
    pub path: PathBuf,
    pub cards: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckReport {
    pub deck: PathBuf,
    pub sheets: Vec<SheetReport>,
}

/// `decks/burn.v2.dec` becomes `burn`.
pub fn deck_basename(deck: &Path) -> String {
    let file_name = deck
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match file_name.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name,
    }
}

pub fn sheet_path(deck: &Path, output_dir: Option<&Path>, index: usize) -> PathBuf {
    let dir = match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => deck.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    dir.join(format!("{}_{}.jpg", deck_basename(deck), index))
}

pub fn export_sheets<S>(
    deck: &Path,
    entries: Vec<ResolvedEntry>,
    options: &Options,
    source: &S,
) -> Result<Vec<SheetReport>>
where
    S: CardImageSource + ?Sized,
{
    let config = &options.config;
    let mut reports = Vec::new();
    for (index, sheet) in split_into_sheets(entries, config.capacity())
        .into_iter()
        .enumerate()
    {
        let cards = no_of_cards(&sheet);
        info!("Deck face n. {} size: {}.", index, cards);

        let placeholder =
            load_placeholder(source, &config.cardback).map_err(|source| Error::Placeholder {
                location: config.cardback.clone(),
                source,
            })?;
        let composed = compose_sheet(
            expand_quantities(&sheet, |entry| &entry.image),
            &placeholder,
            config,
        );
        drop(sheet);

        let path = sheet_path(deck, options.output_dir.as_deref(), index);
        write_sheet(&composed, &path, config.jpeg_quality).map_err(|source| {
            Error::WriteSheet {
                path: path.clone(),
                source,
            }
        })?;
        debug!("wrote {}", path.display());
        reports.push(SheetReport { path, cards });
    }
    Ok(reports)
}

/// Parses, resolves and exports one deck list.
pub fn process_deck<S, R>(deck: &Path, options: &Options, source: &S, rng: &mut R) -> Result<DeckReport>
where
    S: CardImageSource + ?Sized,
    R: Rng + ?Sized,
{
    info!("Processing deck '{}'...", deck.display());

    let entries = read_decklist(deck)?;
    for entry in entries.iter() {
        debug!("{}", entry);
    }

    info!("Fetching images... this may take a while!");
    let resolved = Resolver::new(source, rng, &options.config, options.randomise_lands)
        .resolve_all(&entries)?;
    drop(entries);

    info!("Exporting Tabletop Simulator deck faces...");
    let sheets = export_sheets(deck, resolved, options, source)?;
    Ok(DeckReport {
        deck: deck.to_path_buf(),
        sheets,
    })
}

/// Processes every deck, a failing deck doesn't stop the ones after it.
pub fn process_decks<S, R, P>(
    decks: &[P],
    options: &Options,
    source: &S,
    rng: &mut R,
) -> Vec<(PathBuf, Result<DeckReport>)>
where
    S: CardImageSource + ?Sized,
    R: Rng + ?Sized,
    P: AsRef<Path>,
{
    decks
        .iter()
        .map(|deck| {
            let deck = deck.as_ref();
            let outcome = process_deck(deck, options, source, &mut *rng);
            if let Err(e) = &outcome {
                error!("{}", e);
            }
            (deck.to_path_buf(), outcome)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basenames() {
        assert_eq!(deck_basename(Path::new("burn.dec")), "burn");
        assert_eq!(deck_basename(Path::new("decks/burn.v2.dec")), "burn");
        assert_eq!(deck_basename(Path::new("./mono green.dec")), "mono green");
        assert_eq!(deck_basename(Path::new("no_extension")), "no_extension");
        assert_eq!(deck_basename(Path::new(".hidden")), ".hidden");
    }

    #[test]
    fn sheet_paths() {
        assert_eq!(
            sheet_path(Path::new("decks/burn.dec"), None, 0),
            PathBuf::from("decks/burn_0.jpg")
        );
        assert_eq!(
            sheet_path(Path::new("burn.dec"), None, 2),
            PathBuf::from("burn_2.jpg")
        );
        assert_eq!(
            sheet_path(Path::new("decks/burn.dec"), Some(Path::new("out")), 1),
            PathBuf::from("out/burn_1.jpg")
        );
    }
}
