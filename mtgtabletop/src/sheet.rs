use image::codecs::jpeg::JpegEncoder;
use image::imageops::{FilterType, overlay};
use image::{DynamicImage, ImageResult, Rgb, RgbImage};
use log::{debug, warn};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::config::SheetConfig;
use crate::decklist::DeckEntry;

/// Anything that stands for a number of physical cards.
pub trait CardCount {
    fn quantity(&self) -> u32;
}

impl CardCount for DeckEntry {
    fn quantity(&self) -> u32 {
        self.quantity
    }
}

pub fn no_of_cards<T: CardCount>(entries: &[T]) -> u32 {
    entries.iter().map(CardCount::quantity).sum()
}

/// Splits the entries into consecutive sheets of at most `capacity` cards.
///
/// An entry is never divided between two sheets. If it doesn't fit on the
/// current sheet, the sheet is closed and the entry opens the next one; an
/// entry larger than `capacity` ends up alone on a sheet which is over
/// capacity. There is always at least one sheet.
pub fn split_into_sheets<T: CardCount>(entries: Vec<T>, capacity: u32) -> Vec<Vec<T>> {
    let mut sheets = Vec::new();
    let mut current: Vec<T> = Vec::new();
    let mut current_count: u32 = 0;
    for entry in entries {
        let quantity = entry.quantity();
        if !current.is_empty() && current_count.saturating_add(quantity) > capacity {
            sheets.push(std::mem::take(&mut current));
            current_count = 0;
        }
        current_count = current_count.saturating_add(quantity);
        current.push(entry);
    }
    sheets.push(current);
    sheets
}

/// Lays the images out row by row and puts the hidden card in the last cell.
///
/// Images are expected to have cell size already, the placeholder is scaled
/// here. Cards beyond the grid are dropped.
pub fn compose_sheet<'a, I>(images: I, placeholder: &DynamicImage, config: &SheetConfig) -> RgbImage
where
    I: IntoIterator<Item = &'a DynamicImage>,
{
    let black_pixel = Rgb::<u8>([0, 0, 0]);
    let mut composed = RgbImage::from_pixel(config.sheet_width(), config.sheet_height(), black_pixel);

    let mut placed: u32 = 0;
    let mut dropped: u32 = 0;
    for im in images {
        if placed >= config.cells() {
            dropped += 1;
            continue;
        }
        let (x, y) = config.cell_origin(placed);
        let without_alpha: RgbImage = im.to_rgb8();
        overlay(&mut composed, &without_alpha, i64::from(x), i64::from(y));
        placed += 1;
    }
    debug!("Stitched images count: {}.", placed);
    if dropped > 0 {
        warn!("{} cards don't fit on the sheet and were left out", dropped);
    }

    let hidden = placeholder
        .resize_exact(config.cell_width, config.cell_height, FilterType::Lanczos3)
        .to_rgb8();
    let (x, y) = config.cell_origin(config.cells() - 1);
    overlay(&mut composed, &hidden, i64::from(x), i64::from(y));
    composed
}

/// Repeats each image as often as its entry has copies.
pub fn expand_quantities<'a, T, F>(
    entries: &'a [T],
    image_of: F,
) -> impl Iterator<Item = &'a DynamicImage> + 'a
where
    T: CardCount,
    F: Fn(&'a T) -> &'a DynamicImage + 'a,
{
    entries
        .iter()
        .flat_map(move |entry| itertools::repeat_n(image_of(entry), entry.quantity() as usize))
}

pub fn write_sheet(image: &RgbImage, path: &Path, quality: u8) -> ImageResult<()> {
    let outputfile = BufWriter::new(File::create(path)?);
    let mut encoder = JpegEncoder::new_with_quality(outputfile, quality);
    encoder.encode_image(image)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::tests::small_config;

    fn entries(quantities: &[u32]) -> Vec<DeckEntry> {
        quantities
            .iter()
            .enumerate()
            .map(|(i, q)| DeckEntry::new(*q, &format!("card {}", i)))
            .collect()
    }

    fn quantities(sheets: &[Vec<DeckEntry>]) -> Vec<u32> {
        sheets.iter().map(|sheet| no_of_cards(sheet)).collect()
    }

    #[test]
    fn sixty_card_deck() {
        let deck = vec![DeckEntry::new(4, "Plains"), DeckEntry::new(56, "Forest")];
        let sheets = split_into_sheets(deck.clone(), 69);
        assert_eq!(sheets.len(), 1);
        assert_eq!(no_of_cards(&sheets[0]), 60);
        assert_eq!(sheets[0], deck);
    }

    #[test]
    fn hundred_forty_cards() {
        let deck = entries(&[40, 20, 10, 30, 25, 15]);
        let sheets = split_into_sheets(deck.clone(), 69);
        assert_eq!(quantities(&sheets), vec![60, 65, 15]);
        assert_eq!(sheets.concat(), deck);
    }

    #[test]
    fn exactly_full() {
        let sheets = split_into_sheets(entries(&[60, 9, 1]), 69);
        assert_eq!(quantities(&sheets), vec![69, 1]);
    }

    #[test]
    fn sheet_closes_early() {
        // the 10 doesn't fit next to the 65, the 4 would have
        let sheets = split_into_sheets(entries(&[65, 10, 4]), 69);
        assert_eq!(quantities(&sheets), vec![65, 14]);
    }

    #[test]
    fn empty_deck() {
        let sheets = split_into_sheets(Vec::<DeckEntry>::new(), 69);
        assert_eq!(sheets.len(), 1);
        assert!(sheets[0].is_empty());
    }

    #[test]
    fn oversized_entry() {
        let sheets = split_into_sheets(entries(&[3, 100, 2]), 69);
        assert_eq!(quantities(&sheets), vec![3, 100, 2]);

        let sheets = split_into_sheets(entries(&[100]), 69);
        assert_eq!(quantities(&sheets), vec![100]);
    }

    #[test]
    fn partition_properties() {
        let deck = entries(&[1, 4, 4, 4, 2, 3, 24, 17, 4, 4, 4, 1, 1, 60, 4, 4, 12, 69, 3]);
        for capacity in [1, 5, 10, 69, 100] {
            let sheets = split_into_sheets(deck.clone(), capacity);
            for sheet in sheets.iter() {
                assert!(no_of_cards(sheet) <= capacity || sheet.len() == 1);
            }
            assert_eq!(
                quantities(&sheets).iter().sum::<u32>(),
                no_of_cards(&deck)
            );
            assert_eq!(sheets.concat(), deck);
            assert_eq!(split_into_sheets(deck.clone(), capacity), sheets);
        }
    }

    fn uniform(config: &SheetConfig, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(
            config.cell_width,
            config.cell_height,
            Rgb(color),
        ))
    }

    fn cell_color(sheet: &RgbImage, config: &SheetConfig, index: u32) -> [u8; 3] {
        let (x, y) = config.cell_origin(index);
        sheet
            .get_pixel(x + config.cell_width / 2, y + config.cell_height / 2)
            .0
    }

    const RED: [u8; 3] = [255, 0, 0];
    const BLUE: [u8; 3] = [0, 0, 255];
    const WHITE: [u8; 3] = [255, 255, 255];

    #[test]
    fn sheet_size() {
        let config = SheetConfig::default();
        let placeholder = uniform(&config, WHITE);
        let sheet = compose_sheet(std::iter::empty(), &placeholder, &config);
        assert_eq!(sheet.dimensions(), (3120, 3115));
    }

    #[test]
    fn row_major_placement() {
        let config = small_config();
        let red = uniform(&config, RED);
        let blue = uniform(&config, BLUE);
        let placeholder = uniform(&config, WHITE);
        let sheet = compose_sheet(vec![&red, &red, &blue, &blue], &placeholder, &config);
        assert_eq!(cell_color(&sheet, &config, 0), RED);
        assert_eq!(cell_color(&sheet, &config, 1), RED);
        assert_eq!(cell_color(&sheet, &config, 2), BLUE);
        assert_eq!(cell_color(&sheet, &config, 3), BLUE);
        assert_eq!(cell_color(&sheet, &config, 4), [0, 0, 0]);
        assert_eq!(cell_color(&sheet, &config, 5), WHITE);
    }

    #[test]
    fn placeholder_on_empty_sheet() {
        let config = small_config();
        let placeholder = uniform(&config, WHITE);
        let sheet = compose_sheet(std::iter::empty(), &placeholder, &config);
        assert_eq!(cell_color(&sheet, &config, 0), [0, 0, 0]);
        assert_eq!(cell_color(&sheet, &config, 5), WHITE);
    }

    #[test]
    fn placeholder_wins_last_cell() {
        let config = small_config();
        let red = uniform(&config, RED);
        let placeholder = uniform(&config, WHITE);
        let sheet = compose_sheet(vec![&red; 6], &placeholder, &config);
        assert_eq!(cell_color(&sheet, &config, 4), RED);
        assert_eq!(cell_color(&sheet, &config, 5), WHITE);

        // more cards than cells
        let sheet = compose_sheet(vec![&red; 9], &placeholder, &config);
        assert_eq!(cell_color(&sheet, &config, 5), WHITE);
    }

    #[test]
    fn placeholder_is_scaled() {
        let config = small_config();
        let placeholder = DynamicImage::ImageRgb8(RgbImage::from_pixel(50, 70, Rgb(WHITE)));
        let sheet = compose_sheet(std::iter::empty(), &placeholder, &config);
        assert_eq!(cell_color(&sheet, &config, 5), WHITE);
        // the cell left of the last one is untouched
        assert_eq!(cell_color(&sheet, &config, 4), [0, 0, 0]);
    }

    #[test]
    fn alpha_is_dropped() {
        let config = small_config();
        let translucent = DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            config.cell_width,
            config.cell_height,
            image::Rgba([0, 255, 0, 10]),
        ));
        let placeholder = uniform(&config, WHITE);
        let sheet = compose_sheet(vec![&translucent], &placeholder, &config);
        assert_eq!(cell_color(&sheet, &config, 0), [0, 255, 0]);
    }

    struct Copies {
        quantity: u32,
        image: DynamicImage,
    }

    impl CardCount for Copies {
        fn quantity(&self) -> u32 {
            self.quantity
        }
    }

    #[test]
    fn quantities_expand() {
        let config = small_config();
        let sheet = vec![
            Copies {
                quantity: 2,
                image: uniform(&config, RED),
            },
            Copies {
                quantity: 3,
                image: uniform(&config, BLUE),
            },
        ];
        let expanded: Vec<&DynamicImage> = expand_quantities(&sheet, |c| &c.image).collect();
        assert_eq!(expanded.len(), 5);
        let placeholder = uniform(&config, WHITE);
        let composed = compose_sheet(expanded, &placeholder, &config);
        assert_eq!(cell_color(&composed, &config, 1), RED);
        assert_eq!(cell_color(&composed, &config, 2), BLUE);
        assert_eq!(cell_color(&composed, &config, 4), BLUE);
    }

    #[test]
    fn jpeg_output() {
        let config = small_config();
        let placeholder = uniform(&config, WHITE);
        let sheet = compose_sheet(std::iter::empty(), &placeholder, &config);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck_0.jpg");
        write_sheet(&sheet, &path, 100).unwrap();
        let written = image::open(&path).unwrap();
        assert_eq!(written.width(), config.sheet_width());
        assert_eq!(written.height(), config.sheet_height());
        assert_eq!(written.color(), image::ColorType::Rgb8);
    }
}
