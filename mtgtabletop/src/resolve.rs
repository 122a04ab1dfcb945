use image::DynamicImage;
use image::imageops::FilterType;
use log::{debug, error};
use rand::Rng;
use std::collections::HashMap;
use std::collections::hash_map::Entry::{Occupied, Vacant};
use std::fmt;

use crate::config::SheetConfig;
use crate::decklist::DeckEntry;
use crate::error::{Error, Result};
use crate::lands::{draw_variants, is_basic_land};
use crate::sheet::CardCount;
use crate::source::CardImageSource;

/// A deck entry together with its scan, already scaled to one grid cell.
pub struct ResolvedEntry {
    pub quantity: u32,
    pub name: String,
    pub image: DynamicImage,
}

impl CardCount for ResolvedEntry {
    fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl fmt::Debug for ResolvedEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} x '{}' ({}x{})",
            self.quantity,
            self.name,
            self.image.width(),
            self.image.height()
        )
    }
}

pub fn fit_to_cell(image: DynamicImage, config: &SheetConfig) -> DynamicImage {
    if image.width() == config.cell_width && image.height() == config.cell_height {
        image
    } else {
        image.resize_exact(config.cell_width, config.cell_height, FilterType::Lanczos3)
    }
}

/// Scaled images of one deck, keyed by location.
///
/// Lives as long as the deck being resolved, so a land artwork drawn several
/// times is downloaded once.
#[derive(Default)]
pub struct ImageCache {
    images: HashMap<String, DynamicImage>,
}

impl ImageCache {
    pub fn new() -> ImageCache {
        ImageCache::default()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get_or_fetch<S>(
        &mut self,
        name: &str,
        uri: &str,
        source: &S,
        config: &SheetConfig,
    ) -> Result<DynamicImage>
    where
        S: CardImageSource + ?Sized,
    {
        match self.images.entry(uri.to_string()) {
            Occupied(cached) => {
                debug!("image uri cached: {}", uri);
                Ok(cached.get().clone())
            }
            Vacant(token) => {
                let image = source.fetch_image(uri).map_err(|e| {
                    error!("fetching image for '{}' from {} failed: {}", name, uri, e);
                    Error::unavailable(name, e)
                })?;
                Ok(token.insert(fit_to_cell(image, config)).clone())
            }
        }
    }
}

pub struct Resolver<'a, S: ?Sized, R: ?Sized> {
    pub source: &'a S,
    pub rng: &'a mut R,
    pub config: &'a SheetConfig,
    pub randomise_lands: bool,
    cache: ImageCache,
}

impl<'a, S, R> Resolver<'a, S, R>
where
    S: CardImageSource + ?Sized,
    R: Rng + ?Sized,
{
    pub fn new(
        source: &'a S,
        rng: &'a mut R,
        config: &'a SheetConfig,
        randomise_lands: bool,
    ) -> Resolver<'a, S, R> {
        Resolver {
            source,
            rng,
            config,
            randomise_lands,
            cache: ImageCache::new(),
        }
    }

    fn resolve_card(&mut self, entry: &DeckEntry) -> Result<ResolvedEntry> {
        debug!("Fetching image for card '{}'...", entry.name);
        let uri = self
            .source
            .card_image_uri(&entry.name)
            .map_err(|e| Error::unavailable(&entry.name, e))?
            .ok_or_else(|| Error::unavailable(&entry.name, "no image known"))?;
        let image = self
            .cache
            .get_or_fetch(&entry.name, &uri, self.source, self.config)?;
        Ok(ResolvedEntry {
            quantity: entry.quantity,
            name: entry.name.clone(),
            image,
        })
    }

    fn resolve_land(&mut self, entry: &DeckEntry) -> Result<Vec<ResolvedEntry>> {
        let pool = self
            .source
            .land_image_uris(&entry.name)
            .map_err(|e| Error::unavailable(&entry.name, e))?;
        debug!("URLs found for card '{}':", entry.name);
        for uri in pool.iter() {
            debug!("{}", uri);
        }

        let drawn = draw_variants(&pool, entry.quantity, &mut *self.rng)
            .ok_or_else(|| Error::unavailable(&entry.name, "no artworks known"))?;

        let mut resolved = Vec::with_capacity(drawn.len());
        for (i, uri) in drawn.into_iter().enumerate() {
            debug!("Random lands ({}): index {} URL {}", entry.name, i, uri);
            let image = self
                .cache
                .get_or_fetch(&entry.name, uri, self.source, self.config)?;
            resolved.push(ResolvedEntry {
                quantity: 1,
                name: entry.name.clone(),
                image,
            });
        }
        Ok(resolved)
    }

    pub fn resolve_entry(&mut self, entry: &DeckEntry) -> Result<Vec<ResolvedEntry>> {
        if self.randomise_lands && is_basic_land(&entry.name) {
            self.resolve_land(entry)
        } else {
            Ok(vec![self.resolve_card(entry)?])
        }
    }

    /// Resolves the whole deck, stopping at the first card without an image.
    pub fn resolve_all(&mut self, entries: &[DeckEntry]) -> Result<Vec<ResolvedEntry>> {
        let mut resolved = Vec::new();
        for entry in entries {
            resolved.extend(self.resolve_entry(entry)?);
        }
        debug!(
            "resolved {} entries into {} images, {} downloads",
            entries.len(),
            resolved.len(),
            self.cache.len()
        );
        Ok(resolved)
    }
}
