use image::DynamicImage;
use std::path::Path;

use crate::error::FetchError;

/// Where card images come from.
///
/// A location is an opaque string handed back to [`CardImageSource::fetch_image`],
/// usually an URL of a scan.
pub trait CardImageSource {
    /// The canonical image location of a card, `None` if the card is unknown.
    fn card_image_uri(&self, name: &str) -> Result<Option<String>, FetchError>;

    /// Locations of all known artworks of a basic land.
    fn land_image_uris(&self, name: &str) -> Result<Vec<String>, FetchError>;

    fn fetch_image(&self, uri: &str) -> Result<DynamicImage, FetchError>;
}

pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Loads the hidden card image, either through the source or from disk.
pub fn load_placeholder<S>(source: &S, location: &str) -> Result<DynamicImage, FetchError>
where
    S: CardImageSource + ?Sized,
{
    if is_remote(location) {
        source.fetch_image(location)
    } else {
        let bytes = std::fs::read(Path::new(location))?;
        Ok(image::load_from_memory(&bytes)?)
    }
}
