use image::DynamicImage;
use log::{debug, info};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::FetchError;
use crate::scryfall_client::ScryfallClient;
use crate::source::CardImageSource;

const SCRYFALL_NAMED: &str = "https://api.scryfall.com/cards/named";
const SCRYFALL_SEARCH: &str = "https://api.scryfall.com/cards/search";

#[derive(Deserialize)]
pub struct ScryfallSearchAnswer {
    pub object: String,
    pub total_cards: i32,
    pub has_more: bool,
    pub next_page: Option<String>,
    pub data: Vec<Map<String, Value>>,
}

fn image_uris_border_crop(d: &Map<String, Value>) -> Option<String> {
    Some(d.get("image_uris")?.get("border_crop")?.as_str()?.to_string())
}

/// The border crop scan of a card object, for cards with two faces the front.
pub fn border_crop(d: &Map<String, Value>) -> Option<String> {
    if d.contains_key("image_uris") {
        image_uris_border_crop(d)
    } else if let Some(faces) = d.get("card_faces").and_then(Value::as_array) {
        image_uris_border_crop(faces.first()?.as_object()?)
    } else {
        None
    }
}

fn exact_name_query(name: &str) -> String {
    format!("!\"{}\"", name)
}

pub struct ScryfallSource {
    client: ScryfallClient,
}

impl ScryfallSource {
    pub fn new(client: ScryfallClient) -> ScryfallSource {
        ScryfallSource { client }
    }

    fn search_page(
        &self,
        response: reqwest::blocking::Response,
    ) -> Result<Option<ScryfallSearchAnswer>, FetchError> {
        // scryfall answers a search without results with 404
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(
            response
                .error_for_status()?
                .json::<ScryfallSearchAnswer>()?,
        ))
    }
}

impl CardImageSource for ScryfallSource {
    fn card_image_uri(&self, name: &str) -> Result<Option<String>, FetchError> {
        let response = self
            .client
            .call_with_query(SCRYFALL_NAMED, &[("exact", name)])?;
        if response.status() == StatusCode::NOT_FOUND {
            info!("scryfall doesn't know a card named '{}'", name);
            return Ok(None);
        }
        let object = response
            .error_for_status()?
            .json::<Map<String, Value>>()?;
        let uri = border_crop(&object);
        if uri.is_none() {
            info!("scryfall has no image data for '{}'", name);
        }
        Ok(uri)
    }

    fn land_image_uris(&self, name: &str) -> Result<Vec<String>, FetchError> {
        let query = exact_name_query(name);
        let response = self
            .client
            .call_with_query(SCRYFALL_SEARCH, &[("q", query.as_str()), ("unique", "art")])?;

        let mut uris = Vec::new();
        let mut page = self.search_page(response)?;
        while let Some(answer) = page {
            debug!(
                "search for {} returned {} of {} cards",
                query,
                answer.data.len(),
                answer.total_cards
            );
            uris.extend(answer.data.iter().filter_map(border_crop));
            page = match (answer.has_more, answer.next_page) {
                (true, Some(next)) => self.search_page(self.client.call(&next)?)?,
                (true, None) => {
                    return Err(FetchError::Response(format!(
                        "search for {} has more results but no next page",
                        query
                    )));
                }
                (false, _) => None,
            };
        }
        Ok(uris)
    }

    fn fetch_image(&self, uri: &str) -> Result<DynamicImage, FetchError> {
        let bytes = self.client.call(uri)?.error_for_status()?.bytes()?;
        Ok(image::load_from_memory(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(json: &str) -> Map<String, Value> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn single_faced() {
        let forest = object(
            r#"{"object":"card","name":"Forest","set":"lea","layout":"normal","image_uris":{"small":"https://cards.scryfall.io/small/front/a/b/ab.jpg","border_crop":"https://cards.scryfall.io/border_crop/front/a/b/ab.jpg"}}"#,
        );
        assert_eq!(
            border_crop(&forest),
            Some("https://cards.scryfall.io/border_crop/front/a/b/ab.jpg".to_string())
        );
    }

    #[test]
    fn double_faced_uses_front() {
        let delver = object(
            r#"{"object":"card","name":"Delver of Secrets // Insectile Aberration","layout":"transform","card_faces":[{"name":"Delver of Secrets","image_uris":{"border_crop":"https://cards.scryfall.io/border_crop/front/1/2/12.jpg"}},{"name":"Insectile Aberration","image_uris":{"border_crop":"https://cards.scryfall.io/border_crop/back/1/2/12.jpg"}}]}"#,
        );
        assert_eq!(
            border_crop(&delver),
            Some("https://cards.scryfall.io/border_crop/front/1/2/12.jpg".to_string())
        );
    }

    #[test]
    fn missing_image_data() {
        let lapse = object(r#"{"object":"card","name":"Memory Lapse","layout":"normal"}"#);
        assert_eq!(border_crop(&lapse), None);

        let faces_without_images = object(
            r#"{"object":"card","name":"Consecrate // Consume","card_faces":[{"name":"Consecrate"},{"name":"Consume"}]}"#,
        );
        assert_eq!(border_crop(&faces_without_images), None);
    }

    #[test]
    fn search_answer() {
        let answer: ScryfallSearchAnswer = serde_json::from_str(
            r#"{"object":"list","total_cards":3,"has_more":true,"next_page":"https://api.scryfall.com/cards/search?page=2","data":[
                {"name":"Plains","image_uris":{"border_crop":"https://cards.scryfall.io/border_crop/front/1.jpg"}},
                {"name":"Plains","layout":"normal"},
                {"name":"Plains","image_uris":{"border_crop":"https://cards.scryfall.io/border_crop/front/3.jpg"}}
            ]}"#,
        )
        .unwrap();
        assert!(answer.has_more);
        let uris: Vec<String> = answer.data.iter().filter_map(border_crop).collect();
        assert_eq!(
            uris,
            vec![
                "https://cards.scryfall.io/border_crop/front/1.jpg".to_string(),
                "https://cards.scryfall.io/border_crop/front/3.jpg".to_string(),
            ]
        );
    }

    #[test]
    fn exact_name() {
        assert_eq!(exact_name_query("Island"), "!\"Island\"");
    }
}
