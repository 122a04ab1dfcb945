extern crate reqwest;

use log::debug;
use std::cell::Cell;
use std::time::{Duration, Instant};

// headers required according to https://scryfall.com/docs/api/
const USER_AGENT: &str = "mtgtabletop/0.4";
const ACCEPT: &str = "*/*";
const SCRYFALL_COOLDOWN: Duration = Duration::from_millis(100);

/// Blocking HTTP client which keeps the requested distance between calls.
pub struct ScryfallClient {
    client: reqwest::blocking::Client,
    last_call: Cell<Option<Instant>>,
}

impl ScryfallClient {
    pub fn new() -> Result<ScryfallClient, reqwest::Error> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );
        Ok(ScryfallClient {
            client: reqwest::blocking::Client::builder()
                .default_headers(headers)
                .build()?,
            last_call: Cell::new(None),
        })
    }

    fn wait_for_cooldown(&self) {
        if let Some(last) = self.last_call.get() {
            let next_call = last + SCRYFALL_COOLDOWN;
            let now = Instant::now();
            if next_call > now {
                debug!("waiting {:?} before next call", next_call - now);
                std::thread::sleep(next_call - now);
            }
        }
        self.last_call.set(Some(Instant::now()));
    }

    pub fn call(&self, uri: &str) -> Result<reqwest::blocking::Response, reqwest::Error> {
        self.wait_for_cooldown();
        debug!("calling {}", uri);
        self.client.get(uri).send()
    }

    pub fn call_with_query(
        &self,
        uri: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::blocking::Response, reqwest::Error> {
        self.wait_for_cooldown();
        debug!("calling {} with {:?}", uri, query);
        self.client.get(uri).query(query).send()
    }
}
