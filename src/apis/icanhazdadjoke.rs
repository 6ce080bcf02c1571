use std::cmp::Ordering;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use rand::seq::IndexedRandom;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

pub const CLIENT_IDENTIFIER: &str = "dadjoke (https://github.com/nicklpeterson/dadjoke)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Joke {
    pub id: String,
    pub joke: String,
    pub status: u16,
}

/// Search endpoint response. `results` stays raw JSON until
/// [`decode_joke_list`] is called on it.
#[derive(Debug, Deserialize)]
pub struct SearchEnvelope {
    pub results: Box<RawValue>,
    pub search_term: String,
    pub status: u16,
    pub total_jokes: usize,
    pub current_page: Option<u32>,
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    Joke,
    SearchEnvelope,
    JokeList,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Joke => "joke",
            Self::SearchEnvelope => "search results",
            Self::JokeList => "joke list",
        })
    }
}

#[derive(Debug)]
pub enum JokeError {
    InvalidUrl(url::ParseError),
    Request(reqwest::Error),
    Status(StatusCode),
    Body(reqwest::Error),
    Decode(DecodeStage, serde_json::Error),
    NoJokesFound,
}

impl fmt::Display for JokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(err) => write!(f, "invalid request URL: {err}"),
            Self::Request(err) => match err.source() {
                Some(source) => write!(f, "request failed: {err}: {source}"),
                None => write!(f, "request failed: {err}"),
            },
            Self::Status(status_code) => write!(f, "icanhazdadjoke responded with {status_code}"),
            Self::Body(err) => write!(f, "failed to read the response body: {err}"),
            Self::Decode(stage, err) => write!(f, "failed to decode {stage}: {err}"),
            Self::NoJokesFound => f.write_str("No Jokes found"),
        }
    }
}

impl Error for JokeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidUrl(err) => Some(err),
            Self::Request(err) | Self::Body(err) => Some(err),
            Self::Decode(_, err) => Some(err),
            Self::Status(_) | Self::NoJokesFound => None,
        }
    }
}

impl From<url::ParseError> for JokeError {
    fn from(value: url::ParseError) -> Self {
        Self::InvalidUrl(value)
    }
}

#[async_trait]
pub trait JokeSource {
    async fn fetch(&self, url: &str) -> Result<Bytes, JokeError>;
}

pub struct HttpFetcher {
    http_client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, JokeError> {
        let http_client =
            reqwest::Client::builder().timeout(timeout).build().map_err(JokeError::Request)?;

        Ok(Self::from_client(http_client))
    }

    pub const fn from_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl JokeSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, JokeError> {
        let url = Url::parse(url)?;
        log::debug!("fetching {url}");

        let response = self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_IDENTIFIER)
            .send()
            .await
            .map_err(JokeError::Request)?;

        if !response.status().is_success() {
            return Err(JokeError::Status(response.status()));
        }

        let body = response.bytes().await.map_err(JokeError::Body)?;
        log::debug!("received {} bytes", body.len());

        Ok(body)
    }
}

pub fn decode_joke(bytes: &[u8]) -> Result<Joke, JokeError> {
    serde_json::from_slice(bytes).map_err(|err| JokeError::Decode(DecodeStage::Joke, err))
}

pub fn decode_search_envelope(bytes: &[u8]) -> Result<SearchEnvelope, JokeError> {
    serde_json::from_slice(bytes).map_err(|err| JokeError::Decode(DecodeStage::SearchEnvelope, err))
}

pub fn decode_joke_list(results: &RawValue) -> Result<Vec<Joke>, JokeError> {
    serde_json::from_str(results.get()).map_err(|err| JokeError::Decode(DecodeStage::JokeList, err))
}

pub fn pick_random<'a, R: Rng + ?Sized>(
    jokes: &'a [Joke],
    rng: &mut R,
) -> Result<&'a str, JokeError> {
    jokes.choose(rng).map(|joke| joke.joke.as_str()).ok_or(JokeError::NoJokesFound)
}

pub fn search_url(base_url: &Url, term: &str) -> Result<Url, JokeError> {
    let mut url = base_url.join("search")?;
    url.query_pairs_mut().append_pair("term", term);

    Ok(url)
}

/// Fetches one joke. A blank `term` asks the API for a random joke, anything
/// else searches for it and picks one of the matches with `rng`.
pub async fn random_joke<S, R>(
    source: &S,
    base_url: &Url,
    term: &str,
    rng: &mut R,
) -> Result<String, JokeError>
where
    S: JokeSource + ?Sized,
    R: Rng + ?Sized,
{
    let term = term.trim();

    if term.is_empty() {
        let body = source.fetch(base_url.as_str()).await?;
        let joke = decode_joke(&body)?;
        log::debug!("got joke {} with status {}", joke.id, joke.status);
        return Ok(joke.joke);
    }

    let body = source.fetch(search_url(base_url, term)?.as_str()).await?;
    let envelope = decode_search_envelope(&body)?;
    let jokes = decode_joke_list(&envelope.results)?;
    check_total_jokes(&envelope, jokes.len());

    pick_random(&jokes, rng).map(str::to_owned)
}

fn check_total_jokes(envelope: &SearchEnvelope, found: usize) {
    log::debug!("search for {:?} answered with status {}", envelope.search_term, envelope.status);

    match envelope.total_jokes.cmp(&found) {
        Ordering::Less => log::warn!(
            "search for {:?} reported {} jokes but returned {found}",
            envelope.search_term,
            envelope.total_jokes
        ),
        Ordering::Greater => log::debug!(
            "search for {:?} returned {found} of {} jokes (page {} of {})",
            envelope.search_term,
            envelope.total_jokes,
            envelope.current_page.unwrap_or(1),
            envelope.total_pages.unwrap_or(1)
        ),
        Ordering::Equal => {
            log::debug!("search for {:?} returned {found} jokes", envelope.search_term);
        }
    }
}
