//! Record extractor: turns a query into an ordered list of image records.
//!
//! The pipeline only depends on the [`Extractor`] trait; the search page
//! scraper behind [`SearchPageExtractor`] is one implementation of it.

mod parse;

pub use parse::parse_records;

use std::time::Duration;
use thiserror::Error;

use crate::config::HttpSettings;
use crate::query::Query;

/// One candidate image: where it lives and its file-type hint (e.g. `jpg`).
/// Identity is positional; duplicate locations are distinct records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub location: String,
    pub type_hint: String,
}

impl ImageRecord {
    pub fn new(location: impl Into<String>, type_hint: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            type_hint: type_hint.into(),
        }
    }
}

/// Why a query produced no records at all.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid search URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("search request timed out: {0}")]
    Timeout(String),
    #[error("search returned HTTP {0}")]
    Http(u32),
    #[error("search request failed: {0}")]
    Transport(String),
}

/// Produces the records for a query. Called concurrently, once per query.
pub trait Extractor: Send + Sync {
    fn extract(&self, query: &Query) -> Result<Vec<ImageRecord>, ExtractError>;
}

/// Fetches the image search results page and scans it for records.
#[derive(Debug, Clone)]
pub struct SearchPageExtractor {
    search_url: String,
    http: HttpSettings,
}

impl SearchPageExtractor {
    pub fn new(search_url: impl Into<String>, http: HttpSettings) -> Self {
        Self {
            search_url: search_url.into(),
            http,
        }
    }

    /// `<search_url>?q=<query>&source=lnms&tbm=isch`, form-encoded (spaces as `+`).
    /// A `+` in the query is a word separator, so `cat+dog` searches `cat dog`.
    pub fn search_url_for(&self, query: &Query) -> Result<url::Url, ExtractError> {
        let terms = query.as_str().replace('+', " ");
        let url = url::Url::parse_with_params(
            &self.search_url,
            &[
                ("q", terms.as_str()),
                ("source", "lnms"),
                ("tbm", "isch"),
            ],
        )?;
        Ok(url)
    }

    fn get_page(&self, url: &str) -> Result<String, ExtractError> {
        let transport = |e: curl::Error| {
            if e.is_operation_timedout() {
                ExtractError::Timeout(e.to_string())
            } else {
                ExtractError::Transport(e.to_string())
            }
        };

        let mut body = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(url).map_err(transport)?;
        easy.useragent(&self.http.user_agent).map_err(transport)?;
        easy.follow_location(true).map_err(transport)?;
        easy.accept_encoding("").map_err(transport)?;
        easy.connect_timeout(self.http.request_timeout.min(self.http.connect_timeout))
            .map_err(transport)?;
        easy.timeout(self.http.request_timeout.max(Duration::from_secs(1)))
            .map_err(transport)?;
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(transport)?;
            transfer.perform().map_err(transport)?;
        }

        let code = easy.response_code().map_err(transport)?;
        if !(200..300).contains(&code) {
            return Err(ExtractError::Http(code));
        }
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl Extractor for SearchPageExtractor {
    fn extract(&self, query: &Query) -> Result<Vec<ImageRecord>, ExtractError> {
        let url = self.search_url_for(query)?;
        tracing::debug!(query = %query, url = %url, "requesting search results");
        let html = self.get_page(url.as_str())?;
        let records = parse_records(&html);
        tracing::info!(query = %query, count = records.len(), "extracted image records");
        Ok(records)
    }
}
