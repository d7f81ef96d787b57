//! Item fetcher: one streaming HTTP GET per image.
//!
//! The body is pushed to the caller's sink chunk by chunk as curl receives it,
//! so an image is never buffered whole in memory.

mod error;

pub use error::{classify_curl_error, FetchError};

use std::io::{self, Write};
use std::time::Duration;

use crate::config::HttpSettings;

/// Retrieves the bytes behind one image location.
///
/// Implementations write the body to `sink` in receipt order and return the
/// number of bytes written. Called concurrently from worker threads.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError>;
}

/// libcurl-backed fetcher with separate connect and read (stall) timeouts.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    http: HttpSettings,
}

impl CurlFetcher {
    pub fn new(http: HttpSettings) -> Self {
        Self { http }
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.useragent(&self.http.user_agent)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // Decode gzip/deflate transparently; the file gets the decoded image.
        easy.accept_encoding("")?;
        // Error statuses abort before any body reaches the sink.
        easy.fail_on_error(true)?;
        easy.connect_timeout(self.http.connect_timeout)?;
        // Read timeout: abort when fewer than 1 byte/s arrives for `read_timeout`.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.http.read_timeout.max(Duration::from_secs(1)))?;
        Ok(())
    }
}

impl Fetcher for CurlFetcher {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError> {
        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url)
            .map_err(|e| FetchError::Other(format!("invalid request for {}: {}", url, e)))?;

        let mut written = 0u64;
        let mut write_err: Option<io::Error> = None;
        let result = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match sink.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        write_err = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(|e| FetchError::Other(e.to_string()))?;
            transfer.perform()
        };

        if let Some(e) = write_err {
            return Err(FetchError::Write(e));
        }

        let code = easy.response_code().unwrap_or(0);
        if let Err(e) = result {
            if e.is_http_returned_error() && code != 0 {
                return Err(FetchError::Http(code));
            }
            let connected = easy
                .connect_time()
                .map(|d| d > Duration::ZERO)
                .unwrap_or(false);
            return Err(classify_curl_error(&e, connected));
        }

        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        sink.flush().map_err(FetchError::Write)?;
        Ok(written)
    }
}
