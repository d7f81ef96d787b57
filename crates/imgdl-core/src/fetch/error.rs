//! Fetch error type and curl error classification.

use std::io;
use thiserror::Error;

use crate::outcome::FailureKind;

/// Why a single image fetch failed. Every variant is isolated to its task.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No connection was established within the connect timeout.
    #[error("connect timed out: {0}")]
    ConnectTimeout(String),
    /// The transfer stalled longer than the read timeout.
    #[error("read timed out: {0}")]
    ReadTimeout(String),
    /// The server answered with a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// DNS, connect, TLS, or mid-transfer connection failure.
    #[error("connection error: {0}")]
    Connection(String),
    /// Local write failed (permissions, disk full, invalid path).
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
    #[error("{0}")]
    Other(String),
}

impl FetchError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::ConnectTimeout(_) => FailureKind::ConnectTimeout,
            FetchError::ReadTimeout(_) => FailureKind::ReadTimeout,
            FetchError::Http(code) => FailureKind::Http(*code),
            FetchError::Connection(_) => FailureKind::Connection,
            FetchError::Write(_) => FailureKind::Persist,
            FetchError::Other(_) => FailureKind::Other,
        }
    }
}

/// Classify a curl error. `connected` tells a stalled transfer (read timeout)
/// apart from one that never got a connection (connect timeout).
pub fn classify_curl_error(e: &curl::Error, connected: bool) -> FetchError {
    if e.is_operation_timedout() {
        return if connected {
            FetchError::ReadTimeout(e.to_string())
        } else {
            FetchError::ConnectTimeout(e.to_string())
        };
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_ssl_connect_error()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return FetchError::Connection(e.to_string());
    }
    FetchError::Other(e.to_string())
}
