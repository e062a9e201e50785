// src/checker/outcome.rs
// =============================================================================
// The classified result of one network operation.
//
// Every task the pool runs ends in exactly one Outcome. Errors coming out of
// reqwest are turned into an Outcome right here, at the boundary, so nothing
// downstream ever has to look at an error type again.
//
// Each Outcome maps to a "category key" - the string the aggregator groups
// references by (e.g. "200", "404", "Timeout Error").
// =============================================================================

use std::fmt;

/// Why a request never produced a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkErrorKind {
    /// Protocol-level failure (bad response, redirect loop, body error)
    Http,
    /// The URL could not be turned into a request
    Url,
    /// Request timed out
    Timeout,
    /// Could not connect (DNS, refused, reset)
    Connection,
}

impl NetworkErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkErrorKind::Http => "HTTP Error",
            NetworkErrorKind::Url => "URL Error",
            NetworkErrorKind::Timeout => "Timeout Error",
            NetworkErrorKind::Connection => "Connection Error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// 2xx response
    Success(u16),
    /// 3xx response
    Redirect(u16),
    /// Any other status (4xx, 5xx, ...)
    ClientError(u16),
    /// No response at all
    NetworkError(NetworkErrorKind),
    /// Response arrived but the body could not be written to disk (fetch mode)
    WriteError,
    /// Anything we could not classify, including a panicking task
    Unknown,
}

impl Outcome {
    /// Classifies a raw HTTP status code
    pub fn from_status(code: u16) -> Self {
        match code {
            200..=299 => Outcome::Success(code),
            300..=399 => Outcome::Redirect(code),
            _ => Outcome::ClientError(code),
        }
    }

    /// Classifies a reqwest error into one of the network sentinels
    ///
    /// The order matters: a timeout while connecting reports both
    /// is_timeout() and is_connect(), and we want "Timeout Error" for it.
    pub fn from_request_error(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Outcome::NetworkError(NetworkErrorKind::Timeout)
        } else if error.is_connect() {
            Outcome::NetworkError(NetworkErrorKind::Connection)
        } else if error.is_builder() {
            Outcome::NetworkError(NetworkErrorKind::Url)
        } else if error.is_redirect()
            || error.is_status()
            || error.is_body()
            || error.is_decode()
            || error.is_request()
        {
            Outcome::NetworkError(NetworkErrorKind::Http)
        } else {
            tracing::warn!(error = %error, "unclassified request error");
            Outcome::Unknown
        }
    }

    /// The string this outcome is grouped under in the aggregation map
    pub fn category_key(&self) -> String {
        match self {
            Outcome::Success(code) | Outcome::Redirect(code) | Outcome::ClientError(code) => {
                code.to_string()
            }
            Outcome::NetworkError(kind) => kind.as_str().to_string(),
            Outcome::WriteError => "Write Error".to_string(),
            Outcome::Unknown => "Unknown".to_string(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.category_key())
    }
}
