// src/checker/fetch.rs
// =============================================================================
// Fetch mode: download one URL into an output directory.
//
// A body is written only when the server answers 200 or 302. That rule is
// separate from the link checker's "any 2xx/3xx is fine" rule on purpose:
// a 204 is a working link but there is nothing to download.
//
// Every task owns its own output file, so no locking happens here.
// =============================================================================

use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use super::http::LinkClient;
use super::normalize::normalize_url;
use super::outcome::Outcome;

// File name used when a URL has neither a path segment nor a host
const FALLBACK_FILE_NAME: &str = "index.html";

/// A body that was written to disk
#[derive(Debug, Clone)]
pub struct Download {
    pub status: u16,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Maps the failure onto the category it is recorded under
    pub fn outcome(&self) -> Outcome {
        match self {
            DownloadError::Request(e) => Outcome::from_request_error(e),
            DownloadError::Status(code) => Outcome::from_status(*code),
            DownloadError::Write { .. } => Outcome::WriteError,
        }
    }
}

// Picks the file name for a downloaded URL
//
// Examples:
//   "http://x.com/files/paper.pdf" -> "paper.pdf"
//   "http://x.com/files/"          -> "files"
//   "http://x.com"                 -> "x.com"
pub fn file_name_for(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url
            .rsplit('/')
            .find(|segment| !segment.is_empty())
            .unwrap_or(FALLBACK_FILE_NAME)
            .to_string();
    };

    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .or_else(|| parsed.host_str())
        .unwrap_or(FALLBACK_FILE_NAME)
        .to_string()
}

impl LinkClient {
    // Downloads one URL into `output_dir`
    //
    // Returns the written file on 200/302, a DownloadError otherwise.
    // Nothing is created on disk unless the status qualifies.
    pub async fn download(&self, target: &str, output_dir: &Path) -> Result<Download, DownloadError> {
        let url = normalize_url(target);
        let response = self.client.get(&url).send().await?;
        let status = response.status().as_u16();

        if status != 200 && status != 302 {
            return Err(DownloadError::Status(status));
        }

        let body = response.bytes().await?;
        let path = output_dir.join(file_name_for(&url));

        tokio::fs::write(&path, &body)
            .await
            .map_err(|source| DownloadError::Write {
                path: path.clone(),
                source,
            })?;

        Ok(Download {
            status,
            path,
            bytes: body.len(),
        })
    }
}
