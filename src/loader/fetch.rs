//! Downloading the resolver list.
//!
//! The remote CSV is staged into a local file and then decoded from disk, so a
//! failed decode leaves the download behind for inspection. There is exactly
//! one request per call and no retry.

use std::path::Path;

use log::{debug, info};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::error_handling::{FetchError, LoadError};
use crate::loader::decode::load_from_file;
use crate::models::Nameserver;

/// Downloads `url` into the file at `path`, creating or truncating it.
///
/// Returns the number of bytes written. The file is synced before returning.
///
/// # Errors
///
/// - `FetchError::InvalidUrl` if `url` does not parse (no request is made)
/// - `FetchError::Request` if the request or body transfer fails
/// - `FetchError::Status` for a non-success HTTP status
/// - `FetchError::EmptyBody` if the server sent zero bytes
/// - `FetchError::Sink` if the local file cannot be written
pub async fn fetch_to_file(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> Result<u64, FetchError> {
    let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    let request_error = |source| FetchError::Request {
        url: url.to_string(),
        source,
    };
    let sink_error = |source| FetchError::Sink {
        path: path.to_path_buf(),
        source,
    };

    debug!("Downloading {url} to {}", path.display());
    let mut response = client.get(parsed).send().await.map_err(request_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let mut file = tokio::fs::File::create(path).await.map_err(sink_error)?;
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await.map_err(request_error)? {
        file.write_all(&chunk).await.map_err(sink_error)?;
        written += chunk.len() as u64;
    }

    if written == 0 {
        return Err(FetchError::EmptyBody {
            url: url.to_string(),
        });
    }

    file.sync_all().await.map_err(sink_error)?;
    info!("Downloaded {written} bytes from {url}");
    Ok(written)
}

/// Downloads the resolver list from `url` into `path` and decodes it.
///
/// Fetch errors are returned before any decoding is attempted.
pub async fn load_from_url(
    client: &reqwest::Client,
    url: &str,
    path: &Path,
) -> Result<Vec<Nameserver>, LoadError> {
    fetch_to_file(client, url, path).await?;
    load_from_file(path)
}
