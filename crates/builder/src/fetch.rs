//! Source archive download

use evm_errors::{BuildError, Error, StorageError};
use futures::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Stream `url` into `dest`.
///
/// The body is written to `<dest>.part` and renamed into place once complete,
/// so an interrupted download is never mistaken for a cached archive.
pub(crate) async fn download_archive(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), Error> {
    let fetch_failed = |message: String| -> Error {
        BuildError::FetchFailed {
            url: url.to_string(),
            message,
        }
        .into()
    };

    info!(url, dest = %dest.display(), "downloading sources");
    let response = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| fetch_failed(e.to_string()))?;
    let total = response.content_length().unwrap_or(0);

    let part = dest.with_extension("part");
    let mut file = tokio::fs::File::create(&part)
        .await
        .map_err(|e| Error::from(StorageError::write(&e, &part)))?;
    let mut stream = response.bytes_stream();
    let mut downloaded = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| fetch_failed(e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| Error::from(StorageError::write(&e, &part)))?;
        downloaded += chunk.len() as u64;
    }
    file.flush()
        .await
        .map_err(|e| Error::from(StorageError::write(&e, &part)))?;
    drop(file);

    tokio::fs::rename(&part, dest)
        .await
        .map_err(|e| Error::from(StorageError::write(&e, dest)))?;
    debug!(url, downloaded, total, "download complete");
    Ok(())
}
