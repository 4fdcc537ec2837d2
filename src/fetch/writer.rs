//! Atomic artifact writes: stream to a hidden sibling, then rename.

use std::path::{Path, PathBuf};

use futures_util::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use super::error::FetchError;

/// Returns the temporary sibling used while `dest` is being written.
#[must_use]
pub fn partial_path_for(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map_or_else(|| "download".into(), |n| n.to_string_lossy());
    dest.with_file_name(format!(".{name}.part"))
}

/// Writes every chunk of `stream` to `dest`, returning the byte count.
///
/// Data goes to `.<name>.part` in the same directory and is renamed over
/// `dest` only after a successful flush, so `dest` never holds a partial
/// body. On any error the temporary file is removed. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns the first stream error unchanged, or [`FetchError::Write`] for
/// filesystem failures.
pub async fn write_atomically<S, B>(stream: S, dest: &Path) -> Result<u64, FetchError>
where
    S: Stream<Item = Result<B, FetchError>>,
    B: AsRef<[u8]>,
{
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| FetchError::write(parent, e))?;
    }

    let partial = partial_path_for(dest);
    let outcome = match stream_to_file(stream, &partial).await {
        Ok(bytes) => tokio::fs::rename(&partial, dest)
            .await
            .map(|()| bytes)
            .map_err(|e| FetchError::write(dest, e)),
        Err(error) => Err(error),
    };

    if outcome.is_err() {
        debug!(path = %partial.display(), "cleaning up partial file after error");
        let _ = tokio::fs::remove_file(&partial).await;
    }
    outcome
}

async fn stream_to_file<S, B>(stream: S, path: &Path) -> Result<u64, FetchError>
where
    S: Stream<Item = Result<B, FetchError>>,
    B: AsRef<[u8]>,
{
    let file = File::create(path)
        .await
        .map_err(|e| FetchError::write(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut stream = std::pin::pin!(stream);
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let chunk = chunk.as_ref();
        writer
            .write_all(chunk)
            .await
            .map_err(|e| FetchError::write(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| FetchError::write(path, e))?;

    Ok(bytes_written)
}
