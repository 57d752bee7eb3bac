//! Async convenience functions
//!
//! The codecs are CPU-bound and synchronous; these helpers move each
//! conversion onto tokio's blocking pool so callers can await them without
//! stalling the runtime.

use crate::output::partial_path;
use crate::{CompressionStats, Format, Result, RetroLzError};
use std::io::{self, Cursor};
use std::path::Path;

/// Run a blocking conversion on the blocking pool
pub(crate) async fn run_blocking<T, F>(task: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| RetroLzError::Io(io::Error::other(err)))?
}

/// Compress owned data
pub async fn compress_bytes_async(format: Format, data: Vec<u8>) -> Result<Vec<u8>> {
    run_blocking(move || crate::compress_bytes(format, &data)).await
}

/// Decompress owned data
pub async fn decompress_bytes_async(format: Format, data: Vec<u8>) -> Result<Vec<u8>> {
    run_blocking(move || crate::decompress_bytes(format, &data)).await
}

/// Compress a file, replacing `output_path` only once the conversion succeeded
pub async fn compress_file<P1: AsRef<Path>, P2: AsRef<Path>>(
    format: Format,
    input_path: P1,
    output_path: P2,
) -> Result<CompressionStats> {
    let data = tokio::fs::read(input_path).await?;
    let (output, stats) = run_blocking(move || {
        let mut encoder = format.encoder();
        let mut output = Vec::new();
        encoder.encode(&mut Cursor::new(data), &mut output)?;
        Ok((output, encoder.stats().clone()))
    })
    .await?;

    write_replacing(output_path.as_ref(), &output).await?;
    Ok(stats)
}

/// Decompress a file, replacing `output_path` only once the conversion succeeded
pub async fn decompress_file<P1: AsRef<Path>, P2: AsRef<Path>>(
    format: Format,
    input_path: P1,
    output_path: P2,
) -> Result<CompressionStats> {
    let data = tokio::fs::read(input_path).await?;
    let (output, stats) = run_blocking(move || {
        let mut decoder = format.decoder();
        let mut output = Cursor::new(Vec::new());
        decoder.decode(&mut Cursor::new(data), &mut output)?;
        Ok((output.into_inner(), decoder.stats().clone()))
    })
    .await?;

    write_replacing(output_path.as_ref(), &output).await?;
    Ok(stats)
}

async fn write_replacing(path: &Path, data: &[u8]) -> Result<()> {
    let partial = partial_path(path);
    let written = match tokio::fs::write(&partial, data).await {
        Ok(()) => tokio::fs::rename(&partial, path).await,
        Err(err) => Err(err),
    };
    if let Err(err) = written {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(err.into());
    }
    log::debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
