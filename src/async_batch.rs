//! Async batch processing module
//!
//! This module converts many independent inputs concurrently, each on the
//! blocking pool, with a configurable concurrency limit.

use crate::async_convenience::run_blocking;
use crate::{CompressionStats, Format, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Direction of a batch conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Raw data to compressed data
    Compress,
    /// Compressed data to raw data
    Decompress,
}

/// Concurrent converter for batches of files or buffers
#[derive(Debug, Clone)]
pub struct AsyncBatchProcessor {
    format: Format,
    concurrency_limit: usize,
}

impl AsyncBatchProcessor {
    /// Create a processor for `format` using one task per CPU
    pub fn new(format: Format) -> Self {
        Self {
            format,
            concurrency_limit: num_cpus::get(),
        }
    }

    /// Set the concurrency limit
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit.max(1);
        self
    }

    /// Format this processor converts
    pub fn format(&self) -> Format {
        self.format
    }

    /// Convert in-memory buffers, keeping the input order in the result
    pub async fn convert_buffers(
        &self,
        direction: Direction,
        buffers: Vec<Vec<u8>>,
    ) -> Result<Vec<(Vec<u8>, CompressionStats)>> {
        let format = self.format;
        stream::iter(buffers)
            .map(|data| run_blocking(move || convert(format, direction, data)))
            .buffered(self.concurrency_limit)
            .try_collect()
            .await
    }

    /// Compress multiple files concurrently; results arrive in completion order
    pub async fn compress_files<P: AsRef<Path> + Send + Sync>(
        &self,
        files: Vec<P>,
    ) -> Result<Vec<(PathBuf, Vec<u8>)>> {
        self.convert_files(Direction::Compress, files).await
    }

    /// Decompress multiple files concurrently; results arrive in completion order
    pub async fn decompress_files<P: AsRef<Path> + Send + Sync>(
        &self,
        files: Vec<P>,
    ) -> Result<Vec<(PathBuf, Vec<u8>)>> {
        self.convert_files(Direction::Decompress, files).await
    }

    async fn convert_files<P: AsRef<Path> + Send + Sync>(
        &self,
        direction: Direction,
        files: Vec<P>,
    ) -> Result<Vec<(PathBuf, Vec<u8>)>> {
        let results: Vec<(PathBuf, Vec<u8>)> = stream::iter(files.into_iter().map(|path| {
            let format = self.format;
            async move {
                let path = path.as_ref().to_path_buf();
                let data = tokio::fs::read(&path).await?;
                let (output, stats) =
                    run_blocking(move || convert(format, direction, data)).await?;
                log::debug!(
                    "{format}: {} {} -> {} bytes",
                    path.display(),
                    stats.input_bytes,
                    stats.output_bytes
                );
                Ok::<_, crate::RetroLzError>((path, output))
            }
        }))
        .buffer_unordered(self.concurrency_limit)
        .try_collect()
        .await?;

        Ok(results)
    }
}

fn convert(format: Format, direction: Direction, data: Vec<u8>) -> Result<(Vec<u8>, CompressionStats)> {
    match direction {
        Direction::Compress => {
            let mut encoder = format.encoder();
            let mut output = Vec::new();
            encoder.encode(&mut Cursor::new(data), &mut output)?;
            Ok((output, encoder.stats().clone()))
        }
        Direction::Decompress => {
            let mut decoder = format.decoder();
            let mut output = Cursor::new(Vec::new());
            decoder.decode(&mut Cursor::new(data), &mut output)?;
            Ok((output.into_inner(), decoder.stats().clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ByteOrder;

    #[tokio::test]
    async fn test_buffers_keep_order() {
        let processor = AsyncBatchProcessor::new(Format::BackwardLz77(ByteOrder::BigEndian))
            .with_concurrency(3);
        let buffers: Vec<Vec<u8>> = (1..=8u8).map(|n| vec![n; n as usize * 50]).collect();

        let compressed = processor
            .convert_buffers(Direction::Compress, buffers.clone())
            .await
            .unwrap();
        let packed: Vec<Vec<u8>> = compressed.into_iter().map(|(data, _)| data).collect();
        let restored = processor
            .convert_buffers(Direction::Decompress, packed)
            .await
            .unwrap();

        for ((data, stats), original) in restored.into_iter().zip(buffers) {
            assert_eq!(stats.output_bytes, original.len() as u64);
            assert_eq!(data, original);
        }
    }

    #[tokio::test]
    async fn test_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = Vec::new();
        for i in 0..4 {
            let path = dir.path().join(format!("input{i}.bin"));
            tokio::fs::write(&path, format!("file {i} ").repeat(40))
                .await
                .unwrap();
            paths.push(path);
        }

        let processor = AsyncBatchProcessor::new(Format::Lz40).with_concurrency(2);
        let results = processor.compress_files(paths.clone()).await.unwrap();
        assert_eq!(results.len(), 4);
        for (path, compressed) in results {
            let original = tokio::fs::read(&path).await.unwrap();
            let restored = crate::decompress_bytes(Format::Lz40, &compressed).unwrap();
            assert_eq!(restored, original);
        }
    }

    #[tokio::test]
    async fn test_missing_file_fails_batch() {
        let processor = AsyncBatchProcessor::new(Format::TaikoLz80);
        let result = processor
            .decompress_files(vec![PathBuf::from("/nonexistent/retrolz/input.bin")])
            .await;
        assert!(matches!(result, Err(crate::RetroLzError::Io(_))));
    }
}
