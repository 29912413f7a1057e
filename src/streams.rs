//! Streams command: write metadata side-files for a channel.

use anyhow::{Context, Result};
use is3dump_media::{scan_first_chunk, Channel};
use std::path::{Path, PathBuf};

/// Generate the stream documents of `channel` into `out_dir`.
///
/// Returns the paths written; existing files are replaced.
pub fn write_stream_files(channel: &Path, out_dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let channel = Channel::builder(channel)
        .recursive(recursive)
        .open()
        .with_context(|| format!("Failed to open channel {:?}", channel))?;

    if channel.chunks().is_empty() {
        tracing::warn!("Channel {:?} has no chunks", channel.path());
    }

    let documents = scan_first_chunk(&channel)?;
    let mut written = Vec::with_capacity(documents.len());

    for document in documents {
        let path = out_dir.join(document.file_name());
        std::fs::write(&path, document.to_json()?)
            .with_context(|| format!("Failed to write {:?}", path))?;
        tracing::info!("Wrote {:?}", path);
        written.push(path);
    }

    Ok(written)
}
