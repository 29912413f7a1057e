//! Dump command: channel → output file.

use crate::config::Config;
use anyhow::{Context, Result};
use is3dump_common::paths::default_output_name;
use is3dump_common::{Encoding, TimeRange};
use is3dump_media::id3::Tag;
use is3dump_media::{Channel, DumpSummary, Dumper, IndexRecord, StreamFilter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output-path policy violations.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Output file already exists: {0:?} (use --override to replace it)")]
    Exists(PathBuf),
}

/// A parsed dump invocation.
#[derive(Debug, Clone, Default)]
pub struct DumpRequest {
    pub channel: PathBuf,
    /// Falls back to the configured stream id.
    pub stream_id: Option<u64>,
    /// Falls back to `<channel_id>.<encoding>`.
    pub output: Option<PathBuf>,
    pub range: TimeRange,
    pub overwrite: bool,
}

/// Result of a finished dump.
#[derive(Debug, Clone)]
pub struct DumpOutcome {
    pub path: PathBuf,
    pub encoding: Encoding,
    pub summary: DumpSummary,
}

/// Where the output goes when no path was given.
pub fn default_output_path(config: &Config, channel_id: &str, encoding: Encoding) -> PathBuf {
    let name = default_output_name(channel_id, encoding);
    match &config.dump.output_dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Run a dump.
pub fn run(request: &DumpRequest, config: &Config) -> Result<DumpOutcome> {
    run_with(request, config, |_| {})
}

/// Run a dump, calling `on_record` for every record handed to the framer.
///
/// Everything that can abort the dump is checked before the output file is
/// created.
pub fn run_with<F>(request: &DumpRequest, config: &Config, on_record: F) -> Result<DumpOutcome>
where
    F: FnMut(&IndexRecord),
{
    let stream_id = request.stream_id.unwrap_or(config.dump.stream_id);

    let channel = Channel::builder(&request.channel)
        .stream(stream_id)
        .recursive(config.channel.recursive)
        .open()
        .with_context(|| format!("Failed to open channel {:?}", request.channel))?;
    let channel_id = channel.id().to_string();

    let filter = StreamFilter::new(stream_id).with_range(request.range);
    let tag = config
        .dump
        .id3_tag
        .then(|| Tag::for_channel(&config.dump.publisher, &channel_id));
    let dumper = Dumper::new(channel, filter)
        .with_context(|| format!("Cannot dump stream {} of {:?}", stream_id, request.channel))?
        .with_tag(tag);
    let encoding = dumper.encoding();

    let path = request
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(config, &channel_id, encoding));
    let mut out = create_output(&path, request.overwrite)?;

    tracing::info!(
        "Dumping stream {} of {} ({}) to {:?}",
        stream_id,
        channel_id,
        encoding,
        path
    );
    let summary = dumper
        .write_with(&mut out, on_record)
        .with_context(|| format!("Dump to {:?} failed", path))?;

    tracing::info!(
        "Wrote {} frames ({} bytes, {} dropped) from {} chunks",
        summary.frames_written,
        summary.bytes_written + summary.tag_bytes,
        summary.frames_dropped,
        summary.chunks
    );

    Ok(DumpOutcome {
        path,
        encoding,
        summary,
    })
}

fn create_output(path: &Path, overwrite: bool) -> Result<BufWriter<File>> {
    if path.exists() && !overwrite {
        return Err(OutputError::Exists(path.to_path_buf()).into());
    }
    let file = File::create(path).with_context(|| format!("Failed to create {:?}", path))?;
    Ok(BufWriter::new(file))
}
