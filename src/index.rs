//! Index command: print the records of a channel.

use anyhow::{Context, Result};
use is3dump_media::Channel;
use std::io::Write;
use std::path::Path;

/// Write every record of every chunk to `out`, one `describe()` line each,
/// preceded by the chunk's index path.
///
/// With `stream_id` only that stream's records are listed. Returns the
/// number of records written.
pub fn list_records<W: Write>(
    channel: &Path,
    stream_id: Option<u64>,
    recursive: bool,
    out: &mut W,
) -> Result<u64> {
    let channel = Channel::builder(channel)
        .recursive(recursive)
        .open()
        .with_context(|| format!("Failed to open channel {:?}", channel))?;

    let mut total = 0;
    for chunk in channel.chunks() {
        writeln!(out, "{}", chunk.index_path.display())?;

        let mut reader = chunk.open_index(None)?;
        if let Some(id) = stream_id {
            reader = reader.only_stream(id);
        }
        for record in reader {
            writeln!(out, "  {}", record?.describe())?;
            total += 1;
        }
    }

    Ok(total)
}
