//! Stream selection across the chunks of a channel.

use crate::channel::Channel;
use crate::index::IndexRecord;
use crate::Result;
use is3dump_common::TimeRange;
use tracing::{debug, warn};

/// Which records of a channel a dump takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamFilter {
    pub stream_id: u64,
    pub range: TimeRange,
}

impl StreamFilter {
    pub fn new(stream_id: u64) -> Self {
        Self {
            stream_id,
            range: TimeRange::unbounded(),
        }
    }

    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.range = range;
        self
    }
}

/// Counters collected while demuxing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemuxStats {
    pub chunks: usize,
    /// Records decoded from the index files, all streams.
    pub records_read: u64,
    /// Records whose payload was handed on.
    pub forwarded: u64,
    /// Records of the stream pointing past the flushed data.
    pub unflushed: u64,
    /// Records of the stream stamped before the range.
    pub early: u64,
}

/// Walks chunks in order and extracts the payloads of one stream.
pub struct Demuxer<'a> {
    channel: &'a Channel,
    filter: StreamFilter,
}

impl<'a> Demuxer<'a> {
    pub fn new(channel: &'a Channel, filter: StreamFilter) -> Self {
        Self { channel, filter }
    }

    pub fn filter(&self) -> &StreamFilter {
        &self.filter
    }

    /// Feed every selected record and its payload to `on_frame`, in chunk
    /// order and then on-disk order.
    ///
    /// Records past the end of the range stop the current chunk; records
    /// before its beginning are skipped. Any error aborts the run.
    pub fn run<F>(&self, mut on_frame: F) -> Result<DemuxStats>
    where
        F: FnMut(&IndexRecord, &[u8]) -> Result<()>,
    {
        let mut stats = DemuxStats::default();
        let mut payload = Vec::new();

        for chunk in self.channel.chunks() {
            debug!("Reading chunk {:?}", chunk.index_path);
            let mut data = chunk.open_data()?;
            let index = chunk.open_index(self.filter.range.end)?;
            stats.chunks += 1;

            for record in index {
                let record = record?;
                stats.records_read += 1;

                if record.stream_id != self.filter.stream_id {
                    continue;
                }
                if !data.holds(&record) {
                    warn!(
                        "Skipping record {} in {:?}: offset {} beyond data size {}",
                        record.index,
                        chunk.data_path,
                        record.offset,
                        data.size()
                    );
                    stats.unflushed += 1;
                    continue;
                }
                if !self.filter.range.admits(record.timestamp) {
                    stats.early += 1;
                    continue;
                }

                data.read_frame_into(&record, &mut payload)?;
                on_frame(&record, &payload)?;
                stats.forwarded += 1;
            }
        }

        debug!(
            "Demuxed stream {}: {} of {} records from {} chunks",
            self.filter.stream_id, stats.forwarded, stats.records_read, stats.chunks
        );
        Ok(stats)
    }
}
