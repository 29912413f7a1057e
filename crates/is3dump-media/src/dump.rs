//! Dump sessions: optional ID3 tag, then the framed stream.

use crate::channel::Channel;
use crate::demux::{Demuxer, StreamFilter};
use crate::framing::{FrameOutcome, Framer};
use crate::id3::{Tag, DEFAULT_PUBLISHER};
use crate::index::IndexRecord;
use crate::{Error, Result};
use is3dump_common::Encoding;
use std::io::Write;
use tracing::debug;

/// Totals of one dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub chunks: usize,
    pub records_read: u64,
    pub frames_written: u64,
    pub frames_dropped: u64,
    /// Media bytes including framing, without the tag.
    pub bytes_written: u64,
    pub tag_bytes: u64,
}

/// Extracts one stream of a channel into a single output.
///
/// Built only once the channel has metadata naming a known encoding, so a
/// dumper that exists can always write.
pub struct Dumper {
    channel: Channel,
    filter: StreamFilter,
    framer: Framer,
    tag: Option<Tag>,
}

impl std::fmt::Debug for Dumper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dumper")
            .field("channel", &self.channel.id())
            .field("filter", &self.filter)
            .field("encoding", &self.encoding())
            .field("tag", &self.tag.is_some())
            .finish()
    }
}

impl Dumper {
    /// Create a dumper for the stream selected by `filter`.
    ///
    /// The channel must have been discovered with the metadata of that
    /// stream. The default tag names the `IStream` publisher and the
    /// channel id.
    pub fn new(channel: Channel, filter: StreamFilter) -> Result<Self> {
        let metadata = channel.metadata().ok_or(Error::MissingMetadata {
            stream_id: filter.stream_id,
        })?;
        let encoding = metadata.encoding()?;
        let framer = Framer::for_encoding(encoding, metadata)?;
        let tag = Tag::for_channel(DEFAULT_PUBLISHER, channel.id());

        debug!(
            "Dumping stream {} of {} as {}",
            filter.stream_id,
            channel.id(),
            encoding
        );

        Ok(Self {
            channel,
            filter,
            framer,
            tag: Some(tag),
        })
    }

    /// Replace the tag written before the stream; `None` writes no tag.
    pub fn with_tag(mut self, tag: Option<Tag>) -> Self {
        self.tag = tag;
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.framer.encoding()
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    /// Write the tag and the framed stream to `out`.
    pub fn write<W: Write>(self, out: &mut W) -> Result<DumpSummary> {
        self.write_with(out, |_| {})
    }

    /// Like [`Dumper::write`], calling `on_record` for every record handed
    /// to the framer.
    pub fn write_with<W, F>(mut self, out: &mut W, mut on_record: F) -> Result<DumpSummary>
    where
        W: Write,
        F: FnMut(&IndexRecord),
    {
        let mut summary = DumpSummary::default();

        if let Some(tag) = &self.tag {
            let bytes = tag.encode();
            out.write_all(&bytes)?;
            summary.tag_bytes = bytes.len() as u64;
        }

        let framer = &mut self.framer;
        let stats = Demuxer::new(&self.channel, self.filter).run(|record, payload| {
            on_record(record);
            match framer.write_frame(out, record, payload)? {
                FrameOutcome::Written(n) => {
                    summary.frames_written += 1;
                    summary.bytes_written += n as u64;
                }
                FrameOutcome::Dropped => summary.frames_dropped += 1,
            }
            Ok(())
        })?;
        out.flush()?;

        summary.chunks = stats.chunks;
        summary.records_read = stats.records_read;
        Ok(summary)
    }
}
