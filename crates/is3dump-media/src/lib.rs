//! is3dump-media: IStream3 channel reading and elementary stream framing
//!
//! This crate reads the chunked index/data recordings of an IStream3
//! channel and re-frames one stream as a standalone file.
//!
//! # Modules
//!
//! - `index` - 77-byte index records and the sequential index reader
//! - `data` - random access to frame payloads in a chunk's data file
//! - `channel` - chunk discovery and per-stream JSON metadata
//! - `demux` - stream and time-range selection across chunks
//! - `framing` - ADTS headers for AAC, Annex-B start codes for H.264
//! - `id3` - the ID3v2 tag prefixed to dumps
//! - `dump` - a complete dump session
//! - `streams` - metadata documents synthesised from the first chunk
//!
//! # Architecture
//!
//! A dump runs in one pass:
//!
//! 1. The channel directory is listed and its `*.data.idx` files sorted
//! 2. The stream's metadata names the encoding (and the AAC config)
//! 3. The ID3 tag is written
//! 4. Each chunk's index is read in order; selected records have their
//!    payload read from the data file and handed to the framer
//!
//! Index records point at the END of their payload, so a record is only
//! used when its offset lies within the data file as it was at open time.

pub mod channel;
pub mod data;
pub mod demux;
pub mod dump;
pub mod error;
pub mod framing;
pub mod id3;
pub mod index;
pub mod streams;

#[cfg(test)]
mod test_util;

pub use channel::{Channel, ChannelMetadata, Chunk};
pub use data::DataFile;
pub use demux::{DemuxStats, Demuxer, StreamFilter};
pub use dump::{DumpSummary, Dumper};
pub use error::{Error, Result};
pub use framing::{AdtsFramer, AnnexBFramer, AudioConfig, FrameOutcome, Framer};
pub use id3::Tag;
pub use index::{IndexReader, IndexRecord};
pub use streams::{scan_first_chunk, StreamDocument};
