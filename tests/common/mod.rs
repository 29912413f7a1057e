//! Shared fixtures for integration tests.
//!
//! Provides [`ChannelFixture`], which lays out a synthetic IStream3 channel
//! (chunk index/data pairs plus stream metadata) in a temporary directory.

#![allow(dead_code)]

use is3dump_media::IndexRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const AAC_METADATA: &str = r#"{
    "channel-config": 1,
    "clock-rate": 48000,
    "sdp": {"fmtp": "97 streamType=0;profile-level-id=1;config=1188;mode=AAC-hbr"},
    "stream_traits": {"encoding": "aac", "mediaType": "audio"}
}"#;

pub const H264_METADATA: &str = r#"{
    "clock-rate": 90000,
    "stream_traits": {"encoding": "h264", "mediaType": "video"}
}"#;

/// One chunk being assembled: payloads are appended to the data file and
/// every record's offset points at the end of its payload.
#[derive(Default)]
pub struct ChunkBuilder {
    data: Vec<u8>,
    index: Vec<u8>,
    count: u64,
}

impl ChunkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame of `stream_id` stamped `timestamp`.
    pub fn frame(self, stream_id: u64, timestamp: u64, payload: &[u8]) -> Self {
        let template = IndexRecord {
            stream_id,
            timestamp,
            ..IndexRecord::default()
        };
        self.block(template, payload)
    }

    /// Append a frame described by `template`; its position is filled in.
    pub fn block(mut self, template: IndexRecord, payload: &[u8]) -> Self {
        self.data.extend_from_slice(payload);
        let record = IndexRecord {
            block_size: payload.len() as u64,
            offset: self.data.len() as u64,
            index: self.count,
            block_id: self.count,
            ..template
        };
        self.record(record)
    }

    /// Append a record as is, without payload.
    pub fn record(mut self, record: IndexRecord) -> Self {
        self.index.extend_from_slice(&record.encode());
        self.count += 1;
        self
    }

    /// Append bytes that do not form a valid record.
    pub fn garbage(mut self, bytes: &[u8]) -> Self {
        self.index.extend_from_slice(bytes);
        self
    }
}

/// A channel directory in a temporary location.
pub struct ChannelFixture {
    root: TempDir,
    dir: PathBuf,
}

impl ChannelFixture {
    /// Create an empty channel named `channel_id`.
    pub fn new(channel_id: &str) -> Self {
        let root = tempfile::tempdir().expect("failed to create temp dir");
        let dir = root.path().join(channel_id);
        fs::create_dir(&dir).expect("failed to create channel dir");
        Self { root, dir }
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Scratch directory next to the channel.
    pub fn scratch(&self) -> &Path {
        self.root.path()
    }

    pub fn metadata(self, stream_id: u64, stream_type: u8, json: &str) -> Self {
        let name = format!("stream.{stream_id}.{stream_type}.json");
        fs::write(self.dir.join(name), json).expect("failed to write metadata");
        self
    }

    pub fn chunk(self, stem: &str, chunk: ChunkBuilder) -> Self {
        fs::write(self.dir.join(format!("{stem}.data.idx")), &chunk.index)
            .expect("failed to write index");
        fs::write(self.dir.join(format!("{stem}.data")), &chunk.data)
            .expect("failed to write data");
        self
    }
}

/// AAC payload of `len` bytes filled with `fill`.
pub fn aac_frame(len: usize, fill: u8) -> Vec<u8> {
    vec![fill; len]
}

/// H.264 NAL unit of type `nal_type`.
pub fn nal(nal_type: u8, body: &[u8]) -> Vec<u8> {
    let mut unit = vec![0x60 | nal_type];
    unit.extend_from_slice(body);
    unit
}
