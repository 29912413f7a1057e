//! Builders for on-disk channels used by unit tests.

use crate::index::IndexRecord;
use std::fs;
use std::path::Path;

/// Accumulates one chunk: payloads go to the data file, records to the
/// index, with offsets pointing at the end of each payload.
#[derive(Default)]
pub struct ChunkWriter {
    data: Vec<u8>,
    index: Vec<u8>,
    count: u64,
}

impl ChunkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame and return its record.
    pub fn frame(&mut self, stream_id: u64, timestamp: u64, payload: &[u8]) -> IndexRecord {
        let template = IndexRecord {
            stream_id,
            timestamp,
            ..IndexRecord::default()
        };
        self.block(template, payload)
    }

    /// Append a frame described by `template`, filling in its position.
    pub fn block(&mut self, template: IndexRecord, payload: &[u8]) -> IndexRecord {
        self.data.extend_from_slice(payload);
        let record = IndexRecord {
            block_size: payload.len() as u64,
            offset: self.data.len() as u64,
            index: self.count,
            block_id: self.count,
            ..template
        };
        self.push(record);
        record
    }

    /// Append a raw record without touching the data file.
    pub fn push(&mut self, record: IndexRecord) {
        self.index.extend_from_slice(&record.encode());
        self.count += 1;
    }

    /// Write `<stem>.data.idx` and `<stem>.data` into `dir`.
    pub fn write(&self, dir: &Path, stem: &str) {
        fs::write(dir.join(format!("{stem}.data.idx")), &self.index).unwrap();
        fs::write(dir.join(format!("{stem}.data")), &self.data).unwrap();
    }
}

pub fn write_metadata(dir: &Path, stream_id: u64, stream_type: u8, json: &str) {
    fs::write(dir.join(format!("stream.{stream_id}.{stream_type}.json")), json).unwrap();
}
