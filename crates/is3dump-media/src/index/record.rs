//! Fixed-layout index record.

use bytes::{Buf, BufMut};
use is3dump_common::StreamType;
use std::fmt;
use std::ops::Range;

/// Size of one encoded index record.
pub const RECORD_SIZE: usize = 77;

/// Sentinel closing every valid record.
pub const RECORD_MARK: u16 = 0xBABE;

/// One index entry describing a frame in the paired data file.
///
/// Layout (packed, little-endian):
/// - `[0]`      entry_size
/// - `[1]`      block_type
/// - `[2]`      stream_type
/// - `[3..11]`  stream_id
/// - `[11..19]` flags
/// - `[19..27]` duration
/// - `[27..35]` timestamp
/// - `[35..39]` ts_rel
/// - `[39..43]` dts_rel
/// - `[43..51]` block_size
/// - `[51..59]` offset (end of the payload in the data file)
/// - `[59..67]` index
/// - `[67..75]` block_id
/// - `[75..77]` mark (`0xBABE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    pub entry_size: u8,
    pub block_type: u8,
    pub stream_type: u8,
    pub stream_id: u64,
    pub flags: u64,
    pub duration: u64,
    pub timestamp: u64,
    pub ts_rel: u32,
    pub dts_rel: u32,
    pub block_size: u64,
    pub offset: u64,
    pub index: u64,
    pub block_id: u64,
    pub mark: u16,
}

impl Default for IndexRecord {
    fn default() -> Self {
        Self {
            entry_size: RECORD_SIZE as u8,
            block_type: 0,
            stream_type: 0,
            stream_id: 0,
            flags: 0,
            duration: 0,
            timestamp: 0,
            ts_rel: 0,
            dts_rel: 0,
            block_size: 0,
            offset: 0,
            index: 0,
            block_id: 0,
            mark: RECORD_MARK,
        }
    }
}

impl IndexRecord {
    /// Decode a record.
    ///
    /// Returns `None` when the mark is not `0xBABE`; readers treat that
    /// exactly like end of file.
    pub fn decode(bytes: &[u8; RECORD_SIZE]) -> Option<Self> {
        let mut buf = &bytes[..];
        let record = Self {
            entry_size: buf.get_u8(),
            block_type: buf.get_u8(),
            stream_type: buf.get_u8(),
            stream_id: buf.get_u64_le(),
            flags: buf.get_u64_le(),
            duration: buf.get_u64_le(),
            timestamp: buf.get_u64_le(),
            ts_rel: buf.get_u32_le(),
            dts_rel: buf.get_u32_le(),
            block_size: buf.get_u64_le(),
            offset: buf.get_u64_le(),
            index: buf.get_u64_le(),
            block_id: buf.get_u64_le(),
            mark: buf.get_u16_le(),
        };
        record.is_valid().then_some(record)
    }

    /// Decode the first record of a byte slice, `None` if it is short or
    /// not marked.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let raw: &[u8; RECORD_SIZE] = bytes.get(..RECORD_SIZE)?.try_into().ok()?;
        Self::decode(raw)
    }

    /// Encode the record into its on-disk form.
    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut out = [0u8; RECORD_SIZE];
        let mut buf = &mut out[..];
        buf.put_u8(self.entry_size);
        buf.put_u8(self.block_type);
        buf.put_u8(self.stream_type);
        buf.put_u64_le(self.stream_id);
        buf.put_u64_le(self.flags);
        buf.put_u64_le(self.duration);
        buf.put_u64_le(self.timestamp);
        buf.put_u32_le(self.ts_rel);
        buf.put_u32_le(self.dts_rel);
        buf.put_u64_le(self.block_size);
        buf.put_u64_le(self.offset);
        buf.put_u64_le(self.index);
        buf.put_u64_le(self.block_id);
        buf.put_u16_le(self.mark);
        out
    }

    pub fn is_valid(&self) -> bool {
        self.mark == RECORD_MARK
    }

    /// Byte range of the payload in the data file.
    ///
    /// `offset` points at the end of the payload, so the range is
    /// `offset - block_size .. offset`. `None` if `block_size > offset`.
    pub fn data_range(&self) -> Option<Range<u64>> {
        let start = self.offset.checked_sub(self.block_size)?;
        Some(start..self.offset)
    }

    pub fn stream_kind(&self) -> StreamType {
        StreamType::from_raw(self.stream_type)
    }

    /// Long `key=value` description of every field.
    pub fn describe(&self) -> String {
        format!(
            "size={} index={} block id={} block type={} stream id={} stream type={} \
             duration={} flags={:#x} block size={} timestamp={} ts={} dts={} offset={} mark={:#x}",
            self.entry_size,
            self.index,
            self.block_id,
            self.block_type,
            self.stream_id,
            self.stream_type,
            self.duration,
            self.flags,
            self.block_size,
            self.timestamp,
            self.ts_rel,
            self.dts_rel,
            self.offset,
            self.mark,
        )
    }
}

/// Tab-separated diagnostic line printed for every dumped record.
impl fmt::Display for IndexRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.index,
            self.block_id,
            self.block_type,
            self.stream_id,
            self.stream_type,
            self.duration,
            self.flags,
            self.block_size,
            self.timestamp,
            self.ts_rel,
        )
    }
}
