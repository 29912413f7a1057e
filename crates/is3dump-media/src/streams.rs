//! Synthesised per-stream metadata documents.
//!
//! Channels recorded without side-files can still be dumped once these
//! documents are generated from the first chunk.

use crate::channel::Channel;
use crate::index::IndexRecord;
use crate::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use is3dump_common::paths::metadata_file_name;
use is3dump_common::{Encoding, StreamType};
use serde_json::{json, Value};
use tracing::debug;

/// Block types carrying H.264 parameter sets.
const BLOCK_TYPE_SPS: u8 = 7;
const BLOCK_TYPE_PPS: u8 = 8;

const AAC_FMTP: &str = "97 streamType=0;profile-level-id=1;config=118856e500;mode=AAC-hbr;\
                        SizeLength=13;IndexLength=3;IndexDeltaLength=3";

/// H.264 parameters collected from SPS and PPS blocks.
#[derive(Debug, Clone, Default)]
pub struct AvcStreamInfo {
    stream_id: Option<u64>,
    sps: Option<Vec<u8>>,
    pps: Option<Vec<u8>>,
}

impl AvcStreamInfo {
    /// Take the first SPS and PPS blocks.
    pub fn on_block(&mut self, record: &IndexRecord, payload: &[u8]) {
        let slot = match record.block_type {
            BLOCK_TYPE_SPS => &mut self.sps,
            BLOCK_TYPE_PPS => &mut self.pps,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(payload.to_vec());
            self.stream_id.get_or_insert(record.stream_id);
        }
    }

    pub fn is_ready(&self) -> bool {
        self.sps.is_some() && self.pps.is_some()
    }

    /// Uppercase hex of SPS bytes 1..4 (profile, constraints, level).
    pub fn profile_level_id(&self) -> Option<String> {
        let sps = self.sps.as_deref()?;
        let end = sps.len().min(4);
        Some(hex::encode_upper(&sps[end.min(1)..end]))
    }

    /// `base64(SPS),base64(PPS)`.
    pub fn sprop_parameter_sets(&self) -> Option<String> {
        let sps = self.sps.as_deref()?;
        let pps = self.pps.as_deref()?;
        Some(format!("{},{}", STANDARD.encode(sps), STANDARD.encode(pps)))
    }

    /// The metadata document, once both parameter sets are known.
    pub fn document(&self) -> Option<StreamDocument> {
        let sprop = self.sprop_parameter_sets()?;
        let value = json!({
            "clock-rate": 90000,
            "current-sprop-string": sprop,
            "fixed-frame-rate": false,
            "fps": 0.0,
            "height": 0,
            "profile-level-id": self.profile_level_id()?,
            "sprop-string-list": [sprop],
            "stream_traits": stream_traits(Encoding::H264),
            "width": 0
        });
        Some(StreamDocument {
            stream_id: self.stream_id.unwrap_or_default(),
            stream_type: StreamType::Video.raw(),
            value,
        })
    }
}

/// AAC stream marker; the document is a fixed template.
#[derive(Debug, Clone, Default)]
pub struct AacStreamInfo {
    stream_id: Option<u64>,
}

impl AacStreamInfo {
    pub fn on_block(&mut self, record: &IndexRecord) {
        self.stream_id.get_or_insert(record.stream_id);
    }

    pub fn is_ready(&self) -> bool {
        self.stream_id.is_some()
    }

    pub fn document(&self) -> Option<StreamDocument> {
        let stream_id = self.stream_id?;
        let value = json!({
            "channel-config": 2,
            "clock-rate": 16000,
            "fmtp": AAC_FMTP,
            "freq": 16000,
            "sample-frequency-index": 8,
            "stream_traits": stream_traits(Encoding::Aac),
            "stream_type": StreamType::Audio.raw()
        });
        Some(StreamDocument {
            stream_id,
            stream_type: StreamType::Audio.raw(),
            value,
        })
    }
}

fn stream_traits(encoding: Encoding) -> Value {
    json!({"encoding": encoding.as_str(), "mediaType": encoding.media_type()})
}

/// A metadata document ready to be written next to the chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamDocument {
    pub stream_id: u64,
    pub stream_type: u8,
    pub value: Value,
}

impl StreamDocument {
    /// `stream.<id>.<type>.json`
    pub fn file_name(&self) -> String {
        metadata_file_name(self.stream_id, self.stream_type)
    }

    /// Compact JSON in key order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.value)?)
    }
}

/// Scan the first chunk of `channel` for stream parameters.
///
/// Stops as soon as both the H.264 and the AAC document are known.
/// Returns the documents found, video first.
pub fn scan_first_chunk(channel: &Channel) -> Result<Vec<StreamDocument>> {
    let mut avc = AvcStreamInfo::default();
    let mut aac = AacStreamInfo::default();

    if let Some(chunk) = channel.chunks().first() {
        debug!("Scanning {:?} for stream parameters", chunk.index_path);
        let mut data = chunk.open_data()?;

        for record in chunk.open_index(None)? {
            let record = record?;
            match record.stream_kind() {
                StreamType::Video if !avc.is_ready() => {
                    if matches!(record.block_type, BLOCK_TYPE_SPS | BLOCK_TYPE_PPS)
                        && data.holds(&record)
                    {
                        let payload = data.frame(&record)?;
                        avc.on_block(&record, &payload);
                    }
                }
                StreamType::Audio if !aac.is_ready() => aac.on_block(&record),
                _ => {}
            }

            if avc.is_ready() && aac.is_ready() {
                break;
            }
        }
    }

    Ok(avc.document().into_iter().chain(aac.document()).collect())
}
