//! Codec framers turning extracted payloads into an elementary stream.

mod adts;
mod annexb;

pub use adts::{
    AdtsFramer, AdtsHeader, AudioConfig, MpegVersion, HEADER_SIZE as ADTS_HEADER_SIZE,
    MAX_FRAME_LENGTH,
};
pub use annexb::{nal_type, nal_unit_type, AnnexBFramer, START_CODE};

use crate::channel::ChannelMetadata;
use crate::index::IndexRecord;
use crate::Result;
use is3dump_common::Encoding;
use std::io::Write;
use tracing::trace;

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame written, with the number of bytes including framing.
    Written(usize),
    /// Frame held back by the framer.
    Dropped,
}

/// The active framer of a dump session.
#[derive(Debug, Clone)]
pub enum Framer {
    Aac(AdtsFramer),
    H264(AnnexBFramer),
}

impl Framer {
    /// Build the framer for `encoding`, reading codec parameters from
    /// metadata where needed.
    pub fn for_encoding(encoding: Encoding, metadata: &ChannelMetadata) -> Result<Self> {
        match encoding {
            Encoding::Aac => {
                let config = AudioConfig::from_fmtp(metadata.fmtp()?)?;
                Ok(Self::Aac(AdtsFramer::new(config)?))
            }
            Encoding::H264 => Ok(Self::H264(AnnexBFramer::new())),
        }
    }

    pub fn encoding(&self) -> Encoding {
        match self {
            Self::Aac(_) => Encoding::Aac,
            Self::H264(_) => Encoding::H264,
        }
    }

    /// Frame `payload` into `out`.
    pub fn write_frame<W: Write>(
        &mut self,
        out: &mut W,
        record: &IndexRecord,
        payload: &[u8],
    ) -> Result<FrameOutcome> {
        let outcome = match self {
            Self::Aac(framer) => FrameOutcome::Written(framer.write_frame(out, payload)?),
            Self::H264(framer) => match framer.write_frame(out, payload)? {
                Some(n) => FrameOutcome::Written(n),
                None => FrameOutcome::Dropped,
            },
        };

        trace!(
            "Frame index={} ts={} size={}: {:?}",
            record.index,
            record.timestamp,
            payload.len(),
            outcome
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_aac_from_metadata() {
        let meta = ChannelMetadata::from_value(json!({
            "encoding": "aac",
            "fmtp": "97 config=1188"
        }));
        let framer = Framer::for_encoding(meta.encoding().unwrap(), &meta).unwrap();
        assert_eq!(framer.encoding(), Encoding::Aac);
        match framer {
            Framer::Aac(adts) => assert_eq!(adts.config().sampling_frequency_index, 3),
            Framer::H264(_) => panic!("expected AAC framer"),
        }
    }

    #[test]
    fn test_aac_without_fmtp() {
        let meta = ChannelMetadata::from_value(json!({"encoding": "aac"}));
        assert!(matches!(
            Framer::for_encoding(Encoding::Aac, &meta),
            Err(crate::Error::MissingKey("fmtp"))
        ));
    }

    #[test]
    fn test_h264_outcomes() {
        let meta = ChannelMetadata::from_value(json!({"encoding": "h264"}));
        let mut framer = Framer::for_encoding(Encoding::H264, &meta).unwrap();
        let record = IndexRecord::default();
        let mut out = Vec::new();

        assert_eq!(
            framer.write_frame(&mut out, &record, &[0x65, 0x00]).unwrap(),
            FrameOutcome::Dropped
        );
        assert_eq!(
            framer.write_frame(&mut out, &record, &[0x67, 0x42, 0x00]).unwrap(),
            FrameOutcome::Written(7)
        );
        assert_eq!(out.len(), 7);
    }

    #[test]
    fn test_aac_outcome() {
        let mut framer = Framer::Aac(AdtsFramer::new(AudioConfig::from_raw(0x1188)).unwrap());
        let mut out = Vec::new();
        let outcome = framer
            .write_frame(&mut out, &IndexRecord::default(), &[0u8; 10])
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Written(17));
    }
}
