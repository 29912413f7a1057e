//! Annex-B byte stream output for H.264.

use crate::Result;
use std::io::Write;
use tracing::warn;

/// Start code written before every NAL unit.
pub const START_CODE: [u8; 4] = [0x00, 0x00, 0x00, 0x01];

/// H.264 NAL unit types referenced by the framer.
pub mod nal_unit_type {
    pub const NON_IDR_SLICE: u8 = 1;
    pub const IDR_SLICE: u8 = 5;
    pub const SEI: u8 = 6;
    pub const SPS: u8 = 7;
    pub const PPS: u8 = 8;
    pub const AUD: u8 = 9;
}

/// NAL unit type of a payload (low 5 bits of the first byte).
pub fn nal_type(payload: &[u8]) -> Option<u8> {
    payload.first().map(|b| b & 0x1F)
}

/// Writes NAL units with start codes, holding back coded slices until both
/// parameter sets have gone out.
///
/// The gating state lives for the whole session and is never reset.
#[derive(Debug, Clone, Default)]
pub struct AnnexBFramer {
    sps_seen: bool,
    pps_seen: bool,
}

impl AnnexBFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sps_seen(&self) -> bool {
        self.sps_seen
    }

    pub fn pps_seen(&self) -> bool {
        self.pps_seen
    }

    /// Both parameter sets have been observed.
    pub fn is_ready(&self) -> bool {
        self.sps_seen && self.pps_seen
    }

    /// Update gating for `payload` and report whether it is emitted.
    pub fn admit(&mut self, payload: &[u8]) -> bool {
        let Some(kind) = nal_type(payload) else {
            warn!("Dropping empty NAL unit");
            return false;
        };

        match kind {
            nal_unit_type::SPS => self.sps_seen = true,
            nal_unit_type::PPS => self.pps_seen = true,
            _ => {}
        }

        kind > nal_unit_type::IDR_SLICE || self.is_ready()
    }

    /// Write `payload` if admitted. Returns the bytes written, `None` when
    /// the unit was dropped.
    pub fn write_frame<W: Write>(&mut self, out: &mut W, payload: &[u8]) -> Result<Option<usize>> {
        if !self.admit(payload) {
            return Ok(None);
        }
        out.write_all(&START_CODE)?;
        out.write_all(payload)?;
        Ok(Some(START_CODE.len() + payload.len()))
    }
}
