//! ADTS framing for raw AAC access units.
//!
//! Every payload gets the 7-byte fixed+variable ADTS header (no CRC) in
//! front of it, built from the stream's AudioSpecificConfig.

use crate::channel::config_hex;
use crate::{Error, Result};
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::Write;

/// Size of an ADTS header without CRC.
pub const HEADER_SIZE: usize = 7;

/// Largest value of the 13-bit frame length field.
pub const MAX_FRAME_LENGTH: usize = 0x1FFF;

const SYNC_WORD: u16 = 0xFFF;
const BUFFER_FULLNESS_VBR: u16 = 0x7FF;

/// Sampling frequencies by index; 13..=15 are reserved or explicit.
const SAMPLING_FREQUENCIES: [u32; 13] = [
    96000, 88200, 64000, 48000, 44100, 32000, 24000, 22050, 16000, 12000, 11025, 8000, 7350,
];

/// AAC audio configuration as carried by the `config=` fmtp parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioConfig {
    /// Audio object type (1 = Main, 2 = LC, 3 = SSR, 4 = LTP).
    pub profile: u8,
    pub sampling_frequency_index: u8,
    pub channel_config: u8,
}

impl AudioConfig {
    /// Unpack the leading 16 bits of an AudioSpecificConfig.
    pub fn from_raw(config: u16) -> Self {
        Self {
            profile: ((config >> 11) & 0x1F) as u8,
            sampling_frequency_index: ((config >> 7) & 0xF) as u8,
            channel_config: ((config >> 3) & 0xF) as u8,
        }
    }

    /// Parse four hex digits, e.g. `"1188"`.
    pub fn from_hex(digits: &str) -> Result<Self> {
        let mut raw = [0u8; 2];
        hex::decode_to_slice(digits, &mut raw)
            .map_err(|e| Error::invalid_metadata(format!("bad audio config {digits:?}: {e}")))?;
        Ok(Self::from_raw(u16::from_be_bytes(raw)))
    }

    /// Take the config from an SDP fmtp string.
    pub fn from_fmtp(fmtp: &str) -> Result<Self> {
        Self::from_hex(config_hex(fmtp)?)
    }

    /// Sampling rate in Hz, `None` for reserved indices.
    pub fn sampling_frequency(&self) -> Option<u32> {
        SAMPLING_FREQUENCIES
            .get(self.sampling_frequency_index as usize)
            .copied()
    }

    /// Number of output channels, `None` when defined in-band (0) or
    /// reserved.
    pub fn channels(&self) -> Option<u8> {
        match self.channel_config {
            1..=6 => Some(self.channel_config),
            7 => Some(8),
            _ => None,
        }
    }

    /// Check that the config fits the ADTS header fields.
    pub fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.profile) {
            return Err(Error::invalid_config(format!(
                "audio object type {} has no ADTS profile",
                self.profile
            )));
        }
        if self.channel_config > 7 {
            return Err(Error::invalid_config(format!(
                "channel config {} exceeds 3 bits",
                self.channel_config
            )));
        }
        Ok(())
    }
}

/// Value of the ADTS ID bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MpegVersion {
    #[default]
    Mpeg4 = 0,
    Mpeg2 = 1,
}

/// One ADTS header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdtsHeader {
    pub mpeg_version: MpegVersion,
    pub protection_absent: bool,
    /// Audio object type; the header stores `profile - 1`.
    pub profile: u8,
    pub sampling_frequency_index: u8,
    pub channel_config: u8,
    /// Header plus payload length.
    pub frame_length: u16,
    pub buffer_fullness: u16,
    /// Raw data blocks in the frame, minus one.
    pub raw_data_blocks: u8,
}

impl AdtsHeader {
    /// Header for a payload of `payload_len` bytes.
    pub fn new(config: &AudioConfig, payload_len: usize) -> Result<Self> {
        let frame_length = payload_len + HEADER_SIZE;
        if frame_length > MAX_FRAME_LENGTH {
            return Err(Error::FrameTooLarge {
                size: frame_length,
                max: MAX_FRAME_LENGTH,
            });
        }

        Ok(Self {
            mpeg_version: MpegVersion::default(),
            protection_absent: true,
            profile: config.profile,
            sampling_frequency_index: config.sampling_frequency_index,
            channel_config: config.channel_config,
            frame_length: frame_length as u16,
            buffer_fullness: BUFFER_FULLNESS_VBR,
            raw_data_blocks: 0,
        })
    }

    /// Serialize the header.
    pub fn encode(&self) -> Result<[u8; HEADER_SIZE]> {
        let mut out = [0u8; HEADER_SIZE];
        {
            let mut writer = BitWriter::endian(&mut out[..], BigEndian);

            // fixed header
            writer.write(12, SYNC_WORD)?;
            writer.write_bit(self.mpeg_version == MpegVersion::Mpeg2)?;
            writer.write(2, 0u8)?; // layer
            writer.write_bit(self.protection_absent)?;
            writer.write(2, self.profile.wrapping_sub(1) & 0x3)?;
            writer.write(4, self.sampling_frequency_index & 0xF)?;
            writer.write_bit(false)?; // private
            writer.write(3, self.channel_config & 0x7)?;
            writer.write(2, 0u8)?; // original/copy, home

            // variable header
            writer.write(2, 0u8)?; // copyright id bit, copyright id start
            writer.write(13, self.frame_length & 0x1FFF)?;
            writer.write(11, self.buffer_fullness & 0x7FF)?;
            writer.write(2, self.raw_data_blocks & 0x3)?;
        }
        Ok(out)
    }

    /// Parse a header from the start of `data`.
    ///
    /// Returns `None` if the data is too short or does not start with the
    /// sync word.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let mut reader = BitReader::endian(data.get(..HEADER_SIZE)?, BigEndian);

        if reader.read::<u16>(12).ok()? != SYNC_WORD {
            return None;
        }
        let mpeg_version = if reader.read_bit().ok()? {
            MpegVersion::Mpeg2
        } else {
            MpegVersion::Mpeg4
        };
        reader.skip(2).ok()?;
        let protection_absent = reader.read_bit().ok()?;
        let profile = reader.read::<u8>(2).ok()? + 1;
        let sampling_frequency_index = reader.read::<u8>(4).ok()?;
        reader.skip(1).ok()?;
        let channel_config = reader.read::<u8>(3).ok()?;
        reader.skip(4).ok()?;
        let frame_length = reader.read::<u16>(13).ok()?;
        let buffer_fullness = reader.read::<u16>(11).ok()?;
        let raw_data_blocks = reader.read::<u8>(2).ok()?;

        Some(Self {
            mpeg_version,
            protection_absent,
            profile,
            sampling_frequency_index,
            channel_config,
            frame_length,
            buffer_fullness,
            raw_data_blocks,
        })
    }
}

/// Writes ADTS-framed AAC.
#[derive(Debug, Clone)]
pub struct AdtsFramer {
    config: AudioConfig,
}

impl AdtsFramer {
    /// Create a framer; the config must be expressible in ADTS.
    pub fn new(config: AudioConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AudioConfig {
        &self.config
    }

    /// Write header and payload, returning the bytes written.
    pub fn write_frame<W: Write>(&self, out: &mut W, payload: &[u8]) -> Result<usize> {
        let header = AdtsHeader::new(&self.config, payload.len())?.encode()?;
        out.write_all(&header)?;
        out.write_all(payload)?;
        Ok(HEADER_SIZE + payload.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_1188() {
        let config = AudioConfig::from_hex("1188").unwrap();
        assert_eq!(config.profile, 2);
        assert_eq!(config.sampling_frequency_index, 3);
        assert_eq!(config.channel_config, 1);
        assert_eq!(config.sampling_frequency(), Some(48000));
        assert_eq!(config.channels(), Some(1));
    }

    #[test]
    fn test_config_from_fmtp() {
        let config = AudioConfig::from_fmtp(
            "97 streamType=0;profile-level-id=1;config=1210;mode=AAC-hbr",
        )
        .unwrap();
        assert_eq!(config.profile, 2);
        assert_eq!(config.sampling_frequency_index, 4);
        assert_eq!(config.channel_config, 2);
        assert_eq!(config.sampling_frequency(), Some(44100));
    }

    #[test]
    fn test_header_bytes() {
        let config = AudioConfig::from_raw(0x1188);
        let header = AdtsHeader::new(&config, 100).unwrap();
        assert_eq!(header.frame_length, 107);
        assert_eq!(
            header.encode().unwrap(),
            [0xFF, 0xF1, 0x4C, 0x40, 0x0D, 0x7F, 0xFC]
        );
    }

    #[test]
    fn test_header_parse_back() {
        let config = AudioConfig::from_raw(0x1188);
        let bytes = AdtsHeader::new(&config, 100).unwrap().encode().unwrap();
        let parsed = AdtsHeader::parse(&bytes).unwrap();
        assert_eq!(parsed.frame_length, 107);
        assert_eq!(parsed.profile, 2);
        assert_eq!(parsed.sampling_frequency_index, 3);
        assert_eq!(parsed.channel_config, 1);
        assert!(parsed.protection_absent);
        assert_eq!(parsed.mpeg_version, MpegVersion::Mpeg4);
        assert_eq!(parsed.buffer_fullness, 0x7FF);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(AdtsHeader::parse(&[0x00; 7]).is_none());
        assert!(AdtsHeader::parse(&[0xFF, 0xF1]).is_none());
    }

    #[test]
    fn test_mpeg2_and_crc_bits() {
        let config = AudioConfig::from_raw(0x1188);
        let mut header = AdtsHeader::new(&config, 0).unwrap();
        header.mpeg_version = MpegVersion::Mpeg2;
        header.protection_absent = false;
        let bytes = header.encode().unwrap();
        assert_eq!(bytes[1], 0xF8);
    }

    #[test]
    fn test_frame_too_large() {
        let config = AudioConfig::from_raw(0x1188);
        assert!(AdtsHeader::new(&config, MAX_FRAME_LENGTH - HEADER_SIZE).is_ok());
        let err = AdtsHeader::new(&config, MAX_FRAME_LENGTH - HEADER_SIZE + 1).unwrap_err();
        assert!(matches!(err, Error::FrameTooLarge { size: 8192, max: 8191 }));
    }

    #[test]
    fn test_invalid_profile() {
        // audio object type 5 (SBR)
        let config = AudioConfig::from_raw(5 << 11 | 3 << 7 | 2 << 3);
        assert!(matches!(
            AdtsFramer::new(config),
            Err(Error::InvalidConfig(_))
        ));
        assert!(AdtsFramer::new(AudioConfig::from_raw(0)).is_err());
    }

    #[test]
    fn test_invalid_channel_config() {
        let config = AudioConfig::from_raw(2 << 11 | 3 << 7 | 9 << 3);
        assert!(matches!(
            AdtsFramer::new(config),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bad_hex() {
        assert!(matches!(
            AudioConfig::from_hex("11g8"),
            Err(Error::InvalidMetadata(_))
        ));
    }

    #[test]
    fn test_write_frame() {
        let framer = AdtsFramer::new(AudioConfig::from_raw(0x1188)).unwrap();
        let mut out = Vec::new();
        let written = framer.write_frame(&mut out, &[0xAB; 100]).unwrap();
        assert_eq!(written, 107);
        assert_eq!(out.len(), 107);
        assert_eq!(&out[..2], &[0xFF, 0xF1]);
        assert!(out[7..].iter().all(|&b| b == 0xAB));
    }
}
