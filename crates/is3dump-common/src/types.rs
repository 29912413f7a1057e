//! Core type definitions for encodings, stream types, and dump ranges.
//!
//! Encodings are serialized in lowercase, matching the `encoding` values
//! found in channel metadata documents.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Elementary stream encoding a channel can be dumped as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// AAC audio, written as ADTS frames.
    Aac,
    /// H.264 video, written as an Annex-B byte stream.
    H264,
}

impl Encoding {
    /// Name as it appears in metadata and default output file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aac => "aac",
            Self::H264 => "h264",
        }
    }

    /// Media type reported in generated stream traits.
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::Aac => "audio",
            Self::H264 => "video",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "aac" => Ok(Self::Aac),
            "h264" => Ok(Self::H264),
            _ => Err(Error::unknown_encoding(s)),
        }
    }
}

/// `stream_type` byte of an index record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamType {
    /// H.264 video.
    Video,
    /// AAC audio.
    Audio,
    /// Anything else the recorder writes.
    Other(u8),
}

impl StreamType {
    pub const VIDEO: u8 = 1;
    pub const AUDIO: u8 = 3;

    pub fn from_raw(raw: u8) -> Self {
        match raw {
            Self::VIDEO => Self::Video,
            Self::AUDIO => Self::Audio,
            other => Self::Other(other),
        }
    }

    pub fn raw(&self) -> u8 {
        match self {
            Self::Video => Self::VIDEO,
            Self::Audio => Self::AUDIO,
            Self::Other(raw) => *raw,
        }
    }
}

/// Timestamp window of a dump.
///
/// `begin` is inclusive and 0 admits everything. `end` is inclusive; `None`
/// means unbounded. Records past `end` stop a chunk's iteration, records
/// before `begin` are only skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub begin: u64,
    pub end: Option<u64>,
}

impl TimeRange {
    /// Range that admits every record.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Build a range from raw bounds, treating 0 as "no bound".
    pub fn new(begin: u64, end: u64) -> Self {
        Self {
            begin,
            end: (end != 0).then_some(end),
        }
    }

    /// Whether a record at `timestamp` is at or after `begin`.
    pub fn admits(&self, timestamp: u64) -> bool {
        timestamp >= self.begin
    }

    /// Whether `timestamp` lies beyond the upper bound.
    pub fn is_past_end(&self, timestamp: u64) -> bool {
        self.end.is_some_and(|end| timestamp > end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.begin == 0 && self.end.is_none()
    }
}

impl std::str::FromStr for TimeRange {
    type Err = Error;

    /// Parse `BEGIN,END`; either side may be empty.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(',');
        let begin = parse_bound(parts.next().unwrap_or(""))?;
        let end = parse_bound(parts.next().unwrap_or(""))?;
        if parts.next().is_some() {
            return Err(Error::invalid_input(format!(
                "range takes at most two values: {s}"
            )));
        }

        let range = Self::new(begin, end);
        if let Some(end) = range.end {
            if end < range.begin {
                return Err(Error::invalid_input(format!(
                    "range end {end} is before begin {begin}"
                )));
            }
        }
        Ok(range)
    }
}

fn parse_bound(raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse()
        .map_err(|_| Error::invalid_input(format!("invalid timestamp: {raw}")))
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{},{}", self.begin, end),
            None => write!(f, "{},", self.begin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_parse() {
        assert_eq!("aac".parse::<Encoding>().unwrap(), Encoding::Aac);
        assert_eq!("h264".parse::<Encoding>().unwrap(), Encoding::H264);
        assert!(matches!(
            "H264".parse::<Encoding>(),
            Err(Error::UnknownEncoding(_))
        ));
        assert!("".parse::<Encoding>().is_err());
    }

    #[test]
    fn test_encoding_serialization() {
        let json = serde_json::to_string(&Encoding::H264).unwrap();
        assert_eq!(json, r#""h264""#);

        let enc: Encoding = serde_json::from_str(r#""aac""#).unwrap();
        assert_eq!(enc, Encoding::Aac);
        assert_eq!(enc.to_string(), "aac");
        assert_eq!(enc.media_type(), "audio");
    }

    #[test]
    fn test_stream_type_raw() {
        assert_eq!(StreamType::from_raw(1), StreamType::Video);
        assert_eq!(StreamType::from_raw(3), StreamType::Audio);
        assert_eq!(StreamType::from_raw(9), StreamType::Other(9));
        assert_eq!(StreamType::Other(9).raw(), 9);
        assert_eq!(StreamType::Audio.raw(), 3);
    }

    #[test]
    fn test_time_range_parse() {
        let range: TimeRange = "100,500".parse().unwrap();
        assert_eq!(range.begin, 100);
        assert_eq!(range.end, Some(500));

        let range: TimeRange = "100,".parse().unwrap();
        assert_eq!(range.end, None);

        let range: TimeRange = ",500".parse().unwrap();
        assert_eq!(range.begin, 0);
        assert_eq!(range.end, Some(500));

        let range: TimeRange = "".parse().unwrap();
        assert!(range.is_unbounded());

        // A zero end is unbounded, as on the command line
        let range: TimeRange = "10,0".parse().unwrap();
        assert_eq!(range.end, None);
    }

    #[test]
    fn test_time_range_parse_errors() {
        assert!("a,5".parse::<TimeRange>().is_err());
        assert!("1,2,3".parse::<TimeRange>().is_err());
        assert!("500,100".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_time_range_bounds() {
        let range = TimeRange::new(100, 500);
        assert!(!range.admits(50));
        assert!(range.admits(100));
        assert!(!range.is_past_end(500));
        assert!(range.is_past_end(501));

        let open = TimeRange::unbounded();
        assert!(open.admits(0));
        assert!(!open.is_past_end(u64::MAX));
    }

    #[test]
    fn test_time_range_display() {
        assert_eq!(TimeRange::new(1, 2).to_string(), "1,2");
        assert_eq!(TimeRange::new(7, 0).to_string(), "7,");
    }
}
