//! ID3v2 tag written at the start of dump files.
//!
//! Text frames are laid out as id, declared length, flags, one zero byte
//! and the UTF-8 text. The declared length counts the zero byte; the tag
//! size counts every frame as `11 + text length`.

use bytes::{BufMut, BytesMut};
use std::fmt;

/// Size of the tag header.
pub const HEADER_SIZE: usize = 10;

/// Bytes of a frame in front of its text.
pub const FRAME_OVERHEAD: usize = 11;

const MAGIC: &[u8; 3] = b"ID3";

/// Publisher written by default.
pub const DEFAULT_PUBLISHER: &str = "IStream";

/// Four-character frame identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub [u8; 4]);

impl FrameId {
    pub const TPUB: Self = Self(*b"TPUB");
    pub const TIT2: Self = Self(*b"TIT2");

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub id: FrameId,
    pub text: String,
    pub flags: u16,
}

impl Frame {
    pub fn new(id: FrameId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            flags: 0,
        }
    }

    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    /// Contribution of this frame to the tag size.
    pub fn size(&self) -> usize {
        FRAME_OVERHEAD + self.text.len()
    }

    fn write_to(&self, buf: &mut BytesMut) {
        buf.put_slice(&self.id.0);
        buf.put_u32(self.text.len() as u32 + 1);
        buf.put_u16(self.flags);
        buf.put_u8(0);
        buf.put_slice(self.text.as_bytes());
    }
}

/// An ID3v2 tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    version: u8,
    revision: u8,
    flags: u8,
    frames: Vec<Frame>,
}

impl Default for Tag {
    fn default() -> Self {
        Self {
            version: 3,
            revision: 0,
            flags: 0,
            frames: Vec::new(),
        }
    }
}

impl Tag {
    /// Create an empty ID3v2.3 tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// The tag prefixed to channel dumps: publisher and channel title.
    pub fn for_channel(publisher: &str, channel_id: &str) -> Self {
        let mut tag = Self::new();
        tag.add_frame(Frame::new(FrameId::TPUB, publisher));
        tag.add_frame(Frame::new(FrameId::TIT2, channel_id));
        tag
    }

    pub fn with_version(mut self, version: u8) -> Self {
        self.version = version;
        self
    }

    pub fn with_flags(mut self, flags: u8) -> Self {
        self.flags = flags;
        self
    }

    pub fn add_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Size stored in the header: the sum of all frame sizes.
    pub fn size(&self) -> usize {
        self.frames.iter().map(Frame::size).sum()
    }

    /// Serialize header and frames.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.size());

        buf.put_slice(MAGIC);
        buf.put_u8(self.version);
        buf.put_u8(self.revision);
        buf.put_u8(self.flags);
        buf.put_slice(&synchsafe::encode(self.size() as u32));

        for frame in &self.frames {
            frame.write_to(&mut buf);
        }

        buf.to_vec()
    }
}

/// Parsed tag header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagHeader {
    pub version: u8,
    pub revision: u8,
    pub flags: u8,
    pub size: u32,
}

impl TagHeader {
    /// Parse the header at the start of `data`; `None` without the `ID3`
    /// magic.
    pub fn parse(data: &[u8]) -> Option<Self> {
        let header = data.get(..HEADER_SIZE)?;
        if &header[..3] != MAGIC {
            return None;
        }
        Some(Self {
            version: header[3],
            revision: header[4],
            flags: header[5],
            size: synchsafe::decode(header[6..10].try_into().ok()?),
        })
    }
}

/// 28-bit integers stored 7 bits per byte.
pub mod synchsafe {
    /// Encode the low 28 bits of `value`.
    pub fn encode(value: u32) -> [u8; 4] {
        [
            ((value >> 21) & 0x7F) as u8,
            ((value >> 14) & 0x7F) as u8,
            ((value >> 7) & 0x7F) as u8,
            (value & 0x7F) as u8,
        ]
    }

    pub fn decode(bytes: [u8; 4]) -> u32 {
        bytes
            .iter()
            .fold(0, |acc, &b| (acc << 7) | (b & 0x7F) as u32)
    }
}
