//! Per-stream metadata documents.

use crate::{Error, Result};
use is3dump_common::Encoding;
use serde_json::Value;
use std::path::Path;

const ENCODING_KEY: &str = "encoding";
const FMTP_KEY: &str = "fmtp";
const CONFIG_PARAM: &str = "config=";

/// JSON metadata describing one stream of a channel.
///
/// Keys are searched depth-first in document order, so `fmtp` is found
/// whether it sits at the top level or inside a nested object.
#[derive(Debug, Clone)]
pub struct ChannelMetadata {
    document: Value,
}

impl ChannelMetadata {
    /// Load a metadata document from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a metadata document.
    pub fn parse(content: &str) -> Result<Self> {
        Ok(Self::from_value(serde_json::from_str(content)?))
    }

    pub fn from_value(document: Value) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// First value stored under `key` anywhere in the document.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        search(&self.document, key)
    }

    /// Encoding name, e.g. `"aac"`.
    pub fn encoding_name(&self) -> Result<&str> {
        self.lookup_str(ENCODING_KEY)
    }

    /// Encoding the stream is dumped as.
    pub fn encoding(&self) -> Result<Encoding> {
        Ok(self.encoding_name()?.parse()?)
    }

    /// SDP-style format parameters string.
    pub fn fmtp(&self) -> Result<&str> {
        self.lookup_str(FMTP_KEY)
    }

    /// The four hex digits following `config=` in `fmtp`.
    pub fn fmtp_config_hex(&self) -> Result<&str> {
        config_hex(self.fmtp()?)
    }

    fn lookup_str(&self, key: &'static str) -> Result<&str> {
        match self.lookup(key) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(Error::invalid_metadata(format!(
                "{key} is not a string: {other}"
            ))),
            None => Err(Error::MissingKey(key)),
        }
    }
}

/// Depth-first search for `key`.
///
/// A key present in the object being searched is returned whatever its
/// value. A value found further down is only taken when non-empty;
/// otherwise the search moves on to the next sibling.
pub fn search<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    let Value::Object(map) = value else {
        return None;
    };

    for (name, child) in map {
        if name == key {
            return Some(child);
        }
        if let Some(found) = search(child, key).filter(|v| !is_empty(v)) {
            return Some(found);
        }
    }

    None
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Extract the audio config hex digits from an fmtp string.
pub fn config_hex(fmtp: &str) -> Result<&str> {
    let (_, tail) = fmtp
        .split_once(CONFIG_PARAM)
        .ok_or_else(|| Error::invalid_metadata(format!("no config in fmtp: {fmtp}")))?;

    match tail.get(..4) {
        Some(digits) if digits.bytes().all(|b| b.is_ascii_hexdigit()) => Ok(digits),
        _ => Err(Error::invalid_metadata(format!(
            "config needs four hex digits: {fmtp}"
        ))),
    }
}
