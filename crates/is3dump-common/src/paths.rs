//! Path rules for IStream3 channel directories.
//!
//! A channel directory holds chunk pairs (`<stem>.data.idx` index files next
//! to their `<stem>.data` data files) and one JSON metadata document per
//! stream, named `stream.<id>.<...>`. These functions are the only place the
//! naming scheme is spelled out.

use crate::Encoding;
use std::path::{Component, Path, PathBuf};

/// Suffix identifying a chunk index file.
pub const INDEX_SUFFIX: &str = ".data.idx";

/// Part of the index suffix stripped to get the data file name.
const INDEX_EXTENSION: &str = ".idx";

/// Prefix shared by all stream metadata files.
const METADATA_PREFIX: &str = "stream.";

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// Check if a path names a chunk index file.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use is3dump_common::paths::is_index_file;
///
/// assert!(is_index_file(Path::new("/rec/chan/1650000000.data.idx")));
/// assert!(!is_index_file(Path::new("/rec/chan/1650000000.data")));
/// ```
pub fn is_index_file(path: &Path) -> bool {
    file_name(path)
        .map(|name| name.len() > INDEX_SUFFIX.len() && name.ends_with(INDEX_SUFFIX))
        .unwrap_or(false)
}

/// Data file paired with a chunk index file.
///
/// Returns `None` if `index` is not an index file.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use is3dump_common::paths::data_path_for_index;
///
/// let data = data_path_for_index(Path::new("chan/0001.data.idx")).unwrap();
/// assert_eq!(data, Path::new("chan/0001.data"));
/// ```
pub fn data_path_for_index(index: &Path) -> Option<PathBuf> {
    if !is_index_file(index) {
        return None;
    }
    let name = file_name(index)?;
    let stem = name.strip_suffix(INDEX_EXTENSION)?;
    Some(index.with_file_name(stem))
}

/// Filename prefix of the metadata document for `stream_id`.
pub fn metadata_prefix(stream_id: u64) -> String {
    format!("{METADATA_PREFIX}{stream_id}.")
}

/// Check if a path is the metadata document of `stream_id`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use is3dump_common::paths::is_metadata_file;
///
/// assert!(is_metadata_file(Path::new("stream.0.1.json"), 0));
/// assert!(!is_metadata_file(Path::new("stream.10.1.json"), 1));
/// ```
pub fn is_metadata_file(path: &Path, stream_id: u64) -> bool {
    file_name(path)
        .map(|name| name.starts_with(&metadata_prefix(stream_id)))
        .unwrap_or(false)
}

/// Name of a generated metadata document.
pub fn metadata_file_name(stream_id: u64, stream_type: u8) -> String {
    format!("{METADATA_PREFIX}{stream_id}.{stream_type}.json")
}

/// Channel identifier: the last component of the channel path.
///
/// Trailing separators are ignored, so `rec/chan42/` yields `chan42`.
pub fn channel_id(channel: &Path) -> Option<String> {
    channel
        .components()
        .next_back()
        .and_then(|c| match c {
            Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .map(str::to_owned)
}

/// Default dump file name: `<channel_id>.<encoding>`.
pub fn default_output_name(channel_id: &str, encoding: Encoding) -> String {
    format!("{channel_id}.{encoding}")
}
