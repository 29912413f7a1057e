//! IStream3 channel discovery.
//!
//! A channel is a directory of chunk pairs plus per-stream metadata
//! documents. Discovery lists the directory (or, optionally, the whole
//! tree), collects the chunk index files in lexicographic order and loads
//! the metadata document of the requested stream.

mod metadata;

pub use metadata::{config_hex, search, ChannelMetadata};

use crate::data::DataFile;
use crate::index::IndexReader;
use crate::{Error, Result};
use is3dump_common::paths::{self, data_path_for_index, is_index_file, is_metadata_file};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// One (index file, data file) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index_path: PathBuf,
    pub data_path: PathBuf,
}

impl Chunk {
    /// Build a chunk from its index path; `None` if it is not an index file.
    pub fn from_index_path(index_path: PathBuf) -> Option<Self> {
        let data_path = data_path_for_index(&index_path)?;
        Some(Self {
            index_path,
            data_path,
        })
    }

    /// Open the index, optionally bounded by an end timestamp.
    pub fn open_index(&self, end: Option<u64>) -> Result<IndexReader<BufReader<File>>> {
        Ok(IndexReader::open(&self.index_path)?.end_at(end))
    }

    /// Open the paired data file.
    pub fn open_data(&self) -> Result<DataFile> {
        DataFile::open(&self.data_path)
    }
}

/// A discovered channel.
#[derive(Debug, Clone)]
pub struct Channel {
    path: PathBuf,
    id: String,
    chunks: Vec<Chunk>,
    metadata: Option<ChannelMetadata>,
}

impl Channel {
    /// Discover the channel at `path` and load the metadata of `stream_id`.
    pub fn discover<P: AsRef<Path>>(path: P, stream_id: u64) -> Result<Self> {
        Self::builder(path).stream(stream_id).open()
    }

    /// Discover chunks only, for tooling that needs no stream document.
    pub fn open_without_metadata<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder(path).open()
    }

    /// Create a channel builder.
    pub fn builder<P: AsRef<Path>>(path: P) -> ChannelBuilder {
        ChannelBuilder::new(path.as_ref())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Channel identifier (last path component).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Chunks in lexicographic order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn metadata(&self) -> Option<&ChannelMetadata> {
        self.metadata.as_ref()
    }

    /// Look `key` up in the stream metadata; `None` without metadata.
    pub fn lookup(&self, key: &str) -> Option<&serde_json::Value> {
        self.metadata.as_ref()?.lookup(key)
    }
}

/// Builder for discovering channels.
pub struct ChannelBuilder {
    path: PathBuf,
    stream_id: Option<u64>,
    recursive: bool,
}

impl ChannelBuilder {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            stream_id: None,
            recursive: false,
        }
    }

    /// Load the metadata document of this stream.
    pub fn stream(mut self, stream_id: u64) -> Self {
        self.stream_id = Some(stream_id);
        self
    }

    /// Walk the whole tree instead of one directory.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Discover chunks and load metadata.
    ///
    /// Missing metadata is not an error here; several documents matching
    /// the stream are.
    pub fn open(self) -> Result<Channel> {
        if !self.path.is_dir() {
            return Err(Error::ChannelNotFound(self.path));
        }

        let id = paths::channel_id(&self.path)
            .or_else(|| {
                self.path
                    .canonicalize()
                    .ok()
                    .and_then(|p| paths::channel_id(&p))
            })
            .unwrap_or_default();

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut chunks = Vec::new();
        let mut metadata_paths = Vec::new();

        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(true)
        {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.into_path();
            if is_index_file(&path) {
                if let Some(chunk) = Chunk::from_index_path(path) {
                    if !chunk.data_path.exists() {
                        warn!("Chunk has no data file: {:?}", chunk.data_path);
                    }
                    chunks.push(chunk);
                }
            } else if self
                .stream_id
                .is_some_and(|stream_id| is_metadata_file(&path, stream_id))
            {
                metadata_paths.push(path);
            }
        }

        chunks.sort_by(|a, b| a.index_path.cmp(&b.index_path));

        let metadata = match (self.stream_id, metadata_paths.len()) {
            (_, 0) => None,
            (_, 1) => Some(ChannelMetadata::open(&metadata_paths[0])?),
            (Some(stream_id), _) => {
                metadata_paths.sort();
                return Err(Error::DuplicateMetadata {
                    stream_id,
                    paths: metadata_paths,
                });
            }
            (None, _) => None,
        };

        debug!(
            "Discovered channel {:?}: {} chunks, metadata: {}",
            self.path,
            chunks.len(),
            metadata.is_some()
        );

        Ok(Channel {
            path: self.path,
            id,
            chunks,
            metadata,
        })
    }
}
