//! Random access to a chunk's data file.

use crate::index::IndexRecord;
use crate::{Error, Result};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Maximum frame size read in one go (64 MB), guarding against corrupt
/// records.
const MAX_FRAME_SIZE: u64 = 64 * 1024 * 1024;

/// Append-only data file paired with an index file.
///
/// The size is captured when the file is opened; records pointing past it
/// reference data that was not flushed yet.
pub struct DataFile<R = File> {
    reader: R,
    size: u64,
}

impl DataFile<File> {
    /// Open a data file and record its current size.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { reader: file, size })
    }
}

impl<R: Read + Seek> DataFile<R> {
    /// Wrap any seekable source; its size is taken from the end position.
    pub fn from_reader(mut reader: R) -> Result<Self> {
        let size = reader.seek(SeekFrom::End(0))?;
        Ok(Self { reader, size })
    }

    /// Size of the data file when it was opened.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether the record's payload ends within the flushed data.
    pub fn holds(&self, record: &IndexRecord) -> bool {
        record.offset <= self.size
    }

    /// Read the payload described by `record`.
    pub fn frame(&mut self, record: &IndexRecord) -> Result<Vec<u8>> {
        let mut payload = Vec::new();
        self.read_frame_into(record, &mut payload)?;
        Ok(payload)
    }

    /// Read the payload described by `record` into `buf`, replacing its
    /// contents.
    ///
    /// Bounds against the file size are the caller's job (see
    /// [`DataFile::holds`]); reading past the end surfaces as an I/O error.
    pub fn read_frame_into(&mut self, record: &IndexRecord, buf: &mut Vec<u8>) -> Result<()> {
        let range = record.data_range().ok_or_else(|| {
            Error::invalid_record(format!(
                "block size {} exceeds offset {}",
                record.block_size, record.offset
            ))
        })?;
        if record.block_size > MAX_FRAME_SIZE {
            return Err(Error::invalid_record(format!(
                "block size {} exceeds maximum {}",
                record.block_size, MAX_FRAME_SIZE
            )));
        }

        self.reader.seek(SeekFrom::Start(range.start))?;
        buf.clear();
        buf.resize(record.block_size as usize, 0);
        self.reader.read_exact(buf)?;
        Ok(())
    }
}
