//! Sequential index file reader.

use super::record::{IndexRecord, RECORD_SIZE};
use crate::Result;
use is3dump_common::TimeRange;
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

/// Lazy, finite reader over the records of one index file.
///
/// The sequence ends at the first short read or unmarked record, and (when
/// an end timestamp is set) at the first record stamped after it; that
/// record is not yielded. Once ended, the reader stays ended.
pub struct IndexReader<R> {
    reader: R,
    range: TimeRange,
    stream_id: Option<u64>,
    yielded: u64,
    finished: bool,
}

impl IndexReader<BufReader<File>> {
    /// Open an index file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> IndexReader<R> {
    /// Create a reader over any byte source.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            range: TimeRange::unbounded(),
            stream_id: None,
            yielded: 0,
            finished: false,
        }
    }

    /// Stop at the first record with `timestamp > end`.
    pub fn end_at(mut self, end: Option<u64>) -> Self {
        self.range.end = end;
        self
    }

    /// Yield only records of `stream_id`, skipping the rest.
    pub fn only_stream(mut self, stream_id: u64) -> Self {
        self.stream_id = Some(stream_id);
        self
    }

    /// Number of records yielded so far.
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// Read the next record, `Ok(None)` at the end of the readable stream.
    pub fn next_record(&mut self) -> Result<Option<IndexRecord>> {
        while !self.finished {
            let record = match self.read_raw() {
                Ok(Some(raw)) => IndexRecord::decode(&raw),
                Ok(None) => None,
                Err(err) => {
                    self.finished = true;
                    return Err(err);
                }
            };

            let Some(record) = record else {
                self.finished = true;
                break;
            };

            if self.range.is_past_end(record.timestamp) {
                self.finished = true;
                break;
            }

            if self.stream_id.is_some_and(|id| record.stream_id != id) {
                continue;
            }

            self.yielded += 1;
            return Ok(Some(record));
        }

        Ok(None)
    }

    /// Read exactly one record's bytes; a short read is end of stream.
    fn read_raw(&mut self) -> Result<Option<[u8; RECORD_SIZE]>> {
        let mut raw = [0u8; RECORD_SIZE];
        match self.reader.read_exact(&mut raw) {
            Ok(()) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl<R: Read> Iterator for IndexReader<R> {
    type Item = Result<IndexRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RECORD_MARK;
    use std::io::Cursor;

    fn record(stream_id: u64, timestamp: u64) -> IndexRecord {
        IndexRecord {
            stream_id,
            timestamp,
            block_size: 4,
            offset: 4,
            ..IndexRecord::default()
        }
    }

    fn encode_all(records: &[IndexRecord]) -> Vec<u8> {
        records.iter().flat_map(|r| r.encode()).collect()
    }

    fn collect<R: Read>(reader: IndexReader<R>) -> Vec<IndexRecord> {
        reader.map(|r| r.unwrap()).collect()
    }

    #[test]
    fn test_reads_all_records() {
        let records = vec![record(0, 1), record(1, 2), record(0, 3)];
        let reader = IndexReader::new(Cursor::new(encode_all(&records)));
        assert_eq!(collect(reader), records);
    }

    #[test]
    fn test_empty_stream() {
        let mut reader = IndexReader::new(Cursor::new(Vec::new()));
        assert!(reader.next_record().unwrap().is_none());
    }

    #[test]
    fn test_truncated_tail_ends_stream() {
        let mut bytes = encode_all(&[record(0, 1), record(0, 2)]);
        bytes.extend_from_slice(&record(0, 3).encode()[..40]);
        let reader = IndexReader::new(Cursor::new(bytes));
        assert_eq!(collect(reader).len(), 2);
    }

    #[test]
    fn test_bad_mark_stops_before_later_records() {
        let mut broken = record(0, 2);
        broken.mark = 0xDEAD;
        let bytes = encode_all(&[record(0, 1), broken, record(0, 3)]);
        let reader = IndexReader::new(Cursor::new(bytes));

        let records = collect(reader);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].timestamp, 1);
        assert_eq!(records[0].mark, RECORD_MARK);
    }

    #[test]
    fn test_end_bound_is_inclusive_and_final() {
        let bytes = encode_all(&[record(0, 50), record(0, 500), record(0, 600), record(0, 100)]);
        let mut reader = IndexReader::new(Cursor::new(bytes)).end_at(Some(500));

        assert_eq!(reader.next_record().unwrap().unwrap().timestamp, 50);
        assert_eq!(reader.next_record().unwrap().unwrap().timestamp, 500);
        // 600 ends the stream; the later 100 is never reached
        assert!(reader.next_record().unwrap().is_none());
        assert!(reader.next_record().unwrap().is_none());
        assert_eq!(reader.yielded(), 2);
    }

    #[test]
    fn test_without_end_bound_reads_to_the_last_record() {
        let bytes = encode_all(&[record(0, u64::MAX), record(0, 0), record(0, 7)]);
        let reader = IndexReader::new(Cursor::new(bytes)).end_at(None);

        let stamps: Vec<u64> = collect(reader).iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![u64::MAX, 0, 7]);
    }

    #[test]
    fn test_stream_filter_variant() {
        let mut broken = record(2, 9);
        broken.mark = 0;
        let bytes = encode_all(&[
            record(2, 1),
            record(0, 2),
            record(2, 3),
            record(0, 4),
            broken,
            record(2, 10),
        ]);
        let reader = IndexReader::new(Cursor::new(bytes)).only_stream(2);

        let stamps: Vec<u64> = collect(reader).iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, vec![1, 3]);
    }

    #[test]
    fn test_end_bound_applies_to_other_streams() {
        let bytes = encode_all(&[record(1, 10), record(0, 900), record(1, 20)]);
        let reader = IndexReader::new(Cursor::new(bytes))
            .end_at(Some(100))
            .only_stream(1);
        assert_eq!(collect(reader).len(), 1);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::PermissionDenied, "denied"))
        }
    }

    #[test]
    fn test_io_error_propagates_once() {
        let mut reader = IndexReader::new(FailingReader);
        assert!(matches!(reader.next_record(), Err(crate::Error::Io(_))));
        assert!(reader.next_record().unwrap().is_none());
    }
}
