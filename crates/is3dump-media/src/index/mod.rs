//! Index file parsing.
//!
//! An index file is a plain sequence of fixed-size records, appended as the
//! recorder writes frames to the paired data file. A record that is short or
//! lacks the closing mark is where the readable stream ends: recordings may
//! be cut mid-write, and everything before that point is still usable.

mod reader;
mod record;

pub use reader::IndexReader;
pub use record::{IndexRecord, RECORD_MARK, RECORD_SIZE};
