//! is3dump-common: shared types, constants, and path rules.
//!
//! This crate provides the small vocabulary shared by the container reader
//! and the command-line front end:
//!
//! - **Core Types**: the output [`Encoding`], record [`StreamType`] and the
//!   dump [`TimeRange`]
//! - **Path Rules**: how chunk index files, data files and per-stream
//!   metadata files are recognised inside a channel directory
//! - **Error Handling**: a common error type and result alias
//!
//! # Examples
//!
//! ```
//! use is3dump_common::{Encoding, TimeRange};
//! use is3dump_common::paths::{data_path_for_index, is_index_file};
//! use std::path::Path;
//!
//! let encoding: Encoding = "aac".parse().unwrap();
//! assert_eq!(encoding, Encoding::Aac);
//!
//! let range: TimeRange = "100,500".parse().unwrap();
//! assert!(range.admits(150));
//!
//! let index = Path::new("/rec/chan/0001.data.idx");
//! assert!(is_index_file(index));
//! assert_eq!(data_path_for_index(index).unwrap(), Path::new("/rec/chan/0001.data"));
//! ```

pub mod error;
pub mod paths;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
