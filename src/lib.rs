//! is3dump - IStream3 channel stream dumper
//!
//! This library crate exposes the command implementations for integration
//! testing; the container reading and framing live in `is3dump-media`.

pub mod config;
pub mod dump;
pub mod index;
pub mod streams;
