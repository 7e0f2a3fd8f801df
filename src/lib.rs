//! A codec for GPNT, the bit-packed text format a family of Griptonite
//! handheld titles use for their string banks. Every string is a run of
//! variable-length prefix codes resolved through a shared binary trie, and a
//! bank of strings ships as one small self-describing container holding the
//! trie, a per-string offset table, and the packed string data.
//!
//! ## Key Features:
//!
//! - **Self-terminating strings**: the format stores no lengths. Each string
//!   ends at a sentinel code that only exists as a path through the trie, so
//!   decoding is the source of truth for where a string's bytes stop.
//!
//! - **Zero-copy access**: the [`GpntRef`] type resolves string counts,
//!   offsets, the embedded code trie, and individual strings directly from
//!   any type implementing `Deref<Target = [u8]>`.
//!
//! Tables and symbol maps arrive from the companion tooling as hex-formatted
//! JSON values; [`CodeTable::from_hex`] and [`SymbolMap::from_hex_entries`]
//! accept that form directly.

use thiserror::Error;

mod codec;
mod container;
mod node;
mod symbols;
mod table;
mod util;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use codec::{
    DecodeErr, EncodeErr,
    decoder::{Decoded, Decoder, UnmappedCodes},
    encoder::Encoder,
};
pub use container::{FetchedString, GpntBuilder, GpntRef, Strings};
pub use node::{NodeId, TERMINATOR};
pub use symbols::SymbolMap;
pub use table::{CodeRead, CodeTable, CodeTableRef};

/// Failures while loading a table or symbol map from the driver's
/// hex-string interchange form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseErr {
    #[error("invalid hex value {0:?}")]
    InvalidHex(String),

    #[error("symbol code {0:#06x} does not fit in a byte")]
    CodeRange(u16),
}
