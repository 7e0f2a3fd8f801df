use thiserror::Error;
use zerocopy::{ConvertError, SizeError};

use crate::NodeId;

pub mod decoder;
pub mod encoder;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeErr {
    #[error("not enough bytes")]
    Length,

    #[error("invalid container framing")]
    Validity,

    #[error("bit stream ended before the terminator symbol")]
    Truncated,

    #[error("node {node:?} addresses slot {slot} beyond the code table")]
    NodeRange { node: NodeId, slot: usize },

    #[error("string id {id} out of range, container holds {count} strings")]
    IndexOutOfRange { id: usize, count: usize },

    #[error("no display fragment mapped for symbol code {code:#04x}")]
    UnmappedCode { code: u8 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeErr {
    #[error("no symbol code maps to {0:?}")]
    UnknownSymbol(String),

    #[error("code {code:#06x} cannot reach the trie root")]
    UnreachableCode { code: u16 },
}

impl<S, D> From<SizeError<S, D>> for DecodeErr {
    fn from(_: SizeError<S, D>) -> Self {
        DecodeErr::Length
    }
}

impl<A, S, V> From<ConvertError<A, S, V>> for DecodeErr {
    fn from(err: ConvertError<A, S, V>) -> Self {
        match err {
            ConvertError::Alignment(_) => panic!("all zerocopy casts must be unaligned"),
            ConvertError::Size(_) => DecodeErr::Length,
            ConvertError::Validity(_) => DecodeErr::Validity,
        }
    }
}
