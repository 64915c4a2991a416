//! State codecs: bit-packed binary for hashing/transport, and the short
//! slash-separated text notation for humans, logs and URLs.

pub mod binary;
pub mod notation;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid binary input: {field} at bit {offset}")]
    InvalidBinary { field: &'static str, offset: usize },
    #[error("invalid notation: {reason}")]
    InvalidNotation { reason: String },
}

impl CodecError {
    pub fn notation(reason: impl Into<String>) -> CodecError {
        CodecError::InvalidNotation {
            reason: reason.into(),
        }
    }
}

pub use binary::{decode_state, encode_state};
pub use notation::{notation_decode, notation_encode};
