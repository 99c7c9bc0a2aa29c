//! Shared building blocks for the Unitex crates.
//!
//! - [`alphabet`] -- Letter classification and case-variant tables
//! - [`dela`] -- DELA entry parsing (`inflected,lemma.CODES:flex`)
//! - [`text`] -- Decoding and encoding of Unitex text files (UTF-16LE / UTF-8)

pub mod alphabet;
pub mod dela;
pub mod text;

/// Error type for the shared Unitex primitives.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid alphabet interval #{from}{to}: {from} must come before {to}")]
    InvalidInterval { from: char, to: char },
    #[error("invalid UTF-16 text: {0}")]
    InvalidUtf16(#[from] std::string::FromUtf16Error),
    #[error("invalid UTF-8 text: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("UTF-16 text has an odd number of bytes ({0})")]
    OddLength(usize),
    #[error("invalid DELA entry `{line}`: {reason}")]
    InvalidDelaEntry { line: String, reason: &'static str },
}
