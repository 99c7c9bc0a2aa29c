//! Inflection of DELAS dictionaries.
//!
//! Each DELAS line names a lemma and a flexional transducer (`chat,N1`).
//! Every path of the transducer edits the lemma into one inflected form and
//! appends inflectional codes, giving one DELAF line per final state reached
//! (`chats,chat.N:mp`).
//!
//! # Architecture
//!
//! - [`delas`] -- DELAS line reader
//! - [`stack`] -- Cursor-based edit buffer driven by `L`/`R`/`C`/`D` op-codes
//! - [`engine`] -- Transducer exploration and DELAF line output
//! - [`cache`] -- Flexional transducers, loaded at most once per name
//! - [`config`] -- Options and resource limits

pub mod cache;
pub mod config;
pub mod delas;
pub mod engine;
pub mod stack;

pub use cache::{DirectoryLoader, TransducerCache, TransducerLoader};
pub use config::InflectOptions;
pub use delas::DelasLine;
pub use engine::{InflectStats, InflectedForm, Inflector, inflect_dictionary};
pub use stack::InflectionStack;

use unitex_core::CoreError;
use unitex_fst2::Fst2Error;

/// Error of the inflection buffer. Every variant is a malformed
/// transducer or a pathological input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("inflected form exceeds {capacity} characters")]
    BufferOverflow { capacity: usize },
    #[error("cursor at {pos} is past the end of the form ({len} characters)")]
    CursorOutOfRange { pos: usize, len: usize },
    #[error("D applied at the start of the form")]
    DeleteAtStart,
}

/// Error of one DELAS line. The line is skipped.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DelasError {
    #[error("'\\' at end of line")]
    TrailingBackslash,
    #[error("unexpected end of line")]
    UnexpectedEndOfLine,
    #[error("missing flexional code")]
    MissingFlexionalCode,
    #[error("empty flexional transducer name")]
    EmptyTransducerName,
}

/// Error type for dictionary inflection.
#[derive(Debug, thiserror::Error)]
pub enum InflectError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Fst2(#[from] Fst2Error),
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error("more than {limit} flexional transducers")]
    TooManyTransducers { limit: usize },
    #[error("exploration deeper than {limit} steps (cycle in a flexional transducer?)")]
    RecursionLimit { limit: usize },
}
