//! Unitex `.fst2` automata.
//!
//! An `.fst2` file holds a set of numbered graphs that may call each other,
//! followed by one global tag table. This crate loads such a file into a
//! flat arena ([`automaton::Automaton`]) where states, transitions and tags
//! are addressed by index.
//!
//! # Architecture
//!
//! - [`format`] -- Line-oriented `.fst2` parser
//! - [`automaton`] -- States, transitions, graphs and variables
//! - [`tag`] -- Tag decomposition (`<eu,avoir.V:Kms>`, filters, variables)
//! - [`tag_tree`] -- Character trie over tag contents
//! - [`config`] -- Structural limits checked while loading

pub mod automaton;
pub mod config;
pub mod format;
pub mod tag;
pub mod tag_tree;

pub use automaton::{Automaton, Label, State, StateFlags, Transition};
pub use config::Fst2Limits;
pub use tag::{Tag, TagFlags};

/// Error type for `.fst2` loading.
#[derive(Debug, thiserror::Error)]
pub enum Fst2Error {
    #[error("cannot read automaton: {0}")]
    Core(#[from] unitex_core::CoreError),
    #[error("empty automaton (no graph)")]
    Empty,
    #[error("invalid header line `{0}`")]
    InvalidHeader(String),
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("invalid tag `{tag}`: {reason}")]
    InvalidTag { tag: String, reason: &'static str },
    #[error("too many states: more than {limit}")]
    TooManyStates { limit: usize },
    #[error("too many tags: more than {limit}")]
    TooManyTags { limit: usize },
    #[error("call to graph {graph} but the automaton has {count} graphs")]
    BadSubGraph { graph: u32, count: usize },
    #[error("transition uses tag {tag} but the automaton has {count} tags")]
    DanglingTag { tag: u32, count: usize },
    #[error("transition goes to state {state} but the automaton has {count} states")]
    DanglingState { state: u32, count: usize },
}
