//! Matching support for Unitex grammars.
//!
//! - [`constraint`] -- Constraints derived from grammar tags and their
//!   evaluation against text tags (raw tokens or DELAF entries)
//! - [`context`] -- Constraints of a (text automaton, grammar) pair,
//!   computed once and reused for every match attempt
//! - [`codes`] -- Index from grammatical code patterns (`N+z1-hum:ms`) to
//!   pattern numbers
//! - [`filters`] -- Morphological filters (`<<regex>>_opts_`) and their
//!   token index

pub mod codes;
pub mod constraint;
pub mod context;
pub mod filters;

pub use codes::GrammaticalCodeIndex;
pub use constraint::{Constraint, MetaClass, TextTag};
pub use context::MatchContext;
pub use filters::{FilterIndex, FilterSet};

/// A constraint whose shape has no decision rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintError {
    #[error("no decision rule applies to constraint `{0}`")]
    UnreachableConstraintShape(String),
    #[error("constraint `{0}` has no alternative code constraint")]
    MissingAlternative(String),
}

/// Error while inserting a pattern into the grammatical code index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodeIndexError {
    #[error("\\ at the end of a grammatical or semantic code in `{0}`")]
    TrailingBackslash(String),
    #[error("pattern `{code}` has {count} codes; at most {limit} can be combined")]
    TooManyCodes {
        code: String,
        count: usize,
        limit: usize,
    },
}

/// Error while compiling the morphological filters of a grammar.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("morphological filter `{filter}`: invalid option(s) `{options}`")]
    InvalidOption { filter: String, options: String },
    #[error("morphological filter `{filter}`: syntax error: {source}")]
    Syntax {
        filter: String,
        #[source]
        source: regex::Error,
    },
}
