// Inflection options and resource limits.

/// Default capacity of the inflection buffer, in characters.
pub const MAX_CHARS_IN_STACK: usize = 1000;

/// Default number of distinct flexional transducers a run may load.
pub const MAX_TRANSDUCERS: usize = 3000;

/// Default bound on the transitions and graph calls followed along one path.
pub const MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflectOptions {
    /// Insert `:` before an output that does not start with one (`-a`).
    pub add_colon: bool,
    /// Write the full transducer name as grammatical code: `N32` instead of
    /// `N` (`-k`).
    pub keep_digits: bool,
    pub max_stack_chars: usize,
    pub max_transducers: usize,
    pub max_call_depth: usize,
}

impl Default for InflectOptions {
    fn default() -> Self {
        Self {
            add_colon: false,
            keep_digits: false,
            max_stack_chars: MAX_CHARS_IN_STACK,
            max_transducers: MAX_TRANSDUCERS,
            max_call_depth: MAX_CALL_DEPTH,
        }
    }
}
