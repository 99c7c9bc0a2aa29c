// Structural limits applied while loading an automaton.

/// Default ceiling on the number of states of one `.fst2` file.
pub const MAX_FST2_STATES: usize = 500_000;

/// Default ceiling on the number of tags of one `.fst2` file.
pub const MAX_FST2_TAGS: usize = 100_000;

/// Upper bounds checked by the loader. Exceeding one is a load error,
/// never a truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fst2Limits {
    pub max_states: usize,
    pub max_tags: usize,
}

impl Default for Fst2Limits {
    fn default() -> Self {
        Self {
            max_states: MAX_FST2_STATES,
            max_tags: MAX_FST2_TAGS,
        }
    }
}

impl Fst2Limits {
    /// No ceiling besides available memory.
    pub fn unbounded() -> Self {
        Self {
            max_states: usize::MAX,
            max_tags: usize::MAX,
        }
    }
}
