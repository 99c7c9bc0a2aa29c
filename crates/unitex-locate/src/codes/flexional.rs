// Inflectional codes (`ms`, `fp`, `P3s`, ...) and their compatibility test.

use unitex_core::dela::DelaEntry;

/// The inflectional codes of an entry or a pattern, e.g. `:ms:mp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FlexionalCode {
    codes: Vec<String>,
}

impl FlexionalCode {
    pub fn new(codes: Vec<String>) -> Self {
        Self { codes }
    }

    pub fn from_entry(entry: &DelaEntry) -> Self {
        Self::new(entry.inflectional_codes.clone())
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `self` (an entry's codes) is compatible with `pattern` if the pattern
    /// is empty, or if some pattern code has all its characters in some code
    /// of `self`: `ms:fs` is compatible with `m`, `mp` is not compatible
    /// with `s`.
    pub fn is_compatible(&self, pattern: &FlexionalCode) -> bool {
        if pattern.is_empty() {
            return true;
        }
        self.codes
            .iter()
            .any(|code| pattern.codes.iter().any(|p| chars_included(p, code)))
    }
}

/// Every character of `pattern` occurs in `code`. Order does not matter.
pub fn chars_included(pattern: &str, code: &str) -> bool {
    pattern.chars().all(|c| code.contains(c))
}
