// Grammatical code index.
//
// Grammar patterns such as `<A:ms>`, `<N+z1-hum>` or `<manger.V:P3s>` are
// numbered. The index answers, for one DELAF entry, which pattern numbers
// can match it. Every order of the included codes is inserted into the trie
// so that a lookup never depends on the order in which an entry lists its
// codes: `N+z1` and `z1+N` reach the same patterns.

pub mod flexional;

use bitvec::prelude::*;
use hashbrown::HashMap;
use unitex_core::dela::DelaEntry;

use crate::CodeIndexError;
use flexional::FlexionalCode;

/// Patterns with more included codes than this are rejected: insertion
/// cost grows with the factorial of the code count.
pub const MAX_COMBINED_CODES: usize = 8;

/// A pattern code split into its parts.
///
/// `N+z1-hum-anl:ms:fs` has included codes `N`, `z1`, forbidden codes
/// `anl`, `hum` (sorted) and inflectional codes `ms`, `fs`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternCode {
    pub included: Vec<String>,
    pub forbidden: Vec<String>,
    pub inflectional: Vec<String>,
}

impl PatternCode {
    pub fn parse(code: &str) -> Result<Self, CodeIndexError> {
        let mut parsed = Self::default();
        let chars: Vec<char> = code.chars().collect();
        let len = chars.len();
        if len == 0 {
            return Ok(parsed);
        }
        let mut i = 0;
        let mut negative = chars[0] == '-';
        if negative {
            i += 1;
        }
        while i < len && chars[i] != ':' {
            let mut token = String::new();
            loop {
                if chars[i] == '\\' {
                    i += 1;
                    if i == len {
                        return Err(CodeIndexError::TrailingBackslash(code.to_string()));
                    }
                }
                token.push(chars[i]);
                i += 1;
                if i == len || matches!(chars[i], '+' | ':' | '-') {
                    break;
                }
            }
            if negative {
                if let Err(pos) = parsed.forbidden.binary_search(&token) {
                    parsed.forbidden.insert(pos, token);
                }
            } else {
                parsed.included.push(token);
            }
            if i == len {
                return Ok(parsed);
            }
            negative = chars[i] == '-';
            if chars[i] == ':' {
                break;
            }
            i += 1;
        }
        if i < len && chars[i] == ':' {
            i += 1;
        }
        let rest: String = chars[i..].iter().collect();
        parsed.inflectional = rest
            .split(':')
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Ok(parsed)
    }
}

/// What a trie node stores for each pattern ending there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternEntry {
    pub pattern: usize,
    /// Required inflectional codes, if the pattern has any.
    pub flexional: Option<FlexionalCode>,
    /// Semantic codes the entry must not carry.
    pub forbidden: Vec<String>,
    /// Required lemma, for patterns like `<manger.V>`.
    pub lemma: Option<String>,
}

impl PatternEntry {
    fn accepts(&self, entry: &DelaEntry, flex: &FlexionalCode) -> bool {
        if self.lemma.as_deref().is_some_and(|l| l != entry.lemma) {
            return false;
        }
        if self.flexional.as_ref().is_some_and(|p| !flex.is_compatible(p)) {
            return false;
        }
        !self.forbidden.iter().any(|f| entry.has_semantic_code(f))
    }
}

#[derive(Debug, Clone, Default)]
struct CodeNode {
    children: HashMap<String, usize>,
    patterns: Vec<PatternEntry>,
}

/// Trie of grammatical and semantic codes (arena-allocated).
#[derive(Debug, Clone)]
pub struct GrammaticalCodeIndex {
    nodes: Vec<CodeNode>,
    pattern_count: usize,
}

impl Default for GrammaticalCodeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammaticalCodeIndex {
    pub fn new() -> Self {
        Self {
            nodes: vec![CodeNode::default()],
            pattern_count: 0,
        }
    }

    /// Number of bits a result set needs (highest pattern number + 1).
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Register pattern number `pattern` for `code`, optionally restricted
    /// to entries with the given lemma. A code without included codes
    /// (e.g. `:ms` alone) adds nothing.
    pub fn insert(
        &mut self,
        pattern: usize,
        code: &str,
        lemma: Option<&str>,
    ) -> Result<(), CodeIndexError> {
        let parsed = PatternCode::parse(code)?;
        let n = parsed.included.len();
        if n == 0 {
            return Ok(());
        }
        if n > MAX_COMBINED_CODES {
            return Err(CodeIndexError::TooManyCodes {
                code: code.to_string(),
                count: n,
                limit: MAX_COMBINED_CODES,
            });
        }
        let entry = PatternEntry {
            pattern,
            flexional: (!parsed.inflectional.is_empty())
                .then(|| FlexionalCode::new(parsed.inflectional.clone())),
            forbidden: parsed.forbidden.clone(),
            lemma: lemma.map(str::to_string),
        };
        let mut used = vec![false; n];
        let mut order = Vec::with_capacity(n);
        self.insert_permutations(&parsed.included, &mut used, &mut order, &entry);
        self.pattern_count = self.pattern_count.max(pattern + 1);
        Ok(())
    }

    fn insert_permutations<'a>(
        &mut self,
        codes: &'a [String],
        used: &mut [bool],
        order: &mut Vec<&'a str>,
        entry: &PatternEntry,
    ) {
        if order.len() == codes.len() {
            let mut node = 0;
            for code in order.iter() {
                node = self.child_or_insert(node, code);
            }
            self.nodes[node].patterns.push(entry.clone());
            return;
        }
        for i in 0..codes.len() {
            if !used[i] {
                used[i] = true;
                order.push(codes[i].as_str());
                self.insert_permutations(codes, used, order, entry);
                order.pop();
                used[i] = false;
            }
        }
    }

    fn child_or_insert(&mut self, node: usize, code: &str) -> usize {
        if let Some(&child) = self.nodes[node].children.get(code) {
            return child;
        }
        let child = self.nodes.len();
        self.nodes.push(CodeNode::default());
        self.nodes[node].children.insert(code.to_string(), child);
        child
    }

    /// Set in `patterns` the bit of every pattern that can match `entry`
    /// and return the number of matches. The entry's semantic codes are
    /// walked as a sequence in which each code is either used or skipped,
    /// so a pattern is counted once for every way of reaching it.
    ///
    /// `patterns` is grown to [`pattern_count`](Self::pattern_count) bits
    /// if it is shorter.
    pub fn matching_patterns(&self, entry: &DelaEntry, patterns: &mut BitVec<usize, Lsb0>) -> usize {
        if patterns.len() < self.pattern_count {
            patterns.resize(self.pattern_count, false);
        }
        let flex = FlexionalCode::from_entry(entry);
        self.find(0, entry, 0, &flex, patterns)
    }

    fn find(
        &self,
        node: usize,
        entry: &DelaEntry,
        level: usize,
        flex: &FlexionalCode,
        patterns: &mut BitVec<usize, Lsb0>,
    ) -> usize {
        let Some(code) = entry.semantic_codes.get(level) else {
            return 0;
        };
        let mut count = self.find(node, entry, level + 1, flex, patterns);
        if let Some(&child) = self.nodes[node].children.get(code.as_str()) {
            for p in &self.nodes[child].patterns {
                if p.accepts(entry, flex) {
                    patterns.set(p.pattern, true);
                    count += 1;
                }
            }
            count += self.find(child, entry, level + 1, flex, patterns);
        }
        count
    }
}
