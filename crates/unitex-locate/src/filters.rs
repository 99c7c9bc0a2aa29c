// Morphological filters: `<<regex>>_opts_` attached to grammar tags, and the
// token x filter index computed once per text.

use bitvec::prelude::*;
use hashbrown::HashMap;
use regex::Regex;
use unitex_core::alphabet::Alphabet;
use unitex_fst2::Automaton;

use crate::FilterError;

type BitSet = BitVec<usize, Lsb0>;

#[derive(Debug, Clone)]
struct CompiledFilter {
    source: String,
    regex: Regex,
}

/// The distinct filters of a grammar, compiled. Identical filter strings
/// share one filter number.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    filters: Vec<CompiledFilter>,
    tag_filters: Vec<Option<usize>>,
}

impl FilterSet {
    /// Compile the filters of every tag of `grammar`. The first invalid
    /// filter aborts the whole set.
    pub fn compile(grammar: &Automaton, alphabet: &Alphabet) -> Result<Self, FilterError> {
        let mut set = FilterSet::default();
        let mut numbers: HashMap<&str, usize> = HashMap::new();
        for tag in &grammar.tags {
            let Some(filter) = tag.filter.as_deref() else {
                set.tag_filters.push(None);
                continue;
            };
            let n = match numbers.get(filter) {
                Some(&n) => n,
                None => {
                    let n = set.filters.len();
                    set.filters.push(CompiledFilter {
                        source: filter.to_string(),
                        regex: compile_filter(filter, alphabet)?,
                    });
                    numbers.insert(filter, n);
                    n
                }
            };
            set.tag_filters.push(Some(n));
        }
        tracing::debug!(filters = set.filters.len(), "morphological filters compiled");
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Filter number of grammar tag `tag`, if it carries one.
    pub fn tag_filter(&self, tag: usize) -> Option<usize> {
        self.tag_filters.get(tag).copied().flatten()
    }

    /// The filter as written in the grammar, e.g. `<<^in>>_f_`.
    pub fn source(&self, filter: usize) -> Option<&str> {
        self.filters.get(filter).map(|f| f.source.as_str())
    }

    /// Whether `token` matches filter number `filter`. A DELAF token
    /// `{inflected,lemma.codes}` is matched on its inflected form; the
    /// expression may match anywhere in it.
    pub fn matches(&self, filter: usize, token: &str) -> bool {
        self.filters
            .get(filter)
            .is_some_and(|f| f.regex.is_match(surface_form(token)))
    }
}

/// Dense `token x filter` match table.
#[derive(Debug, Clone)]
pub struct FilterIndex {
    bits: BitSet,
    filter_count: usize,
    token_count: usize,
}

impl FilterIndex {
    pub fn build<S: AsRef<str>>(filters: &FilterSet, tokens: &[S]) -> Self {
        let filter_count = filters.len();
        let mut bits = bitvec![usize, Lsb0; 0; tokens.len() * filter_count];
        for (t, token) in tokens.iter().enumerate() {
            for f in 0..filter_count {
                if filters.matches(f, token.as_ref()) {
                    bits.set(t * filter_count + f, true);
                }
            }
        }
        tracing::debug!(
            tokens = tokens.len(),
            filters = filter_count,
            matches = bits.count_ones(),
            "filter index built"
        );
        Self {
            bits,
            filter_count,
            token_count: tokens.len(),
        }
    }

    /// Out-of-range numbers never match.
    pub fn matches(&self, token: usize, filter: usize) -> bool {
        if token >= self.token_count || filter >= self.filter_count {
            return false;
        }
        self.bits[token * self.filter_count + filter]
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }
}

fn compile_filter(filter: &str, alphabet: &Alphabet) -> Result<Regex, FilterError> {
    let (content, options) = split_filter(filter);
    let mut letter_sets = true;
    let mut basic = false;
    for c in options.chars() {
        match c {
            'f' => letter_sets = false,
            'b' => basic = true,
            _ => {
                return Err(FilterError::InvalidOption {
                    filter: filter.to_string(),
                    options: options.to_string(),
                });
            }
        }
    }
    let mut pattern = if basic {
        basic_to_extended(content)
    } else {
        content.to_string()
    };
    if letter_sets {
        pattern = alphabet.letter_set_pattern(&pattern);
    }
    Regex::new(&pattern).map_err(|source| FilterError::Syntax {
        filter: filter.to_string(),
        source,
    })
}

/// `<<content>>_opts_` gives `(content, opts)`.
fn split_filter(filter: &str) -> (&str, &str) {
    let inner = filter.strip_prefix("<<").unwrap_or(filter);
    let Some(close) = inner.rfind(">>") else {
        return (inner, "");
    };
    let options = &inner[close + 2..];
    let options = options.strip_prefix('_').unwrap_or(options);
    let options = options.strip_suffix('_').unwrap_or(options);
    (&inner[..close], options)
}

/// Translate POSIX basic syntax: `\(` `\)` `\{` `\}` `\|` `\+` `\?` are
/// operators, the bare characters are literals.
fn basic_to_extended(src: &str) -> String {
    const SPECIAL: [char; 7] = ['(', ')', '{', '}', '|', '+', '?'];
    let mut out = String::with_capacity(src.len() + 8);
    let mut chars = src.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(next) if SPECIAL.contains(&next) => out.push(next),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            _ if SPECIAL.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn surface_form(token: &str) -> &str {
    if token == "{S}" {
        return token;
    }
    match token.strip_prefix('{') {
        Some(rest) => rest.find(',').map_or(token, |comma| &rest[..comma]),
        None => token,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unitex_fst2::Fst2Limits;

    fn alphabet() -> Alphabet {
        Alphabet::parse("Aa\nEe\nIi\nMm\nNn\nTt\nRr\nSs\nUu\nÉé\nEé\n").unwrap()
    }

    fn grammar(tags: &[&str]) -> Automaton {
        let mut text = String::from("0000000001\n-1 main\n: ");
        for i in 0..tags.len() {
            text.push_str(&format!("{i} 1 "));
        }
        text.push_str("\nt \nf \n");
        for tag in tags {
            text.push_str(tag);
            text.push('\n');
        }
        text.push_str("f\n");
        Automaton::from_text(&text, &Fst2Limits::default()).unwrap()
    }

    #[test]
    fn identical_filters_share_a_number() {
        let g = grammar(&["%<V><<^in>>", "%<N><<^in>>", "%<A><<ment$>>", "%le"]);
        let set = FilterSet::compile(&g, &alphabet()).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.tag_filter(0), Some(0));
        assert_eq!(set.tag_filter(1), Some(0));
        assert_eq!(set.tag_filter(2), Some(1));
        assert_eq!(set.tag_filter(3), None);
        assert_eq!(set.source(1), Some("<<ment$>>"));
        assert_eq!(set.source(2), None);
        assert!(!set.matches(2, "rarement"));
    }

    #[test]
    fn letter_sets_accept_uppercase() {
        let g = grammar(&["%<<^in>>", "%<<^in>>_f_"]);
        let set = FilterSet::compile(&g, &alphabet()).unwrap();
        assert!(set.matches(0, "INTERNE"));
        assert!(!set.matches(1, "INTERNE"));
        assert!(set.matches(1, "interne"));
    }

    #[test]
    fn search_semantics_and_delaf_tokens() {
        let g = grammar(&["%<<ment>>"]);
        let set = FilterSet::compile(&g, &alphabet()).unwrap();
        assert!(set.matches(0, "rarement"));
        assert!(set.matches(0, "{rarement,rarement.ADV}"));
        assert!(!set.matches(0, "{rare,rare.A}"));
    }

    #[test]
    fn basic_syntax() {
        assert_eq!(basic_to_extended(r"a\(b\)+"), r"a(b)\+");
        assert_eq!(basic_to_extended(r"x\{2\}"), "x{2}");
        let g = grammar(&[r"%<<^\(in\|re\)>>_b_"]);
        let set = FilterSet::compile(&g, &alphabet()).unwrap();
        assert!(set.matches(0, "reste"));
        assert!(!set.matches(0, "ta"));
    }

    #[test]
    fn invalid_option_aborts() {
        let g = grammar(&["%<<^in>>_fx_"]);
        assert!(matches!(
            FilterSet::compile(&g, &alphabet()),
            Err(FilterError::InvalidOption { options, .. }) if options == "fx"
        ));
    }

    #[test]
    fn syntax_error_aborts() {
        let g = grammar(&["%<<(in>>"]);
        assert!(matches!(
            FilterSet::compile(&g, &alphabet()),
            Err(FilterError::Syntax { .. })
        ));
    }

    #[test]
    fn index_lookup() {
        let g = grammar(&["%<<^in>>", "%<<ment$>>"]);
        let set = FilterSet::compile(&g, &alphabet()).unwrap();
        let index = FilterIndex::build(&set, &["interne", "rarement", "{instamment,.ADV}"]);
        assert!(index.matches(0, 0));
        assert!(!index.matches(0, 1));
        assert!(index.matches(1, 1));
        assert!(index.matches(2, 0) && index.matches(2, 1));
        assert!(!index.matches(3, 0));
        assert!(!index.matches(0, 2));
        assert_eq!(index.token_count(), 3);
    }
}
