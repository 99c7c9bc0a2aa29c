// Constraints of a (text automaton, grammar) pair.
//
// Built once per pair, then queried for every (text tag, grammar tag)
// combination met while matching.

use unitex_core::alphabet::Alphabet;
use unitex_fst2::Automaton;

use crate::constraint::{Constraint, TextTag};
use crate::filters::{FilterIndex, FilterSet};

#[derive(Debug, Clone)]
pub struct MatchContext<'a> {
    alphabet: &'a Alphabet,
    text_tags: Vec<TextTag>,
    label_constraints: Vec<Option<Constraint>>,
    output_constraints: Vec<Option<Constraint>>,
    filters: Option<(FilterSet, FilterIndex)>,
}

impl<'a> MatchContext<'a> {
    /// Decompose every tag of `text` and derive the label and output
    /// constraints of every tag of `grammar`.
    pub fn compute(text: &Automaton, grammar: &Automaton, alphabet: &'a Alphabet) -> Self {
        let text_tags = text.tags.iter().map(TextTag::from_tag).collect();
        let label_constraints = grammar.tags.iter().map(Constraint::from_tag).collect();
        let output_constraints = grammar
            .tags
            .iter()
            .map(|t| Constraint::from_transduction(&t.output))
            .collect();
        tracing::debug!(
            text_tags = text.tags.len(),
            grammar_tags = grammar.tags.len(),
            "match constraints computed"
        );
        Self {
            alphabet,
            text_tags,
            label_constraints,
            output_constraints,
            filters: None,
        }
    }

    /// Compile the morphological filters of `grammar` and index them against
    /// the tags of `text`. If a filter cannot be compiled no index is kept
    /// and filters are ignored.
    pub fn with_filters(mut self, text: &Automaton, grammar: &Automaton) -> Self {
        self.filters = match FilterSet::compile(grammar, self.alphabet) {
            Ok(set) => {
                let tokens: Vec<&str> = text.tags.iter().map(|t| t.input.as_str()).collect();
                let index = FilterIndex::build(&set, &tokens);
                Some((set, index))
            }
            Err(e) => {
                tracing::warn!(error = %e, "morphological filters disabled");
                None
            }
        };
        self
    }

    pub fn alphabet(&self) -> &Alphabet {
        self.alphabet
    }

    pub fn text_tag(&self, tag: usize) -> Option<&TextTag> {
        self.text_tags.get(tag)
    }

    pub fn label_constraint(&self, tag: usize) -> Option<&Constraint> {
        self.label_constraints.get(tag).and_then(Option::as_ref)
    }

    pub fn output_constraint(&self, tag: usize) -> Option<&Constraint> {
        self.output_constraints.get(tag).and_then(Option::as_ref)
    }

    /// Whether text tag `text_tag` satisfies the label of grammar tag
    /// `grammar_tag`. A grammar tag without constraint (`<E>`) always
    /// matches.
    pub fn check(&self, text_tag: usize, grammar_tag: usize) -> bool {
        let Some(tag) = self.text_tags.get(text_tag) else {
            return false;
        };
        if !self.filter_accepts(text_tag, grammar_tag) {
            return false;
        }
        self.label_constraint(grammar_tag)
            .is_none_or(|c| c.is_satisfied_by(tag, self.alphabet))
    }

    /// Label and output constraints checked together: the first value is
    /// [`check`](Self::check), the second tells whether the text tag also
    /// satisfies the output constraint.
    pub fn check_pair(&self, text_tag: usize, grammar_tag: usize) -> (bool, bool) {
        let output = match self.text_tags.get(text_tag) {
            Some(tag) => self
                .output_constraint(grammar_tag)
                .is_none_or(|c| c.is_satisfied_by(tag, self.alphabet)),
            None => false,
        };
        (self.check(text_tag, grammar_tag), output)
    }

    fn filter_accepts(&self, text_tag: usize, grammar_tag: usize) -> bool {
        match &self.filters {
            Some((set, index)) => match set.tag_filter(grammar_tag) {
                Some(filter) => index.matches(text_tag, filter),
                None => true,
            },
            // Filters were not requested or did not compile.
            None => true,
        }
    }
}
