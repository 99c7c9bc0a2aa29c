// In-memory automaton: states, transitions, graphs and tags in flat arenas.

use std::path::Path;

use hashbrown::HashMap;
use tracing::debug;

use crate::config::Fst2Limits;
use crate::tag::{self, Tag, TagFlags};
use crate::{Fst2Error, format};

bitflags::bitflags! {
    /// Control bits of a state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StateFlags: u8 {
        const FINAL   = 1 << 0;
        const INITIAL = 1 << 1;
    }
}

/// What a transition consumes: a tag of the tag table, or a call to
/// another graph of the same automaton (graph numbers start at 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Tag(u32),
    SubGraph(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub label: Label,
    /// Absolute index of the destination state.
    pub target: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    pub flags: StateFlags,
    /// Outgoing transitions in file order.
    pub transitions: Vec<Transition>,
}

impl State {
    pub fn is_final(&self) -> bool {
        self.flags.contains(StateFlags::FINAL)
    }

    pub fn is_initial(&self) -> bool {
        self.flags.contains(StateFlags::INITIAL)
    }
}

/// One named graph: a contiguous range of states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    pub name: String,
    pub first_state: u32,
    pub state_count: u32,
}

/// A `$name(` ... `$name)` variable, bound during matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub start: i32,
    pub end: i32,
}

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: -1,
            end: -1,
        }
    }
}

/// A loaded `.fst2` file.
///
/// Graph `n` (1-based, as referenced by [`Label::SubGraph`]) is stored at
/// `graphs[n - 1]`. Graph 1 is the main graph.
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    pub states: Vec<State>,
    pub tags: Vec<Tag>,
    pub graphs: Vec<Graph>,
    pub variables: Vec<Variable>,
    variable_index: HashMap<String, usize>,
}

impl Automaton {
    /// Load an `.fst2` file (UTF-16LE or UTF-8).
    pub fn load(path: impl AsRef<Path>, limits: &Fst2Limits) -> Result<Self, Fst2Error> {
        let path = path.as_ref();
        let (content, _) = unitex_core::text::read_text(path)?;
        let automaton = Self::from_text(&content, limits)?;
        debug!(
            path = %path.display(),
            graphs = automaton.graphs.len(),
            states = automaton.states.len(),
            tags = automaton.tags.len(),
            "loaded automaton"
        );
        Ok(automaton)
    }

    /// Parse the decoded content of an `.fst2` file.
    pub fn from_text(content: &str, limits: &Fst2Limits) -> Result<Self, Fst2Error> {
        let parsed = format::parse_fst2(content, limits)?;
        let mut automaton = Self {
            states: parsed.states,
            tags: parsed.tags,
            graphs: parsed.graphs,
            ..Self::default()
        };
        automaton.collect_variables();
        Ok(automaton)
    }

    fn collect_variables(&mut self) {
        for tag in &self.tags {
            if tag.flags.intersects(TagFlags::VARIABLE_START | TagFlags::VARIABLE_END)
                && !self.variable_index.contains_key(&tag.input)
            {
                self.variable_index
                    .insert(tag.input.clone(), self.variables.len());
                self.variables.push(Variable::new(tag.input.clone()));
            }
        }
    }

    pub fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    /// The graph with 1-based number `n`.
    pub fn graph(&self, n: u32) -> Option<&Graph> {
        self.graphs.get((n as usize).checked_sub(1)?)
    }

    /// Index of the initial state of graph `n` (1-based).
    pub fn graph_start(&self, n: u32) -> Option<u32> {
        self.graph(n).map(|g| g.first_state)
    }

    /// Initial state of the main graph.
    pub fn initial_state(&self) -> u32 {
        self.graphs.first().map_or(0, |g| g.first_state)
    }

    pub fn state(&self, id: u32) -> &State {
        &self.states[id as usize]
    }

    pub fn tag(&self, id: u32) -> &Tag {
        &self.tags[id as usize]
    }

    pub fn is_final(&self, id: u32) -> bool {
        self.states.get(id as usize).is_some_and(State::is_final)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variable_index.get(name).map(|&i| &self.variables[i])
    }

    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        let i = *self.variable_index.get(name)?;
        self.variables.get_mut(i)
    }

    /// Remove the backslash protection from the inflected forms and lemmas
    /// of all tags.
    pub fn unprotect_tags(&mut self) {
        for t in &mut self.tags {
            if let Some(s) = t.inflected.as_mut() {
                *s = tag::unprotect(s);
            }
            if let Some(s) = t.lemma.as_mut() {
                *s = tag::unprotect(s);
            }
        }
    }
}

#[cfg(test)]
pub(crate) const TWO_GRAPHS: &str = "0000000002\n\
-1 main\n\
: 0 1 -2 1\n\
t \n\
f \n\
-2 sub\n\
: 1 1\n\
t \n\
f \n\
%<E>\n\
%a/A\n\
f\n";
