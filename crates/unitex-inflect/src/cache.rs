// Flexional transducers by name, each loaded at most once.

use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use unitex_fst2::{Automaton, Fst2Error, Fst2Limits};

use crate::InflectError;

/// Source of flexional transducers.
pub trait TransducerLoader {
    fn load(&mut self, name: &str) -> Result<Automaton, Fst2Error>;
}

impl<F> TransducerLoader for F
where
    F: FnMut(&str) -> Result<Automaton, Fst2Error>,
{
    fn load(&mut self, name: &str) -> Result<Automaton, Fst2Error> {
        self(name)
    }
}

/// Loads `<dir>/<name>.fst2`.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
    limits: Fst2Limits,
}

impl DirectoryLoader {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            limits: Fst2Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Fst2Limits) -> Self {
        self.limits = limits;
        self
    }
}

impl TransducerLoader for DirectoryLoader {
    fn load(&mut self, name: &str) -> Result<Automaton, Fst2Error> {
        Automaton::load(self.dir.join(format!("{name}.fst2")), &self.limits)
    }
}

#[derive(Debug, Default, Clone)]
struct NameNode {
    children: HashMap<char, usize>,
    slot: Option<usize>,
}

/// Transducers indexed through a character trie over their names. A name
/// that failed to load keeps its slot, empty, and is never retried.
#[derive(Debug)]
pub struct TransducerCache<L> {
    loader: L,
    names: Vec<NameNode>,
    transducers: Vec<Option<Automaton>>,
    limit: usize,
}

impl<L: TransducerLoader> TransducerCache<L> {
    pub fn new(loader: L, limit: usize) -> Self {
        Self {
            loader,
            names: vec![NameNode::default()],
            transducers: Vec::new(),
            limit,
        }
    }

    /// Slot of transducer `name`, loading it on first request.
    pub fn get_transducer(&mut self, name: &str) -> Result<usize, InflectError> {
        let mut node = 0;
        for c in name.chars() {
            let existing = self.names[node].children.get(&c).copied();
            node = match existing {
                Some(child) => child,
                None => {
                    let child = self.names.len();
                    self.names.push(NameNode::default());
                    self.names[node].children.insert(c, child);
                    child
                }
            };
        }
        if let Some(slot) = self.names[node].slot {
            return Ok(slot);
        }
        if self.transducers.len() >= self.limit {
            return Err(InflectError::TooManyTransducers { limit: self.limit });
        }
        let automaton = match self.loader.load(name) {
            Ok(a) => {
                tracing::debug!(
                    transducer = name,
                    states = a.states.len(),
                    tags = a.tags.len(),
                    "flexional transducer loaded"
                );
                Some(a)
            }
            Err(e) => {
                tracing::warn!(transducer = name, error = %e, "cannot load flexional transducer");
                None
            }
        };
        let slot = self.transducers.len();
        self.transducers.push(automaton);
        self.names[node].slot = Some(slot);
        Ok(slot)
    }

    /// The transducer in `slot`, or `None` if it could not be loaded.
    pub fn transducer(&self, slot: usize) -> Option<&Automaton> {
        self.transducers.get(slot).and_then(Option::as_ref)
    }

    /// Number of names requested so far, loaded or not.
    pub fn len(&self) -> usize {
        self.transducers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transducers.is_empty()
    }
}
