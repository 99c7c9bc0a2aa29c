// Transducer exploration: every path from the initial state edits the lemma
// and accumulates an output; every final state reached yields one form.
//
// A graph call explores the called graph first, collecting the (form,
// output) pairs of its final states, then resumes after the call once per
// pair.

use std::fmt::Write as _;
use std::path::Path;

use unitex_core::text::{encode_text, read_text};
use unitex_fst2::tag::EPSILON;
use unitex_fst2::{Automaton, Label};

use crate::cache::{DirectoryLoader, TransducerCache, TransducerLoader};
use crate::config::InflectOptions;
use crate::delas::DelasLine;
use crate::stack::InflectionStack;
use crate::InflectError;

/// A form produced by a transducer, with the codes accumulated on its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InflectedForm {
    pub inflected: String,
    pub output: String,
}

/// Counters of one dictionary run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InflectStats {
    /// Lines read, comments included.
    pub lines: usize,
    /// Entries inflected.
    pub entries: usize,
    /// DELAF lines written.
    pub forms: usize,
    /// Malformed lines and entries whose transducer failed.
    pub skipped: usize,
}

/// Every form `automaton` produces for `lemma`, in exploration order.
pub fn inflect_lemma(
    automaton: &Automaton,
    lemma: &str,
    options: &InflectOptions,
) -> Result<Vec<InflectedForm>, InflectError> {
    let explorer = Explorer { automaton, options };
    let mut forms = Vec::new();
    explorer.explore(automaton.initial_state(), lemma, "", 0, &mut forms)?;
    Ok(forms)
}

struct Explorer<'a> {
    automaton: &'a Automaton,
    options: &'a InflectOptions,
}

impl Explorer<'_> {
    fn explore(
        &self,
        state: u32,
        form: &str,
        output: &str,
        depth: usize,
        forms: &mut Vec<InflectedForm>,
    ) -> Result<(), InflectError> {
        if depth > self.options.max_call_depth {
            return Err(InflectError::RecursionLimit {
                limit: self.options.max_call_depth,
            });
        }
        if self.automaton.is_final(state) {
            forms.push(InflectedForm {
                inflected: form.to_string(),
                output: output.to_string(),
            });
        }
        for t in &self.automaton.state(state).transitions {
            match t.label {
                Label::SubGraph(graph) => {
                    let Some(start) = self.automaton.graph_start(graph) else {
                        continue;
                    };
                    let mut returned = Vec::new();
                    self.explore(start, form, output, depth + 1, &mut returned)?;
                    for r in returned {
                        self.explore(t.target, &r.inflected, &r.output, depth + 1, forms)?;
                    }
                }
                Label::Tag(tag) => {
                    let tag = self.automaton.tag(tag);
                    let mut next_output = output.to_string();
                    if tag.output != EPSILON {
                        next_output.push_str(&tag.output);
                    }
                    let next_form = if tag.is_epsilon() {
                        form.to_string()
                    } else {
                        let mut stack = InflectionStack::new(form, self.options.max_stack_chars)?;
                        stack.apply(&tag.input)?;
                        stack.finish()?
                    };
                    self.explore(t.target, &next_form, &next_output, depth + 1, forms)?;
                }
            }
        }
        Ok(())
    }
}

/// Inflects DELAS entries with transducers obtained from a loader.
#[derive(Debug)]
pub struct Inflector<L> {
    cache: TransducerCache<L>,
    options: InflectOptions,
}

impl Inflector<DirectoryLoader> {
    /// Transducers are read from `<dir>/<name>.fst2`.
    pub fn from_directory(dir: impl AsRef<Path>, options: InflectOptions) -> Self {
        Self::new(DirectoryLoader::new(dir), options)
    }
}

impl<L: TransducerLoader> Inflector<L> {
    pub fn new(loader: L, options: InflectOptions) -> Self {
        Self {
            cache: TransducerCache::new(loader, options.max_transducers),
            options,
        }
    }

    pub fn options(&self) -> &InflectOptions {
        &self.options
    }

    pub fn cache(&self) -> &TransducerCache<L> {
        &self.cache
    }

    /// Forms of one entry. `None` if its transducer could not be loaded.
    pub fn inflect_entry(
        &mut self,
        entry: &DelasLine,
    ) -> Result<Option<Vec<InflectedForm>>, InflectError> {
        let slot = self.cache.get_transducer(&entry.transducer)?;
        let Some(automaton) = self.cache.transducer(slot) else {
            return Ok(None);
        };
        inflect_lemma(automaton, &entry.lemma, &self.options).map(Some)
    }

    /// Write to `out` the DELAF line of every form of `entry`:
    /// `inflected,lemma.code[:]output comment`. Returns the number of lines.
    pub fn write_entry(
        &mut self,
        entry: &DelasLine,
        out: &mut String,
    ) -> Result<Option<usize>, InflectError> {
        let Some(forms) = self.inflect_entry(entry)? else {
            return Ok(None);
        };
        for form in &forms {
            let colon = self.options.add_colon
                && !form.output.is_empty()
                && !form.output.starts_with(':');
            let _ = writeln!(
                out,
                "{},{}.{}{}{}{}",
                form.inflected,
                entry.lemma,
                entry.code,
                if colon { ":" } else { "" },
                form.output,
                entry.comment
            );
        }
        Ok(Some(forms.len()))
    }

    /// Inflect a whole DELAS text into `out`.
    ///
    /// Malformed lines, entries whose transducer cannot be loaded and
    /// entries whose exploration fails are logged and skipped. Only
    /// exceeding the transducer limit stops the run.
    pub fn inflect_text(
        &mut self,
        delas: &str,
        out: &mut String,
    ) -> Result<InflectStats, InflectError> {
        let mut stats = InflectStats::default();
        for (i, line) in delas.lines().enumerate() {
            let line_no = i + 1;
            stats.lines += 1;
            let entry = match DelasLine::parse(line, self.options.keep_digits) {
                Ok(Some(entry)) => entry,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(line = line_no, error = %e, "DELAS line skipped");
                    stats.skipped += 1;
                    continue;
                }
            };
            match self.write_entry(&entry, out) {
                Ok(Some(n)) => {
                    stats.entries += 1;
                    stats.forms += n;
                }
                Ok(None) => stats.skipped += 1,
                Err(e @ InflectError::TooManyTransducers { .. }) => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        line = line_no,
                        lemma = %entry.lemma,
                        transducer = %entry.transducer,
                        error = %e,
                        "entry not inflected"
                    );
                    stats.skipped += 1;
                }
            }
        }
        Ok(stats)
    }
}

/// Inflect the DELAS file `delas` into the DELAF file `result`, reading
/// transducers from `dir`. The result is written in the encoding of the
/// DELAS.
pub fn inflect_dictionary(
    delas: impl AsRef<Path>,
    result: impl AsRef<Path>,
    dir: impl AsRef<Path>,
    options: InflectOptions,
) -> Result<InflectStats, InflectError> {
    let (content, encoding) = read_text(delas.as_ref())?;
    let mut inflector = Inflector::from_directory(dir, options);
    let mut out = String::new();
    let stats = inflector.inflect_text(&content, &mut out)?;
    std::fs::write(result.as_ref(), encode_text(&out, encoding))?;
    tracing::info!(
        lines = stats.lines,
        entries = stats.entries,
        forms = stats.forms,
        skipped = stats.skipped,
        transducers = inflector.cache().len(),
        "dictionary inflected"
    );
    Ok(stats)
}
