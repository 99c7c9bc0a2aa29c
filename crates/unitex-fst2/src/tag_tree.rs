// Character trie over tag contents, used to find every transition of a
// state whose tag matches a piece of text.

use hashbrown::HashMap;
use unitex_core::alphabet::Alphabet;

use crate::automaton::{Automaton, Label};

/// How [`TagTree::matching`] consumes the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The whole text must be consumed.
    Exact,
    /// Keep the transitions of the deepest node reached that carries any.
    /// Used for languages written without spaces.
    LongestPrefix,
}

/// A transition stored in the trie: tag number and destination state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TagTarget {
    pub tag: u32,
    pub target: u32,
}

#[derive(Debug, Default, Clone)]
struct Node {
    children: HashMap<char, usize>,
    targets: Vec<TagTarget>,
}

#[derive(Debug, Clone)]
pub struct TagTree {
    nodes: Vec<Node>,
}

impl Default for TagTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TagTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Trie of the tag transitions leaving `state`, keyed by tag input.
    /// Sub-graph calls are not indexed.
    pub fn from_state(automaton: &Automaton, state: u32) -> Self {
        let mut tree = Self::new();
        for t in &automaton.state(state).transitions {
            if let Label::Tag(tag) = t.label {
                tree.insert(&automaton.tag(tag).input, tag, t.target);
            }
        }
        tree
    }

    /// Register `tag` (leading to `target`) under `content`. A tag already
    /// stored for the same content is kept once.
    pub fn insert(&mut self, content: &str, tag: u32, target: u32) {
        let mut node = 0;
        for c in content.chars() {
            let existing = self.nodes[node].children.get(&c).copied();
            node = match existing {
                Some(child) => child,
                None => {
                    let child = self.nodes.len();
                    self.nodes.push(Node::default());
                    self.nodes[node].children.insert(c, child);
                    child
                }
            };
        }
        add_target(&mut self.nodes[node].targets, TagTarget { tag, target });
    }

    /// Transitions whose tag content matches `text`. A trie character
    /// matches a text character if they are equal or if the text character
    /// is an uppercase form of it.
    pub fn matching(&self, text: &str, alphabet: &Alphabet, mode: MatchMode) -> Vec<TagTarget> {
        let text: Vec<char> = text.chars().collect();
        let mut result = Vec::new();
        let mut best_depth = 0;
        let mut pending = vec![(0usize, 0usize)];
        while let Some((node, pos)) = pending.pop() {
            let n = &self.nodes[node];
            match mode {
                MatchMode::Exact => {
                    if pos == text.len() {
                        for &t in &n.targets {
                            add_target(&mut result, t);
                        }
                        continue;
                    }
                }
                MatchMode::LongestPrefix => {
                    if !n.targets.is_empty() && pos >= best_depth {
                        if pos > best_depth {
                            result.clear();
                            best_depth = pos;
                        }
                        for &t in &n.targets {
                            add_target(&mut result, t);
                        }
                    }
                    if pos == text.len() {
                        continue;
                    }
                }
            }
            for (&c, &child) in &n.children {
                if alphabet.is_equal_or_case_equal(c, text[pos]) {
                    pending.push((child, pos + 1));
                }
            }
        }
        result
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

fn add_target(list: &mut Vec<TagTarget>, t: TagTarget) {
    if !list.iter().any(|x| x.tag == t.tag) {
        list.push(t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet() -> Alphabet {
        Alphabet::parse("Aa\nBb\nCc\nEe\nHh\nSs\nTt\n").unwrap()
    }

    #[test]
    fn exact_match_with_uppercase_text() {
        let mut tree = TagTree::new();
        tree.insert("chat", 0, 5);
        tree.insert("chats", 1, 6);
        let a = alphabet();
        assert_eq!(
            tree.matching("CHAT", &a, MatchMode::Exact),
            vec![TagTarget { tag: 0, target: 5 }]
        );
        assert!(tree.matching("cha", &a, MatchMode::Exact).is_empty());
    }

    #[test]
    fn uppercase_pattern_does_not_match_lowercase_text() {
        let mut tree = TagTree::new();
        tree.insert("Chat", 0, 1);
        assert!(tree.matching("chat", &alphabet(), MatchMode::Exact).is_empty());
    }

    #[test]
    fn same_tag_is_stored_once() {
        let mut tree = TagTree::new();
        tree.insert("a", 3, 1);
        tree.insert("a", 3, 2);
        tree.insert("a", 4, 2);
        let found = tree.matching("a", &alphabet(), MatchMode::Exact);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], TagTarget { tag: 3, target: 1 });
    }

    #[test]
    fn longest_prefix_keeps_deepest_node() {
        let mut tree = TagTree::new();
        tree.insert("c", 0, 1);
        tree.insert("cha", 1, 2);
        let a = alphabet();
        assert_eq!(
            tree.matching("chat", &a, MatchMode::LongestPrefix),
            vec![TagTarget { tag: 1, target: 2 }]
        );
        assert_eq!(
            tree.matching("cb", &a, MatchMode::LongestPrefix),
            vec![TagTarget { tag: 0, target: 1 }]
        );
    }

    #[test]
    fn built_from_state() {
        let text = "0000000001\n-1 main\n: 0 1 1 1\nt \nf \n%le\n%la\nf\n";
        let automaton = Automaton::from_text(text, &crate::Fst2Limits::default()).unwrap();
        let tree = TagTree::from_state(&automaton, 0);
        let a = Alphabet::parse("Ee\nLl\nAa\n").unwrap();
        assert_eq!(
            tree.matching("LA", &a, MatchMode::Exact),
            vec![TagTarget { tag: 1, target: 1 }]
        );
    }
}
