// Alphabet: letter classification and uppercase variants.
//
// An alphabet file lists one letter per line:
//   Aa     uppercase `A` with lowercase `a`
//   ß      a letter without case distinction (both upper and lower)
//   #AZ    an interval; every member is its own upper/lower variant
//
// Case handling in Unitex is alphabet-driven, never derived from Unicode
// tables: a letter is only "uppercase" if the alphabet says so.

use std::path::Path;

use hashbrown::HashMap;

use crate::CoreError;
use crate::text;

const UPPER: u8 = 1;
const LOWER: u8 = 2;

/// Letter table loaded from a Unitex alphabet file.
#[derive(Debug, Clone, Default)]
pub struct Alphabet {
    /// Case bits per letter (`UPPER`, `LOWER`).
    classes: HashMap<char, u8>,
    /// For each lowercase letter, the letters accepted as its uppercase form.
    variants: HashMap<char, Vec<char>>,
}

impl Alphabet {
    /// Create an empty alphabet (no character is a letter).
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an alphabet file (UTF-16LE or UTF-8).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let (content, _) = text::read_text(path)?;
        Self::parse(&content)
    }

    /// Parse the content of an alphabet file.
    pub fn parse(content: &str) -> Result<Self, CoreError> {
        let mut alphabet = Self::new();
        for line in content.lines() {
            let mut chars = line.chars();
            let Some(first) = chars.next() else {
                continue;
            };
            if first == '#' {
                let (Some(from), Some(to)) = (chars.next(), chars.next()) else {
                    continue;
                };
                if from > to {
                    return Err(CoreError::InvalidInterval { from, to });
                }
                for c in from..=to {
                    alphabet.add_pair(c, c);
                }
                continue;
            }
            match chars.next() {
                Some(lower) => {
                    alphabet.mark(first, UPPER);
                    alphabet.mark(lower, LOWER);
                    alphabet.variants.entry(lower).or_default().push(first);
                }
                None => alphabet.add_pair(first, first),
            }
        }
        Ok(alphabet)
    }

    /// Register `upper` as an uppercase form of `lower`.
    pub fn add_pair(&mut self, lower: char, upper: char) {
        self.mark(upper, UPPER);
        self.mark(lower, LOWER);
        self.variants.entry(lower).or_default().push(upper);
    }

    fn mark(&mut self, c: char, bit: u8) {
        *self.classes.entry(c).or_insert(0) |= bit;
    }

    pub fn is_upper(&self, c: char) -> bool {
        self.classes.get(&c).is_some_and(|b| b & UPPER != 0)
    }

    pub fn is_lower(&self, c: char) -> bool {
        self.classes.get(&c).is_some_and(|b| b & LOWER != 0)
    }

    pub fn is_letter(&self, c: char) -> bool {
        self.classes.contains_key(&c)
    }

    /// Uppercase variants registered for `lower` (empty if none).
    pub fn uppercase_variants(&self, lower: char) -> &[char] {
        self.variants.get(&lower).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `upper` is one of the uppercase forms of `lower`.
    pub fn is_upper_of(&self, lower: char, upper: char) -> bool {
        self.uppercase_variants(lower).contains(&upper)
    }

    /// A text character matches a pattern character if it is the same
    /// character or one of its uppercase forms.
    pub fn is_equal_or_case_equal(&self, pattern: char, text: char) -> bool {
        pattern == text || self.is_upper_of(pattern, text)
    }

    /// Character-wise [`is_equal_or_case_equal`](Self::is_equal_or_case_equal)
    /// over two strings of the same length.
    ///
    /// `"Paris"` matches the pattern `"paris"`, but `"paris"` does not match
    /// the pattern `"Paris"`.
    pub fn is_equal_or_uppercase(&self, pattern: &str, text: &str) -> bool {
        let mut p = pattern.chars();
        let mut t = text.chars();
        loop {
            match (p.next(), t.next()) {
                (None, None) => return true,
                (Some(a), Some(b)) if self.is_equal_or_case_equal(a, b) => {}
                _ => return false,
            }
        }
    }

    pub fn all_letters(&self, s: &str) -> bool {
        s.chars().all(|c| self.is_letter(c))
    }

    pub fn all_lower(&self, s: &str) -> bool {
        s.chars().all(|c| self.is_lower(c))
    }

    pub fn all_upper(&self, s: &str) -> bool {
        s.chars().all(|c| self.is_upper(c))
    }

    /// Rewrite a regular expression so that each lowercase letter also
    /// accepts its uppercase forms: `.+e` becomes `.+[eE]`.
    ///
    /// Inside a bracket set the variants are appended without new brackets.
    /// Escaped characters are copied untouched; a trailing backslash is kept
    /// so the regex compiler can report it.
    pub fn letter_set_pattern(&self, src: &str) -> String {
        let mut dest = String::with_capacity(src.len() * 2);
        let mut inside_set = false;
        let mut chars = src.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    dest.push(c);
                    match chars.next() {
                        Some(escaped) => dest.push(escaped),
                        None => break,
                    }
                }
                '[' => {
                    inside_set = true;
                    dest.push(c);
                }
                ']' => {
                    inside_set = false;
                    dest.push(c);
                }
                _ if self.is_lower(c) => {
                    if !inside_set {
                        dest.push('[');
                    }
                    dest.push(c);
                    dest.extend(self.uppercase_variants(c).iter().filter(|&&u| u != c));
                    if !inside_set {
                        dest.push(']');
                    }
                }
                _ => dest.push(c),
            }
        }
        dest
    }
}

#[cfg(test)]
pub(crate) fn test_alphabet() -> Alphabet {
    let mut content = String::new();
    for (upper, lower) in ('A'..='Z').zip('a'..='z') {
        content.push(upper);
        content.push(lower);
        content.push('\n');
    }
    content.push_str("\u{00C9}\u{00E9}\nE\u{00E9}\n");
    Alphabet::parse(&content).expect("valid alphabet")
}
