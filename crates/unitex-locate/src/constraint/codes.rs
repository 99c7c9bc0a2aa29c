// Grammatical information of a tag: `V+z1:P3s:I3s`.

use crate::codes::flexional::FlexionalCode;

/// Semantic codes (grammatical category first) and inflectional codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrammaticalInfo {
    pub semantic: Vec<String>,
    pub inflectional: FlexionalCode,
}

impl GrammaticalInfo {
    /// Split `V+z1:P3s:I3s` into `[V, z1]` and `[P3s, I3s]`. A backslash
    /// protects the next character. Parsing stops at a trailing backslash,
    /// keeping the codes read so far.
    pub fn parse(s: &str) -> Self {
        let mut semantic = Vec::new();
        let mut inflectional = Vec::new();
        let mut chars = s.chars();

        let mut current = String::new();
        let mut in_flex = false;
        loop {
            match chars.next() {
                None => break,
                Some('\\') => match chars.next() {
                    Some(c) => current.push(c),
                    None => {
                        return Self::finish(semantic, inflectional);
                    }
                },
                Some('+') if !in_flex => semantic.push(std::mem::take(&mut current)),
                Some(':') => {
                    if in_flex {
                        inflectional.push(std::mem::take(&mut current));
                    } else {
                        semantic.push(std::mem::take(&mut current));
                        in_flex = true;
                    }
                }
                Some(c) => current.push(c),
            }
        }
        if in_flex {
            inflectional.push(current);
        } else {
            semantic.push(current);
        }
        Self::finish(semantic, inflectional)
    }

    fn finish(semantic: Vec<String>, inflectional: Vec<String>) -> Self {
        Self {
            semantic,
            inflectional: FlexionalCode::new(inflectional),
        }
    }

    /// Every semantic code of `required` appears in `self`, in any order.
    pub fn has_semantic_codes_of(&self, required: &GrammaticalInfo) -> bool {
        required
            .semantic
            .iter()
            .all(|code| self.semantic.iter().any(|c| c == code))
    }

    /// Semantic subset and inflectional compatibility: `DET+z1:mp` is
    /// compatible with `DET:m`.
    pub fn is_compatible_with(&self, required: &GrammaticalInfo) -> bool {
        self.has_semantic_codes_of(required) && self.inflectional.is_compatible(&required.inflectional)
    }
}
