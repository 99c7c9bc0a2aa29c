// Tags (transition labels) of an .fst2 file and their decomposition.
//
// A tag line is `%input/output` or `@input/output`. The input may carry a
// morphological filter (`<<regex>>_opts_`) and, for lexical masks, an
// inflected form, a lemma and grammatical codes:
//   <avoir>             ambiguous: lemma or grammatical code
//   <avoir.V>           lemma + codes
//   <eu,avoir.V:Kms>    inflected + lemma + codes
//   {eu,avoir.V:Kms}    DELAF entry (empty lemma = inflected form)

use crate::Fst2Error;

bitflags::bitflags! {
    /// Control bits of a tag.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TagFlags: u8 {
        /// The tag has a non-empty output.
        const HAS_OUTPUT       = 1 << 0;
        /// `<!...>`: the lexical mask is negated.
        const NEGATION         = 1 << 1;
        /// `@` tag: uppercase variants of the input are accepted.
        const CASE_VARIANTS    = 1 << 2;
        /// `$name(`
        const VARIABLE_START   = 1 << 3;
        /// `$name)`
        const VARIABLE_END     = 1 << 4;
        /// `$[`
        const POSITIVE_CONTEXT = 1 << 5;
        /// `$![`
        const NEGATIVE_CONTEXT = 1 << 6;
        /// `$]`
        const CONTEXT_END      = 1 << 7;
    }
}

/// Meta tags that keep their bracketed form instead of being decomposed.
pub const META_TAGS: [&str; 7] = ["MOT", "DIC", "MAJ", "MIN", "PRE", "NB", "TOKEN"];

/// The empty-word tag.
pub const EPSILON: &str = "<E>";

/// One entry of the tag table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tag {
    /// Input without filter or output. For variable tags, the variable name.
    pub input: String,
    /// Output without the `/` separator; empty if none.
    pub output: String,
    pub inflected: Option<String>,
    pub lemma: Option<String>,
    /// Grammatical, semantic and inflectional codes, e.g. `V+t:P1s:P2s`.
    pub codes: Option<String>,
    /// Morphological filter including its delimiters, e.g. `<<^in>>_f_`.
    pub filter: Option<String>,
    pub flags: TagFlags,
}

impl Tag {
    /// Build a tag from one line of the tag table (including the leading
    /// `%` or `@`).
    pub fn parse(line: &str) -> Result<Self, Fst2Error> {
        let mut chars = line.chars();
        let case_variants = match chars.next() {
            Some('%') => false,
            Some('@') => true,
            _ => {
                return Err(Fst2Error::InvalidTag {
                    tag: line.to_string(),
                    reason: "a tag line must start with % or @",
                });
            }
        };
        let body = chars.as_str();
        let (content, output) = if body == "/" {
            ("/", "")
        } else {
            split_output(body)
        };
        let (input, filter) = split_filter(content);
        let input = if input.is_empty() { "<TOKEN>" } else { input };

        let mut tag = Tag {
            input: input.to_string(),
            ..Tag::default()
        };

        if let Some((name, flag)) = variable_name(input) {
            tag.input = name.to_string();
            tag.flags = flag;
            return Ok(tag);
        }
        match input {
            "$[" => tag.flags = TagFlags::POSITIVE_CONTEXT,
            "$![" => tag.flags = TagFlags::NEGATIVE_CONTEXT,
            "$]" => tag.flags = TagFlags::CONTEXT_END,
            _ => {}
        }
        if !tag.flags.is_empty() {
            return Ok(tag);
        }

        tag.filter = filter.map(str::to_string);
        tag.output = output.to_string();
        if !output.is_empty() {
            tag.flags |= TagFlags::HAS_OUTPUT;
        }
        if case_variants {
            tag.flags |= TagFlags::CASE_VARIANTS;
        }

        if input.starts_with(' ') || input.starts_with('#') || input == EPSILON {
            return Ok(tag);
        }
        if input.starts_with('{') {
            if input != "{S}" && input.chars().nth(1).is_some() {
                tag.decompose_braces(line)?;
            }
            return Ok(tag);
        }
        if input.starts_with('<') && input.chars().nth(1).is_some() {
            tag.decompose_angles(line)?;
        }
        Ok(tag)
    }

    /// `<...>` lexical masks.
    fn decompose_angles(&mut self, line: &str) -> Result<(), Fst2Error> {
        let invalid = |reason: &'static str| Fst2Error::InvalidTag {
            tag: line.to_string(),
            reason,
        };
        let mut rest = &self.input[1..];
        if let Some(r) = rest.strip_prefix('!') {
            self.flags |= TagFlags::NEGATION;
            rest = r;
        }
        let stop = rest
            .find([',', '.', '>'])
            .ok_or_else(|| invalid("missing closing >"))?;
        let (first, rest) = rest.split_at(stop);
        let (sep, rest) = split_first_char(rest);
        match sep {
            '>' => {
                if !META_TAGS.contains(&first) {
                    self.inflected = Some(first.to_string());
                }
            }
            ',' => {
                let stop = rest
                    .find(['.', '>'])
                    .ok_or_else(|| invalid("missing closing >"))?;
                let (lemma, rest) = rest.split_at(stop);
                if rest.starts_with('>') {
                    return Err(invalid("a lexical mask with a comma needs grammatical codes"));
                }
                let codes = until_close(&rest[1..], '>').ok_or_else(|| invalid("missing closing >"))?;
                self.inflected = Some(first.to_string());
                self.lemma = Some(lemma.to_string());
                self.codes = Some(codes.to_string());
            }
            _ => {
                let codes = until_close(rest, '>').ok_or_else(|| invalid("missing closing >"))?;
                self.lemma = Some(first.to_string());
                self.codes = Some(codes.to_string());
            }
        }
        Ok(())
    }

    /// `{inflected,lemma.codes}` DELAF tags.
    fn decompose_braces(&mut self, line: &str) -> Result<(), Fst2Error> {
        let invalid = || Fst2Error::InvalidTag {
            tag: line.to_string(),
            reason: "a tag must contain a valid DELAF line like {today,today.ADV}",
        };
        let rest = &self.input[1..];
        let comma = rest.find([',', '}']).ok_or_else(invalid)?;
        if !rest[comma..].starts_with(',') {
            return Err(invalid());
        }
        let inflected = &rest[..comma];
        let rest = &rest[comma + 1..];
        let (lemma, rest) = match rest.strip_prefix('.') {
            Some(r) => (inflected, r),
            None => {
                let point = rest.find(['.', '}']).ok_or_else(invalid)?;
                if !rest[point..].starts_with('.') {
                    return Err(invalid());
                }
                (&rest[..point], &rest[point + 1..])
            }
        };
        let codes = until_close(rest, '}').ok_or_else(invalid)?;
        self.inflected = Some(inflected.to_string());
        self.lemma = Some(lemma.to_string());
        self.codes = Some(codes.to_string());
        Ok(())
    }

    pub fn is_negated(&self) -> bool {
        self.flags.contains(TagFlags::NEGATION)
    }

    pub fn has_output(&self) -> bool {
        self.flags.contains(TagFlags::HAS_OUTPUT)
    }

    pub fn allows_case_variants(&self) -> bool {
        self.flags.contains(TagFlags::CASE_VARIANTS)
    }

    pub fn is_epsilon(&self) -> bool {
        self.input == EPSILON
    }

    pub fn is_variable(&self) -> bool {
        self.flags
            .intersects(TagFlags::VARIABLE_START | TagFlags::VARIABLE_END)
    }

    pub fn is_context_mark(&self) -> bool {
        self.flags.intersects(
            TagFlags::POSITIVE_CONTEXT | TagFlags::NEGATIVE_CONTEXT | TagFlags::CONTEXT_END,
        )
    }

    /// Whether the tag is a lexical mask (it has an inflected form, a
    /// lemma or codes) rather than a plain token.
    pub fn is_lexical_mask(&self) -> bool {
        self.inflected.is_some() || self.lemma.is_some() || self.codes.is_some()
    }
}

/// Split at the first `/` not preceded by a backslash. The first character
/// always belongs to the input.
fn split_output(body: &str) -> (&str, &str) {
    let mut prev = None;
    for (i, c) in body.char_indices() {
        if i > 0 && c == '/' && prev != Some('\\') {
            return (&body[..i], &body[i + 1..]);
        }
        prev = Some(c);
    }
    (body, "")
}

/// Separate the `<<...>>_opts_` filter from the input. Text after the
/// filter is dropped.
fn split_filter(content: &str) -> (&str, Option<&str>) {
    let Some(start) = content.find("<<") else {
        return (content, None);
    };
    let input = &content[..start];
    let rest = &content[start..];
    let Some(close) = rest.find(">>") else {
        return (input, Some(rest));
    };
    let mut end = close + 2;
    if rest[end..].starts_with('_') {
        end += 1 + rest[end + 1..].find('_').map_or(rest.len() - end - 1, |p| p + 1);
    }
    (input, Some(&rest[..end.min(rest.len())]))
}

fn variable_name(input: &str) -> Option<(&str, TagFlags)> {
    let name = input.strip_prefix('$')?;
    if input.chars().count() <= 2 {
        return None;
    }
    if let Some(n) = name.strip_suffix('(') {
        Some((n, TagFlags::VARIABLE_START))
    } else {
        name.strip_suffix(')').map(|n| (n, TagFlags::VARIABLE_END))
    }
}

fn split_first_char(s: &str) -> (char, &str) {
    let mut chars = s.chars();
    let c = chars.next().unwrap_or('\0');
    (c, chars.as_str())
}

fn until_close(s: &str, close: char) -> Option<&str> {
    s.find(close).map(|end| &s[..end])
}

/// Remove the backslash protection of a tag field: `l\'` becomes `l'`.
pub fn unprotect(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
