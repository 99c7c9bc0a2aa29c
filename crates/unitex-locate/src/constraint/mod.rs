// Constraints: the matching predicate derived from a grammar tag.
//
// A text automaton carries two kinds of tags: raw tokens (`chat`, `,`) and
// DELAF entries (`{chats,chat.N:mp}`). A grammar tag is turned once into a
// `Constraint`, then checked against any number of text tags.
//
// Decision order:
//   1. raw or meta constraints compare the raw token, or the inflected form
//      of an entry
//   2. a raw text token only matches raw or meta constraints; a lexical
//      mask fails on it, negated or not
//   3. lexical masks compare lemma, inflected form and codes of an entry
// The results of rules 1 and 3 are inverted when the constraint is negated.

pub mod codes;

use unitex_core::alphabet::Alphabet;
use unitex_core::dela::DelaEntry;
use unitex_fst2::tag::Tag;

use crate::ConstraintError;
use crate::codes::flexional::FlexionalCode;
pub use codes::GrammaticalInfo;

/// Class of a `<MOT>`-like meta tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetaClass {
    /// `<MOT>`: any letter sequence.
    Mot,
    /// `<DIC>`: a word found in the dictionaries.
    Dic,
    /// `<MAJ>`: uppercase letters only.
    Maj,
    /// `<MIN>`: lowercase letters only.
    Min,
    /// `<PRE>`: first letter uppercase.
    Pre,
    /// `<NB>`: a sequence of digits.
    Nb,
    /// `<TOKEN>`: any token. Tags carrying only a filter get this input.
    Token,
    /// Any other bracketed tag. No rule applies.
    Other(String),
}

impl MetaClass {
    pub fn from_name(name: &str) -> Self {
        match name {
            "MOT" => Self::Mot,
            "DIC" => Self::Dic,
            "MAJ" => Self::Maj,
            "MIN" => Self::Min,
            "PRE" => Self::Pre,
            "NB" => Self::Nb,
            "TOKEN" => Self::Token,
            other => Self::Other(other.to_string()),
        }
    }

    fn from_known_name(name: &str) -> Option<Self> {
        match Self::from_name(name) {
            Self::Other(_) => None,
            class => Some(class),
        }
    }
}

/// A tag of the text automaton, as seen by constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextTag {
    /// A token that is not in the dictionaries.
    Raw(String),
    /// A dictionary entry.
    Entry {
        inflected: String,
        lemma: String,
        info: GrammaticalInfo,
    },
}

impl TextTag {
    /// Tags carrying both an inflected form and a lemma are entries; any
    /// other tag is a raw token.
    pub fn from_tag(tag: &Tag) -> Self {
        match (&tag.inflected, &tag.lemma) {
            (Some(inflected), Some(lemma)) => Self::Entry {
                inflected: inflected.clone(),
                lemma: lemma.clone(),
                info: GrammaticalInfo::parse(tag.codes.as_deref().unwrap_or("")),
            },
            _ => Self::Raw(tag.input.clone()),
        }
    }

    pub fn from_entry(entry: &DelaEntry) -> Self {
        Self::Entry {
            inflected: entry.inflected.clone(),
            lemma: entry.lemma.clone(),
            info: GrammaticalInfo {
                semantic: entry.semantic_codes.clone(),
                inflectional: FlexionalCode::from_entry(entry),
            },
        }
    }

    /// The surface form: the token itself, or the inflected form.
    pub fn word(&self) -> &str {
        match self {
            Self::Raw(s) => s,
            Self::Entry { inflected, .. } => inflected,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, Self::Entry { .. })
    }
}

/// Matching predicate built from a grammar tag or a grammar tag output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// A literal token. With `case_variants`, uppercase forms of its letters
    /// are accepted in the text.
    Literal {
        text: String,
        case_variants: bool,
        negated: bool,
    },
    Meta {
        class: MetaClass,
        negated: bool,
    },
    /// `<le>` or `<DET>`: both readings are tried, the code reading first.
    /// The alternative carries no negation of its own.
    LemmaOnly {
        lemma: String,
        alternative: Option<Box<Constraint>>,
        negated: bool,
    },
    /// `<le.DET>`
    LemmaWithCodes {
        lemma: String,
        info: GrammaticalInfo,
        negated: bool,
    },
    /// `<les,le.DET:mp>`
    Full {
        inflected: String,
        lemma: String,
        info: GrammaticalInfo,
        negated: bool,
    },
    /// `<les,le>`: an inflected form and a lemma without codes. Only
    /// produced from outputs; no rule applies to it.
    InflectedLemma {
        inflected: String,
        lemma: String,
        negated: bool,
    },
    /// Codes only, as the alternative reading of `<DET>`.
    CodesOnly {
        info: GrammaticalInfo,
        negated: bool,
    },
}

impl Constraint {
    /// Build the constraint of a grammar tag. Tags that consume nothing
    /// (`<E>`, variable and context marks) have none.
    pub fn from_tag(tag: &Tag) -> Option<Self> {
        if tag.is_epsilon() || tag.is_variable() || tag.is_context_mark() {
            return None;
        }
        let negated = tag.is_negated();
        if !tag.is_lexical_mask() {
            if let Some(name) = meta_name(&tag.input) {
                return Some(Self::Meta {
                    class: MetaClass::from_name(name),
                    negated,
                });
            }
            return Some(Self::Literal {
                text: tag.input.clone(),
                case_variants: tag.allows_case_variants(),
                negated,
            });
        }
        let codes = tag.codes.as_deref();
        let constraint = match (&tag.inflected, &tag.lemma) {
            (Some(word), None) if codes.is_none() => Self::lemma_or_codes(word, negated),
            (Some(inflected), Some(lemma)) => match codes {
                Some(codes) => Self::Full {
                    inflected: inflected.clone(),
                    lemma: lemma.clone(),
                    info: GrammaticalInfo::parse(codes),
                    negated,
                },
                None => Self::InflectedLemma {
                    inflected: inflected.clone(),
                    lemma: lemma.clone(),
                    negated,
                },
            },
            (None, Some(lemma)) => Self::LemmaWithCodes {
                lemma: lemma.clone(),
                info: GrammaticalInfo::parse(codes.unwrap_or("")),
                negated,
            },
            _ => Self::CodesOnly {
                info: GrammaticalInfo::parse(codes.unwrap_or("")),
                negated,
            },
        };
        Some(constraint)
    }

    /// Build the constraint expressed by a grammar tag output, e.g.
    /// `<DET>`, `<!MOT>`, `<le.DET>`, `<les,le.DET:mp>` or a plain token.
    /// `{...}` is read like `<...>`. An empty output has no constraint.
    pub fn from_transduction(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let open = chars.next()?;
        if open != '<' && open != '{' {
            return Some(Self::Literal {
                text: s.to_string(),
                case_variants: false,
                negated: false,
            });
        }
        let mut body = chars.as_str();
        let negated = match body.strip_prefix('!') {
            Some(rest) => {
                body = rest;
                true
            }
            None => false,
        };
        let stop = body.find([',', '.', '>', '}']).unwrap_or(body.len());
        let first = &body[..stop];
        let rest = &body[stop..];
        let constraint = match rest.chars().next() {
            Some(',') => {
                let rest = &rest[1..];
                let stop = rest.find(['.', '>', '}']).unwrap_or(rest.len());
                let lemma = &rest[..stop];
                match rest[stop..].strip_prefix('.') {
                    Some(codes) => Self::Full {
                        inflected: first.to_string(),
                        lemma: lemma.to_string(),
                        info: GrammaticalInfo::parse(until_close(codes)),
                        negated,
                    },
                    None => Self::InflectedLemma {
                        inflected: first.to_string(),
                        lemma: lemma.to_string(),
                        negated,
                    },
                }
            }
            Some('.') => Self::LemmaWithCodes {
                lemma: first.to_string(),
                info: GrammaticalInfo::parse(until_close(&rest[1..])),
                negated,
            },
            _ => match MetaClass::from_known_name(first) {
                Some(class) => Self::Meta { class, negated },
                None => Self::lemma_or_codes(first, negated),
            },
        };
        Some(constraint)
    }

    fn lemma_or_codes(word: &str, negated: bool) -> Self {
        Self::LemmaOnly {
            lemma: word.to_string(),
            alternative: Some(Box::new(Self::CodesOnly {
                info: GrammaticalInfo::parse(word),
                negated: false,
            })),
            negated,
        }
    }

    pub fn is_negated(&self) -> bool {
        match self {
            Self::Literal { negated, .. }
            | Self::Meta { negated, .. }
            | Self::LemmaOnly { negated, .. }
            | Self::LemmaWithCodes { negated, .. }
            | Self::Full { negated, .. }
            | Self::InflectedLemma { negated, .. }
            | Self::CodesOnly { negated, .. } => *negated,
        }
    }

    /// The same constraint with its negation flag set to `value`.
    pub fn with_negation(mut self, value: bool) -> Self {
        match &mut self {
            Self::Literal { negated, .. }
            | Self::Meta { negated, .. }
            | Self::LemmaOnly { negated, .. }
            | Self::LemmaWithCodes { negated, .. }
            | Self::Full { negated, .. }
            | Self::InflectedLemma { negated, .. }
            | Self::CodesOnly { negated, .. } => *negated = value,
        }
        self
    }

    /// Whether `tag` satisfies the constraint.
    ///
    /// Fails on shapes no rule applies to: an inflected form and a lemma
    /// without codes, an unknown meta tag applied to a word, or a
    /// `LemmaOnly` without its alternative.
    pub fn check(&self, tag: &TextTag, alphabet: &Alphabet) -> Result<bool, ConstraintError> {
        let negated = self.is_negated();
        match self {
            Self::Literal {
                text,
                case_variants,
                ..
            } => {
                let word = tag.word();
                let x = if *case_variants {
                    alphabet.is_equal_or_uppercase(text, word)
                } else {
                    text == word
                };
                return Ok(x != negated);
            }
            Self::Meta { class, .. } => return self.check_meta(class, tag, alphabet),
            _ => {}
        }
        let TextTag::Entry {
            inflected: tag_inflected,
            lemma: tag_lemma,
            info: tag_info,
        } = tag
        else {
            return Ok(false);
        };
        let x = match self {
            Self::LemmaOnly {
                lemma, alternative, ..
            } => {
                let alternative = alternative
                    .as_deref()
                    .ok_or_else(|| ConstraintError::MissingAlternative(format!("{self:?}")))?;
                alternative.check(tag, alphabet)? || tag_lemma == lemma
            }
            Self::LemmaWithCodes { lemma, info, .. } => {
                tag_lemma == lemma && tag_info.is_compatible_with(info)
            }
            Self::Full {
                inflected,
                lemma,
                info,
                ..
            } => {
                alphabet.is_equal_or_uppercase(inflected, tag_inflected)
                    && tag_lemma == lemma
                    && tag_info.is_compatible_with(info)
            }
            Self::CodesOnly { info, .. } => tag_info.is_compatible_with(info),
            _ => {
                return Err(ConstraintError::UnreachableConstraintShape(format!(
                    "{self:?}"
                )));
            }
        };
        Ok(x != negated)
    }

    fn check_meta(
        &self,
        class: &MetaClass,
        tag: &TextTag,
        alphabet: &Alphabet,
    ) -> Result<bool, ConstraintError> {
        let negated = self.is_negated();
        let word = tag.word();
        match class {
            MetaClass::Token => return Ok(!negated),
            MetaClass::Nb => {
                let x = !word.is_empty() && word.chars().all(|c| c.is_ascii_digit());
                return Ok(x != negated);
            }
            _ => {}
        }
        let Some(first) = word.chars().next().filter(|&c| alphabet.is_letter(c)) else {
            return Ok(negated);
        };
        let x = match class {
            MetaClass::Mot => true,
            MetaClass::Dic => tag.is_entry(),
            MetaClass::Pre => alphabet.is_upper(first),
            MetaClass::Min => alphabet.all_lower(word),
            MetaClass::Maj => alphabet.all_upper(word),
            MetaClass::Nb | MetaClass::Token | MetaClass::Other(_) => {
                return Err(ConstraintError::UnreachableConstraintShape(format!(
                    "{self:?}"
                )));
            }
        };
        Ok(x != negated)
    }

    /// [`check`](Self::check), with shape errors logged and treated as a
    /// failed match.
    pub fn is_satisfied_by(&self, tag: &TextTag, alphabet: &Alphabet) -> bool {
        self.check(tag, alphabet).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "constraint cannot be evaluated");
            false
        })
    }
}

/// Name of a bracketed raw tag: `<MOT>` and `<!MOT>` give `MOT`.
fn meta_name(input: &str) -> Option<&str> {
    let inner = input.strip_prefix('<')?;
    if inner.is_empty() {
        return None;
    }
    let inner = inner.strip_prefix('!').unwrap_or(inner);
    Some(inner.strip_suffix('>').unwrap_or(inner))
}

fn until_close(s: &str) -> &str {
    let end = s.find(['>', '}']).unwrap_or(s.len());
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphabet() -> Alphabet {
        let mut content = String::new();
        for (upper, lower) in ('A'..='Z').zip('a'..='z') {
            content.push(upper);
            content.push(lower);
            content.push('\n');
        }
        Alphabet::parse(&content).unwrap()
    }

    fn grammar(line: &str) -> Constraint {
        Constraint::from_tag(&Tag::parse(line).unwrap()).unwrap()
    }

    fn entry(line: &str) -> TextTag {
        TextTag::from_entry(&DelaEntry::parse(line).unwrap())
    }

    fn raw(s: &str) -> TextTag {
        TextTag::Raw(s.to_string())
    }

    #[test]
    fn epsilon_has_no_constraint() {
        assert_eq!(Constraint::from_tag(&Tag::parse("%<E>").unwrap()), None);
        assert_eq!(Constraint::from_tag(&Tag::parse("%$a(").unwrap()), None);
    }

    #[test]
    fn literal() {
        let a = alphabet();
        let c = grammar("%chat");
        assert!(c.check(&raw("chat"), &a).unwrap());
        assert!(!c.check(&raw("Chat"), &a).unwrap());
        assert!(c.check(&entry("chat,.N"), &a).unwrap());
    }

    #[test]
    fn literal_with_case_variants() {
        let a = alphabet();
        let c = grammar("@paris");
        assert!(c.check(&raw("Paris"), &a).unwrap());
        assert!(c.check(&raw("PARIS"), &a).unwrap());
        assert!(!c.check(&raw("Pari"), &a).unwrap());
    }

    #[test]
    fn meta_classes_on_raw_tokens() {
        let a = alphabet();
        assert!(grammar("%<MOT>").check(&raw("chat"), &a).unwrap());
        assert!(!grammar("%<MOT>").check(&raw(","), &a).unwrap());
        assert!(!grammar("%<DIC>").check(&raw("chat"), &a).unwrap());
        assert!(grammar("%<PRE>").check(&raw("Paris"), &a).unwrap());
        assert!(!grammar("%<PRE>").check(&raw("paris"), &a).unwrap());
        assert!(grammar("%<MIN>").check(&raw("paris"), &a).unwrap());
        assert!(!grammar("%<MIN>").check(&raw("Paris"), &a).unwrap());
        assert!(grammar("%<MAJ>").check(&raw("ONU"), &a).unwrap());
        assert!(!grammar("%<MAJ>").check(&raw("Onu"), &a).unwrap());
    }

    #[test]
    fn negated_meta_on_non_letter() {
        let a = alphabet();
        assert!(grammar("%<!MOT>").check(&raw(","), &a).unwrap());
        assert!(grammar("%<!MOT>").check(&raw(""), &a).unwrap());
        assert!(!grammar("%<!MOT>").check(&raw("chat"), &a).unwrap());
    }

    #[test]
    fn dic_matches_entries() {
        let a = alphabet();
        assert!(grammar("%<DIC>").check(&entry("chat,.N"), &a).unwrap());
        assert!(!grammar("%<!DIC>").check(&entry("chat,.N"), &a).unwrap());
    }

    #[test]
    fn meta_partition_on_letter_tokens() {
        let a = alphabet();
        for word in ["chat", "Paris", "ONU"] {
            let mot = grammar("%<MOT>").check(&raw(word), &a).unwrap();
            let dic = grammar("%<DIC>").check(&raw(word), &a).unwrap();
            assert!(mot && !dic, "{word}");
        }
    }

    #[test]
    fn unknown_meta_is_a_shape_error() {
        let a = alphabet();
        let c = Constraint::Meta {
            class: MetaClass::from_name("XYZ"),
            negated: false,
        };
        assert!(matches!(
            c.check(&raw("chat"), &a),
            Err(ConstraintError::UnreachableConstraintShape(_))
        ));
        assert!(!c.is_satisfied_by(&raw("chat"), &a));
    }

    #[test]
    fn token_matches_anything() {
        let a = alphabet();
        let c = grammar("%<TOKEN>");
        assert_eq!(
            c,
            Constraint::Meta {
                class: MetaClass::Token,
                negated: false
            }
        );
        for t in [raw("chat"), raw(","), raw("12"), entry("rarement,.ADV")] {
            assert!(c.check(&t, &a).unwrap(), "{t:?}");
            assert!(!grammar("%<!TOKEN>").check(&t, &a).unwrap(), "{t:?}");
        }
    }

    #[test]
    fn nb_matches_digit_sequences() {
        let a = alphabet();
        let c = grammar("%<NB>");
        assert!(c.check(&raw("1984"), &a).unwrap());
        assert!(!c.check(&raw("chat"), &a).unwrap());
        assert!(!c.check(&raw("12a"), &a).unwrap());
        assert!(!c.check(&raw(","), &a).unwrap());
        assert!(grammar("%<!NB>").check(&raw("chat"), &a).unwrap());
        assert!(!grammar("%<!NB>").check(&raw("7"), &a).unwrap());
    }

    #[test]
    fn raw_token_needs_raw_constraint() {
        let a = alphabet();
        assert!(!grammar("%<N>").check(&raw("chat"), &a).unwrap());
        assert!(!grammar("%<chat.N>").check(&raw("chat"), &a).unwrap());
    }

    #[test]
    fn lemma_or_code() {
        let a = alphabet();
        let le = entry("les,le.DET:mp");
        assert!(grammar("%<DET>").check(&le, &a).unwrap());
        assert!(grammar("%<le>").check(&le, &a).unwrap());
        assert!(!grammar("%<N>").check(&le, &a).unwrap());
        assert!(!grammar("%<la>").check(&le, &a).unwrap());
    }

    #[test]
    fn lemma_with_codes() {
        let a = alphabet();
        let c = grammar("%<le.DET:p>");
        assert!(c.check(&entry("les,le.DET:mp"), &a).unwrap());
        assert!(!c.check(&entry("le,le.DET:ms"), &a).unwrap());
        assert!(!c.check(&entry("les,les.DET:mp"), &a).unwrap());
    }

    #[test]
    fn full_mask() {
        let a = alphabet();
        let c = grammar("%<les,le.DET>");
        assert!(c.check(&entry("les,le.DET:mp"), &a).unwrap());
        assert!(c.check(&entry("LES,le.DET:mp"), &a).unwrap());
        assert!(!c.check(&entry("la,le.DET:fs"), &a).unwrap());
    }

    fn assert_negation_flips(lines: &[&str], tags: &[TextTag]) {
        let a = alphabet();
        for line in lines {
            let c = grammar(line);
            let n = c.clone().with_negation(true);
            for t in tags {
                assert_eq!(
                    n.check(t, &a).unwrap(),
                    !c.check(t, &a).unwrap(),
                    "{line} on {t:?}"
                );
            }
        }
    }

    #[test]
    fn negation_symmetry() {
        let raw_tags = [raw("chat"), raw(","), raw("Paris"), raw("42")];
        let entries = [entry("les,le.DET:mp"), entry("chat,.N+z1:ms")];
        let surface = [
            "%chat", "@paris", "%<MOT>", "%<DIC>", "%<MIN>", "%<MAJ>", "%<PRE>", "%<NB>",
            "%<TOKEN>",
        ];
        assert_negation_flips(&surface, &raw_tags);
        assert_negation_flips(&surface, &entries);
        let lexical = ["%<DET>", "%<le>", "%<le.DET>", "%<les,le.DET:p>", "%<N+z1>"];
        assert_negation_flips(&lexical, &entries);
    }

    #[test]
    fn negated_lexical_mask_fails_on_raw_token() {
        let a = alphabet();
        for line in ["%<!DET>", "%<!le.DET>", "%<!les,le.DET:p>"] {
            assert!(!grammar(line).check(&raw("chat"), &a).unwrap(), "{line}");
        }
    }

    #[test]
    fn missing_alternative_is_reported() {
        let a = alphabet();
        let c = Constraint::LemmaOnly {
            lemma: "le".to_string(),
            alternative: None,
            negated: false,
        };
        assert!(matches!(
            c.check(&entry("le,.DET"), &a),
            Err(ConstraintError::MissingAlternative(_))
        ));
        assert!(!c.is_satisfied_by(&entry("le,.DET"), &a));
    }

    #[test]
    fn transduction_shapes() {
        assert_eq!(Constraint::from_transduction(""), None);
        assert!(matches!(
            Constraint::from_transduction("chat"),
            Some(Constraint::Literal { .. })
        ));
        assert_eq!(
            Constraint::from_transduction("<!MOT>"),
            Some(Constraint::Meta {
                class: MetaClass::Mot,
                negated: true
            })
        );
        assert!(matches!(
            Constraint::from_transduction("<DET>"),
            Some(Constraint::LemmaOnly { alternative: Some(_), .. })
        ));
        assert!(matches!(
            Constraint::from_transduction("<le.DET:ms>"),
            Some(Constraint::LemmaWithCodes { .. })
        ));
        assert!(matches!(
            Constraint::from_transduction("{les,le.DET:mp}"),
            Some(Constraint::Full { .. })
        ));
        assert!(matches!(
            Constraint::from_transduction("<les,le>"),
            Some(Constraint::InflectedLemma { .. })
        ));
    }

    #[test]
    fn inflected_lemma_without_codes_is_unreachable() {
        let a = alphabet();
        let c = Constraint::from_transduction("<les,le>").unwrap();
        assert!(matches!(
            c.check(&entry("les,le.DET:mp"), &a),
            Err(ConstraintError::UnreachableConstraintShape(_))
        ));
        // Raw tokens never reach the lexical rules.
        assert_eq!(c.check(&raw("les"), &a), Ok(false));
    }
}
