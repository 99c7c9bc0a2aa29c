// DELA dictionary entries: `inflected,lemma.CODE+sem1+sem2:flex1:flex2/comment`.

use crate::CoreError;

/// One DELAF line split into its parts.
///
/// `semantic_codes[0]` is the grammatical category (`N`, `V`, ...); the
/// remaining codes are the `+`-separated semantic features. Inflectional
/// codes are the `:`-separated strings that follow (`ms`, `fp`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DelaEntry {
    pub inflected: String,
    pub lemma: String,
    pub semantic_codes: Vec<String>,
    pub inflectional_codes: Vec<String>,
}

impl DelaEntry {
    /// Parse a DELAF line. A backslash protects the next character; `\=` is
    /// kept protected in the inflected form and the lemma since `=` has a
    /// special meaning there. An empty lemma stands for the inflected form.
    pub fn parse(line: &str) -> Result<Self, CoreError> {
        let invalid = |reason: &'static str| CoreError::InvalidDelaEntry {
            line: line.to_string(),
            reason,
        };
        let mut reader = FieldReader::new(line);

        let inflected = reader.read_until(&[','], true).map_err(invalid)?;
        if !reader.eat(',') {
            return Err(invalid("missing comma after the inflected form"));
        }
        let lemma = reader.read_until(&['.'], true).map_err(invalid)?;
        if !reader.eat('.') {
            return Err(invalid("missing point before the grammatical code"));
        }
        let lemma = if lemma.is_empty() { inflected.clone() } else { lemma };

        let mut semantic_codes = vec![reader.read_until(&['+', ':', '/'], false).map_err(invalid)?];
        while reader.eat('+') {
            semantic_codes.push(reader.read_until(&['+', ':', '/'], false).map_err(invalid)?);
        }
        let mut inflectional_codes = Vec::new();
        while reader.eat(':') {
            inflectional_codes.push(reader.read_until(&[':', '/'], false).map_err(invalid)?);
        }
        Ok(Self {
            inflected,
            lemma,
            semantic_codes,
            inflectional_codes,
        })
    }

    /// The grammatical category, e.g. `N` in `chat,.N+z1:ms`.
    pub fn grammatical_code(&self) -> &str {
        self.semantic_codes.first().map(String::as_str).unwrap_or("")
    }

    pub fn has_semantic_code(&self, code: &str) -> bool {
        self.semantic_codes.iter().any(|c| c == code)
    }
}

struct FieldReader<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> FieldReader<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            chars: s.chars().peekable(),
        }
    }

    fn eat(&mut self, c: char) -> bool {
        self.chars.next_if_eq(&c).is_some()
    }

    fn read_until(&mut self, stops: &[char], keep_protected_equal: bool) -> Result<String, &'static str> {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if stops.contains(&c) {
                break;
            }
            self.chars.next();
            if c == '\\' {
                let escaped = self.chars.next().ok_or("backslash at end of line")?;
                if escaped == '=' && keep_protected_equal {
                    out.push('\\');
                }
                out.push(escaped);
            } else {
                out.push(c);
            }
        }
        Ok(out)
    }
}
