// DELAS lines: `lemma,FLEX[+sem...][/comment]`.

use crate::DelasError;

/// One DELAS entry ready to be inflected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelasLine {
    pub lemma: String,
    /// Flexional transducer name, e.g. `N32`.
    pub transducer: String,
    /// Grammatical code written to the DELAF, with semantic codes:
    /// `N+Conc` for `N32+Conc`.
    pub code: String,
    /// The comment with its leading `/`, or empty.
    pub comment: String,
}

impl DelasLine {
    /// Parse one line. Comment lines (starting with `/`) and blank lines
    /// give `Ok(None)`.
    ///
    /// Unless `keep_digits` is set, the grammatical code is the leading
    /// letters of the transducer name.
    pub fn parse(line: &str, keep_digits: bool) -> Result<Option<Self>, DelasError> {
        if line.starts_with('/') || line.trim().is_empty() {
            return Ok(None);
        }
        let mut chars = line.chars();

        let (lemma, stop) = read_field(&mut chars, &[','])?;
        if stop.is_none() {
            return Err(DelasError::UnexpectedEndOfLine);
        }

        let (transducer, mut stop) = read_field(&mut chars, &['+', '/'])?;
        if transducer.is_empty() {
            return Err(DelasError::MissingFlexionalCode);
        }
        let mut code = if keep_digits {
            transducer.clone()
        } else {
            transducer.chars().take_while(|c| c.is_alphabetic()).collect()
        };
        if code.is_empty() {
            return Err(DelasError::EmptyTransducerName);
        }

        if stop == Some('+') {
            let (semantic, s) = read_field(&mut chars, &['/'])?;
            code.push('+');
            code.push_str(&semantic);
            stop = s;
        }

        let comment = match stop {
            Some('/') => format!("/{}", chars.as_str()),
            _ => String::new(),
        };
        Ok(Some(Self {
            lemma,
            transducer,
            code,
            comment,
        }))
    }
}

/// Read up to one of `stops` (consumed and returned) or the end of the line,
/// removing backslash protection.
fn read_field(
    chars: &mut std::str::Chars<'_>,
    stops: &[char],
) -> Result<(String, Option<char>), DelasError> {
    let mut field = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => field.push(chars.next().ok_or(DelasError::TrailingBackslash)?),
            _ if stops.contains(&c) => return Ok((field, Some(c))),
            _ => field.push(c),
        }
    }
    Ok((field, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> DelasLine {
        DelasLine::parse(line, false).unwrap().unwrap()
    }

    #[test]
    fn simple_line() {
        let l = parse("chat,N1");
        assert_eq!(l.lemma, "chat");
        assert_eq!(l.transducer, "N1");
        assert_eq!(l.code, "N");
        assert_eq!(l.comment, "");
    }

    #[test]
    fn semantic_codes_and_comment() {
        let l = parse("table,N21+Conc+z1/meuble");
        assert_eq!(l.transducer, "N21");
        assert_eq!(l.code, "N+Conc+z1");
        assert_eq!(l.comment, "/meuble");
    }

    #[test]
    fn comment_without_semantic_codes() {
        let l = parse("manger,V3/comment");
        assert_eq!(l.code, "V");
        assert_eq!(l.comment, "/comment");
    }

    #[test]
    fn keep_digits() {
        let l = DelasLine::parse("chat,N32+z1", true).unwrap().unwrap();
        assert_eq!(l.code, "N32+z1");
        assert_eq!(l.transducer, "N32");
    }

    #[test]
    fn escapes_are_removed() {
        let l = parse("aujourd\\'hui,ADV");
        assert_eq!(l.lemma, "aujourd'hui");
        let l = parse("a\\,b,N1");
        assert_eq!(l.lemma, "a,b");
    }

    #[test]
    fn comment_and_blank_lines() {
        assert_eq!(DelasLine::parse("/ a comment", false), Ok(None));
        assert_eq!(DelasLine::parse("", false), Ok(None));
    }

    #[test]
    fn errors() {
        assert_eq!(
            DelasLine::parse("chat", false),
            Err(DelasError::UnexpectedEndOfLine)
        );
        assert_eq!(
            DelasLine::parse("chat\\", false),
            Err(DelasError::TrailingBackslash)
        );
        assert_eq!(
            DelasLine::parse("chat,", false),
            Err(DelasError::MissingFlexionalCode)
        );
        assert_eq!(
            DelasLine::parse("chat,+z1", false),
            Err(DelasError::MissingFlexionalCode)
        );
        assert_eq!(
            DelasLine::parse("chat,32", false),
            Err(DelasError::EmptyTransducerName)
        );
        assert!(DelasLine::parse("chat,32", true).is_ok());
    }
}
