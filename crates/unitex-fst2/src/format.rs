// .fst2 text format parser.
//
// Layout:
//   0000000002            number of graphs
//   -1 main               graph header: -<number> <name>
//   : 0 1 -2 1            non-final state: pairs of (tag, relative target)
//   t                     final state (may also carry transitions)
//   f                     end of graph
//   -2 sub
//   ...
//   %<E>                  tag 0 (`%` or `@` prefix)
//   %a/A                  tag 1
//   f                     end of tag table
//
// A negative tag number in a state line is a call to the graph of that
// number.

use crate::automaton::{Graph, Label, State, StateFlags, Transition};
use crate::config::Fst2Limits;
use crate::tag::Tag;
use crate::Fst2Error;

/// Raw tables read from an `.fst2` file.
#[derive(Debug, Default)]
pub struct ParsedFst2 {
    pub states: Vec<State>,
    pub tags: Vec<Tag>,
    pub graphs: Vec<Graph>,
}

/// Parse and validate the content of an `.fst2` file.
pub fn parse_fst2(content: &str, limits: &Fst2Limits) -> Result<ParsedFst2, Fst2Error> {
    let mut lines = content.lines().enumerate().map(|(i, l)| (i + 1, l));

    let header = lines
        .by_ref()
        .find(|(_, l)| !l.trim().is_empty())
        .map(|(_, l)| l.trim())
        .ok_or(Fst2Error::Empty)?;
    let graph_count: usize = header
        .parse()
        .map_err(|_| Fst2Error::InvalidHeader(header.to_string()))?;
    if graph_count == 0 {
        return Err(Fst2Error::Empty);
    }

    let mut parsed = ParsedFst2::default();
    let mut graph_slots: Vec<Option<Graph>> = vec![None; graph_count];

    for _ in 0..graph_count {
        let (line_no, line) = lines
            .by_ref()
            .find(|(_, l)| !l.trim().is_empty())
            .ok_or_else(|| malformed(0, "unexpected end of file before a graph header".to_string()))?;
        let (number, name) = parse_graph_header(line_no, line, graph_count)?;
        if graph_slots[number - 1].is_some() {
            return Err(malformed(line_no, format!("graph -{number} is defined twice")));
        }
        let first_state = u32::try_from(parsed.states.len())
            .map_err(|_| malformed(line_no, "too many states".to_string()))?;

        loop {
            let (line_no, line) = lines
                .next()
                .ok_or_else(|| malformed(line_no, format!("graph -{number} has no end marker")))?;
            let mut chars = line.chars();
            let flags = match chars.next() {
                Some('f') => break,
                Some('t') => StateFlags::FINAL,
                Some(':') => StateFlags::empty(),
                None => continue,
                Some(c) => {
                    return Err(malformed(line_no, format!("unexpected state marker `{c}`")));
                }
            };
            let flags = if parsed.states.len() == first_state as usize {
                flags | StateFlags::INITIAL
            } else {
                flags
            };
            if parsed.states.len() >= limits.max_states {
                return Err(Fst2Error::TooManyStates {
                    limit: limits.max_states,
                });
            }
            let transitions = parse_transitions(line_no, chars.as_str(), first_state)?;
            parsed.states.push(State { flags, transitions });
        }

        let state_count = parsed.states.len() - first_state as usize;
        if state_count == 0 {
            return Err(malformed(line_no, format!("graph -{number} has no state")));
        }
        graph_slots[number - 1] = Some(Graph {
            name: name.to_string(),
            first_state,
            state_count: u32::try_from(state_count)
                .map_err(|_| malformed(line_no, "too many states".to_string()))?,
        });
    }

    parsed.graphs = graph_slots.into_iter().flatten().collect();

    for (_, line) in lines {
        if line.starts_with('f') {
            break;
        }
        if !(line.starts_with('%') || line.starts_with('@')) {
            continue;
        }
        if parsed.tags.len() >= limits.max_tags {
            return Err(Fst2Error::TooManyTags {
                limit: limits.max_tags,
            });
        }
        parsed.tags.push(Tag::parse(line)?);
    }

    validate(&parsed)?;
    Ok(parsed)
}

fn malformed(line: usize, reason: String) -> Fst2Error {
    Fst2Error::Malformed { line, reason }
}

fn parse_graph_header(
    line_no: usize,
    line: &str,
    graph_count: usize,
) -> Result<(usize, &str), Fst2Error> {
    let rest = line
        .strip_prefix('-')
        .ok_or_else(|| malformed(line_no, "a graph header must start with -".to_string()))?;
    let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let number: usize = rest[..digits]
        .parse()
        .map_err(|_| malformed(line_no, "invalid graph number".to_string()))?;
    if number == 0 || number > graph_count {
        return Err(Fst2Error::BadSubGraph {
            graph: u32::try_from(number).unwrap_or(u32::MAX),
            count: graph_count,
        });
    }
    let name = rest[digits..].strip_prefix(' ').unwrap_or(&rest[digits..]);
    Ok((number, name))
}

fn parse_transitions(
    line_no: usize,
    rest: &str,
    first_state: u32,
) -> Result<Vec<Transition>, Fst2Error> {
    let mut numbers = rest.split_whitespace().map(|n| {
        n.parse::<i64>()
            .map_err(|_| malformed(line_no, format!("invalid number `{n}`")))
    });
    let index = |n: i64| {
        u32::try_from(n).map_err(|_| malformed(line_no, format!("index {n} out of range")))
    };
    let mut transitions = Vec::new();
    while let Some(tag) = numbers.next() {
        let tag = tag?;
        let target = numbers
            .next()
            .ok_or_else(|| malformed(line_no, "transition without target".to_string()))??;
        if target < 0 {
            return Err(malformed(line_no, format!("negative target state {target}")));
        }
        let label = if tag < 0 {
            let graph = tag
                .checked_neg()
                .ok_or_else(|| malformed(line_no, format!("index {tag} out of range")))?;
            Label::SubGraph(index(graph)?)
        } else {
            Label::Tag(index(tag)?)
        };
        let target = index(target)?
            .checked_add(first_state)
            .ok_or_else(|| malformed(line_no, format!("target state {target} out of range")))?;
        transitions.push(Transition { label, target });
    }
    Ok(transitions)
}

fn validate(parsed: &ParsedFst2) -> Result<(), Fst2Error> {
    let state_count = parsed.states.len();
    let tag_count = parsed.tags.len();
    let graph_count = parsed.graphs.len();
    for t in parsed.states.iter().flat_map(|s| &s.transitions) {
        if t.target as usize >= state_count {
            return Err(Fst2Error::DanglingState {
                state: t.target,
                count: state_count,
            });
        }
        match t.label {
            Label::Tag(tag) if tag as usize >= tag_count => {
                return Err(Fst2Error::DanglingTag {
                    tag,
                    count: tag_count,
                });
            }
            Label::SubGraph(graph) if graph == 0 || graph as usize > graph_count => {
                return Err(Fst2Error::BadSubGraph {
                    graph,
                    count: graph_count,
                });
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ParsedFst2, Fst2Error> {
        parse_fst2(text, &Fst2Limits::default())
    }

    #[test]
    fn minimal_automaton() {
        let p = parse("0000000001\n-1 main\n: 0 1\nt \nf \n%chat\nf\n").unwrap();
        assert_eq!(p.graphs.len(), 1);
        assert_eq!(p.states.len(), 2);
        assert_eq!(p.tags.len(), 1);
        assert_eq!(p.tags[0].input, "chat");
    }

    #[test]
    fn windows_line_endings() {
        let p = parse("0000000001\r\n-1 main\r\n: 0 1\r\nt \r\nf \r\n%chat\r\nf\r\n").unwrap();
        assert_eq!(p.tags[0].input, "chat");
    }

    #[test]
    fn graph_names_may_contain_spaces() {
        let p = parse("0000000001\n-1 my graph.grf\nt \nf \n%<E>\nf\n").unwrap();
        assert_eq!(p.graphs[0].name, "my graph.grf");
    }

    #[test]
    fn empty_automaton() {
        assert!(matches!(parse("0000000000\n"), Err(Fst2Error::Empty)));
        assert!(matches!(parse(""), Err(Fst2Error::Empty)));
    }

    #[test]
    fn bad_header() {
        assert!(matches!(parse("two\n"), Err(Fst2Error::InvalidHeader(_))));
    }

    #[test]
    fn odd_transition_list() {
        let err = parse("0000000001\n-1 main\n: 0\nf \n%a\nf\n").unwrap_err();
        assert!(matches!(err, Fst2Error::Malformed { line: 3, .. }));
    }

    #[test]
    fn out_of_range_numbers_are_rejected() {
        for label in ["4294967296", "-9223372036854775808", "-4294967296"] {
            let text = format!("0000000001\n-1 main\n: {label} 1\nt \nf \n%a\nf\n");
            let err = parse(&text).unwrap_err();
            assert!(matches!(err, Fst2Error::Malformed { line: 3, .. }), "{label}");
        }
        let err = parse("0000000001\n-1 main\n: 0 4294967296\nt \nf \n%a\nf\n").unwrap_err();
        assert!(matches!(err, Fst2Error::Malformed { line: 3, .. }));
    }

    #[test]
    fn dangling_references() {
        assert!(matches!(
            parse("0000000001\n-1 main\n: 3 1\nt \nf \n%a\nf\n"),
            Err(Fst2Error::DanglingTag { tag: 3, count: 1 })
        ));
        assert!(matches!(
            parse("0000000001\n-1 main\n: 0 7\nt \nf \n%a\nf\n"),
            Err(Fst2Error::DanglingState { state: 7, count: 2 })
        ));
        assert!(matches!(
            parse("0000000001\n-1 main\n: -2 1\nt \nf \n%a\nf\n"),
            Err(Fst2Error::BadSubGraph { graph: 2, count: 1 })
        ));
    }

    #[test]
    fn limits_are_enforced() {
        let text = "0000000001\n-1 main\n: 0 1\n: 0 2\nt \nf \n%a\n%b\nf\n";
        let tight = Fst2Limits {
            max_states: 2,
            max_tags: 10,
        };
        assert!(matches!(
            parse_fst2(text, &tight),
            Err(Fst2Error::TooManyStates { limit: 2 })
        ));
        let tight = Fst2Limits {
            max_states: 10,
            max_tags: 1,
        };
        assert!(matches!(
            parse_fst2(text, &tight),
            Err(Fst2Error::TooManyTags { limit: 1 })
        ));
    }
}
