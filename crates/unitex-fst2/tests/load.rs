// Loading .fst2 files from disk in both supported encodings.

use std::io::Write;

use unitex_core::text::{Encoding, encode_text};
use unitex_fst2::automaton::Label;
use unitex_fst2::{Automaton, Fst2Error, Fst2Limits};

const NOUN_PLURAL: &str = "0000000001\n\
-1 N1\n\
: 0 1 1 2\n\
t \n\
t \n\
f \n\
%<E>/:s\n\
%s/:p\n\
f\n";

fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".fst2")
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn load_utf16_file() {
    let file = write_temp(&encode_text(NOUN_PLURAL, Encoding::Utf16Le));
    let a = Automaton::load(file.path(), &Fst2Limits::default()).unwrap();
    assert_eq!(a.graph_count(), 1);
    assert_eq!(a.graphs[0].name, "N1");
    assert_eq!(a.states.len(), 3);
    assert!(a.is_final(1));
    assert!(a.is_final(2));
    assert_eq!(a.tag(0).input, "<E>");
    assert_eq!(a.tag(0).output, ":s");
    assert_eq!(a.tag(1).input, "s");
    assert_eq!(a.state(0).transitions[1].label, Label::Tag(1));
}

#[test]
fn load_utf8_file() {
    let file = write_temp(NOUN_PLURAL.as_bytes());
    let a = Automaton::load(file.path(), &Fst2Limits::default()).unwrap();
    assert_eq!(a.tags.len(), 2);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Automaton::load(dir.path().join("none.fst2"), &Fst2Limits::default()).unwrap_err();
    assert!(matches!(err, Fst2Error::Core(_)));
}

#[test]
fn custom_limits() {
    let file = write_temp(NOUN_PLURAL.as_bytes());
    let limits = Fst2Limits {
        max_states: 2,
        ..Fst2Limits::default()
    };
    assert!(matches!(
        Automaton::load(file.path(), &limits),
        Err(Fst2Error::TooManyStates { limit: 2 })
    ));
}
