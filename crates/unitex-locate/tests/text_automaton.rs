// End-to-end matching of a grammar against a small text automaton: every
// path of the grammar is followed over every path of the text, with the
// match context deciding each (text tag, grammar tag) pair.

use unitex_core::alphabet::Alphabet;
use unitex_fst2::{Automaton, Fst2Limits, Label};
use unitex_locate::MatchContext;

// "les chats dorment": ambiguous analyses for each word.
const TEXT: &str = "0000000001
-1 les chats dorment
: 1 1 2 1 3 1
: 4 2 5 2
: 6 3 7 3
t
f
%<E>
%{les,le.DET:mp:fp}
%{les,le.PRO:3mp}
%les
%{chats,chat.N+z1:mp}
%chats
%{dorment,dormir.V+i+z1:P3p:S3p}
%dorment
f
";

// <DET> <N:p> <V>, and a second grammar starting with <PRO>.
fn grammar(first: &str) -> String {
    format!(
        "0000000001
-1 g
: 1 1
: 2 2
: 3 3
t
f
%<E>
{first}
%<N:p>
%<V><<ent$>>
f
"
    )
}

fn alphabet() -> Alphabet {
    let mut content = String::new();
    for (upper, lower) in ('A'..='Z').zip('a'..='z') {
        content.push(upper);
        content.push(lower);
        content.push('\n');
    }
    Alphabet::parse(&content).unwrap()
}

/// Number of (text path, grammar path) pairs that reach final states
/// together.
fn count_matches(text: &Automaton, grammar: &Automaton, ctx: &MatchContext) -> usize {
    fn walk(
        text: &Automaton,
        grammar: &Automaton,
        ctx: &MatchContext,
        t_state: u32,
        g_state: u32,
    ) -> usize {
        let mut count = usize::from(text.is_final(t_state) && grammar.is_final(g_state));
        for gt in &grammar.state(g_state).transitions {
            let Label::Tag(g_tag) = gt.label else { continue };
            for tt in &text.state(t_state).transitions {
                let Label::Tag(t_tag) = tt.label else { continue };
                if ctx.check(t_tag as usize, g_tag as usize) {
                    count += walk(text, grammar, ctx, tt.target, gt.target);
                }
            }
        }
        count
    }
    walk(text, grammar, ctx, text.initial_state(), grammar.initial_state())
}

#[test]
fn lexical_masks_select_one_analysis() {
    let limits = Fst2Limits::default();
    let text = Automaton::from_text(TEXT, &limits).unwrap();
    let a = alphabet();

    let det = Automaton::from_text(&grammar("%<DET>"), &limits).unwrap();
    let ctx = MatchContext::compute(&text, &det, &a).with_filters(&text, &det);
    assert_eq!(count_matches(&text, &det, &ctx), 1);

    let pro = Automaton::from_text(&grammar("%<PRO>"), &limits).unwrap();
    let ctx = MatchContext::compute(&text, &pro, &a).with_filters(&text, &pro);
    assert_eq!(count_matches(&text, &pro, &ctx), 1);

    let adj = Automaton::from_text(&grammar("%<A>"), &limits).unwrap();
    let ctx = MatchContext::compute(&text, &adj, &a).with_filters(&text, &adj);
    assert_eq!(count_matches(&text, &adj, &ctx), 0);
}

#[test]
fn raw_tokens_match_literals_and_meta_tags() {
    let limits = Fst2Limits::default();
    let text = Automaton::from_text(TEXT, &limits).unwrap();
    let a = alphabet();

    // `@les` accepts the raw token and the DELAF entries spelled `les`.
    let g = Automaton::from_text(
        "0000000001\n-1 g\n: 1 1\n: 2 2\n: 2 3\nt \nf \n%<E>\n@les\n%<MOT>\nf\n",
        &limits,
    )
    .unwrap();
    let ctx = MatchContext::compute(&text, &g, &a);
    // 3 readings of `les`, 2 of `chats`, 2 of `dorment`.
    assert_eq!(count_matches(&text, &g, &ctx), 12);
}

#[test]
fn filter_rejects_non_matching_forms() {
    let limits = Fst2Limits::default();
    let text = Automaton::from_text(TEXT, &limits).unwrap();
    let a = alphabet();
    let g = Automaton::from_text(
        "0000000001\n-1 g\n: 1 1\n: 2 2\n: 1 3\nt \nf \n%<E>\n%<MOT>\n%<MOT><<^z>>\nf\n",
        &limits,
    )
    .unwrap();
    let ctx = MatchContext::compute(&text, &g, &a).with_filters(&text, &g);
    assert_eq!(count_matches(&text, &g, &ctx), 0);
}
