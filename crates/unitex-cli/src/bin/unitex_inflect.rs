// unitex-inflect: Inflect a DELAS dictionary into a DELAF.
//
// Each DELAS line `lemma,FLEX[+sem][/comment]` is inflected with the
// transducer `<dir>/FLEX.fst2`; every form is written as
// `inflected,lemma.CODE[:]codes comment`.
//
// Usage:
//   unitex-inflect <delas> <result> <dir> [-a] [-k]
//
// Exit code 0 on success or when arguments are missing (usage is printed),
// 1 on an invalid flag or an unreadable/unwritable file.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use unitex_cli::InflectArgs;

fn main() {
    let args = match InflectArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                let _ = e.print();
                return;
            }
            ErrorKind::MissingRequiredArgument => {
                let _ = InflectArgs::command().print_help();
                return;
            }
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    unitex_cli::init_tracing();

    let stats =
        unitex_inflect::inflect_dictionary(&args.delas, &args.result, &args.dir, args.options())
            .unwrap_or_else(|e| unitex_cli::fatal(&e.to_string()));
    tracing::debug!(
        entries = stats.entries,
        forms = stats.forms,
        skipped = stats.skipped,
        "inflection finished"
    );
    println!("Done.");
}
