// unitex-cli: shared utilities for CLI tools.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use unitex_inflect::InflectOptions;

/// Arguments of `unitex-inflect`.
#[derive(Debug, Parser)]
#[command(name = "unitex-inflect")]
#[command(about = "Inflects a DELAS.")]
pub struct InflectArgs {
    /// The unicode DELAS file to be inflected
    pub delas: PathBuf,
    /// The unicode resulting dictionary
    pub result: PathBuf,
    /// The inflectional graphs directory
    pub dir: PathBuf,
    /// Insert a ':' if the produced inflectional codes do not begin with it
    #[arg(short = 'a')]
    pub add_colon: bool,
    /// Do not reduce transducer names by removing digits (N32 is not turned to N)
    #[arg(short = 'k')]
    pub keep_digits: bool,
}

impl InflectArgs {
    pub fn options(&self) -> InflectOptions {
        InflectOptions {
            add_colon: self.add_colon,
            keep_digits: self.keep_digits,
            ..InflectOptions::default()
        }
    }
}

/// Install the `fmt` subscriber on stderr. `RUST_LOG` overrides the
/// default `info` level.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();
}

/// Print an error message and exit with code 1.
pub fn fatal(msg: &str) -> ! {
    eprintln!("error: {msg}");
    process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_options() {
        let args = InflectArgs::try_parse_from(["unitex-inflect", "in.dic", "out.dic", "dir", "-k"])
            .unwrap();
        let options = args.options();
        assert!(options.keep_digits);
        assert!(!options.add_colon);

        let args =
            InflectArgs::try_parse_from(["unitex-inflect", "in.dic", "out.dic", "dir", "-a", "-k"])
                .unwrap();
        assert!(args.options().add_colon);
    }

    #[test]
    fn missing_and_unknown_arguments() {
        let err = InflectArgs::try_parse_from(["unitex-inflect", "in.dic"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        let err =
            InflectArgs::try_parse_from(["unitex-inflect", "a", "b", "c", "-x"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
