use std::ffi::OsString;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::module::scheduled::{MIN_INTERVAL_SECS, RunMode};

const AFTER_HELP: &str = "\
Examples:
  fnstatus           Monitor with 5-minute intervals
  fnstatus 60        Monitor with 1-minute intervals
  fnstatus --once    Single check and exit";

#[derive(Parser, Debug, Default)]
#[command(name = "fnstatus")]
#[command(about = "Terminal monitor for Epic Games service status, incidents and free games")]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Seconds between checks (minimum 10)
    #[arg(allow_negative_numbers = true)]
    pub interval: Option<String>,

    /// Run one check and exit
    #[arg(long)]
    pub once: bool,
}

/// What the binary should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Print this text and exit 0
    Help(String),
    Run {
        mode: RunMode,
        /// Shown to the user before monitoring starts
        warning: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalChoice {
    pub seconds: u64,
    pub warning: Option<String>,
}

pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}

/// Interpret the positional interval.
///
/// Integers below the minimum are raised to it; anything that is not an
/// integer falls back to `default_secs`. The floor applies to the default
/// too, so a misconfigured default never yields a shorter interval.
pub fn resolve_interval(raw: Option<&str>, default_secs: u64) -> IntervalChoice {
    let Some(raw) = raw else {
        if default_secs < MIN_INTERVAL_SECS {
            return below_minimum();
        }
        return IntervalChoice {
            seconds: default_secs,
            warning: None,
        };
    };

    match raw.trim().parse::<i64>() {
        Ok(n) if n < MIN_INTERVAL_SECS as i64 => below_minimum(),
        Ok(n) => IntervalChoice {
            seconds: n as u64,
            warning: None,
        },
        Err(_) => invalid_interval(default_secs),
    }
}

fn below_minimum() -> IntervalChoice {
    IntervalChoice {
        seconds: MIN_INTERVAL_SECS,
        warning: Some(format!(
            "Minimum interval is {} seconds to avoid rate limiting",
            MIN_INTERVAL_SECS
        )),
    }
}

fn invalid_interval(default_secs: u64) -> IntervalChoice {
    let seconds = default_secs.max(MIN_INTERVAL_SECS);
    IntervalChoice {
        seconds,
        warning: Some(format!("Invalid interval. Using default of {} seconds.", seconds)),
    }
}

fn continuous(choice: IntervalChoice) -> Invocation {
    Invocation::Run {
        mode: RunMode::Continuous {
            interval: Duration::from_secs(choice.seconds),
        },
        warning: choice.warning,
    }
}

/// Parse process arguments. Never fails: arguments clap rejects are treated
/// like an invalid interval.
///
/// Only the first argument is interpreted; anything after it is ignored.
pub fn parse_args<I, T>(args: I, default_interval_secs: u64) -> Invocation
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if argv.len() > 2 {
        tracing::debug!("Ignoring {} extra argument(s): {:?}", argv.len() - 2, &argv[2..]);
        argv.truncate(2);
    }

    let cli = match Cli::try_parse_from(argv) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            return Invocation::Help(e.to_string());
        }
        Err(e) => {
            tracing::debug!("Argument parsing failed: {}", e);
            return continuous(invalid_interval(default_interval_secs));
        }
    };

    if cli.interval.as_deref() == Some("help") {
        return Invocation::Help(help_text());
    }
    if cli.once {
        return Invocation::Run {
            mode: RunMode::Once,
            warning: None,
        };
    }

    continuous(resolve_interval(cli.interval.as_deref(), default_interval_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(args: &[&str]) -> Invocation {
        let argv = std::iter::once("fnstatus").chain(args.iter().copied());
        parse_args(argv, 300)
    }

    fn every(secs: u64) -> RunMode {
        RunMode::Continuous {
            interval: Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_resolve_interval() {
        assert_eq!(resolve_interval(None, 300).seconds, 300);
        assert_eq!(resolve_interval(Some("60"), 300), IntervalChoice { seconds: 60, warning: None });
        assert_eq!(resolve_interval(Some("10"), 300).warning, None);

        let clamped = resolve_interval(Some("5"), 300);
        assert_eq!(clamped.seconds, 10);
        assert!(clamped.warning.unwrap().contains("Minimum interval"));

        assert_eq!(resolve_interval(Some("-5"), 300).seconds, 10);

        let invalid = resolve_interval(Some("abc"), 300);
        assert_eq!(invalid.seconds, 300);
        assert_eq!(
            invalid.warning.as_deref(),
            Some("Invalid interval. Using default of 300 seconds.")
        );
        assert_eq!(resolve_interval(Some("1.5"), 300).seconds, 300);
    }

    #[test]
    fn test_parse_args_modes() {
        assert_eq!(run(&[]), Invocation::Run { mode: every(300), warning: None });
        assert_eq!(run(&["120"]), Invocation::Run { mode: every(120), warning: None });
        assert_eq!(run(&["--once"]), Invocation::Run { mode: RunMode::Once, warning: None });

        match run(&["-3"]) {
            Invocation::Run { mode, warning } => {
                assert_eq!(mode, every(10));
                assert!(warning.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_help_variants() {
        for args in [&["--help"][..], &["-h"], &["help"]] {
            match run(args) {
                Invocation::Help(text) => assert!(text.contains("--once"), "{:?}", args),
                other => panic!("{:?} gave {:?}", args, other),
            }
        }
    }

    #[test]
    fn test_unknown_flag_falls_back_to_default() {
        match run(&["--verbose"]) {
            Invocation::Run { mode, warning } => {
                assert_eq!(mode, every(300));
                assert!(warning.unwrap().starts_with("Invalid interval"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_default_interval_respects_minimum() {
        match parse_args(["fnstatus"], 0) {
            Invocation::Run { mode, warning } => {
                assert_eq!(mode, every(10));
                assert!(warning.unwrap().contains("Minimum interval"));
            }
            other => panic!("unexpected {:?}", other),
        }

        match parse_args(["fnstatus", "abc"], 3) {
            Invocation::Run { mode, warning } => {
                assert_eq!(mode, every(10));
                assert_eq!(
                    warning.as_deref(),
                    Some("Invalid interval. Using default of 10 seconds.")
                );
            }
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(resolve_interval(None, 10), IntervalChoice { seconds: 10, warning: None });
    }

    #[test]
    fn test_trailing_arguments_are_ignored() {
        assert_eq!(run(&["60", "extra"]), Invocation::Run { mode: every(60), warning: None });
        assert_eq!(
            run(&["--once", "--verbose"]),
            Invocation::Run { mode: RunMode::Once, warning: None }
        );
        assert!(matches!(run(&["--help", "60"]), Invocation::Help(_)));
    }
}
