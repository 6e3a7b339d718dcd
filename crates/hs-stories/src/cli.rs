#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via the `HS_*` prefix.

use std::env;
use std::fmt;
use std::path::PathBuf;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
Hacker Stories: a searchable, dismissible story list

USAGE:
    hacker-stories [OPTIONS]

OPTIONS:
    --state-file=PATH    Where the last search is saved
                         (default: $XDG_STATE_HOME/hacker-stories/state.json)
    --memory             Keep state in memory only; nothing is saved
    --search=TERM        Search term used when none is saved (default: React)
    --no-mouse           Disable mouse event capture
    --no-focus           Do not focus the search input on start
    --log-file=PATH      Write logs to PATH
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    Type            Edit the search term (search input focused)
    Tab             Switch focus between search input and list
    Up / Down       Move the selection
    Enter / Delete  Dismiss the selected story (list focused)
    Click           [Dismiss] removes that story
    Esc / Ctrl+C    Quit

ENVIRONMENT VARIABLES:
    HS_STATE_FILE       Override --state-file
    HS_SEARCH_DEFAULT   Override --search
    HS_LOG              Log filter, e.g. 'debug' or 'hs_runtime=trace' (default: warn)
    HS_LOG_FILE         Override --log-file";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Explicit state file; `None` uses the per-user default.
    pub state_file: Option<PathBuf>,
    /// Use an in-memory store.
    pub memory: bool,
    /// Search term used when the store has none.
    pub default_search: String,
    /// Whether mouse events are enabled.
    pub mouse: bool,
    /// Whether the search input asks for focus on start.
    pub focus_search: bool,
    /// Log destination; no logging without one.
    pub log_file: Option<PathBuf>,
    /// Log filter directives.
    pub log_filter: String,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            state_file: None,
            memory: false,
            default_search: crate::seed::DEFAULT_SEARCH_TERM.to_string(),
            mouse: true,
            focus_search: true,
            log_file: None,
            log_filter: "warn".to_string(),
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Invalid command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownArgument(String),
    MissingValue(&'static str),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
            Self::MissingValue(flag) => write!(f, "Missing value for {flag}"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Opts {
    /// Parse the process arguments and environment.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Result<Command, ParseError> {
        Self::parse_from(env::args().skip(1), |key| env::var(key).ok())
    }

    /// Parse `args` (without the program name) with `env` as the variable
    /// lookup.
    pub fn parse_from<I, S>(
        args: I,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Command, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = env("HS_STATE_FILE").filter(|v| !v.is_empty()) {
            opts.state_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env("HS_SEARCH_DEFAULT") {
            opts.default_search = val;
        }
        if let Some(val) = env("HS_LOG").filter(|v| !v.is_empty()) {
            opts.log_filter = val;
        }
        if let Some(val) = env("HS_LOG_FILE").filter(|v| !v.is_empty()) {
            opts.log_file = Some(PathBuf::from(val));
        }

        // Parse command-line args (override env vars)
        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--memory" => opts.memory = true,
                "--no-mouse" => opts.mouse = false,
                "--no-focus" => opts.focus_search = false,
                other => {
                    if let Some(val) = other.strip_prefix("--state-file=") {
                        if val.is_empty() {
                            return Err(ParseError::MissingValue("--state-file"));
                        }
                        opts.state_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--search=") {
                        opts.default_search = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        if val.is_empty() {
                            return Err(ParseError::MissingValue("--log-file"));
                        }
                        opts.log_file = Some(PathBuf::from(val));
                    } else {
                        return Err(ParseError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

/// `hacker-stories <version>`.
pub fn version_line() -> String {
    format!("hacker-stories {VERSION}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], env: &[(&str, &str)]) -> Result<Command, ParseError> {
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Opts::parse_from(args.iter().copied(), |k| env.get(k).cloned())
    }

    fn run_opts(args: &[&str], env: &[(&str, &str)]) -> Opts {
        match parse(args, env).unwrap() {
            Command::Run(opts) => opts,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = run_opts(&[], &[]);
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.default_search, "React");
        assert!(opts.mouse);
        assert!(opts.focus_search);
        assert!(!opts.memory);
        assert_eq!(opts.log_filter, "warn");
    }

    #[test]
    fn flags_parse() {
        let opts = run_opts(
            &[
                "--state-file=/tmp/s.json",
                "--memory",
                "--search=Rust",
                "--no-mouse",
                "--no-focus",
                "--log-file=/tmp/hs.log",
            ],
            &[],
        );
        assert_eq!(opts.state_file, Some(PathBuf::from("/tmp/s.json")));
        assert!(opts.memory);
        assert_eq!(opts.default_search, "Rust");
        assert!(!opts.mouse);
        assert!(!opts.focus_search);
        assert_eq!(opts.log_file, Some(PathBuf::from("/tmp/hs.log")));
    }

    #[test]
    fn env_applies_and_flags_override() {
        let env = [
            ("HS_STATE_FILE", "/env/state.json"),
            ("HS_SEARCH_DEFAULT", "Go"),
            ("HS_LOG", "debug"),
            ("HS_LOG_FILE", "/env/hs.log"),
        ];
        let opts = run_opts(&[], &env);
        assert_eq!(opts.state_file, Some(PathBuf::from("/env/state.json")));
        assert_eq!(opts.default_search, "Go");
        assert_eq!(opts.log_filter, "debug");
        assert_eq!(opts.log_file, Some(PathBuf::from("/env/hs.log")));

        let opts = run_opts(&["--search=Zig", "--state-file=/cli.json"], &env);
        assert_eq!(opts.default_search, "Zig");
        assert_eq!(opts.state_file, Some(PathBuf::from("/cli.json")));
    }

    #[test]
    fn empty_search_flag_is_allowed() {
        assert_eq!(run_opts(&["--search="], &[]).default_search, "");
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["--help", "--bogus"], &[]), Ok(Command::Help));
        assert_eq!(parse(&["-V"], &[]), Ok(Command::Version));
        assert!(version_line().starts_with("hacker-stories "));
    }

    #[test]
    fn bad_arguments_rejected() {
        assert_eq!(
            parse(&["--bogus"], &[]),
            Err(ParseError::UnknownArgument("--bogus".into()))
        );
        assert_eq!(
            parse(&["--state-file="], &[]),
            Err(ParseError::MissingValue("--state-file"))
        );
        assert_eq!(
            ParseError::UnknownArgument("-x".into()).to_string(),
            "Unknown argument: -x"
        );
    }

    #[test]
    fn help_text_lists_every_flag() {
        for flag in [
            "--state-file",
            "--memory",
            "--search",
            "--no-mouse",
            "--no-focus",
            "--log-file",
            "HS_STATE_FILE",
            "HS_SEARCH_DEFAULT",
            "HS_LOG",
            "HS_LOG_FILE",
        ] {
            assert!(HELP_TEXT.contains(flag), "missing {flag}");
        }
    }
}
