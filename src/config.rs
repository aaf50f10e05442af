use crate::error::{ConsoleError, Result};
use std::env as stdenv;
use std::fmt;
use std::str::FromStr;

/// Prompt used when nothing else is configured.
pub const DEFAULT_PROMPT: &str = "> ";

/// Environment variable holding the initial prompt.
pub const PROMPT_VAR: &str = "CONSOLE_PROMPT";

/// Environment variable holding the initial verbosity.
pub const VERBOSITY_VAR: &str = "CONSOLE_VERBOSITY";

/// How chatty a console is about its own operation.
///
/// Levels are ordered: `Normal < Warning < Verbose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Only command output and not-found diagnostics.
    #[default]
    Normal,
    /// Also report registration conflicts.
    Warning,
    /// Also echo every collected argument vector.
    Verbose,
}

impl FromStr for Verbosity {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Verbosity::Normal),
            "warning" | "warn" => Ok(Verbosity::Warning),
            "verbose" => Ok(Verbosity::Verbose),
            _ => Err(ConsoleError::InvalidVerbosity(s.to_string())),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verbosity::Normal => "normal",
            Verbosity::Warning => "warning",
            Verbosity::Verbose => "verbose",
        };
        f.write_str(s)
    }
}

/// Initial console state that can come from outside the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub prompt: String,
    pub verbosity: Verbosity,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            verbosity: Verbosity::Normal,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(stdenv::vars())
    }

    /// Read settings from an explicit set of variables.
    ///
    /// Unset variables keep their defaults; an unparsable verbosity is an error.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut settings = Settings::default();
        for (key, value) in vars {
            let value: String = value.into();
            match key.as_ref() {
                PROMPT_VAR => settings.prompt = value,
                VERBOSITY_VAR => settings.verbosity = value.parse()?,
                _ => {}
            }
        }
        Ok(settings)
    }
}
