//! A small library for building interactive line-oriented command consoles.
//!
//! A [`Console`] owns a registry of named [`Command`]s. Each input line is split
//! into arguments (double quotes group words, see [`lexer::tokenize`]), the first
//! argument is looked up as a command name and the command's handler is invoked
//! with the whole argument vector. Handlers may change the prompt, add or remove
//! commands and even run a complete nested console before returning.
//!
//! Input comes from a [`LineSource`]: the interactive [`Terminal`] by default,
//! or any reader or scripted list of lines. Every console starts with the
//! `help` and `exit` built-ins.

mod builtin;
pub mod command;
pub mod config;
pub mod error;
pub mod input;
mod interpreter;
pub mod io_adapters;
pub mod lexer;
pub mod registry;

pub use command::{Command, ExitCode, Flags, Handler, HelpKind, Outcome, TypedCommand};
pub use config::{Settings, Verbosity};
pub use error::{ConsoleError, Result};
pub use input::{LineSource, ReaderSource, ScriptedInput, Terminal};
/// The command console and the streams it runs on.
///
/// See [`Console`] for the high-level API and examples.
pub use interpreter::{Console, ConsoleIo};
pub use io_adapters::MemWriter;
