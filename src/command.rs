use crate::interpreter::Console;
use argh::{EarlyExit, FromArgs};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Command-defined result value.
///
/// The console never interprets these; it hands them back to whoever
/// dispatched the line.
pub type ExitCode = i32;

bitflags::bitflags! {
    /// Where a command shows up and whether it may run.
    ///
    /// The bits are independent of each other, see the named combinations on
    /// the impl block for the patterns used in practice.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        /// Listed by a bare `help`.
        const LISTABLE              = 1 << 0;
        /// Described by `help <name>`.
        const SPECIFICALLY_LISTABLE = 1 << 1;
        /// May be invoked by dispatch.
        const EXECUTABLE            = 1 << 2;
    }
}

impl Flags {
    /// Listed everywhere and runnable. Default for new commands.
    pub const UNIVERSAL: Self = Self::LISTABLE
        .union(Self::SPECIFICALLY_LISTABLE)
        .union(Self::EXECUTABLE);
    /// Runnable, described only by `help <name>`.
    pub const QUIET: Self = Self::SPECIFICALLY_LISTABLE.union(Self::EXECUTABLE);
    /// Runnable, absent from both help surfaces.
    pub const SECRET: Self = Self::EXECUTABLE;
    /// Registered but inert.
    pub const SILENT: Self = Self::empty();

    /// Whether either help surface mentions the command.
    pub fn is_shown(self) -> bool {
        self.intersects(Self::LISTABLE | Self::SPECIFICALLY_LISTABLE)
    }
}

/// Which help surface a listing is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpKind {
    /// Bare `help`.
    General,
    /// `help <name>`.
    Specific,
}

impl HelpKind {
    pub(crate) fn flag(self) -> Flags {
        match self {
            HelpKind::General => Flags::LISTABLE,
            HelpKind::Specific => Flags::SPECIFICALLY_LISTABLE,
        }
    }
}

/// Result of dispatching one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Value returned by the command, opaque to the console.
    Code(ExitCode),
    /// Ends the loop that dispatched the line, and only that loop.
    Stop,
    /// No executable command matched the first argument.
    NotFound,
    /// The line held no arguments, nothing was looked up.
    Failed,
}

/// Something a console can invoke for a command.
///
/// `argv[0]` is the name the command was invoked by and `argv.len()` is the
/// argument count. The console is passed in mutably so handlers can change the
/// prompt, register commands or run a nested console.
pub trait Handler {
    fn call(&self, argv: &[String], console: &mut Console) -> anyhow::Result<Outcome>;
}

impl<F> Handler for F
where
    F: Fn(&[String], &mut Console) -> anyhow::Result<Outcome>,
{
    fn call(&self, argv: &[String], console: &mut Console) -> anyhow::Result<Outcome> {
        self(argv, console)
    }
}

/// A registered command.
#[derive(Clone)]
pub struct Command {
    name: String,
    help: String,
    extended_help: Option<String>,
    flags: Flags,
    handler: Rc<dyn Handler>,
}

impl Command {
    /// Create a universal command with the given short help.
    pub fn new(name: impl Into<String>, help: impl Into<String>, handler: impl Handler + 'static) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            extended_help: None,
            flags: Flags::UNIVERSAL,
            handler: Rc::new(handler),
        }
    }

    /// Same as [`Command::new`] but lets the compiler infer a closure's argument types.
    pub fn from_fn<F>(name: impl Into<String>, help: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[String], &mut Console) -> anyhow::Result<Outcome> + 'static,
    {
        Self::new(name, help, f)
    }

    /// Create a command whose arguments are parsed by `T`.
    pub fn typed<T: TypedCommand + 'static>(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, help, Typed::<T>::default())
    }

    pub fn with_extended_help(mut self, text: impl Into<String>) -> Self {
        self.extended_help = Some(text.into());
        self
    }

    pub fn with_flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn extended_help(&self) -> Option<&str> {
        self.extended_help.as_deref()
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: Flags) {
        self.flags = flags;
    }

    /// Replace the handler, keeping name, help and flags.
    pub fn set_handler(&mut self, handler: impl Handler + 'static) {
        self.handler = Rc::new(handler);
    }

    pub fn set_handler_fn<F>(&mut self, f: F)
    where
        F: Fn(&[String], &mut Console) -> anyhow::Result<Outcome> + 'static,
    {
        self.set_handler(f);
    }

    pub(crate) fn handler(&self) -> Rc<dyn Handler> {
        Rc::clone(&self.handler)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("extended_help", &self.extended_help)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// A command with declaratively parsed arguments.
///
/// Arguments are parsed using the [`argh`] crate (`FromArgs`). Parse errors and
/// `--help` requests never reach [`TypedCommand::execute`]; their text is written
/// to the console output instead.
pub trait TypedCommand: Sized + FromArgs {
    fn execute(self, console: &mut Console) -> anyhow::Result<Outcome>;
}

/// Adapts a [`TypedCommand`] into a [`Handler`].
pub struct Typed<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: TypedCommand> Handler for Typed<T> {
    fn call(&self, argv: &[String], console: &mut Console) -> anyhow::Result<Outcome> {
        let Some((name, rest)) = argv.split_first() else {
            return Ok(Outcome::Failed);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        match T::from_args(&[name.as_str()], &args) {
            Ok(cmd) => cmd.execute(console),
            Err(EarlyExit { output, status }) => {
                writeln!(console.out(), "{}", output.trim_end())?;
                Ok(Outcome::Code(if status.is_err() { 1 } else { 0 }))
            }
        }
    }
}
