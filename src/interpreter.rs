use crate::builtin;
use crate::command::{Command, Flags, Handler, Outcome};
use crate::config::{Settings, Verbosity};
use crate::error::{ConsoleError, Result};
use crate::input::{LineSource, Terminal};
use crate::lexer;
use crate::registry::Registry;
use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

/// The streams a console talks through.
///
/// Kept together so a nested console can borrow all of them from its parent
/// at once, see [`Console::run_nested`].
pub struct ConsoleIo {
    /// Where lines come from.
    pub input: Box<dyn LineSource>,
    /// Command output, help text and not-found diagnostics.
    pub output: Box<dyn Write>,
    /// Warnings about the console's own operation.
    pub errors: Box<dyn Write>,
}

impl ConsoleIo {
    /// Interactive terminal input, process stdout and stderr.
    pub fn stdio() -> Self {
        Self {
            input: Box::new(Terminal::new()),
            output: Box::new(io::stdout()),
            errors: Box::new(io::stderr()),
        }
    }
}

/// A line-oriented command console.
///
/// The console owns a [`Registry`] of commands, reads lines from its
/// [`LineSource`], splits them into arguments and invokes the command named by
/// the first one. See [`Console::dispatch`] for the rules and
/// [`Console::run`] for the loop.
///
/// Example
/// ```
/// use console_commands::{Command, Console, Outcome};
/// let mut console = Console::new();
/// console
///     .register(Command::from_fn("add", "adds integers", |argv, _| {
///         let mut sum = 0;
///         for arg in &argv[1..] {
///             sum += arg.parse::<i32>()?;
///         }
///         Ok(Outcome::Code(sum))
///     }))
///     .unwrap();
/// assert_eq!(console.dispatch("add 2 3"), Outcome::Code(5));
/// ```
pub struct Console {
    registry: Registry,
    verbosity: Verbosity,
    not_found: Rc<dyn Handler>,
    argv: Vec<String>,
    prompt: String,
    completions: Option<Vec<String>>,
    io: ConsoleIo,
}

impl Console {
    /// Create a console with default settings on the process terminal.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            registry: Registry::new(),
            verbosity: settings.verbosity,
            not_found: Rc::new(builtin::not_found),
            argv: Vec::new(),
            prompt: settings.prompt,
            completions: None,
            io: ConsoleIo::stdio(),
        }
    }

    /// Replace all streams at once.
    pub fn set_io(&mut self, io: ConsoleIo) {
        self.io = io;
    }

    pub fn set_input(&mut self, input: Box<dyn LineSource>) {
        self.io.input = input;
    }

    pub fn set_output(&mut self, output: Box<dyn Write>) {
        self.io.output = output;
    }

    pub fn set_errors(&mut self, errors: Box<dyn Write>) {
        self.io.errors = errors;
    }

    /// Stream that commands should print to.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.io.output
    }

    pub fn errors(&mut self) -> &mut dyn Write {
        &mut *self.io.errors
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Add a command.
    ///
    /// A name that is already taken leaves the registry untouched, returns
    /// [`ConsoleError::DuplicateCommand`] and, at [`Verbosity::Warning`] or
    /// above, prints a warning to the error stream.
    pub fn register(&mut self, cmd: Command) -> Result<()> {
        let result = self.registry.insert(cmd);
        if let Err(ConsoleError::DuplicateCommand(name)) = &result {
            let message = format!(
                "Could not add command '{}' because it already exists in this console",
                name
            );
            self.warn(&message);
        }
        result
    }

    /// Add several commands, skipping the ones that cannot be added.
    ///
    /// Returns how many were added.
    pub fn register_all(&mut self, cmds: impl IntoIterator<Item = Command>) -> usize {
        cmds.into_iter()
            .map(|cmd| self.register(cmd))
            .filter(|result| result.is_ok())
            .count()
    }

    /// Remove a command. Returns whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.registry.remove(name).is_some()
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.registry.get(name)
    }

    /// Mutable access to a registered command, e.g. to rebind its handler.
    pub fn command_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.registry.get_mut(name)
    }

    /// Replace what happens when a line names no executable command.
    ///
    /// The handler's own result is ignored: dispatch always reports
    /// [`Outcome::NotFound`] in that case.
    pub fn set_not_found<F>(&mut self, f: F)
    where
        F: Fn(&[String], &mut Console) -> anyhow::Result<Outcome> + 'static,
    {
        self.not_found = Rc::new(f);
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Change the prompt. Takes effect on the next line request.
    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Arguments of the most recently dispatched line.
    pub fn args(&self) -> &[String] {
        &self.argv
    }

    pub fn argc(&self) -> usize {
        self.argv.len()
    }

    /// Words offered for completion on the next line request.
    ///
    /// Unless overridden with [`Console::set_completions`] these are the
    /// names of all commands shown by either help surface.
    pub fn completions(&self) -> Vec<String> {
        match &self.completions {
            Some(words) => words.clone(),
            None => self.registry.shown_names(),
        }
    }

    /// Use a fixed completion list, or go back to the registry with `None`.
    pub fn set_completions(&mut self, words: Option<Vec<String>>) {
        self.completions = words;
    }

    /// Split `line` into arguments and run the command named by the first one.
    ///
    /// The arguments replace those of the previous dispatch, even when empty.
    /// - No arguments: [`Outcome::Failed`], nothing is looked up.
    /// - A registered command with [`Flags::EXECUTABLE`]: its handler's result.
    ///   A handler error is printed and reported as `Code(1)`.
    /// - Anything else, including a registered command that may not run: the
    ///   not-found handler is called and the result is [`Outcome::NotFound`].
    pub fn dispatch(&mut self, line: &str) -> Outcome {
        self.argv = lexer::tokenize(line);
        log::debug!("collected {} arguments: {:?}", self.argv.len(), self.argv);
        if self.verbosity >= Verbosity::Verbose {
            self.echo_args();
        }

        let Some(name) = self.argv.first() else {
            return Outcome::Failed;
        };
        let handler = self
            .registry
            .get(name)
            .filter(|cmd| cmd.flags().contains(Flags::EXECUTABLE))
            .map(Command::handler);

        let argv = self.argv.clone();
        match handler {
            Some(handler) => self.invoke(&*handler, &argv),
            None => {
                log::debug!("no executable command named '{}'", argv[0]);
                let not_found = Rc::clone(&self.not_found);
                self.invoke(&*not_found, &argv);
                Outcome::NotFound
            }
        }
    }

    /// Read one line and dispatch it.
    ///
    /// Returns `Ok(None)` when the input is exhausted; the stored arguments are
    /// cleared and a newline is printed so the next prompt starts on its own
    /// line.
    pub fn step(&mut self) -> Result<Option<Outcome>> {
        let candidates = self.completions();
        match self.io.input.read_line(&self.prompt, &candidates)? {
            Some(line) => Ok(Some(self.dispatch(&line))),
            None => {
                self.argv.clear();
                writeln!(self.io.output)?;
                Ok(None)
            }
        }
    }

    /// Read and dispatch lines until input ends or a command returns
    /// [`Outcome::Stop`]. Every other outcome keeps the loop going.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.step()? {
                None | Some(Outcome::Stop) => break,
                Some(_) => {}
            }
        }
        self.io.output.flush()?;
        Ok(())
    }

    /// Run `child` to completion on this console's streams.
    ///
    /// Meant to be called from a handler: the parent loop is blocked until the
    /// child loop ends, then the streams are handed back.
    pub fn run_nested(&mut self, child: &mut Console) -> Result<()> {
        std::mem::swap(&mut self.io, &mut child.io);
        let result = child.run();
        std::mem::swap(&mut self.io, &mut child.io);
        result
    }

    fn invoke(&mut self, handler: &dyn Handler, argv: &[String]) -> Outcome {
        match handler.call(argv, self) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::debug!("command '{}' failed: {:#}", argv[0], e);
                if let Err(io_err) = writeln!(self.io.output, "{}: {:#}", argv[0], e) {
                    log::debug!("could not report failure: {}", io_err);
                }
                Outcome::Code(1)
            }
        }
    }

    fn warn(&mut self, message: &str) {
        log::debug!("{}", message);
        if self.verbosity < Verbosity::Warning {
            return;
        }
        if let Err(e) = writeln!(self.io.errors, "Warning: {}", message) {
            log::debug!("could not write warning: {}", e);
        }
    }

    fn echo_args(&mut self) {
        let mut text = format!("Collected {} arguments. They are:\n", self.argv.len());
        if !self.argv.is_empty() {
            let quoted: Vec<String> = self.argv.iter().map(|a| format!("'{}'", a)).collect();
            text.push_str(&quoted.join(" "));
            text.push('\n');
        }
        if let Err(e) = self.io.output.write_all(text.as_bytes()) {
            log::debug!("could not echo arguments: {}", e);
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut commands: Vec<&Command> = self.registry.iter().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        f.debug_struct("Console")
            .field("items", &self.registry.len())
            .field("argc", &self.argv.len())
            .field("argv0", &self.argv.first())
            .field("verbosity", &self.verbosity)
            .field("prompt", &self.prompt)
            .field("commands", &commands)
            .finish()
    }
}
