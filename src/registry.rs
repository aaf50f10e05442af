//! Name-keyed storage of the commands a console knows about.

use crate::builtin;
use crate::command::{Command, HelpKind};
use crate::error::{ConsoleError, Result};
use std::collections::HashMap;

/// Commands keyed by their exact name.
///
/// A fresh registry always holds the `help` and `exit` built-ins. Iteration and
/// listing order is unspecified.
pub struct Registry {
    commands: HashMap<String, Command>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
        };
        for cmd in [builtin::help(), builtin::exit()] {
            registry.commands.insert(cmd.name().to_string(), cmd);
        }
        registry
    }

    /// Insert `cmd` unless its name is empty or already taken.
    ///
    /// On error the registry is left untouched.
    pub fn insert(&mut self, cmd: Command) -> Result<()> {
        if cmd.name().is_empty() {
            return Err(ConsoleError::EmptyName);
        }
        if self.commands.contains_key(cmd.name()) {
            return Err(ConsoleError::DuplicateCommand(cmd.name().to_string()));
        }
        self.commands.insert(cmd.name().to_string(), cmd);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.commands.get_mut(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Command> {
        self.commands.remove(name)
    }

    /// Names of the commands that the given help surface shows.
    pub fn names_for(&self, kind: HelpKind) -> Vec<String> {
        self.commands
            .values()
            .filter(|cmd| cmd.flags().contains(kind.flag()))
            .map(|cmd| cmd.name().to_string())
            .collect()
    }

    /// Names of the commands visible on either help surface.
    pub fn shown_names(&self) -> Vec<String> {
        self.commands
            .values()
            .filter(|cmd| cmd.flags().is_shown())
            .map(|cmd| cmd.name().to_string())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Flags, Outcome};

    fn noop(name: &str, flags: Flags) -> Command {
        Command::from_fn(name, "noop", |_, _| Ok(Outcome::Code(0))).with_flags(flags)
    }

    fn sorted(mut names: Vec<String>) -> Vec<String> {
        names.sort();
        names
    }

    #[test]
    fn test_new_registry_has_builtins() {
        let reg = Registry::new();
        assert_eq!(reg.len(), 2);
        assert!(reg.get("help").is_some());
        assert!(reg.get("exit").is_some());
    }

    #[test]
    fn test_duplicate_insert_keeps_first() {
        let mut reg = Registry::new();
        reg.insert(Command::from_fn("dup", "first", |_, _| Ok(Outcome::Code(1))))
            .unwrap();
        let err = reg
            .insert(Command::from_fn("dup", "second", |_, _| Ok(Outcome::Code(2))))
            .unwrap_err();

        assert!(matches!(err, ConsoleError::DuplicateCommand(ref n) if n == "dup"));
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.get("dup").unwrap().help(), "first");
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut reg = Registry::new();
        assert!(matches!(reg.insert(noop("", Flags::UNIVERSAL)), Err(ConsoleError::EmptyName)));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_lookup_is_exact() {
        let mut reg = Registry::new();
        reg.insert(noop("echo", Flags::UNIVERSAL)).unwrap();
        assert!(reg.get("echo").is_some());
        assert!(reg.get("ech").is_none());
        assert!(reg.get("echo2").is_none());
        assert!(reg.get("ECHO").is_none());
    }

    #[test]
    fn test_remove() {
        let mut reg = Registry::new();
        reg.insert(noop("gone", Flags::UNIVERSAL)).unwrap();
        assert!(reg.remove("gone").is_some());
        assert!(reg.get("gone").is_none());
        assert!(reg.remove("gone").is_none());
    }

    #[test]
    fn test_names_for_each_help_kind() {
        let mut reg = Registry::new();
        reg.insert(noop("echo", Flags::UNIVERSAL)).unwrap();
        reg.insert(noop("quiet", Flags::QUIET)).unwrap();
        reg.insert(noop("secret", Flags::SECRET)).unwrap();
        reg.insert(noop("silent", Flags::SILENT)).unwrap();

        assert_eq!(
            sorted(reg.names_for(HelpKind::General)),
            vec!["echo", "exit", "help"]
        );
        assert_eq!(
            sorted(reg.names_for(HelpKind::Specific)),
            vec!["echo", "exit", "help", "quiet"]
        );
        assert_eq!(
            sorted(reg.shown_names()),
            vec!["echo", "exit", "help", "quiet"]
        );
    }
}
