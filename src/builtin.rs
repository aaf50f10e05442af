//! Commands every console starts with, and the default not-found handler.

use crate::command::{Command, Flags, Outcome};
use crate::interpreter::Console;
use anyhow::Result;

/// The `help` built-in.
pub(crate) fn help() -> Command {
    Command::from_fn("help", "Shows this help", run_help).with_extended_help("Usage: help [command]")
}

/// The `exit` built-in.
pub(crate) fn exit() -> Command {
    Command::from_fn("exit", "Exits the program", run_exit).with_extended_help("Usage: exit")
}

/// Without arguments lists every listable command with its short help.
/// With arguments describes each named command that allows specific help.
fn run_help(argv: &[String], console: &mut Console) -> Result<Outcome> {
    let mut text = String::new();
    if argv.len() <= 1 {
        let mut listed: Vec<_> = console
            .registry()
            .iter()
            .filter(|cmd| cmd.flags().contains(Flags::LISTABLE))
            .collect();
        listed.sort_by(|a, b| a.name().cmp(b.name()));
        for cmd in listed {
            if cmd.help().is_empty() {
                text.push_str(&format!("{}\n", cmd.name()));
            } else {
                text.push_str(&format!("{}\t{}\n", cmd.name(), cmd.help()));
            }
        }
    } else {
        for name in &argv[1..] {
            match console.registry().get(name) {
                Some(cmd) if cmd.flags().contains(Flags::SPECIFICALLY_LISTABLE) => {
                    let help = if cmd.help().is_empty() {
                        "This command has no help text"
                    } else {
                        cmd.help()
                    };
                    text.push_str(&format!("{}\t{}\n", cmd.name(), help));
                    if let Some(extended) = cmd.extended_help() {
                        text.push_str(&format!("\t{}\n", extended));
                    }
                }
                _ => text.push_str(&format!("Could not find command {}\n", name)),
            }
        }
    }
    console.out().write_all(text.as_bytes())?;
    Ok(Outcome::Code(0))
}

/// Ends the whole process, not just the loop that dispatched it.
fn run_exit(_argv: &[String], console: &mut Console) -> Result<Outcome> {
    log::debug!("exit requested, terminating process");
    console.out().flush()?;
    std::process::exit(0)
}

/// Default reaction to a line whose first argument is not an executable command.
pub(crate) fn not_found(argv: &[String], console: &mut Console) -> Result<Outcome> {
    let name = argv.first().map(String::as_str).unwrap_or("");
    writeln!(
        console.out(),
        "The command '{}' was not found. Try typing 'help' to see a list of full commands",
        name
    )?;
    Ok(Outcome::NotFound)
}

#[cfg(test)]
mod tests {
    use crate::command::{Command, Flags, Outcome};
    use crate::interpreter::Console;
    use crate::io_adapters::MemWriter;

    fn console_with_output() -> (Console, std::rc::Rc<std::cell::RefCell<Vec<u8>>>) {
        let (writer, handle) = MemWriter::with_handle();
        let mut console = Console::new();
        console.set_output(Box::new(writer));
        for (name, flags) in [
            ("echo", Flags::UNIVERSAL),
            ("quiet", Flags::QUIET),
            ("secret", Flags::SECRET),
            ("silent", Flags::SILENT),
        ] {
            console
                .register(
                    Command::from_fn(name, format!("{name} help"), |_, _| Ok(Outcome::Code(0)))
                        .with_extended_help(format!("Usage: {name}"))
                        .with_flags(flags),
                )
                .unwrap();
        }
        (console, handle)
    }

    #[test]
    fn test_bare_help_lists_listable_commands() {
        let (mut console, out) = console_with_output();
        assert_eq!(console.dispatch("help"), Outcome::Code(0));

        let s = String::from_utf8(out.borrow().clone()).unwrap();
        assert_eq!(
            s,
            "echo\techo help\nexit\tExits the program\nhelp\tShows this help\n"
        );
    }

    #[test]
    fn test_specific_help() {
        let (mut console, out) = console_with_output();
        console.dispatch("help quiet echo");

        let s = String::from_utf8(out.borrow().clone()).unwrap();
        assert_eq!(
            s,
            "quiet\tquiet help\n\tUsage: quiet\necho\techo help\n\tUsage: echo\n"
        );
    }

    #[test]
    fn test_specific_help_hides_unlisted_and_unknown() {
        let (mut console, out) = console_with_output();
        console.dispatch("help secret silent nothing");

        let s = String::from_utf8(out.borrow().clone()).unwrap();
        assert_eq!(
            s,
            "Could not find command secret\nCould not find command silent\nCould not find command nothing\n"
        );
    }

    #[test]
    fn test_not_found_message() {
        let (mut console, out) = console_with_output();
        assert_eq!(console.dispatch("frobnicate now"), Outcome::NotFound);

        let s = String::from_utf8(out.borrow().clone()).unwrap();
        assert_eq!(
            s,
            "The command 'frobnicate' was not found. Try typing 'help' to see a list of full commands\n"
        );
    }
}
