//! Commands of the demonstration console.

use anyhow::{Context, Result};
use argh::FromArgs;
use console_commands::{Command, Console, Flags, Outcome, TypedCommand};
use std::cell::Cell;
use std::rc::Rc;

/// Register every demo command. Returns how many were added.
pub fn register(console: &mut Console) -> usize {
    console.register_all([
        Command::from_fn("echo", "Echos whatever you write", echo)
            .with_extended_help("Usage: echo [-n] [WORD]..."),
        Command::typed::<Cat>("cat", "Prints the contents of whichever file(s) you specify")
            .with_extended_help("Usage: cat [FILE]..."),
        Command::from_fn("math", "Enters mathematics mode", math)
            .with_extended_help("Usage: math"),
        Command::from_fn("args", "Prints out each argument", print_args)
            .with_extended_help("Usage: args [WORD]..."),
        Command::from_fn(
            "quiet",
            "This is a quiet command. You can't see it in help, but you can if you do help quiet, and you can run it",
            |_, console| say(console, "THIS IS QUIET"),
        )
        .with_extended_help("Usage: quiet")
        .with_flags(Flags::QUIET),
        Command::from_fn(
            "secret",
            "This is a secret command. It should not show up in help, but you can run it",
            |_, console| say(console, "THIS IS A SECRET!"),
        )
        .with_extended_help("Usage: secret")
        .with_flags(Flags::SECRET),
        Command::from_fn(
            "silent",
            "This is a silent command. It should not show up in help, and you can not run it",
            |_, console| say(console, "YOU SHOULD NEVER SEE THIS"),
        )
        .with_extended_help("Usage: silent")
        .with_flags(Flags::SILENT),
    ])
}

fn say(console: &mut Console, text: &str) -> Result<Outcome> {
    writeln!(console.out(), "{}", text)?;
    Ok(Outcome::Code(0))
}

/// Words after `echo` are printed verbatim, so `-5` or `--x` are not options.
/// Only a leading `-n` is taken, to drop the trailing newline.
fn echo(argv: &[String], console: &mut Console) -> Result<Outcome> {
    let (no_newline, words) = match argv.get(1).map(String::as_str) {
        Some("-n") => (true, &argv[2..]),
        _ => (false, argv.get(1..).unwrap_or_default()),
    };
    let s = words.join(" ");
    if no_newline {
        write!(console.out(), "{}", s)?;
    } else {
        writeln!(console.out(), "{}", s)?;
    }
    Ok(Outcome::Code(0))
}

#[derive(FromArgs)]
/// print file(s) to the console
pub struct Cat {
    #[argh(positional, greedy)]
    /// files to print, in order
    pub files: Vec<String>,
}

impl TypedCommand for Cat {
    fn execute(self, console: &mut Console) -> Result<Outcome> {
        for fname in self.files {
            let mut f = std::fs::File::open(&fname).with_context(|| format!("cannot open {}", fname))?;
            std::io::copy(&mut f, console.out())?;
        }
        Ok(Outcome::Code(0))
    }
}

/// Prints every argument, the command name included, in double quotes.
fn print_args(argv: &[String], console: &mut Console) -> Result<Outcome> {
    let quoted: Vec<String> = argv.iter().map(|a| format!("\"{}\"", a)).collect();
    writeln!(console.out(), "{}", quoted.join(" "))?;
    Ok(Outcome::Code(argv.len() as i32))
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    fn name(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
        }
    }

    fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '-',
            Op::Mul => '*',
            Op::Div => '/',
        }
    }

    /// Sum of the arguments for `add`/`sub`, product for `mul`/`div`.
    fn operand(self, values: &[i64]) -> i64 {
        match self {
            Op::Add | Op::Sub => values.iter().fold(0, |acc, v| acc.wrapping_add(*v)),
            Op::Mul | Op::Div => values.iter().fold(1, |acc, v| acc.wrapping_mul(*v)),
        }
    }

    fn apply(self, total: i64, value: i64) -> i64 {
        match self {
            Op::Add => total.wrapping_add(value),
            Op::Sub => total.wrapping_sub(value),
            Op::Mul => total.wrapping_mul(value),
            // division by zero leaves the total alone
            Op::Div => total.wrapping_div(if value == 0 { 1 } else { value }),
        }
    }
}

fn parse_integers(args: &[String]) -> Result<Vec<i64>> {
    args.iter()
        .map(|a| {
            a.parse::<i64>()
                .with_context(|| format!("'{}' is not a valid integer", a))
        })
        .collect()
}

fn operation(op: Op, total: Rc<Cell<i64>>) -> Command {
    let help = match op {
        Op::Add => "adds integers",
        Op::Sub => "subtracts integers",
        Op::Mul => "multiplies integers",
        Op::Div => "divides integers",
    };
    Command::from_fn(op.name(), help, move |argv, console| {
        let value = op.operand(&parse_integers(&argv[1..])?);
        let old = total.get();
        let new = op.apply(old, value);
        total.set(new);
        console.set_prompt(format!("{} {} {} = {}\n$ ", old, op.symbol(), value, new));
        Ok(Outcome::Code(0))
    })
    .with_extended_help(format!("Usage: {} INTEGER [INTEGER]...", op.name()))
}

/// Runs a calculator console until its `exit`, then returns to the caller.
fn math(_argv: &[String], console: &mut Console) -> Result<Outcome> {
    let total = Rc::new(Cell::new(0i64));
    let mut calc = Console::new();
    calc.set_verbosity(console.verbosity());
    calc.set_prompt(format!("{}\n$ ", total.get()));

    for op in [Op::Add, Op::Sub, Op::Mul, Op::Div] {
        calc.register(operation(op, total.clone()))?;
    }
    let reset_total = total.clone();
    calc.register(
        Command::from_fn("reset", "sets the current stored value (default 0)", move |argv, calc| {
            let value = match argv.get(1) {
                Some(arg) => arg
                    .parse::<i64>()
                    .with_context(|| format!("'{}' is not a valid integer", arg))?,
                None => 0,
            };
            reset_total.set(value);
            calc.set_prompt(format!("{}\n$ ", value));
            Ok(Outcome::Code(0))
        })
        .with_extended_help("Usage: reset [INTEGER]"),
    )?;
    if let Some(exit) = calc.command_mut("exit") {
        exit.set_handler_fn(|_, _| Ok(Outcome::Stop));
    }

    console.run_nested(&mut calc)?;
    writeln!(console.out(), "Exiting mathematics mode")?;
    Ok(Outcome::Code(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_commands::{MemWriter, ScriptedInput};
    use std::env as stdenv;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn demo_console() -> (Console, MemWriter) {
        let out = MemWriter::new();
        let mut console = Console::new();
        console.set_output(Box::new(out.clone()));
        console.set_errors(Box::new(MemWriter::new()));
        assert_eq!(register(&mut console), 7);
        (console, out)
    }

    #[test]
    fn test_echo_with_and_without_newline() {
        let (mut console, out) = demo_console();
        assert_eq!(console.dispatch("echo hello \"big world\""), Outcome::Code(0));
        assert_eq!(out.contents(), "hello big world\n");

        console.dispatch("echo -n foo bar");
        assert_eq!(out.contents(), "hello big world\nfoo bar");
    }

    #[test]
    fn test_echo_prints_dash_words_verbatim() {
        let (mut console, out) = demo_console();
        assert_eq!(console.dispatch("echo -5 apples"), Outcome::Code(0));
        assert_eq!(console.dispatch("echo --help -n"), Outcome::Code(0));
        assert_eq!(console.dispatch("echo"), Outcome::Code(0));
        assert_eq!(out.contents(), "-5 apples\n--help -n\n\n");
    }

    #[test]
    fn test_args_quotes_each_argument() {
        let (mut console, out) = demo_console();
        assert_eq!(console.dispatch("args one \"two  three\""), Outcome::Code(3));
        assert_eq!(out.contents(), "\"args\" \"one\" \"two  three\"\n");
    }

    #[test]
    fn test_cat_reads_file() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = stdenv::temp_dir().join(format!("console_cat_{}_{}", std::process::id(), nanos));
        fs::write(&path, "line 1\nline 2\n").unwrap();

        let (mut console, out) = demo_console();
        let line = format!("cat \"{}\"", path.to_string_lossy());
        assert_eq!(console.dispatch(&line), Outcome::Code(0));
        assert_eq!(out.contents(), "line 1\nline 2\n");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_cat_missing_file_fails() {
        let (mut console, out) = demo_console();
        assert_eq!(console.dispatch("cat /definitely/not/here"), Outcome::Code(1));
        assert!(out.contents().starts_with("cat: cannot open /definitely/not/here: "));
    }

    #[test]
    fn test_visibility_commands() {
        let (mut console, out) = demo_console();
        assert_eq!(console.dispatch("quiet"), Outcome::Code(0));
        assert_eq!(console.dispatch("secret"), Outcome::Code(0));
        assert_eq!(console.dispatch("silent"), Outcome::NotFound);

        let s = out.contents();
        assert!(s.contains("THIS IS QUIET\n"));
        assert!(s.contains("THIS IS A SECRET!\n"));
        assert!(!s.contains("YOU SHOULD NEVER SEE THIS"));
    }

    #[test]
    fn test_math_mode_keeps_running_total() {
        let (mut console, out) = demo_console();
        let (input, requests) = ScriptedInput::with_log([
            "math", "add 2 3", "mul 4", "sub 1 1", "div 0", "bogus", "reset 7", "exit", "echo back",
        ]);
        console.set_input(Box::new(input));

        console.run().unwrap();

        let prompts: Vec<String> = requests.borrow().iter().map(|r| r.prompt.clone()).collect();
        assert_eq!(
            prompts,
            vec![
                "> ",
                "0\n$ ",
                "0 + 5 = 5\n$ ",
                "5 * 4 = 20\n$ ",
                "20 - 2 = 18\n$ ",
                "18 / 0 = 18\n$ ",
                "18 / 0 = 18\n$ ",
                "7\n$ ",
                "> ",
                "> ",
            ]
        );
        let s = out.contents();
        assert!(s.contains("The command 'bogus' was not found."));
        assert!(s.contains("Exiting mathematics mode\nback\n"));
    }

    #[test]
    fn test_math_candidates_are_its_own() {
        let (mut console, _) = demo_console();
        let (input, requests) = ScriptedInput::with_log(["math", "exit"]);
        console.set_input(Box::new(input));

        console.run().unwrap();

        let requests = requests.borrow();
        assert!(requests[0].candidates.contains(&"math".to_string()));
        assert_eq!(
            requests[1].candidates,
            vec!["add", "div", "exit", "help", "mul", "reset", "sub"]
        );
    }
}
