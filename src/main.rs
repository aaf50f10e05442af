use argh::FromArgs;
use console_commands::{Console, ReaderSource, Settings, Verbosity};
use std::io::{self, IsTerminal};

mod demo;

#[derive(FromArgs)]
/// Interactive demonstration console. Type `help` to see the commands.
struct Args {
    #[argh(option)]
    /// prompt shown before each line, overrides CONSOLE_PROMPT
    prompt: Option<String>,

    #[argh(option)]
    /// normal, warning or verbose, overrides CONSOLE_VERBOSITY
    verbosity: Option<Verbosity>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();

    let mut settings = Settings::from_env()?;
    if let Some(prompt) = args.prompt {
        settings.prompt = prompt;
    }
    if let Some(verbosity) = args.verbosity {
        settings.verbosity = verbosity;
    }
    log::debug!("starting console with {:?}", settings);

    let mut console = Console::with_settings(settings);
    if !io::stdin().is_terminal() {
        console.set_input(Box::new(ReaderSource::new(io::stdin().lock())));
    }
    let added = demo::register(&mut console);
    log::debug!("registered {} demo commands", added);

    console.run()?;
    Ok(())
}
