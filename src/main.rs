use clap::Parser;
use eyre::Result;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use taskboard::{Config, Shell};
use tracing::Level;

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(about = "taskboard - Add, complete and filter tasks in an interactive session")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the config file (default: <config dir>/taskboard/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing; stdout belongs to the session
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if cli.no_color {
        config.color = false;
    }

    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut shell = Shell::new(&config).with_prompt(interactive);
    shell.run(stdin.lock(), io::stdout().lock())?;

    Ok(())
}
