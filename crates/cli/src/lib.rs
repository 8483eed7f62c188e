use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod util;

use util::CliResult;

#[derive(Parser, Debug)]
#[command(name = "csspath", version, about = "Compile CSS selectors to XPath and try them on a sample page")]
pub struct Cli {
    /// Log verbosity; overrides RUST_LOG.
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevel>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile CSS selector lists (or pass XPath through) to XPath.
    Compile(commands::compile::CompileArgs),
    /// Show how a selector is split into segments.
    Segments(commands::segments::SegmentsArgs),
    /// Run an expression against the built-in sample page.
    Demo(commands::demo::DemoArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

pub fn run() -> CliResult<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level);
    tracing::debug!(command = ?cli.command, "running command");
    let output = execute(&cli.command)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

pub fn execute(command: &Command) -> CliResult<String> {
    match command {
        Command::Compile(args) => commands::compile::run(args),
        Command::Segments(args) => commands::segments::run(args),
        Command::Demo(args) => commands::demo::run(args),
    }
}

fn init_tracing(level: Option<LogLevel>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level.as_directive()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
