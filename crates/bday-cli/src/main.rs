#![forbid(unsafe_code)]

mod cmd;
mod context;
mod output;

use bday_core::config;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use context::AppContext;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "bday: a small birthday roster",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (defaults to pretty on a TTY, text when piped).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (shorthand for `--format json`).
    #[arg(long, global = true)]
    json: bool,

    /// Roster file to use instead of the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Reference date for day counts instead of today.
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    today: Option<NaiveDate>,

    /// Suppress non-essential output.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Roster",
        about = "Add a birthday",
        long_about = "Add a person and their birth date. Names are unique case-insensitively and the roster holds at most roster.max_records entries.",
        after_help = "EXAMPLES:\n    # Add a birthday\n    bday add Ann 1999-03-14\n\n    # Emit machine-readable output\n    bday add Ann 1999-03-14 --json"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Read",
        about = "List birthdays in calendar order",
        long_about = "List birthdays sorted by month and day, optionally filtered by name and month.",
        after_help = "EXAMPLES:\n    # Everyone\n    bday list\n\n    # Names containing \"bi\" born in July\n    bday list --name bi --month jul\n\n    # Zero-based month number\n    bday list --month 6"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the next birthday",
        after_help = "EXAMPLES:\n    # Next birthday from today\n    bday next\n\n    # From a fixed date\n    bday next --today 2024-11-08"
    )]
    Next(cmd::next::NextArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the soonest upcoming birthdays",
        after_help = "EXAMPLES:\n    # Next three\n    bday upcoming\n\n    # Next five as JSON\n    bday upcoming -n 5 --json"
    )]
    Upcoming(cmd::upcoming::UpcomingArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show roster size, store location, and the next birthday"
    )]
    Status(cmd::status::StatusArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    bday completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("BDAY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "bday=debug,bday_core=debug,info"
        } else {
            "bday=info,bday_core=info,warn"
        })
    });

    let format = env::var("BDAY_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(args) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let config = config::load_config();
    let output = resolve_output_mode(
        cli.format,
        cli.json,
        config.as_ref().ok().and_then(|c| c.output.as_deref()),
    );
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            let code = bday_core::error::ErrorCode::ConfigParseError;
            render_error(
                output,
                &CliError::with_details(
                    format!("{err:#}"),
                    code.hint().unwrap_or_default(),
                    code.code(),
                ),
            )?;
            return Err(err);
        }
    };

    let mut ctx = match AppContext::open(config, cli.store, cli.today, output, cli.quiet) {
        Ok(ctx) => ctx,
        Err(err) => {
            render_error(output, &CliError::from(&err))?;
            return Err(err);
        }
    };

    match cli.command {
        Commands::Add(ref args) => cmd::add::run_add(args, &mut ctx),
        Commands::List(ref args) => cmd::list::run_list(args, &ctx),
        Commands::Next(ref args) => cmd::next::run_next(args, &ctx),
        Commands::Upcoming(ref args) => cmd::upcoming::run_upcoming(args, &ctx),
        Commands::Status(ref args) => cmd::status::run_status(args, &ctx),
        Commands::Completions(_) => Ok(()),
    }
}
