//! Morama CLI - Command-line log for watched movies and dramas

mod commands;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use morama::config::{self, Config};
use morama::logging;
use morama::ui::Printer;
use morama::{Error, ErrorKind, MediaType};

#[derive(Parser)]
#[command(name = "morama")]
#[command(version)]
#[command(about = "A CLI tool for managing your watched movies and dramas")]
#[command(long_about = r#"
Morama is a command-line application for tracking your watched movies and
dramas. Add entries with ratings and comments, and browse them by year.

Example usage:
  morama add "Inception" --movie
  morama add "Reply 1988" --drama
  morama list
  morama stats
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// `--movie` / `--drama` switches
#[derive(Args, Debug, Clone, Copy)]
struct TypeFlags {
    /// Movie entry
    #[arg(long)]
    movie: bool,

    /// Drama entry
    #[arg(long)]
    drama: bool,
}

impl TypeFlags {
    fn optional(&self) -> morama::Result<Option<MediaType>> {
        MediaType::from_flags(self.movie, self.drama)
    }

    fn required(&self) -> morama::Result<MediaType> {
        self.optional()?.ok_or_else(|| {
            Error::Validation("Must specify either --movie or --drama".to_string())
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new movie or drama entry
    Add {
        /// Title of the movie or drama
        title: String,

        #[command(flatten)]
        kind: TypeFlags,
    },

    /// Edit an existing entry by its ID
    Edit {
        /// Current title of the entry
        title: String,

        /// ID of the entry to edit
        #[arg(long)]
        id: i64,

        #[command(flatten)]
        kind: TypeFlags,
    },

    /// Delete entries by ID, by title, or all at once
    Delete {
        /// ID or exact title of the entry
        target: Option<String>,

        #[command(flatten)]
        kind: TypeFlags,

        /// Delete every entry (of the given type, if any)
        #[arg(long)]
        all: bool,

        /// Skip the confirmation prompt for --all
        #[arg(short, long)]
        yes: bool,
    },

    /// List all entries grouped by watched year
    List,

    /// Show the detailed record of an entry
    Show {
        /// Exact title of the entry
        title: String,

        #[command(flatten)]
        kind: TypeFlags,
    },

    /// Search entries by title
    Search {
        /// Text to look for in titles
        query: String,

        #[command(flatten)]
        kind: TypeFlags,
    },

    /// Show statistics about your collection
    Stats,

    /// Show version information
    Version,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Add { .. } => "add",
            Commands::Edit { .. } => "edit",
            Commands::Delete { .. } => "delete",
            Commands::List => "list",
            Commands::Show { .. } => "show",
            Commands::Search { .. } => "search",
            Commands::Stats => "stats",
            Commands::Version => "version",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Everything a command handler needs, built once at startup
pub struct Context {
    pub config: Config,
    pub data_dir: PathBuf,
    pub printer: Printer,
    pub output: OutputMode,
}

pub fn emit_success(output_mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    debug_assert!(!output_mode.is_human());
    let payload = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

fn emit_error(output_mode: OutputMode, printer: &Printer, kind: ErrorKind, message: &str) {
    if output_mode.is_human() {
        printer.failure(kind, message);
    } else {
        let payload = serde_json::json!({
            "ok": false,
            "error": message,
            "code": kind.exit_code(),
        });
        println!("{}", payload);
    }
}

fn error_kind(err: &anyhow::Error) -> ErrorKind {
    err.downcast_ref::<Error>()
        .map(Error::kind)
        .unwrap_or(ErrorKind::System)
}

fn setup(cli: &Cli, output: OutputMode) -> anyhow::Result<(Context, tracing_appender::non_blocking::WorkerGuard)> {
    let data_dir = config::data_dir()?;
    let config = Config::load_or_init(&config::config_path_in(&data_dir))?;
    let guard = logging::init(&config::log_dir_in(&data_dir), config.debug_mode || cli.verbose)?;
    let printer = Printer::new(&config);
    for notice in &config.notices {
        tracing::warn!("{}", notice);
        if output.is_human() {
            printer.warn(notice);
        }
    }
    Ok((
        Context {
            config,
            data_dir,
            printer,
            output,
        },
        guard,
    ))
}

fn run(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Add { title, kind } => commands::run_add(ctx, &title, kind.required()?),
        Commands::Edit { title, id, kind } => commands::run_edit(ctx, &title, id, kind.required()?),
        Commands::Delete { target, kind, all, yes } => {
            commands::run_delete(ctx, target.as_deref(), kind.optional()?, all, yes)
        }
        Commands::List => commands::run_list(ctx),
        Commands::Show { title, kind } => commands::run_show(ctx, &title, kind.required()?),
        Commands::Search { query, kind } => commands::run_search(ctx, &query, kind.optional()?),
        Commands::Stats => commands::run_stats(ctx),
        Commands::Version => commands::run_version(ctx.output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = if cli.json { OutputMode::Json } else { OutputMode::Human };

    let (ctx, _guard) = match setup(&cli, output) {
        Ok(ready) => ready,
        Err(err) => {
            let kind = error_kind(&err);
            emit_error(output, &Printer::plain(), kind, &format!("{:#}", err));
            return ExitCode::from(kind.exit_code() as u8);
        }
    };

    let name = cli.command.name();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let started = Instant::now();
    let result = run(&ctx, cli.command);
    tracing::info!(command = name, ?args, elapsed = ?started.elapsed(), ok = result.is_ok(), "command finished");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let kind = error_kind(&err);
            tracing::error!(command = name, ?kind, "{:#}", err);
            emit_error(ctx.output, &ctx.printer, kind, &format!("{:#}", err));
            ExitCode::from(kind.exit_code() as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context as _;

    #[test]
    fn test_error_kind_from_library_error() {
        let err = anyhow::Error::from(Error::NotFound("No entry found for ID 9".to_string()));
        assert_eq!(error_kind(&err), ErrorKind::NotFound);
        assert_eq!(error_kind(&err).exit_code(), 3);

        let err = anyhow::Error::from(Error::Validation("bad".to_string()));
        assert_eq!(error_kind(&err).exit_code(), 1);
    }

    #[test]
    fn test_error_kind_through_context() {
        let result: morama::Result<()> = Err(Error::UserInput("cancelled".to_string()));
        let err = result.context("while prompting").unwrap_err();
        assert_eq!(error_kind(&err), ErrorKind::UserInput);
    }

    #[test]
    fn test_error_kind_defaults_to_system() {
        let err = anyhow::anyhow!("unexpected");
        assert_eq!(error_kind(&err), ErrorKind::System);
        assert_eq!(error_kind(&err).exit_code(), 6);
    }

    #[test]
    fn test_conflicting_type_flags() {
        let flags = TypeFlags { movie: true, drama: true };
        assert!(flags.optional().is_err());
        let flags = TypeFlags { movie: false, drama: false };
        assert_eq!(flags.optional().unwrap(), None);
        assert_eq!(flags.required().unwrap_err().kind(), ErrorKind::Validation);
    }
}
