//! postlint CLI - frontmatter checks for a Markdown content tree

use clap::{Parser, Subcommand};
use postlint_lib::config::{CONTENT_DIR_ENV, DEFAULT_CONFIG_FILE, DEFAULT_CONTENT_DIR};
use postlint_lib::format::{format_seo_json, format_seo_text, format_titles_json, format_titles_text};
use postlint_lib::{LintConfig, PostlintError, TitleMode, analyze_seo, check_titles};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status when unresolved issues or per-file failures remain.
const EXIT_ISSUES: u8 = 1;
/// Exit status for fatal setup errors.
const EXIT_FATAL: u8 = 2;

/// Check and fix blog post frontmatter
#[derive(Parser)]
#[command(name = "postlint", version, about, after_help = AFTER_HELP)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Path to a TOML config file [default: ./postlint.toml if present]
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the title field of every document
    Titles {
        /// Content directory to scan
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Quote titles that contain an unquoted colon, rewriting files in place
        #[arg(long)]
        fix: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report title, description and keywords coverage
    Seo {
        /// Content directory to scan
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}

const AFTER_HELP: &str = "\
CONTENT DIRECTORY:
  When DIR is omitted it is taken from $POSTLINT_CONTENT_DIR, then the
  config file's content_dir, then ./content.

EXIT STATUS:
  0  no unresolved issues
  1  title issues or unreadable/unwritable files remain
  2  fatal error (missing directory, invalid config)
";

/// Filter directives for a `-v` count when `RUST_LOG` is unset.
///
/// `-v` surfaces the per-run summaries logged by the batch drivers, `-vv`
/// adds per-document decisions, and `-vvv` adds parser traces.
fn default_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,postlint_lib::batch=info",
        2 => "warn,postlint_lib=debug,postlint=debug",
        _ => "info,postlint_lib=trace,postlint=trace",
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the `-v` count.
fn init_tracing(verbose: u8, json: bool) {
    let directives =
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(verbose).to_string());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
        return;
    }

    // file:line only at -vvv
    let detailed = verbose >= 3;
    registry
        .with(
            fmt::layer()
                .compact()
                .with_target(verbose >= 2)
                .with_file(detailed)
                .with_line_number(detailed)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Explicit `--config`, else `./postlint.toml` when it exists, else defaults.
fn load_config(explicit: Option<&Path>) -> Result<LintConfig, PostlintError> {
    match explicit {
        Some(path) => LintConfig::load(path),
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                LintConfig::load(default)
            } else {
                Ok(LintConfig::new())
            }
        }
    }
}

fn resolve_content_dir(arg: Option<PathBuf>, config: &LintConfig) -> PathBuf {
    arg.or_else(|| std::env::var_os(CONTENT_DIR_ENV).map(PathBuf::from))
        .or_else(|| config.content_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR))
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;
    let color =
        !cli.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal();

    match cli.command {
        Commands::Titles { dir, fix, json } => {
            let root = resolve_content_dir(dir, &config);
            let mode = if fix { TitleMode::Fix } else { TitleMode::Report };
            tracing::debug!(root = %root.display(), ?mode, "checking titles");
            let report = check_titles(&root, &config, mode)?;

            if json {
                println!("{}", format_titles_json(&report)?);
            } else {
                print!("{}", format_titles_text(&report, color));
            }

            if report.is_clean() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_ISSUES))
            }
        }
        Commands::Seo { dir, json } => {
            let root = resolve_content_dir(dir, &config);
            tracing::debug!(root = %root.display(), "analyzing seo fields");
            let report = analyze_seo(&root, &config)?;

            if json {
                println!("{}", format_seo_json(&report)?);
            } else {
                print!("{}", format_seo_text(&report, color));
            }

            if report.failures.is_empty() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_ISSUES))
            }
        }
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_verbosity, cli.log_json);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
