mod commands;
mod ui;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(
    name = "flll",
    version,
    about = "Keep TYPO3 label files (T3locallang .xml and XLIFF .xlf) in sync"
)]
struct Cli {
    /// Site root that relative and EXT: references resolve against (default: config or CWD)
    #[arg(long, global = true)]
    site_root: Option<PathBuf>,

    /// Language code besides `default`; repeat for more (default: config)
    #[arg(long = "lang", global = true)]
    languages: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add label identifiers to a label file in every language
    Write {
        /// Label file reference, e.g. LLL:EXT:my_ext/Resources/Private/Language/locallang.xlf
        reference: String,
        /// Identifiers to add (letters, digits, `.` and `_`)
        #[arg(required = true)]
        identifiers: Vec<String>,
    },

    /// Create or complete the skeleton of a label file without adding labels
    Ensure { reference: String },

    /// Show which format and files a reference maps to, without writing
    Resolve { reference: String },

    /// Dump JSON schemas of the report types
    Schema {
        /// Output directory (default: config [schema].out_dir or ./docs/assets/schemas)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

/// Settings shared by every command after merging flags with configuration.
pub struct Context {
    pub site_root: PathBuf,
    pub languages: Vec<String>,
    pub format: OutputFormat,
    pub use_color: bool,
    pub config: flll_config::FlllConfig,
}

trait Runnable {
    fn run(self, ctx: &Context) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, ctx: &Context) -> Result<()> {
        debug!(event = "command_args", cmd = ?self);
        match self {
            Commands::Write {
                reference,
                identifiers,
            } => commands::write::run_write(ctx, &reference, &identifiers),
            Commands::Ensure { reference } => commands::ensure::run_ensure(ctx, &reference),
            Commands::Resolve { reference } => commands::resolve::run_resolve(ctx, &reference),
            Commands::Schema { out_dir } => commands::schema::run_schema(ctx, out_dir),
        }
    }
}

fn init_tracing(quiet: bool, log_dir: Option<&str>) -> Option<WorkerGuard> {
    let default_level = if quiet { "warn" } else { "info" };
    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        );

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(rolling::daily(dir, "flll.log"));
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = flll_config::load_config()?;
    let _guard = init_tracing(cli.quiet, config.log_dir.as_deref());

    let site_root = match cli.site_root.or_else(|| config.site_root.clone().map(PathBuf::from)) {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let languages = if cli.languages.is_empty() {
        config.languages.clone().unwrap_or_default()
    } else {
        cli.languages
    };
    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    info!(event = "flll_start", version = env!("CARGO_PKG_VERSION"), site_root = %site_root.display());

    let ctx = Context {
        site_root,
        languages,
        format: cli.format,
        use_color,
        config,
    };
    cli.cmd.run(&ctx)
}
