/// `junoio` command-line tool: decode, validate and inspect streamer
/// records of JUNO event-model classes.
///
/// # Command overview
///
/// ```text
/// junoio <COMMAND> [OPTIONS]
///
/// Commands:
///   decode     Decode entries with a reader tree built from a class description
///   validate   Check that entries decode cleanly against a class description
///   inspect    Print the structural tokens at an offset plus a hex dump
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log reader-tree construction and decode progress
///   -q, --quiet      Suppress all log output
///   --no-color       Disable ANSI colours in log output
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                         |
/// |------|-------------------------------------------------|
/// | 0    | Success                                         |
/// | 1    | Error (I/O failure, bad description, bad data)  |
///
/// Logs and error details go to stderr so stdout can be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

mod cmd_decode;
mod cmd_inspect;
mod cmd_validate;
mod render;
mod source;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Decode JUNO event-model records from raw streamer bytes.
#[derive(Parser)]
#[command(name = "junoio", version, about = "JUNO streamer record decoder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log reader-tree construction and decode progress to stderr.
    /// Honours `RUST_LOG` when set.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable ANSI colours in log output.
    #[arg(long, global = true)]
    no_color: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Decode entries and print the named columns as JSON.
    Decode(DecodeArgs),
    /// Check that every entry decodes and ends where it should.
    Validate(ValidateArgs),
    /// Print the structural tokens at an offset plus a hex dump.
    Inspect(InspectArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Inputs shared by `decode` and `validate`.
///
/// ```text
/// ┌────────────────┬──────────────────────────────────────────────────────┐
/// │ Flag           │ Effect                                               │
/// ├────────────────┼──────────────────────────────────────────────────────┤
/// │ --type T       │ class or type name of the root reader                │
/// │ --name N       │ root member name (defaults to the type name)         │
/// │ --path P       │ branch path the root lives under                     │
/// │ --offsets a,b  │ entry start offsets plus the final end offset        │
/// │ --strict       │ prefix-rooted classes assert their byte count        │
/// │ --require-flag │ reject byte counts without the count flag            │
/// └────────────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// Without `--offsets` the whole data file is treated as one entry.
#[derive(clap::Args)]
pub struct SourceArgs {
    /// JSON class description (`{"classes": {...}}`).
    pub schema: PathBuf,

    /// Raw, uncompressed entry bytes.
    pub data: PathBuf,

    /// Type of the root member, e.g. `JM::SimEvt` or `vector<JM::SmartRef>`.
    #[arg(long = "type", value_name = "TYPE")]
    pub type_name: String,

    /// Name of the root member. Defaults to the type name.
    #[arg(long)]
    pub name: Option<String>,

    /// Branch path, used to match reader overrides such as the
    /// navigator's wrapped references.
    #[arg(long, default_value = "")]
    pub path: String,

    /// Comma-separated entry offsets: every entry start plus the end of
    /// the last entry.
    #[arg(long, value_delimiter = ',')]
    pub offsets: Option<Vec<usize>>,

    /// Assert the declared byte count of prefix-rooted classes.
    #[arg(long)]
    pub strict: bool,

    /// Reject byte-count prefixes without the count flag bit.
    #[arg(long)]
    pub require_flag: bool,
}

/// Arguments for `junoio decode`.
#[derive(clap::Args)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Write the JSON to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `junoio validate`.
///
/// Runs the same decode as `junoio decode` but prints a `✓`/`✗` report
/// instead of the values. Exits with code 1 on any failure.
#[derive(clap::Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Header layout to assume at the inspected offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// `[object header][byte count][version]`
    Object,
    /// `[byte count][version][4 reserved]`
    Prefix,
    /// `[byte count][version]`
    Bare,
}

/// Arguments for `junoio inspect`.
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Raw entry bytes.
    pub data: PathBuf,

    /// Byte offset of the record to inspect.
    #[arg(long, default_value_t = 0)]
    pub at: usize,

    /// Header layout expected at the offset.
    #[arg(long, value_enum, default_value_t = Layout::Object)]
    pub layout: Layout,

    /// Maximum number of bytes in the hex dump.
    #[arg(long, default_value_t = 256)]
    pub limit: usize,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(cli: &Cli) {
    // --quiet wins; --verbose honours RUST_LOG and falls back to info;
    // otherwise only warnings reach the terminal.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    let ansi = !(cli.no_color || std::env::var_os("NO_COLOR").is_some());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::Inspect(args) => cmd_inspect::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
