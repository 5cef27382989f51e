//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Batched directory-existence checks for index uploads
#[derive(Parser, Debug)]
#[command(
    name = "treeprobe",
    version = env!("CARGO_PKG_VERSION"),
    about = "Check which document paths of an index upload exist at a commit",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter document paths down to the ones present at a commit
    #[command(
        about = "Keep document paths that exist at a commit",
        after_help = "Examples:\n  treeprobe check --repository-id 12 --commit 4f2a9c1 --root web paths.txt\n  git ls-files | treeprobe check --repository-id 12 --commit HEAD -\n\nKept paths are printed to stdout, one per line."
    )]
    Check {
        /// Repository identifier known to the frontend
        #[arg(long)]
        repository_id: i64,

        /// Commit the upload was generated for
        #[arg(long)]
        commit: String,

        /// Dump root, relative to the repository top level
        #[arg(long, default_value = "")]
        root: String,

        /// Frontend internal API url (overrides config)
        #[arg(long, env = "TREEPROBE_FRONTEND_URL")]
        frontend_url: Option<String>,

        /// Keep paths that resolve outside the dump root
        #[arg(long)]
        allow_outside_root: bool,

        /// Print dropped paths to stderr
        #[arg(long)]
        show_dropped: bool,

        /// File with one document path per line, `-` for stdin
        #[arg(value_name = "PATHS")]
        input: PathBuf,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings")]
    Config,

    /// Compute a document URI relative to a project root URI
    #[command(about = "Print a URL relative to a project root URL")]
    Relative {
        /// Project root URL (treated as a directory)
        base: String,

        /// Document URL
        target: String,
    },
}
