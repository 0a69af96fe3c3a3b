use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "scriptorium",
    about = "Incremental full-text search over a library of annotated scrolls"
)]
pub struct Cli {
    /// Override the XDG data directory (index and watermark live here)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding the scroll sources
    #[arg(long, global = true)]
    pub library: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index scrolls added or changed since the last update
    Update(UpdateArgs),
    /// Remove a scroll from the index
    Remove(RemoveArgs),
    /// Search the index
    Search(SearchArgs),
    /// Show the number of scrolls and the size of the library
    Stats(StatsArgs),
    /// Print the metadata parsed from one scroll
    Show(ShowArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Update --

#[derive(Debug, Parser)]
pub struct UpdateArgs {
    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Remove --

#[derive(Debug, Parser)]
pub struct RemoveArgs {
    /// Identifiers of the scrolls (file names without extension)
    #[arg(required = true)]
    pub ids: Vec<String>,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Maximum number of results to show
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Query terms; every term is required unless prefixed with `~`
    /// (optional) or `-` (excluded). Options go before the first term;
    /// use `--` when the first term itself looks like an option
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub query: Vec<String>,
}

impl SearchArgs {
    pub fn query_string(&self) -> String {
        self.query.join(" ")
    }
}

// -- Stats --

#[derive(Debug, Parser)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Show --

#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Identifier of the scroll
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "scriptorium",
            &mut std::io::stdout(),
        );
    }
}
