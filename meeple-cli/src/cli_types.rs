//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "meeple-bridge")]
#[command(about = "Move board game collections and plays from BoardGameGeek to Ludopedia", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub account: AccountArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for values otherwise read from the environment or config file.
#[derive(Args, Clone, Default)]
pub(crate) struct AccountArgs {
    /// BoardGameGeek username to read from
    #[arg(long, global = true)]
    pub bgg_user: Option<String>,

    /// Ludopedia login email
    #[arg(long, global = true)]
    pub email: Option<String>,

    /// Ludopedia login password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// User-mapping store (BoardGameGeek user = Ludopedia user or id)
    #[arg(long, global = true)]
    pub user_map: Option<PathBuf>,
}

/// Options shared by the import commands.
#[derive(Args, Clone)]
pub(crate) struct ImportArgs {
    /// Never prompt: ambiguous games use the first search result, games
    /// with no search result are skipped
    #[arg(long)]
    pub non_interactive: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Import the BoardGameGeek collection (owned and wishlisted games)
    Collection {
        #[command(flatten)]
        import: ImportArgs,
    },

    /// Import logged plays within a date range
    Plays {
        /// First day, dd/mm/yyyy (default: today)
        #[arg(long)]
        from: Option<String>,

        /// Last day, dd/mm/yyyy (default: same as --from)
        #[arg(long)]
        to: Option<String>,

        #[command(flatten)]
        import: ImportArgs,
    },

    /// Resolve the user-mapping store and print the result
    Users,

    /// Manage account configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show current settings and their sources
    Show,

    /// Interactively set up accounts
    Setup,

    /// Print the config file path
    Path,
}
