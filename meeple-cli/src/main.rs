//! meeple-bridge CLI
//!
//! Copies a BoardGameGeek collection or logged plays into Ludopedia.

mod cli_types;
mod commands;
mod error;
mod logging;
mod prompt;

use clap::Parser;

use meeple_ludopedia::Settings;

use cli_types::{AccountArgs, Cli, Commands, ConfigAction};
use commands::import::ImportKind;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.quiet, cli.verbose);

    let result = match cli.command {
        Commands::Collection { import } => commands::import::run_import(
            &cli.account,
            ImportKind::Collection,
            &import,
            cli.quiet,
        ),
        Commands::Plays { from, to, import } => commands::import::run_import(
            &cli.account,
            ImportKind::Plays { from, to },
            &import,
            cli.quiet,
        ),
        Commands::Users => commands::users::run_users(&cli.account),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Setup => commands::config::run_config_setup(),
            ConfigAction::Path => commands::config::run_config_path(),
        },
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Settings from the environment and config file, with command-line
/// overrides applied.
pub(crate) fn load_settings(account: &AccountArgs) -> Settings {
    Settings::load().with_overrides(
        account.bgg_user.clone(),
        account.email.clone(),
        account.password.clone(),
        account.user_map.clone(),
    )
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}
