use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use meeple_import::UserIdentityMap;
use meeple_ludopedia::LudopediaClient;

use crate::CliError;
use crate::cli_types::AccountArgs;

/// Resolve the user-mapping store and print `source -> id` pairs.
pub(crate) fn run_users(account: &AccountArgs) -> Result<(), CliError> {
    let settings = crate::load_settings(account);
    let path = &settings.user_map;

    if !path.exists() {
        return Err(CliError::config(format!(
            "User map {} not found",
            path.display()
        )));
    }

    log::info!(
        "Resolving users from {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    crate::log_blank();

    let client = LudopediaClient::anonymous()?;
    let users = UserIdentityMap::load(path, &client);

    if users.is_empty() {
        log::warn!("No users could be resolved");
        return Ok(());
    }

    for (source, id) in users.entries() {
        log::info!(
            "  {} {} {}",
            source.if_supports_color(Stdout, |t| t.bold()),
            "->".if_supports_color(Stdout, |t| t.dimmed()),
            id,
        );
    }
    crate::log_blank();
    log::info!("{} user(s) mapped", users.len());
    Ok(())
}
