use std::io::{BufRead, Write};
use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use meeple_ludopedia::{SettingSource, Settings};

use crate::CliError;

fn mask_value(s: &str) -> String {
    if s.chars().count() <= 2 {
        "****".to_string()
    } else {
        let head: String = s.chars().take(2).collect();
        format!("{}****", head)
    }
}

/// Show current settings and their sources.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = meeple_ludopedia::config_path();
    let sources = meeple_ludopedia::setting_sources();
    let settings = Settings::load();

    log::info!(
        "{}",
        "meeple-bridge Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
        }
    }
    crate::log_blank();

    let fields: [(&str, &SettingSource, Option<String>); 6] = [
        ("bgg.username", &sources.bgg_username, settings.bgg_username.clone()),
        ("ludopedia.email", &sources.email, settings.email.clone()),
        (
            "ludopedia.password",
            &sources.password,
            settings.password.as_deref().map(mask_value),
        ),
        (
            "import.user_map",
            &sources.user_map,
            Some(settings.user_map.display().to_string()),
        ),
        (
            "import.retry_interval_ms",
            &sources.retry_interval,
            Some(settings.retry_interval.as_millis().to_string()),
        ),
        (
            "import.max_fetch_attempts",
            &sources.max_fetch_attempts,
            Some(
                settings
                    .max_fetch_attempts
                    .map_or_else(|| "unbounded".to_string(), |n| n.to_string()),
            ),
        ),
    ];

    for (name, source, value) in fields {
        let source_str = format!("({})", source);
        match value {
            Some(v) => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                log::info!(
                    "  {} {} {}",
                    format!("{}:", name).if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }

    Ok(())
}

/// Interactively set up accounts.
pub(crate) fn run_config_setup() -> Result<(), CliError> {
    println!(
        "{}",
        "meeple-bridge Setup".if_supports_color(Stdout, |t| t.bold()),
    );
    println!();

    let existing = Settings::load();

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut read_line = |prompt: &str, default: Option<&str>, required: bool| {
        read_field(&mut input, prompt, default, required)
    };

    println!(
        "  {}",
        "BoardGameGeek (source):".if_supports_color(Stdout, |t| t.dimmed()),
    );
    let bgg_username = read_line("username", existing.bgg_username.as_deref(), true)?;

    println!();
    println!(
        "  {}",
        "Ludopedia (destination):".if_supports_color(Stdout, |t| t.dimmed()),
    );
    let email = read_line("email", existing.email.as_deref(), true)?;
    let masked = existing.password.as_deref().map(mask_value);
    let password = read_line("password", masked.as_deref(), true)?
        // Accepting the masked default keeps the stored password.
        .filter(|p| Some(p) != masked.as_ref())
        .or_else(|| existing.password.clone());

    println!();
    println!(
        "  {}",
        "User-mapping store (press Enter to keep):".if_supports_color(Stdout, |t| t.dimmed()),
    );
    let current_map = existing.user_map.display().to_string();
    let user_map = read_line("user_map", Some(&current_map), false)?
        .map(PathBuf::from)
        .unwrap_or_else(|| existing.user_map.clone());

    let settings = Settings {
        bgg_username,
        email,
        password,
        user_map,
        ..existing
    };

    let path = meeple_ludopedia::save_to_file(&settings)
        .map_err(|e| CliError::config(format!("Failed to save settings: {}", e)))?;

    println!();
    log::info!(
        "{} Settings saved to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );

    Ok(())
}

/// Prompt for one setup field.
///
/// An empty answer takes `default`; a required field without one is asked
/// again. End of input aborts the setup.
fn read_field(
    input: &mut impl BufRead,
    prompt: &str,
    default: Option<&str>,
    required: bool,
) -> Result<Option<String>, CliError> {
    loop {
        if let Some(def) = default {
            print!("  {} [{}]: ", prompt, def);
        } else {
            print!("  {}: ", prompt);
        }
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            println!();
            return Err(CliError::config("Setup aborted: end of input"));
        }
        let trimmed = line.trim().to_string();

        if trimmed.is_empty() {
            if let Some(def) = default {
                return Ok(Some(def.to_string()));
            }
            if required {
                println!(
                    "    {}",
                    "This field is required.".if_supports_color(Stdout, |t| t.yellow()),
                );
                continue;
            }
            return Ok(None);
        }
        return Ok(Some(trimmed));
    }
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    let path = meeple_ludopedia::config_path()
        .ok_or_else(|| CliError::other("Could not determine config directory"))?;
    println!("{}", path.display());
    Ok(())
}
