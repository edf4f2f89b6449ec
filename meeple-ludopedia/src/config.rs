use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::LudopediaError;

pub const ENV_BGG_USERNAME: &str = "BGG_USERNAME";
pub const ENV_EMAIL: &str = "LUDOPEDIA_EMAIL";
pub const ENV_PASSWORD: &str = "LUDOPEDIA_PASSWORD";
pub const ENV_USER_MAP: &str = "MEEPLE_USER_MAP";

/// User-mapping store used when nothing else is configured.
pub const DEFAULT_USER_MAP: &str = "usuarios.txt";
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Everything a run needs to know about the user and both services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bgg_username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_map: PathBuf,
    pub retry_interval: Duration,
    /// `None` retries busy responses forever.
    pub max_fetch_attempts: Option<u32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bgg_username: None,
            email: None,
            password: None,
            user_map: PathBuf::from(DEFAULT_USER_MAP),
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_fetch_attempts: None,
        }
    }
}

/// Where a setting's value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingSource {
    /// Loaded from an environment variable.
    EnvVar(&'static str),
    /// Loaded from the config file.
    ConfigFile,
    /// Built-in default value.
    Default,
    /// Not set anywhere.
    Missing,
}

impl std::fmt::Display for SettingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// Provenance of each setting.
#[derive(Debug)]
pub struct SettingSources {
    pub bgg_username: SettingSource,
    pub email: SettingSource,
    pub password: SettingSource,
    pub user_map: SettingSource,
    pub retry_interval: SettingSource,
    pub max_fetch_attempts: SettingSource,
}

/// TOML config file format.
#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
pub struct ConfigFile {
    bgg: Option<BggSection>,
    ludopedia: Option<LudopediaSection>,
    import: Option<ImportSection>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct BggSection {
    username: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct LudopediaSection {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Debug, Default, serde::Deserialize, serde::Serialize)]
struct ImportSection {
    user_map: Option<PathBuf>,
    retry_interval_ms: Option<u64>,
    max_fetch_attempts: Option<u32>,
}

impl ConfigFile {
    fn bgg_username(&self) -> Option<String> {
        self.bgg.as_ref().and_then(|s| s.username.clone())
    }

    fn email(&self) -> Option<String> {
        self.ludopedia.as_ref().and_then(|s| s.email.clone())
    }

    fn password(&self) -> Option<String> {
        self.ludopedia.as_ref().and_then(|s| s.password.clone())
    }

    fn user_map(&self) -> Option<PathBuf> {
        self.import.as_ref().and_then(|s| s.user_map.clone())
    }

    fn retry_interval_ms(&self) -> Option<u64> {
        self.import.as_ref().and_then(|s| s.retry_interval_ms)
    }

    fn max_fetch_attempts(&self) -> Option<u32> {
        self.import.as_ref().and_then(|s| s.max_fetch_attempts)
    }
}

impl Settings {
    /// Load settings from environment variables and the config file.
    ///
    /// Priority: env vars > config file > defaults.
    pub fn load() -> Self {
        let file = config_path().and_then(|p| load_config_file(&p));
        Self::resolve(file.as_ref(), |var| std::env::var(var).ok())
    }

    /// Merge a parsed config file with an environment lookup.
    pub fn resolve(file: Option<&ConfigFile>, env: impl Fn(&str) -> Option<String>) -> Self {
        let from_file = |get: fn(&ConfigFile) -> Option<String>| file.and_then(get);

        Self {
            bgg_username: env(ENV_BGG_USERNAME).or_else(|| from_file(ConfigFile::bgg_username)),
            email: env(ENV_EMAIL).or_else(|| from_file(ConfigFile::email)),
            password: env(ENV_PASSWORD).or_else(|| from_file(ConfigFile::password)),
            user_map: env(ENV_USER_MAP)
                .map(PathBuf::from)
                .or_else(|| file.and_then(ConfigFile::user_map))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_USER_MAP)),
            retry_interval: file
                .and_then(ConfigFile::retry_interval_ms)
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_RETRY_INTERVAL),
            max_fetch_attempts: file
                .and_then(ConfigFile::max_fetch_attempts)
                .filter(|&n| n > 0),
        }
    }

    /// Apply explicit values (e.g. from CLI args).
    pub fn with_overrides(
        mut self,
        bgg_username: Option<String>,
        email: Option<String>,
        password: Option<String>,
        user_map: Option<PathBuf>,
    ) -> Self {
        if let Some(name) = bgg_username {
            self.bgg_username = Some(name);
        }
        if let Some(email) = email {
            self.email = Some(email);
        }
        if let Some(pw) = password {
            self.password = Some(pw);
        }
        if let Some(path) = user_map {
            self.user_map = path;
        }
        self
    }

    pub fn require_bgg_username(&self) -> Result<&str, LudopediaError> {
        self.bgg_username.as_deref().ok_or_else(|| {
            LudopediaError::config(format!(
                "Missing BoardGameGeek username. Set {ENV_BGG_USERNAME}, pass --bgg-user or run 'config setup'"
            ))
        })
    }

    /// Email and password, both required to log in.
    pub fn require_login(&self) -> Result<(&str, &str), LudopediaError> {
        let email = self.email.as_deref().ok_or_else(|| {
            LudopediaError::config(format!(
                "Missing Ludopedia email. Set {ENV_EMAIL} or run 'config setup'"
            ))
        })?;
        let password = self.password.as_deref().ok_or_else(|| {
            LudopediaError::config(format!(
                "Missing Ludopedia password. Set {ENV_PASSWORD} or run 'config setup'"
            ))
        })?;
        Ok((email, password))
    }
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("meeple-bridge").join("config.toml"))
}

/// Save settings to the config file, creating parent directories as needed.
/// Returns the path the file was written to.
pub fn save_to_file(settings: &Settings) -> Result<PathBuf, LudopediaError> {
    let path = config_path()
        .ok_or_else(|| LudopediaError::config("Could not determine config directory"))?;
    save_to_path(settings, &path)?;
    Ok(path)
}

pub fn save_to_path(settings: &Settings, path: &Path) -> Result<(), LudopediaError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let config = ConfigFile {
        bgg: Some(BggSection {
            username: settings.bgg_username.clone(),
        }),
        ludopedia: Some(LudopediaSection {
            email: settings.email.clone(),
            password: settings.password.clone(),
        }),
        import: Some(ImportSection {
            user_map: if settings.user_map == Path::new(DEFAULT_USER_MAP) {
                None
            } else {
                Some(settings.user_map.clone())
            },
            retry_interval_ms: if settings.retry_interval == DEFAULT_RETRY_INTERVAL {
                None
            } else {
                Some(settings.retry_interval.as_millis() as u64)
            },
            max_fetch_attempts: settings.max_fetch_attempts,
        }),
    };

    let toml_str = toml::to_string_pretty(&config)
        .map_err(|e| LudopediaError::config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Read and parse a config file. A missing file is not an error; a file that
/// does not parse is logged and ignored.
pub fn load_config_file(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("Ignoring malformed config file {}: {}", path.display(), e);
            None
        }
    }
}

/// Determine where each setting is coming from.
pub fn setting_sources() -> SettingSources {
    let file = config_path().and_then(|p| load_config_file(&p));
    sources_of(file.as_ref(), |var| std::env::var(var).is_ok())
}

fn sources_of(file: Option<&ConfigFile>, has_env: impl Fn(&str) -> bool) -> SettingSources {
    let pick = |var: &'static str, in_file: bool, fallback: SettingSource| {
        if has_env(var) {
            SettingSource::EnvVar(var)
        } else if in_file {
            SettingSource::ConfigFile
        } else {
            fallback
        }
    };
    let in_file = |present: fn(&ConfigFile) -> bool| file.is_some_and(present);

    SettingSources {
        bgg_username: pick(
            ENV_BGG_USERNAME,
            in_file(|c| c.bgg_username().is_some()),
            SettingSource::Missing,
        ),
        email: pick(ENV_EMAIL, in_file(|c| c.email().is_some()), SettingSource::Missing),
        password: pick(
            ENV_PASSWORD,
            in_file(|c| c.password().is_some()),
            SettingSource::Missing,
        ),
        user_map: pick(
            ENV_USER_MAP,
            in_file(|c| c.user_map().is_some()),
            SettingSource::Default,
        ),
        retry_interval: if in_file(|c| c.retry_interval_ms().is_some()) {
            SettingSource::ConfigFile
        } else {
            SettingSource::Default
        },
        max_fetch_attempts: if in_file(|c| c.max_fetch_attempts().is_some()) {
            SettingSource::ConfigFile
        } else {
            SettingSource::Default
        },
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
