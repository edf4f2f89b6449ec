use std::collections::HashMap;

use super::*;

const FULL: &str = r#"
[bgg]
username = "alice"

[ludopedia]
email = "alice@example.com"
password = "hunter2"

[import]
user_map = "/tmp/users.txt"
retry_interval_ms = 500
max_fetch_attempts = 10
"#;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |var| map.get(var).cloned()
}

#[test]
fn defaults_without_file_or_env() {
    let settings = Settings::resolve(None, env_of(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.user_map, PathBuf::from("usuarios.txt"));
    assert_eq!(settings.max_fetch_attempts, None);
}

#[test]
fn file_values_are_used() {
    let file: ConfigFile = toml::from_str(FULL).unwrap();
    let settings = Settings::resolve(Some(&file), env_of(&[]));
    assert_eq!(settings.bgg_username.as_deref(), Some("alice"));
    assert_eq!(settings.email.as_deref(), Some("alice@example.com"));
    assert_eq!(settings.password.as_deref(), Some("hunter2"));
    assert_eq!(settings.user_map, PathBuf::from("/tmp/users.txt"));
    assert_eq!(settings.retry_interval, Duration::from_millis(500));
    assert_eq!(settings.max_fetch_attempts, Some(10));
}

#[test]
fn env_overrides_file() {
    let file: ConfigFile = toml::from_str(FULL).unwrap();
    let settings = Settings::resolve(
        Some(&file),
        env_of(&[(ENV_BGG_USERNAME, "bob"), (ENV_USER_MAP, "other.txt")]),
    );
    assert_eq!(settings.bgg_username.as_deref(), Some("bob"));
    assert_eq!(settings.user_map, PathBuf::from("other.txt"));
    assert_eq!(settings.email.as_deref(), Some("alice@example.com"));

    let sources = sources_of(Some(&file), |var| var == ENV_BGG_USERNAME);
    assert_eq!(sources.bgg_username, SettingSource::EnvVar(ENV_BGG_USERNAME));
    assert_eq!(sources.email, SettingSource::ConfigFile);
    assert_eq!(sources.retry_interval, SettingSource::ConfigFile);
}

#[test]
fn zero_max_attempts_means_unbounded() {
    let file: ConfigFile = toml::from_str("[import]\nmax_fetch_attempts = 0\n").unwrap();
    assert_eq!(Settings::resolve(Some(&file), env_of(&[])).max_fetch_attempts, None);
}

#[test]
fn missing_login_is_a_config_error() {
    let settings = Settings::default().with_overrides(None, Some("a@b.c".into()), None, None);
    assert!(matches!(settings.require_login(), Err(LudopediaError::Config(_))));
    assert!(settings.require_bgg_username().is_err());

    let settings = settings.with_overrides(Some("alice".into()), None, Some("pw".into()), None);
    assert_eq!(settings.require_login().unwrap(), ("a@b.c", "pw"));
    assert_eq!(settings.require_bgg_username().unwrap(), "alice");
}

#[test]
fn save_then_load_keeps_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let settings = Settings {
        bgg_username: Some("alice".into()),
        email: Some("alice@example.com".into()),
        password: Some("pw".into()),
        user_map: PathBuf::from("people.txt"),
        retry_interval: Duration::from_secs(3),
        max_fetch_attempts: Some(5),
    };
    save_to_path(&settings, &path).unwrap();

    let file = load_config_file(&path).unwrap();
    assert_eq!(Settings::resolve(Some(&file), env_of(&[])), settings);
}

#[test]
fn malformed_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[bgg\nusername = ").unwrap();
    assert!(load_config_file(&path).is_none());
    assert!(load_config_file(&dir.path().join("absent.toml")).is_none());
}
