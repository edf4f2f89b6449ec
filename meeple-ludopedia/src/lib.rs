//! Ludopedia web-session client and local configuration for meeple-bridge.

pub mod client;
pub mod config;
pub mod error;
pub mod forms;

pub use client::LudopediaClient;
pub use config::{
    ConfigFile, SettingSource, SettingSources, Settings, config_path, save_to_file,
    setting_sources,
};
pub use error::LudopediaError;
