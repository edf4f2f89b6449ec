//! Mapping of BoardGameGeek usernames to Ludopedia user ids.
//!
//! The store is a plain text file of `bgg_user = ludopedia_user_or_id`
//! lines (`:` also works as the separator, `#` and `;` start comments,
//! `[section]` headers are ignored). Source usernames are matched
//! case-insensitively.

use std::collections::HashMap;
use std::path::Path;

use meeple_core::DestinationCatalog;

/// Resolved source username -> destination user id pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserIdentityMap {
    ids: HashMap<String, String>,
}

impl UserIdentityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the store at `path`, resolving destination usernames through
    /// `destination`. A missing or unreadable file yields an empty map.
    pub fn load<D: DestinationCatalog + ?Sized>(path: &Path, destination: &D) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_store(&text, destination),
            Err(e) => {
                log::error!("Could not read user map {}: {}", path.display(), e);
                Self::new()
            }
        }
    }

    /// Build the map from store text. Numeric values are trusted as ids; any
    /// other value is looked up as a destination username. Lookups that fail
    /// are logged and skipped.
    pub fn from_store<D: DestinationCatalog + ?Sized>(text: &str, destination: &D) -> Self {
        let mut map = Self::new();
        for (source_user, value) in parse_store(text) {
            if is_numeric_id(&value) {
                log::debug!("'{}' mapped to user id {}", source_user, value);
                map.insert(&source_user, value);
                continue;
            }
            match destination.lookup_user_id(&value) {
                Ok(Some(id)) => {
                    log::debug!("'{}' is Ludopedia user '{}' (id {})", source_user, value, id);
                    map.insert(&source_user, id);
                }
                Ok(None) => {
                    log::error!("Could not find the Ludopedia id of '{}'", value);
                }
                Err(e) => {
                    log::error!("Could not look up Ludopedia user '{}': {}", value, e);
                }
            }
        }
        map
    }

    pub fn insert(&mut self, source_user: &str, destination_id: impl Into<String>) {
        self.ids
            .insert(source_user.to_lowercase(), destination_id.into());
    }

    /// Add the importing user with the id obtained at login, unless the store
    /// already maps them.
    pub fn ensure_user(&mut self, source_user: &str, destination_id: Option<&str>) {
        let Some(id) = destination_id else {
            return;
        };
        let key = source_user.to_lowercase();
        if !self.ids.contains_key(&key) {
            log::debug!("Mapping importing user '{}' to id {}", source_user, id);
            self.ids.insert(key, id.to_string());
        }
    }

    /// Destination id for `source_user`, if mapped.
    pub fn resolve(&self, source_user: &str) -> Option<&str> {
        self.ids.get(&source_user.to_lowercase()).map(String::as_str)
    }

    /// All pairs, sorted by source username.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .ids
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort();
        entries
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn is_numeric_id(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

/// Split store text into `(lowercased source user, value)` pairs, in file
/// order. Malformed lines are logged and skipped. Later duplicates win.
pub fn parse_store(text: &str) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            continue;
        }
        let Some(split) = line.find(['=', ':']) else {
            log::warn!("User map line {}: expected 'user = value'", lineno + 1);
            continue;
        };
        let key = line[..split].trim().to_lowercase();
        let value = line[split + 1..].trim().to_string();
        if key.is_empty() || value.is_empty() {
            log::warn!("User map line {}: empty user or value", lineno + 1);
            continue;
        }
        if let Some(existing) = pairs.iter_mut().find(|(k, _)| *k == key) {
            log::warn!("User map line {}: '{}' listed twice, using the later value", lineno + 1, key);
            existing.1 = value;
        } else {
            pairs.push((key, value));
        }
    }
    pairs
}
