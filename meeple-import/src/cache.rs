use std::collections::HashMap;

use meeple_core::DestinationCandidate;

/// Run-scoped memo of resolved games, keyed by the exact source game name.
///
/// Keys are case-sensitive and untrimmed. The cache is never persisted.
#[derive(Debug, Default)]
pub struct IdentityCache {
    entries: HashMap<String, DestinationCandidate>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, game_name: &str) -> Option<&DestinationCandidate> {
        self.entries.get(game_name)
    }

    pub fn insert(&mut self, game_name: impl Into<String>, candidate: DestinationCandidate) {
        self.entries.insert(game_name.into(), candidate);
    }

    pub fn contains(&self, game_name: &str) -> bool {
        self.entries.contains_key(game_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_are_exact() {
        let mut cache = IdentityCache::new();
        cache.insert("Azul", DestinationCandidate::new("1", "Azul", Some("2017".into())));
        assert!(cache.contains("Azul"));
        assert!(!cache.contains("azul"));
        assert!(!cache.contains("Azul "));
        assert_eq!(cache.get("Azul").map(|c| c.destination_id.as_str()), Some("1"));
    }
}
