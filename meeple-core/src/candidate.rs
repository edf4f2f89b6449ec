use serde::{Deserialize, Serialize};

/// A game entity found on the destination catalog by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationCandidate {
    pub destination_id: String,
    pub display_name: String,
    /// Publication year as reported by the destination (usually numeric text).
    pub publication_year: Option<String>,
    /// The search result exactly as the destination returned it.
    pub raw_payload: serde_json::Value,
}

impl DestinationCandidate {
    pub fn new(
        destination_id: impl Into<String>,
        display_name: impl Into<String>,
        publication_year: Option<String>,
    ) -> Self {
        Self {
            destination_id: destination_id.into(),
            display_name: display_name.into(),
            publication_year,
            raw_payload: serde_json::Value::Null,
        }
    }

    /// `"name (year)"` as shown when a human picks between candidates.
    pub fn label(&self) -> String {
        format!(
            "{} ({})",
            self.display_name,
            self.publication_year.as_deref().unwrap_or("?")
        )
    }

    /// Whether this candidate was published in `year`.
    ///
    /// Compares numerically when the destination's year parses as an
    /// integer, otherwise by text. An unknown year on either side never
    /// matches.
    pub fn matches_year(&self, year: Option<i32>) -> bool {
        let (Some(ours), Some(theirs)) = (year, self.publication_year.as_deref()) else {
            return false;
        };
        let theirs = theirs.trim();
        match theirs.parse::<i32>() {
            Ok(parsed) => parsed == ours,
            Err(_) => theirs == ours.to_string(),
        }
    }
}
