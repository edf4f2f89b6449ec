use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Ownership status of a collection entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipFlags {
    pub own: bool,
    pub wishlist: bool,
}

/// A game in the user's source collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub game_name: String,
    pub ownership: OwnershipFlags,
    pub year_published: Option<i32>,
}

/// One participant of a logged play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name as typed on the source service.
    pub name: String,
    /// Source-service username (may be empty for guests).
    pub source_username: String,
    pub start_position: Option<String>,
    pub color: Option<String>,
    /// First time this player played the game.
    pub is_new: bool,
    pub is_winner: bool,
    pub score: Option<String>,
}

/// A logged play fetched from the source service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub id: u64,
    pub date: NaiveDate,
    pub duration_minutes: u32,
    pub location: String,
    pub game_name: String,
    pub year_published: Option<i32>,
    pub comment: Option<String>,
    /// Players in output order: see [`order_players`].
    pub players: Vec<Player>,
}

/// A record to be migrated: either a collection entry or a logged play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceRecord {
    Collection(CollectionEntry),
    Play(PlayRecord),
}

impl SourceRecord {
    /// Game name exactly as received from the source.
    pub fn game_name(&self) -> &str {
        match self {
            Self::Collection(entry) => &entry.game_name,
            Self::Play(play) => &play.game_name,
        }
    }

    pub fn year_published(&self) -> Option<i32> {
        match self {
            Self::Collection(entry) => entry.year_published,
            Self::Play(play) => play.year_published,
        }
    }

    /// `"Name (year)"`, with `?` standing in for an unknown year.
    pub fn game_label(&self) -> String {
        match self.year_published() {
            Some(year) => format!("{} ({})", self.game_name(), year),
            None => format!("{} (?)", self.game_name()),
        }
    }

    /// Short human description used in progress and error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Collection(entry) => entry.game_name.clone(),
            Self::Play(play) => format!("play #{} of {}", play.id, play.game_name),
        }
    }
}

/// Sort players so that the play's author comes first, then by ascending
/// start position.
///
/// The author is matched by source username, case-insensitively. Numeric
/// start positions come first in numeric order, then other positions in
/// text order, then players without one. The sort is stable, so players
/// that compare equal keep their source order.
pub fn order_players(players: &mut [Player], author: &str) {
    players.sort_by(|a, b| {
        let a_other = !a.source_username.eq_ignore_ascii_case(author);
        let b_other = !b.source_username.eq_ignore_ascii_case(author);
        a_other.cmp(&b_other).then_with(|| {
            PositionKey::of(a.start_position.as_deref())
                .cmp(&PositionKey::of(b.start_position.as_deref()))
        })
    });
}

/// Total order over start positions. Variant order is the sort order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PositionKey<'a> {
    Number(i64),
    Text(&'a str),
    Missing,
}

impl<'a> PositionKey<'a> {
    fn of(position: Option<&'a str>) -> Self {
        match position.map(str::trim) {
            None => Self::Missing,
            Some(text) => match text.parse::<i64>() {
                Ok(n) => Self::Number(n),
                Err(_) => Self::Text(text),
            },
        }
    }
}

/// Split a duration in minutes into whole hours and remaining minutes.
pub fn split_duration(total_minutes: u32) -> (u32, u32) {
    (total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
#[path = "tests/record_tests.rs"]
mod tests;
