//! Request payloads and response scraping for the Ludopedia web endpoints.
//!
//! Ludopedia has no public write API: the importer drives the same forms the
//! website posts, and detects outcomes by pattern-matching the returned HTML.

use std::sync::LazyLock;

use meeple_core::{DestinationCandidate, OwnershipFlags, PlayWrite, format_human};
use regex::Regex;
use serde_json::Value;

use crate::error::LudopediaError;

/// Marker the login page shows when the credentials are wrong.
pub const BAD_CREDENTIALS_MARKER: &str = "senha incorretos";

/// Results per search request.
pub const SEARCH_PAGE_SIZE: u32 = 20;

static LOGIN_USER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"id_usuario=(\d+)").expect("static pattern"));

static PROFILE_USER_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://www\.ludopedia\.com\.br/partidas\?id_usuario=(\d+)").expect("static pattern")
});

static PLAY_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://www\.ludopedia\.com\.br/partida\?id_partida=(\d+)").expect("static pattern")
});

pub fn is_bad_credentials(body: &str) -> bool {
    body.contains(BAD_CREDENTIALS_MARKER)
}

/// User id embedded in the page served after a successful login.
pub fn extract_login_user_id(body: &str) -> Option<String> {
    first_capture(&LOGIN_USER_ID_RE, body)
}

/// User id from a public profile page, taken from its "plays" link.
pub fn extract_profile_user_id(body: &str) -> Option<String> {
    first_capture(&PROFILE_USER_ID_RE, body)
}

/// Id of the newly created play, if the response links to it.
pub fn extract_play_id(body: &str) -> Option<String> {
    first_capture(&PLAY_ID_RE, body)
}

fn first_capture(re: &Regex, body: &str) -> Option<String> {
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Query string for a game search.
pub fn search_params(query: &str) -> Vec<(&'static str, String)> {
    vec![
        ("tipo", "jogo".to_string()),
        ("count", "true".to_string()),
        ("pagina", "1".to_string()),
        ("qt_rows", SEARCH_PAGE_SIZE.to_string()),
        ("nm_jogo", query.to_string()),
    ]
}

/// Decode the search endpoint's JSON into candidates, keeping the
/// destination's order. A missing or null `data` field means no results.
pub fn parse_search_response(body: &str) -> Result<Vec<DestinationCandidate>, LudopediaError> {
    let json: Value = serde_json::from_str(body)?;
    let items = match json.get("data") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(LudopediaError::api(format!(
                "search 'data' is not a list: {}",
                truncate(&other.to_string(), 200)
            )));
        }
    };

    items
        .iter()
        .map(|item| {
            let id = scalar_text(item.get("id_jogo")).ok_or_else(|| {
                LudopediaError::api(format!(
                    "search result without id_jogo: {}",
                    truncate(&item.to_string(), 200)
                ))
            })?;
            let name = scalar_text(item.get("nm_jogo")).unwrap_or_default();
            let year = scalar_text(item.get("ano_publicacao"));
            Ok(DestinationCandidate {
                destination_id: id,
                display_name: name,
                publication_year: year,
                raw_payload: item.clone(),
            })
        })
        .collect()
}

/// Strings and numbers both come back from the search endpoint.
fn scalar_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

fn flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// Form for adding a game to the user's collection.
pub fn collection_form(destination_id: &str, flags: OwnershipFlags) -> Vec<(&'static str, String)> {
    vec![
        ("id_jogo", destination_id.to_string()),
        ("fl_tem", flag(flags.own)),
        ("fl_quer", flag(flags.wishlist)),
    ]
}

/// Form for logging a play. Per-player columns are repeated keys, one
/// occurrence per player, in player order.
pub fn play_form(play: &PlayWrite) -> Vec<(&'static str, String)> {
    let mut form = vec![
        ("id_jogo", play.destination_id.clone()),
        ("dt_partida", format_human(play.date)),
        ("qt_partidas", "1".to_string()),
        ("duracao_h", play.duration_hours.to_string()),
        ("duracao_m", play.duration_minutes.to_string()),
    ];
    if let Some(description) = &play.description {
        form.push(("descricao", description.clone()));
    }

    for player in &play.players {
        form.push(("id_partida_jogador[]", player.local_id.clone()));
        form.push(("id_usuario[]", player.user_id.clone()));
        form.push(("nome[]", player.name.clone()));
        form.push(("fl_vencedor[]", flag(player.winner)));
        form.push(("vl_pontos[]", player.score.clone()));
        form.push(("observacao[]", player.note.clone()));
    }
    form
}

#[cfg(test)]
#[path = "tests/forms_tests.rs"]
mod tests;
