//! Decoding of BoardGameGeek XML API 2 documents.
//!
//! Three document shapes are understood: play pages (`<plays total=..>`),
//! collections (`<items totalitems=..>`) and thing lookups (used only for the
//! publication year). The API reports an unknown user either as an
//! `<errors>` root or as a bare root element whose text reads
//! "Invalid object or user"; both surface as [`BggError::InvalidSubject`].

use meeple_core::{CollectionEntry, OwnershipFlags, PlayRecord, Player, SourceRecord, parse_wire_date};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::BggError;

const INVALID_SUBJECT_TEXT: &str = "Invalid object or user";

/// One decoded page of records.
#[derive(Debug, Clone, Default)]
pub struct SourcePage {
    /// Declared size of the whole record set, when the root carries it.
    pub total: Option<usize>,
    pub items: Vec<PageItem>,
}

/// A decoded record plus the source object id of its game.
#[derive(Debug, Clone)]
pub struct PageItem {
    pub record: SourceRecord,
    pub object_id: Option<String>,
}

/// Which text node the parser is currently collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    None,
    Name,
    Year,
    Comments,
    ErrorMessage,
}

struct PlayBuilder {
    id: u64,
    date: String,
    length: u32,
    location: String,
    game_name: String,
    object_id: Option<String>,
    comments: Option<String>,
    players: Vec<Player>,
}

struct EntryBuilder {
    object_id: Option<String>,
    name: String,
    year: Option<i32>,
    ownership: OwnershipFlags,
}

/// Decode a page of the plays endpoint.
pub fn parse_plays_page(xml: &str) -> Result<SourcePage, BggError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut page = SourcePage::default();
    let mut root: Option<String> = None;
    let mut root_text = String::new();
    let mut error_message = String::new();
    let mut depth = 0usize;
    let mut capture = Capture::None;
    let mut current: Option<PlayBuilder> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let tag = tag_name(e);
                if root.is_none() {
                    page.total = parse_count(attr(e, b"total")?)?;
                    root = Some(tag);
                } else {
                    match tag.as_str() {
                        "play" => current = Some(start_play(e)?),
                        "item" => apply_play_item(e, current.as_mut())?,
                        "player" => push_player(e, current.as_mut())?,
                        "comments" if current.is_some() => capture = Capture::Comments,
                        "message" => capture = Capture::ErrorMessage,
                        _ => {}
                    }
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                let tag = tag_name(e);
                if root.is_none() {
                    page.total = parse_count(attr(e, b"total")?)?;
                    root = Some(tag);
                    continue;
                }
                match tag.as_str() {
                    "play" => {
                        let play = start_play(e)?;
                        page.items.push(finish_play(play)?);
                    }
                    "item" => apply_play_item(e, current.as_mut())?,
                    "player" => push_player(e, current.as_mut())?,
                    _ => {}
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape()?.to_string();
                match capture {
                    Capture::Comments => {
                        if let Some(play) = current.as_mut() {
                            play.comments.get_or_insert_with(String::new).push_str(&text);
                        }
                    }
                    Capture::ErrorMessage => error_message.push_str(&text),
                    _ if depth == 1 => root_text.push_str(&text),
                    _ => {}
                }
            }
            Event::CData(ref e) => {
                if capture == Capture::Comments {
                    if let Some(play) = current.as_mut() {
                        let text = String::from_utf8_lossy(e).to_string();
                        play.comments.get_or_insert_with(String::new).push_str(&text);
                    }
                }
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                match e.name().as_ref() {
                    b"play" => {
                        if let Some(play) = current.take() {
                            page.items.push(finish_play(play)?);
                        }
                    }
                    b"comments" | b"message" => capture = Capture::None,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    check_subject(root.as_deref(), &root_text, &error_message)?;
    if root.is_none() {
        return Err(BggError::invalid_response("Empty plays document"));
    }
    Ok(page)
}

/// Decode a collection document. The collection endpoint is unpaginated, so
/// one document holds every entry.
pub fn parse_collection_page(xml: &str) -> Result<SourcePage, BggError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut page = SourcePage::default();
    let mut root: Option<String> = None;
    let mut root_text = String::new();
    let mut error_message = String::new();
    let mut depth = 0usize;
    let mut capture = Capture::None;
    let mut current: Option<EntryBuilder> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => {
                let tag = tag_name(e);
                if root.is_none() {
                    page.total = parse_count(attr(e, b"totalitems")?)?;
                    root = Some(tag);
                } else {
                    match tag.as_str() {
                        "item" if depth == 1 => current = Some(start_entry(e)?),
                        "name" if current.is_some() => capture = Capture::Name,
                        "yearpublished" if current.is_some() => capture = Capture::Year,
                        "status" => apply_status(e, current.as_mut())?,
                        "message" => capture = Capture::ErrorMessage,
                        _ => {}
                    }
                }
                depth += 1;
            }
            Event::Empty(ref e) => {
                let tag = tag_name(e);
                if root.is_none() {
                    page.total = parse_count(attr(e, b"totalitems")?)?;
                    root = Some(tag);
                    continue;
                }
                if tag == "status" {
                    apply_status(e, current.as_mut())?;
                }
            }
            Event::Text(ref e) => {
                let text = e.unescape()?.to_string();
                match capture {
                    Capture::Name => {
                        if let Some(entry) = current.as_mut() {
                            entry.name.push_str(&text);
                        }
                    }
                    Capture::Year => {
                        if let Some(entry) = current.as_mut() {
                            entry.year = text.trim().parse().ok();
                        }
                    }
                    Capture::ErrorMessage => error_message.push_str(&text),
                    _ if depth == 1 => root_text.push_str(&text),
                    _ => {}
                }
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                match e.name().as_ref() {
                    b"item" if depth == 1 => {
                        if let Some(entry) = current.take() {
                            page.items.push(finish_entry(entry));
                        }
                    }
                    b"name" | b"yearpublished" | b"message" => capture = Capture::None,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    check_subject(root.as_deref(), &root_text, &error_message)?;
    if root.is_none() {
        return Err(BggError::invalid_response("Empty collection document"));
    }
    if page.total.is_none() {
        page.total = Some(page.items.len());
    }
    Ok(page)
}

/// Extract `item/yearpublished@value` from a thing document.
pub fn parse_thing_year(xml: &str) -> Result<Option<i32>, BggError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut in_item = false;
    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"item" => in_item = true,
            Event::End(ref e) if e.name().as_ref() == b"item" => in_item = false,
            Event::Start(ref e) | Event::Empty(ref e)
                if in_item && e.name().as_ref() == b"yearpublished" =>
            {
                return Ok(attr(e, b"value")?.and_then(|v| v.trim().parse().ok()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn check_subject(root: Option<&str>, root_text: &str, error_message: &str) -> Result<(), BggError> {
    if root == Some("errors") {
        let message = error_message.trim();
        return Err(BggError::InvalidSubject(if message.is_empty() {
            "errors".to_string()
        } else {
            message.to_string()
        }));
    }
    if root_text.trim() == INVALID_SUBJECT_TEXT {
        return Err(BggError::InvalidSubject(INVALID_SUBJECT_TEXT.to_string()));
    }
    Ok(())
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>, BggError> {
    for a in e.attributes() {
        let a = a?;
        if a.key.as_ref() == key {
            return Ok(Some(a.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

fn flag(e: &BytesStart<'_>, key: &[u8]) -> Result<bool, BggError> {
    Ok(attr(e, key)?.is_some_and(|v| v.trim() == "1"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_count(value: Option<String>) -> Result<Option<usize>, BggError> {
    value
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .map_err(|_| BggError::invalid_response(format!("Invalid record count: {v}")))
        })
        .transpose()
}

fn start_play(e: &BytesStart<'_>) -> Result<PlayBuilder, BggError> {
    let raw_id = attr(e, b"id")?.unwrap_or_default();
    let id = raw_id
        .trim()
        .parse()
        .map_err(|_| BggError::invalid_response(format!("Invalid play id: '{raw_id}'")))?;
    Ok(PlayBuilder {
        id,
        date: attr(e, b"date")?.unwrap_or_default(),
        length: attr(e, b"length")?
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0),
        location: attr(e, b"location")?.unwrap_or_default(),
        game_name: String::new(),
        object_id: None,
        comments: None,
        players: Vec::new(),
    })
}

fn apply_play_item(e: &BytesStart<'_>, play: Option<&mut PlayBuilder>) -> Result<(), BggError> {
    if let Some(play) = play {
        // Only the first item names the game.
        if play.game_name.is_empty() {
            play.game_name = attr(e, b"name")?.unwrap_or_default();
            play.object_id = non_empty(attr(e, b"objectid")?);
        }
    }
    Ok(())
}

fn push_player(e: &BytesStart<'_>, play: Option<&mut PlayBuilder>) -> Result<(), BggError> {
    let Some(play) = play else {
        return Ok(());
    };
    play.players.push(Player {
        name: attr(e, b"name")?.unwrap_or_default(),
        source_username: attr(e, b"username")?.unwrap_or_default(),
        start_position: non_empty(attr(e, b"startposition")?),
        color: non_empty(attr(e, b"color")?),
        is_new: flag(e, b"new")?,
        is_winner: flag(e, b"win")?,
        score: non_empty(attr(e, b"score")?),
    });
    Ok(())
}

fn finish_play(play: PlayBuilder) -> Result<PageItem, BggError> {
    let date = parse_wire_date(&play.date)
        .map_err(|e| BggError::invalid_response(format!("Play #{}: {e}", play.id)))?;
    Ok(PageItem {
        record: SourceRecord::Play(PlayRecord {
            id: play.id,
            date,
            duration_minutes: play.length,
            location: play.location,
            game_name: play.game_name,
            year_published: None,
            comment: play.comments.filter(|c| !c.trim().is_empty()),
            players: play.players,
        }),
        object_id: play.object_id,
    })
}

fn start_entry(e: &BytesStart<'_>) -> Result<EntryBuilder, BggError> {
    Ok(EntryBuilder {
        object_id: non_empty(attr(e, b"objectid")?),
        name: String::new(),
        year: None,
        ownership: OwnershipFlags::default(),
    })
}

fn apply_status(e: &BytesStart<'_>, entry: Option<&mut EntryBuilder>) -> Result<(), BggError> {
    if let Some(entry) = entry {
        entry.ownership = OwnershipFlags {
            own: flag(e, b"own")?,
            wishlist: flag(e, b"wishlist")?,
        };
    }
    Ok(())
}

fn finish_entry(entry: EntryBuilder) -> PageItem {
    PageItem {
        record: SourceRecord::Collection(CollectionEntry {
            game_name: entry.name,
            ownership: entry.ownership,
            year_published: entry.year,
        }),
        object_id: entry.object_id,
    }
}

#[cfg(test)]
#[path = "tests/xml_tests.rs"]
mod tests;
