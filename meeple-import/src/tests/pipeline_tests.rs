use chrono::NaiveDate;

use super::*;

fn player(name: &str, username: &str) -> Player {
    Player {
        name: name.to_string(),
        source_username: username.to_string(),
        ..Default::default()
    }
}

fn play(players: Vec<Player>) -> PlayRecord {
    PlayRecord {
        id: 77,
        date: NaiveDate::from_ymd_opt(2021, 3, 5).unwrap(),
        duration_minutes: 125,
        location: "Home".to_string(),
        game_name: "Azul".to_string(),
        year_published: Some(2017),
        comment: Some("Close one".to_string()),
        players,
    }
}

#[test]
fn duration_is_split_into_hours_and_minutes() {
    let write = build_play_write(&play(vec![]), "55", "alice", &UserIdentityMap::new());
    assert_eq!(write.duration_hours, 2);
    assert_eq!(write.duration_minutes, 5);
    assert_eq!(write.destination_id, "55");
    assert_eq!(write.description.as_deref(), Some("Close one"));
}

#[test]
fn self_row_and_user_ids() {
    let mut users = UserIdentityMap::new();
    users.insert("alice", "42");
    users.insert("bob", "7");

    let mut me = player("Alice", "ALICE");
    me.is_winner = true;
    me.score = Some("80".to_string());
    let players = vec![me, player("Bob", "bob"), player("Guest", "")];
    let write = build_play_write(&play(players), "55", "alice", &users);

    let local: Vec<&str> = write.players.iter().map(|p| p.local_id.as_str()).collect();
    assert_eq!(local, vec!["0", "", ""]);
    let ids: Vec<&str> = write.players.iter().map(|p| p.user_id.as_str()).collect();
    assert_eq!(ids, vec!["42", "7", ""]);
    assert!(write.players[0].winner);
    assert_eq!(write.players[0].score, "80");
    assert_eq!(write.players[1].score, "");
}

#[test]
fn note_lists_position_color_and_first_play() {
    let mut p = player("Bob", "bob");
    p.start_position = Some("2".to_string());
    p.color = Some("Red".to_string());
    p.is_new = true;
    assert_eq!(player_note(&p), "Jogador #2 - Cor: Red - (Primeira Vez)");

    let mut p = player("Bob", "bob");
    p.color = Some("Blue".to_string());
    assert_eq!(player_note(&p), "Cor: Blue");

    assert_eq!(player_note(&player("Guest", "")), "");
}

#[test]
fn summary_ratio() {
    let summary = ImportSummary {
        imported: 2,
        total: 3,
        failures: Vec::new(),
    };
    assert_eq!(summary.ratio(), "2/3");
}
