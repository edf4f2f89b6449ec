use chrono::NaiveDate;
use meeple_core::PlayerWrite;

use super::*;

#[test]
fn search_results_keep_order_and_accept_numbers() {
    let body = r#"{"count": 2, "data": [
        {"id_jogo": 123, "nm_jogo": "Azul", "ano_publicacao": 2017, "thumb": "a.jpg"},
        {"id_jogo": "456", "nm_jogo": "Azul: Summer Pavilion", "ano_publicacao": "2019"}
    ]}"#;
    let candidates = parse_search_response(body).unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].destination_id, "123");
    assert_eq!(candidates[0].publication_year.as_deref(), Some("2017"));
    assert_eq!(candidates[0].raw_payload["thumb"], "a.jpg");
    assert_eq!(candidates[1].destination_id, "456");
    assert_eq!(candidates[1].label(), "Azul: Summer Pavilion (2019)");
}

#[test]
fn search_without_data_is_empty() {
    assert!(parse_search_response(r#"{"count": 0}"#).unwrap().is_empty());
    assert!(parse_search_response(r#"{"data": null}"#).unwrap().is_empty());
    assert!(parse_search_response(r#"{"data": []}"#).unwrap().is_empty());
}

#[test]
fn search_with_missing_year() {
    let body = r#"{"data": [{"id_jogo": 9, "nm_jogo": "Promo", "ano_publicacao": null}]}"#;
    let candidates = parse_search_response(body).unwrap();
    assert_eq!(candidates[0].publication_year, None);
    assert_eq!(candidates[0].label(), "Promo (?)");
}

#[test]
fn search_rejects_garbage() {
    assert!(matches!(parse_search_response("<html>"), Err(LudopediaError::Json(_))));
    assert!(matches!(
        parse_search_response(r#"{"data": "oops"}"#),
        Err(LudopediaError::Api(_))
    ));
    assert!(matches!(
        parse_search_response(r#"{"data": [{"nm_jogo": "No id"}]}"#),
        Err(LudopediaError::Api(_))
    ));
}

#[test]
fn play_id_is_found_in_redirect_link() {
    let body = r#"<a href="https://www.ludopedia.com.br/partida?id_partida=987654">Ver</a>"#;
    assert_eq!(extract_play_id(body).as_deref(), Some("987654"));
    assert_eq!(extract_play_id("<html>erro</html>"), None);
}

#[test]
fn profile_user_id() {
    let body = r#"<a href="https://www.ludopedia.com.br/partidas?id_usuario=4242">Partidas</a>"#;
    assert_eq!(extract_profile_user_id(body).as_deref(), Some("4242"));
    // The bare parameter elsewhere on the page does not count.
    assert_eq!(extract_profile_user_id("?id_usuario=1"), None);
}

#[test]
fn login_markers() {
    assert!(is_bad_credentials("E-mail ou senha incorretos"));
    assert!(!is_bad_credentials("Bem-vindo"));
    assert_eq!(
        extract_login_user_id(r#"<a href="/colecao?id_usuario=77&x=1">"#).as_deref(),
        Some("77")
    );
}

#[test]
fn collection_form_flags() {
    let form = collection_form("123", OwnershipFlags { own: true, wishlist: false });
    assert_eq!(
        form,
        vec![
            ("id_jogo", "123".to_string()),
            ("fl_tem", "1".to_string()),
            ("fl_quer", "0".to_string()),
        ]
    );
}

#[test]
fn play_form_has_one_column_entry_per_player() {
    let play = PlayWrite {
        destination_id: "55".to_string(),
        date: NaiveDate::from_ymd_opt(2021, 3, 5).unwrap(),
        duration_hours: 2,
        duration_minutes: 5,
        description: Some("Good game".to_string()),
        players: vec![
            PlayerWrite {
                local_id: "0".to_string(),
                user_id: "42".to_string(),
                name: "Alice".to_string(),
                winner: true,
                score: "80".to_string(),
                note: "Jogador #1".to_string(),
            },
            PlayerWrite {
                name: "Guest".to_string(),
                ..Default::default()
            },
        ],
    };
    let form = play_form(&play);
    let values = |key: &str| -> Vec<String> {
        form.iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.clone())
            .collect()
    };

    assert_eq!(values("dt_partida"), vec!["05/03/2021"]);
    assert_eq!(values("qt_partidas"), vec!["1"]);
    assert_eq!(values("duracao_h"), vec!["2"]);
    assert_eq!(values("duracao_m"), vec!["5"]);
    assert_eq!(values("descricao"), vec!["Good game"]);
    assert_eq!(values("id_partida_jogador[]"), vec!["0", ""]);
    assert_eq!(values("id_usuario[]"), vec!["42", ""]);
    assert_eq!(values("nome[]"), vec!["Alice", "Guest"]);
    assert_eq!(values("fl_vencedor[]"), vec!["1", "0"]);
    assert_eq!(values("vl_pontos[]"), vec!["80", ""]);
    assert_eq!(values("observacao[]"), vec!["Jogador #1", ""]);
}

#[test]
fn play_form_omits_missing_description() {
    let play = PlayWrite {
        destination_id: "1".to_string(),
        date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
        duration_hours: 0,
        duration_minutes: 0,
        description: None,
        players: Vec::new(),
    };
    assert!(play_form(&play).iter().all(|(k, _)| *k != "descricao"));
}
