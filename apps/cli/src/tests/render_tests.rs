use super::*;

use shared::domain::{MediaType, SessionId};

fn item(title: &str) -> Item {
    Item {
        id: 0,
        title: title.to_string(),
        description: "A lone detective walks the rain-soaked streets.".into(),
        rating_value: 7.84,
        year: 1974,
        runtime_minutes: 0,
        genres: vec!["Crime".into(), "Mystery".into()],
        poster_url: "/placeholder.svg".into(),
        media_type: MediaType::Movie,
        external_id: Some("tt0071315".into()),
        origin_country: "United States".into(),
    }
}

#[test]
fn cards_are_numbered_and_capped() {
    let items: Vec<Item> = (0..45).map(|n| item(&format!("Film {n}"))).collect();
    let out = result_cards(&items, 40);

    assert!(out.starts_with("  1. Film 0 (1974) [Movie] 7.8/10\n"));
    assert!(out.contains(" 40. Film 39 "));
    assert!(!out.contains("Film 40 "));
    assert!(out.contains("... 5 more not shown"));
}

#[test]
fn empty_results_say_so() {
    assert_eq!(result_cards(&[], 40), "No recommendations returned.\n");
}

#[test]
fn detail_view_lists_every_field() {
    let out = item_detail(&item("Chinatown"));
    assert!(out.starts_with("Chinatown\n"));
    assert!(out.contains("Runtime:  N/A\n"));
    assert!(out.contains("Country:  United States"));
    assert!(out.contains("IMDb:     https://www.imdb.com/title/tt0071315/"));
    assert!(out.contains("Genres:   Crime, Mystery"));
    assert!(out.ends_with("rain-soaked streets.\n"));
}

#[test]
fn session_list_marks_the_active_entry() {
    let sessions = vec![
        SessionSummary {
            id: SessionId(2),
            title: "Noir".into(),
            result_count: 12,
            is_active: true,
            is_revealing: false,
        },
        SessionSummary {
            id: SessionId(1),
            title: "Space Horror".into(),
            result_count: 1,
            is_active: false,
            is_revealing: false,
        },
    ];
    assert_eq!(
        session_list(&sessions),
        "*  1. Noir (12 results)\n   2. Space Horror (1 results)\n"
    );
    assert_eq!(session_list(&[]), "No sessions yet.\n");
}

#[test]
fn found_line_reports_the_count_for_the_query() {
    assert_eq!(
        found_line(2, "nordic noir"),
        "Found 2 recommendations for \"nordic noir\"."
    );
    assert_eq!(
        found_line(0, "  spaced  "),
        "Found 0 recommendations for \"  spaced  \"."
    );
}
