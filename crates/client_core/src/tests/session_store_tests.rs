use super::*;
use shared::domain::{Item, MediaType};

fn item(id: usize, title: &str) -> Item {
    Item {
        id,
        title: title.to_string(),
        description: "No description available.".into(),
        rating_value: 7.5,
        year: 1999,
        runtime_minutes: 120,
        genres: vec!["Drama".into()],
        poster_url: "/placeholder.svg".into(),
        media_type: MediaType::Movie,
        external_id: None,
        origin_country: "Unknown".into(),
    }
}

fn session(id: i64, title: &str) -> Session {
    Session::new(SessionId(id), format!("query {id}"), title, &[item(0, "Heat")])
}

#[test]
fn create_prepends_and_activates() {
    let mut store = SessionStore::new();
    store.create_and_activate(session(1, "A"));
    store.create_and_activate(session(2, "B"));

    let ids: Vec<i64> = store.sessions().iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(store.active_id(), Some(SessionId(2)));
    assert!(store.get(SessionId(2)).expect("session").is_revealing);
}

#[test]
fn stored_results_are_detached_from_the_source_list() {
    let mut source = vec![item(0, "Heat"), item(1, "Ronin")];
    let mut store = SessionStore::new();
    store.create_and_activate(Session::new(SessionId(1), "q", "t", &source));

    source[0].title = "Mutated".into();
    source.clear();

    let stored = store.get(SessionId(1)).expect("session");
    assert_eq!(stored.results.len(), 2);
    assert_eq!(stored.results[0].title, "Heat");
}

#[test]
fn rename_replaces_title_in_place() {
    let mut store = SessionStore::new();
    store.create_and_activate(session(1, "A"));
    store.create_and_activate(session(2, "B"));

    assert_eq!(store.rename(SessionId(1), "  Renamed  "), RenameOutcome::Renamed);

    let renamed = store.nth(2).expect("second slot");
    assert_eq!(renamed.id, SessionId(1));
    assert_eq!(renamed.title, "Renamed");
    assert_eq!(renamed.query, "query 1");
    assert_eq!(renamed.results.len(), 1);
    assert_eq!(store.active_id(), Some(SessionId(2)));
}

#[test]
fn rename_to_blank_or_same_title_is_a_no_op() {
    let mut store = SessionStore::new();
    store.create_and_activate(session(1, "A"));
    let before = store.get(SessionId(1)).cloned().expect("session");

    assert_eq!(store.rename(SessionId(1), ""), RenameOutcome::Unchanged);
    assert_eq!(store.rename(SessionId(1), "   "), RenameOutcome::Unchanged);
    assert_eq!(store.rename(SessionId(1), "A"), RenameOutcome::Unchanged);

    // an unchanged rename must not even cancel a pending reveal
    assert_eq!(store.get(SessionId(1)), Some(&before));
    assert_eq!(store.rename(SessionId(9), "X"), RenameOutcome::NotFound);
}

#[test]
fn rename_cancels_an_in_progress_reveal() {
    let mut store = SessionStore::new();
    store.create_and_activate(session(1, "A"));
    store.rename(SessionId(1), "B");

    assert!(!store.get(SessionId(1)).expect("session").is_revealing);
    assert!(!store.mark_revealed(SessionId(1)));
}

#[test]
fn deleting_the_active_session_clears_the_active_reference() {
    let mut store = SessionStore::new();
    store.create_and_activate(session(2, "B"));
    store.create_and_activate(session(1, "A"));
    let b_before = store.get(SessionId(2)).cloned().expect("session");

    assert_eq!(
        store.delete(SessionId(1)),
        DeleteOutcome::Deleted { was_active: true }
    );
    assert_eq!(store.active_id(), None);
    assert!(store.active().is_none());
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(SessionId(2)), Some(&b_before));
}

#[test]
fn deleting_an_inactive_session_keeps_the_active_reference() {
    let mut store = SessionStore::new();
    store.create_and_activate(session(1, "A"));
    store.create_and_activate(session(2, "B"));

    assert_eq!(
        store.delete(SessionId(1)),
        DeleteOutcome::Deleted { was_active: false }
    );
    assert_eq!(store.active_id(), Some(SessionId(2)));
    assert_eq!(store.delete(SessionId(1)), DeleteOutcome::NotFound);
}

#[test]
fn select_switches_active_without_touching_sessions() {
    let mut store = SessionStore::new();
    store.create_and_activate(session(1, "A"));
    store.create_and_activate(session(2, "B"));
    let before: Vec<Session> = store.sessions().to_vec();

    let selected = store.select(SessionId(1)).expect("known session");
    assert_eq!(selected.title, "A");
    assert_eq!(store.active_id(), Some(SessionId(1)));
    assert_eq!(store.sessions(), before.as_slice());

    assert!(store.select(SessionId(42)).is_none());
    assert_eq!(store.active_id(), Some(SessionId(1)));
}

#[test]
fn reveal_flag_clears_exactly_once() {
    let mut store = SessionStore::new();
    store.create_and_activate(session(1, "A"));

    assert!(store.mark_revealed(SessionId(1)));
    assert!(!store.mark_revealed(SessionId(1)));
    assert!(!store.mark_revealed(SessionId(7)));
}

#[test]
fn summaries_flag_the_active_session() {
    let mut store = SessionStore::new();
    store.create_and_activate(session(1, "A"));
    store.create_and_activate(session(2, "B"));
    store.clear_active();
    store.select(SessionId(1));

    let summaries = store.summaries();
    assert_eq!(summaries.len(), 2);
    assert!(!summaries[0].is_active);
    assert!(summaries[1].is_active);
    assert_eq!(summaries[1].result_count, 1);
}

#[test]
fn clock_ids_strictly_increase_within_one_millisecond() {
    let mut clock = SessionClock::new();
    let first = clock.next_id_at(1_000);
    let second = clock.next_id_at(1_000);
    let third = clock.next_id_at(999);
    let fourth = clock.next_id_at(5_000);

    assert_eq!(first, SessionId(1_000));
    assert_eq!(second, SessionId(1_001));
    assert_eq!(third, SessionId(1_002));
    assert_eq!(fourth, SessionId(5_000));
}

#[test]
fn nth_is_one_based() {
    let mut store = SessionStore::new();
    assert!(store.nth(0).is_none());
    store.create_and_activate(session(1, "A"));
    assert_eq!(store.nth(1).map(|s| s.id), Some(SessionId(1)));
    assert!(store.nth(2).is_none());
    assert!(!store.is_empty());
}
