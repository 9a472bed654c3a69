use crate::calendar::{
    CalendarClient, default_slots, derive_slug, filter_bookings_by_email, match_event_type,
    mock_booking_id,
};
use crate::tests::test_config;
use crate::types::EventType;
use serde_json::json;

fn quick_chat() -> Vec<EventType> {
    vec![EventType {
        id: 1,
        title: "Quick Chat".to_string(),
        slug: "quick-chat".to_string(),
        length: 30,
    }]
}

#[test]
fn default_slots_cover_working_hours() {
    let slots = default_slots("2025-10-02");
    assert_eq!(slots.len(), 8);
    for (i, hour) in (9..=16).enumerate() {
        assert_eq!(slots[i].time, format!("2025-10-02T{:02}:00:00Z", hour));
        assert!(slots[i].attendees.is_empty());
        assert!(slots[i].booking_id.is_none());
    }
}

#[test]
fn match_by_exact_slug() {
    assert_eq!(match_event_type(&quick_chat(), "quick-chat"), Some(1));
}

#[test]
fn match_by_exact_title() {
    assert_eq!(match_event_type(&quick_chat(), "Quick Chat"), Some(1));
}

#[test]
fn match_by_underscored_title() {
    assert_eq!(match_event_type(&quick_chat(), "quick_chat"), Some(1));
}

#[test]
fn match_is_case_insensitive() {
    assert_eq!(match_event_type(&quick_chat(), "Quick-Chat"), Some(1));
    assert_eq!(match_event_type(&quick_chat(), "QUICK CHAT"), Some(1));
}

#[test]
fn match_miss_returns_none() {
    assert_eq!(match_event_type(&quick_chat(), "Deep Dive"), None);
    assert_eq!(match_event_type(&[], "anything"), None);
}

#[tokio::test]
async fn resolve_numeric_identifier_skips_backend() {
    // port 1 is unreachable, so a backend call here would fall back to the
    // default id; a digits-only identifier must come back as-is.
    let client = CalendarClient::new(&test_config()).unwrap();
    assert_eq!(client.resolve_event_type_id("42").await, 42);
}

#[tokio::test]
async fn resolve_routes_non_digit_strings_through_name_matching() {
    // Padded and signed strings are not numeric ids; with the backend
    // unreachable they resolve like any unmatched name, to the default.
    let client = CalendarClient::new(&test_config()).unwrap();
    assert_eq!(client.resolve_event_type_id(" 7 ").await, 1);
    assert_eq!(client.resolve_event_type_id("-5").await, 1);
}

#[tokio::test]
async fn resolve_unknown_name_falls_back_to_default_id() {
    // Backend unreachable, so the fetched list is empty and resolution lands
    // on the fixed default.
    let client = CalendarClient::new(&test_config()).unwrap();
    assert_eq!(client.resolve_event_type_id("Quick Chat").await, 1);
}

#[test]
fn slug_derivation_strips_punctuation() {
    assert_eq!(derive_slug("My Event!"), "my-event");
    assert_eq!(derive_slug("quick_chat intro"), "quick-chat-intro");
    assert_eq!(derive_slug("30-Minute Consultation"), "30-minute-consultation");
}

#[test]
fn mock_booking_id_is_derived_from_start_date() {
    assert_eq!(
        mock_booking_id("2025-10-02T09:00:00Z"),
        "mock_booking_20251002"
    );
}

#[test]
fn booking_filter_requires_exact_email() {
    let bookings = vec![
        json!({
            "id": 11,
            "title": "Standup",
            "start": "2025-10-02T09:00:00Z",
            "end": "2025-10-02T09:30:00Z",
            "status": "confirmed",
            "attendees": [{"email": "me@x.com", "name": "Me"}]
        }),
        json!({
            "id": 12,
            "title": "Retro",
            "start": "2025-10-03T09:00:00Z",
            "end": "2025-10-03T09:30:00Z",
            "status": "confirmed",
            "attendees": [{"email": "other@x.com", "name": "Other"}]
        }),
        json!({
            "id": 13,
            "title": "Planning",
            "start": "2025-10-04T09:00:00Z",
            "end": "2025-10-04T09:30:00Z",
            "status": "confirmed",
            "attendees": [{"email": "ME@x.com", "name": "Shouty"}]
        }),
        json!({
            "id": 14,
            "title": "No attendees",
            "start": "2025-10-05T09:00:00Z",
            "end": "2025-10-05T09:30:00Z",
            "status": "confirmed"
        }),
    ];

    let mine = filter_bookings_by_email(&bookings, "me@x.com");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, "11");
    assert_eq!(mine[0].title, "Standup");
    assert_eq!(mine[0].status, "confirmed");
}

#[tokio::test]
async fn slot_lookup_failure_degrades_to_defaults() {
    let client = CalendarClient::new(&test_config()).unwrap();
    let slots = client.find_available_slots("1", "2025-10-02", 30).await;
    assert_eq!(slots.len(), 8);
    assert_eq!(slots[0].time, "2025-10-02T09:00:00Z");
    assert_eq!(slots[7].time, "2025-10-02T16:00:00Z");
}

#[tokio::test]
async fn booking_failure_in_demo_mode_yields_synthetic_confirmation() {
    let client = CalendarClient::new(&test_config()).unwrap();
    let booking = client
        .create_booking(
            "1",
            "2025-10-02T09:00:00Z",
            "2025-10-02T09:30:00Z",
            "me@x.com",
            "Me",
            "",
        )
        .await
        .unwrap();
    assert_eq!(booking["id"], "mock_booking_20251002");
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(booking["start"], "2025-10-02T09:00:00Z");
}

#[tokio::test]
async fn booking_failure_without_demo_mode_is_an_error() {
    let mut config = test_config();
    config.demo_mode = false;
    let client = CalendarClient::new(&config).unwrap();
    let result = client
        .create_booking(
            "1",
            "2025-10-02T09:00:00Z",
            "2025-10-02T09:30:00Z",
            "me@x.com",
            "Me",
            "",
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn listing_failures_degrade_to_empty() {
    let client = CalendarClient::new(&test_config()).unwrap();
    assert!(client.get_user_bookings("me@x.com").await.is_empty());
    assert!(client.get_event_types().await.is_empty());
}

#[tokio::test]
async fn mutation_failures_degrade_to_false() {
    let client = CalendarClient::new(&test_config()).unwrap();
    assert!(!client.cancel_booking("11").await);
    assert!(
        !client
            .reschedule_booking("11", "2025-10-03T09:00:00Z", "2025-10-03T09:30:00Z")
            .await
    );
}

#[tokio::test]
async fn event_type_creation_failure_is_surfaced() {
    let client = CalendarClient::new(&test_config()).unwrap();
    let result = client.create_event_type("My Event!", 30, "", None).await;
    assert!(result.is_err());
}
