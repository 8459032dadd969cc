use super::*;
use std::sync::Arc;
use std::thread;

#[test]
fn test_publish_then_consume_returns_announcement() {
    let slot = AnnouncementSlot::new();

    slot.publish(
        "Outside temperature has dropped to 5°C.",
        "temperature",
        Some("Your heating system will work harder.".to_string()),
    );

    let announcement = slot.consume().unwrap();
    assert_eq!(announcement.message, "Outside temperature has dropped to 5°C.");
    assert_eq!(announcement.category, "temperature");
    assert_eq!(announcement.detail, "Your heating system will work harder.");
}

#[test]
fn test_second_consume_is_empty() {
    let slot = AnnouncementSlot::new();
    slot.publish("Rain expected", "weather", None);

    assert!(slot.consume().is_some());
    assert!(slot.consume().is_none());
}

#[test]
fn test_publish_overwrites_unread() {
    let slot = AnnouncementSlot::new();
    slot.publish("first", "energy", None);
    slot.publish("second", "time", Some("later".to_string()));

    let announcement = slot.consume().unwrap();
    assert_eq!(announcement.message, "second");
    assert_eq!(announcement.category, "time");
    assert!(slot.consume().is_none());
}

#[test]
fn test_peek_does_not_consume() {
    let slot = AnnouncementSlot::new();
    assert!(slot.peek().is_none());

    slot.publish("Peak hours start at 17:00", "time", None);

    assert_eq!(slot.peek().unwrap().message, "Peak hours start at 17:00");
    assert_eq!(slot.peek().unwrap().message, "Peak hours start at 17:00");
    assert!(slot.consume().is_some());
    assert!(slot.peek().is_none());
}

#[test]
fn test_missing_detail_defaults_to_empty() {
    let slot = AnnouncementSlot::new();
    let published = slot.publish("Solar output is high", "energy", None);

    assert_eq!(published.detail, "");
    assert_eq!(published.spoken(), "Solar output is high");
}

#[test]
fn test_spoken_joins_message_and_detail() {
    let slot = AnnouncementSlot::new();
    let published = slot.publish("Frost tonight.", "weather", Some("Close the windows.".to_string()));

    assert_eq!(published.spoken(), "Frost tonight. Close the windows.");
}

#[test]
fn test_serializes_category_as_type() {
    let slot = AnnouncementSlot::new();
    let published = slot.publish("msg", "energy", None);

    let json = serde_json::to_value(&published).unwrap();
    assert_eq!(json["type"], "energy");
    assert_eq!(json["message"], "msg");
    assert_eq!(json["detail"], "");
    assert!(json["timestamp"].is_string());
}

#[test]
fn test_concurrent_consumers_receive_at_most_once() {
    let slot = Arc::new(AnnouncementSlot::new());
    slot.publish("only once", "energy", None);

    let mut handles = vec![];
    for _ in 0..10 {
        let slot_clone = Arc::clone(&slot);
        handles.push(thread::spawn(move || slot_clone.consume().is_some()));
    }

    let delivered = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|got| *got)
        .count();

    assert_eq!(delivered, 1);
}
