//! Shared fixtures for integration tests.

use std::sync::Arc;

use backend::domain::ports::{EventStore, InMemoryAttendanceLedger, InMemoryEventStore};
use backend::domain::{AdmissionService, Event, EventDraft, EventId, UserId};

/// Admission service wired to in-memory ports, plus handles for inspecting
/// the stores after the dust settles.
pub struct AdmissionHarness {
    pub service: Arc<AdmissionService<InMemoryEventStore, InMemoryAttendanceLedger>>,
    pub events: Arc<InMemoryEventStore>,
    pub ledger: Arc<InMemoryAttendanceLedger>,
}

/// Build an admission harness seeded with one event of the given capacity.
pub async fn seeded_admission(capacity: i32) -> (AdmissionHarness, EventId) {
    let events = Arc::new(InMemoryEventStore::new());
    let ledger = Arc::new(InMemoryAttendanceLedger::new());

    let event = Event::new(
        EventDraft {
            title: "Launch party".to_owned(),
            description: None,
            starts_at: None,
            location: None,
            image_url: None,
            capacity,
        },
        UserId::random(),
    )
    .expect("valid draft");
    events.insert(&event).await.expect("seed event");

    let service = Arc::new(AdmissionService::new(
        Arc::clone(&events),
        Arc::clone(&ledger),
    ));
    (
        AdmissionHarness {
            service,
            events,
            ledger,
        },
        event.id(),
    )
}

/// Read the attendee counter for an event.
pub async fn attendees(harness: &AdmissionHarness, event_id: EventId) -> i32 {
    harness
        .events
        .find_by_id(event_id)
        .await
        .expect("find event")
        .expect("event present")
        .attendees_count()
}
