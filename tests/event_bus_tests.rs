// Tests for the event fan-out: subscription lifecycle and non-blocking
// delivery.

use live_transcriber::{EventBus, FailureNotice, SessionEvent, TranscriptFragment};

fn transcript(text: &str) -> SessionEvent {
    SessionEvent::Transcript(TranscriptFragment {
        text: text.to_string(),
        is_final: false,
    })
}

#[tokio::test]
async fn subscribers_receive_emitted_events() {
    let bus = EventBus::new();
    let (_id, mut rx) = bus.subscribe();

    bus.emit(transcript("hello"));
    bus.emit(SessionEvent::Failure(FailureNotice {
        message: "Network error".to_string(),
    }));

    assert_eq!(rx.recv().await, Some(transcript("hello")));
    assert!(matches!(rx.recv().await, Some(SessionEvent::Failure(_))));
}

#[tokio::test]
async fn every_subscriber_gets_its_own_copy() {
    let bus = EventBus::new();
    let (_a, mut rx_a) = bus.subscribe();
    let (_b, mut rx_b) = bus.subscribe();

    bus.emit(transcript("shared"));

    assert_eq!(rx_a.recv().await, Some(transcript("shared")));
    assert_eq!(rx_b.recv().await, Some(transcript("shared")));
}

#[tokio::test]
async fn unsubscribe_guarantees_removal() {
    let bus = EventBus::new();
    let (id, mut rx) = bus.subscribe();
    assert_eq!(bus.subscriber_count(), 1);

    bus.unsubscribe(id);
    assert_eq!(bus.subscriber_count(), 0);

    bus.emit(transcript("after removal"));
    // The sender side is gone, so the channel reports closed rather than
    // delivering anything.
    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn unsubscribe_leaves_other_subscribers_intact() {
    let bus = EventBus::new();
    let (id_a, mut rx_a) = bus.subscribe();
    let (_b, mut rx_b) = bus.subscribe();

    bus.unsubscribe(id_a);
    bus.emit(transcript("still here"));

    assert_eq!(rx_a.recv().await, None);
    assert_eq!(rx_b.recv().await, Some(transcript("still here")));
}

#[tokio::test]
async fn dropped_receivers_are_pruned_on_emit() {
    let bus = EventBus::new();
    let (_id, rx) = bus.subscribe();
    drop(rx);
    assert_eq!(bus.subscriber_count(), 1);

    bus.emit(transcript("prune"));
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn emission_is_non_blocking_without_a_runtime() {
    // Emission must never suspend or block the emitting context, even with
    // a slow (here: absent) consumer. A plain #[test] proves there is no
    // hidden await.
    let bus = EventBus::new();
    let (_id, mut rx) = bus.subscribe();

    for i in 0..10_000 {
        bus.emit(transcript(&format!("event {}", i)));
    }

    for i in 0..10_000 {
        let event = rx.try_recv().expect("event missing");
        assert_eq!(event, transcript(&format!("event {}", i)));
    }
}
