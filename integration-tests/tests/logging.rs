use integration_tests::harness::{CapturedEvent, TraceBuilder, init_test_tracing};
use readahead_core::source::{EventSource, TraceReplaySource};
use readahead_core::{ObservationSession, RunLimit, SessionConfig, TraceInput};
use std::time::Duration;

fn with_message<'a>(
    events: &'a [CapturedEvent],
    message: &'a str,
) -> impl Iterator<Item = &'a CapturedEvent> + 'a {
    events
        .iter()
        .filter(move |e| e.message.as_deref() == Some(message))
}

#[test]
fn session_and_source_lifecycle_is_logged() {
    let events = init_test_tracing();

    let trace = TraceBuilder::new()
        .window_start()
        .allocate(1, 0)
        .allocate(2, 0)
        .access(1, 3)
        .window_end()
        .write_temp();

    let session = ObservationSession::new(SessionConfig { max_entries: 7 });
    let source = Box::new(TraceReplaySource::new(
        TraceInput::File(trace.path().to_path_buf()),
        2,
    ));
    let attached = source
        .attach(session.sink(), session.stop_handle())
        .unwrap();
    session.run(RunLimit::For(Duration::from_secs(30)));
    attached.detach(Duration::from_secs(1));

    let events = events.lock().unwrap();

    assert!(
        with_message(&events, "observation session started")
            .any(|e| e.field("max_entries") == Some("7")),
        "expected session start with configured capacity"
    );

    let finished = with_message(&events, "observation session finished")
        .find(|e| e.field("reason") == Some("SourceExhausted"))
        .expect("expected session finish event");
    assert_eq!(finished.field("total"), Some("2"));
    assert_eq!(finished.field("unused"), Some("1"));

    assert!(
        with_message(&events, "trace replay finished").any(|e| e.field("events") == Some("5"))
    );
    assert!(
        with_message(&events, "event source attached").any(|e| e.field("producers") == Some("2")),
        "expected attach event with producer count"
    );
}
