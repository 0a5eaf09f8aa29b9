use gstreamer as gst;

use super::{PipelineEvent, PipelineState};

fn init() -> bool {
    if let Err(e) = crate::init() {
        eprintln!("skip: {:#}", e);
        return false;
    }
    true
}

#[test]
fn test_state_names() {
    assert_eq!(PipelineState::Null.name(), "null");
    assert_eq!(PipelineState::Ready.to_string(), "ready");
    assert_eq!(PipelineState::Paused.to_string(), "paused");
    assert_eq!(PipelineState::Playing.to_string(), "playing");
    assert_eq!(PipelineState::VoidPending.to_string(), "void-pending");
}

#[test]
fn test_state_from_gst() {
    assert_eq!(PipelineState::from(gst::State::Null), PipelineState::Null);
    assert_eq!(PipelineState::from(gst::State::Playing), PipelineState::Playing);
    assert_eq!(
        PipelineState::from(gst::State::VoidPending),
        PipelineState::VoidPending
    );
}

#[test]
fn test_eos_message() {
    if !init() {
        return;
    }
    let msg = gst::message::Eos::new();
    assert_eq!(PipelineEvent::from(&msg), PipelineEvent::Eos);
}

#[test]
fn test_error_message_carries_source_and_debug() {
    if !init() {
        return;
    }
    let src = gst::Bin::with_name("source");
    let msg = gst::message::Error::builder(gst::CoreError::Failed, "boom")
        .src(&src)
        .debug("detail")
        .build();

    match PipelineEvent::from(&msg) {
        PipelineEvent::Error {
            source,
            message,
            debug,
        } => {
            assert_eq!(source, "source");
            assert_eq!(message, "boom");
            assert_eq!(debug.as_deref(), Some("detail"));
        }
        other => panic!("Expected Error, got {:?}", other),
    }
}

#[test]
fn test_warning_message() {
    if !init() {
        return;
    }
    let src = gst::Bin::with_name("sink");
    let msg = gst::message::Warning::builder(gst::CoreError::Failed, "slow")
        .src(&src)
        .build();

    match PipelineEvent::from(&msg) {
        PipelineEvent::Warning { source, message, .. } => {
            assert_eq!(source, "sink");
            assert_eq!(message, "slow");
        }
        other => panic!("Expected Warning, got {:?}", other),
    }
}

#[test]
fn test_state_changed_top_level() {
    if !init() {
        return;
    }
    let pipeline = gst::Pipeline::with_name("relay");
    let msg = gst::message::StateChanged::builder(
        gst::State::Paused,
        gst::State::Playing,
        gst::State::VoidPending,
    )
    .src(&pipeline)
    .build();

    assert_eq!(
        PipelineEvent::from(&msg),
        PipelineEvent::StateChanged {
            top_level: true,
            old: PipelineState::Paused,
            current: PipelineState::Playing,
            pending: PipelineState::VoidPending,
        }
    );
}

#[test]
fn test_state_changed_child_is_not_top_level() {
    if !init() {
        return;
    }
    let child = gst::Bin::with_name("tee");
    let msg = gst::message::StateChanged::builder(
        gst::State::Null,
        gst::State::Ready,
        gst::State::Playing,
    )
    .src(&child)
    .build();

    match PipelineEvent::from(&msg) {
        PipelineEvent::StateChanged { top_level, .. } => assert!(!top_level),
        other => panic!("Expected StateChanged, got {:?}", other),
    }
}

#[test]
fn test_other_message() {
    if !init() {
        return;
    }
    let msg = gst::message::Latency::new();
    assert!(matches!(PipelineEvent::from(&msg), PipelineEvent::Other(_)));
}
