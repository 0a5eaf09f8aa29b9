use gstreamer as gst;
use gstreamer::prelude::*;

use super::{GstBackend, MediaPipeline, PipelineBackend};
use crate::source::InputSource;

/// Backend for the test pattern topology, or `None` when GStreamer or one of
/// the required plugins is not installed.
fn test_pattern_backend() -> Option<GstBackend> {
    backend_with(&["videotestsrc", "tee", "x264enc", "flvmux", "rtmpsink"])
}

fn backend_with(factories: &[&str]) -> Option<GstBackend> {
    if let Err(e) = crate::init() {
        eprintln!("skip: {:#}", e);
        return None;
    }
    for &factory in factories {
        if gst::ElementFactory::find(factory).is_none() {
            eprintln!("skip: element {} not available", factory);
            return None;
        }
    }
    Some(GstBackend)
}

#[test]
fn test_build_test_pattern_exposes_endpoints() -> anyhow::Result<()> {
    let Some(backend) = test_pattern_backend() else {
        return Ok(());
    };

    let pipeline = backend.build(&InputSource::TestPattern)?;
    assert_eq!(pipeline.source().name(), "source");
    assert_eq!(pipeline.tee().name(), "tee");
    assert_eq!(pipeline.sink().name(), "sink");
    assert!(!pipeline.is_running());
    Ok(())
}

#[test]
fn test_set_sink_location() -> anyhow::Result<()> {
    let Some(backend) = test_pattern_backend() else {
        return Ok(());
    };

    let mut pipeline = backend.build(&InputSource::TestPattern)?;
    pipeline.set_sink_location("rtmp://localhost/live/test")?;
    let location = pipeline.sink().property::<Option<String>>("location");
    assert_eq!(location.as_deref(), Some("rtmp://localhost/live/test"));
    Ok(())
}

#[test]
fn test_stop_before_start_is_noop() -> anyhow::Result<()> {
    let Some(backend) = test_pattern_backend() else {
        return Ok(());
    };

    let mut pipeline = backend.build(&InputSource::TestPattern)?;
    pipeline.stop()?;
    pipeline.stop()?;
    assert!(!pipeline.is_running());
    Ok(())
}

#[test]
fn test_events_taken_once() -> anyhow::Result<()> {
    let Some(backend) = test_pattern_backend() else {
        return Ok(());
    };

    let mut pipeline = backend.build(&InputSource::TestPattern)?;
    let _events = pipeline.events()?;
    assert!(pipeline.events().is_err());
    Ok(())
}

#[test]
fn test_rtsp_address_set_on_source_element() -> anyhow::Result<()> {
    let Some(backend) = backend_with(&[
        "rtspsrc",
        "parsebin",
        "decodebin",
        "tee",
        "avenc_flv",
        "flvmux",
        "rtmpsink",
    ]) else {
        return Ok(());
    };

    let uri = "rtsp://127.0.0.1:8554/live";
    let source = InputSource::from_uri(uri).unwrap();
    let pipeline = backend.build(&source)?;

    let location = pipeline.source().property::<Option<String>>("location");
    assert_eq!(location.as_deref(), Some(uri));
    Ok(())
}
