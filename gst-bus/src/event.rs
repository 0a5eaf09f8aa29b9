use std::fmt::{Display, Formatter};

use gstreamer as gst;
use gstreamer::prelude::*;

/// Element state as reported by a state-changed message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    VoidPending,
    Null,
    Ready,
    Paused,
    Playing,
}

impl PipelineState {
    /// GStreamer nick name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::VoidPending => "void-pending",
            PipelineState::Null => "null",
            PipelineState::Ready => "ready",
            PipelineState::Paused => "paused",
            PipelineState::Playing => "playing",
        }
    }
}

impl Display for PipelineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.name())
    }
}

impl From<gst::State> for PipelineState {
    fn from(state: gst::State) -> Self {
        match state {
            gst::State::Null => PipelineState::Null,
            gst::State::Ready => PipelineState::Ready,
            gst::State::Paused => PipelineState::Paused,
            gst::State::Playing => PipelineState::Playing,
            _ => PipelineState::VoidPending,
        }
    }
}

/// A message delivered on the pipeline bus, reduced to what the event loop
/// acts on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineEvent {
    Error {
        /// Name of the element that posted the error.
        source: String,
        message: String,
        debug: Option<String>,
    },
    Warning {
        source: String,
        message: String,
        debug: Option<String>,
    },
    Eos,
    StateChanged {
        /// Whether the change happened on the pipeline itself rather than on
        /// one of its children.
        top_level: bool,
        old: PipelineState,
        current: PipelineState,
        pending: PipelineState,
    },
    /// Any other message type, carried by name.
    Other(String),
}

fn source_name(msg: &gst::Message) -> String {
    msg.src()
        .map(|s| s.name().to_string())
        .unwrap_or_else(|| "<unknown>".to_string())
}

impl From<&gst::Message> for PipelineEvent {
    fn from(msg: &gst::Message) -> Self {
        use gst::MessageView;

        match msg.view() {
            MessageView::Error(err) => PipelineEvent::Error {
                source: source_name(msg),
                message: err.error().to_string(),
                debug: err.debug().map(|d| d.to_string()),
            },
            MessageView::Warning(warning) => PipelineEvent::Warning {
                source: source_name(msg),
                message: warning.error().to_string(),
                debug: warning.debug().map(|d| d.to_string()),
            },
            MessageView::Eos(..) => PipelineEvent::Eos,
            MessageView::StateChanged(changed) => PipelineEvent::StateChanged {
                top_level: msg.src().is_some_and(|s| s.is::<gst::Pipeline>()),
                old: changed.old().into(),
                current: changed.current().into(),
                pending: changed.pending().into(),
            },
            _ => PipelineEvent::Other(format!("{:?}", msg.type_())),
        }
    }
}

#[cfg(test)]
#[path = "event_test.rs"]
mod event_test;
