use std::time::Duration;

use anyhow::Context;
use futures::{StreamExt, stream::BoxStream};
use gstreamer as gst;
use gstreamer::prelude::*;

use crate::{
    bus::{EventSource, NextEvent},
    event::PipelineEvent,
    source::InputSource,
};

const SOURCE: &str = "source";
const TEE: &str = "tee";
const SINK: &str = "sink";
const SINK_LOCATION: &str = "location";

/// A constructed media graph owned by the relay.
pub trait MediaPipeline {
    type Events: EventSource;

    /// Sets the destination address on the `sink` endpoint.
    fn set_sink_location(&mut self, location: &str) -> anyhow::Result<()>;
    fn start(&mut self) -> anyhow::Result<()>;
    /// Returns the graph to the null state. Calling it again is a no-op.
    fn stop(&mut self) -> anyhow::Result<()>;
    /// Takes the event source of this pipeline. Only one may exist.
    fn events(&mut self) -> anyhow::Result<Self::Events>;
}

/// Builds pipelines for input sources.
pub trait PipelineBackend {
    type Pipeline: MediaPipeline;

    fn build(&self, source: &InputSource) -> anyhow::Result<Self::Pipeline>;
}

/// Backend that hands topologies to `gst::parse::launch`. GStreamer is
/// initialized on first build.
#[derive(Default)]
pub struct GstBackend;

impl PipelineBackend for GstBackend {
    type Pipeline = GstPipeline;

    fn build(&self, source: &InputSource) -> anyhow::Result<GstPipeline> {
        crate::init()?;
        GstPipeline::launch(source)
    }
}

pub struct GstPipeline {
    pipeline: gst::Pipeline,
    source: gst::Element,
    tee: gst::Element,
    sink: gst::Element,
    running: bool,
    events_taken: bool,
}

impl GstPipeline {
    pub fn launch(source: &InputSource) -> anyhow::Result<Self> {
        let topology = source.topology();
        log::debug!("launch {}: {}", source.kind(), topology);

        let element = gst::parse::launch(&topology)
            .with_context(|| format!("parse pipeline for {}", source))?;
        let pipeline = element
            .downcast::<gst::Pipeline>()
            .map_err(|_| anyhow::anyhow!("launch description for {} is not a pipeline", source))?;

        let endpoint = |name: &str| {
            pipeline
                .by_name(name)
                .ok_or_else(|| anyhow::anyhow!("pipeline has no element named {:?}", name))
        };
        let src = endpoint(SOURCE)?;
        let tee = endpoint(TEE)?;
        let sink = endpoint(SINK)?;

        if let Some((property, address)) = source.source_address() {
            set_string_property(&src, property, address)?;
        }

        Ok(Self {
            pipeline,
            source: src,
            tee,
            sink,
            running: false,
            events_taken: false,
        })
    }

    pub fn source(&self) -> &gst::Element {
        &self.source
    }

    /// Fan-out point between decode and re-encode.
    pub fn tee(&self) -> &gst::Element {
        &self.tee
    }

    pub fn sink(&self) -> &gst::Element {
        &self.sink
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl MediaPipeline for GstPipeline {
    type Events = GstEventSource;

    fn set_sink_location(&mut self, location: &str) -> anyhow::Result<()> {
        set_string_property(&self.sink, SINK_LOCATION, location)
    }

    fn start(&mut self) -> anyhow::Result<()> {
        // a failed transition may leave children in ready/paused; stop() must
        // still tear them down
        self.running = true;
        self.pipeline
            .set_state(gst::State::Playing)
            .context("set pipeline to playing")?;
        Ok(())
    }

    fn stop(&mut self) -> anyhow::Result<()> {
        if !self.running {
            return Ok(());
        }
        self.running = false;
        self.pipeline
            .set_state(gst::State::Null)
            .context("set pipeline to null")?;
        Ok(())
    }

    fn events(&mut self) -> anyhow::Result<GstEventSource> {
        if self.events_taken {
            return Err(anyhow::anyhow!("pipeline events already taken"));
        }
        let bus = self
            .pipeline
            .bus()
            .ok_or_else(|| anyhow::anyhow!("pipeline has no bus"))?;
        self.events_taken = true;
        Ok(GstEventSource {
            stream: bus.stream().boxed(),
        })
    }
}

fn set_string_property(element: &gst::Element, name: &str, value: &str) -> anyhow::Result<()> {
    if element.find_property(name).is_none() {
        return Err(anyhow::anyhow!(
            "element {} has no {} property",
            element.name(),
            name
        ));
    }
    element.set_property(name, value);
    Ok(())
}

impl Drop for GstPipeline {
    fn drop(&mut self) {
        if self.running {
            let _ = self.pipeline.set_state(gst::State::Null);
        }
    }
}

/// Pipeline bus messages, delivered synchronously by GStreamer's streaming
/// threads and forwarded through the bus stream.
pub struct GstEventSource {
    stream: BoxStream<'static, gst::Message>,
}

impl EventSource for GstEventSource {
    async fn next_event(&mut self, timeout: Duration) -> NextEvent {
        match tokio::time::timeout(timeout, self.stream.next()).await {
            Ok(Some(msg)) => NextEvent::Event(PipelineEvent::from(&msg)),
            Ok(None) => NextEvent::Closed,
            Err(_) => NextEvent::Timeout,
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
