use anyhow::Context;
use gst_bus::{
    bus::{EventLoop, LoopExit},
    pipeline::{MediaPipeline, PipelineBackend},
    source::InputSource,
};

use crate::{config::RelayConfig, signal::Shutdown};

/// Runs one relay to completion and returns the process exit code.
///
/// The stream url and input are validated before `backend` is asked for a
/// pipeline. Once a pipeline exists it is always stopped before returning.
pub async fn run<B: PipelineBackend>(
    config: &RelayConfig,
    backend: &B,
    shutdown: &Shutdown,
) -> i32 {
    let Some(stream_url) = config.rtmp_url() else {
        log::error!(
            "Unsupported stream URL {}",
            config.stream_url().unwrap_or("None")
        );
        return 1;
    };

    let Some(source) = InputSource::from_uri(config.input()) else {
        log::error!("Unsupported input: {}", config.input());
        return 1;
    };

    match relay(config, backend, &source, stream_url, shutdown).await {
        Ok(exit) => exit.exit_code(),
        Err(e) => {
            log::error!("relay {} failed: {:#}", source, e);
            1
        }
    }
}

async fn relay<B: PipelineBackend>(
    config: &RelayConfig,
    backend: &B,
    source: &InputSource,
    stream_url: &str,
    shutdown: &Shutdown,
) -> anyhow::Result<LoopExit> {
    log::info!("relaying {} to {}", source, stream_url);

    let mut pipeline = backend.build(source).context("build pipeline")?;
    let mut event_loop = EventLoop::new(config.poll_interval());

    let result = play(&mut pipeline, &mut event_loop, stream_url, shutdown).await;
    let exit = event_loop.shutdown(&mut pipeline);
    log::info!("pipeline stopped ({:?})", exit);

    result.map(|_| exit)
}

async fn play<P: MediaPipeline>(
    pipeline: &mut P,
    event_loop: &mut EventLoop,
    stream_url: &str,
    shutdown: &Shutdown,
) -> anyhow::Result<()> {
    pipeline
        .set_sink_location(stream_url)
        .context("set stream url")?;
    // taken before start so no early state change is missed
    let mut events = pipeline.events()?;
    pipeline.start().context("start pipeline")?;

    event_loop.run(&mut events, shutdown.token()).await;
    Ok(())
}

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;
