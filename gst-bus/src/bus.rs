use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{event::PipelineEvent, pipeline::MediaPipeline};

/// Upper bound on a single wait for the next bus message.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Result of one bounded wait on an [`EventSource`].
#[derive(Debug)]
pub enum NextEvent {
    Event(PipelineEvent),
    /// Nothing arrived within the poll interval.
    Timeout,
    /// The source will never deliver again.
    Closed,
}

/// Bounded-wait access to the events of a running pipeline.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    async fn next_event(&mut self, timeout: Duration) -> NextEvent;
}

/// Why the event loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    /// Shutdown was requested from outside.
    Cancelled,
    EndOfStream,
    Error,
}

impl LoopExit {
    pub fn exit_code(&self) -> i32 {
        match self {
            LoopExit::Cancelled | LoopExit::EndOfStream => 0,
            LoopExit::Error => 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    /// Leaving the loop; the pipeline has not been torn down yet.
    Stopping(LoopExit),
    /// The pipeline is back in the null state.
    Stopped(LoopExit),
}

/// Drives a running pipeline until it errors, reaches end of stream or is
/// cancelled.
///
/// ```text
/// Running ──(cancel | error | eos)──► Stopping ──(shutdown)──► Stopped
///    ▲  │
///    └──┘ warning, state change, other, timeout
/// ```
pub struct EventLoop {
    state: LoopState,
    poll_interval: Duration,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl EventLoop {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            state: LoopState::Running,
            poll_interval,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Applies one event to the state machine and logs it. Events received
    /// after the loop left `Running` are ignored.
    pub fn handle(&mut self, event: &PipelineEvent) -> LoopState {
        if self.state != LoopState::Running {
            log::trace!("event after stop ignored: {:?}", event);
            return self.state;
        }

        match event {
            PipelineEvent::Error {
                source,
                message,
                debug,
            } => {
                log::error!("Error received from element {}: {}", source, message);
                log::error!(
                    "Debugging information: {}",
                    debug.as_deref().unwrap_or("none")
                );
                self.state = LoopState::Stopping(LoopExit::Error);
            }
            PipelineEvent::Warning {
                source,
                message,
                debug,
            } => {
                log::warn!(
                    "Warning received from element {}: {} ({})",
                    source,
                    message,
                    debug.as_deref().unwrap_or("none")
                );
            }
            PipelineEvent::Eos => {
                log::info!("End-Of-Stream reached.");
                self.state = LoopState::Stopping(LoopExit::EndOfStream);
            }
            PipelineEvent::StateChanged {
                top_level: true,
                old,
                current,
                ..
            } => {
                log::info!("Pipeline state changed from {} to {}.", old, current);
            }
            PipelineEvent::StateChanged { .. } => {
                log::trace!("child state changed: {:?}", event);
            }
            PipelineEvent::Other(kind) => {
                log::info!("Unexpected message received: {}", kind);
            }
        }
        self.state
    }

    /// Waits on `events` until a terminal event arrives or `cancel` fires.
    /// Cancellation wakes the wait immediately, so shutdown never lags by
    /// more than one poll interval.
    pub async fn run<S: EventSource>(
        &mut self,
        events: &mut S,
        cancel: &CancellationToken,
    ) -> LoopExit {
        loop {
            if let LoopState::Stopping(exit) | LoopState::Stopped(exit) = self.state {
                return exit;
            }
            if cancel.is_cancelled() {
                log::info!("shutdown requested, stopping pipeline");
                self.state = LoopState::Stopping(LoopExit::Cancelled);
                continue;
            }

            let next = tokio::select! {
                _ = cancel.cancelled() => continue,
                next = events.next_event(self.poll_interval) => next,
            };

            match next {
                NextEvent::Event(event) => {
                    self.handle(&event);
                }
                NextEvent::Timeout => {
                    log::trace!("no bus message within {:?}", self.poll_interval);
                }
                NextEvent::Closed => {
                    log::error!("pipeline bus closed unexpectedly");
                    self.state = LoopState::Stopping(LoopExit::Error);
                }
            }
        }
    }

    /// Brings `pipeline` back to the null state and marks the loop stopped.
    pub fn shutdown<P: MediaPipeline>(&mut self, pipeline: &mut P) -> LoopExit {
        let exit = match self.state {
            LoopState::Running => LoopExit::Cancelled,
            LoopState::Stopping(exit) | LoopState::Stopped(exit) => exit,
        };
        if let Err(e) = pipeline.stop() {
            log::warn!("stop pipeline failed: {:#}", e);
        }
        self.state = LoopState::Stopped(exit);
        exit
    }
}

#[cfg(test)]
#[path = "bus_test.rs"]
mod bus_test;
