/// Initializes GStreamer. Call once at startup before building any pipeline;
/// repeated calls are cheap no-ops.
pub fn init() -> anyhow::Result<()> {
    gstreamer::init().map_err(|e| anyhow::anyhow!("gstreamer init: {}", e))
}

pub mod bus;
pub mod event;
pub mod pipeline;
pub mod source;
