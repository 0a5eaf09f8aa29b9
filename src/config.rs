use std::time::Duration;

use clap::Parser;

/// Scheme every `--stream-url` must carry.
pub const RTMP_SCHEME: &str = "rtmp://";

#[derive(Parser, Debug)]
#[command(name = "rtmp-relay", about = "Relay a live video input to an RTMP server")]
pub struct Args {
    /// Live stream input: videotestsrc, udp://, udp264://, udp265:// or rtsp://
    #[arg(long, default_value = "videotestsrc")]
    pub input: String,

    /// RTMP destination, e.g. rtmp://host/live/key
    #[arg(long = "stream-url")]
    pub stream_url: Option<String>,

    /// Seconds to wait for a pipeline message before re-checking for shutdown
    #[arg(
        long = "poll-interval",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub poll_interval: u64,
}

/// Reports a command-line parse failure and returns the exit code for it.
/// Usage errors exit 1 like any other configuration error; `--help` and
/// `--version` print to stdout and exit 0.
pub fn report_cli_error(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        log::error!("{}", err.render().to_string().trim_end());
        1
    } else {
        if let Err(e) = err.print() {
            log::error!("print usage: {}", e);
        }
        0
    }
}

pub struct RelayConfig {
    input: String,
    stream_url: Option<String>,
    poll_interval: Duration,
}

impl RelayConfig {
    pub fn new(input: &str, stream_url: Option<&str>) -> Self {
        Self {
            input: input.to_string(),
            stream_url: stream_url.map(str::to_string),
            poll_interval: gst_bus::bus::DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// The destination exactly as given, which may be missing or invalid.
    pub fn stream_url(&self) -> Option<&str> {
        self.stream_url.as_deref()
    }

    /// The destination, only if it is an RTMP url.
    pub fn rtmp_url(&self) -> Option<&str> {
        self.stream_url().filter(|url| url.starts_with(RTMP_SCHEME))
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl From<Args> for RelayConfig {
    fn from(args: Args) -> Self {
        RelayConfig::new(&args.input, args.stream_url.as_deref())
            .with_poll_interval(Duration::from_secs(args.poll_interval))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
