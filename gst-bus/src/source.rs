use std::fmt::{Display, Formatter};

const TEST_PATTERN_PREFIX: &str = "videotestsrc";
const UDP_PREFIX: &str = "udp://";
const UDP_H264_PREFIX: &str = "udp264://";
const UDP_H265_PREFIX: &str = "udp265://";
const RTSP_PREFIX: &str = "rtsp://";

/// Tail shared by every network input: decode whatever arrives, re-encode to
/// FLV and push it out through the rtmp sink.
const DECODE_TO_RTMP: &str =
    "parsebin ! decodebin ! tee name=tee ! avenc_flv ! flvmux streamable=1 ! rtmpsink name=sink";

/// RTP payload carried by a UDP input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoCodec {
    H264,
    H265,
}

impl Display for VideoCodec {
    /// Renders the RTP `encoding-name`.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            VideoCodec::H264 => write!(f, "H264"),
            VideoCodec::H265 => write!(f, "H265"),
        }
    }
}

/// The closed set of inputs a relay pipeline can be built from. Each variant
/// maps to exactly one fixed topology; only the source address varies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputSource {
    /// Synthetic test pattern, encoded with x264.
    TestPattern,
    /// RTP over UDP. `uri` always uses the plain `udp://` scheme.
    Udp { uri: String, codec: VideoCodec },
    Rtsp { uri: String },
}

impl InputSource {
    /// Maps an input specifier to a source. Prefixes are tested in order and
    /// the first match wins; `None` means the input is unsupported.
    ///
    /// `udp264://` and `udp265://` are aliases of `udp://` that pin the RTP
    /// payload type; the scheme is rewritten to `udp://` before it reaches
    /// `udpsrc`.
    pub fn from_uri(uri: &str) -> Option<Self> {
        if uri.starts_with(TEST_PATTERN_PREFIX) {
            return Some(InputSource::TestPattern);
        }
        if uri.starts_with(UDP_PREFIX) {
            return Some(InputSource::Udp {
                uri: uri.to_string(),
                codec: VideoCodec::H264,
            });
        }
        if let Some(rest) = uri.strip_prefix(UDP_H264_PREFIX) {
            return Some(InputSource::Udp {
                uri: format!("{}{}", UDP_PREFIX, rest),
                codec: VideoCodec::H264,
            });
        }
        if let Some(rest) = uri.strip_prefix(UDP_H265_PREFIX) {
            return Some(InputSource::Udp {
                uri: format!("{}{}", UDP_PREFIX, rest),
                codec: VideoCodec::H265,
            });
        }
        if uri.starts_with(RTSP_PREFIX) {
            return Some(InputSource::Rtsp {
                uri: uri.to_string(),
            });
        }
        None
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            InputSource::TestPattern => "videotestsrc",
            InputSource::Udp {
                codec: VideoCodec::H264,
                ..
            } => "udp/h264",
            InputSource::Udp {
                codec: VideoCodec::H265,
                ..
            } => "udp/h265",
            InputSource::Rtsp { .. } => "rtsp",
        }
    }

    /// The launch description for this source. Every topology names its
    /// endpoints `source`, `tee` and `sink`. The description never contains
    /// user input; the address is applied to the `source` element after
    /// launch, see [`InputSource::source_address`].
    pub fn topology(&self) -> String {
        match self {
            InputSource::TestPattern => {
                "videotestsrc name=source ! tee name=tee ! x264enc ! flvmux streamable=1 ! rtmpsink name=sink"
                    .to_string()
            }
            InputSource::Udp { codec, .. } => format!(
                "udpsrc name=source ! application/x-rtp, media=(string)video, clock-rate=(int)90000, encoding-name=(string){} ! {}",
                codec, DECODE_TO_RTMP
            ),
            InputSource::Rtsp { .. } => format!(
                "rtspsrc name=source latency=0 udp-reconnect=1 timeout=5000000000 ! {}",
                DECODE_TO_RTMP
            ),
        }
    }

    /// Property name and value that point the `source` element at its
    /// origin. `None` for sources without an address.
    pub fn source_address(&self) -> Option<(&'static str, &str)> {
        match self {
            InputSource::TestPattern => None,
            InputSource::Udp { uri, .. } => Some(("uri", uri.as_str())),
            InputSource::Rtsp { uri } => Some(("location", uri.as_str())),
        }
    }
}

impl Display for InputSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            InputSource::TestPattern => write!(f, "{}", self.kind()),
            InputSource::Udp { uri, .. } | InputSource::Rtsp { uri } => {
                write!(f, "{} ({})", self.kind(), uri)
            }
        }
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod source_test;
