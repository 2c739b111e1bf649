//! Route `tracing` events to the host log.
//!
//! The host collects plugin output in its own log file through
//! `XPLMDebugString`. [`HostLog`] is a `tracing-subscriber` writer that
//! buffers one formatted event and hands it to a sink as a single line.

use std::io;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the `EnvFilter` directives.
pub const LOG_ENV: &str = "XPTRIANGLE_LOG";

/// Filter used when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Receives one complete log line.
pub type LogSink = fn(&str);

/// [`MakeWriter`] prefixing every line with the plugin name.
#[derive(Clone)]
pub struct HostLog {
    prefix: Arc<str>,
    sink: LogSink,
}

impl HostLog {
    pub fn new(prefix: &str, sink: LogSink) -> Self {
        Self {
            prefix: Arc::from(prefix),
            sink,
        }
    }
}

impl<'a> MakeWriter<'a> for HostLog {
    type Writer = HostLine;

    fn make_writer(&'a self) -> Self::Writer {
        HostLine {
            prefix: self.prefix.clone(),
            sink: self.sink,
            buf: Vec::with_capacity(128),
        }
    }
}

/// One event's worth of output, flushed to the sink on drop.
pub struct HostLine {
    prefix: Arc<str>,
    sink: LogSink,
    buf: Vec<u8>,
}

impl io::Write for HostLine {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for HostLine {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let text = String::from_utf8_lossy(&self.buf);
        let mut line = format!("[{}] {}", self.prefix, text.trim_end());
        line.push('\n');
        (self.sink)(&line);
    }
}

static INSTALLED: OnceCell<bool> = OnceCell::new();

fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `sink`.
///
/// Only the first call has an effect; the host may start the plugin again
/// after a stop within the same process. Returns whether this plugin's
/// subscriber is the installed one.
pub fn init(plugin_name: &str, sink: LogSink) -> bool {
    *INSTALLED.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_env_filter(filter_from_env())
            .with_writer(HostLog::new(plugin_name, sink))
            .try_init()
            .is_ok()
    })
}
