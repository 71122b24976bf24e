//! Progress notifications emitted while a project is created
//!
//! Callers pass any [`EventSink`]; [`NoopSink`] is used when none is given so
//! the pipeline never has to check for a missing sink.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Notification channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Detailed progress, hidden unless the user asked for it
    Verbose,
    /// Normal progress messages
    Log,
    /// Something unexpected that did not stop creation
    Warn,
    /// A failure
    Error,
}

impl Channel {
    /// Channel name as used by event consumers
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verbose => "verbose",
            Self::Log => "log",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fire-and-forget receiver of progress notifications
pub trait EventSink: Send + Sync {
    /// Deliver one message on `channel`
    fn emit(&self, channel: Channel, message: &str);

    /// Shorthand for [`Channel::Verbose`]
    fn verbose(&self, message: &str) {
        self.emit(Channel::Verbose, message);
    }

    /// Shorthand for [`Channel::Log`]
    fn log(&self, message: &str) {
        self.emit(Channel::Log, message);
    }
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _channel: Channel, _message: &str) {}
}

/// Sink that forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, channel: Channel, message: &str) {
        match channel {
            Channel::Verbose => tracing::debug!(target: "appseed::events", "{message}"),
            Channel::Log => tracing::info!(target: "appseed::events", "{message}"),
            Channel::Warn => tracing::warn!(target: "appseed::events", "{message}"),
            Channel::Error => tracing::error!(target: "appseed::events", "{message}"),
        }
    }
}

/// Sink that keeps every event in memory
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<(Channel, String)>>>,
}

impl RecordingSink {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All events received so far, in order
    #[must_use]
    pub fn events(&self) -> Vec<(Channel, String)> {
        self.events.lock().clone()
    }

    /// Messages received on `channel`, in order
    #[must_use]
    pub fn messages(&self, channel: Channel) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// True if any message on `channel` contains `needle`
    #[must_use]
    pub fn contains(&self, channel: Channel, needle: &str) -> bool {
        self.events
            .lock()
            .iter()
            .any(|(c, m)| *c == channel && m.contains(needle))
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, channel: Channel, message: &str) {
        self.events.lock().push((channel, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.verbose("one");
        sink.log("two");
        sink.emit(Channel::Warn, "three");

        assert_eq!(
            sink.events(),
            vec![
                (Channel::Verbose, "one".to_string()),
                (Channel::Log, "two".to_string()),
                (Channel::Warn, "three".to_string()),
            ]
        );
        assert_eq!(sink.messages(Channel::Log), vec!["two".to_string()]);
        assert!(sink.contains(Channel::Verbose, "on"));
        assert!(!sink.contains(Channel::Error, "one"));
    }

    #[test]
    fn test_clones_share_storage() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        handle.log("shared");
        assert_eq!(sink.messages(Channel::Log).len(), 1);
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(Channel::Verbose.to_string(), "verbose");
        assert_eq!(Channel::Log.as_str(), "log");
        assert_eq!(Channel::Error.as_str(), "error");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_sink_maps_channels_to_levels() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let sink: &dyn EventSink = &TracingSink;
            sink.verbose("detail");
            sink.log("progress");
            sink.emit(Channel::Warn, "odd");
            sink.emit(Channel::Error, "broken");
        });

        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        for (line, (level, message)) in lines.iter().zip([
            ("DEBUG", "detail"),
            ("INFO", "progress"),
            ("WARN", "odd"),
            ("ERROR", "broken"),
        ]) {
            assert!(line.contains(level), "{line}");
            assert!(line.contains("appseed::events"), "{line}");
            assert!(line.ends_with(message), "{line}");
        }
    }

    #[test]
    fn test_noop_sink_accepts_everything() {
        let sink: &dyn EventSink = &NoopSink;
        sink.verbose("ignored");
        sink.emit(Channel::Error, "ignored");
    }
}
