//! Logging setup and an in-memory capture layer.
//!
//! `init_logging` installs the stderr subscriber used by the CLI. Hosts embedding the
//! composer can instead stack `MemoryLogLayer` on a registry and read entries back
//! from a `LogBuffer` to show submission progress next to the render queue.
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;
use tracing::{Event, Subscriber, field::Visit};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, Layer};

const LOG_BUFFER_CAPACITY: usize = 1000;

static LOGGING_INIT: OnceCell<()> = OnceCell::new();

/// Install the global stderr subscriber once. `RUST_LOG` takes precedence.
pub fn init_logging(verbose: bool) {
    LOGGING_INIT.get_or_init(|| {
        let default_level = if verbose { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: tracing::Level,
    pub timestamp: String,
    pub message: String,
    pub target: String,
}

impl LogEntry {
    pub fn new(level: tracing::Level, message: String, target: String) -> Self {
        let timestamp = chrono::Utc::now().format("%H:%M:%S").to_string();
        Self {
            level,
            timestamp,
            message,
            target,
        }
    }
}

/// Bounded, shareable log storage; oldest entries are dropped first.
#[derive(Clone, Default)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: LogEntry) {
        if let Ok(mut buf) = self.entries.lock() {
            buf.push_back(entry);
            while buf.len() > LOG_BUFFER_CAPACITY {
                buf.pop_front();
            }
        }
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|buf| buf.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|buf| buf.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct MemoryLogLayer {
    buffer: LogBuffer,
}

impl MemoryLogLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

struct MessageVisitor {
    message: String,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        }
    }
}

impl<S> Layer<S> for MemoryLogLayer
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = MessageVisitor {
            message: String::new(),
        };
        event.record(&mut visitor);

        let message = if !visitor.message.is_empty() {
            visitor.message
        } else {
            metadata.target().to_string()
        };

        self.buffer.push(LogEntry::new(
            *metadata.level(),
            message,
            metadata.target().to_string(),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn layer_captures_messages() {
        let buffer = LogBuffer::new();
        let subscriber = Registry::default().with(MemoryLogLayer::new(buffer.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("queued {}", "intro.mp4");
            tracing::warn!("second");
        });

        let entries = buffer.snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "queued intro.mp4");
        assert_eq!(entries[1].level, tracing::Level::WARN);
    }

    #[test]
    fn buffer_is_bounded() {
        let buffer = LogBuffer::new();
        for i in 0..(LOG_BUFFER_CAPACITY + 5) {
            buffer.push(LogEntry::new(
                tracing::Level::INFO,
                i.to_string(),
                "test".into(),
            ));
        }
        let entries = buffer.snapshot();
        assert_eq!(entries.len(), LOG_BUFFER_CAPACITY);
        assert_eq!(entries[0].message, "5");
    }
}
