use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of events a [`DebugLog`] keeps.
pub const DEBUG_LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    Info,
    Warn,
    Error,
}

/// One structured log line surfaced to the embedding UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugEvent {
    pub message: String,
    pub level: DebugLevel,
}

impl fmt::Display for DebugEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            DebugLevel::Info => "info",
            DebugLevel::Warn => "warn",
            DebugLevel::Error => "error",
        };
        write!(f, "[{level}] {}", self.message)
    }
}

pub type DebugSink = Box<dyn FnMut(&DebugEvent)>;

/// Ring buffer of the most recent [`DebugEvent`]s, mirrored to `log` and to
/// an optional sink.
#[derive(Default)]
pub struct DebugLog {
    events: VecDeque<DebugEvent>,
    sink: Option<DebugSink>,
}

impl DebugLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sink(&mut self, sink: DebugSink) {
        self.sink = Some(sink);
    }

    pub fn push(&mut self, level: DebugLevel, message: impl Into<String>) {
        let event = DebugEvent {
            message: message.into(),
            level,
        };
        match level {
            DebugLevel::Info => log::debug!("{}", event.message),
            DebugLevel::Warn => log::warn!("{}", event.message),
            DebugLevel::Error => log::error!("{}", event.message),
        }

        if let Some(sink) = self.sink.as_mut() {
            sink(&event);
        }
        if self.events.len() == DEBUG_LOG_CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(DebugLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(DebugLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(DebugLevel::Error, message);
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &DebugEvent> {
        self.events.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
