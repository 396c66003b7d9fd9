//! Notification sink contract.
//!
//! The rendering layer implements [`NotificationSink`]; the engine calls it
//! for reminder fires, completion celebrations, timer completion and
//! persistence failures. The engine never inspects what the sink does.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyKind {
    Info,
    Success,
    Warning,
    Error,
}

/// Audible cue requested alongside a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    /// Task or focus session finished.
    Completion,
    /// A reminder fired.
    Reminder,
}

pub trait NotificationSink: Send {
    fn notify(&self, message: &str, kind: NotifyKind, persistent: bool);

    fn play_cue(&self, _cue: SoundCue) {}
}

/// Sink that drops everything. Used when no renderer is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _message: &str, _kind: NotifyKind, _persistent: bool) {}
}

/// A notification captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotifyKind,
    pub persistent: bool,
}

/// Sink that buffers notifications and cues for a poller to drain.
///
/// Clones share one buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
    cues: Arc<Mutex<Vec<SoundCue>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all buffered notifications.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock())
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    pub fn cues(&self) -> Vec<SoundCue> {
        self.cues.lock().clone()
    }

    pub fn count_kind(&self, kind: NotifyKind) -> usize {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, message: &str, kind: NotifyKind, persistent: bool) {
        self.notifications.lock().push(Notification {
            message: message.to_string(),
            kind,
            persistent,
        });
    }

    fn play_cue(&self, cue: SoundCue) {
        self.cues.lock().push(cue);
    }
}
