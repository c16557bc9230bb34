//! Listening modes and the per-session record

use chrono::{DateTime, Utc};
use std::fmt;

/// Engine listening modes
///
/// `Shutdown` doubles as the pre-start state and the only terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Dormant: scanning final transcripts for a wake phrase
    WakeWord,
    /// Active: capturing free-form commands until timeout or termination
    Command,
    /// Not running; requires external reconstruction to resume
    Shutdown,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::WakeWord => write!(f, "wake_word"),
            Mode::Command => write!(f, "command"),
            Mode::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Live session state. Created by `start()`, destroyed by `stop()`; the
/// mode field is mutated only inside the controller.
#[derive(Debug)]
pub struct Session {
    pub id: u64,
    pub mode: Mode,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            mode: Mode::WakeWord,
            last_activity: Utc::now(),
        }
    }

    /// Record qualifying activity
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_in_wake_word() {
        let session = Session::new(1);
        assert_eq!(session.mode, Mode::WakeWord);
    }

    #[test]
    fn test_touch_advances_activity() {
        let mut session = Session::new(1);
        let before = session.last_activity;
        session.touch();
        assert!(session.last_activity >= before);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::WakeWord.to_string(), "wake_word");
        assert_eq!(Mode::Command.to_string(), "command");
        assert_eq!(Mode::Shutdown.to_string(), "shutdown");
    }
}
