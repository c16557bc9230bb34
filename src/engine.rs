//! Mode controller - the state machine tying wake detection, termination,
//! timers, and intent routing together
//!
//! Transcript events arrive through `handle_transcript` (or the `run` loop);
//! outward notifications leave as [`EngineEvent`]s on an unbounded channel
//! the host subscribes to at construction. All state mutation happens on the
//! caller's task: the host must not deliver two events for the same session
//! concurrently.

use crate::config::{Config, ConfigError};
use crate::intent::{Action, CommandResponse, IntentRouter};
use crate::session::{Mode, Session};
use crate::termination::{Termination, TerminationClassifier};
use crate::timeout::{CommandTimeoutManager, TimerFired, TimerKind};
use crate::wake::{TriggerPhraseSet, WakeKind};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Reserved text emitted with the farewell response when a termination
/// phrase closes the session.
pub const TERMINATION_SENTINEL: &str = "__session_end__";

/// One recognition result from the external transcription collaborator
#[derive(Debug, Clone)]
pub struct TranscriptEvent {
    pub text: String,
    /// Recognizer confidence in [0, 1]
    pub confidence: f32,
    /// Final results are stabilized; interim ones may still be revised
    pub is_final: bool,
}

impl TranscriptEvent {
    pub fn final_text(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
            is_final: true,
        }
    }
}

/// Outward notifications. `CommandReceived` with [`TERMINATION_SENTINEL`]
/// as its text carries the farewell for a closing session.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    WakeWordDetected {
        phrase: String,
        score: f32,
    },
    CommandReceived {
        text: String,
        confidence: f32,
        response: CommandResponse,
    },
    ModeChanged(Mode),
}

/// Input accepted by the [`ModeController::run`] loop
#[derive(Debug)]
pub enum ControllerCommand {
    Transcript(TranscriptEvent),
    Stop,
}

/// Whether the host should restart a transcription stream that ended
/// unexpectedly. During command capture an external dialogue pipeline owns
/// audio, so the engine must not reclaim it.
pub struct RestartPolicy;

impl RestartPolicy {
    pub fn should_restart(mode: Mode) -> bool {
        matches!(mode, Mode::WakeWord)
    }
}

pub struct ModeController {
    triggers: TriggerPhraseSet,
    termination: TerminationClassifier,
    router: IntentRouter,
    min_confidence: f32,
    idle: CommandTimeoutManager,
    grace: CommandTimeoutManager,
    timer_rx: Option<mpsc::UnboundedReceiver<TimerFired>>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    session: Option<Session>,
    next_session_id: u64,
}

impl ModeController {
    /// Build a controller from validated configuration. Returns the
    /// controller and the event stream the host consumes.
    pub fn new(
        config: &Config,
    ) -> Result<(Self, mpsc::UnboundedReceiver<EngineEvent>), ConfigError> {
        config.validate()?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();

        let controller = Self {
            triggers: TriggerPhraseSet::new(&config.wake),
            termination: TerminationClassifier::new(&config.termination),
            router: IntentRouter::new(),
            min_confidence: config.session.min_confidence,
            idle: CommandTimeoutManager::new(
                TimerKind::Idle,
                Duration::from_millis(config.session.timeout_ms),
                timer_tx.clone(),
            ),
            grace: CommandTimeoutManager::new(
                TimerKind::Grace,
                Duration::from_millis(config.session.grace_ms),
                timer_tx,
            ),
            timer_rx: Some(timer_rx),
            event_tx,
            session: None,
            next_session_id: 0,
        };
        Ok((controller, event_rx))
    }

    pub fn mode(&self) -> Mode {
        self.session.as_ref().map_or(Mode::Shutdown, |s| s.mode)
    }

    /// Begin wake listening. No-op if already started.
    pub fn start(&mut self) {
        if self.session.is_some() {
            return;
        }
        self.next_session_id += 1;
        self.session = Some(Session::new(self.next_session_id));
        info!(session = self.next_session_id, "listening started");
        self.emit_mode(Mode::WakeWord);
    }

    /// Cancel all pending timers and move to `Shutdown`. Idempotent.
    pub fn stop(&mut self) {
        if self.session.is_some() {
            info!("stop requested");
        }
        self.shutdown_internal();
    }

    /// Feed one transcription result into the state machine
    pub fn handle_transcript(&mut self, event: TranscriptEvent) {
        match self.mode() {
            Mode::Shutdown => debug!("transcript ignored, engine not running"),
            Mode::WakeWord => self.handle_wake_listening(event),
            Mode::Command => self.handle_command_capture(event),
        }
    }

    /// Drive the controller from a command channel until `Stop` arrives,
    /// the channel closes, or a shutdown phrase lands.
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<ControllerCommand>) {
        let Some(mut timer_rx) = self.timer_rx.take() else {
            warn!("controller run loop already active");
            return;
        };
        self.start();
        while self.mode() != Mode::Shutdown {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(ControllerCommand::Transcript(event)) => self.handle_transcript(event),
                    Some(ControllerCommand::Stop) | None => self.stop(),
                },
                Some(fired) = timer_rx.recv() => self.handle_timer(fired),
            }
        }
        self.timer_rx = Some(timer_rx);
    }

    fn handle_wake_listening(&mut self, event: TranscriptEvent) {
        // Interim results are too unstable to wake on
        if !event.is_final {
            return;
        }
        if event.confidence < self.min_confidence {
            debug!(
                confidence = event.confidence,
                "low-confidence transcript during wake listening"
            );
            let response = CommandResponse::fail(
                Action::RepeatRequest,
                "I didn't quite hear that. Could you repeat it?",
            );
            self.emit_command(&event.text, event.confidence, response);
            return;
        }

        let Some(matched) = self.triggers.detect(&event.text) else {
            debug!(text = %event.text, "no wake phrase in transcript");
            return;
        };

        info!(phrase = %matched.phrase, score = matched.score, "wake phrase detected");
        if let Some(session) = &mut self.session {
            session.touch();
        }
        let _ = self.event_tx.send(EngineEvent::WakeWordDetected {
            phrase: matched.phrase.clone(),
            score: matched.score,
        });
        self.set_mode(Mode::Command);

        let greeting = match matched.kind {
            WakeKind::Order => CommandResponse::ok(
                Action::WakeWordOrder,
                "Welcome! What would you like to order?",
            ),
            WakeKind::Inquiry => {
                CommandResponse::ok(Action::WakeWordInquiry, "Hi! How can I help you?")
            }
        };
        self.emit_command(&event.text, event.confidence, greeting);
        self.idle.reset();
    }

    fn handle_command_capture(&mut self, event: TranscriptEvent) {
        if event.confidence < self.min_confidence {
            debug!(
                confidence = event.confidence,
                "dropping low-confidence transcript"
            );
            return;
        }

        if let Some(session) = &mut self.session {
            session.touch();
        }
        self.idle.reset();

        match self.termination.classify(&event.text) {
            Some(Termination::Soft) => {
                info!("termination phrase heard, closing session after grace delay");
                let response =
                    CommandResponse::ok(Action::SwitchToWakeWord, "Alright, talk to you later.");
                self.emit_command(TERMINATION_SENTINEL, event.confidence, response);
                self.idle.cancel();
                self.grace.reset();
            }
            Some(Termination::Shutdown) => {
                info!("shutdown phrase heard");
                let response =
                    CommandResponse::ok(Action::SystemShutdown, "Shutting down. Goodbye.");
                self.emit_command(&event.text, event.confidence, response);
                self.shutdown_internal();
            }
            None => {
                let response = self.router.classify(&event.text);
                debug!(action = %response.action, success = response.success, "command classified");
                self.emit_command(&event.text, event.confidence, response);
            }
        }
    }

    fn handle_timer(&mut self, fired: TimerFired) {
        let current = match fired.kind {
            TimerKind::Idle => self.idle.is_current(&fired),
            TimerKind::Grace => self.grace.is_current(&fired),
        };
        if !current || self.mode() != Mode::Command {
            debug!(kind = ?fired.kind, "discarding stale timer fire");
            return;
        }

        match fired.kind {
            TimerKind::Idle => info!("command session idle timeout"),
            TimerKind::Grace => debug!("grace delay elapsed"),
        }
        self.idle.cancel();
        self.grace.cancel();
        self.set_mode(Mode::WakeWord);
    }

    fn shutdown_internal(&mut self) {
        self.idle.cancel();
        self.grace.cancel();
        if self.session.take().is_some() {
            self.emit_mode(Mode::Shutdown);
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        let changed = match &mut self.session {
            Some(session) if session.mode != mode => {
                session.mode = mode;
                true
            }
            _ => false,
        };
        if changed {
            self.emit_mode(mode);
        }
    }

    fn emit_mode(&self, mode: Mode) {
        let _ = self.event_tx.send(EngineEvent::ModeChanged(mode));
    }

    fn emit_command(&self, text: &str, confidence: f32, response: CommandResponse) {
        let _ = self.event_tx.send(EngineEvent::CommandReceived {
            text: text.to_string(),
            confidence,
            response,
        });
    }
}
