use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Construction-time configuration failures. The engine refuses to start
/// with a config it cannot honor rather than clamping values silently.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("at least one wake phrase must be configured")]
    EmptyWakePhrases,
    #[error("wake threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f32),
    #[error("session timeout must be positive")]
    InvalidTimeout,
    #[error("minimum confidence must be in [0, 1], got {0}")]
    InvalidConfidence(f32),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub wake: WakeConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub termination: TerminationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            wake: WakeConfig::default(),
            session: SessionConfig::default(),
            termination: TerminationConfig::default(),
        }
    }
}

// ============================================================================
// Wake Config
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct WakeConfig {
    /// Wake phrases that open an ordering exchange
    #[serde(default = "default_order_phrases")]
    pub order_phrases: Vec<String>,

    /// Wake phrases that open a general inquiry exchange
    #[serde(default)]
    pub inquiry_phrases: Vec<String>,

    /// Normalized-score cutoff for wake detection (0, 1]
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            order_phrases: default_order_phrases(),
            inquiry_phrases: Vec::new(),
            threshold: default_threshold(),
        }
    }
}

fn default_order_phrases() -> Vec<String> {
    vec!["hey bar".to_string(), "hey bartender".to_string()]
}

fn default_threshold() -> f32 {
    0.72
}

// ============================================================================
// Session Config
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Idle timeout while in command mode before reverting to wake listening
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Delay between a termination phrase and the return to wake listening,
    /// so the host can play a farewell
    #[serde(default = "default_grace_ms")]
    pub grace_ms: u64,

    /// Transcripts below this confidence are never interpreted as commands
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            grace_ms: default_grace_ms(),
            min_confidence: default_min_confidence(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_grace_ms() -> u64 {
    400
}

fn default_min_confidence() -> f32 {
    0.5
}

// ============================================================================
// Termination Config
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TerminationConfig {
    /// Phrases that end the active session and return to wake listening
    #[serde(default = "default_soft_phrases")]
    pub soft_phrases: Vec<String>,

    /// Phrases that disable the pipeline entirely until restarted
    #[serde(default = "default_shutdown_phrases")]
    pub shutdown_phrases: Vec<String>,

    /// Maximum edit distance for a fuzzy termination match. Kept much
    /// tighter than the wake tolerance so ordinary commands cannot end a
    /// session by accident.
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            soft_phrases: default_soft_phrases(),
            shutdown_phrases: default_shutdown_phrases(),
            max_distance: default_max_distance(),
        }
    }
}

fn default_soft_phrases() -> Vec<String> {
    vec![
        "stop listening".to_string(),
        "that's all".to_string(),
        "that is all".to_string(),
        "goodbye".to_string(),
        "never mind".to_string(),
    ]
}

fn default_shutdown_phrases() -> Vec<String> {
    vec![
        "shut down".to_string(),
        "shutdown".to_string(),
        "power off".to_string(),
    ]
}

fn default_max_distance() -> usize {
    2
}

fn default_name() -> String {
    "Tapster".into()
}

impl Config {
    /// Load config from a TOML file, falling back to defaults when the file
    /// does not exist. Parse failures and invalid values are reported, not
    /// papered over.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            toml::from_str(&fs::read_to_string(path)?)?
        } else {
            Config::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Fail fast on values the engine cannot operate with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wake.order_phrases.is_empty() && self.wake.inquiry_phrases.is_empty() {
            return Err(ConfigError::EmptyWakePhrases);
        }
        if !(self.wake.threshold > 0.0 && self.wake.threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.wake.threshold));
        }
        if self.session.timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if !(0.0..=1.0).contains(&self.session.min_confidence) {
            return Err(ConfigError::InvalidConfidence(self.session.min_confidence));
        }
        Ok(())
    }
}
