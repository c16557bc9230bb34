//! Session-ending utterance detection
//!
//! Termination matching runs before intent classification and is
//! deliberately stricter than wake detection: containment or a small fixed
//! edit distance, never the wake threshold. A command that merely resembles
//! "stop listening" must not end the session.

use crate::config::TerminationConfig;
use crate::fuzzy::{clean_for_matching, window_distance};

/// How the session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Return to wake-word listening
    Soft,
    /// Disable the pipeline until externally restarted
    Shutdown,
}

pub struct TerminationClassifier {
    soft_phrases: Vec<String>,
    shutdown_phrases: Vec<String>,
    max_distance: usize,
}

impl TerminationClassifier {
    pub fn new(config: &TerminationConfig) -> Self {
        Self {
            soft_phrases: config.soft_phrases.iter().map(|p| p.to_lowercase()).collect(),
            shutdown_phrases: config
                .shutdown_phrases
                .iter()
                .map(|p| p.to_lowercase())
                .collect(),
            max_distance: config.max_distance,
        }
    }

    /// Classify a transcript as session-ending, or `None` for ordinary input
    pub fn classify(&self, text: &str) -> Option<Termination> {
        let cleaned = clean_for_matching(text);
        if self.matches_any(&cleaned, &self.soft_phrases) {
            return Some(Termination::Soft);
        }
        if self.matches_any(&cleaned, &self.shutdown_phrases) {
            return Some(Termination::Shutdown);
        }
        None
    }

    fn matches_any(&self, cleaned: &str, phrases: &[String]) -> bool {
        phrases.iter().any(|phrase| {
            let phrase_clean = clean_for_matching(phrase);
            cleaned.contains(&phrase_clean)
                || window_distance(cleaned, &phrase_clean)
                    .is_some_and(|d| d <= self.max_distance)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerminationConfig;

    fn classifier() -> TerminationClassifier {
        TerminationClassifier::new(&TerminationConfig::default())
    }

    #[test]
    fn test_soft_phrases() {
        assert_eq!(classifier().classify("stop listening"), Some(Termination::Soft));
        assert_eq!(classifier().classify("that's all"), Some(Termination::Soft));
        assert_eq!(classifier().classify("Goodbye!"), Some(Termination::Soft));
    }

    #[test]
    fn test_containment() {
        assert_eq!(
            classifier().classify("okay stop listening now"),
            Some(Termination::Soft)
        );
    }

    #[test]
    fn test_fuzzy_within_tight_tolerance() {
        // One transcription slip away from "stop listening"
        assert_eq!(
            classifier().classify("stop lisening"),
            Some(Termination::Soft)
        );
    }

    #[test]
    fn test_shutdown_phrases() {
        assert_eq!(classifier().classify("shut down"), Some(Termination::Shutdown));
        assert_eq!(classifier().classify("power off"), Some(Termination::Shutdown));
    }

    #[test]
    fn test_ordinary_commands_pass_through() {
        assert_eq!(classifier().classify("show me the cart"), None);
        assert_eq!(classifier().classify("add three beers"), None);
        // Shares words with "stop listening" but is not close enough
        assert_eq!(classifier().classify("stop the order"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(classifier().classify(""), None);
    }
}
