//! Wake phrase detection - scores transcripts against configured trigger
//! phrases and their phonetic variants

use crate::config::WakeConfig;
use crate::fuzzy::{clean_for_matching, normalized_score, window_distance};
use crate::phonetic::expand_variants;

/// Which conversational opening a wake phrase leads into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeKind {
    /// Ordering exchange ("hey bar")
    Order,
    /// General inquiry exchange
    Inquiry,
}

/// Best match for a transcript against the trigger set
#[derive(Debug, Clone)]
pub struct WakeMatch {
    /// Canonical phrase that matched (not the variant)
    pub phrase: String,
    pub kind: WakeKind,
    pub distance: usize,
    pub score: f32,
}

struct TriggerPhrase {
    phrase: String,
    kind: WakeKind,
    variants: Vec<String>,
}

/// Immutable set of canonical wake phrases, each expanded into phonetic
/// variants at construction time.
pub struct TriggerPhraseSet {
    phrases: Vec<TriggerPhrase>,
    threshold: f32,
}

impl TriggerPhraseSet {
    pub fn new(config: &WakeConfig) -> Self {
        let mut phrases = Vec::new();
        for (list, kind) in [
            (&config.order_phrases, WakeKind::Order),
            (&config.inquiry_phrases, WakeKind::Inquiry),
        ] {
            for phrase in list {
                let canonical = phrase.to_lowercase();
                phrases.push(TriggerPhrase {
                    variants: expand_variants(&canonical),
                    phrase: canonical,
                    kind,
                });
            }
        }
        Self {
            phrases,
            threshold: config.threshold,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Score the transcript against every phrase's variants and return the
    /// best match at or above the threshold. Phrases are checked in
    /// configuration order, so earlier phrases win ties.
    pub fn detect(&self, transcript: &str) -> Option<WakeMatch> {
        let cleaned = clean_for_matching(transcript);
        let mut best: Option<WakeMatch> = None;

        for trigger in &self.phrases {
            for variant in &trigger.variants {
                let Some(distance) = window_distance(&cleaned, variant) else {
                    continue;
                };
                let score = normalized_score(distance, &cleaned, variant);
                if best.as_ref().is_none_or(|b| score > b.score) {
                    best = Some(WakeMatch {
                        phrase: trigger.phrase.clone(),
                        kind: trigger.kind,
                        distance,
                        score,
                    });
                }
            }
        }

        best.filter(|m| m.score >= self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WakeConfig;

    fn trigger_set() -> TriggerPhraseSet {
        TriggerPhraseSet::new(&WakeConfig {
            order_phrases: vec!["hey bar".to_string()],
            inquiry_phrases: vec!["hey assistant".to_string()],
            threshold: 0.72,
        })
    }

    #[test]
    fn test_exact_phrase_scores_one() {
        let m = trigger_set().detect("hey bar").unwrap();
        assert_eq!(m.phrase, "hey bar");
        assert_eq!(m.kind, WakeKind::Order);
        assert_eq!(m.distance, 0);
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_phonetic_variant_matches() {
        // "hay bar" is a known phonetic variant, distance 0 to it
        let m = trigger_set().detect("hay bar").unwrap();
        assert_eq!(m.phrase, "hey bar");
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_punctuation_and_case_ignored() {
        let m = trigger_set().detect("Hey, Bar!").unwrap();
        assert_eq!(m.score, 1.0);
    }

    #[test]
    fn test_inquiry_kind_reported() {
        let m = trigger_set().detect("hey assistant").unwrap();
        assert_eq!(m.kind, WakeKind::Inquiry);
    }

    #[test]
    fn test_unrelated_transcript_rejected() {
        assert!(trigger_set().detect("completely unrelated words").is_none());
    }

    #[test]
    fn test_empty_transcript_rejected() {
        assert!(trigger_set().detect("").is_none());
    }
}
