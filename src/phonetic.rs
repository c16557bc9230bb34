//! Phonetic variant expansion for wake phrases
//!
//! Speech recognizers routinely mishear short trigger words ("hey" as "hay",
//! "bar" as "far"). Each configured phrase is expanded into the spellings a
//! transcriber is likely to produce, so wake detection can match against all
//! of them instead of the canonical phrase alone.

use std::collections::BTreeSet;

/// Phonetically confusable alternates for common trigger tokens.
///
/// Keyed by the lowercase canonical token; values are spellings observed in
/// real transcription output for the same sound.
fn alternates(token: &str) -> &'static [&'static str] {
    match token {
        "hey" => &["hay", "hei", "hi", "they"],
        "hi" => &["high", "hey"],
        "okay" => &["ok", "kay"],
        "ok" => &["okay"],
        "bar" => &["far", "car", "ba", "bark"],
        "bartender" => &["bar tender", "bartenter"],
        "barkeep" => &["bar keep", "barkeeper"],
        "assistant" => &["assistent", "a sistant"],
        "listen" => &["lesson", "listening"],
        _ => &[],
    }
}

/// Expand a phrase into the deduplicated, lower-cased set of phonetically
/// plausible spellings, via cartesian expansion of per-token alternates.
///
/// Deterministic and side-effect free. An empty phrase expands to itself
/// only.
pub fn expand_variants(phrase: &str) -> Vec<String> {
    let canonical = phrase.to_lowercase();
    let tokens: Vec<&str> = canonical.split_whitespace().collect();
    if tokens.is_empty() {
        return vec![canonical];
    }

    let mut variants: Vec<String> = vec![String::new()];
    for token in &tokens {
        let mut options: Vec<&str> = vec![token];
        options.extend_from_slice(alternates(token));

        let mut next = Vec::with_capacity(variants.len() * options.len());
        for prefix in &variants {
            for option in &options {
                if prefix.is_empty() {
                    next.push((*option).to_string());
                } else {
                    next.push(format!("{} {}", prefix, option));
                }
            }
        }
        variants = next;
    }

    // BTreeSet keeps the output order stable across runs
    let deduped: BTreeSet<String> = variants.into_iter().collect();
    deduped.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_contains_canonical() {
        let variants = expand_variants("hey bar");
        assert!(variants.contains(&"hey bar".to_string()));
    }

    #[test]
    fn test_expand_cartesian() {
        let variants = expand_variants("hey bar");
        // Cross products of alternates appear
        assert!(variants.contains(&"hay bar".to_string()));
        assert!(variants.contains(&"hey far".to_string()));
        assert!(variants.contains(&"hay far".to_string()));
    }

    #[test]
    fn test_expand_lowercases() {
        let variants = expand_variants("Hey Bar");
        assert!(variants.contains(&"hey bar".to_string()));
        assert!(variants.iter().all(|v| v == &v.to_lowercase()));
    }

    #[test]
    fn test_expand_dedupes() {
        let variants = expand_variants("hey hey");
        let unique: std::collections::HashSet<_> = variants.iter().collect();
        assert_eq!(unique.len(), variants.len());
    }

    #[test]
    fn test_expand_unknown_token() {
        assert_eq!(expand_variants("xyzzy"), vec!["xyzzy".to_string()]);
    }

    #[test]
    fn test_expand_empty() {
        assert_eq!(expand_variants(""), vec![String::new()]);
    }
}
