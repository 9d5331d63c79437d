//! One-hot positional character encoding of query text.
//!
//! Each of the first `positions` characters owns a block of `alphabet` entries;
//! exactly one entry per occupied block is 1, at `codepoint mod alphabet`.
//! Characters past the window are dropped.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::RankingConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f32>);

impl FeatureVector {
    pub fn width(&self) -> usize { self.0.len() }

    pub fn as_slice(&self) -> &[f32] { &self.0 }

    pub fn into_inner(self) -> Vec<f32> { self.0 }

    /// Number of set entries.
    pub fn ones(&self) -> usize { self.0.iter().filter(|&&x| x == 1.0).count() }
}

#[derive(Debug, Clone)]
pub struct QueryEncoder {
    positions: usize,
    alphabet: usize,
    strip_accents: bool,
}

impl QueryEncoder {
    pub fn new(positions: usize, alphabet: usize, strip_accents: bool) -> Self {
        Self { positions, alphabet, strip_accents }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self::new(config.positions, config.alphabet, config.strip_accents)
    }

    pub fn width(&self) -> usize { self.positions * self.alphabet }

    pub fn encode(&self, query: &str) -> FeatureVector {
        let mut features = vec![0f32; self.width()];
        let normalized;
        let text = if self.strip_accents {
            normalized = strip_accents(query);
            normalized.as_str()
        } else {
            query
        };
        for (position, ch) in text.chars().take(self.positions).enumerate() {
            let class = (ch as usize) % self.alphabet;
            features[position * self.alphabet + class] = 1.0;
        }
        FeatureVector(features)
    }
}

/// Canonical decomposition with combining marks removed, then recomposed:
/// "Café" -> "Cafe", while Hangul syllables stay one character each.
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics_but_keeps_base_letters() {
        assert_eq!(strip_accents("Café Zürich"), "Cafe Zurich");
        assert_eq!(strip_accents("plain"), "plain");
        assert_eq!(strip_accents("한국"), "한국");
    }

    #[test]
    fn accent_stripping_changes_the_encoding_only_when_enabled() {
        let folded = QueryEncoder::new(4, 128, true);
        let raw = QueryEncoder::new(4, 128, false);
        assert_eq!(folded.encode("é"), folded.encode("e"));
        assert_ne!(raw.encode("é"), raw.encode("e"));
    }

    #[test]
    fn out_of_range_code_points_fold_into_the_alphabet() {
        let enc = QueryEncoder::new(1, 128, false);
        let v = enc.encode("€");
        let idx = ('€' as usize) % 128;
        assert_eq!(v.as_slice()[idx], 1.0);
        assert_eq!(v.ones(), 1);
    }
}
