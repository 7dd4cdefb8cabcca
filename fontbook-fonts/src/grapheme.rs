//! User-perceived characters and their normalization forms.

use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// One grapheme cluster (one or more code points).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grapheme(String);

impl Grapheme {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Code points as stored.
    pub fn code_points(&self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }

    /// Fully composed (NFC) code points.
    pub fn nfc(&self) -> Vec<char> {
        self.0.nfc().collect()
    }

    /// Fully decomposed (NFD) code points.
    pub fn nfd(&self) -> Vec<char> {
        self.0.nfd().collect()
    }
}

impl From<&str> for Grapheme {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<char> for Grapheme {
    fn from(c: char) -> Self {
        Self(c.to_string())
    }
}

impl std::fmt::Display for Grapheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split text into extended grapheme clusters.
///
/// Handles combining marks (e + U+0301), regional-indicator flags, ZWJ
/// sequences and skin-tone modifiers as single graphemes.
pub fn graphemes(text: &str) -> Vec<Grapheme> {
    text.graphemes(true).map(Grapheme::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precomposed_and_decomposed_forms() {
        let composed = Grapheme::from('\u{00E9}');
        assert_eq!(composed.nfc(), vec!['\u{00E9}']);
        assert_eq!(composed.nfd(), vec!['e', '\u{0301}']);

        let decomposed = Grapheme::new("e\u{0301}");
        assert_eq!(decomposed.nfc(), vec!['\u{00E9}']);
        assert_eq!(decomposed.nfd(), vec!['e', '\u{0301}']);
    }

    #[test]
    fn test_combining_mark_is_single_grapheme() {
        let clusters = graphemes("e\u{0301}x");
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].as_str(), "e\u{0301}");
    }

    #[test]
    fn test_flag_emoji_is_single_grapheme() {
        // US flag: U+1F1FA U+1F1F8 (two regional indicators)
        let clusters = graphemes("\u{1F1FA}\u{1F1F8}");
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].code_points().count(), 2);
    }

    #[test]
    fn test_zwj_sequence_is_single_grapheme() {
        let technologist = "\u{1F469}\u{200D}\u{1F4BB}";
        assert_eq!(graphemes(technologist).len(), 1);
    }

    #[test]
    fn test_hangul_syllable_decomposes_to_jamo() {
        // U+AC00 HANGUL SYLLABLE GA = U+1100 + U+1161
        let ga = Grapheme::from('\u{AC00}');
        assert_eq!(ga.nfd(), vec!['\u{1100}', '\u{1161}']);
    }
}
