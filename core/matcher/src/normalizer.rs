use unicode_normalization::{is_nfc, UnicodeNormalization};
use topdrawer_types::KeyNormalization;

/// Normalizes decision keys. The same normalizer is used when indexing rules
/// and when looking files up, so both sides always agree.
#[derive(Debug, Clone)]
pub struct KeyNormalizer {
    options: KeyNormalization,
}

impl KeyNormalizer {
    pub fn new(options: KeyNormalization) -> Self {
        Self { options }
    }

    pub fn normalize(&self, text: &str) -> String {
        let mut result = text.to_string();

        // Unicode正規化 (NFC): HFS+ はファイル名をNFDで返す
        if self.options.normalize_unicode && !is_nfc(&result) {
            result = result.nfc().collect();
        }

        if self.options.normalize_case {
            result = result.to_lowercase();
        }

        result
    }
}

impl Default for KeyNormalizer {
    fn default() -> Self {
        Self::new(KeyNormalization::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composes_decomposed_names() {
        let normalizer = KeyNormalizer::default();
        let decomposed = "cafe\u{301}";

        assert_eq!(normalizer.normalize(decomposed), "caf\u{e9}");
        assert_eq!(normalizer.normalize("caf\u{e9}"), "caf\u{e9}");
    }

    #[test]
    fn test_case_folding_is_opt_in() {
        let default = KeyNormalizer::default();
        assert_eq!(default.normalize("README"), "README");

        let folding = KeyNormalizer::new(KeyNormalization {
            normalize_unicode: true,
            normalize_case: true,
        });
        assert_eq!(folding.normalize("README"), "readme");
    }

    #[test]
    fn test_disabled_normalization_is_identity() {
        let normalizer = KeyNormalizer::new(KeyNormalization {
            normalize_unicode: false,
            normalize_case: false,
        });

        assert_eq!(normalizer.normalize("cafe\u{301}"), "cafe\u{301}");
    }
}
