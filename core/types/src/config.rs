use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A persisted profile. Rules are kept as raw dictionaries so that entries
/// this build does not understand survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub roots: Vec<PathBuf>,
    pub rules: Vec<Value>,
    pub options: ScanOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roots: vec![],
            rules: vec![],
            options: ScanOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub key_normalization: KeyNormalization,
    pub follow_links: bool,
    pub include_hidden: bool,
    pub max_depth: Option<u32>,
    pub excluded_names: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            key_normalization: KeyNormalization::default(),
            follow_links: false,
            include_hidden: false,
            max_depth: None,
            excluded_names: Self::default_excluded_names(),
        }
    }
}

impl ScanOptions {
    fn default_excluded_names() -> Vec<String> {
        vec![
            ".git".to_string(),
            ".Trash".to_string(),
            "node_modules".to_string(),
        ]
    }
}

/// How decision keys are normalized before indexing and lookup.
///
/// Normalization only widens the candidate set; every candidate is still
/// confirmed with exact condition matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyNormalization {
    pub normalize_unicode: bool,
    pub normalize_case: bool,
}

impl Default for KeyNormalization {
    fn default() -> Self {
        Self {
            normalize_unicode: true,
            normalize_case: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_options_fill_defaults() {
        let options: ScanOptions = serde_json::from_str(r#"{ "max_depth": 3 }"#).unwrap();

        assert_eq!(options.max_depth, Some(3));
        assert!(!options.include_hidden);
        assert!(options.key_normalization.normalize_unicode);
        assert!(options.excluded_names.contains(&".git".to_string()));
    }
}
