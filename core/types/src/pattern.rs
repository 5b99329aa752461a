use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dictionary::{discriminator, required_str, tagged, Dictionary, DictionaryRepresentable};
use crate::error::DecodeError;

/// A predicate over a single string.
///
/// Matching is exact and case-sensitive; callers normalize beforehand if they
/// need anything looser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StringPattern {
    Matching(String),
}

impl StringPattern {
    pub fn matching<S: Into<String>>(value: S) -> Self {
        Self::Matching(value.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Matching(target) => candidate == target,
        }
    }

    /// The literal the pattern is anchored on, if it has one.
    pub fn exact_value(&self) -> Option<&str> {
        match self {
            Self::Matching(target) => Some(target),
        }
    }
}

impl DictionaryRepresentable for StringPattern {
    fn to_dictionary(&self) -> Dictionary {
        match self {
            Self::Matching(value) => {
                let mut dictionary = tagged("matching");
                dictionary.insert("value".to_string(), Value::String(value.clone()));
                dictionary
            }
        }
    }

    fn from_dictionary(dictionary: &Dictionary) -> Result<Self, DecodeError> {
        match discriminator(dictionary)? {
            "matching" => Ok(Self::matching(required_str(dictionary, "value")?)),
            other => Err(DecodeError::unknown("pattern case", other)),
        }
    }
}
