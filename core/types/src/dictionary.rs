use serde_json::{Map, Value};
use tracing::warn;

use crate::error::DecodeError;

/// Generic key/value form every persisted type is stored as.
pub type Dictionary = Map<String, Value>;

/// Key holding the variant discriminator of sum types.
pub const CASE_KEY: &str = "case";

pub trait DictionaryRepresentable: Sized {
    fn to_dictionary(&self) -> Dictionary;

    fn from_dictionary(dictionary: &Dictionary) -> Result<Self, DecodeError>;

    fn converted_to_dictionary_and_back(&self) -> Result<Self, DecodeError> {
        Self::from_dictionary(&self.to_dictionary())
    }

    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(dictionary) => Self::from_dictionary(dictionary),
            _ => Err(DecodeError::wrong_type("<root>", "dictionary")),
        }
    }
}

pub fn required_str<'a>(dictionary: &'a Dictionary, key: &str) -> Result<&'a str, DecodeError> {
    match dictionary.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(DecodeError::wrong_type(key, "string")),
        None => Err(DecodeError::missing(key)),
    }
}

pub fn required_dictionary<'a>(
    dictionary: &'a Dictionary,
    key: &str,
) -> Result<&'a Dictionary, DecodeError> {
    match dictionary.get(key) {
        Some(Value::Object(inner)) => Ok(inner),
        Some(_) => Err(DecodeError::wrong_type(key, "dictionary")),
        None => Err(DecodeError::missing(key)),
    }
}

pub fn discriminator(dictionary: &Dictionary) -> Result<&str, DecodeError> {
    required_str(dictionary, CASE_KEY)
}

pub(crate) fn tagged(case: &str) -> Dictionary {
    let mut dictionary = Dictionary::new();
    dictionary.insert(CASE_KEY.to_string(), Value::String(case.to_string()));
    dictionary
}

/// Decodes every entry it can and drops the rest with a warning.
pub fn decode_all<T: DictionaryRepresentable>(values: &[Value]) -> Vec<T> {
    let (decoded, skipped) = decode_all_reporting(values);
    for (index, error) in &skipped {
        warn!("Skipping entry #{}: {}", index, error);
    }
    decoded
}

/// Like [`decode_all`], but hands the failures back instead of logging them.
pub fn decode_all_reporting<T: DictionaryRepresentable>(
    values: &[Value],
) -> (Vec<T>, Vec<(usize, DecodeError)>) {
    let mut decoded = Vec::with_capacity(values.len());
    let mut skipped = Vec::new();

    for (index, value) in values.iter().enumerate() {
        match T::from_value(value) {
            Ok(item) => decoded.push(item),
            Err(e) => skipped.push((index, e)),
        }
    }

    (decoded, skipped)
}
