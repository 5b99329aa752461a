use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::condition::FileCondition;
use crate::dictionary::{Dictionary, DictionaryRepresentable};
use crate::entry::{File, Folder};
use crate::error::DecodeError;
use crate::hierarchy::HierarchyInformation;

/// A set of conditions that must all hold, paired with a payload the engine
/// hands back untouched when they do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<P> {
    pub id: Uuid,
    pub label: Option<String>,
    pub enabled: bool,
    pub conditions: Vec<FileCondition>,
    pub payload: P,
}

impl<P> Rule<P> {
    pub fn new(conditions: Vec<FileCondition>, payload: P) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: None,
            enabled: true,
            conditions,
            payload,
        }
    }

    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn display_name(&self) -> String {
        self.label.clone().unwrap_or_else(|| self.id.to_string())
    }

    pub fn matches(&self, file: &File, hierarchy: &HierarchyInformation, parent: Option<&Folder>) -> bool {
        self.conditions
            .iter()
            .all(|condition| condition.matches_in(file, hierarchy, parent))
    }
}

impl<P: Serialize> Rule<P> {
    /// The payload as it is stored in the dictionary form.
    pub fn payload_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(&self.payload)
    }
}

impl<P> DictionaryRepresentable for Rule<P>
where
    P: Serialize + DeserializeOwned,
{
    fn to_dictionary(&self) -> Dictionary {
        let mut dictionary = Dictionary::new();
        dictionary.insert("id".to_string(), Value::String(self.id.to_string()));
        if let Some(label) = &self.label {
            dictionary.insert("label".to_string(), Value::String(label.clone()));
        }
        dictionary.insert("enabled".to_string(), Value::Bool(self.enabled));
        dictionary.insert(
            "conditions".to_string(),
            Value::Array(
                self.conditions
                    .iter()
                    .map(|c| Value::Object(c.to_dictionary()))
                    .collect(),
            ),
        );
        // ペイロードはserde経由; シリアライズできない場合はnull
        let payload = self.payload_value().unwrap_or_else(|e| {
            warn!("Payload of rule {} cannot be serialized, storing null: {}", self.display_name(), e);
            Value::Null
        });
        dictionary.insert("payload".to_string(), payload);
        dictionary
    }

    fn from_dictionary(dictionary: &Dictionary) -> Result<Self, DecodeError> {
        let id = match dictionary.get("id") {
            Some(Value::String(s)) => Uuid::parse_str(s).map_err(|e| DecodeError::Payload {
                message: format!("invalid rule id '{}': {}", s, e),
            })?,
            Some(_) => return Err(DecodeError::wrong_type("id", "string")),
            None => Uuid::new_v4(),
        };

        let label = match dictionary.get("label") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(_) => return Err(DecodeError::wrong_type("label", "string")),
        };

        let enabled = match dictionary.get("enabled") {
            Some(Value::Bool(b)) => *b,
            Some(_) => return Err(DecodeError::wrong_type("enabled", "bool")),
            None => true,
        };

        let conditions = match dictionary.get("conditions") {
            Some(Value::Array(values)) => values
                .iter()
                .map(FileCondition::from_value)
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(DecodeError::wrong_type("conditions", "array")),
            None => return Err(DecodeError::missing("conditions")),
        };

        let payload_value = dictionary
            .get("payload")
            .cloned()
            .ok_or_else(|| DecodeError::missing("payload"))?;
        let payload = serde_json::from_value(payload_value).map_err(|e| DecodeError::Payload {
            message: e.to_string(),
        })?;

        Ok(Self {
            id,
            label,
            enabled,
            conditions,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folder_matcher::FolderContentsMatcher;
    use crate::pattern::StringPattern;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Icon {
        name: String,
    }

    fn swift_rule() -> Rule<Icon> {
        Rule::new(
            vec![
                FileCondition::Ext(StringPattern::matching("swift")),
                FileCondition::ParentContains(FolderContentsMatcher::files_with_extension("xcodeproj")),
            ],
            Icon { name: "swift".to_string() },
        )
        .with_label("Swift sources")
    }

    #[test]
    fn test_conditions_are_a_conjunction() {
        let rule = swift_rule();
        let file = File::new("main", "swift", "App/main.swift");
        let project = Folder::from_file_names(&["main.swift", "App.xcodeproj"]);
        let loose = Folder::from_file_names(&["main.swift"]);
        let hierarchy = HierarchyInformation::new();

        assert!(rule.matches(&file, &hierarchy, Some(&project)));
        assert!(!rule.matches(&file, &hierarchy, Some(&loose)));
        assert!(!rule.matches(&file, &hierarchy, None));
    }

    #[test]
    fn test_to_dictionary_and_back() {
        let rule = swift_rule();
        assert_eq!(rule.converted_to_dictionary_and_back().unwrap(), rule);

        let disabled = swift_rule().disabled();
        assert_eq!(disabled.converted_to_dictionary_and_back().unwrap(), disabled);
    }

    #[test]
    fn test_unserializable_payload_is_reported() {
        let mut payload = HashMap::new();
        payload.insert((1u8, 2u8), 3u8);
        let rule = Rule::new(vec![FileCondition::Ext(StringPattern::matching("png"))], payload);

        assert!(rule.payload_value().is_err());
        assert_eq!(rule.to_dictionary().get("payload"), Some(&Value::Null));
        assert!(swift_rule().payload_value().is_ok());
    }

    #[test]
    fn test_from_dictionary_defaults() {
        let value = json!({
            "conditions": [{ "case": "ext", "pattern": { "case": "matching", "value": "png" } }],
            "payload": { "name": "image" }
        });

        let rule = Rule::<Icon>::from_value(&value).unwrap();
        assert!(rule.enabled);
        assert_eq!(rule.label, None);
        assert_eq!(rule.payload, Icon { name: "image".to_string() });
    }

    #[test]
    fn test_from_dictionary_rejects_bad_condition() {
        let value = json!({
            "conditions": [{ "case": "createdBefore", "date": "2017-08-11" }],
            "payload": { "name": "old" }
        });

        assert!(matches!(
            Rule::<Icon>::from_value(&value),
            Err(DecodeError::UnknownDiscriminator { .. })
        ));
    }

    #[test]
    fn test_from_dictionary_rejects_bad_payload() {
        let value = json!({
            "conditions": [],
            "payload": 42
        });

        assert!(matches!(
            Rule::<Icon>::from_value(&value),
            Err(DecodeError::Payload { .. })
        ));
    }
}
