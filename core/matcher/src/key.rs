use topdrawer_types::{File, FileCondition, KeyAttribute, KeyNormalization};
use crate::normalizer::KeyNormalizer;

/// A normalized string a rule is filed under, together with the file
/// attribute it has to be compared against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DecisionKey {
    pub attribute: KeyAttribute,
    pub value: String,
}

pub struct DecisionKeyExtractor {
    normalizer: KeyNormalizer,
}

impl DecisionKeyExtractor {
    pub fn new(normalization: KeyNormalization) -> Self {
        Self {
            normalizer: KeyNormalizer::new(normalization),
        }
    }

    /// The key for a single condition, or `None` for conditions that depend on
    /// ancestor or parent context.
    pub fn condition_key(&self, condition: &FileCondition) -> Option<DecisionKey> {
        let attribute = condition.attribute()?;
        Some(DecisionKey {
            attribute,
            value: self.normalizer.normalize(&condition.decision_tree_input()),
        })
    }

    /// Key for a conjunction of conditions: the first one that only looks at
    /// the file itself. Any of them is a valid filter since all must hold.
    pub fn primary_key(&self, conditions: &[FileCondition]) -> Option<DecisionKey> {
        conditions.iter().find_map(|condition| self.condition_key(condition))
    }

    /// The keys a file can be found under, one per attribute.
    pub fn query_keys(&self, file: &File) -> [DecisionKey; 3] {
        KeyAttribute::ALL.map(|attribute| DecisionKey {
            attribute,
            value: self.normalizer.normalize(&attribute.value_of(file)),
        })
    }
}

impl Default for DecisionKeyExtractor {
    fn default() -> Self {
        Self::new(KeyNormalization::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topdrawer_types::{FolderContentsMatcher, HierarchyPredicate, StringPattern};

    #[test]
    fn test_condition_key() {
        let extractor = DecisionKeyExtractor::default();

        let name = FileCondition::Name(StringPattern::matching("dog"));
        assert_eq!(
            extractor.condition_key(&name),
            Some(DecisionKey { attribute: KeyAttribute::Name, value: "dog".to_string() })
        );

        let parent = FileCondition::ParentContains(FolderContentsMatcher::files_with_extension("png"));
        assert_eq!(extractor.condition_key(&parent), None);
    }

    #[test]
    fn test_primary_key_skips_context_conditions() {
        let extractor = DecisionKeyExtractor::default();
        let conditions = vec![
            FileCondition::HierarchyContains(HierarchyPredicate::folder_with_name(
                StringPattern::matching("Photos"),
            )),
            FileCondition::Ext(StringPattern::matching("png")),
            FileCondition::Name(StringPattern::matching("dog")),
        ];

        assert_eq!(
            extractor.primary_key(&conditions),
            Some(DecisionKey { attribute: KeyAttribute::Ext, value: "png".to_string() })
        );
        assert_eq!(extractor.primary_key(&conditions[..1]), None);
        assert_eq!(extractor.primary_key(&[]), None);
    }

    #[test]
    fn test_query_keys() {
        let extractor = DecisionKeyExtractor::default();
        let keys = extractor.query_keys(&File::new("dog", "png", "animals/dog.png"));

        let values: Vec<_> = keys.iter().map(|k| k.value.as_str()).collect();
        assert_eq!(values, vec!["dog", "png", "dog.png"]);
        assert_eq!(keys[2].attribute, KeyAttribute::FullName);
    }
}
