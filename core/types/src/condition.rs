use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dictionary::{
    discriminator, required_dictionary, tagged, Dictionary, DictionaryRepresentable,
};
use crate::entry::{File, Folder};
use crate::error::DecodeError;
use crate::folder_matcher::FolderContentsMatcher;
use crate::hierarchy::HierarchyInformation;
use crate::pattern::StringPattern;

/// Which attribute of a file a primary condition looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAttribute {
    Name,
    Ext,
    FullName,
}

impl KeyAttribute {
    pub const ALL: [KeyAttribute; 3] = [KeyAttribute::Name, KeyAttribute::Ext, KeyAttribute::FullName];

    pub fn value_of(&self, file: &File) -> String {
        match self {
            Self::Name => file.name.clone(),
            Self::Ext => file.ext.clone(),
            Self::FullName => file.full_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HierarchyPredicate {
    FolderWithName(StringPattern),
}

impl HierarchyPredicate {
    pub fn folder_with_name(pattern: StringPattern) -> Self {
        Self::FolderWithName(pattern)
    }

    pub fn matches(&self, hierarchy: &HierarchyInformation) -> bool {
        match self {
            Self::FolderWithName(pattern) => hierarchy.folder_names().any(|name| pattern.matches(name)),
        }
    }
}

impl DictionaryRepresentable for HierarchyPredicate {
    fn to_dictionary(&self) -> Dictionary {
        match self {
            Self::FolderWithName(pattern) => {
                let mut dictionary = tagged("folderWithName");
                dictionary.insert("pattern".to_string(), Value::Object(pattern.to_dictionary()));
                dictionary
            }
        }
    }

    fn from_dictionary(dictionary: &Dictionary) -> Result<Self, DecodeError> {
        match discriminator(dictionary)? {
            "folderWithName" => Ok(Self::FolderWithName(StringPattern::from_dictionary(
                required_dictionary(dictionary, "pattern")?,
            )?)),
            other => Err(DecodeError::unknown("hierarchy predicate case", other)),
        }
    }
}

/// A condition on a file, its ancestor folders, or its containing folder.
///
/// Negation only exists in the flattened `ParentDoesntContain` form. Rules
/// combine several conditions as a conjunction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileCondition {
    Name(StringPattern),
    Ext(StringPattern),
    FullName(StringPattern),
    HierarchyContains(HierarchyPredicate),
    ParentContains(FolderContentsMatcher),
    ParentDoesntContain(FolderContentsMatcher),
}

impl FileCondition {
    /// Evaluates with no containing-folder context.
    pub fn matches(&self, file: &File, hierarchy: &HierarchyInformation) -> bool {
        self.matches_in(file, hierarchy, None)
    }

    /// Both parent conditions are false when `parent` is `None`: a root-level
    /// file never satisfies either of them.
    pub fn matches_in(
        &self,
        file: &File,
        hierarchy: &HierarchyInformation,
        parent: Option<&Folder>,
    ) -> bool {
        match self {
            Self::Name(pattern) => pattern.matches(&file.name),
            Self::Ext(pattern) => pattern.matches(&file.ext),
            Self::FullName(pattern) => pattern.matches(&file.full_name()),
            Self::HierarchyContains(predicate) => predicate.matches(hierarchy),
            Self::ParentContains(matcher) => parent.is_some_and(|folder| matcher.matches(folder)),
            Self::ParentDoesntContain(matcher) => parent.is_some_and(|folder| !matcher.matches(folder)),
        }
    }

    /// The string this condition is indexed under.
    pub fn decision_tree_input(&self) -> String {
        match self {
            Self::Name(pattern) | Self::Ext(pattern) | Self::FullName(pattern) => {
                pattern_key(pattern)
            }
            Self::HierarchyContains(HierarchyPredicate::FolderWithName(pattern)) => pattern_key(pattern),
            Self::ParentContains(matcher) | Self::ParentDoesntContain(matcher) => {
                matcher.decision_tree_input()
            }
        }
    }

    /// The file attribute this condition tests, for conditions that only look
    /// at the file itself.
    pub fn attribute(&self) -> Option<KeyAttribute> {
        match self {
            Self::Name(_) => Some(KeyAttribute::Name),
            Self::Ext(_) => Some(KeyAttribute::Ext),
            Self::FullName(_) => Some(KeyAttribute::FullName),
            Self::HierarchyContains(_) | Self::ParentContains(_) | Self::ParentDoesntContain(_) => None,
        }
    }

    pub fn is_context_dependent(&self) -> bool {
        self.attribute().is_none()
    }

    fn case_name(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Ext(_) => "ext",
            Self::FullName(_) => "fullName",
            Self::HierarchyContains(_) => "hierarchyContains",
            Self::ParentContains(_) => "parentContains",
            Self::ParentDoesntContain(_) => "parentDoesntContain",
        }
    }
}

fn pattern_key(pattern: &StringPattern) -> String {
    match pattern {
        StringPattern::Matching(value) => value.clone(),
    }
}

impl DictionaryRepresentable for FileCondition {
    fn to_dictionary(&self) -> Dictionary {
        let mut dictionary = tagged(self.case_name());
        let (key, payload) = match self {
            Self::Name(pattern) | Self::Ext(pattern) | Self::FullName(pattern) => {
                ("pattern", pattern.to_dictionary())
            }
            Self::HierarchyContains(predicate) => ("predicate", predicate.to_dictionary()),
            Self::ParentContains(matcher) | Self::ParentDoesntContain(matcher) => {
                ("matcher", matcher.to_dictionary())
            }
        };
        dictionary.insert(key.to_string(), Value::Object(payload));
        dictionary
    }

    fn from_dictionary(dictionary: &Dictionary) -> Result<Self, DecodeError> {
        let pattern = || -> Result<StringPattern, DecodeError> {
            StringPattern::from_dictionary(required_dictionary(dictionary, "pattern")?)
        };
        let matcher = || -> Result<FolderContentsMatcher, DecodeError> {
            FolderContentsMatcher::from_dictionary(required_dictionary(dictionary, "matcher")?)
        };

        match discriminator(dictionary)? {
            "name" => Ok(Self::Name(pattern()?)),
            "ext" => Ok(Self::Ext(pattern()?)),
            "fullName" => Ok(Self::FullName(pattern()?)),
            "hierarchyContains" => Ok(Self::HierarchyContains(HierarchyPredicate::from_dictionary(
                required_dictionary(dictionary, "predicate")?,
            )?)),
            "parentContains" => Ok(Self::ParentContains(matcher()?)),
            "parentDoesntContain" => Ok(Self::ParentDoesntContain(matcher()?)),
            other => Err(DecodeError::unknown("condition case", other)),
        }
    }
}
