use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dictionary::{discriminator, required_str, tagged, Dictionary, DictionaryRepresentable};
use crate::entry::Folder;
use crate::error::DecodeError;

/// A predicate over the direct children of a folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FolderContentsMatcher {
    FilesWithExtension(String),
    FilesWithNameAndExtension { name: String, ext: String },
    FoldersWithName(String),
}

impl FolderContentsMatcher {
    pub fn files_with_extension<S: Into<String>>(ext: S) -> Self {
        Self::FilesWithExtension(ext.into())
    }

    pub fn files_with_name_and_extension<N: Into<String>, E: Into<String>>(name: N, ext: E) -> Self {
        Self::FilesWithNameAndExtension {
            name: name.into(),
            ext: ext.into(),
        }
    }

    pub fn folders_with_name<S: Into<String>>(name: S) -> Self {
        Self::FoldersWithName(name.into())
    }

    pub fn matches(&self, directory: &Folder) -> bool {
        match self {
            Self::FilesWithExtension(ext) => directory.contains_file(|f| &f.ext == ext),
            // 同一ファイルで名前と拡張子の両方が一致する必要がある
            Self::FilesWithNameAndExtension { name, ext } => {
                directory.contains_file(|f| &f.name == name && &f.ext == ext)
            }
            Self::FoldersWithName(name) => directory.contains_folder_named(name),
        }
    }

    pub fn decision_tree_input(&self) -> String {
        match self {
            Self::FilesWithExtension(ext) => ext.clone(),
            Self::FilesWithNameAndExtension { name, ext } => format!("{}.{}", name, ext),
            Self::FoldersWithName(name) => name.clone(),
        }
    }
}

impl DictionaryRepresentable for FolderContentsMatcher {
    fn to_dictionary(&self) -> Dictionary {
        match self {
            Self::FilesWithExtension(ext) => {
                let mut dictionary = tagged("filesWithExtension");
                dictionary.insert("ext".to_string(), Value::String(ext.clone()));
                dictionary
            }
            Self::FilesWithNameAndExtension { name, ext } => {
                let mut dictionary = tagged("filesWithNameAndExtension");
                dictionary.insert("name".to_string(), Value::String(name.clone()));
                dictionary.insert("ext".to_string(), Value::String(ext.clone()));
                dictionary
            }
            Self::FoldersWithName(name) => {
                let mut dictionary = tagged("foldersWithName");
                dictionary.insert("name".to_string(), Value::String(name.clone()));
                dictionary
            }
        }
    }

    fn from_dictionary(dictionary: &Dictionary) -> Result<Self, DecodeError> {
        match discriminator(dictionary)? {
            "filesWithExtension" => Ok(Self::files_with_extension(required_str(dictionary, "ext")?)),
            "filesWithNameAndExtension" => Ok(Self::files_with_name_and_extension(
                required_str(dictionary, "name")?,
                required_str(dictionary, "ext")?,
            )),
            "foldersWithName" => Ok(Self::folders_with_name(required_str(dictionary, "name")?)),
            other => Err(DecodeError::unknown("folder matcher case", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_files_with_extension() {
        let folder = Folder::from_file_names(&["dog.png"]);

        assert!(FolderContentsMatcher::files_with_extension("png").matches(&folder));
        assert!(!FolderContentsMatcher::files_with_extension("gif").matches(&folder));
    }

    #[test]
    fn test_matches_files_with_name_and_extension() {
        let folder = Folder::from_file_names(&["dog.png"]);
        let matcher = FolderContentsMatcher::files_with_name_and_extension("dog", "png");

        assert!(matcher.matches(&folder));
    }

    #[test]
    fn test_name_and_extension_must_come_from_same_file() {
        let folder = Folder::from_file_names(&["dog.gif", "cat.png"]);
        let matcher = FolderContentsMatcher::files_with_name_and_extension("dog", "png");

        assert!(!matcher.matches(&folder));
    }

    #[test]
    fn test_matches_folders_with_name() {
        let folder = Folder::from_folder_names(&["animals"]);

        assert!(FolderContentsMatcher::folders_with_name("animals").matches(&folder));
        assert!(!FolderContentsMatcher::folders_with_name("no animals here").matches(&folder));
    }

    #[test]
    fn test_folders_with_name_ignores_files() {
        let folder = Folder::from_file_names(&["animals"]);
        assert!(!FolderContentsMatcher::folders_with_name("animals").matches(&folder));
    }

    #[test]
    fn test_empty_folder_matches_nothing() {
        let folder = Folder::default();

        assert!(!FolderContentsMatcher::files_with_extension("png").matches(&folder));
        assert!(!FolderContentsMatcher::folders_with_name("animals").matches(&folder));
    }

    #[test]
    fn test_equality() {
        let png = FolderContentsMatcher::files_with_extension("png");

        assert_eq!(png, FolderContentsMatcher::files_with_extension("png"));
        assert_ne!(png, FolderContentsMatcher::files_with_extension("pdf"));
        assert_ne!(png, FolderContentsMatcher::folders_with_name("png"));

        let dog_png = FolderContentsMatcher::files_with_name_and_extension("dog", "png");
        assert_eq!(dog_png, FolderContentsMatcher::files_with_name_and_extension("dog", "png"));
        assert_ne!(dog_png, FolderContentsMatcher::files_with_name_and_extension("cat", "png"));
        assert_ne!(dog_png, FolderContentsMatcher::files_with_name_and_extension("dog", "pdf"));
    }

    #[test]
    fn test_to_dictionary_and_back() {
        let matchers = [
            FolderContentsMatcher::files_with_extension("pdf"),
            FolderContentsMatcher::files_with_name_and_extension("dog", "png"),
            FolderContentsMatcher::folders_with_name("animals"),
        ];

        for matcher in matchers {
            assert_eq!(matcher.converted_to_dictionary_and_back().unwrap(), matcher);
        }
    }

    #[test]
    fn test_from_dictionary_missing_key() {
        let dictionary = tagged("filesWithNameAndExtension");
        let result = FolderContentsMatcher::from_dictionary(&dictionary);

        assert_eq!(result, Err(DecodeError::missing("name")));
    }

    #[test]
    fn test_unknown_case_is_rejected() {
        let mut dictionary = tagged("filesWithSize");
        dictionary.insert("size".to_string(), Value::from(1024));

        let result = FolderContentsMatcher::from_dictionary(&dictionary);
        assert_eq!(
            result,
            Err(DecodeError::unknown("folder matcher case", "filesWithSize"))
        );
    }
}
