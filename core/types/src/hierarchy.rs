use serde::{Deserialize, Serialize};

/// Names of the folders between the classification root and a file.
///
/// Kept in path order, but membership is all that matters to conditions.
/// Every branch of a tree walk owns its own copy, so siblings never see each
/// other's folders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HierarchyInformation {
    folder_names: Vec<String>,
}

impl HierarchyInformation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<S: Into<String>>(&mut self, folder_name: S) {
        self.folder_names.push(folder_name.into());
    }

    /// Copy of this hierarchy one level deeper.
    pub fn adding<S: Into<String>>(&self, folder_name: S) -> Self {
        let mut deeper = self.clone();
        deeper.add(folder_name);
        deeper
    }

    pub fn contains(&self, folder_name: &str) -> bool {
        self.folder_names.iter().any(|name| name == folder_name)
    }

    pub fn folder_names(&self) -> impl Iterator<Item = &str> {
        self.folder_names.iter().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.folder_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folder_names.is_empty()
    }
}
