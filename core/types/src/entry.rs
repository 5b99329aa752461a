use std::path::Path;
use serde::{Deserialize, Serialize};

/// A file as seen by the rule engine: name and extension already split.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub ext: String,
    pub path: String,
}

impl File {
    pub fn new<N, E, P>(name: N, ext: E, path: P) -> Self
    where
        N: Into<String>,
        E: Into<String>,
        P: Into<String>,
    {
        Self {
            name: name.into(),
            ext: ext.into(),
            path: path.into(),
        }
    }

    /// Splits the final path component into name and extension.
    /// Dotfiles such as `.bashrc` keep their whole name and get no extension,
    /// and so does a name ending in a dot (`notes.`), so that `full_name`
    /// reproduces the component.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = if ext.is_empty() {
            path.file_name()
        } else {
            path.file_stem()
        }
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

        Self {
            name,
            ext,
            path: path.to_string_lossy().into_owned(),
        }
    }

    pub fn full_name(&self) -> String {
        if self.ext.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.name, self.ext)
        }
    }
}

/// A directory snapshot. Only the direct children are ever consulted by
/// folder-contents matchers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub path: String,
    pub files: Vec<File>,
    pub folders: Vec<Folder>,
}

impl Folder {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, path: P) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            files: Vec::new(),
            folders: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: File) -> Self {
        self.files.push(file);
        self
    }

    pub fn with_folder(mut self, folder: Folder) -> Self {
        self.folders.push(folder);
        self
    }

    /// Builds an unnamed folder holding files like `"dog.png"`.
    pub fn from_file_names(file_names: &[&str]) -> Self {
        file_names.iter().fold(Self::default(), |folder, file_name| {
            folder.with_file(File::from_path(Path::new(file_name)))
        })
    }

    /// Builds an unnamed folder holding empty subfolders with the given names.
    pub fn from_folder_names(folder_names: &[&str]) -> Self {
        folder_names.iter().fold(Self::default(), |folder, name| {
            folder.with_folder(Folder::new(*name, *name))
        })
    }

    pub fn contains_file(&self, predicate: impl Fn(&File) -> bool) -> bool {
        self.files.iter().any(predicate)
    }

    pub fn contains_folder_named(&self, name: &str) -> bool {
        self.folders.iter().any(|folder| folder.name == name)
    }

    /// Number of files in this folder and everything below it.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.folders.iter().map(Folder::file_count).sum::<usize>()
    }
}
