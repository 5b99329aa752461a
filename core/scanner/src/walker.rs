use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};
use topdrawer_types::{File, Folder, ScanOptions, TopDrawerError};

/// Reads a directory tree into a [`Folder`] snapshot.
pub struct DirectoryWalker {
    options: ScanOptions,
}

impl DirectoryWalker {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn walk(&self, root: &Path) -> Result<Folder, TopDrawerError> {
        debug!("Walking directory: {}", root.display());

        if !root.exists() {
            return Err(TopDrawerError::PathNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(TopDrawerError::Scan {
                path: root.to_path_buf(),
                message: "not a directory".to_string(),
            });
        }

        let mut walker = WalkDir::new(root)
            .follow_links(self.options.follow_links)
            .sort_by_file_name();
        if let Some(depth) = self.options.max_depth {
            walker = walker.max_depth(depth as usize);
        }

        // 深さ優先: スタックの各要素は構築中のフォルダ
        let mut stack: Vec<Folder> = Vec::new();

        for entry in walker.into_iter().filter_entry(|e| e.depth() == 0 || self.is_included(e)) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to access path: {}", e);
                    continue;
                }
            };

            let depth = entry.depth();
            while stack.len() > depth {
                close_folder(&mut stack);
            }

            if entry.file_type().is_dir() {
                stack.push(Folder::new(
                    entry.file_name().to_string_lossy(),
                    entry.path().to_string_lossy(),
                ));
            } else if let Some(parent) = stack.last_mut() {
                parent.files.push(File::from_path(entry.path()));
            }
        }

        while stack.len() > 1 {
            close_folder(&mut stack);
        }

        stack.pop().ok_or_else(|| TopDrawerError::Scan {
            path: root.to_path_buf(),
            message: "root directory could not be read".to_string(),
        })
    }

    fn is_included(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();

        if !self.options.include_hidden && name.starts_with('.') {
            return false;
        }

        if entry.file_type().is_dir() && self.options.excluded_names.iter().any(|n| *n == name) {
            debug!("Skipping excluded folder: {}", entry.path().display());
            return false;
        }

        true
    }
}

fn close_folder(stack: &mut Vec<Folder>) {
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.folders.push(done);
        }
    }
}
