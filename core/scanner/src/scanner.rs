use std::sync::Arc;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;
use topdrawer_matcher::ClassificationEngine;
use topdrawer_types::{File, Folder, HierarchyInformation, Rule};

/// A file together with every rule that matched it, in registration order.
#[derive(Debug)]
pub struct ClassifiedFile<'a, P> {
    pub file: &'a File,
    pub matches: Vec<&'a Rule<P>>,
}

impl<P> ClassifiedFile<'_, P> {
    pub fn is_matched(&self) -> bool {
        !self.matches.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationSummary {
    pub files: usize,
    pub matched_files: usize,
    pub rule_hits: usize,
}

/// Classifies every file of a folder snapshot.
///
/// Each subtree is classified with its own copy of the hierarchy, so sibling
/// folders never see each other. Subfolders are processed in parallel; the
/// result is always in depth-first order, files before subfolders.
pub struct TreeClassifier<P> {
    engine: Arc<ClassificationEngine<P>>,
}

impl<P: Send + Sync> TreeClassifier<P> {
    pub fn new(engine: Arc<ClassificationEngine<P>>) -> Self {
        Self { engine }
    }

    pub fn classify<'a>(&'a self, root: &'a Folder) -> Vec<ClassifiedFile<'a, P>> {
        debug!("Classifying {} files under {}", root.file_count(), root.path);
        // ルートフォルダ自体は階層に含めない
        self.classify_folder(root, HierarchyInformation::new())
    }

    fn classify_folder<'a>(
        &'a self,
        folder: &'a Folder,
        hierarchy: HierarchyInformation,
    ) -> Vec<ClassifiedFile<'a, P>> {
        let mut results: Vec<ClassifiedFile<'a, P>> = folder
            .files
            .iter()
            .map(|file| ClassifiedFile {
                file,
                matches: self.engine.classify(file, &hierarchy, Some(folder)),
            })
            .collect();

        let nested: Vec<Vec<ClassifiedFile<'a, P>>> = folder
            .folders
            .par_iter()
            .map(|child| self.classify_folder(child, hierarchy.adding(&child.name)))
            .collect();

        results.extend(nested.into_iter().flatten());
        results
    }
}

pub fn summarize<P>(results: &[ClassifiedFile<'_, P>]) -> ClassificationSummary {
    ClassificationSummary {
        files: results.len(),
        matched_files: results.iter().filter(|r| r.is_matched()).count(),
        rule_hits: results.iter().map(|r| r.matches.len()).sum(),
    }
}
