use std::sync::{Arc, RwLock};
use serde::Serialize;
use tracing::{debug, info, warn};
use topdrawer_types::{File, Folder, HierarchyInformation, IndexBuildError, KeyNormalization, Rule};

use crate::key::DecisionKeyExtractor;
use crate::tree::DecisionTree;

/// An indexed, read-only rule set.
///
/// Rules are filed in a [`DecisionTree`] under the key of their first
/// file-attribute condition. A query only evaluates the rules filed under the
/// file's name, extension or full name, plus the rules made only of folder
/// conditions, and confirms each with full matching (the key is a filter:
/// different condition kinds can share a string).
pub struct ClassificationEngine<P> {
    rules: Vec<Rule<P>>,
    tree: DecisionTree,
    extractor: DecisionKeyExtractor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub rules: usize,
    pub buckets: usize,
    pub context_dependent_rules: usize,
    pub unkeyed_rules: usize,
}

impl<P> ClassificationEngine<P> {
    /// Disabled rules are dropped. An enabled rule without conditions fails
    /// the whole build.
    pub fn new(rules: Vec<Rule<P>>, normalization: KeyNormalization) -> Result<Self, IndexBuildError> {
        let extractor = DecisionKeyExtractor::new(normalization);
        let mut tree = DecisionTree::new();
        let mut indexed = Vec::with_capacity(rules.len());

        for (index, rule) in rules.into_iter().enumerate() {
            if !rule.enabled {
                debug!("Skipping disabled rule {}", rule.display_name());
                continue;
            }

            if rule.conditions.is_empty() {
                return Err(IndexBuildError::EmptyRule {
                    index,
                    label: rule.display_name(),
                });
            }

            match extractor.primary_key(&rule.conditions) {
                Some(key) => {
                    debug!(
                        "Indexing rule {} under {:?} '{}'",
                        rule.display_name(),
                        key.attribute,
                        key.value
                    );
                    tree.insert(key, indexed.len());
                }
                None => {
                    debug!("Rule {} only has folder conditions, checked for every file", rule.display_name());
                    tree.insert_unkeyed(indexed.len());
                }
            }
            indexed.push(rule);
        }

        info!(
            "Built decision tree: {} rules in {} buckets, {} unkeyed",
            indexed.len(),
            tree.bucket_count(),
            tree.unkeyed().len()
        );

        Ok(Self {
            rules: indexed,
            tree,
            extractor,
        })
    }

    /// Every rule matching the file, in registration order.
    pub fn classify(
        &self,
        file: &File,
        hierarchy: &HierarchyInformation,
        parent: Option<&Folder>,
    ) -> Vec<&Rule<P>> {
        let keys = self.extractor.query_keys(file);

        self.tree
            .candidates(&keys)
            .into_iter()
            .map(|index| &self.rules[index])
            .filter(|rule| rule.matches(file, hierarchy, parent))
            .collect()
    }

    /// The earliest registered rule matching the file.
    pub fn first_match(
        &self,
        file: &File,
        hierarchy: &HierarchyInformation,
        parent: Option<&Folder>,
    ) -> Option<&Rule<P>> {
        let keys = self.extractor.query_keys(file);

        self.tree
            .candidates(&keys)
            .into_iter()
            .map(|index| &self.rules[index])
            .find(|rule| rule.matches(file, hierarchy, parent))
    }

    pub fn rules(&self) -> &[Rule<P>] {
        &self.rules
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            rules: self.rules.len(),
            buckets: self.tree.bucket_count(),
            context_dependent_rules: self
                .rules
                .iter()
                .filter(|rule| rule.conditions.iter().any(|c| c.is_context_dependent()))
                .count(),
            unkeyed_rules: self.tree.unkeyed().len(),
        }
    }
}

/// A published engine that can be replaced while other threads query it.
///
/// Readers take an `Arc` snapshot and keep using it; a rebuild constructs the
/// new engine first and then swaps the reference, so nobody ever sees a half
/// built tree.
pub struct SharedEngine<P> {
    current: RwLock<Arc<ClassificationEngine<P>>>,
}

impl<P> SharedEngine<P> {
    pub fn new(engine: ClassificationEngine<P>) -> Self {
        Self {
            current: RwLock::new(Arc::new(engine)),
        }
    }

    pub fn snapshot(&self) -> Arc<ClassificationEngine<P>> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    /// On error the previously published engine stays in place.
    pub fn rebuild(&self, rules: Vec<Rule<P>>, normalization: KeyNormalization) -> Result<(), IndexBuildError> {
        let engine = Arc::new(ClassificationEngine::new(rules, normalization).map_err(|e| {
            warn!("Rule set rejected, keeping previous engine: {}", e);
            e
        })?);

        match self.current.write() {
            Ok(mut guard) => *guard = engine,
            Err(poisoned) => *poisoned.into_inner() = engine,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use topdrawer_types::{FileCondition, FolderContentsMatcher, HierarchyPredicate, StringPattern};

    fn ext(value: &str) -> FileCondition {
        FileCondition::Ext(StringPattern::matching(value))
    }

    fn name(value: &str) -> FileCondition {
        FileCondition::Name(StringPattern::matching(value))
    }

    fn in_folder(value: &str) -> FileCondition {
        FileCondition::HierarchyContains(HierarchyPredicate::folder_with_name(StringPattern::matching(value)))
    }

    fn engine(rules: Vec<Rule<&'static str>>) -> ClassificationEngine<&'static str> {
        ClassificationEngine::new(rules, KeyNormalization::default()).unwrap()
    }

    fn payloads<'a>(rules: Vec<&'a Rule<&'static str>>) -> Vec<&'static str> {
        rules.into_iter().map(|r| r.payload).collect()
    }

    #[test]
    fn test_classify_returns_matches_in_registration_order() {
        let engine = engine(vec![
            Rule::new(vec![ext("png")], "image"),
            Rule::new(vec![name("dog")], "dog"),
            Rule::new(vec![ext("gif")], "animation"),
            Rule::new(vec![FileCondition::FullName(StringPattern::matching("dog.png"))], "dog picture"),
        ]);
        let file = File::new("dog", "png", "animals/dog.png");

        let matches = engine.classify(&file, &HierarchyInformation::new(), None);
        assert_eq!(payloads(matches), vec!["image", "dog", "dog picture"]);
    }

    #[test]
    fn test_shared_key_across_condition_kinds_is_filtered() {
        let engine = engine(vec![
            Rule::new(vec![name("png")], "named png"),
            Rule::new(vec![ext("png")], "png"),
        ]);
        let file = File::new("dog", "png", "dog.png");

        let matches = engine.classify(&file, &HierarchyInformation::new(), None);
        assert_eq!(payloads(matches), vec!["png"]);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let engine = engine(vec![Rule::new(vec![ext("png")], "image")]);
        let file = File::new("notes", "txt", "notes.txt");

        assert!(engine.classify(&file, &HierarchyInformation::new(), None).is_empty());
        assert!(engine.first_match(&file, &HierarchyInformation::new(), None).is_none());
    }

    #[test]
    fn test_context_conditions_filter_after_key_lookup() {
        let engine = engine(vec![
            Rule::new(vec![ext("png"), in_folder("Photos")], "photo"),
            Rule::new(
                vec![
                    ext("png"),
                    FileCondition::ParentDoesntContain(FolderContentsMatcher::files_with_extension("psd")),
                ],
                "flat image",
            ),
        ]);
        let file = File::new("beach", "png", "Photos/beach.png");
        let photos = HierarchyInformation::new().adding("Photos");
        let layered = Folder::from_file_names(&["beach.png", "beach.psd"]);
        let flat = Folder::from_file_names(&["beach.png"]);

        assert_eq!(payloads(engine.classify(&file, &photos, Some(&layered))), vec!["photo"]);
        assert_eq!(
            payloads(engine.classify(&file, &photos, Some(&flat))),
            vec!["photo", "flat image"]
        );
        assert!(engine.classify(&file, &HierarchyInformation::new(), None).is_empty());
    }

    #[test]
    fn test_first_match_is_earliest_registered() {
        let engine = engine(vec![
            Rule::new(vec![name("dog")], "first"),
            Rule::new(vec![ext("png")], "second"),
        ]);
        let file = File::new("dog", "png", "dog.png");

        let rule = engine.first_match(&file, &HierarchyInformation::new(), None).unwrap();
        assert_eq!(rule.payload, "first");
    }

    #[test]
    fn test_disabled_rules_are_ignored() {
        let engine = engine(vec![
            Rule::new(vec![ext("png")], "off").disabled(),
            Rule::new(vec![ext("png")], "on"),
        ]);
        let file = File::new("dog", "png", "dog.png");

        assert_eq!(engine.rule_count(), 1);
        assert_eq!(payloads(engine.classify(&file, &HierarchyInformation::new(), None)), vec!["on"]);
    }

    #[test]
    fn test_folder_only_rules_match_any_file() {
        let engine = engine(vec![
            Rule::new(vec![ext("png")], "image"),
            Rule::new(vec![in_folder("Photos")], "anything in photos"),
            Rule::new(
                vec![FileCondition::ParentContains(FolderContentsMatcher::files_with_extension("xcodeproj"))],
                "xcode project",
            ),
        ]);
        let photos = HierarchyInformation::new().adding("Photos");
        let project = Folder::from_file_names(&["App.xcodeproj", "main.swift"]);

        let beach = File::new("beach", "png", "Photos/beach.png");
        assert_eq!(
            payloads(engine.classify(&beach, &photos, None)),
            vec!["image", "anything in photos"]
        );

        let source = File::new("main", "swift", "App/main.swift");
        assert_eq!(
            payloads(engine.classify(&source, &HierarchyInformation::new(), Some(&project))),
            vec!["xcode project"]
        );
        assert_eq!(
            payloads(engine.classify(&source, &photos, Some(&project))),
            vec!["anything in photos", "xcode project"]
        );
        assert!(engine.classify(&source, &HierarchyInformation::new(), None).is_empty());
    }

    #[test]
    fn test_empty_rule_fails_build() {
        let result = ClassificationEngine::new(
            vec![Rule::new(vec![], "nothing").with_label("empty")],
            KeyNormalization::default(),
        );

        assert!(matches!(result, Err(IndexBuildError::EmptyRule { index: 0, .. })));
    }

    #[test]
    fn test_normalized_keys_still_require_exact_match() {
        let engine = ClassificationEngine::new(
            vec![Rule::new(vec![name("README")], "readme")],
            KeyNormalization { normalize_unicode: true, normalize_case: true },
        )
        .unwrap();

        let exact = File::new("README", "md", "README.md");
        let lower = File::new("readme", "md", "readme.md");

        assert_eq!(payloads(engine.classify(&exact, &HierarchyInformation::new(), None)), vec!["readme"]);
        assert!(engine.classify(&lower, &HierarchyInformation::new(), None).is_empty());
    }

    #[test]
    fn test_stats() {
        let engine = engine(vec![
            Rule::new(vec![ext("png")], "image"),
            Rule::new(vec![ext("png"), in_folder("Photos")], "photo"),
            Rule::new(vec![name("Makefile")], "make"),
            Rule::new(vec![in_folder("Photos")], "in photos"),
        ]);

        assert_eq!(
            engine.stats(),
            EngineStats { rules: 4, buckets: 2, context_dependent_rules: 2, unkeyed_rules: 1 }
        );
    }

    #[test]
    fn test_shared_engine_swaps_on_rebuild() {
        let shared = SharedEngine::new(engine(vec![Rule::new(vec![ext("png")], "old")]));
        let file = File::new("dog", "png", "dog.png");
        let hierarchy = HierarchyInformation::new();

        let before = shared.snapshot();
        shared
            .rebuild(vec![Rule::new(vec![ext("png")], "new")], KeyNormalization::default())
            .unwrap();
        let after = shared.snapshot();

        assert_eq!(payloads(before.classify(&file, &hierarchy, None)), vec!["old"]);
        assert_eq!(payloads(after.classify(&file, &hierarchy, None)), vec!["new"]);
    }

    #[test]
    fn test_shared_engine_keeps_old_engine_on_failed_rebuild() {
        let shared = SharedEngine::new(engine(vec![Rule::new(vec![ext("png")], "old")]));

        let result = shared.rebuild(vec![Rule::new(vec![], "bad")], KeyNormalization::default());
        assert!(result.is_err());
        assert_eq!(shared.snapshot().rule_count(), 1);
        assert_eq!(shared.snapshot().rules()[0].payload, "old");
    }

    #[test]
    fn test_shared_engine_is_queryable_across_threads() {
        let shared = Arc::new(SharedEngine::new(engine(vec![Rule::new(vec![ext("png")], "image")])));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || {
                    let file = File::new(format!("file{}", i), "png", format!("file{}.png", i));
                    let engine = shared.snapshot();
                    let count = engine.classify(&file, &HierarchyInformation::new(), None).len();
                    count
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 1);
        }
    }
}
