use std::collections::HashMap;
use topdrawer_types::KeyAttribute;
use crate::key::DecisionKey;

/// Two-level index: file attribute, then normalized key, then the indices of
/// the rules filed there in registration order.
///
/// Rules whose conditions all depend on folder context have no key; they are
/// kept aside and offered as candidates for every file.
#[derive(Debug, Default)]
pub struct DecisionTree {
    branches: HashMap<KeyAttribute, HashMap<String, Vec<usize>>>,
    unkeyed: Vec<usize>,
}

impl DecisionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indices must be inserted in increasing order for buckets to stay sorted.
    pub fn insert(&mut self, key: DecisionKey, rule_index: usize) {
        self.branches
            .entry(key.attribute)
            .or_default()
            .entry(key.value)
            .or_default()
            .push(rule_index);
    }

    pub fn insert_unkeyed(&mut self, rule_index: usize) {
        self.unkeyed.push(rule_index);
    }

    pub fn unkeyed(&self) -> &[usize] {
        &self.unkeyed
    }

    pub fn bucket(&self, key: &DecisionKey) -> &[usize] {
        self.branches
            .get(&key.attribute)
            .and_then(|branch| branch.get(&key.value))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Rule indices filed under any of `keys`, plus every unkeyed rule,
    /// ascending and without repeats.
    pub fn candidates<'a, I>(&self, keys: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a DecisionKey>,
    {
        let mut candidates: Vec<usize> = keys
            .into_iter()
            .flat_map(|key| self.bucket(key).iter().copied())
            .chain(self.unkeyed.iter().copied())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();
        candidates
    }

    pub fn bucket_count(&self) -> usize {
        self.branches.values().map(HashMap::len).sum()
    }
}
