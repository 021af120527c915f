//! Ordered revision chain
//!
//! Built once from an unordered set of revisions; every structural problem
//! (duplicates, dangling parents, branches, cycles) is rejected here, before
//! any database work happens.

use std::collections::{HashMap, HashSet};
use std::fmt;

use super::{Migration, MigrationError};

/// Revisions ordered root → head
pub struct MigrationChain {
    revisions: Vec<Box<dyn Migration>>,
}

impl MigrationChain {
    /// Validate and order `revisions`.
    pub fn new(revisions: Vec<Box<dyn Migration>>) -> Result<Self, MigrationError> {
        if revisions.is_empty() {
            return Err(MigrationError::EmptyChain);
        }

        let mut by_id: HashMap<&'static str, Box<dyn Migration>> = HashMap::new();
        for migration in revisions {
            let id = migration.revision();
            if by_id.insert(id, migration).is_some() {
                return Err(MigrationError::DuplicateRevision(id.to_string()));
            }
        }

        for migration in by_id.values() {
            if let Some(parent) = migration.down_revision() {
                if !by_id.contains_key(parent) {
                    return Err(MigrationError::UnknownParent {
                        revision: migration.revision().to_string(),
                        parent: parent.to_string(),
                    });
                }
            }
        }

        let parents: HashSet<&'static str> =
            by_id.values().filter_map(|m| m.down_revision()).collect();
        let mut heads: Vec<&'static str> = by_id
            .keys()
            .copied()
            .filter(|id| !parents.contains(id))
            .collect();
        heads.sort_unstable();

        let head = match heads.as_slice() {
            [head] => *head,
            // No head at all means every revision has a child: a cycle.
            [] => return Err(unreachable(by_id.keys().copied())),
            _ => {
                return Err(MigrationError::MultipleHeads(
                    heads.iter().map(|h| h.to_string()).collect(),
                ))
            }
        };

        // Walk head → root; a single head with no branches reaches everything.
        let mut ordered = Vec::with_capacity(by_id.len());
        let mut cursor = Some(head);
        while let Some(id) = cursor {
            let Some(migration) = by_id.remove(id) else {
                // Already taken: the walk looped back and never reaches a root.
                return Err(MigrationError::Cycle(id.to_string()));
            };
            cursor = migration.down_revision();
            ordered.push(migration);
        }

        if !by_id.is_empty() {
            return Err(unreachable(by_id.keys().copied()));
        }

        ordered.reverse();
        Ok(Self { revisions: ordered })
    }

    /// Latest revision
    pub fn head(&self) -> &dyn Migration {
        // `new` guarantees at least one revision.
        self.revisions[self.revisions.len() - 1].as_ref()
    }

    /// Revisions without children. Always exactly one for a built chain.
    pub fn heads(&self) -> Vec<&'static str> {
        vec![self.head().revision()]
    }

    pub fn root(&self) -> &dyn Migration {
        self.revisions[0].as_ref()
    }

    /// Index of `revision` in root → head order.
    pub fn position(&self, revision: &str) -> Option<usize> {
        self.revisions.iter().position(|m| m.revision() == revision)
    }

    pub fn get(&self, index: usize) -> Option<&dyn Migration> {
        self.revisions.get(index).map(|m| m.as_ref())
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &dyn Migration> {
        self.revisions.iter().map(|m| m.as_ref())
    }

    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }
}

impl fmt::Debug for MigrationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.revisions.iter().map(|m| m.revision()))
            .finish()
    }
}

fn unreachable(ids: impl Iterator<Item = &'static str>) -> MigrationError {
    let mut ids: Vec<String> = ids.map(str::to_string).collect();
    ids.sort();
    MigrationError::Unreachable(ids)
}
