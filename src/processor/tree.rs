//! Folder-tree builder.

use crate::config::DuplicatePolicy;
use crate::model::{Entry, FolderNode, Warning, WarningKind};

pub struct TreeBuilder {
    root: FolderNode,
    duplicates: DuplicatePolicy,
    warnings: Vec<Warning>,
}

impl TreeBuilder {
    pub fn new(duplicates: DuplicatePolicy) -> Self {
        Self {
            root: FolderNode::default(),
            duplicates,
            warnings: Vec::new(),
        }
    }

    /// Append `entry` to the folder named by its path, creating folders on
    /// the way. Segment matching is exact and case-sensitive.
    pub fn insert(&mut self, mut entry: Entry) {
        let mut node = &mut self.root;
        for seg in &entry.folder_path {
            let idx = match node.children.iter().position(|c| &c.name == seg) {
                Some(idx) => idx,
                None => {
                    node.children.push(FolderNode::named(seg.clone()));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }

        if node.entries.iter().any(|e| e.name == entry.name) {
            match self.duplicates {
                DuplicatePolicy::Warn => self.warnings.push(Warning::new(
                    entry.line,
                    WarningKind::DuplicateName {
                        name: entry.name.clone(),
                        folder: entry.folder_path.join("/"),
                    },
                )),
                DuplicatePolicy::Rename => {
                    let renamed = (2..)
                        .map(|n| format!("{} ({n})", entry.name))
                        .find(|candidate| node.entries.iter().all(|e| &e.name != candidate))
                        .unwrap_or_default();
                    self.warnings.push(Warning::new(
                        entry.line,
                        WarningKind::Renamed {
                            from: entry.name.clone(),
                            to: renamed.clone(),
                        },
                    ));
                    entry.name = renamed;
                }
            }
        }

        node.entries.push(entry);
    }

    /// Finish the tree, optionally sorting every folder by name.
    pub fn finish(mut self, sort: bool) -> (FolderNode, Vec<Warning>) {
        if sort {
            sort_folder(&mut self.root);
        }
        (self.root, self.warnings)
    }
}

/// Sort entries and child folders of `node` and all its descendants.
/// Stable, so equal names keep their declaration order.
fn sort_folder(node: &mut FolderNode) {
    node.entries.sort_by(|a, b| a.name.cmp(&b.name));
    node.children.sort_by(|a, b| a.name.cmp(&b.name));
    node.children.iter_mut().for_each(sort_folder);
}
