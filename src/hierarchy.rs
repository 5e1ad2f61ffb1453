//! Hierarchy index — reconstructs the child tree of one node class.
//!
//! Only the base reference lives on a record. The parent → children map is
//! derived here, once per run, from the flat list of records selected for a
//! hierarchy (e.g. every record deriving from `StmtNode`).

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::record::{RecordId, RecordKeeper, SourceLoc};

/// Parent → children multi-map plus the unique root of a hierarchy.
#[derive(Debug)]
pub struct Hierarchy<'r> {
    records: &'r RecordKeeper,
    name: String,
    root: RecordId,
    /// Children per base, in record definition order.
    children: HashMap<RecordId, Vec<RecordId>>,
}

impl<'r> Hierarchy<'r> {
    /// Index `nodes` by base.
    ///
    /// `name` is the node class the nodes were selected by; it only shows up
    /// in diagnostics.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::NullRecord`] if a handle is not in `records`
    /// - [`HierarchyError::AmbiguousRoot`] if two nodes have no base
    /// - [`HierarchyError::MissingRoot`] if no node lacks a base
    pub fn build(
        records: &'r RecordKeeper,
        nodes: &[RecordId],
        name: impl Into<String>,
    ) -> Result<Self, HierarchyError> {
        let name = name.into();
        let members: HashSet<RecordId> = nodes.iter().copied().collect();

        let mut children: HashMap<RecordId, Vec<RecordId>> = HashMap::new();
        let mut root: Option<RecordId> = None;

        for &id in nodes {
            let Some(record) = records.get(id) else {
                return Err(HierarchyError::NullRecord {
                    hierarchy: name,
                    index: id.index(),
                });
            };

            match record.base() {
                Some(base) => {
                    if !members.contains(&base) {
                        tracing::warn!(
                            hierarchy = %name,
                            node = record.name(),
                            base = records.get(base).map(|b| b.name()).unwrap_or("?"),
                            "base is outside the hierarchy; subtree will not be emitted"
                        );
                    }
                    children.entry(base).or_default().push(id);
                }
                None => {
                    if let Some(previous) = root {
                        return Err(HierarchyError::AmbiguousRoot {
                            hierarchy: name,
                            name: record.name().to_string(),
                            previous: records.record(previous).name().to_string(),
                            loc: record.loc().clone(),
                        });
                    }
                    root = Some(id);
                }
            }
        }

        let Some(root) = root else {
            return Err(HierarchyError::MissingRoot { hierarchy: name });
        };

        tracing::debug!(
            hierarchy = %name,
            nodes = nodes.len(),
            root = records.record(root).name(),
            "derived child tree"
        );

        Ok(Self {
            records,
            name,
            root,
            children,
        })
    }

    #[inline]
    pub fn root(&self) -> RecordId {
        self.root
    }

    #[inline]
    pub fn is_root(&self, id: RecordId) -> bool {
        id == self.root
    }

    /// Direct children of `id`, in definition order. Empty for leaves.
    pub fn children_of(&self, id: RecordId) -> &[RecordId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_children(&self, id: RecordId) -> bool {
        !self.children_of(id).is_empty()
    }

    /// Node class name this hierarchy was built for.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &'r RecordKeeper {
        self.records
    }
}

/// Fatal configuration errors in a node hierarchy.
#[derive(Debug, Error)]
pub enum HierarchyError {
    #[error("didn't find root node in \"{hierarchy}\" hierarchy")]
    MissingRoot { hierarchy: String },

    #[error(
        "{loc}: multiple root nodes in \"{hierarchy}\" hierarchy: '{name}' (already have '{previous}')"
    )]
    AmbiguousRoot {
        hierarchy: String,
        name: String,
        previous: String,
        loc: SourceLoc,
    },

    #[error("{loc}: abstract node '{name}' has no children in \"{hierarchy}\" hierarchy")]
    EmptyAbstractSubtree {
        hierarchy: String,
        name: String,
        loc: SourceLoc,
    },

    #[error("got null record #{index} in \"{hierarchy}\" hierarchy")]
    NullRecord { hierarchy: String, index: usize },
}
