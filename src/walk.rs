//! Range-preserving walk — depth-first emission with contiguous ranges.
//!
//! Concrete nodes are numbered in the order this walk reaches them, so every
//! subtree's concrete nodes form one unbroken run. For each node the walk
//! tracks the first and last concrete node of that run:
//!
//! ```text
//! Root (abstract)
//! ├── A            → A..A
//! └── B (abstract) → C..D
//!     ├── C
//!     └── D
//! Root             → A..D
//! ```
//!
//! A downstream `isa` check then reduces to `first <= kind && kind <= last`.

use crate::hierarchy::{Hierarchy, HierarchyError};
use crate::record::RecordId;
use crate::traits::NodeVisitor;

/// First and last concrete node below (or at) a node, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRange {
    pub first: RecordId,
    pub last: RecordId,
}

/// Walks a [`Hierarchy`] from its root, reporting to a [`NodeVisitor`].
#[derive(Debug, Clone, Copy)]
pub struct RangeWalker<'h, 'r> {
    hierarchy: &'h Hierarchy<'r>,
}

impl<'h, 'r> RangeWalker<'h, 'r> {
    pub fn new(hierarchy: &'h Hierarchy<'r>) -> Self {
        Self { hierarchy }
    }

    /// Walk the whole hierarchy and return the root's range.
    ///
    /// # Errors
    ///
    /// [`HierarchyError::EmptyAbstractSubtree`] for an abstract node with no
    /// children. The visitor may already have seen part of the walk; callers
    /// that render output must discard it on error.
    pub fn walk<V: NodeVisitor>(&self, visitor: &mut V) -> Result<NodeRange, HierarchyError> {
        self.walk_node(self.hierarchy.root(), visitor)
    }

    fn walk_node<V: NodeVisitor>(
        &self,
        node: RecordId,
        visitor: &mut V,
    ) -> Result<NodeRange, HierarchyError> {
        let record = self.hierarchy.records().record(node);

        let (mut first, mut last) = if record.is_abstract() {
            (None, None)
        } else {
            (Some(node), Some(node))
        };

        let children = self.hierarchy.children_of(node);
        for &child in children {
            visitor.enter(child, node);

            let range = self.walk_node(child, visitor)?;
            if first.is_none() {
                first = Some(range.first);
            }
            last = Some(range.last);

            visitor.leave(child, range);
        }

        // No first node means an abstract node without children.
        let (Some(first), Some(last)) = (first, last) else {
            return Err(HierarchyError::EmptyAbstractSubtree {
                hierarchy: self.hierarchy.name().to_string(),
                name: record.name().to_string(),
                loc: record.loc().clone(),
            });
        };
        let range = NodeRange { first, last };

        if !children.is_empty() {
            visitor.range(node, range, self.hierarchy.is_root(node));
        }

        Ok(range)
    }
}
