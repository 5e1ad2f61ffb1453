//! Kind numbering — dense ids for concrete nodes with O(1) `isa` checks.
//!
//! Concrete nodes are numbered in the order the range-preserving walk emits
//! them. Because every subtree's concrete nodes are contiguous in that order,
//! "is `node` an `ancestor`?" is two integer comparisons:
//!
//! ```text
//! Root (abstract)        range 0..=2
//! ├── A           kind 0 range 0..=0
//! └── B (abstract)       range 1..=2
//!     ├── C       kind 1 range 1..=1
//!     └── D       kind 2 range 2..=2
//! ```

use std::collections::HashMap;

use crate::hierarchy::{Hierarchy, HierarchyError};
use crate::record::RecordId;
use crate::traits::NodeVisitor;
use crate::walk::{NodeRange, RangeWalker};
use crate::NodeKind;

/// Inclusive range of kinds covered by a node's subtree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KindRange {
    pub first: NodeKind,
    pub last: NodeKind,
}

impl KindRange {
    /// The `classof` fast path.
    #[inline]
    pub const fn contains(self, kind: NodeKind) -> bool {
        self.first <= kind && kind <= self.last
    }

    /// Number of concrete kinds in the range.
    #[inline]
    pub const fn len(self) -> usize {
        (self.last - self.first) as usize + 1
    }
}

/// Kind assignment for one hierarchy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeKinds {
    kinds: HashMap<RecordId, NodeKind>,
    ranges: HashMap<RecordId, KindRange>,
    /// Concrete nodes by kind.
    order: Vec<RecordId>,
}

impl NodeKinds {
    /// Number every concrete node reachable from the root.
    ///
    /// # Errors
    ///
    /// Same as [`RangeWalker::walk`].
    pub fn assign(hierarchy: &Hierarchy<'_>) -> Result<Self, HierarchyError> {
        let records = hierarchy.records();
        let mut numbering = Numbering {
            is_concrete: |id: RecordId| !records.record(id).is_abstract(),
            kinds: Self::default(),
        };

        let root = hierarchy.root();
        if (numbering.is_concrete)(root) {
            numbering.kinds.push(root);
        }

        let range = RangeWalker::new(hierarchy).walk(&mut numbering)?;
        let mut kinds = numbering.kinds;
        kinds.record_range(root, range);

        tracing::debug!(
            hierarchy = hierarchy.name(),
            kinds = kinds.len(),
            "assigned node kinds"
        );

        Ok(kinds)
    }

    #[inline]
    pub fn kind_of(&self, id: RecordId) -> Option<NodeKind> {
        self.kinds.get(&id).copied()
    }

    #[inline]
    pub fn range_of(&self, id: RecordId) -> Option<KindRange> {
        self.ranges.get(&id).copied()
    }

    /// Check if `node` is `ancestor` or one of its descendants.
    ///
    /// `false` if `node` is abstract or either node is not numbered.
    pub fn is_a(&self, node: RecordId, ancestor: RecordId) -> bool {
        match (self.kind_of(node), self.range_of(ancestor)) {
            (Some(kind), Some(range)) => range.contains(kind),
            _ => false,
        }
    }

    /// Concrete node carrying `kind`.
    pub fn node_of(&self, kind: NodeKind) -> Option<RecordId> {
        self.order.get(kind as usize).copied()
    }

    /// Concrete nodes in kind order.
    pub fn order(&self) -> &[RecordId] {
        &self.order
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn push(&mut self, id: RecordId) {
        let kind = self.order.len() as NodeKind;
        self.order.push(id);
        self.kinds.insert(id, kind);
    }

    fn record_range(&mut self, id: RecordId, range: NodeRange) {
        // Both ends are concrete and were numbered on the way down.
        if let (Some(first), Some(last)) = (self.kind_of(range.first), self.kind_of(range.last)) {
            self.ranges.insert(id, KindRange { first, last });
        }
    }
}

struct Numbering<F> {
    is_concrete: F,
    kinds: NodeKinds,
}

impl<F: Fn(RecordId) -> bool> NodeVisitor for Numbering<F> {
    fn enter(&mut self, node: RecordId, _parent: RecordId) {
        if (self.is_concrete)(node) {
            self.kinds.push(node);
        }
    }

    fn leave(&mut self, node: RecordId, range: NodeRange) {
        self.kinds.record_range(node, range);
    }

    fn range(&mut self, _node: RecordId, _range: NodeRange, _is_last: bool) {}
}
