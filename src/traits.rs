//! Traits shared by the hierarchy walk and its consumers.

use crate::record::RecordId;
use crate::walk::NodeRange;

/// Receives the depth-first walk of a hierarchy.
///
/// Callbacks arrive in emission order:
///
/// ```text
/// enter(child, parent)          before the child's subtree
///   ...child subtree...
///   range(child, ..)            if the child has children
/// leave(child, child_range)     after the child's subtree
/// ...
/// range(root, .., is_last=true) once, at the very end
/// ```
///
/// The root itself is never entered; it only shows up as a `parent` and in
/// the final `range` call.
pub trait NodeVisitor {
    /// A child is about to be emitted under `parent`.
    fn enter(&mut self, node: RecordId, parent: RecordId);

    /// The child's subtree is done. `range` covers its concrete descendants.
    fn leave(&mut self, node: RecordId, range: NodeRange);

    /// A node with children finished. `is_last` is set only for the root.
    fn range(&mut self, node: RecordId, range: NodeRange, is_last: bool);
}
