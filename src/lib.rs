//! # Class-hierarchy node tables (nodegen)
//!
//! Turns a flat set of node records (name, optional base, abstract flag) into
//! a depth-first ordering where every subtree's concrete nodes are contiguous.
//! Compiler AST machinery uses that ordering for O(1) `isa` checks.
//!
//! ## Design
//!
//! ```text
//! RecordKeeper ──derived_definitions("StmtNode")──▶ Hierarchy ──RangeWalker──▶ NodeVisitor
//!   (arena)                                        (base → children)          ├── .inc text (nodegen-build)
//!                                                                             └── NodeKinds
//! ```
//!
//! Records only know their base. Child lists are derived per run by
//! [`Hierarchy`], and every consumer of the walk implements [`NodeVisitor`].
//!
//! ## Range checks
//!
//! ```ignore
//! use nodegen::{Hierarchy, NodeKinds, RecordKeeper};
//!
//! let stmts = records.derived_definitions("StmtNode");
//! let hierarchy = Hierarchy::build(&records, &stmts, "StmtNode")?;
//! let kinds = NodeKinds::assign(&hierarchy)?;
//!
//! if kinds.is_a(node, expr) {
//!     // node is an Expr
//! }
//! ```

pub mod decl_context;
pub mod hierarchy;
pub mod kinds;
pub mod record;
pub mod traits;
pub mod walk;

pub use decl_context::{partition, ContextClass, DECL_CONTEXT_CLASS};
pub use hierarchy::{Hierarchy, HierarchyError};
pub use kinds::{KindRange, NodeKinds};
pub use record::{Record, RecordDef, RecordError, RecordId, RecordKeeper, SourceLoc};
pub use traits::NodeVisitor;
pub use walk::{NodeRange, RangeWalker};

/// Numeric kind of a concrete node, dense from 0 in emission order.
pub type NodeKind = u32;
