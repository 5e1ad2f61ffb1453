//! Declaration-context partitioning.
//!
//! Every record deriving from the context class is classified exactly once:
//! as a *base* context if some declaration names it as its direct base, or
//! as a *plain* context otherwise. Base contexts come first, in the order the
//! declarations reveal them; plain contexts follow in their original order.

use std::collections::HashSet;

use crate::record::{RecordId, RecordKeeper};

/// Node class marking declaration contexts.
pub const DECL_CONTEXT_CLASS: &str = "DeclContext";

/// Classification of a single context node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContextClass {
    /// Extended by at least one declaration.
    Base(RecordId),
    /// Never used as a base.
    Plain(RecordId),
}

impl ContextClass {
    pub fn id(self) -> RecordId {
        match self {
            Self::Base(id) | Self::Plain(id) => id,
        }
    }

    pub fn is_base(self) -> bool {
        matches!(self, Self::Base(_))
    }
}

/// Partition `contexts` by whether a declaration in `decls` extends them.
pub fn partition(
    records: &RecordKeeper,
    contexts: &[RecordId],
    decls: &[RecordId],
) -> Vec<ContextClass> {
    let mut remaining: HashSet<RecordId> = contexts.iter().copied().collect();
    let mut out = Vec::with_capacity(remaining.len());

    for &decl in decls {
        let Some(base) = records.get(decl).and_then(|r| r.base()) else {
            continue;
        };
        if remaining.remove(&base) {
            out.push(ContextClass::Base(base));
        }
    }

    for &ctx in contexts {
        // `remove` also drops duplicates in `contexts`.
        if remaining.remove(&ctx) {
            out.push(ContextClass::Plain(ctx));
        }
    }

    tracing::debug!(
        contexts = out.len(),
        bases = out.iter().filter(|c| c.is_base()).count(),
        "partitioned declaration contexts"
    );

    out
}
