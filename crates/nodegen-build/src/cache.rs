//! Per-run memo of `derived_definitions` lookups.

use std::collections::HashMap;
use std::rc::Rc;

use nodegen::{RecordId, RecordKeeper};

/// Caches class name → records for the lifetime of one run.
///
/// Bound to the [`RecordKeeper`] it was first used with; create a new cache
/// for every run.
#[derive(Debug, Default)]
pub struct DefinitionCache {
    by_class: HashMap<String, Rc<[RecordId]>>,
}

impl DefinitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records deriving from `class`, in definition order.
    pub fn derived(&mut self, records: &RecordKeeper, class: &str) -> Rc<[RecordId]> {
        if let Some(hit) = self.by_class.get(class) {
            tracing::trace!(class, "definition cache hit");
            return Rc::clone(hit);
        }
        let ids: Rc<[RecordId]> = records.derived_definitions(class).into();
        self.by_class.insert(class.to_string(), Rc::clone(&ids));
        ids
    }

    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodegen::RecordDef;

    #[test]
    fn repeated_lookups_share_one_vector() {
        let rk = RecordKeeper::build(vec![
            RecordDef::new("Decl").class("DeclNode"),
            RecordDef::new("Stmt").class("StmtNode"),
        ])
        .unwrap();
        let mut cache = DefinitionCache::new();

        let a = cache.derived(&rk, "DeclNode");
        let b = cache.derived(&rk, "DeclNode");
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(&*a, &[rk.find("Decl").unwrap()]);

        cache.derived(&rk, "StmtNode");
        assert_eq!(cache.len(), 2);
    }
}
