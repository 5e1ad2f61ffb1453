//! Record database — the arena of node definitions every backend reads from.
//!
//! Records are built once from a flat list of [`RecordDef`]s, base names are
//! resolved to [`RecordId`] handles, and nothing is mutated afterwards.
//! Child relations are never stored here; see [`crate::hierarchy`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Position of a record definition in its source file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLoc {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }

    /// Location for records that were not read from a file.
    pub fn unknown() -> Self {
        Self::new("<unknown>", 0, 0)
    }
}

impl Default for SourceLoc {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Handle to a record inside one [`RecordKeeper`].
///
/// Handles are plain indices; a handle taken from another keeper is a null
/// record as far as this one is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(u32);

impl RecordId {
    pub const fn from_index(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Definition of a record, before base names are resolved.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RecordDef {
    pub name: String,
    /// Classes this record derives from (e.g. `StmtNode`, `DeclContext`).
    #[serde(default)]
    pub classes: Vec<String>,
    /// Name of the immediate base node, `None` for a root.
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(skip)]
    pub loc: SourceLoc,
}

impl RecordDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            classes: Vec::new(),
            base: None,
            is_abstract: false,
            loc: SourceLoc::unknown(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn abstract_node(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn at(mut self, loc: SourceLoc) -> Self {
        self.loc = loc;
        self
    }
}

/// A resolved record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    name: String,
    classes: Vec<String>,
    base: Option<RecordId>,
    is_abstract: bool,
    loc: SourceLoc,
}

impl Record {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn base(&self) -> Option<RecordId> {
        self.base
    }

    #[inline]
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    #[inline]
    pub fn loc(&self) -> &SourceLoc {
        &self.loc
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn is_subclass_of(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Owner of all records for one generator run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordKeeper {
    records: Vec<Record>,
    name_to_idx: HashMap<String, usize>,
}

impl RecordKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the database from definitions, resolving every base name.
    ///
    /// Definition order is kept; it decides child order in every hierarchy.
    pub fn build(defs: Vec<RecordDef>) -> Result<Self, RecordError> {
        let mut name_to_idx = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if def.name.is_empty() {
                return Err(RecordError::EmptyName {
                    loc: def.loc.clone(),
                });
            }
            if name_to_idx.insert(def.name.clone(), i).is_some() {
                return Err(RecordError::DuplicateRecord {
                    name: def.name.clone(),
                    loc: def.loc.clone(),
                });
            }
        }

        let mut records = Vec::with_capacity(defs.len());
        for def in defs {
            let base = match def.base {
                Some(base) => match name_to_idx.get(&base) {
                    Some(&idx) => Some(RecordId(idx as u32)),
                    None => {
                        return Err(RecordError::UnknownBase {
                            name: def.name,
                            base,
                            loc: def.loc,
                        });
                    }
                },
                None => None,
            };
            records.push(Record {
                name: def.name,
                classes: def.classes,
                base,
                is_abstract: def.is_abstract,
                loc: def.loc,
            });
        }

        tracing::debug!(records = records.len(), "built record database");

        Ok(Self {
            records,
            name_to_idx,
        })
    }

    #[inline]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.index())
    }

    /// Like [`get`](Self::get) for handles already validated against this keeper.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this keeper.
    #[inline]
    pub fn record(&self, id: RecordId) -> &Record {
        &self.records[id.index()]
    }

    pub fn find(&self, name: &str) -> Option<RecordId> {
        self.name_to_idx.get(name).map(|&i| RecordId(i as u32))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (RecordId(i as u32), r))
    }

    /// Every record deriving from `class`, in definition order.
    pub fn derived_definitions(&self, class: &str) -> Vec<RecordId> {
        self.iter()
            .filter(|(_, r)| r.is_subclass_of(class))
            .map(|(id, _)| id)
            .collect()
    }
}

/// Errors while building the record database.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("{loc}: record with empty name")]
    EmptyName { loc: SourceLoc },
    #[error("{loc}: duplicate record '{name}'")]
    DuplicateRecord { name: String, loc: SourceLoc },
    #[error("{loc}: record '{name}' names unknown base '{base}'")]
    UnknownBase {
        name: String,
        base: String,
        loc: SourceLoc,
    },
}
