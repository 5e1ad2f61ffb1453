//! TOML record file parser.
//!
//! ```toml
//! [[record]]
//! name = "Stmt"
//! classes = ["StmtNode"]
//! abstract = true
//!
//! [[record]]
//! name = "NullStmt"
//! classes = ["StmtNode"]
//! base = "Stmt"
//! ```

use std::path::Path;

use nodegen::{RecordDef, RecordError, RecordKeeper, SourceLoc};
use serde::Deserialize;
use thiserror::Error;
use toml::Spanned;

/// Parsed record file, before base names are resolved.
#[derive(Debug, Clone)]
pub struct RecordsFile {
    defs: Vec<RecordDef>,
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
struct RawRecordsFile {
    #[serde(default, rename = "record")]
    records: Vec<RawRecord>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    /// Spanned so diagnostics can point at the definition
    name: Spanned<String>,
    #[serde(default)]
    classes: Vec<String>,
    base: Option<String>,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
}

impl RecordsFile {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RecordsFileError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RecordsFileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_named_str(&path.display().to_string(), &content)
    }

    /// Parse from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, RecordsFileError> {
        Self::from_named_str("<input>", content)
    }

    /// Parse from a TOML string, labelling locations with `file`.
    pub fn from_named_str(file: &str, content: &str) -> Result<Self, RecordsFileError> {
        let raw: RawRecordsFile = toml::from_str(content)?;

        let defs = raw
            .records
            .into_iter()
            .map(|r| {
                let (line, column) = line_col(content, r.name.span().start);
                RecordDef {
                    name: r.name.into_inner(),
                    classes: r.classes,
                    base: r.base,
                    is_abstract: r.is_abstract,
                    loc: SourceLoc::new(file, line, column),
                }
            })
            .collect();

        Ok(Self { defs })
    }

    /// Get all definitions, in file order.
    pub fn entries(&self) -> impl Iterator<Item = &RecordDef> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Resolve base names and build the record database.
    pub fn into_keeper(self) -> Result<RecordKeeper, RecordError> {
        RecordKeeper::build(self.defs)
    }
}

/// 1-based line and column of a byte offset.
fn line_col(content: &str, offset: usize) -> (u32, u32) {
    let before = &content[..offset.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() + 1,
        None => before.chars().count() + 1,
    };
    (line as u32, column as u32)
}

/// Errors while reading a record file.
#[derive(Debug, Error)]
pub enum RecordsFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_file() {
        let toml = r#"
[[record]]
name = "Stmt"
classes = ["StmtNode"]
abstract = true

[[record]]
name = "NullStmt"
classes = ["StmtNode"]
base = "Stmt"
"#;
        let file = RecordsFile::from_str(toml).unwrap();
        assert_eq!(file.len(), 2);

        let defs: Vec<_> = file.entries().collect();
        assert_eq!(defs[0].name, "Stmt");
        assert!(defs[0].is_abstract);
        assert_eq!(defs[0].base, None);
        assert_eq!(defs[1].name, "NullStmt");
        assert_eq!(defs[1].base.as_deref(), Some("Stmt"));
        assert_eq!(defs[1].classes, ["StmtNode"]);
        assert!(!defs[1].is_abstract);
    }

    #[test]
    fn records_carry_locations() {
        let toml = "[[record]]\nname = \"Stmt\"\n\n[[record]]\n  name = \"Expr\"\n  base = \"Stmt\"\n";
        let file = RecordsFile::from_named_str("nodes.toml", toml).unwrap();

        let locs: Vec<_> = file.entries().map(|d| d.loc.to_string()).collect();
        assert_eq!(locs, ["nodes.toml:2:8", "nodes.toml:5:10"]);
    }

    #[test]
    fn empty_file_has_no_records() {
        let file = RecordsFile::from_str("").unwrap();
        assert!(file.is_empty());
    }

    #[test]
    fn rejects_missing_name() {
        let toml = r#"
[[record]]
base = "Stmt"
"#;
        assert!(matches!(
            RecordsFile::from_str(toml),
            Err(RecordsFileError::Parse(_))
        ));
    }

    #[test]
    fn unknown_base_surfaces_when_resolving() {
        let toml = r#"
[[record]]
name = "Expr"
base = "Stmt"
"#;
        let file = RecordsFile::from_named_str("nodes.toml", toml).unwrap();
        let err = file.into_keeper().unwrap_err();
        assert_eq!(
            err.to_string(),
            "nodes.toml:3:8: record 'Expr' names unknown base 'Stmt'"
        );
    }

    #[test]
    fn line_col_counts_from_one() {
        assert_eq!(line_col("abc", 0), (1, 1));
        assert_eq!(line_col("abc\ndef", 5), (2, 2));
    }
}
