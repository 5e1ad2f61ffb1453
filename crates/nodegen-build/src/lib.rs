//! Build-time utilities for nodegen.
//!
//! This crate provides tools for:
//! - Parsing TOML record files into a [`RecordKeeper`]
//! - Generating `.inc` node tables (`STMT(...)`, `ABSTRACT_STMT(...)`,
//!   `STMT_RANGE(...)`) and the declaration-context list
//!
//! # Usage in build.rs
//!
//! ```ignore
//! // build.rs
//! fn main() {
//!     println!("cargo:rerun-if-changed=nodes.toml");
//!     nodegen_build::generate("nodes.toml", "include/StmtNodes.inc", &Action::StmtNodes)
//!         .expect("Failed to generate node table");
//! }
//! ```
//!
//! # Output
//!
//! Every concrete node is listed once, depth first, and every node with
//! children gets a range line naming its first and last concrete
//! descendant. The root's range uses the `LAST_` form:
//!
//! ```text
//! ABSTRACT_STMT(VALUESTMT(ValueStmt, Stmt))
//! ...
//! STMT_RANGE(ValueStmt, CallExpr, LabelStmt)
//! LAST_STMT_RANGE(Stmt, NullStmt, ReturnStmt)
//! ```
//!
//! A run either produces the whole file or fails; the output file is only
//! written on success.

mod cache;
mod config;
mod emitter;
mod toml_parser;

pub use cache::DefinitionCache;
pub use config::{
    macro_name, Action, HierarchyConfig, COMMENT_NODE_CLASS, DECL_NODE_CLASS, STMT_NODE_CLASS,
};
pub use emitter::{emit_decl_context, emit_source_file_header, AstNodesEmitter};
pub use toml_parser::{RecordsFile, RecordsFileError};

use std::path::Path;

use nodegen::{Hierarchy, HierarchyError, RecordError, RecordKeeper, SourceLoc, DECL_CONTEXT_CLASS};
use serde::Serialize;
use thiserror::Error;

/// Main entry point for build.rs integration.
///
/// Reads the record file, runs `action`, and writes the result.
///
/// # Errors
///
/// Returns an error if:
/// - the record file cannot be read or parsed
/// - a base name does not resolve, or the hierarchy is malformed
/// - the output file cannot be written
pub fn generate(
    records_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    action: &Action,
) -> Result<(), GenerateError> {
    let records_path = records_path.as_ref();
    let output_path = output_path.as_ref();

    let records = RecordsFile::from_file(records_path)?.into_keeper()?;
    let text = run(&records, action)?;
    std::fs::write(output_path, text)?;

    tracing::info!(
        records = %records_path.display(),
        output = %output_path.display(),
        ?action,
        "generated"
    );

    Ok(())
}

/// Run `action` over an already loaded record database.
pub fn run(records: &RecordKeeper, action: &Action) -> Result<String, GenerateError> {
    let mut cache = DefinitionCache::new();

    match action {
        Action::PrintRecords => Ok(print_records(records)),
        Action::DumpJson => dump_json(records),
        Action::CommentNodes => Ok(emit_nodes(records, &HierarchyConfig::comment(), &mut cache)?),
        Action::StmtNodes => Ok(emit_nodes(records, &HierarchyConfig::stmt(), &mut cache)?),
        Action::DeclNodes => {
            let mut out = emit_nodes(records, &HierarchyConfig::decl(), &mut cache)?;
            out.push_str(&decl_context(records, &mut cache));
            Ok(out)
        }
        Action::DeclContext => Ok(decl_context(records, &mut cache)),
        Action::Nodes(config) => Ok(emit_nodes(records, config, &mut cache)?),
    }
}

/// Node table for the hierarchy described by `config`.
pub fn emit_nodes(
    records: &RecordKeeper,
    config: &HierarchyConfig,
    cache: &mut DefinitionCache,
) -> Result<String, HierarchyError> {
    let nodes = cache.derived(records, &config.node_class);
    let hierarchy = Hierarchy::build(records, &nodes, config.node_class.as_str())?;
    AstNodesEmitter::new(&hierarchy, config).emit()
}

fn decl_context(records: &RecordKeeper, cache: &mut DefinitionCache) -> String {
    let contexts = cache.derived(records, DECL_CONTEXT_CLASS);
    let decls = cache.derived(records, DECL_NODE_CLASS);
    emit_decl_context(records, &contexts, &decls)
}

/// One record as printed by `PrintRecords` / `DumpJson`.
#[derive(Debug, Serialize)]
struct RecordView<'a> {
    name: &'a str,
    classes: &'a [String],
    base: Option<&'a str>,
    #[serde(rename = "abstract")]
    is_abstract: bool,
    loc: &'a SourceLoc,
}

fn record_views(records: &RecordKeeper) -> Vec<RecordView<'_>> {
    records
        .iter()
        .map(|(_, r)| RecordView {
            name: r.name(),
            classes: r.classes(),
            base: r.base().map(|b| records.record(b).name()),
            is_abstract: r.is_abstract(),
            loc: r.loc(),
        })
        .collect()
}

fn print_records(records: &RecordKeeper) -> String {
    let mut out = String::from("------------- Records -------------\n");
    for view in record_views(records) {
        out.push_str(&format!("def {} {{", view.name));
        if !view.classes.is_empty() {
            out.push_str(&format!("\t// {}", view.classes.join(" ")));
        }
        out.push('\n');
        if let Some(base) = view.base {
            out.push_str(&format!("  Base = {};\n", base));
        }
        out.push_str(&format!("  Abstract = {};\n", u8::from(view.is_abstract)));
        out.push_str("}\n");
    }
    out
}

fn dump_json(records: &RecordKeeper) -> Result<String, GenerateError> {
    let mut text = serde_json::to_string_pretty(&record_views(records))?;
    text.push('\n');
    Ok(text)
}

/// Errors that can occur during generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Failed to read or parse the record file
    #[error("records error: {0}")]
    RecordsError(#[from] RecordsFileError),
    /// Record database could not be built
    #[error(transparent)]
    RecordError(#[from] RecordError),
    /// Malformed node hierarchy
    #[error(transparent)]
    HierarchyError(#[from] HierarchyError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
