//! `.inc` text emitters for node tables and declaration contexts.
//!
//! Output is built in memory. A failing walk returns the error and the
//! partial text is dropped, so callers never see half a table.

use nodegen::{
    partition, ContextClass, Hierarchy, HierarchyError, NodeRange, NodeVisitor, RangeWalker,
    RecordId, RecordKeeper,
};

use crate::config::{macro_name, HierarchyConfig};

const LINE_WIDTH: usize = 80;

/// Append the banner every generated file starts with.
pub fn emit_source_file_header(desc: &str, out: &mut String) {
    let title = "/*===- nodegen generated file ";
    let tail = "*- C++ -*-===*\\";
    let dashes = LINE_WIDTH.saturating_sub(title.len() + tail.len());
    let blank = format!("|*{}*|\n", " ".repeat(LINE_WIDTH - 4));

    out.push_str(title);
    out.push_str(&"-".repeat(dashes));
    out.push_str(tail);
    out.push('\n');
    out.push_str(&blank);
    out.push_str(&framed(desc));
    out.push_str(&blank);
    out.push_str(&framed("Automatically generated file, do not edit!"));
    out.push_str(&blank);
    out.push_str(&format!("\\*==={}===*/\n\n", "-".repeat(LINE_WIDTH - 10)));
}

fn framed(text: &str) -> String {
    let width = LINE_WIDTH - 5;
    format!("|* {:<width$}*|\n", text, width = width)
}

/// Node table emitter for one hierarchy.
///
/// Emits, for a hierarchy tagged `STMT`:
///
/// ```text
/// #ifndef NULLSTMT
/// #  define NULLSTMT(Type, Base) STMT(Type, Base)
/// #endif
/// NULLSTMT(NullStmt, Stmt)
/// #undef NULLSTMT
///
/// LAST_STMT_RANGE(Stmt, NullStmt, ReturnStmt)
/// ```
pub struct AstNodesEmitter<'h, 'r> {
    hierarchy: &'h Hierarchy<'r>,
    base_suffix: String,
    macro_tag: String,
}

impl<'h, 'r> AstNodesEmitter<'h, 'r> {
    pub fn new(hierarchy: &'h Hierarchy<'r>, config: &HierarchyConfig) -> Self {
        let root_name = hierarchy.records().record(hierarchy.root()).name();
        Self {
            hierarchy,
            base_suffix: config.base_suffix.clone(),
            macro_tag: config.macro_tag_for(root_name),
        }
    }

    pub fn macro_tag(&self) -> &str {
        &self.macro_tag
    }

    /// Render the full table.
    pub fn emit(&self) -> Result<String, HierarchyError> {
        let tag = &self.macro_tag;
        let mut out = String::new();

        emit_source_file_header("List of AST nodes of a particular kind", &mut out);

        out.push_str(&format!("#ifndef ABSTRACT_{tag}\n"));
        out.push_str(&format!("#  define ABSTRACT_{tag}(Type) Type\n"));
        out.push_str("#endif\n");

        out.push_str(&format!("#ifndef {tag}_RANGE\n"));
        out.push_str(&format!("#  define {tag}_RANGE(Base, First, Last)\n"));
        out.push_str("#endif\n\n");

        out.push_str(&format!("#ifndef LAST_{tag}_RANGE\n"));
        out.push_str(&format!(
            "#  define LAST_{tag}_RANGE(Base, First, Last) {tag}_RANGE(Base, First, Last)\n"
        ));
        out.push_str("#endif\n\n");

        let mut writer = MacroWriter {
            emitter: self,
            records: self.hierarchy.records(),
            out,
        };
        RangeWalker::new(self.hierarchy).walk(&mut writer)?;
        let mut out = writer.out;

        out.push_str(&format!("#undef {tag}\n"));
        out.push_str(&format!("#undef {tag}_RANGE\n"));
        out.push_str(&format!("#undef LAST_{tag}_RANGE\n"));
        out.push_str(&format!("#undef ABSTRACT_{tag}\n"));

        Ok(out)
    }

    /// Handler macro a child of `parent` falls back to.
    fn parent_macro(&self, parent: RecordId) -> String {
        if self.hierarchy.is_root(parent) {
            self.macro_tag.clone()
        } else {
            macro_name(self.hierarchy.records().record(parent).name())
        }
    }

    /// Text printed in the `Base` field for children of `parent`.
    fn base_name(&self, parent: RecordId) -> String {
        if self.hierarchy.is_root(parent) && !self.base_suffix.is_empty() {
            return self.base_suffix.clone();
        }
        let name = self.hierarchy.records().record(parent).name();
        format!("{}{}", name, self.base_suffix)
    }
}

struct MacroWriter<'e, 'h, 'r> {
    emitter: &'e AstNodesEmitter<'h, 'r>,
    records: &'r RecordKeeper,
    out: String,
}

impl NodeVisitor for MacroWriter<'_, '_, '_> {
    fn enter(&mut self, node: RecordId, parent: RecordId) {
        let record = self.records.record(node);
        let node_macro = macro_name(record.name());
        let parent_macro = self.emitter.parent_macro(parent);

        self.out.push_str(&format!("#ifndef {node_macro}\n"));
        self.out.push_str(&format!(
            "#  define {node_macro}(Type, Base) {parent_macro}(Type, Base)\n"
        ));
        self.out.push_str("#endif\n");

        let line = format!(
            "{}({}, {})",
            node_macro,
            record.name(),
            self.emitter.base_name(parent)
        );
        if record.is_abstract() {
            self.out
                .push_str(&format!("ABSTRACT_{}({})\n", self.emitter.macro_tag, line));
        } else {
            self.out.push_str(&line);
            self.out.push('\n');
        }
    }

    fn leave(&mut self, node: RecordId, _range: NodeRange) {
        let node_macro = macro_name(self.records.record(node).name());
        self.out.push_str(&format!("#undef {node_macro}\n\n"));
    }

    fn range(&mut self, node: RecordId, range: NodeRange, is_last: bool) {
        let prefix = if is_last { "LAST_" } else { "" };
        self.out.push_str(&format!(
            "{}{}_RANGE({}, {}, {})\n\n",
            prefix,
            self.emitter.macro_tag,
            self.records.record(node).name(),
            self.records.record(range.first).name(),
            self.records.record(range.last).name()
        ));
    }
}

/// Render the declaration-context list.
///
/// `contexts` are the records deriving from `DeclContext`, `decls` the
/// declaration nodes, both in definition order.
pub fn emit_decl_context(
    records: &RecordKeeper,
    contexts: &[RecordId],
    decls: &[RecordId],
) -> String {
    let mut out = String::new();

    emit_source_file_header("List of AST Decl nodes", &mut out);

    out.push_str("#ifndef DECL_CONTEXT\n");
    out.push_str("#  define DECL_CONTEXT(DECL)\n");
    out.push_str("#endif\n");

    out.push_str("#ifndef DECL_CONTEXT_BASE\n");
    out.push_str("#  define DECL_CONTEXT_BASE(DECL) DECL_CONTEXT(DECL)\n");
    out.push_str("#endif\n");

    for class in partition(records, contexts, decls) {
        let (macro_, id) = match class {
            ContextClass::Base(id) => ("DECL_CONTEXT_BASE", id),
            ContextClass::Plain(id) => ("DECL_CONTEXT", id),
        };
        out.push_str(&format!("{}({})\n", macro_, records.record(id).name()));
    }

    out.push_str("#undef DECL_CONTEXT\n");
    out.push_str("#undef DECL_CONTEXT_BASE\n");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodegen::RecordDef;

    fn hierarchy<'r>(rk: &'r RecordKeeper) -> Hierarchy<'r> {
        let nodes: Vec<_> = rk.iter().map(|(id, _)| id).collect();
        Hierarchy::build(rk, &nodes, "Node").unwrap()
    }

    fn sample() -> RecordKeeper {
        RecordKeeper::build(vec![
            RecordDef::new("Root").abstract_node(),
            RecordDef::new("A").base("Root"),
            RecordDef::new("B").base("Root").abstract_node(),
            RecordDef::new("C").base("B"),
            RecordDef::new("D").base("B"),
        ])
        .unwrap()
    }

    /// Output with the banner stripped.
    fn body(text: &str) -> &str {
        let end = text.find("===*/\n\n").unwrap() + "===*/\n\n".len();
        &text[end..]
    }

    #[test]
    fn header_lines_are_80_columns() {
        let mut out = String::new();
        emit_source_file_header("List of AST nodes of a particular kind", &mut out);

        let lines: Vec<_> = out.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.len(), 7);
        for line in lines {
            assert_eq!(line.len(), 80, "{line:?}");
        }
        assert!(out.contains("|* List of AST nodes of a particular kind "));
    }

    #[test]
    fn emits_full_table() {
        let rk = sample();
        let h = hierarchy(&rk);
        let text = AstNodesEmitter::new(&h, &HierarchyConfig::new("Node", ""))
            .emit()
            .unwrap();

        let expected = "\
#ifndef ABSTRACT_ROOT
#  define ABSTRACT_ROOT(Type) Type
#endif
#ifndef ROOT_RANGE
#  define ROOT_RANGE(Base, First, Last)
#endif

#ifndef LAST_ROOT_RANGE
#  define LAST_ROOT_RANGE(Base, First, Last) ROOT_RANGE(Base, First, Last)
#endif

#ifndef A
#  define A(Type, Base) ROOT(Type, Base)
#endif
A(A, Root)
#undef A

#ifndef B
#  define B(Type, Base) ROOT(Type, Base)
#endif
ABSTRACT_ROOT(B(B, Root))
#ifndef C
#  define C(Type, Base) B(Type, Base)
#endif
C(C, B)
#undef C

#ifndef D
#  define D(Type, Base) B(Type, Base)
#endif
D(D, B)
#undef D

ROOT_RANGE(B, C, D)

#undef B

LAST_ROOT_RANGE(Root, A, D)

#undef ROOT
#undef ROOT_RANGE
#undef LAST_ROOT_RANGE
#undef ABSTRACT_ROOT
";
        assert_eq!(body(&text), expected);
    }

    #[test]
    fn base_suffix_and_root_base_name() {
        let rk = RecordKeeper::build(vec![
            RecordDef::new("Decl").abstract_node(),
            RecordDef::new("Named").base("Decl").abstract_node(),
            RecordDef::new("Label").base("Named"),
            RecordDef::new("Empty").base("Decl"),
        ])
        .unwrap();
        let h = hierarchy(&rk);
        let text = AstNodesEmitter::new(&h, &HierarchyConfig::decl()).emit().unwrap();

        assert!(text.contains("ABSTRACT_DECL(NAMED(Named, Decl))\n"));
        assert!(text.contains("LABEL(Label, NamedDecl)\n"));
        assert!(text.contains("EMPTY(Empty, Decl)\n"));
        assert!(text.contains("#  define LABEL(Type, Base) NAMED(Type, Base)\n"));
        assert!(text.contains("DECL_RANGE(Named, Label, Label)\n"));
        assert!(text.contains("LAST_DECL_RANGE(Decl, Label, Empty)\n"));
    }

    #[test]
    fn custom_macro_tag_names_the_family() {
        let rk = sample();
        let h = hierarchy(&rk);
        let config = HierarchyConfig::new("Node", "").with_macro_tag("NODE");
        let emitter = AstNodesEmitter::new(&h, &config);
        let text = emitter.emit().unwrap();

        assert_eq!(emitter.macro_tag(), "NODE");
        assert!(text.contains("#  define A(Type, Base) NODE(Type, Base)\n"));
        assert!(text.contains("ABSTRACT_NODE(B(B, Root))\n"));
        assert!(text.contains("NODE_RANGE(B, C, D)\n"));
        assert!(text.contains("LAST_NODE_RANGE(Root, A, D)\n"));
        assert!(text.ends_with("#undef ABSTRACT_NODE\n"));
    }

    #[test]
    fn exactly_one_last_range() {
        let rk = sample();
        let h = hierarchy(&rk);
        let text = AstNodesEmitter::new(&h, &HierarchyConfig::new("Node", ""))
            .emit()
            .unwrap();

        let last: Vec<_> = text
            .lines()
            .filter(|l| l.starts_with("LAST_ROOT_RANGE("))
            .collect();
        assert_eq!(last, ["LAST_ROOT_RANGE(Root, A, D)"]);
    }

    #[test]
    fn emission_is_byte_identical_across_runs() {
        let rk = sample();
        let h = hierarchy(&rk);
        let config = HierarchyConfig::new("Node", "");
        let first = AstNodesEmitter::new(&h, &config).emit().unwrap();
        let second = AstNodesEmitter::new(&h, &config).emit().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn abstract_leaf_produces_no_output() {
        let rk = RecordKeeper::build(vec![
            RecordDef::new("Root").abstract_node(),
            RecordDef::new("A").base("Root"),
            RecordDef::new("Hollow").base("Root").abstract_node(),
        ])
        .unwrap();
        let h = hierarchy(&rk);
        let result = AstNodesEmitter::new(&h, &HierarchyConfig::new("Node", "")).emit();
        assert!(matches!(
            result,
            Err(HierarchyError::EmptyAbstractSubtree { ref name, .. }) if name == "Hollow"
        ));
    }

    #[test]
    fn decl_context_list() {
        let rk = RecordKeeper::build(vec![
            RecordDef::new("TU").class("DeclContext"),
            RecordDef::new("Func").class("DeclContext"),
            RecordDef::new("Var"),
            RecordDef::new("Method").base("Func"),
        ])
        .unwrap();
        let contexts = rk.derived_definitions("DeclContext");
        let decls = [rk.find("Var").unwrap(), rk.find("Method").unwrap()];

        let text = emit_decl_context(&rk, &contexts, &decls);
        let expected = "\
#ifndef DECL_CONTEXT
#  define DECL_CONTEXT(DECL)
#endif
#ifndef DECL_CONTEXT_BASE
#  define DECL_CONTEXT_BASE(DECL) DECL_CONTEXT(DECL)
#endif
DECL_CONTEXT_BASE(Func)
DECL_CONTEXT(TU)
#undef DECL_CONTEXT
#undef DECL_CONTEXT_BASE
";
        assert_eq!(body(&text), expected);
    }
}
