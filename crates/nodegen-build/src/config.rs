//! Hierarchy configuration and generator actions.

/// Node class of comment AST nodes.
pub const COMMENT_NODE_CLASS: &str = "CommentNode";
/// Node class of declaration AST nodes.
pub const DECL_NODE_CLASS: &str = "DeclNode";
/// Node class of statement AST nodes.
pub const STMT_NODE_CLASS: &str = "StmtNode";

/// Parameters of one node table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyConfig {
    /// Records deriving from this class form the hierarchy.
    pub node_class: String,
    /// Appended to a parent's name in the `Base` field of node lines
    /// (`Decl` turns `Record` into `RecordDecl`). A root parent with a
    /// non-empty suffix is printed as the suffix alone.
    pub base_suffix: String,
    /// Macro family name. Defaults to the upper-cased root name.
    pub macro_tag: Option<String>,
}

impl HierarchyConfig {
    pub fn new(node_class: impl Into<String>, base_suffix: impl Into<String>) -> Self {
        Self {
            node_class: node_class.into(),
            base_suffix: base_suffix.into(),
            macro_tag: None,
        }
    }

    pub fn with_macro_tag(mut self, tag: impl Into<String>) -> Self {
        self.macro_tag = Some(tag.into());
        self
    }

    pub fn comment() -> Self {
        Self::new(COMMENT_NODE_CLASS, "")
    }

    pub fn decl() -> Self {
        Self::new(DECL_NODE_CLASS, "Decl")
    }

    pub fn stmt() -> Self {
        Self::new(STMT_NODE_CLASS, "")
    }

    /// Macro tag for a hierarchy rooted at `root_name`.
    pub fn macro_tag_for(&self, root_name: &str) -> String {
        match &self.macro_tag {
            Some(tag) => tag.clone(),
            None => macro_name(root_name),
        }
    }
}

/// Macro-ized version of a record name.
pub fn macro_name(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// What a generator run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Human-readable listing of every record.
    PrintRecords,
    /// Every record as JSON.
    DumpJson,
    CommentNodes,
    /// Decl node table followed by the declaration-context list.
    DeclNodes,
    StmtNodes,
    /// Declaration-context list alone.
    DeclContext,
    /// Node table for a custom hierarchy.
    Nodes(HierarchyConfig),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        assert_eq!(HierarchyConfig::decl().node_class, "DeclNode");
        assert_eq!(HierarchyConfig::decl().base_suffix, "Decl");
        assert_eq!(HierarchyConfig::stmt().base_suffix, "");
        assert_eq!(HierarchyConfig::comment().node_class, "CommentNode");
    }

    #[test]
    fn macro_tag_defaults_to_root_name() {
        assert_eq!(HierarchyConfig::stmt().macro_tag_for("Stmt"), "STMT");
        assert_eq!(
            HierarchyConfig::stmt()
                .with_macro_tag("STATEMENT")
                .macro_tag_for("Stmt"),
            "STATEMENT"
        );
    }

    #[test]
    fn macro_name_upper_cases() {
        assert_eq!(macro_name("CXXMemberCallExpr"), "CXXMEMBERCALLEXPR");
        assert_eq!(macro_name("_Private1"), "_PRIVATE1");
    }
}
