//! The parse-result container handed to external collaborators (§3, §6).
use crate::node::HierarchicalNode;
use indexmap::IndexMap;

/// One `import` statement's recorded effect: an optional rename and
/// whether it was declared `static`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Import {
    pub alias: String,
    pub is_static: bool,
}

/// One compiled rule: its root node plus an optional `@callback` name
/// captured from the rule header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    pub root: HierarchicalNode,
    pub callback: Option<String>,
}

/// The output of compiling one VCG source file. `package_path`,
/// `file_name` and `companion_file` are supplied by the caller (the
/// directory-walker collaborator, out of scope here) rather than derived
/// from the source text itself.
///
/// `imports` and `rules` use [IndexMap] rather than `HashMap`: §5's
/// ordering guarantees require "rule map insertion order follows source
/// order of rule headers," which a `HashMap` cannot provide. `IndexMap`
/// is grounded on its use in the pack's `Luvion1-Fax` crate
/// (`fgc/src/gc.rs`) for the same reason — an ordinary map that also
/// remembers insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub package_path: String,
    pub file_name: String,
    pub companion_file: Option<String>,
    pub imports: IndexMap<String, Import>,
    pub rules: IndexMap<String, RuleDefinition>,
}

impl Module {
    pub fn new(package_path: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            package_path: package_path.into(),
            file_name: file_name.into(),
            companion_file: None,
            imports: IndexMap::new(),
            rules: IndexMap::new(),
        }
    }

    pub fn with_companion_file(mut self, path: impl Into<String>) -> Self {
        self.companion_file = Some(path.into());
        self
    }
}
