//! The hierarchical-list node (C4): a tree-of-alternatives linked by
//! `next` into right-linked sequences (§3, §4.7).
use ptree::TreeItem;
use std::fmt::{Debug, Display, Formatter};

/// Sentinel for an unbounded repeat maximum (Kleene star/plus use this).
pub const UNBOUNDED: u32 = u32::MAX;

/// A node in a sequence-of-alternatives structure.
///
/// `children` holds the ordered alternatives of a group (non-empty only
/// for group/choice nodes; a leaf's `value` is its literal text).
/// `next` right-links to the node continuing the same alternative
/// (concatenation). `min_repeat`/`max_repeat` default to `(1, 1)`,
/// satisfy `0 <= min_repeat <= max_repeat` and `max_repeat >= 1`, and may
/// be assigned at most once while the node is under construction (the
/// builder enforces that; by the time a `HierarchicalNode` is handed out,
/// quantifiers are fixed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchicalNode {
    pub value: String,
    pub children: Vec<HierarchicalNode>,
    pub next: Option<Box<HierarchicalNode>>,
    pub min_repeat: u32,
    pub max_repeat: u32,
}

impl HierarchicalNode {
    pub fn leaf(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            children: Vec::new(),
            next: None,
            min_repeat: 1,
            max_repeat: 1,
        }
    }

    pub fn group(children: Vec<HierarchicalNode>) -> Self {
        Self {
            value: "(".to_string(),
            children,
            next: None,
            min_repeat: 1,
            max_repeat: 1,
        }
    }

    /// True when this node is a group (has alternatives) whose repeat
    /// range is exactly `(0, 1)` — rendered with `[` / `]` and an implicit
    /// `?` (§4.7). Optionality on a leaf (e.g. an explicit `word{0,1}`)
    /// does not use bracket notation, since there are no alternatives to
    /// bracket.
    pub fn is_optional_group(&self) -> bool {
        !self.children.is_empty() && self.min_repeat == 0 && self.max_repeat == 1
    }

    fn quantifier_suffix(&self) -> String {
        match (self.min_repeat, self.max_repeat) {
            (0, 1) if !self.children.is_empty() => String::new(),
            (0, UNBOUNDED) => "*".to_string(),
            (1, UNBOUNDED) => "+".to_string(),
            (1, 1) => String::new(),
            (min, max) if min == max => format!("{{{}}}", min),
            (min, UNBOUNDED) => format!("{{{},}}", min),
            (min, max) => format!("{{{},{}}}", min, max),
        }
    }

    /// Traverses `next` and `children`; this always terminates since the
    /// underlying structure is an owned, acyclic forest (property 3).
    fn write_rendering(&self, out: &mut String) {
        if !self.children.is_empty() {
            let (open, close) = if self.is_optional_group() {
                ('[', ']')
            } else {
                ('(', ')')
            };
            out.push(open);
            for (index, child) in self.children.iter().enumerate() {
                if index > 0 {
                    out.push_str(" | ");
                }
                child.write_rendering(out);
            }
            out.push(close);
        } else {
            out.push_str(&self.value);
        }
        out.push_str(&self.quantifier_suffix());
        if let Some(next) = &self.next {
            out.push(' ');
            next.write_rendering(out);
        }
    }

    /// Renders the node as the human/test-facing grammar string of §4.7.
    /// Not round-trippable through the parser for all inputs (§9).
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_rendering(&mut out);
        out
    }

    /// Prints an indented debugging tree via `ptree`, separate from (and
    /// not a substitute for) [render](Self::render).
    pub fn print(&self) -> std::io::Result<()> {
        ptree::print_tree(&PrintNode::from(self))
    }
}

impl Display for HierarchicalNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// A flattened owned view of [HierarchicalNode] used only to drive
/// [ptree::TreeItem], since `ptree` wants a single uniform child list
/// while a [HierarchicalNode] has two distinct kinds of edges
/// (alternatives and `next`). Grounded on the teacher's `ASTNode`
/// `TreeItem` impl (`ast_node.rs`).
#[derive(Debug, Clone)]
struct PrintNode {
    label: String,
    children: Vec<PrintNode>,
}

impl From<&HierarchicalNode> for PrintNode {
    fn from(node: &HierarchicalNode) -> Self {
        let label = if node.children.is_empty() {
            node.value.clone()
        } else {
            "(group)".to_string()
        };
        let mut children: Vec<PrintNode> = node.children.iter().map(PrintNode::from).collect();
        if let Some(next) = &node.next {
            children.push(PrintNode::from(next.as_ref()));
        }
        Self {
            label: format!("{}{}", label, node.quantifier_suffix()),
            children,
        }
    }
}

impl TreeItem for PrintNode {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{}", self.label)
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(&self.children)
    }
}
