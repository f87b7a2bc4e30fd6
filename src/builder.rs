//! The stateful rule-body assembler (C5): consumes builder events from the
//! parser and produces a [HierarchicalNode] root (§4.6).
use crate::error::CompileError;
use crate::node::{HierarchicalNode, UNBOUNDED};

#[derive(Debug, Clone)]
struct Slot {
    value: String,
    children: Vec<usize>,
    next: Option<usize>,
    min_repeat: u32,
    max_repeat: u32,
    range_assigned: bool,
}

impl Slot {
    fn leaf(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            children: Vec::new(),
            next: None,
            min_repeat: 1,
            max_repeat: 1,
            range_assigned: false,
        }
    }

    fn group() -> Self {
        Self::leaf("(")
    }
}

/// A tagged builder-event protocol, testable independently of the parser
/// that drives it (§9 design note: "a tagged variant for builder events
/// makes the protocol testable in isolation from the parser").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderEvent {
    AddWord(String),
    AddVariable(String),
    StartGroup,
    StartOptional,
    OnPipe,
    EndGroup,
    EndOptional,
    /// `max = None` means an open-ended range (`{n,}`).
    SetRange { min: i64, max: Option<i64> },
    SetStar,
    SetPlus,
}

/// Assembles one rule body. Owns an arena of in-progress nodes addressed
/// by index (§9: "prefer arena-allocated nodes... to avoid reference
/// cycles and keep ownership linear") plus the two stacks from §4.6.
/// `finish()` walks the arena into an owned, `Box`-linked
/// [HierarchicalNode] tree and the arena is dropped.
pub struct RuleBuilder {
    rule_name: String,
    callback: Option<String>,
    arena: Vec<Slot>,
    dummy: usize,
    choice_stack: Vec<usize>,
    chain_stack: Vec<usize>,
    add_to_choice_as_child: bool,
}

impl RuleBuilder {
    pub fn new(rule_name: impl Into<String>) -> Self {
        let mut arena = Vec::new();
        arena.push(Slot::leaf("<dummy>"));
        let dummy = 0;
        Self {
            rule_name: rule_name.into(),
            callback: None,
            arena,
            dummy,
            choice_stack: Vec::new(),
            chain_stack: vec![dummy],
            add_to_choice_as_child: false,
        }
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub fn set_callback(&mut self, name: impl Into<String>) {
        self.callback = Some(name.into());
    }

    fn alloc(&mut self, slot: Slot) -> usize {
        self.arena.push(slot);
        self.arena.len() - 1
    }

    fn attach(&mut self, idx: usize) {
        if self.add_to_choice_as_child {
            let choice_top = *self
                .choice_stack
                .last()
                .expect("add_to_choice_as_child set without an open choice");
            self.arena[choice_top].children.push(idx);
        } else {
            let chain_top = *self
                .chain_stack
                .last()
                .expect("chain stack must not be empty while attaching a node");
            self.arena[chain_top].next = Some(idx);
        }
    }

    fn chain_top(&self) -> usize {
        *self
            .chain_stack
            .last()
            .expect("chain stack must not be empty")
    }

    /// Apply a single builder event, per the event contract table of §4.6.
    pub fn apply(&mut self, event: BuilderEvent) -> Result<(), CompileError> {
        match event {
            BuilderEvent::AddWord(text) => self.add_leaf(text),
            BuilderEvent::AddVariable(text) => self.add_leaf(text),
            BuilderEvent::StartGroup => self.start_group(),
            BuilderEvent::StartOptional => self.start_optional(),
            BuilderEvent::OnPipe => self.on_pipe(),
            BuilderEvent::EndGroup => self.end_group(),
            BuilderEvent::EndOptional => self.end_optional(),
            BuilderEvent::SetRange { min, max } => return self.set_range(min, max),
            BuilderEvent::SetStar => self.set_star(),
            BuilderEvent::SetPlus => self.set_plus(),
        }
        Ok(())
    }

    fn add_leaf(&mut self, text: impl Into<String>) {
        let idx = self.alloc(Slot::leaf(text));
        self.attach(idx);
        self.chain_stack.pop();
        self.chain_stack.push(idx);
        self.add_to_choice_as_child = false;
    }

    /// Leaf carrying a `$variable` reference's identifier text. Linking
    /// the variable to another rule's node tree is out of scope (§9); the
    /// node is otherwise an ordinary leaf.
    pub fn add_variable(&mut self, text: impl Into<String>) {
        self.add_leaf(text)
    }

    pub fn add_word(&mut self, text: impl Into<String>) {
        self.add_leaf(text)
    }

    fn open_group(&mut self) -> usize {
        let idx = self.alloc(Slot::group());
        self.attach(idx);
        self.choice_stack.push(idx);
        self.add_to_choice_as_child = true;
        self.chain_stack.pop();
        idx
    }

    pub fn start_group(&mut self) {
        self.open_group();
    }

    /// Distinct from [start_group](Self::start_group): the spec's §9
    /// notes that the source aliases this to `start_group` with a stale
    /// TODO. Closing with [end_optional](Self::end_optional) is what
    /// actually applies `(0, 1)`.
    pub fn start_optional(&mut self) {
        self.open_group();
    }

    pub fn on_pipe(&mut self) {
        self.chain_stack.pop();
        self.add_to_choice_as_child = true;
    }

    fn close_group(&mut self) -> usize {
        // the tail of the alternative just closed is no longer reachable
        // through `next`-extension; popping an empty stack is a no-op.
        self.chain_stack.pop();
        let group_idx = self
            .choice_stack
            .pop()
            .expect("end_group/end_optional called without a matching start");
        self.chain_stack.push(group_idx);
        group_idx
    }

    pub fn end_group(&mut self) {
        self.close_group();
    }

    pub fn end_optional(&mut self) {
        let idx = self.close_group();
        self.arena[idx].min_repeat = 0;
        self.arena[idx].max_repeat = 1;
        self.arena[idx].range_assigned = true;
    }

    pub fn set_range(&mut self, min: i64, max: Option<i64>) -> Result<(), CompileError> {
        if min < 0 {
            return Err(CompileError::new("Repeat minimum must not be negative"));
        }
        let max_value = match max {
            Some(m) => {
                if m < min {
                    return Err(CompileError::new(
                        "Max value is less than the paired minimum value",
                    ));
                }
                m as u32
            }
            None => UNBOUNDED,
        };
        let idx = self.chain_top();
        debug_assert!(
            !self.arena[idx].range_assigned,
            "repeat quantifier applied twice to the same node"
        );
        self.arena[idx].min_repeat = min as u32;
        self.arena[idx].max_repeat = max_value;
        self.arena[idx].range_assigned = true;
        Ok(())
    }

    pub fn set_star(&mut self) {
        let idx = self.chain_top();
        self.arena[idx].min_repeat = 0;
        self.arena[idx].max_repeat = UNBOUNDED;
        self.arena[idx].range_assigned = true;
    }

    pub fn set_plus(&mut self) {
        let idx = self.chain_top();
        self.arena[idx].min_repeat = 1;
        self.arena[idx].max_repeat = UNBOUNDED;
        self.arena[idx].range_assigned = true;
    }

    fn materialize(&self, idx: usize) -> HierarchicalNode {
        let slot = &self.arena[idx];
        HierarchicalNode {
            value: slot.value.clone(),
            children: slot.children.iter().map(|&c| self.materialize(c)).collect(),
            next: slot.next.map(|n| Box::new(self.materialize(n))),
            min_repeat: slot.min_repeat,
            max_repeat: slot.max_repeat,
        }
    }

    /// Returns the root node for the rule and the captured callback name,
    /// if any, releasing the builder's arena.
    pub fn finish(self) -> (HierarchicalNode, Option<String>) {
        let root_idx = self.arena[self.dummy]
            .next
            .expect("a rule body must emit at least one node");
        (self.materialize(root_idx), self.callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word_rule_builds_a_leaf_root() {
        let mut b = RuleBuilder::new("test");
        b.add_word("hello");
        let (root, callback) = b.finish();
        assert_eq!(root.render(), "hello");
        assert_eq!(callback, None);
    }

    #[test]
    fn sequence_of_words_links_via_next() {
        let mut b = RuleBuilder::new("test");
        b.add_word("hello");
        b.add_word("world");
        let (root, _) = b.finish();
        assert_eq!(root.render(), "hello world");
    }

    #[test]
    fn group_with_alternatives() {
        let mut b = RuleBuilder::new("test");
        b.start_group();
        b.add_word("a");
        b.on_pipe();
        b.add_word("b");
        b.end_group();
        let (root, _) = b.finish();
        assert_eq!(root.render(), "(a | b)");
    }

    #[test]
    fn optional_group_sets_zero_one_range() {
        let mut b = RuleBuilder::new("test");
        b.start_optional();
        b.add_word("a");
        b.end_optional();
        let (root, _) = b.finish();
        assert_eq!(root.render(), "[a]");
    }

    #[test]
    fn nested_groups_compose() {
        let mut b = RuleBuilder::new("test");
        b.start_group();
        b.start_group();
        b.add_word("g");
        b.end_group();
        b.end_group();
        let (root, _) = b.finish();
        assert_eq!(root.render(), "((g))");
    }

    #[test]
    fn quantifier_applies_to_most_recent_node() {
        let mut b = RuleBuilder::new("test");
        b.add_word("a");
        b.set_star();
        b.add_word("b");
        b.set_plus();
        let (root, _) = b.finish();
        assert_eq!(root.render(), "a* b+");
    }

    #[test]
    fn max_less_than_min_is_a_compile_error() {
        let mut b = RuleBuilder::new("test");
        b.add_word("a");
        let err = b.set_range(3, Some(1)).unwrap_err();
        assert!(err.message.contains("Max value"));
    }

    #[test]
    fn negative_minimum_is_a_compile_error() {
        let mut b = RuleBuilder::new("test");
        b.add_word("a");
        let err = b.set_range(-1, Some(1)).unwrap_err();
        assert!(err.message.contains("negative"));
    }

    #[test]
    fn callback_name_is_captured() {
        let mut b = RuleBuilder::new("test");
        b.set_callback("func");
        b.add_word("a");
        let (_, callback) = b.finish();
        assert_eq!(callback.as_deref(), Some("func"));
    }

    #[test]
    fn s5_scenario_round_trips_through_render() {
        let mut b = RuleBuilder::new("test");
        b.add_word("a");
        b.set_star();

        b.start_group();
        b.add_word("b");
        b.set_range(3, Some(3)).unwrap();
        b.add_word("c");
        b.set_plus();
        b.on_pipe();

        b.start_group();
        b.add_word("d");
        b.on_pipe();
        b.add_word("e");
        b.set_range(2, Some(9)).unwrap();
        b.end_group();

        b.start_optional();
        b.add_word("f");
        b.end_optional();
        b.end_group();

        b.start_group();
        b.start_group();
        b.add_word("g");
        b.end_group();
        b.end_group();

        b.add_word("h");
        b.set_range(3, None).unwrap();

        let (root, _) = b.finish();
        assert_eq!(
            root.render(),
            "a* (b{3} c+ | (d | e{2,9}) [f]) ((g)) h{3,}"
        );
    }
}
