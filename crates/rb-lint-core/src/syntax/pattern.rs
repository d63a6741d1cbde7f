//! Small structural matchers over the concrete tree-sitter tree.
//!
//! Most rules only need to recognise one call shape, e.g. "a call to
//! `chdir` on `Dir` or no receiver, with one argument and a block". A
//! [`CallPattern`] states that shape declaratively and [`descendants`]
//! feeds it every node in the file.

use tree_sitter::{Node, TreeCursor};

/// Returns the source text covered by `node`.
#[must_use]
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// Iterates over `node` and all of its named descendants in pre-order.
#[must_use]
pub fn descendants(node: Node<'_>) -> Descendants<'_> {
    Descendants {
        cursor: node.walk(),
        depth: 0,
        done: false,
    }
}

/// Pre-order iterator over named nodes, see [`descendants`].
pub struct Descendants<'t> {
    cursor: TreeCursor<'t>,
    depth: usize,
    done: bool,
}

impl<'t> Descendants<'t> {
    fn advance(&mut self) {
        if self.cursor.goto_first_child() {
            self.depth += 1;
            return;
        }
        loop {
            if self.depth == 0 {
                self.done = true;
                return;
            }
            if self.cursor.goto_next_sibling() {
                return;
            }
            self.cursor.goto_parent();
            self.depth -= 1;
        }
    }

    fn step(&mut self) -> Option<Node<'t>> {
        if self.done {
            return None;
        }
        let node = self.cursor.node();
        self.advance();
        Some(node)
    }
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        loop {
            let node = self.step()?;
            if node.is_named() {
                return Some(node);
            }
        }
    }
}

/// Presence requirement for an optional part of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expect {
    /// Either way.
    #[default]
    Any,
    /// Must be present.
    Present,
    /// Must be absent.
    Absent,
}

impl Expect {
    fn accepts(self, present: bool) -> bool {
        match self {
            Self::Any => true,
            Self::Present => present,
            Self::Absent => !present,
        }
    }
}

/// Read-only view over a tree-sitter `call` node.
#[derive(Debug, Clone, Copy)]
pub struct CallView<'t> {
    node: Node<'t>,
}

impl<'t> CallView<'t> {
    /// Wraps `node` if it is a method call.
    #[must_use]
    pub fn new(node: Node<'t>) -> Option<Self> {
        (node.kind() == "call").then_some(Self { node })
    }

    /// The underlying call node.
    #[must_use]
    pub fn node(&self) -> Node<'t> {
        self.node
    }

    /// The called method name.
    #[must_use]
    pub fn method<'s>(&self, source: &'s str) -> &'s str {
        self.node
            .child_by_field_name("method")
            .map_or("", |m| node_text(m, source))
    }

    /// The explicit receiver, if any.
    #[must_use]
    pub fn receiver(&self) -> Option<Node<'t>> {
        self.node.child_by_field_name("receiver")
    }

    /// The attached `{ }` or `do ... end` block, if any.
    #[must_use]
    pub fn block(&self) -> Option<Node<'t>> {
        self.node.child_by_field_name("block")
    }

    /// Positional, keyword and splat arguments, excluding `&block` passes.
    #[must_use]
    pub fn arguments(&self) -> Vec<Node<'t>> {
        let Some(list) = self.node.child_by_field_name("arguments") else {
            return Vec::new();
        };
        let mut cursor = list.walk();
        list.named_children(&mut cursor)
            .filter(|arg| !matches!(arg.kind(), "comment" | "block_argument"))
            .collect()
    }

    /// Returns true if a block is attached or passed with `&`.
    #[must_use]
    pub fn has_block(&self) -> bool {
        if self.block().is_some() {
            return true;
        }
        let Some(list) = self.node.child_by_field_name("arguments") else {
            return false;
        };
        let mut cursor = list.walk();
        let passed = list
            .named_children(&mut cursor)
            .any(|arg| arg.kind() == "block_argument");
        passed
    }

    /// Returns true if the receiver is the constant `name`, bare or rooted.
    #[must_use]
    pub fn receiver_is_const(&self, name: &str, source: &str) -> bool {
        self.receiver().is_some_and(|r| match r.kind() {
            "constant" => node_text(r, source) == name,
            "scope_resolution" => {
                r.child_by_field_name("scope").is_none()
                    && r.child_by_field_name("name")
                        .is_some_and(|n| node_text(n, source) == name)
            }
            _ => false,
        })
    }
}

/// Declarative description of a method call shape.
#[derive(Debug, Clone, Default)]
pub struct CallPattern {
    methods: Vec<String>,
    receiver: Expect,
    receiver_const: Option<String>,
    block: Expect,
    arg_count: Option<usize>,
}

impl CallPattern {
    /// Matches calls to any of the given method names.
    #[must_use]
    pub fn methods<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            methods: names.iter().map(|n| n.as_ref().to_string()).collect(),
            ..Self::default()
        }
    }

    /// Requires the receiver to be present or absent.
    #[must_use]
    pub fn receiver(mut self, expect: Expect) -> Self {
        self.receiver = expect;
        self
    }

    /// When a receiver is present it must be the constant `name`.
    #[must_use]
    pub fn receiver_const(mut self, name: impl Into<String>) -> Self {
        self.receiver_const = Some(name.into());
        self
    }

    /// Requires a block to be present or absent.
    #[must_use]
    pub fn block(mut self, expect: Expect) -> Self {
        self.block = expect;
        self
    }

    /// Requires exactly `count` arguments.
    #[must_use]
    pub fn args(mut self, count: usize) -> Self {
        self.arg_count = Some(count);
        self
    }

    /// Matches `node` against this pattern, returning the call view on success.
    #[must_use]
    pub fn match_call<'t>(&self, node: Node<'t>, source: &str) -> Option<CallView<'t>> {
        let call = CallView::new(node)?;
        if !self.methods.iter().any(|m| m == call.method(source)) {
            return None;
        }
        let receiver = call.receiver();
        if !self.receiver.accepts(receiver.is_some()) {
            return None;
        }
        if let (Some(_), Some(name)) = (receiver, &self.receiver_const) {
            if !call.receiver_is_const(name, source) {
                return None;
            }
        }
        if !self.block.accepts(call.has_block()) {
            return None;
        }
        if self
            .arg_count
            .is_some_and(|count| call.arguments().len() != count)
        {
            return None;
        }
        Some(call)
    }

    /// Returns true if `node` is a call of this shape.
    #[must_use]
    pub fn matches(&self, node: Node<'_>, source: &str) -> bool {
        self.match_call(node, source).is_some()
    }
}
