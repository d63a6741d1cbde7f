//! Read-only arena of constant-relevant syntax nodes.
//!
//! The arena keeps only the distinctions the constant resolver needs:
//! namespace declarations, constant assignments, constant references and
//! everything else. Parents are stored as indices, so walking up the tree
//! never needs shared ownership.

/// Index of a node inside a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Half-open byte range `start..end` in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the slice of `source` this span covers.
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start..self.end).unwrap_or("")
    }
}

/// A `module` or `class` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// Header name split into segments (`class A::B` gives `["A", "B"]`).
    pub segments: Vec<String>,
    /// The header constant chain, lowered as the first child.
    pub header: Option<NodeId>,
}

/// A constant reference, one segment of a `A::B::C` chain.
///
/// Chains nest the way the Ruby grammar does: `A::B` is a reference named
/// `B` whose `scope` is the reference named `A`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstRef {
    /// Short name of this segment.
    pub name: String,
    /// Qualifying expression (`A` in `A::B`), if any.
    pub scope: Option<NodeId>,
    /// True for `::Name`.
    pub rooted: bool,
}

/// Node kind tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `module X` / `class X`.
    NamespaceDecl(NamespaceDecl),
    /// `NAME = value`.
    ConstAssign {
        /// Assigned constant name.
        name: String,
    },
    /// A constant use site.
    ConstRef(ConstRef),
    /// Any other construct.
    Other,
}

/// A node in the arena.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Kind tag and payload.
    pub kind: NodeKind,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Children in source order.
    pub children: Vec<NodeId>,
    /// Source span.
    pub span: Span,
}

/// Read-only arena built from one parsed file.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Returns the root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    /// Returns the kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Returns the span of a node.
    #[must_use]
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// Returns the payload of a constant reference.
    #[must_use]
    pub fn const_ref(&self, id: NodeId) -> Option<&ConstRef> {
        match self.kind(id) {
            NodeKind::ConstRef(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the payload of a namespace declaration.
    #[must_use]
    pub fn namespace(&self, id: NodeId) -> Option<&NamespaceDecl> {
        match self.kind(id) {
            NodeKind::NamespaceDecl(decl) => Some(decl),
            _ => None,
        }
    }

    /// Iterates over the strict ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Iterates over all nodes in depth-first pre-order.
    #[must_use]
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: if self.nodes.is_empty() {
                Vec::new()
            } else {
                vec![self.root()]
            },
        }
    }

    /// Walks from a reference up to the outermost segment of its `A::B::C` chain.
    ///
    /// For the leftmost `A` this returns the node for the whole `A::B::C`.
    #[must_use]
    pub fn const_chain_top(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            match self.const_ref(parent) {
                Some(r) if r.scope == Some(current) => current = parent,
                _ => break,
            }
        }
        current
    }

    /// Collects the segment names of a constant chain, leftmost first.
    ///
    /// Stops at a qualifying scope that is not itself a constant
    /// (`foo::Bar` yields `["Bar"]`).
    #[must_use]
    pub fn const_segments(&self, top: NodeId) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = Some(top);
        while let Some(r) = current.and_then(|id| self.const_ref(id)) {
            segments.push(r.name.clone());
            current = r.scope;
        }
        segments.reverse();
        segments
    }

    /// Returns true if `id` is the header of its parent namespace declaration.
    #[must_use]
    pub fn is_namespace_header(&self, id: NodeId) -> bool {
        self.parent(id)
            .and_then(|p| self.namespace(p))
            .is_some_and(|decl| decl.header == Some(id))
    }

    pub(crate) fn push(&mut self, kind: NodeKind, parent: Option<NodeId>, span: Span) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        self.nodes.push(SyntaxNode {
            kind,
            parent,
            children: Vec::new(),
            span,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    pub(crate) fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }
}

/// Depth-first pre-order iterator over a [`SyntaxTree`].
#[derive(Debug)]
pub struct Preorder<'t> {
    tree: &'t SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
