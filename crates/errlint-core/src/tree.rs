//! Immutable syntax-tree arena consumed by rules.
//!
//! The parser that produces trees lives outside this crate: it targets
//! [`TreeBuilder`] and hands the finished [`Tree`] to a lint pass. Nodes are
//! addressed by [`NodeId`] and never mutated after construction, so one tree
//! can back any number of pattern-match attempts.

use serde::{Deserialize, Serialize};

/// Byte range into a single source buffer, end-exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "span start {start} exceeds end {end}");
        Self { start, end }
    }

    /// Creates a zero-length span at the given offset.
    #[must_use]
    pub const fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for zero-length spans.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns true when `other` lies entirely within this span.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true when the two spans share at least one byte.
    ///
    /// Zero-length spans never overlap anything, including each other.
    #[must_use]
    pub const fn overlaps(&self, other: Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Syntactic category of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Top-level statement sequence.
    Program,
    /// Method call; carries a method name, an optional receiver, and
    /// arguments.
    Call,
    /// Local variable read.
    LocalVarRead,
    /// Instance variable read.
    InstanceVarRead,
    /// Constant read.
    ConstRead,
    /// `self` reference.
    SelfRead,
    /// Symbol literal.
    Symbol,
    /// String literal.
    StringLit,
    /// Integer literal.
    IntLit,
    /// `nil` literal.
    NilLit,
}

/// Stable handle to a node within one [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Index into the arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One syntax element: kind, span, and kind-dependent payload.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    span: Span,
    name: Option<String>,
    receiver: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Syntactic category.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Source span of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Method name for calls, identifier for variable reads, text for
    /// symbol and literal nodes.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Receiver of a call, if present. Always `None` for non-call nodes.
    #[must_use]
    pub fn receiver(&self) -> Option<NodeId> {
        self.receiver
    }

    /// Call arguments. For a [`NodeKind::Program`] node these are the
    /// statements; empty for leaf nodes.
    #[must_use]
    pub fn args(&self) -> &[NodeId] {
        &self.children
    }

    /// All child node ids in source order: the receiver (when present)
    /// followed by [`Node::args`].
    pub fn child_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.receiver.into_iter().chain(self.children.iter().copied())
    }
}

/// Read-only arena of [`Node`]s with a designated root.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Resolves a node id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true when the arena holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Construction API for [`Tree`].
///
/// Children must be built before their parent so that the parent can refer
/// to them by id; the builder checks the span invariant (children
/// non-overlapping, in source order, inside the parent) in debug builds.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) -> NodeId {
        debug_assert!(
            u32::try_from(self.nodes.len()).is_ok(),
            "arena exceeds u32 capacity"
        );
        self.check_children(&node);
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn check_children(&self, node: &Node) {
        let mut prev_end = node.span.start;
        for id in node.receiver.into_iter().chain(node.children.iter().copied()) {
            let child = &self.nodes[id.index()];
            debug_assert!(
                node.span.contains(child.span),
                "child span {} escapes parent span {}",
                child.span,
                node.span
            );
            debug_assert!(
                child.span.start >= prev_end,
                "child span {} out of source order",
                child.span
            );
            prev_end = child.span.end;
        }
    }

    /// Adds a call node.
    pub fn call(
        &mut self,
        receiver: Option<NodeId>,
        name: impl Into<String>,
        args: Vec<NodeId>,
        span: Span,
    ) -> NodeId {
        self.push(Node {
            kind: NodeKind::Call,
            span,
            name: Some(name.into()),
            receiver,
            children: args,
        })
    }

    /// Adds a local variable read.
    pub fn lvar(&mut self, name: impl Into<String>, span: Span) -> NodeId {
        self.named_leaf(NodeKind::LocalVarRead, name, span)
    }

    /// Adds an instance variable read.
    pub fn ivar(&mut self, name: impl Into<String>, span: Span) -> NodeId {
        self.named_leaf(NodeKind::InstanceVarRead, name, span)
    }

    /// Adds a constant read.
    pub fn constant(&mut self, name: impl Into<String>, span: Span) -> NodeId {
        self.named_leaf(NodeKind::ConstRead, name, span)
    }

    /// Adds a `self` reference.
    pub fn self_read(&mut self, span: Span) -> NodeId {
        self.leaf(NodeKind::SelfRead, span)
    }

    /// Adds a symbol literal; `name` excludes the leading colon.
    pub fn symbol(&mut self, name: impl Into<String>, span: Span) -> NodeId {
        self.named_leaf(NodeKind::Symbol, name, span)
    }

    /// Adds a string literal; `text` is the unquoted content.
    pub fn string(&mut self, text: impl Into<String>, span: Span) -> NodeId {
        self.named_leaf(NodeKind::StringLit, text, span)
    }

    /// Adds an integer literal.
    pub fn int(&mut self, text: impl Into<String>, span: Span) -> NodeId {
        self.named_leaf(NodeKind::IntLit, text, span)
    }

    /// Adds a `nil` literal.
    pub fn nil(&mut self, span: Span) -> NodeId {
        self.leaf(NodeKind::NilLit, span)
    }

    /// Adds the top-level statement sequence.
    pub fn program(&mut self, statements: Vec<NodeId>, span: Span) -> NodeId {
        self.push(Node {
            kind: NodeKind::Program,
            span,
            name: None,
            receiver: None,
            children: statements,
        })
    }

    fn named_leaf(&mut self, kind: NodeKind, name: impl Into<String>, span: Span) -> NodeId {
        self.push(Node {
            kind,
            span,
            name: Some(name.into()),
            receiver: None,
            children: Vec::new(),
        })
    }

    fn leaf(&mut self, kind: NodeKind, span: Span) -> NodeId {
        self.push(Node {
            kind,
            span,
            name: None,
            receiver: None,
            children: Vec::new(),
        })
    }

    /// Seals the arena with `root` as the tree's entry point.
    #[must_use]
    pub fn finish(self, root: NodeId) -> Tree {
        Tree {
            nodes: self.nodes,
            root,
        }
    }
}
