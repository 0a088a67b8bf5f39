//! Declarative tree-shape patterns with wildcards, alternation, and named
//! captures.
//!
//! A [`Pattern`] is pure data compiled once per rule and reused across an
//! entire traversal. Matching is total and side-effect-free: the same node
//! and [`MatchContext`] always produce the same result, and a failed match
//! leaves no state behind.
//!
//! Call nodes are matched positionally over their slots, in the order
//! `[receiver-or-absent, method-name, arguments...]`. Name slots (method
//! names, identifiers, literal text) are matched by [`Pattern::name`] /
//! [`Pattern::names`]; everything else matches node slots.

use crate::tree::{NodeId, NodeKind, Tree};

/// Caller-supplied context consulted by [`Pattern::select`].
///
/// Evaluated once per top-level match attempt; it selects between pattern
/// alternatives and has no other effect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchContext {
    /// Whether the file under analysis is semantically a model file.
    pub in_model: bool,
}

impl MatchContext {
    /// Context for a model file.
    #[must_use]
    pub const fn model() -> Self {
        Self { in_model: true }
    }

    /// Context for any other file.
    #[must_use]
    pub const fn outside_model() -> Self {
        Self { in_model: false }
    }
}

/// Named sub-nodes bound by [`Pattern::capture`] during a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    bindings: Vec<(&'static str, NodeId)>,
}

impl Captures {
    /// Looks up a binding by capture name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.bindings
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, id)| *id)
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true when no capture bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterates bindings in the order they were committed.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, NodeId)> + '_ {
        self.bindings.iter().copied()
    }

    fn bind(&mut self, name: &'static str, id: NodeId) {
        self.bindings.push((name, id));
    }

    fn truncate(&mut self, len: usize) {
        self.bindings.truncate(len);
    }
}

/// One positional child of a node as seen by the matcher.
#[derive(Debug, Clone, Copy)]
enum Slot<'t> {
    /// A child node (receiver, argument, statement).
    Node(NodeId),
    /// A missing slot, e.g. the receiver of a bare call.
    Absent,
    /// A name or value: method name, identifier, literal text.
    Name(&'t str),
}

/// Declarative description of an accepted tree shape.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches any slot, present or absent.
    Any,
    /// Matches a missing slot only.
    Absent,
    /// Matches a node whose kind is in the set, with no shape constraint.
    Kind(Vec<NodeKind>),
    /// Matches a name slot against a set of literal names.
    Name(Vec<String>),
    /// Matches a node by kind set and positional child patterns.
    Shape {
        /// Accepted node kinds.
        kinds: Vec<NodeKind>,
        /// Patterns for the leading child slots.
        children: Vec<Pattern>,
        /// When set, any remaining slots are accepted unchecked; otherwise
        /// the slot count must equal the pattern count.
        rest: bool,
    },
    /// Ordered alternatives; the first structural match wins and later
    /// alternatives are never consulted.
    AnyOf(Vec<Pattern>),
    /// Binds the matched node under a name. Wrapping a name-slot or
    /// absent-slot matcher matches normally but binds nothing.
    Capture(&'static str, Box<Pattern>),
    /// Picks one of two sub-patterns from the [`MatchContext`].
    Select {
        /// Applied inside a model context.
        in_model: Box<Pattern>,
        /// Applied everywhere else.
        otherwise: Box<Pattern>,
    },
}

impl Pattern {
    /// Wildcard.
    #[must_use]
    pub const fn any() -> Self {
        Self::Any
    }

    /// Absent-slot matcher.
    #[must_use]
    pub const fn absent() -> Self {
        Self::Absent
    }

    /// Matches one node kind.
    #[must_use]
    pub fn kind(kind: NodeKind) -> Self {
        Self::Kind(vec![kind])
    }

    /// Matches any kind from the set.
    #[must_use]
    pub fn kinds(kinds: &[NodeKind]) -> Self {
        Self::Kind(kinds.to_vec())
    }

    /// Matches one literal name.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(vec![name.into()])
    }

    /// Matches any name from the set.
    #[must_use]
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Name(names.into_iter().map(Into::into).collect())
    }

    /// Call shape with exact arity: receiver, method name, and one pattern
    /// per argument.
    #[must_use]
    pub fn call(receiver: Self, method: Self, args: Vec<Self>) -> Self {
        let mut children = Vec::with_capacity(args.len() + 2);
        children.push(receiver);
        children.push(method);
        children.extend(args);
        Self::Shape {
            kinds: vec![NodeKind::Call],
            children,
            rest: false,
        }
    }

    /// Call shape accepting any arguments after the method name.
    #[must_use]
    pub fn call_any_args(receiver: Self, method: Self) -> Self {
        Self::Shape {
            kinds: vec![NodeKind::Call],
            children: vec![receiver, method],
            rest: true,
        }
    }

    /// Ordered alternation.
    #[must_use]
    pub fn any_of(alternatives: Vec<Self>) -> Self {
        Self::AnyOf(alternatives)
    }

    /// Binds the node matched by `self` under `name`.
    #[must_use]
    pub fn capture(self, name: &'static str) -> Self {
        Self::Capture(name, Box::new(self))
    }

    /// Context-dependent sub-pattern selection.
    #[must_use]
    pub fn select(in_model: Self, otherwise: Self) -> Self {
        Self::Select {
            in_model: Box::new(in_model),
            otherwise: Box::new(otherwise),
        }
    }

    /// Applies this pattern to `node`, returning the captured sub-nodes on
    /// success.
    #[must_use]
    pub fn find(&self, tree: &Tree, node: NodeId, ctx: MatchContext) -> Option<Captures> {
        let mut captures = Captures::default();
        self.matches(tree, Slot::Node(node), ctx, &mut captures)
            .then_some(captures)
    }

    fn matches(
        &self,
        tree: &Tree,
        slot: Slot<'_>,
        ctx: MatchContext,
        captures: &mut Captures,
    ) -> bool {
        match self {
            Self::Any => true,
            Self::Absent => matches!(slot, Slot::Absent),
            Self::Kind(kinds) => match slot {
                Slot::Node(id) => kinds.contains(&tree.node(id).kind()),
                _ => false,
            },
            Self::Name(names) => match slot {
                Slot::Name(name) => names.iter().any(|n| n == name),
                _ => false,
            },
            Self::Shape {
                kinds,
                children,
                rest,
            } => {
                let Slot::Node(id) = slot else {
                    return false;
                };
                if !kinds.contains(&tree.node(id).kind()) {
                    return false;
                }
                let slots = node_slots(tree, id);
                if *rest {
                    if slots.len() < children.len() {
                        return false;
                    }
                } else if slots.len() != children.len() {
                    return false;
                }
                children
                    .iter()
                    .zip(slots)
                    .all(|(pattern, slot)| pattern.matches(tree, slot, ctx, captures))
            }
            Self::AnyOf(alternatives) => {
                let mark = captures.len();
                for alternative in alternatives {
                    if alternative.matches(tree, slot, ctx, captures) {
                        return true;
                    }
                    // A failed alternative must not leak bindings.
                    captures.truncate(mark);
                }
                false
            }
            Self::Capture(name, inner) => {
                if !inner.matches(tree, slot, ctx, captures) {
                    return false;
                }
                if let Slot::Node(id) = slot {
                    captures.bind(name, id);
                }
                true
            }
            Self::Select { in_model, otherwise } => {
                if ctx.in_model {
                    in_model.matches(tree, slot, ctx, captures)
                } else {
                    otherwise.matches(tree, slot, ctx, captures)
                }
            }
        }
    }
}

/// Positional slots of a node under the call convention.
fn node_slots(tree: &Tree, id: NodeId) -> Vec<Slot<'_>> {
    let node = tree.node(id);
    match node.kind() {
        NodeKind::Call => {
            let mut slots = Vec::with_capacity(node.args().len() + 2);
            match node.receiver() {
                Some(receiver) => slots.push(Slot::Node(receiver)),
                None => slots.push(Slot::Absent),
            }
            slots.push(Slot::Name(node.name().unwrap_or_default()));
            slots.extend(node.args().iter().map(|&arg| Slot::Node(arg)));
            slots
        }
        NodeKind::LocalVarRead
        | NodeKind::InstanceVarRead
        | NodeKind::ConstRead
        | NodeKind::Symbol
        | NodeKind::StringLit
        | NodeKind::IntLit => node.name().map(Slot::Name).into_iter().collect(),
        NodeKind::Program => node.args().iter().map(|&id| Slot::Node(id)).collect(),
        NodeKind::SelfRead | NodeKind::NilLit => Vec::new(),
    }
}
