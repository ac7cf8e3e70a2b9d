use std::fmt;
use std::fmt::Write as _;

use la_arena::{Arena, Idx};
use larch_tokens::{TokenBuffer, TokenId, TokenRange};

use crate::{NodeKind, NodeRole};

pub type NodeId = Idx<NodeData>;

#[derive(Debug)]
pub struct NodeData {
    kind: NodeKind,
    role: NodeRole,
    original: bool,
    can_modify: bool,
    content: Content,
}

#[derive(Debug)]
enum Content {
    Leaf { token: TokenId },
    Tree { children: Vec<NodeId> },
}

/// Mutable construction surface for the syntax tree.
///
/// The builder hands out node ids, enforces the single-role discipline, and
/// turns into an immutable [`SyntaxTree`] on [`Builder::finish`].
#[derive(Default)]
pub struct Builder {
    nodes: Arena<NodeData>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    pub fn alloc_leaf(&mut self, token: TokenId) -> NodeId {
        self.nodes.alloc(NodeData {
            kind: NodeKind::LEAF,
            role: NodeRole::Detached,
            original: false,
            can_modify: false,
            content: Content::Leaf { token },
        })
    }

    pub fn alloc_tree(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.alloc(NodeData {
            kind,
            role: NodeRole::Detached,
            original: false,
            can_modify: false,
            content: Content::Tree { children: Vec::new() },
        })
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id].kind
    }

    pub fn role(&self, id: NodeId) -> NodeRole {
        self.nodes[id].role
    }

    /// Assigns the node's role. A role transitions away from
    /// [`NodeRole::Detached`] exactly once.
    #[track_caller]
    pub fn set_role(&mut self, id: NodeId, role: NodeRole) {
        let node = &mut self.nodes[id];
        assert_eq!(
            node.role,
            NodeRole::Detached,
            "role of a {:?} node assigned twice",
            node.kind
        );
        node.role = role;
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        match &self.nodes[id].content {
            Content::Leaf { .. } => false,
            Content::Tree { children } => !children.is_empty(),
        }
    }

    /// Appends an adopted child. The child must already carry a role.
    #[track_caller]
    pub fn push_child(&mut self, parent: NodeId, child: NodeId) {
        assert_ne!(self.nodes[child].role, NodeRole::Detached, "adopting a detached child");
        match &mut self.nodes[parent].content {
            Content::Leaf { .. } => panic!("cannot attach children to a leaf"),
            Content::Tree { children } => children.push(child),
        }
    }

    pub fn set_coverage(&mut self, id: NodeId, original: bool, can_modify: bool) {
        let node = &mut self.nodes[id];
        node.original = original;
        node.can_modify = can_modify;
    }

    /// Finishes construction, checking the tree's recursive invariants.
    pub fn finish(self, tokens: &TokenBuffer, root: NodeId) -> SyntaxTree<'_> {
        let tree = SyntaxTree { tokens, nodes: self.nodes, root };
        tree.assert_invariants();
        tree
    }
}

/// An immutable lossless syntax tree over a borrowed token buffer.
pub struct SyntaxTree<'t> {
    tokens: &'t TokenBuffer,
    nodes: Arena<NodeData>,
    root: NodeId,
}

impl<'t> SyntaxTree<'t> {
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: self, id: self.root }
    }

    pub fn tokens(&self) -> &'t TokenBuffer {
        self.tokens
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.root().dump_into(&mut out, 0);
        out
    }

    /// Checks the whole-tree invariants: every leaf corresponds to one
    /// non-eof token in order, no node is detached, every node is original,
    /// and `can_modify` agrees with the spelled-token mapping.
    fn assert_invariants(&self) {
        let mut next_token = 0;
        self.check_node(self.root, &mut next_token);
        assert_eq!(next_token, self.tokens.len() - 1, "tree does not cover all tokens");
    }

    /// Returns the half-open token range the node covers.
    fn check_node(&self, id: NodeId, next_token: &mut TokenId) -> TokenRange {
        let node = &self.nodes[id];
        assert!(node.original, "{:?} node does not come from the source", node.kind);
        if id != self.root {
            assert_ne!(node.role, NodeRole::Detached, "{:?} node left detached", node.kind);
        }

        let range = match &node.content {
            Content::Leaf { token } => {
                assert_eq!(*token, *next_token, "leaf out of order");
                *next_token += 1;
                TokenRange::new(*token, *token + 1)
            }
            Content::Tree { children } => {
                let start = *next_token;
                assert!(
                    !children.is_empty() || id == self.root,
                    "{:?} node has no children",
                    node.kind
                );
                for &child in children {
                    self.check_node(child, next_token);
                }
                TokenRange::new(start, *next_token)
            }
        };

        let spelled = self.tokens.spelled_for_expanded(range).is_some();
        assert_eq!(node.can_modify, spelled, "{:?} node has a stale spelled flag", node.kind);
        range
    }
}

impl fmt::Debug for SyntaxTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

/// Cheap cursor over one node of a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a SyntaxTree<'a>,
    id: NodeId,
}

impl<'a> SyntaxNode<'a> {
    fn data(self) -> &'a NodeData {
        &self.tree.nodes[self.id]
    }

    pub fn id(self) -> NodeId {
        self.id
    }

    pub fn kind(self) -> NodeKind {
        self.data().kind
    }

    pub fn role(self) -> NodeRole {
        self.data().role
    }

    pub fn original(self) -> bool {
        self.data().original
    }

    pub fn can_modify(self) -> bool {
        self.data().can_modify
    }

    pub fn is_leaf(self) -> bool {
        matches!(self.data().content, Content::Leaf { .. })
    }

    /// The wrapped token of a leaf.
    pub fn token(self) -> Option<TokenId> {
        match &self.data().content {
            Content::Leaf { token } => Some(*token),
            Content::Tree { .. } => None,
        }
    }

    pub fn text(self) -> Option<&'a str> {
        self.token().map(|token| self.tree.tokens.token_text(token))
    }

    pub fn children(self) -> impl DoubleEndedIterator<Item = SyntaxNode<'a>> + Clone {
        let children = match &self.data().content {
            Content::Leaf { .. } => &[][..],
            Content::Tree { children } => children.as_slice(),
        };
        children.iter().map(move |&id| SyntaxNode { tree: self.tree, id })
    }

    /// The first child carrying the given role.
    pub fn child_with_role(self, role: NodeRole) -> Option<SyntaxNode<'a>> {
        self.children().find(|child| child.role() == role)
    }

    /// All leaf tokens under this node, left to right.
    pub fn leaves(self) -> Leaves<'a> {
        Leaves { stack: vec![self] }
    }

    pub fn dump(self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(self, out: &mut String, level: usize) {
        for _ in 0..level {
            out.push_str("  ");
        }
        let role = self.role();
        let suffix = if matches!(role, NodeRole::Unknown | NodeRole::Detached) {
            String::new()
        } else {
            format!(" {role:?}")
        };
        match &self.data().content {
            Content::Leaf { token } => {
                let _ = writeln!(out, "'{}'{}", self.tree.tokens.token_text(*token), suffix);
            }
            Content::Tree { .. } => {
                let _ = writeln!(out, "{:?}{}", self.kind(), suffix);
                for child in self.children() {
                    child.dump_into(out, level + 1);
                }
            }
        }
    }
}

pub struct Leaves<'a> {
    stack: Vec<SyntaxNode<'a>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = SyntaxNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.stack.pop()?;
            if node.is_leaf() {
                return Some(node);
            }
            self.stack.extend(node.children().rev());
        }
    }
}
