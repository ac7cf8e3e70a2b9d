//! The pending forest: a set of detached subtrees that always covers the
//! non-eof tokens as a contiguous partition.

use std::collections::BTreeMap;

use larch_syntax::{Builder, NodeId, NodeRole};
use larch_tokens::{TokenBuffer, TokenId, TokenRange};

/// When created, each subtree is a leaf covering a single token. Handlers
/// fold contiguous runs of subtrees into new parents until a single root
/// covers everything.
pub(crate) struct Forest {
    /// Maps a subtree to the first token it covers. Token indices order like
    /// positions in the expanded stream, so iteration is source order.
    trees: BTreeMap<TokenId, NodeId>,
}

impl Forest {
    pub(crate) fn new(builder: &mut Builder, tokens: &TokenBuffer) -> Forest {
        let mut trees = BTreeMap::new();
        // One leaf per token. Eof never enters the tree.
        for id in 0..tokens.len() - 1 {
            let leaf = builder.alloc_leaf(id);
            let can_modify = !tokens.token(id).from_macro;
            builder.set_coverage(leaf, true, can_modify);
            trees.insert(id, leaf);
        }
        Forest { trees }
    }

    /// Sets the role of the single subtree covering exactly `range`.
    #[track_caller]
    pub(crate) fn assign_role(&self, builder: &mut Builder, range: TokenRange, role: NodeRole) {
        assert!(!range.is_empty());
        let (&first, &node) = self.trees.range(range.start..).next().expect("no node found");
        assert_eq!(first, range.start, "no child with the specified range");
        let next = self.trees.range(range.start + 1..).next();
        assert!(
            next.is_none_or(|(&key, _)| key == range.end),
            "no child with the specified range"
        );
        builder.set_role(node, role);
    }

    /// Adopts every subtree within `range` into `node` and replaces them with
    /// it. `range` must line up with subtree boundaries on both sides.
    #[track_caller]
    pub(crate) fn fold_children(
        &mut self,
        builder: &mut Builder,
        tokens: &TokenBuffer,
        range: TokenRange,
        node: NodeId,
    ) {
        assert!(!builder.has_children(node), "node already has children");

        let keys: Vec<TokenId> =
            self.trees.range(range.start..range.end).map(|(&key, _)| key).collect();
        if !range.is_empty() {
            assert_eq!(
                keys.first().copied(),
                Some(range.start),
                "fold crosses boundaries of existing subtrees"
            );
        }
        let next = self.trees.range(range.end..).next();
        assert!(
            next.is_none_or(|(&key, _)| key == range.end),
            "fold crosses boundaries of existing subtrees"
        );

        for &key in &keys {
            let child = self.trees.remove(&key).unwrap();
            if builder.role(child) == NodeRole::Detached {
                builder.set_role(child, NodeRole::Unknown);
            }
            builder.push_child(node, child);
        }

        builder.set_coverage(node, true, tokens.spelled_for_expanded(range).is_some());
        self.trees.insert(range.start, node);
    }

    /// EXPECTS: all tokens were folded into a single root.
    pub(crate) fn finalize(mut self) -> NodeId {
        assert_eq!(self.trees.len(), 1);
        let (_, root) = self.trees.pop_first().unwrap();
        root
    }
}
