//! Arena-backed search tree with pruning and re-rooting.
//!
//! Nodes live in a slotted `Vec` and reference each other through `NodeId`
//! indices, so re-rooting is an index reassignment and teardown is an
//! explicit worklist walk rather than a recursive destructor. Slots freed by
//! pruning go on a free list and are reused by later expansions.

use rand::Rng;
use thiserror::Error;

use search_core::GameState;

use crate::node::{Node, NodeId};

/// Invariant violations raised by tree-level operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    /// A best/random/highest-reward child was requested on a leaf.
    #[error("node has no children")]
    EmptyChildren,

    /// A UCT value was requested for a root, which has no siblings to
    /// compare against.
    #[error("root nodes have no UCT value")]
    RootHasNoUct,
}

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree<S> {
    /// Arena slots; `None` marks a pruned slot awaiting reuse.
    slots: Vec<Option<Node<S>>>,

    /// Indices of pruned slots.
    free: Vec<u32>,

    /// Current root. All live nodes are reachable from here.
    root: NodeId,
}

impl<S: GameState> SearchTree<S> {
    /// Create a tree holding a single root node for `state`.
    pub fn new(state: S) -> Self {
        Self {
            slots: vec![Some(Node::new_root(state))],
            free: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Current root id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node. Panics on a stale id, which means a caller kept an id
    /// across a prune.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<S> {
        self.slots[id.0 as usize]
            .as_ref()
            .expect("stale NodeId: node was pruned")
    }

    /// Mutably borrow a node.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        self.slots[id.0 as usize]
            .as_mut()
            .expect("stale NodeId: node was pruned")
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate a node, reusing a pruned slot when one is available.
    fn allocate(&mut self, node: Node<S>) -> NodeId {
        if let Some(slot) = self.free.pop() {
            self.slots[slot as usize] = Some(node);
            NodeId(slot)
        } else {
            let id = NodeId(self.slots.len() as u32);
            self.slots.push(Some(node));
            id
        }
    }

    /// Attach a new child holding `state` under `parent`.
    pub fn add_child(&mut self, parent: NodeId, state: S) -> NodeId {
        let child_id = self.allocate(Node::new_child(parent, state));
        let parent_node = self.get_mut(parent);
        parent_node.children.push(child_id);
        parent_node.children_sorted = false;
        child_id
    }

    /// Recompute the cached UCT of `id` from its own statistics and its
    /// parent's visit count:
    ///
    /// `UCT = reward/n + cp * sqrt(2 * ln(parent_n) / n)`, infinity when
    /// `n == 0`.
    ///
    /// The parent's sibling ordering may have changed, so its sorted flag is
    /// cleared as a side effect. Fails on a root: a root is never selected
    /// among siblings and must not carry a UCT.
    pub fn refresh_uct(&mut self, id: NodeId, exploration_constant: f64) -> Result<(), TreeError> {
        let parent = self.get(id).parent;
        if parent.is_none() {
            return Err(TreeError::RootHasNoUct);
        }

        let parent_visits = self.get(parent).visit_count;
        let node = self.get(id);
        let uct = if node.visit_count == 0 {
            f64::INFINITY
        } else {
            let n = node.visit_count as f64;
            node.total_reward / n
                + exploration_constant * (2.0 * (parent_visits as f64).ln() / n).sqrt()
        };

        self.get_mut(id).uct = uct;
        self.get_mut(parent).children_sorted = false;
        Ok(())
    }

    /// Sort the children of `parent` in ascending UCT order. Stable, so ties
    /// keep their insertion order; that stability is the only tie-break.
    fn sort_children(&mut self, parent: NodeId) {
        let mut children = self.get(parent).children.clone();
        children.sort_by(|a, b| {
            let ua = self.get(*a).uct;
            let ub = self.get(*b).uct;
            ua.partial_cmp(&ub).unwrap_or(std::cmp::Ordering::Equal)
        });

        let parent_node = self.get_mut(parent);
        parent_node.children = children;
        parent_node.children_sorted = true;
    }

    /// Child of `id` with the highest UCT, re-sorting first if the cached
    /// order is stale.
    pub fn best_child(&mut self, id: NodeId) -> Result<NodeId, TreeError> {
        if self.get(id).is_leaf() {
            return Err(TreeError::EmptyChildren);
        }

        if !self.get(id).children_sorted {
            self.sort_children(id);
        }

        let children = &self.get(id).children;
        Ok(children[children.len() - 1])
    }

    /// Uniformly random child of `id`.
    pub fn random_child<R: Rng>(&self, id: NodeId, rng: &mut R) -> Result<NodeId, TreeError> {
        let children = &self.get(id).children;
        if children.is_empty() {
            return Err(TreeError::EmptyChildren);
        }
        Ok(children[rng.gen_range(0..children.len())])
    }

    /// Child of `id` maximizing raw accumulated reward rather than UCT.
    pub fn child_with_highest_reward(&self, id: NodeId) -> Result<NodeId, TreeError> {
        self.get(id)
            .children
            .iter()
            .copied()
            .max_by(|a, b| {
                let ra = self.get(*a).total_reward;
                let rb = self.get(*b).total_reward;
                ra.partial_cmp(&rb).unwrap_or(std::cmp::Ordering::Equal)
            })
            .ok_or(TreeError::EmptyChildren)
    }

    /// Child of `id` whose state equals `state` (value equality).
    pub fn find_child(&self, id: NodeId, state: &S) -> Option<NodeId> {
        self.get(id)
            .children
            .iter()
            .copied()
            .find(|&child| self.get(child).state == *state)
    }

    /// Destroy the subtree rooted at `id`, releasing every node and its
    /// owned state. Iterative worklist, so arbitrarily deep subtrees cannot
    /// overflow the stack.
    pub fn cut_branch(&mut self, id: NodeId) {
        let mut worklist = vec![id];
        while let Some(current) = worklist.pop() {
            let node = self.slots[current.0 as usize]
                .take()
                .expect("stale NodeId: node was pruned");
            worklist.extend(node.children);
            self.free.push(current.0);
        }
    }

    /// Destroy every child subtree of `parent` except `keep`, leaving `keep`
    /// as the sole child. Statistics of the kept subtree are untouched.
    pub fn prune_other_branches(&mut self, parent: NodeId, keep: NodeId) {
        let children = std::mem::take(&mut self.get_mut(parent).children);
        for child in children {
            if child != keep {
                self.cut_branch(child);
            }
        }
        let parent_node = self.get_mut(parent);
        parent_node.children = vec![keep];
        parent_node.children_sorted = true;
    }

    /// Promote `keep` to be the root, releasing everything else.
    ///
    /// The kept subtree is detached from its parent before anything is torn
    /// down, so it can never be destroyed along with the rest. Teardown
    /// starts from the true top-level root, reached by walking parent links,
    /// in case the current root is itself a detached interior node.
    pub fn reroot(&mut self, keep: NodeId) {
        let parent = self.get(keep).parent;
        if parent.is_none() {
            self.root = keep;
            return;
        }

        // Detach the kept subtree.
        self.get_mut(keep).parent = NodeId::NONE;
        self.get_mut(parent).children.retain(|&c| c != keep);

        let mut top = parent;
        loop {
            let up = self.get(top).parent;
            if up.is_none() {
                break;
            }
            top = up;
        }
        self.cut_branch(top);

        self.root = keep;
    }

    /// Tear down the whole structure, root included. Idempotent; after the
    /// first call the tree holds no nodes and further node operations are
    /// invalid. This exists for explicit lifecycle control, normal drops
    /// release everything as well.
    pub fn clear(&mut self) {
        if self.root.is_none() {
            return;
        }

        let mut top = self.root;
        loop {
            let up = self.get(top).parent;
            if up.is_none() {
                break;
            }
            top = up;
        }
        self.cut_branch(top);
        self.root = NodeId::NONE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use search_core::Player;

    /// Minimal state for exercising tree mechanics.
    #[derive(Debug, Clone, PartialEq)]
    struct Tag(u32);

    impl GameState for Tag {
        fn player(&self) -> Player {
            if self.0 % 2 == 0 {
                Player::One
            } else {
                Player::Two
            }
        }

        fn successors(&self) -> Vec<Self> {
            Vec::new()
        }
    }

    #[test]
    fn test_new_tree() {
        let tree = SearchTree::new(Tag(0));

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root(), NodeId(0));
        assert!(tree.get(tree.root()).parent.is_none());
    }

    #[test]
    fn test_add_child_links_parent() {
        let mut tree = SearchTree::new(Tag(0));
        let child = tree.add_child(tree.root(), Tag(1));

        assert_eq!(tree.len(), 2);
        assert_eq!(tree.get(child).parent, tree.root());
        assert_eq!(tree.get(tree.root()).children, vec![child]);
        assert!(!tree.get(tree.root()).children_sorted);
    }

    #[test]
    fn test_best_child_sorts_stale_order() {
        let mut tree = SearchTree::new(Tag(0));
        let a = tree.add_child(tree.root(), Tag(1));
        let b = tree.add_child(tree.root(), Tag(2));

        tree.get_mut(a).uct = 0.3;
        tree.get_mut(b).uct = 0.9;
        tree.get_mut(tree.root()).children_sorted = false;

        assert_eq!(tree.best_child(tree.root()), Ok(b));

        // Flip the ordering and mark it stale again.
        tree.get_mut(a).uct = 2.0;
        tree.get_mut(tree.root()).children_sorted = false;
        assert_eq!(tree.best_child(tree.root()), Ok(a));
    }

    #[test]
    fn test_best_child_on_leaf_fails() {
        let mut tree = SearchTree::new(Tag(0));
        assert_eq!(tree.best_child(tree.root()), Err(TreeError::EmptyChildren));

        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(
            tree.random_child(tree.root(), &mut rng),
            Err(TreeError::EmptyChildren)
        );
        assert_eq!(
            tree.child_with_highest_reward(tree.root()),
            Err(TreeError::EmptyChildren)
        );
    }

    #[test]
    fn test_unvisited_child_outranks_visited() {
        let mut tree = SearchTree::new(Tag(0));
        let visited = tree.add_child(tree.root(), Tag(1));
        let fresh = tree.add_child(tree.root(), Tag(2));

        tree.get_mut(tree.root()).visit_count = 10;
        tree.get_mut(visited).visit_count = 9;
        tree.get_mut(visited).total_reward = 9.0; // perfect record
        tree.refresh_uct(visited, 0.707).unwrap();
        tree.refresh_uct(fresh, 0.707).unwrap();

        assert_eq!(tree.best_child(tree.root()), Ok(fresh));
    }

    #[test]
    fn test_refresh_uct_on_root_fails() {
        let mut tree = SearchTree::new(Tag(0));
        assert_eq!(
            tree.refresh_uct(tree.root(), 0.707),
            Err(TreeError::RootHasNoUct)
        );
    }

    #[test]
    fn test_refresh_uct_formula() {
        let mut tree = SearchTree::new(Tag(0));
        let child = tree.add_child(tree.root(), Tag(1));

        tree.get_mut(tree.root()).visit_count = 8;
        tree.get_mut(child).visit_count = 2;
        tree.get_mut(child).total_reward = 1.0;
        tree.refresh_uct(child, 0.707).unwrap();

        let expected = 0.5 + 0.707 * (2.0 * (8f64).ln() / 2.0).sqrt();
        assert!((tree.get(child).uct - expected).abs() < 1e-12);

        // The parent's cached ordering is invalidated by the refresh.
        assert!(!tree.get(tree.root()).children_sorted);
    }

    #[test]
    fn test_child_with_highest_reward_ignores_uct() {
        let mut tree = SearchTree::new(Tag(0));
        let a = tree.add_child(tree.root(), Tag(1));
        let b = tree.add_child(tree.root(), Tag(2));

        tree.get_mut(a).total_reward = 5.0;
        tree.get_mut(a).uct = 0.1;
        tree.get_mut(b).total_reward = 2.0;
        tree.get_mut(b).uct = 99.0;

        assert_eq!(tree.child_with_highest_reward(tree.root()), Ok(a));
    }

    #[test]
    fn test_find_child_by_state_value() {
        let mut tree = SearchTree::new(Tag(0));
        tree.add_child(tree.root(), Tag(1));
        let b = tree.add_child(tree.root(), Tag(2));

        assert_eq!(tree.find_child(tree.root(), &Tag(2)), Some(b));
        assert_eq!(tree.find_child(tree.root(), &Tag(7)), None);
    }

    #[test]
    fn test_cut_branch_frees_slots_for_reuse() {
        let mut tree = SearchTree::new(Tag(0));
        let a = tree.add_child(tree.root(), Tag(1));
        let a1 = tree.add_child(a, Tag(2));
        tree.add_child(a1, Tag(3));

        assert_eq!(tree.len(), 4);
        tree.get_mut(tree.root()).children.clear();
        tree.cut_branch(a);
        assert_eq!(tree.len(), 1);

        // New allocations reuse the freed slots instead of growing the arena.
        let fresh = tree.add_child(tree.root(), Tag(9));
        assert_eq!(tree.len(), 2);
        assert!((fresh.0 as usize) < 4);
    }

    #[test]
    fn test_prune_other_branches_keeps_statistics() {
        let mut tree = SearchTree::new(Tag(0));
        let keep = tree.add_child(tree.root(), Tag(1));
        let keep_grandchild = tree.add_child(keep, Tag(2));
        let other = tree.add_child(tree.root(), Tag(3));
        tree.add_child(other, Tag(4));

        tree.get_mut(keep).visit_count = 11;
        tree.get_mut(keep).total_reward = 3.5;
        tree.get_mut(keep_grandchild).visit_count = 6;

        tree.prune_other_branches(tree.root(), keep);

        assert_eq!(tree.len(), 3); // root + keep + grandchild
        assert_eq!(tree.get(tree.root()).children, vec![keep]);
        assert_eq!(tree.get(keep).visit_count, 11);
        assert_eq!(tree.get(keep).total_reward, 3.5);
        assert_eq!(tree.get(keep_grandchild).visit_count, 6);
    }

    #[test]
    fn test_reroot_releases_everything_outside_kept_subtree() {
        let mut tree = SearchTree::new(Tag(0));
        let keep = tree.add_child(tree.root(), Tag(1));
        let kept_child = tree.add_child(keep, Tag(2));
        let sibling = tree.add_child(tree.root(), Tag(3));
        tree.add_child(sibling, Tag(4));

        tree.get_mut(keep).visit_count = 5;

        tree.reroot(keep);

        assert_eq!(tree.root(), keep);
        assert_eq!(tree.len(), 2); // keep + kept_child
        assert!(tree.get(keep).parent.is_none());
        assert_eq!(tree.get(keep).visit_count, 5);
        assert_eq!(tree.get(keep).children, vec![kept_child]);
    }

    #[test]
    fn test_clear_releases_all_nodes() {
        let mut tree = SearchTree::new(Tag(0));
        let a = tree.add_child(tree.root(), Tag(1));
        tree.add_child(a, Tag(2));
        tree.add_child(tree.root(), Tag(3));

        tree.clear();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_clear_twice_is_harmless() {
        let mut tree = SearchTree::new(Tag(0));
        tree.add_child(tree.root(), Tag(1));

        tree.clear();
        tree.clear();

        assert!(tree.is_empty());
        assert!(tree.root().is_none());
    }
}
