//! MCTS tree node representation.
//!
//! Each node owns the game state it represents plus the visit and reward
//! statistics driving UCT selection. Topology lives in the arena indices:
//! `parent` is a non-owning back-reference, `children` the owned subtrees.

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct Node<S> {
    /// Parent node index (NONE for a root).
    pub parent: NodeId,

    /// Game state this node represents. Exclusively owned here.
    pub state: S,

    /// Number of backpropagation passes that have touched this node.
    pub visit_count: u32,

    /// Accumulated reward, signed for the player to move at the parent.
    pub total_reward: f64,

    /// Cached UCT score, meaningful only relative to siblings. Unvisited
    /// nodes score infinity so they are explored before any visited one.
    pub uct: f64,

    /// Child node indices. Empty while unexpanded or terminal. Held in
    /// ascending UCT order whenever `children_sorted` is true.
    pub children: Vec<NodeId>,

    /// Whether `children` is currently sorted by UCT. Any statistics update
    /// that can reorder siblings clears this.
    pub children_sorted: bool,

    /// Set once expansion has found the state to have no legal moves.
    pub terminal: bool,
}

impl<S> Node<S> {
    /// Create a root node for the given state.
    pub fn new_root(state: S) -> Self {
        Self {
            parent: NodeId::NONE,
            state,
            visit_count: 0,
            total_reward: 0.0,
            uct: f64::INFINITY,
            children: Vec::new(),
            children_sorted: true,
            terminal: false,
        }
    }

    /// Create a child of `parent` for the given state.
    pub fn new_child(parent: NodeId, state: S) -> Self {
        Self {
            parent,
            state,
            visit_count: 0,
            total_reward: 0.0,
            uct: f64::INFINITY,
            children: Vec::new(),
            children_sorted: true,
            terminal: false,
        }
    }

    /// Average reward per visit, 0.0 if never visited.
    #[inline]
    pub fn mean_reward(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.total_reward / self.visit_count as f64
        }
    }

    /// Whether this node currently has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = Node::new_root("state");

        assert!(node.parent.is_none());
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.total_reward, 0.0);
        assert!(node.uct.is_infinite());
        assert!(node.is_leaf());
        assert!(!node.terminal);
    }

    #[test]
    fn test_mean_reward() {
        let mut node = Node::new_root(());

        assert_eq!(node.mean_reward(), 0.0);

        node.visit_count = 4;
        node.total_reward = 2.0;
        assert!((node.mean_reward() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unvisited_uct_beats_any_visited_sibling() {
        let unvisited = Node::new_root(());
        let mut visited = Node::new_root(());
        visited.visit_count = 1;
        visited.uct = 1e9;

        assert!(unvisited.uct > visited.uct);
    }
}
