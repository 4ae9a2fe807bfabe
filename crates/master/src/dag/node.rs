//! Arena node holding one payload and its adjacency lists.

/// Handle of a node slot in the DAG arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(slot: usize) -> Self {
        Self(slot)
    }

    pub(crate) const fn slot(self) -> usize {
        self.0
    }
}

/// A DAG vertex.
///
/// Parent and child links are non-owning handles into the arena. The node does
/// no validation; the graph keeps both directions consistent.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    payload: T,
    parents: Vec<NodeId>,
    children: Vec<NodeId>,
}

impl<T> Node<T> {
    pub(crate) const fn new(payload: T) -> Self {
        Self {
            payload,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) const fn payload(&self) -> &T {
        &self.payload
    }

    pub(crate) fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn add_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn add_parent(&mut self, parent: NodeId) {
        self.parents.push(parent);
    }

    /// Remove the first occurrence of `child`. Returns whether it was present.
    pub(crate) fn remove_child(&mut self, child: NodeId) -> bool {
        match self.children.iter().position(|id| *id == child) {
            Some(position) => {
                self.children.remove(position);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_is_root_and_leaf() {
        let node = Node::new("a");
        assert_eq!(*node.payload(), "a");
        assert!(node.is_root());
        assert!(node.is_leaf());
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut node = Node::new("a");
        node.add_child(NodeId::new(3));
        node.add_child(NodeId::new(1));
        node.add_child(NodeId::new(2));
        assert_eq!(
            node.children(),
            &[NodeId::new(3), NodeId::new(1), NodeId::new(2)]
        );
    }

    #[test]
    fn test_remove_child_removes_first_occurrence_only() {
        let mut node = Node::new("a");
        node.add_child(NodeId::new(1));
        node.add_child(NodeId::new(2));
        node.add_child(NodeId::new(1));

        assert!(node.remove_child(NodeId::new(1)));
        assert_eq!(node.children(), &[NodeId::new(2), NodeId::new(1)]);
    }

    #[test]
    fn test_remove_absent_child_is_noop() {
        let mut node = Node::new("a");
        node.add_child(NodeId::new(1));
        assert!(!node.remove_child(NodeId::new(9)));
        assert_eq!(node.children(), &[NodeId::new(1)]);
    }

    #[test]
    fn test_add_parent_clears_root_status() {
        let mut node = Node::new("b");
        node.add_parent(NodeId::new(0));
        assert!(!node.is_root());
        assert_eq!(node.parents(), &[NodeId::new(0)]);
    }
}
