//! # Dependency DAG
//!
//! In-memory directed acyclic graph tracking dependencies between payloads
//! such as files, jobs or lineage records.
//!
//! A node's parents are fixed when it is added and must already be in the
//! graph, so a payload can never become its own ancestor and no cycle check is
//! needed. Nodes are removed one leaf at a time.
//!
//! Nodes live in a slot arena; parent and child links are slot handles into
//! it, and the payload index maps each payload to its slot.

mod error;
mod node;

use std::borrow::Borrow;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

use itertools::Itertools;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::trace;

pub use error::{DagError, DagResult};
use node::{Node, NodeId};

/// Directed acyclic graph over payloads of type `T`.
///
/// Single-owner and not internally synchronised: mutation takes `&mut self`.
#[derive(Debug, Clone)]
pub struct DependencyDAG<T> {
    /// Node arena. `None` marks a freed slot.
    nodes: Vec<Option<Node<T>>>,
    /// Freed slots available for reuse.
    free: Vec<NodeId>,
    /// Payload to slot, one entry per live node.
    index: HashMap<T, NodeId>,
    /// Nodes without parents, in insertion order.
    roots: Vec<NodeId>,
}

impl<T> DependencyDAG<T> {
    /// Create a new empty DAG
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_master::dag::DependencyDAG;
    ///
    /// let dag: DependencyDAG<String> = DependencyDAG::new();
    /// assert!(dag.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            roots: Vec::new(),
        }
    }

    /// Number of payloads in the DAG.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of parent-child edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.live_nodes().map(|(_, node)| node.children().len()).sum()
    }

    /// Iterate over every payload, in no particular order.
    pub fn payloads(&self) -> impl Iterator<Item = &T> {
        self.live_nodes().map(|(_, node)| node.payload())
    }

    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.slot()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.nodes.get_mut(id.slot()).and_then(Option::as_mut)
    }

    fn live_nodes(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(slot, node)| node.as_ref().map(|node| (NodeId::new(slot), node)))
    }

    fn payloads_of<'a>(&'a self, ids: &'a [NodeId]) -> impl Iterator<Item = &'a T> + 'a {
        ids.iter()
            .filter_map(|id| self.node(*id).map(Node::payload))
    }

    fn allocate(&mut self, node: Node<T>) -> NodeId {
        if let Some(id) = self.free.pop() {
            if let Some(slot) = self.nodes.get_mut(id.slot()) {
                *slot = Some(node);
                return id;
            }
        }
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Some(node));
        id
    }

    fn release(&mut self, id: NodeId) -> Option<Node<T>> {
        let node = self.nodes.get_mut(id.slot()).and_then(Option::take)?;
        self.free.push(id);
        Some(node)
    }
}

impl<T: Clone + Eq + Hash> DependencyDAG<T> {
    /// Add a node carrying `payload` that depends on `parents`.
    ///
    /// With no parents the node becomes a root. All parents are checked
    /// before anything is linked, so a failed call leaves the graph
    /// unchanged. A parent listed twice is linked once.
    ///
    /// # Errors
    ///
    /// * `DagError::DuplicatePayload` if `payload` is already in the DAG
    /// * `DagError::MissingParent` naming the first parent not in the DAG
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_master::dag::DependencyDAG;
    ///
    /// let mut dag = DependencyDAG::new();
    /// dag.add("raw", &[]).unwrap();
    /// dag.add("clean", &["raw"]).unwrap();
    /// assert_eq!(dag.children("raw"), vec!["clean"]);
    /// ```
    pub fn add(&mut self, payload: T, parents: &[T]) -> DagResult<(), T> {
        if self.index.contains_key(&payload) {
            return Err(DagError::duplicate_payload(payload));
        }

        let parent_ids = parents
            .iter()
            .map(|parent| {
                self.index
                    .get(parent)
                    .copied()
                    .ok_or_else(|| DagError::missing_parent(payload.clone(), parent.clone()))
            })
            .collect::<DagResult<Vec<NodeId>, T>>()?
            .into_iter()
            .unique()
            .collect::<Vec<_>>();

        let mut node = Node::new(payload.clone());
        for parent in &parent_ids {
            node.add_parent(*parent);
        }
        let id = self.allocate(node);
        self.index.insert(payload, id);

        if parent_ids.is_empty() {
            self.roots.push(id);
        }
        for parent in parent_ids {
            if let Some(parent_node) = self.node_mut(parent) {
                parent_node.add_child(id);
            }
        }

        trace!(nodes = self.len(), roots = self.roots.len(), "added DAG node");
        Ok(())
    }

    /// Delete the leaf node carrying `payload`.
    ///
    /// The node is unlinked from each parent's children and dropped from the
    /// roots if it had no parents.
    ///
    /// # Errors
    ///
    /// * `DagError::NotFound` if `payload` is not in the DAG
    /// * `DagError::NotLeaf` if the node still has children
    pub fn delete_leaf(&mut self, payload: &T) -> DagResult<(), T> {
        let id = self
            .index
            .get(payload)
            .copied()
            .ok_or_else(|| DagError::not_found(payload.clone()))?;

        if let Some(node) = self.node(id).filter(|node| !node.is_leaf()) {
            return Err(DagError::not_leaf(payload.clone(), node.children().len()));
        }

        let node = self
            .release(id)
            .ok_or_else(|| DagError::not_found(payload.clone()))?;
        for parent in node.parents() {
            if let Some(parent_node) = self.node_mut(*parent) {
                parent_node.remove_child(id);
            }
        }
        self.index.remove(payload);
        if node.is_root() {
            self.roots.retain(|root| *root != id);
        }

        trace!(nodes = self.len(), roots = self.roots.len(), "deleted DAG leaf");
        Ok(())
    }

    /// Whether a node carries `payload`.
    pub fn contains<Q>(&self, payload: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(payload)
    }

    /// Payloads of the children of `payload`, in the order they were added.
    ///
    /// Returns an empty list if `payload` is not in the DAG.
    pub fn children<Q>(&self, payload: &Q) -> Vec<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup(payload)
            .map(|node| self.payloads_of(node.children()).cloned().collect())
            .unwrap_or_default()
    }

    /// Payloads of the parents of `payload`, in the order given to [`add`](Self::add).
    ///
    /// Returns an empty list if `payload` is not in the DAG.
    pub fn parents<Q>(&self, payload: &Q) -> Vec<T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup(payload)
            .map(|node| self.payloads_of(node.parents()).cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `payload` is in the DAG and has no parents.
    pub fn is_root<Q>(&self, payload: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(payload)
            .is_some_and(|id| self.roots.contains(id))
    }

    /// Root payloads in insertion order.
    #[must_use]
    pub fn roots(&self) -> Vec<T> {
        self.payloads_of(&self.roots).cloned().collect()
    }

    /// Order `payloads` so that every payload comes after all of its ancestors
    /// that are also in `payloads`.
    ///
    /// Uses Kahn's algorithm seeded with the roots in insertion order. A node
    /// is released once all of its parents have been visited; siblings are
    /// released in child order. Duplicate requests are emitted once.
    ///
    /// # Errors
    ///
    /// Returns `DagError::IncompleteSelection` listing every requested payload
    /// that is not in the DAG or was not reached from the roots.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_master::dag::DependencyDAG;
    ///
    /// let mut dag = DependencyDAG::new();
    /// dag.add("a", &[]).unwrap();
    /// dag.add("b", &["a"]).unwrap();
    /// dag.add("c", &["b"]).unwrap();
    /// assert_eq!(dag.sort_topologically(&["c", "a"]).unwrap(), vec!["a", "c"]);
    /// ```
    pub fn sort_topologically<'a, I>(&self, payloads: I) -> DagResult<Vec<T>, T>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let requested: Vec<&T> = payloads.into_iter().collect();

        let missing: Vec<T> = requested
            .iter()
            .filter(|payload| !self.index.contains_key(**payload))
            .unique()
            .map(|payload| (*payload).clone())
            .collect();
        if !missing.is_empty() {
            return Err(DagError::incomplete_selection(missing));
        }

        let mut pending: HashSet<NodeId> = requested
            .iter()
            .filter_map(|payload| self.index.get(*payload).copied())
            .collect();
        let mut order = Vec::with_capacity(pending.len());

        let mut unvisited_parents: Vec<usize> = self
            .nodes
            .iter()
            .map(|slot| slot.as_ref().map_or(0, |node| node.parents().len()))
            .collect();
        let mut queue: VecDeque<NodeId> = self.roots.iter().copied().collect();

        while !pending.is_empty() {
            let Some(id) = queue.pop_front() else {
                break;
            };
            let Some(node) = self.node(id) else {
                continue;
            };

            if pending.remove(&id) {
                order.push(node.payload().clone());
            }

            for child in node.children() {
                if let Some(count) = unvisited_parents.get_mut(child.slot()) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        queue.push_back(*child);
                    }
                }
            }
        }

        if pending.is_empty() {
            Ok(order)
        } else {
            let unreached = pending
                .into_iter()
                .sorted()
                .filter_map(|id| self.node(id).map(|node| node.payload().clone()))
                .collect();
            Err(DagError::incomplete_selection(unreached))
        }
    }

    /// Every payload in topological order.
    ///
    /// # Errors
    ///
    /// Returns `DagError::IncompleteSelection` only if the graph's internal
    /// links are inconsistent.
    pub fn all_in_topological_order(&self) -> DagResult<Vec<T>, T> {
        self.sort_topologically(self.index.keys())
    }

    /// Snapshot as a `petgraph` graph with parent-to-child edges.
    ///
    /// Useful for DOT rendering and for running `petgraph` algorithms.
    #[must_use]
    pub fn to_digraph(&self) -> DiGraph<T, ()> {
        let mut graph = DiGraph::with_capacity(self.len(), self.edge_count());
        let mapped: HashMap<NodeId, NodeIndex> = self
            .live_nodes()
            .map(|(id, node)| (id, graph.add_node(node.payload().clone())))
            .collect();

        for (id, node) in self.live_nodes() {
            for child in node.children() {
                if let (Some(from), Some(to)) = (mapped.get(&id), mapped.get(child)) {
                    graph.add_edge(*from, *to, ());
                }
            }
        }
        graph
    }

    fn lookup<Q>(&self, payload: &Q) -> Option<&Node<T>>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(payload).and_then(|id| self.node(*id))
    }
}

impl<T> Default for DependencyDAG<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    fn diamond() -> DependencyDAG<&'static str> {
        let mut dag = DependencyDAG::new();
        dag.add("A", &[]).expect("add A");
        dag.add("B", &["A"]).expect("add B");
        dag.add("C", &["A"]).expect("add C");
        dag.add("D", &["B", "C"]).expect("add D");
        dag
    }

    #[test]
    fn test_new_dag_is_empty() {
        let dag: DependencyDAG<String> = DependencyDAG::new();
        assert!(dag.is_empty());
        assert_eq!(dag.len(), 0);
        assert_eq!(dag.edge_count(), 0);
        assert!(dag.roots().is_empty());
        assert_eq!(dag.all_in_topological_order().unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_diamond_round_trip() {
        let dag = diamond();
        assert_eq!(dag.roots(), vec!["A"]);
        assert_eq!(dag.children(&"A"), vec!["B", "C"]);
        assert_eq!(dag.parents(&"D"), vec!["B", "C"]);
        assert_eq!(dag.edge_count(), 4);
        assert_eq!(dag.all_in_topological_order().unwrap(), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_delete_then_reject() {
        let mut dag = diamond();

        assert_eq!(
            dag.delete_leaf(&"A"),
            Err(DagError::NotLeaf {
                payload: "A",
                children: 2
            })
        );
        dag.delete_leaf(&"D").unwrap();
        dag.delete_leaf(&"B").unwrap();

        assert_eq!(dag.children(&"A"), vec!["C"]);
        assert!(!dag.contains(&"B"));
        assert!(!dag.contains(&"D"));
        assert_eq!(dag.len(), 2);
    }

    #[test]
    fn test_missing_parent_leaves_graph_unchanged() {
        let mut dag = diamond();

        let result = dag.add("E", &["A", "Z"]);

        assert_eq!(result, Err(DagError::missing_parent("E", "Z")));
        assert!(!dag.contains(&"E"));
        assert_eq!(dag.children(&"A"), vec!["B", "C"]);
        assert_eq!(dag.len(), 4);
    }

    #[test]
    fn test_duplicate_parent_linked_once() {
        let mut dag = DependencyDAG::new();
        dag.add("A", &[]).unwrap();
        dag.add("B", &["A", "A"]).unwrap();

        assert_eq!(dag.children(&"A"), vec!["B"]);
        assert_eq!(dag.parents(&"B"), vec!["A"]);

        dag.delete_leaf(&"B").unwrap();
        assert!(dag.children(&"A").is_empty());
    }

    #[test]
    fn test_self_parent_is_missing_parent() {
        let mut dag = DependencyDAG::new();
        assert_eq!(dag.add("A", &["A"]), Err(DagError::missing_parent("A", "A")));
        assert!(dag.is_empty());
    }

    #[test]
    fn test_deleted_root_leaves_roots() {
        let mut dag = DependencyDAG::new();
        dag.add("X", &[]).unwrap();
        dag.add("Y", &[]).unwrap();
        dag.delete_leaf(&"X").unwrap();

        assert_eq!(dag.roots(), vec!["Y"]);
        assert!(!dag.is_root(&"X"));
    }

    #[test]
    fn test_freed_slot_is_reused_without_stale_links() {
        let mut dag = DependencyDAG::new();
        dag.add("A", &[]).unwrap();
        dag.add("B", &["A"]).unwrap();
        dag.delete_leaf(&"B").unwrap();
        dag.add("C", &[]).unwrap();

        assert_eq!(dag.nodes.len(), 2, "slot of B should be reused");
        assert!(dag.children(&"A").is_empty());
        assert!(dag.parents(&"C").is_empty());
        assert_eq!(dag.roots(), vec!["A", "C"]);
        assert_eq!(dag.all_in_topological_order().unwrap(), vec!["A", "C"]);
    }

    #[test]
    fn test_unequal_depth_parents_still_ordered() {
        // A -> B -> C and A -> C: C must wait for B even though A releases it first.
        let mut dag = DependencyDAG::new();
        dag.add("A", &[]).unwrap();
        dag.add("B", &["A"]).unwrap();
        dag.add("C", &["A", "B"]).unwrap();

        assert_eq!(dag.all_in_topological_order().unwrap(), vec!["A", "B", "C"]);
        assert_eq!(dag.sort_topologically(&["C", "B"]).unwrap(), vec!["B", "C"]);
    }

    #[test]
    fn test_sort_rejects_unknown_payloads() {
        let dag = diamond();
        let result = dag.sort_topologically(&["B", "Q", "Q"]);
        assert_eq!(result, Err(DagError::IncompleteSelection(vec!["Q"])));
    }

    #[test]
    fn test_sort_deduplicates_requests() {
        let dag = diamond();
        assert_eq!(dag.sort_topologically(&["D", "A", "D"]).unwrap(), vec!["A", "D"]);
    }

    #[test]
    fn test_lookup_by_borrowed_form() {
        let mut dag: DependencyDAG<String> = DependencyDAG::new();
        dag.add("root".to_string(), &[]).unwrap();
        dag.add("leaf".to_string(), &["root".to_string()]).unwrap();

        assert!(dag.contains("root"));
        assert!(dag.is_root("root"));
        assert_eq!(dag.children("root"), vec!["leaf".to_string()]);
        assert!(dag.children("absent").is_empty());
        assert!(dag.parents("absent").is_empty());
        assert!(!dag.is_root("absent"));
    }

    #[test]
    fn test_to_digraph_mirrors_edges() {
        let graph = diamond().to_digraph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert!(!petgraph::algo::is_cyclic_directed(&graph));
    }
}
