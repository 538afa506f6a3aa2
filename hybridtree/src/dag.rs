use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

use petgraph::prelude::{Direction, EdgeRef, NodeIndex};

use crate::constituent::VROOT;
use crate::{Constituents, Edge, HybridTree};

/// `HybridDag`
///
/// A `HybridTree` whose nodes may additionally have labelled secondary parents. Primary and
/// secondary edges together are expected to form a DAG.
///
/// Equality and hashing only consider the primary structure.
#[derive(Clone, Debug, Default)]
pub struct HybridDag {
    tree: HybridTree,
    sec_parents: HashMap<NodeIndex, Vec<NodeIndex>>,
}

impl HybridDag {
    pub fn new(sent_label: impl Into<String>) -> Self {
        HybridDag {
            tree: HybridTree::new(sent_label),
            sec_parents: HashMap::new(),
        }
    }

    /// Add a secondary edge labelled `label` from `parent` to `child`.
    ///
    /// Secondary children are kept in order of addition, secondary parents are recorded once.
    pub fn add_sec_child(&mut self, parent: &str, child: &str, label: impl Into<String>) {
        let parent = self.tree.handle(parent);
        let child = self.tree.handle(child);
        let rank = self.sec_edges(parent).len();
        self.tree
            .graph_mut()
            .add_edge(parent, child, Edge::Secondary(rank, label.into()));
        let parents = self.sec_parents.entry(child).or_insert_with(Vec::new);
        if !parents.contains(&parent) {
            parents.push(parent);
        }
    }

    // outgoing secondary edges as (child, label), ordered by rank
    fn sec_edges(&self, node: NodeIndex) -> Vec<(NodeIndex, &str)> {
        let mut edges = self
            .tree
            .graph()
            .edges_directed(node, Direction::Outgoing)
            .filter_map(|edge_ref| match edge_ref.weight() {
                Edge::Secondary(rank, label) => Some((*rank, edge_ref.target(), label.as_str())),
                Edge::Primary(_) => None,
            })
            .collect::<Vec<_>>();
        edges.sort();
        edges
            .into_iter()
            .map(|(_, child, label)| (child, label))
            .collect()
    }

    /// Get the secondary children of `node`.
    pub fn sec_children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.sec_edges(node)
            .into_iter()
            .map(|(child, _)| child)
            .collect()
    }

    /// Get the labels of the secondary edges to `node`'s secondary children.
    pub fn sec_child_edge_labels(&self, node: NodeIndex) -> Vec<&str> {
        self.sec_edges(node)
            .into_iter()
            .map(|(_, label)| label)
            .collect()
    }

    /// Get the secondary parents of `node`.
    pub fn sec_parents(&self, node: NodeIndex) -> &[NodeIndex] {
        self.sec_parents
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Get the label of the first secondary edge from `parent` to `child`.
    pub fn sec_edge_label(&self, parent: NodeIndex, child: NodeIndex) -> Option<&str> {
        self.sec_edges(parent)
            .into_iter()
            .find(|&(target, _)| target == child)
            .map(|(_, label)| label)
    }

    /// Get a topological order of the nodes.
    ///
    /// A node follows all of its primary and secondary children, with `reverse` the order is
    /// reversed to start at the roots. Returns `None` if the edges contain a cycle.
    pub fn topological_order(&self, reverse: bool) -> Option<Vec<NodeIndex>> {
        let mut order = Vec::with_capacity(self.nodes().len());
        let mut added = HashSet::new();
        let mut changed = true;
        while changed {
            changed = false;
            for &node in self.nodes() {
                if added.contains(&node) {
                    continue;
                }
                if self
                    .children(node)
                    .into_iter()
                    .chain(self.sec_children(node))
                    .all(|child| added.contains(&child))
                {
                    added.insert(node);
                    order.push(node);
                    changed = true;
                }
            }
        }
        if added.len() != self.nodes().len() {
            return None;
        }
        if reverse {
            order.reverse();
        }
        Some(order)
    }

    pub fn into_inner(self) -> HybridTree {
        self.tree
    }
}

impl From<HybridTree> for HybridDag {
    fn from(tree: HybridTree) -> Self {
        HybridDag {
            tree,
            sec_parents: HashMap::new(),
        }
    }
}

impl Deref for HybridDag {
    type Target = HybridTree;

    fn deref(&self) -> &HybridTree {
        &self.tree
    }
}

impl DerefMut for HybridDag {
    fn deref_mut(&mut self) -> &mut HybridTree {
        &mut self.tree
    }
}

impl Constituents for HybridDag {
    fn strip_vroot(&mut self) {
        if let Some(old_root) = self.tree.splice_root(VROOT) {
            self.sec_parents.remove(&old_root);
            for parents in self.sec_parents.values_mut() {
                parents.retain(|&parent| parent != old_root);
            }
        }
    }
}

impl fmt::Display for HybridDag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}

impl PartialEq for HybridDag {
    fn eq(&self, other: &HybridDag) -> bool {
        self.tree == other.tree
    }
}

impl Eq for HybridDag {}

impl Hash for HybridDag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tree.hash(state)
    }
}

#[cfg(test)]
mod tests {
    use super::HybridDag;
    use crate::{ConstituentTerminal, Constituents};

    // (S (NP a) (VP b)) with a secondary edge VP -OA-> NP
    fn dag() -> HybridDag {
        let mut dag = HybridDag::new("1");
        dag.add_leaf("a", ConstituentTerminal::new("a", "A"));
        dag.add_leaf("b", ConstituentTerminal::new("b", "B"));
        dag.set_label("NP", "NP");
        dag.set_label("VP", "VP");
        dag.set_label("S", "S");
        dag.add_to_root("S");
        dag.add_child("S", "NP");
        dag.add_child("S", "VP");
        dag.add_child("NP", "a");
        dag.add_child("VP", "b");
        dag.add_sec_child("VP", "NP", "OA");
        dag
    }

    fn ids<'a>(dag: &'a HybridDag, nodes: &[petgraph::prelude::NodeIndex]) -> Vec<&'a str> {
        nodes.iter().map(|&node| dag.node_id(node)).collect()
    }

    #[test]
    fn secondary_edges() {
        let mut dag = dag();
        let np = dag.node("NP").unwrap();
        let vp = dag.node("VP").unwrap();
        let s = dag.node("S").unwrap();
        assert_eq!(dag.sec_children(vp), vec![np]);
        assert_eq!(dag.sec_child_edge_labels(vp), vec!["OA"]);
        assert_eq!(dag.sec_parents(np), &[vp]);
        assert_eq!(dag.sec_edge_label(vp, np), Some("OA"));
        assert_eq!(dag.sec_edge_label(s, np), None);
        assert!(dag.sec_children(s).is_empty());
        assert!(dag.sec_parents(s).is_empty());
        // secondary edges are not primary parents
        assert!(!dag.reentrant());

        dag.add_sec_child("S", "NP", "SB");
        dag.add_sec_child("VP", "NP", "OA");
        assert_eq!(dag.sec_parents(np), &[vp, s]);
        assert_eq!(dag.sec_children(vp), vec![np, np]);
        assert_eq!(dag.sec_child_edge_labels(vp), vec!["OA", "OA"]);
    }

    #[test]
    fn topological_order() {
        let dag = dag();
        let order = dag.topological_order(false).unwrap();
        assert_eq!(ids(&dag, &order), vec!["a", "b", "NP", "VP", "S"]);
        let reversed = dag.topological_order(true).unwrap();
        assert_eq!(ids(&dag, &reversed), vec!["S", "VP", "NP", "b", "a"]);

        for (position, &node) in order.iter().enumerate() {
            for child in dag.children(node).into_iter().chain(dag.sec_children(node)) {
                assert!(order[..position].contains(&child));
            }
        }
    }

    #[test]
    fn topological_order_secondary_dependency() {
        // the secondary child NP is added after its secondary parent VP
        let mut dag = HybridDag::new("2");
        dag.add_leaf("b", ConstituentTerminal::new("b", "B"));
        dag.set_label("VP", "VP");
        dag.add_leaf("a", ConstituentTerminal::new("a", "A"));
        dag.set_label("NP", "NP");
        dag.add_to_root("VP");
        dag.add_to_root("NP");
        dag.add_child("VP", "b");
        dag.add_child("NP", "a");
        dag.add_sec_child("VP", "NP", "OA");
        let order = dag.topological_order(false).unwrap();
        assert_eq!(ids(&dag, &order), vec!["b", "a", "NP", "VP"]);
    }

    #[test]
    fn cycle() {
        let mut dag = dag();
        dag.add_sec_child("NP", "VP", "X");
        assert_eq!(dag.topological_order(false), None);

        let mut dag = HybridDag::new("3");
        dag.set_label("A", "A");
        dag.set_label("B", "B");
        dag.add_to_root("A");
        dag.add_to_root("B");
        dag.add_sec_child("A", "B", "x");
        dag.add_sec_child("B", "A", "y");
        assert_eq!(dag.topological_order(true), None);
    }

    #[test]
    fn labelled_spans_and_vroot() {
        let mut dag = HybridDag::new("4");
        dag.add_leaf("a", ConstituentTerminal::new("a", "A"));
        dag.set_label("0", "VROOT");
        dag.set_label("X", "X");
        dag.add_to_root("0");
        dag.add_child("0", "X");
        dag.add_child("X", "a");
        dag.add_sec_child("0", "a", "SEC");
        assert_eq!(dag.labelled_spans().len(), 2);
        dag.strip_vroot();
        let a = dag.node("a").unwrap();
        assert!(dag.sec_parents(a).is_empty());
        assert_eq!(dag.root(), vec![dag.node("X").unwrap()]);
        assert_eq!(dag.labelled_spans().len(), 1);
        assert!(dag.topological_order(false).is_some());
    }

    #[test]
    fn equality_ignores_secondary_edges() {
        let mut with_edge = dag();
        let without_edge = {
            let mut dag = HybridDag::new("1");
            dag.add_leaf("a", ConstituentTerminal::new("a", "A"));
            dag.add_leaf("b", ConstituentTerminal::new("b", "B"));
            dag.set_label("NP", "NP");
            dag.set_label("VP", "VP");
            dag.set_label("S", "S");
            dag.add_to_root("S");
            dag.add_child("S", "NP");
            dag.add_child("S", "VP");
            dag.add_child("NP", "a");
            dag.add_child("VP", "b");
            dag
        };
        assert_eq!(with_edge, without_edge);
        with_edge.reorder();
        assert_eq!(with_edge, without_edge);
    }
}
