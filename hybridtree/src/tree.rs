use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut};

use failure::Error;
use petgraph::prelude::{Direction, EdgeIndex, EdgeRef, NodeIndex, StableGraph};

use crate::util::join_spans;
use crate::{Edge, Node, Token};

/// Identifier of the virtual root.
///
/// The virtual root is not registered under its identifier, corpus nodes may use the same string
/// without aliasing it.
pub static VIRTUAL_ROOT: &str = "VROOT";

/// Recursive decomposition of a yield.
///
/// Each `Partitioning` holds the positions covered by a node and the partitionings of its
/// children, sorted by their smallest position.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Partitioning {
    positions: BTreeSet<usize>,
    children: Vec<Partitioning>,
}

impl Partitioning {
    pub fn new(positions: BTreeSet<usize>, children: Vec<Partitioning>) -> Self {
        Partitioning {
            positions,
            children,
        }
    }

    /// Partitioning of a single position without children.
    pub fn leaf(position: usize) -> Self {
        let mut positions = BTreeSet::new();
        positions.insert(position);
        Partitioning::new(positions, Vec::new())
    }

    pub fn positions(&self) -> &BTreeSet<usize> {
        &self.positions
    }

    pub fn children(&self) -> &[Partitioning] {
        &self.children
    }

    fn first_position(&self) -> Option<usize> {
        self.positions.iter().next().cloned()
    }
}

/// `HybridTree`
///
/// A directed graph of `Node`s where a (not necessarily strict) subset of the nodes is linearly
/// ordered. Every node has at most one primary parent, the parentless nodes are children of a
/// virtual root.
///
/// Nodes are built up through their corpus identifiers (`add_node`, `add_child`), queries take the
/// `NodeIndex` handles returned by `node` and the structural methods.
#[derive(Clone, Debug)]
pub struct HybridTree {
    sent_label: Option<String>,
    graph: StableGraph<Node, Edge>,
    ids: HashMap<String, NodeIndex>,
    virtual_root: NodeIndex,
    parents: HashMap<NodeIndex, NodeIndex>,
    nodes: Vec<NodeIndex>,
    ordering: Vec<NodeIndex>,
    full_yield: Vec<NodeIndex>,
}

impl Default for HybridTree {
    fn default() -> Self {
        HybridTree::with_label(None)
    }
}

impl HybridTree {
    /// Construct an empty `HybridTree` named `sent_label`.
    pub fn new(sent_label: impl Into<String>) -> Self {
        HybridTree::with_label(Some(sent_label.into()))
    }

    fn with_label(sent_label: Option<String>) -> Self {
        let mut graph = StableGraph::new();
        let virtual_root = graph.add_node(Node::new(VIRTUAL_ROOT));
        HybridTree {
            sent_label,
            graph,
            ids: HashMap::new(),
            virtual_root,
            parents: HashMap::new(),
            nodes: Vec::new(),
            ordering: Vec::new(),
            full_yield: Vec::new(),
        }
    }

    /// Get the name of the sentence.
    pub fn sent_label(&self) -> Option<&str> {
        self.sent_label.as_ref().map(String::as_str)
    }

    /// Rename the sentence, return the old name.
    pub fn set_sent_label(&mut self, sent_label: impl Into<String>) -> Option<String> {
        self.sent_label.replace(sent_label.into())
    }

    /// Get the index of the virtual root.
    pub fn virtual_root(&self) -> NodeIndex {
        self.virtual_root
    }

    /// Get the index of the node with corpus identifier `id`.
    pub fn node(&self, id: &str) -> Option<NodeIndex> {
        self.ids.get(id).cloned()
    }

    /// Get the corpus identifier of `node`.
    pub fn node_id(&self, node: NodeIndex) -> &str {
        self.graph[node].id()
    }

    /// Get the token of `node`.
    ///
    /// Returns `None` for the virtual root and nodes that were never added.
    pub fn token(&self, node: NodeIndex) -> Option<&Token> {
        self.graph.node_weight(node).and_then(Node::token)
    }

    /// Get the token of `node` mutably.
    pub fn token_mut(&mut self, node: NodeIndex) -> Option<&mut Token> {
        self.graph.node_weight_mut(node).and_then(Node::token_mut)
    }

    /// Get an immutable reference to the underlying `StableGraph`.
    pub fn graph(&self) -> &StableGraph<Node, Edge> {
        &self.graph
    }

    /// Get a mutable reference to the underlying `StableGraph`.
    pub(crate) fn graph_mut(&mut self) -> &mut StableGraph<Node, Edge> {
        &mut self.graph
    }

    // get the node registered under id, allocate it on first mention
    pub(crate) fn handle(&mut self, id: &str) -> NodeIndex {
        if let Some(node) = self.ids.get(id) {
            return *node;
        }
        let node = self.graph.add_node(Node::new(id));
        self.ids.insert(id.to_owned(), node);
        node
    }

    /// Add a node.
    ///
    /// The order of calls defines the linear order: with `in_ordering` the node is appended to the
    /// full yield, with `connected` additionally to the ordering. Setting `in_ordering` without
    /// `connected` adds a token (e.g. punctuation) that appears in the yield but is ignored by the
    /// structural queries.
    ///
    /// Reusing an identifier replaces the token and appends the node to the yields again.
    pub fn add_node(
        &mut self,
        id: &str,
        token: Token,
        in_ordering: bool,
        connected: bool,
    ) -> NodeIndex {
        let node = self.handle(id);
        if self.graph[node].set_token(token).is_none() {
            self.nodes.push(node);
        }
        if in_ordering {
            if connected {
                self.ordering.push(node);
            }
            self.full_yield.push(node);
        }
        node
    }

    /// Make `child` the last child of `parent`.
    ///
    /// The primary parent of `child` is overwritten if it was already attached. The child lists of
    /// earlier parents are left untouched, so a re-attached node stays listed there.
    pub fn add_child(&mut self, parent: &str, child: &str) {
        let parent = self.handle(parent);
        let child = self.handle(child);
        self.attach(parent, child);
    }

    /// Make `id` the last child of the virtual root.
    pub fn add_to_root(&mut self, id: &str) {
        let root = self.virtual_root;
        let child = self.handle(id);
        self.attach(root, child);
    }

    pub(crate) fn attach(&mut self, parent: NodeIndex, child: NodeIndex) {
        let rank = self.primary_edges(parent).len();
        self.graph.add_edge(parent, child, Edge::Primary(rank));
        self.parents.insert(child, parent);
    }

    // outgoing primary edges and their targets, ordered by rank
    fn primary_edges(&self, node: NodeIndex) -> Vec<(EdgeIndex, NodeIndex)> {
        let mut edges = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .filter(|edge_ref| edge_ref.weight().is_primary())
            .map(|edge_ref| (edge_ref.weight().rank(), edge_ref.id(), edge_ref.target()))
            .collect::<Vec<_>>();
        edges.sort();
        edges
            .into_iter()
            .map(|(_, edge, target)| (edge, target))
            .collect()
    }

    /// Get the children of the virtual root.
    pub fn root(&self) -> Vec<NodeIndex> {
        self.children(self.virtual_root)
    }

    /// Get the primary parent of `node`.
    ///
    /// Returns `None` if the node is a root or unattached.
    pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
        self.parents
            .get(&node)
            .cloned()
            .filter(|&parent| parent != self.virtual_root)
    }

    /// Get the children of `node` in order.
    pub fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.primary_edges(node)
            .into_iter()
            .map(|(_, child)| child)
            .collect()
    }

    /// Get all transitive children of `node` in pre-order, excluding `node`.
    pub fn descendants(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut descendants = Vec::new();
        for child in self.children(node) {
            descendants.push(child);
            descendants.extend(self.descendants(child));
        }
        descendants
    }

    /// Returns whether some node is the child of two distinct nodes.
    pub fn reentrant(&self) -> bool {
        self.graph.node_indices().any(|node| {
            self.graph
                .edges_directed(node, Direction::Incoming)
                .filter(|edge_ref| edge_ref.weight().is_primary())
                .map(|edge_ref| edge_ref.source())
                .collect::<HashSet<_>>()
                .len()
                > 1
        })
    }

    /// Returns whether `node` is in the ordering.
    pub fn in_ordering(&self, node: NodeIndex) -> bool {
        self.ordering.contains(&node)
    }

    /// Returns whether `node` is in the full yield but not in the ordering.
    pub fn disconnected(&self, node: NodeIndex) -> bool {
        self.full_yield.contains(&node) && !self.in_ordering(node)
    }

    /// Get the node at the 1-based `index` of the ordering.
    pub fn index_node(&self, index: usize) -> Option<NodeIndex> {
        index
            .checked_sub(1)
            .and_then(|index| self.ordering.get(index))
            .cloned()
    }

    /// Get the 0-based position of `node` in the ordering.
    pub fn node_index(&self, node: NodeIndex) -> Option<usize> {
        self.ordering.iter().position(|&other| other == node)
    }

    /// Get the 0-based position of `node` in the full yield.
    pub fn node_index_full(&self, node: NodeIndex) -> Option<usize> {
        self.full_yield.iter().position(|&other| other == node)
    }

    /// Sort the children of every node by the smallest position in their subtree.
    ///
    /// Children without ordered descendants come first. The sort is stable, reordering an ordered
    /// tree leaves it unchanged.
    pub fn reorder(&mut self) {
        let root = self.virtual_root;
        self.reorder_below(root);
    }

    // returns the smallest position below node
    fn reorder_below(&mut self, node: NodeIndex) -> Option<usize> {
        let edges = self.primary_edges(node);
        let mut keyed = Vec::with_capacity(edges.len());
        for (edge, child) in edges {
            keyed.push((self.reorder_below(child), edge));
        }
        keyed.sort_by_key(|&(min_index, _)| min_index);
        for (rank, &(_, edge)) in keyed.iter().enumerate() {
            self.graph[edge] = Edge::Primary(rank);
        }
        keyed
            .into_iter()
            .filter_map(|(min_index, _)| min_index)
            .chain(self.node_index(node))
            .min()
    }

    /// Get the positions of all ordered nodes below `node`, including `node`, in pre-order.
    pub fn fringe(&self, node: NodeIndex) -> Vec<usize> {
        let mut fringe = self.node_index(node).into_iter().collect::<Vec<_>>();
        for child in self.children(node) {
            fringe.extend(self.fringe(child));
        }
        fringe
    }

    /// Get the number of contiguous spans covered by `node`.
    ///
    /// A node with empty fringe has no span.
    pub fn n_spans(&self, node: NodeIndex) -> usize {
        join_spans(&self.fringe(node)).len()
    }

    /// Get the maximum number of spans of any node, `1` for trees without nodes.
    pub fn max_n_spans(&self) -> usize {
        self.nodes
            .iter()
            .map(|&node| self.n_spans(node))
            .max()
            .unwrap_or(1)
    }

    /// Get the total number of gaps.
    pub fn n_gaps(&self) -> usize {
        self.n_gaps_below(self.virtual_root)
    }

    fn n_gaps_below(&self, node: NodeIndex) -> usize {
        self.children(node)
            .into_iter()
            .fold(self.n_spans(node).saturating_sub(1), |n_gaps, child| {
                n_gaps + self.n_gaps_below(child)
            })
    }

    fn positions_below(&self, node: NodeIndex) -> BTreeSet<usize> {
        self.fringe(node).into_iter().collect()
    }

    /// Decompose the yield along the tree, leaving out ordered nodes as separate parts.
    ///
    /// Nodes with a single child covering the same positions are skipped.
    pub fn unlabelled_structure(&self) -> Partitioning {
        self.unlabelled_structure_below(self.virtual_root)
    }

    fn unlabelled_structure_below(&self, node: NodeIndex) -> Partitioning {
        let positions = self.positions_below(node);
        let mut children = self
            .children(node)
            .into_iter()
            .map(|child| self.unlabelled_structure_below(child))
            .collect::<Vec<_>>();
        if children.len() == 1 && children[0].positions == positions {
            children.remove(0)
        } else {
            Partitioning::new(positions, children)
        }
    }

    /// Decompose the yield along the tree.
    ///
    /// An ordered node contributes its own position as a part, parts are sorted by their smallest
    /// position. An empty tree yields an empty partitioning without parts.
    pub fn recursive_partitioning(&self) -> Partitioning {
        self.recursive_partitioning_below(self.virtual_root)
    }

    fn recursive_partitioning_below(&self, node: NodeIndex) -> Partitioning {
        let positions = self.positions_below(node);
        let mut children = self
            .node_index(node)
            .map(Partitioning::leaf)
            .into_iter()
            .collect::<Vec<_>>();
        children.extend(
            self.children(node)
                .into_iter()
                .map(|child| self.recursive_partitioning_below(child)),
        );
        if children.len() == 1 && children[0].positions == positions {
            children.remove(0)
        } else {
            children.sort_by_key(Partitioning::first_position);
            Partitioning::new(positions, children)
        }
    }

    /// Get the ordered and connected nodes.
    pub fn id_yield(&self) -> &[NodeIndex] {
        &self.ordering
    }

    /// Get the ordered nodes, including disconnected ones.
    pub fn full_yield(&self) -> &[NodeIndex] {
        &self.full_yield
    }

    /// Get the tokens of the ordered and connected nodes.
    pub fn token_yield(&self) -> Vec<&Token> {
        self.ordering.iter().map(|&node| &self[node]).collect()
    }

    /// Get the tokens of the ordered nodes, including disconnected ones.
    pub fn full_token_yield(&self) -> Vec<&Token> {
        self.full_yield.iter().map(|&node| &self[node]).collect()
    }

    /// Get all nodes carrying a token, in order of addition.
    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    /// Returns whether the virtual root covers every ordered node.
    pub fn complete(&self) -> bool {
        let mut fringe = self.fringe(self.virtual_root);
        fringe.sort();
        fringe.dedup();
        fringe.len() == self.ordering.len()
    }

    /// Get the number of nodes below the virtual root.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes_below(self.virtual_root)
    }

    fn n_nodes_below(&self, node: NodeIndex) -> usize {
        let children = self.children(node);
        children.len()
            + children
                .into_iter()
                .map(|child| self.n_nodes_below(child))
                .sum::<usize>()
    }

    /// Returns whether a node outside of the yield has no children or the root fringe is empty.
    pub fn empty_fringe(&self) -> bool {
        self.nodes.iter().any(|&node| {
            self.primary_edges(node).is_empty() && !self.full_yield.contains(&node)
        }) || self.fringe(self.virtual_root).is_empty()
    }

    /// Get the children of `node`'s parent, including `node`.
    ///
    /// Returns the roots if `node` is a root and `Error` if a non-root node has no parent.
    pub fn siblings(&self, node: NodeIndex) -> Result<Vec<NodeIndex>, Error> {
        let root = self.root();
        if root.contains(&node) {
            return Ok(root);
        }
        self.parent(node)
            .map(|parent| self.children(parent))
            .ok_or_else(|| format_err!("Non-root node without parent: {}", self.node_id(node)))
    }

    // remove the single root if it is a category labelled `category`, its children become roots
    pub(crate) fn splice_root(&mut self, category: &str) -> Option<NodeIndex> {
        let root = self.root();
        if root.len() != 1 {
            return None;
        }
        let old_root = root[0];
        if self.token(old_root).and_then(Token::category) != Some(category) {
            return None;
        }
        let children = self.children(old_root);
        self.graph.remove_node(old_root);
        self.parents.remove(&old_root);
        self.ids.retain(|_, node| *node != old_root);
        self.nodes.retain(|&node| node != old_root);
        self.ordering.retain(|&node| node != old_root);
        self.full_yield.retain(|&node| node != old_root);
        let virtual_root = self.virtual_root;
        for child in children {
            self.attach(virtual_root, child);
        }
        Some(old_root)
    }

    fn fmt_below(&self, f: &mut fmt::Formatter, node: NodeIndex, level: usize) -> fmt::Result {
        writeln!(f, "{}{}", " ".repeat(level), self.graph[node])?;
        for child in self.children(node) {
            self.fmt_below(f, child, level + 1)?;
        }
        Ok(())
    }

    // synchronized traversal comparing tokens, positions and number of children
    fn eq_below(&self, other: &HybridTree, node: NodeIndex, other_node: NodeIndex) -> bool {
        if self.token(node) != other.token(other_node) {
            return false;
        }
        if self.node_index(node) != other.node_index(other_node) {
            return false;
        }
        let children = self.children(node);
        let other_children = other.children(other_node);
        children.len() == other_children.len()
            && children
                .into_iter()
                .zip(other_children)
                .all(|(child, other_child)| self.eq_below(other, child, other_child))
    }

    fn hash_below<H: Hasher>(&self, node: NodeIndex, state: &mut H) {
        self.token(node).hash(state);
        self.node_index(node).hash(state);
        let children = self.children(node);
        children.len().hash(state);
        for child in children {
            self.hash_below(child, state);
        }
    }
}

impl fmt::Display for HybridTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for root in self.root() {
            self.fmt_below(f, root, 0)?;
        }
        Ok(())
    }
}

impl PartialEq for HybridTree {
    fn eq(&self, other: &HybridTree) -> bool {
        let root = self.root();
        let other_root = other.root();
        root.len() == other_root.len()
            && root
                .into_iter()
                .zip(other_root)
                .all(|(node, other_node)| self.eq_below(other, node, other_node))
    }
}

impl Eq for HybridTree {}

impl Hash for HybridTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let root = self.root();
        root.len().hash(state);
        for node in root {
            self.hash_below(node, state);
        }
    }
}

impl Index<NodeIndex> for HybridTree {
    type Output = Token;

    fn index(&self, index: NodeIndex) -> &Token {
        match self.graph[index].token() {
            Some(token) => token,
            None => panic!("No token at node {}", self.graph[index].id()),
        }
    }
}

impl IndexMut<NodeIndex> for HybridTree {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Token {
        let id = self.graph[index].id().to_owned();
        match self.graph[index].token_mut() {
            Some(token) => token,
            None => panic!("No token at node {}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::collections::BTreeSet;
    use std::hash::{Hash, Hasher};

    use super::{HybridTree, Partitioning};
    use crate::{ConstituentCategory, ConstituentTerminal, Token};

    fn terminal(form: &str, pos: &str) -> Token {
        Token::from(ConstituentTerminal::new(form, pos))
    }

    fn category(category: &str) -> Token {
        Token::from(ConstituentCategory::new(category))
    }

    fn positions(positions: &[usize]) -> BTreeSet<usize> {
        positions.iter().cloned().collect()
    }

    fn hash(tree: &HybridTree) -> u64 {
        let mut hasher = DefaultHasher::new();
        tree.hash(&mut hasher);
        hasher.finish()
    }

    // (S (NP the cat) (VP sleeps)), children of S attached in reverse
    fn the_cat_sleeps() -> HybridTree {
        let mut tree = HybridTree::new("1");
        tree.add_node("1", terminal("the", "DT"), true, true);
        tree.add_node("2", terminal("cat", "NN"), true, true);
        tree.add_node("3", terminal("sleeps", "VBZ"), true, true);
        tree.add_node("S", category("S"), false, true);
        tree.add_node("NP", category("NP"), false, true);
        tree.add_node("VP", category("VP"), false, true);
        tree.add_to_root("S");
        tree.add_child("S", "VP");
        tree.add_child("S", "NP");
        tree.add_child("NP", "1");
        tree.add_child("NP", "2");
        tree.add_child("VP", "3");
        tree
    }

    // (S (X a c) b)
    fn discontinuous() -> HybridTree {
        let mut tree = HybridTree::new("2");
        tree.add_child("X", "a");
        tree.add_node("a", terminal("a", "A"), true, true);
        tree.add_child("S", "b");
        tree.add_node("b", terminal("b", "B"), true, true);
        tree.add_child("X", "c");
        tree.add_node("c", terminal("c", "C"), true, true);
        tree.add_node("X", category("X"), false, true);
        tree.add_node("S", category("S"), false, true);
        tree.add_child("S", "X");
        tree.add_to_root("S");
        tree.reorder();
        tree
    }

    #[test]
    fn structure() {
        let tree = the_cat_sleeps();
        let s = tree.node("S").unwrap();
        let np = tree.node("NP").unwrap();
        let vp = tree.node("VP").unwrap();
        let the = tree.node("1").unwrap();
        assert_eq!(tree.sent_label(), Some("1"));
        assert_eq!(tree.root(), vec![s]);
        assert_eq!(tree.parent(s), None);
        assert_eq!(tree.parent(np), Some(s));
        assert_eq!(tree.children(s), vec![vp, np]);
        assert_eq!(tree.node_id(the), "1");
        assert_eq!(tree.nodes().len(), 6);
        assert_eq!(tree.n_nodes(), 6);
        assert!(!tree.reentrant());
        assert!(tree.in_ordering(the));
        assert!(!tree.in_ordering(np));
        assert!(!tree.disconnected(the));
        assert_eq!(tree.index_node(1), Some(the));
        assert_eq!(tree.index_node(0), None);
        assert_eq!(tree.index_node(4), None);
        assert_eq!(tree.node_index(the), Some(0));
        assert_eq!(tree.node_index(np), None);
        assert_eq!(tree.node("missing"), None);
        assert_eq!(tree.token(tree.virtual_root()), None);
    }

    #[test]
    fn reorder() {
        let mut tree = the_cat_sleeps();
        let s = tree.node("S").unwrap();
        let np = tree.node("NP").unwrap();
        let vp = tree.node("VP").unwrap();
        tree.reorder();
        assert_eq!(tree.children(s), vec![np, vp]);
        let descendants = tree
            .descendants(s)
            .into_iter()
            .map(|node| tree.node_id(node))
            .collect::<Vec<_>>();
        assert_eq!(descendants, vec!["NP", "1", "2", "VP", "3"]);
        let once = tree.clone();
        tree.reorder();
        assert_eq!(tree.children(s), vec![np, vp]);
        assert_eq!(tree, once);
    }

    #[test]
    fn reorder_unordered_first() {
        let mut tree = HybridTree::new("3");
        tree.add_node("1", terminal("a", "A"), true, true);
        tree.add_node("E", category("E"), false, true);
        tree.add_node("S", category("S"), false, true);
        tree.add_to_root("S");
        tree.add_child("S", "1");
        tree.add_child("S", "E");
        tree.reorder();
        let s = tree.node("S").unwrap();
        assert_eq!(
            tree.children(s),
            vec![tree.node("E").unwrap(), tree.node("1").unwrap()]
        );
        assert!(tree.empty_fringe());
    }

    #[test]
    fn spans_and_gaps() {
        let tree = discontinuous();
        let x = tree.node("X").unwrap();
        let s = tree.node("S").unwrap();
        assert_eq!(tree.fringe(x), vec![0, 2]);
        assert_eq!(tree.n_spans(x), 2);
        assert_eq!(tree.n_spans(s), 1);
        assert_eq!(tree.n_gaps(), 1);
        assert_eq!(tree.max_n_spans(), 2);

        let tree = the_cat_sleeps();
        assert_eq!(tree.n_gaps(), 0);
        for &node in tree.nodes() {
            assert_eq!(tree.n_spans(node), 1);
        }
    }

    #[test]
    fn partitioning() {
        let mut tree = the_cat_sleeps();
        tree.reorder();
        let np = Partitioning::new(
            positions(&[0, 1]),
            vec![Partitioning::leaf(0), Partitioning::leaf(1)],
        );
        let s = Partitioning::new(positions(&[0, 1, 2]), vec![np, Partitioning::leaf(2)]);
        assert_eq!(tree.recursive_partitioning(), s);
        assert_eq!(tree.unlabelled_structure(), s);

        let tree = discontinuous();
        let x = Partitioning::new(
            positions(&[0, 2]),
            vec![Partitioning::leaf(0), Partitioning::leaf(2)],
        );
        let target = Partitioning::new(positions(&[0, 1, 2]), vec![x, Partitioning::leaf(1)]);
        assert_eq!(tree.recursive_partitioning(), target);
    }

    #[test]
    fn empty_partitioning() {
        let tree = HybridTree::default();
        let partitioning = tree.recursive_partitioning();
        assert!(partitioning.positions().is_empty());
        assert!(partitioning.children().is_empty());
        assert!(tree.empty_fringe());
        assert!(tree.complete());
        assert_eq!(tree.max_n_spans(), 1);
        assert_eq!(tree.sent_label(), None);
    }

    #[test]
    fn completeness() {
        let tree = the_cat_sleeps();
        assert!(tree.complete());
        assert!(!tree.empty_fringe());

        let mut tree = the_cat_sleeps();
        tree.add_node("4", terminal("loudly", "RB"), true, true);
        assert!(!tree.complete());
        assert!(!tree.disconnected(tree.node("4").unwrap()));

        let mut tree = the_cat_sleeps();
        tree.add_node("5", terminal(".", "."), true, false);
        assert!(tree.complete());
        assert!(tree.disconnected(tree.node("5").unwrap()));
        assert_eq!(tree.full_yield().len(), 4);
        assert_eq!(tree.id_yield().len(), 3);
        assert_eq!(tree.node_index_full(tree.node("5").unwrap()), Some(3));
        assert_eq!(tree.full_token_yield()[3].form(), Some("."));
    }

    #[test]
    fn reattach_keeps_old_adjacency() {
        let mut tree = HybridTree::new("4");
        tree.add_node("A", category("A"), false, true);
        tree.add_node("B", category("B"), false, true);
        tree.add_node("c", terminal("c", "C"), true, true);
        tree.add_to_root("A");
        tree.add_to_root("B");
        tree.add_child("A", "c");
        tree.add_child("B", "c");
        let a = tree.node("A").unwrap();
        let b = tree.node("B").unwrap();
        let c = tree.node("c").unwrap();
        assert_eq!(tree.parent(c), Some(b));
        assert_eq!(tree.children(a), vec![c]);
        assert_eq!(tree.children(b), vec![c]);
        assert!(tree.reentrant());
    }

    #[test]
    fn siblings() {
        let mut tree = the_cat_sleeps();
        tree.reorder();
        let np = tree.node("NP").unwrap();
        let vp = tree.node("VP").unwrap();
        let s = tree.node("S").unwrap();
        assert_eq!(tree.siblings(np).unwrap(), vec![np, vp]);
        assert_eq!(tree.siblings(s).unwrap(), vec![s]);
        tree.add_node("X", category("X"), false, true);
        assert!(tree.siblings(tree.node("X").unwrap()).is_err());
    }

    #[test]
    fn equality() {
        let mut t1 = the_cat_sleeps();
        let mut t2 = the_cat_sleeps();
        assert_eq!(t1, t2);
        assert_eq!(hash(&t1), hash(&t2));
        t1.reorder();
        assert_ne!(t1, t2);
        t2.reorder();
        assert_eq!(t1, t2);

        let vp = t2.node("VP").unwrap();
        t2[vp].as_category_mut().unwrap().set_category("VX");
        assert_ne!(t1, t2);
        t2[vp].as_category_mut().unwrap().set_category("VP");
        t2[vp].set_edge_label("HD");
        assert_ne!(t1, t2);

        // trees with different numbers of roots
        let mut t3 = the_cat_sleeps();
        t3.reorder();
        t3.add_node("R", category("R"), false, true);
        t3.add_to_root("R");
        assert_ne!(t1, t3);
    }

    #[test]
    fn display() {
        let mut tree = the_cat_sleeps();
        tree.reorder();
        let target = "S\t--\n NP\t--\n  the[--] : DT\t--\t--\n  cat[--] : NN\t--\t--\n \
                      VP\t--\n  sleeps[--] : VBZ\t--\t--\n";
        assert_eq!(tree.to_string(), target);
    }

    #[test]
    #[should_panic]
    fn index_without_token() {
        let mut tree = HybridTree::new("5");
        tree.add_child("A", "b");
        let a = tree.node("A").unwrap();
        let _ = &tree[a];
    }
}
