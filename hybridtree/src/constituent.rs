use std::fmt;
use std::ops::{Deref, DerefMut};

use petgraph::prelude::NodeIndex;

use crate::util::join_spans;
use crate::{ConstituentCategory, ConstituentTerminal, HybridTree, Token};

/// Category of an explicit root node.
pub static VROOT: &str = "VROOT";

/// Labelled span of a constituent.
///
/// Ordering compares the spans first and breaks ties by label.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LabelledSpan {
    spans: Vec<(usize, usize)>,
    label: String,
}

impl LabelledSpan {
    pub fn new(label: impl Into<String>, spans: Vec<(usize, usize)>) -> Self {
        LabelledSpan {
            spans,
            label: label.into(),
        }
    }

    /// Get the category.
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Get the inclusive `(low, high)` spans.
    pub fn spans(&self) -> &[(usize, usize)] {
        &self.spans
    }
}

impl fmt::Display for LabelledSpan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)?;
        for (low, high) in &self.spans {
            write!(f, " {} {}", low, high)?;
        }
        Ok(())
    }
}

/// Leaf and label oriented operations on constituent structures.
///
/// Implementors are expected to hold `ConstituentTerminal`s in the yield and
/// `ConstituentCategory`s at the inner nodes.
pub trait Constituents: DerefMut<Target = HybridTree> {
    /// Add the next leaf. The order of addition is significant.
    fn add_leaf(&mut self, id: &str, terminal: ConstituentTerminal) -> NodeIndex {
        self.add_node(id, terminal.into(), true, true)
    }

    /// Add punctuation: part of the full yield but disconnected from the tree.
    fn add_punct(&mut self, id: &str, pos: &str, word: &str) -> NodeIndex {
        self.add_node(id, ConstituentTerminal::new(word, pos).into(), true, false)
    }

    /// Add an inner node labelled `label`.
    fn set_label(&mut self, id: &str, label: &str) -> NodeIndex {
        self.add_node(id, ConstituentCategory::new(label).into(), false, true)
    }

    /// Get `(node, pos, word)` of every node in the full yield.
    fn leaves(&self) -> Vec<(NodeIndex, &str, &str)> {
        self.full_yield()
            .iter()
            .filter_map(|&node| {
                let token = self.token(node)?;
                Some((node, token.pos()?, token.form()?))
            })
            .collect()
    }

    /// Returns whether `node` is in the full yield.
    fn is_leaf(&self, node: NodeIndex) -> bool {
        self.full_yield().contains(&node)
    }

    /// Get the leaf at the 1-based `index` of the ordering.
    fn index_leaf(&self, index: usize) -> Option<NodeIndex> {
        self.index_node(index)
    }

    /// Get the 0-based position of a leaf in the ordering.
    fn leaf_index(&self, node: NodeIndex) -> Option<usize> {
        self.node_index(node)
    }

    fn leaf_pos(&self, node: NodeIndex) -> Option<&str> {
        self.token(node).and_then(Token::pos)
    }

    fn leaf_word(&self, node: NodeIndex) -> Option<&str> {
        self.token(node).and_then(Token::form)
    }

    /// Get the words of the ordering, omitting disconnected punctuation.
    fn word_yield(&self) -> Vec<&str> {
        self.token_yield().into_iter().filter_map(Token::form).collect()
    }

    /// Get the part of speech tags of the ordering, omitting disconnected punctuation.
    fn pos_yield(&self) -> Vec<&str> {
        self.token_yield().into_iter().filter_map(Token::pos).collect()
    }

    /// Get the rendered token of `node`.
    fn label(&self, node: NodeIndex) -> String {
        self[node].to_string()
    }

    /// Get all inner nodes.
    fn ids(&self) -> Vec<NodeIndex> {
        self.nodes()
            .iter()
            .filter(|node| !self.full_yield().contains(*node))
            .cloned()
            .collect()
    }

    /// Get the labelled spans of all inner nodes.
    ///
    /// Nodes without ordered descendants are skipped. The spans are sorted by positions, ties are
    /// broken by category.
    fn labelled_spans(&self) -> Vec<LabelledSpan> {
        let mut spans = self
            .ids()
            .into_iter()
            .filter_map(|node| {
                let category = self.token(node)?.category()?;
                let spans = join_spans(&self.fringe(node));
                if spans.is_empty() {
                    None
                } else {
                    Some(LabelledSpan::new(category, spans))
                }
            })
            .collect::<Vec<_>>();
        spans.sort();
        spans
    }

    /// Remove a single root labelled `"VROOT"`, its children become roots.
    fn strip_vroot(&mut self) {
        self.splice_root(VROOT);
    }
}

/// Constituent tree.
///
/// A `HybridTree` with `ConstituentTerminal`s in the yield and `ConstituentCategory`s at the inner
/// nodes.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct ConstituentTree {
    tree: HybridTree,
}

impl ConstituentTree {
    pub fn new(sent_label: impl Into<String>) -> Self {
        ConstituentTree {
            tree: HybridTree::new(sent_label),
        }
    }

    /// Get the number of nodes, counting the virtual root.
    pub fn n_nodes(&self) -> usize {
        self.tree.n_nodes() + 1
    }

    pub fn into_inner(self) -> HybridTree {
        self.tree
    }
}

impl From<HybridTree> for ConstituentTree {
    fn from(tree: HybridTree) -> Self {
        ConstituentTree { tree }
    }
}

impl Deref for ConstituentTree {
    type Target = HybridTree;

    fn deref(&self) -> &HybridTree {
        &self.tree
    }
}

impl DerefMut for ConstituentTree {
    fn deref_mut(&mut self) -> &mut HybridTree {
        &mut self.tree
    }
}

impl fmt::Display for ConstituentTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}

impl Constituents for ConstituentTree {}

#[cfg(test)]
mod tests {
    use super::{ConstituentTree, Constituents, LabelledSpan};
    use crate::ConstituentTerminal;

    fn the_cat_sleeps() -> ConstituentTree {
        let mut tree = ConstituentTree::new("1");
        tree.add_leaf("1", ConstituentTerminal::new("the", "DT"));
        tree.add_leaf("2", ConstituentTerminal::new("cat", "NN"));
        tree.add_leaf("3", ConstituentTerminal::new("sleeps", "VBZ"));
        tree.add_punct("4", "$.", ".");
        tree.set_label("S", "S");
        tree.set_label("NP", "NP");
        tree.set_label("VP", "VP");
        tree.add_to_root("S");
        tree.add_child("S", "NP");
        tree.add_child("S", "VP");
        tree.add_child("NP", "1");
        tree.add_child("NP", "2");
        tree.add_child("VP", "3");
        tree.reorder();
        tree
    }

    #[test]
    fn yields() {
        let tree = the_cat_sleeps();
        assert_eq!(tree.word_yield(), vec!["the", "cat", "sleeps"]);
        assert_eq!(tree.pos_yield(), vec!["DT", "NN", "VBZ"]);
        let leaves = tree
            .leaves()
            .into_iter()
            .map(|(_, pos, word)| (pos, word))
            .collect::<Vec<_>>();
        assert_eq!(
            leaves,
            vec![("DT", "the"), ("NN", "cat"), ("VBZ", "sleeps"), ("$.", ".")]
        );
        let punct = tree.node("4").unwrap();
        assert!(tree.is_leaf(punct));
        assert!(tree.disconnected(punct));
        assert_eq!(tree.leaf_index(punct), None);
        let cat = tree.index_leaf(2).unwrap();
        assert_eq!(tree.leaf_word(cat), Some("cat"));
        assert_eq!(tree.leaf_pos(cat), Some("NN"));
        assert_eq!(tree.leaf_index(cat), Some(1));
        assert_eq!(tree.label(tree.node("NP").unwrap()), "NP\t--");
        assert_eq!(tree.ids().len(), 3);
        assert_eq!(tree.n_nodes(), 7);
    }

    #[test]
    fn labelled_spans() {
        let tree = the_cat_sleeps();
        let spans = tree.labelled_spans();
        assert_eq!(
            spans,
            vec![
                LabelledSpan::new("NP", vec![(0, 1)]),
                LabelledSpan::new("S", vec![(0, 2)]),
                LabelledSpan::new("VP", vec![(2, 2)]),
            ]
        );
        assert_eq!(spans[1].to_string(), "S 0 2");
    }

    #[test]
    fn labelled_spans_ties_and_gaps() {
        let mut tree = ConstituentTree::new("2");
        tree.add_leaf("1", ConstituentTerminal::new("a", "A"));
        tree.add_leaf("2", ConstituentTerminal::new("b", "B"));
        tree.add_leaf("3", ConstituentTerminal::new("c", "C"));
        tree.set_label("Y", "Y");
        tree.set_label("X", "X");
        tree.set_label("D", "D");
        tree.set_label("E", "E");
        tree.add_to_root("Y");
        tree.add_child("Y", "X");
        tree.add_child("X", "D");
        tree.add_child("D", "1");
        tree.add_child("D", "3");
        tree.add_child("Y", "2");
        tree.add_child("Y", "E");
        tree.reorder();
        assert_eq!(
            tree.labelled_spans(),
            vec![
                LabelledSpan::new("D", vec![(0, 0), (2, 2)]),
                LabelledSpan::new("X", vec![(0, 0), (2, 2)]),
                LabelledSpan::new("Y", vec![(0, 2)]),
            ]
        );
        assert_eq!(tree.n_spans(tree.node("D").unwrap()), 2);
        assert_eq!(tree.n_gaps(), 2);
    }

    #[test]
    fn strip_vroot() {
        let mut tree = ConstituentTree::new("3");
        tree.add_leaf("1", ConstituentTerminal::new("a", "A"));
        tree.add_leaf("2", ConstituentTerminal::new("b", "B"));
        tree.set_label("0", "VROOT");
        tree.set_label("X", "X");
        tree.add_to_root("0");
        tree.add_child("0", "X");
        tree.add_child("0", "2");
        tree.add_child("X", "1");
        tree.strip_vroot();
        let x = tree.node("X").unwrap();
        let b = tree.node("2").unwrap();
        assert_eq!(tree.root(), vec![x, b]);
        assert_eq!(tree.parent(x), None);
        assert_eq!(tree.node("0"), None);
        assert_eq!(tree.nodes().len(), 3);
        assert!(tree.complete());

        let stripped = tree.clone();
        tree.strip_vroot();
        assert_eq!(tree, stripped);
    }

    #[test]
    fn strip_vroot_other_root() {
        let mut tree = the_cat_sleeps();
        let unchanged = tree.clone();
        tree.strip_vroot();
        assert_eq!(tree, unchanged);
        assert_eq!(tree.nodes().len(), 7);
    }
}
