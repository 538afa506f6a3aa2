//! Hypergraph export of DAGs.
//!
//! A sentence becomes a pair of hypergraphs: `G1` encodes the DAG, every node is an edge attached
//! to the boundaries of its first and last child and to its own pair of boundaries. `G2` is the
//! chain of tokens. The alignment connects the input boundary of every ordered node in `G1` with
//! its position in `G2`.

use std::collections::HashMap;

use failure::Error;
use petgraph::prelude::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::token::NO_LABEL;
use crate::{HybridDag, Token};

/// Label of alignment edges.
pub const ALIGNMENT_LABEL: i64 = -1;

/// Dense, insertion ordered numbering of labels.
///
/// `None` stands for the label of edges without a label of their own.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Enumerator {
    objects: Vec<Option<String>>,
    indices: HashMap<Option<String>, usize>,
}

impl Enumerator {
    pub fn new() -> Self {
        Enumerator::default()
    }

    /// Get the index of `object`, assigning the next free index on first use.
    pub fn object_index(&mut self, object: Option<&str>) -> usize {
        let object = object.map(ToOwned::to_owned);
        if let Some(&index) = self.indices.get(&object) {
            return index;
        }
        let index = self.objects.len();
        self.objects.push(object.clone());
        self.indices.insert(object, index);
        index
    }

    /// Get the object with `index`.
    pub fn object(&self, index: usize) -> Option<Option<&str>> {
        self.objects
            .get(index)
            .map(|object| object.as_ref().map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Labels of tokens in the hypergraphs.
pub trait TokenLabeling {
    /// Label of a token in the token chain.
    fn token_label(&self, token: &Token) -> String;

    /// Label of a token in the DAG, inner nodes are labelled by their category.
    fn token_tree_label(&self, token: &Token) -> String {
        match token.category() {
            Some(category) => category.to_owned(),
            None => self.token_label(token),
        }
    }
}

/// Label terminals by their part of speech.
#[derive(Clone, Copy, Debug, Default)]
pub struct PosLabeling;

impl TokenLabeling for PosLabeling {
    fn token_label(&self, token: &Token) -> String {
        token.pos().or_else(|| token.category()).unwrap_or(NO_LABEL).to_owned()
    }
}

/// Label terminals by their form.
#[derive(Clone, Copy, Debug, Default)]
pub struct FormLabeling;

impl TokenLabeling for FormLabeling {
    fn token_label(&self, token: &Token) -> String {
        token.form().or_else(|| token.category()).unwrap_or(NO_LABEL).to_owned()
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HyperEdge {
    pub id: usize,
    pub label: usize,
    pub attachment: Vec<usize>,
    pub terminal: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Hypergraph {
    #[serde(rename = "type")]
    pub graph_type: String,
    pub nodes: Vec<usize>,
    pub edges: Vec<HyperEdge>,
    pub ports: Vec<usize>,
}

impl Hypergraph {
    fn new() -> Self {
        Hypergraph {
            graph_type: "hypergraph".to_owned(),
            nodes: Vec::new(),
            edges: Vec::new(),
            ports: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AlignmentEdge {
    pub id: usize,
    pub label: i64,
    pub attachment: Vec<usize>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BiHypergraph {
    #[serde(rename = "type")]
    pub graph_type: String,
    #[serde(rename = "G1")]
    pub g1: Hypergraph,
    #[serde(rename = "G2")]
    pub g2: Hypergraph,
    pub alignment: Vec<AlignmentEdge>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonCorpus {
    pub corpus: Vec<BiHypergraph>,
    pub alignment_label: usize,
    pub nonterminal_edge_label: usize,
}

// state of the DAG encoding
struct DagEncoder<'a, L> {
    dag: &'a HybridDag,
    enumerator: &'a mut Enumerator,
    labeling: &'a L,
    graph: Hypergraph,
    next_node: usize,
    // input and output boundary of every node
    node_io: HashMap<NodeIndex, (usize, usize)>,
    // boundaries of the secondary edges leaving a node
    sec_io: HashMap<NodeIndex, Vec<(usize, usize)>>,
}

impl<'a, L> DagEncoder<'a, L>
where
    L: TokenLabeling,
{
    fn new_node(&mut self) -> usize {
        let node = self.next_node;
        self.next_node += 1;
        self.graph.nodes.push(node);
        node
    }

    fn push_edge(&mut self, label: usize, attachment: Vec<usize>) {
        let id = self.graph.edges.len();
        self.graph.edges.push(HyperEdge {
            id,
            label,
            attachment,
            terminal: true,
        });
    }

    // encode node attached at input boundary `input`, returns its output boundary
    fn encode(&mut self, node: NodeIndex, input: usize) -> Result<usize, Error> {
        let dag = self.dag;
        let output = self.new_node();
        let first_child = self.new_node();
        let mut next_child = first_child;
        for child in dag.children(node) {
            next_child = self.encode(child, next_child)?;
        }
        for _ in dag.sec_children(node) {
            let sec_output = self.new_node();
            self.sec_io
                .entry(node)
                .or_insert_with(Vec::new)
                .push((next_child, sec_output));
            next_child = sec_output;
        }

        let token = dag
            .token(node)
            .ok_or_else(|| format_err!("No token at node {}", dag.node_id(node)))?;
        let label = self.labeling.token_tree_label(token);
        let label = self.enumerator.object_index(Some(&label));
        self.node_io.insert(node, (input, output));
        self.push_edge(label, vec![first_child, next_child, input, output]);
        Ok(output)
    }

    fn encode_secondary_edges(&mut self, delimiter: &str) -> Result<(), Error> {
        let dag = self.dag;
        for &node in dag.nodes() {
            let children = dag.sec_children(node);
            let labels = dag.sec_child_edge_labels(node);
            let boundaries = self.sec_io.get(&node).cloned().unwrap_or_default();
            if boundaries.len() != children.len() {
                return Err(format_err!(
                    "Secondary parent not reachable from the root: {}",
                    dag.node_id(node)
                ));
            }
            for ((child, label), (input, output)) in children.into_iter().zip(labels).zip(boundaries)
            {
                let &(child_input, child_output) = self.node_io.get(&child).ok_or_else(|| {
                    format_err!(
                        "Secondary child not reachable from the root: {}",
                        dag.node_id(child)
                    )
                })?;
                let label = format!("SECEDGE{}{}", delimiter, label);
                let label = self.enumerator.object_index(Some(&label));
                self.push_edge(label, vec![child_input, child_output, input, output]);
            }
        }
        Ok(())
    }
}

/// Encode `dag` as a bihypergraph.
///
/// Labels are numbered by `enumerator`, secondary edges are labelled `SECEDGE<delimiter><label>`.
/// Returns `Error` if a node without token or a secondary parent or child outside of the primary
/// structure is encountered.
pub fn dag_to_json<L>(
    dag: &HybridDag,
    enumerator: &mut Enumerator,
    labeling: &L,
    delimiter: &str,
) -> Result<BiHypergraph, Error>
where
    L: TokenLabeling,
{
    let mut encoder = DagEncoder {
        dag,
        enumerator,
        labeling,
        graph: Hypergraph::new(),
        next_node: 0,
        node_io: HashMap::new(),
        sec_io: HashMap::new(),
    };
    let first_root = encoder.new_node();
    let mut next_root = first_root;
    for root in dag.root() {
        next_root = encoder.encode(root, next_root)?;
    }
    encoder.encode_secondary_edges(delimiter)?;
    encoder.graph.ports = vec![first_root, next_root];

    let DagEncoder {
        enumerator,
        graph: g1,
        next_node,
        node_io,
        ..
    } = encoder;

    let start_edge = g1.edges.len();
    let tokens = dag.token_yield();
    let mut g2 = Hypergraph::new();
    g2.nodes = (next_node..=next_node + tokens.len()).collect();
    for (idx, token) in tokens.into_iter().enumerate() {
        g2.edges.push(HyperEdge {
            id: start_edge + idx,
            label: enumerator.object_index(Some(&labeling.token_label(token))),
            attachment: vec![next_node + idx, next_node + idx + 1],
            terminal: true,
        });
    }
    g2.ports = vec![next_node, next_node + dag.id_yield().len()];

    let start_alignment = start_edge + g2.edges.len();
    let mut alignment = Vec::with_capacity(dag.id_yield().len());
    for (idx, node) in dag.id_yield().iter().enumerate() {
        let &(input, _) = node_io.get(node).ok_or_else(|| {
            format_err!(
                "Ordered node not reachable from the root: {}",
                dag.node_id(*node)
            )
        })?;
        alignment.push(AlignmentEdge {
            id: start_alignment + idx,
            label: ALIGNMENT_LABEL,
            attachment: vec![input, next_node + idx],
        });
    }

    Ok(BiHypergraph {
        graph_type: "bihypergraph".to_owned(),
        g1,
        g2,
        alignment,
    })
}

/// Encode a corpus of DAGs.
///
/// Alignment and nonterminal edges share the label of the `None` object.
pub fn export_corpus_to_json<'a, I, L>(
    corpus: I,
    enumerator: &mut Enumerator,
    labeling: &L,
    delimiter: &str,
) -> Result<JsonCorpus, Error>
where
    I: IntoIterator<Item = &'a HybridDag>,
    L: TokenLabeling,
{
    let alignment_label = enumerator.object_index(None);
    let nonterminal_edge_label = enumerator.object_index(None);
    let corpus = corpus
        .into_iter()
        .map(|dag| dag_to_json(dag, enumerator, labeling, delimiter))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(JsonCorpus {
        corpus,
        alignment_label,
        nonterminal_edge_label,
    })
}
