use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::io::{BufRead, Lines, Write};
use std::marker::PhantomData;

use failure::Error;
use itertools::Itertools;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use petgraph::prelude::NodeIndex;
use tracing::{debug, warn};

use crate::io::WriteTree;
use crate::token::NO_LABEL;
use crate::{
    ConstituentCategory, ConstituentTerminal, ConstituentTree, Constituents, HybridDag, VROOT,
};

/// Header line announcing the DISCO-DOP dialect.
pub static DISCODOP_HEADER: &str = "%% word\tlemma\ttag\tmorph\tedge\tparent\tsecedge";

/// Smallest numeric id of inner nodes.
pub const FIRST_INNER_ID: usize = 500;

// offset of the synthetic leaf identifiers
const LEAF_OFFSET: usize = 100;

/// Column layout of export lines.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dialect {
    /// `word tag morph edge parent`
    Standard,
    /// `word lemma tag morph edge parent`
    DiscoDop,
}

impl Default for Dialect {
    fn default() -> Self {
        Dialect::Standard
    }
}

impl<'a> TryFrom<&'a str> for Dialect {
    type Error = Error;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "standard" => Ok(Dialect::Standard),
            "disco-dop" | "discodop" => Ok(Dialect::DiscoDop),
            _ => Err(format_err!("Unknown export dialect: {}", value)),
        }
    }
}

/// Settings of an `ExportReader`.
#[derive(Clone, Debug)]
pub struct ReaderConfig {
    /// Dialect at the start of the input, a DISCO-DOP header switches to `Dialect::DiscoDop`.
    pub dialect: Dialect,
    /// Add terminals attached to `0` as disconnected punctuation.
    pub disconnect_punctuation: bool,
    /// Add an explicit root node `0` labelled `"VROOT"`.
    pub add_vroot: bool,
    /// Only read sentences with these names.
    pub names: Option<HashSet<String>>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            dialect: Dialect::Standard,
            disconnect_punctuation: true,
            add_vroot: false,
            names: None,
        }
    }
}

/// Settings of an `ExportWriter`.
#[derive(Clone, Debug)]
pub struct WriterConfig {
    pub dialect: Dialect,
    /// Name of the first sentence if sentences are numbered.
    pub start: usize,
    /// Skip sentences whose full yield is longer.
    pub max_length: Option<usize>,
    /// Name sentences by their label instead of numbering them.
    pub use_sentence_names: bool,
    /// Write a `#FORMAT` preamble.
    pub format: Option<u32>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        WriterConfig {
            dialect: Dialect::Standard,
            start: 1,
            max_length: None,
            use_sentence_names: false,
            format: None,
        }
    }
}

/// Structures that can be read from and written to the export format.
pub trait ExportStructure: Constituents + Sized {
    /// Construct an empty structure named `sent_label`.
    fn named(sent_label: &str) -> Self;

    /// Add a secondary edge, ignored by structures without secondary edges.
    fn add_secondary_edge(&mut self, parent: &str, child: &str, label: &str);

    /// Get the secondary parents of `node` with the label of the edge.
    fn secondary_parents(&self, node: NodeIndex) -> Vec<(NodeIndex, &str)>;

    /// Assign numeric export ids to all inner nodes.
    fn inner_node_ids(&self) -> Result<HashMap<NodeIndex, usize>, Error>;
}

impl ExportStructure for ConstituentTree {
    fn named(sent_label: &str) -> Self {
        ConstituentTree::new(sent_label)
    }

    fn add_secondary_edge(&mut self, _parent: &str, _child: &str, _label: &str) {}

    fn secondary_parents(&self, _node: NodeIndex) -> Vec<(NodeIndex, &str)> {
        Vec::new()
    }

    /// Number inner nodes in pre-order, counting down from `499 + #inner nodes`.
    fn inner_node_ids(&self) -> Result<HashMap<NodeIndex, usize>, Error> {
        let base = FIRST_INNER_ID + self.ids().len();
        let mut ids = HashMap::new();
        for root in self.root() {
            number_below(self, root, base, &mut ids);
        }
        Ok(ids)
    }
}

fn number_below(
    tree: &ConstituentTree,
    node: NodeIndex,
    base: usize,
    ids: &mut HashMap<NodeIndex, usize>,
) {
    let count = ids.values().min().cloned().unwrap_or(base);
    if !tree.in_ordering(node) {
        ids.insert(node, count.saturating_sub(1));
    }
    for child in tree.children(node) {
        number_below(tree, child, base, ids);
    }
}

impl ExportStructure for HybridDag {
    fn named(sent_label: &str) -> Self {
        HybridDag::new(sent_label)
    }

    fn add_secondary_edge(&mut self, parent: &str, child: &str, label: &str) {
        self.add_sec_child(parent, child, label)
    }

    fn secondary_parents(&self, node: NodeIndex) -> Vec<(NodeIndex, &str)> {
        self.sec_parents(node)
            .iter()
            .filter_map(|&parent| Some((parent, self.sec_edge_label(parent, node)?)))
            .collect()
    }

    /// Number inner nodes in topological order, counting up from 500.
    ///
    /// Returns `Error` if primary and secondary edges form a cycle.
    fn inner_node_ids(&self) -> Result<HashMap<NodeIndex, usize>, Error> {
        let order = self.topological_order(false).ok_or_else(|| {
            format_err!(
                "Cyclic structure in sentence {}",
                self.sent_label().unwrap_or("")
            )
        })?;
        Ok(order
            .into_iter()
            .filter(|node| !self.full_yield().contains(node))
            .zip(FIRST_INNER_ID..)
            .collect())
    }
}

// dummy struct required by pest
#[derive(Parser)]
#[grammar = "io/export.pest"]
pub(crate) struct ExportParser;

// node line of a sentence, inner nodes have an id instead of a word
struct NodeLine<'a> {
    inner_id: Option<&'a str>,
    word: &'a str,
    lemma: Option<&'a str>,
    tag: &'a str,
    morph: &'a str,
    edge: &'a str,
    parent: &'a str,
    secedges: Vec<(&'a str, &'a str)>,
}

enum Line<'a> {
    Header,
    Bos(&'a str),
    Eos(&'a str),
    Format(u32),
    Node(NodeLine<'a>),
    Malformed,
}

fn next_str<'a>(parts: &mut Pairs<'a, Rule>) -> Result<&'a str, Error> {
    parts
        .next()
        .map(|pair| pair.as_str())
        .ok_or_else(|| format_err!("Export line ended early"))
}

fn first_inner<'a>(pair: Pair<'a, Rule>) -> Result<&'a str, Error> {
    next_str(&mut pair.into_inner())
}

fn process_node_line(pair: Pair<Rule>, lemma: bool) -> Result<NodeLine, Error> {
    let nonterminal = match pair.as_rule() {
        Rule::standard_nonterminal | Rule::discodop_nonterminal => true,
        _ => false,
    };
    let mut parts = pair.into_inner();
    let word = next_str(&mut parts)?;
    let inner_id = if nonterminal {
        Some(word.trim_start_matches('#'))
    } else {
        None
    };
    let lemma = if lemma {
        Some(next_str(&mut parts)?)
    } else {
        None
    };
    let tag = next_str(&mut parts)?;
    let morph = next_str(&mut parts)?;
    let edge = next_str(&mut parts)?;
    let parent = next_str(&mut parts)?;
    let mut secedges = Vec::new();
    if let Some(pairs) = parts.next() {
        for secedge in pairs.into_inner() {
            let mut secedge = secedge.into_inner();
            secedges.push((next_str(&mut secedge)?, next_str(&mut secedge)?));
        }
    }
    Ok(NodeLine {
        inner_id,
        word,
        lemma,
        tag,
        morph,
        edge,
        parent,
        secedges,
    })
}

fn parse_with(rule: Rule, line: &str) -> Option<Pair<Rule>> {
    ExportParser::parse(rule, line)
        .ok()
        .and_then(|mut pairs| pairs.next())
}

fn parse_line(line: &str, dialect: Dialect) -> Result<Line, Error> {
    if parse_with(Rule::discodop_header, line).is_some() {
        return Ok(Line::Header);
    }
    if let Some(pair) = parse_with(Rule::bos, line) {
        return Ok(Line::Bos(first_inner(pair)?));
    }
    if let Some(pair) = parse_with(Rule::eos, line) {
        return Ok(Line::Eos(first_inner(pair)?));
    }
    if let Some(pair) = parse_with(Rule::format, line) {
        if let Ok(format) = first_inner(pair)?.parse::<u32>() {
            return Ok(Line::Format(format));
        }
    }
    let (nonterminal, terminal, lemma) = match dialect {
        Dialect::Standard => (Rule::standard_nonterminal, Rule::standard_terminal, false),
        Dialect::DiscoDop => (Rule::discodop_nonterminal, Rule::discodop_terminal, true),
    };
    match parse_with(nonterminal, line).or_else(|| parse_with(terminal, line)) {
        Some(pair) => Ok(Line::Node(process_node_line(pair, lemma)?)),
        None => Ok(Line::Malformed),
    }
}

fn morph_features(morph: &str) -> Vec<&str> {
    if morph == NO_LABEL {
        Vec::new()
    } else {
        morph.split('|').collect()
    }
}

// sentence under construction
struct Sentence<T> {
    name: String,
    tree: T,
    n_leaves: usize,
}

impl<T> Sentence<T>
where
    T: ExportStructure,
{
    fn new(name: &str, config: &ReaderConfig) -> Self {
        let mut tree = T::named(name);
        if config.add_vroot {
            tree.set_label("0", VROOT);
            tree.add_to_root("0");
        }
        Sentence {
            name: name.to_owned(),
            tree,
            n_leaves: 0,
        }
    }

    fn attach(&mut self, parent: &str, id: &str, config: &ReaderConfig) {
        if parent == "0" && !config.add_vroot {
            self.tree.add_to_root(id);
        } else {
            self.tree.add_child(parent, id);
        }
    }

    fn add(&mut self, line: NodeLine, config: &ReaderConfig) {
        if let Some(id) = line.inner_id {
            let category = ConstituentCategory::new(line.tag).with_edge(line.edge);
            self.tree.add_node(id, category.into(), false, true);
            self.attach(line.parent, id, config);
            for (label, parent) in line.secedges {
                self.tree.add_secondary_edge(parent, id, label);
            }
            return;
        }

        self.n_leaves += 1;
        let leaf_id = (LEAF_OFFSET + self.n_leaves).to_string();
        let mut terminal = ConstituentTerminal::new(line.word, line.tag)
            .with_edge(line.edge)
            .with_morph(morph_features(line.morph));
        if let Some(lemma) = line.lemma {
            terminal = terminal.with_lemma(lemma);
        }
        if line.parent == "0" && config.disconnect_punctuation {
            self.tree.add_node(&leaf_id, terminal.into(), true, false);
        } else {
            self.attach(line.parent, &leaf_id, config);
            self.tree.add_leaf(&leaf_id, terminal);
        }
        for (label, parent) in line.secedges {
            self.tree.add_secondary_edge(parent, &leaf_id, label);
        }
    }
}

/// Iterator over the sentences of an export corpus.
///
/// Sentences are collected between `#BOS <id>` and `#EOS <id>` lines, lines outside of sentences
/// are ignored. Malformed lines inside a sentence are skipped and counted. A sentence that is not
/// closed before the next `#BOS` or the end of input is dropped.
pub struct ExportReader<R, T>
where
    R: BufRead,
{
    inner: Lines<R>,
    config: ReaderConfig,
    dialect: Dialect,
    format: Option<u32>,
    skipped: usize,
    structure: PhantomData<T>,
}

impl<R, T> ExportReader<R, T>
where
    R: BufRead,
    T: ExportStructure,
{
    /// Creates a new `ExportReader` with the default `ReaderConfig`.
    pub fn new(reader: R) -> Self {
        ExportReader::with_config(reader, ReaderConfig::default())
    }

    pub fn with_config(reader: R, config: ReaderConfig) -> Self {
        ExportReader {
            inner: reader.lines(),
            dialect: config.dialect,
            config,
            format: None,
            skipped: 0,
            structure: PhantomData,
        }
    }

    /// Get the number of malformed lines skipped so far.
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    /// Get the version of the last `#FORMAT` line.
    pub fn format(&self) -> Option<u32> {
        self.format
    }

    /// Get the current dialect.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn wanted(&self, name: &str) -> bool {
        self.config
            .names
            .as_ref()
            .map(|names| names.contains(name))
            .unwrap_or(true)
    }
}

impl<R, T> Iterator for ExportReader<R, T>
where
    R: BufRead,
    T: ExportStructure,
{
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut sentence: Option<Sentence<T>> = None;
        while let Some(line) = self.inner.next() {
            let line = match line {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            let parsed = match parse_line(&line, self.dialect) {
                Ok(parsed) => parsed,
                Err(err) => return Some(Err(err)),
            };
            match parsed {
                Line::Header => self.dialect = Dialect::DiscoDop,
                Line::Format(format) => self.format = Some(format),
                Line::Bos(name) => {
                    if let Some(open) = sentence.take() {
                        warn!(sentence = %open.name, "#BOS before #EOS, dropping sentence");
                    }
                    if self.wanted(name) {
                        sentence = Some(Sentence::new(name, &self.config));
                    }
                }
                Line::Eos(name) => match sentence.take() {
                    Some(open) if open.name == name => {
                        let mut tree = open.tree;
                        tree.reorder();
                        debug!(sentence = %name, "read sentence");
                        return Some(Ok(tree));
                    }
                    Some(open) => {
                        warn!(sentence = %open.name, eos = %name, "Mismatched #EOS");
                        sentence = Some(open);
                    }
                    None => (),
                },
                Line::Node(node) => {
                    if let Some(open) = sentence.as_mut() {
                        open.add(node, &self.config);
                    }
                }
                Line::Malformed => {
                    if sentence.is_some() {
                        self.skipped += 1;
                        debug!(line = %line, "skipping malformed line");
                    }
                }
            }
        }
        if let Some(open) = sentence {
            warn!(sentence = %open.name, "Input ended before #EOS, dropping sentence");
        }
        None
    }
}

/// Writer for the export format.
///
/// The `#FORMAT` preamble and the DISCO-DOP header are written before the first sentence, or by
/// `finish` if there is none.
pub struct ExportWriter<W>
where
    W: Write,
{
    writer: W,
    config: WriterConfig,
    counter: usize,
    started: bool,
}

impl<W> ExportWriter<W>
where
    W: Write,
{
    /// Creates a new `ExportWriter` with the default `WriterConfig`.
    pub fn new(writer: W) -> Self {
        ExportWriter::with_config(writer, WriterConfig::default())
    }

    pub fn with_config(writer: W, config: WriterConfig) -> Self {
        ExportWriter {
            writer,
            counter: config.start,
            config,
            started: false,
        }
    }

    /// Get the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write the preamble if no sentence was written and get the underlying writer.
    pub fn finish(mut self) -> Result<W, Error> {
        self.write_preamble()?;
        Ok(self.writer)
    }

    fn write_preamble(&mut self) -> Result<(), Error> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        if let Some(format) = self.config.format {
            writeln!(self.writer, "#FORMAT {}", format)?;
        }
        if self.config.dialect == Dialect::DiscoDop {
            writeln!(self.writer, "{}", DISCODOP_HEADER)?;
        }
        Ok(())
    }
}

impl<W, T> WriteTree<T> for ExportWriter<W>
where
    W: Write,
    T: ExportStructure,
{
    fn write_tree(&mut self, tree: &T) -> Result<(), Error> {
        if let Some(max_length) = self.config.max_length {
            if tree.full_yield().len() > max_length {
                debug!(
                    sentence = tree.sent_label().unwrap_or(""),
                    "skipping long sentence"
                );
                return Ok(());
            }
        }
        let lines = export_lines(tree, self.config.dialect)?;
        self.write_preamble()?;
        let name = match tree.sent_label() {
            Some(label) if self.config.use_sentence_names => label.to_owned(),
            _ => self.counter.to_string(),
        };
        writeln!(self.writer, "#BOS {}", name)?;
        for line in lines {
            writeln!(self.writer, "{}", line)?;
        }
        writeln!(self.writer, "#EOS {}", name)?;
        self.counter += 1;
        Ok(())
    }
}

fn numeric_id(ids: &HashMap<NodeIndex, usize>, node: NodeIndex) -> Result<String, Error> {
    ids.get(&node)
        .map(ToString::to_string)
        .ok_or_else(|| format_err!("Node without export id: {:?}", node))
}

fn push_secondary_edges<T>(
    tree: &T,
    node: NodeIndex,
    ids: &HashMap<NodeIndex, usize>,
    fields: &mut Vec<String>,
) -> Result<(), Error>
where
    T: ExportStructure,
{
    for (parent, label) in tree.secondary_parents(node) {
        fields.push(label.to_owned());
        fields.push(numeric_id(ids, parent)?);
    }
    Ok(())
}

/// Get the lines of a sentence without `#BOS` and `#EOS`.
///
/// Terminals come first in the order of the full yield, inner nodes follow sorted by their `#id`
/// column. Returns `Error` if an inner node can't be numbered or a connected terminal's parent has
/// no number.
pub fn export_lines<T>(tree: &T, dialect: Dialect) -> Result<Vec<String>, Error>
where
    T: ExportStructure,
{
    let ids = tree.inner_node_ids()?;
    let root = tree.root();
    let mut lines = Vec::with_capacity(tree.nodes().len());

    for &leaf in tree.full_yield() {
        let token = &tree[leaf];
        let terminal = token.as_terminal();
        let mut fields = vec![token.form().unwrap_or(NO_LABEL).to_owned()];
        if dialect == Dialect::DiscoDop {
            fields.push(terminal.map(ConstituentTerminal::lemma).unwrap_or(NO_LABEL).to_owned());
        }
        fields.push(token.pos().unwrap_or(NO_LABEL).to_owned());
        fields.push(match terminal {
            Some(terminal) if !terminal.morph().is_empty() => terminal.morph().iter().join("|"),
            _ => NO_LABEL.to_owned(),
        });
        fields.push(token.edge().to_owned());
        if tree.in_ordering(leaf) && !root.contains(&leaf) {
            let parent = tree.parent(leaf).ok_or_else(|| {
                format_err!("Terminal without parent: {}", tree.node_id(leaf))
            })?;
            fields.push(numeric_id(&ids, parent)?);
        } else {
            fields.push("0".to_owned());
        }
        push_secondary_edges(tree, leaf, &ids, &mut fields)?;
        lines.push(fields.join("\t"));
    }

    let mut category_lines = Vec::new();
    for node in tree.ids() {
        let token = &tree[node];
        let mut fields = vec![format!("#{}", numeric_id(&ids, node)?)];
        if dialect == Dialect::DiscoDop {
            fields.push(NO_LABEL.to_owned());
        }
        fields.push(token.category().unwrap_or(NO_LABEL).to_owned());
        fields.push(NO_LABEL.to_owned());
        fields.push(token.edge().to_owned());
        if root.contains(&node) {
            fields.push("0".to_owned());
        } else {
            let parent = tree.parent(node).ok_or_else(|| {
                format_err!("Non-root node without parent: {}", tree.node_id(node))
            })?;
            fields.push(numeric_id(&ids, parent)?);
        }
        push_secondary_edges(tree, node, &ids, &mut fields)?;
        category_lines.push(fields);
    }
    category_lines.sort_by(|fields, other| fields[0].cmp(&other[0]));
    lines.extend(category_lines.into_iter().map(|fields| fields.join("\t")));

    Ok(lines)
}

/// Read all sentences of an export corpus.
pub fn parse<T>(text: &str, config: ReaderConfig) -> Result<Vec<T>, Error>
where
    T: ExportStructure,
{
    ExportReader::with_config(text.as_bytes(), config).collect()
}

/// Write sentences in the export format.
pub fn serialize<'a, T, I>(trees: I, config: WriterConfig) -> Result<String, Error>
where
    T: 'a + ExportStructure,
    I: IntoIterator<Item = &'a T>,
{
    let mut writer = ExportWriter::with_config(Vec::new(), config);
    for tree in trees {
        writer.write_tree(tree)?;
    }
    Ok(String::from_utf8(writer.finish()?)?)
}
