pub mod export;
pub use crate::io::export::{
    export_lines, parse, serialize, Dialect, ExportReader, ExportStructure, ExportWriter,
    ReaderConfig, WriterConfig,
};
mod json;
pub use crate::io::json::{
    dag_to_json, export_corpus_to_json, AlignmentEdge, BiHypergraph, Enumerator, FormLabeling,
    HyperEdge, Hypergraph, JsonCorpus, PosLabeling, TokenLabeling,
};

use failure::Error;

/// Trait to write a structure.
pub trait WriteTree<T> {
    fn write_tree(&mut self, tree: &T) -> Result<(), Error>;
}
