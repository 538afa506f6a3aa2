#[macro_use]
extern crate failure;

#[macro_use]
extern crate pest_derive;

pub mod io;
pub use io::{ExportReader, ExportWriter, WriteTree};

mod constituent;
pub use constituent::{ConstituentTree, Constituents, LabelledSpan, VROOT};

mod dag;
pub use dag::HybridDag;

mod edge;
pub use edge::Edge;

pub mod escape;

pub mod folds;

mod node;
pub use node::Node;

pub mod sentence;
pub use sentence::{noparse_tree, SentenceLine};

pub mod token;
pub use token::{ConstituentCategory, ConstituentTerminal, DependencyToken, Token};

mod tree;
pub use tree::{HybridTree, Partitioning, VIRTUAL_ROOT};

pub mod util;
