pub mod annotate;
pub mod reader;
pub mod symbol;
pub mod tree;

pub use annotate::{AnnotationConfig, Annotator};
pub use reader::{parse_tree, GoldReader, NBestReader};
pub use symbol::Symbol;
pub use tree::{HeadType, Node, NodeId, NodeKind, Parse, ParseTree, Sentence};
