pub mod markdown;

pub use markdown::{parse_blocks, BlockNode, Document, DocumentError, ListItem, Section};
