//! Reading raw survey exports into a table of responses.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
