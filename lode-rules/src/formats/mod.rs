//! Module defining parsers for the supported corpus file formats.

// Export the core parser trait
pub mod parser;
pub use parser::FormatParser;

// Format-specific implementations
pub mod ron_format;
pub mod text_format;

pub use ron_format::RonCorpusParser;
pub use text_format::TextCorpusParser;
