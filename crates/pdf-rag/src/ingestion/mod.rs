//! Document ingestion pipeline: extract, chunk, embed, index

mod chunker;
mod parser;
mod processor;

pub use chunker::TextChunker;
pub use parser::{cleanup_text, PdfExtractor, TextExtractor};
pub use processor::IngestPipeline;
