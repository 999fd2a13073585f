pub mod document_processor;
pub mod text_chunker;

pub use document_processor::{DocumentProcessorService, ProcessingReport};
pub use text_chunker::{TextChunk, TextChunker};
