//! PPTX (Office Open XML) shape reader.
//!
//! Parses .pptx files, which are ZIP archives containing XML documents,
//! into in-memory slides whose shapes can be classified and edited.

pub mod parser;

pub use parser::PptxParser;
