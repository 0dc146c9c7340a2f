//! Error types for slide inspection and editing.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or editing slide shapes.
///
/// The bullet helpers never fail and the classifier folds
/// [`Error::ShapeAccess`] into the `unknown` category, so these mostly
/// surface from the edit planner and the PPTX reader.
#[derive(Error, Debug)]
pub enum Error {
    /// A shape capability query failed.
    #[error("Shape access error: {0}")]
    ShapeAccess(String),

    /// The requested shape does not exist on the slide.
    #[error("Shape index {index} out of range ({count} shapes on slide)")]
    ShapeIndexOutOfRange { index: usize, count: usize },

    /// The requested slide does not exist in the presentation.
    #[error("Slide number {number} out of range (1-{count})")]
    SlideOutOfRange { number: usize, count: usize },

    /// The shape has no editable text.
    #[error("Shape {0} does not contain editable text")]
    NotEditable(usize),

    /// No shape on the slide matched the edit target.
    #[error("{0}")]
    TargetNotFound(String),

    /// The edit target could not be understood.
    #[error("Invalid edit target: {0}")]
    InvalidTarget(String),

    /// A PPTX part could not be read as XML text.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),
}
