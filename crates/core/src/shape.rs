//! Shape capability surface.
//!
//! The analysis code never touches a concrete document API. Anything that
//! can report whether it carries text, and read or replace that text, can be
//! classified and edited.

use crate::error::{Error, Result};

/// A slide element whose text may be read and replaced.
pub trait TextShape {
    /// Whether the shape exposes a text capability at all.
    fn has_text(&self) -> bool;

    /// Read the shape's full text.
    fn text(&self) -> Result<String>;

    /// Replace the shape's full text.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// In-memory shape with optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideShape {
    /// Shape name from the source document, if any.
    pub name: Option<String>,

    /// Text content, or `None` for images, charts and the like.
    text: Option<String>,
}

impl SlideShape {
    /// Create a text shape.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            name: None,
            text: Some(text.into()),
        }
    }

    /// Create a shape without text.
    pub fn non_text() -> Self {
        Self::default()
    }

    /// Set the shape name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl TextShape for SlideShape {
    fn has_text(&self) -> bool {
        self.text.is_some()
    }

    fn text(&self) -> Result<String> {
        self.text
            .clone()
            .ok_or_else(|| Error::ShapeAccess("shape has no text".to_string()))
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        match self.text.as_mut() {
            Some(current) => {
                *current = text.to_string();
                Ok(())
            }
            None => Err(Error::ShapeAccess("shape has no text".to_string())),
        }
    }
}
