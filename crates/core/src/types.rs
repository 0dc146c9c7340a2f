//! Domain types for in-memory presentations and classification output.

use crate::error::{Error, Result};
use crate::shape::SlideShape;
use serde::{Serialize, Serializer};
use std::fmt;

/// A presentation read into memory.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck with the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Get a slide by its 1-based number.
    pub fn slide(&self, number: usize) -> Result<&Slide> {
        let count = self.slides.len();
        number
            .checked_sub(1)
            .and_then(|i| self.slides.get(i))
            .ok_or(Error::SlideOutOfRange { number, count })
    }

    /// Get a mutable slide by its 1-based number.
    pub fn slide_mut(&mut self, number: usize) -> Result<&mut Slide> {
        let count = self.slides.len();
        number
            .checked_sub(1)
            .and_then(|i| self.slides.get_mut(i))
            .ok_or(Error::SlideOutOfRange { number, count })
    }
}

/// A single slide and its shapes, in document order.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Shapes on this slide; the position in this list is the shape index.
    pub shapes: Vec<SlideShape>,
}

impl Slide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a shape to this slide.
    pub fn add_shape(&mut self, shape: SlideShape) {
        self.shapes.push(shape);
    }
}

/// One parsed line of bullet content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulletEntry {
    /// Position of the source line among all lines, blank lines included.
    pub index: usize,

    /// Line content with the leading bullet glyphs removed.
    pub text: String,

    /// The untouched source line.
    #[serde(skip_serializing)]
    pub original_text: String,
}

impl BulletEntry {
    /// Create a new bullet entry.
    pub fn new(index: usize, text: impl Into<String>, original_text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            original_text: original_text.into(),
        }
    }
}

/// Content category assigned to a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeCategory {
    /// Short single-line text.
    Title,
    /// Text with bullet glyphs or several lines.
    BulletList,
    /// Any other text.
    TextBox,
    /// Image, chart, or other shape without text.
    NonText,
    /// Text shape with nothing but whitespace in it.
    EmptyText,
    /// Capability query failed.
    Unknown,
}

impl ShapeCategory {
    /// Stable label used in serialized output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::BulletList => "bullet_list",
            Self::TextBox => "text_box",
            Self::NonText => "non_text",
            Self::EmptyText => "empty_text",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy an editor uses to locate the text to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetMode {
    /// Replace the whole text of the shape at an index.
    ShapeIndex,
    /// Replace the first shape of a given kind (title, content, text box).
    ShapeType,
    /// Replace a shape's text, dropping typed bullet glyphs first.
    BulletList,
    /// Replace a substring in the first shape containing it.
    TextReplace,
    /// Replace one line of a bullet list.
    BulletPoint,
}

impl TargetMode {
    /// All targeting modes, in vocabulary order.
    pub const ALL: [TargetMode; 5] = [
        Self::ShapeIndex,
        Self::ShapeType,
        Self::BulletList,
        Self::TextReplace,
        Self::BulletPoint,
    ];

    /// Stable name used in edit requests and hints.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShapeIndex => "shape_index",
            Self::ShapeType => "shape_type",
            Self::BulletList => "bullet_list",
            Self::TextReplace => "text_replace",
            Self::BulletPoint => "bullet_point",
        }
    }

    /// Look up a targeting mode by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == name)
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommended way to edit a shape later.
///
/// Serializes as the instruction sentence produced by [`fmt::Display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditHint {
    /// Targeting mode to use.
    pub mode: TargetMode,
    /// Value to pass along with the mode (usually the shape index).
    pub key: String,
}

impl EditHint {
    /// Create a new edit hint.
    pub fn new(mode: TargetMode, key: impl Into<String>) -> Self {
        Self {
            mode,
            key: key.into(),
        }
    }
}

impl fmt::Display for EditHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Use target_type='{}' with target_value='{}'",
            self.mode, self.key
        )?;
        match self.mode {
            TargetMode::BulletList => f.write_str(
                " for proper bullet formatting. Provide text WITHOUT bullet characters - \
                 bullets are added automatically.",
            ),
            _ => f.write_str(" to edit"),
        }
    }
}

impl Serialize for EditHint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Analysis result for a single shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeClassification {
    /// Position of the shape on its slide.
    pub shape_index: usize,

    /// Assigned content category.
    #[serde(rename = "shape_type")]
    pub category: ShapeCategory,

    /// Trimmed shape text (empty if none).
    pub text: String,

    /// Short human-readable summary.
    pub description: String,

    /// Parsed bullets, only for bullet lists.
    #[serde(rename = "bullet_points", skip_serializing_if = "has_no_bullets")]
    pub bullet_entries: Option<Vec<BulletEntry>>,

    /// Recommended targeting for a later edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_hint: Option<EditHint>,
}

fn has_no_bullets(entries: &Option<Vec<BulletEntry>>) -> bool {
    entries.as_ref().map_or(true, |e| e.is_empty())
}

/// Analysis of every shape on one slide.
#[derive(Debug, Clone, Serialize)]
pub struct SlideReport {
    /// 1-based slide number.
    pub slide_number: usize,

    /// Number of shapes on the slide.
    pub total_shapes: usize,

    /// Per-shape classification, in shape order.
    pub shapes: Vec<ShapeClassification>,
}

/// Overview line for one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideSummary {
    /// 1-based slide number.
    pub slide_number: usize,

    /// Text of the first shape, shortened for display.
    pub title: String,

    /// Number of shapes that expose text.
    pub text_shapes: usize,
}
