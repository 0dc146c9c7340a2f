//! Shape classification and bullet-point text model for presentation
//! slides.
//!
//! Everything here is a pure function over shape text. Reading documents
//! and saving edits belong to the caller; shapes are reached only through
//! the [`TextShape`] capability trait.

pub mod bullet;
pub mod classify;
pub mod edit;
pub mod error;
pub mod shape;
pub mod slide;
pub mod types;

pub use bullet::{
    clean_text_for_bullet_formatting, is_bullet_content, is_title_content, parse_bullet_points,
};
pub use classify::{classify, classify_shape, edit_target_recommendations, should_target_as_bullet_list};
pub use edit::{apply_edit, EditOutcome, EditTarget, ShapeKind};
pub use error::{Error, Result};
pub use shape::{SlideShape, TextShape};
pub use slide::{analyze_slide, summarize_slide};
pub use types::{
    BulletEntry, Deck, EditHint, ShapeCategory, ShapeClassification, Slide, SlideReport,
    SlideSummary, TargetMode,
};
