//! Slide-level reports built from shape classification.

use crate::classify::classify_shape;
use crate::shape::TextShape;
use crate::types::{SlideReport, SlideSummary};

/// Title shown for slides whose first shape has no text.
pub const UNTITLED: &str = "Untitled";

/// Longest title shown in a slide summary before it is shortened.
pub const SUMMARY_TITLE_CHARS: usize = 50;

/// Classify every shape on a slide.
pub fn analyze_slide<S: TextShape>(slide_number: usize, shapes: &[S]) -> SlideReport {
    let shapes: Vec<_> = shapes
        .iter()
        .enumerate()
        .map(|(index, shape)| classify_shape(index, shape))
        .collect();

    SlideReport {
        slide_number,
        total_shapes: shapes.len(),
        shapes,
    }
}

/// Summarize a slide for a presentation overview.
///
/// The title is taken from the first shape only.
pub fn summarize_slide<S: TextShape>(slide_number: usize, shapes: &[S]) -> SlideSummary {
    let text_shapes = shapes.iter().filter(|s| s.has_text()).count();

    let title = shapes
        .first()
        .filter(|s| s.has_text())
        .and_then(|s| s.text().ok())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(|t| shorten(&t))
        .unwrap_or_else(|| UNTITLED.to_string());

    SlideSummary {
        slide_number,
        title,
        text_shapes,
    }
}

fn shorten(text: &str) -> String {
    if text.chars().count() > SUMMARY_TITLE_CHARS {
        let head: String = text.chars().take(SUMMARY_TITLE_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
