//! In-memory text edits on a slide's shapes.
//!
//! The planner locates a shape with one of the targeting modes and replaces
//! its text through [`TextShape::set_text`]. Saving the document is left to
//! the caller.
//!
//! The `shape_type` and `bullet_point` modes select shapes with their own
//! looser rules rather than the classifier's categories: a title here is any
//! short single-line text, glyphs included.

use crate::bullet::{clean_text_for_bullet_formatting, TITLE_MAX_CHARS};
use crate::error::{Error, Result};
use crate::shape::TextShape;
use crate::types::TargetMode;
use serde::Serialize;
use std::fmt;

/// Kind of shape addressed by the `shape_type` targeting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// Non-empty single-line text under the title length limit.
    Title,
    /// Text with a `•` or `*`, or with three or more lines.
    Content,
    /// Non-empty text that is neither of the above.
    TextBox,
}

impl ShapeKind {
    /// Parse a shape kind name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "title" => Some(Self::Title),
            "content" => Some(Self::Content),
            "text_box" => Some(Self::TextBox),
            _ => None,
        }
    }

    /// Whether a shape's text selects it for this kind.
    fn matches(self, text: &str) -> bool {
        let text = text.trim();
        let is_title =
            !text.is_empty() && text.chars().count() < TITLE_MAX_CHARS && !text.contains('\n');
        let is_content = text.contains(&['•', '*'][..]) || text.matches('\n').count() > 1;

        match self {
            Self::Title => is_title,
            Self::Content => is_content,
            Self::TextBox => !text.is_empty() && !is_title && !is_content,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::TextBox => "text_box",
        };
        f.write_str(name)
    }
}

/// Where an edit should land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditTarget {
    /// Replace the text of the shape at this index.
    ShapeIndex(usize),
    /// Replace the first shape of this kind.
    ShapeType(ShapeKind),
    /// Replace `old_text` in the first shape that contains it.
    TextReplace { old_text: String },
    /// Replace this line of the first bullet list that has it.
    BulletPoint(usize),
    /// Replace the text of the shape at this index, without typed glyphs.
    BulletList(usize),
}

impl EditTarget {
    /// Build a target from a targeting-mode name and its value.
    pub fn parse(target_type: &str, target_value: &str, old_text: Option<&str>) -> Result<Self> {
        let mode = TargetMode::from_name(target_type)
            .ok_or_else(|| Error::InvalidTarget(format!("Unknown target_type: {}", target_type)))?;

        let target = match mode {
            TargetMode::ShapeIndex => Self::ShapeIndex(parse_index(target_value)?),
            TargetMode::ShapeType => Self::ShapeType(ShapeKind::from_name(target_value).ok_or_else(
                || Error::InvalidTarget(format!("Unknown shape type: {}", target_value)),
            )?),
            TargetMode::TextReplace => match old_text {
                Some(old) if !old.is_empty() => Self::TextReplace {
                    old_text: old.to_string(),
                },
                _ => {
                    return Err(Error::InvalidTarget(
                        "old_text is required for text_replace mode".to_string(),
                    ))
                }
            },
            TargetMode::BulletPoint => Self::BulletPoint(parse_index(target_value)?),
            TargetMode::BulletList => Self::BulletList(parse_index(target_value)?),
        };

        Ok(target)
    }

    /// Targeting mode of this target.
    pub fn mode(&self) -> TargetMode {
        match self {
            Self::ShapeIndex(_) => TargetMode::ShapeIndex,
            Self::ShapeType(_) => TargetMode::ShapeType,
            Self::TextReplace { .. } => TargetMode::TextReplace,
            Self::BulletPoint(_) => TargetMode::BulletPoint,
            Self::BulletList(_) => TargetMode::BulletList,
        }
    }
}

fn parse_index(value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidTarget(format!("Expected a non-negative index, got '{}'", value)))
}

/// Result of a successful edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    /// Index of the shape that was changed.
    pub shape_index: usize,

    /// Targeting mode that located the shape.
    pub target_type: TargetMode,

    /// Shape text before the edit.
    pub previous_text: String,

    /// Shape text after the edit.
    pub new_text: String,

    /// Human-readable summary of the change.
    pub message: String,
}

/// Apply one edit to a slide's shapes.
pub fn apply_edit<S: TextShape>(
    shapes: &mut [S],
    target: &EditTarget,
    new_text: &str,
) -> Result<EditOutcome> {
    match target {
        EditTarget::ShapeIndex(index) => {
            let shape = editable_shape(shapes, *index)?;
            let previous = shape.text()?;
            shape.set_text(new_text)?;
            let message = format!(
                "Changed shape {} from '{}' to '{}'",
                index, previous, new_text
            );
            Ok(outcome(*index, target, previous, new_text.to_string(), message))
        }
        EditTarget::ShapeType(kind) => {
            for (index, shape) in shapes.iter_mut().enumerate() {
                if !shape.has_text() {
                    continue;
                }

                let previous = shape.text()?;
                if !kind.matches(&previous) {
                    continue;
                }

                shape.set_text(new_text)?;
                let message = format!(
                    "Changed {} (shape {}) from '{}' to '{}'",
                    kind, index, previous, new_text
                );
                return Ok(outcome(index, target, previous, new_text.to_string(), message));
            }

            Err(Error::TargetNotFound(format!(
                "No shape of type '{}' found on slide",
                kind
            )))
        }
        EditTarget::TextReplace { old_text } => {
            for (index, shape) in shapes.iter_mut().enumerate() {
                if !shape.has_text() {
                    continue;
                }

                let previous = shape.text()?;
                if !previous.contains(old_text.as_str()) {
                    continue;
                }

                let replaced = previous.replace(old_text.as_str(), new_text);
                shape.set_text(&replaced)?;
                let message = format!(
                    "Replaced '{}' with '{}' in shape {}",
                    old_text, new_text, index
                );
                return Ok(outcome(index, target, previous, replaced, message));
            }

            Err(Error::TargetNotFound(format!(
                "Text '{}' not found on slide",
                old_text
            )))
        }
        EditTarget::BulletPoint(line) => {
            for (index, shape) in shapes.iter_mut().enumerate() {
                if !shape.has_text() {
                    continue;
                }

                let previous = shape.text()?;
                if !previous.contains(&['•', '*', '\n'][..]) {
                    continue;
                }

                let Some(updated) = replace_line(&previous, *line, new_text) else {
                    continue;
                };

                shape.set_text(&updated)?;
                let message = format!(
                    "Changed bullet point {} to '{}' in shape {}",
                    line, new_text, index
                );
                return Ok(outcome(index, target, previous, updated, message));
            }

            Err(Error::TargetNotFound(format!(
                "Bullet point {} not found on slide",
                line
            )))
        }
        EditTarget::BulletList(index) => {
            let shape = editable_shape(shapes, *index)?;
            let previous = shape.text()?;
            let cleaned = clean_text_for_bullet_formatting(new_text);
            shape.set_text(&cleaned)?;
            let items = cleaned.lines().filter(|l| !l.trim().is_empty()).count();
            let message = format!(
                "Formatted shape {} as bullet list with {} items",
                index, items
            );
            Ok(outcome(*index, target, previous, cleaned, message))
        }
    }
}

fn editable_shape<S: TextShape>(shapes: &mut [S], index: usize) -> Result<&mut S> {
    let count = shapes.len();
    let shape = shapes
        .get_mut(index)
        .ok_or(Error::ShapeIndexOutOfRange { index, count })?;

    if !shape.has_text() {
        return Err(Error::NotEditable(index));
    }

    Ok(shape)
}

/// Replace one line of `text`, counting lines of the untrimmed text.
fn replace_line(text: &str, line: usize, new_line: &str) -> Option<String> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    let slot = lines.get_mut(line)?;
    *slot = new_line;

    Some(lines.join("\n"))
}

fn outcome(
    shape_index: usize,
    target: &EditTarget,
    previous_text: String,
    new_text: String,
    message: String,
) -> EditOutcome {
    log::debug!("{}", message);
    EditOutcome {
        shape_index,
        target_type: target.mode(),
        previous_text,
        new_text,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::SlideShape;

    fn sample_slide() -> Vec<SlideShape> {
        vec![
            SlideShape::with_text("Quarterly Review"),
            SlideShape::non_text(),
            SlideShape::with_text("• Revenue up\n• Costs down\n• Outlook positive"),
            SlideShape::with_text(
                "Prepared by the finance team for the board meeting, covering all regions, all business units and the outlook.",
            ),
        ]
    }

    fn text_of(shapes: &[SlideShape], index: usize) -> String {
        shapes[index].text().unwrap()
    }

    #[test]
    fn test_parse_targets() {
        assert_eq!(
            EditTarget::parse("shape_index", "2", None).unwrap(),
            EditTarget::ShapeIndex(2)
        );
        assert_eq!(
            EditTarget::parse("shape_type", "Content", None).unwrap(),
            EditTarget::ShapeType(ShapeKind::Content)
        );
        assert_eq!(
            EditTarget::parse("text_replace", "", Some("old")).unwrap(),
            EditTarget::TextReplace {
                old_text: "old".to_string()
            }
        );
        assert_eq!(
            EditTarget::parse("bullet_list", " 1 ", None).unwrap(),
            EditTarget::BulletList(1)
        );
    }

    #[test]
    fn test_parse_invalid_targets() {
        assert!(matches!(
            EditTarget::parse("by_color", "1", None),
            Err(Error::InvalidTarget(_))
        ));
        assert!(matches!(
            EditTarget::parse("shape_index", "-1", None),
            Err(Error::InvalidTarget(_))
        ));
        assert!(matches!(
            EditTarget::parse("shape_type", "footer", None),
            Err(Error::InvalidTarget(_))
        ));
        assert!(matches!(
            EditTarget::parse("text_replace", "x", None),
            Err(Error::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_edit_by_shape_index() {
        let mut shapes = sample_slide();
        let result = apply_edit(&mut shapes, &EditTarget::ShapeIndex(0), "Annual Review").unwrap();

        assert_eq!(result.shape_index, 0);
        assert_eq!(result.previous_text, "Quarterly Review");
        assert_eq!(result.target_type, TargetMode::ShapeIndex);
        assert_eq!(
            result.message,
            "Changed shape 0 from 'Quarterly Review' to 'Annual Review'"
        );
        assert_eq!(text_of(&shapes, 0), "Annual Review");
    }

    #[test]
    fn test_edit_shape_index_errors() {
        let mut shapes = sample_slide();
        assert!(matches!(
            apply_edit(&mut shapes, &EditTarget::ShapeIndex(9), "x"),
            Err(Error::ShapeIndexOutOfRange { index: 9, count: 4 })
        ));
        assert!(matches!(
            apply_edit(&mut shapes, &EditTarget::ShapeIndex(1), "x"),
            Err(Error::NotEditable(1))
        ));
    }

    #[test]
    fn test_edit_by_shape_type() {
        let mut shapes = sample_slide();

        let result = apply_edit(
            &mut shapes,
            &EditTarget::ShapeType(ShapeKind::Content),
            "• New list",
        )
        .unwrap();
        assert_eq!(result.shape_index, 2);

        let result = apply_edit(
            &mut shapes,
            &EditTarget::ShapeType(ShapeKind::TextBox),
            "Updated footnote",
        )
        .unwrap();
        assert_eq!(result.shape_index, 3);
        assert_eq!(text_of(&shapes, 3), "Updated footnote");
    }

    #[test]
    fn test_edit_shape_type_with_hyphenated_title() {
        let slide = || {
            vec![
                SlideShape::with_text("Year-end review"),
                SlideShape::with_text("• a\n• b\n• c"),
            ]
        };

        let mut shapes = slide();
        let result = apply_edit(&mut shapes, &EditTarget::ShapeType(ShapeKind::Title), "Summary")
            .unwrap();
        assert_eq!(result.shape_index, 0);
        assert_eq!(text_of(&shapes, 0), "Summary");

        let mut shapes = slide();
        let result =
            apply_edit(&mut shapes, &EditTarget::ShapeType(ShapeKind::Content), "• x").unwrap();
        assert_eq!(result.shape_index, 1);
        assert_eq!(text_of(&shapes, 0), "Year-end review");
    }

    #[test]
    fn test_shape_kind_selection_rules() {
        assert!(ShapeKind::Title.matches("• Single glyph line"));
        assert!(!ShapeKind::Title.matches("   "));
        assert!(!ShapeKind::Title.matches("Two\nlines"));
        assert!(ShapeKind::Content.matches("Uses * emphasis"));
        assert!(!ShapeKind::Content.matches("Two\nlines"));
        assert!(ShapeKind::TextBox.matches("Two\nlines"));
        assert!(!ShapeKind::TextBox.matches(""));
    }

    #[test]
    fn test_edit_by_shape_type_not_found() {
        let mut shapes = vec![SlideShape::with_text("Only a title")];
        assert!(matches!(
            apply_edit(&mut shapes, &EditTarget::ShapeType(ShapeKind::Content), "x"),
            Err(Error::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_text_replace() {
        let mut shapes = sample_slide();
        let target = EditTarget::TextReplace {
            old_text: "Costs down".to_string(),
        };

        let result = apply_edit(&mut shapes, &target, "Costs flat").unwrap();
        assert_eq!(result.shape_index, 2);
        assert_eq!(
            text_of(&shapes, 2),
            "• Revenue up\n• Costs flat\n• Outlook positive"
        );

        assert!(matches!(
            apply_edit(&mut shapes, &target, "again"),
            Err(Error::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_edit_bullet_point() {
        let mut shapes = sample_slide();
        let result = apply_edit(&mut shapes, &EditTarget::BulletPoint(1), "Costs flat").unwrap();

        assert_eq!(result.shape_index, 2);
        assert_eq!(
            text_of(&shapes, 2),
            "• Revenue up\nCosts flat\n• Outlook positive"
        );
    }

    #[test]
    fn test_edit_bullet_point_counts_raw_lines() {
        let mut shapes = vec![SlideShape::with_text("\n\n• A\n• B\n• C")];
        apply_edit(&mut shapes, &EditTarget::BulletPoint(2), "First").unwrap();
        assert_eq!(text_of(&shapes, 0), "\n\nFirst\n• B\n• C");
    }

    #[test]
    fn test_edit_bullet_point_in_plain_two_line_shape() {
        let mut shapes = vec![
            SlideShape::with_text("Agenda"),
            SlideShape::with_text("Line one\nLine two"),
        ];
        let result = apply_edit(&mut shapes, &EditTarget::BulletPoint(1), "Line 2").unwrap();

        assert_eq!(result.shape_index, 1);
        assert_eq!(text_of(&shapes, 1), "Line one\nLine 2");
    }

    #[test]
    fn test_edit_bullet_point_out_of_range() {
        let mut shapes = sample_slide();
        assert!(matches!(
            apply_edit(&mut shapes, &EditTarget::BulletPoint(7), "x"),
            Err(Error::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_edit_bullet_list_strips_glyphs() {
        let mut shapes = sample_slide();
        let result = apply_edit(
            &mut shapes,
            &EditTarget::BulletList(2),
            "• Growth\n•• Margins\n\n- Hiring",
        )
        .unwrap();

        assert_eq!(result.new_text, "Growth\nMargins\n\nHiring");
        assert_eq!(
            result.message,
            "Formatted shape 2 as bullet list with 3 items"
        );
        assert_eq!(text_of(&shapes, 2), "Growth\nMargins\n\nHiring");
    }
}
