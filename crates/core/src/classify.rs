//! Shape content classification.
//!
//! Best-effort heuristics over a shape's text: there is no access to the
//! document's placeholder roles, so a title is simply short single-line text
//! and a list is anything that looks like one. Callers get the raw text and
//! shape index back and may override the recommendation.

use crate::bullet::{is_bullet_content, is_title_content, parse_bullet_points};
use crate::shape::TextShape;
use crate::types::{EditHint, ShapeCategory, ShapeClassification, TargetMode};
use std::collections::BTreeMap;

/// Number of characters of text shown in a text box description.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 50;

/// Classify a shape from text the caller has already read.
///
/// Checks run in a fixed order: title, then bullet list, then text box.
pub fn classify(
    shape_index: usize,
    has_readable_text: bool,
    raw_text: Option<&str>,
) -> ShapeClassification {
    if !has_readable_text {
        return ShapeClassification {
            shape_index,
            category: ShapeCategory::NonText,
            text: String::new(),
            description: "Non-text shape (image, chart, etc.)".to_string(),
            bullet_entries: None,
            edit_hint: None,
        };
    }

    let text = raw_text.unwrap_or_default().trim();
    let key = shape_index.to_string();

    let (category, description, bullet_entries, edit_hint) = if text.is_empty() {
        (
            ShapeCategory::EmptyText,
            "Empty text shape".to_string(),
            None,
            None,
        )
    } else if is_title_content(text) {
        (
            ShapeCategory::Title,
            "Main slide title".to_string(),
            None,
            Some(EditHint::new(TargetMode::ShapeIndex, key)),
        )
    } else if is_bullet_content(text) {
        (
            ShapeCategory::BulletList,
            "Bullet list content".to_string(),
            Some(parse_bullet_points(text)),
            Some(EditHint::new(TargetMode::BulletList, key)),
        )
    } else {
        let preview: String = text.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        (
            ShapeCategory::TextBox,
            format!("Text box containing: {}...", preview),
            None,
            Some(EditHint::new(TargetMode::ShapeIndex, key)),
        )
    };

    log::debug!("Shape {} classified as {}", shape_index, category);

    ShapeClassification {
        shape_index,
        category,
        text: text.to_string(),
        description,
        bullet_entries,
        edit_hint,
    }
}

/// Read a shape's text and classify it.
///
/// A failed text query yields [`ShapeCategory::Unknown`] instead of an error.
pub fn classify_shape<S: TextShape + ?Sized>(shape_index: usize, shape: &S) -> ShapeClassification {
    if !shape.has_text() {
        return classify(shape_index, false, None);
    }

    match shape.text() {
        Ok(text) => classify(shape_index, true, Some(&text)),
        Err(e) => {
            log::debug!("Shape {} could not be read: {}", shape_index, e);
            ShapeClassification {
                shape_index,
                category: ShapeCategory::Unknown,
                text: String::new(),
                description: "Unknown shape".to_string(),
                bullet_entries: None,
                edit_hint: None,
            }
        }
    }
}

/// Whether a shape should be edited in `bullet_list` mode.
pub fn should_target_as_bullet_list(info: &ShapeClassification) -> bool {
    info.category == ShapeCategory::BulletList
}

/// All targeting modes that make sense for a shape, keyed by purpose.
pub fn edit_target_recommendations(info: &ShapeClassification) -> BTreeMap<String, String> {
    let mut recommendations = BTreeMap::new();

    if should_target_as_bullet_list(info) {
        recommendations.insert(
            "bullet_formatting".to_string(),
            format!(
                "target_type='{}', target_value='{}'",
                TargetMode::BulletList,
                info.shape_index
            ),
        );
        recommendations.insert(
            "individual_bullets".to_string(),
            format!(
                "target_type='{}', target_value='<bullet_index>'",
                TargetMode::BulletPoint
            ),
        );
    }

    if !info.text.is_empty() {
        recommendations.insert(
            "replace_all_text".to_string(),
            format!(
                "target_type='{}', target_value='{}'",
                TargetMode::ShapeIndex,
                info.shape_index
            ),
        );
        recommendations.insert(
            "replace_specific_text".to_string(),
            format!(
                "target_type='{}', old_text='<text_to_find>'",
                TargetMode::TextReplace
            ),
        );
    }

    recommendations
}
