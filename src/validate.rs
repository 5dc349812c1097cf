//! Semantic validation of a decoded canvas.
//!
//! Typed deserialization already guarantees the structural invariants
//! (string fields, numeric positions, `content` arrays). This pass checks
//! what the types cannot: non-empty identifiers, global id uniqueness, and
//! that `defaultCardId` actually resolves somewhere in the tree. Per-node
//! problems are reported before referential ones so a malformed card shows
//! up as itself, not as a dangling default id.

use std::collections::HashSet;

use crate::error::DataLoadError;
use crate::model::{CanvasData, Card};

/// Check the whole-tree invariants of a decoded canvas.
///
/// Pure over its input; returns the first violation found in pre-order.
pub fn validate(data: &CanvasData) -> Result<(), DataLoadError> {
    if data.id.is_empty() {
        return Err(DataLoadError::Validation("canvas id must not be empty".into()));
    }
    if data.title.is_empty() {
        return Err(DataLoadError::Validation("canvas title must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for card in &data.cards {
        validate_card(card, &mut seen)?;
    }

    // Referential check last: the id set is only meaningful once every node
    // passed its own checks.
    if !seen.contains(data.default_card_id.as_str()) {
        return Err(DataLoadError::Validation(format!(
            "defaultCardId \"{}\" does not match any card in the tree",
            data.default_card_id
        )));
    }

    Ok(())
}

fn validate_card<'a>(card: &'a Card, seen: &mut HashSet<&'a str>) -> Result<(), DataLoadError> {
    if card.id.is_empty() {
        return Err(DataLoadError::Validation(format!(
            "card \"{}\" has an empty id",
            card.title
        )));
    }
    if card.title.is_empty() {
        return Err(DataLoadError::Validation(format!(
            "card \"{}\" has an empty title",
            card.id
        )));
    }
    if !seen.insert(card.id.as_str()) {
        return Err(DataLoadError::Validation(format!(
            "duplicate card id \"{}\"",
            card.id
        )));
    }

    if let Some(children) = &card.children {
        for child in children {
            validate_card(child, seen)?;
        }
    }

    Ok(())
}
