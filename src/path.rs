//! Path walking and breadcrumb construction.
//!
//! Navigation runs continuously while the user clicks around, so unlike
//! validation these functions never fail hard: an unknown path segment means
//! `None` (or a shorter breadcrumb), and the caller treats that as empty
//! state.

use crate::model::{BreadcrumbSegment, Card};

fn child_slice(card: &Card) -> &[Card] {
    card.children.as_deref().unwrap_or(&[])
}

/// Walk `path` from the root and return what is *inside* the target card.
///
/// The empty path is the root itself, so it returns `cards` unchanged. For a
/// leaf target the result is an empty slice. Any segment that does not match
/// a card at its level yields `None`.
pub fn cards_at_path<'a>(cards: &'a [Card], path: &[String]) -> Option<&'a [Card]> {
    let mut level = cards;
    for id in path {
        let card = level.iter().find(|c| &c.id == id)?;
        level = child_slice(card);
    }
    Some(level)
}

/// The card one level above the target, or `None` for root-level paths.
pub fn parent_card<'a>(cards: &'a [Card], path: &[String]) -> Option<&'a Card> {
    if path.len() <= 1 {
        return None;
    }
    let mut level = cards;
    let mut parent = None;
    for id in &path[..path.len() - 1] {
        let card = level.iter().find(|c| &c.id == id)?;
        level = child_slice(card);
        parent = Some(card);
    }
    parent
}

/// Best-effort breadcrumb trail for `path`.
///
/// Segments that cannot be resolved are skipped rather than failing the
/// whole trail; a single stale id should not break navigation.
pub fn breadcrumb(cards: &[Card], path: &[String]) -> Vec<BreadcrumbSegment> {
    let mut trail = Vec::with_capacity(path.len());
    let mut level = cards;
    for id in path {
        match level.iter().find(|c| &c.id == id) {
            Some(card) => {
                trail.push(BreadcrumbSegment {
                    id: card.id.clone(),
                    title: card.title.clone(),
                });
                level = child_slice(card);
            }
            None => continue,
        }
    }
    trail
}
