//! Flattening and id lookup over the card tree.
//!
//! `flatten` turns the hierarchy into one pre-order list of `(card, path)`
//! rows. Search, breadcrumbs and the link checker all resolve through it, so
//! its ordering guarantees matter: a node is emitted before its children and
//! sibling order is preserved.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::Card;

/// A card plus the ancestor-id chain that reaches it, own id included.
#[derive(Debug, Clone)]
pub struct CardWithPath<'a> {
    pub card: &'a Card,
    /// `[root_id, ..., own_id]`; length 1 for top-level cards.
    pub path: Vec<String>,
}

/// Flatten the tree into pre-order rows.
///
/// Output length equals the total node count; nothing is skipped or
/// duplicated. Cycles cannot occur since every card owns its children.
pub fn flatten(cards: &[Card]) -> Vec<CardWithPath<'_>> {
    let mut out = Vec::new();
    flatten_into(cards, &[], &mut out);
    out
}

fn flatten_into<'a>(cards: &'a [Card], prefix: &[String], out: &mut Vec<CardWithPath<'a>>) {
    for card in cards {
        let mut path = prefix.to_vec();
        path.push(card.id.clone());
        out.push(CardWithPath {
            card,
            path: path.clone(),
        });
        if let Some(children) = &card.children {
            flatten_into(children, &path, out);
        }
    }
}

/// First card in flatten order whose id matches.
pub fn find_card_by_id<'a>(cards: &'a [Card], id: &str) -> Option<CardWithPath<'a>> {
    flatten(cards).into_iter().find(|entry| entry.card.id == id)
}

/// A cross-reference pointing at an id that is not in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingLink {
    #[serde(rename = "cardId")]
    pub card_id: String,
    pub target: String,
}

/// Report every `links` entry that does not resolve to a card.
///
/// Dangling links are a content problem, not a structural one, so this is a
/// report rather than a validation failure.
pub fn check_links(cards: &[Card]) -> Vec<DanglingLink> {
    let flat = flatten(cards);
    let ids: HashSet<&str> = flat.iter().map(|entry| entry.card.id.as_str()).collect();

    let mut dangling = Vec::new();
    for entry in &flat {
        if let Some(links) = &entry.card.links {
            for target in links {
                if !ids.contains(target.as_str()) {
                    dangling.push(DanglingLink {
                        card_id: entry.card.id.clone(),
                        target: target.clone(),
                    });
                }
            }
        }
    }
    dangling
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    fn card(id: &str, children: Option<Vec<Card>>) -> Card {
        Card {
            id: id.to_string(),
            title: format!("Card {id}"),
            summary: String::new(),
            content: Vec::new(),
            position: Position { x: 0.0, y: 0.0 },
            links: None,
            children,
        }
    }

    fn sample_tree() -> Vec<Card> {
        vec![
            card(
                "a",
                Some(vec![card("a1", None), card("a2", Some(vec![card("a2x", None)]))]),
            ),
            card("b", None),
        ]
    }

    #[test]
    fn test_flatten_counts_every_node() {
        let cards = sample_tree();
        let flat = flatten(&cards);
        assert_eq!(flat.len(), 5);
    }

    #[test]
    fn test_flatten_preorder_and_sibling_order() {
        let cards = sample_tree();
        let ids: Vec<&str> = flatten(&cards).iter().map(|e| e.card.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a1", "a2", "a2x", "b"]);
    }

    #[test]
    fn test_flatten_paths_include_own_id() {
        let cards = sample_tree();
        let flat = flatten(&cards);
        assert_eq!(flat[0].path, vec!["a"]);
        assert_eq!(flat[3].path, vec!["a", "a2", "a2x"]);
        assert_eq!(flat[4].path, vec!["b"]);
    }

    #[test]
    fn test_flatten_no_duplicates() {
        let cards = sample_tree();
        let flat = flatten(&cards);
        let unique: HashSet<&str> = flat.iter().map(|e| e.card.id.as_str()).collect();
        assert_eq!(unique.len(), flat.len());
    }

    #[test]
    fn test_find_card_by_id_nested() {
        let cards = sample_tree();
        let entry = find_card_by_id(&cards, "a2x").unwrap();
        assert_eq!(entry.path, vec!["a", "a2", "a2x"]);
    }

    #[test]
    fn test_find_card_by_id_first_match_wins() {
        // Duplicate ids never survive validation, but lookup order is still
        // part of the contract for hand-built trees.
        let cards = vec![card("dup", Some(vec![card("x", None)])), card("dup", None)];
        let entry = find_card_by_id(&cards, "dup").unwrap();
        assert!(entry.card.children.is_some());
    }

    #[test]
    fn test_find_card_by_id_missing() {
        let cards = sample_tree();
        assert!(find_card_by_id(&cards, "nope").is_none());
    }

    #[test]
    fn test_check_links_reports_dangling() {
        let mut cards = sample_tree();
        cards[1].links = Some(vec!["a2x".to_string(), "ghost".to_string()]);
        let dangling = check_links(&cards);
        assert_eq!(
            dangling,
            vec![DanglingLink {
                card_id: "b".to_string(),
                target: "ghost".to_string()
            }]
        );
    }

    #[test]
    fn test_check_links_clean_tree() {
        let cards = sample_tree();
        assert!(check_links(&cards).is_empty());
    }
}
