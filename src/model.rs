//! Core data model for the explainer canvas.
//!
//! A canvas is a tree of cards. Each card owns its children outright; cross
//! references between branches go through the optional `links` list instead.
//! Field names follow the camelCase JSON documents the authoring side
//! produces, which is the de facto interchange format for canvas data.

use serde::{Deserialize, Serialize};

use crate::error::DataLoadError;
use crate::validate;

/// Layout coordinate on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One block of card content, discriminated by its `type` field.
///
/// Only `markdown` blocks are interpreted by this crate; other block types
/// (images, embeds, whatever the renderer grows next) round-trip untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl ContentBlock {
    /// Create a markdown block.
    pub fn markdown(text: impl Into<String>) -> Self {
        let mut fields = serde_json::Map::new();
        fields.insert("text".to_string(), serde_json::Value::String(text.into()));
        Self {
            block_type: "markdown".to_string(),
            fields,
        }
    }

    /// The block's text payload, if it carries one.
    pub fn text(&self) -> Option<&str> {
        self.fields.get("text").and_then(|v| v.as_str())
    }
}

/// A node in the hierarchical card tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub content: Vec<ContentBlock>,
    pub position: Position,
    /// Cross-reference ids into other branches of the tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    /// Nested cards, owned by this card. Absent for leaf cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Card>>,
}

/// Root container for a canvas: identifying strings plus the top-level cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasData {
    pub id: String,
    pub title: String,
    #[serde(rename = "defaultCardId")]
    pub default_card_id: String,
    pub cards: Vec<Card>,
}

impl CanvasData {
    /// Decode and validate canvas data from an untrusted JSON value.
    ///
    /// Shape errors (missing fields, wrong types) and semantic violations
    /// (duplicate ids, dangling `defaultCardId`) both come back as
    /// `DataLoadError::Validation`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DataLoadError> {
        let data: CanvasData = serde_json::from_value(value)
            .map_err(|e| DataLoadError::Validation(e.to_string()))?;
        validate::validate(&data)?;
        Ok(data)
    }

    /// Decode and validate canvas data from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, DataLoadError> {
        let data: CanvasData = serde_json::from_str(json)
            .map_err(|e| DataLoadError::Validation(e.to_string()))?;
        validate::validate(&data)?;
        Ok(data)
    }

    /// The card `default_card_id` points at.
    ///
    /// Present for any canvas that passed validation, so `None` only happens
    /// on hand-built structs that skipped it.
    pub fn default_card(&self) -> Option<&Card> {
        crate::index::find_card_by_id(&self.cards, &self.default_card_id).map(|entry| entry.card)
    }
}

/// One segment of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadcrumbSegment {
    pub id: String,
    pub title: String,
}
