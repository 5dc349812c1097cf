//! Hierarchical explainer-card canvas: validation, weighted fuzzy search,
//! breadcrumb navigation and safe markdown rendering.
//!
//! The entry point is [`resolve_canvas_data`], which acquires a
//! [`CanvasData`] tree from an inline value, a URL or an injected
//! [`CanvasLoader`] and validates it. The tree is then read-only: build a
//! [`SearchIndex`] over it, resolve navigation paths with [`cards_at_path`]
//! / [`parent_card`] / [`breadcrumb`], and render card markdown with
//! [`render_markdown`].
//!
//! Every load failure is a [`DataLoadError`] tagged with its origin
//! (validation, url or loader) so callers can branch on
//! [`DataLoadError::source_tag`].

mod error;
mod index;
mod loader;
mod markdown;
mod model;
mod path;
mod search;
mod validate;

pub use error::{DataLoadError, ErrorSource};
pub use index::{check_links, find_card_by_id, flatten, CardWithPath, DanglingLink};
pub use loader::{resolve_canvas_data, CanvasConfig, CanvasLoader};
pub use markdown::render_markdown;
pub use model::{BreadcrumbSegment, CanvasData, Card, ContentBlock, Position};
pub use path::{breadcrumb, cards_at_path, parent_card};
pub use search::{MatchField, SearchIndex, SearchResult, DEFAULT_MAX_RESULTS};
pub use validate::validate;
