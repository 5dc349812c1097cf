//! Weighted fuzzy search over the flattened card tree.
//!
//! The index holds one entry per card with its searchable text fields.
//! Matching is approximate; each field score is normalised against the
//! query matched to itself, so 0.0 is an exact match and 1.0 matches
//! anything. Field weights (title 2.0, summary 1.5, content 1.0) shrink the
//! normalised score, biasing ranking toward title hits.

use nucleo_matcher::{
    pattern::{CaseMatching, Normalization, Pattern},
    Config, Matcher, Utf32Str,
};
use serde::Serialize;

use crate::index::{find_card_by_id, flatten};
use crate::model::Card;

const TITLE_WEIGHT: f64 = 2.0;
const SUMMARY_WEIGHT: f64 = 1.5;
const CONTENT_WEIGHT: f64 = 1.0;

/// Results scoring above this are dropped.
const SCORE_THRESHOLD: f64 = 0.4;

/// Queries shorter than this (after trimming) skip the matcher entirely.
const MIN_QUERY_CHARS: usize = 2;

/// Default cap on returned results.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Which card field a search hit matched best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Title,
    Summary,
    Content,
}

/// One ranked search hit. `card` is borrowed from the tree the query ran
/// against; the index never copies or mutates cards.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<'a> {
    pub card: &'a Card,
    /// Root-to-card id chain, re-resolved at query time.
    pub path: Vec<String>,
    #[serde(rename = "matchField")]
    pub match_field: MatchField,
    /// Lower is better; 0.0 is an exact match.
    pub score: f64,
}

struct IndexEntry {
    card_id: String,
    title: String,
    summary: String,
    content: Vec<String>,
}

/// Searchable snapshot of a card tree, built once per canvas load.
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
}

impl SearchIndex {
    /// Index every card in the tree, in flatten order.
    pub fn build(cards: &[Card]) -> Self {
        let entries = flatten(cards)
            .into_iter()
            .map(|entry| IndexEntry {
                card_id: entry.card.id.clone(),
                title: entry.card.title.clone(),
                summary: entry.card.summary.clone(),
                content: entry
                    .card
                    .content
                    .iter()
                    .filter_map(|block| block.text().map(str::to_string))
                    .collect(),
            })
            .collect();
        Self { entries }
    }

    /// Number of indexed cards.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run a query and resolve hits back into `cards`.
    ///
    /// Results come back best-first (score non-decreasing), capped at
    /// `max_results`. A hit whose id no longer resolves in `cards` (index
    /// out of sync with the tree) is silently dropped rather than failing
    /// the query.
    pub fn search<'a>(
        &self,
        query: &str,
        cards: &'a [Card],
        max_results: usize,
    ) -> Vec<SearchResult<'a>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        let mut matcher = Matcher::new(Config::DEFAULT);
        let pattern = Pattern::parse(query, CaseMatching::Ignore, Normalization::Smart);

        // Baseline for normalisation: the pattern scored against the query
        // itself, the best score this pattern can reasonably produce.
        let mut buf = Vec::new();
        let Some(baseline) = pattern.score(Utf32Str::new(query, &mut buf), &mut matcher) else {
            return Vec::new();
        };
        let baseline = baseline as f64;

        let mut hits: Vec<(usize, MatchField, f64)> = Vec::new();
        for (i, entry) in self.entries.iter().enumerate() {
            let mut best: Option<(MatchField, f64)> = None;

            let candidates = [
                (MatchField::Title, entry.title.as_str(), TITLE_WEIGHT),
                (MatchField::Summary, entry.summary.as_str(), SUMMARY_WEIGHT),
            ];
            for (field, text, weight) in candidates {
                if let Some(score) = field_score(&pattern, &mut matcher, text, baseline, weight) {
                    if best.map_or(true, |(_, b)| score < b) {
                        best = Some((field, score));
                    }
                }
            }
            for text in &entry.content {
                if let Some(score) =
                    field_score(&pattern, &mut matcher, text, baseline, CONTENT_WEIGHT)
                {
                    if best.map_or(true, |(_, b)| score < b) {
                        best = Some((MatchField::Content, score));
                    }
                }
            }

            if let Some((field, score)) = best {
                if score <= SCORE_THRESHOLD {
                    hits.push((i, field, score));
                }
            }
        }

        // Stable sort keeps flatten order among equal scores.
        hits.sort_by(|a, b| a.2.total_cmp(&b.2));

        hits.into_iter()
            .filter_map(|(i, match_field, score)| {
                let card_id = &self.entries[i].card_id;
                let entry = find_card_by_id(cards, card_id)?;
                Some(SearchResult {
                    card: entry.card,
                    path: entry.path,
                    match_field,
                    score,
                })
            })
            .take(max_results)
            .collect()
    }
}

/// Normalised, weighted score for one field; `None` when the field does not
/// match the pattern at all.
fn field_score(
    pattern: &Pattern,
    matcher: &mut Matcher,
    text: &str,
    baseline: f64,
    weight: f64,
) -> Option<f64> {
    if text.is_empty() {
        return None;
    }
    let mut buf = Vec::new();
    let raw = pattern.score(Utf32Str::new(text, &mut buf), matcher)? as f64;
    let distance = (1.0 - raw / baseline).clamp(0.0, 1.0);
    Some(distance / weight)
}
