// src/services/discovery_service.rs
//
// Discovery Service - mood/genre discovery over two provider queries
//
// CRITICAL RULES:
// - Issues the genre and keyword queries in parallel
// - Both sources must succeed; a failed source propagates to the caller,
//   who owns the decision whether a single-source result would be acceptable
// - The merge is a heuristic blend, not a guaranteed superset: only the
//   already-ranked first page of each source is considered, so items beyond
//   the cap are silently discarded even if highly popular

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{CandidatePage, MergedResult};
use crate::error::AppResult;
use crate::events::{DiscoveryMerged, EventBus};
use crate::integrations::MediaProvider;

/// Fixed upper bound of a merged result page
pub const DEFAULT_RESULT_CAP: usize = 20;

#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    /// Comma-separated provider genre ids
    pub genres: String,
    /// Comma-separated provider keyword ids
    pub keywords: String,
    pub page: u32,
}

pub struct DiscoveryService {
    provider: Arc<dyn MediaProvider>,
    event_bus: Arc<EventBus>,
    result_cap: usize,
}

impl DiscoveryService {
    pub fn new(provider: Arc<dyn MediaProvider>, event_bus: Arc<EventBus>) -> Self {
        Self {
            provider,
            event_bus,
            result_cap: DEFAULT_RESULT_CAP,
        }
    }

    pub fn with_result_cap(mut self, result_cap: usize) -> Self {
        self.result_cap = result_cap;
        self
    }

    /// Query both sources in parallel and blend them into one ranked page.
    pub async fn discover(&self, request: &DiscoveryRequest) -> AppResult<MergedResult> {
        let (by_genres, by_keywords) = tokio::join!(
            self.provider.discover_by_genres(&request.genres, request.page),
            self.provider.discover_by_keywords(&request.keywords, request.page),
        );

        let primary = by_genres?;
        let secondary = by_keywords?;

        let primary_count = primary.results.len();
        let secondary_count = secondary.results.len();

        let merged = merge_ranked(primary, secondary, self.result_cap);

        self.event_bus.emit(DiscoveryMerged::new(
            primary_count,
            secondary_count,
            merged.results.len(),
        ));

        Ok(merged)
    }
}

/// Combine two independently ranked candidate pages.
///
/// Primary seeds the result; secondary items join only when their id is not
/// taken yet, so on an id collision the primary's popularity value is the one
/// that ranks. The combined list is stably sorted by descending popularity
/// (equal popularity keeps post-dedup relative order) and truncated to `cap`.
///
/// `total_results` counts the deduplicated merge before truncation;
/// `total_pages` is the maximum of the two source totals.
pub fn merge_ranked(primary: CandidatePage, secondary: CandidatePage, cap: usize) -> MergedResult {
    let mut seen: HashSet<i64> = HashSet::new();
    let mut combined = Vec::with_capacity(primary.results.len() + secondary.results.len());

    for item in primary.results {
        if seen.insert(item.id) {
            combined.push(item);
        }
    }
    for item in secondary.results {
        if seen.insert(item.id) {
            combined.push(item);
        }
    }

    // sort_by is stable, ties keep their post-dedup order
    combined.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));

    let total_results = combined.len() as u64;
    combined.truncate(cap);

    MergedResult {
        page: primary.page,
        results: combined,
        total_results,
        total_pages: primary.total_pages.max(secondary.total_pages),
    }
}
