// src/services/enrichment_service.rs
//
// Enrichment Service - decorates stored references with provider metadata
//
// CRITICAL RULES:
// - Consumes persisted Reference records, never mutates them
// - Produces a derived, non-persisted view
// - Output has exactly one entry per input, in input order
// - Per-item failure degrades that item to its base record; the run as a
//   whole never fails because of one item
// - Batch N+1 never starts before every item of batch N has settled
// - The pause between batches throttles aggregate request rate against the
//   provider; it is a load guarantee, not an optimization

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::time::sleep;
use uuid::Uuid;

use crate::domain::{CollectionKind, Decorations, EnrichedReference, Reference};
use crate::error::AppResult;
use crate::events::{EnrichmentBatchCompleted, EventBus};
use crate::infrastructure::{RetryPolicy, RetryingFetcher};
use crate::integrations::{MediaDetails, MediaProvider};
use crate::repositories::ReferenceRepository;

#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// How many items are fetched concurrently
    pub batch_size: usize,
    /// Pause between consecutive batches
    pub inter_batch_delay: Duration,
    pub retry: RetryPolicy,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            inter_batch_delay: Duration::from_millis(250),
            retry: RetryPolicy::default(),
        }
    }
}

/// How one item's enrichment attempt ended
enum ItemOutcome {
    Enriched,
    Fallback,
    Skipped,
}

pub struct EnrichmentService {
    provider: Arc<dyn MediaProvider>,
    reference_repo: Arc<dyn ReferenceRepository>,
    event_bus: Arc<EventBus>,
    config: EnrichmentConfig,
}

impl EnrichmentService {
    pub fn new(
        provider: Arc<dyn MediaProvider>,
        reference_repo: Arc<dyn ReferenceRepository>,
        event_bus: Arc<EventBus>,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            provider,
            reference_repo,
            event_bus,
            config,
        }
    }

    /// Load one owner's collection and enrich it
    pub async fn enrich_collection(
        &self,
        owner_id: Uuid,
        collection: CollectionKind,
    ) -> AppResult<Vec<EnrichedReference>> {
        let references = self.reference_repo.list(collection, owner_id)?;
        Ok(self.enrich(references).await)
    }

    /// Enrich a reference list batch by batch.
    ///
    /// Decorations are a pure function of input plus provider state: the same
    /// list against a stable provider yields the same output on every run.
    pub async fn enrich(&self, references: Vec<Reference>) -> Vec<EnrichedReference> {
        let started = Instant::now();
        let total_items = references.len();
        let batch_size = self.config.batch_size.max(1);
        let batch_count = total_items.div_ceil(batch_size);

        let mut output: Vec<EnrichedReference> = Vec::with_capacity(total_items);
        let mut enriched_count = 0usize;
        let mut fallback_count = 0usize;
        let mut skipped_count = 0usize;

        let mut iter = references.into_iter();
        loop {
            let batch: Vec<Reference> = iter.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }

            // All-settled join: every item of the batch finishes (success or
            // exhausted failure) before any result is recorded. join_all
            // returns results in the order the futures were given, so the
            // input ordering survives regardless of completion order.
            let settled = join_all(batch.into_iter().map(|r| self.enrich_one(r))).await;

            for (enriched, outcome) in settled {
                match outcome {
                    ItemOutcome::Enriched => enriched_count += 1,
                    ItemOutcome::Fallback => fallback_count += 1,
                    ItemOutcome::Skipped => skipped_count += 1,
                }
                output.push(enriched);
            }

            if output.len() < total_items {
                sleep(self.config.inter_batch_delay).await;
            }
        }

        let duration_ms = started.elapsed().as_millis() as u64;

        log::info!(
            "enriched {}/{} references ({} fallback, {} skipped) in {} batches",
            enriched_count,
            total_items,
            fallback_count,
            skipped_count,
            batch_count
        );

        self.event_bus.emit(EnrichmentBatchCompleted::new(
            total_items,
            enriched_count,
            fallback_count,
            skipped_count,
            batch_count,
            duration_ms,
        ));

        output
    }

    async fn enrich_one(&self, reference: Reference) -> (EnrichedReference, ItemOutcome) {
        if reference.media_type.provider_segment().is_none() {
            // No provider lookup exists; pass the base record through
            return (EnrichedReference::from_base(reference), ItemOutcome::Skipped);
        }

        let media_type = reference.media_type;
        let item_id = reference.item_id;
        let provider = &self.provider;

        let fetcher = RetryingFetcher::new(self.config.retry.clone());
        let result = fetcher
            .run(|| provider.fetch_details(media_type, item_id))
            .await;

        match result {
            Ok(details) => (apply_decorations(reference, details), ItemOutcome::Enriched),
            Err(err) => {
                log::warn!(
                    "enrichment fell back to base record for {} {}: {}",
                    media_type,
                    item_id,
                    err
                );
                (EnrichedReference::from_base(reference), ItemOutcome::Fallback)
            }
        }
    }
}

/// Merge fetched details onto a base reference.
///
/// Precedence is by absence, not falsiness: a fetched value wins whenever the
/// provider sent one, including legitimate zeros and empty lists; a field the
/// provider omitted keeps the stored value, and numeric/sequence fields with
/// no value on either side settle on 0 / empty.
pub(crate) fn apply_decorations(base: Reference, details: MediaDetails) -> EnrichedReference {
    let reference = Reference {
        owner_id: base.owner_id,
        item_id: base.item_id,
        media_type: base.media_type,
        title: details.title.unwrap_or(base.title),
        poster_path: details.poster_path.or(base.poster_path),
        created_at: base.created_at,
    };

    let decorations = Decorations {
        overview: details.overview,
        vote_average: details.vote_average.unwrap_or(0.0),
        genres: details.genres.unwrap_or_default(),
        release_date: details.release_date,
        popularity: details.popularity.unwrap_or(0.0),
        runtime: details.runtime.unwrap_or(0),
    };

    EnrichedReference {
        reference,
        decorations,
    }
}
