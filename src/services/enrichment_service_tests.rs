// src/services/enrichment_service_tests.rs
//
// UNIT TESTS: Enrichment pipeline
//
// PURPOSE:
// - Prove the output always has one entry per input, in input order,
//   no matter which individual fetches fail or how long they take
// - Prove a failed item degrades to its base record instead of dropping
// - Prove the pacing delay runs between batches and never after the last
// - Prove the field precedence is by absence, not falsiness
// - Prove enrichment is idempotent against a stable provider

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{sleep, Instant};
use uuid::Uuid;

use crate::db::connection::create_test_pool;
use crate::db::initialize_database;
use crate::domain::{CandidatePage, CollectionKind, MediaType, Reference};
use crate::error::FetchError;
use crate::events::EventBus;
use crate::infrastructure::RetryPolicy;
use crate::integrations::{MediaDetails, MediaProvider};
use crate::repositories::{ReferenceRepository, SqliteReferenceRepository};
use crate::services::enrichment_service::{apply_decorations, EnrichmentConfig, EnrichmentService};

/// Test double with per-item behavior: selected ids fail every attempt,
/// selected ids respond slowly. Records every detail call it receives.
struct ScriptedProvider {
    fail_ids: HashSet<i64>,
    delays: HashMap<i64, Duration>,
    calls: Mutex<Vec<i64>>,
}

impl ScriptedProvider {
    fn reliable() -> Self {
        Self {
            fail_ids: HashSet::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_for(ids: &[i64]) -> Self {
        Self {
            fail_ids: ids.iter().copied().collect(),
            ..Self::reliable()
        }
    }

    fn with_delay(mut self, item_id: i64, delay: Duration) -> Self {
        self.delays.insert(item_id, delay);
        self
    }

    fn calls_for(&self, item_id: i64) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| **id == item_id)
            .count()
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaProvider for ScriptedProvider {
    async fn fetch_details(
        &self,
        _media_type: MediaType,
        item_id: i64,
    ) -> Result<MediaDetails, FetchError> {
        self.calls.lock().unwrap().push(item_id);

        if let Some(delay) = self.delays.get(&item_id) {
            sleep(*delay).await;
        }

        if self.fail_ids.contains(&item_id) {
            return Err(FetchError::Transient("scripted failure".to_string()));
        }

        Ok(MediaDetails {
            title: Some(format!("Item {}", item_id)),
            overview: Some(format!("Overview of {}", item_id)),
            vote_average: Some(7.5),
            genres: Some(vec!["Drama".to_string()]),
            release_date: Some("2020-01-01".to_string()),
            popularity: Some(item_id as f64),
            runtime: Some(110),
            poster_path: None,
        })
    }

    async fn discover_by_genres(
        &self,
        _genres: &str,
        _page: u32,
    ) -> Result<CandidatePage, FetchError> {
        Err(FetchError::Validation("not scripted".to_string()))
    }

    async fn discover_by_keywords(
        &self,
        _keywords: &str,
        _page: u32,
    ) -> Result<CandidatePage, FetchError> {
        Err(FetchError::Validation("not scripted".to_string()))
    }
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        per_attempt_timeout: Duration::from_secs(1),
        base_delay: Duration::from_millis(10),
    }
}

fn config(batch_size: usize, inter_batch_delay: Duration) -> EnrichmentConfig {
    EnrichmentConfig {
        batch_size,
        inter_batch_delay,
        retry: fast_retry(),
    }
}

fn service_with(
    provider: Arc<dyn MediaProvider>,
    config: EnrichmentConfig,
) -> (EnrichmentService, Arc<dyn ReferenceRepository>, Arc<EventBus>) {
    let pool = Arc::new(create_test_pool().unwrap());
    {
        let conn = pool.get().unwrap();
        initialize_database(&conn).unwrap();
    }
    let repo: Arc<dyn ReferenceRepository> = Arc::new(SqliteReferenceRepository::new(pool));
    let bus = Arc::new(EventBus::new());
    let service = EnrichmentService::new(provider, repo.clone(), bus.clone(), config);
    (service, repo, bus)
}

fn references(owner: Uuid, ids: &[i64]) -> Vec<Reference> {
    ids.iter()
        .map(|id| Reference::new(owner, *id, MediaType::Movie, format!("Stored {}", id)))
        .collect()
}

#[tokio::test(start_paused = true)]
async fn test_output_matches_input_length_and_order() {
    let provider = Arc::new(ScriptedProvider::failing_for(&[3, 7]));
    let (service, _repo, _bus) = service_with(provider, config(4, Duration::from_millis(100)));

    let owner = Uuid::new_v4();
    let ids: Vec<i64> = (1..=10).collect();
    let output = service.enrich(references(owner, &ids)).await;

    assert_eq!(output.len(), 10);
    let out_ids: Vec<i64> = output.iter().map(|e| e.reference.item_id).collect();
    assert_eq!(out_ids, ids);
}

#[tokio::test(start_paused = true)]
async fn test_order_survives_out_of_order_completion() {
    // First item of the batch is by far the slowest; ordering must not care
    let provider = Arc::new(
        ScriptedProvider::reliable()
            .with_delay(1, Duration::from_millis(500))
            .with_delay(2, Duration::from_millis(50)),
    );
    let (service, _repo, _bus) = service_with(provider, config(5, Duration::from_millis(100)));

    let owner = Uuid::new_v4();
    let output = service.enrich(references(owner, &[1, 2, 3, 4, 5])).await;

    let out_ids: Vec<i64> = output.iter().map(|e| e.reference.item_id).collect();
    assert_eq!(out_ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test(start_paused = true)]
async fn test_failed_item_degrades_to_base_record() {
    let provider = Arc::new(ScriptedProvider::failing_for(&[2]));
    let (service, _repo, _bus) =
        service_with(provider.clone(), config(5, Duration::from_millis(100)));

    let owner = Uuid::new_v4();
    let input = references(owner, &[1, 2, 3]);
    let base_of_2 = input[1].clone();
    let output = service.enrich(input).await;

    assert_eq!(output.len(), 3);

    // the failed item is the base reference, untouched
    assert_eq!(output[1].reference, base_of_2);
    assert_eq!(output[1].decorations.vote_average, 0.0);
    assert!(output[1].decorations.genres.is_empty());

    // its neighbors were decorated
    assert_eq!(output[0].reference.title, "Item 1");
    assert_eq!(output[2].decorations.runtime, 110);

    // the failing item burned its whole attempt budget
    assert_eq!(provider.calls_for(2), 2);
}

#[tokio::test(start_paused = true)]
async fn test_pacing_delay_between_batches_but_not_after_last() {
    let provider = Arc::new(ScriptedProvider::reliable());
    let delay = Duration::from_millis(300);
    let (service, _repo, _bus) = service_with(provider, config(5, delay));

    let owner = Uuid::new_v4();
    let ids: Vec<i64> = (1..=12).collect();

    let started = Instant::now();
    let output = service.enrich(references(owner, &ids)).await;
    let elapsed = started.elapsed();

    assert_eq!(output.len(), 12);
    // 3 batches → exactly 2 pacing delays, none after the final batch
    assert_eq!(elapsed, delay * 2);
}

#[tokio::test(start_paused = true)]
async fn test_single_batch_has_no_pacing_delay() {
    let provider = Arc::new(ScriptedProvider::reliable());
    let (service, _repo, _bus) = service_with(provider, config(5, Duration::from_secs(60)));

    let owner = Uuid::new_v4();
    let started = Instant::now();
    service.enrich(references(owner, &[1, 2, 3])).await;

    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_media_type_passes_through_without_provider_call() {
    let provider = Arc::new(ScriptedProvider::reliable());
    let (service, _repo, _bus) =
        service_with(provider.clone(), config(5, Duration::from_millis(100)));

    let owner = Uuid::new_v4();
    let mut input = references(owner, &[1]);
    input.push(Reference::new(
        owner,
        2,
        MediaType::Unknown,
        "Mystery".to_string(),
    ));

    let output = service.enrich(input).await;

    assert_eq!(output.len(), 2);
    assert_eq!(output[1].reference.title, "Mystery");
    assert_eq!(output[1].decorations.popularity, 0.0);
    // only the movie reached the provider
    assert_eq!(provider.total_calls(), 1);
    assert_eq!(provider.calls_for(2), 0);
}

#[tokio::test(start_paused = true)]
async fn test_idempotent_against_stable_provider() {
    let provider = Arc::new(ScriptedProvider::failing_for(&[4]));
    let (service, _repo, _bus) =
        service_with(provider, config(3, Duration::from_millis(100)));

    let owner = Uuid::new_v4();
    let input = references(owner, &[1, 2, 3, 4, 5, 6, 7]);

    let first = service.enrich(input.clone()).await;
    let second = service.enrich(input).await;

    assert_eq!(first, second);
}

#[tokio::test(start_paused = true)]
async fn test_run_completion_event_carries_counts() {
    let provider = Arc::new(ScriptedProvider::failing_for(&[2]));
    let (service, _repo, bus) = service_with(provider, config(2, Duration::from_millis(100)));

    let owner = Uuid::new_v4();
    let mut input = references(owner, &[1, 2, 3]);
    input.push(Reference::new(
        owner,
        9,
        MediaType::Unknown,
        "Mystery".to_string(),
    ));

    let done = Arc::new(Mutex::new(None));
    let done_clone = done.clone();
    bus.subscribe::<crate::events::EnrichmentBatchCompleted, _>(move |event| {
        *done_clone.lock().unwrap() = Some(event.clone());
    });

    service.enrich(input).await;

    let event = done.lock().unwrap().clone().unwrap();
    assert_eq!(event.total_items, 4);
    assert_eq!(event.enriched_count, 2);
    assert_eq!(event.fallback_count, 1);
    assert_eq!(event.skipped_count, 1);
    assert_eq!(event.batch_count, 2);
}

#[tokio::test(start_paused = true)]
async fn test_enrich_collection_reads_stored_references() {
    let provider = Arc::new(ScriptedProvider::reliable());
    let (service, repo, _bus) = service_with(provider, config(5, Duration::from_millis(100)));

    let owner = Uuid::new_v4();
    repo.upsert(
        CollectionKind::Watchlist,
        &Reference::new(owner, 550, MediaType::Movie, "Fight Club".to_string()),
    )
    .unwrap();

    let output = service
        .enrich_collection(owner, CollectionKind::Watchlist)
        .await
        .unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output[0].reference.item_id, 550);
    assert_eq!(output[0].decorations.vote_average, 7.5);
}

// ============================================================================
// FIELD PRECEDENCE
// ============================================================================

#[test]
fn test_fetched_values_override_stored_ones() {
    let owner = Uuid::new_v4();
    let base = Reference::new(owner, 550, MediaType::Movie, "Old title".to_string())
        .with_poster(Some("/old.jpg".to_string()));

    let details = MediaDetails {
        title: Some("New title".to_string()),
        poster_path: Some("/new.jpg".to_string()),
        overview: Some("Fresh overview".to_string()),
        vote_average: Some(8.4),
        genres: Some(vec!["Drama".to_string()]),
        release_date: Some("1999-10-15".to_string()),
        popularity: Some(61.4),
        runtime: Some(139),
    };

    let enriched = apply_decorations(base, details);
    assert_eq!(enriched.reference.title, "New title");
    assert_eq!(enriched.reference.poster_path.as_deref(), Some("/new.jpg"));
    assert_eq!(enriched.decorations.vote_average, 8.4);
    assert_eq!(enriched.decorations.runtime, 139);
}

#[test]
fn test_absent_fetched_fields_keep_stored_values() {
    let owner = Uuid::new_v4();
    let base = Reference::new(owner, 550, MediaType::Movie, "Stored title".to_string())
        .with_poster(Some("/stored.jpg".to_string()));

    let enriched = apply_decorations(base, MediaDetails::default());

    assert_eq!(enriched.reference.title, "Stored title");
    assert_eq!(enriched.reference.poster_path.as_deref(), Some("/stored.jpg"));
    // neither side had these, so they settle on the documented defaults
    assert_eq!(enriched.decorations.vote_average, 0.0);
    assert_eq!(enriched.decorations.popularity, 0.0);
    assert_eq!(enriched.decorations.runtime, 0);
    assert!(enriched.decorations.genres.is_empty());
    assert_eq!(enriched.decorations.overview, None);
}

#[test]
fn test_fetched_zero_and_empty_values_are_kept_not_coalesced() {
    // A documentary short with zero popularity and no genres yet: the
    // provider really sent those values and they must survive as-is
    let owner = Uuid::new_v4();
    let base = Reference::new(owner, 42, MediaType::Movie, "Short".to_string());

    let details = MediaDetails {
        vote_average: Some(0.0),
        genres: Some(Vec::new()),
        popularity: Some(0.0),
        runtime: Some(0),
        ..MediaDetails::default()
    };

    let enriched = apply_decorations(base, details);
    assert_eq!(enriched.decorations.vote_average, 0.0);
    assert_eq!(enriched.decorations.popularity, 0.0);
    assert_eq!(enriched.decorations.runtime, 0);
    assert!(enriched.decorations.genres.is_empty());
}
