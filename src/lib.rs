// src/lib.rs
// Cinetrack - personal movie & series tracker
//
// Architecture:
// - Domain-centric: entities and invariants live in `domain`
// - Repositories are dumb data mappers over SQLite
// - Services orchestrate: collection bookkeeping, the enrichment pipeline
//   and the two-source discovery merge
// - Integrations talk to the external media-information provider and return
//   DTOs only; they never touch domain state
// - Event-driven: services emit facts on an in-process bus
//
// The crate is a library-level pipeline: request handling, sessions and
// rendering are the caller's concern.

// ============================================================================
// MODULES
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod infrastructure;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_reference,
    CandidateItem,
    CandidatePage,
    CollectionKind,
    Decorations,
    EnrichedReference,
    MediaType,
    MergedResult,
    Reference,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult, FetchError};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus, CollectionCleared, DiscoveryMerged, DomainEvent, EnrichmentBatchCompleted,
    EventBus, ReferenceAdded, ReferenceRemoved,
};

// ============================================================================
// PUBLIC API - Infrastructure & Integrations
// ============================================================================

pub use infrastructure::{RetryPolicy, RetryingFetcher};
pub use integrations::{MediaDetails, MediaProvider, TmdbClient};

// ============================================================================
// PUBLIC API - Repositories & Services
// ============================================================================

pub use repositories::{ReferenceRepository, SqliteReferenceRepository};
pub use services::{
    merge_ranked, AddReferenceRequest, DiscoveryRequest, DiscoveryService, EnrichmentConfig,
    EnrichmentService, ReferenceService, RemoveReferenceRequest, DEFAULT_RESULT_CAP,
};
