// src/events/types.rs
//
// All domain events in the system.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{CollectionKind, MediaType};

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

// ============================================================================
// REFERENCE COLLECTION EVENTS
// ============================================================================

/// Emitted when a reference is added to (or refreshed in) a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceAdded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub collection: CollectionKind,
    pub item_id: i64,
    pub media_type: MediaType,
}

impl ReferenceAdded {
    pub fn new(
        owner_id: Uuid,
        collection: CollectionKind,
        item_id: i64,
        media_type: MediaType,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            owner_id,
            collection,
            item_id,
            media_type,
        }
    }
}

impl DomainEvent for ReferenceAdded {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "ReferenceAdded"
    }
}

/// Emitted when a reference is explicitly removed from a collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceRemoved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub collection: CollectionKind,
    pub item_id: i64,
    pub media_type: MediaType,
}

impl ReferenceRemoved {
    pub fn new(
        owner_id: Uuid,
        collection: CollectionKind,
        item_id: i64,
        media_type: MediaType,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            owner_id,
            collection,
            item_id,
            media_type,
        }
    }
}

impl DomainEvent for ReferenceRemoved {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "ReferenceRemoved"
    }
}

/// Emitted when an owner's collection is bulk-cleared
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionCleared {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub collection: CollectionKind,
    pub removed_count: usize,
}

impl CollectionCleared {
    pub fn new(owner_id: Uuid, collection: CollectionKind, removed_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            owner_id,
            collection,
            removed_count,
        }
    }
}

impl DomainEvent for CollectionCleared {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "CollectionCleared"
    }
}

// ============================================================================
// ENRICHMENT PIPELINE EVENTS
// ============================================================================

/// Emitted when one enrichment run over a reference list finishes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentBatchCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub total_items: usize,
    pub enriched_count: usize,
    pub fallback_count: usize,
    pub skipped_count: usize,
    pub batch_count: usize,
    pub duration_ms: u64,
}

impl EnrichmentBatchCompleted {
    pub fn new(
        total_items: usize,
        enriched_count: usize,
        fallback_count: usize,
        skipped_count: usize,
        batch_count: usize,
        duration_ms: u64,
    ) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            total_items,
            enriched_count,
            fallback_count,
            skipped_count,
            batch_count,
            duration_ms,
        }
    }
}

impl DomainEvent for EnrichmentBatchCompleted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "EnrichmentBatchCompleted"
    }
}

// ============================================================================
// DISCOVERY EVENTS
// ============================================================================

/// Emitted after two candidate sets were blended into one ranked list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryMerged {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub primary_count: usize,
    pub secondary_count: usize,
    pub merged_count: usize,
}

impl DiscoveryMerged {
    pub fn new(primary_count: usize, secondary_count: usize, merged_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            primary_count,
            secondary_count,
            merged_count,
        }
    }
}

impl DomainEvent for DiscoveryMerged {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "DiscoveryMerged"
    }
}
