// src/services/reference_service.rs
//
// Reference Service - collection bookkeeping
//
// CRITICAL RULES:
// - Validates before persisting
// - Repeat add is an upsert, never a duplicate
// - Emits events after the repository call succeeded
// - Never reaches out to the external provider

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{validate_reference, CollectionKind, MediaType, Reference};
use crate::error::{AppError, AppResult};
use crate::events::{CollectionCleared, EventBus, ReferenceAdded, ReferenceRemoved};
use crate::repositories::ReferenceRepository;

#[derive(Debug, Clone)]
pub struct AddReferenceRequest {
    pub owner_id: Uuid,
    pub collection: CollectionKind,
    pub item_id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RemoveReferenceRequest {
    pub owner_id: Uuid,
    pub collection: CollectionKind,
    pub item_id: i64,
    pub media_type: MediaType,
}

pub struct ReferenceService {
    reference_repo: Arc<dyn ReferenceRepository>,
    event_bus: Arc<EventBus>,
}

impl ReferenceService {
    pub fn new(reference_repo: Arc<dyn ReferenceRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            reference_repo,
            event_bus,
        }
    }

    /// Add an item to a collection. Adding an item that is already present
    /// refreshes the stored row (upsert semantics).
    pub fn add(&self, request: AddReferenceRequest) -> AppResult<Reference> {
        let reference = Reference::new(
            request.owner_id,
            request.item_id,
            request.media_type,
            request.title,
        )
        .with_poster(request.poster_path);

        validate_reference(&reference).map_err(AppError::Domain)?;

        self.reference_repo.upsert(request.collection, &reference)?;

        self.event_bus.emit(ReferenceAdded::new(
            reference.owner_id,
            request.collection,
            reference.item_id,
            reference.media_type,
        ));

        Ok(reference)
    }

    pub fn remove(&self, request: RemoveReferenceRequest) -> AppResult<()> {
        let removed = self.reference_repo.remove(
            request.collection,
            request.owner_id,
            request.item_id,
            request.media_type,
        )?;

        if !removed {
            return Err(AppError::NotFound);
        }

        self.event_bus.emit(ReferenceRemoved::new(
            request.owner_id,
            request.collection,
            request.item_id,
            request.media_type,
        ));

        Ok(())
    }

    /// Bulk clear of one owner's collection, returns how many rows went away
    pub fn clear(&self, owner_id: Uuid, collection: CollectionKind) -> AppResult<usize> {
        let removed = self.reference_repo.clear(collection, owner_id)?;

        self.event_bus
            .emit(CollectionCleared::new(owner_id, collection, removed));

        Ok(removed)
    }

    /// Newest first
    pub fn list(&self, owner_id: Uuid, collection: CollectionKind) -> AppResult<Vec<Reference>> {
        self.reference_repo.list(collection, owner_id)
    }
}
