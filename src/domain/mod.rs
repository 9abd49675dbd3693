// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod discovery;
pub mod reference;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Reference Domain
pub use reference::{
    validate_reference, CollectionKind, Decorations, EnrichedReference, MediaType, Reference,
};

// Discovery Domain (ranked candidate sets)
pub use discovery::{CandidateItem, CandidatePage, MergedResult};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
