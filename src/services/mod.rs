// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod discovery_service;
pub mod enrichment_service;
pub mod reference_service;

#[cfg(test)]
mod enrichment_service_tests;

// Re-export all services and their types
pub use reference_service::{
    AddReferenceRequest,
    ReferenceService,
    RemoveReferenceRequest,
};

pub use enrichment_service::{
    EnrichmentConfig,
    EnrichmentService,
};

pub use discovery_service::{
    merge_ranked,
    DiscoveryRequest,
    DiscoveryService,
    DEFAULT_RESULT_CAP,
};
