// src/integrations/mod.rs
//
// External integrations
//
// CRITICAL RULES:
// - Integrations are INFRASTRUCTURE, not DOMAIN
// - They never create or mutate domain entities directly
// - They return DTOs that services map onto the domain

pub mod tmdb;

pub use tmdb::{MediaDetails, MediaProvider, TmdbClient};

#[cfg(test)]
pub use tmdb::MockMediaProvider;
