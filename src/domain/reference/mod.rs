pub mod entity;
pub mod invariants;

pub use entity::{CollectionKind, Decorations, EnrichedReference, MediaType, Reference};
pub use invariants::validate_reference;
