use super::entity::Reference;
use crate::domain::{DomainError, DomainResult};

/// Validates all Reference invariants
/// These are the absolute rules that must hold for a Reference to be valid
pub fn validate_reference(reference: &Reference) -> DomainResult<()> {
    validate_title(&reference.title)?;
    validate_item_id(reference.item_id)?;
    Ok(())
}

/// Title cannot be empty
fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Reference title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Provider ids are strictly positive
fn validate_item_id(item_id: i64) -> DomainResult<()> {
    if item_id <= 0 {
        return Err(DomainError::InvariantViolation(format!(
            "Item id must be positive, got {}",
            item_id
        )));
    }
    Ok(())
}

/// Invariants that must hold true for the Reference domain:
///
/// 1. (owner_id, item_id, media_type) is unique per collection
/// 2. A reference can exist without any decoration
/// 3. Title cannot be empty
/// 4. Item id is strictly positive
/// 5. Enrichment never mutates a stored reference
