use crate::types::EntityId;

/// Domain errors detected without talking to the remote store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// No entity with this id in the local collection.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: EntityId },

    /// A mandatory field is missing or a value is out of range.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The operation would break a relationship between entities.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A remote row could not be represented as a model.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        let err = CoreError::NotFound {
            entity: "Team",
            id: EntityId::nil(),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Team not found: 00000000-0000-0000-0000-000000000000"
        );
    }
}
