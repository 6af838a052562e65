use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Server-side fault outside the database (hashing, token signing)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Database(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let e = DomainError::not_found("Time slot", 7);
        assert_eq!(e.to_string(), "Time slot not found");
        match e {
            DomainError::NotFound { field, value, .. } => {
                assert_eq!(field, "id");
                assert_eq!(value, "7");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn db_err_maps_to_database_variant() {
        let e: DomainError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(e, DomainError::Database(_)));
        assert!(e.to_string().starts_with("Database error:"));
    }
}
