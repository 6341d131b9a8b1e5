use crate::{domain::pagination::PageRequestError, repository::StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{field} '{value}' is already taken")]
    Conflict { field: &'static str, value: String },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Permission(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error("credential machinery failed: {0}")]
    Credential(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(field: &'static str, value: impl Into<String>) -> Self {
        Self::Conflict {
            field,
            value: value.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Unauthenticated(message.into())
    }
}

impl From<PageRequestError> for ServiceError {
    fn from(e: PageRequestError) -> Self {
        Self::Validation(e.to_string())
    }
}
