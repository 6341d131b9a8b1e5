use uuid::Uuid;

use crate::{
    domain::user::User,
    services::error::{ServiceError, ServiceResult},
};

/// The caller behind a request, as resolved from its access token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub user_name: String,
    pub is_active: bool,
    pub is_admin: bool,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            user_name: user.user_name.clone(),
            is_active: user.user_is_active,
            is_admin: user.user_is_admin,
        }
    }
}

/// Attached to every request by the identity layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    LoggedIn(Identity),
    LoggedOut,
}

impl AuthStatus {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthStatus::LoggedIn(identity) => Some(identity),
            AuthStatus::LoggedOut => None,
        }
    }
}

pub fn require_authenticated(status: &AuthStatus) -> ServiceResult<&Identity> {
    status
        .identity()
        .ok_or_else(|| ServiceError::unauthenticated("Not authenticated"))
}

pub fn require_active(status: &AuthStatus) -> ServiceResult<&Identity> {
    let identity = require_authenticated(status)?;
    if !identity.is_active {
        return Err(ServiceError::permission("Inactive user"));
    }
    Ok(identity)
}

pub fn require_admin(status: &AuthStatus) -> ServiceResult<&Identity> {
    let identity = require_active(status)?;
    if !identity.is_admin {
        return Err(ServiceError::permission("Admin privileges required"));
    }
    Ok(identity)
}
