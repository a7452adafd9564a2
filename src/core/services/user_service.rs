use std::sync::Arc;

use crate::{
    core::errors::ConverterError,
    domain::{SiteUser, SiteUserSummary},
    storage::UserStore,
};

use super::ServiceResult;

/// Account registration and lookup.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Creates a user with empty favorites after checking that both the
    /// username and the email are unused.
    pub fn register(&self, username: &str, email: &str) -> ServiceResult<SiteUser> {
        let user = SiteUser::new(username, email)?;
        if self.users.user_exists(user.username())? {
            return Err(ConverterError::UsernameTaken(user.username().to_string()));
        }
        if self.users.email_exists(user.email())? {
            return Err(ConverterError::EmailTaken(user.email().to_string()));
        }
        let saved = self.users.put_user(&user)?;
        tracing::info!(username = saved.username(), "user registered");
        Ok(saved)
    }

    pub fn find(&self, username: &str) -> ServiceResult<SiteUser> {
        self.users
            .get_user(username)?
            .ok_or_else(|| ConverterError::UserNotFound(username.to_string()))
    }

    pub fn summary(&self, username: &str) -> ServiceResult<SiteUserSummary> {
        Ok(self.find(username)?.summary())
    }

    pub fn list(&self) -> ServiceResult<Vec<SiteUserSummary>> {
        Ok(self
            .users
            .list_users()?
            .iter()
            .map(SiteUser::summary)
            .collect())
    }

    /// Deleting an unknown username is not an error.
    pub fn delete(&self, username: &str) -> ServiceResult<bool> {
        let removed = self.users.delete_user(username)?;
        if removed {
            tracing::info!(username, "user deleted");
        }
        Ok(removed)
    }

    pub fn username_available(&self, username: &str) -> ServiceResult<bool> {
        Ok(!self.users.user_exists(username)?)
    }

    pub fn email_available(&self, email: &str) -> ServiceResult<bool> {
        Ok(!self.users.email_exists(email)?)
    }
}
