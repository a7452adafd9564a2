use std::sync::Arc;

use crate::{
    core::errors::ConverterError,
    domain::{FavoritesList, SiteUser},
    storage::{FormulaCatalog, UserStore},
};

use super::{
    favorites_reconciler::{FavoritesChange, FavoritesReconciler},
    ServiceResult,
};

/// Applies favorites changes to stored users as `fetch -> reconcile -> save`.
///
/// Holds no mutable state of its own. Two concurrent changes for the same
/// username race at the store and the last `put` wins; callers that need
/// ordering must serialize per username.
#[derive(Clone)]
pub struct FavoritesService {
    users: Arc<dyn UserStore>,
    catalog: Arc<dyn FormulaCatalog>,
}

impl FavoritesService {
    pub fn new(users: Arc<dyn UserStore>, catalog: Arc<dyn FormulaCatalog>) -> Self {
        Self { users, catalog }
    }

    pub fn add_favorite(&self, username: &str, formula_name: &str) -> ServiceResult<SiteUser> {
        self.apply(username, FavoritesChange::Add(formula_name.to_string()))
    }

    pub fn remove_favorite(&self, username: &str, formula_name: &str) -> ServiceResult<SiteUser> {
        self.apply(username, FavoritesChange::Remove(formula_name.to_string()))
    }

    pub fn reorder_favorites<S: AsRef<str>>(
        &self,
        username: &str,
        ids: &[S],
    ) -> ServiceResult<SiteUser> {
        let ids = ids.iter().map(|id| id.as_ref().to_string()).collect();
        self.apply(username, FavoritesChange::Reorder(ids))
    }

    pub fn clear_favorites(&self, username: &str) -> ServiceResult<SiteUser> {
        self.apply(username, FavoritesChange::Clear)
    }

    pub fn favorites(&self, username: &str) -> ServiceResult<FavoritesList> {
        Ok(self.load(username)?.favorites().clone())
    }

    /// Runs one change end to end. A reconcile failure returns before any
    /// write, and a failed `put` leaves the stored record as it was.
    pub fn apply(&self, username: &str, change: FavoritesChange) -> ServiceResult<SiteUser> {
        let user = self.load(username)?;
        let reconciler = FavoritesReconciler::new(self.catalog.as_ref());
        let favorites = match reconciler.apply(user.favorites(), &change) {
            Ok(favorites) => favorites,
            Err(err) => {
                tracing::warn!(username, change = %change, error = %err, "favorites change rejected");
                return Err(err);
            }
        };
        let saved = self.users.put_user(&user.with_favorites(favorites))?;
        tracing::info!(
            username,
            change = %change,
            count = saved.favorites().len(),
            "favorites updated"
        );
        Ok(saved)
    }

    fn load(&self, username: &str) -> ServiceResult<SiteUser> {
        self.users
            .get_user(username)?
            .ok_or_else(|| ConverterError::UserNotFound(username.to_string()))
    }
}
