pub mod json_backend;
pub mod memory;

use crate::{
    core::errors::{ConverterError, Result},
    domain::{Formula, ResultHistory, SiteUser},
};

/// Durable user records keyed by username.
///
/// `put_user` is a full-record replace: implementations must not merge
/// fields, and must return the copy they committed.
pub trait UserStore: Send + Sync {
    fn get_user(&self, username: &str) -> Result<Option<SiteUser>>;
    fn put_user(&self, user: &SiteUser) -> Result<SiteUser>;
    /// Returns `true` when a record was removed.
    fn delete_user(&self, username: &str) -> Result<bool>;
    fn list_users(&self) -> Result<Vec<SiteUser>>;

    fn user_exists(&self, username: &str) -> Result<bool> {
        Ok(self.get_user(username)?.is_some())
    }

    fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self
            .list_users()?
            .iter()
            .any(|user| user.email().eq_ignore_ascii_case(email)))
    }
}

/// Read-only lookup of formulas by name.
pub trait FormulaCatalog: Send + Sync {
    fn find_formula(&self, formula_name: &str) -> Result<Option<Formula>>;
    fn all_formulas(&self) -> Result<Vec<Formula>>;

    /// Like [`FormulaCatalog::find_formula`] but absence is an error.
    fn resolve(&self, formula_name: &str) -> Result<Formula> {
        self.find_formula(formula_name)?
            .ok_or_else(|| ConverterError::FormulaNotFound(formula_name.to_string()))
    }
}

/// Persisted calculation results keyed by id.
pub trait ResultHistoryStore: Send + Sync {
    fn all_results(&self) -> Result<Vec<ResultHistory>>;
    fn get_result(&self, id: &str) -> Result<Option<ResultHistory>>;
    fn put_result(&self, entry: &ResultHistory) -> Result<ResultHistory>;
    /// Returns `true` when a record was removed.
    fn delete_result(&self, id: &str) -> Result<bool>;

    fn results_for_user(&self, username: &str) -> Result<Vec<ResultHistory>> {
        Ok(self
            .all_results()?
            .into_iter()
            .filter(|entry| entry.username == username)
            .collect())
    }

    /// Returns the number of records removed.
    fn delete_results_for_user(&self, username: &str) -> Result<usize> {
        let mut removed = 0;
        for entry in self.results_for_user(username)? {
            if self.delete_result(&entry.id)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

/// Orders history entries oldest first, breaking ties by id.
pub(crate) fn sort_results(entries: &mut [ResultHistory]) {
    entries.sort_by(|a, b| {
        a.entry_date
            .cmp(&b.entry_date)
            .then_with(|| a.id.cmp(&b.id))
    });
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStore;
