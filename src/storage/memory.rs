use std::{
    collections::{BTreeMap, HashMap},
    sync::{PoisonError, RwLock},
};

use crate::{
    core::errors::{ConverterError, Result},
    domain::{Formula, ResultHistory, SiteUser},
};

use super::{sort_results, FormulaCatalog, ResultHistoryStore, UserStore};

/// Process-local backend implementing every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, SiteUser>>,
    formulas: RwLock<BTreeMap<String, Formula>>,
    results: RwLock<HashMap<String, ResultHistory>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formulas(formulas: impl IntoIterator<Item = Formula>) -> Self {
        let store = Self::new();
        if let Ok(mut catalog) = store.formulas.write() {
            for formula in formulas {
                catalog.insert(formula.formula_name().to_string(), formula);
            }
        }
        store
    }

    /// Drops a formula from the catalog; favorites referencing it are left alone.
    pub fn remove_formula(&self, formula_name: &str) -> Result<bool> {
        Ok(self
            .formulas
            .write()
            .map_err(poisoned)?
            .remove(formula_name)
            .is_some())
    }
}

fn poisoned<T>(_: PoisonError<T>) -> ConverterError {
    ConverterError::StorageFailure("in-memory store lock poisoned".into())
}

impl UserStore for MemoryStore {
    fn get_user(&self, username: &str) -> Result<Option<SiteUser>> {
        Ok(self.users.read().map_err(poisoned)?.get(username).cloned())
    }

    fn put_user(&self, user: &SiteUser) -> Result<SiteUser> {
        let mut users = self.users.write().map_err(poisoned)?;
        users.insert(user.username().to_string(), user.clone());
        Ok(user.clone())
    }

    fn delete_user(&self, username: &str) -> Result<bool> {
        Ok(self
            .users
            .write()
            .map_err(poisoned)?
            .remove(username)
            .is_some())
    }

    fn list_users(&self) -> Result<Vec<SiteUser>> {
        let mut users: Vec<_> = self.users.read().map_err(poisoned)?.values().cloned().collect();
        users.sort_by(|a, b| a.username().cmp(b.username()));
        Ok(users)
    }
}

impl FormulaCatalog for MemoryStore {
    fn find_formula(&self, formula_name: &str) -> Result<Option<Formula>> {
        Ok(self
            .formulas
            .read()
            .map_err(poisoned)?
            .get(formula_name)
            .cloned())
    }

    fn all_formulas(&self) -> Result<Vec<Formula>> {
        Ok(self
            .formulas
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect())
    }
}

impl ResultHistoryStore for MemoryStore {
    fn all_results(&self) -> Result<Vec<ResultHistory>> {
        let mut entries: Vec<_> = self
            .results
            .read()
            .map_err(poisoned)?
            .values()
            .cloned()
            .collect();
        sort_results(&mut entries);
        Ok(entries)
    }

    fn get_result(&self, id: &str) -> Result<Option<ResultHistory>> {
        Ok(self.results.read().map_err(poisoned)?.get(id).cloned())
    }

    fn put_result(&self, entry: &ResultHistory) -> Result<ResultHistory> {
        self.results
            .write()
            .map_err(poisoned)?
            .insert(entry.id.clone(), entry.clone());
        Ok(entry.clone())
    }

    fn delete_result(&self, id: &str) -> Result<bool> {
        Ok(self.results.write().map_err(poisoned)?.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::default_catalog;

    #[test]
    fn catalog_resolves_known_formulas_only() {
        let store = MemoryStore::with_formulas(default_catalog());
        assert_eq!(
            store.resolve("areaCircle").expect("known").formula_name(),
            "areaCircle"
        );
        let err = store.resolve("nonexistentFormula").unwrap_err();
        assert!(matches!(err, ConverterError::FormulaNotFound(name) if name == "nonexistentFormula"));
    }

    #[test]
    fn put_replaces_the_whole_record() {
        let store = MemoryStore::new();
        let user = SiteUser::new("testUsername", "test@email.com").expect("user");
        store.put_user(&user).expect("put");
        let updated = user
            .clone()
            .with_favorites(vec![default_catalog()[0].clone()].into());
        store.put_user(&updated).expect("put");

        let stored = store.get_user("testUsername").expect("get").expect("present");
        assert_eq!(stored.favorites().ids(), vec!["areaCircle"]);
        assert!(store.email_exists("TEST@email.com").expect("scan"));
    }
}
