//! Pure computation of a user's next favorites list.
//!
//! Every operation takes the current list by reference and returns a new
//! one; the input is never modified, so a failed call has no effect and the
//! caller may simply discard or retry it. The only I/O is formula lookup
//! through the supplied catalog.

use std::fmt;

use crate::{domain::FavoritesList, storage::FormulaCatalog};

use super::ServiceResult;

/// One requested change to a favorites list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesChange {
    Add(String),
    Remove(String),
    Reorder(Vec<String>),
    Clear,
}

impl fmt::Display for FavoritesChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FavoritesChange::Add(id) => write!(f, "add {id}"),
            FavoritesChange::Remove(id) => write!(f, "remove {id}"),
            FavoritesChange::Reorder(ids) => write!(f, "reorder [{}]", ids.join(", ")),
            FavoritesChange::Clear => f.write_str("clear"),
        }
    }
}

pub struct FavoritesReconciler<'a> {
    catalog: &'a dyn FormulaCatalog,
}

impl<'a> FavoritesReconciler<'a> {
    pub fn new(catalog: &'a dyn FormulaCatalog) -> Self {
        Self { catalog }
    }

    pub fn apply(
        &self,
        current: &FavoritesList,
        change: &FavoritesChange,
    ) -> ServiceResult<FavoritesList> {
        match change {
            FavoritesChange::Add(id) => self.add(current, id),
            FavoritesChange::Remove(id) => Ok(self.remove(current, id)),
            FavoritesChange::Reorder(ids) => self.reorder(current, ids.as_slice()),
            FavoritesChange::Clear => Ok(self.clear(current)),
        }
    }

    /// Appends the formula unless it is already present.
    ///
    /// An existing entry short-circuits before any catalog lookup, so a
    /// favorite whose formula has left the catalog is still a no-op.
    pub fn add(&self, current: &FavoritesList, formula_name: &str) -> ServiceResult<FavoritesList> {
        if current.contains(formula_name) {
            tracing::debug!(formula = formula_name, "already a favorite");
            return Ok(current.clone());
        }
        let formula = self.catalog.resolve(formula_name)?;
        Ok(current.appended(formula))
    }

    /// Drops the entry for `formula_name`; absent ids leave the list as is.
    pub fn remove(&self, current: &FavoritesList, formula_name: &str) -> FavoritesList {
        current.without(formula_name)
    }

    /// Replaces the list with `ids` resolved in the given order.
    ///
    /// Entries missing from `ids` are dropped and repeated ids yield repeated
    /// entries. One unknown id fails the whole call.
    pub fn reorder<S: AsRef<str>>(
        &self,
        current: &FavoritesList,
        ids: &[S],
    ) -> ServiceResult<FavoritesList> {
        let formulas = ids
            .iter()
            .map(|id| self.catalog.resolve(id.as_ref()))
            .collect::<ServiceResult<Vec<_>>>()?;
        let reordered = FavoritesList::from(formulas);
        let dropped = current
            .iter()
            .filter(|formula| !reordered.contains(formula.formula_name()))
            .count();
        if dropped > 0 {
            tracing::debug!(dropped, "reorder omitted existing favorites");
        }
        Ok(reordered)
    }

    pub fn clear(&self, _current: &FavoritesList) -> FavoritesList {
        FavoritesList::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::errors::ConverterError,
        domain::{default_catalog, Formula},
        storage::MemoryStore,
    };

    fn catalog() -> MemoryStore {
        MemoryStore::with_formulas(default_catalog())
    }

    fn list(catalog: &MemoryStore, ids: &[&str]) -> FavoritesList {
        let formulas: Vec<Formula> = ids
            .iter()
            .map(|id| catalog.resolve(id).expect("seeded formula"))
            .collect();
        formulas.into()
    }

    #[test]
    fn add_appends_to_the_end() {
        let catalog = catalog();
        let reconciler = FavoritesReconciler::new(&catalog);
        let current = list(&catalog, &["areaCircle"]);

        let next = reconciler.add(&current, "mhzToMeters").expect("add");

        assert_eq!(next.ids(), vec!["areaCircle", "mhzToMeters"]);
        assert_eq!(next.position("mhzToMeters"), Some(current.len()));
        assert_eq!(current.ids(), vec!["areaCircle"]);
    }

    #[test]
    fn add_is_idempotent() {
        let catalog = catalog();
        let reconciler = FavoritesReconciler::new(&catalog);
        let current = list(&catalog, &["mhzToMeters", "areaCircle"]);

        let next = reconciler.add(&current, "mhzToMeters").expect("add");

        assert_eq!(next, current);
    }

    #[test]
    fn add_unknown_formula_fails() {
        let catalog = catalog();
        let reconciler = FavoritesReconciler::new(&catalog);

        let err = reconciler
            .add(&FavoritesList::new(), "nonexistentFormula")
            .unwrap_err();

        assert!(matches!(err, ConverterError::FormulaNotFound(id) if id == "nonexistentFormula"));
    }

    #[test]
    fn add_of_stale_favorite_is_a_no_op() {
        let catalog = catalog();
        let current = list(&catalog, &["areaCircle", "mhzToMeters"]);
        catalog.remove_formula("areaCircle").expect("remove");
        let reconciler = FavoritesReconciler::new(&catalog);

        let next = reconciler.add(&current, "areaCircle").expect("add");

        assert_eq!(next, current);
        assert!(matches!(
            reconciler.add(&FavoritesList::new(), "areaCircle"),
            Err(ConverterError::FormulaNotFound(_))
        ));
    }

    #[test]
    fn remove_filters_and_ignores_absent_ids() {
        let catalog = catalog();
        let reconciler = FavoritesReconciler::new(&catalog);
        let current = list(&catalog, &["areaCircle", "pythagoreanTheorem", "mhzToMeters"]);

        let next = reconciler.remove(&current, "pythagoreanTheorem");
        assert_eq!(next.ids(), vec!["areaCircle", "mhzToMeters"]);

        assert_eq!(reconciler.remove(&next, "pythagoreanTheorem"), next);
    }

    #[test]
    fn remove_keeps_stale_entries_removable() {
        let catalog = catalog();
        let current = list(&catalog, &["areaCircle", "mhzToMeters"]);
        catalog.remove_formula("areaCircle").expect("remove");
        let reconciler = FavoritesReconciler::new(&catalog);

        assert_eq!(reconciler.remove(&current, "areaCircle").ids(), vec!["mhzToMeters"]);
    }

    #[test]
    fn reorder_replaces_membership_with_the_requested_ids() {
        let catalog = catalog();
        let reconciler = FavoritesReconciler::new(&catalog);
        let current = list(&catalog, &["areaCircle", "pythagoreanTheorem", "mhzToMeters"]);

        let next = reconciler
            .reorder(&current, &["mhzToMeters", "areaCircle"])
            .expect("reorder");

        assert_eq!(next.ids(), vec!["mhzToMeters", "areaCircle"]);
    }

    #[test]
    fn reorder_keeps_repeated_ids() {
        let catalog = catalog();
        let reconciler = FavoritesReconciler::new(&catalog);

        let next = reconciler
            .reorder(&FavoritesList::new(), &["areaCircle", "areaCircle"])
            .expect("reorder");

        assert_eq!(next.ids(), vec!["areaCircle", "areaCircle"]);
    }

    #[test]
    fn reorder_with_any_unknown_id_applies_nothing() {
        let catalog = catalog();
        let reconciler = FavoritesReconciler::new(&catalog);
        let current = list(&catalog, &["areaCircle", "mhzToMeters"]);

        let err = reconciler
            .reorder(&current, &["mhzToMeters", "nonexistentFormula", "areaCircle"])
            .unwrap_err();

        assert!(matches!(err, ConverterError::FormulaNotFound(id) if id == "nonexistentFormula"));
        assert_eq!(current.ids(), vec!["areaCircle", "mhzToMeters"]);
    }

    #[test]
    fn clear_always_empties() {
        let catalog = catalog();
        let reconciler = FavoritesReconciler::new(&catalog);
        let current = list(&catalog, &["areaCircle", "mhzToMeters"]);

        let change = FavoritesChange::Clear;
        assert!(reconciler.apply(&current, &change).expect("clear").is_empty());
        assert!(reconciler.clear(&FavoritesList::new()).is_empty());
    }

    #[test]
    fn any_add_remove_sequence_stays_duplicate_free() {
        let catalog = catalog();
        let reconciler = FavoritesReconciler::new(&catalog);
        let changes = [
            FavoritesChange::Add("areaCircle".into()),
            FavoritesChange::Add("mhzToMeters".into()),
            FavoritesChange::Add("areaCircle".into()),
            FavoritesChange::Remove("mhzToMeters".into()),
            FavoritesChange::Add("pythagoreanTheorem".into()),
            FavoritesChange::Add("mhzToMeters".into()),
            FavoritesChange::Add("pythagoreanTheorem".into()),
            FavoritesChange::Reorder(vec!["mhzToMeters".into(), "areaCircle".into()]),
            FavoritesChange::Add("areaCircle".into()),
        ];

        let mut current = FavoritesList::new();
        for change in &changes {
            current = reconciler.apply(&current, change).expect("change applies");
            let mut ids = current.ids();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), current.len(), "duplicate after `{change}`");
        }
        assert_eq!(current.ids(), vec!["mhzToMeters", "areaCircle"]);
    }
}
