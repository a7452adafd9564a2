use std::{collections::BTreeMap, sync::Arc};

use crate::{domain::Formula, storage::FormulaCatalog};

use super::ServiceResult;

#[derive(Clone)]
pub struct FormulaService {
    catalog: Arc<dyn FormulaCatalog>,
}

impl FormulaService {
    pub fn new(catalog: Arc<dyn FormulaCatalog>) -> Self {
        Self { catalog }
    }

    /// All catalog entries ordered by name.
    pub fn all(&self) -> ServiceResult<Vec<Formula>> {
        let mut formulas = self.catalog.all_formulas()?;
        formulas.sort_by(|a, b| a.formula_name().cmp(b.formula_name()));
        Ok(formulas)
    }

    pub fn get(&self, formula_name: &str) -> ServiceResult<Formula> {
        self.catalog.resolve(formula_name)
    }

    /// Catalog entries grouped under their category, categories in name order.
    pub fn by_category(&self) -> ServiceResult<Vec<(String, Vec<Formula>)>> {
        let mut groups: BTreeMap<String, Vec<Formula>> = BTreeMap::new();
        for formula in self.all()? {
            groups
                .entry(formula.category().to_string())
                .or_default()
                .push(formula);
        }
        Ok(groups.into_iter().collect())
    }
}
