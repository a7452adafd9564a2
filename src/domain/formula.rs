//! Catalog entries describing a single conversion or calculation.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::core::{
    errors::{ConverterError, Result},
    utils::is_safe_key,
};

use super::common::Displayable;

/// A named conversion definition owned by the formula catalog.
///
/// Values are validated when built or deserialized and are never mutated
/// afterwards; favorites lists hold copies resolved from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FormulaRecord", into = "FormulaRecord")]
pub struct Formula {
    formula_name: String,
    formula_url: String,
    category: String,
    display_name: String,
}

impl Formula {
    pub fn builder(formula_name: impl Into<String>) -> FormulaBuilder {
        FormulaBuilder {
            formula_name: formula_name.into(),
            formula_url: None,
            category: None,
            display_name: None,
        }
    }

    /// The catalog key.
    pub fn formula_name(&self) -> &str {
        &self.formula_name
    }

    pub fn formula_url(&self) -> &str {
        &self.formula_url
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl Displayable for Formula {
    fn display_label(&self) -> String {
        format!("{} ({})", self.display_name, self.category)
    }
}

/// Builds a [`Formula`], deriving the URL and display name when omitted.
#[derive(Debug, Clone)]
pub struct FormulaBuilder {
    formula_name: String,
    formula_url: Option<String>,
    category: Option<String>,
    display_name: Option<String>,
}

impl FormulaBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.formula_url = Some(url.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn build(self) -> Result<Formula> {
        let formula_url = self
            .formula_url
            .unwrap_or_else(|| format!("/{}", self.formula_name));
        let display_name = self
            .display_name
            .unwrap_or_else(|| self.formula_name.clone());
        FormulaRecord {
            formula_name: self.formula_name,
            formula_url,
            category: self.category.unwrap_or_default(),
            display_name,
        }
        .try_into()
    }
}

/// Serialized shape of a formula document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FormulaRecord {
    formula_name: String,
    formula_url: String,
    category: String,
    display_name: String,
}

impl TryFrom<FormulaRecord> for Formula {
    type Error = ConverterError;

    fn try_from(record: FormulaRecord) -> Result<Self> {
        let formula_name = record.formula_name.trim().to_string();
        if !is_safe_key(&formula_name) {
            return Err(ConverterError::InvalidInput(format!(
                "formula name `{}` must be letters, digits, `_`, `-` or `.`",
                record.formula_name
            )));
        }
        if record.formula_url.trim().is_empty() {
            return Err(ConverterError::InvalidInput(format!(
                "formula `{}` is missing a URL",
                formula_name
            )));
        }
        if record.category.trim().is_empty() {
            return Err(ConverterError::InvalidInput(format!(
                "formula `{}` is missing a category",
                formula_name
            )));
        }
        if record.display_name.trim().is_empty() {
            return Err(ConverterError::InvalidInput(format!(
                "formula `{}` is missing a display name",
                formula_name
            )));
        }
        Ok(Self {
            formula_name,
            formula_url: record.formula_url.trim().to_string(),
            category: record.category.trim().to_string(),
            display_name: record.display_name.trim().to_string(),
        })
    }
}

impl From<Formula> for FormulaRecord {
    fn from(formula: Formula) -> Self {
        Self {
            formula_name: formula.formula_name,
            formula_url: formula.formula_url,
            category: formula.category,
            display_name: formula.display_name,
        }
    }
}

static BUILT_IN: Lazy<Vec<Formula>> = Lazy::new(|| {
    [
        ("areaCircle", "Mathematics", "Area of a Circle"),
        ("pythagoreanTheorem", "Mathematics", "Pythagorean Theorem"),
        ("mhzToMeters", "Physics", "MHz to Meters"),
        ("celsiusToFahrenheit", "Temperature", "Celsius to Fahrenheit"),
        ("kilometersToMiles", "Distance", "Kilometers to Miles"),
    ]
    .into_iter()
    .map(|(name, category, display_name)| Formula {
        formula_name: name.to_string(),
        formula_url: format!("/{name}"),
        category: category.to_string(),
        display_name: display_name.to_string(),
    })
    .collect()
});

/// Formulas shipped with the application, used to seed an empty catalog.
pub fn default_catalog() -> Vec<Formula> {
    BUILT_IN.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fills_url_and_display_name() {
        let formula = Formula::builder("areaCircle")
            .category("Mathematics")
            .build()
            .expect("valid formula");
        assert_eq!(formula.formula_url(), "/areaCircle");
        assert_eq!(formula.display_name(), "areaCircle");
    }

    #[test]
    fn builder_rejects_unsafe_names_and_missing_category() {
        let err = Formula::builder("../escape")
            .category("Mathematics")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConverterError::InvalidInput(_)));

        let err = Formula::builder("areaCircle").build().unwrap_err();
        assert!(matches!(err, ConverterError::InvalidInput(_)));
    }

    #[test]
    fn deserialization_validates_documents() {
        let json = r#"{"formulaName":"","formulaUrl":"/x","category":"c","displayName":"d"}"#;
        assert!(serde_json::from_str::<Formula>(json).is_err());

        let json = r#"{"formulaName":"mhzToMeters","formulaUrl":"/mhzToMeters","category":"Physics","displayName":"MHz to Meters"}"#;
        let formula: Formula = serde_json::from_str(json).expect("valid document");
        assert_eq!(formula.formula_name(), "mhzToMeters");
    }

    #[test]
    fn default_catalog_entries_are_valid() {
        for formula in default_catalog() {
            let record = FormulaRecord::from(formula.clone());
            assert_eq!(Formula::try_from(record).expect("valid seed"), formula);
        }
    }
}
