//! Past calculation results recorded for a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::common::Displayable;

/// Free-form calculation inputs and outputs keyed by attribute name.
pub type CalculationAttributes = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultHistory {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub entry_date: DateTime<Utc>,
    #[serde(default)]
    pub calculation_attributes: CalculationAttributes,
}

impl ResultHistory {
    pub fn new(username: impl Into<String>, calculation_attributes: CalculationAttributes) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            title: None,
            entry_date: Utc::now(),
            calculation_attributes,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl Displayable for ResultHistory {
    fn display_label(&self) -> String {
        let title = self.title.as_deref().unwrap_or("untitled");
        format!(
            "{} [{}] {}",
            title,
            self.entry_date.format("%Y-%m-%d %H:%M"),
            self.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_entries_get_distinct_ids() {
        let a = ResultHistory::new("testUsername", Map::new());
        let b = ResultHistory::new("testUsername", Map::new());
        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
    }

    #[test]
    fn attributes_survive_serialization() {
        let mut attributes = Map::new();
        attributes.insert("radius".into(), json!(2.0));
        attributes.insert("area".into(), json!(12.566));
        let entry = ResultHistory::new("testUsername", attributes).with_title("areaCircle");

        let json = serde_json::to_string(&entry).expect("serialize");
        assert!(json.contains("calculationAttributes"));
        let back: ResultHistory = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, entry);
    }
}
