use std::sync::Arc;

use crate::{
    core::errors::ConverterError,
    domain::{CalculationAttributes, ResultHistory},
    storage::ResultHistoryStore,
};

use super::ServiceResult;

/// CRUD over recorded calculation results.
#[derive(Clone)]
pub struct ResultHistoryService {
    results: Arc<dyn ResultHistoryStore>,
}

impl ResultHistoryService {
    pub fn new(results: Arc<dyn ResultHistoryStore>) -> Self {
        Self { results }
    }

    pub fn find_all(&self) -> ServiceResult<Vec<ResultHistory>> {
        self.results.all_results()
    }

    pub fn find_by_id(&self, id: &str) -> ServiceResult<ResultHistory> {
        self.results
            .get_result(id)?
            .ok_or_else(|| ConverterError::ResultHistoryNotFound(id.to_string()))
    }

    pub fn find_all_by_username(&self, username: &str) -> ServiceResult<Vec<ResultHistory>> {
        self.results.results_for_user(username)
    }

    /// Stores a new entry under a freshly generated id.
    pub fn record(
        &self,
        username: &str,
        title: Option<&str>,
        attributes: CalculationAttributes,
    ) -> ServiceResult<ResultHistory> {
        if username.trim().is_empty() {
            return Err(ConverterError::InvalidInput(
                "result history requires a username".into(),
            ));
        }
        let mut entry = ResultHistory::new(username.trim(), attributes);
        if let Some(title) = title.map(str::trim).filter(|title| !title.is_empty()) {
            entry = entry.with_title(title);
        }
        self.persist(&entry)
    }

    pub fn persist(&self, entry: &ResultHistory) -> ServiceResult<ResultHistory> {
        let saved = self.results.put_result(entry)?;
        tracing::info!(id = %saved.id, username = %saved.username, "result recorded");
        Ok(saved)
    }

    /// Replaces the attributes of the entry stored under `id`, or stores
    /// `entry` as given when no such entry exists.
    pub fn update(&self, id: &str, entry: ResultHistory) -> ServiceResult<ResultHistory> {
        match self.results.get_result(id)? {
            Some(mut existing) => {
                existing.calculation_attributes = entry.calculation_attributes;
                self.results.put_result(&existing)
            }
            None => self.persist(&entry),
        }
    }

    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        if self.results.delete_result(id)? {
            tracing::info!(id, "result deleted");
            Ok(())
        } else {
            Err(ConverterError::ResultHistoryNotFound(id.to_string()))
        }
    }

    /// Removes every entry for `username`; having none is an error.
    pub fn delete_all_for_user(&self, username: &str) -> ServiceResult<usize> {
        if self.results.results_for_user(username)?.is_empty() {
            return Err(ConverterError::NoResultHistory(username.to_string()));
        }
        let removed = self.results.delete_results_for_user(username)?;
        tracing::info!(username, removed, "result history cleared");
        Ok(removed)
    }
}
