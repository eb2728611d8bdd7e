//! SQL cache keyed by model and exact question text.

use std::collections::HashMap;

use vanna_common::ModelName;

/// Question to SQL lookups for pairs this client has trained.
#[derive(Debug, Clone, Default)]
pub struct SqlCache {
    entries: HashMap<ModelName, HashMap<String, String>>,
}

impl SqlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, model: &ModelName, question: &str) -> Option<&str> {
        self.entries
            .get(model)
            .and_then(|questions| questions.get(question))
            .map(String::as_str)
    }

    /// Whether exactly this pair is cached.
    pub fn contains_pair(&self, model: &ModelName, question: &str, sql: &str) -> bool {
        self.get(model, question) == Some(sql)
    }

    pub fn insert(&mut self, model: &ModelName, question: impl Into<String>, sql: impl Into<String>) {
        self.entries
            .entry(model.clone())
            .or_default()
            .insert(question.into(), sql.into());
    }

    pub fn remove(&mut self, model: &ModelName, question: &str) -> Option<String> {
        self.entries.get_mut(model)?.remove(question)
    }

    /// Drop every entry for one model.
    pub fn clear_model(&mut self, model: &ModelName) {
        self.entries.remove(model);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
