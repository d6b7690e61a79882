//! In-memory storage implementation for testing and development
//!
//! Aggregates are held as serialized JSON, keyed by aggregate id.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use passforge::{Template, TemplateDraft, TemplateId, View};

use crate::error::{RegistryError, Result};
use crate::storage::RegistryStorage;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    drafts: Mutex<HashMap<String, String>>,
    templates: Mutex<HashMap<String, String>>,
    views: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored drafts (useful for testing)
    pub fn draft_count(&self) -> usize {
        self.drafts.lock().map(|map| map.len()).unwrap_or(0)
    }

    /// Number of stored templates (useful for testing)
    pub fn template_count(&self) -> usize {
        self.templates.lock().map(|map| map.len()).unwrap_or(0)
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        for store in [&self.drafts, &self.templates, &self.views] {
            if let Ok(mut map) = store.lock() {
                map.clear();
            }
        }
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>) -> Result<std::sync::MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_| RegistryError::Storage("Lock poisoned".into()))
}

#[async_trait]
impl RegistryStorage for MemoryStorage {
    async fn save_draft(&self, draft: &TemplateDraft) -> Result<()> {
        let json = serde_json::to_string(draft)?;
        lock(&self.drafts)?.insert(draft.id().as_ref().to_string(), json);
        Ok(())
    }

    async fn get_draft(&self, id: &TemplateId) -> Result<TemplateDraft> {
        let json = lock(&self.drafts)?
            .get(id.as_ref())
            .cloned()
            .ok_or_else(|| RegistryError::DraftNotFound(id.to_string()))?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn save_template(&self, template: &Template) -> Result<()> {
        let json = serde_json::to_string(template)?;
        lock(&self.templates)?.insert(template.id().as_ref().to_string(), json);
        Ok(())
    }

    async fn get_template(&self, id: &TemplateId) -> Result<Template> {
        let json = lock(&self.templates)?
            .get(id.as_ref())
            .cloned()
            .ok_or_else(|| RegistryError::TemplateNotFound(id.to_string()))?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn save_view(&self, view: &View) -> Result<()> {
        let json = serde_json::to_string(view)?;
        lock(&self.views)?.insert(view.template_id().as_ref().to_string(), json);
        Ok(())
    }

    async fn get_view_by_template(&self, template_id: &TemplateId) -> Result<View> {
        let json = lock(&self.views)?
            .get(template_id.as_ref())
            .cloned()
            .ok_or_else(|| RegistryError::ViewNotFound(template_id.to_string()))?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn delete_view_by_template(&self, template_id: &TemplateId) -> Result<()> {
        lock(&self.views)?.remove(template_id.as_ref());
        Ok(())
    }
}
