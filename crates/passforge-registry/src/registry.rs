//! High-level registry interface for draft, template and view management

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use passforge::{OrgId, Template, TemplateDraft, TemplateId, UserId, View};

use crate::error::Result;
use crate::storage::RegistryStorage;

/// High-level template registry interface.
///
/// All operations are load→mutate→save round trips over the storage
/// gateway; callers are expected to have cleared authorization (via
/// `is_owned_by`) before invoking mutations.
#[async_trait]
pub trait TemplateRegistry {
    /// Create and persist an empty draft
    async fn create_draft(
        &self,
        name: &str,
        organization_id: OrgId,
        created_by: UserId,
    ) -> Result<TemplateDraft>;

    /// Fetch a draft by id
    async fn get_draft(&self, id: &TemplateId) -> Result<TemplateDraft>;

    /// Persist a draft after mutation
    async fn save_draft(&self, draft: &TemplateDraft) -> Result<()>;

    /// Publish a draft: freeze its structure into a new immutable template,
    /// persist the template and the updated draft, and return the template
    async fn publish_draft(&self, draft_id: &TemplateId) -> Result<Template>;

    /// Fetch a published template by id
    async fn get_template(&self, id: &TemplateId) -> Result<Template>;

    /// Fetch every template published from a draft, in publish order
    async fn list_published(&self, draft_id: &TemplateId) -> Result<Vec<Template>>;

    /// Persist a view, keyed by the template it arranges
    async fn save_view(&self, view: &View) -> Result<()>;

    /// Fetch the view arranging a template
    async fn get_view(&self, template_id: &TemplateId) -> Result<View>;

    /// Delete the view arranging a template
    async fn delete_view(&self, template_id: &TemplateId) -> Result<()>;

    /// Rebind the view of a template to a newly published template and
    /// persist the copy. Node ids and tree shape are preserved.
    async fn publish_view(
        &self,
        template_id: &TemplateId,
        new_template_id: &TemplateId,
    ) -> Result<View>;
}

/// Default implementation of the template registry
pub struct DefaultRegistry {
    storage: Arc<dyn RegistryStorage>,
}

impl DefaultRegistry {
    /// Create a new registry with the given storage backend
    pub fn new(storage: Arc<dyn RegistryStorage>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl TemplateRegistry for DefaultRegistry {
    async fn create_draft(
        &self,
        name: &str,
        organization_id: OrgId,
        created_by: UserId,
    ) -> Result<TemplateDraft> {
        info!("Creating draft: {}", name);
        let draft = TemplateDraft::new(name, organization_id, created_by);
        self.storage.save_draft(&draft).await?;
        Ok(draft)
    }

    async fn get_draft(&self, id: &TemplateId) -> Result<TemplateDraft> {
        debug!("Fetching draft: {}", id);
        self.storage.get_draft(id).await
    }

    async fn save_draft(&self, draft: &TemplateDraft) -> Result<()> {
        debug!("Saving draft: {}", draft.id());
        self.storage.save_draft(draft).await
    }

    async fn publish_draft(&self, draft_id: &TemplateId) -> Result<Template> {
        info!("Publishing draft: {}", draft_id);
        let mut draft = self.storage.get_draft(draft_id).await?;
        let template = draft.publish();
        self.storage.save_template(&template).await?;
        self.storage.save_draft(&draft).await?;
        info!(
            "Published draft {} as template {} ({})",
            draft_id,
            template.id(),
            template.version()
        );
        Ok(template)
    }

    async fn get_template(&self, id: &TemplateId) -> Result<Template> {
        debug!("Fetching template: {}", id);
        self.storage.get_template(id).await
    }

    async fn list_published(&self, draft_id: &TemplateId) -> Result<Vec<Template>> {
        let draft = self.storage.get_draft(draft_id).await?;
        let mut templates = Vec::with_capacity(draft.publications().len());
        for publication in draft.publications() {
            templates.push(self.storage.get_template(&publication.template_id).await?);
        }
        Ok(templates)
    }

    async fn save_view(&self, view: &View) -> Result<()> {
        debug!("Saving view for template: {}", view.template_id());
        self.storage.save_view(view).await
    }

    async fn get_view(&self, template_id: &TemplateId) -> Result<View> {
        debug!("Fetching view for template: {}", template_id);
        self.storage.get_view_by_template(template_id).await
    }

    async fn delete_view(&self, template_id: &TemplateId) -> Result<()> {
        info!("Deleting view for template: {}", template_id);
        self.storage.delete_view_by_template(template_id).await
    }

    async fn publish_view(
        &self,
        template_id: &TemplateId,
        new_template_id: &TemplateId,
    ) -> Result<View> {
        info!(
            "Rebinding view from template {} to {}",
            template_id, new_template_id
        );
        let view = self.storage.get_view_by_template(template_id).await?;
        let published = view.publish_for(new_template_id.clone());
        self.storage.save_view(&published).await?;
        Ok(published)
    }
}
