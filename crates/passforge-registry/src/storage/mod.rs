//! Storage abstraction for registry data

use async_trait::async_trait;

use passforge::{Template, TemplateDraft, TemplateId, View};

use crate::error::Result;

pub mod memory;

pub use memory::MemoryStorage;

/// Gateway to the backing store for drafts, published templates and views.
///
/// `save_*` is an upsert by id; `get_*` fails with the matching not-found
/// error. The store must round-trip full aggregates without loss, including
/// nested sections/fields and the flat node collection of a view. The
/// gateway is also responsible for read-modify-write atomicity per aggregate
/// id; the domain model assumes single-writer access during a call.
#[async_trait]
pub trait RegistryStorage: Send + Sync {
    /// Upsert a draft by its id
    async fn save_draft(&self, draft: &TemplateDraft) -> Result<()>;

    /// Fetch a draft by id
    async fn get_draft(&self, id: &TemplateId) -> Result<TemplateDraft>;

    /// Upsert a published template by its id
    async fn save_template(&self, template: &Template) -> Result<()>;

    /// Fetch a published template by id
    async fn get_template(&self, id: &TemplateId) -> Result<Template>;

    /// Upsert a view, keyed by the template it arranges
    async fn save_view(&self, view: &View) -> Result<()>;

    /// Fetch the view arranging a template
    async fn get_view_by_template(&self, template_id: &TemplateId) -> Result<View>;

    /// Delete the view arranging a template, if any
    async fn delete_view_by_template(&self, template_id: &TemplateId) -> Result<()>;
}
