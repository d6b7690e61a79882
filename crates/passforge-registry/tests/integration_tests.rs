//! Integration tests for passforge-registry

use std::sync::Arc;

use passforge::{
    Breakpoint, DataFieldDraft, FieldType, GranularityLevel, Node, ResponsiveConfig, SectionDraft,
    SectionGrid, SectionType, TemplateDraft, Version, View,
};
use passforge_registry::storage::{MemoryStorage, RegistryStorage};
use passforge_registry::{DefaultRegistry, RegistryError, TemplateRegistry};

fn draft_with_content() -> TemplateDraft {
    let mut draft = TemplateDraft::new("Battery Passport", "org-1", "alice");
    let section = SectionDraft::with_id(
        "general",
        "General",
        SectionType::Group,
        GranularityLevel::Model,
    );
    draft.add_section(section, None).unwrap();
    draft
        .add_data_field(
            "general",
            DataFieldDraft::with_id("name", "Model Name", FieldType::Text, GranularityLevel::Model),
        )
        .unwrap();
    draft
}

#[tokio::test]
async fn test_memory_storage_round_trips_draft() {
    let storage = MemoryStorage::new();

    let mut draft = draft_with_content();
    draft.publish();
    storage.save_draft(&draft).await.unwrap();

    let restored = storage.get_draft(draft.id()).await.unwrap();
    assert_eq!(draft, restored);
    assert_eq!(restored.publications().len(), 1);
}

#[tokio::test]
async fn test_get_missing_draft_fails() {
    let storage = MemoryStorage::new();
    let err = storage.get_draft(&"missing".into()).await.unwrap_err();
    assert!(matches!(err, RegistryError::DraftNotFound(_)));
}

#[tokio::test]
async fn test_publish_draft_persists_template_and_updated_draft() {
    let storage = Arc::new(MemoryStorage::new());
    let registry = DefaultRegistry::new(storage.clone());

    let draft = registry
        .create_draft("Battery Passport", "org-1".into(), "alice".into())
        .await
        .unwrap();

    let mut draft = registry.get_draft(draft.id()).await.unwrap();
    draft
        .add_section(
            SectionDraft::new("General", SectionType::Group, GranularityLevel::Model),
            None,
        )
        .unwrap();
    registry.save_draft(&draft).await.unwrap();

    let template = registry.publish_draft(draft.id()).await.unwrap();
    assert_eq!(template.version(), Version::new(1, 0, 0));

    let stored_template = registry.get_template(template.id()).await.unwrap();
    assert_eq!(template, stored_template);

    let stored_draft = registry.get_draft(draft.id()).await.unwrap();
    assert_eq!(stored_draft.publications().len(), 1);
    assert_eq!(stored_draft.version(), Version::new(1, 0, 0));
    assert_eq!(storage.template_count(), 1);
}

#[tokio::test]
async fn test_list_published_follows_publication_order() {
    let storage = Arc::new(MemoryStorage::new());
    let registry = DefaultRegistry::new(storage);

    let draft = registry
        .create_draft("Battery Passport", "org-1".into(), "alice".into())
        .await
        .unwrap();

    registry.publish_draft(draft.id()).await.unwrap();
    registry.publish_draft(draft.id()).await.unwrap();

    let published = registry.list_published(draft.id()).await.unwrap();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].version(), Version::new(1, 0, 0));
    assert_eq!(published[1].version(), Version::new(1, 1, 0));
}

#[tokio::test]
async fn test_view_workflow() {
    let storage = Arc::new(MemoryStorage::new());
    let registry = DefaultRegistry::new(storage);

    let mut view = View::new("template-1");
    let grid =
        SectionGrid::with_id("n1", "s1", ResponsiveConfig::new().with(Breakpoint::Sm, 3)).unwrap();
    view.add_node(Node::SectionGrid(grid), None).unwrap();
    registry.save_view(&view).await.unwrap();

    let restored = registry.get_view(&"template-1".into()).await.unwrap();
    assert_eq!(view, restored);

    let published = registry
        .publish_view(&"template-1".into(), &"template-2".into())
        .await
        .unwrap();
    assert_eq!(published.template_id(), &"template-2".into());
    assert!(published.get("n1").is_some());

    // The original view stays retrievable under the old template key.
    assert!(registry.get_view(&"template-1".into()).await.is_ok());

    registry.delete_view(&"template-1".into()).await.unwrap();
    let err = registry.get_view(&"template-1".into()).await.unwrap_err();
    assert!(matches!(err, RegistryError::ViewNotFound(_)));
}
