//! Immutable published template snapshots

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::draft::{
    DataFieldDraft, FieldType, GranularityLevel, OrgId, SectionDraft, SectionType, TemplateDraft,
    UserId,
};
use crate::error::{DomainError, Result};
use crate::layout::Layout;
use crate::version::Version;

/// Unique identifier for a template or template draft
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(pub String);

impl From<String> for TemplateId {
    fn from(s: String) -> Self {
        TemplateId(s)
    }
}

impl From<&str> for TemplateId {
    fn from(s: &str) -> Self {
        TemplateId(s.to_string())
    }
}

impl AsRef<str> for TemplateId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TemplateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Record of one publish on a draft: the published template's id and the
/// version it was released under. Publications are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub template_id: TemplateId,
    pub version: Version,
}

/// A frozen data field inside a published template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    pub id: String,
    pub name: String,
    pub field_type: FieldType,
    #[serde(default)]
    pub options: Map<String, Value>,
    #[serde(default)]
    pub layout: Layout,
    pub granularity: GranularityLevel,
}

impl TemplateField {
    fn from_draft(field: &DataFieldDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: field.name().to_string(),
            field_type: field.field_type(),
            options: field.options().clone(),
            layout: field.layout().clone(),
            granularity: field.granularity(),
        }
    }
}

/// A frozen section inside a published template. Draft-only bookkeeping
/// (parent back-references) is dropped on publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSection {
    pub id: String,
    pub name: String,
    pub section_type: SectionType,
    pub granularity: GranularityLevel,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub fields: Vec<TemplateField>,
    #[serde(default)]
    pub sections: Vec<TemplateSection>,
}

impl TemplateSection {
    fn from_draft(section: &SectionDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: section.name().to_string(),
            section_type: section.section_type(),
            granularity: section.granularity(),
            layout: section.layout().clone(),
            fields: section.fields().iter().map(TemplateField::from_draft).collect(),
            sections: section
                .sections()
                .iter()
                .map(TemplateSection::from_draft)
                .collect(),
        }
    }
}

/// An immutable, versioned snapshot of a draft's structure.
///
/// Produced by [`TemplateDraft::publish`]; shares no identity with the
/// draft's internal ids. The only post-construction write is the one-shot
/// marketplace resource assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    id: TemplateId,
    name: String,
    version: Version,
    organization_id: OrgId,
    created_by: UserId,
    #[serde(default)]
    sections: Vec<TemplateSection>,
    #[serde(with = "time::serde::rfc3339")]
    published_at: OffsetDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    marketplace_resource_id: Option<String>,
}

impl Template {
    pub(crate) fn from_draft(draft: &TemplateDraft, version: Version) -> Self {
        Self {
            id: TemplateId(Uuid::new_v4().to_string()),
            name: draft.name().to_string(),
            version,
            organization_id: draft.organization_id().clone(),
            created_by: draft.created_by().clone(),
            sections: draft
                .sections()
                .iter()
                .map(TemplateSection::from_draft)
                .collect(),
            published_at: OffsetDateTime::now_utc(),
            marketplace_resource_id: None,
        }
    }

    pub fn id(&self) -> &TemplateId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn organization_id(&self) -> &OrgId {
        &self.organization_id
    }

    pub fn created_by(&self) -> &UserId {
        &self.created_by
    }

    pub fn sections(&self) -> &[TemplateSection] {
        &self.sections
    }

    pub fn published_at(&self) -> OffsetDateTime {
        self.published_at
    }

    pub fn marketplace_resource_id(&self) -> Option<&str> {
        self.marketplace_resource_id.as_deref()
    }

    /// Ownership query for the external authorization guard
    pub fn is_owned_by(&self, organization_id: &OrgId) -> bool {
        &self.organization_id == organization_id
    }

    /// Record the marketplace resource backing this template. Assignable
    /// exactly once; a second call fails.
    pub fn assign_marketplace_resource(&mut self, resource_id: impl Into<String>) -> Result<()> {
        if self.marketplace_resource_id.is_some() {
            return Err(DomainError::invalid_value(format!(
                "template {} already has a marketplace resource",
                self.id
            )));
        }
        self.marketplace_resource_id = Some(resource_id.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{SectionType, TemplateDraft};

    #[test]
    fn test_marketplace_resource_assignable_once() {
        let mut draft = TemplateDraft::new("Passport", "org-1", "user-1");
        draft
            .add_section(
                SectionDraft::new("General", SectionType::Group, GranularityLevel::Model),
                None,
            )
            .unwrap();
        let mut template = draft.publish();

        template.assign_marketplace_resource("mk-123").unwrap();
        assert_eq!(template.marketplace_resource_id(), Some("mk-123"));
        assert!(template.assign_marketplace_resource("mk-456").is_err());
        assert_eq!(template.marketplace_resource_id(), Some("mk-123"));
    }

    #[test]
    fn test_publish_generates_fresh_ids() {
        let mut draft = TemplateDraft::new("Passport", "org-1", "user-1");
        let section =
            SectionDraft::with_id("s1", "General", SectionType::Group, GranularityLevel::Model);
        draft.add_section(section, None).unwrap();

        let template = draft.publish();
        assert_ne!(template.id(), draft.id());
        assert_ne!(template.sections()[0].id, "s1");
    }
}
