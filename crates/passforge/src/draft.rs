//! Mutable draft model for product passport templates
//!
//! A [`TemplateDraft`] owns an ordered tree of [`SectionDraft`]s, each
//! holding ordered [`DataFieldDraft`]s and nested subsections. Drafts are
//! edited through the aggregate root, which locates targets anywhere in the
//! tree, and frozen into immutable [`Template`](crate::Template) snapshots
//! via [`TemplateDraft::publish`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{DomainError, EntityKind, Result};
use crate::layout::Layout;
use crate::template::{Publication, Template, TemplateId};
use crate::version::{Version, VersionBump};

/// Unique identifier for a user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl From<String> for UserId {
    fn from(s: String) -> Self {
        UserId(s)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId(s.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for an organization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(pub String);

impl From<String> for OrgId {
    fn from(s: String) -> Self {
        OrgId(s)
    }
}

impl From<&str> for OrgId {
    fn from(s: &str) -> Self {
        OrgId(s.to_string())
    }
}

impl AsRef<str> for OrgId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Aggregation tier at which a field's value is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GranularityLevel {
    /// One value per product model
    Model,
    /// One value per produced item
    Item,
}

/// Kinds of sections a template can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    /// A plain named grouping of fields
    Group,
    /// A grouping whose fields repeat per entry
    Repeatable,
}

/// Supported data field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
    Date,
    File,
}

/// Direction for reordering an element within its sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Swap an element with its adjacent sibling. Moving the first element up or
/// the last element down leaves the order unchanged.
fn swap_adjacent<T>(items: &mut [T], index: usize, direction: MoveDirection) {
    match direction {
        MoveDirection::Up if index > 0 => items.swap(index, index - 1),
        MoveDirection::Down if index + 1 < items.len() => items.swap(index, index + 1),
        _ => {}
    }
}

/// Partial update for a data field; `None` fields are left untouched.
///
/// `options` is shallow-merged onto the field's existing bag: new keys are
/// added, existing keys overwritten, untouched keys preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Map<String, Value>>,
}

/// A single data field inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFieldDraft {
    id: String,
    name: String,
    field_type: FieldType,
    #[serde(default)]
    options: Map<String, Value>,
    #[serde(default)]
    layout: Layout,
    granularity: GranularityLevel,
}

impl DataFieldDraft {
    /// Create a field with a generated id and an empty options bag
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        granularity: GranularityLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            field_type,
            options: Map::new(),
            layout: Layout::default(),
            granularity,
        }
    }

    /// Create a field with a specific id (useful for testing)
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        field_type: FieldType,
        granularity: GranularityLevel,
    ) -> Self {
        Self {
            id: id.into(),
            ..Self::new(name, field_type, granularity)
        }
    }

    /// Set the field layout, validating it first
    pub fn with_layout(mut self, layout: Layout) -> Result<Self> {
        layout.validate()?;
        self.layout = layout;
        Ok(self)
    }

    /// Seed the options bag
    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn granularity(&self) -> GranularityLevel {
        self.granularity
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Shallow-merge new options onto the existing bag
    pub fn merge_options(&mut self, options: &Map<String, Value>) {
        for (key, value) in options {
            self.options.insert(key.clone(), value.clone());
        }
    }

    /// Replace the layout, validating it first
    pub fn set_layout(&mut self, layout: Layout) -> Result<()> {
        layout.validate()?;
        self.layout = layout;
        Ok(())
    }
}

/// A named grouping of data fields, optionally nested.
///
/// Insertion order of `fields` and `sections` is the display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDraft {
    id: String,
    name: String,
    section_type: SectionType,
    granularity: GranularityLevel,
    #[serde(default)]
    layout: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    #[serde(default)]
    fields: Vec<DataFieldDraft>,
    #[serde(default)]
    sections: Vec<SectionDraft>,
}

impl SectionDraft {
    /// Create a detached section with a generated id and empty child lists
    pub fn new(
        name: impl Into<String>,
        section_type: SectionType,
        granularity: GranularityLevel,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            section_type,
            granularity,
            layout: Layout::default(),
            parent_id: None,
            fields: Vec::new(),
            sections: Vec::new(),
        }
    }

    /// Create a section with a specific id (useful for testing)
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        section_type: SectionType,
        granularity: GranularityLevel,
    ) -> Self {
        Self {
            id: id.into(),
            ..Self::new(name, section_type, granularity)
        }
    }

    /// Set the section layout, validating it first
    pub fn with_layout(mut self, layout: Layout) -> Result<Self> {
        layout.validate()?;
        self.layout = layout;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn section_type(&self) -> SectionType {
        self.section_type
    }

    pub fn granularity(&self) -> GranularityLevel {
        self.granularity
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn fields(&self) -> &[DataFieldDraft] {
        &self.fields
    }

    pub fn sections(&self) -> &[SectionDraft] {
        &self.sections
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Replace the layout, validating it first
    pub fn set_layout(&mut self, layout: Layout) -> Result<()> {
        layout.validate()?;
        self.layout = layout;
        Ok(())
    }

    /// Append a data field to the end of the display order
    pub fn add_field(&mut self, field: DataFieldDraft) {
        self.fields.push(field);
    }

    /// Append a subsection, claiming it as a child of this section
    pub fn add_subsection(&mut self, mut section: SectionDraft) {
        section.parent_id = Some(self.id.clone());
        self.sections.push(section);
    }

    /// Apply a partial update to a field owned directly by this section
    pub fn modify_field(&mut self, field_id: &str, patch: FieldPatch) -> Result<()> {
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.id == field_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::DataField, field_id))?;
        if let Some(name) = patch.name {
            field.name = name;
        }
        if let Some(options) = patch.options {
            field.merge_options(&options);
        }
        Ok(())
    }

    /// Remove a field owned directly by this section
    pub fn delete_field(&mut self, field_id: &str) -> Result<()> {
        let index = self
            .fields
            .iter()
            .position(|f| f.id == field_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::DataField, field_id))?;
        self.fields.remove(index);
        Ok(())
    }

    /// Swap a field with its adjacent sibling; no-op at the list boundary
    pub fn move_field(&mut self, field_id: &str, direction: MoveDirection) -> Result<()> {
        let index = self
            .fields
            .iter()
            .position(|f| f.id == field_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::DataField, field_id))?;
        swap_adjacent(&mut self.fields, index, direction);
        Ok(())
    }

    /// Remove a direct subsection and, with it, everything it owns
    pub fn delete_subsection(&mut self, section_id: &str) -> Result<()> {
        let index = self
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Section, section_id))?;
        self.sections.remove(index);
        Ok(())
    }

    /// Swap a direct subsection with its adjacent sibling; no-op at the boundary
    pub fn move_subsection(&mut self, section_id: &str, direction: MoveDirection) -> Result<()> {
        let index = self
            .sections
            .iter()
            .position(|s| s.id == section_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Section, section_id))?;
        swap_adjacent(&mut self.sections, index, direction);
        Ok(())
    }

    /// Find this section or a descendant by id
    pub fn find_section(&self, section_id: &str) -> Option<&SectionDraft> {
        if self.id == section_id {
            return Some(self);
        }
        self.sections.iter().find_map(|s| s.find_section(section_id))
    }

    fn find_section_mut(&mut self, section_id: &str) -> Option<&mut SectionDraft> {
        if self.id == section_id {
            return Some(self);
        }
        self.sections
            .iter_mut()
            .find_map(|s| s.find_section_mut(section_id))
    }

    /// Find a field owned by this section or any descendant
    pub fn find_field(&self, field_id: &str) -> Option<&DataFieldDraft> {
        self.fields
            .iter()
            .find(|f| f.id == field_id)
            .or_else(|| self.sections.iter().find_map(|s| s.find_field(field_id)))
    }

    fn field_owner_mut(&mut self, field_id: &str) -> Option<&mut SectionDraft> {
        if self.fields.iter().any(|f| f.id == field_id) {
            return Some(self);
        }
        self.sections
            .iter_mut()
            .find_map(|s| s.field_owner_mut(field_id))
    }

    fn subsection_owner_mut(&mut self, section_id: &str) -> Option<&mut SectionDraft> {
        if self.sections.iter().any(|s| s.id == section_id) {
            return Some(self);
        }
        self.sections
            .iter_mut()
            .find_map(|s| s.subsection_owner_mut(section_id))
    }
}

/// Aggregate root for a template under authoring.
///
/// All mutation goes through this type; failed calls leave the draft
/// untouched. `version` only changes on [`TemplateDraft::publish`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDraft {
    id: TemplateId,
    name: String,
    version: Version,
    organization_id: OrgId,
    created_by: UserId,
    #[serde(default)]
    sections: Vec<SectionDraft>,
    #[serde(default)]
    publications: Vec<Publication>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl TemplateDraft {
    /// Create an empty draft with a generated id
    pub fn new(
        name: impl Into<String>,
        organization_id: impl Into<OrgId>,
        created_by: impl Into<UserId>,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: TemplateId(Uuid::new_v4().to_string()),
            name: name.into(),
            version: Version::draft(),
            organization_id: organization_id.into(),
            created_by: created_by.into(),
            sections: Vec::new(),
            publications: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a draft with a specific id (useful for testing)
    pub fn with_id(
        id: impl Into<TemplateId>,
        name: impl Into<String>,
        organization_id: impl Into<OrgId>,
        created_by: impl Into<UserId>,
    ) -> Self {
        Self {
            id: id.into(),
            ..Self::new(name, organization_id, created_by)
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

    pub fn sections(&self) -> &[SectionDraft] {
        &self.sections
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    /// Ownership query for the external authorization guard; the draft
    /// itself never rejects a caller.
    pub fn is_owned_by(&self, organization_id: &OrgId) -> bool {
        &self.organization_id == organization_id
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Attach a section as a new root, or as a subsection of `parent_id`
    pub fn add_section(
        &mut self,
        mut section: SectionDraft,
        parent_id: Option<&str>,
    ) -> Result<()> {
        match parent_id {
            None => {
                section.parent_id = None;
                self.sections.push(section);
            }
            Some(parent_id) => {
                let parent = self
                    .find_section_mut(parent_id)
                    .ok_or_else(|| DomainError::not_found(EntityKind::Section, parent_id))?;
                parent.add_subsection(section);
            }
        }
        self.touch();
        Ok(())
    }

    /// Remove a section and, recursively, all its subsections and fields
    pub fn delete_section(&mut self, section_id: &str) -> Result<()> {
        if let Some(index) = self.sections.iter().position(|s| s.id == section_id) {
            self.sections.remove(index);
            self.touch();
            return Ok(());
        }
        if let Some(owner) = self
            .sections
            .iter_mut()
            .find_map(|s| s.subsection_owner_mut(section_id))
        {
            owner.delete_subsection(section_id)?;
            self.touch();
            return Ok(());
        }
        Err(DomainError::not_found(EntityKind::Section, section_id))
    }

    /// Swap a section with its adjacent sibling in its current list
    pub fn move_section(&mut self, section_id: &str, direction: MoveDirection) -> Result<()> {
        if let Some(index) = self.sections.iter().position(|s| s.id == section_id) {
            swap_adjacent(&mut self.sections, index, direction);
            self.touch();
            return Ok(());
        }
        if let Some(owner) = self
            .sections
            .iter_mut()
            .find_map(|s| s.subsection_owner_mut(section_id))
        {
            owner.move_subsection(section_id, direction)?;
            self.touch();
            return Ok(());
        }
        Err(DomainError::not_found(EntityKind::Section, section_id))
    }

    /// Replace a section's layout, validating it first
    pub fn set_section_layout(&mut self, section_id: &str, layout: Layout) -> Result<()> {
        let section = self
            .find_section_mut(section_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Section, section_id))?;
        section.set_layout(layout)?;
        self.touch();
        Ok(())
    }

    /// Append a data field to a section anywhere in the tree
    pub fn add_data_field(&mut self, section_id: &str, field: DataFieldDraft) -> Result<()> {
        let section = self
            .find_section_mut(section_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Section, section_id))?;
        section.add_field(field);
        self.touch();
        Ok(())
    }

    /// Apply a partial update to a field anywhere in the tree
    pub fn modify_data_field(&mut self, field_id: &str, patch: FieldPatch) -> Result<()> {
        let owner = self
            .field_owner_mut(field_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::DataField, field_id))?;
        owner.modify_field(field_id, patch)?;
        self.touch();
        Ok(())
    }

    /// Remove a field anywhere in the tree
    pub fn delete_data_field(&mut self, field_id: &str) -> Result<()> {
        let owner = self
            .field_owner_mut(field_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::DataField, field_id))?;
        owner.delete_field(field_id)?;
        self.touch();
        Ok(())
    }

    /// Swap a field with its adjacent sibling within its section
    pub fn move_data_field(&mut self, field_id: &str, direction: MoveDirection) -> Result<()> {
        let owner = self
            .field_owner_mut(field_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::DataField, field_id))?;
        owner.move_field(field_id, direction)?;
        self.touch();
        Ok(())
    }

    /// Replace a field's layout, validating it first
    pub fn set_field_layout(&mut self, field_id: &str, layout: Layout) -> Result<()> {
        let owner = self
            .field_owner_mut(field_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::DataField, field_id))?;
        let field = owner
            .fields
            .iter_mut()
            .find(|f| f.id == field_id)
            .ok_or_else(|| DomainError::not_found(EntityKind::DataField, field_id))?;
        field.set_layout(layout)?;
        self.touch();
        Ok(())
    }

    /// Find a section anywhere in the tree
    pub fn find_section(&self, section_id: &str) -> Option<&SectionDraft> {
        self.sections.iter().find_map(|s| s.find_section(section_id))
    }

    /// Find a data field anywhere in the tree
    pub fn find_data_field(&self, field_id: &str) -> Option<&DataFieldDraft> {
        self.sections.iter().find_map(|s| s.find_field(field_id))
    }

    /// Freeze the current structure into an immutable [`Template`].
    ///
    /// Every section, field and the template itself receives a fresh id, so
    /// the snapshot shares no identity with the draft. The publish is
    /// recorded in `publications` and bumps the draft version: the first
    /// publish yields `1.0.0`, each subsequent one a minor bump.
    pub fn publish(&mut self) -> Template {
        let version = self.next_version();
        let template = Template::from_draft(self, version);
        self.publications.push(Publication {
            template_id: template.id().clone(),
            version,
        });
        self.version = version;
        self.touch();
        template
    }

    fn next_version(&self) -> Version {
        if self.publications.is_empty() {
            Version::initial()
        } else {
            self.version.bump(VersionBump::Minor)
        }
    }

    fn find_section_mut(&mut self, section_id: &str) -> Option<&mut SectionDraft> {
        self.sections
            .iter_mut()
            .find_map(|s| s.find_section_mut(section_id))
    }

    fn field_owner_mut(&mut self, field_id: &str) -> Option<&mut SectionDraft> {
        self.sections
            .iter_mut()
            .find_map(|s| s.field_owner_mut(field_id))
    }

    fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft_with_section(section_id: &str) -> TemplateDraft {
        let mut draft = TemplateDraft::new("Battery Passport", "org-1", "user-1");
        let section = SectionDraft::with_id(
            section_id,
            "General",
            SectionType::Group,
            GranularityLevel::Model,
        );
        draft.add_section(section, None).unwrap();
        draft
    }

    fn options(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_add_section_under_missing_parent_fails() {
        let mut draft = draft_with_section("s1");
        let child = SectionDraft::new("Child", SectionType::Group, GranularityLevel::Model);
        let err = draft.add_section(child, Some("nope")).unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                kind: EntityKind::Section,
                ..
            }
        ));
    }

    #[test]
    fn test_add_subsection_sets_parent_id() {
        let mut draft = draft_with_section("s1");
        let child = SectionDraft::with_id(
            "s2",
            "Materials",
            SectionType::Repeatable,
            GranularityLevel::Item,
        );
        draft.add_section(child, Some("s1")).unwrap();

        let child = draft.find_section("s2").unwrap();
        assert_eq!(child.parent_id(), Some("s1"));
    }

    #[test]
    fn test_options_merge_not_replace() {
        let mut draft = draft_with_section("s1");
        let field = DataFieldDraft::with_id(
            "f1",
            "Capacity",
            FieldType::Number,
            GranularityLevel::Model,
        );
        draft.add_data_field("s1", field).unwrap();

        draft
            .modify_data_field(
                "f1",
                FieldPatch {
                    options: Some(options(&[("a", json!(1))])),
                    ..FieldPatch::default()
                },
            )
            .unwrap();
        draft
            .modify_data_field(
                "f1",
                FieldPatch {
                    options: Some(options(&[("b", json!(2))])),
                    ..FieldPatch::default()
                },
            )
            .unwrap();

        let field = draft.find_data_field("f1").unwrap();
        assert_eq!(field.options().get("a"), Some(&json!(1)));
        assert_eq!(field.options().get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_modify_missing_field_fails() {
        let mut draft = draft_with_section("s1");
        let err = draft
            .modify_data_field("missing", FieldPatch::default())
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::NotFound {
                kind: EntityKind::DataField,
                ..
            }
        ));
    }

    #[test]
    fn test_move_field_boundaries_are_no_ops() {
        let mut draft = draft_with_section("s1");
        for id in ["f1", "f2", "f3"] {
            let field =
                DataFieldDraft::with_id(id, id, FieldType::Text, GranularityLevel::Model);
            draft.add_data_field("s1", field).unwrap();
        }

        draft.move_data_field("f1", MoveDirection::Up).unwrap();
        draft.move_data_field("f3", MoveDirection::Down).unwrap();
        let order: Vec<&str> = draft.find_section("s1").unwrap().fields().iter().map(|f| f.id()).collect();
        assert_eq!(order, ["f1", "f2", "f3"]);

        draft.move_data_field("f2", MoveDirection::Up).unwrap();
        let order: Vec<&str> = draft.find_section("s1").unwrap().fields().iter().map(|f| f.id()).collect();
        assert_eq!(order, ["f2", "f1", "f3"]);
    }

    #[test]
    fn test_delete_section_removes_subtree() {
        let mut draft = draft_with_section("s1");
        let child = SectionDraft::with_id(
            "s2",
            "Materials",
            SectionType::Group,
            GranularityLevel::Model,
        );
        draft.add_section(child, Some("s1")).unwrap();
        let field =
            DataFieldDraft::with_id("f1", "Cobalt", FieldType::Text, GranularityLevel::Item);
        draft.add_data_field("s2", field).unwrap();

        draft.delete_section("s1").unwrap();
        assert!(draft.find_section("s1").is_none());
        assert!(draft.find_section("s2").is_none());
        assert!(draft.find_data_field("f1").is_none());
    }

    #[test]
    fn test_is_owned_by() {
        let draft = draft_with_section("s1");
        assert!(draft.is_owned_by(&OrgId::from("org-1")));
        assert!(!draft.is_owned_by(&OrgId::from("org-2")));
    }

    #[test]
    fn test_failed_layout_update_leaves_field_untouched() {
        let mut draft = draft_with_section("s1");
        let field =
            DataFieldDraft::with_id("f1", "Weight", FieldType::Number, GranularityLevel::Model);
        draft.add_data_field("s1", field).unwrap();

        let bad = Layout {
            col_span: crate::layout::ResponsiveConfig::new().with(crate::Breakpoint::Md, 99),
            ..Layout::default()
        };
        assert!(draft.set_field_layout("f1", bad).is_err());
        assert_eq!(draft.find_data_field("f1").unwrap().layout(), &Layout::default());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Deletions never reorder the surviving fields: the final order
            /// equals replaying only the net-surviving adds in their original
            /// relative order.
            #[test]
            fn surviving_field_order_is_stable(deletions in proptest::sample::subsequence(vec![0usize, 1, 2, 3, 4, 5, 6, 7], 0..=8)) {
                let ids: Vec<String> = (0..8).map(|i| format!("f{i}")).collect();
                let mut draft = draft_with_section("s1");
                for id in &ids {
                    let field = DataFieldDraft::with_id(id, id, FieldType::Text, GranularityLevel::Model);
                    draft.add_data_field("s1", field).unwrap();
                }

                for index in &deletions {
                    draft.delete_data_field(&ids[*index]).unwrap();
                }

                let expected: Vec<&String> = ids
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| !deletions.contains(i))
                    .map(|(_, id)| id)
                    .collect();
                let actual: Vec<&str> = draft
                    .find_section("s1")
                    .unwrap()
                    .fields()
                    .iter()
                    .map(|f| f.id())
                    .collect();
                prop_assert_eq!(actual, expected.iter().map(|s| s.as_str()).collect::<Vec<_>>());
            }

            /// A move followed by the opposite move restores the original
            /// order, away from the boundaries.
            #[test]
            fn move_is_reversible(index in 1usize..4) {
                let mut draft = draft_with_section("s1");
                for i in 0..5 {
                    let id = format!("f{i}");
                    let field = DataFieldDraft::with_id(&id, &id, FieldType::Text, GranularityLevel::Model);
                    draft.add_data_field("s1", field).unwrap();
                }
                let before: Vec<String> = draft
                    .find_section("s1").unwrap().fields().iter().map(|f| f.id().to_string()).collect();

                let id = format!("f{index}");
                draft.move_data_field(&id, MoveDirection::Up).unwrap();
                draft.move_data_field(&id, MoveDirection::Down).unwrap();

                let after: Vec<String> = draft
                    .find_section("s1").unwrap().fields().iter().map(|f| f.id().to_string()).collect();
                prop_assert_eq!(before, after);
            }
        }
    }
}
