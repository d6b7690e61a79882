//! Passforge is the authoring core for digital product passport templates:
//! mutable draft trees edited through an aggregate root, immutable versioned
//! snapshots produced by publishing, and flat node trees arranging sections
//! and fields on a responsive grid.

pub mod draft;
pub mod error;
pub mod layout;
pub mod template;
pub mod version;
pub mod view;

// Re-export core types
pub use draft::{
    DataFieldDraft, FieldPatch, FieldType, GranularityLevel, MoveDirection, OrgId, SectionDraft,
    SectionType, TemplateDraft, UserId,
};
pub use error::{DomainError, EntityKind, Result};
pub use layout::{Breakpoint, GRID_UNITS, Layout, LayoutPatch, ResponsiveConfig};
pub use template::{Publication, Template, TemplateField, TemplateId, TemplateSection};
pub use version::{Version, VersionBump};
pub use view::{DataFieldRef, Node, NodeWithParent, SectionGrid, View};
