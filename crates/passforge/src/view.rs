//! Flat node tree describing a template's rendering arrangement
//!
//! A [`View`] stores its nodes in a flat map keyed by id; `parent_id` and
//! `children` are relations kept consistent by the mutation operations, not
//! ownership. The tree references template sections and fields by id and is
//! fully decoupled from the draft's own structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, EntityKind, Result};
use crate::layout::{Layout, LayoutPatch, ResponsiveConfig};
use crate::template::TemplateId;

/// A grid container positioning one template section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionGrid {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    section_id: String,
    cols: ResponsiveConfig,
    #[serde(default)]
    configs: Layout,
    #[serde(default)]
    children: Vec<String>,
}

impl SectionGrid {
    /// Create a detached grid referencing a template section. `cols` follows
    /// the fixed-column rule and is validated here.
    pub fn new(section_id: impl Into<String>, cols: ResponsiveConfig) -> Result<Self> {
        cols.validate_fixed_cols()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            parent_id: None,
            section_id: section_id.into(),
            cols,
            configs: Layout::default(),
            children: Vec::new(),
        })
    }

    /// Create a grid with a specific id (useful for testing)
    pub fn with_id(
        id: impl Into<String>,
        section_id: impl Into<String>,
        cols: ResponsiveConfig,
    ) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            ..Self::new(section_id, cols)?
        })
    }

    /// Set the placement configs, validating them first
    pub fn with_configs(mut self, configs: Layout) -> Result<Self> {
        configs.validate()?;
        self.configs = configs;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn section_id(&self) -> &str {
        &self.section_id
    }

    pub fn cols(&self) -> &ResponsiveConfig {
        &self.cols
    }

    pub fn configs(&self) -> &Layout {
        &self.configs
    }

    pub fn children(&self) -> &[String] {
        &self.children
    }
}

/// A leaf node positioning one template data field. Field refs cannot carry
/// children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFieldRef {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent_id: Option<String>,
    field_id: String,
    #[serde(default)]
    configs: Layout,
}

impl DataFieldRef {
    /// Create a detached field reference
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            parent_id: None,
            field_id: field_id.into(),
            configs: Layout::default(),
        }
    }

    /// Create a field reference with a specific id (useful for testing)
    pub fn with_id(id: impl Into<String>, field_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::new(field_id)
        }
    }

    /// Set the placement configs, validating them first
    pub fn with_configs(mut self, configs: Layout) -> Result<Self> {
        configs.validate()?;
        self.configs = configs;
        Ok(self)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    pub fn configs(&self) -> &Layout {
        &self.configs
    }
}

/// A typed node in the view tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    SectionGrid(SectionGrid),
    DataFieldRef(DataFieldRef),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::SectionGrid(node) => &node.id,
            Node::DataFieldRef(node) => &node.id,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Node::SectionGrid(node) => node.parent_id.as_deref(),
            Node::DataFieldRef(node) => node.parent_id.as_deref(),
        }
    }

    /// Ordered child node ids; always empty for field refs
    pub fn children(&self) -> &[String] {
        match self {
            Node::SectionGrid(node) => &node.children,
            Node::DataFieldRef(_) => &[],
        }
    }

    /// Whether this node may carry children
    pub fn is_container(&self) -> bool {
        matches!(self, Node::SectionGrid(_))
    }

    /// Type name used in attachment error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Node::SectionGrid(_) => "SectionGrid",
            Node::DataFieldRef(_) => "DataFieldRef",
        }
    }

    pub fn configs(&self) -> &Layout {
        match self {
            Node::SectionGrid(node) => &node.configs,
            Node::DataFieldRef(node) => &node.configs,
        }
    }

    pub fn as_section_grid(&self) -> Option<&SectionGrid> {
        match self {
            Node::SectionGrid(node) => Some(node),
            Node::DataFieldRef(_) => None,
        }
    }

    fn set_parent(&mut self, parent_id: Option<String>) {
        match self {
            Node::SectionGrid(node) => node.parent_id = parent_id,
            Node::DataFieldRef(node) => node.parent_id = parent_id,
        }
    }

    fn set_configs(&mut self, configs: Layout) {
        match self {
            Node::SectionGrid(node) => node.configs = configs,
            Node::DataFieldRef(node) => node.configs = configs,
        }
    }
}

/// A node paired with its parent, when it has one.
#[derive(Debug)]
pub struct NodeWithParent<'a> {
    pub node: &'a Node,
    pub parent: Option<&'a Node>,
}

/// Rendering arrangement for one template, as a flat node collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    id: String,
    template_id: TemplateId,
    #[serde(default)]
    nodes: BTreeMap<String, Node>,
    #[serde(default)]
    roots: Vec<String>,
}

impl View {
    /// Create an empty view for a template
    pub fn new(template_id: impl Into<TemplateId>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            template_id: template_id.into(),
            nodes: BTreeMap::new(),
            roots: Vec::new(),
        }
    }

    /// Create a view with a specific id (useful for testing)
    pub fn with_id(id: impl Into<String>, template_id: impl Into<TemplateId>) -> Self {
        Self {
            id: id.into(),
            ..Self::new(template_id)
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn template_id(&self) -> &TemplateId {
        &self.template_id
    }

    /// Ordered root node ids
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Attach a detached node to the tree.
    ///
    /// Without a parent only a [`SectionGrid`] is accepted (the root level
    /// takes grid containers only). With a parent, the parent must exist and
    /// be a container. A node id already present anywhere in the tree is
    /// rejected; each node is added exactly once.
    pub fn add_node(&mut self, mut node: Node, parent_id: Option<&str>) -> Result<()> {
        if self.nodes.contains_key(node.id()) {
            return Err(DomainError::invalid_value(format!(
                "node already attached: {}",
                node.id()
            )));
        }
        match parent_id {
            None => {
                if !node.is_container() {
                    return Err(DomainError::invalid_value(format!(
                        "{} cannot be added at the root",
                        node.kind()
                    )));
                }
                node.set_parent(None);
                self.roots.push(node.id().to_string());
            }
            Some(parent_id) => {
                let child_kind = node.kind();
                let parent = self
                    .nodes
                    .get_mut(parent_id)
                    .ok_or_else(|| DomainError::not_found(EntityKind::Node, parent_id))?;
                match parent {
                    Node::SectionGrid(grid) => grid.children.push(node.id().to_string()),
                    other => {
                        return Err(DomainError::invalid_value(format!(
                            "{child_kind} could not be added to {}",
                            other.kind()
                        )));
                    }
                }
                node.set_parent(Some(parent_id.to_string()));
            }
        }
        self.nodes.insert(node.id().to_string(), node);
        Ok(())
    }

    /// Delete a node and every transitive descendant.
    pub fn delete_node_by_id(&mut self, id: &str) -> Result<()> {
        let parent_id = self
            .nodes
            .get(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Node, id))?
            .parent_id()
            .map(str::to_string);

        match parent_id {
            Some(parent_id) => {
                if let Some(Node::SectionGrid(parent)) = self.nodes.get_mut(&parent_id) {
                    parent.children.retain(|child| child != id);
                }
            }
            None => self.roots.retain(|root| root != id),
        }
        self.remove_subtree(id);
        Ok(())
    }

    fn remove_subtree(&mut self, id: &str) {
        if let Some(node) = self.nodes.remove(id) {
            for child in node.children() {
                self.remove_subtree(child);
            }
        }
    }

    /// Re-parent a node under a new container, or promote it to the root.
    ///
    /// Moving a node into its own subtree is rejected; moving it to its
    /// current parent is a no-op.
    pub fn move_node(&mut self, id: &str, new_parent_id: Option<&str>) -> Result<()> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Node, id))?;
        let child_kind = node.kind();
        let current_parent = node.parent_id().map(str::to_string);

        match new_parent_id {
            None => {
                if !node.is_container() {
                    return Err(DomainError::invalid_value(format!(
                        "{child_kind} cannot be added at the root"
                    )));
                }
            }
            Some(parent_id) => {
                if self.is_in_subtree(parent_id, id) {
                    return Err(DomainError::invalid_value(format!(
                        "node {id} cannot be moved into its own subtree"
                    )));
                }
                let parent = self
                    .nodes
                    .get(parent_id)
                    .ok_or_else(|| DomainError::not_found(EntityKind::Node, parent_id))?;
                if !parent.is_container() {
                    return Err(DomainError::invalid_value(format!(
                        "{child_kind} could not be added to {}",
                        parent.kind()
                    )));
                }
            }
        }

        if current_parent.as_deref() == new_parent_id {
            return Ok(());
        }

        match &current_parent {
            Some(parent_id) => {
                if let Some(Node::SectionGrid(parent)) = self.nodes.get_mut(parent_id) {
                    parent.children.retain(|child| child != id);
                }
            }
            None => self.roots.retain(|root| root != id),
        }
        match new_parent_id {
            Some(parent_id) => {
                if let Some(Node::SectionGrid(parent)) = self.nodes.get_mut(parent_id) {
                    parent.children.push(id.to_string());
                }
            }
            None => self.roots.push(id.to_string()),
        }
        if let Some(node) = self.nodes.get_mut(id) {
            node.set_parent(new_parent_id.map(str::to_string));
        }
        Ok(())
    }

    /// Whether `node_id` lies within the subtree rooted at `root_id`
    fn is_in_subtree(&self, node_id: &str, root_id: &str) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == root_id {
                return true;
            }
            current = self.nodes.get(id).and_then(|node| node.parent_id());
        }
        false
    }

    /// Look up a node and its parent by node id. Absence is a normal result,
    /// not an error.
    pub fn find_node_with_parent_by_id(&self, id: &str) -> Option<NodeWithParent<'_>> {
        let node = self.nodes.get(id)?;
        let parent = node.parent_id().and_then(|parent_id| self.nodes.get(parent_id));
        Some(NodeWithParent { node, parent })
    }

    /// Look up the grid referencing a template section, with its parent
    pub fn find_node_with_parent_by_section_id(&self, section_id: &str) -> Option<NodeWithParent<'_>> {
        let node = self.nodes.values().find(|node| {
            node.as_section_grid()
                .is_some_and(|grid| grid.section_id == section_id)
        })?;
        let parent = node.parent_id().and_then(|parent_id| self.nodes.get(parent_id));
        Some(NodeWithParent { node, parent })
    }

    /// Look up the node referencing a template field, with its parent
    pub fn find_node_with_parent_by_field_id(&self, field_id: &str) -> Option<NodeWithParent<'_>> {
        let node = self.nodes.values().find(|node| match node {
            Node::DataFieldRef(field_ref) => field_ref.field_id == field_id,
            Node::SectionGrid(_) => false,
        })?;
        let parent = node.parent_id().and_then(|parent_id| self.nodes.get(parent_id));
        Some(NodeWithParent { node, parent })
    }

    /// Merge a partial placement update onto a node, validating the result
    /// before applying it. Unspecified patch fields retain their value.
    pub fn modify_configs(&mut self, id: &str, patch: &LayoutPatch) -> Result<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Node, id))?;
        let merged = node.configs().apply(patch)?;
        node.set_configs(merged);
        Ok(())
    }

    /// Replace a grid's column config; only containers carry one.
    pub fn modify_cols(&mut self, id: &str, cols: ResponsiveConfig) -> Result<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(EntityKind::Node, id))?;
        match node {
            Node::SectionGrid(grid) => {
                cols.validate_fixed_cols()?;
                grid.cols = cols;
                Ok(())
            }
            other => Err(DomainError::invalid_value(format!(
                "cols cannot be set on {}",
                other.kind()
            ))),
        }
    }

    /// Copy the tree for a newly published template.
    ///
    /// The copy receives a fresh view id and the rebound template reference;
    /// node ids and the tree shape are preserved verbatim. This is distinct
    /// from draft publishing, which regenerates every id.
    pub fn publish_for(&self, new_template_id: impl Into<TemplateId>) -> View {
        View {
            id: Uuid::new_v4().to_string(),
            template_id: new_template_id.into(),
            nodes: self.nodes.clone(),
            roots: self.roots.clone(),
        }
    }
}
