//! Search, ordering and selection over in-memory entity lists.
//!
//! All three operations are single-pass and order-preserving:
//!
//! - [`filter_by_query`]: case-insensitive substring match over a fixed field set
//! - [`sort_nodes_by_display_name`]: stable, case-insensitive ordering
//! - [`resolve_selection`]: requested id if visible, else first visible entity
//!
//! Collation: names are compared with the Unicode root collation at primary
//! strength, so case and accents are ignored ("Élan" sorts with "Elan").
//! Equal names keep catalog order.

use icu_collator::{Collator, CollatorOptions, Strength};
use nilscope_catalog::{EcosystemProject, Node};
use std::cmp::Ordering;

// ============================================================================
// Field access
// ============================================================================

/// Entities that expose named text fields to search.
pub trait Searchable {
    type Field: Copy;

    fn field_text(&self, field: Self::Field) -> &str;
}

/// Entities with a catalog-unique id.
pub trait Identified {
    fn entity_id(&self) -> &str;
}

impl<T: Searchable + ?Sized> Searchable for &T {
    type Field = T::Field;

    fn field_text(&self, field: Self::Field) -> &str {
        (**self).field_text(field)
    }
}

impl<T: Identified + ?Sized> Identified for &T {
    fn entity_id(&self) -> &str {
        (**self).entity_id()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    Id,
    DisplayName,
    Operator,
    City,
    Country,
    Cloud,
    NodeType,
}

/// Fields the dashboard search box matches nodes against.
pub const NODE_SEARCH_FIELDS: &[NodeField] = &[
    NodeField::Id,
    NodeField::DisplayName,
    NodeField::Operator,
    NodeField::City,
    NodeField::Country,
    NodeField::NodeType,
];

impl Searchable for Node {
    type Field = NodeField;

    fn field_text(&self, field: NodeField) -> &str {
        match field {
            NodeField::Id => &self.id,
            NodeField::DisplayName => self.display_name(),
            NodeField::Operator => &self.operator,
            NodeField::City => &self.city,
            NodeField::Country => &self.country,
            NodeField::Cloud => &self.cloud,
            NodeField::NodeType => self.node_type.as_str(),
        }
    }
}

impl Identified for Node {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectField {
    Id,
    Name,
    Description,
    Category,
    Website,
}

/// Fields the dashboard search box matches projects against.
pub const PROJECT_SEARCH_FIELDS: &[ProjectField] = &[
    ProjectField::Name,
    ProjectField::Description,
    ProjectField::Category,
    ProjectField::Website,
];

impl Searchable for EcosystemProject {
    type Field = ProjectField;

    fn field_text(&self, field: ProjectField) -> &str {
        match field {
            ProjectField::Id => &self.id,
            ProjectField::Name => &self.name,
            ProjectField::Description => &self.description,
            ProjectField::Category => &self.category,
            ProjectField::Website => &self.website,
        }
    }
}

impl Identified for EcosystemProject {
    fn entity_id(&self) -> &str {
        &self.id
    }
}

// ============================================================================
// Filtering
// ============================================================================

/// `true` when the query is empty or whitespace-only (the identity filter).
pub fn is_blank_query(query: &str) -> bool {
    query.trim().is_empty()
}

/// Whether any of `fields` contains `query`, ignoring case.
///
/// The query is lowercased but not trimmed; callers decide blankness with
/// [`is_blank_query`].
pub fn matches_query<E: Searchable>(entity: &E, query: &str, fields: &[E::Field]) -> bool {
    let needle = query.to_lowercase();
    matches_lowered(entity, &needle, fields)
}

fn matches_lowered<E: Searchable>(entity: &E, needle: &str, fields: &[E::Field]) -> bool {
    fields
        .iter()
        .any(|&field| entity.field_text(field).to_lowercase().contains(needle))
}

/// Subsequence of `entities` matching `query` on any of `fields`.
///
/// A blank query returns every entity. Order is preserved.
pub fn filter_by_query<E: Searchable + Clone>(
    entities: &[E],
    query: &str,
    fields: &[E::Field],
) -> Vec<E> {
    if is_blank_query(query) {
        return entities.to_vec();
    }
    let needle = query.to_lowercase();
    entities
        .iter()
        .filter(|e| matches_lowered(*e, &needle, fields))
        .cloned()
        .collect()
}

// ============================================================================
// Ordering
// ============================================================================

/// Case- and accent-insensitive name comparison.
///
/// Falls back to comparing lowercase code points if the bundled collation
/// data cannot be loaded.
pub struct NameCollator {
    collator: Option<Collator>,
}

impl NameCollator {
    pub fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Primary);
        let collator = match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!(error = %e, "root collation unavailable; comparing lowercase code points");
                None
            }
        };
        Self { collator }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        }
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// Nodes ordered by authoritative display name. Stable: equal names keep
/// their input order.
pub fn sort_nodes_by_display_name<'a, I>(nodes: I) -> Vec<&'a Node>
where
    I: IntoIterator<Item = &'a Node>,
{
    let collator = NameCollator::new();
    let mut sorted: Vec<&'a Node> = nodes.into_iter().collect();
    sorted.sort_by(|a, b| collator.compare(a.display_name(), b.display_name()));
    sorted
}

// ============================================================================
// Selection
// ============================================================================

/// The entity to show in the detail panel.
///
/// `requested` wins only if it is present in `filtered`; otherwise the first
/// filtered entity is used, or `None` when nothing is visible.
pub fn resolve_selection<E: Identified + Clone>(filtered: &[E], requested: Option<&str>) -> Option<E> {
    if let Some(id) = requested {
        if let Some(hit) = filtered.iter().find(|e| e.entity_id() == id) {
            return Some(hit.clone());
        }
        tracing::debug!(requested = id, "selection not in current list; using first entry");
    }
    filtered.first().cloned()
}
