//! nilscope entity catalog
//!
//! Two read-only, ordered collections loaded once at startup:
//!
//! - [`Node`]s: database nodes, compute nodes and validators
//! - [`EcosystemProject`]s: third-party projects built on the network
//!
//! The catalog never changes after construction. An empty catalog is valid.
//! Loading (from a JSON bundle or the compiled-in demo bundle) is the only
//! fallible step; see [`CatalogError`].

pub mod model;

pub use model::{
    Coordinates, EcosystemProject, Node, NodeType, ProjectMetrics, ProjectStatus, Redactable,
    REDACTED_SENTINEL,
};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Demo bundle compiled into the binary.
const BUNDLED_CATALOG_JSON: &str = include_str!("../data/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog bundle: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate node id `{0}`")]
    DuplicateNodeId(String),

    #[error("duplicate project id `{0}`")]
    DuplicateProjectId(String),

    #[error("node `{id}` has out-of-range coordinates ({longitude}, {latitude})")]
    InvalidCoordinates {
        id: String,
        longitude: f64,
        latitude: f64,
    },
}

/// On-disk shape of a catalog bundle.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogBundle {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    projects: Vec<EcosystemProject>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    nodes: Vec<Node>,
    projects: Vec<EcosystemProject>,
}

impl Catalog {
    /// Build a catalog, checking id uniqueness and coordinate ranges.
    pub fn new(nodes: Vec<Node>, projects: Vec<EcosystemProject>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for node in &nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(CatalogError::DuplicateNodeId(node.id.clone()));
            }
            if let Some(c) = node.coordinates {
                if !c.is_valid() {
                    return Err(CatalogError::InvalidCoordinates {
                        id: node.id.clone(),
                        longitude: c.longitude,
                        latitude: c.latitude,
                    });
                }
            }
        }

        let mut seen = HashSet::new();
        for project in &projects {
            if !seen.insert(project.id.as_str()) {
                return Err(CatalogError::DuplicateProjectId(project.id.clone()));
            }
        }

        Ok(Self { nodes, projects })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let bundle: CatalogBundle = serde_json::from_str(text)?;
        let catalog = Self::new(bundle.nodes, bundle.projects)?;
        tracing::info!(
            nodes = catalog.nodes.len(),
            projects = catalog.projects.len(),
            "loaded catalog bundle"
        );
        Ok(catalog)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The demo catalog compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG_JSON)
    }

    pub fn to_json_pretty(&self) -> Result<String, CatalogError> {
        let bundle = CatalogBundle {
            nodes: self.nodes.clone(),
            projects: self.projects.clone(),
        };
        Ok(serde_json::to_string_pretty(&bundle)?)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn projects(&self) -> &[EcosystemProject] {
        &self.projects
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.projects.is_empty()
    }

    /// Nodes of one type, in catalog order.
    pub fn nodes_of_type<'a>(&'a self, node_type: &'a NodeType) -> impl Iterator<Item = &'a Node> {
        self.nodes.iter().filter(move |n| &n.node_type == node_type)
    }

    /// Every node type present, in order of first appearance, with its nodes
    /// in catalog order.
    pub fn partition_by_type(&self) -> Vec<(NodeType, Vec<&Node>)> {
        let mut groups: Vec<(NodeType, Vec<&Node>)> = Vec::new();
        for node in &self.nodes {
            match groups.iter_mut().find(|(ty, _)| *ty == node.node_type) {
                Some((_, members)) => members.push(node),
                None => groups.push((node.node_type.clone(), vec![node])),
            }
        }
        groups
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn project(&self, id: &str) -> Option<&EcosystemProject> {
        self.projects.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, node_type: NodeType) -> Node {
        Node {
            id: id.to_string(),
            node_type,
            moniker: None,
            organization: Some(format!("org-{id}")),
            logo: None,
            operator: String::new(),
            operator_image: None,
            city: String::new(),
            country: String::new(),
            coordinates: None,
            cloud: String::new(),
            live_since: None,
            node_id: String::new(),
            ip: Redactable::Redacted,
            asn: Redactable::Redacted,
            last_seen: None,
            url: None,
        }
    }

    #[test]
    fn bundled_catalog_loads() {
        let catalog = Catalog::bundled().expect("bundled catalog should parse");
        assert!(!catalog.nodes().is_empty());
        assert!(!catalog.projects().is_empty());
        for ty in [NodeType::DatabaseNode, NodeType::ComputeNode, NodeType::Validator] {
            assert!(
                catalog.nodes_of_type(&ty).next().is_some(),
                "bundled catalog should contain a {ty} node"
            );
        }
    }

    #[test]
    fn empty_bundle_is_a_valid_catalog() {
        let catalog = Catalog::from_json("{}").unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.partition_by_type().is_empty());
    }

    #[test]
    fn duplicate_node_ids_are_rejected() {
        let err = Catalog::new(
            vec![node("a", NodeType::Validator), node("a", NodeType::DatabaseNode)],
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateNodeId(id) if id == "a"));
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut bad = node("a", NodeType::Validator);
        bad.coordinates = Some(Coordinates::new(10.0, 95.0));
        let err = Catalog::new(vec![bad], Vec::new()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCoordinates { .. }));
    }

    #[test]
    fn partition_preserves_first_appearance_and_catalog_order() {
        let catalog = Catalog::new(
            vec![
                node("v1", NodeType::Validator),
                node("d1", NodeType::DatabaseNode),
                node("v2", NodeType::Validator),
            ],
            Vec::new(),
        )
        .unwrap();

        let groups = catalog.partition_by_type();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, NodeType::Validator);
        let ids: Vec<&str> = groups[0].1.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2"]);
        assert_eq!(groups[1].0, NodeType::DatabaseNode);
    }

    #[test]
    fn json_round_trip_keeps_redaction_and_order() {
        let catalog = Catalog::bundled().unwrap();
        let text = catalog.to_json_pretty().unwrap();
        let again = Catalog::from_json(&text).unwrap();
        assert_eq!(again, catalog);
    }
}
