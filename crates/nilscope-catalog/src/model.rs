//! Entity records: network nodes and ecosystem projects.
//!
//! Records are plain data. Display styling (badge colours, borders) is derived
//! elsewhere from `NodeType` / category, never stored here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder the data feed uses for intentionally hidden fields.
pub const REDACTED_SENTINEL: &str = "XXXX";

// ============================================================================
// Nodes
// ============================================================================

/// Role of a node in the network.
///
/// The feed labels are `nildb`, `nilcc` and `nilchain`; anything else is
/// kept as `Other` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeType {
    DatabaseNode,
    ComputeNode,
    Validator,
    Other(String),
}

impl NodeType {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "nildb" | "database-node" => Self::DatabaseNode,
            "nilcc" | "compute-node" => Self::ComputeNode,
            "nilchain" | "validator" => Self::Validator,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Feed label (`nildb`, `nilcc`, `nilchain`, or the text as received).
    pub fn as_str(&self) -> &str {
        match self {
            Self::DatabaseNode => "nildb",
            Self::ComputeNode => "nilcc",
            Self::Validator => "nilchain",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// A field value the feed may hide behind [`REDACTED_SENTINEL`].
///
/// `Redacted` is distinct from absence: the field exists, its value is withheld.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Redactable {
    Visible(String),
    Redacted,
}

impl Redactable {
    pub fn is_redacted(&self) -> bool {
        matches!(self, Self::Redacted)
    }

    pub fn visible(&self) -> Option<&str> {
        match self {
            Self::Visible(v) => Some(v.as_str()),
            Self::Redacted => None,
        }
    }
}

impl From<String> for Redactable {
    fn from(value: String) -> Self {
        if value == REDACTED_SENTINEL {
            Self::Redacted
        } else {
            Self::Visible(value)
        }
    }
}

impl From<Redactable> for String {
    fn from(value: Redactable) -> Self {
        match value {
            Redactable::Visible(v) => v,
            Redactable::Redacted => REDACTED_SENTINEL.to_string(),
        }
    }
}

/// Geographic position, serialized as the feed's `[longitude, latitude]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.longitude, c.latitude]
    }
}

/// One network participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "_id")]
    pub id: String,
    pub node_type: NodeType,
    /// Validator moniker; authoritative display name for validators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moniker: Option<String>,
    /// Operating organization; authoritative display name for every other type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub operator: String,
    #[serde(
        rename = "operatorImage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub operator_image: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub cloud: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_since: Option<DateTime<Utc>>,
    #[serde(default)]
    pub node_id: String,
    pub ip: Redactable,
    pub asn: Redactable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Node {
    /// Authoritative display name: moniker for validators, organization otherwise.
    ///
    /// Returns `""` when the authoritative field is missing; the other field is
    /// not consulted.
    pub fn display_name(&self) -> &str {
        let field = match self.node_type {
            NodeType::Validator => &self.moniker,
            _ => &self.organization,
        };
        field.as_deref().unwrap_or("")
    }

    /// The node's position, or `None` when the feed carries none.
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }
}

// ============================================================================
// Ecosystem projects
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    Live,
    Beta,
}

impl ProjectStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Live => "Live",
            Self::Beta => "Beta",
        }
    }

    /// Translation key for the status badge.
    pub fn translation_key(self) -> &'static str {
        match self {
            Self::Live => "status.live",
            Self::Beta => "status.beta",
        }
    }
}

/// Pre-formatted display strings; never parsed as numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    #[serde(default)]
    pub tvl: String,
    #[serde(rename = "volume24h", default)]
    pub volume_24h: String,
    #[serde(default)]
    pub users: String,
}

/// A third-party project built on the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcosystemProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: String,
    /// Free-text label; new categories appear without code changes.
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub website: String,
    pub status: ProjectStatus,
    #[serde(default)]
    pub metrics: ProjectMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_json(node_type: &str) -> String {
        format!(
            r#"{{
                "_id": "n1",
                "node_type": "{node_type}",
                "moniker": "Zeta",
                "organization": "Acme",
                "operator": "Acme Ops",
                "city": "London",
                "country": "UK",
                "coordinates": [-0.1276, 51.5072],
                "cloud": "AWS",
                "live_since": "2024-08-01T00:00:00Z",
                "node_id": "nillion1abcdefghijklmnopqrstuvwxyz",
                "ip": "XXXX",
                "asn": "AS16509"
            }}"#
        )
    }

    #[test]
    fn validator_uses_moniker_as_display_name() {
        let node: Node = serde_json::from_str(&node_json("nilchain")).unwrap();
        assert_eq!(node.node_type, NodeType::Validator);
        assert_eq!(node.display_name(), "Zeta");
    }

    #[test]
    fn non_validator_uses_organization_as_display_name() {
        let node: Node = serde_json::from_str(&node_json("nildb")).unwrap();
        assert_eq!(node.display_name(), "Acme");
    }

    #[test]
    fn missing_authoritative_name_is_empty_not_the_other_field() {
        let mut node: Node = serde_json::from_str(&node_json("nilchain")).unwrap();
        node.moniker = None;
        assert_eq!(node.display_name(), "");
    }

    #[test]
    fn redacted_sentinel_is_distinct_from_a_value() {
        let node: Node = serde_json::from_str(&node_json("nildb")).unwrap();
        assert!(node.ip.is_redacted());
        assert_eq!(node.asn.visible(), Some("AS16509"));

        let back = serde_json::to_value(&node).unwrap();
        assert_eq!(back["ip"], REDACTED_SENTINEL);
    }

    #[test]
    fn coordinates_keep_feed_order() {
        let node: Node = serde_json::from_str(&node_json("nildb")).unwrap();
        let c = node.coordinates().unwrap();
        assert_eq!(c.longitude, -0.1276);
        assert_eq!(c.latitude, 51.5072);
        assert!(c.is_valid());
        assert!(!Coordinates::new(200.0, 0.0).is_valid());
    }

    #[test]
    fn unknown_node_type_is_kept_as_other() {
        let node: Node = serde_json::from_str(&node_json("relay")).unwrap();
        assert_eq!(node.node_type, NodeType::Other("relay".to_string()));
        assert_eq!(node.node_type.as_str(), "relay");
    }
}
