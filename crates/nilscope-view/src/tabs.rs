//! Top-level tabs and the view each one renders.

use nilscope_catalog::NodeType;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tab {
    #[default]
    #[serde(rename = "All Nodes")]
    AllNodes,
    #[serde(rename = "nilDB")]
    DatabaseNodes,
    #[serde(rename = "nilAI")]
    ComputeNodes,
    #[serde(rename = "Validators")]
    Validators,
    #[serde(rename = "Ecosystem")]
    Ecosystem,
}

/// Which catalog sequence a tab starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabSource {
    AllNodes,
    NodesOfType(NodeType),
    Projects,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Node table with a detail panel.
    NodeTable,
    /// Project card grid with a detail panel.
    ProjectGrid,
    /// Illustrative category diagram.
    Diagram,
}

/// How the Ecosystem tab presents projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EcosystemLayout {
    #[default]
    Grid,
    Diagram,
}

impl EcosystemLayout {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" | "cards" => Some(Self::Grid),
            "diagram" | "venn" => Some(Self::Diagram),
            _ => None,
        }
    }
}

impl Tab {
    /// Tab bar order.
    pub const ALL: [Tab; 5] = [
        Tab::AllNodes,
        Tab::DatabaseNodes,
        Tab::ComputeNodes,
        Tab::Validators,
        Tab::Ecosystem,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::AllNodes => "All Nodes",
            Self::DatabaseNodes => "nilDB",
            Self::ComputeNodes => "nilAI",
            Self::Validators => "Validators",
            Self::Ecosystem => "Ecosystem",
        }
    }

    pub fn translation_key(self) -> &'static str {
        match self {
            Self::AllNodes => "nav.allNodes",
            Self::DatabaseNodes => "nav.nilDB",
            Self::ComputeNodes => "nav.nilAI",
            Self::Validators => "nav.validators",
            Self::Ecosystem => "nav.ecosystem",
        }
    }

    /// Exact label lookup.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }

    /// Route a label emitted by the tab bar. Unknown labels land on
    /// [`Tab::AllNodes`].
    pub fn route(label: &str) -> Self {
        match Self::from_label(label) {
            Some(tab) => tab,
            None => {
                tracing::warn!(label, "unroutable tab label; falling back to All Nodes");
                Self::AllNodes
            }
        }
    }

    /// Lenient lookup for typed input: case-insensitive label or a short alias.
    pub fn parse_loose(input: &str) -> Option<Self> {
        let wanted = input.trim().to_lowercase();
        if let Some(tab) = Self::ALL
            .into_iter()
            .find(|t| t.label().to_lowercase() == wanted)
        {
            return Some(tab);
        }
        match wanted.as_str() {
            "all" | "nodes" | "all-nodes" => Some(Self::AllNodes),
            "db" | "nildb" | "database" => Some(Self::DatabaseNodes),
            "ai" | "nilai" | "compute" | "nilcc" => Some(Self::ComputeNodes),
            "validator" | "validators" | "nilchain" => Some(Self::Validators),
            "eco" | "ecosystem" | "projects" => Some(Self::Ecosystem),
            _ => None,
        }
    }

    pub fn source(self) -> TabSource {
        match self {
            Self::AllNodes => TabSource::AllNodes,
            Self::DatabaseNodes => TabSource::NodesOfType(NodeType::DatabaseNode),
            Self::ComputeNodes => TabSource::NodesOfType(NodeType::ComputeNode),
            Self::Validators => TabSource::NodesOfType(NodeType::Validator),
            Self::Ecosystem => TabSource::Projects,
        }
    }

    pub fn shows_projects(self) -> bool {
        self == Self::Ecosystem
    }

    pub fn render_mode(self, layout: EcosystemLayout) -> RenderMode {
        match (self, layout) {
            (Self::Ecosystem, EcosystemLayout::Grid) => RenderMode::ProjectGrid,
            (Self::Ecosystem, EcosystemLayout::Diagram) => RenderMode::Diagram,
            _ => RenderMode::NodeTable,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
