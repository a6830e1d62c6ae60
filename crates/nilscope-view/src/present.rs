//! Display formatting for the presentation layer.
//!
//! Badge colours are computed here from node type, category or status; the
//! catalog records carry no styling.

use chrono::{DateTime, Utc};
use nilscope_catalog::{Node, NodeType, ProjectStatus, Redactable};
use serde::Serialize;

use crate::state::TimeRange;

/// Colour tags for a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeStyle {
    pub border: &'static str,
    pub text: &'static str,
    pub background: &'static str,
}

pub const DEFAULT_CATEGORY_COLOR: &str = "#ffffff";

const NODE_IDENTIFIER_PREVIEW: usize = 16;

pub fn node_type_style(node_type: &NodeType) -> BadgeStyle {
    match node_type {
        NodeType::DatabaseNode => BadgeStyle {
            border: "#5fe9b566",
            text: "#5fe9b5",
            background: "#5fe9b512",
        },
        NodeType::ComputeNode => BadgeStyle {
            border: "#f3a8ff66",
            text: "#f3a8ff",
            background: "#f3a8ff12",
        },
        NodeType::Validator => BadgeStyle {
            border: "#ffc593",
            text: "#ffc593",
            background: "#ffc59312",
        },
        NodeType::Other(_) => BadgeStyle {
            border: "#292929",
            text: "#ffffff",
            background: "#ffffff12",
        },
    }
}

/// Accent colour for a project category. Unrecognized categories get
/// [`DEFAULT_CATEGORY_COLOR`].
pub fn category_color(category: &str) -> &'static str {
    match category {
        "AI" => "#93a2ff",
        "Data Ownership" => "#5fe9b5",
        "DeSci" => "#f3a8ff",
        "AI & Data" => "#ffc593",
        _ => DEFAULT_CATEGORY_COLOR,
    }
}

pub fn category_style(category: &str) -> BadgeStyle {
    match category {
        "AI" => BadgeStyle {
            border: "#93a2ff20",
            text: "#93a2ff",
            background: "#93a2ff12",
        },
        "Data Ownership" => BadgeStyle {
            border: "#5fe9b520",
            text: "#5fe9b5",
            background: "#5fe9b512",
        },
        "DeSci" => BadgeStyle {
            border: "#f3a8ff20",
            text: "#f3a8ff",
            background: "#f3a8ff12",
        },
        "AI & Data" => BadgeStyle {
            border: "#ffc59320",
            text: "#ffc593",
            background: "#ffc59312",
        },
        _ => BadgeStyle {
            border: "#ffffff20",
            text: DEFAULT_CATEGORY_COLOR,
            background: "#ffffff12",
        },
    }
}

pub fn status_style(status: ProjectStatus) -> BadgeStyle {
    match status {
        ProjectStatus::Live => BadgeStyle {
            border: "#5fe9b520",
            text: "#5fe9b5",
            background: "#5fe9b512",
        },
        ProjectStatus::Beta => BadgeStyle {
            border: "#ffc59320",
            text: "#ffc593",
            background: "#ffc59312",
        },
    }
}

/// `"August 2024"`, or empty when unknown.
pub fn format_live_since(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%B %Y").to_string()).unwrap_or_default()
}

/// Full UTC timestamp, or `N/A` when unknown.
pub fn format_last_seen(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "N/A".to_string(),
    }
}

/// First 16 characters of a node identifier followed by `...`. Identifiers
/// that already fit are returned whole.
pub fn truncate_node_id(node_id: &str) -> String {
    match node_id.char_indices().nth(NODE_IDENTIFIER_PREVIEW) {
        Some((cut, _)) => format!("{}...", &node_id[..cut]),
        None => node_id.to_string(),
    }
}

/// Visible value, or `hidden_label` for the redacted sentinel.
pub fn redactable_display<'a>(value: &'a Redactable, hidden_label: &'a str) -> &'a str {
    value.visible().unwrap_or(hidden_label)
}

pub fn endpoint_display(url: &str) -> &str {
    url.strip_prefix("https://").unwrap_or(url)
}

pub fn location_display(node: &Node) -> String {
    match (node.city.is_empty(), node.country.is_empty()) {
        (false, false) => format!("{}, {}", node.city, node.country),
        (false, true) => node.city.clone(),
        (true, false) => node.country.clone(),
        (true, true) => String::new(),
    }
}

/// Truncate display text to `max` characters, appending `…` when cut.
pub fn truncate_text(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Extra detail-panel section shown for some node types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSection {
    pub title: &'static str,
    pub metrics: &'static [(&'static str, &'static str)],
}

pub fn type_section(node_type: &NodeType) -> Option<TypeSection> {
    match node_type {
        NodeType::DatabaseNode => Some(TypeSection {
            title: "Database Metrics",
            metrics: &[("Documents Stored", "12.4K"), ("Query Rate", "156/min")],
        }),
        NodeType::Validator => Some(TypeSection {
            title: "Validator Metrics",
            metrics: &[("Blocks Validated", "8,942"), ("Stake Amount", "50K NIL")],
        }),
        _ => None,
    }
}

/// Status and resource figures shown for every node, whatever its type.
pub fn node_status_section() -> TypeSection {
    TypeSection {
        title: "Node Status and Metrics",
        metrics: &[
            ("Status", "Online (99.8% uptime)"),
            ("Response Time", "12ms avg last 24h"),
            ("CPU Usage", "23%"),
            ("Memory", "4.2GB"),
            ("Storage", "128GB"),
        ],
    }
}

/// One statistics card under the Ecosystem header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticCard {
    pub label: &'static str,
    pub value: &'static str,
    pub color: &'static str,
    /// Change over the selected range.
    pub growth: Option<&'static str>,
    pub disclaimer: Option<&'static str>,
}

/// Network-wide figures for the Ecosystem header. Growth follows `range`;
/// over [`TimeRange::All`] it equals the total.
pub fn ecosystem_statistics(range: TimeRange) -> [StatisticCard; 3] {
    let (documents, storage) = match range {
        TimeRange::SevenDays => ("+10.9M", "+9.20 GB"),
        TimeRange::ThirtyDays => ("+47.3M", "+39.84 GB"),
        TimeRange::All => ("+458.6M", "+214.32 GB"),
    };
    [
        StatisticCard {
            label: "Users",
            value: "9.7K",
            color: "#93a2ff",
            growth: None,
            disclaimer: Some("Approximate number. Data not always available."),
        },
        StatisticCard {
            label: "Total Documents",
            value: "458.6M",
            color: "#5fe9b5",
            growth: Some(documents),
            disclaimer: None,
        },
        StatisticCard {
            label: "Total Storage",
            value: "214.32 GB",
            color: "#ffc593",
            growth: Some(storage),
            disclaimer: None,
        },
    ]
}
