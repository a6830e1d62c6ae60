//! Terminal, JSON and SVG renderers for a session tick.
//!
//! Renderers are read-only: they take a [`SessionTick`] and the active
//! [`Localizer`] and return text. Nothing here touches view-state.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use nilscope_catalog::{EcosystemProject, Node};
use nilscope_i18n::Localizer;
use nilscope_view::geo::{grid_cell, marker_for};
use nilscope_view::present::{
    category_style, ecosystem_statistics, endpoint_display, format_last_seen, format_live_since,
    location_display, node_status_section, node_type_style, redactable_display, status_style,
    truncate_node_id, truncate_text, type_section, BadgeStyle, TypeSection,
};
use nilscope_view::venn::{self, VennLayout};
use nilscope_view::{EmptyResult, EntityRef, RenderMode, SessionTick, Tab, TimeRange};

const NAME_WIDTH: usize = 22;
const TYPE_WIDTH: usize = 10;
const LOCATION_WIDTH: usize = 26;
const CLOUD_WIDTH: usize = 14;
const DESCRIPTION_WIDTH: usize = 56;

pub const MAP_WIDTH: usize = 60;
pub const MAP_HEIGHT: usize = 18;

// ============================================================================
// Text
// ============================================================================

fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() < 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn badge(text: &str, style: BadgeStyle) -> ColoredString {
    tint(text, style.text)
}

fn tint(text: &str, hex: &str) -> ColoredString {
    match hex_rgb(hex) {
        Some((r, g, b)) => text.truecolor(r, g, b),
        None => text.normal(),
    }
}

/// Pad or cut `text` to exactly `width` characters.
fn cell(text: &str, width: usize) -> String {
    let cut = truncate_text(text, width);
    let len = cut.chars().count();
    format!("{cut}{}", " ".repeat(width.saturating_sub(len)))
}

fn node_name(node: &Node) -> &str {
    match node.display_name() {
        "" => node.id.as_str(),
        name => name,
    }
}

fn tab_bar(active: Tab, tabs: &[Tab], localizer: &Localizer) -> String {
    tabs.iter()
        .map(|tab| {
            let label = localizer.translate(tab.translation_key());
            if *tab == active {
                format!("[{label}]").bold().cyan().to_string()
            } else {
                format!(" {label} ").dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn time_range_bar(active: TimeRange, localizer: &Localizer) -> String {
    TimeRange::ALL
        .iter()
        .map(|range| {
            let label = localizer.translate(range.translation_key());
            if *range == active {
                format!("[{label}]").bold().to_string()
            } else {
                format!(" {label} ").dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_empty_result(empty: &EmptyResult, localizer: &Localizer) -> String {
    format!(
        "{} \"{}\"",
        localizer.translate(empty.message_key),
        empty.query
    )
}

fn render_node_table(out: &mut String, nodes: &[&Node], selected: Option<&str>, localizer: &Localizer) {
    let t = |key: &'static str| localizer.translate(key);
    out.push_str(&format!(
        "  {}{}{}{}{}\n",
        cell(t("table.nodeName"), NAME_WIDTH),
        cell(t("table.type"), TYPE_WIDTH),
        cell(t("table.location"), LOCATION_WIDTH),
        cell(t("table.cloud"), CLOUD_WIDTH),
        t("table.liveSince")
    ));
    for node in nodes {
        let marker = if Some(node.id.as_str()) == selected { ">" } else { " " };
        let name = cell(node_name(node), NAME_WIDTH);
        let name = if marker == ">" {
            name.bold().to_string()
        } else {
            name
        };
        out.push_str(&format!(
            "{marker} {name}{}{}{}{}\n",
            badge(&cell(node.node_type.as_str(), TYPE_WIDTH), node_type_style(&node.node_type)),
            cell(&location_display(node), LOCATION_WIDTH),
            cell(&node.cloud, CLOUD_WIDTH),
            format_live_since(node.live_since)
        ));
    }
}

fn render_node_detail(out: &mut String, node: &Node, localizer: &Localizer) {
    let t = |key: &'static str| localizer.translate(key);
    let hidden = t("detail.hidden");
    out.push_str(&format!(
        "{} {}\n",
        node_name(node).bold(),
        badge(&format!("[{}]", node.node_type), node_type_style(&node.node_type))
    ));
    if !node.operator.is_empty() {
        out.push_str(&format!("  {}: {}\n", t("table.operator"), node.operator));
    }

    out.push_str(&format!("  {}\n", t("detail.location").underline()));
    match node.coordinates() {
        Some(coords) => {
            out.push_str(&format!(
                "    {} ({:.4}, {:.4})\n",
                location_display(node),
                coords.longitude,
                coords.latitude
            ));
        }
        None => {
            out.push_str(&format!("    {}\n", t("detail.locationUnavailable").dimmed()));
        }
    }

    out.push_str(&format!("  {}\n", t("detail.nodeInformation").underline()));
    out.push_str(&format!("    {}: {}\n", t("table.nodeId"), truncate_node_id(&node.node_id)));
    out.push_str(&format!("    IP: {}\n", redactable_display(&node.ip, hidden)));
    out.push_str(&format!("    ASN: {}\n", redactable_display(&node.asn, hidden)));
    out.push_str(&format!("    Last seen: {}\n", format_last_seen(node.last_seen)));
    if let Some(url) = &node.url {
        out.push_str(&format!("    Endpoint: {}\n", endpoint_display(url)));
    }

    render_metric_section(out, &node_status_section());
    if let Some(section) = type_section(&node.node_type) {
        render_metric_section(out, &section);
    }
}

fn render_metric_section(out: &mut String, section: &TypeSection) {
    out.push_str(&format!("  {}\n", section.title.underline()));
    for (label, value) in section.metrics {
        out.push_str(&format!("    {label}: {value}\n"));
    }
}

fn render_project_grid(
    out: &mut String,
    projects: &[&EcosystemProject],
    selected: Option<&str>,
    localizer: &Localizer,
) {
    for project in projects {
        let marker = if Some(project.id.as_str()) == selected { ">" } else { " " };
        out.push_str(&format!(
            "{marker} {} {} {}\n",
            cell(&project.name, NAME_WIDTH).bold(),
            badge(&cell(&project.category, 16), category_style(&project.category)),
            badge(
                localizer.translate(project.status.translation_key()),
                status_style(project.status)
            )
        ));
        if !project.description.is_empty() {
            out.push_str(&format!(
                "    {}\n",
                truncate_text(&project.description, DESCRIPTION_WIDTH).dimmed()
            ));
        }
    }
}

fn render_project_detail(out: &mut String, project: &EcosystemProject, localizer: &Localizer) {
    let t = |key: &'static str| localizer.translate(key);
    out.push_str(&format!(
        "{} {}\n",
        project.name.bold(),
        badge(
            &format!("[{}]", t(project.status.translation_key())),
            status_style(project.status)
        )
    ));
    out.push_str(&format!(
        "  {}\n",
        badge(&project.category, category_style(&project.category))
    ));
    out.push_str(&format!("  {}\n", t("project.about").underline()));
    out.push_str(&format!("    {}\n", project.description));
    if !project.website.is_empty() {
        out.push_str(&format!("    {}\n", project.website.cyan()));
    }
    let metrics = &project.metrics;
    out.push_str(&format!("    {}: {}\n", t("metrics.totalValueLocked"), metrics.tvl));
    out.push_str(&format!("    {}: {}\n", t("metrics.volume24h"), metrics.volume_24h));
    out.push_str(&format!("    {}: {}\n", t("metrics.activeUsers"), metrics.users));
}

fn render_diagram_summary(out: &mut String, layout: &VennLayout) {
    for (i, circle) in layout.circles.iter().enumerate() {
        let style = category_style(&circle.label);
        let members: Vec<&str> = layout
            .placements
            .iter()
            .filter(|p| p.circles == [i])
            .map(|p| p.name.as_str())
            .collect();
        out.push_str(&format!(
            "  {} {}\n",
            badge(&format!("( {} )", circle.label), style),
            members.join(", ")
        ));
    }
    for placement in layout.placements.iter().filter(|p| p.circles.len() != 1) {
        out.push_str(&format!(
            "  {} {}\n",
            badge(&format!("( {} )", placement.category), category_style(&placement.category)),
            placement.name
        ));
    }
}

/// Full dashboard view for one tick.
pub fn render_text(tick: &SessionTick<'_>, localizer: &Localizer) -> String {
    let mut out = String::new();
    let language = tick.language;
    out.push_str(&format!(
        "{}  {} {}\n",
        localizer.translate("nav.dashboard").bold(),
        language.flag(),
        language.native_name().dimmed()
    ));
    out.push_str(&format!("{}\n", tab_bar(tick.tab, tick.available_tabs, localizer)));

    if tick.query.is_empty() {
        out.push_str(&format!(
            "{}\n",
            localizer.translate("dashboard.searchPlaceholder").dimmed()
        ));
    } else {
        out.push_str(&format!("search: \"{}\"\n", tick.query));
    }
    out.push('\n');

    if tick.tab.shows_projects() {
        out.push_str(&format!(
            "{}  {}\n",
            localizer.translate("ecosystem.title").bold(),
            time_range_bar(tick.time_range, localizer)
        ));
        let period = localizer.translate(tick.time_range.translation_key());
        for card in ecosystem_statistics(tick.time_range) {
            let trailer = match (card.growth, card.disclaimer) {
                (Some(growth), _) => format!("{period} {growth}"),
                (None, Some(note)) => note.to_string(),
                (None, None) => String::new(),
            };
            out.push_str(&format!(
                "  {} {}  {}\n",
                tint(card.value, card.color).bold(),
                card.label,
                trailer.dimmed()
            ));
        }
    }

    if let Some(empty) = &tick.empty_result {
        out.push_str(&format!("{}\n", render_empty_result(empty, localizer).yellow()));
        return out;
    }

    let selected = tick.selected.map(|e| e.id());
    match tick.render_mode {
        RenderMode::NodeTable => {
            if let Some(nodes) = tick.filtered.nodes() {
                render_node_table(&mut out, nodes, selected, localizer);
            }
        }
        RenderMode::ProjectGrid => {
            if let Some(projects) = tick.filtered.projects() {
                render_project_grid(&mut out, projects, selected, localizer);
            }
        }
        RenderMode::Diagram => {
            if let Some(projects) = tick.filtered.projects() {
                render_diagram_summary(&mut out, &venn::layout(projects.iter().copied()));
            }
        }
    }

    if let Some(entity) = tick.selected {
        out.push('\n');
        match entity {
            EntityRef::Node(node) => render_node_detail(&mut out, node, localizer),
            EntityRef::Project(project) => render_project_detail(&mut out, project, localizer),
        }
    }
    out
}

/// Marker map of `nodes`; `@` marks the selected node, `o` the others.
pub fn render_map(nodes: &[&Node], selected: Option<&str>, width: usize, height: usize) -> String {
    if width == 0 || height == 0 {
        return String::new();
    }
    let mut grid = vec![vec!['.'; width]; height];
    for node in nodes {
        let Some(point) = marker_for(node) else {
            continue;
        };
        let (col, row) = grid_cell(point, width, height);
        let glyph = if Some(node.id.as_str()) == selected { '@' } else { 'o' };
        if grid[row][col] != '@' {
            grid[row][col] = glyph;
        }
    }
    let mut out = String::with_capacity((width + 1) * height);
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}

// ============================================================================
// JSON / SVG
// ============================================================================

pub fn render_json(tick: &SessionTick<'_>) -> Result<String> {
    Ok(serde_json::to_string_pretty(tick)?)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Standalone SVG for the category diagram.
pub fn render_svg(layout: &VennLayout) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = layout.width,
        h = layout.height
    ));
    out.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#0a0a0a\"/>\n");
    for circle in &layout.circles {
        out.push_str(&format!(
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"{:.1}\" fill=\"{c}\" fill-opacity=\"0.12\" stroke=\"{c}\" stroke-width=\"2\"/>\n",
            circle.cx,
            circle.cy,
            circle.r,
            c = circle.color
        ));
        out.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-family=\"sans-serif\" font-size=\"16\" text-anchor=\"middle\">{}</text>\n",
            circle.cx,
            circle.cy - circle.r - 8.0,
            circle.color,
            xml_escape(&circle.label)
        ));
    }
    for p in &layout.placements {
        out.push_str(&format!(
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"6\" fill=\"{}\"/>\n",
            p.x, p.y, p.color
        ));
        out.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{:.1}\" fill=\"#ffffff\" font-family=\"sans-serif\" font-size=\"12\" text-anchor=\"middle\">{}</text>\n",
            p.x,
            p.y + 20.0,
            xml_escape(&p.name)
        ));
    }
    out.push_str("</svg>\n");
    out
}
