//! nilscope CLI
//!
//! Command-line front end for the node dashboard:
//! - Rendering one dashboard view (`show`), as text or JSON
//! - An interactive session (`repl`), or a scripted one (`repl --script`)
//! - Exporting the ecosystem category diagram as SVG (`diagram`)
//! - Validating and exporting catalog bundles (`catalog`)

use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use nilscope_catalog::Catalog;
use nilscope_i18n::Language;
use nilscope_view::venn;
use nilscope_view::{EcosystemLayout, Session, Tab, TimeRange, ViewAction};
use std::fs;
use std::path::{Path, PathBuf};

mod config;
mod render;
mod repl;

use config::DashboardConfig;

#[derive(Parser)]
#[command(name = "nilscope")]
#[command(author, version, about = "nilscope: network node dashboard")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Logs go to stderr.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file (language, tab, catalog, locales_dir, ...).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog bundle to load instead of the built-in demo data.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Directory of `<code>.json` translation overrides.
    #[arg(long, global = true)]
    locales: Option<PathBuf>,

    /// UI language (en, es, fr, de, ja, zh).
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one dashboard view.
    Show {
        /// Tab label or alias (all, db, ai, validators, eco).
        #[arg(long)]
        tab: Option<String>,
        /// Search query.
        #[arg(long, short = 's')]
        search: Option<String>,
        /// Node or project id to show in the detail panel.
        #[arg(long)]
        select: Option<String>,
        /// Ecosystem layout: grid | diagram.
        #[arg(long)]
        layout: Option<String>,
        /// Ecosystem statistics window: 7d | 30d | all.
        #[arg(long)]
        range: Option<String>,
        /// Output format: text | json.
        #[arg(long, default_value = "text")]
        format: String,
        /// Append a marker map of the visible nodes.
        #[arg(long)]
        map: bool,
    },

    /// Interactive dashboard session.
    Repl {
        /// Run commands from a file (`-` for stdin) instead of interactively.
        #[arg(long)]
        script: Option<PathBuf>,
        /// Run one command (repeatable) instead of interactively.
        #[arg(short = 'c', long = "cmd")]
        cmd: Vec<String>,
        /// Keep going after a failing scripted command.
        #[arg(long)]
        continue_on_error: bool,
        /// Don't echo scripted commands.
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Write the ecosystem category diagram as SVG.
    Diagram {
        /// Only include projects matching this query.
        #[arg(long, short = 's')]
        search: Option<String>,
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Catalog bundle tools.
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// Check a catalog bundle and summarize its contents.
    Validate {
        /// Bundle to check.
        input: PathBuf,
    },
    /// Write the active catalog as a JSON bundle.
    Export {
        /// Output file (stdout if omitted).
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = DashboardConfig::load_or_default(cli.config.as_deref())?;
    if let Some(path) = cli.catalog {
        config.catalog = Some(path);
    }
    if let Some(dir) = cli.locales {
        config.locales_dir = Some(dir);
    }
    if let Some(lang) = cli.lang.as_deref() {
        config.language = lang.parse::<Language>()?;
    }

    match cli.command {
        Commands::Show {
            tab,
            search,
            select,
            layout,
            range,
            format,
            map,
        } => {
            let request = ShowRequest {
                tab,
                search,
                select,
                layout,
                range,
                format,
                map,
            };
            print!("{}", cmd_show(&config, &request)?);
        }
        Commands::Repl {
            script,
            cmd,
            continue_on_error,
            quiet,
        } => {
            if script.is_some() || !cmd.is_empty() {
                repl::cmd_repl_script(&config, script.as_deref(), &cmd, continue_on_error, quiet)?;
            } else {
                repl::cmd_repl(&config)?;
            }
        }
        Commands::Diagram { search, out } => cmd_diagram(&config, search, out.as_deref())?,
        Commands::Catalog { command } => match command {
            CatalogCommands::Validate { input } => cmd_catalog_validate(&input)?,
            CatalogCommands::Export { out } => cmd_catalog_export(&config, out.as_deref())?,
        },
    }
    Ok(())
}

// ============================================================================
// show
// ============================================================================

#[derive(Debug, Default)]
struct ShowRequest {
    tab: Option<String>,
    search: Option<String>,
    select: Option<String>,
    layout: Option<String>,
    range: Option<String>,
    format: String,
    map: bool,
}

/// Apply `request` to a fresh session and render it.
fn cmd_show(config: &DashboardConfig, request: &ShowRequest) -> Result<String> {
    let catalog = config.load_catalog()?;
    let localizer = config.load_localizer()?;
    let mut session = Session::with_state(&catalog, localizer, config.initial_state());

    if let Some(layout) = request.layout.as_deref() {
        let layout = EcosystemLayout::parse(layout)
            .ok_or_else(|| anyhow!("unknown layout `{layout}` (expected grid|diagram)"))?;
        session.dispatch(ViewAction::SetEcosystemLayout(layout));
    }
    if let Some(range) = request.range.as_deref() {
        let range = TimeRange::parse(range)
            .ok_or_else(|| anyhow!("unknown time range `{range}` (expected 7d|30d|all)"))?;
        session.dispatch(ViewAction::SetTimeRange(range));
    }
    if let Some(tab) = request.tab.as_deref() {
        let action = match Tab::parse_loose(tab) {
            Some(tab) => ViewAction::SelectTab(tab),
            None => ViewAction::RouteTab(tab.to_string()),
        };
        session.dispatch(action);
    }
    // After the tab, so entering Ecosystem doesn't discard it.
    if let Some(search) = &request.search {
        session.dispatch(ViewAction::SetQuery(search.clone()));
    }
    if let Some(id) = &request.select {
        session.dispatch(ViewAction::Select(id.clone()));
    }

    let tick = session.tick();
    match request.format.as_str() {
        "json" => Ok(format!("{}\n", render::render_json(&tick)?)),
        "text" => {
            let mut out = render::render_text(&tick, session.localizer());
            if request.map {
                if let Some(nodes) = tick.filtered.nodes() {
                    out.push('\n');
                    out.push_str(&render::render_map(
                        nodes,
                        tick.selected.map(|e| e.id()),
                        render::MAP_WIDTH,
                        render::MAP_HEIGHT,
                    ));
                }
            }
            Ok(out)
        }
        other => Err(anyhow!("unknown format `{other}` (expected text|json)")),
    }
}

// ============================================================================
// diagram / catalog
// ============================================================================

fn cmd_diagram(config: &DashboardConfig, search: Option<String>, out: Option<&Path>) -> Result<()> {
    let catalog = config.load_catalog()?;
    let localizer = config.load_localizer()?;
    let mut session = Session::new(&catalog, localizer);
    session.dispatch(ViewAction::SelectTab(Tab::Ecosystem));
    if let Some(query) = search {
        session.dispatch(ViewAction::SetQuery(query));
    }

    let tick = session.tick();
    let projects = tick.filtered.projects().unwrap_or_default();
    let layout = venn::layout(projects.iter().copied());
    let svg = render::render_svg(&layout);
    match out {
        Some(path) => {
            fs::write(path, svg)?;
            eprintln!(
                "{} {} ({} categories, {} projects)",
                "Wrote".green().bold(),
                path.display(),
                layout.circles.len(),
                layout.placements.len()
            );
        }
        None => print!("{svg}"),
    }
    Ok(())
}

fn cmd_catalog_validate(input: &Path) -> Result<()> {
    println!("{} {}", "Validating".green().bold(), input.display());

    let catalog = Catalog::from_path(input)?;

    println!("  Nodes: {}", catalog.nodes().len());
    for (node_type, nodes) in catalog.partition_by_type() {
        let located = nodes.iter().filter(|n| n.coordinates().is_some()).count();
        println!(
            "    {}: {} ({} with coordinates)",
            node_type.as_str().yellow(),
            nodes.len(),
            located
        );
    }
    println!("  Projects: {}", catalog.projects().len());

    println!("{}", "Valid.".green());
    Ok(())
}

fn cmd_catalog_export(config: &DashboardConfig, out: Option<&Path>) -> Result<()> {
    let json = config.load_catalog()?.to_json_pretty()?;
    match out {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(format: &str) -> ShowRequest {
        ShowRequest {
            format: format.to_string(),
            ..ShowRequest::default()
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["nilscope", "show", "--tab", "eco", "-vv", "--lang", "fr"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.lang.as_deref(), Some("fr"));
        assert!(matches!(cli.command, Commands::Show { tab: Some(ref t), .. } if t == "eco"));
    }

    #[test]
    fn show_json_reflects_request() {
        let config = DashboardConfig::default();
        let mut req = request("json");
        req.tab = Some("validators".into());
        let out = cmd_show(&config, &req).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["tab"], "Validators");
        assert!(value["filtered"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|n| n["node_type"] == "nilchain"));
    }

    #[test]
    fn show_search_survives_entering_ecosystem() {
        let config = DashboardConfig::default();
        let mut req = request("json");
        req.tab = Some("ecosystem".into());
        req.search = Some("desci".into());
        let out = cmd_show(&config, &req).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["query"], "desci");
        assert_eq!(value["filtered"]["kind"], "projects");
    }

    #[test]
    fn show_rejects_unknown_format_and_layout() {
        let config = DashboardConfig::default();
        assert!(cmd_show(&config, &request("yaml")).is_err());
        let mut req = request("text");
        req.layout = Some("spiral".into());
        assert!(cmd_show(&config, &req).is_err());
    }

    #[test]
    fn catalog_validate_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let node = r#"{"_id": "a", "node_type": "nildb", "ip": "XXXX", "asn": "XXXX"}"#;
        fs::write(&path, format!(r#"{{"nodes": [{node}, {node}]}}"#)).unwrap();
        assert!(cmd_catalog_validate(&path).is_err());

        let good = dir.path().join("good.json");
        fs::write(&good, format!(r#"{{"nodes": [{node}]}}"#)).unwrap();
        assert!(cmd_catalog_validate(&good).is_ok());
    }

    #[test]
    fn diagram_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eco.svg");
        cmd_diagram(&DashboardConfig::default(), None, Some(path.as_path())).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.starts_with("<svg"));
    }
}
