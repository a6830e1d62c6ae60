//! Interactive dashboard session.
//!
//! By default we use `rustyline` for line editing and tab completion.
//! A minimal stdin-based fallback exists behind `--no-default-features`.

use anyhow::{anyhow, Result};
use colored::Colorize;
use nilscope_catalog::Catalog;
use nilscope_i18n::{Language, Localizer};
use nilscope_view::venn;
use nilscope_view::{
    EcosystemLayout, Session, SessionEvent, Tab, TimeRange, ViewAction, ViewState,
};
use std::fs;
use std::io;
use std::io::Read;
#[cfg(not(feature = "repl-rustyline"))]
use std::io::Write;
use std::path::Path;

use crate::config::DashboardConfig;
use crate::render;

const PROMPT: &str = "nilscope> ";

pub fn cmd_repl(config: &DashboardConfig) -> Result<()> {
    let catalog = config.load_catalog()?;
    let localizer = config.load_localizer()?;
    let mut state = ReplState::new(&catalog, localizer, config.initial_state());

    #[cfg(feature = "repl-rustyline")]
    let result = cmd_repl_rustyline(&mut state);
    #[cfg(not(feature = "repl-rustyline"))]
    let result = cmd_repl_simple(&mut state);
    result
}

pub fn cmd_repl_script(
    config: &DashboardConfig,
    script: Option<&Path>,
    commands: &[String],
    continue_on_error: bool,
    quiet: bool,
) -> Result<()> {
    let catalog = config.load_catalog()?;
    let localizer = config.load_localizer()?;
    let mut state = ReplState::new(&catalog, localizer, config.initial_state());

    let mut lines: Vec<String> = Vec::new();

    if let Some(script_path) = script {
        let text = if script_path.as_os_str() == "-" {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            fs::read_to_string(script_path)?
        };
        lines.extend(text.lines().map(str::to_string));
    }
    lines.extend(commands.iter().cloned());

    for (idx, raw_line) in lines.iter().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if !quiet {
            println!("{PROMPT}{line}");
        }

        let tokens = tokenize_repl_line(line);
        match dispatch_repl_line_result(&mut state, &tokens) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => {
                if continue_on_error {
                    eprintln!("{} {e}", "error:".red().bold());
                } else {
                    return Err(anyhow!("repl script failed at line {}: {e}", idx + 1));
                }
            }
        }
    }

    Ok(())
}

fn print_banner(state: &ReplState<'_>) {
    println!("{}", state.session.translate("nav.dashboard").green().bold());
    println!(
        "{} nodes, {} projects. Type `help` for commands. Type `exit` to quit.\n",
        state.catalog.nodes().len(),
        state.catalog.projects().len()
    );
}

#[cfg(not(feature = "repl-rustyline"))]
fn cmd_repl_simple(state: &mut ReplState<'_>) -> Result<()> {
    print_banner(state);

    let stdin = io::stdin();
    loop {
        print!("{}", PROMPT.cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tokens = tokenize_repl_line(line);
        match dispatch_repl_line_result(state, &tokens) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e}", "error:".red().bold()),
        }
    }

    Ok(())
}

#[cfg(feature = "repl-rustyline")]
fn cmd_repl_rustyline(state: &mut ReplState<'_>) -> Result<()> {
    use rustyline::error::ReadlineError;
    use rustyline::Editor;

    print_banner(state);

    let mut rl: Editor<ReplLineHelper, rustyline::history::DefaultHistory> =
        Editor::new().map_err(|e| anyhow!("failed to init rustyline: {e}"))?;
    rl.set_helper(Some(ReplLineHelper::new(state.catalog)));

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Eof) => break,
            Err(ReadlineError::Interrupted) => continue,
            Err(e) => return Err(anyhow!("readline error: {e}")),
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        rl.add_history_entry(line)
            .map_err(|e| anyhow!("failed to record history: {e}"))?;

        let tokens = tokenize_repl_line(line);
        match dispatch_repl_line_result(state, &tokens) {
            Ok(ReplControl::Continue) => {}
            Ok(ReplControl::Exit) => break,
            Err(e) => eprintln!("{} {e}", "error:".red().bold()),
        }
    }

    Ok(())
}

// ============================================================================
// Dispatch
// ============================================================================

struct ReplState<'c> {
    catalog: &'c Catalog,
    session: Session<'c>,
}

impl<'c> ReplState<'c> {
    fn new(catalog: &'c Catalog, localizer: Localizer, initial: ViewState) -> Self {
        Self {
            catalog,
            session: Session::with_state(catalog, localizer, initial),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ReplControl {
    Continue,
    Exit,
}

fn dispatch_repl_line_result(state: &mut ReplState<'_>, tokens: &[String]) -> Result<ReplControl> {
    if tokens.is_empty() {
        return Ok(ReplControl::Continue);
    }

    let cmd = tokens[0].as_str();
    let args = &tokens[1..];

    match cmd {
        "help" | "?" => print_help(),
        "exit" | "quit" => return Ok(ReplControl::Exit),
        "show" => print!("{}", render::render_text(&state.session.tick(), state.session.localizer())),
        "json" => println!("{}", render::render_json(&state.session.tick())?),
        "tabs" => cmd_tabs(state),
        "tab" => cmd_tab(state, args)?,
        "search" => {
            let query = args.first().cloned().unwrap_or_default();
            state.session.dispatch(ViewAction::SetQuery(query));
            print_result_summary(state);
        }
        "clear" => {
            state.session.dispatch(ViewAction::ClearQuery);
            print_result_summary(state);
        }
        "select" => cmd_select(state, args)?,
        "deselect" => state.session.dispatch(ViewAction::ClearSelection),
        "lang" | "langs" => cmd_lang(state, args)?,
        "layout" => {
            let value = one_arg("layout", args)?;
            let layout = EcosystemLayout::parse(value)
                .ok_or_else(|| anyhow!("unknown layout `{value}` (expected grid|diagram)"))?;
            state.session.dispatch(ViewAction::SetEcosystemLayout(layout));
        }
        "range" => {
            let value = one_arg("range", args)?;
            let range = TimeRange::parse(value)
                .ok_or_else(|| anyhow!("unknown time range `{value}` (expected 7d|30d|all)"))?;
            state.session.dispatch(ViewAction::SetTimeRange(range));
        }
        "map" => cmd_map(state),
        "diagram" => cmd_diagram(state, args)?,
        other => return Err(anyhow!("unknown command `{other}` (try `help`)")),
    }
    Ok(ReplControl::Continue)
}

fn print_help() {
    println!(
        r#"Commands:
  help | ?                       Show this help
  exit | quit                    Exit the REPL

  show                           Render the dashboard
  json                           Render the current tick as JSON
  tabs                           List tabs
  tab <name>                     Switch tab (label or alias: all, db, ai, validators, eco)
  search <text>                  Set the search query (quote to keep spaces)
  clear                          Clear the search query
  select <id>                    Request a node or project for the detail panel
  deselect                       Drop the selection request
  langs                          List languages
  lang <code>                    Switch language (en, es, fr, de, ja, zh)
  layout grid|diagram            Ecosystem presentation
  range 7d|30d|all               Ecosystem statistics window
  map                            Marker map of the visible nodes
  diagram [file.svg]             Category diagram of the visible projects"#
    );
}

fn one_arg<'a>(cmd: &str, args: &'a [String]) -> Result<&'a str> {
    match args {
        [one] => Ok(one.as_str()),
        _ => Err(anyhow!("usage: {cmd} <value>")),
    }
}

fn print_result_summary(state: &ReplState<'_>) {
    let tick = state.session.tick();
    match &tick.empty_result {
        Some(empty) => println!(
            "{}",
            render::render_empty_result(empty, state.session.localizer()).yellow()
        ),
        None => println!(
            "{} of {} shown",
            tick.filtered.len().to_string().bold(),
            tick.active.len()
        ),
    }
}

fn cmd_tabs(state: &ReplState<'_>) {
    let active = state.session.state().tab;
    for tab in Tab::ALL {
        let label = state.session.translate(tab.translation_key());
        if tab == active {
            println!("* {}", label.cyan().bold());
        } else {
            println!("  {label}");
        }
    }
}

fn cmd_tab(state: &mut ReplState<'_>, args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err(anyhow!("usage: tab <name>"));
    }
    let wanted = args.join(" ");
    let action = match Tab::parse_loose(&wanted) {
        Some(tab) => ViewAction::SelectTab(tab),
        None => ViewAction::RouteTab(wanted),
    };
    state.session.dispatch(action);
    let tab = state.session.state().tab;
    println!("tab: {}", state.session.translate(tab.translation_key()).cyan());
    print_result_summary(state);
    Ok(())
}

fn cmd_select(state: &mut ReplState<'_>, args: &[String]) -> Result<()> {
    let id = one_arg("select", args)?.to_string();
    state.session.dispatch(ViewAction::Select(id.clone()));
    let tick = state.session.tick();
    match tick.selected {
        Some(entity) if entity.id() == id => println!("selected {}", id.bold()),
        Some(entity) if !is_catalog_id(state.catalog, &id) => println!(
            "{} no node or project `{id}`; showing {}",
            "note:".yellow(),
            entity.id().bold()
        ),
        Some(entity) => println!(
            "{} `{id}` is not visible here; showing {}",
            "note:".yellow(),
            entity.id().bold()
        ),
        None => println!("{} nothing to select", "note:".yellow()),
    }
    Ok(())
}

fn is_catalog_id(catalog: &Catalog, id: &str) -> bool {
    catalog.node(id).is_some() || catalog.project(id).is_some()
}

fn cmd_lang(state: &mut ReplState<'_>, args: &[String]) -> Result<()> {
    if args.is_empty() {
        let active = state.session.localizer().language();
        for language in Language::ALL {
            let marker = if language == active { "*" } else { " " };
            println!(
                "{marker} {} {} {}",
                language.code().bold(),
                language.flag(),
                language.native_name()
            );
        }
        return Ok(());
    }
    let language: Language = one_arg("lang", args)?.parse()?;
    state.session.dispatch(SessionEvent::SetLanguage(language));
    println!("{}", state.session.translate("nav.dashboard").green());
    Ok(())
}

fn cmd_map(state: &ReplState<'_>) {
    let tick = state.session.tick();
    let Some(nodes) = tick.filtered.nodes() else {
        println!("{} the map shows nodes; switch to a node tab", "note:".yellow());
        return;
    };
    let selected = tick.selected.map(|e| e.id());
    print!(
        "{}",
        render::render_map(nodes, selected, render::MAP_WIDTH, render::MAP_HEIGHT)
    );
}

fn cmd_diagram(state: &ReplState<'_>, args: &[String]) -> Result<()> {
    let tick = state.session.tick();
    let Some(projects) = tick.filtered.projects() else {
        return Err(anyhow!("the diagram shows projects; run `tab ecosystem` first"));
    };
    let layout = venn::layout(projects.iter().copied());
    match args.first() {
        Some(path) => {
            fs::write(path, render::render_svg(&layout))?;
            println!("wrote {path}");
        }
        None => {
            for (label, count) in layout.counts() {
                println!("  {label}: {count}");
            }
        }
    }
    Ok(())
}

// ============================================================================
// Tab completion (rustyline)
// ============================================================================

#[cfg(feature = "repl-rustyline")]
const COMMANDS: &[&str] = &[
    "help", "exit", "show", "json", "tabs", "tab", "search", "clear", "select", "deselect", "lang",
    "langs", "layout", "range", "map", "diagram",
];

#[cfg(feature = "repl-rustyline")]
struct ReplLineHelper {
    files: rustyline::completion::FilenameCompleter,
    ids: Vec<String>,
}

#[cfg(feature = "repl-rustyline")]
impl ReplLineHelper {
    fn new(catalog: &Catalog) -> Self {
        let ids = catalog
            .nodes()
            .iter()
            .map(|n| n.id.clone())
            .chain(catalog.projects().iter().map(|p| p.id.clone()))
            .collect();
        Self {
            files: rustyline::completion::FilenameCompleter::new(),
            ids,
        }
    }

    fn pairs_from_prefix<'a>(
        items: impl IntoIterator<Item = &'a str>,
        prefix: &str,
    ) -> Vec<rustyline::completion::Pair> {
        items
            .into_iter()
            .filter(|item| item.starts_with(prefix))
            .map(|item| rustyline::completion::Pair {
                display: item.to_string(),
                replacement: item.to_string(),
            })
            .collect()
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::Helper for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::highlight::Highlighter for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::hint::Hinter for ReplLineHelper {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

#[cfg(feature = "repl-rustyline")]
impl rustyline::validate::Validator for ReplLineHelper {}

#[cfg(feature = "repl-rustyline")]
impl rustyline::completion::Completer for ReplLineHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);
        let word = &line[start..pos];
        let tokens: Vec<&str> = line[..start].split_whitespace().collect();

        let Some(&cmd) = tokens.first() else {
            return Ok((start, Self::pairs_from_prefix(COMMANDS.iter().copied(), word)));
        };

        let candidates: Vec<rustyline::completion::Pair> = match cmd {
            "tab" => Self::pairs_from_prefix(
                ["all", "db", "ai", "validators", "eco"],
                word,
            ),
            "lang" => Self::pairs_from_prefix(Language::ALL.iter().map(|l| l.code()), word),
            "layout" => Self::pairs_from_prefix(["grid", "diagram"], word),
            "range" => Self::pairs_from_prefix(["7d", "30d", "all"], word),
            "select" => Self::pairs_from_prefix(self.ids.iter().map(String::as_str), word),
            "diagram" => return self.files.complete(line, pos, ctx),
            _ => Vec::new(),
        };
        Ok((start, candidates))
    }
}

// ============================================================================
// Tokenization
// ============================================================================

fn split_command_line(line: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\\' => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        out.push(current);
    }

    out
}

/// Split a REPL line into tokens.
///
/// `search` keeps everything after the command as a single raw token so a
/// query's inner whitespace survives; wrap it in double quotes to keep
/// leading or trailing spaces.
fn tokenize_repl_line(line: &str) -> Vec<String> {
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }

    let (cmd, rest) = match line.find(char::is_whitespace) {
        Some(i) => (&line[..i], line[i..].trim_start()),
        None => (line, ""),
    };

    if cmd == "search" {
        let mut out = vec![cmd.to_string()];
        let raw = rest
            .strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .unwrap_or(rest);
        if !raw.is_empty() {
            out.push(raw.to_string());
        }
        return out;
    }

    split_command_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        tokenize_repl_line(line)
    }

    fn run(state: &mut ReplState<'_>, line: &str) -> ReplControl {
        dispatch_repl_line_result(state, &tokenize_repl_line(line)).unwrap()
    }

    #[test]
    fn search_keeps_the_raw_query() {
        assert_eq!(tokens("search new york"), vec!["search", "new york"]);
        assert_eq!(tokens(r#"search " york ""#), vec!["search", " york "]);
        assert_eq!(tokens("search"), vec!["search"]);
    }

    #[test]
    fn quoted_arguments_are_grouped() {
        assert_eq!(tokens(r#"tab "All Nodes""#), vec!["tab", "All Nodes"]);
        assert_eq!(tokens("layout   diagram"), vec!["layout", "diagram"]);
    }

    #[test]
    fn commands_drive_the_session() {
        colored::control::set_override(false);
        let catalog = Catalog::bundled().unwrap();
        let mut state = ReplState::new(&catalog, Localizer::bundled().unwrap(), ViewState::new());

        assert_eq!(run(&mut state, "search kiln"), ReplControl::Continue);
        assert_eq!(state.session.state().query, "kiln");

        run(&mut state, "tab eco");
        assert_eq!(state.session.state().tab, Tab::Ecosystem);
        assert!(state.session.state().query.is_empty());

        run(&mut state, "tab Bridges");
        assert_eq!(state.session.state().tab, Tab::AllNodes);

        run(&mut state, "lang fr");
        assert_eq!(state.session.localizer().language(), Language::Fr);

        run(&mut state, "range 30d");
        assert_eq!(state.session.state().time_range, TimeRange::ThirtyDays);

        assert_eq!(run(&mut state, "exit"), ReplControl::Exit);
    }

    #[test]
    fn catalog_ids_cover_nodes_and_projects() {
        let catalog = Catalog::bundled().unwrap();
        let node_id = catalog.nodes()[0].id.clone();
        assert!(is_catalog_id(&catalog, &node_id));
        assert!(is_catalog_id(&catalog, "nebula"));
        assert!(!is_catalog_id(&catalog, "atlantis"));

        let mut state = ReplState::new(&catalog, Localizer::bundled().unwrap(), ViewState::new());
        run(&mut state, "select atlantis");
        assert_eq!(state.session.state().selected_id.as_deref(), Some("atlantis"));
    }

    #[test]
    fn bad_arguments_are_errors() {
        let catalog = Catalog::bundled().unwrap();
        let mut state = ReplState::new(&catalog, Localizer::bundled().unwrap(), ViewState::new());
        assert!(dispatch_repl_line_result(&mut state, &tokens("lang tlh")).is_err());
        assert!(dispatch_repl_line_result(&mut state, &tokens("layout spiral")).is_err());
        assert!(dispatch_repl_line_result(&mut state, &tokens("frobnicate")).is_err());
        assert!(dispatch_repl_line_result(&mut state, &tokens("diagram")).is_err());
    }
}
