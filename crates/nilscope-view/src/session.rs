//! Derivation of what the dashboard shows from the current view-state.
//!
//! ```text
//!   tab click / search / row click / language
//!                    │
//!                    ▼
//!   ┌──────────────────────────────┐
//!   │ Session                      │
//!   │   ViewState  ── apply ──►    │
//!   │   Localizer  ── set  ──►     │
//!   └──────────────┬───────────────┘
//!                  │ tick()
//!                  ▼
//!   base sequence ─► filter ─► resolve selection ─► SessionTick
//! ```
//!
//! A tick is recomputed from scratch on every call. Nothing derived is
//! cached across state changes, so a selection can never outlive the list
//! it was resolved against.

use nilscope_catalog::{Catalog, EcosystemProject, Node};
use nilscope_i18n::{Language, Localizer, TranslationTable};
use serde::Serialize;

use crate::filter::{
    filter_by_query, is_blank_query, resolve_selection, sort_nodes_by_display_name,
    NODE_SEARCH_FIELDS, PROJECT_SEARCH_FIELDS,
};
use crate::state::{TimeRange, ViewAction, ViewState};
use crate::tabs::{RenderMode, Tab, TabSource};

/// An ordered list of one kind of entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum EntityList<'a> {
    Nodes(Vec<&'a Node>),
    Projects(Vec<&'a EcosystemProject>),
}

impl<'a> EntityList<'a> {
    pub fn len(&self) -> usize {
        match self {
            Self::Nodes(v) => v.len(),
            Self::Projects(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<&'a str> {
        match self {
            Self::Nodes(v) => v.iter().map(|n| n.id.as_str()).collect(),
            Self::Projects(v) => v.iter().map(|p| p.id.as_str()).collect(),
        }
    }

    pub fn nodes(&self) -> Option<&[&'a Node]> {
        match self {
            Self::Nodes(v) => Some(v),
            Self::Projects(_) => None,
        }
    }

    pub fn projects(&self) -> Option<&[&'a EcosystemProject]> {
        match self {
            Self::Projects(v) => Some(v),
            Self::Nodes(_) => None,
        }
    }
}

/// The entity shown in the detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "entity", rename_all = "snake_case")]
pub enum EntityRef<'a> {
    Node(&'a Node),
    Project(&'a EcosystemProject),
}

impl<'a> EntityRef<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            Self::Node(n) => &n.id,
            Self::Project(p) => &p.id,
        }
    }

    pub fn as_node(&self) -> Option<&'a Node> {
        match self {
            Self::Node(n) => Some(n),
            Self::Project(_) => None,
        }
    }

    pub fn as_project(&self) -> Option<&'a EcosystemProject> {
        match self {
            Self::Project(p) => Some(p),
            Self::Node(_) => None,
        }
    }
}

/// A filter that matched nothing. Rendered as "no results for <query>",
/// never as an empty table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyResult {
    pub query: String,
    /// Translation key for the message prefix.
    pub message_key: &'static str,
}

/// Everything the presentation layer reads for one render.
#[derive(Debug, Clone, Serialize)]
pub struct SessionTick<'a> {
    pub tab: Tab,
    pub render_mode: RenderMode,
    pub query: &'a str,
    pub time_range: TimeRange,
    pub language: Language,
    pub available_tabs: &'static [Tab],
    pub active: EntityList<'a>,
    pub filtered: EntityList<'a>,
    pub selected: Option<EntityRef<'a>>,
    pub empty_result: Option<EmptyResult>,
    #[serde(rename = "translations")]
    pub active_table: &'a TranslationTable,
}

// ============================================================================
// Dashboard (catalog-side derivation)
// ============================================================================

/// Catalog view with the All Nodes ordering computed once.
#[derive(Debug, Clone)]
pub struct Dashboard<'c> {
    catalog: &'c Catalog,
    sorted_nodes: Vec<&'c Node>,
}

impl<'c> Dashboard<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            sorted_nodes: sort_nodes_by_display_name(catalog.nodes()),
        }
    }

    /// Base sequence for a tab. Type tabs are taken from the sorted list so
    /// they share its order.
    pub fn base(&self, tab: Tab) -> EntityList<'c> {
        match tab.source() {
            TabSource::AllNodes => EntityList::Nodes(self.sorted_nodes.clone()),
            TabSource::NodesOfType(node_type) => EntityList::Nodes(
                self.sorted_nodes
                    .iter()
                    .copied()
                    .filter(|n| n.node_type == node_type)
                    .collect(),
            ),
            TabSource::Projects => EntityList::Projects(self.catalog.projects().iter().collect()),
        }
    }

    /// Derive the visible list and selection for `state`.
    pub fn derive(
        &self,
        state: &ViewState,
    ) -> (EntityList<'c>, EntityList<'c>, Option<EntityRef<'c>>) {
        let active = self.base(state.tab);
        let requested = state.selected_id.as_deref();
        let (filtered, selected) = match &active {
            EntityList::Nodes(nodes) => {
                let hits = filter_by_query(nodes, &state.query, NODE_SEARCH_FIELDS);
                let selected = resolve_selection(&hits, requested).map(EntityRef::Node);
                (EntityList::Nodes(hits), selected)
            }
            EntityList::Projects(projects) => {
                let hits = filter_by_query(projects, &state.query, PROJECT_SEARCH_FIELDS);
                let selected = resolve_selection(&hits, requested).map(EntityRef::Project);
                (EntityList::Projects(hits), selected)
            }
        };
        (active, filtered, selected)
    }

    pub fn tick<'a>(&'a self, state: &'a ViewState, localizer: &'a Localizer) -> SessionTick<'a>
    where
        'c: 'a,
    {
        let (active, filtered, selected) = self.derive(state);
        let empty_result = filtered.is_empty().then(|| EmptyResult {
            query: state.query.clone(),
            message_key: if state.tab.shows_projects() {
                "search.noProjects"
            } else {
                "search.noResults"
            },
        });
        if let Some(empty) = &empty_result {
            tracing::debug!(
                tab = %state.tab,
                query = %empty.query,
                blank = is_blank_query(&empty.query),
                "filter produced no results"
            );
        }

        SessionTick {
            tab: state.tab,
            render_mode: state.tab.render_mode(state.ecosystem_layout),
            query: &state.query,
            time_range: state.time_range,
            language: localizer.language(),
            available_tabs: &Tab::ALL,
            active,
            filtered,
            selected,
            empty_result,
            active_table: localizer.active_table(),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// One interactive event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    View(ViewAction),
    SetLanguage(Language),
}

impl From<ViewAction> for SessionEvent {
    fn from(action: ViewAction) -> Self {
        Self::View(action)
    }
}

/// A single interactive session: view-state, language and the catalog they
/// are resolved against. Events are applied one at a time, to completion.
#[derive(Debug, Clone)]
pub struct Session<'c> {
    dashboard: Dashboard<'c>,
    state: ViewState,
    localizer: Localizer,
}

impl<'c> Session<'c> {
    pub fn new(catalog: &'c Catalog, localizer: Localizer) -> Self {
        Self::with_state(catalog, localizer, ViewState::default())
    }

    pub fn with_state(catalog: &'c Catalog, localizer: Localizer, state: ViewState) -> Self {
        Self {
            dashboard: Dashboard::new(catalog),
            state,
            localizer,
        }
    }

    pub fn dispatch(&mut self, event: impl Into<SessionEvent>) {
        match event.into() {
            SessionEvent::View(action) => self.state.apply(action),
            SessionEvent::SetLanguage(language) => self.localizer.set_language(language),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn localizer(&self) -> &Localizer {
        &self.localizer
    }

    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.localizer.translate(key)
    }

    pub fn tick(&self) -> SessionTick<'_> {
        self.dashboard.tick(&self.state, &self.localizer)
    }
}
