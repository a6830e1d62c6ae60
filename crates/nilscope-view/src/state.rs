//! Session view-state and its transitions.
//!
//! `ViewState` holds only what the user chose (tab, query, requested
//! selection, ecosystem layout, time range). Everything shown is derived
//! from it on each tick; see [`crate::session`].

use serde::{Deserialize, Serialize};

use crate::tabs::{EcosystemLayout, Tab};

/// Window for the ecosystem statistics header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7D")]
    SevenDays,
    #[serde(rename = "30D")]
    ThirtyDays,
    #[serde(rename = "ALL")]
    All,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::SevenDays, TimeRange::ThirtyDays, TimeRange::All];

    pub fn label(self) -> &'static str {
        match self {
            Self::SevenDays => "7D",
            Self::ThirtyDays => "30D",
            Self::All => "ALL",
        }
    }

    pub fn translation_key(self) -> &'static str {
        match self {
            Self::SevenDays => "time.7d",
            Self::ThirtyDays => "time.30d",
            Self::All => "time.all",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(wanted))
    }
}

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Tab bar click.
    SelectTab(Tab),
    /// A raw tab label; unknown labels route to the default tab.
    RouteTab(String),
    /// Search box edit.
    SetQuery(String),
    ClearQuery,
    /// Row or card click.
    Select(String),
    ClearSelection,
    SetEcosystemLayout(EcosystemLayout),
    SetTimeRange(TimeRange),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub tab: Tab,
    pub query: String,
    /// Requested selection. Only a request: it is resolved against the
    /// current filtered list on every tick.
    pub selected_id: Option<String>,
    pub ecosystem_layout: EcosystemLayout,
    pub time_range: TimeRange,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab(tab: Tab) -> Self {
        let mut state = Self::default();
        state.apply(ViewAction::SelectTab(tab));
        state
    }

    /// Apply one interaction. Entering the Ecosystem tab clears the query.
    pub fn apply(&mut self, action: ViewAction) {
        tracing::debug!(?action, "view action");
        match action {
            ViewAction::SelectTab(tab) => self.select_tab(tab),
            ViewAction::RouteTab(label) => self.select_tab(Tab::route(&label)),
            ViewAction::SetQuery(query) => self.query = query,
            ViewAction::ClearQuery => self.query.clear(),
            ViewAction::Select(id) => self.selected_id = Some(id),
            ViewAction::ClearSelection => self.selected_id = None,
            ViewAction::SetEcosystemLayout(layout) => self.ecosystem_layout = layout,
            ViewAction::SetTimeRange(range) => self.time_range = range,
        }
    }

    /// Consuming form of [`ViewState::apply`].
    pub fn reduce(mut self, action: ViewAction) -> Self {
        self.apply(action);
        self
    }

    fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        if tab == Tab::Ecosystem {
            self.query.clear();
        }
    }
}
