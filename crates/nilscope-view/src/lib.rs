//! nilscope view layer
//!
//! Everything between the catalog and a renderer:
//!
//! - [`filter`]: search, display-name ordering and selection resolution
//! - [`tabs`]: the tab bar and what each tab shows
//! - [`state`]: the per-session [`ViewState`] and its [`ViewAction`]s
//! - [`session`]: per-tick derivation of the visible list and selection
//! - [`present`], [`geo`], [`venn`]: formatting, map markers, category diagram
//!
//! Renderers only read a [`SessionTick`]; they never mutate state.

pub mod filter;
pub mod geo;
pub mod present;
pub mod session;
pub mod state;
pub mod tabs;
pub mod venn;

pub use filter::{
    filter_by_query, is_blank_query, resolve_selection, sort_nodes_by_display_name, Identified,
    Searchable, NODE_SEARCH_FIELDS, PROJECT_SEARCH_FIELDS,
};
pub use session::{
    Dashboard, EmptyResult, EntityList, EntityRef, Session, SessionEvent, SessionTick,
};
pub use state::{TimeRange, ViewAction, ViewState};
pub use tabs::{EcosystemLayout, RenderMode, Tab, TabSource};
pub use venn::VennLayout;
