//! Integration tests for the complete nilscope pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Catalog bundle → Dashboard → SessionTick
//! - ViewAction sequences → selection and filtering
//! - Localizer → translated tick output
//!
//! Run with: cargo test --test integration_tests

use nilscope_catalog::{Catalog, NodeType};
use nilscope_i18n::{Language, Localizer};
use nilscope_view::{EntityRef, RenderMode, Session, SessionEvent, Tab, ViewAction};
use tempfile::tempdir;

const FIXTURE: &str = r#"{
  "nodes": [
    {"_id": "val-a", "node_type": "nilchain", "moniker": "Zeta", "organization": "Aardvark",
     "city": "Toronto", "country": "Canada", "ip": "XXXX", "asn": "XXXX"},
    {"_id": "val-b", "node_type": "nilchain", "moniker": "Alpha",
     "city": "Mumbai", "country": "India", "ip": "XXXX", "asn": "AS9498"},
    {"_id": "db-1", "node_type": "nildb", "organization": "Orchid Data",
     "city": "London", "country": "United Kingdom", "coordinates": [-0.1276, 51.5072],
     "cloud": "AWS", "live_since": "2024-08-01T00:00:00Z", "ip": "10.0.0.1", "asn": "AS16509"},
    {"_id": "db-2", "node_type": "nildb", "organization": "Basalt",
     "city": "Lagos", "country": "Nigeria", "ip": "XXXX", "asn": "XXXX"}
  ],
  "projects": [
    {"id": "skillful-ai", "name": "Skillful AI", "category": "AI", "status": "Live",
     "description": "AI agents with private memory", "website": "https://skillfulai.io",
     "metrics": {"tvl": "$1.2M", "volume24h": "$80K", "users": "12K"}},
    {"id": "nebula", "name": "Nebula", "category": "Data Ownership", "status": "Beta"}
  ]
}"#;

fn fixture() -> Catalog {
    Catalog::from_json(FIXTURE).expect("fixture should load")
}

fn localizer() -> Localizer {
    Localizer::bundled().expect("bundled locales")
}

// ============================================================================
// Catalog loading
// ============================================================================

#[test]
fn test_catalog_bundle_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(&path, FIXTURE).unwrap();

    let catalog = Catalog::from_path(&path).expect("should load");
    assert_eq!(catalog.nodes().len(), 4);
    assert_eq!(catalog.projects().len(), 2);

    let db = catalog.node("db-1").unwrap();
    assert_eq!(db.node_type, NodeType::DatabaseNode);
    assert!(db.coordinates().is_some());
    assert!(catalog.node("val-a").unwrap().ip.is_redacted());
    assert_eq!(catalog.node("val-b").unwrap().asn.visible(), Some("AS9498"));
}

#[test]
fn test_catalog_round_trips_through_json() {
    let catalog = fixture();
    let json = catalog.to_json_pretty().unwrap();
    assert_eq!(Catalog::from_json(&json).unwrap(), catalog);
}

// ============================================================================
// Ordering and filtering
// ============================================================================

#[test]
fn test_validators_sort_by_moniker() {
    let catalog = fixture();
    let mut session = Session::new(&catalog, localizer());
    session.dispatch(ViewAction::SelectTab(Tab::Validators));

    let tick = session.tick();
    let names: Vec<&str> = tick
        .filtered
        .nodes()
        .unwrap()
        .iter()
        .map(|n| n.display_name())
        .collect();
    // The organization on val-a is ignored for validators.
    assert_eq!(names, vec!["Alpha", "Zeta"]);
}

#[test]
fn test_city_query_matches_only_london() {
    let catalog = fixture();
    let mut session = Session::new(&catalog, localizer());
    session.dispatch(ViewAction::SetQuery("lon".to_string()));

    let tick = session.tick();
    assert_eq!(tick.filtered.ids(), vec!["db-1"]);
    assert_eq!(tick.selected.map(|e| e.id()), Some("db-1"));
}

// ============================================================================
// Selection and tab routing
// ============================================================================

#[test]
fn test_validator_tab_falls_back_from_database_selection() {
    let catalog = fixture();
    let mut session = Session::new(&catalog, localizer());
    session.dispatch(ViewAction::Select("db-1".to_string()));
    session.dispatch(ViewAction::SelectTab(Tab::Validators));

    let tick = session.tick();
    match tick.selected {
        Some(EntityRef::Node(node)) => {
            assert_eq!(node.id, "val-b");
            assert_eq!(node.node_type, NodeType::Validator);
        }
        other => panic!("expected a validator, got {other:?}"),
    }
}

#[test]
fn test_ecosystem_switch_clears_query_and_lists_everything() {
    let catalog = fixture();
    let mut session = Session::new(&catalog, localizer());
    session.dispatch(ViewAction::SetQuery("skill".to_string()));
    session.dispatch(ViewAction::RouteTab("Ecosystem".to_string()));

    let tick = session.tick();
    assert_eq!(tick.tab, Tab::Ecosystem);
    assert_eq!(tick.query, "");
    assert_eq!(tick.render_mode, RenderMode::ProjectGrid);
    assert_eq!(tick.filtered.ids(), vec!["skillful-ai", "nebula"]);
    assert!(tick.empty_result.is_none());
}

#[test]
fn test_unknown_tab_label_routes_to_all_nodes() {
    let catalog = fixture();
    let mut session = Session::new(&catalog, localizer());
    session.dispatch(ViewAction::SelectTab(Tab::Validators));
    session.dispatch(ViewAction::RouteTab("Bridges".to_string()));
    assert_eq!(session.tick().tab, Tab::AllNodes);
    assert_eq!(session.tick().filtered.len(), 4);
}

// ============================================================================
// Localization
// ============================================================================

#[test]
fn test_french_title_and_unknown_key_fallback() {
    let catalog = fixture();
    let mut session = Session::new(&catalog, localizer());
    session.dispatch(SessionEvent::SetLanguage(Language::Fr));
    assert_eq!(session.translate("nav.dashboard"), "Tableau de Bord");

    for language in Language::ALL {
        session.dispatch(SessionEvent::SetLanguage(language));
        assert_eq!(session.translate("made.up.key"), "made.up.key");
    }
}

#[test]
fn test_language_switch_keeps_view_state() {
    let catalog = fixture();
    let mut session = Session::new(&catalog, localizer());
    session.dispatch(ViewAction::SetQuery("a".to_string()));
    session.dispatch(ViewAction::Select("db-2".to_string()));
    let before = session.state().clone();

    session.dispatch(SessionEvent::SetLanguage(Language::Ja));
    assert_eq!(session.state(), &before);
    assert_eq!(session.tick().language, Language::Ja);
}

// ============================================================================
// Empty catalog
// ============================================================================

#[test]
fn test_empty_catalog_yields_empty_results() {
    let catalog = Catalog::empty();
    let mut session = Session::new(&catalog, localizer());
    session.dispatch(ViewAction::SelectTab(Tab::Ecosystem));
    session.dispatch(ViewAction::SetQuery("anything".to_string()));

    let tick = session.tick();
    assert!(tick.filtered.is_empty());
    assert!(tick.selected.is_none());
    let empty = tick.empty_result.expect("empty result");
    assert_eq!(empty.message_key, "search.noProjects");
    assert_eq!(empty.query, "anything");
}

#[test]
fn test_tick_json_carries_translations() {
    let catalog = fixture();
    let mut session = Session::new(&catalog, localizer());
    session.dispatch(SessionEvent::SetLanguage(Language::De));
    let value = serde_json::to_value(session.tick()).unwrap();
    assert_eq!(value["language"], "de");
    assert_eq!(value["translations"]["nav.ecosystem"], "Ökosystem");
}
