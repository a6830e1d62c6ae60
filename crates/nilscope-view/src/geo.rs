//! Map marker placement.
//!
//! Equirectangular projection onto a box measured in percent, clamped so the
//! marker never sits on the edge. Tile rendering is left to the map widget.

use nilscope_catalog::{Coordinates, Node};
use serde::Serialize;

const MARKER_MIN_PCT: f64 = 5.0;
const MARKER_MAX_PCT: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapPoint {
    pub left_pct: f64,
    pub top_pct: f64,
}

pub fn project(coords: Coordinates) -> MapPoint {
    let left = (coords.longitude + 180.0) / 360.0 * 100.0;
    let top = (90.0 - coords.latitude) / 180.0 * 100.0;
    MapPoint {
        left_pct: left.clamp(MARKER_MIN_PCT, MARKER_MAX_PCT),
        top_pct: top.clamp(MARKER_MIN_PCT, MARKER_MAX_PCT),
    }
}

/// Marker for a node, or `None` when it has no coordinates.
pub fn marker_for(node: &Node) -> Option<MapPoint> {
    node.coordinates().map(project)
}

/// Character cell for a `width` × `height` text map.
pub fn grid_cell(point: MapPoint, width: usize, height: usize) -> (usize, usize) {
    let col = (point.left_pct / 100.0 * width as f64) as usize;
    let row = (point.top_pct / 100.0 * height as f64) as usize;
    (col.min(width.saturating_sub(1)), row.min(height.saturating_sub(1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_centre() {
        let p = project(Coordinates::new(0.0, 0.0));
        assert_eq!(p.left_pct, 50.0);
        assert_eq!(p.top_pct, 50.0);
    }

    #[test]
    fn london_lands_north_of_centre() {
        let p = project(Coordinates::new(-0.1276, 51.5072));
        assert!((p.left_pct - 49.9646).abs() < 1e-3);
        assert!((p.top_pct - 21.3849).abs() < 1e-3);
    }

    #[test]
    fn extremes_are_clamped() {
        let p = project(Coordinates::new(-180.0, 90.0));
        assert_eq!(p.left_pct, MARKER_MIN_PCT);
        assert_eq!(p.top_pct, MARKER_MIN_PCT);
        let p = project(Coordinates::new(180.0, -90.0));
        assert_eq!(p.left_pct, MARKER_MAX_PCT);
        assert_eq!(p.top_pct, MARKER_MAX_PCT);
    }

    #[test]
    fn grid_cell_stays_in_bounds() {
        let p = MapPoint {
            left_pct: 95.0,
            top_pct: 95.0,
        };
        assert_eq!(grid_cell(p, 60, 20), (57, 19));
        assert_eq!(grid_cell(p, 0, 0), (0, 0));
    }
}
