//! Category diagram for the ecosystem tab.
//!
//! Primary categories get one circle each, spaced evenly on a ring. A
//! compound category such as `AI & Data` is placed between the circles its
//! parts name (a part names a circle when the circle label starts with it,
//! ignoring case). Projects in the same region fan out around the region
//! centre in catalog order.

use nilscope_catalog::EcosystemProject;
use serde::Serialize;
use std::f64::consts::PI;

use crate::present::category_color;

pub const CANVAS_WIDTH: f64 = 800.0;
pub const CANVAS_HEIGHT: f64 = 600.0;

const CIRCLE_RADIUS: f64 = 120.0;
const MIN_CIRCLE_RADIUS: f64 = 60.0;
const RING_RADIUS: f64 = 110.0;
const SPREAD_FACTOR: f64 = 0.45;
const COMPOUND_SEPARATOR: char = '&';

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VennCircle {
    pub label: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VennPlacement {
    pub project_id: String,
    pub name: String,
    pub category: String,
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    /// Indices into [`VennLayout::circles`] of the region this project sits in.
    pub circles: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VennLayout {
    pub width: f64,
    pub height: f64,
    pub circles: Vec<VennCircle>,
    pub placements: Vec<VennPlacement>,
}

fn is_compound(category: &str) -> bool {
    category.contains(COMPOUND_SEPARATOR)
}

fn circle_radius(count: usize) -> f64 {
    if count <= 3 {
        CIRCLE_RADIUS
    } else {
        (CIRCLE_RADIUS * 3.0 / count as f64).max(MIN_CIRCLE_RADIUS)
    }
}

/// Circle indices a category belongs to.
fn region_of(category: &str, circles: &[VennCircle]) -> Vec<usize> {
    if !is_compound(category) {
        return circles
            .iter()
            .position(|c| c.label == category)
            .into_iter()
            .collect();
    }
    let mut hits = Vec::new();
    for part in category.split(COMPOUND_SEPARATOR) {
        let part = part.trim().to_lowercase();
        if part.is_empty() {
            continue;
        }
        if let Some(idx) = circles
            .iter()
            .position(|c| c.label.to_lowercase().starts_with(&part))
        {
            if !hits.contains(&idx) {
                hits.push(idx);
            }
        }
    }
    hits
}

fn region_centre(region: &[usize], circles: &[VennCircle]) -> (f64, f64) {
    if region.is_empty() {
        return (CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
    }
    let n = region.len() as f64;
    let (sx, sy) = region
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &i| (sx + circles[i].cx, sy + circles[i].cy));
    (sx / n, sy / n)
}

/// Lay out `projects` (already filtered, in display order).
pub fn layout<'a, I>(projects: I) -> VennLayout
where
    I: IntoIterator<Item = &'a EcosystemProject>,
{
    let projects: Vec<&EcosystemProject> = projects.into_iter().collect();

    let mut labels: Vec<&str> = Vec::new();
    for p in &projects {
        if !is_compound(&p.category) && !labels.contains(&p.category.as_str()) {
            labels.push(&p.category);
        }
    }

    let r = circle_radius(labels.len());
    let (mid_x, mid_y) = (CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);
    let circles: Vec<VennCircle> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let (cx, cy) = if labels.len() == 1 {
                (mid_x, mid_y)
            } else {
                let angle = -PI / 2.0 + i as f64 * 2.0 * PI / labels.len() as f64;
                (mid_x + RING_RADIUS * angle.cos(), mid_y + RING_RADIUS * angle.sin())
            };
            VennCircle {
                label: label.to_string(),
                cx,
                cy,
                r,
                color: category_color(label),
            }
        })
        .collect();

    // Group by region, keeping first-appearance order within each group.
    let regions: Vec<Vec<usize>> = projects
        .iter()
        .map(|p| region_of(&p.category, &circles))
        .collect();

    let mut placements = Vec::with_capacity(projects.len());
    for (i, project) in projects.iter().enumerate() {
        let region = &regions[i];
        let siblings: Vec<usize> = (0..projects.len())
            .filter(|&j| &regions[j] == region)
            .collect();
        let rank = siblings.iter().position(|&j| j == i).unwrap_or(0);
        let (cx, cy) = region_centre(region, &circles);
        let (x, y) = if siblings.len() <= 1 {
            (cx, cy)
        } else {
            let spread = r * SPREAD_FACTOR;
            let angle = -PI / 2.0 + rank as f64 * 2.0 * PI / siblings.len() as f64;
            (cx + spread * angle.cos(), cy + spread * angle.sin())
        };
        placements.push(VennPlacement {
            project_id: project.id.clone(),
            name: project.name.clone(),
            category: project.category.clone(),
            x,
            y,
            color: category_color(&project.category),
            circles: region.clone(),
        });
    }

    VennLayout {
        width: CANVAS_WIDTH,
        height: CANVAS_HEIGHT,
        circles,
        placements,
    }
}

impl VennLayout {
    pub fn placement(&self, project_id: &str) -> Option<&VennPlacement> {
        self.placements.iter().find(|p| p.project_id == project_id)
    }

    /// Project count per circle, in circle order.
    pub fn counts(&self) -> Vec<(&str, usize)> {
        self.circles
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let n = self
                    .placements
                    .iter()
                    .filter(|p| p.circles.contains(&i))
                    .count();
                (c.label.as_str(), n)
            })
            .collect()
    }
}
