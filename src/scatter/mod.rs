//! Explore view: courses plotted by usefulness (x) against difficulty (y).

pub mod labels;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::filters::{SCORE_MAX, SCORE_MIN};
use crate::models::CourseAnalytics;

pub use labels::{LabelRequest, PlacedLabel, place_labels};

const MIN_RADIUS: f64 = 4.0;
const MAX_RADIUS: f64 = 28.0;
const RADIUS_PER_SQRT_RATING: f64 = 2.5;
const MINI_RADIUS_FACTOR: f64 = 0.5;

pub const FACULTY_PALETTE: [&str; 10] = [
    "#2563eb", "#dc2626", "#16a34a", "#d97706", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
    "#ea580c", "#4f46e5",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartVariant {
    #[default]
    Default,
    Mini,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseDataPoint {
    pub id: Uuid,
    pub name: String,
    /// Average usefulness.
    pub x: f64,
    /// Average difficulty.
    pub y: f64,
    pub radius: f64,
    pub color: &'static str,
    pub faculty_name: String,
    pub ratings_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub const DEFAULT: Margins = Margins {
        top: 20.0,
        right: 20.0,
        bottom: 48.0,
        left: 56.0,
    };
    pub const MINI: Margins = Margins {
        top: 4.0,
        right: 4.0,
        bottom: 4.0,
        left: 4.0,
    };

    pub fn for_variant(variant: ChartVariant) -> Self {
        match variant {
            ChartVariant::Default => Self::DEFAULT,
            ChartVariant::Mini => Self::MINI,
        }
    }
}

/// Pan/zoom state: `screen = k * v + (x, y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
    pub y: f64,
}

impl ZoomTransform {
    pub const IDENTITY: ZoomTransform = ZoomTransform { k: 1.0, x: 0.0, y: 0.0 };

    pub fn apply(&self, (px, py): (f64, f64)) -> (f64, f64) {
        (self.k * px + self.x, self.k * py + self.y)
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Maps a value domain linearly onto a pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Usefulness axis, left to right.
    pub fn x_axis(inner_width: f64) -> Self {
        Self::new((SCORE_MIN, SCORE_MAX), (0.0, inner_width))
    }

    /// Difficulty axis, bottom to top.
    pub fn y_axis(inner_height: f64) -> Self {
        Self::new((SCORE_MIN, SCORE_MAX), (inner_height, 0.0))
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return (r0 + r1) / 2.0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }
}

pub fn point_radius(ratings_count: u32, variant: ChartVariant) -> f64 {
    let radius = (RADIUS_PER_SQRT_RATING * f64::from(ratings_count).sqrt()).clamp(MIN_RADIUS, MAX_RADIUS);
    match variant {
        ChartVariant::Default => radius,
        ChartVariant::Mini => radius * MINI_RADIUS_FACTOR,
    }
}

/// Stable faculty -> color assignment: faculties sorted by name take palette
/// slots in order, wrapping around.
pub fn faculty_colors<'a>(faculties: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, &'static str> {
    let mut names: Vec<&str> = faculties.into_iter().collect();
    names.sort_unstable();
    names.dedup();
    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), FACULTY_PALETTE[i % FACULTY_PALETTE.len()]))
        .collect()
}

/// Courses with both averages become plot points; unrated ones are skipped.
pub fn build_points(rows: &[CourseAnalytics], variant: ChartVariant) -> Vec<CourseDataPoint> {
    let colors = faculty_colors(rows.iter().map(|r| r.faculty_name.as_str()));
    rows.iter()
        .filter_map(|row| {
            let x = row.avg_usefulness?;
            let y = row.avg_difficulty?;
            Some(CourseDataPoint {
                id: row.id,
                name: row.name.clone(),
                x,
                y,
                radius: point_radius(row.ratings_count, variant),
                color: colors
                    .get(&row.faculty_name)
                    .copied()
                    .unwrap_or(FACULTY_PALETTE[0]),
                faculty_name: row.faculty_name.clone(),
                ratings_count: row.ratings_count,
            })
        })
        .collect()
}
