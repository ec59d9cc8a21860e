//! Which point labels to draw on the scatter plot, and where.
//!
//! Bigger bubbles (more ratings) claim label slots first. Whether any label is
//! drawn depends on how crowded the chart is and how far the user zoomed in;
//! once drawn, labels keep a minimum on-screen distance from each other.

use serde::Serialize;

use super::{ChartVariant, CourseDataPoint, LinearScale, Margins, ZoomTransform};

pub const DENSE_LABEL_SUPPRESSION_COUNT: usize = 140;
pub const AUTO_LABEL_LIMIT: usize = 60;
pub const SPARSE_MAX_POINTS: usize = 20;
pub const SPARSE_MIN_AREA_PER_POINT: f64 = 20_000.0;
pub const SPARSE_ZOOM_THRESHOLD: f64 = 2.0;
pub const DENSE_ZOOM_THRESHOLD: f64 = 2.5;
pub const MIN_PLOT_SIZE: f64 = 10.0;

const SPARSE_SEPARATION: Separation = Separation { base: 8.0, pixel_floor: 18.0 };
const DENSE_SEPARATION: Separation = Separation { base: 12.0, pixel_floor: 36.0 };

#[derive(Debug, Clone, Copy, PartialEq)]
struct Separation {
    base: f64,
    pixel_floor: f64,
}

impl Separation {
    fn threshold(&self, k: f64) -> f64 {
        self.base.max(self.pixel_floor / k.max(1.0))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LabelRequest<'a> {
    pub points: &'a [CourseDataPoint],
    pub variant: ChartVariant,
    /// Inner plot size, margins excluded.
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    pub transform: ZoomTransform,
    pub x_scale: LinearScale,
    pub y_scale: LinearScale,
    pub force_show_all: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLabel<'a> {
    pub point: &'a CourseDataPoint,
    /// Screen-space anchor, margins included.
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Density {
    pub is_dense: bool,
    pub can_show_without_zoom: bool,
}

impl Density {
    pub fn classify(count: usize, width: f64, height: f64) -> Self {
        let area_per_point = if count == 0 {
            f64::INFINITY
        } else {
            width * height / count as f64
        };
        Self {
            is_dense: count >= DENSE_LABEL_SUPPRESSION_COUNT,
            can_show_without_zoom: count <= SPARSE_MAX_POINTS
                && area_per_point > SPARSE_MIN_AREA_PER_POINT,
        }
    }

    /// Zoom gate: crowded charts only get labels once zoomed in.
    pub fn shows_labels(&self, k: f64, force_show_all: bool) -> bool {
        if force_show_all {
            return true;
        }
        if !self.can_show_without_zoom && k < SPARSE_ZOOM_THRESHOLD {
            return false;
        }
        if self.is_dense && k < DENSE_ZOOM_THRESHOLD {
            return false;
        }
        true
    }

    /// Minimum distance, in screen pixels, between two label anchors.
    pub fn min_separation(&self, k: f64, force_show_all: bool) -> f64 {
        if force_show_all || self.can_show_without_zoom {
            SPARSE_SEPARATION.threshold(k)
        } else {
            DENSE_SEPARATION.threshold(k)
        }
    }
}

pub fn anchor(request: &LabelRequest<'_>, point: &CourseDataPoint) -> (f64, f64) {
    let (x, y) = request
        .transform
        .apply((request.x_scale.scale(point.x), request.y_scale.scale(point.y)));
    (x + request.margins.left, y + request.margins.top)
}

pub fn place_labels<'a>(request: &LabelRequest<'a>) -> Vec<PlacedLabel<'a>> {
    if request.variant == ChartVariant::Mini
        || request.width < MIN_PLOT_SIZE
        || request.height < MIN_PLOT_SIZE
    {
        return Vec::new();
    }

    let mut ranked: Vec<&'a CourseDataPoint> = request.points.iter().collect();
    ranked.sort_by(|a, b| b.radius.total_cmp(&a.radius));

    let k = request.transform.k;
    let density = Density::classify(ranked.len(), request.width, request.height);
    if !density.shows_labels(k, request.force_show_all) {
        return Vec::new();
    }

    let min_distance = density.min_separation(k, request.force_show_all);
    let limit = if request.force_show_all {
        usize::MAX
    } else {
        AUTO_LABEL_LIMIT
    };

    let mut placed: Vec<PlacedLabel<'a>> = Vec::new();
    for point in ranked {
        if placed.len() >= limit {
            break;
        }
        let (x, y) = anchor(request, point);
        let clear = request.force_show_all
            || placed
                .iter()
                .all(|other| (other.x - x).hypot(other.y - y) > min_distance);
        if clear {
            placed.push(PlacedLabel { point, x, y });
        }
    }
    placed
}
