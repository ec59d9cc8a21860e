use axum::Json;
use axum::extract::{Query, State};
use axum::http::Uri;

use super::views::{ExplorePage, LabelView};
use super::{QueryMap, UpstreamResult, page_path};
use crate::error::AppError;
use crate::filters::ListParams;
use crate::scatter::{
    ChartVariant, LabelRequest, LinearScale, Margins, ZoomTransform, build_points, place_labels,
};
use crate::state::AppState;

pub const DEFAULT_CHART_WIDTH: f64 = 960.0;
pub const DEFAULT_CHART_HEIGHT: f64 = 640.0;
const MAX_CHART_SIDE: f64 = 10_000.0;
const MAX_ZOOM: f64 = 40.0;

fn number(query: &QueryMap, key: &str) -> Option<f64> {
    query
        .get(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Chart geometry from the query; nonsense values fall back to defaults.
pub fn chart_geometry(query: &QueryMap) -> (ChartVariant, f64, f64, ZoomTransform, bool) {
    let variant = match query.get("variant").map(String::as_str) {
        Some("mini") => ChartVariant::Mini,
        _ => ChartVariant::Default,
    };
    let side = |key, default| {
        number(query, key)
            .filter(|v| *v >= 0.0)
            .map(|v| v.min(MAX_CHART_SIDE))
            .unwrap_or(default)
    };
    let width = side("width", DEFAULT_CHART_WIDTH);
    let height = side("height", DEFAULT_CHART_HEIGHT);
    let transform = ZoomTransform {
        k: number(query, "k")
            .filter(|k| *k > 0.0)
            .map(|k| k.min(MAX_ZOOM))
            .unwrap_or(1.0),
        x: number(query, "tx").unwrap_or(0.0),
        y: number(query, "ty").unwrap_or(0.0),
    };
    let force_show_all = query.get("labels").is_some_and(|v| v == "all");
    (variant, width, height, transform, force_show_all)
}

pub async fn explore(
    State(state): State<AppState>,
    uri: Uri,
    Query(query): Query<QueryMap>,
) -> Result<Json<ExplorePage>, AppError> {
    let params = ListParams::from_url_params(&query);
    let (variant, width, height, transform, force_show_all) = chart_geometry(&query);

    let rows = state
        .api
        .course_analytics(&params.filters.to_api_query(None, &params.sort))
        .await
        .or_redirect(&state, page_path(&uri))?;
    let points = build_points(&rows, variant);

    let margins = Margins::for_variant(variant);
    let inner_width = (width - margins.left - margins.right).max(0.0);
    let inner_height = (height - margins.top - margins.bottom).max(0.0);

    let labels: Vec<LabelView> = place_labels(&LabelRequest {
        points: &points,
        variant,
        width: inner_width,
        height: inner_height,
        margins,
        transform,
        x_scale: LinearScale::x_axis(inner_width),
        y_scale: LinearScale::y_axis(inner_height),
        force_show_all,
    })
    .iter()
    .map(LabelView::from)
    .collect();

    Ok(Json(ExplorePage {
        params,
        variant,
        width,
        height,
        inner_width,
        inner_height,
        margins,
        transform,
        total_courses: rows.len(),
        points,
        labels,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> QueryMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn geometry_defaults() {
        let (variant, width, height, transform, force) = chart_geometry(&QueryMap::new());
        assert_eq!(variant, ChartVariant::Default);
        assert_eq!((width, height), (DEFAULT_CHART_WIDTH, DEFAULT_CHART_HEIGHT));
        assert_eq!(transform, ZoomTransform::IDENTITY);
        assert!(!force);
    }

    #[test]
    fn geometry_rejects_nonsense() {
        let (_, width, _, transform, _) =
            chart_geometry(&query(&[("width", "-5"), ("k", "0"), ("tx", "NaN")]));
        assert_eq!(width, DEFAULT_CHART_WIDTH);
        assert_eq!(transform.k, 1.0);
        assert_eq!(transform.x, 0.0);
    }

    #[test]
    fn geometry_reads_zoom_and_flags() {
        let (variant, _, _, transform, force) = chart_geometry(&query(&[
            ("variant", "mini"),
            ("k", "3"),
            ("tx", "-120.5"),
            ("ty", "40"),
            ("labels", "all"),
        ]));
        assert_eq!(variant, ChartVariant::Mini);
        assert_eq!(transform, ZoomTransform { k: 3.0, x: -120.5, y: 40.0 });
        assert!(force);
    }
}
