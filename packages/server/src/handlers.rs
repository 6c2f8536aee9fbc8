//! HTTP handler functions for the fatality map API.

use actix_web::{HttpResponse, web};
use fatality_map_analytics::AnalyticsError;
use fatality_map_analytics_models::AggregationResult;
use fatality_map_fatality_models::MapSelection;
use fatality_map_ingest::Dataset;
use fatality_map_server_models::{ApiError, ApiFilterOptions, ApiHealth, MapQueryParams};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/filters`
///
/// Returns the values each filter control can take.
pub async fn filters(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiFilterOptions::new(state.dataset.years()))
}

/// `GET /api/totals`
///
/// Returns the raw (untransformed) per-county totals for the selection.
pub async fn totals(
    state: web::Data<AppState>,
    params: web::Query<MapQueryParams>,
) -> HttpResponse {
    match selection_totals(&state.dataset, params.into_inner()) {
        Ok((_, result)) => HttpResponse::Ok().json(result),
        Err(response) => response,
    }
}

/// `GET /api/map`
///
/// Returns the log-scaled choropleth figure for the selection.
pub async fn map(state: web::Data<AppState>, params: web::Query<MapQueryParams>) -> HttpResponse {
    match selection_totals(&state.dataset, params.into_inner()) {
        Ok((selection, result)) => {
            log::debug!("Rendering map for {selection:?}");
            let figure = fatality_map_render::render(
                &result.totals,
                result.max_total,
                &state.dataset.geography,
            );
            HttpResponse::Ok().json(figure)
        }
        Err(response) => response,
    }
}

/// Parses the query and aggregates the matching event table, mapping any
/// failure to the response that should be sent instead.
fn selection_totals(
    dataset: &Dataset,
    params: MapQueryParams,
) -> Result<(MapSelection, AggregationResult), HttpResponse> {
    let mut selection = MapSelection::try_from(params).map_err(|e| {
        log::warn!("Rejected map query: {e}");
        HttpResponse::BadRequest().json(ApiError {
            error: e.to_string(),
        })
    })?;
    dataset.resolve_state(&mut selection);

    let result = fatality_map_analytics::aggregate(
        dataset.events(selection.mode),
        &selection.constraints(),
        &dataset.regions,
    )
    .map_err(|e| error_response(&e))?;

    Ok((selection, result))
}

fn error_response(e: &AnalyticsError) -> HttpResponse {
    log::warn!("Rejected map query: {e}");
    let body = ApiError {
        error: e.to_string(),
    };
    match e {
        AnalyticsError::EmptyRegionTable { .. } => HttpResponse::NotFound().json(body),
        AnalyticsError::InvalidConstraintKey { .. }
        | AnalyticsError::InvalidConstraintValue(_) => HttpResponse::BadRequest().json(body),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use fatality_map_fatality_models::{DayOfWeek, EventRecord, HourBucket};
    use fatality_map_geography::Geography;
    use fatality_map_geography_models::{Region, RegionTable};

    use super::*;

    const COUNTIES: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "id": "06001", "properties": {},
         "geometry": {"type": "Point", "coordinates": [-122.0, 37.6]}},
        {"type": "Feature", "id": "06037", "properties": {},
         "geometry": {"type": "Point", "coordinates": [-118.2, 34.0]}}
    ]}"#;

    fn event(region_id: &str, year: Option<i32>, day: DayOfWeek, total: f64) -> EventRecord {
        EventRecord {
            state: "6".to_string(),
            county: region_id[2..].to_string(),
            region_id: region_id.to_string(),
            year,
            day_of_week: day,
            hour_bucket: HourBucket::Evening,
            total,
        }
    }

    fn state() -> web::Data<AppState> {
        let dataset = Dataset {
            historic: vec![
                event("06001", Some(2012), DayOfWeek::Sunday, 2.0),
                event("06037", Some(2013), DayOfWeek::Monday, 9.0),
            ],
            predictions: vec![event("06037", None, DayOfWeek::Sunday, 0.4)],
            regions: RegionTable::new(vec![
                Region::new("06001", "6", "001"),
                Region::new("06037", "6", "037"),
                Region::new("06075", "6", "075"),
            ])
            .unwrap(),
            geography: Geography::parse(COUNTIES).unwrap(),
        };
        web::Data::new(AppState {
            dataset: Arc::new(dataset),
        })
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let app = test::init_service(App::new().configure(crate::configure)).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn filters_list_available_years() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get().uri("/api/filters").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["years"], serde_json::json!([2012, 2013]));
        assert_eq!(body["daysOfWeek"].as_array().map(Vec::len), Some(7));
    }

    #[actix_web::test]
    async fn totals_apply_year_filter() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/totals?year=2012")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totals"][0]["regionId"], "06001");
        assert_eq!(body["totals"][0]["total"], 2.0);
        assert_eq!(body["totals"][1]["total"], 0.0);
        assert_eq!(body["totals"][2]["total"], 0.0);
        assert_eq!(body["maxTotal"], 9.0);
    }

    #[actix_web::test]
    async fn model_mode_uses_predictions_and_ignores_year() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/totals?mode=model&year=2012")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totals"][1]["total"], 0.4);
    }

    #[actix_web::test]
    async fn map_returns_figure() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/map?dayOfWeek=1")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let trace = &body["data"][0];
        assert_eq!(trace["type"], "choroplethmapbox");
        assert_eq!(trace["locations"], serde_json::json!(["06001", "06037", "06075"]));
        assert_eq!(trace["z"][1], 0.0);
        assert_eq!(body["scaleStatus"], "normal");
    }

    #[actix_web::test]
    async fn empty_selection_has_degenerate_scale() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get()
            .uri("/api/map?mode=model&dayOfWeek=7")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["scaleStatus"], "degenerate");
        assert!(body["data"][0]["zmax"].as_f64().unwrap() > 0.0);
    }

    #[actix_web::test]
    async fn bad_parameters_are_rejected() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;

        let req = test::TestRequest::get().uri("/api/map?hour=9").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/map?mode=forecast").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn state_abbreviation_selects_counties() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get().uri("/api/totals?state=CA").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["totals"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["maxTotal"], 9.0);
    }

    #[actix_web::test]
    async fn unknown_state_is_not_found() {
        let app =
            test::init_service(App::new().app_data(state()).configure(crate::configure)).await;
        let req = test::TestRequest::get().uri("/api/totals?state=48").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
