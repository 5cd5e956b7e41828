use axum::{extract::Query, http::StatusCode, Json};
use contracts::dashboards::d402_sales_overview::{
    FilterOptionsRequest, FilterOptionsResponse, SalesOverviewRequest, SalesOverviewResponse,
};
use contracts::enums::region::Region;

use crate::dashboards::d402_sales_overview::service;
use crate::usecases::u508_fetch_sales::{get_sales_api, SalesApiError};

/// Ошибки внешнего API отдаём как 502, остальное как 500
fn error_status(e: &anyhow::Error) -> StatusCode {
    if e.downcast_ref::<SalesApiError>().is_some() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// GET /api/d402/sales_overview?region=sudeste&year=2022&sellers=Ana,Bruno&top_n=5
pub async fn get_sales_overview(
    Query(request): Query<SalesOverviewRequest>,
) -> Result<Json<SalesOverviewResponse>, StatusCode> {
    let filters = request.into_filters().map_err(|e| {
        tracing::warn!("D402 Dashboard: invalid filters: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    tracing::info!(
        "D402 Dashboard: region={} year={:?} sellers={} top_n={}",
        filters.region,
        filters.year,
        filters.sellers.len(),
        filters.top_n
    );

    let source = get_sales_api().map_err(|e| {
        tracing::error!("D402 Dashboard: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match service::get_sales_overview(source, filters).await {
        Ok(response) => {
            tracing::info!(
                "D402 Dashboard: {} sales, {} states, {} months",
                response.metrics.total_count,
                response.revenue.by_location.len(),
                response.revenue.by_month.len()
            );
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("D402 Dashboard: Failed to build sales overview: {}", e);
            Err(error_status(&e))
        }
    }
}

/// GET /api/d402/filters?region=sudeste&year=2022
pub async fn get_filter_options(
    Query(request): Query<FilterOptionsRequest>,
) -> Result<Json<FilterOptionsResponse>, StatusCode> {
    let region_code = request.region.unwrap_or_default();
    let region = Region::from_code(&region_code).ok_or_else(|| {
        tracing::warn!("D402 Dashboard: unknown region '{}'", region_code);
        StatusCode::BAD_REQUEST
    })?;

    // Та же проверка года, что и для самого дашборда
    SalesOverviewRequest {
        year: request.year,
        ..Default::default()
    }
    .into_filters()
    .map_err(|e| {
        tracing::warn!("D402 Dashboard: invalid filters: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let source = get_sales_api().map_err(|e| {
        tracing::error!("D402 Dashboard: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match service::get_filter_options(source, region, request.year).await {
        Ok(options) => Ok(Json(options)),
        Err(e) => {
            tracing::error!("D402 Dashboard: Failed to get filter options: {}", e);
            Err(error_status(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn test_error_status() {
        let upstream: anyhow::Error = SalesApiError::Network("timeout".to_string()).into();
        assert_eq!(error_status(&upstream), StatusCode::BAD_GATEWAY);

        let other = anyhow::anyhow!("something else");
        assert_eq!(error_status(&other), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_empty_query_values_mean_no_filter() {
        let uri: Uri = "/api/d402/filters?region=&year=".parse().unwrap();
        let Query(request) = Query::<FilterOptionsRequest>::try_from_uri(&uri).unwrap();
        assert_eq!(request.region.as_deref(), Some(""));
        assert_eq!(request.year, None);

        let uri: Uri = "/api/d402/sales_overview?region=&year=&sellers=&top_n="
            .parse()
            .unwrap();
        let Query(request) = Query::<SalesOverviewRequest>::try_from_uri(&uri).unwrap();
        let filters = request.into_filters().unwrap();
        assert_eq!(filters.region, Region::Brasil);
        assert_eq!(filters.year, None);
        assert!(filters.sellers.is_empty());
        assert_eq!(filters.top_n, 5);
    }

    #[test]
    fn test_query_values_are_parsed() {
        let uri: Uri = "/api/d402/sales_overview?region=sudeste&year=2022&sellers=Ana,Bruno&top_n=3"
            .parse()
            .unwrap();
        let Query(request) = Query::<SalesOverviewRequest>::try_from_uri(&uri).unwrap();
        let filters = request.into_filters().unwrap();
        assert_eq!(filters.region, Region::Sudeste);
        assert_eq!(filters.year, Some(2022));
        assert_eq!(filters.sellers, vec!["Ana".to_string(), "Bruno".to_string()]);
        assert_eq!(filters.top_n, 3);

        let uri: Uri = "/api/d402/filters?year=abc".parse().unwrap();
        assert!(Query::<FilterOptionsRequest>::try_from_uri(&uri).is_err());
    }
}
