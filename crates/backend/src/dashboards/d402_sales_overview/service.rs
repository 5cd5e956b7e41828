use anyhow::Result;
use contracts::dashboards::d402_sales_overview::{
    FilterOptionsResponse, MetricTab, OverviewMetrics, RegionOption, SalesFilters,
    SalesOverviewResponse, SellersTab, TOP_LOCATIONS, TOP_N_DEFAULT, TOP_N_MAX, TOP_N_MIN,
    YEAR_MAX, YEAR_MIN,
};
use contracts::domain::a025_sale::aggregate::SaleRecord;
use contracts::enums::metric::Metric;
use contracts::enums::region::Region;

use super::aggregator;
use crate::shared::format::format_magnitude;
use crate::usecases::u508_fetch_sales::SalesSource;

/// Загрузить продажи по фильтрам и собрать все таблицы дашборда
pub async fn get_sales_overview(
    source: &dyn SalesSource,
    filters: SalesFilters,
) -> Result<SalesOverviewResponse> {
    let records = source.fetch(filters.region, filters.year).await?;
    tracing::debug!(
        "D402: fetched {} records for region={} year={:?}",
        records.len(),
        filters.region,
        filters.year
    );
    Ok(build_overview(filters, &records))
}

/// Опции боковой панели: регионы, годы и продавцы выбранного среза
pub async fn get_filter_options(
    source: &dyn SalesSource,
    region: Region,
    year: Option<i32>,
) -> Result<FilterOptionsResponse> {
    let records = source.fetch(region, year).await?;

    Ok(FilterOptionsResponse {
        regions: Region::all()
            .into_iter()
            .map(|r| RegionOption {
                code: r.query_value(),
                name: r.display_name().to_string(),
            })
            .collect(),
        year_min: YEAR_MIN,
        year_max: YEAR_MAX,
        top_n_min: TOP_N_MIN,
        top_n_max: TOP_N_MAX,
        top_n_default: TOP_N_DEFAULT,
        sellers: aggregator::distinct_sellers(&records),
    })
}

/// Оставить продажи выбранных продавцов; пустой список = без фильтра
pub fn apply_seller_filter(records: &[SaleRecord], sellers: &[String]) -> Vec<SaleRecord> {
    if sellers.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| sellers.iter().any(|s| s == &r.seller))
        .cloned()
        .collect()
}

/// Построить ответ дашборда из уже загруженных продаж (без I/O)
pub fn build_overview(filters: SalesFilters, records: &[SaleRecord]) -> SalesOverviewResponse {
    let available_sellers = aggregator::distinct_sellers(records);
    let selected = apply_seller_filter(records, &filters.sellers);

    let total_revenue = aggregator::total_revenue(&selected);
    let total_count = aggregator::total_count(&selected);
    let metrics = OverviewMetrics {
        total_revenue,
        total_count,
        revenue_display: format_magnitude(total_revenue, "R$"),
        count_display: format_magnitude(total_count as f64, ""),
    };

    let sellers = aggregator::aggregate_by_seller(&selected);
    let sellers_tab = SellersTab {
        top_n: filters.top_n,
        top_by_revenue: aggregator::rank_sellers(&sellers, Metric::Revenue, filters.top_n),
        top_by_count: aggregator::rank_sellers(&sellers, Metric::Count, filters.top_n),
    };

    SalesOverviewResponse {
        metrics,
        revenue: build_metric_tab(&selected, Metric::Revenue),
        sales_count: build_metric_tab(&selected, Metric::Count),
        sellers: sellers_tab,
        available_sellers,
        filters,
    }
}

fn build_metric_tab(records: &[SaleRecord], metric: Metric) -> MetricTab {
    let by_location = aggregator::aggregate_by_location(records, metric);
    MetricTab {
        label: metric.display_name().to_string(),
        top_locations: aggregator::top_rows(&by_location, TOP_LOCATIONS),
        by_location,
        by_month: aggregator::aggregate_by_month(records, metric),
        by_category: aggregator::aggregate_by_category(records, metric),
    }
}
