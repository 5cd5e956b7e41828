use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::enums::region::Region;

/// Первый год, доступный в слайдере
pub const YEAR_MIN: i32 = 2020;
/// Последний год, доступный в слайдере
pub const YEAR_MAX: i32 = 2023;
/// Границы поля "Quantidade de vendedores"
pub const TOP_N_MIN: usize = 2;
pub const TOP_N_MAX: usize = 10;
pub const TOP_N_DEFAULT: usize = 5;
/// Сколько штатов показывается в столбчатой диаграмме "Top estados"
pub const TOP_LOCATIONS: usize = 5;

/// Query-параметры дашборда продаж
///
/// GET /api/d402/sales_overview?region=sudeste&year=2022&sellers=Ana,Bruno&top_n=5
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalesOverviewRequest {
    /// Название региона; пусто или отсутствует = вся страна
    #[serde(default)]
    pub region: Option<String>,
    /// Год; отсутствует или пусто = весь период
    #[serde(default, deserialize_with = "deserialize_empty_as_none")]
    pub year: Option<i32>,
    /// Продавцы через запятую; пусто = все
    #[serde(default)]
    pub sellers: Option<String>,
    #[serde(default, deserialize_with = "deserialize_empty_as_none")]
    pub top_n: Option<usize>,
}

/// Провалидированные фильтры дашборда
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesFilters {
    pub region: Region,
    pub year: Option<i32>,
    pub sellers: Vec<String>,
    pub top_n: usize,
}

impl Default for SalesFilters {
    fn default() -> Self {
        Self {
            region: Region::Brasil,
            year: None,
            sellers: Vec::new(),
            top_n: TOP_N_DEFAULT,
        }
    }
}

impl SalesOverviewRequest {
    /// Проверить параметры и собрать фильтры
    pub fn into_filters(self) -> Result<SalesFilters, String> {
        let region_code = self.region.unwrap_or_default();
        let region = Region::from_code(&region_code)
            .ok_or_else(|| format!("Unknown region: '{}'", region_code))?;

        if let Some(year) = self.year {
            if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
                return Err(format!(
                    "Year {} is out of range {}..={}",
                    year, YEAR_MIN, YEAR_MAX
                ));
            }
        }

        let top_n = self.top_n.unwrap_or(TOP_N_DEFAULT);
        if !(TOP_N_MIN..=TOP_N_MAX).contains(&top_n) {
            return Err(format!(
                "top_n {} is out of range {}..={}",
                top_n, TOP_N_MIN, TOP_N_MAX
            ));
        }

        let sellers = self
            .sellers
            .as_deref()
            .map(parse_seller_list)
            .unwrap_or_default();

        Ok(SalesFilters {
            region,
            year: self.year,
            sellers,
            top_n,
        })
    }
}

/// Десериализует число из query-строки; пустое значение (`year=`) даёт None
fn deserialize_empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    use serde::de;

    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<T>().map(Some).map_err(de::Error::custom),
    }
}

fn parse_seller_list(raw: &str) -> Vec<String> {
    let mut sellers: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !sellers.iter().any(|s| s == name) {
            sellers.push(name.to_string());
        }
    }
    sellers
}

/// Строка таблицы "по штатам" (карта и топ штатов)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRow {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub total: f64,
}

/// Строка помесячной таблицы (линия на графике, цвет = год)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    pub year: i32,
    /// Номер месяца 1..=12, нужен для сортировки оси на фронте
    pub month: u32,
    /// Полное название месяца ("January")
    pub month_name: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellerRow {
    pub seller: String,
    pub revenue_sum: f64,
    pub sale_count: u64,
}

/// Карточки метрик, общие для всех вкладок
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverviewMetrics {
    pub total_revenue: f64,
    pub total_count: u64,
    /// Например "R$ 1.50 thousand"
    pub revenue_display: String,
    pub count_display: String,
}

/// Вкладка с одной метрикой: "Receita" или "Quantidade de vendas"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricTab {
    /// Заголовок вкладки ("Receita", "Quantidade de vendas")
    pub label: String,
    pub by_location: Vec<LocationRow>,
    /// Первые `TOP_LOCATIONS` строк `by_location`
    pub top_locations: Vec<LocationRow>,
    pub by_month: Vec<MonthRow>,
    pub by_category: Vec<CategoryRow>,
}

/// Вкладка "Vendedores"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellersTab {
    pub top_n: usize,
    pub top_by_revenue: Vec<SellerRow>,
    pub top_by_count: Vec<SellerRow>,
}

/// Ответ дашборда продаж
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOverviewResponse {
    pub filters: SalesFilters,
    pub metrics: OverviewMetrics,
    pub revenue: MetricTab,
    pub sales_count: MetricTab,
    pub sellers: SellersTab,
    /// Продавцы выборки до фильтра по продавцам (опции мультиселекта)
    pub available_sellers: Vec<String>,
}

/// Query-параметры для списка опций фильтров
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptionsRequest {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "deserialize_empty_as_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOption {
    pub code: String,
    pub name: String,
}

/// Опции фильтров боковой панели
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterOptionsResponse {
    pub regions: Vec<RegionOption>,
    pub year_min: i32,
    pub year_max: i32,
    pub top_n_min: usize,
    pub top_n_max: usize,
    pub top_n_default: usize,
    pub sellers: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_request_gives_default_filters() {
        let filters = SalesOverviewRequest::default().into_filters().unwrap();
        assert_eq!(filters, SalesFilters::default());
    }

    #[test]
    fn test_year_and_top_n_bounds() {
        let request = SalesOverviewRequest {
            year: Some(2019),
            ..Default::default()
        };
        assert!(request.into_filters().is_err());

        let request = SalesOverviewRequest {
            year: Some(2023),
            top_n: Some(10),
            ..Default::default()
        };
        let filters = request.into_filters().unwrap();
        assert_eq!(filters.year, Some(2023));
        assert_eq!(filters.top_n, 10);

        let request = SalesOverviewRequest {
            top_n: Some(1),
            ..Default::default()
        };
        assert!(request.into_filters().is_err());
    }

    #[test]
    fn test_unknown_region_rejected() {
        let request = SalesOverviewRequest {
            region: Some("Atlantis".to_string()),
            ..Default::default()
        };
        assert!(request.into_filters().is_err());
    }

    #[test]
    fn test_seller_list_parsing() {
        let request = SalesOverviewRequest {
            sellers: Some(" Ana , Bruno,,Ana ".to_string()),
            ..Default::default()
        };
        let filters = request.into_filters().unwrap();
        assert_eq!(filters.sellers, vec!["Ana".to_string(), "Bruno".to_string()]);
    }
}
