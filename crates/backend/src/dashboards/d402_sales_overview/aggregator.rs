use chrono::{Datelike, Month};
use contracts::dashboards::d402_sales_overview::{CategoryRow, LocationRow, MonthRow, SellerRow};
use contracts::domain::a025_sale::aggregate::SaleRecord;
use contracts::enums::metric::Metric;
use std::collections::{BTreeMap, HashMap};

/// Вклад одной продажи в метрику
fn metric_value(record: &SaleRecord, metric: Metric) -> f64 {
    match metric {
        Metric::Revenue => record.price,
        Metric::Count => 1.0,
    }
}

/// Группировка с сохранением порядка первого появления ключа
struct OrderedGroups<'a, V> {
    index: HashMap<&'a str, usize>,
    groups: Vec<(&'a str, V)>,
}

impl<'a, V> OrderedGroups<'a, V> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            groups: Vec::new(),
        }
    }

    /// Вернуть значение группы, создав его через `init` при первом появлении ключа
    fn entry(&mut self, key: &'a str, init: impl FnOnce() -> V) -> &mut V {
        let pos = match self.index.get(key) {
            Some(&pos) => pos,
            None => {
                self.groups.push((key, init()));
                self.index.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[pos].1
    }

    fn into_vec(self) -> Vec<(&'a str, V)> {
        self.groups
    }
}

/// Выручка или количество продаж по штатам, по убыванию.
///
/// Координаты берутся у первой продажи штата. Равные значения сохраняют
/// порядок первого появления штата.
pub fn aggregate_by_location(records: &[SaleRecord], metric: Metric) -> Vec<LocationRow> {
    let mut groups: OrderedGroups<'_, (f64, f64, f64)> = OrderedGroups::new();
    for record in records {
        let (_, _, total) = groups.entry(&record.location, || (record.lat, record.lon, 0.0));
        *total += metric_value(record, metric);
    }

    let mut rows: Vec<LocationRow> = groups
        .into_vec()
        .into_iter()
        .map(|(location, (lat, lon, total))| LocationRow {
            location: location.to_string(),
            lat,
            lon,
            total,
        })
        .collect();
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    rows
}

/// Помесячная свёртка в хронологическом порядке; только месяцы, где были продажи
pub fn aggregate_by_month(records: &[SaleRecord], metric: Metric) -> Vec<MonthRow> {
    let mut buckets: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for record in records {
        let key = (record.purchase_date.year(), record.purchase_date.month());
        *buckets.entry(key).or_insert(0.0) += metric_value(record, metric);
    }

    buckets
        .into_iter()
        .map(|((year, month), total)| MonthRow {
            year,
            month,
            month_name: month_name(month),
            total,
        })
        .collect()
}

fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}

/// Свёртка по категориям товара, по убыванию
pub fn aggregate_by_category(records: &[SaleRecord], metric: Metric) -> Vec<CategoryRow> {
    let mut groups: OrderedGroups<'_, f64> = OrderedGroups::new();
    for record in records {
        *groups.entry(&record.category, || 0.0) += metric_value(record, metric);
    }

    let mut rows: Vec<CategoryRow> = groups
        .into_vec()
        .into_iter()
        .map(|(category, total)| CategoryRow {
            category: category.to_string(),
            total,
        })
        .collect();
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    rows
}

/// Сумма и количество продаж по продавцам, в порядке первого появления
pub fn aggregate_by_seller(records: &[SaleRecord]) -> Vec<SellerRow> {
    let mut groups: OrderedGroups<'_, (f64, u64)> = OrderedGroups::new();
    for record in records {
        let (sum, count) = groups.entry(&record.seller, || (0.0, 0));
        *sum += record.price;
        *count += 1;
    }

    groups
        .into_vec()
        .into_iter()
        .map(|(seller, (revenue_sum, sale_count))| SellerRow {
            seller: seller.to_string(),
            revenue_sum,
            sale_count,
        })
        .collect()
}

/// Сумма через fold от +0.0: `sum()` пустого итератора f64 даёт -0.0
pub fn total_revenue(records: &[SaleRecord]) -> f64 {
    records.iter().fold(0.0, |acc, r| acc + r.price)
}

pub fn total_count(records: &[SaleRecord]) -> u64 {
    records.len() as u64
}

/// Первые `n` строк уже отсортированной таблицы
pub fn top_rows<T: Clone>(rows: &[T], n: usize) -> Vec<T> {
    rows.iter().take(n).cloned().collect()
}

/// Топ-`n` продавцов по выручке или по количеству продаж.
/// Равные значения сохраняют исходный порядок.
pub fn rank_sellers(rows: &[SellerRow], metric: Metric, n: usize) -> Vec<SellerRow> {
    let mut ranked = rows.to_vec();
    match metric {
        Metric::Revenue => ranked.sort_by(|a, b| b.revenue_sum.total_cmp(&a.revenue_sum)),
        Metric::Count => ranked.sort_by(|a, b| b.sale_count.cmp(&a.sale_count)),
    }
    ranked.truncate(n);
    ranked
}

/// Продавцы выборки в порядке первого появления
pub fn distinct_sellers(records: &[SaleRecord]) -> Vec<String> {
    let mut groups: OrderedGroups<'_, ()> = OrderedGroups::new();
    for record in records {
        groups.entry(&record.seller, || ());
    }
    groups
        .into_vec()
        .into_iter()
        .map(|(seller, _)| seller.to_string())
        .collect()
}
