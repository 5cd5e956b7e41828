use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Одна продажа, уже провалидированная на границе загрузки
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub purchase_date: NaiveDate,
    /// Неотрицательная сумма продажи
    pub price: f64,
    pub product_name: String,
    pub category: String,
    pub seller: String,
    /// Место покупки (штат)
    pub location: String,
    pub lat: f64,
    pub lon: f64,
}

impl SaleRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        purchase_date: NaiveDate,
        price: f64,
        product_name: impl Into<String>,
        category: impl Into<String>,
        seller: impl Into<String>,
        location: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            purchase_date,
            price,
            product_name: product_name.into(),
            category: category.into(),
            seller: seller.into(),
            location: location.into(),
            lat,
            lon,
        }
    }
}
