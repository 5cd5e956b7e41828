use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::domain::a025_sale::aggregate::SaleRecord;
use contracts::enums::region::Region;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::SalesSource;
use crate::shared::config::SalesApiConfig;

static SALES_API: OnceCell<SalesApiClient> = OnceCell::new();

/// Ошибки загрузки продаж из внешнего API
#[derive(Debug, Error)]
pub enum SalesApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed payload: {0}")]
    Decode(String),

    #[error("Invalid record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },
}

/// Строка ответа API как она приходит по сети
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSaleRow {
    #[serde(rename = "Data da Compra")]
    pub purchase_date: String,
    #[serde(rename = "Preço")]
    pub price: f64,
    #[serde(rename = "Produto")]
    pub product_name: String,
    #[serde(rename = "Categoria do Produto")]
    pub category: String,
    #[serde(rename = "Vendedor")]
    pub seller: String,
    #[serde(rename = "Local da compra")]
    pub location: String,
    pub lat: f64,
    pub lon: f64,
}

impl RawSaleRow {
    /// Проверить строку и превратить её в `SaleRecord`
    pub fn into_record(self, index: usize) -> Result<SaleRecord, SalesApiError> {
        let invalid = |reason: String| SalesApiError::InvalidRecord { index, reason };

        let purchase_date = NaiveDate::parse_from_str(self.purchase_date.trim(), "%d/%m/%Y")
            .map_err(|e| invalid(format!("bad date '{}': {}", self.purchase_date, e)))?;

        if !self.price.is_finite() || self.price < 0.0 {
            return Err(invalid(format!("bad price {}", self.price)));
        }
        if !self.lat.is_finite() || !self.lon.is_finite() {
            return Err(invalid(format!("bad coordinates ({}, {})", self.lat, self.lon)));
        }
        if self.location.trim().is_empty() {
            return Err(invalid("empty location".to_string()));
        }

        Ok(SaleRecord {
            purchase_date,
            price: self.price,
            product_name: self.product_name,
            category: self.category,
            seller: self.seller,
            location: self.location,
            lat: self.lat,
            lon: self.lon,
        })
    }
}

/// Разобрать JSON-массив продаж целиком; первая же битая строка - ошибка
pub fn parse_sales_payload(body: &str) -> Result<Vec<SaleRecord>, SalesApiError> {
    let rows: Vec<RawSaleRow> =
        serde_json::from_str(body).map_err(|e| SalesApiError::Decode(e.to_string()))?;

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| row.into_record(index))
        .collect()
}

/// HTTP-клиент внешнего API продаж
pub struct SalesApiClient {
    client: reqwest::Client,
    url: String,
    region_param: String,
    year_param: String,
}

impl SalesApiClient {
    pub fn new(config: &SalesApiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            region_param: config.region_param.clone(),
            year_param: config.year_param.clone(),
        })
    }

    /// Query-параметры запроса; пустые значения означают "без фильтра"
    fn query_params(&self, region: Region, year: Option<i32>) -> [(String, String); 2] {
        [
            (self.region_param.clone(), region.query_value()),
            (
                self.year_param.clone(),
                year.map(|y| y.to_string()).unwrap_or_default(),
            ),
        ]
    }

    /// Загрузить продажи за регион и год
    pub async fn fetch_sales(
        &self,
        region: Region,
        year: Option<i32>,
    ) -> Result<Vec<SaleRecord>, SalesApiError> {
        let params = self.query_params(region, year);
        tracing::info!(
            "Sales API: GET {} ({}='{}', {}='{}')",
            self.url,
            params[0].0,
            params[0].1,
            params[1].0,
            params[1].1
        );

        let response = self
            .client
            .get(&self.url)
            .query(&params)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SalesApiError::Network(format!("{}: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Sales API responded {} for {}", status, self.url);
            return Err(SalesApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SalesApiError::Network(format!("{}: {}", self.url, e)))?;

        let records = parse_sales_payload(&body)?;
        tracing::info!("Sales API: got {} records", records.len());
        Ok(records)
    }
}

#[async_trait]
impl SalesSource for SalesApiClient {
    async fn fetch(
        &self,
        region: Region,
        year: Option<i32>,
    ) -> Result<Vec<SaleRecord>, SalesApiError> {
        self.fetch_sales(region, year).await
    }
}

/// Создать глобальный клиент по конфигурации (один раз при старте)
pub fn initialize_sales_api(config: &SalesApiConfig) -> anyhow::Result<()> {
    let client = SalesApiClient::new(config)?;
    SALES_API
        .set(client)
        .map_err(|_| anyhow::anyhow!("Sales API client already initialized"))?;
    tracing::info!("Sales API client initialized for {}", config.url);
    Ok(())
}

pub fn get_sales_api() -> anyhow::Result<&'static SalesApiClient> {
    SALES_API
        .get()
        .ok_or_else(|| anyhow::anyhow!("Sales API client is not initialized"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"[
        {
            "Produto": "Modelagem preditiva",
            "Categoria do Produto": "livros",
            "Preço": 92.45,
            "Frete": 5.6096965236,
            "Data da Compra": "01/01/2020",
            "Vendedor": "Thiago Silva",
            "Local da compra": "BA",
            "Avaliação da compra": 1,
            "Tipo de pagamento": "cartao_credito",
            "Quantidade de parcelas": 3,
            "lat": -13.29,
            "lon": -41.71
        },
        {
            "Produto": "Iphone 6",
            "Categoria do Produto": "eletronicos",
            "Preço": 1550.0,
            "Data da Compra": "15/12/2022",
            "Vendedor": "Mariana Ferreira",
            "Local da compra": "SP",
            "lat": -22.19,
            "lon": -48.79
        }
    ]"#;

    fn test_config() -> SalesApiConfig {
        SalesApiConfig {
            url: "http://localhost:9/produtos".to_string(),
            timeout_secs: 5,
            region_param: "regiao".to_string(),
            year_param: "ano".to_string(),
        }
    }

    #[test]
    fn test_parse_payload_ignores_extra_fields() {
        let records = parse_sales_payload(PAYLOAD).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].purchase_date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(records[0].seller, "Thiago Silva");
        assert_eq!(records[1].location, "SP");
        assert_eq!(records[1].purchase_date, NaiveDate::from_ymd_opt(2022, 12, 15).unwrap());
        assert_eq!(records[1].price, 1550.0);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_sales_payload("[]").unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = parse_sales_payload(r#"{"error": "oops"}"#).unwrap_err();
        assert!(matches!(err, SalesApiError::Decode(_)));
    }

    #[test]
    fn test_bad_date_reports_row_index() {
        let payload = PAYLOAD.replace("15/12/2022", "2022-12-15");
        let err = parse_sales_payload(&payload).unwrap_err();
        assert!(matches!(err, SalesApiError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn test_negative_price_rejected() {
        let payload = PAYLOAD.replace("1550.0", "-1.0");
        let err = parse_sales_payload(&payload).unwrap_err();
        assert!(matches!(err, SalesApiError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn test_query_params_use_configured_names() {
        let client = SalesApiClient::new(&test_config()).unwrap();

        let params = client.query_params(Region::Brasil, None);
        assert_eq!(params[0], ("regiao".to_string(), String::new()));
        assert_eq!(params[1], ("ano".to_string(), String::new()));

        let params = client.query_params(Region::CentroOeste, Some(2021));
        assert_eq!(params[0].1, "centro-oeste");
        assert_eq!(params[1].1, "2021");
    }
}
