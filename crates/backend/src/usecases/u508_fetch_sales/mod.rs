pub mod sales_api_client;

use async_trait::async_trait;
use contracts::domain::a025_sale::aggregate::SaleRecord;
use contracts::enums::region::Region;

pub use sales_api_client::{get_sales_api, initialize_sales_api, SalesApiError};

/// Источник продаж для дашборда: по сети или подставной в тестах
#[async_trait]
pub trait SalesSource: Send + Sync {
    /// Продажи за регион и год (`None` = весь период)
    async fn fetch(
        &self,
        region: Region,
        year: Option<i32>,
    ) -> Result<Vec<SaleRecord>, SalesApiError>;
}
