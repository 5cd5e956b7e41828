use serde::{Deserialize, Serialize};

/// Способ свёртки группы продаж
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Сумма цен
    Revenue,
    /// Количество продаж
    Count,
}

impl Metric {
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Revenue => "Receita",
            Metric::Count => "Quantidade de vendas",
        }
    }
}
