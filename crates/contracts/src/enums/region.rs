use serde::{Deserialize, Serialize};

/// Регионы, доступные в фильтре дашборда
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    /// Вся страна, без фильтра
    #[default]
    Brasil,
    CentroOeste,
    Nordeste,
    Norte,
    Sudeste,
    Sul,
}

impl Region {
    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            Region::Brasil => "Brasil",
            Region::CentroOeste => "Centro-Oeste",
            Region::Nordeste => "Nordeste",
            Region::Norte => "Norte",
            Region::Sudeste => "Sudeste",
            Region::Sul => "Sul",
        }
    }

    /// Значение для query-параметра внешнего API.
    /// Пустая строка означает "все регионы".
    pub fn query_value(&self) -> String {
        match self {
            Region::Brasil => String::new(),
            other => other.display_name().to_lowercase(),
        }
    }

    /// Получить все регионы в порядке селектора
    pub fn all() -> Vec<Region> {
        vec![
            Region::Brasil,
            Region::CentroOeste,
            Region::Nordeste,
            Region::Norte,
            Region::Sudeste,
            Region::Sul,
        ]
    }

    /// Парсинг из строки: принимает название или значение query-параметра,
    /// регистр не важен. Пустая строка трактуется как `Brasil`.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() {
            return Some(Region::Brasil);
        }
        Self::all().into_iter().find(|region| {
            region.display_name().eq_ignore_ascii_case(code)
                || region.query_value().eq_ignore_ascii_case(code)
        })
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
