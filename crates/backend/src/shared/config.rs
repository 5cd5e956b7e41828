use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub sales_api: SalesApiConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Настройки внешнего API продаж
#[derive(Debug, Deserialize, Clone)]
pub struct SalesApiConfig {
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Имя query-параметра региона
    #[serde(default = "default_region_param")]
    pub region_param: String,
    /// Имя query-параметра года
    #[serde(default = "default_year_param")]
    pub year_param: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_region_param() -> String {
    "regiao".to_string()
}

fn default_year_param() -> String {
    "ano".to_string()
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
port = 3000

[sales_api]
url = "https://labdados.com/produtos"
timeout_secs = 30
region_param = "regiao"
year_param = "ano"
"#;

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                return parse_config(&contents);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    parse_config(DEFAULT_CONFIG)
}

fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(contents)?;
    if config.sales_api.url.trim().is_empty() {
        return Err(anyhow::anyhow!("sales_api.url must not be empty"));
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sales_api.url, "https://labdados.com/produtos");
        assert_eq!(config.sales_api.region_param, "regiao");
        assert_eq!(config.sales_api.year_param, "ano");
    }

    #[test]
    fn test_optional_fields_fall_back() {
        let config = parse_config(
            r#"
            [server]
            port = 8080

            [sales_api]
            url = "http://localhost:9000/sales"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.sales_api.timeout_secs, 30);
        assert_eq!(config.sales_api.region_param, "regiao");
    }

    #[test]
    fn test_empty_url_rejected() {
        let result = parse_config(
            r#"
            [server]
            port = 3000

            [sales_api]
            url = "  "
            "#,
        );
        assert!(result.is_err());
    }
}
