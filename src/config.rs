use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    pub rotation: String,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

/// Backing-store configuration: region, emulator toggle and the names
/// of the three resources (bucket / table / queue).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BackendConfig {
    #[serde(default = "default_region")]
    pub region: String,
    /// When true, all three collaborators run in-process.
    #[serde(default = "default_use_emulator")]
    pub use_emulator: bool,
    /// Live backend endpoint, e.g. "redis://127.0.0.1:6379".
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default = "default_bucket")]
    pub bucket_name: String,
    #[serde(default = "default_table")]
    pub table_name: String,
    #[serde(default = "default_queue")]
    pub queue_name: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_use_emulator() -> bool {
    true
}

fn default_bucket() -> String {
    "orders-receipts".to_string()
}

fn default_table() -> String {
    "Orders".to_string()
}

fn default_queue() -> String {
    "orders-events".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            use_emulator: default_use_emulator(),
            endpoint_url: None,
            bucket_name: default_bucket(),
            table_name: default_table(),
            queue_name: default_queue(),
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_defaults_match_resource_names() {
        let backend = BackendConfig::default();
        assert_eq!(backend.region, "us-east-1");
        assert!(backend.use_emulator);
        assert_eq!(backend.bucket_name, "orders-receipts");
        assert_eq!(backend.table_name, "Orders");
        assert_eq!(backend.queue_name, "orders-events");
    }

    #[test]
    fn test_minimal_yaml_fills_backend_defaults() {
        let yaml = r#"
log_level: info
log_dir: ./logs
log_file: gateway.log
use_json: false
rotation: daily
gateway:
  host: 127.0.0.1
  port: 8080
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.backend.table_name, "Orders");
        assert!(config.backend.endpoint_url.is_none());
    }
}
