use crate::domain::dashboard::ReportSettings;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub reports: ReportSettings,
    #[serde(default)]
    pub descriptors: Vec<DescriptorOverride>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetSettings {
    pub path: String,
    #[serde(default)]
    pub columns: ColumnMapping,
}

/// Source column names for the four event fields.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ColumnMapping {
    pub vehicle_id: String,
    pub error_code: String,
    pub timestamp: String,
    pub duration_minutes: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            vehicle_id: "Car Number".to_string(),
            error_code: "Troubleshooting Code".to_string(),
            timestamp: "Date".to_string(),
            duration_minutes: "Time (min)".to_string(),
        }
    }
}

impl ColumnMapping {
    pub fn header(&self) -> [&str; 4] {
        [
            self.vehicle_id.as_str(),
            self.error_code.as_str(),
            self.timestamp.as_str(),
            self.duration_minutes.as_str(),
        ]
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DescriptorOverride {
    pub code: String,
    pub description: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

/// Load `config/dashboard.*`, overridden by `DASHBOARD__SECTION__KEY` variables.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
