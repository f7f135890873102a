use coopwatch_alert::rules::device_status::{default_devices, DeviceBinding};
use coopwatch_alert::rules::environment::EnvironmentThresholds;
use coopwatch_alert::rules::supply::SupplyThresholds;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// Dashboard JSON endpoint polled each cycle
    pub readings_url: String,
    /// Remote receiver of the full alert log; dispatch is disabled when unset
    pub sink_url: Option<String>,
    #[serde(default = "default_check_interval_ms")]
    pub check_interval_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_store_path")]
    pub store_path: String,
    #[serde(default = "default_summary_limit")]
    pub summary_limit: usize,
    /// Control API listener; disabled when unset
    pub http_port: Option<u16>,
    #[serde(default)]
    pub environment: EnvironmentThresholds,
    #[serde(default)]
    pub supply: SupplyThresholds,
    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceBinding>,
}

fn default_check_interval_ms() -> u64 {
    60_000
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_store_path() -> String {
    "data/notifications.db".to_string()
}

fn default_summary_limit() -> usize {
    3
}

impl AgentConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.readings_url.trim().is_empty() {
            anyhow::bail!("readings_url must not be empty");
        }
        if self.check_interval_ms == 0 {
            anyhow::bail!("check_interval_ms must be greater than 0");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }
        if self.store_path.trim().is_empty() {
            anyhow::bail!("store_path must not be empty");
        }
        if let Some(url) = &self.sink_url {
            if url.trim().is_empty() {
                anyhow::bail!("sink_url must not be empty when set");
            }
        }
        let env = &self.environment;
        if env.temperature_low >= env.temperature_high {
            anyhow::bail!(
                "environment.temperature_low ({}) must be below temperature_high ({})",
                env.temperature_low,
                env.temperature_high
            );
        }
        if env.humidity_low >= env.humidity_high {
            anyhow::bail!(
                "environment.humidity_low ({}) must be below humidity_high ({})",
                env.humidity_low,
                env.humidity_high
            );
        }
        for device in &self.devices {
            if device.reading.trim().is_empty() || device.label.trim().is_empty() {
                anyhow::bail!("devices entries need a reading and a label");
            }
        }
        Ok(())
    }
}
