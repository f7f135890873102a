use anyhow::{Context, Result};
use coopwatch_common::types::{
    ReadingValue, Readings, AMMONIA, EXHAUST_FAN, FOOD_LEVEL, HUMIDITY, LIGHT_1, LIGHT_2,
    TEMPERATURE, WATER_LEVEL,
};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Source of the current readings snapshot.
#[async_trait::async_trait]
pub trait ReadingsProvider: Send + Sync {
    /// Provider name used in logs (e.g., "http").
    fn name(&self) -> &str;

    /// Fetches one snapshot. An error ends the current cycle.
    async fn fetch(&self) -> Result<Readings>;
}

/// Dashboard JSON keys and the reading names they map to.
pub const FIELD_MAP: &[(&str, &str)] = &[
    ("Temp", TEMPERATURE),
    ("Hum", HUMIDITY),
    ("Amm", AMMONIA),
    ("Water_Level", WATER_LEVEL),
    ("Food_Level", FOOD_LEVEL),
    ("Light1", LIGHT_1),
    ("Light2", LIGHT_2),
    ("ExhaustFan", EXHAUST_FAN),
];

/// Polls the dashboard's `/data` endpoint.
pub struct HttpReadingsProvider {
    url: String,
    client: Client,
}

impl HttpReadingsProvider {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build readings HTTP client")?;
        Ok(Self {
            url: url.trim().to_string(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Maps a dashboard payload onto named readings. Unknown keys are ignored,
/// null and non-scalar values are treated as absent.
pub fn readings_from_json(payload: &Value) -> Readings {
    let mut readings = Readings::new();
    for (field, name) in FIELD_MAP {
        let value = match payload.get(*field) {
            Some(Value::Number(n)) => n.as_f64().map(ReadingValue::Number),
            Some(Value::String(s)) => Some(ReadingValue::Text(s.clone())),
            Some(Value::Bool(b)) => Some(ReadingValue::Text(b.to_string())),
            _ => None,
        };
        if let Some(value) = value {
            readings.insert(*name, value);
        }
    }
    readings
}

#[async_trait::async_trait]
impl ReadingsProvider for HttpReadingsProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self) -> Result<Readings> {
        let response = self
            .client
            .get(self.url.as_str())
            .send()
            .await
            .context("Failed to request readings")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read readings body")?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Readings endpoint error: status={}, body={}",
                status,
                body
            ));
        }

        let payload: Value =
            serde_json::from_str(&body).context("Failed to parse readings as JSON")?;
        if !payload.is_object() {
            anyhow::bail!("Readings payload is not a JSON object");
        }
        Ok(readings_from_json(&payload))
    }
}
