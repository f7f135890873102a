use crate::rules::threshold::{CompareOp, ThresholdChecker, ThresholdRule};
use coopwatch_common::types::{AMMONIA, HUMIDITY, TEMPERATURE};
use serde::{Deserialize, Serialize};

pub const CHECKER_NAME: &str = "environment";

/// Bounds for the environment checker. All comparisons are strict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentThresholds {
    #[serde(default = "default_temperature_high")]
    pub temperature_high: f64,
    #[serde(default = "default_temperature_low")]
    pub temperature_low: f64,
    #[serde(default = "default_humidity_high")]
    pub humidity_high: f64,
    #[serde(default = "default_humidity_low")]
    pub humidity_low: f64,
    #[serde(default = "default_ammonia_high")]
    pub ammonia_high: f64,
}

fn default_temperature_high() -> f64 {
    35.0
}

fn default_temperature_low() -> f64 {
    20.0
}

fn default_humidity_high() -> f64 {
    70.0
}

fn default_humidity_low() -> f64 {
    50.0
}

fn default_ammonia_high() -> f64 {
    25.0
}

impl Default for EnvironmentThresholds {
    fn default() -> Self {
        Self {
            temperature_high: default_temperature_high(),
            temperature_low: default_temperature_low(),
            humidity_high: default_humidity_high(),
            humidity_low: default_humidity_low(),
            ammonia_high: default_ammonia_high(),
        }
    }
}

pub fn environment_checker(thresholds: &EnvironmentThresholds) -> ThresholdChecker {
    ThresholdChecker::new(
        CHECKER_NAME,
        vec![
            ThresholdRule::new(
                TEMPERATURE,
                CompareOp::GreaterThan,
                thresholds.temperature_high,
                "High Temperature Alert: {{value}}°C",
            ),
            ThresholdRule::new(
                TEMPERATURE,
                CompareOp::LessThan,
                thresholds.temperature_low,
                "Low Temperature Alert: {{value}}°C",
            ),
            ThresholdRule::new(
                HUMIDITY,
                CompareOp::GreaterThan,
                thresholds.humidity_high,
                "High Humidity Alert: {{value}}%",
            ),
            ThresholdRule::new(
                HUMIDITY,
                CompareOp::LessThan,
                thresholds.humidity_low,
                "Low Humidity Alert: {{value}}%",
            ),
            ThresholdRule::new(
                AMMONIA,
                CompareOp::GreaterThan,
                thresholds.ammonia_high,
                "High Ammonia Alert: {{value}} ppm",
            ),
        ],
    )
}
