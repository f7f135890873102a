use crate::rules::threshold::{CompareOp, ThresholdChecker, ThresholdRule};
use coopwatch_common::types::{FOOD_LEVEL, WATER_LEVEL};
use serde::{Deserialize, Serialize};

pub const CHECKER_NAME: &str = "supply";

/// Supply level bounds, in percent. A level of exactly zero is "empty";
/// anything strictly between zero and `low_level` is "low".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyThresholds {
    #[serde(default = "default_low_level")]
    pub low_level: f64,
}

fn default_low_level() -> f64 {
    20.0
}

impl Default for SupplyThresholds {
    fn default() -> Self {
        Self {
            low_level: default_low_level(),
        }
    }
}

pub fn supply_checker(thresholds: &SupplyThresholds) -> ThresholdChecker {
    ThresholdChecker::new(
        CHECKER_NAME,
        vec![
            ThresholdRule::new(
                WATER_LEVEL,
                CompareOp::Equal,
                0.0,
                "Water is empty. Refill immediately!",
            ),
            ThresholdRule::new(
                WATER_LEVEL,
                CompareOp::LessThan,
                thresholds.low_level,
                "Water level is low. Consider refilling soon.",
            )
            .with_floor(0.0),
            ThresholdRule::new(
                FOOD_LEVEL,
                CompareOp::Equal,
                0.0,
                "Food is empty. Refill immediately!",
            ),
            ThresholdRule::new(
                FOOD_LEVEL,
                CompareOp::LessThan,
                thresholds.low_level,
                "Food level is low. Consider refilling soon.",
            )
            .with_floor(0.0),
        ],
    )
}
