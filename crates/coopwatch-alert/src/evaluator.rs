use crate::rules::device_status::{DeviceBinding, DeviceStatusChecker};
use crate::rules::environment::{environment_checker, EnvironmentThresholds};
use crate::rules::supply::{supply_checker, SupplyThresholds};
use crate::Checker;
use coopwatch_common::types::ReadingSource;

/// Runs an ordered set of checkers over one readings snapshot.
pub struct Evaluator {
    checkers: Vec<Box<dyn Checker>>,
}

impl Evaluator {
    pub fn new(checkers: Vec<Box<dyn Checker>>) -> Self {
        Self { checkers }
    }

    /// Environment, supply and device-status checkers, in that order.
    pub fn standard(
        environment: &EnvironmentThresholds,
        supply: &SupplyThresholds,
        devices: Vec<DeviceBinding>,
    ) -> Self {
        Self::new(vec![
            Box::new(environment_checker(environment)),
            Box::new(supply_checker(supply)),
            Box::new(DeviceStatusChecker::new(devices)),
        ])
    }

    pub fn checkers(&self) -> &[Box<dyn Checker>] {
        &self.checkers
    }

    /// Messages of all checkers, concatenated in checker order.
    pub fn evaluate(&self, readings: &dyn ReadingSource) -> Vec<String> {
        let mut messages = Vec::new();
        for checker in &self.checkers {
            let produced = checker.evaluate(readings);
            tracing::debug!(
                checker = checker.name(),
                count = produced.len(),
                "Checker evaluated"
            );
            messages.extend(produced);
        }
        messages
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::standard(
            &EnvironmentThresholds::default(),
            &SupplyThresholds::default(),
            crate::rules::device_status::default_devices(),
        )
    }
}
