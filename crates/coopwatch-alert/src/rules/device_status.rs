use crate::Checker;
use coopwatch_common::types::{ReadingSource, EXHAUST_FAN, LIGHT_1, LIGHT_2};
use serde::{Deserialize, Serialize};

pub const CHECKER_NAME: &str = "device_status";

/// Maps a switch reading to the device label used in messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceBinding {
    pub reading: String,
    pub label: String,
}

impl DeviceBinding {
    pub fn new(reading: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            reading: reading.into(),
            label: label.into(),
        }
    }
}

pub fn default_devices() -> Vec<DeviceBinding> {
    vec![
        DeviceBinding::new(LIGHT_1, "Light 1"),
        DeviceBinding::new(LIGHT_2, "Light 2"),
        DeviceBinding::new(EXHAUST_FAN, "Exhaust Fan"),
    ]
}

/// Reports the ON/OFF state of each bound device.
pub struct DeviceStatusChecker {
    devices: Vec<DeviceBinding>,
}

impl DeviceStatusChecker {
    pub fn new(devices: Vec<DeviceBinding>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &[DeviceBinding] {
        &self.devices
    }
}

impl Default for DeviceStatusChecker {
    fn default() -> Self {
        Self::new(default_devices())
    }
}

impl Checker for DeviceStatusChecker {
    fn name(&self) -> &str {
        CHECKER_NAME
    }

    fn evaluate(&self, readings: &dyn ReadingSource) -> Vec<String> {
        let mut messages = Vec::new();
        for device in &self.devices {
            let Some(raw) = readings.reading(&device.reading) else {
                tracing::warn!(device = %device.label, reading = %device.reading, "Device status missing");
                continue;
            };
            match raw.as_switch() {
                Some(state) => messages.push(format!("{} is turned {}.", device.label, state)),
                None => tracing::warn!(
                    device = %device.label,
                    raw = %raw,
                    "Unrecognized device status, skipped"
                ),
            }
        }
        messages
    }
}
