use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const TEMPERATURE: &str = "temperature";
pub const HUMIDITY: &str = "humidity";
pub const AMMONIA: &str = "ammonia";
pub const WATER_LEVEL: &str = "water_level";
pub const FOOD_LEVEL: &str = "food_level";
pub const LIGHT_1: &str = "light1";
pub const LIGHT_2: &str = "light2";
pub const EXHAUST_FAN: &str = "exhaust_fan";

/// On/off state of a coop device (lights, exhaust fan).
///
/// # Examples
///
/// ```
/// use coopwatch_common::types::SwitchState;
///
/// let state: SwitchState = "ON".parse().unwrap();
/// assert_eq!(state, SwitchState::On);
/// assert_eq!(SwitchState::Off.to_string(), "OFF");
/// assert!("on".parse::<SwitchState>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwitchState {
    On,
    Off,
}

impl std::fmt::Display for SwitchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwitchState::On => write!(f, "ON"),
            SwitchState::Off => write!(f, "OFF"),
        }
    }
}

impl std::str::FromStr for SwitchState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ON" => Ok(SwitchState::On),
            "OFF" => Ok(SwitchState::Off),
            other => Err(format!("unknown switch state: {other}")),
        }
    }
}

/// A single sensor or device value as delivered by a provider.
///
/// Values scraped from a rendered dashboard arrive as text (`"36.0°C"`),
/// values from the JSON feed arrive as numbers. Interpretation is deferred
/// to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
}

impl ReadingValue {
    /// Numeric interpretation of the reading; `None` when it is not a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ReadingValue::Number(v) if v.is_nan() => None,
            ReadingValue::Number(v) => Some(*v),
            ReadingValue::Text(s) => parse_numeric(s),
        }
    }

    /// Switch interpretation; only the exact texts `ON` / `OFF` qualify.
    pub fn as_switch(&self) -> Option<SwitchState> {
        match self {
            ReadingValue::Text(s) => s.parse().ok(),
            ReadingValue::Number(_) => None,
        }
    }
}

impl std::fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingValue::Number(v) => write!(f, "{v}"),
            ReadingValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for ReadingValue {
    fn from(value: f64) -> Self {
        ReadingValue::Number(value)
    }
}

impl From<&str> for ReadingValue {
    fn from(value: &str) -> Self {
        ReadingValue::Text(value.to_string())
    }
}

impl From<String> for ReadingValue {
    fn from(value: String) -> Self {
        ReadingValue::Text(value)
    }
}

impl From<SwitchState> for ReadingValue {
    fn from(value: SwitchState) -> Self {
        ReadingValue::Text(value.to_string())
    }
}

/// Parses a number out of display text such as `"36.0°C"` or `"12.5 %"`.
///
/// Every character other than digits, `.` and `-` is dropped, then the
/// longest leading float is taken. Returns `None` when nothing numeric
/// remains.
///
/// # Examples
///
/// ```
/// use coopwatch_common::types::parse_numeric;
///
/// assert_eq!(parse_numeric("36.0°C"), Some(36.0));
/// assert_eq!(parse_numeric(" 12.5 ppm"), Some(12.5));
/// assert_eq!(parse_numeric("-3"), Some(-3.0));
/// assert_eq!(parse_numeric("n/a"), None);
/// ```
pub fn parse_numeric(text: &str) -> Option<f64> {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let bytes = filtered.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }

    // "-", "." and "-." are not numbers
    let prefix = &filtered[..end];
    if !prefix.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Lookup of current readings by name.
pub trait ReadingSource {
    /// Returns the reading named `name`, or `None` when it is absent.
    fn reading(&self, name: &str) -> Option<ReadingValue>;
}

/// A point-in-time set of named readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    values: HashMap<String, ReadingValue>,
}

impl Readings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ReadingValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ReadingValue>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ReadingValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ReadingSource for Readings {
    fn reading(&self, name: &str) -> Option<ReadingValue> {
        self.values.get(name).cloned()
    }
}
