use crate::Checker;
use coopwatch_common::types::ReadingSource;

/// Placeholder replaced by the formatted reading in a message template.
pub const VALUE_PLACEHOLDER: &str = "{{value}}";

/// Comparison between a reading and its bound. Ordered comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    GreaterThan,
    LessThan,
    Equal,
}

impl CompareOp {
    pub fn check(&self, value: f64, threshold: f64) -> bool {
        match self {
            Self::GreaterThan => value > threshold,
            Self::LessThan => value < threshold,
            Self::Equal => value == threshold,
        }
    }
}

/// A static `(reading, comparator, bound, message)` rule.
///
/// # Examples
///
/// ```
/// use coopwatch_alert::rules::threshold::{CompareOp, ThresholdRule};
///
/// let rule = ThresholdRule::new("water_level", CompareOp::LessThan, 20.0, "Low: {{value}}%")
///     .with_floor(0.0);
/// assert!(rule.matches(5.0));
/// assert!(!rule.matches(0.0));
/// assert!(!rule.matches(20.0));
/// assert_eq!(rule.render(5.5), "Low: 5.5%");
/// ```
#[derive(Debug, Clone)]
pub struct ThresholdRule {
    pub reading: String,
    pub operator: CompareOp,
    pub value: f64,
    /// When set, the reading must also be strictly above this bound.
    pub floor: Option<f64>,
    pub message: String,
}

impl ThresholdRule {
    pub fn new(
        reading: impl Into<String>,
        operator: CompareOp,
        value: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            reading: reading.into(),
            operator,
            value,
            floor: None,
            message: message.into(),
        }
    }

    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn matches(&self, value: f64) -> bool {
        if let Some(floor) = self.floor {
            if value <= floor {
                return false;
            }
        }
        self.operator.check(value, self.value)
    }

    pub fn render(&self, value: f64) -> String {
        self.message.replace(VALUE_PLACEHOLDER, &format_value(value))
    }
}

/// Formats a reading the way the dashboard prints it: `36`, `36.5`, and
/// `0` for negative zero.
pub fn format_value(value: f64) -> String {
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}")
}

/// A named, ordered list of [`ThresholdRule`]s over numeric readings.
///
/// Rules fire independently in declaration order. A reading that is absent
/// or not a number skips every rule that refers to it; the diagnostic is
/// logged once per reading per evaluation.
pub struct ThresholdChecker {
    name: String,
    rules: Vec<ThresholdRule>,
}

impl ThresholdChecker {
    pub fn new(name: impl Into<String>, rules: Vec<ThresholdRule>) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }

    pub fn rules(&self) -> &[ThresholdRule] {
        &self.rules
    }

    fn numeric_reading(&self, readings: &dyn ReadingSource, name: &str) -> Option<f64> {
        let Some(raw) = readings.reading(name) else {
            tracing::warn!(checker = %self.name, reading = name, "Reading missing, rules skipped");
            return None;
        };
        let value = raw.as_number();
        if value.is_none() {
            tracing::warn!(
                checker = %self.name,
                reading = name,
                raw = %raw,
                "Reading is not a number, rules skipped"
            );
        }
        value
    }
}

impl Checker for ThresholdChecker {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, readings: &dyn ReadingSource) -> Vec<String> {
        let mut resolved: Vec<(&str, Option<f64>)> = Vec::new();
        let mut messages = Vec::new();

        for rule in &self.rules {
            let value = match resolved.iter().find(|(name, _)| *name == rule.reading) {
                Some((_, value)) => *value,
                None => {
                    let value = self.numeric_reading(readings, &rule.reading);
                    resolved.push((rule.reading.as_str(), value));
                    value
                }
            };

            if let Some(value) = value {
                if rule.matches(value) {
                    messages.push(rule.render(value));
                }
            }
        }

        messages
    }
}
