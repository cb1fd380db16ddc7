use crate::error::{ConfigError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CYCLE_COUNT: u32 = 1;
pub const DEFAULT_ENCRYPT_RANGE: AmountRange = AmountRange {
    min: 0.0005,
    max: 0.001,
};
pub const DEFAULT_DECRYPT_RANGE: AmountRange = AmountRange {
    min: 0.0004,
    max: 0.0008,
};
pub const DEFAULT_WAIT_HOURS: f64 = 24.0;
/// Largest wait whose length in seconds still fits a `Duration`.
pub const MAX_WAIT_HOURS: f64 = u64::MAX as f64 / 3_600.0;

/// Inclusive ether amount range sampled uniformly per action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmountRange {
    pub min: f64,
    pub max: f64,
}

impl AmountRange {
    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub cycle_count: u32,
    pub encrypt_range: AmountRange,
    pub decrypt_range: AmountRange,
    pub wait_hours: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            cycle_count: DEFAULT_CYCLE_COUNT,
            encrypt_range: DEFAULT_ENCRYPT_RANGE,
            decrypt_range: DEFAULT_DECRYPT_RANGE,
            wait_hours: DEFAULT_WAIT_HOURS,
        }
    }
}

/// Whatever subset of a persisted config could be read. `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialRunConfig {
    pub cycle_count: Option<u32>,
    pub encrypt_min: Option<f64>,
    pub encrypt_max: Option<f64>,
    pub decrypt_min: Option<f64>,
    pub decrypt_max: Option<f64>,
    pub wait_hours: Option<f64>,
}

/// Accepts JSON numbers and numeric strings; zero, negative, and non-finite values are absent.
fn positive_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    (parsed.is_finite() && parsed > 0.0).then_some(parsed)
}

impl PartialRunConfig {
    pub fn from_json(root: &Value) -> Self {
        let range_field = |range: &str, bound: &str| {
            positive_number(root.get(range).and_then(|r| r.get(bound)))
        };
        Self {
            cycle_count: positive_number(root.get("cycleCount"))
                .map(|n| n.trunc())
                .filter(|n| *n >= 1.0)
                .map(|n| n.min(u32::MAX as f64) as u32),
            encrypt_min: range_field("encryptRange", "min"),
            encrypt_max: range_field("encryptRange", "max"),
            decrypt_min: range_field("decryptRange", "min"),
            decrypt_max: range_field("decryptRange", "max"),
            wait_hours: positive_number(root.get("waitHours"))
                .filter(|hours| *hours < MAX_WAIT_HOURS),
        }
    }
}

fn merge_range(min: Option<f64>, max: Option<f64>, default: AmountRange) -> AmountRange {
    let min = min.unwrap_or(default.min);
    let max = max.unwrap_or(default.max);
    if min <= max {
        AmountRange { min, max }
    } else {
        AmountRange { min: max, max: min }
    }
}

impl RunConfig {
    /// Overlays `partial` on the defaults field by field.
    pub fn merge(partial: &PartialRunConfig) -> Self {
        Self {
            cycle_count: partial.cycle_count.unwrap_or(DEFAULT_CYCLE_COUNT),
            encrypt_range: merge_range(
                partial.encrypt_min,
                partial.encrypt_max,
                DEFAULT_ENCRYPT_RANGE,
            ),
            decrypt_range: merge_range(
                partial.decrypt_min,
                partial.decrypt_max,
                DEFAULT_DECRYPT_RANGE,
            ),
            wait_hours: partial.wait_hours.unwrap_or(DEFAULT_WAIT_HOURS),
        }
    }

    /// Out-of-range or non-finite hours fall back to the default wait.
    pub fn inter_round_wait(&self) -> Duration {
        Duration::try_from_secs_f64(self.wait_hours * 3_600.0)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_WAIT_HOURS * 3_600.0))
    }
}

fn read_partial(path: &Path) -> Result<PartialRunConfig> {
    let raw = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(PartialRunConfig::from_json(&value))
}

fn write_default(path: &Path, config: &RunConfig) -> Result<()> {
    let rendered = serde_json::to_string_pretty(config)
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;
    fs::write(path, rendered).map_err(|e| ConfigError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Reads the persisted run configuration, falling back to defaults on any failure.
/// A missing file is materialised with the defaults.
pub fn load_run_config(path: &Path) -> RunConfig {
    if !path.exists() {
        tracing::warn!(
            "[CONFIG] {} not found, using default settings.",
            path.display()
        );
        let config = RunConfig::default();
        match write_default(path, &config) {
            Ok(()) => tracing::info!(
                "[CONFIG] A new {} file has been created with default settings.",
                path.display()
            ),
            Err(err) => tracing::error!("[CONFIG] Failed to write default configuration: {err}"),
        }
        return config;
    }

    match read_partial(path) {
        Ok(partial) => {
            let config = RunConfig::merge(&partial);
            tracing::info!(
                "[CONFIG] Configuration loaded from {}: cycles={} encrypt=[{}, {}] decrypt=[{}, {}] wait_hours={}",
                path.display(),
                config.cycle_count,
                config.encrypt_range.min,
                config.encrypt_range.max,
                config.decrypt_range.min,
                config.decrypt_range.max,
                config.wait_hours
            );
            config
        }
        Err(err) => {
            tracing::error!("[CONFIG] Failed to load configuration: {err}. Using defaults.");
            RunConfig::default()
        }
    }
}
