//! Global assumptions applied to every evaluation, with TOML loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Global assumptions (`SystemInputs`) owned by the host and passed by value
/// into every evaluation.
///
/// All fields have documented defaults, so a partial TOML file or a project
/// saved by an older host still loads. Load from TOML with
/// [`SystemInputs::from_toml_file`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct SystemInputs {
    /// Equivalent full-sun hours per day (h/day, >= 0).
    #[serde(alias = "peak_sun_hours")]
    pub peak_sun_hours: f64,
    /// Daily AC consumption (Wh/day, >= 0).
    #[serde(alias = "estimated_daily_usage_wh")]
    pub estimated_daily_usage_wh: f64,
    /// Usable depth of discharge (%, 1-100).
    #[serde(rename = "batteryDoD", alias = "battery_dod")]
    pub battery_dod: f64,
    /// Inverter conversion efficiency (%, 1-100).
    #[serde(alias = "inverter_efficiency")]
    pub inverter_efficiency: f64,
    /// Array performance factor (%, 1-100).
    #[serde(alias = "solar_panel_efficiency")]
    pub solar_panel_efficiency: f64,
    /// DC bus voltage used for energy and inverter window checks (V, >= 12).
    #[serde(alias = "system_wide_voltage")]
    pub system_wide_voltage: f64,
}

impl Default for SystemInputs {
    fn default() -> Self {
        Self {
            peak_sun_hours: 4.5,
            estimated_daily_usage_wh: 1500.0,
            battery_dod: 80.0,
            inverter_efficiency: 90.0,
            solar_panel_efficiency: 80.0,
            system_wide_voltage: 24.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Field name or source (e.g., `"batteryDoD"`, `"toml"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl SystemInputs {
    /// Parses assumptions from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("assumptions", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses assumptions from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Checks every field against its documented range.
    ///
    /// Returns an empty vector if the assumptions are valid. The engine itself
    /// never calls this; out-of-range values simply flow through the formulas.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let fields = [
            ("peakSunHours", self.peak_sun_hours),
            ("estimatedDailyUsageWh", self.estimated_daily_usage_wh),
            ("batteryDoD", self.battery_dod),
            ("inverterEfficiency", self.inverter_efficiency),
            ("solarPanelEfficiency", self.solar_panel_efficiency),
            ("systemWideVoltage", self.system_wide_voltage),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be a finite number"));
            }
        }

        if self.peak_sun_hours < 0.0 {
            errors.push(ConfigError::new("peakSunHours", "must be >= 0"));
        }
        if self.estimated_daily_usage_wh < 0.0 {
            errors.push(ConfigError::new("estimatedDailyUsageWh", "must be >= 0"));
        }
        for (field, pct) in [
            ("batteryDoD", self.battery_dod),
            ("inverterEfficiency", self.inverter_efficiency),
            ("solarPanelEfficiency", self.solar_panel_efficiency),
        ] {
            if !(1.0..=100.0).contains(&pct) {
                errors.push(ConfigError::new(field, "must be in [1, 100]"));
            }
        }
        if self.system_wide_voltage < 12.0 {
            errors.push(ConfigError::new("systemWideVoltage", "must be >= 12"));
        }

        errors
    }
}
