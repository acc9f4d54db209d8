use crate::components::types::{ComponentSpec, ComponentType, Properties, properties_from};
use crate::numeric::quantity;

/// A DC-to-AC inverter drawing from the battery bank.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Inverter {
    /// Lowest DC input voltage accepted (V).
    pub input_voltage_min: Option<f64>,
    /// Highest DC input voltage accepted (V).
    pub input_voltage_max: Option<f64>,
    /// Continuous output rating (W).
    pub rated_power: Option<f64>,
    /// Short-term surge rating (W).
    pub surge_power: Option<f64>,
    /// Conversion efficiency (%).
    pub efficiency_pct: Option<f64>,
    /// Standby consumption (W).
    pub idle_draw_w: Option<f64>,
    /// Unit price (USD).
    pub cost_usd: Option<f64>,
}

impl ComponentSpec for Inverter {
    const KIND: ComponentType = ComponentType::Inverter;
    const FIELDS: &'static [&'static str] = &[
        "inputVoltageMin",
        "inputVoltageMax",
        "ratedPower",
        "surgePower",
        "efficiencyPct",
        "idleDrawW",
        "costUsd",
    ];

    fn from_properties(props: &Properties) -> Self {
        Self {
            input_voltage_min: quantity(props, "inputVoltageMin"),
            input_voltage_max: quantity(props, "inputVoltageMax"),
            rated_power: quantity(props, "ratedPower"),
            surge_power: quantity(props, "surgePower"),
            efficiency_pct: quantity(props, "efficiencyPct"),
            idle_draw_w: quantity(props, "idleDrawW"),
            cost_usd: quantity(props, "costUsd"),
        }
    }

    fn default_properties() -> Properties {
        // 24 V class inverter
        properties_from(&[
            ("inputVoltageMin", "20"),
            ("inputVoltageMax", "32"),
            ("ratedPower", "1000"),
            ("surgePower", "2000"),
            ("efficiencyPct", "90"),
            ("idleDrawW", ""),
            ("costUsd", ""),
        ])
    }
}
