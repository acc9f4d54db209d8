use crate::components::types::{ComponentSpec, ComponentType, Properties, properties_from};
use crate::numeric::{positive, quantity};

/// A maximum-power-point-tracking charge controller.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mppt {
    /// Highest PV input voltage the controller tolerates (V).
    pub max_input_voltage: Option<f64>,
    /// Highest PV input current (A).
    pub max_input_current: Option<f64>,
    /// Rated charging current into the battery bank (A).
    pub max_output_current: Option<f64>,
    /// Battery bank voltage the controller is configured for (V).
    pub nominal_battery_voltage: Option<f64>,
    /// Unit price (USD).
    pub cost_usd: Option<f64>,
}

impl Mppt {
    /// Output power the controller can deliver (W), when both ratings are positive.
    pub fn output_capacity_w(&self) -> Option<f64> {
        Some(positive(self.max_output_current)? * positive(self.nominal_battery_voltage)?)
    }
}

impl ComponentSpec for Mppt {
    const KIND: ComponentType = ComponentType::Mppt;
    const FIELDS: &'static [&'static str] = &[
        "maxInputVoltage",
        "maxInputCurrent",
        "maxOutputCurrent",
        "nominalBatteryVoltage",
        "costUsd",
    ];

    fn from_properties(props: &Properties) -> Self {
        Self {
            max_input_voltage: quantity(props, "maxInputVoltage"),
            max_input_current: quantity(props, "maxInputCurrent"),
            max_output_current: quantity(props, "maxOutputCurrent"),
            nominal_battery_voltage: quantity(props, "nominalBatteryVoltage"),
            cost_usd: quantity(props, "costUsd"),
        }
    }

    fn default_properties() -> Properties {
        properties_from(&[
            ("maxInputVoltage", "100"),
            ("maxInputCurrent", "20"),
            ("maxOutputCurrent", "30"),
            ("nominalBatteryVoltage", "24"),
            ("costUsd", ""),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_capacity_needs_both_ratings() {
        let m = Mppt::from_properties(&Mppt::default_properties());
        assert_eq!(m.output_capacity_w(), Some(720.0));

        let m = Mppt {
            nominal_battery_voltage: Some(0.0),
            ..m
        };
        assert_eq!(m.output_capacity_w(), None);

        let m = Mppt {
            max_output_current: None,
            nominal_battery_voltage: Some(12.0),
            ..m
        };
        assert_eq!(m.output_capacity_w(), None);
    }
}
