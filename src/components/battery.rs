use crate::components::types::{ComponentSpec, ComponentType, Properties, properties_from};
use crate::numeric::quantity;

/// A battery (or battery module) in the storage bank.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Battery {
    /// Nominal terminal voltage (V).
    pub nominal_voltage: Option<f64>,
    /// Rated capacity (Ah).
    pub capacity_ah: Option<f64>,
    /// Highest continuous charge current (A).
    pub max_charge_current: Option<f64>,
    /// Highest continuous discharge current (A).
    pub max_discharge_current: Option<f64>,
    /// Unit price (USD).
    pub cost_usd: Option<f64>,
}

impl ComponentSpec for Battery {
    const KIND: ComponentType = ComponentType::Battery;
    const FIELDS: &'static [&'static str] = &[
        "nominalVoltage",
        "capacityAh",
        "maxChargeCurrent",
        "maxDischargeCurrent",
        "costUsd",
    ];

    fn from_properties(props: &Properties) -> Self {
        Self {
            nominal_voltage: quantity(props, "nominalVoltage"),
            capacity_ah: quantity(props, "capacityAh"),
            max_charge_current: quantity(props, "maxChargeCurrent"),
            max_discharge_current: quantity(props, "maxDischargeCurrent"),
            cost_usd: quantity(props, "costUsd"),
        }
    }

    fn default_properties() -> Properties {
        properties_from(&[
            ("nominalVoltage", "12"),
            ("capacityAh", "100"),
            ("maxChargeCurrent", "50"),
            ("maxDischargeCurrent", "100"),
            ("costUsd", ""),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let b = Battery::from_properties(&Battery::default_properties());
        assert_eq!(b.nominal_voltage, Some(12.0));
        assert_eq!(b.capacity_ah, Some(100.0));
        assert_eq!(b.max_charge_current, Some(50.0));
        assert_eq!(b.max_discharge_current, Some(100.0));
    }

    #[test]
    fn empty_fields_are_absent() {
        let b = Battery::from_properties(&properties_from(&[("nominalVoltage", "")]));
        assert_eq!(b, Battery::default());
    }
}
