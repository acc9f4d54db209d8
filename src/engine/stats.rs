//! Statistics aggregation over a component snapshot.

use std::fmt;

use serde::{Serialize, Serializer};

use super::index::ComponentIndex;
use crate::config::SystemInputs;
use crate::numeric::or_zero;

/// Text used wherever a quantity has no meaningful value.
pub const NOT_APPLICABLE: &str = "N/A";

/// Nominal voltage reported for the battery bank.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NominalVoltage {
    /// No battery declared a parsable nominal voltage.
    NotAvailable,
    Volts(f64),
}

impl NominalVoltage {
    pub fn volts(self) -> Option<f64> {
        match self {
            NominalVoltage::NotAvailable => None,
            NominalVoltage::Volts(v) => Some(v),
        }
    }
}

impl fmt::Display for NominalVoltage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NominalVoltage::NotAvailable => f.write_str(NOT_APPLICABLE),
            NominalVoltage::Volts(v) => write!(f, "{v} V"),
        }
    }
}

impl Serialize for NominalVoltage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NominalVoltage::NotAvailable => serializer.serialize_str(NOT_APPLICABLE),
            NominalVoltage::Volts(v) => serializer.serialize_f64(*v),
        }
    }
}

/// Daily production as a share of adjusted consumption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProductionRatio {
    Percent(f64),
    /// Production exists but there is no consumption to compare against.
    NotApplicable,
}

impl ProductionRatio {
    pub fn percent(self) -> Option<f64> {
        match self {
            ProductionRatio::Percent(p) => Some(p),
            ProductionRatio::NotApplicable => None,
        }
    }
}

impl fmt::Display for ProductionRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductionRatio::Percent(p) => write!(f, "{p:.1}%"),
            ProductionRatio::NotApplicable => f.write_str(NOT_APPLICABLE),
        }
    }
}

impl Serialize for ProductionRatio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ProductionRatio::Percent(p) => serializer.serialize_f64(*p),
            ProductionRatio::NotApplicable => serializer.serialize_str(NOT_APPLICABLE),
        }
    }
}

/// Cable-count design heuristic; not an electrical-code calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CableEstimate {
    /// Series jumpers between neighbouring panels in each string.
    pub panel_interconnect_cables: u64,
    /// One positive/negative pair per string.
    pub array_to_charger_cables: u64,
    /// One pair per charge controller.
    pub charger_to_battery_cables: u64,
    /// One pair between each neighbouring battery.
    pub battery_interconnect_cables: u64,
    /// One pair per inverter.
    pub battery_to_inverter_cables: u64,
    pub total_estimated_cables: u64,
}

impl CableEstimate {
    fn from_index(index: &ComponentIndex<'_>) -> Self {
        let mut panel_interconnect = 0_u64;
        let mut array_to_charger = 0_u64;
        for (_, array) in index.arrays() {
            let series = array.panels_in_series.unwrap_or(0);
            let strings = array.number_of_strings.unwrap_or(0);
            if series >= 2 && strings >= 1 {
                let jumpers = u64::from(series - 1).saturating_mul(u64::from(strings));
                panel_interconnect = panel_interconnect.saturating_add(jumpers);
            }
            if strings >= 1 {
                array_to_charger = array_to_charger.saturating_add(2 * u64::from(strings));
            }
        }

        let mppt_count = index.mppts().count() as u64;
        let battery_count = index.batteries().count() as u64;
        let inverter_count = index.inverters().count() as u64;

        let charger_to_battery = 2 * mppt_count;
        let battery_interconnect = 2 * battery_count.saturating_sub(1);
        let battery_to_inverter = 2 * inverter_count;

        Self {
            panel_interconnect_cables: panel_interconnect,
            array_to_charger_cables: array_to_charger,
            charger_to_battery_cables: charger_to_battery,
            battery_interconnect_cables: battery_interconnect,
            battery_to_inverter_cables: battery_to_inverter,
            total_estimated_cables: [
                array_to_charger,
                charger_to_battery,
                battery_interconnect,
                battery_to_inverter,
            ]
            .into_iter()
            .fold(panel_interconnect, u64::saturating_add),
        }
    }
}

/// Aggregate electrical statistics derived from one snapshot.
///
/// Recomputed wholesale on every evaluation; never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    /// Sum of array peak power (W).
    pub total_solar_power: f64,
    /// Sum of battery capacity (Ah).
    pub total_battery_capacity: f64,
    /// First-seen battery nominal voltage, or N/A without batteries.
    pub system_nominal_voltage: NominalVoltage,
    /// Batteries declare more than one nominal voltage.
    pub voltage_consistency_issue: bool,
    /// Distinct battery nominal voltages in first-seen order (V).
    pub observed_battery_voltages: Vec<f64>,
    /// Sum of inverter continuous ratings (W).
    pub total_inverter_power: f64,
    /// Stored energy at the system-wide voltage (Wh).
    pub total_battery_energy_wh: f64,
    /// Expected array yield per day (Wh/day).
    pub estimated_daily_solar_production_wh: f64,
    /// Stored energy within the allowed depth of discharge (Wh).
    pub usable_battery_energy_wh: f64,
    /// Daily consumption grossed up for inverter losses (Wh/day).
    pub energy_needed_adjusted_wh: f64,
    /// Days the usable bank covers the adjusted consumption.
    pub estimated_battery_autonomy_days: f64,
    /// Production minus adjusted consumption (Wh/day).
    pub daily_energy_balance_wh: f64,
    /// Full-sun hours to refill the usable bank from empty (h).
    pub recharge_time_effective_sun_hours: f64,
    /// The same refill time expressed in days of peak sun.
    pub recharge_time_psh_days: f64,
    pub production_to_consumption_ratio_percentage: ProductionRatio,
    #[serde(flatten)]
    pub cables: CableEstimate,
}

impl SystemStats {
    /// Aggregates statistics from an indexed snapshot and the global assumptions.
    ///
    /// Never fails. Absent fields contribute nothing to sums; an array whose
    /// panel reference does not resolve contributes zero power.
    pub fn from_index(index: &ComponentIndex<'_>, inputs: &SystemInputs) -> Self {
        let total_solar_power: f64 = index
            .arrays()
            .map(|(component, array)| {
                let Some(panel) = index.panel(array.selected_panel_id.as_ref()) else {
                    log::trace!("array {} has no resolvable panel", component.id);
                    return 0.0;
                };
                let series = f64::from(array.panels_in_series.unwrap_or(0));
                let strings = f64::from(array.number_of_strings.unwrap_or(0));
                or_zero(panel.pmax) * series * strings
            })
            .sum();

        let mut total_battery_capacity = 0.0_f64;
        let mut observed_battery_voltages: Vec<f64> = Vec::new();
        for (_, battery) in index.batteries() {
            total_battery_capacity += or_zero(battery.capacity_ah);
            if let Some(v) = battery.nominal_voltage {
                if !observed_battery_voltages.contains(&v) {
                    observed_battery_voltages.push(v);
                }
            }
        }
        let system_nominal_voltage = observed_battery_voltages
            .first()
            .map_or(NominalVoltage::NotAvailable, |&v| NominalVoltage::Volts(v));
        let voltage_consistency_issue = observed_battery_voltages.len() > 1;

        let total_inverter_power: f64 = index
            .inverters()
            .map(|(_, inverter)| or_zero(inverter.rated_power))
            .sum();

        let mut total_battery_energy_wh = total_battery_capacity * inputs.system_wide_voltage;
        if !total_battery_energy_wh.is_finite() {
            total_battery_energy_wh = 0.0;
        }

        let estimated_daily_solar_production_wh =
            total_solar_power * inputs.peak_sun_hours * (inputs.solar_panel_efficiency / 100.0);
        let usable_battery_energy_wh = total_battery_energy_wh * (inputs.battery_dod / 100.0);
        let energy_needed_adjusted_wh = if inputs.estimated_daily_usage_wh > 0.0 {
            inputs.estimated_daily_usage_wh / (inputs.inverter_efficiency / 100.0)
        } else {
            0.0
        };

        let estimated_battery_autonomy_days =
            if usable_battery_energy_wh > 0.0 && energy_needed_adjusted_wh > 0.0 {
                usable_battery_energy_wh / energy_needed_adjusted_wh
            } else {
                0.0
            };

        let daily_energy_balance_wh =
            estimated_daily_solar_production_wh - energy_needed_adjusted_wh;

        let (recharge_time_effective_sun_hours, recharge_time_psh_days) =
            if total_solar_power > 0.0 && usable_battery_energy_wh > 0.0 {
                let hours = (total_battery_energy_wh * inputs.battery_dod / 100.0)
                    / (total_solar_power * inputs.solar_panel_efficiency / 100.0);
                let days = if inputs.peak_sun_hours > 0.0 {
                    hours / inputs.peak_sun_hours
                } else {
                    0.0
                };
                (hours, days)
            } else {
                (0.0, 0.0)
            };

        let production_to_consumption_ratio_percentage = if energy_needed_adjusted_wh > 0.0 {
            ProductionRatio::Percent(
                estimated_daily_solar_production_wh / energy_needed_adjusted_wh * 100.0,
            )
        } else if estimated_daily_solar_production_wh > 0.0 {
            ProductionRatio::NotApplicable
        } else {
            ProductionRatio::Percent(0.0)
        };

        Self {
            total_solar_power,
            total_battery_capacity,
            system_nominal_voltage,
            voltage_consistency_issue,
            observed_battery_voltages,
            total_inverter_power,
            total_battery_energy_wh,
            estimated_daily_solar_production_wh,
            usable_battery_energy_wh,
            energy_needed_adjusted_wh,
            estimated_battery_autonomy_days,
            daily_energy_balance_wh,
            recharge_time_effective_sun_hours,
            recharge_time_psh_days,
            production_to_consumption_ratio_percentage,
            cables: CableEstimate::from_index(index),
        }
    }
}

impl fmt::Display for SystemStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- System Statistics ---")?;
        writeln!(f, "Total solar power:       {:.0} W", self.total_solar_power)?;
        writeln!(
            f,
            "Battery bank:            {:.0} Ah @ {}{}",
            self.total_battery_capacity,
            self.system_nominal_voltage,
            if self.voltage_consistency_issue {
                " (mixed voltages)"
            } else {
                ""
            }
        )?;
        writeln!(f, "Total inverter power:    {:.0} W", self.total_inverter_power)?;
        writeln!(
            f,
            "Battery energy:          {:.0} Wh ({:.0} Wh usable)",
            self.total_battery_energy_wh, self.usable_battery_energy_wh
        )?;
        writeln!(
            f,
            "Daily solar production:  {:.0} Wh",
            self.estimated_daily_solar_production_wh
        )?;
        writeln!(
            f,
            "Daily energy needed:     {:.0} Wh",
            self.energy_needed_adjusted_wh
        )?;
        writeln!(
            f,
            "Daily energy balance:    {:+.0} Wh",
            self.daily_energy_balance_wh
        )?;
        writeln!(
            f,
            "Production/consumption:  {}",
            self.production_to_consumption_ratio_percentage
        )?;
        writeln!(
            f,
            "Battery autonomy:        {:.2} days",
            self.estimated_battery_autonomy_days
        )?;
        writeln!(
            f,
            "Recharge time:           {:.1} sun hours ({:.2} PSH days)",
            self.recharge_time_effective_sun_hours, self.recharge_time_psh_days
        )?;
        write!(
            f,
            "Estimated cables:        {}",
            self.cables.total_estimated_cables
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Component, ComponentType};

    fn stats(components: &[Component], inputs: &SystemInputs) -> SystemStats {
        SystemStats::from_index(&ComponentIndex::new(components), inputs)
    }

    fn panel(id: &str, pmax: f64) -> Component {
        Component::bare(id, ComponentType::Panel, id).with("pmax", pmax)
    }

    fn array(id: &str, panel_id: &str, series: u32, strings: u32) -> Component {
        Component::bare(id, ComponentType::ArrayConfig, id)
            .with("selectedPanelId", panel_id)
            .with("panelsInSeries", series)
            .with("numberOfStrings", strings)
    }

    fn battery(id: &str, volts: f64, ah: f64) -> Component {
        Component::bare(id, ComponentType::Battery, id)
            .with("nominalVoltage", volts)
            .with("capacityAh", ah)
    }

    #[test]
    fn empty_snapshot_is_all_zero() {
        let s = stats(&[], &SystemInputs::default());
        assert_eq!(s.total_solar_power, 0.0);
        assert_eq!(s.system_nominal_voltage, NominalVoltage::NotAvailable);
        assert!(!s.voltage_consistency_issue);
        assert_eq!(s.cables.total_estimated_cables, 0);
        assert_eq!(s.estimated_battery_autonomy_days, 0.0);
        assert_eq!(s.recharge_time_effective_sun_hours, 0.0);
        // default usage is positive, so the ratio is numeric
        assert_eq!(
            s.production_to_consumption_ratio_percentage,
            ProductionRatio::Percent(0.0)
        );
    }

    #[test]
    fn array_power_multiplies_series_and_strings() {
        let components = vec![panel("p", 200.0), array("a", "p", 2, 2)];
        let inputs = SystemInputs {
            peak_sun_hours: 4.5,
            solar_panel_efficiency: 80.0,
            ..SystemInputs::default()
        };
        let s = stats(&components, &inputs);
        assert_eq!(s.total_solar_power, 800.0);
        assert!((s.estimated_daily_solar_production_wh - 2880.0).abs() < 1e-9);
    }

    #[test]
    fn unresolved_panel_contributes_zero() {
        let components = vec![panel("p", 200.0), array("a", "missing", 2, 2)];
        let s = stats(&components, &SystemInputs::default());
        assert_eq!(s.total_solar_power, 0.0);
    }

    #[test]
    fn missing_counts_contribute_zero() {
        let components = vec![
            panel("p", 200.0),
            Component::bare("a", ComponentType::ArrayConfig, "a")
                .with("selectedPanelId", "p")
                .with("panelsInSeries", "")
                .with("numberOfStrings", 2),
        ];
        let s = stats(&components, &SystemInputs::default());
        assert_eq!(s.total_solar_power, 0.0);
    }

    #[test]
    fn mixed_voltages_report_first_seen() {
        let components = vec![battery("b1", 12.0, 100.0), battery("b2", 24.0, 50.0)];
        let s = stats(&components, &SystemInputs::default());
        assert!(s.voltage_consistency_issue);
        assert_eq!(s.system_nominal_voltage, NominalVoltage::Volts(12.0));
        assert_eq!(s.observed_battery_voltages, vec![12.0, 24.0]);
        assert_eq!(s.total_battery_capacity, 150.0);
    }

    #[test]
    fn matching_voltages_are_consistent() {
        let components = vec![battery("b1", 12.0, 100.0), battery("b2", 12.0, 100.0)];
        let s = stats(&components, &SystemInputs::default());
        assert!(!s.voltage_consistency_issue);
        assert_eq!(s.system_nominal_voltage.volts(), Some(12.0));
    }

    #[test]
    fn energy_autonomy_and_balance() {
        // 200 Ah at 24 V = 4800 Wh, 80% DoD = 3840 Wh usable
        // 1800 Wh / 0.9 = 2000 Wh needed -> 1.92 days
        let components = vec![battery("b", 24.0, 200.0)];
        let inputs = SystemInputs {
            estimated_daily_usage_wh: 1800.0,
            ..SystemInputs::default()
        };
        let s = stats(&components, &inputs);
        assert!((s.total_battery_energy_wh - 4800.0).abs() < 1e-9);
        assert!((s.usable_battery_energy_wh - 3840.0).abs() < 1e-9);
        assert!((s.energy_needed_adjusted_wh - 2000.0).abs() < 1e-9);
        assert!((s.estimated_battery_autonomy_days - 1.92).abs() < 1e-9);
        assert!((s.daily_energy_balance_wh + 2000.0).abs() < 1e-9);
    }

    #[test]
    fn recharge_time_needs_solar_and_storage() {
        // usable 3840 Wh / (1000 W * 0.8) = 4.8 h -> 4.8 / 4 = 1.2 PSH days
        let components = vec![
            panel("p", 250.0),
            array("a", "p", 2, 2),
            battery("b", 24.0, 200.0),
        ];
        let inputs = SystemInputs {
            peak_sun_hours: 4.0,
            ..SystemInputs::default()
        };
        let s = stats(&components, &inputs);
        assert!((s.recharge_time_effective_sun_hours - 4.8).abs() < 1e-9);
        assert!((s.recharge_time_psh_days - 1.2).abs() < 1e-9);

        let no_sun = SystemInputs {
            peak_sun_hours: 0.0,
            ..inputs
        };
        let s = stats(&components, &no_sun);
        assert!((s.recharge_time_effective_sun_hours - 4.8).abs() < 1e-9);
        assert_eq!(s.recharge_time_psh_days, 0.0);
    }

    #[test]
    fn ratio_is_not_applicable_without_consumption() {
        let components = vec![panel("p", 100.0), array("a", "p", 1, 1)];
        let inputs = SystemInputs {
            estimated_daily_usage_wh: 0.0,
            ..SystemInputs::default()
        };
        let s = stats(&components, &inputs);
        assert_eq!(
            s.production_to_consumption_ratio_percentage,
            ProductionRatio::NotApplicable
        );
        assert_eq!(s.energy_needed_adjusted_wh, 0.0);
    }

    #[test]
    fn cable_estimate_counts_each_category() {
        let components = vec![
            panel("p", 100.0),
            array("a1", "p", 3, 2), // interconnect 4, to-charger 4
            array("a2", "p", 1, 1), // interconnect 0, to-charger 2
            Component::new("m1", ComponentType::Mppt, "m1"),
            Component::new("m2", ComponentType::Mppt, "m2"),
            battery("b1", 12.0, 100.0),
            battery("b2", 12.0, 100.0),
            battery("b3", 12.0, 100.0),
            Component::new("i", ComponentType::Inverter, "i"),
        ];
        let s = stats(&components, &SystemInputs::default());
        assert_eq!(s.cables.panel_interconnect_cables, 4);
        assert_eq!(s.cables.array_to_charger_cables, 6);
        assert_eq!(s.cables.charger_to_battery_cables, 4);
        assert_eq!(s.cables.battery_interconnect_cables, 4);
        assert_eq!(s.cables.battery_to_inverter_cables, 2);
        assert_eq!(s.cables.total_estimated_cables, 20);
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let max = u32::MAX.to_string();
        let huge = |id: &str| {
            Component::bare(id, ComponentType::ArrayConfig, id)
                .with("selectedPanelId", "p")
                .with("panelsInSeries", &max)
                .with("numberOfStrings", &max)
        };
        let components = vec![panel("p", 100.0), huge("a1"), huge("a2")];
        let s = stats(&components, &SystemInputs::default());
        assert_eq!(s.cables.panel_interconnect_cables, u64::MAX);
        assert_eq!(s.cables.array_to_charger_cables, 4 * u64::from(u32::MAX));
        assert_eq!(s.cables.total_estimated_cables, u64::MAX);
        assert!(s.total_solar_power.is_finite());
    }

    #[test]
    fn serializes_with_interchange_names() {
        let s = stats(&[], &SystemInputs::default());
        let json = serde_json::to_value(&s).expect("stats serialize");
        assert_eq!(json["systemNominalVoltage"], "N/A");
        assert_eq!(json["totalSolarPower"], 0.0);
        assert_eq!(json["totalEstimatedCables"], 0);
        assert!(json.get("productionToConsumptionRatioPercentage").is_some());
    }
}
