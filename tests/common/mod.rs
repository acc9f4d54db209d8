//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use offgrid_planner::components::{Component, ComponentType};
use offgrid_planner::engine::message::{CategorizedMessage, MessageLevel};

/// Panel with the three ratings the engine reads most.
pub fn panel(id: &str, voc: f64, isc: f64, pmax: f64) -> Component {
    Component::bare(id, ComponentType::Panel, format!("Panel {id}"))
        .with("voc", voc)
        .with("isc", isc)
        .with("pmax", pmax)
}

/// Array of `series × strings` panels, optionally assigned to a controller.
pub fn array(id: &str, panel_id: &str, series: u32, strings: u32, mppt_id: &str) -> Component {
    Component::bare(id, ComponentType::ArrayConfig, format!("Array {id}"))
        .with("selectedPanelId", panel_id)
        .with("panelsInSeries", series)
        .with("numberOfStrings", strings)
        .with("assignedMpptId", mppt_id)
}

/// Charge controller with every rating set.
pub fn mppt(id: &str, max_v: impl ToString, max_i: f64, out_i: f64, batt_v: f64) -> Component {
    Component::bare(id, ComponentType::Mppt, format!("MPPT {id}"))
        .with("maxInputVoltage", max_v)
        .with("maxInputCurrent", max_i)
        .with("maxOutputCurrent", out_i)
        .with("nominalBatteryVoltage", batt_v)
}

/// Battery with generous current ratings.
pub fn battery(id: &str, volts: f64, capacity_ah: f64) -> Component {
    Component::bare(id, ComponentType::Battery, format!("Battery {id}"))
        .with("nominalVoltage", volts)
        .with("capacityAh", capacity_ah)
        .with("maxChargeCurrent", 500)
        .with("maxDischargeCurrent", 500)
}

/// Inverter accepting a 20-32 V input window.
pub fn inverter(id: &str, rated_w: f64) -> Component {
    Component::bare(id, ComponentType::Inverter, format!("Inverter {id}"))
        .with("inputVoltageMin", 20)
        .with("inputVoltageMax", 32)
        .with("ratedPower", rated_w)
}

/// Number of messages at exactly `level`.
pub fn count_level(messages: &[CategorizedMessage], level: MessageLevel) -> usize {
    messages.iter().filter(|m| m.level == level).count()
}

/// Messages at `level` whose text contains `needle`.
pub fn matching<'a>(
    messages: &'a [CategorizedMessage],
    level: MessageLevel,
    needle: &str,
) -> Vec<&'a CategorizedMessage> {
    messages
        .iter()
        .filter(|m| m.level == level && m.text.contains(needle))
        .collect()
}
