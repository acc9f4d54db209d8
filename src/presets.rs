//! Built-in demo projects.

use crate::components::array::{ASSIGNED_MPPT_ID, SELECTED_PANEL_ID};
use crate::components::{Component, ComponentType};
use crate::config::SystemInputs;
use crate::project::{ProjectError, ProjectFile};

/// Available preset names.
pub const PRESETS: &[&str] = &["cabin", "van", "empty"];

/// Loads a project from a named preset.
///
/// # Errors
///
/// Returns `ProjectError::UnknownPreset` if the name is not in [`PRESETS`].
pub fn from_preset(name: &str) -> Result<ProjectFile, ProjectError> {
    match name {
        "cabin" => Ok(cabin()),
        "van" => Ok(van()),
        "empty" => Ok(ProjectFile::default()),
        _ => Err(ProjectError::UnknownPreset {
            name: name.to_string(),
            available: PRESETS.join(", "),
        }),
    }
}

/// Weekend cabin on a 24 V bank: 1.2 kW of panels, two batteries, one
/// inverter. Everything sits inside its ratings.
pub fn cabin() -> ProjectFile {
    let components = vec![
        Component::new("panel-1", ComponentType::Panel, "Rooftop 200 W")
            .with("voc", 24.3)
            .with("isc", 10.5)
            .with("vmp", 20.1)
            .with("imp", 9.95)
            .with("pmax", 200)
            .with("costUsd", 180),
        Component::new("mppt-2", ComponentType::Mppt, "MPPT 100/50")
            .with("maxInputVoltage", 100)
            .with("maxInputCurrent", 30)
            .with("maxOutputCurrent", 50)
            .with("nominalBatteryVoltage", 24)
            .with("costUsd", 320),
        Component::new("array-3", ComponentType::ArrayConfig, "South roof")
            .with(SELECTED_PANEL_ID, "panel-1")
            .with("panelsInSeries", 3)
            .with("numberOfStrings", 2)
            .with(ASSIGNED_MPPT_ID, "mppt-2"),
        Component::new("battery-4", ComponentType::Battery, "LiFePO4 24 V #1")
            .with("nominalVoltage", 24)
            .with("capacityAh", 200)
            .with("maxChargeCurrent", 100)
            .with("maxDischargeCurrent", 150)
            .with("costUsd", 1450),
        Component::new("battery-5", ComponentType::Battery, "LiFePO4 24 V #2")
            .with("nominalVoltage", 24)
            .with("capacityAh", 200)
            .with("maxChargeCurrent", 100)
            .with("maxDischargeCurrent", 150)
            .with("costUsd", 1450),
        Component::new("inverter-6", ComponentType::Inverter, "Sine 1500")
            .with("inputVoltageMin", 20)
            .with("inputVoltageMax", 32)
            .with("ratedPower", 1500)
            .with("surgePower", 3000)
            .with("efficiencyPct", 92)
            .with("costUsd", 600),
    ];
    ProjectFile {
        components,
        ..ProjectFile::default()
    }
}

/// Camper van on a 12 V bank. The roof string is wired four in series,
/// which pushes open-circuit voltage past the controller limit.
pub fn van() -> ProjectFile {
    let components = vec![
        Component::new("panel-1", ComponentType::Panel, "Flexible 175 W")
            .with("voc", 22.4)
            .with("isc", 9.8)
            .with("vmp", 18.6)
            .with("imp", 9.4)
            .with("pmax", 175)
            .with("costUsd", 210),
        Component::new("mppt-2", ComponentType::Mppt, "MPPT 75/20")
            .with("maxInputVoltage", 75)
            .with("maxInputCurrent", 15)
            .with("maxOutputCurrent", 20)
            .with("nominalBatteryVoltage", 12)
            .with("costUsd", 110),
        Component::new("array-3", ComponentType::ArrayConfig, "Van roof")
            .with(SELECTED_PANEL_ID, "panel-1")
            .with("panelsInSeries", 4)
            .with("numberOfStrings", 1)
            .with(ASSIGNED_MPPT_ID, "mppt-2"),
        Component::new("battery-4", ComponentType::Battery, "LiFePO4 12 V")
            .with("nominalVoltage", 12)
            .with("capacityAh", 200)
            .with("maxChargeCurrent", 100)
            .with("maxDischargeCurrent", 150)
            .with("costUsd", 900),
        Component::new("inverter-5", ComponentType::Inverter, "Inverter 1000")
            .with("inputVoltageMin", 10.5)
            .with("inputVoltageMax", 15.5)
            .with("ratedPower", 1000)
            .with("surgePower", 2000)
            .with("efficiencyPct", 90)
            .with("costUsd", 250),
    ];
    ProjectFile {
        components,
        system_inputs: SystemInputs {
            estimated_daily_usage_wh: 800.0,
            system_wide_voltage: 12.0,
            ..SystemInputs::default()
        },
        ..ProjectFile::default()
    }
}
