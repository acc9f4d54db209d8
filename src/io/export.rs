//! CSV export for evaluation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::engine::message::CategorizedMessage;
use crate::engine::stats::SystemStats;

/// Column header for the statistics table.
const STATS_HEADER: [&str; 3] = ["metric", "value", "unit"];
/// Column header for the diagnostics table.
const DIAGNOSTICS_HEADER: [&str; 3] = ["index", "level", "text"];

/// Exports statistics to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_stats_csv(stats: &SystemStats, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_stats_csv(stats, io::BufWriter::new(file))
}

/// Writes one `metric,value,unit` row per statistic.
///
/// Quantities without a meaningful value are written as `N/A`.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_stats_csv(stats: &SystemStats, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(STATS_HEADER)?;

    let num = |v: f64| format!("{v:.4}");
    let text_or = |v: Option<f64>, fallback: String| v.map_or(fallback, num);
    let c = &stats.cables;

    let rows: [(&str, String, &str); 21] = [
        ("totalSolarPower", num(stats.total_solar_power), "W"),
        ("totalBatteryCapacity", num(stats.total_battery_capacity), "Ah"),
        (
            "systemNominalVoltage",
            text_or(
                stats.system_nominal_voltage.volts(),
                stats.system_nominal_voltage.to_string(),
            ),
            "V",
        ),
        (
            "voltageConsistencyIssue",
            stats.voltage_consistency_issue.to_string(),
            "",
        ),
        ("totalInverterPower", num(stats.total_inverter_power), "W"),
        ("totalBatteryEnergyWh", num(stats.total_battery_energy_wh), "Wh"),
        (
            "estimatedDailySolarProductionWh",
            num(stats.estimated_daily_solar_production_wh),
            "Wh/day",
        ),
        ("usableBatteryEnergyWh", num(stats.usable_battery_energy_wh), "Wh"),
        (
            "energyNeededAdjustedWh",
            num(stats.energy_needed_adjusted_wh),
            "Wh/day",
        ),
        (
            "estimatedBatteryAutonomyDays",
            num(stats.estimated_battery_autonomy_days),
            "days",
        ),
        ("dailyEnergyBalanceWh", num(stats.daily_energy_balance_wh), "Wh/day"),
        (
            "rechargeTimeEffectiveSunHours",
            num(stats.recharge_time_effective_sun_hours),
            "h",
        ),
        ("rechargeTimePshDays", num(stats.recharge_time_psh_days), "days"),
        (
            "productionToConsumptionRatioPercentage",
            text_or(
                stats.production_to_consumption_ratio_percentage.percent(),
                stats.production_to_consumption_ratio_percentage.to_string(),
            ),
            "%",
        ),
        (
            "panelInterconnectCables",
            c.panel_interconnect_cables.to_string(),
            "pairs",
        ),
        (
            "arrayToChargerCables",
            c.array_to_charger_cables.to_string(),
            "pairs",
        ),
        (
            "chargerToBatteryCables",
            c.charger_to_battery_cables.to_string(),
            "pairs",
        ),
        (
            "batteryInterconnectCables",
            c.battery_interconnect_cables.to_string(),
            "pairs",
        ),
        (
            "batteryToInverterCables",
            c.battery_to_inverter_cables.to_string(),
            "pairs",
        ),
        (
            "totalEstimatedCables",
            c.total_estimated_cables.to_string(),
            "pairs",
        ),
        (
            "observedBatteryVoltages",
            stats
                .observed_battery_voltages
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(";"),
            "V",
        ),
    ];
    for (metric, value, unit) in &rows {
        wtr.write_record([*metric, value.as_str(), *unit])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports diagnostics to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_diagnostics_csv(messages: &[CategorizedMessage], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_diagnostics_csv(messages, io::BufWriter::new(file))
}

/// Writes one `index,level,text` row per message, in pipeline order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_diagnostics_csv(
    messages: &[CategorizedMessage],
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(DIAGNOSTICS_HEADER)?;
    for (i, m) in messages.iter().enumerate() {
        wtr.write_record([i.to_string().as_str(), m.level.as_str(), m.text.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
