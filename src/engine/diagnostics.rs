//! Compatibility diagnostics as an ordered pipeline of independent rules.
//!
//! Each rule reads the same immutable snapshot (index, statistics,
//! assumptions) and appends zero or more messages. Output order is the rule
//! order below, never the severity; consumers that want grouping use
//! [`super::message::group_by_severity`] afterwards.
//!
//! Checks that depend on an absent field are skipped silently.

use super::index::ComponentIndex;
use super::message::{CategorizedMessage, MessageLevel};
use super::stats::SystemStats;
use crate::config::SystemInputs;
use crate::numeric::{or_zero, positive};

/// Minimum headroom between string Voc and controller input limit.
const MIN_VOLTAGE_MARGIN: f64 = 1.10;
/// Recommended headroom between string Voc and controller input limit.
const IDEAL_VOLTAGE_MARGIN: f64 = 1.20;
/// Share of a current rating at which a sizing warning starts.
const NEAR_LIMIT_FRACTION: f64 = 0.90;
/// Array power above this multiple of controller capacity clips significantly.
const SIGNIFICANT_CLIPPING_RATIO: f64 = 1.25;
/// Width of the inverter input window edge that triggers a warning.
const INVERTER_WINDOW_EDGE: f64 = 0.05;
/// Autonomy below this many days is flagged.
const LOW_AUTONOMY_DAYS: f64 = 0.5;
/// Production/consumption percentage below which production is undersized.
const LOW_PRODUCTION_PCT: f64 = 80.0;
/// Production/consumption percentage above which a surplus is noted.
const HIGH_PRODUCTION_PCT: f64 = 150.0;

/// Read-only inputs shared by every rule.
struct RuleContext<'a> {
    index: &'a ComponentIndex<'a>,
    stats: &'a SystemStats,
    inputs: &'a SystemInputs,
}

type Rule = fn(&RuleContext<'_>, &mut Vec<CategorizedMessage>);

/// Rules in execution order.
const RULES: [(&str, Rule); 8] = [
    ("empty_system", empty_system),
    ("mixed_battery_voltages", mixed_battery_voltages),
    ("unassigned_arrays", unassigned_arrays),
    ("charge_controllers", charge_controllers),
    ("battery_currents", battery_currents),
    ("inverter_input_window", inverter_input_window),
    ("production_sanity", production_sanity),
    ("general_notes", general_notes),
];

/// Runs every rule in order, then appends the overall summary.
///
/// Pure and deterministic: the same snapshot always yields the same list.
pub fn run_diagnostics(
    index: &ComponentIndex<'_>,
    stats: &SystemStats,
    inputs: &SystemInputs,
) -> Vec<CategorizedMessage> {
    let ctx = RuleContext {
        index,
        stats,
        inputs,
    };
    let mut out = Vec::new();
    for (name, rule) in RULES {
        let before = out.len();
        rule(&ctx, &mut out);
        log::trace!("rule {name} emitted {} message(s)", out.len() - before);
    }
    rollup(&ctx, &mut out);
    out
}

fn push(out: &mut Vec<CategorizedMessage>, level: MessageLevel, text: String) {
    out.push(CategorizedMessage::new(level, text));
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

fn empty_system(ctx: &RuleContext<'_>, out: &mut Vec<CategorizedMessage>) {
    if ctx.index.is_empty() {
        push(
            out,
            MessageLevel::Info,
            "No components yet. Add panels, an array configuration, a charge controller, \
             batteries and an inverter to evaluate the system."
                .to_string(),
        );
    }
}

fn mixed_battery_voltages(ctx: &RuleContext<'_>, out: &mut Vec<CategorizedMessage>) {
    if !ctx.stats.voltage_consistency_issue {
        return;
    }
    let voltages = ctx
        .stats
        .observed_battery_voltages
        .iter()
        .map(|v| format!("{v} V"))
        .collect::<Vec<_>>()
        .join(", ");
    push(
        out,
        MessageLevel::Error,
        format!(
            "Batteries have mixed nominal voltages ({voltages}). Every battery in a bank must \
             share one nominal voltage; {} is reported as the system voltage.",
            ctx.stats.system_nominal_voltage
        ),
    );
}

fn unassigned_arrays(ctx: &RuleContext<'_>, out: &mut Vec<CategorizedMessage>) {
    let names: Vec<String> = ctx
        .index
        .arrays()
        .filter(|(_, array)| ctx.index.mppt(array.assigned_mppt_id.as_ref()).is_none())
        .map(|(component, _)| format!("\"{}\"", component.name))
        .collect();
    if names.is_empty() {
        return;
    }
    let names = names.join(", ");

    if ctx.index.mppts().next().is_some() {
        push(
            out,
            MessageLevel::Warn,
            format!(
                "Array configuration(s) {names} are not assigned to a charge controller; \
                 their power is not counted toward any controller."
            ),
        );
    } else {
        push(
            out,
            MessageLevel::Info,
            format!(
                "Array configuration(s) {names} have no charge controller to connect to. \
                 Add an MPPT charge controller to define the power path."
            ),
        );
    }
}

fn charge_controllers(ctx: &RuleContext<'_>, out: &mut Vec<CategorizedMessage>) {
    for (controller, mppt) in ctx.index.mppts() {
        let assigned: Vec<_> = ctx.index.arrays_assigned_to(&controller.id).collect();
        if assigned.is_empty() {
            push(
                out,
                MessageLevel::Warn,
                format!(
                    "Charge controller \"{}\" has no array configurations assigned.",
                    controller.name
                ),
            );
            continue;
        }

        let mut total_isc = 0.0_f64;
        let mut total_pmax = 0.0_f64;

        for (array_component, array) in &assigned {
            let Some(panel) = ctx.index.panel(array.selected_panel_id.as_ref()) else {
                continue;
            };
            let series = array.panels_in_series;
            let strings = f64::from(array.number_of_strings.unwrap_or(0));

            total_isc += or_zero(panel.isc) * strings;
            total_pmax += or_zero(panel.pmax) * f64::from(series.unwrap_or(0)) * strings;

            let (Some(voc), Some(series), Some(max_v)) =
                (panel.voc, series, mppt.max_input_voltage)
            else {
                continue;
            };
            let array_voc = voc * f64::from(series);

            if array_voc > max_v {
                push(
                    out,
                    MessageLevel::Error,
                    format!(
                        "Array \"{}\" open-circuit voltage of {array_voc:.1} V exceeds the \
                         {max_v:.1} V maximum input voltage of charge controller \"{}\".",
                        array_component.name, controller.name
                    ),
                );
            } else if array_voc * MIN_VOLTAGE_MARGIN > max_v {
                push(
                    out,
                    MessageLevel::WarnSafety,
                    format!(
                        "Array \"{}\" open-circuit voltage of {array_voc:.1} V leaves less than \
                         the minimum 10% safety margin below the {max_v:.1} V limit of charge \
                         controller \"{}\". Cold weather can raise Voc above the limit.",
                        array_component.name, controller.name
                    ),
                );
            } else if array_voc * IDEAL_VOLTAGE_MARGIN > max_v {
                push(
                    out,
                    MessageLevel::InfoSafety,
                    format!(
                        "Array \"{}\" open-circuit voltage of {array_voc:.1} V meets the 10% \
                         minimum margin but is below the ideal 20% margin for the {max_v:.1} V \
                         limit of charge controller \"{}\".",
                        array_component.name, controller.name
                    ),
                );
            }
        }

        if let Some(max_i) = mppt.max_input_current {
            if total_isc > 0.0 {
                if total_isc > max_i {
                    push(
                        out,
                        MessageLevel::Error,
                        format!(
                            "Combined short-circuit current of {total_isc:.1} A exceeds the \
                             {max_i:.1} A maximum input current of charge controller \"{}\".",
                            controller.name
                        ),
                    );
                } else if total_isc >= max_i * NEAR_LIMIT_FRACTION {
                    push(
                        out,
                        MessageLevel::WarnSizing,
                        format!(
                            "Combined short-circuit current of {total_isc:.1} A is within 90-100% \
                             of the {max_i:.1} A maximum input current of charge controller \"{}\".",
                            controller.name
                        ),
                    );
                }
            }
        }

        if let Some(capacity_w) = mppt.output_capacity_w() {
            if total_pmax > capacity_w * SIGNIFICANT_CLIPPING_RATIO {
                push(
                    out,
                    MessageLevel::WarnSizing,
                    format!(
                        "Array power of {total_pmax:.0} W is more than 125% of the estimated \
                         {capacity_w:.0} W output capacity of charge controller \"{}\"; expect \
                         significant clipping.",
                        controller.name
                    ),
                );
            } else if total_pmax > capacity_w {
                push(
                    out,
                    MessageLevel::Info,
                    format!(
                        "Array power of {total_pmax:.0} W exceeds the estimated {capacity_w:.0} W \
                         output capacity of charge controller \"{}\"; minor clipping at peak sun.",
                        controller.name
                    ),
                );
            }
        }
    }
}

fn battery_currents(ctx: &RuleContext<'_>, out: &mut Vec<CategorizedMessage>) {
    // Every controller's rating counts, assigned or not.
    let total_charge_current: f64 = ctx
        .index
        .mppts()
        .map(|(_, mppt)| or_zero(mppt.max_output_current))
        .sum();
    let total_inverter_power = ctx.stats.total_inverter_power;

    for (component, battery) in ctx.index.batteries() {
        if let Some(max_charge) = battery.max_charge_current {
            if total_charge_current > 0.0 {
                if total_charge_current > max_charge {
                    push(
                        out,
                        MessageLevel::Error,
                        format!(
                            "Combined charge controller output of {total_charge_current:.1} A \
                             exceeds the {max_charge:.1} A maximum charge current of battery \"{}\".",
                            component.name
                        ),
                    );
                } else if total_charge_current >= max_charge * NEAR_LIMIT_FRACTION {
                    push(
                        out,
                        MessageLevel::WarnCRate,
                        format!(
                            "Combined charge controller output of {total_charge_current:.1} A is \
                             within 90-100% of the {max_charge:.1} A maximum charge current of \
                             battery \"{}\".",
                            component.name
                        ),
                    );
                }
            }
        }

        let (Some(volts), Some(max_discharge)) = (
            positive(battery.nominal_voltage),
            positive(battery.max_discharge_current),
        ) else {
            continue;
        };
        let discharge_current = total_inverter_power / volts;
        if discharge_current <= 0.0 {
            continue;
        }
        if discharge_current > max_discharge {
            push(
                out,
                MessageLevel::Error,
                format!(
                    "Estimated inverter draw of {discharge_current:.1} A exceeds the \
                     {max_discharge:.1} A maximum discharge current of battery \"{}\".",
                    component.name
                ),
            );
        } else if discharge_current >= max_discharge * NEAR_LIMIT_FRACTION {
            push(
                out,
                MessageLevel::WarnCRate,
                format!(
                    "Estimated inverter draw of {discharge_current:.1} A is within 90-100% of the \
                     {max_discharge:.1} A maximum discharge current of battery \"{}\".",
                    component.name
                ),
            );
        }
    }
}

fn inverter_input_window(ctx: &RuleContext<'_>, out: &mut Vec<CategorizedMessage>) {
    let v = ctx.inputs.system_wide_voltage;
    for (component, inverter) in ctx.index.inverters() {
        if let Some(min) = inverter.input_voltage_min {
            if v < min {
                push(
                    out,
                    MessageLevel::Error,
                    format!(
                        "System voltage of {v:.1} V is below the {min:.1} V minimum input voltage \
                         of inverter \"{}\".",
                        component.name
                    ),
                );
            } else if v <= min * (1.0 + INVERTER_WINDOW_EDGE) {
                push(
                    out,
                    MessageLevel::WarnSizing,
                    format!(
                        "System voltage of {v:.1} V is within 5% of the {min:.1} V minimum input \
                         voltage of inverter \"{}\"; low battery states may trip it.",
                        component.name
                    ),
                );
            }
        }
        if let Some(max) = inverter.input_voltage_max {
            if v > max {
                push(
                    out,
                    MessageLevel::Error,
                    format!(
                        "System voltage of {v:.1} V is above the {max:.1} V maximum input voltage \
                         of inverter \"{}\".",
                        component.name
                    ),
                );
            } else if v >= max * (1.0 - INVERTER_WINDOW_EDGE) {
                push(
                    out,
                    MessageLevel::WarnSizing,
                    format!(
                        "System voltage of {v:.1} V is within 5% of the {max:.1} V maximum input \
                         voltage of inverter \"{}\"; charging voltages may exceed it.",
                        component.name
                    ),
                );
            }
        }
    }
}

fn production_sanity(ctx: &RuleContext<'_>, out: &mut Vec<CategorizedMessage>) {
    if ctx.index.is_empty() {
        return;
    }
    let stats = ctx.stats;

    if ctx.index.arrays().next().is_some() && stats.total_solar_power == 0.0 {
        push(
            out,
            MessageLevel::Warn,
            "Array configurations exist but total solar power is 0 W. Check that each array \
             selects a panel with a Pmax value and has valid series and string counts."
                .to_string(),
        );
    }

    if ctx.inputs.estimated_daily_usage_wh <= 0.0 {
        push(
            out,
            MessageLevel::Warn,
            "Estimated daily usage is 0 Wh, so autonomy and energy balance cannot be assessed."
                .to_string(),
        );
    }

    let autonomy = stats.estimated_battery_autonomy_days;
    if autonomy > 0.0 && autonomy < LOW_AUTONOMY_DAYS {
        push(
            out,
            MessageLevel::WarnSizing,
            format!(
                "Battery autonomy of {autonomy:.2} days is under half a day; the bank may not \
                 carry the load through one night."
            ),
        );
    }

    if let Some(pct) = stats.production_to_consumption_ratio_percentage.percent() {
        if pct < LOW_PRODUCTION_PCT {
            push(
                out,
                MessageLevel::WarnSizing,
                format!(
                    "Estimated daily solar production covers only {pct:.0}% of daily \
                     consumption; consider adding panels."
                ),
            );
        } else if pct > HIGH_PRODUCTION_PCT {
            push(
                out,
                MessageLevel::Info,
                format!(
                    "Estimated daily solar production is {pct:.0}% of daily consumption, \
                     leaving a comfortable surplus."
                ),
            );
        }
    }
}

fn general_notes(_ctx: &RuleContext<'_>, out: &mut Vec<CategorizedMessage>) {
    push(
        out,
        MessageLevel::Info,
        "Calculations assume idealized wiring with no voltage drop, temperature derating or \
         shading losses; treat results as planning estimates."
            .to_string(),
    );
    push(
        out,
        MessageLevel::InfoSafety,
        "Follow applicable electrical codes and manufacturer instructions, and have the \
         installation inspected by a qualified electrician."
            .to_string(),
    );
}

/// Overall verdict; the only pass that reads earlier messages.
fn rollup(ctx: &RuleContext<'_>, out: &mut Vec<CategorizedMessage>) {
    if ctx.index.is_empty() {
        return;
    }
    let errors = out
        .iter()
        .filter(|m| m.level == MessageLevel::Error)
        .count();
    let warnings = out.iter().filter(|m| m.level.is_warning()).count();

    if errors > 0 {
        push(
            out,
            MessageLevel::Error,
            format!(
                "Found {} that must be resolved before this system is safe to build.",
                plural(errors, "critical issue")
            ),
        );
    } else if warnings > 0 {
        push(
            out,
            MessageLevel::Warn,
            format!(
                "No critical issues, but {} should be reviewed.",
                plural(warnings, "warning")
            ),
        );
    } else {
        push(
            out,
            MessageLevel::Info,
            "All checked components look compatible under the current assumptions.".to_string(),
        );
    }
}
