//! End-to-end evaluation of small hand-built systems.

mod common;

use common::{array, battery, count_level, inverter, matching, mppt, panel};
use offgrid_planner::components::{Component, ComponentType};
use offgrid_planner::config::SystemInputs;
use offgrid_planner::engine::message::MessageLevel;
use offgrid_planner::engine::stats::{NominalVoltage, ProductionRatio};
use offgrid_planner::engine::{compute_stats, evaluate};
use offgrid_planner::model::SystemModel;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn single_array_power_and_daily_production() {
    let components = vec![
        panel("p", 40.0, 5.0, 200.0),
        array("a", "p", 2, 2, ""),
    ];
    let inputs = SystemInputs {
        peak_sun_hours: 4.5,
        solar_panel_efficiency: 80.0,
        ..SystemInputs::default()
    };
    let stats = compute_stats(&components, &inputs);
    assert_eq!(stats.total_solar_power, 800.0);
    assert!(close(stats.estimated_daily_solar_production_wh, 2880.0));
}

#[test]
fn arrays_without_any_controller_get_power_path_info() {
    let components = vec![
        panel("p", 40.0, 5.0, 200.0),
        array("a", "p", 2, 2, ""),
    ];
    let eval = evaluate(&components, &SystemInputs::default());
    assert_eq!(
        matching(&eval.messages, MessageLevel::Info, "power path").len(),
        1
    );
    assert!(matching(&eval.messages, MessageLevel::Warn, "not assigned").is_empty());
}

#[test]
fn unassigned_array_warns_once_a_controller_exists() {
    let components = vec![
        panel("p", 40.0, 5.0, 200.0),
        array("a", "p", 2, 2, ""),
        mppt("m", 150, 30.0, 40.0, 24.0),
    ];
    let eval = evaluate(&components, &SystemInputs::default());
    assert_eq!(
        matching(&eval.messages, MessageLevel::Warn, "not assigned").len(),
        1
    );
    assert_eq!(
        matching(
            &eval.messages,
            MessageLevel::Warn,
            "has no array configurations assigned"
        )
        .len(),
        1
    );
}

#[test]
fn over_voltage_string_is_one_error_without_margin_messages() {
    let components = vec![
        panel("p", 40.0, 5.0, 100.0),
        mppt("m", 150, 30.0, 30.0, 24.0),
        array("a", "p", 4, 1, "m"),
    ];
    let eval = evaluate(&components, &SystemInputs::default());
    assert_eq!(
        matching(&eval.messages, MessageLevel::Error, "open-circuit").len(),
        1
    );
    assert_eq!(count_level(&eval.messages, MessageLevel::WarnSafety), 0);
    assert!(
        matching(&eval.messages, MessageLevel::InfoSafety, "open-circuit").is_empty()
    );
    // the rollup reports it
    assert_eq!(
        eval.messages.last().map(|m| m.level),
        Some(MessageLevel::Error)
    );
}

#[test]
fn mixed_battery_voltages_report_first_seen() {
    let components = vec![battery("b1", 12.0, 100.0), battery("b2", 24.0, 100.0)];
    let eval = evaluate(&components, &SystemInputs::default());
    assert!(eval.stats.voltage_consistency_issue);
    assert_eq!(eval.stats.system_nominal_voltage, NominalVoltage::Volts(12.0));
    assert_eq!(
        matching(&eval.messages, MessageLevel::Error, "mixed nominal voltages").len(),
        1
    );
}

#[test]
fn empty_system_yields_nudge_and_two_notes() {
    let eval = evaluate(&[], &SystemInputs::default());
    let levels: Vec<MessageLevel> = eval.messages.iter().map(|m| m.level).collect();
    assert_eq!(
        levels,
        vec![MessageLevel::Info, MessageLevel::Info, MessageLevel::InfoSafety]
    );
    assert!(eval.messages[0].text.contains("No components"));
}

#[test]
fn voc_exactly_at_minimum_margin_is_not_a_warning() {
    let limit = format!("{}", 40.0_f64 * 1.10);
    let at_margin = vec![
        panel("p", 40.0, 5.0, 100.0),
        mppt("m", &limit, 30.0, 30.0, 24.0),
        array("a", "p", 1, 1, "m"),
    ];
    let eval = evaluate(&at_margin, &SystemInputs::default());
    assert_eq!(count_level(&eval.messages, MessageLevel::WarnSafety), 0);

    let above = vec![
        panel("p", 41.0, 5.0, 100.0),
        mppt("m", &limit, 30.0, 30.0, 24.0),
        array("a", "p", 1, 1, "m"),
    ];
    let eval = evaluate(&above, &SystemInputs::default());
    assert_eq!(count_level(&eval.messages, MessageLevel::WarnSafety), 1);
    assert!(matching(&eval.messages, MessageLevel::Error, "open-circuit").is_empty());
}

#[test]
fn dangling_panel_reference_contributes_nothing() {
    let components = vec![
        panel("p", 40.0, 5.0, 300.0),
        array("a", "ghost", 3, 2, ""),
    ];
    let eval = evaluate(&components, &SystemInputs::default());
    assert_eq!(eval.stats.total_solar_power, 0.0);
    assert_eq!(
        matching(&eval.messages, MessageLevel::Warn, "total solar power is 0 W").len(),
        1
    );
}

#[test]
fn malformed_numbers_disable_dependent_checks() {
    let components = vec![
        panel("p", 40.0, 5.0, 100.0).with("voc", "forty"),
        mppt("m", "", 30.0, 30.0, 24.0),
        array("a", "p", 4, 1, "m"),
        battery("b", 24.0, 100.0).with("maxChargeCurrent", "   "),
    ];
    let eval = evaluate(&components, &SystemInputs::default());
    assert!(matching(&eval.messages, MessageLevel::Error, "open-circuit").is_empty());
    assert!(matching(&eval.messages, MessageLevel::Error, "charge current").is_empty());
    assert_eq!(eval.stats.total_solar_power, 400.0);
}

#[test]
fn zero_usage_marks_ratio_not_applicable() {
    let components = vec![
        panel("p", 40.0, 5.0, 100.0),
        array("a", "p", 1, 1, ""),
    ];
    let inputs = SystemInputs {
        estimated_daily_usage_wh: 0.0,
        ..SystemInputs::default()
    };
    let eval = evaluate(&components, &inputs);
    assert_eq!(
        eval.stats.production_to_consumption_ratio_percentage,
        ProductionRatio::NotApplicable
    );
    assert_eq!(
        matching(&eval.messages, MessageLevel::Warn, "daily usage is 0 Wh").len(),
        1
    );
}

#[test]
fn battery_only_with_zero_usage_reports_low_production() {
    let components = vec![battery("b", 24.0, 100.0)];
    let inputs = SystemInputs {
        estimated_daily_usage_wh: 0.0,
        ..SystemInputs::default()
    };
    let eval = evaluate(&components, &inputs);
    assert_eq!(
        eval.stats.production_to_consumption_ratio_percentage,
        ProductionRatio::Percent(0.0)
    );
    assert_eq!(count_level(&eval.messages, MessageLevel::WarnSizing), 1);
    assert_eq!(
        matching(&eval.messages, MessageLevel::WarnSizing, "covers only 0%").len(),
        1
    );
}

#[test]
fn inverter_outside_window_and_near_edge() {
    let components = vec![battery("b", 24.0, 200.0), inverter("i", 1000.0)];
    let low = SystemInputs {
        system_wide_voltage: 12.0,
        ..SystemInputs::default()
    };
    let eval = evaluate(&components, &low);
    assert_eq!(
        matching(&eval.messages, MessageLevel::Error, "minimum input").len(),
        1
    );

    let near_max = SystemInputs {
        system_wide_voltage: 31.0,
        ..SystemInputs::default()
    };
    let eval = evaluate(&components, &near_max);
    assert_eq!(
        matching(&eval.messages, MessageLevel::WarnSizing, "maximum input").len(),
        1
    );
}

#[test]
fn duplicate_ids_resolve_to_first_component() {
    let components = vec![
        panel("p", 40.0, 5.0, 100.0),
        panel("p", 40.0, 5.0, 500.0),
        array("a", "p", 1, 1, ""),
    ];
    let stats = compute_stats(&components, &SystemInputs::default());
    assert_eq!(stats.total_solar_power, 100.0);
}

#[test]
fn cloned_array_starts_unassigned_in_evaluation() {
    let mut model = SystemModel::new();
    let p = model.add(ComponentType::Panel);
    let m = model.add(ComponentType::Mppt);
    let a = model.add(ComponentType::ArrayConfig);
    assert!(model.set_property(&a, "selectedPanelId", p.as_str()).is_ok());
    assert!(model.set_property(&a, "assignedMpptId", m.as_str()).is_ok());
    assert!(model.duplicate(&a).is_ok());

    let eval = model.evaluate();
    // both arrays produce power, only the clone is unassigned
    assert_eq!(eval.stats.total_solar_power, 200.0);
    let unassigned = matching(&eval.messages, MessageLevel::Warn, "not assigned");
    assert_eq!(unassigned.len(), 1);
    assert!(unassigned[0].text.contains("(copy)"));
}

#[test]
fn evaluation_is_stable_for_partially_typed_components() {
    let components = vec![
        Component::bare("p", ComponentType::Panel, "P"),
        Component::bare("a", ComponentType::ArrayConfig, "A"),
        Component::bare("m", ComponentType::Mppt, "M"),
        Component::bare("b", ComponentType::Battery, "B"),
        Component::bare("i", ComponentType::Inverter, "I"),
    ];
    let eval = evaluate(&components, &SystemInputs::default());
    assert_eq!(eval.stats.total_solar_power, 0.0);
    assert_eq!(eval.stats.system_nominal_voltage, NominalVoltage::NotAvailable);
    assert!(!eval.messages.is_empty());
}
