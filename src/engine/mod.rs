//! Evaluation engine: statistics aggregation followed by diagnostics.
//!
//! Both stages are pure functions of one snapshot of components and
//! assumptions. Nothing is cached between calls, so re-evaluating after every
//! edit is always safe.

/// Bill-of-materials cost roll-up.
pub mod cost;
/// Ordered compatibility rules.
pub mod diagnostics;
/// Id-indexed lookup used to resolve soft references.
pub mod index;
pub mod message;
/// Aggregate electrical statistics.
pub mod stats;

use serde::Serialize;

use crate::components::Component;
use crate::config::SystemInputs;
use cost::CostSummary;
use index::ComponentIndex;
use message::CategorizedMessage;
use stats::SystemStats;

/// Everything derived from one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub stats: SystemStats,
    pub messages: Vec<CategorizedMessage>,
    pub cost: CostSummary,
}

/// Computes statistics for a component collection.
///
/// # Examples
///
/// ```
/// use offgrid_planner::components::{Component, ComponentType};
/// use offgrid_planner::config::SystemInputs;
/// use offgrid_planner::engine::compute_stats;
///
/// let components = vec![
///     Component::bare("p", ComponentType::Panel, "Panel").with("pmax", 200),
///     Component::bare("a", ComponentType::ArrayConfig, "Roof")
///         .with("selectedPanelId", "p")
///         .with("panelsInSeries", 2)
///         .with("numberOfStrings", 2),
/// ];
/// let stats = compute_stats(&components, &SystemInputs::default());
/// assert_eq!(stats.total_solar_power, 800.0);
/// ```
pub fn compute_stats(components: &[Component], inputs: &SystemInputs) -> SystemStats {
    SystemStats::from_index(&ComponentIndex::new(components), inputs)
}

/// Runs the diagnostics pipeline against previously computed statistics.
pub fn run_diagnostics(
    components: &[Component],
    stats: &SystemStats,
    inputs: &SystemInputs,
) -> Vec<CategorizedMessage> {
    diagnostics::run_diagnostics(&ComponentIndex::new(components), stats, inputs)
}

/// Full evaluation: statistics, diagnostics, and cost, sharing one index.
pub fn evaluate(components: &[Component], inputs: &SystemInputs) -> Evaluation {
    let index = ComponentIndex::new(components);
    let stats = SystemStats::from_index(&index, inputs);
    let messages = diagnostics::run_diagnostics(&index, &stats, inputs);
    let cost = CostSummary::from_index(&index);
    log::debug!(
        "evaluated {} component(s): {} message(s)",
        index.len(),
        messages.len()
    );
    Evaluation {
        stats,
        messages,
        cost,
    }
}
