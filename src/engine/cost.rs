//! Bill-of-materials cost roll-up from the optional `costUsd` fields.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::index::ComponentIndex;
use crate::components::{ComponentId, ComponentView};
use crate::numeric::or_zero;

/// Cost totals per component category (USD).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    /// Panel unit price times panels placed in arrays.
    pub panels_usd: f64,
    pub controllers_usd: f64,
    pub batteries_usd: f64,
    pub inverters_usd: f64,
    pub total_usd: f64,
    /// Components (other than array configurations) with no price entered.
    pub unpriced_components: usize,
}

impl CostSummary {
    pub fn from_index(index: &ComponentIndex<'_>) -> Self {
        // panels placed per panel id
        let mut placed: HashMap<&ComponentId, u64> = HashMap::new();
        for (_, array) in index.arrays() {
            if index.panel(array.selected_panel_id.as_ref()).is_none() {
                continue;
            }
            if let (Some(id), Some(n)) = (array.selected_panel_id.as_ref(), array.panel_count()) {
                *placed.entry(id).or_insert(0) += u64::from(n);
            }
        }

        let mut summary = Self::default();
        for entry in index.entries() {
            let price = entry.view.cost_usd();
            if price.is_none() && !matches!(entry.view, ComponentView::ArrayConfig(_)) {
                summary.unpriced_components += 1;
            }
            let price = or_zero(price);
            match &entry.view {
                ComponentView::Panel(_) => {
                    let n = placed.get(&entry.component.id).copied().unwrap_or(0);
                    summary.panels_usd += price * n as f64;
                }
                ComponentView::ArrayConfig(_) => {}
                ComponentView::Mppt(_) => summary.controllers_usd += price,
                ComponentView::Battery(_) => summary.batteries_usd += price,
                ComponentView::Inverter(_) => summary.inverters_usd += price,
            }
        }
        summary.total_usd = summary.panels_usd
            + summary.controllers_usd
            + summary.batteries_usd
            + summary.inverters_usd;
        summary
    }
}

impl fmt::Display for CostSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Cost Estimate ---")?;
        writeln!(f, "Panels:       ${:.2}", self.panels_usd)?;
        writeln!(f, "Controllers:  ${:.2}", self.controllers_usd)?;
        writeln!(f, "Batteries:    ${:.2}", self.batteries_usd)?;
        writeln!(f, "Inverters:    ${:.2}", self.inverters_usd)?;
        write!(f, "Total:        ${:.2}", self.total_usd)?;
        if self.unpriced_components > 0 {
            write!(f, " ({} component(s) without a price)", self.unpriced_components)?;
        }
        Ok(())
    }
}
