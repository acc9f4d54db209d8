//! Id-indexed lookup over one snapshot of the component collection.

use std::collections::HashMap;

use crate::components::{
    ArrayConfig, Battery, Component, ComponentId, ComponentView, Inverter, Mppt, Panel,
};

/// One component paired with its parsed view.
#[derive(Debug, Clone)]
pub struct Entry<'a> {
    pub component: &'a Component,
    pub view: ComponentView,
}

/// Parsed components in stored order plus an id lookup table.
///
/// Built once per evaluation and shared by the aggregator and the
/// diagnostics rules. References are resolved here and only here: a
/// dangling id or an id of the wrong kind resolves to `None`.
#[derive(Debug, Clone)]
pub struct ComponentIndex<'a> {
    entries: Vec<Entry<'a>>,
    by_id: HashMap<&'a str, usize>,
}

impl<'a> ComponentIndex<'a> {
    pub fn new(components: &'a [Component]) -> Self {
        let mut by_id = HashMap::with_capacity(components.len());
        let entries = components
            .iter()
            .enumerate()
            .map(|(i, component)| {
                // first occurrence wins on duplicate ids
                by_id.entry(component.id.as_str()).or_insert(i);
                Entry {
                    component,
                    view: component.view(),
                }
            })
            .collect();
        Self { entries, by_id }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All entries in stored order.
    pub fn entries(&self) -> &[Entry<'a>] {
        &self.entries
    }

    pub fn get(&self, id: &ComponentId) -> Option<&Entry<'a>> {
        self.by_id.get(id.as_str()).map(|&i| &self.entries[i])
    }

    /// Resolves a panel reference; unassigned, dangling, and wrong-kind ids yield `None`.
    pub fn panel(&self, id: Option<&ComponentId>) -> Option<&Panel> {
        let id = id?;
        match self.get(id).map(|e| &e.view) {
            Some(ComponentView::Panel(p)) => Some(p),
            Some(other) => {
                log::debug!("reference {id} points at a {:?}, not a panel", other.kind());
                None
            }
            None => {
                log::debug!("dangling panel reference {id}");
                None
            }
        }
    }

    /// Resolves a controller reference under the same rules as [`Self::panel`].
    pub fn mppt(&self, id: Option<&ComponentId>) -> Option<&Mppt> {
        let id = id?;
        match self.get(id).map(|e| &e.view) {
            Some(ComponentView::Mppt(m)) => Some(m),
            _ => {
                log::debug!("reference {id} does not resolve to a charge controller");
                None
            }
        }
    }

    pub fn arrays(&self) -> impl Iterator<Item = (&'a Component, &ArrayConfig)> + '_ {
        self.entries.iter().filter_map(|e| match &e.view {
            ComponentView::ArrayConfig(a) => Some((e.component, a)),
            _ => None,
        })
    }

    pub fn mppts(&self) -> impl Iterator<Item = (&'a Component, &Mppt)> + '_ {
        self.entries.iter().filter_map(|e| match &e.view {
            ComponentView::Mppt(m) => Some((e.component, m)),
            _ => None,
        })
    }

    pub fn batteries(&self) -> impl Iterator<Item = (&'a Component, &Battery)> + '_ {
        self.entries.iter().filter_map(|e| match &e.view {
            ComponentView::Battery(b) => Some((e.component, b)),
            _ => None,
        })
    }

    pub fn inverters(&self) -> impl Iterator<Item = (&'a Component, &Inverter)> + '_ {
        self.entries.iter().filter_map(|e| match &e.view {
            ComponentView::Inverter(i) => Some((e.component, i)),
            _ => None,
        })
    }

    /// Arrays wired to the given controller, in stored order.
    pub fn arrays_assigned_to<'s>(
        &'s self,
        mppt_id: &'s ComponentId,
    ) -> impl Iterator<Item = (&'a Component, &'s ArrayConfig)> + 's {
        self.arrays()
            .filter(move |(_, a)| a.assigned_mppt_id.as_ref() == Some(mppt_id))
    }
}
