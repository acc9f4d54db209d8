use crate::components::types::{
    ComponentId, ComponentSpec, ComponentType, Properties, properties_from,
};
use crate::numeric::count;

/// Property naming the panel model used by an array.
pub const SELECTED_PANEL_ID: &str = "selectedPanelId";
/// Property naming the charge controller an array feeds.
pub const ASSIGNED_MPPT_ID: &str = "assignedMpptId";

/// A series/parallel arrangement of one panel model feeding one controller.
///
/// Both references are soft: they name other components by id and may
/// dangle. Resolution happens at evaluation time through
/// [`crate::engine::index::ComponentIndex`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayConfig {
    /// Panel model used in every position of the array.
    pub selected_panel_id: Option<ComponentId>,
    /// Panels wired in series per string.
    pub panels_in_series: Option<u32>,
    /// Strings wired in parallel.
    pub number_of_strings: Option<u32>,
    /// Charge controller this array is wired to.
    pub assigned_mppt_id: Option<ComponentId>,
}

impl ArrayConfig {
    /// Total panel count, when both dimensions are known.
    pub fn panel_count(&self) -> Option<u32> {
        Some(self.panels_in_series?.saturating_mul(self.number_of_strings?))
    }
}

impl ComponentSpec for ArrayConfig {
    const KIND: ComponentType = ComponentType::ArrayConfig;
    const FIELDS: &'static [&'static str] = &[
        SELECTED_PANEL_ID,
        "panelsInSeries",
        "numberOfStrings",
        ASSIGNED_MPPT_ID,
    ];

    fn from_properties(props: &Properties) -> Self {
        let reference = |field: &str| {
            props
                .get(field)
                .and_then(|v| ComponentId::from_reference(v))
        };
        Self {
            selected_panel_id: reference(SELECTED_PANEL_ID),
            panels_in_series: count(props, "panelsInSeries"),
            number_of_strings: count(props, "numberOfStrings"),
            assigned_mppt_id: reference(ASSIGNED_MPPT_ID),
        }
    }

    fn default_properties() -> Properties {
        properties_from(&[
            (SELECTED_PANEL_ID, ""),
            ("panelsInSeries", "1"),
            ("numberOfStrings", "1"),
            (ASSIGNED_MPPT_ID, ""),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_unassigned_single_panel() {
        let a = ArrayConfig::from_properties(&ArrayConfig::default_properties());
        assert_eq!(a.selected_panel_id, None);
        assert_eq!(a.assigned_mppt_id, None);
        assert_eq!(a.panel_count(), Some(1));
    }

    #[test]
    fn counts_tolerate_partial_input() {
        let props = properties_from(&[
            (SELECTED_PANEL_ID, "panel-1"),
            ("panelsInSeries", " 3 "),
            ("numberOfStrings", "two"),
        ]);
        let a = ArrayConfig::from_properties(&props);
        assert_eq!(a.selected_panel_id, Some(ComponentId::from("panel-1")));
        assert_eq!(a.panels_in_series, Some(3));
        assert_eq!(a.number_of_strings, None);
        assert_eq!(a.panel_count(), None);
    }
}
