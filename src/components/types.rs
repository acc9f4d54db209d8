//! Common types shared by every component kind.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ArrayConfig, Battery, Inverter, Mppt, Panel};

/// Field name to textual value. Values stay text so partial user entry
/// survives; numeric reads go through [`crate::numeric`].
pub type Properties = BTreeMap<String, String>;

/// Stable identifier of a component within one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads an optional reference out of a text field; blank means unassigned.
    pub fn from_reference(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ComponentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The fixed `type` tag of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentType {
    Panel,
    ArrayConfig,
    Mppt,
    Battery,
    Inverter,
}

impl ComponentType {
    /// Every kind, in the order a host usually presents them.
    pub const ALL: [ComponentType; 5] = [
        ComponentType::Panel,
        ComponentType::ArrayConfig,
        ComponentType::Mppt,
        ComponentType::Battery,
        ComponentType::Inverter,
    ];

    /// Human-readable label used for default names.
    pub fn label(self) -> &'static str {
        match self {
            ComponentType::Panel => "Solar Panel",
            ComponentType::ArrayConfig => "Array Configuration",
            ComponentType::Mppt => "Charge Controller",
            ComponentType::Battery => "Battery",
            ComponentType::Inverter => "Inverter",
        }
    }

    /// Short prefix used when minting ids.
    pub fn slug(self) -> &'static str {
        match self {
            ComponentType::Panel => "panel",
            ComponentType::ArrayConfig => "array",
            ComponentType::Mppt => "mppt",
            ComponentType::Battery => "battery",
            ComponentType::Inverter => "inverter",
        }
    }

    /// Property fields declared by this kind.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            ComponentType::Panel => Panel::FIELDS,
            ComponentType::ArrayConfig => ArrayConfig::FIELDS,
            ComponentType::Mppt => Mppt::FIELDS,
            ComponentType::Battery => Battery::FIELDS,
            ComponentType::Inverter => Inverter::FIELDS,
        }
    }

    /// Type-appropriate starting values for a freshly created component.
    pub fn default_properties(self) -> Properties {
        match self {
            ComponentType::Panel => Panel::default_properties(),
            ComponentType::ArrayConfig => ArrayConfig::default_properties(),
            ComponentType::Mppt => Mppt::default_properties(),
            ComponentType::Battery => Battery::default_properties(),
            ComponentType::Inverter => Inverter::default_properties(),
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A typed, parsed view over one component kind's textual properties.
///
/// Implementors parse with the shared numeric policy, so a field that is
/// empty or malformed shows up as `None` rather than zero.
pub trait ComponentSpec: Sized {
    /// The tag this record belongs to.
    const KIND: ComponentType;

    /// Property names this kind reads, in display order.
    const FIELDS: &'static [&'static str];

    /// Parses the record from a property map. Never fails.
    fn from_properties(props: &Properties) -> Self;

    /// Default property set for a new component of this kind.
    fn default_properties() -> Properties;
}

/// Builds a property map from literal pairs.
pub(crate) fn properties_from(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// One entry of the component collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "crate::project::properties_as_text")]
    pub properties: Properties,
}

impl Component {
    /// Creates a component carrying its kind's default properties.
    pub fn new(id: impl Into<ComponentId>, kind: ComponentType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            properties: kind.default_properties(),
        }
    }

    /// Creates a component with no properties at all.
    pub fn bare(id: impl Into<ComponentId>, kind: ComponentType, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
            properties: Properties::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with(mut self, field: &str, value: impl ToString) -> Self {
        self.properties.insert(field.to_string(), value.to_string());
        self
    }

    /// Raw text of a property; missing fields read as empty.
    pub fn property(&self, field: &str) -> &str {
        self.properties.get(field).map(String::as_str).unwrap_or("")
    }

    /// Parses the component into its kind's typed record.
    pub fn view(&self) -> ComponentView {
        let p = &self.properties;
        match self.kind {
            ComponentType::Panel => ComponentView::Panel(Panel::from_properties(p)),
            ComponentType::ArrayConfig => {
                ComponentView::ArrayConfig(ArrayConfig::from_properties(p))
            }
            ComponentType::Mppt => ComponentView::Mppt(Mppt::from_properties(p)),
            ComponentType::Battery => ComponentView::Battery(Battery::from_properties(p)),
            ComponentType::Inverter => ComponentView::Inverter(Inverter::from_properties(p)),
        }
    }
}

/// Closed sum over the typed records, one variant per component kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentView {
    Panel(Panel),
    ArrayConfig(ArrayConfig),
    Mppt(Mppt),
    Battery(Battery),
    Inverter(Inverter),
}

impl ComponentView {
    pub fn kind(&self) -> ComponentType {
        match self {
            ComponentView::Panel(_) => ComponentType::Panel,
            ComponentView::ArrayConfig(_) => ComponentType::ArrayConfig,
            ComponentView::Mppt(_) => ComponentType::Mppt,
            ComponentView::Battery(_) => ComponentType::Battery,
            ComponentView::Inverter(_) => ComponentType::Inverter,
        }
    }

    /// Optional unit price carried by the record; arrays have none.
    pub fn cost_usd(&self) -> Option<f64> {
        match self {
            ComponentView::Panel(p) => p.cost_usd,
            ComponentView::ArrayConfig(_) => None,
            ComponentView::Mppt(m) => m.cost_usd,
            ComponentView::Battery(b) => b.cost_usd,
            ComponentView::Inverter(i) => i.cost_usd,
        }
    }
}
