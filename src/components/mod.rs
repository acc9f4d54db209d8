//! Component kinds that make up an off-grid installation.

/// Series/parallel panel arrangements.
pub mod array;
/// Battery bank members.
pub mod battery;
/// DC-to-AC inverters.
pub mod inverter;
/// MPPT charge controllers.
pub mod mppt;
/// Photovoltaic modules.
pub mod panel;
pub mod types;

pub use array::ArrayConfig;
pub use battery::Battery;
pub use inverter::Inverter;
pub use mppt::Mppt;
pub use panel::Panel;
pub use types::{Component, ComponentId, ComponentSpec, ComponentType, ComponentView, Properties};
