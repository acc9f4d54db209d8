//! Off-grid solar system planner: aggregate statistics and compatibility
//! diagnostics over a set of panels, arrays, charge controllers, batteries
//! and inverters.

pub mod components;
pub mod config;
/// Statistics, diagnostics, and cost evaluation.
pub mod engine;
/// CSV export.
pub mod io {
    pub mod export;
}
pub mod model;
pub mod numeric;
pub mod presets;
pub mod project;
