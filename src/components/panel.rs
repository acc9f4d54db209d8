use crate::components::types::{ComponentSpec, ComponentType, Properties, properties_from};
use crate::numeric::quantity;

/// A photovoltaic module rated at standard test conditions.
///
/// All electrical fields are optional: a panel whose `pmax` has not been
/// typed yet still resolves as a panel, it just contributes no power.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Panel {
    /// Open-circuit voltage (V).
    pub voc: Option<f64>,
    /// Short-circuit current (A).
    pub isc: Option<f64>,
    /// Voltage at maximum power (V).
    pub vmp: Option<f64>,
    /// Current at maximum power (A).
    pub imp: Option<f64>,
    /// Maximum power output (W).
    pub pmax: Option<f64>,
    /// Unit price (USD).
    pub cost_usd: Option<f64>,
    /// Voc temperature coefficient (%/°C).
    pub temp_coeff_voc_pct_per_c: Option<f64>,
    /// Pmax temperature coefficient (%/°C).
    pub temp_coeff_pmax_pct_per_c: Option<f64>,
}

impl ComponentSpec for Panel {
    const KIND: ComponentType = ComponentType::Panel;
    const FIELDS: &'static [&'static str] = &[
        "voc",
        "isc",
        "vmp",
        "imp",
        "pmax",
        "costUsd",
        "tempCoeffVocPctPerC",
        "tempCoeffPmaxPctPerC",
    ];

    fn from_properties(props: &Properties) -> Self {
        Self {
            voc: quantity(props, "voc"),
            isc: quantity(props, "isc"),
            vmp: quantity(props, "vmp"),
            imp: quantity(props, "imp"),
            pmax: quantity(props, "pmax"),
            cost_usd: quantity(props, "costUsd"),
            temp_coeff_voc_pct_per_c: quantity(props, "tempCoeffVocPctPerC"),
            temp_coeff_pmax_pct_per_c: quantity(props, "tempCoeffPmaxPctPerC"),
        }
    }

    fn default_properties() -> Properties {
        // Generic 100 W 12 V-class module.
        properties_from(&[
            ("voc", "22.6"),
            ("isc", "5.9"),
            ("vmp", "18.9"),
            ("imp", "5.3"),
            ("pmax", "100"),
            ("costUsd", ""),
            ("tempCoeffVocPctPerC", "-0.29"),
            ("tempCoeffPmaxPctPerC", "-0.39"),
        ])
    }
}
