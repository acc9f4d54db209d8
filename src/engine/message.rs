//! Categorized diagnostic messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a diagnostic message.
///
/// The `warn-*` and `info-*` variants name the cause; [`MessageLevel::severity`]
/// collapses them for consumers that group post hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageLevel {
    /// Hard compatibility or safety violation.
    #[serde(rename = "error")]
    Error,
    /// Below the minimum voltage headroom.
    #[serde(rename = "warn-safety")]
    WarnSafety,
    /// Component sized at or near its limit.
    #[serde(rename = "warn-sizing")]
    WarnSizing,
    /// Charge or discharge current near a battery's rating.
    #[serde(rename = "warn-c-rate")]
    WarnCRate,
    /// Generic caution.
    #[serde(rename = "warn")]
    Warn,
    /// Safety reminder, not a measured risk.
    #[serde(rename = "info-safety")]
    InfoSafety,
    /// Neutral observation.
    #[serde(rename = "info")]
    Info,
}

/// Coarse severity for grouping; ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl MessageLevel {
    pub fn severity(self) -> Severity {
        match self {
            MessageLevel::Error => Severity::Error,
            MessageLevel::WarnSafety
            | MessageLevel::WarnSizing
            | MessageLevel::WarnCRate
            | MessageLevel::Warn => Severity::Warning,
            MessageLevel::InfoSafety | MessageLevel::Info => Severity::Info,
        }
    }

    /// The interchange tag (`"warn-c-rate"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            MessageLevel::Error => "error",
            MessageLevel::WarnSafety => "warn-safety",
            MessageLevel::WarnSizing => "warn-sizing",
            MessageLevel::WarnCRate => "warn-c-rate",
            MessageLevel::Warn => "warn",
            MessageLevel::InfoSafety => "info-safety",
            MessageLevel::Info => "info",
        }
    }

    pub fn is_warning(self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully formatted, human-readable diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl CategorizedMessage {
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for CategorizedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.text)
    }
}

/// Groups messages by severity, most severe group first.
///
/// Rule order is preserved inside each group; empty groups are omitted.
pub fn group_by_severity(
    messages: &[CategorizedMessage],
) -> Vec<(Severity, Vec<&CategorizedMessage>)> {
    [Severity::Error, Severity::Warning, Severity::Info]
        .into_iter()
        .filter_map(|severity| {
            let group: Vec<&CategorizedMessage> = messages
                .iter()
                .filter(|m| m.level.severity() == severity)
                .collect();
            (!group.is_empty()).then_some((severity, group))
        })
        .collect()
}
