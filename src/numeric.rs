//! Parse-or-absent policy for textual property values.
//!
//! Component fields are stored as text so that half-typed input survives
//! editing. Every numeric read in the crate goes through this module, which
//! keeps one distinction intact: an *absent* value (`None`) disqualifies the
//! check that depends on it, while a parsed zero takes part in sums.

use crate::components::Properties;

/// Parses a decimal quantity from text.
///
/// Surrounding whitespace is ignored. Empty, unparsable, and non-finite
/// values (`"inf"`, `"NaN"`) are absent.
///
/// # Examples
///
/// ```
/// use offgrid_planner::numeric::parse_quantity;
///
/// assert_eq!(parse_quantity(" 40.5 "), Some(40.5));
/// assert_eq!(parse_quantity(""), None);
/// assert_eq!(parse_quantity("abc"), None);
/// ```
pub fn parse_quantity(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            log::debug!("ignoring unparsable quantity {trimmed:?}");
            None
        }
    }
}

/// Parses a non-negative whole count (panels in series, string count).
///
/// Fractional input is truncated toward zero; negative input is absent.
pub fn parse_count(text: &str) -> Option<u32> {
    let v = parse_quantity(text)?;
    if v < 0.0 || v > f64::from(u32::MAX) {
        log::debug!("ignoring out-of-range count {v}");
        return None;
    }
    Some(v.trunc() as u32)
}

/// Reads a quantity field from a property map.
pub fn quantity(props: &Properties, field: &str) -> Option<f64> {
    props.get(field).and_then(|v| parse_quantity(v))
}

/// Reads a count field from a property map.
pub fn count(props: &Properties, field: &str) -> Option<u32> {
    props.get(field).and_then(|v| parse_count(v))
}

/// Absent contributes nothing to a sum.
pub fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

/// Returns `Some(v)` only for strictly positive values.
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_padded_numbers() {
        assert_eq!(parse_quantity("12"), Some(12.0));
        assert_eq!(parse_quantity("  -0.35\t"), Some(-0.35));
        assert_eq!(parse_quantity("1e3"), Some(1000.0));
    }

    #[test]
    fn empty_and_garbage_are_absent_not_zero() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("   "), None);
        assert_eq!(parse_quantity("12V"), None);
        assert_eq!(parse_quantity("NaN"), None);
        assert_eq!(parse_quantity("inf"), None);
    }

    #[test]
    fn zero_is_a_value() {
        assert_eq!(parse_quantity("0"), Some(0.0));
        assert_eq!(parse_count("0"), Some(0));
    }

    #[test]
    fn counts_truncate_and_reject_negative() {
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count("2.7"), Some(2));
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("x"), None);
    }

    #[test]
    fn map_reads_missing_field_as_absent() {
        let mut props = Properties::new();
        props.insert("voc".to_string(), "40".to_string());
        assert_eq!(quantity(&props, "voc"), Some(40.0));
        assert_eq!(quantity(&props, "isc"), None);
        assert_eq!(count(&props, "voc"), Some(40));
    }

    #[test]
    fn positive_filter() {
        assert_eq!(positive(Some(2.0)), Some(2.0));
        assert_eq!(positive(Some(0.0)), None);
        assert_eq!(positive(Some(-1.0)), None);
        assert_eq!(positive(None), None);
        assert_eq!(or_zero(None), 0.0);
    }
}
