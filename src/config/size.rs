//! Human-readable size notation ("500M", "1G") vs. the raw byte counts the
//! rotation threshold operates on.

/// Recognized suffixes, longest first so "GB" wins over "G".
const UNITS: [(&str, u64); 6] = [
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
    ("G", 1 << 30),
    ("M", 1 << 20),
    ("K", 1 << 10),
];

/// Parses "500M"/"1G"-style notation into bytes (multiples of 1024).
///
/// Fractions are allowed ("1.5K" is 1536); negative, infinite, and NaN
/// values are rejected rather than collapsed to zero.
#[must_use]
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim().to_uppercase();
    let (number, unit) = UNITS
        .iter()
        .find_map(|(suffix, unit)| s.strip_suffix(suffix).map(|rest| (rest, *unit)))
        .unwrap_or((s.as_str(), 1));

    let value: f64 = number.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    Some((value * unit as f64) as u64)
}

/// Renders a byte count back into human-readable units.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    let value = bytes as f64;
    match bytes {
        b if b >= 1 << 30 => format!("{:.2} GB", value / (1u64 << 30) as f64),
        b if b >= 1 << 20 => format!("{:.2} MB", value / (1u64 << 20) as f64),
        b if b >= 1 << 10 => format!("{:.2} KB", value / (1u64 << 10) as f64),
        _ => format!("{bytes} B"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_sizes_scale() {
        assert_eq!(parse_size("1.5K"), Some(1536));
        assert_eq!(parse_size("0.5MB"), Some(512 * 1024));
    }

    #[test]
    fn negative_and_non_finite_are_rejected() {
        assert_eq!(parse_size("-1K"), None);
        assert_eq!(parse_size("-0.5"), None);
        assert_eq!(parse_size("inf"), None);
        assert_eq!(parse_size("nan"), None);
    }
}
