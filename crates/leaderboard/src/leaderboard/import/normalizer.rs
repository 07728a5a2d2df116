pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn normalize_header(value: &str) -> String {
    normalize_text(value)
        .to_lowercase()
        .replace([' ', '-'], "_")
}

/// Parse a non-negative whole number as spreadsheets tend to write it:
/// `1,583,626`, `1583626`, or `1583626.0`.
pub(crate) fn parse_count(value: &str) -> Option<u64> {
    let compact: String = value
        .chars()
        .filter(|ch| *ch != ',' && !ch.is_whitespace())
        .collect();
    if compact.is_empty() {
        return None;
    }

    if let Ok(count) = compact.parse::<u64>() {
        return Some(count);
    }

    let float = compact.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 && float <= u64::MAX as f64 {
        Some(float as u64)
    } else {
        None
    }
}
