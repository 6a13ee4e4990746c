//! Conversions between textual fractions and decimals.
//!
//! Inputs that cannot be evaluated are never an error: the evaluator hands
//! back the literal text so recipes keep whatever the author wrote.

/// Common cooking fractions, in the order they are tried
pub const COMMON_FRACTIONS: [(u32, u32); 15] = [
    (1, 2),
    (1, 4),
    (3, 4),
    (1, 3),
    (2, 3),
    (1, 8),
    (3, 8),
    (5, 8),
    (7, 8),
    (1, 6),
    (5, 6),
    (1, 12),
    (5, 12),
    (7, 12),
    (11, 12),
];

static VULGAR_FRACTIONS: [(char, f64); 18] = [
    ('½', 1.0 / 2.0),
    ('¼', 1.0 / 4.0),
    ('¾', 3.0 / 4.0),
    ('⅓', 1.0 / 3.0),
    ('⅔', 2.0 / 3.0),
    ('⅕', 1.0 / 5.0),
    ('⅖', 2.0 / 5.0),
    ('⅗', 3.0 / 5.0),
    ('⅘', 4.0 / 5.0),
    ('⅙', 1.0 / 6.0),
    ('⅚', 5.0 / 6.0),
    ('⅐', 1.0 / 7.0),
    ('⅛', 1.0 / 8.0),
    ('⅜', 3.0 / 8.0),
    ('⅝', 5.0 / 8.0),
    ('⅞', 7.0 / 8.0),
    ('⅑', 1.0 / 9.0),
    ('⅒', 1.0 / 10.0),
];

fn vulgar_value(c: char) -> Option<f64> {
    VULGAR_FRACTIONS
        .iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, value)| *value)
}

/// Value of the first vulgar fraction glyph plus the digits right before it
fn evaluate_vulgar(text: &str) -> Option<f64> {
    let (index, fraction) = text
        .char_indices()
        .find_map(|(i, c)| vulgar_value(c).map(|v| (i, v)))?;

    let prefix = text[..index].trim_end();
    let digits_start = prefix
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map_or(prefix.len(), |(i, _)| i);
    let whole = prefix[digits_start..].parse::<f64>().unwrap_or(0.0);

    Some(whole + fraction)
}

/// Evaluates `n/d`, `w n/d` and vulgar fractions (`1½`) to a decimal string.
///
/// Anything else, including fractions whose numerator or denominator has a
/// leading zero, a zero denominator or unparsable parts, comes back unchanged.
pub fn evaluate_fraction(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(value) = evaluate_vulgar(trimmed) {
        return value.to_string();
    }

    let Some((left, denominator)) = trimmed.split_once('/') else {
        return text.to_string();
    };
    let left = left.trim();
    let denominator = denominator.trim();
    let (whole, numerator) = match left.rsplit_once(char::is_whitespace) {
        Some((whole, numerator)) => (Some(whole.trim()), numerator),
        None => (None, left),
    };

    if numerator.starts_with('0') || denominator.starts_with('0') {
        return text.to_string();
    }

    let parsed = (
        numerator.parse::<f64>(),
        denominator.parse::<f64>(),
        whole.map_or(Ok(0.0), str::parse::<f64>),
    );
    match parsed {
        (Ok(n), Ok(d), Ok(w)) if d != 0.0 => (w + n / d).to_string(),
        _ => text.to_string(),
    }
}

/// Renders `value` as a mixed cooking fraction such as `1 1/2`.
///
/// Values within `tolerance` of a whole number are rounded to it. When no
/// common fraction is close enough the value is rendered as a short decimal.
pub fn format_as_fraction(value: f64, tolerance: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    let whole = magnitude.trunc();
    let fraction = magnitude - whole;

    let rendered = if fraction <= tolerance {
        format!("{}", whole as u64)
    } else if 1.0 - fraction <= tolerance {
        format!("{}", whole as u64 + 1)
    } else if let Some((n, d)) = COMMON_FRACTIONS
        .iter()
        .find(|(n, d)| (fraction - *n as f64 / *d as f64).abs() <= tolerance)
    {
        if whole == 0.0 {
            format!("{n}/{d}")
        } else {
            format!("{} {n}/{d}", whole as u64)
        }
    } else {
        format_decimal(magnitude)
    };

    if rendered == "0" {
        rendered
    } else {
        format!("{sign}{rendered}")
    }
}

/// Parses `w n/d`, `n/d`, vulgar fractions and plain decimals
pub fn parse_fraction(text: &str) -> Option<f64> {
    let text = text.trim();

    if let Some(value) = evaluate_vulgar(text) {
        return Some(value);
    }

    let Some((left, denominator)) = text.split_once('/') else {
        return text.parse().ok();
    };

    let denominator: f64 = denominator.trim().parse().ok()?;
    if denominator == 0.0 {
        return None;
    }

    let left = left.trim();
    let (whole, numerator) = match left.rsplit_once(char::is_whitespace) {
        Some((whole, numerator)) => (whole.trim().parse::<f64>().ok()?, numerator.parse::<f64>().ok()?),
        None => (0.0, left.parse::<f64>().ok()?),
    };

    let fraction = numerator / denominator;
    Some(if whole < 0.0 { whole - fraction } else { whole + fraction })
}

/// Whether the fractional part of `value` is a whole number or a common fraction
pub fn is_nice_fraction(value: f64, tolerance: f64) -> bool {
    let fraction = value.abs().fract();
    nice_candidates().any(|candidate| (fraction - candidate).abs() <= tolerance)
}

/// Snaps `value` to the nearest whole number or common fraction
pub fn round_to_nice_fraction(value: f64) -> f64 {
    let magnitude = value.abs();
    let whole = magnitude.trunc();
    let fraction = magnitude - whole;

    let nearest = nice_candidates()
        .min_by(|a, b| (fraction - a).abs().total_cmp(&(fraction - b).abs()))
        .unwrap_or(0.0);

    (whole + nearest).copysign(value)
}

fn nice_candidates() -> impl Iterator<Item = f64> {
    [0.0, 1.0]
        .into_iter()
        .chain(COMMON_FRACTIONS.iter().map(|(n, d)| *n as f64 / *d as f64))
}

/// Decimal with at most two places and no trailing zeros
pub fn format_decimal(value: f64) -> String {
    let formatted = format!("{value:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Shortest decimal rendering of a model quantity, free of float noise
pub fn format_number(value: f64) -> String {
    let rounded = (value * 1_000_000.0).round() / 1_000_000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    rounded.to_string()
}
