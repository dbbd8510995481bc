//! Deterministic presentation of prices, changes and rates.

/// `$1,234.50` / `$5.20` / `$0.000123`.
pub fn format_price(value: f64) -> String {
    if value >= 1000.0 {
        format!("${}", format_grouped(value, 2))
    } else if value >= 1.0 {
        format!("${value:.2}")
    } else {
        format!("${value:.6}")
    }
}

/// Signed percent change with a direction marker; zero counts as non-positive.
pub fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("🟢 +{change:.2}%")
    } else {
        format!("🔴 {change:.2}%")
    }
}

/// Market cap in billions of dollars, e.g. `$1,280B`.
pub fn format_market_cap(value: f64) -> String {
    format!("${}B", format_grouped(value / 1_000_000_000.0, 0))
}

/// Exchange rate with two decimals, no grouping.
pub fn format_rate(value: f64) -> String {
    format!("{value:.2}")
}

/// Fixed decimals with `,` thousands separators.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(f) = frac_part {
        out.push('.');
        out.push_str(f);
    }
    out
}
