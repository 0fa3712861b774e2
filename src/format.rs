//! Number formatting for KPI cards, axes and tooltips.

/// Whole-dollar amount with thousands separators, e.g. `$95,000`.
pub fn usd(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded.abs() as u64))
}

/// Integer count with thousands separators, e.g. `1,234`.
pub fn count(value: usize) -> String {
    group_thousands(value as u64)
}

/// Compact axis label: `$150k`, `$1.2M`.
pub fn usd_short(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1_000_000.0 {
        format!("{sign}${:.1}M", abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{sign}${:.0}k", abs / 1_000.0)
    } else {
        format!("{sign}${abs:.0}")
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
