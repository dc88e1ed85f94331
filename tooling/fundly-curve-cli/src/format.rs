//! Small text helpers shared by the report printers.

use colored::*;

pub const RULE_WIDTH: usize = 80;

/// Section heading framed by `=` rules.
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{}\n{}\n{}\n", rule, title.bold(), rule)
}

pub fn millions(tokens: f64) -> f64 {
    tokens / 1_000_000.0
}

/// Whole number with thousands separators: 4600 -> "4,600".
pub fn thousands(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0.0 && digits != "0" {
        out.insert(0, '-');
    }
    out
}

/// Short USD amount: 4600 -> "$4.6k", 25000 -> "$25k".
pub fn compact_usd(value: f64) -> String {
    if value >= 1_000.0 {
        let k = value / 1_000.0;
        if (k - k.round()).abs() < 1e-9 {
            format!("${:.0}k", k)
        } else {
            format!("${:.1}k", k)
        }
    } else {
        format!("${}", value)
    }
}

pub fn warning(msg: &str) -> String {
    format!("{} {}", "⚠️ ".yellow(), msg)
}
