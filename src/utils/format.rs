//! Number formatting for money and weights as printed on receipts.

use bigdecimal::BigDecimal;

/// Rounds half away from zero to `scale` fractional digits.
pub fn round_half_up(value: &BigDecimal, scale: u32) -> BigDecimal {
    let half = BigDecimal::from(5) / BigDecimal::from(10u64.pow(scale + 1));
    let shifted = if value < &BigDecimal::from(0) {
        value - half
    } else {
        value + half
    };
    shifted.with_scale(scale as i64)
}

/// Whole currency units, rounded half-up. `None` for negative or oversized values.
pub fn to_whole_units(value: &BigDecimal) -> Option<u64> {
    let (digits, _) = round_half_up(value, 0).as_bigint_and_exponent();
    u64::try_from(digits).ok()
}

/// Inserts `,` between every group of three integer digits.
pub fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}", sign, grouped)
}

/// `30000000.4` -> `30,000,000`
pub fn format_money(value: &BigDecimal) -> String {
    group_thousands(&round_half_up(value, 0).to_string())
}

pub fn format_unit_price(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// `1234.5` -> `1,234.50`
pub fn format_weight(value: &BigDecimal) -> String {
    let rendered = round_half_up(value, 2).to_string();
    match rendered.split_once('.') {
        Some((whole, fraction)) => format!("{}.{}", group_thousands(whole), fraction),
        None => format!("{}.00", group_thousands(&rendered)),
    }
}
