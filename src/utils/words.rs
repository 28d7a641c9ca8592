//! Vietnamese reading of whole-dong amounts for the "bằng chữ" receipt line.

const DIGITS: [&str; 10] = [
    "không", "một", "hai", "ba", "bốn", "năm", "sáu", "bảy", "tám", "chín",
];

const GROUP_UNITS: [&str; 3] = ["", "nghìn", "triệu"];

/// `30_000_000` -> `Ba mươi triệu đồng`
pub fn amount_in_words(amount: u64) -> String {
    let words = if amount == 0 {
        DIGITS[0].to_string()
    } else {
        number_to_words(amount)
    };

    format!("{} đồng", capitalize(&words))
}

fn number_to_words(mut number: u64) -> String {
    let mut groups = Vec::new();
    while number > 0 {
        groups.push((number % 1000) as u16);
        number /= 1000;
    }

    let most_significant = groups.len() - 1;
    let mut parts: Vec<String> = Vec::new();

    for (index, group) in groups.iter().enumerate().rev() {
        if *group == 0 {
            continue;
        }

        parts.push(read_triple(*group, index != most_significant));

        let unit = group_unit(index);
        if !unit.is_empty() {
            parts.push(unit);
        }
    }

    parts.join(" ")
}

/// Units repeat every three groups with an extra "tỷ": nghìn tỷ, triệu tỷ, tỷ tỷ.
fn group_unit(index: usize) -> String {
    let mut unit = GROUP_UNITS[index % 3].to_string();
    for _ in 0..index / 3 {
        if !unit.is_empty() {
            unit.push(' ');
        }
        unit.push_str("tỷ");
    }
    unit
}

/// Reads a group of three digits. `full` forces leading zeros to be spoken,
/// as they are for every group after the first.
fn read_triple(group: u16, full: bool) -> String {
    let hundreds = (group / 100) as usize;
    let tens = ((group / 10) % 10) as usize;
    let units = (group % 10) as usize;
    let mut words = Vec::new();

    if hundreds > 0 || full {
        words.push(DIGITS[hundreds]);
        words.push("trăm");
    }

    match tens {
        0 if units > 0 && (hundreds > 0 || full) => words.push("linh"),
        0 => {}
        1 => words.push("mười"),
        _ => {
            words.push(DIGITS[tens]);
            words.push("mươi");
        }
    }

    match units {
        0 => {}
        1 if tens >= 2 => words.push("mốt"),
        4 if tens >= 2 => words.push("tư"),
        5 if tens >= 1 => words.push("lăm"),
        _ => words.push(DIGITS[units]),
    }

    words.join(" ")
}

fn capitalize(words: &str) -> String {
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
