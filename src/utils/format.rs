//! Human readable byte sizes

const UNITS: [&str; 8] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei", "Zi"];

/// Format a byte count with binary prefixes, e.g. `1536 -> "1.5KiB"`
pub fn format_bytes(num: f64) -> String {
    format_bytes_with_suffix(num, "B")
}

/// Format `num` with binary prefixes and a custom unit suffix.
///
/// Picks the largest prefix whose scaled magnitude is below 1024, falling
/// back to `Yi` beyond zebi.
pub fn format_bytes_with_suffix(num: f64, suffix: &str) -> String {
    let mut num = num;
    for unit in UNITS {
        if num.abs() < 1024.0 {
            return format!("{num:3.1}{unit}{suffix}");
        }
        num /= 1024.0;
    }
    format!("{num:.1}Yi{suffix}")
}
