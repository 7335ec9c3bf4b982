pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Human-readable byte size (`512 B`, `1.5 KiB`, `12.0 MiB`).
pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

/// Stored size as a percentage of raw size.
pub fn ratio_percent(stored: usize, raw: usize) -> f64 {
    if raw == 0 {
        return 100.0;
    }
    stored as f64 * 100.0 / raw as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
        assert_eq!(format_size(1536), "1.5 KiB");
        assert_eq!(format_size(12 * 1024 * 1024), "12.0 MiB");
    }

    #[test]
    fn ratio_handles_empty_input() {
        assert_eq!(ratio_percent(0, 0), 100.0);
        assert_eq!(ratio_percent(50, 200), 25.0);
    }
}
