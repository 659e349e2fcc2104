//! Conversions between stored numbers and the compact "5.1k" display form.

/// Format a number with a `k` suffix for thousands
/// e.g., 5100 -> "5.1k", 1000 -> "1k", 500 -> "500"
pub fn format_number_for_display(num: f64) -> String {
    if !num.is_finite() {
        return if num.is_nan() {
            "-".to_string()
        } else if num > 0.0 {
            "∞".to_string()
        } else {
            "-∞".to_string()
        };
    }

    if num >= 1000.0 {
        let thousands = num / 1000.0;
        if thousands % 1.0 == 0.0 {
            format!("{}k", thousands)
        } else {
            format!("{}k", to_fixed(thousands, 1))
        }
    } else {
        format!("{}", num)
    }
}

/// Fixed-point text with ties rounded away from zero: 1.25 -> "1.3", 12.25 -> "12.3"
///
/// `format!("{:.1}")` would round exact ties to even instead.
pub fn to_fixed(value: f64, decimals: usize) -> String {
    let scale = 10f64.powi(decimals as i32);
    let rounded = value.signum() * (value.abs() * scale + 0.5).floor() / scale;
    format!("{:.*}", decimals, rounded)
}

/// Parse the longest leading decimal number, the way a lenient form field does:
/// "12abc" -> 12, "  .5" -> 0.5, "abc" -> None
fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

fn has_multiple_dots(s: &str) -> bool {
    s.matches('.').count() > 1
}

/// Convert display format (with optional `k` suffix) to a number
/// e.g., "5.1k" -> 5100, "1k" -> 1000, "500" -> 500
///
/// Empty, malformed ("5.1.2k") or non-numeric input gives 0.
pub fn parse_display_number(display_value: &str) -> f64 {
    let trimmed = display_value.trim().to_lowercase();
    if trimmed.is_empty() {
        return 0.0;
    }

    if let Some(num_part) = trimmed.strip_suffix('k') {
        if num_part.is_empty() || num_part == "." || has_multiple_dots(num_part) {
            return 0.0;
        }
        return parse_leading_number(num_part).map_or(0.0, |n| n * 1000.0);
    }

    if trimmed == "." || has_multiple_dots(&trimmed) {
        return 0.0;
    }
    parse_leading_number(&trimmed).unwrap_or(0.0)
}

/// Check whether a display string is an acceptable number.
/// Empty input is valid (it reads as 0).
pub fn is_valid_display_number(display_value: &str) -> bool {
    let trimmed = display_value.trim().to_lowercase();
    if trimmed.is_empty() {
        return true;
    }

    let num_part = match trimmed.strip_suffix('k') {
        Some(part) => {
            if part.is_empty() {
                return false;
            }
            part
        }
        None => trimmed.as_str(),
    };

    if num_part == "." || has_multiple_dots(num_part) {
        return false;
    }

    parse_leading_number(num_part).is_some_and(f64::is_finite)
}
