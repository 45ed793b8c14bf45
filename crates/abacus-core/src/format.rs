//! Number rendering at the string boundary
//!
//! The calculator keeps its display as text. These helpers convert between
//! that text and `f64` using the same shapes a browser would show.

/// Render a number for the display.
///
/// Plain decimal notation in `[1e-6, 1e21)`, shortest round-trip digits,
/// exponential with an explicit sign outside it.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // covers -0.0 too
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        format!("{value}")
    } else {
        signed_exponent(format!("{value:e}"))
    }
}

/// Parse the longest numeric prefix of `text`, NaN when there is none.
///
/// `"12abc"` is 12, `"-"` and `"Error"` are NaN.
pub fn parse_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return text[..end + "Infinity".len()].parse().unwrap_or(f64::NAN);
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

/// Render a conversion result.
///
/// Very small and very large magnitudes use six fractional digits in
/// exponential form; everything else gets fewer decimals the larger it is,
/// with trailing zeros dropped.
pub fn format_conversion(value: f64) -> String {
    if !value.is_finite() {
        return format_number(value);
    }

    let magnitude = value.abs();
    if magnitude < 1e-6 || magnitude >= 1e6 {
        return signed_exponent(format!("{value:.6e}"));
    }

    let decimals = if magnitude >= 100.0 {
        2
    } else if magnitude >= 10.0 {
        3
    } else if magnitude >= 1.0 {
        4
    } else if magnitude >= 0.1 {
        5
    } else {
        6
    };

    let fixed = to_fixed(value, decimals);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Fixed-point rendering with ties rounded away from zero (`100.125` ->
/// `100.13`). `format!` rounds exact ties to even.
fn to_fixed(value: f64, decimals: usize) -> String {
    // 2^-72 is the smallest bit of any f64 at or above 1e-6, so 80 digits
    // hold the exact expansion
    let exact = format!("{:.80}", value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .collect();
    if frac_part.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
        let mut i = digits.len();
        loop {
            if i == 0 {
                digits.insert(0, b'1');
                break;
            }
            i -= 1;
            if digits[i] == b'9' {
                digits[i] = b'0';
            } else {
                digits[i] += 1;
                break;
            }
        }
    }

    let int_len = digits.len() - decimals;
    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    out.extend(digits[..int_len].iter().map(|&d| d as char));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[int_len..].iter().map(|&d| d as char));
    }
    out
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// `1.5e21` -> `1.5e+21`; negative exponents are left alone
fn signed_exponent(formatted: String) -> String {
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}
