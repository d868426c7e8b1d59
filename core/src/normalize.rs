// core/src/normalize.rs
use serde_json::Value;

/// Felles tallsjekk: kun endelige verdier slipper gjennom.
#[inline]
fn finite(x: f64) -> Option<f64> {
    if x.is_finite() { Some(x) } else { None }
}

/// Komma eller punktum som desimalskille.
fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.replace(',', ".").parse::<f64>().ok().and_then(finite)
}

/// Bare et (evt. fortegnet) desimaltall, ingen eksponent eller ekstra tegn.
fn is_bare_decimal(s: &str) -> bool {
    let body = s.strip_prefix('-').or_else(|| s.strip_prefix('+')).unwrap_or(s);
    let mut parts = body.splitn(2, |c| c == '.' || c == ',');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    digits(int_part) && frac_part.map_or(true, digits)
}

/// Tid som tekst → sekunder.
///
/// Godtar `HH:MM:SS[.frac]`, `MM:SS[.frac]` og rene desimaltall (allerede sekunder).
/// Desimalskille kan være `,` eller `.`. Feiler én komponent blir svaret `None`.
pub fn parse_time_str(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if is_bare_decimal(s) {
        return parse_decimal(s);
    }

    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    let whole = |p: &str| -> Option<f64> {
        if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        p.parse::<f64>().ok()
    };
    let secs = |p: &str| -> Option<f64> {
        if !is_bare_decimal(p) || p.starts_with('-') || p.starts_with('+') {
            return None;
        }
        parse_decimal(p)
    };

    match parts.as_slice() {
        [hh, mm, ss] => Some(whole(hh)? * 3600.0 + whole(mm)? * 60.0 + secs(ss)?),
        [mm, ss] => Some(whole(mm)? * 60.0 + secs(ss)?),
        _ => None,
    }
}

/// `parseTimeToSeconds`: tall slippes gjennom uendret, tekst tolkes som tid.
pub fn parse_time_to_seconds(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => parse_time_str(s),
        _ => None,
    }
}

/// Tall som tekst: fjerner avsluttende `%`, normaliserer desimalkomma.
pub fn parse_number_str(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim();
    if s.is_empty() || !is_bare_decimal(s) {
        return None;
    }
    parse_decimal(s)
}

/// `parseNumber`: tall uendret, tekst via [`parse_number_str`], alt annet `None`.
pub fn parse_number(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64().and_then(finite),
        Value::String(s) => parse_number_str(s),
        _ => None,
    }
}

/// Sekunder → `m:ss.t` (tideler), samme format som seksjonstidene vises i.
pub fn format_mm_ss_t(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "N/A".to_string();
    }
    let tenths = (seconds * 10.0).round() as u64;
    let mins = tenths / 600;
    let rest = tenths % 600;
    format!("{}:{:02}.{}", mins, rest / 10, rest % 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn time_formats() {
        assert_eq!(parse_time_str("1:12.4"), Some(72.4));
        assert_eq!(parse_time_str("01:12,4"), Some(72.4));
        assert_eq!(parse_time_str("1:00:05"), Some(3605.0));
        assert_eq!(parse_time_str("  37.25 "), Some(37.25));
        assert_eq!(parse_time_str("-3"), Some(-3.0));
        assert_eq!(parse_time_str("1:xx"), None);
        assert_eq!(parse_time_str("a:10"), None);
        assert_eq!(parse_time_str(""), None);
        assert_eq!(parse_time_to_seconds(&json!(41.5)), Some(41.5));
        assert_eq!(parse_time_to_seconds(&Value::Null), None);
    }

    #[test]
    fn numbers() {
        assert_eq!(parse_number(&json!("45%")), Some(45.0));
        assert_eq!(parse_number(&json!("45,5 %")), Some(45.5));
        assert_eq!(parse_number(&json!(" ")), None);
        assert_eq!(parse_number(&json!("n/a")), None);
        assert_eq!(parse_number(&json!(true)), None);
        assert_eq!(parse_number(&json!(12)), Some(12.0));
    }

    #[test]
    fn format_rounds_with_carry() {
        assert_eq!(format_mm_ss_t(72.44), "1:12.4");
        assert_eq!(format_mm_ss_t(119.96), "2:00.0");
        assert_eq!(format_mm_ss_t(5.0), "0:05.0");
    }
}
