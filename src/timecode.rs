/*!
 * Conversion between seconds and human-readable timestamps.
 *
 * Encoding works on whole milliseconds so the seconds field never rolls over
 * to `60`. Decoding accepts `S`, `M:S` and `H:M:S` forms with an optional
 * fractional part on the seconds field.
 */

use crate::errors::ClipError;

/// Format seconds as `HH:MM:SS.fff` when there are hours, `MM:SS.fff` otherwise.
///
/// Trailing fractional zeros and a dangling `.` are stripped, so `65.5`
/// becomes `01:05.5` and `3600.0` becomes `01:00:00`. Negative or NaN input
/// is treated as zero.
pub fn encode(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;

    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;

    let text = if hours > 0 {
        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    } else {
        format!("{:02}:{:02}.{:03}", minutes, secs, millis)
    };

    strip_fraction(&text)
}

/// Parse a timestamp into seconds, rounded to milliseconds.
///
/// Blank fields are ignored (`"1::30"` reads as `1:30`). Hours and minutes
/// must be whole numbers; seconds may carry a fraction.
pub fn decode(text: &str) -> Result<f64, ClipError> {
    let fields: Vec<&str> = text
        .trim()
        .split(':')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect();

    let total = match fields.as_slice() {
        [] => return Err(ClipError::invalid_timestamp(text, "timestamp is empty")),
        [secs] => parse_seconds(text, secs)?,
        [mins, secs] => parse_whole(text, mins)? * 60.0 + parse_seconds(text, secs)?,
        [hours, mins, secs] => {
            parse_whole(text, hours)? * 3600.0
                + parse_whole(text, mins)? * 60.0
                + parse_seconds(text, secs)?
        }
        _ => {
            return Err(ClipError::invalid_timestamp(
                text,
                "expected at most three fields (HH:MM:SS)",
            ))
        }
    };

    Ok((total * 1000.0).round() / 1000.0)
}

fn parse_whole(text: &str, field: &str) -> Result<f64, ClipError> {
    field
        .parse::<u64>()
        .map(|value| value as f64)
        .map_err(|_| ClipError::invalid_timestamp(text, format!("'{}' is not a whole number", field)))
}

fn parse_seconds(text: &str, field: &str) -> Result<f64, ClipError> {
    match field.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ClipError::invalid_timestamp(
            text,
            format!("'{}' is not a valid number of seconds", field),
        )),
    }
}

fn strip_fraction(text: &str) -> String {
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
