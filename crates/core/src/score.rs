use serde_json::Value;

/// Coerce a model-supplied score into an integer within `[lo, hi]`.
///
/// Integral numbers pass through, floats truncate toward zero, strings are
/// parsed as integers after trimming. Anything else (null, bools, arrays,
/// unparseable strings) falls back to `default`. The result is always
/// clamped into the range, so this never fails.
pub fn clamp(raw: &Value, lo: u8, hi: u8, default: u8) -> u8 {
    let coerced = match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if let Some(f) = n.as_f64() {
                f.trunc() as i64
            } else {
                i64::from(default)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(i64::from(default)),
        _ => i64::from(default),
    };
    coerced.clamp(i64::from(lo), i64::from(hi)) as u8
}
