// src/trigger/duration.rs

use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Parse a Go-style duration string such as `"90s"`, `"1h30m"`, `"1.5h"` or
/// `"250ms"`.
///
/// Supported units: `ns`, `us` / `µs`, `ms`, `s`, `m`, `h`. A bare `"0"` is
/// accepted; any other number needs a unit.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos: u128 = 0;
    let mut rest = s;

    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return Err(format!("invalid duration '{s}': expected a number"));
        }
        let (num_part, tail) = rest.split_at(num_len);

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_len);

        let unit_nanos = unit_in_nanos(unit)
            .ok_or_else(|| match unit {
                "" => format!("duration '{s}' missing unit suffix"),
                other => format!(
                    "unsupported duration unit '{other}'; expected ns, us, ms, s, m, or h"
                ),
            })?;

        total_nanos = total_nanos
            .checked_add(component_nanos(num_part, unit_nanos)?)
            .ok_or_else(|| format!("duration '{s}' is too large"))?;
        rest = next;
    }

    let secs = u64::try_from(total_nanos / NANOS_PER_SEC)
        .map_err(|_| format!("duration '{s}' is too large"))?;
    let nanos = (total_nanos % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, nanos))
}

fn unit_in_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(60 * 60 * NANOS_PER_SEC),
        _ => None,
    }
}

fn component_nanos(num_part: &str, unit_nanos: u128) -> Result<u128, String> {
    if num_part.contains('.') {
        let value: f64 = num_part
            .parse()
            .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;
        let nanos = (value * unit_nanos as f64).round();
        if !nanos.is_finite() || nanos > u128::MAX as f64 {
            return Err(format!("duration component '{num_part}' is too large"));
        }
        Ok(nanos as u128)
    } else {
        let value: u128 = num_part
            .parse()
            .map_err(|e| format!("invalid duration number '{num_part}': {e}"))?;
        value
            .checked_mul(unit_nanos)
            .ok_or_else(|| format!("duration component '{num_part}' is too large"))
    }
}
