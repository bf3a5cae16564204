use std::time::Duration;

use blinker::mcp2221::PinNumber;

pub(crate) fn u16_from_hex(value: &str) -> Result<u16, std::num::ParseIntError> {
    let s = if value.to_ascii_lowercase().starts_with("0x") {
        &value[2..]
    } else {
        value
    };
    u16::from_str_radix(s, 16)
}

pub(crate) fn pin(value: &str) -> Result<PinNumber, String> {
    value.parse().map_err(|e: blinker::mcp2221::Error| e.to_string())
}

/// Parse a duration such as `100ms`, `1.5s` or `1m30s`.
///
/// A duration is a sequence of decimal numbers, each with an optional
/// fraction and a unit suffix. Accepted units are `ns`, `us` (or `µs`), `ms`,
/// `s`, `m` and `h`. A bare `0` is also accepted.
pub(crate) fn duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    if value == "0" {
        return Ok(Duration::ZERO);
    }
    if value.is_empty() {
        return Err("empty duration, expected e.g. 100ms".to_owned());
    }

    let mut rest = value;
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after) = split_digits(rest);
        let (fraction, after) = match after.strip_prefix('.') {
            Some(after) => split_digits(after),
            None => ("", after),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(format!("invalid number in {value:?}"));
        }
        let unit_end = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, after) = after.split_at(unit_end);
        let scale = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60_000_000_000,
            "h" => 3_600_000_000_000,
            "" => return Err(format!("missing unit in {value:?}, expected e.g. 100ms")),
            _ => {
                return Err(format!(
                    "unknown unit {unit:?} in {value:?}, expected ns, us, ms, s, m or h"
                ));
            }
        };
        total = component_nanos(whole, fraction, scale)
            .and_then(|nanos| total.checked_add(nanos))
            .ok_or_else(|| format!("{value:?} is too long"))?;
        rest = after;
    }

    u64::try_from(total)
        .map(Duration::from_nanos)
        .map_err(|_| format!("{value:?} is too long"))
}

fn split_digits(s: &str) -> (&str, &str) {
    s.split_at(s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len()))
}

/// Nanoseconds in `whole.fraction` units of `scale` nanoseconds.
fn component_nanos(whole: &str, fraction: &str, scale: u128) -> Option<u128> {
    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    // Digits past nanosecond precision of an hour are dropped.
    let fraction = &fraction[..fraction.len().min(18)];
    let part = if fraction.is_empty() {
        0
    } else {
        let digits: u128 = fraction.parse().ok()?;
        digits * scale / 10u128.pow(fraction.len() as u32)
    };
    whole.checked_mul(scale)?.checked_add(part)
}

/// Parse a duration that must not be zero.
pub(crate) fn interval(value: &str) -> Result<Duration, String> {
    match duration(value)? {
        d if d.is_zero() => Err("interval must be greater than zero".to_owned()),
        d => Ok(d),
    }
}
