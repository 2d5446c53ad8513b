//! Relevance decay.
//!
//! Recomputes `temporal.decay.strength` from the record's decay model,
//! half-life, and elapsed time since last access. The engine is pure: it
//! returns the new strength and whether it differs enough to persist, and
//! the caller decides whether to write.

use chrono::{DateTime, Utc};

use crate::error::{MnemonicError, Result};
use crate::memory::MemoryRecord;

/// Minimum strength delta that counts as a change.
///
/// Recomputing every run produces floating-point drift; deltas at or below
/// this threshold are reported as unchanged so the caller skips the write.
pub const CHANGE_THRESHOLD: f64 = 0.01;

/// Outcome of one recompute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recompute {
    pub new_strength: f64,
    pub changed: bool,
}

/// Recompute the decay strength of `record` as of `now`.
///
/// - `model: none`, a missing decay block, or a missing `half_life` all
///   disable decay: the strength is never modified.
/// - A missing `last_accessed` falls back to `created`.
/// - The result is clamped to `[0.0, 1.0]` to guard against strengths
///   seeded out of range by manual edits.
pub fn recompute(record: &MemoryRecord, now: DateTime<Utc>) -> Result<Recompute> {
    let current = current_strength(record);
    let unchanged = Recompute {
        new_strength: current,
        changed: false,
    };

    let Some(temporal) = &record.front.temporal else {
        return Ok(unchanged);
    };
    let Some(decay) = &temporal.decay else {
        return Ok(unchanged);
    };
    let model = decay.model.as_deref().unwrap_or("none");
    let Some(half_life) = decay.half_life.as_deref() else {
        // No half-life means no decay, regardless of model.
        return Ok(unchanged);
    };
    if model == "none" {
        return Ok(unchanged);
    }

    let half_life_days = parse_duration_days(half_life)?;
    if half_life_days <= 0.0 {
        return Err(MnemonicError::Duration(half_life.to_string()));
    }

    let last = temporal
        .last_accessed
        .as_deref()
        .or(record.front.created.as_deref())
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok());
    let Some(last) = last else {
        return Ok(unchanged);
    };

    let days = (now - last.with_timezone(&Utc)).num_days().max(0) as f64;

    let new_strength = match model {
        "exponential" => current * 0.5_f64.powf(days / half_life_days),
        "linear" => current - days / (2.0 * half_life_days),
        "step" => current * 0.5_f64.powi((days / half_life_days).floor() as i32),
        // Unknown models degrade gracefully to no-op; the validator already
        // flags them.
        _ => current,
    };
    let new_strength = new_strength.clamp(0.0, 1.0);

    Ok(Recompute {
        new_strength,
        changed: (new_strength - current).abs() > CHANGE_THRESHOLD,
    })
}

/// Current strength, defaulting to full relevance when unset.
pub fn current_strength(record: &MemoryRecord) -> f64 {
    record
        .front
        .temporal
        .as_ref()
        .and_then(|t| t.decay.as_ref())
        .and_then(|d| d.strength)
        .unwrap_or(1.0)
}

/// Write `strength` back into the record's decay block.
///
/// Only call for records where [`recompute`] reported a change; the decay
/// block is known to exist in that case, so a missing one is a no-op.
pub fn set_strength(record: &mut MemoryRecord, strength: f64) {
    if let Some(decay) = record
        .front
        .temporal
        .as_mut()
        .and_then(|t| t.decay.as_mut())
    {
        decay.strength = Some(strength);
    }
}

/// Parse an ISO-8601 duration into fractional days.
///
/// Supports `P[nY][nM][nW][nD][T[nH][nM][nS]]` with integer or decimal
/// components. Calendar units use fixed averages: a year is 365.25 days,
/// a month 30.44.
pub fn parse_duration_days(input: &str) -> Result<f64> {
    let err = || MnemonicError::Duration(input.to_string());

    let body = input.strip_prefix('P').ok_or_else(err)?;
    if body.is_empty() {
        return Err(err());
    }

    let (date_part, time_part) = match body.split_once('T') {
        Some((d, t)) if !t.is_empty() => (d, Some(t)),
        Some(_) => return Err(err()),
        None => (body, None),
    };

    let mut days = 0.0;
    for (value, unit) in split_components(date_part).ok_or_else(err)? {
        days += match unit {
            'Y' => value * 365.25,
            'M' => value * 30.44,
            'W' => value * 7.0,
            'D' => value,
            _ => return Err(err()),
        };
    }
    if let Some(time_part) = time_part {
        for (value, unit) in split_components(time_part).ok_or_else(err)? {
            days += match unit {
                'H' => value / 24.0,
                'M' => value / 1440.0,
                'S' => value / 86_400.0,
                _ => return Err(err()),
            };
        }
    }
    Ok(days)
}

/// Split `7D` / `1Y2M3D` style runs into (value, unit designator) pairs.
fn split_components(part: &str) -> Option<Vec<(f64, char)>> {
    let mut out = Vec::new();
    let mut number = String::new();
    for c in part.chars() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
        } else if c.is_ascii_uppercase() {
            let value: f64 = number.parse().ok()?;
            out.push((value, c));
            number.clear();
        } else {
            return None;
        }
    }
    if !number.is_empty() {
        return None; // trailing digits with no designator
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::record::{Decay, Frontmatter, Temporal};
    use chrono::TimeZone;

    fn record_with_decay(model: &str, half_life: Option<&str>, strength: f64) -> MemoryRecord {
        MemoryRecord {
            front: Frontmatter {
                id: Some("6f1b24a0-8c3d-4e5f-9a7b-1c2d3e4f5a6b".into()),
                created: Some("2026-01-01T00:00:00Z".into()),
                temporal: Some(Temporal {
                    last_accessed: Some("2026-01-01T00:00:00Z".into()),
                    decay: Some(Decay {
                        model: Some(model.into()),
                        half_life: half_life.map(str::to_string),
                        strength: Some(strength),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
            body: String::new(),
        }
    }

    fn at(days_later: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + chrono::Duration::days(days_later)
    }

    #[test]
    fn duration_days_basic() {
        assert_eq!(parse_duration_days("P7D").unwrap(), 7.0);
        assert_eq!(parse_duration_days("P2W").unwrap(), 14.0);
        assert_eq!(parse_duration_days("PT12H").unwrap(), 0.5);
        assert!((parse_duration_days("P1Y").unwrap() - 365.25).abs() < 1e-9);
        assert_eq!(parse_duration_days("P1DT12H").unwrap(), 1.5);
    }

    #[test]
    fn duration_rejects_malformed() {
        for bad in ["", "P", "7D", "PXD", "P7", "P7DT", "Pseven-days"] {
            assert!(parse_duration_days(bad).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn exponential_halves_per_half_life() {
        let rec = record_with_decay("exponential", Some("P7D"), 1.0);
        let r = recompute(&rec, at(14)).unwrap();
        assert!((r.new_strength - 0.25).abs() < 1e-9);
        assert!(r.changed);
    }

    #[test]
    fn exponential_is_strictly_monotonic_and_positive() {
        let rec = record_with_decay("exponential", Some("P7D"), 1.0);
        let mut previous = f64::INFINITY;
        for days in [1, 7, 30, 90, 365, 3650] {
            let r = recompute(&rec, at(days)).unwrap();
            assert!(r.new_strength < previous, "strength must strictly decrease");
            assert!(r.new_strength > 0.0, "exponential decay never reaches zero");
            previous = r.new_strength;
        }
    }

    #[test]
    fn below_threshold_reports_unchanged() {
        // Long half-life: one day of decay moves strength by well under 0.01.
        let rec = record_with_decay("exponential", Some("P365D"), 1.0);
        let r = recompute(&rec, at(1)).unwrap();
        assert!(!r.changed);
    }

    #[test]
    fn model_none_never_changes() {
        let rec = record_with_decay("none", Some("P7D"), 0.6);
        let r = recompute(&rec, at(10_000)).unwrap();
        assert_eq!(r.new_strength, 0.6);
        assert!(!r.changed);
    }

    #[test]
    fn missing_half_life_disables_decay() {
        let rec = record_with_decay("exponential", None, 0.9);
        let r = recompute(&rec, at(100)).unwrap();
        assert_eq!(r.new_strength, 0.9);
        assert!(!r.changed);
    }

    #[test]
    fn missing_last_accessed_falls_back_to_created() {
        let mut rec = record_with_decay("exponential", Some("P7D"), 1.0);
        rec.front.temporal.as_mut().unwrap().last_accessed = None;
        let r = recompute(&rec, at(7)).unwrap();
        assert!((r.new_strength - 0.5).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_seed_is_clamped() {
        let rec = record_with_decay("exponential", Some("P7D"), 3.0);
        let r = recompute(&rec, at(0)).unwrap();
        assert!(r.new_strength <= 1.0);
    }

    #[test]
    fn linear_floors_at_zero() {
        let rec = record_with_decay("linear", Some("P7D"), 1.0);
        let r = recompute(&rec, at(1000)).unwrap();
        assert_eq!(r.new_strength, 0.0);
    }

    #[test]
    fn step_drops_in_whole_half_lives() {
        let rec = record_with_decay("step", Some("P7D"), 1.0);
        // 13 days: one full half-life elapsed, the second not yet.
        let r = recompute(&rec, at(13)).unwrap();
        assert!((r.new_strength - 0.5).abs() < 1e-9);
    }

    #[test]
    fn set_strength_updates_decay_block() {
        let mut rec = record_with_decay("exponential", Some("P7D"), 1.0);
        set_strength(&mut rec, 0.25);
        assert_eq!(current_strength(&rec), 0.25);
    }
}
