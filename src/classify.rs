use crate::model::{Classification, ClassifiedParameter, MeasuredParameter, RawValue, Status};
use crate::registry::{RangeKind, ReferenceRange, ReferenceRangeRegistry};

/// What to call a numeric value whose parameter has no registry entry.
/// The surrounding application treats both answers as defensible, so the
/// choice is a parameter rather than a baked-in default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownNumericPolicy {
    #[default]
    Normal,
    Indeterminate,
}

/// Classify one measured value against the injected registry.
///
/// Total over its input space: unknown parameters, malformed values and
/// kind mismatches all resolve to a defined fallback rather than an error,
/// so one bad measurement never aborts the batch it arrived in.
pub fn classify(
    name: &str,
    value: &RawValue,
    registry: &ReferenceRangeRegistry,
    policy: UnknownNumericPolicy,
) -> Classification {
    classify_with(value, registry.lookup(name), policy)
}

/// Classification against an explicit (possibly absent) range definition.
/// Split out so tests can exercise banding without building a registry.
pub fn classify_with(
    value: &RawValue,
    range: Option<&ReferenceRange>,
    policy: UnknownNumericPolicy,
) -> Classification {
    let numeric_value = value.as_number();

    let Some(def) = range else {
        // No definition at all: text goes through the qualitative
        // vocabulary, numeric-looking values follow the caller's policy.
        let status = match value {
            RawValue::Text(s) if s.trim().parse::<f64>().is_err() => qualitative_status(s),
            _ => match policy {
                UnknownNumericPolicy::Normal => Status::Normal,
                UnknownNumericPolicy::Indeterminate => Status::Indeterminate,
            },
        };
        return Classification {
            status,
            numeric_value,
            display_range: "-".to_string(),
        };
    };

    let display_range = def.display();

    let status = match def.kind {
        RangeKind::Qualitative => match value {
            RawValue::Text(s) => qualitative_status(s),
            RawValue::Number(_) => Status::Indeterminate,
        },
        RangeKind::Numeric => match (numeric_value, def.min, def.max) {
            (Some(v), Some(min), Some(max)) => numeric_band(v, min, max),
            (None, _, _) => Status::Indeterminate,
            // Definition claims a numeric band but lacks a bound; nothing
            // sensible to compare against.
            _ => Status::Indeterminate,
        },
        RangeKind::GreaterThan => match (numeric_value, def.min) {
            (Some(v), Some(min)) if v < min => Status::Low,
            (Some(_), Some(_)) => Status::Normal,
            (None, _) => Status::Indeterminate,
            _ => Status::Normal,
        },
        RangeKind::LessThan => match (numeric_value, def.max) {
            (Some(v), Some(max)) if v > max => Status::High,
            (Some(_), Some(_)) => Status::Normal,
            (None, _) => Status::Indeterminate,
            _ => Status::Normal,
        },
    };

    Classification {
        status,
        numeric_value,
        display_range,
    }
}

/// Severity tiers proportional to the width of the normal band: a parameter
/// with a wide normal range gets proportionally more absolute tolerance
/// before escalating.
fn numeric_band(v: f64, min: f64, max: f64) -> Status {
    if v >= min && v <= max {
        return Status::Normal;
    }
    let range = max - min;
    if v < min {
        let critical_low = min - 0.5 * range;
        let low = min - 0.1 * range;
        let slightly_low = min - 0.02 * range;
        if v <= critical_low {
            Status::CriticalLow
        } else if v <= low {
            Status::Low
        } else if v <= slightly_low {
            Status::SlightlyLow
        } else {
            Status::Low
        }
    } else {
        let critical_high = max + 0.5 * range;
        let elevated = max + 0.25 * range;
        let slightly_high = max + 0.1 * range;
        if v >= critical_high {
            Status::CriticalHigh
        } else if v >= elevated {
            Status::Elevated
        } else if v >= slightly_high {
            Status::SlightlyHigh
        } else {
            Status::High
        }
    }
}

/// Presence/absence vocabulary match on normalized text. Unmatched text is
/// Indeterminate: the report must show it, not guess at it.
fn qualitative_status(raw: &str) -> Status {
    let text = raw.trim().to_lowercase();
    const NORMAL: [&str; 3] = ["negative", "absent", "normal"];
    const POSITIVE: [&str; 3] = ["positive", "present", "detected"];
    const INDETERMINATE: [&str; 2] = ["indeterminate", "trace"];

    if NORMAL.iter().any(|w| text.contains(w)) {
        Status::Normal
    } else if POSITIVE.iter().any(|w| text.contains(w)) {
        Status::Positive
    } else if INDETERMINATE.iter().any(|w| text.contains(w)) {
        Status::Indeterminate
    } else {
        Status::Indeterminate
    }
}

/// Classify a whole submission batch in order.
pub fn classify_batch(
    parameters: &[MeasuredParameter],
    registry: &ReferenceRangeRegistry,
    policy: UnknownNumericPolicy,
) -> Vec<ClassifiedParameter> {
    parameters
        .iter()
        .map(|p| {
            let classification = classify(&p.name, &p.value, registry, policy);
            ClassifiedParameter {
                name: p.name.clone(),
                value: p.value.clone(),
                unit: p.unit.clone().or_else(|| {
                    registry.lookup(&p.name).and_then(|d| d.unit.clone())
                }),
                classification,
            }
        })
        .collect()
}
