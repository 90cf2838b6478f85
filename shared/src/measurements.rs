//! Body measurement normalization
//!
//! Raw input arrives from forms, so numbers may be text with a comma decimal
//! separator ("71,2"). Anything that does not parse to a finite number is
//! dropped. Saving is only allowed for the current day.

use crate::calendar::DateKey;
use crate::errors::MeasurementRejection;
use crate::models::{CleanMeasurement, MeasurementEntry, Measurements};
use crate::validation::is_valid_date_key;
use serde::{Deserialize, Serialize};

/// A numeric field as submitted: a JSON number or free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
}

impl RawNumber {
    /// Finite value, accepting `,` as decimal separator
    pub fn parse(&self) -> Option<f64> {
        match self {
            RawNumber::Number(n) => n.is_finite().then_some(*n),
            RawNumber::Text(text) => parse_decimal(text),
        }
    }
}

impl From<f64> for RawNumber {
    fn from(n: f64) -> Self {
        RawNumber::Number(n)
    }
}

impl From<&str> for RawNumber {
    fn from(text: &str) -> Self {
        RawNumber::Text(text.to_string())
    }
}

/// Unvalidated measurement submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMeasurement {
    #[serde(default)]
    pub weight: Option<RawNumber>,
    #[serde(default)]
    pub height: Option<RawNumber>,
    #[serde(default)]
    pub age: Option<RawNumber>,
    #[serde(default)]
    pub chest: Option<RawNumber>,
    #[serde(default)]
    pub waist: Option<RawNumber>,
    #[serde(default)]
    pub belly: Option<RawNumber>,
    #[serde(default)]
    pub hips: Option<RawNumber>,
    #[serde(default)]
    pub comment: Option<String>,
}

fn parse_decimal(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn parse_field(value: &Option<RawNumber>) -> Option<f64> {
    value.as_ref().and_then(RawNumber::parse)
}

/// Keep only the fields that parse; blank comments are dropped
pub fn normalize(raw: &RawMeasurement) -> CleanMeasurement {
    CleanMeasurement {
        weight: parse_field(&raw.weight),
        height: parse_field(&raw.height),
        age: parse_field(&raw.age),
        chest: parse_field(&raw.chest),
        waist: parse_field(&raw.waist),
        belly: parse_field(&raw.belly),
        hips: parse_field(&raw.hips),
        comment: raw
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    }
}

pub fn has_any_value(clean: &CleanMeasurement) -> bool {
    [
        clean.weight,
        clean.height,
        clean.age,
        clean.chest,
        clean.waist,
        clean.belly,
        clean.hips,
    ]
    .iter()
    .any(Option::is_some)
        || clean.comment.is_some()
}

/// Accept a save only for a well-formed key equal to `today` with some value
pub fn validate_save(
    date: &str,
    today: DateKey,
    clean: CleanMeasurement,
) -> Result<MeasurementEntry, MeasurementRejection> {
    if !is_valid_date_key(date) {
        return Err(MeasurementRejection::InvalidDate);
    }
    let date: DateKey = date.parse().map_err(|_| MeasurementRejection::InvalidDate)?;
    if date != today {
        return Err(MeasurementRejection::PastDate);
    }
    if !has_any_value(&clean) {
        return Err(MeasurementRejection::Empty);
    }
    Ok(MeasurementEntry {
        date,
        values: clean,
    })
}

/// Overlay a re-save of the same day onto what is already stored
pub fn merge(existing: Option<&MeasurementEntry>, incoming: MeasurementEntry) -> MeasurementEntry {
    let Some(existing) = existing else {
        return incoming;
    };
    let old = &existing.values;
    let new = incoming.values;
    MeasurementEntry {
        date: incoming.date,
        values: CleanMeasurement {
            weight: new.weight.or(old.weight),
            height: new.height.or(old.height),
            age: new.age.or(old.age),
            chest: new.chest.or(old.chest),
            waist: new.waist.or(old.waist),
            belly: new.belly.or(old.belly),
            hips: new.hips.or(old.hips),
            comment: new.comment.or_else(|| old.comment.clone()),
        },
    }
}

pub fn latest(measurements: &Measurements) -> Option<&MeasurementEntry> {
    measurements.values().next_back()
}

pub fn earliest(measurements: &Measurements) -> Option<&MeasurementEntry> {
    measurements.values().next()
}

/// Entries newest first, at most `limit`
pub fn newest_first(measurements: &Measurements, limit: usize) -> Vec<MeasurementEntry> {
    measurements.values().rev().take(limit).cloned().collect()
}

/// Weight of the earliest entry that records one
pub fn start_weight(measurements: &Measurements) -> Option<f64> {
    measurements.values().find_map(|m| m.values.weight)
}

/// Weight of the latest entry that records one
pub fn current_weight(measurements: &Measurements) -> Option<f64> {
    measurements.values().rev().find_map(|m| m.values.weight)
}
