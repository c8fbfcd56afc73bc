// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Startup loader for the exoplanet record source.
//!
//! The CSV is read once. Declared numeric fields are coerced, rows that fail
//! coercion are dropped whole, and everything else passes through as text.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use csv::StringRecord;
use tracing::{error, info, warn};

use crate::dataset::{Dataset, FieldValue, Record};
use crate::errors::LoadError;

/// Fields parsed as floats when non-empty.
pub const NUMERIC_FIELDS: &[&str] = &[
    "period_days",
    "duration_hours",
    "depth_ppm",
    "planet_radius_rearth",
    "score",
    "duty_cycle",
    "transit_frequency",
    "planet_radius_from_depth",
];

/// Fields parsed as integers when non-empty.
pub const INTEGER_FIELDS: &[&str] = &["mission_encoded"];

/// Load the dataset from `path`.
///
/// A missing file is not an error: the sentinel dataset is returned so the
/// server can still start. Any other failure to open or read the header is.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let err = LoadError::FileMissing {
                path: path.to_path_buf(),
            };
            error!(error = %err, "serving error marker instead of records");
            return Ok(Dataset::missing_source());
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let records = parse_records(file).map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        records = records.len(),
        "loaded exoplanet dataset"
    );
    Ok(Dataset::from_records(records))
}

/// Parse every row of `source`, keeping the ones that convert cleanly.
///
/// Only a failure to read the header row is returned as an error.
pub fn parse_records<R: Read>(source: R) -> Result<Vec<Record>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().from_reader(source);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for result in reader.records() {
        let converted = match result {
            Ok(row) => {
                let line = row.position().map_or(0, |p| p.line());
                convert_row(&headers, &row).map_err(|reason| (line, reason))
            }
            Err(e) => {
                let line = e.position().map_or(0, |p| p.line());
                Err((line, e.to_string()))
            }
        };

        match converted {
            Ok(record) => records.push(record),
            Err((line, reason)) => {
                dropped += 1;
                let err = LoadError::RowConversion { line, reason };
                warn!(error = %err, "dropping row");
            }
        }
    }

    if dropped > 0 {
        warn!(kept = records.len(), dropped, "some rows failed conversion");
    }

    Ok(records)
}

/// Coerce one row. On failure the reason is returned and nothing is kept.
fn convert_row(headers: &StringRecord, row: &StringRecord) -> Result<Record, String> {
    // Later duplicate headers win, matching a dict-per-row reader.
    let mut raw: BTreeMap<String, String> = headers
        .iter()
        .zip(row.iter())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let mut fields = BTreeMap::new();

    for &name in NUMERIC_FIELDS {
        let value = raw
            .remove(name)
            .ok_or_else(|| format!("missing field '{name}'"))?;
        let value = if value.is_empty() {
            FieldValue::Text(value)
        } else {
            let parsed = parse_float(&value)
                .ok_or_else(|| format!("could not convert '{value}' to float for '{name}'"))?;
            FieldValue::Float(parsed)
        };
        fields.insert(name.to_string(), value);
    }

    for &name in INTEGER_FIELDS {
        let value = raw
            .remove(name)
            .ok_or_else(|| format!("missing field '{name}'"))?;
        let value = if value.is_empty() {
            FieldValue::Text(value)
        } else {
            let parsed = parse_integer(&value)
                .ok_or_else(|| format!("could not convert '{value}' to integer for '{name}'"))?;
            FieldValue::Integer(parsed)
        };
        fields.insert(name.to_string(), value);
    }

    fields.extend(raw.into_iter().map(|(k, v)| (k, FieldValue::Text(v))));

    Ok(Record::new(fields))
}

fn parse_float(raw: &str) -> Option<f64> {
    strip_digit_separators(raw.trim_ascii())?.parse().ok()
}

fn parse_integer(raw: &str) -> Option<i64> {
    strip_digit_separators(raw.trim_ascii())?.parse().ok()
}

/// Drop `_` digit separators (`1_000.5`). Each one must sit between two
/// ASCII digits, otherwise the value is not a number.
fn strip_digit_separators(raw: &str) -> Option<String> {
    let bytes = raw.as_bytes();
    let mut out = String::with_capacity(raw.len());
    for (i, c) in raw.char_indices() {
        if c != '_' {
            out.push(c);
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| bytes.get(j));
        let after = bytes.get(i + 1);
        if !before.is_some_and(u8::is_ascii_digit) || !after.is_some_and(u8::is_ascii_digit) {
            return None;
        }
    }
    Some(out)
}
