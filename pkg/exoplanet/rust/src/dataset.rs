// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! In-memory exoplanet candidate records.
//!
//! A [`Dataset`] is built once by the loader and never mutated afterwards. The
//! [`DataService`] renders it to JSON a single time so every `/data` response
//! carries the same bytes.

use std::collections::BTreeMap;

use axum::body::Bytes;
use serde::Serialize;
use tracing::warn;

/// Message carried by the sentinel record when the source file is absent.
pub const MISSING_SOURCE_MESSAGE: &str = "Data file not found on server";

/// Field name used by the sentinel record.
pub const ERROR_FIELD: &str = "error";

/// A single field value after numeric coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Float(f64),
    Integer(i64),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// One candidate observation.
///
/// Keys serialize in sorted order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub(crate) fn new(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }

    fn missing_source() -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(
            ERROR_FIELD.to_string(),
            FieldValue::Text(MISSING_SOURCE_MESSAGE.to_string()),
        );
        Self { fields }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }
}

/// Ordered, read-only collection of records for the process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
    degraded: bool,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            degraded: false,
        }
    }

    /// The degraded dataset served when the source file does not exist.
    pub fn missing_source() -> Self {
        Self {
            records: vec![Record::missing_source()],
            degraded: true,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when this is the sentinel dataset rather than loaded data.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }
}

/// Read-side of the dataset used by the HTTP front.
#[derive(Debug)]
pub struct DataService {
    dataset: Dataset,
    body: Bytes,
}

impl DataService {
    pub fn new(dataset: Dataset) -> Result<Self, serde_json::Error> {
        if dataset.is_degraded() {
            warn!(
                "serving degraded dataset until the data file is provided and the server restarted"
            );
        }
        let body = Bytes::from(serde_json::to_vec(dataset.records())?);
        Ok(Self { dataset, body })
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The whole dataset as a JSON array, rendered once at construction.
    pub fn json(&self) -> Bytes {
        self.body.clone()
    }
}
