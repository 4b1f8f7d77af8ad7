#![deny(warnings)]

//! Export sinks for result tables: CSV bytes and pretty JSON text.
//!
//! Both sinks only read the table they are given.

use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use wefe_core::{Metric, ResultTable};

/// Suggested download names.
pub const CSV_FILE_NAME: &str = "wefe_simulation.csv";
pub const JSON_FILE_NAME: &str = "wefe_simulation.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no result rows to export")]
    Empty,
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Arrow column for one untyped engine column. The type is the narrowest
/// that holds every present value: integers, then floats, then booleans,
/// otherwise text. Missing and null cells stay null.
fn extra_column(table: &ResultTable, name: &str) -> (DataType, ArrayRef) {
    let cells: Vec<Option<&Value>> = table
        .rows()
        .iter()
        .map(|row| row.extra.get(name).filter(|v| !v.is_null()))
        .collect();
    let present = || cells.iter().flatten();
    if present().all(|v| v.as_i64().is_some()) {
        let values: Vec<Option<i64>> = cells.iter().map(|c| c.and_then(Value::as_i64)).collect();
        (DataType::Int64, Arc::new(Int64Array::from(values)))
    } else if present().all(|v| v.is_number()) {
        let values: Vec<Option<f64>> = cells.iter().map(|c| c.and_then(Value::as_f64)).collect();
        (DataType::Float64, Arc::new(Float64Array::from(values)))
    } else if present().all(|v| v.is_boolean()) {
        let values: Vec<Option<bool>> = cells.iter().map(|c| c.and_then(Value::as_bool)).collect();
        (DataType::Boolean, Arc::new(BooleanArray::from(values)))
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| {
                c.map(|v| match v {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
            })
            .collect();
        (DataType::Utf8, Arc::new(StringArray::from(values)))
    }
}

/// Columnar view of a table: `year`, the typed metrics, then every untyped
/// column in name order with the type its values share.
pub fn record_batch(table: &ResultTable) -> Result<RecordBatch, ExportError> {
    if table.is_empty() {
        return Err(ExportError::Empty);
    }
    let mut fields = vec![Field::new("year", DataType::Int32, false)];
    let mut columns: Vec<ArrayRef> = vec![Arc::new(Int32Array::from(table.years()))];
    for metric in Metric::ALL {
        fields.push(Field::new(metric.column(), DataType::Float64, false));
        columns.push(Arc::new(Float64Array::from(table.column(metric))));
    }
    for name in table.extra_columns() {
        let (data_type, column) = extra_column(table, name);
        fields.push(Field::new(name, data_type, true));
        columns.push(column);
    }
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// CSV with a header row.
pub fn to_csv(table: &ResultTable) -> Result<Vec<u8>, ExportError> {
    let batch = record_batch(table)?;
    let mut writer = arrow::csv::Writer::new(Vec::new());
    writer.write(&batch)?;
    let bytes = writer.into_inner();
    debug!(rows = batch.num_rows(), bytes = bytes.len(), "csv export");
    Ok(bytes)
}

/// Row array as indented JSON.
pub fn to_json(table: &ResultTable) -> Result<String, ExportError> {
    if table.is_empty() {
        return Err(ExportError::Empty);
    }
    Ok(serde_json::to_string_pretty(table)?)
}
