use mms_core::ElementRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A typed value read from a table cell's element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Double(f64),
    Integer(i64),
    /// First entry of an `expressionBody`, or a value key holding an
    /// unexpected JSON type
    Raw(serde_json::Value),
    String(String),
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Double(v) => Some(*v),
            CellValue::Integer(v) => Some(*v as f64),
            CellValue::Raw(v) => v.as_f64(),
            CellValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            CellValue::Raw(v) => v.as_str(),
            _ => None,
        }
    }
}

/// A single table read column by column.
///
/// `column_headers`, `columns` and `column_keys` always have the same length.
/// A column only holds values for cells whose element carried a recognized
/// value, so it can be shorter than `row_headers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub title: Option<String>,
    pub column_headers: Vec<String>,
    /// Elements referenced by the first body column, in row order
    pub row_headers: Vec<ElementRecord>,
    pub columns: Vec<Vec<CellValue>>,
    /// Name of the first element that produced a value in each column
    pub column_keys: Vec<Option<String>>,
}

/// Presence sets used by the UI to toggle row and column visibility
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableFilters {
    /// Sanitized row-header element names
    pub row_headers: BTreeSet<String>,
    /// Sanitized column labels
    pub column_headers: BTreeSet<String>,
}

/// Every table of a document, position `k` in each list describing table `k`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MultiTableResult {
    /// Display titles
    pub table_titles: Vec<String>,
    /// Table ids, also the keys of `data_id_filters`
    pub table_ids: Vec<String>,
    pub table_column_headers_labels: Vec<Vec<String>>,
    pub table_row_headers: Vec<Vec<ElementRecord>>,
    /// `[table][row][column]`
    pub datavalues: Vec<Vec<Vec<ElementRecord>>>,
    pub data_id_filters: HashMap<String, TableFilters>,
}

impl MultiTableResult {
    pub fn table_count(&self) -> usize {
        self.table_ids.len()
    }
}
