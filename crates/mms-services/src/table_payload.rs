//! Table payloads embedded in element specifications
//!
//! Tables arrive as JSON documents nested inside an element's instance
//! specification string, or inline in a view's `contains` list. Header cells
//! carry display text, body cells carry the id of the element holding the
//! cell's value.

use mms_core::ElementRecord;
use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Value of the `type` field that marks a payload as a table
pub const TABLE_TYPE: &str = "Table";

/// A table definition: header rows of text cells, body rows of element
/// references. `body[r][0]` references the row's label element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub header: Vec<Vec<RawCell>>,
    pub body: Vec<Vec<RawCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    #[serde(default)]
    pub content: Vec<CellContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl RawCell {
    /// Cell referencing an element
    pub fn source(id: impl Into<String>) -> Self {
        Self {
            content: vec![CellContent {
                text: None,
                source: Some(id.into()),
            }],
        }
    }

    /// Cell holding display text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![CellContent {
                text: Some(text.into()),
                source: None,
            }],
        }
    }

    /// Element id referenced by the cell's first content node
    pub fn source_id(&self) -> ServiceResult<&str> {
        self.content
            .first()
            .and_then(|c| c.source.as_deref())
            .ok_or_else(|| ServiceError::malformed("body cell has no source element"))
    }

    /// Text of the cell's first content node
    pub fn text_value(&self) -> ServiceResult<&str> {
        self.content
            .first()
            .and_then(|c| c.text.as_deref())
            .ok_or_else(|| ServiceError::malformed("header cell has no text"))
    }
}

impl RawTable {
    /// Parse a table from JSON text
    pub fn parse(text: &str) -> ServiceResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| ServiceError::malformed(format!("invalid table document: {}", e)))
    }

    /// Parse a table from an already decoded JSON node
    pub fn from_value(value: &serde_json::Value) -> ServiceResult<Self> {
        Self::deserialize(value)
            .map_err(|e| ServiceError::malformed(format!("invalid table node: {}", e)))
    }

    /// Parse the table embedded in an element's specification string
    pub fn from_element(element: &ElementRecord) -> ServiceResult<Self> {
        let text = element.specification_string().ok_or_else(|| {
            ServiceError::malformed(format!(
                "element {} has no instance specification",
                element.id()
            ))
        })?;
        Self::parse(text)
    }

    /// The first header row, which labels the columns
    pub fn header_row(&self) -> ServiceResult<&[RawCell]> {
        self.header
            .first()
            .map(Vec::as_slice)
            .ok_or_else(|| ServiceError::malformed("table has no header row"))
    }

    pub fn is_table(&self) -> bool {
        self.kind.as_deref() == Some(TABLE_TYPE)
    }
}

/// Remove the first `<p>` and the first `</p>` from authoring-tool text.
///
/// Only one occurrence of each marker is removed; this is not a tag stripper.
pub fn strip_paragraph(text: &str) -> String {
    text.replacen("<p>", "", 1).replacen("</p>", "", 1)
}

/// Remove the first space only
pub(crate) fn strip_first_space(text: &str) -> String {
    text.replacen(' ', "", 1)
}

/// Keep only `[A-Za-z0-9_]` so the result can serve as a DOM id or filter key.
///
/// Lossy: distinct inputs can map to the same id.
pub fn to_valid_id(original: &str) -> String {
    original
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Rotate row-major body cells into column-major element ids:
/// `columns[c][r]` is the source of `body[r][c]`.
///
/// All rows must have the same width.
pub fn transpose_body(body: &[Vec<RawCell>]) -> ServiceResult<Vec<Vec<String>>> {
    let Some(width) = body.first().map(Vec::len) else {
        return Ok(Vec::new());
    };

    let mut columns = vec![Vec::with_capacity(body.len()); width];
    for (r, row) in body.iter().enumerate() {
        if row.len() != width {
            return Err(ServiceError::malformed(format!(
                "body row {} has {} cells, expected {}",
                r,
                row.len(),
                width
            )));
        }
        for (column, cell) in columns.iter_mut().zip(row) {
            column.push(cell.source_id()?.to_string());
        }
    }
    Ok(columns)
}

/// Split a flat list into consecutive groups of the given sizes
pub fn partition_counts<T: Clone>(flat: &[T], counts: &[usize]) -> ServiceResult<Vec<Vec<T>>> {
    let mut cursor = 0;
    let mut groups = Vec::with_capacity(counts.len());
    for (k, &count) in counts.iter().enumerate() {
        let end = cursor + count;
        let group = flat.get(cursor..end).ok_or_else(|| {
            ServiceError::malformed(format!(
                "table {} expects {} entries but only {} remain",
                k,
                count,
                flat.len().saturating_sub(cursor)
            ))
        })?;
        groups.push(group.to_vec());
        cursor = end;
    }
    Ok(groups)
}

/// Re-partition a flat, row-major list of cells into `[table][row][col]`.
///
/// Table `k` consumes `column_counts[k] * row_counts[k]` entries, grouped
/// `column_counts[k]` at a time. A single cursor runs across all tables and
/// never resets. A table without data columns yields no rows.
pub fn partition_rows<T: Clone>(
    flat: &[T],
    column_counts: &[usize],
    row_counts: &[usize],
) -> ServiceResult<Vec<Vec<Vec<T>>>> {
    if column_counts.len() != row_counts.len() {
        return Err(ServiceError::malformed(format!(
            "{} column counts for {} tables",
            column_counts.len(),
            row_counts.len()
        )));
    }

    let sizes: Vec<usize> = column_counts
        .iter()
        .zip(row_counts)
        .map(|(columns, rows)| columns * rows)
        .collect();

    let tables = partition_counts(flat, &sizes)?;
    let consumed: usize = sizes.iter().sum();
    if consumed < flat.len() {
        tracing::warn!(
            leftover = flat.len() - consumed,
            "table cells left over after partitioning"
        );
    }

    Ok(tables
        .into_iter()
        .zip(column_counts)
        .map(|(cells, &columns)| {
            if columns == 0 {
                Vec::new()
            } else {
                cells.chunks(columns).map(<[T]>::to_vec).collect()
            }
        })
        .collect())
}
