//! Table reconstruction service
//!
//! Rebuilds tables embedded in model elements into column- or row-oriented
//! structures the UI can render and filter. Cell values are not stored in the
//! table payload itself; each body cell references an element, so every read
//! ends in one or more batched element fetches.

use futures::future::try_join_all;
use mms_core::{ElementRecord, ElementStore, ReadContext};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;

use crate::batch::ElementBatch;
use crate::error::{ServiceError, ServiceResult};
use crate::table_payload::{
    partition_counts, partition_rows, strip_first_space, strip_paragraph, to_valid_id,
    transpose_body, RawCell, RawTable, TABLE_TYPE,
};
use crate::view_models::{CellValue, MultiTableResult, Table, TableFilters};

/// How tables found inline in a view's `contains` list are identified.
///
/// Inline tables carry no element id of their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineTableIds {
    /// `_` followed by a random integer in `1..=1000`. Two tables in one
    /// document can collide.
    #[default]
    Random,
    /// `_` followed by the table's index in the `contains` list
    Positional,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableServiceConfig {
    pub inline_table_ids: InlineTableIds,
}

/// Per-table metadata and flat id lists gathered before the value fetches
#[derive(Debug, Default)]
struct TableAccumulator {
    titles: Vec<String>,
    ids: Vec<String>,
    column_labels: Vec<Vec<String>>,
    row_counts: Vec<usize>,
    row_header_ids: Vec<String>,
    data_value_ids: Vec<String>,
}

impl TableAccumulator {
    fn push_table(
        &mut self,
        title: String,
        id: String,
        labels: Vec<String>,
        body: &[Vec<RawCell>],
    ) -> ServiceResult<()> {
        self.row_counts.push(body.len());
        for row in body {
            let (label, cells) = row
                .split_first()
                .ok_or_else(|| ServiceError::malformed(format!("table {} has an empty row", id)))?;
            self.row_header_ids.push(label.source_id()?.to_string());
            for cell in cells {
                self.data_value_ids.push(cell.source_id()?.to_string());
            }
        }
        self.titles.push(title);
        self.ids.push(id);
        self.column_labels.push(labels);
        Ok(())
    }
}

/// Read the value of a cell element.
///
/// Looks at the first value slot and takes the first key present out of
/// `double`, `integer`, `expressionBody`, `string`. Once a key is present the
/// value comes from that key alone: a value of an unexpected JSON type is kept
/// as [`CellValue::Raw`], and an empty `expressionBody` yields no value.
pub fn cell_value(record: &ElementRecord) -> Option<CellValue> {
    let slot = record.value_slots()?.first()?;
    if let Some(v) = slot.get("double") {
        return Some(v.as_f64().map_or_else(|| CellValue::Raw(v.clone()), CellValue::Double));
    }
    if let Some(v) = slot.get("integer") {
        return Some(v.as_i64().map_or_else(|| CellValue::Raw(v.clone()), CellValue::Integer));
    }
    if let Some(body) = slot.get("expressionBody") {
        return body
            .as_array()
            .and_then(|body| body.first())
            .map(|v| CellValue::Raw(v.clone()));
    }
    slot.get("string").map(|v| match v.as_str() {
        Some(s) => CellValue::String(s.to_string()),
        None => CellValue::Raw(v.clone()),
    })
}

/// Drop columns with no values, together with their header and key.
///
/// Walks from the last column down so removals never shift a column that has
/// not been visited yet.
pub fn prune_empty_columns(
    headers: &mut Vec<String>,
    columns: &mut Vec<Vec<CellValue>>,
    keys: &mut Vec<Option<String>>,
) {
    for c in (0..columns.len()).rev() {
        if columns[c].is_empty() {
            columns.remove(c);
            if c < headers.len() {
                headers.remove(c);
            }
            if c < keys.len() {
                keys.remove(c);
            }
        }
    }
}

/// Service for reading tables out of model elements
///
/// Handles:
/// - Single tables read column by column ([`TableService::read_table_cols`])
/// - Every table of a document ([`TableService::read_tables`]), for both the
///   `contents` and the inline `contains` document shapes
pub struct TableService {
    config: TableServiceConfig,
}

impl Default for TableService {
    fn default() -> Self {
        Self::new()
    }
}

impl TableService {
    pub fn new() -> Self {
        Self::with_config(TableServiceConfig::default())
    }

    pub fn with_config(config: TableServiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TableServiceConfig {
        &self.config
    }

    /// Read a single table as columns of typed values.
    ///
    /// The element's specification holds one table. Each body column is
    /// fetched in its own batch and all batches run concurrently. Columns in
    /// which no cell produced a value are dropped along with their header.
    ///
    /// # Arguments
    ///
    /// * `store` - Element source
    /// * `element_id` - Id of the element whose specification holds the table
    /// * `ctx` - Workspace/version to read at
    #[tracing::instrument(skip(self, store, ctx), fields(ctx = %ctx))]
    pub async fn read_table_cols(
        &self,
        store: Arc<dyn ElementStore>,
        element_id: &str,
        ctx: &ReadContext,
    ) -> ServiceResult<Table> {
        let element = store.get_element(element_id, ctx).await?;
        let raw = RawTable::from_element(&element)?;

        let mut headers = raw
            .header_row()?
            .iter()
            .map(|cell| cell.text_value().map(strip_paragraph))
            .collect::<ServiceResult<Vec<_>>>()?;

        let id_columns = if raw.body.is_empty() {
            vec![Vec::new(); headers.len()]
        } else {
            transpose_body(&raw.body)?
        };
        if id_columns.len() != headers.len() {
            return Err(ServiceError::malformed(format!(
                "table {} has {} headers for {} columns",
                element_id,
                headers.len(),
                id_columns.len()
            )));
        }

        let store = store.as_ref();
        let batches = try_join_all(
            id_columns
                .iter()
                .map(|ids| ElementBatch::fetch(store, ids, ctx)),
        )
        .await?;

        let mut columns = Vec::with_capacity(id_columns.len());
        let mut keys = vec![None; id_columns.len()];
        let mut row_headers = Vec::new();

        for (c, (ids, batch)) in id_columns.iter().zip(&batches).enumerate() {
            let records = batch.resolve(ids)?;
            let mut values = Vec::with_capacity(records.len());
            for record in &records {
                if record.value_slots().is_none() {
                    tracing::debug!(element = record.id(), "cell element has no value");
                    continue;
                }
                match cell_value(record) {
                    Some(value) => {
                        if keys[c].is_none() {
                            keys[c] = record.name.clone();
                        }
                        values.push(value);
                    }
                    None => {
                        tracing::warn!(
                            element = record.id(),
                            column = c,
                            "no recognized value type in cell element, skipping"
                        );
                    }
                }
            }
            if c == 0 {
                row_headers = records;
            }
            columns.push(values);
        }

        prune_empty_columns(&mut headers, &mut columns, &mut keys);
        tracing::debug!(
            columns = columns.len(),
            rows = row_headers.len(),
            "table columns read"
        );

        Ok(Table {
            title: raw.title,
            column_headers: headers,
            row_headers,
            columns,
            column_keys: keys,
        })
    }

    /// Read every table in a document.
    ///
    /// Documents come in two shapes. With `specialization.contents` the
    /// document references instance elements, some of which are tables. With
    /// `specialization.contains` the tables are embedded inline, and a text
    /// paragraph right before an untitled table supplies its caption.
    ///
    /// Any failed fetch fails the whole read.
    #[tracing::instrument(skip(self, store, ctx), fields(ctx = %ctx))]
    pub async fn read_tables(
        &self,
        store: Arc<dyn ElementStore>,
        element_id: &str,
        ctx: &ReadContext,
    ) -> ServiceResult<MultiTableResult> {
        let document = store.get_element(element_id, ctx).await?;

        let tables = if document.has_contents() {
            self.collect_referenced_tables(store.as_ref(), &document, ctx)
                .await?
        } else if let Some(contains) = document.contains() {
            self.collect_inline_tables(contains)?
        } else {
            return Err(ServiceError::malformed(format!(
                "element {} has neither contents nor contains",
                element_id
            )));
        };

        tracing::debug!(tables = tables.ids.len(), "collected table layouts");
        self.resolve_tables(store.as_ref(), tables, ctx).await
    }

    /// Tables referenced as instances from `specialization.contents`
    async fn collect_referenced_tables(
        &self,
        store: &dyn ElementStore,
        document: &ElementRecord,
        ctx: &ReadContext,
    ) -> ServiceResult<TableAccumulator> {
        let instance_ids = document
            .contents_operands()
            .unwrap_or_default()
            .iter()
            .map(|operand| {
                operand
                    .get("instance")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| ServiceError::malformed("contents operand has no instance"))
            })
            .collect::<ServiceResult<Vec<_>>>()?;

        let batch = ElementBatch::fetch(store, &instance_ids, ctx).await?;
        let mut tables = TableAccumulator::default();

        for instance in batch.resolve(&instance_ids)? {
            let text = instance.specification_string().ok_or_else(|| {
                ServiceError::malformed(format!(
                    "instance {} has no specification",
                    instance.id()
                ))
            })?;
            let spec: JsonValue = serde_json::from_str(text).map_err(|e| {
                ServiceError::malformed(format!("instance {}: {}", instance.id(), e))
            })?;
            if spec.get("type").and_then(JsonValue::as_str) != Some(TABLE_TYPE) {
                continue;
            }

            let raw = RawTable::from_value(&spec)?;
            let labels = raw
                .header_row()?
                .iter()
                .skip(1)
                .map(|cell| cell.text_value().map(|t| strip_first_space(&strip_paragraph(t))))
                .collect::<ServiceResult<Vec<_>>>()?;

            tables.push_table(
                raw.title.clone().unwrap_or_default(),
                instance.id().to_string(),
                labels,
                &raw.body,
            )?;
        }

        Ok(tables)
    }

    /// Tables embedded in `specialization.contains`
    fn collect_inline_tables(&self, contains: &[JsonValue]) -> ServiceResult<TableAccumulator> {
        let mut tables = TableAccumulator::default();

        for (k, node) in contains.iter().enumerate() {
            if node.get("type").and_then(JsonValue::as_str) != Some(TABLE_TYPE) {
                continue;
            }
            let raw = RawTable::from_value(node)?;

            let title = match raw.title.as_deref().filter(|t| !t.is_empty()) {
                Some(title) => to_valid_id(title),
                None => k
                    .checked_sub(1)
                    .and_then(|prev| contains.get(prev))
                    .and_then(Self::caption_text)
                    .map(|text| to_valid_id(&strip_first_space(&strip_paragraph(text))))
                    .unwrap_or_default(),
            };

            let labels = raw
                .header_row()?
                .iter()
                .skip(1)
                .map(|cell| cell.text_value().map(strip_paragraph))
                .collect::<ServiceResult<Vec<_>>>()?;

            let id = self.inline_table_id(k);
            tables.push_table(title, id, labels, &raw.body)?;
        }

        Ok(tables)
    }

    /// Text of a paragraph node that can caption the table after it
    fn caption_text(node: &JsonValue) -> Option<&str> {
        if node.get("sourceType").and_then(JsonValue::as_str) != Some("text") {
            return None;
        }
        Some(node.get("text").and_then(JsonValue::as_str).unwrap_or_default())
    }

    fn inline_table_id(&self, position: usize) -> String {
        match self.config.inline_table_ids {
            InlineTableIds::Random => {
                format!("_{}", rand::thread_rng().gen_range(1..=1000))
            }
            InlineTableIds::Positional => format!("_{}", position),
        }
    }

    /// Fetch row headers and cell elements for every collected table and
    /// split them back into per-table structures.
    async fn resolve_tables(
        &self,
        store: &dyn ElementStore,
        tables: TableAccumulator,
        ctx: &ReadContext,
    ) -> ServiceResult<MultiTableResult> {
        let (row_batch, value_batch) = tokio::try_join!(
            ElementBatch::fetch(store, &tables.row_header_ids, ctx),
            ElementBatch::fetch(store, &tables.data_value_ids, ctx),
        )?;

        let column_counts: Vec<usize> = tables.column_labels.iter().map(Vec::len).collect();

        let table_row_headers = partition_counts(&tables.row_header_ids, &tables.row_counts)?
            .iter()
            .map(|ids| row_batch.resolve(ids))
            .collect::<ServiceResult<Vec<_>>>()?;

        let datavalues = partition_rows(&tables.data_value_ids, &column_counts, &tables.row_counts)?
            .iter()
            .map(|rows| {
                rows.iter()
                    .map(|ids| value_batch.resolve(ids))
                    .collect::<ServiceResult<Vec<_>>>()
            })
            .collect::<ServiceResult<Vec<_>>>()?;

        let mut data_id_filters = HashMap::with_capacity(tables.ids.len());
        for ((id, row_headers), labels) in tables
            .ids
            .iter()
            .zip(&table_row_headers)
            .zip(&tables.column_labels)
        {
            let filters = TableFilters {
                row_headers: row_headers
                    .iter()
                    .map(|r| to_valid_id(r.name_or_empty()))
                    .collect(),
                column_headers: labels.iter().map(|l| to_valid_id(l)).collect(),
            };
            if data_id_filters.insert(id.clone(), filters).is_some() {
                tracing::warn!(table = %id, "duplicate table id, filters overwritten");
            }
        }

        Ok(MultiTableResult {
            table_titles: tables.titles,
            table_ids: tables.ids,
            table_column_headers_labels: tables.column_labels,
            table_row_headers,
            datavalues,
            data_id_filters,
        })
    }
}
