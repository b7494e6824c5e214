//! Site document filtering
//!
//! Documents can be hidden site-wide by listing them in the documentation of
//! a well-known filter element, as a JSON object of `document id -> flag`.

use mms_core::{ElementRecord, ElementStore, ReadContext};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{ServiceError, ServiceResult};

/// Id of the element whose documentation holds the document filter
pub const MASTER_FILTER_ID: &str = "master_filter";

/// Set of document ids hidden from site listings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    hidden: HashSet<String>,
}

impl DocumentFilter {
    /// Parse filter JSON. Ids mapped to a truthy value are hidden; empty text
    /// and `null` mean nothing is hidden.
    pub fn parse(text: &str) -> ServiceResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: JsonValue = serde_json::from_str(text)
            .map_err(|e| ServiceError::malformed(format!("invalid document filter: {}", e)))?;
        match value {
            JsonValue::Null => Ok(Self::default()),
            JsonValue::Object(map) => Ok(Self {
                hidden: map
                    .into_iter()
                    .filter(|(_, flag)| is_truthy(flag))
                    .map(|(id, _)| id)
                    .collect(),
            }),
            other => Err(ServiceError::malformed(format!(
                "document filter must be an object, got {}",
                other
            ))),
        }
    }

    pub fn hide(&mut self, id: impl Into<String>) {
        self.hidden.insert(id.into());
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.hidden.contains(id)
    }

    pub fn len(&self) -> usize {
        self.hidden.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty()
    }
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Service for listing the documents of a site
#[derive(Debug, Default)]
pub struct SiteDocsService;

impl SiteDocsService {
    pub fn new() -> Self {
        Self
    }

    /// Load the site-wide document filter.
    ///
    /// A missing filter element or unreadable filter text is not an error:
    /// the listing falls back to showing every document.
    #[tracing::instrument(skip(self, store, ctx), fields(ctx = %ctx))]
    pub async fn load_filter(
        &self,
        store: Arc<dyn ElementStore>,
        ctx: &ReadContext,
    ) -> DocumentFilter {
        let element = match store.get_element(MASTER_FILTER_ID, ctx).await {
            Ok(element) => element,
            Err(e) => {
                tracing::debug!("document filter unavailable: {}", e);
                return DocumentFilter::default();
            }
        };

        match DocumentFilter::parse(element.documentation.as_deref().unwrap_or_default()) {
            Ok(filter) => filter,
            Err(e) => {
                tracing::warn!("ignoring document filter: {}", e);
                DocumentFilter::default()
            }
        }
    }

    /// Documents not hidden by `filter`, each id kept once (first wins),
    /// in input order
    pub fn visible_documents(
        &self,
        docs: &[ElementRecord],
        filter: &DocumentFilter,
    ) -> Vec<ElementRecord> {
        let mut seen = HashSet::new();
        docs.iter()
            .filter(|doc| !filter.is_hidden(doc.id()))
            .filter(|doc| seen.insert(doc.id().to_string()))
            .cloned()
            .collect()
    }
}
