//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use mms_core::{CoreError, CoreResult, ElementRecord, ElementStore, ReadContext};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A request seen by the mock store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreRequest {
    Single(String),
    Batch(Vec<String>),
}

/// In-memory element store for testing service-layer logic without a backend.
///
/// Elements are registered up front; ids can be marked as failing to simulate
/// transport errors. Every request is logged for assertions.
pub struct MockElementStore {
    pub elements: HashMap<String, ElementRecord>,
    pub failing: HashSet<String>,
    pub request_log: Arc<parking_lot::Mutex<Vec<StoreRequest>>>,
    pub contexts: Arc<parking_lot::Mutex<Vec<ReadContext>>>,
}

impl MockElementStore {
    pub fn new() -> Self {
        Self {
            elements: HashMap::new(),
            failing: HashSet::new(),
            request_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
            contexts: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    /// Register an element under its `sysmlid`
    pub fn with_element(mut self, element: ElementRecord) -> Self {
        self.elements.insert(element.id().to_string(), element);
        self
    }

    /// Register an element under an explicit id, leaving the record untouched
    pub fn with_element_at(mut self, id: impl Into<String>, element: ElementRecord) -> Self {
        self.elements.insert(id.into(), element);
        self
    }

    /// Requests touching this id fail with a transport error
    pub fn with_failure(mut self, id: impl Into<String>) -> Self {
        self.failing.insert(id.into());
        self
    }

    pub fn request_log(&self) -> Vec<StoreRequest> {
        self.request_log.lock().clone()
    }

    pub fn batch_requests(&self) -> Vec<Vec<String>> {
        self.request_log()
            .into_iter()
            .filter_map(|r| match r {
                StoreRequest::Batch(ids) => Some(ids),
                StoreRequest::Single(_) => None,
            })
            .collect()
    }

    pub fn contexts(&self) -> Vec<ReadContext> {
        self.contexts.lock().clone()
    }

    fn lookup(&self, id: &str) -> CoreResult<ElementRecord> {
        if self.failing.contains(id) {
            return Err(CoreError::Transport(format!("connection reset fetching {}", id)));
        }
        self.elements
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl ElementStore for MockElementStore {
    async fn get_element(&self, id: &str, ctx: &ReadContext) -> CoreResult<ElementRecord> {
        self.request_log.lock().push(StoreRequest::Single(id.to_string()));
        self.contexts.lock().push(ctx.clone());
        self.lookup(id)
    }

    async fn get_elements(
        &self,
        ids: &[String],
        ctx: &ReadContext,
    ) -> CoreResult<Vec<ElementRecord>> {
        self.request_log.lock().push(StoreRequest::Batch(ids.to_vec()));
        self.contexts.lock().push(ctx.clone());
        ids.iter().map(|id| self.lookup(id)).collect()
    }

    fn store_name(&self) -> &str {
        "mock"
    }
}

/// Initialize logging for tests if not already initialized
fn initialize_logging() {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("mms_services=debug".parse().unwrap()),
            )
            .with_test_writer()
            .finish();

        let _ = tracing::subscriber::set_global_default(subscriber);
    });
}

/// Wrap a mock for use as a service store, keeping a typed handle for
/// assertions
pub fn store(mock: MockElementStore) -> (Arc<MockElementStore>, Arc<dyn ElementStore>) {
    initialize_logging();
    let mock = Arc::new(mock);
    let dyn_store: Arc<dyn ElementStore> = mock.clone();
    (mock, dyn_store)
}

// ============ Payload builders ============

pub fn header_cell(text: &str) -> Value {
    json!({ "content": [{ "text": text }] })
}

pub fn source_cell(id: &str) -> Value {
    json!({ "content": [{ "source": id }] })
}

/// A table node: `headers` is the full first header row (including the
/// row-label placeholder), `rows` are element ids per body row.
pub fn table_node(title: Option<&str>, headers: &[&str], rows: &[&[&str]]) -> Value {
    let mut node = json!({
        "type": "Table",
        "header": [headers.iter().map(|h| header_cell(h)).collect::<Vec<_>>()],
        "body": rows
            .iter()
            .map(|row| row.iter().map(|id| source_cell(id)).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    });
    if let Some(title) = title {
        node["title"] = json!(title);
    }
    node
}

pub fn paragraph_node(text: &str) -> Value {
    json!({ "type": "Paragraph", "sourceType": "text", "text": text })
}

/// An instance element whose specification string embeds `spec`
pub fn instance(id: &str, spec: &Value) -> ElementRecord {
    ElementRecord::with_id(id).with_specialization(json!({
        "type": "InstanceSpecification",
        "instanceSpecificationSpecification": {
            "type": "LiteralString",
            "string": spec.to_string()
        }
    }))
}

/// A document element referencing instances through `contents`
pub fn legacy_document(id: &str, instances: &[&str]) -> ElementRecord {
    let operands: Vec<Value> = instances.iter().map(|i| json!({ "instance": i })).collect();
    ElementRecord::with_id(id).with_specialization(json!({
        "type": "View",
        "contents": { "type": "Expression", "operand": operands }
    }))
}

/// A view element with inline `contains` nodes
pub fn inline_document(id: &str, contains: Vec<Value>) -> ElementRecord {
    ElementRecord::with_id(id).with_specialization(json!({
        "type": "View",
        "contains": contains
    }))
}

/// A named element, typically a row header
pub fn named(id: &str, name: &str) -> ElementRecord {
    ElementRecord::with_id(id).named(name)
}

/// A cell element carrying one value slot
pub fn valued(id: &str, name: &str, slot: Value) -> ElementRecord {
    ElementRecord::with_id(id)
        .named(name)
        .with_specialization(json!({ "type": "Property", "value": [slot] }))
}
