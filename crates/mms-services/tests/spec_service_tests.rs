//! Integration tests for SpecService

mod common;

use mms_core::{ElementRecord, ReadContext};
use mms_services::{EditField, LiteralKind, ServiceError, SpecService, SpecValue};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use common::{named, store, MockElementStore, StoreRequest};

fn editable(mut element: ElementRecord) -> ElementRecord {
    element.extra.insert("editable".to_string(), json!(true));
    element
}

fn property(id: &str, values: Vec<Value>) -> ElementRecord {
    ElementRecord::with_id(id)
        .named("mass")
        .with_specialization(json!({ "type": "Property", "value": values }))
}

fn restricted_property(id: &str, options: &[&str]) -> ElementRecord {
    let choices: Vec<Value> = options.iter().map(|o| json!({ "element": o })).collect();
    property(
        id,
        vec![json!({
            "type": "Expression",
            "operand": [
                { "type": "ElementValue", "element": "_restricted" },
                { "type": "ElementValue", "element": id },
                { "type": "Expression", "operand": choices }
            ]
        })],
    )
}

#[tokio::test]
async fn load_spec_editable_property_gets_working_values() {
    let values = vec![json!({ "type": "LiteralReal", "double": 2.5 })];
    let (mock, store) =
        store(MockElementStore::new().with_element(editable(property("_p", values.clone()))));

    let mut spec = SpecService::new()
        .load_spec(store, "_p", EditField::All, &ReadContext::default())
        .await
        .expect("should load spec");

    assert!(spec.editable);
    assert!(!spec.restricted);
    assert_eq!(spec.value, SpecValue::Values(values.clone()));
    assert_eq!(spec.edit_values.as_ref(), Some(&values));
    assert_eq!(mock.request_log(), vec![StoreRequest::Single("_p".to_string())]);

    spec.add_value(LiteralKind::LiteralString).unwrap();
    spec.add_value(LiteralKind::LiteralBoolean).unwrap();
    spec.remove_value(0).unwrap();
    spec.remove_value(9).unwrap();
    assert_eq!(
        spec.edit_values,
        Some(vec![
            json!({ "type": "LiteralString", "string": "" }),
            json!({ "type": "LiteralBoolean", "boolean": false }),
        ])
    );
    assert_eq!(spec.value, SpecValue::Values(values));
}

#[tokio::test]
async fn load_spec_is_read_only_at_older_version() {
    let (mock, store) = store(
        MockElementStore::new().with_element(editable(restricted_property("_p", &["_a"]))),
    );

    let spec = SpecService::new()
        .load_spec(store, "_p", EditField::All, &ReadContext::new("master", "7"))
        .await
        .expect("should load spec");

    assert!(!spec.editable);
    assert!(spec.restricted);
    assert!(spec.edit_values.is_none());
    assert!(spec.options.is_empty());
    assert!(mock.batch_requests().is_empty());
}

#[tokio::test]
async fn load_spec_respects_edit_field_and_element_flag() {
    let (_mock, store) = store(
        MockElementStore::new()
            .with_element(editable(property("_open", vec![])))
            .with_element(property("_locked", vec![])),
    );
    let service = SpecService::new();
    let ctx = ReadContext::default();

    let none = service.load_spec(store.clone(), "_open", EditField::None, &ctx).await.unwrap();
    assert!(!none.editable);

    let locked = service.load_spec(store, "_locked", EditField::All, &ctx).await.unwrap();
    assert!(!locked.editable);
}

#[tokio::test]
async fn load_spec_fetches_restricted_options_in_one_batch() {
    let (mock, store) = store(
        MockElementStore::new()
            .with_element(editable(restricted_property("_p", &["_red", "_green"])))
            .with_element(named("_red", "Red"))
            .with_element(named("_green", "Green")),
    );
    let ctx = ReadContext::new("dev", "latest");

    let mut spec = SpecService::new()
        .load_spec(store, "_p", EditField::All, &ctx)
        .await
        .expect("should load spec");

    assert!(spec.restricted);
    let names: Vec<&str> = spec.options.iter().map(|o| o.name_or_empty()).collect();
    assert_eq!(names, vec!["Red", "Green"]);
    assert_eq!(
        mock.batch_requests(),
        vec![vec!["_red".to_string(), "_green".to_string()]]
    );
    assert!(mock.contexts().iter().all(|c| *c == ctx));

    spec.add_enumeration_value("_red").unwrap();
    let added = spec.edit_values.as_ref().and_then(|v| v.last()).cloned();
    assert_eq!(added, Some(json!({ "type": "InstanceValue", "instance": "_red" })));
}

#[tokio::test]
async fn load_spec_constraint_exposes_specification() {
    let constraint = editable(ElementRecord::with_id("_c").with_specialization(json!({
        "type": "Constraint",
        "specification": { "type": "Expression", "operand": [{ "string": "mass < 10" }] }
    })));
    let (_mock, store) = store(MockElementStore::new().with_element(constraint));

    let spec = SpecService::new()
        .load_spec(store, "_c", EditField::All, &ReadContext::default())
        .await
        .unwrap();

    assert!(spec.editable);
    assert_eq!(
        spec.value,
        SpecValue::Specification(
            json!({ "type": "Expression", "operand": [{ "string": "mass < 10" }] })
        )
    );
    assert!(spec.edit_values.is_none());
}

#[tokio::test]
async fn load_spec_propagates_missing_option() {
    let (_mock, store) = store(
        MockElementStore::new()
            .with_element(editable(restricted_property("_p", &["_gone"]))),
    );

    let result = SpecService::new()
        .load_spec(store, "_p", EditField::All, &ReadContext::default())
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound(id)) if id == "_gone"));
}

#[tokio::test]
async fn load_spec_missing_element_is_not_found() {
    let (_mock, store) = store(MockElementStore::new());

    let result = SpecService::new()
        .load_spec(store, "_nope", EditField::All, &ReadContext::default())
        .await;

    assert!(result.unwrap_err().is_not_found());
}
