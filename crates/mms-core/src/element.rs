//! Element records as served by the model management backend

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A model element record.
///
/// Only the fields the library reads are typed; everything else the backend
/// sends is kept in `extra` so a record survives a round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sysmlid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub specialization: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ElementRecord {
    /// Create an empty record carrying only an id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            sysmlid: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_specialization(mut self, specialization: Value) -> Self {
        self.specialization = specialization;
        self
    }

    pub fn with_documentation(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = Some(documentation.into());
        self
    }

    /// Element id, or an empty string when the backend omitted it
    pub fn id(&self) -> &str {
        self.sysmlid.as_deref().unwrap_or_default()
    }

    /// Element name, or an empty string when the backend omitted it
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// The JSON document embedded in an instance specification
    /// (`specialization.instanceSpecificationSpecification.string`).
    pub fn specification_string(&self) -> Option<&str> {
        self.specialization
            .get("instanceSpecificationSpecification")?
            .get("string")?
            .as_str()
    }

    /// `specialization.value`, when it is an array of value slots
    pub fn value_slots(&self) -> Option<&[Value]> {
        self.specialization
            .get("value")?
            .as_array()
            .map(Vec::as_slice)
    }

    /// Whether the record carries a `specialization.contents` document
    pub fn has_contents(&self) -> bool {
        self.specialization
            .get("contents")
            .is_some_and(|v| !v.is_null())
    }

    /// `specialization.contents.operand`
    pub fn contents_operands(&self) -> Option<&[Value]> {
        self.specialization
            .get("contents")?
            .get("operand")?
            .as_array()
            .map(Vec::as_slice)
    }

    /// `specialization.contains`
    pub fn contains(&self) -> Option<&[Value]> {
        self.specialization
            .get("contains")?
            .as_array()
            .map(Vec::as_slice)
    }

    /// `specialization.type`, e.g. `Property` or `Constraint`
    pub fn specialization_type(&self) -> Option<&str> {
        self.specialization.get("type")?.as_str()
    }

    /// The backend's `editable` flag. Missing or non-boolean means read-only.
    pub fn is_editable(&self) -> bool {
        self.extra
            .get("editable")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }
}
