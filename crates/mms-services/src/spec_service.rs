//! Element spec service
//!
//! Builds the read/edit model behind an element's spec window: which value
//! the element exposes, whether it may be edited at the requested version,
//! and the allowed options of a restricted property value.

use mms_core::{ElementRecord, ElementStore, ReadContext};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

use crate::batch::ElementBatch;
use crate::error::{ServiceError, ServiceResult};

/// Which fields of a spec may be edited
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    #[default]
    All,
    None,
}

/// Literal types a property value can be extended with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LiteralKind {
    LiteralString,
    LiteralInteger,
    LiteralReal,
    LiteralBoolean,
}

impl LiteralKind {
    /// Parse a specialization type name such as `LiteralReal`
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "LiteralString" => Some(Self::LiteralString),
            "LiteralInteger" => Some(Self::LiteralInteger),
            "LiteralReal" => Some(Self::LiteralReal),
            "LiteralBoolean" => Some(Self::LiteralBoolean),
            _ => None,
        }
    }

    pub fn type_name(self) -> &'static str {
        match self {
            Self::LiteralString => "LiteralString",
            Self::LiteralInteger => "LiteralInteger",
            Self::LiteralReal => "LiteralReal",
            Self::LiteralBoolean => "LiteralBoolean",
        }
    }

    /// A fresh value slot of this kind holding its zero value
    pub fn default_value(self) -> JsonValue {
        let ty = self.type_name();
        match self {
            Self::LiteralString => json!({ "type": ty, "string": "" }),
            Self::LiteralInteger => json!({ "type": ty, "integer": 0 }),
            Self::LiteralReal => json!({ "type": ty, "double": 0.0 }),
            Self::LiteralBoolean => json!({ "type": ty, "boolean": false }),
        }
    }
}

/// The value an element shows in its spec
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SpecValue {
    /// Element kinds without a displayed value
    #[default]
    None,
    /// `specialization.value` of a `Property`
    Values(Vec<JsonValue>),
    /// `specialization.specification` of a `Constraint`
    Specification(JsonValue),
}

impl SpecValue {
    pub fn from_element(element: &ElementRecord) -> Self {
        match element.specialization_type() {
            Some("Property") => {
                Self::Values(element.value_slots().map(<[JsonValue]>::to_vec).unwrap_or_default())
            }
            Some("Constraint") => Self::Specification(
                element
                    .specialization
                    .get("specification")
                    .cloned()
                    .unwrap_or(JsonValue::Null),
            ),
            _ => Self::None,
        }
    }

    pub fn values(&self) -> Option<&[JsonValue]> {
        match self {
            Self::Values(values) => Some(values),
            _ => None,
        }
    }
}

/// Whether a property's values describe a restricted value: the first value
/// is an expression whose third operand is an expression listing the allowed
/// elements.
pub fn is_restricted_value(values: &[JsonValue]) -> bool {
    let Some(first) = values.first() else {
        return false;
    };
    if first.get("type").and_then(JsonValue::as_str) != Some("Expression") {
        return false;
    }
    first
        .get("operand")
        .and_then(JsonValue::as_array)
        .and_then(|operands| operands.get(2))
        .and_then(|choices| choices.get("operand"))
        .is_some_and(JsonValue::is_array)
}

/// Element ids of the allowed options of a restricted value,
/// `values[0].operand[2].operand[*].element`
pub fn restricted_option_ids(values: &[JsonValue]) -> ServiceResult<Vec<String>> {
    let choices = values
        .first()
        .and_then(|v| v.get("operand"))
        .and_then(JsonValue::as_array)
        .and_then(|operands| operands.get(2))
        .and_then(|choices| choices.get("operand"))
        .and_then(JsonValue::as_array)
        .ok_or_else(|| ServiceError::malformed("restricted value has no option list"))?;

    choices
        .iter()
        .map(|choice| {
            choice
                .get("element")
                .and_then(JsonValue::as_str)
                .map(str::to_string)
                .ok_or_else(|| ServiceError::malformed("restricted value option has no element"))
        })
        .collect()
}

/// Whether an element can be edited.
///
/// Read-only when the edit field is `none`, when the backend marks the
/// element non-editable, or when reading a version other than latest. An
/// empty version counts as latest.
pub fn is_editable(element: &ElementRecord, edit_field: EditField, ctx: &ReadContext) -> bool {
    edit_field != EditField::None
        && element.is_editable()
        && (ctx.version.is_empty() || ctx.is_latest())
}

/// Read/edit model of one element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSpec {
    pub element: ElementRecord,
    pub value: SpecValue,
    pub editable: bool,
    pub restricted: bool,
    /// Working copy of a property's values, present only when editable
    pub edit_values: Option<Vec<JsonValue>>,
    /// Allowed option elements of a restricted value, in option order
    pub options: Vec<ElementRecord>,
}

impl ElementSpec {
    /// Read-only spec of an element that is already loaded
    pub fn read_only(element: ElementRecord) -> Self {
        let value = SpecValue::from_element(&element);
        let restricted = value.values().is_some_and(is_restricted_value);
        Self {
            element,
            value,
            editable: false,
            restricted,
            edit_values: None,
            options: Vec::new(),
        }
    }

    /// Append a zero-valued literal to the working values
    pub fn add_value(&mut self, kind: LiteralKind) -> ServiceResult<()> {
        self.edit_values_mut()?.push(kind.default_value());
        Ok(())
    }

    /// Append an instance value pointing at `instance_id`
    pub fn add_enumeration_value(&mut self, instance_id: &str) -> ServiceResult<()> {
        self.edit_values_mut()?
            .push(json!({ "type": "InstanceValue", "instance": instance_id }));
        Ok(())
    }

    /// Remove the working value at `index`; out-of-range indexes are ignored
    pub fn remove_value(&mut self, index: usize) -> ServiceResult<()> {
        let values = self.edit_values_mut()?;
        if index < values.len() {
            values.remove(index);
        }
        Ok(())
    }

    fn edit_values_mut(&mut self) -> ServiceResult<&mut Vec<JsonValue>> {
        let id = self.element.id().to_string();
        self.edit_values.as_mut().ok_or_else(|| {
            ServiceError::malformed(format!("element {} has no editable values", id))
        })
    }
}

/// Service building element specs
#[derive(Debug, Default)]
pub struct SpecService;

impl SpecService {
    pub fn new() -> Self {
        Self
    }

    /// Load the spec of an element.
    ///
    /// For an editable restricted property the allowed options are fetched in
    /// one batch at the same context.
    #[tracing::instrument(skip(self, store, ctx), fields(ctx = %ctx))]
    pub async fn load_spec(
        &self,
        store: Arc<dyn ElementStore>,
        element_id: &str,
        edit_field: EditField,
        ctx: &ReadContext,
    ) -> ServiceResult<ElementSpec> {
        let element = store.get_element(element_id, ctx).await?;
        let editable = is_editable(&element, edit_field, ctx);
        let mut spec = ElementSpec::read_only(element);
        if !editable {
            tracing::debug!("element is read-only");
            return Ok(spec);
        }
        spec.editable = true;

        let Some(values) = spec.value.values().map(<[JsonValue]>::to_vec) else {
            return Ok(spec);
        };
        if spec.restricted {
            let option_ids = restricted_option_ids(&values)?;
            let batch = ElementBatch::fetch(store.as_ref(), &option_ids, ctx).await?;
            spec.options = batch.resolve(&option_ids)?;
            tracing::debug!(options = spec.options.len(), "restricted value options loaded");
        }
        spec.edit_values = Some(values);
        Ok(spec)
    }
}
