//! Reservation service and identity data models.
//!
//! Business groups and reservations are kept close to the wire format: the fields the
//! client reads are typed, everything else is carried in `extra` untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use vra_core::display::IdName;

/// Dependency key naming the compute resource a reservation is placed on.
pub const COMPUTE_RESOURCE_KEY: &str = "computeResource";

/// Class id of compute resource entity references.
pub const COMPUTE_RESOURCE_CLASS_ID: &str = "ComputeResource";

/// Entity reference type tag.
pub const ENTITY_REF_TYPE: &str = "entityRef";

/// Business group (identity subtenant).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BusinessGroup {
    /// Subtenant id.
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Remaining subtenant fields (description, tenant, extensionData, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IdName for BusinessGroup {
    fn id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

/// Reservation of compute, storage and network capacity for a business group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    /// Reservation id.
    pub id: String,

    /// Reservation name.
    #[serde(default)]
    pub name: String,

    /// Remaining reservation fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Reservation {
    /// Reservation type id, e.g. `Infrastructure.Reservation.Virtual.vSphere`.
    #[must_use]
    pub fn reservation_type_id(&self) -> Option<&str> {
        self.extra.get("reservationTypeId").and_then(Value::as_str)
    }

    /// Business group the reservation belongs to.
    #[must_use]
    pub fn subtenant_id(&self) -> Option<&str> {
        self.extra.get("subTenantId").and_then(Value::as_str)
    }

    /// Whether the reservation is enabled.
    #[must_use]
    pub fn enabled(&self) -> Option<bool> {
        self.extra.get("enabled").and_then(Value::as_bool)
    }
}

impl IdName for Reservation {
    fn id(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

/// Reference to another entity in a field-value request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    /// Always `entityRef`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Component id; unset for compute resources and sent as `null`.
    pub component_id: Option<String>,
    /// Entity class id.
    pub class_id: String,
    /// Entity id.
    pub id: String,
}

/// One `{key, value}` dependency of a field-value request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyEntry {
    /// Field the value satisfies.
    pub key: String,
    /// Referenced entity.
    pub value: EntityRef,
}

/// Dependency values of a field-value request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyValues {
    /// Dependency entries.
    pub entries: Vec<DependencyEntry>,
}

/// Body of a `schema/{id}/default/{field}/values` request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FieldValuesRequest {
    /// Free-text filter; empty lists every value.
    pub text: String,
    /// Values the requested field depends on.
    pub dependency_values: DependencyValues,
}

impl FieldValuesRequest {
    /// Request the values of a field that depends on a compute resource.
    #[must_use]
    pub fn for_compute_resource(compute_resource_id: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            dependency_values: DependencyValues {
                entries: vec![DependencyEntry {
                    key: COMPUTE_RESOURCE_KEY.to_string(),
                    value: EntityRef {
                        kind: ENTITY_REF_TYPE.to_string(),
                        component_id: None,
                        class_id: COMPUTE_RESOURCE_CLASS_ID.to_string(),
                        id: compute_resource_id.into(),
                    },
                }],
            },
        }
    }
}
