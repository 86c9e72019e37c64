//! Catalog resource helpers.
//!
//! Resources and requests are handed back exactly as the catalog service returns them.
//! The helpers here only reach into the few fields the client dereferences.

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vra_core::Error;

/// Key of the resource data entry that lists a machine's network interfaces.
pub const NETWORK_LIST_KEY: &str = "NETWORK_LIST";

/// One `{key, value}` pair of a resource's `resourceData.entries`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceEntry {
    /// Entry key, e.g. `MachineName` or `NETWORK_LIST`.
    pub key: String,
    /// Entry value, passed through untouched.
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Deserialize)]
struct ResourceData {
    entries: Vec<ResourceEntry>,
}

/// Parse the `resourceData.entries` list of a catalog resource.
///
/// # Errors
///
/// Returns [`Error::MissingField`] when the resource has no `resourceData.entries`, and
/// [`Error::ParseError`] when an entry has no `key`.
pub fn resource_entries(resource: &Value) -> Result<Vec<ResourceEntry>> {
    let data = resource
        .get("resourceData")
        .ok_or_else(|| Error::MissingField("resourceData".to_string()))?;
    if data.get("entries").is_none() {
        return Err(Error::MissingField("resourceData.entries".to_string()));
    }

    let data: ResourceData = serde_json::from_value(data.clone())?;
    Ok(data.entries)
}

/// Network interface entries of a catalog resource.
///
/// Every `NETWORK_LIST` entry is scanned and every item in it visited; the
/// `values.entries` of the last item visited is returned. A machine with several NICs
/// therefore yields only its final interface.
///
/// # Errors
///
/// Returns [`Error::MissingField`] when the resource carries no network item at all, or
/// when a visited item lacks `values.entries`.
pub fn network_entries(resource: &Value) -> Result<Vec<Value>> {
    let mut last: Option<Vec<Value>> = None;

    for entry in resource_entries(resource)? {
        if entry.key != NETWORK_LIST_KEY {
            continue;
        }

        let items = entry
            .value
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::MissingField(format!("{NETWORK_LIST_KEY}.value.items")))?;

        for item in items {
            let entries = item
                .pointer("/values/entries")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    Error::MissingField(format!("{NETWORK_LIST_KEY} item values.entries"))
                })?;
            last = Some(entries.clone());
        }
    }

    last.ok_or_else(|| Error::MissingField(format!("{NETWORK_LIST_KEY} network item")))
}

/// Id of the first element of a collection's `content`.
///
/// # Errors
///
/// Returns [`Error::MissingField`] when `content` is empty or its first element has no
/// string `id`.
pub fn first_content_id(content: &[Value]) -> Result<String> {
    content
        .first()
        .ok_or_else(|| Error::MissingField("content[0]".to_string()))?
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::MissingField("content[0].id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nic(name: &str, address: &str) -> Value {
        json!({
            "type": "complex",
            "componentTypeId": "com.vmware.csp.iaas.blueprint.service",
            "classId": "dynamicops.api.model.NetworkViewModel",
            "values": {
                "entries": [
                    {"key": "NETWORK_NAME", "value": {"type": "string", "value": name}},
                    {"key": "NETWORK_ADDRESS", "value": {"type": "string", "value": address}}
                ]
            }
        })
    }

    fn machine(entries: Value) -> Value {
        json!({
            "id": "c8a4ac5e-7dd9-4a2c-a1b3-2b9cc5bf1c40",
            "name": "dev-0042",
            "resourceData": {"entries": entries}
        })
    }

    #[test]
    fn single_nic_returns_its_entries() {
        let resource = machine(json!([
            {"key": "MachineName", "value": {"type": "string", "value": "dev-0042"}},
            {"key": "NETWORK_LIST", "value": {"type": "multiple", "items": [nic("VM Network", "10.0.0.5")]}}
        ]));

        let entries = network_entries(&resource).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1]["value"]["value"], "10.0.0.5");
    }

    #[test]
    fn last_nic_wins() {
        let resource = machine(json!([
            {"key": "NETWORK_LIST", "value": {"type": "multiple", "items": [
                nic("Frontend", "10.0.0.5"),
                nic("Backend", "192.168.1.7")
            ]}}
        ]));

        let entries = network_entries(&resource).unwrap();
        assert_eq!(entries[0]["value"]["value"], "Backend");
        assert_eq!(entries[1]["value"]["value"], "192.168.1.7");
    }

    #[test]
    fn missing_network_list_is_an_error() {
        let resource = machine(json!([
            {"key": "MachineName", "value": {"type": "string", "value": "dev-0042"}}
        ]));
        let err = network_entries(&resource).unwrap_err();
        assert!(matches!(err, Error::MissingField(_)));
    }

    #[test]
    fn empty_network_list_is_an_error() {
        let resource = machine(json!([
            {"key": "NETWORK_LIST", "value": {"type": "multiple", "items": []}}
        ]));
        assert!(network_entries(&resource).is_err());
    }

    #[test]
    fn resource_without_data_is_an_error() {
        let err = resource_entries(&json!({"id": "x"})).unwrap_err();
        assert_eq!(err, Error::MissingField("resourceData".to_string()));
    }

    #[test]
    fn first_content_id_reads_first_element() {
        let content = vec![json!({"id": "first"}), json!({"id": "second"})];
        assert_eq!(first_content_id(&content).unwrap(), "first");
    }

    #[test]
    fn first_content_id_fails_on_empty() {
        let err = first_content_id(&[]).unwrap_err();
        assert_eq!(err, Error::MissingField("content[0]".to_string()));
    }
}
