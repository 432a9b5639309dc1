use serde_json::{Map, Value};

use crate::models::Document;

pub const CRED_HELPERS: &str = "credHelpers";

/// Point every registry at `helper` under `credHelpers`.
///
/// Returns `true` when the document changed. A `credHelpers` value that is
/// not an object is replaced by a fresh mapping; entries that already name
/// `helper` are left alone.
pub fn ensure_cred_helpers(document: &mut Document, helper: &str, registries: &[String]) -> bool {
    let slot = document
        .entry(CRED_HELPERS)
        .or_insert_with(|| Value::Object(Map::new()));
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }

    let mut dirty = false;
    if let Value::Object(helpers) = slot {
        for registry in registries {
            if helpers.get(registry).and_then(Value::as_str) != Some(helper) {
                helpers.insert(registry.clone(), Value::String(helper.to_string()));
                dirty = true;
            }
        }
    }
    dirty
}
