//! Diff two string maps into patch operations.
//!
//! Keys are visited in ascending order, so the output for a given pair of
//! maps is always the same: removals first, then per-key replaces and adds,
//! then a single bulk add if the old map was empty.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{
    error::{json_type_name, Error, Result},
    operation::{PatchOperation, PatchOperations},
};

/// Compute the operations that turn the object at `path_prefix` from `old`
/// into `new`.
///
/// An empty `new` removes the whole object. When `old` is empty, the added
/// entries are sent as one `add` of the complete object, because there is no
/// existing object to add members to.
pub fn diff_string_map(
    path_prefix: &str,
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> PatchOperations {
    let old: BTreeMap<_, _> = old
        .iter()
        .map(|(k, v)| (k.as_str(), Some(v.as_str())))
        .collect();
    let new: BTreeMap<_, _> = new.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    diff_entries(path_prefix, &old, &new)
}

/// Like [`diff_string_map`], for maps that come straight from JSON.
///
/// Every value in `new` must be a string, otherwise
/// [`Error::InvalidValueType`] is returned and nothing is diffed. A
/// non-string value in `old` counts as a value that differs from anything in
/// `new`.
pub fn diff_json_map(
    path_prefix: &str,
    old: &Map<String, Value>,
    new: &Map<String, Value>,
) -> Result<PatchOperations> {
    let new = new
        .iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k.as_str(), s.as_str())),
            other => Err(Error::InvalidValueType {
                key: k.clone(),
                found: json_type_name(other),
            }),
        })
        .collect::<Result<BTreeMap<_, _>>>()?;
    let old: BTreeMap<_, _> = old.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    Ok(diff_entries(path_prefix, &old, &new))
}

/// `old` maps to `None` for entries whose value is not a string.
fn diff_entries(
    path_prefix: &str,
    old: &BTreeMap<&str, Option<&str>>,
    new: &BTreeMap<&str, &str>,
) -> PatchOperations {
    let prefix = path_prefix.trim_end_matches('/');
    let key_path = |key: &str| format!("{}/{}", prefix, key);

    if new.is_empty() {
        tracing::trace!(prefix, "new map is empty, removing object");
        return PatchOperations::from(vec![PatchOperation::remove(prefix)]);
    }

    let mut ops = PatchOperations::new();

    ops.extend(
        old.keys()
            .filter(|k| !new.contains_key(**k))
            .map(|k| PatchOperation::remove(key_path(*k))),
    );

    let mut bulk_add = BTreeMap::new();
    for (&key, &value) in new {
        match old.get(key) {
            Some(Some(old_value)) if *old_value == value => {}
            Some(Some(_)) => ops.push(PatchOperation::replace(key_path(key), value)),
            _ if old.is_empty() => {
                bulk_add.insert(key.to_owned(), value.to_owned());
            }
            _ => ops.push(PatchOperation::add(key_path(key), value)),
        }
    }

    if !bulk_add.is_empty() {
        ops.push(PatchOperation::add(prefix, bulk_add));
    }

    tracing::trace!(prefix, operations = ops.len(), "computed map diff");
    ops
}
