//! The patch operations emitted by the differ.
//!
//! Only the `add`, `replace` and `remove` kinds of RFC 6902 are modelled. The
//! kind of an operation is its enum variant: serde writes the `"op"` member
//! from the variant tag, so rendering an operation never mutates it and the
//! same value can be serialized from several threads at once.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// The value of an `add` operation: a single string for a per-key add, or a
/// whole object for a bulk add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    String(String),
    Object(BTreeMap<String, String>),
}

impl From<String> for PatchValue {
    fn from(s: String) -> Self {
        PatchValue::String(s)
    }
}

impl From<&str> for PatchValue {
    fn from(s: &str) -> Self {
        PatchValue::String(s.to_owned())
    }
}

impl From<BTreeMap<String, String>> for PatchValue {
    fn from(m: BTreeMap<String, String>) -> Self {
        PatchValue::Object(m)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOperation {
    pub path: String,
    pub value: PatchValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOperation {
    pub path: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveOperation {
    pub path: String,
}

/// A single JSON Patch operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add(AddOperation),
    Replace(ReplaceOperation),
    Remove(RemoveOperation),
}

impl PatchOperation {
    pub fn add(path: impl Into<String>, value: impl Into<PatchValue>) -> Self {
        PatchOperation::Add(AddOperation {
            path: path.into(),
            value: value.into(),
        })
    }

    pub fn replace(path: impl Into<String>, value: impl Into<String>) -> Self {
        PatchOperation::Replace(ReplaceOperation {
            path: path.into(),
            value: value.into(),
        })
    }

    pub fn remove(path: impl Into<String>) -> Self {
        PatchOperation::Remove(RemoveOperation { path: path.into() })
    }

    /// The `"op"` member written for this operation.
    pub fn op(&self) -> &'static str {
        match self {
            PatchOperation::Add(_) => "add",
            PatchOperation::Replace(_) => "replace",
            PatchOperation::Remove(_) => "remove",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add(o) => &o.path,
            PatchOperation::Replace(o) => &o.path,
            PatchOperation::Remove(o) => &o.path,
        }
    }

    /// Render this operation as a JSON object.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl fmt::Display for PatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

/// An ordered list of patch operations.
///
/// The target server applies every operation on its own, but the order is
/// kept so that the rendered body is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchOperations(Vec<PatchOperation>);

impl PatchOperations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, op: PatchOperation) {
        self.0.push(op);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatchOperation> {
        self.0.iter()
    }

    /// Render the operations as a JSON array, in order.
    ///
    /// This is the body of a `PATCH` request with content type
    /// [`JSON_PATCH_CONTENT_TYPE`](crate::JSON_PATCH_CONTENT_TYPE).
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Convert to the `json-patch` representation.
    pub fn to_json_patch(&self) -> Result<json_patch::Patch> {
        let value = serde_json::to_value(self)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Apply the operations to `doc`, in order.
    ///
    /// On failure `doc` is left unchanged.
    pub fn apply(&self, doc: &mut Value) -> Result<()> {
        let patch = self.to_json_patch()?;
        json_patch::patch(doc, patch.0.as_slice())?;
        Ok(())
    }
}

impl From<Vec<PatchOperation>> for PatchOperations {
    fn from(ops: Vec<PatchOperation>) -> Self {
        PatchOperations(ops)
    }
}

impl FromIterator<PatchOperation> for PatchOperations {
    fn from_iter<T: IntoIterator<Item = PatchOperation>>(iter: T) -> Self {
        PatchOperations(iter.into_iter().collect())
    }
}

impl Extend<PatchOperation> for PatchOperations {
    fn extend<T: IntoIterator<Item = PatchOperation>>(&mut self, iter: T) {
        self.0.extend(iter)
    }
}

impl IntoIterator for PatchOperations {
    type Item = PatchOperation;
    type IntoIter = std::vec::IntoIter<PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PatchOperations {
    type Item = &'a PatchOperation;
    type IntoIter = std::slice::Iter<'a, PatchOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl PartialEq<[PatchOperation]> for PatchOperations {
    fn eq(&self, other: &[PatchOperation]) -> bool {
        self.0.as_slice() == other
    }
}

impl PartialEq<Vec<PatchOperation>> for PatchOperations {
    fn eq(&self, other: &Vec<PatchOperation>) -> bool {
        &self.0 == other
    }
}

impl fmt::Display for PatchOperations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}
