//! Compute the JSON Patch (RFC 6902) that turns one string map into another.
//!
//! The typical use is keeping the labels or annotations of a remote object in
//! sync with a declared configuration: diff the current map against the
//! desired one, render the operations with [`PatchOperations::to_json`] and
//! send them as the body of a `PATCH` request.
//!
//! ```
//! use std::collections::BTreeMap;
//! use kube_patch::{diff_string_map, PatchOperation};
//!
//! let old = BTreeMap::from([("app".to_string(), "web".to_string())]);
//! let new = BTreeMap::from([("app".to_string(), "api".to_string())]);
//! let ops = diff_string_map("/metadata/labels", &old, &new);
//! assert_eq!(ops, vec![PatchOperation::replace("/metadata/labels/app", "api")]);
//! ```

pub mod error;
pub mod map_diff;
pub mod metadata;
pub mod operation;

pub use error::{Error, Result};
pub use map_diff::{diff_json_map, diff_string_map};
pub use metadata::{diff_metadata, ObjectMetadata};
pub use operation::{
    AddOperation, PatchOperation, PatchOperations, PatchValue, RemoveOperation, ReplaceOperation,
};

/// Content type of a request body produced by [`PatchOperations::to_json`].
pub const JSON_PATCH_CONTENT_TYPE: &str = "application/json-patch+json";
