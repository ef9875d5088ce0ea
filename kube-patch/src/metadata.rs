//! Object metadata: the `labels` and `annotations` of a Kubernetes-style
//! resource.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{map_diff::diff_string_map, operation::PatchOperations};

/// The string maps of an object's `metadata` block.
///
/// Other metadata fields (name, namespace, ...) are ignored when
/// deserializing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

/// Diff the annotations and labels below `path_prefix`, usually `/metadata`.
///
/// A map that did not change contributes no operations. Annotation operations
/// come before label operations.
///
/// Keys are appended to the path as they are, without JSON Pointer escaping.
/// A key containing `/` or `~`, such as `deployment.kubernetes.io/revision`,
/// yields a path that points somewhere else, and applying such a per-key
/// operation fails.
pub fn diff_metadata(
    path_prefix: &str,
    old: &ObjectMetadata,
    new: &ObjectMetadata,
) -> PatchOperations {
    let prefix = path_prefix.trim_end_matches('/');
    let mut ops = PatchOperations::new();
    if old.annotations != new.annotations {
        ops.extend(diff_string_map(
            &format!("{}/annotations", prefix),
            &old.annotations,
            &new.annotations,
        ));
    }
    if old.labels != new.labels {
        ops.extend(diff_string_map(
            &format!("{}/labels", prefix),
            &old.labels,
            &new.labels,
        ));
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::PatchOperation;
    use serde_json::json;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn examples_deployment_metadata() {
        let json = include_str!("../fixtures/deployment-metadata.json");
        let value: ObjectMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(
            value,
            ObjectMetadata {
                labels: map(&[("app", "frontend"), ("tier", "web")]),
                annotations: map(&[("deployment.kubernetes.io/revision", "3")]),
            }
        );
    }

    #[test]
    fn missing_maps_default_to_empty() {
        let value: ObjectMetadata = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(value, ObjectMetadata::default());
    }

    #[test]
    fn unchanged_metadata_is_a_no_op() {
        let m = ObjectMetadata {
            labels: map(&[("a", "1")]),
            annotations: map(&[]),
        };
        assert!(diff_metadata("/metadata", &m, &m).is_empty());
        // Both empty: no remove of a map that was never there
        assert!(diff_metadata("/metadata", &Default::default(), &Default::default()).is_empty());
    }

    #[test]
    fn annotations_before_labels() {
        let old = ObjectMetadata {
            labels: map(&[("app", "web")]),
            annotations: map(&[("note", "old")]),
        };
        let new = ObjectMetadata {
            labels: map(&[("app", "api")]),
            annotations: map(&[]),
        };
        assert_eq!(
            diff_metadata("/metadata/", &old, &new),
            vec![
                PatchOperation::remove("/metadata/annotations"),
                PatchOperation::replace("/metadata/labels/app", "api"),
            ]
        );
    }

    #[test]
    fn keys_with_a_slash_are_not_escaped() {
        let old = ObjectMetadata {
            labels: map(&[]),
            annotations: map(&[("deployment.kubernetes.io/revision", "3")]),
        };
        let new = ObjectMetadata {
            labels: map(&[]),
            annotations: map(&[("deployment.kubernetes.io/revision", "4")]),
        };
        let ops = diff_metadata("/metadata", &old, &new);
        assert_eq!(
            ops,
            vec![PatchOperation::replace(
                "/metadata/annotations/deployment.kubernetes.io/revision",
                "4"
            )]
        );

        let mut doc = json!({
            "metadata": {"annotations": {"deployment.kubernetes.io/revision": "3"}}
        });
        assert!(matches!(ops.apply(&mut doc), Err(crate::Error::Apply(_))));
    }

    #[test]
    fn applying_metadata_diff() {
        let old = ObjectMetadata {
            labels: map(&[]),
            annotations: map(&[("a", "1"), ("b", "2")]),
        };
        let new = ObjectMetadata {
            labels: map(&[("app", "web")]),
            annotations: map(&[("a", "1"), ("c", "3")]),
        };
        let mut doc = json!({
            "metadata": {"name": "frontend", "annotations": {"a": "1", "b": "2"}}
        });
        diff_metadata("/metadata", &old, &new)
            .apply(&mut doc)
            .unwrap();
        assert_eq!(
            doc,
            json!({
                "metadata": {
                    "name": "frontend",
                    "annotations": {"a": "1", "c": "3"},
                    "labels": {"app": "web"}
                }
            })
        );
    }
}
