//! Generic tree walkers
//!
//! Everything here is written against the generic access surface only, so it
//! works for any [`Node`] without knowing its concrete type.

use crate::element::{Base, FieldDescriptor, Node, NodeExt, Schema, ValueKind};
use serde_json::{json, Map, Value};

/// Depth-first walk over every non-empty value below `node`, in schema order.
///
/// The visitor receives a FHIRPath-style path for each value
/// (`InventoryItem.name[1].nameType.code`), starting with the root itself.
/// Repeated fields are always indexed; singular fields never are.
pub fn visit<F>(node: &dyn Node, visitor: &mut F)
where
    F: FnMut(&str, &dyn Base),
{
    let root = node.fhir_type();
    visitor(root, node.as_base());
    visit_children(root, node, visitor);
}

fn visit_children<F>(path: &str, node: &dyn Node, visitor: &mut F)
where
    F: FnMut(&str, &dyn Base),
{
    for property in node.list_children() {
        for (index, value) in property.values.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let child_path = child_path(path, property.field, index);
            visitor(&child_path, *value);
            if let Some(child) = value.as_node() {
                visit_children(&child_path, child, visitor);
            }
        }
    }
}

fn child_path(parent: &str, field: &FieldDescriptor, index: usize) -> String {
    if field.is_repeated() {
        format!("{parent}.{}[{index}]", field.name)
    } else {
        format!("{parent}.{}", field.name)
    }
}

/// One path-level difference between two trees
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// Present only on the right
    Added { path: String },
    /// Present only on the left
    Removed { path: String },
    /// Primitive value differs
    Changed {
        path: String,
        left: Option<String>,
        right: Option<String>,
    },
    /// Values of different types at the same path
    TypeChanged {
        path: String,
        left: &'static str,
        right: &'static str,
    },
}

impl Difference {
    pub fn path(&self) -> &str {
        match self {
            Difference::Added { path }
            | Difference::Removed { path }
            | Difference::Changed { path, .. }
            | Difference::TypeChanged { path, .. } => path,
        }
    }
}

/// Differences between two values, in schema order.
///
/// Equal subtrees are pruned with `equals_deep`; primitives are compared with
/// `equals_shallow`. An empty result means the two values are deep-equal.
pub fn diff(left: &dyn Base, right: &dyn Base) -> Vec<Difference> {
    let mut out = Vec::new();
    diff_values(left.fhir_type(), left, right, &mut out);
    out
}

fn diff_values(path: &str, left: &dyn Base, right: &dyn Base, out: &mut Vec<Difference>) {
    if left.equals_deep(right) {
        return;
    }
    if left.fhir_type() != right.fhir_type() {
        out.push(Difference::TypeChanged {
            path: path.to_string(),
            left: left.fhir_type(),
            right: right.fhir_type(),
        });
        return;
    }
    match (left.as_node(), right.as_node()) {
        (Some(l), Some(r)) => diff_nodes(path, l, r, out),
        _ => {
            if !left.equals_shallow(right) {
                out.push(Difference::Changed {
                    path: path.to_string(),
                    left: left.primitive_value(),
                    right: right.primitive_value(),
                });
            }
        }
    }
}

fn diff_nodes(path: &str, left: &dyn Node, right: &dyn Node, out: &mut Vec<Difference>) {
    let right_children = right.list_children();
    for (l, r) in left.list_children().iter().zip(right_children.iter()) {
        let singular = !l.field.is_repeated();
        let len = l.values.len().max(r.values.len());
        for index in 0..len {
            // absent and empty singular values are the same thing
            let lv = l
                .values
                .get(index)
                .copied()
                .filter(|value| !(singular && value.is_empty()));
            let rv = r
                .values
                .get(index)
                .copied()
                .filter(|value| !(singular && value.is_empty()));
            let child_path = child_path(path, l.field, index);
            match (lv, rv) {
                (Some(lv), Some(rv)) => diff_values(&child_path, lv, rv, out),
                (Some(_), None) => out.push(Difference::Removed { path: child_path }),
                (None, Some(_)) => out.push(Difference::Added { path: child_path }),
                (None, None) => {}
            }
        }
    }
}

/// Cardinality metadata for format converters:
/// `{ type: { field: { "type": String, "multiple": bool } } }`.
///
/// Inherited fields are listed under every type that inherits them.
pub fn type_metadata(schemas: &[&Schema]) -> Value {
    let mut types = Map::new();
    for schema in schemas {
        let mut fields = Map::new();
        for field in schema.all_fields() {
            fields.insert(
                field.name.to_string(),
                json!({
                    "type": metadata_type(field),
                    "multiple": field.is_repeated(),
                }),
            );
        }
        types.insert(schema.type_name.to_string(), Value::Object(fields));
    }
    Value::Object(types)
}

fn metadata_type(field: &FieldDescriptor) -> &'static str {
    match field.kind {
        ValueKind::Backbone => "BackboneElement",
        _ => field.types.first().copied().unwrap_or("Element"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CodeableConcept, Coding, Identifier, StringType};
    use crate::element::NodeExt;
    use crate::ModelConfig;

    #[test]
    fn test_visit_paths() {
        let mut concept = CodeableConcept::default();
        concept.add_coding(Coding::new("s", "a", ""));
        concept.add_coding(Coding::new("s", "b", ""));

        let mut paths = Vec::new();
        visit(&concept, &mut |path, _| paths.push(path.to_string()));
        assert_eq!(
            paths,
            vec![
                "CodeableConcept",
                "CodeableConcept.coding[0]",
                "CodeableConcept.coding[0].system",
                "CodeableConcept.coding[0].code",
                "CodeableConcept.coding[1]",
                "CodeableConcept.coding[1].system",
                "CodeableConcept.coding[1].code",
            ]
        );
    }

    #[test]
    fn test_diff_equal_trees_is_empty() {
        let a = Identifier::new("http://example.org", "123");
        assert!(diff(&a, &a.clone()).is_empty());
    }

    #[test]
    fn test_diff_reports_changes() {
        let a = Identifier::new("http://example.org", "123");
        let mut b = Identifier::new("http://example.org", "456");
        b.set_property("id", Box::new(StringType::new("x")), &ModelConfig::default())
            .unwrap();

        let changes = diff(&a, &b);
        assert_eq!(
            changes,
            vec![
                Difference::Added {
                    path: "Identifier.id".to_string()
                },
                Difference::Changed {
                    path: "Identifier.value".to_string(),
                    left: Some("123".to_string()),
                    right: Some("456".to_string()),
                },
            ]
        );
    }

    #[test]
    fn test_diff_type_change() {
        let changes = diff(&Identifier::default(), &Coding::default());
        assert!(matches!(
            changes.as_slice(),
            [Difference::TypeChanged { left: "Identifier", right: "Coding", .. }]
        ));
    }

    #[test]
    fn test_type_metadata_shape() {
        let meta = type_metadata(&[&crate::common::CODEABLE_CONCEPT_SCHEMA]);
        assert_eq!(meta["CodeableConcept"]["coding"]["type"], "Coding");
        assert_eq!(meta["CodeableConcept"]["coding"]["multiple"], true);
        assert_eq!(meta["CodeableConcept"]["text"]["multiple"], false);
        assert_eq!(meta["CodeableConcept"]["id"]["type"], "string");
    }
}
