//! Supertype nodes
//!
//! Resources embed a [`ResourceBase`] and backbone components embed an
//! [`ElementBase`]. Generic lookups fall through to them for inherited fields.

use super::complex::StructureDefinitionKind;
use super::primitive::{CodeType, IdType, StringType, UriType};
use crate::element::{impl_node, FieldDescriptor, Schema, ValueKind};

static RESOURCE_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::new("id", "Resource.id", ValueKind::Primitive, &["id"])
        .in_summary()
        .describe("The logical id of the resource, as used in the URL for the resource."),
    FieldDescriptor::new(
        "implicitRules",
        "Resource.implicitRules",
        ValueKind::Primitive,
        &["uri"],
    )
    .in_summary()
    .modifier()
    .describe("A reference to a set of rules that were followed when the resource was constructed."),
    FieldDescriptor::new("language", "Resource.language", ValueKind::Primitive, &["code"])
        .describe("The base language in which the resource is written."),
];

pub static RESOURCE_SCHEMA: Schema = Schema {
    type_name: "Resource",
    kind: StructureDefinitionKind::Resource,
    is_abstract: true,
    url: Some("http://hl7.org/fhir/StructureDefinition/Resource"),
    base: None,
    fields: &RESOURCE_FIELDS,
};

/// Fields every resource inherits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceBase {
    pub id: Option<IdType>,
    pub implicit_rules: Option<UriType>,
    pub language: Option<CodeType>,
}

impl_node!(ResourceBase, RESOURCE_SCHEMA, [id, implicit_rules, language]);

static ELEMENT_FIELDS: [FieldDescriptor; 1] = [FieldDescriptor::new(
    "id",
    "Element.id",
    ValueKind::Primitive,
    &["string"],
)
.describe("Unique id for the element within a resource (for internal references).")];

pub static ELEMENT_SCHEMA: Schema = Schema {
    type_name: "Element",
    kind: StructureDefinitionKind::ComplexType,
    is_abstract: true,
    url: Some("http://hl7.org/fhir/StructureDefinition/Element"),
    base: None,
    fields: &ELEMENT_FIELDS,
};

/// Fields every backbone component inherits
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementBase {
    pub id: Option<StringType>,
}

impl_node!(ElementBase, ELEMENT_SCHEMA, [id]);
