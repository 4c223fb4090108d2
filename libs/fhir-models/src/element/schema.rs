//! Declarative field tables
//!
//! Each node type declares one static [`Schema`] listing its fields in
//! document order. Numeric keys are derived from field names at compile time,
//! so lookup by key and lookup by name always resolve to the same descriptor.

use crate::common::complex::{Binding, BindingStrength, StructureDefinitionKind};
use std::fmt;

/// Numeric key of a field name: 32-bit wrapping `h = 31 * h + byte`.
///
/// Matches the property hash codes used by existing FHIR tooling
/// (`"description"` is `-1724546052`). Field names are ASCII.
pub const fn property_key(name: &str) -> i32 {
    let bytes = name.as_bytes();
    let mut hash: i32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        hash = hash.wrapping_mul(31).wrapping_add(bytes[i] as i32);
        i += 1;
    }
    hash
}

/// Upper bound of a field's cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Max {
    Bounded(u32),
    Unbounded,
}

impl fmt::Display for Max {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Max::Bounded(n) => write!(f, "{n}"),
            Max::Unbounded => f.write_str("*"),
        }
    }
}

/// What a field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A primitive scalar (string, uri, decimal, ...)
    Primitive,
    /// A code drawn from a closed enumeration
    Coded,
    /// A complex data type (Coding, Quantity, ...)
    Complex,
    /// An inline component declared by the owning schema
    Backbone,
}

impl ValueKind {
    pub fn is_primitive(self) -> bool {
        matches!(self, ValueKind::Primitive | ValueKind::Coded)
    }
}

/// Metadata for one declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name, unique within the schema
    pub name: &'static str,
    /// Element path (`InventoryItem.status`)
    pub path: &'static str,
    /// Stable numeric key, always `property_key(name)`
    pub key: i32,
    /// Accepted value type names; empty for backbone components
    pub types: &'static [&'static str],
    pub kind: ValueKind,
    pub min: u32,
    pub max: Max,
    /// Whether the field appears in summary views
    pub summary: bool,
    /// Whether the field can change the meaning of its parent
    pub modifier: bool,
    pub binding: Option<Binding>,
    pub definition: &'static str,
}

impl FieldDescriptor {
    /// Optional singular field with no binding
    pub const fn new(
        name: &'static str,
        path: &'static str,
        kind: ValueKind,
        types: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            path,
            key: property_key(name),
            types,
            kind,
            min: 0,
            max: Max::Bounded(1),
            summary: false,
            modifier: false,
            binding: None,
            definition: "",
        }
    }

    pub const fn required(mut self) -> Self {
        self.min = 1;
        self
    }

    pub const fn repeated(mut self) -> Self {
        self.max = Max::Unbounded;
        self
    }

    pub const fn in_summary(mut self) -> Self {
        self.summary = true;
        self
    }

    pub const fn modifier(mut self) -> Self {
        self.modifier = true;
        self
    }

    pub const fn bound(mut self, strength: BindingStrength, value_set: &'static str) -> Self {
        self.binding = Some(Binding {
            strength,
            value_set,
        });
        self
    }

    pub const fn describe(mut self, definition: &'static str) -> Self {
        self.definition = definition;
        self
    }

    pub fn is_repeated(&self) -> bool {
        match self.max {
            Max::Bounded(n) => n > 1,
            Max::Unbounded => true,
        }
    }

    pub fn is_required(&self) -> bool {
        self.min > 0
    }

    /// Cardinality in `min..max` notation
    pub fn cardinality(&self) -> String {
        format!("{}..{}", self.min, self.max)
    }
}

/// Field table of one node type
#[derive(Debug)]
pub struct Schema {
    /// Type name reported by `fhir_type()`; backbone components use their path
    pub type_name: &'static str,
    pub kind: StructureDefinitionKind,
    pub is_abstract: bool,
    /// Canonical StructureDefinition URL, if the type has its own
    pub url: Option<&'static str>,
    /// Supertype schema whose fields are inherited
    pub base: Option<&'static Schema>,
    /// Declared fields in document order
    pub fields: &'static [FieldDescriptor],
}

impl Schema {
    /// Position of a field declared directly by this schema
    pub fn position(&self, key: FieldKey<'_>) -> Option<usize> {
        self.fields.iter().position(|field| key.matches(field))
    }

    /// Field declared by this schema or any supertype schema
    pub fn field(&self, key: FieldKey<'_>) -> Option<&'static FieldDescriptor> {
        let fields: &'static [FieldDescriptor] = self.fields;
        fields
            .iter()
            .find(|field| key.matches(field))
            .or_else(|| self.base.and_then(|base| base.field(key)))
    }

    /// All fields, supertype fields first
    pub fn all_fields(&self) -> Vec<&'static FieldDescriptor> {
        let mut fields = self.base.map(Schema::all_fields).unwrap_or_default();
        let own: &'static [FieldDescriptor] = self.fields;
        fields.extend(own.iter());
        fields
    }

    /// Supertype chain starting with this schema
    pub fn lineage(&self) -> Vec<&'static str> {
        let mut names = vec![self.type_name];
        let mut current = self.base;
        while let Some(schema) = current {
            names.push(schema.type_name);
            current = schema.base;
        }
        names
    }
}

/// Field lookup key: stable numeric key or field name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKey<'a> {
    Hash(i32),
    Name(&'a str),
}

impl FieldKey<'_> {
    pub fn matches(&self, field: &FieldDescriptor) -> bool {
        match self {
            FieldKey::Hash(key) => field.key == *key,
            FieldKey::Name(name) => field.name == *name,
        }
    }
}

impl From<i32> for FieldKey<'static> {
    fn from(key: i32) -> Self {
        FieldKey::Hash(key)
    }
}

impl<'a> From<&'a str> for FieldKey<'a> {
    fn from(name: &'a str) -> Self {
        FieldKey::Name(name)
    }
}

impl<'a> From<&'a String> for FieldKey<'a> {
    fn from(name: &'a String) -> Self {
        FieldKey::Name(name.as_str())
    }
}

impl fmt::Display for FieldKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Hash(key) => write!(f, "#{key}"),
            FieldKey::Name(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static PARENT_FIELDS: [FieldDescriptor; 1] =
        [FieldDescriptor::new("id", "Parent.id", ValueKind::Primitive, &["id"]).in_summary()];

    static PARENT: Schema = Schema {
        type_name: "Parent",
        kind: StructureDefinitionKind::Resource,
        is_abstract: true,
        url: None,
        base: None,
        fields: &PARENT_FIELDS,
    };

    static CHILD_FIELDS: [FieldDescriptor; 2] = [
        FieldDescriptor::new("status", "Child.status", ValueKind::Coded, &["code"])
            .required()
            .bound(BindingStrength::Required, "http://example.org/ValueSet/status"),
        FieldDescriptor::new("code", "Child.code", ValueKind::Complex, &["CodeableConcept"])
            .repeated(),
    ];

    static CHILD: Schema = Schema {
        type_name: "Child",
        kind: StructureDefinitionKind::Resource,
        is_abstract: false,
        url: None,
        base: Some(&PARENT),
        fields: &CHILD_FIELDS,
    };

    #[test]
    fn test_property_key_matches_known_hashes() {
        assert_eq!(property_key("description"), -1724546052);
        assert_eq!(property_key("baseUnit"), -1721465867);
        assert_eq!(property_key("identifier"), -1618432855);
        assert_eq!(property_key("inventoryStatus"), -1370922898);
        assert_eq!(property_key("status"), -892481550);
        assert_eq!(property_key("code"), 3059181);
        assert_eq!(property_key("name"), 3373707);
        assert_eq!(property_key("category"), 50511102);
        assert_eq!(property_key("netContent"), 612796444);
        assert_eq!(property_key("nameType"), 1840595045);
        assert_eq!(property_key("language"), -1613589672);
        assert_eq!(property_key(""), 0);
    }

    #[test]
    fn test_descriptor_builder() {
        let status = &CHILD_FIELDS[0];
        assert_eq!(status.key, property_key("status"));
        assert!(status.is_required());
        assert!(!status.is_repeated());
        assert_eq!(status.cardinality(), "1..1");
        assert_eq!(
            status.binding.map(|b| b.strength),
            Some(BindingStrength::Required)
        );

        let code = &CHILD_FIELDS[1];
        assert!(code.is_repeated());
        assert_eq!(code.cardinality(), "0..*");
    }

    #[test]
    fn test_lookup_by_key_and_name_agree() {
        for field in CHILD.fields {
            let by_name = CHILD.position(FieldKey::Name(field.name));
            let by_key = CHILD.position(FieldKey::Hash(field.key));
            assert_eq!(by_name, by_key, "lookup mismatch for {}", field.name);
            assert!(by_name.is_some());
        }
    }

    #[test]
    fn test_field_falls_back_to_base() {
        assert_eq!(CHILD.position("id".into()), None);
        let id = CHILD.field("id".into()).expect("inherited field");
        assert_eq!(id.path, "Parent.id");
        assert!(CHILD.field("missing".into()).is_none());
    }

    #[test]
    fn test_all_fields_lists_base_first() {
        let names: Vec<_> = CHILD.all_fields().iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["id", "status", "code"]);
        assert_eq!(CHILD.lineage(), vec!["Child", "Parent"]);
    }

    #[test]
    fn test_field_key_display() {
        assert_eq!(FieldKey::from("status").to_string(), "status");
        assert_eq!(FieldKey::from(42).to_string(), "#42");
    }
}
