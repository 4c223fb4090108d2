//! Shared conformance metadata
//!
//! Small enums and structs that describe how fields and resources are bound
//! and searched. No validation - just data representation.

use serde::{Deserialize, Serialize};

/// Binding strength for terminology bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingStrength {
    Required,
    Extensible,
    Preferred,
    Example,
}

/// Terminology binding attached to a coded field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub strength: BindingStrength,
    pub value_set: &'static str,
}

/// Kind of structure a schema describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureDefinitionKind {
    /// A primitive data type
    PrimitiveType,
    /// A complex data type or backbone element
    ComplexType,
    /// A resource
    Resource,
    /// A logical model (not directly implementable)
    Logical,
}

/// Data type of a search parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchParamType {
    Number,
    Date,
    String,
    Token,
    Reference,
    Composite,
    Quantity,
    Uri,
}

/// Search parameter declared by a resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SearchParameter {
    /// Name used in search URLs
    pub name: &'static str,
    /// FHIRPath expression selecting the indexed values
    pub expression: &'static str,
    pub description: &'static str,
    #[serde(rename = "type")]
    pub kind: SearchParamType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_strength_codes() {
        assert_eq!(
            serde_json::to_value(BindingStrength::Required).unwrap(),
            "required"
        );
        let parsed: BindingStrength = serde_json::from_str("\"preferred\"").unwrap();
        assert_eq!(parsed, BindingStrength::Preferred);
    }

    #[test]
    fn test_structure_kind_codes() {
        assert_eq!(
            serde_json::to_value(StructureDefinitionKind::ComplexType).unwrap(),
            "complex-type"
        );
    }

    #[test]
    fn test_search_parameter_serializes_type() {
        let param = SearchParameter {
            name: "code",
            expression: "InventoryItem.code",
            description: "Search for products that match this code",
            kind: SearchParamType::Token,
        };
        let json = serde_json::to_value(param).unwrap();
        assert_eq!(json["type"], "token");
        assert_eq!(json["expression"], "InventoryItem.code");
    }
}
