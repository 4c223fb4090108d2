//! FHIR resource models as a typed property tree.
//!
//! Resources and data types are plain structs. Each one also exposes a static
//! field table and a generic access surface ([`NodeExt`]) so format
//! converters, validators and diff tools can walk any node by field name or
//! numeric key without knowing its concrete type.
//!
//! ```
//! use zunder_models::{Base, InventoryItem, InventoryItemStatus, NodeExt};
//!
//! let mut item = InventoryItem::with_status(InventoryItemStatus::Active);
//! item.set_description_text("Sterile gauze, 10 x 10 cm");
//!
//! let status = item.get_property("status").unwrap();
//! assert_eq!(status[0].primitive_value().as_deref(), Some("active"));
//!
//! let copy = item.clone();
//! assert!(item.equals_deep(&copy));
//! ```

pub mod common;
pub mod config;
pub mod element;
pub mod error;
pub mod resources;
pub mod walk;

pub use common::{
    BooleanType, CodeType, CodeableConcept, CodedEnum, Coding, DecimalType, Enumeration, IdType,
    Identifier, Quantity, StringType, UriType,
};
pub use config::{AutoCreate, EnumParsing, ModelConfig, ModelConfigBuilder};
pub use element::{
    property_key, Base, Element, FieldDescriptor, FieldKey, Max, Node, NodeExt, Property, Schema,
    Slot, ValueKind, Values,
};
pub use error::{Error, Result};
pub use resources::{
    InventoryItem, InventoryItemDescription, InventoryItemName, InventoryItemStatus,
};

static SCHEMAS: [&Schema; 9] = [
    &common::RESOURCE_SCHEMA,
    &common::ELEMENT_SCHEMA,
    &common::IDENTIFIER_SCHEMA,
    &common::CODING_SCHEMA,
    &common::CODEABLE_CONCEPT_SCHEMA,
    &common::QUANTITY_SCHEMA,
    &resources::INVENTORY_ITEM_SCHEMA,
    &resources::INVENTORY_ITEM_NAME_SCHEMA,
    &resources::INVENTORY_ITEM_DESCRIPTION_SCHEMA,
];

/// Every schema known to this crate, supertypes first
pub fn schemas() -> &'static [&'static Schema] {
    &SCHEMAS
}

/// Schema by type name (`InventoryItem`, `InventoryItem.name`, `Coding`)
pub fn schema(type_name: &str) -> Option<&'static Schema> {
    SCHEMAS
        .iter()
        .copied()
        .find(|schema| schema.type_name == type_name)
}

/// Fresh empty node for a concrete type name
pub fn create(type_name: &str) -> Option<Box<dyn Node>> {
    let node: Box<dyn Node> = match type_name {
        "InventoryItem" => Box::new(InventoryItem::default()),
        "InventoryItem.name" => Box::new(InventoryItemName::default()),
        "InventoryItem.description" => Box::new(InventoryItemDescription::default()),
        "Identifier" => Box::new(Identifier::default()),
        "Coding" => Box::new(Coding::default()),
        "CodeableConcept" => Box::new(CodeableConcept::default()),
        "Quantity" => Box::new(Quantity::default()),
        _ => return None,
    };
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lookup() {
        assert_eq!(
            schema("InventoryItem").map(|s| s.kind),
            Some(common::StructureDefinitionKind::Resource)
        );
        assert!(schema("InventoryItem.name").is_some());
        assert!(schema("Patient").is_none());
    }

    #[test]
    fn test_create_matches_schema() {
        for schema in schemas().iter().filter(|s| !s.is_abstract) {
            let node = create(schema.type_name).expect("concrete type is constructible");
            assert_eq!(node.fhir_type(), schema.type_name);
            assert!(node.is_empty());
        }
        assert!(create("Resource").is_none());
    }
}
