//! InventoryItem resource
//!
//! A generic representation of a stocked product: identifiers, status, names,
//! classification, descriptive characteristics and unit of measure.

use crate::common::base::{ElementBase, ResourceBase, ELEMENT_SCHEMA, RESOURCE_SCHEMA};
use crate::common::complex::{
    BindingStrength, SearchParamType, SearchParameter, StructureDefinitionKind,
};
use crate::common::datatypes::{CodeableConcept, Coding, Identifier, Quantity};
use crate::common::enumeration::{CodedEnum, Enumeration};
use crate::common::primitive::{text_or_none, IdType, StringType};
use crate::config::ModelConfig;
use crate::element::{auto_create, impl_node, Base, FieldDescriptor, Schema, ValueKind};
use crate::error::{Error, Result};
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const SP_CODE: &str = "code";
pub const SP_IDENTIFIER: &str = "identifier";
pub const SP_STATUS: &str = "status";

/// Search parameters declared by InventoryItem
pub static SEARCH_PARAMETERS: [SearchParameter; 3] = [
    SearchParameter {
        name: SP_CODE,
        expression: "InventoryItem.code",
        description: "Search for products that match this code",
        kind: SearchParamType::Token,
    },
    SearchParameter {
        name: SP_IDENTIFIER,
        expression: "InventoryItem.identifier",
        description: "The identifier of the item",
        kind: SearchParamType::Token,
    },
    SearchParameter {
        name: SP_STATUS,
        expression: "InventoryItem.status",
        description: "The status of the item",
        kind: SearchParamType::Token,
    },
];

// ============================================================================
// Status codes
// ============================================================================

/// InventoryItemStatusCodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InventoryItemStatus {
    Active,
    Inactive,
    EnteredInError,
    Unknown,
}

static STATUS_CODES: phf::Map<&'static str, InventoryItemStatus> = phf_map! {
    "active" => InventoryItemStatus::Active,
    "inactive" => InventoryItemStatus::Inactive,
    "entered-in-error" => InventoryItemStatus::EnteredInError,
    "unknown" => InventoryItemStatus::Unknown,
};

impl CodedEnum for InventoryItemStatus {
    const NAME: &'static str = "InventoryItemStatusCodes";
    const CODE_SYSTEM: &'static str = "http://hl7.org/fhir/inventoryitem-status";
    const VARIANTS: &'static [Self] = &[
        InventoryItemStatus::Active,
        InventoryItemStatus::Inactive,
        InventoryItemStatus::EnteredInError,
        InventoryItemStatus::Unknown,
    ];

    fn code(self) -> &'static str {
        match self {
            InventoryItemStatus::Active => "active",
            InventoryItemStatus::Inactive => "inactive",
            InventoryItemStatus::EnteredInError => "entered-in-error",
            InventoryItemStatus::Unknown => "unknown",
        }
    }

    fn display(self) -> &'static str {
        match self {
            InventoryItemStatus::Active => "Active",
            InventoryItemStatus::Inactive => "Inactive",
            InventoryItemStatus::EnteredInError => "Entered in Error",
            InventoryItemStatus::Unknown => "Unknown",
        }
    }

    fn definition(self) -> &'static str {
        match self {
            InventoryItemStatus::Active => "The item is active and can be referenced.",
            InventoryItemStatus::Inactive => {
                "The item is presently inactive - there may be references to it but the item is not expected to be used."
            }
            InventoryItemStatus::EnteredInError => "The item record was entered in error.",
            InventoryItemStatus::Unknown => "The item status has not been determined.",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        STATUS_CODES.get(code).copied()
    }
}

impl fmt::Display for InventoryItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for InventoryItemStatus {
    type Err = Error;

    /// Strict parse of a non-blank code
    fn from_str(s: &str) -> Result<Self> {
        Self::from_code(s).ok_or_else(|| Error::UnknownCode {
            code_system: Self::NAME.to_string(),
            code: s.to_string(),
        })
    }
}

// ============================================================================
// Schemas
// ============================================================================

static INVENTORY_ITEM_FIELDS: [FieldDescriptor; 9] = [
    FieldDescriptor::new(
        "identifier",
        "InventoryItem.identifier",
        ValueKind::Complex,
        &["Identifier"],
    )
    .repeated()
    .in_summary()
    .describe("Business identifier for the inventory item."),
    FieldDescriptor::new("status", "InventoryItem.status", ValueKind::Coded, &["code"])
        .required()
        .in_summary()
        .bound(
            BindingStrength::Required,
            "http://hl7.org/fhir/ValueSet/inventoryitem-status",
        )
        .describe("Status of the item entry."),
    FieldDescriptor::new(
        "category",
        "InventoryItem.category",
        ValueKind::Complex,
        &["CodeableConcept"],
    )
    .repeated()
    .in_summary()
    .describe("Category or class of the item."),
    FieldDescriptor::new(
        "code",
        "InventoryItem.code",
        ValueKind::Complex,
        &["CodeableConcept"],
    )
    .repeated()
    .in_summary()
    .describe("Code designating the specific type of item."),
    FieldDescriptor::new("name", "InventoryItem.name", ValueKind::Backbone, &[])
        .repeated()
        .in_summary()
        .describe("The item name(s) - the brand name, or common name, functional name, generic name."),
    FieldDescriptor::new(
        "description",
        "InventoryItem.description",
        ValueKind::Backbone,
        &[],
    )
    .describe("The descriptive characteristics of the inventory item."),
    FieldDescriptor::new(
        "inventoryStatus",
        "InventoryItem.inventoryStatus",
        ValueKind::Complex,
        &["CodeableConcept"],
    )
    .repeated()
    .in_summary()
    .describe("The usage status e.g. recalled, in use, discarded... This can be used to indicate that the items have been taken out of inventory, or are in use, etc."),
    FieldDescriptor::new(
        "baseUnit",
        "InventoryItem.baseUnit",
        ValueKind::Complex,
        &["CodeableConcept"],
    )
    .in_summary()
    .describe("The base unit of measure - the unit in which the product is used or counted."),
    FieldDescriptor::new(
        "netContent",
        "InventoryItem.netContent",
        ValueKind::Complex,
        &["Quantity"],
    )
    .in_summary()
    .describe("Net content or amount present in the item."),
];

pub static INVENTORY_ITEM_SCHEMA: Schema = Schema {
    type_name: "InventoryItem",
    kind: StructureDefinitionKind::Resource,
    is_abstract: false,
    url: Some("http://hl7.org/fhir/StructureDefinition/InventoryItem"),
    base: Some(&RESOURCE_SCHEMA),
    fields: &INVENTORY_ITEM_FIELDS,
};

static NAME_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::new(
        "nameType",
        "InventoryItem.name.nameType",
        ValueKind::Complex,
        &["Coding"],
    )
    .required()
    .in_summary()
    .bound(
        BindingStrength::Preferred,
        "http://hl7.org/fhir/ValueSet/inventoryitem-nametype",
    )
    .describe("The type of name e.g. 'brand-name', 'functional-name', 'common-name'."),
    FieldDescriptor::new(
        "name",
        "InventoryItem.name.name",
        ValueKind::Primitive,
        &["string"],
    )
    .required()
    .in_summary()
    .describe("The name or designation that the item is given."),
];

pub static INVENTORY_ITEM_NAME_SCHEMA: Schema = Schema {
    type_name: "InventoryItem.name",
    kind: StructureDefinitionKind::ComplexType,
    is_abstract: false,
    url: None,
    base: Some(&ELEMENT_SCHEMA),
    fields: &NAME_FIELDS,
};

static DESCRIPTION_FIELDS: [FieldDescriptor; 1] = [
    FieldDescriptor::new(
        "description",
        "InventoryItem.description.description",
        ValueKind::Primitive,
        &["string"],
    )
    .describe("Textual description of the item."),
];

pub static INVENTORY_ITEM_DESCRIPTION_SCHEMA: Schema = Schema {
    type_name: "InventoryItem.description",
    kind: StructureDefinitionKind::ComplexType,
    is_abstract: false,
    url: None,
    base: Some(&ELEMENT_SCHEMA),
    fields: &DESCRIPTION_FIELDS,
};

// ============================================================================
// Accessors
// ============================================================================

/// List accessors for repeated fields
macro_rules! repeated_accessors {
    ($($field:ident: $ty:ty => $has:ident, $add:ident, $push:ident, $first_rep:ident, $set:ident;)*) => {
        $(
            pub fn $field(&self) -> &[$ty] {
                &self.$field
            }

            /// True when at least one element carries content
            pub fn $has(&self) -> bool {
                self.$field.iter().any(|value| !value.is_empty())
            }

            /// Append an empty element and return it
            pub fn $add(&mut self) -> &mut $ty {
                self.$field.push(<$ty>::default());
                let last = self.$field.len() - 1;
                &mut self.$field[last]
            }

            pub fn $push(&mut self, value: $ty) -> &mut Self {
                self.$field.push(value);
                self
            }

            /// First element, created when the list is empty
            pub fn $first_rep(&mut self) -> &mut $ty {
                if self.$field.is_empty() {
                    self.$field.push(<$ty>::default());
                }
                &mut self.$field[0]
            }

            pub fn $set(&mut self, values: Vec<$ty>) -> &mut Self {
                self.$field = values;
                self
            }
        )*
    };
}

/// Accessors for singular composite fields
macro_rules! singular_accessors {
    ($($field:ident: $ty:ty = $path:literal => $has:ident, $set:ident, $get_mut:ident;)*) => {
        $(
            pub fn $field(&self) -> Option<&$ty> {
                self.$field.as_ref()
            }

            pub fn $has(&self) -> bool {
                self.$field.as_ref().is_some_and(|value| !value.is_empty())
            }

            pub fn $set(&mut self, value: $ty) -> &mut Self {
                self.$field = Some(value);
                self
            }

            /// Mutable access that may create the value, see [`crate::AutoCreate`]
            pub fn $get_mut(&mut self, config: &ModelConfig) -> Result<Option<&mut $ty>> {
                auto_create(&mut self.$field, $path, config)
            }
        )*
    };
}

// ============================================================================
// InventoryItem
// ============================================================================

/// A product as held in inventory, independent of any specific stock
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryItem {
    resource: ResourceBase,
    identifier: Vec<Identifier>,
    status: Option<Enumeration<InventoryItemStatus>>,
    category: Vec<CodeableConcept>,
    code: Vec<CodeableConcept>,
    name: Vec<InventoryItemName>,
    description: Option<InventoryItemDescription>,
    inventory_status: Vec<CodeableConcept>,
    base_unit: Option<CodeableConcept>,
    net_content: Option<Quantity>,
}

impl_node!(
    InventoryItem,
    INVENTORY_ITEM_SCHEMA,
    [
        identifier,
        status,
        category,
        code,
        name,
        description,
        inventory_status,
        base_unit,
        net_content,
    ],
    base = resource
);

impl InventoryItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(status: InventoryItemStatus) -> Self {
        let mut item = Self::default();
        item.set_status(status);
        item
    }

    pub fn id(&self) -> Option<&str> {
        self.resource.id.as_ref().and_then(IdType::as_str)
    }

    pub fn set_id(&mut self, id: &str) -> &mut Self {
        self.resource.id = text_or_none(id);
        self
    }

    pub fn resource(&self) -> &ResourceBase {
        &self.resource
    }

    pub fn resource_mut(&mut self) -> &mut ResourceBase {
        &mut self.resource
    }

    repeated_accessors! {
        identifier: Identifier => has_identifier, add_identifier, push_identifier, identifier_first_rep, set_identifier;
        category: CodeableConcept => has_category, add_category, push_category, category_first_rep, set_category;
        code: CodeableConcept => has_code, add_code, push_code, code_first_rep, set_code;
        name: InventoryItemName => has_name, add_name, push_name, name_first_rep, set_name;
        inventory_status: CodeableConcept => has_inventory_status, add_inventory_status, push_inventory_status, inventory_status_first_rep, set_inventory_status;
    }

    singular_accessors! {
        description: InventoryItemDescription = "InventoryItem.description" => has_description, set_description, description_mut;
        base_unit: CodeableConcept = "InventoryItem.baseUnit" => has_base_unit, set_base_unit, base_unit_mut;
        net_content: Quantity = "InventoryItem.netContent" => has_net_content, set_net_content, net_content_mut;
    }

    /// Status symbol; `None` when absent or null
    pub fn status(&self) -> Option<InventoryItemStatus> {
        self.status.and_then(|status| status.value())
    }

    pub fn status_element(&self) -> Option<&Enumeration<InventoryItemStatus>> {
        self.status.as_ref()
    }

    pub fn status_element_mut(
        &mut self,
        config: &ModelConfig,
    ) -> Result<Option<&mut Enumeration<InventoryItemStatus>>> {
        auto_create(&mut self.status, "InventoryItem.status", config)
    }

    pub fn has_status(&self) -> bool {
        self.status.is_some_and(|status| !status.is_null())
    }

    pub fn set_status(&mut self, status: InventoryItemStatus) -> &mut Self {
        self.status = Some(Enumeration::new(status));
        self
    }

    /// Set the status from a wire code, parsed under `config`
    pub fn set_status_code(&mut self, code: &str, config: &ModelConfig) -> Result<&mut Self> {
        self.status = Some(Enumeration::parse(Some(code), config)?);
        Ok(self)
    }

    /// Set the description text, creating the component when needed;
    /// blank text clears it
    pub fn set_description_text(&mut self, text: &str) -> &mut Self {
        self.description
            .get_or_insert_with(InventoryItemDescription::default)
            .set_description(text);
        self
    }

    /// Set the text of the first name, creating the component when needed;
    /// blank text clears it
    pub fn set_name_text(&mut self, text: &str) -> &mut Self {
        self.name_first_rep().name = text_or_none(text);
        self
    }

    /// First name with content, in document order
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .iter()
            .filter_map(InventoryItemName::name)
            .find(|name| !name.trim().is_empty())
    }
}

// ============================================================================
// InventoryItem.name
// ============================================================================

/// One name or designation of the item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryItemName {
    element: ElementBase,
    name_type: Option<Coding>,
    name: Option<StringType>,
}

impl_node!(
    InventoryItemName,
    INVENTORY_ITEM_NAME_SCHEMA,
    [name_type, name],
    base = element
);

impl InventoryItemName {
    pub fn new(name_type: Coding, name: &str) -> Self {
        let mut component = Self::default();
        component.set_name_type(name_type).set_name(name);
        component
    }

    singular_accessors! {
        name_type: Coding = "InventoryItem.name.nameType" => has_name_type, set_name_type, name_type_mut;
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_ref().and_then(StringType::as_str)
    }

    pub fn name_element(&self) -> Option<&StringType> {
        self.name.as_ref()
    }

    /// Store `name` as given; blank text is kept but counts as empty
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name
            .get_or_insert_with(StringType::default)
            .set_value(Some(name.to_string()));
        self
    }
}

// ============================================================================
// InventoryItem.description
// ============================================================================

/// Descriptive characteristics of the item
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryItemDescription {
    element: ElementBase,
    description: Option<StringType>,
}

impl_node!(
    InventoryItemDescription,
    INVENTORY_ITEM_DESCRIPTION_SCHEMA,
    [description],
    base = element
);

impl InventoryItemDescription {
    pub fn new(description: &str) -> Self {
        let mut component = Self::default();
        component.set_description(description);
        component
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_ref().and_then(StringType::as_str)
    }

    pub fn description_element(&self) -> Option<&StringType> {
        self.description.as_ref()
    }

    pub fn set_description(&mut self, description: &str) -> &mut Self {
        self.description = text_or_none(description);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::NodeExt;

    #[test]
    fn test_status_codes_round_trip() {
        for status in InventoryItemStatus::VARIANTS {
            let parsed = InventoryItemStatus::parse(Some(status.code()), &ModelConfig::strict())
                .unwrap();
            assert_eq!(parsed, Some(*status));
            assert_eq!(status.system(), "http://hl7.org/fhir/inventoryitem-status");
        }
        assert_eq!(
            InventoryItemStatus::EnteredInError.display(),
            "Entered in Error"
        );
        assert_eq!(
            "inactive".parse::<InventoryItemStatus>().unwrap(),
            InventoryItemStatus::Inactive
        );
        assert!("Active".parse::<InventoryItemStatus>().is_err());
    }

    #[test]
    fn test_status_serde_matches_codes() {
        for status in InventoryItemStatus::VARIANTS {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.code());
        }
    }

    #[test]
    fn test_with_status() {
        let item = InventoryItem::with_status(InventoryItemStatus::Active);
        assert!(item.has_status());
        assert_eq!(item.status(), Some(InventoryItemStatus::Active));
        assert_eq!(
            item.status_element().and_then(|s| s.code()),
            Some("active")
        );
    }

    #[test]
    fn test_lenient_status_code_is_null() {
        let mut item = InventoryItem::new();
        item.set_status_code("retired", &ModelConfig::lenient()).unwrap();
        assert!(!item.has_status());
        assert!(item.status_element().is_some_and(|s| s.is_null()));

        let err = item
            .set_status_code("retired", &ModelConfig::strict())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCode { .. }));
    }

    #[test]
    fn test_generated_accessors() {
        let mut item = InventoryItem::new();
        assert!(!item.has_code());
        item.add_code().set_text("widget");
        item.push_category(CodeableConcept::from_text("supplies"));
        assert!(item.has_code());
        assert_eq!(item.code().len(), 1);
        assert_eq!(item.category_first_rep().text(), Some("supplies"));

        assert!(item.net_content().is_none());
        let cfg = ModelConfig::default();
        item.net_content_mut(&cfg).unwrap().unwrap().set_unit("mg");
        assert!(item.has_net_content());
    }

    #[test]
    fn test_description_text_setter() {
        let mut item = InventoryItem::new();
        item.set_description_text("Blue pills");
        assert_eq!(
            item.description().and_then(|d| d.description()),
            Some("Blue pills")
        );
        item.set_description_text("");
        assert!(!item.has_description());
    }

    #[test]
    fn test_name_text_setter() {
        let mut item = InventoryItem::new();
        item.set_name_text("Acme Tabs");
        assert_eq!(item.name().len(), 1);
        assert_eq!(item.display_name(), Some("Acme Tabs"));

        item.set_name_text("Acme Tablets");
        assert_eq!(item.name().len(), 1);
        assert_eq!(item.display_name(), Some("Acme Tablets"));

        item.set_name_text("  ");
        assert_eq!(item.name().len(), 1);
        assert_eq!(item.name()[0].name(), None);
        assert!(!item.has_name());
    }

    #[test]
    fn test_set_name_keeps_blank_text() {
        let mut name = InventoryItemName::default();
        name.set_name(" ");
        assert_eq!(name.name(), Some(" "));
        assert!(name.is_empty());
    }

    #[test]
    fn test_display_name_skips_blank_names() {
        let cfg = ModelConfig::default();
        let mut item = InventoryItem::new();
        item.add_name()
            .set_property("name", Box::new(StringType::new("  ")), &cfg)
            .unwrap();
        assert!(!item.has_name());
        assert_eq!(item.display_name(), None);

        item.add_name().set_name("Gauze");
        assert_eq!(item.display_name(), Some("Gauze"));
    }

    #[test]
    fn test_components_declare_only_their_own_fields() {
        let name = InventoryItemName::new(Coding::default(), "Acme");
        let children: Vec<_> = name.list_children().iter().map(|p| p.name()).collect();
        assert_eq!(children, vec!["id", "nameType", "name"]);
        assert!(matches!(
            name.named_property("language"),
            Err(Error::UnknownField { .. })
        ));

        let description = InventoryItemDescription::default();
        let children: Vec<_> = description
            .list_children()
            .iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(children, vec!["id", "description"]);
    }

    #[test]
    fn test_name_component() {
        let brand = Coding::new(
            "http://hl7.org/fhir/inventoryitem-nametype",
            "brand-name",
            "Brand name",
        );
        let mut item = InventoryItem::new();
        item.push_name(InventoryItemName::new(brand, "Acme Tabs"));
        assert_eq!(item.display_name(), Some("Acme Tabs"));
        assert_eq!(item.name()[0].fhir_type(), "InventoryItem.name");
        assert!(item.name()[0].has_name_type());
    }

    #[test]
    fn test_search_parameters() {
        let names: Vec<_> = SEARCH_PARAMETERS.iter().map(|p| p.name).collect();
        assert_eq!(names, vec![SP_CODE, SP_IDENTIFIER, SP_STATUS]);
        assert!(SEARCH_PARAMETERS
            .iter()
            .all(|p| p.kind == SearchParamType::Token));
    }

    #[test]
    fn test_resource_fields_fall_through() {
        let mut item = InventoryItem::new();
        item.set_id("item-1");
        let values = item.get_property("id").unwrap();
        assert_eq!(values[0].primitive_value().as_deref(), Some("item-1"));
        assert_eq!(item.types_for_property("id").unwrap(), &["id"]);
    }
}
