//! Complex data types used by resources
//!
//! Each type embeds an [`ElementBase`] for the inherited `id`.

use super::base::{ElementBase, ELEMENT_SCHEMA};
use super::complex::{BindingStrength, StructureDefinitionKind};
use super::primitive::{
    text_or_none, BooleanType, CodeType, DecimalType, StringType, UriType,
};
use crate::element::{impl_node, FieldDescriptor, Schema, ValueKind};
use rust_decimal::Decimal;

pub const UCUM_SYSTEM: &str = "http://unitsofmeasure.org";

/// Getter and blank-clearing setter for singular textual fields
macro_rules! text_accessors {
    ($($field:ident, $setter:ident;)*) => {
        $(
            pub fn $field(&self) -> Option<&str> {
                self.$field.as_ref().and_then(|value| value.as_str())
            }

            pub fn $setter(&mut self, value: &str) -> &mut Self {
                self.$field = text_or_none(value);
                self
            }
        )*
    };
}

// Identifier

static IDENTIFIER_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor::new("use", "Identifier.use", ValueKind::Primitive, &["code"])
        .in_summary()
        .modifier()
        .bound(
            BindingStrength::Required,
            "http://hl7.org/fhir/ValueSet/identifier-use",
        )
        .describe("The purpose of this identifier."),
    FieldDescriptor::new("system", "Identifier.system", ValueKind::Primitive, &["uri"])
        .in_summary()
        .describe("Establishes the namespace for the value."),
    FieldDescriptor::new("value", "Identifier.value", ValueKind::Primitive, &["string"])
        .in_summary()
        .describe("The portion of the identifier typically relevant to the user and which is unique within the context of the system."),
];

pub static IDENTIFIER_SCHEMA: Schema = Schema {
    type_name: "Identifier",
    kind: StructureDefinitionKind::ComplexType,
    is_abstract: false,
    url: Some("http://hl7.org/fhir/StructureDefinition/Identifier"),
    base: Some(&ELEMENT_SCHEMA),
    fields: &IDENTIFIER_FIELDS,
};

/// An identifier intended for computation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identifier {
    element: ElementBase,
    pub use_: Option<CodeType>,
    pub system: Option<UriType>,
    pub value: Option<StringType>,
}

impl_node!(Identifier, IDENTIFIER_SCHEMA, [use_, system, value], base = element);

impl Identifier {
    pub fn new(system: &str, value: &str) -> Self {
        let mut identifier = Self::default();
        identifier.set_system(system).set_value(value);
        identifier
    }

    /// Identifier with only a value
    pub fn with_value(value: &str) -> Self {
        let mut identifier = Self::default();
        identifier.set_value(value);
        identifier
    }

    pub fn use_code(&self) -> Option<&str> {
        self.use_.as_ref().and_then(|value| value.as_str())
    }

    pub fn set_use_code(&mut self, value: &str) -> &mut Self {
        self.use_ = text_or_none(value);
        self
    }

    text_accessors! {
        system, set_system;
        value, set_value;
    }
}

// Coding

static CODING_FIELDS: [FieldDescriptor; 5] = [
    FieldDescriptor::new("system", "Coding.system", ValueKind::Primitive, &["uri"])
        .in_summary()
        .describe("The identification of the code system that defines the meaning of the symbol in the code."),
    FieldDescriptor::new("version", "Coding.version", ValueKind::Primitive, &["string"])
        .in_summary()
        .describe("The version of the code system which was used when choosing this code."),
    FieldDescriptor::new("code", "Coding.code", ValueKind::Primitive, &["code"])
        .in_summary()
        .describe("A symbol in syntax defined by the system."),
    FieldDescriptor::new("display", "Coding.display", ValueKind::Primitive, &["string"])
        .in_summary()
        .describe("A representation of the meaning of the code in the system."),
    FieldDescriptor::new(
        "userSelected",
        "Coding.userSelected",
        ValueKind::Primitive,
        &["boolean"],
    )
    .in_summary()
    .describe("Indicates that this coding was chosen by a user directly."),
];

pub static CODING_SCHEMA: Schema = Schema {
    type_name: "Coding",
    kind: StructureDefinitionKind::ComplexType,
    is_abstract: false,
    url: Some("http://hl7.org/fhir/StructureDefinition/Coding"),
    base: Some(&ELEMENT_SCHEMA),
    fields: &CODING_FIELDS,
};

/// A reference to a code defined by a terminology system
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Coding {
    element: ElementBase,
    pub system: Option<UriType>,
    pub version: Option<StringType>,
    pub code: Option<CodeType>,
    pub display: Option<StringType>,
    pub user_selected: Option<BooleanType>,
}

impl_node!(
    Coding,
    CODING_SCHEMA,
    [system, version, code, display, user_selected],
    base = element
);

impl Coding {
    pub fn new(system: &str, code: &str, display: &str) -> Self {
        let mut coding = Self::default();
        coding.set_system(system).set_code(code).set_display(display);
        coding
    }

    text_accessors! {
        system, set_system;
        version, set_version;
        code, set_code;
        display, set_display;
    }

    pub fn user_selected(&self) -> Option<bool> {
        self.user_selected
            .as_ref()
            .and_then(|value| value.value().copied())
    }

    pub fn set_user_selected(&mut self, value: bool) -> &mut Self {
        self.user_selected = Some(BooleanType::new(value));
        self
    }

    /// Same system and code
    pub fn is(&self, system: &str, code: &str) -> bool {
        self.system() == Some(system) && self.code() == Some(code)
    }
}

// CodeableConcept

static CODEABLE_CONCEPT_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor::new(
        "coding",
        "CodeableConcept.coding",
        ValueKind::Complex,
        &["Coding"],
    )
    .repeated()
    .in_summary()
    .describe("A reference to a code defined by a terminology system."),
    FieldDescriptor::new("text", "CodeableConcept.text", ValueKind::Primitive, &["string"])
        .in_summary()
        .describe("A human language representation of the concept as seen/selected/uttered by the user who entered the data."),
];

pub static CODEABLE_CONCEPT_SCHEMA: Schema = Schema {
    type_name: "CodeableConcept",
    kind: StructureDefinitionKind::ComplexType,
    is_abstract: false,
    url: Some("http://hl7.org/fhir/StructureDefinition/CodeableConcept"),
    base: Some(&ELEMENT_SCHEMA),
    fields: &CODEABLE_CONCEPT_FIELDS,
};

/// A concept given by codings and/or text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeableConcept {
    element: ElementBase,
    pub coding: Vec<Coding>,
    pub text: Option<StringType>,
}

impl_node!(
    CodeableConcept,
    CODEABLE_CONCEPT_SCHEMA,
    [coding, text],
    base = element
);

impl CodeableConcept {
    pub fn from_coding(coding: Coding) -> Self {
        Self {
            coding: vec![coding],
            ..Self::default()
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut concept = Self::default();
        concept.set_text(text);
        concept
    }

    pub fn add_coding(&mut self, coding: Coding) -> &mut Self {
        self.coding.push(coding);
        self
    }

    /// True when any coding has this system and code
    pub fn has_coding(&self, system: &str, code: &str) -> bool {
        self.coding.iter().any(|coding| coding.is(system, code))
    }

    text_accessors! {
        text, set_text;
    }
}

// Quantity

static QUANTITY_FIELDS: [FieldDescriptor; 5] = [
    FieldDescriptor::new("value", "Quantity.value", ValueKind::Primitive, &["decimal"])
        .in_summary()
        .describe("The value of the measured amount."),
    FieldDescriptor::new(
        "comparator",
        "Quantity.comparator",
        ValueKind::Primitive,
        &["code"],
    )
    .in_summary()
    .modifier()
    .bound(
        BindingStrength::Required,
        "http://hl7.org/fhir/ValueSet/quantity-comparator",
    )
    .describe("How the value should be understood and represented."),
    FieldDescriptor::new("unit", "Quantity.unit", ValueKind::Primitive, &["string"])
        .in_summary()
        .describe("A human-readable form of the unit."),
    FieldDescriptor::new("system", "Quantity.system", ValueKind::Primitive, &["uri"])
        .in_summary()
        .describe("The identification of the system that provides the coded form of the unit."),
    FieldDescriptor::new("code", "Quantity.code", ValueKind::Primitive, &["code"])
        .in_summary()
        .describe("A computer processable form of the unit in some unit representation system."),
];

pub static QUANTITY_SCHEMA: Schema = Schema {
    type_name: "Quantity",
    kind: StructureDefinitionKind::ComplexType,
    is_abstract: false,
    url: Some("http://hl7.org/fhir/StructureDefinition/Quantity"),
    base: Some(&ELEMENT_SCHEMA),
    fields: &QUANTITY_FIELDS,
};

/// A measured amount
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quantity {
    element: ElementBase,
    pub value: Option<DecimalType>,
    pub comparator: Option<CodeType>,
    pub unit: Option<StringType>,
    pub system: Option<UriType>,
    pub code: Option<CodeType>,
}

impl_node!(
    Quantity,
    QUANTITY_SCHEMA,
    [value, comparator, unit, system, code],
    base = element
);

impl Quantity {
    /// Amount in a UCUM unit; `unit` is used as both the code and display
    pub fn ucum(value: Decimal, unit: &str) -> Self {
        let mut quantity = Self::default();
        quantity.set_value(value);
        quantity
            .set_unit(unit)
            .set_system(UCUM_SYSTEM)
            .set_code(unit);
        quantity
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value.as_ref().and_then(|value| value.value().copied())
    }

    pub fn set_value(&mut self, value: Decimal) -> &mut Self {
        self.value = Some(DecimalType::new(value));
        self
    }

    text_accessors! {
        comparator, set_comparator;
        unit, set_unit;
        system, set_system;
        code, set_code;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Base, NodeExt};
    use crate::ModelConfig;

    #[test]
    fn test_blank_setter_clears() {
        let mut identifier = Identifier::new("http://example.org/ids", "123");
        assert_eq!(identifier.value(), Some("123"));
        identifier.set_value("");
        assert_eq!(identifier.value(), None);
        assert!(!identifier.is_empty());
        identifier.set_system(" ");
        assert!(identifier.is_empty());
    }

    #[test]
    fn test_inherited_id_is_reachable() {
        let mut coding = Coding::new("http://loinc.org", "1234-5", "Test");
        coding
            .set_property("id", Box::new(StringType::new("c1")), &ModelConfig::default())
            .unwrap();
        let names: Vec<_> = coding.list_children().iter().map(|p| p.name()).collect();
        assert_eq!(
            names,
            vec!["id", "system", "version", "code", "display", "userSelected"]
        );
        let id = coding.get_property("id").unwrap();
        assert_eq!(id[0].primitive_value().as_deref(), Some("c1"));
    }

    #[test]
    fn test_codeable_concept_matching() {
        let mut concept = CodeableConcept::from_coding(Coding::new(
            "http://snomed.info/sct",
            "385055001",
            "Tablet",
        ));
        concept.set_text("tablet");
        assert!(concept.has_coding("http://snomed.info/sct", "385055001"));
        assert!(!concept.has_coding("http://snomed.info/sct", "0"));
        assert_eq!(concept.count_present("coding").unwrap(), 1);
    }

    #[test]
    fn test_shallow_equality_ignores_repeated_fields() {
        let a = CodeableConcept::from_text("x");
        let mut b = CodeableConcept::from_text("x");
        b.add_coding(Coding::new("s", "c", "d"));
        assert!(a.equals_shallow(&b));
        assert!(!a.equals_deep(&b));
    }

    #[test]
    fn test_quantity_ucum() {
        let quantity = Quantity::ucum(Decimal::new(500, 0), "mg");
        assert_eq!(quantity.value(), Some(Decimal::new(500, 0)));
        assert_eq!(quantity.system(), Some(UCUM_SYSTEM));
        assert_eq!(quantity.code(), Some("mg"));
        assert_eq!(quantity.fhir_type(), "Quantity");
    }
}
