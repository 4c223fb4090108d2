//! Building blocks shared by resources: primitives, data types, supertype
//! nodes, code enumerations and conformance metadata.

pub mod base;
pub mod complex;
pub mod datatypes;
pub mod enumeration;
pub mod primitive;

pub use base::{ElementBase, ResourceBase, ELEMENT_SCHEMA, RESOURCE_SCHEMA};
pub use complex::{
    Binding, BindingStrength, SearchParamType, SearchParameter, StructureDefinitionKind,
};
pub use datatypes::{
    CodeableConcept, Coding, Identifier, Quantity, CODEABLE_CONCEPT_SCHEMA, CODING_SCHEMA,
    IDENTIFIER_SCHEMA, QUANTITY_SCHEMA, UCUM_SYSTEM,
};
pub use enumeration::{CodedEnum, Enumeration};
pub use primitive::{BooleanType, CodeType, DecimalType, IdType, StringType, UriType};
