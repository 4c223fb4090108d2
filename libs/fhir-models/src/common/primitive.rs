//! Primitive data types
//!
//! Each primitive is a thin wrapper over an optional value. A wrapper with no
//! value, or with a blank textual value, is empty.

use crate::config::ModelConfig;
use crate::element::slot::type_mismatch;
use crate::element::{Base, Element, FieldDescriptor};
use crate::error::Result;
use rust_decimal::Decimal;
use std::any::Any;
use std::str::FromStr;

macro_rules! primitive_type {
    ($(#[$meta:meta])* $name:ident($value:ty) => $fhir:literal, $parse:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            value: Option<$value>,
        }

        impl $name {
            pub fn new(value: impl Into<$value>) -> Self {
                Self {
                    value: Some(value.into()),
                }
            }

            pub fn value(&self) -> Option<&$value> {
                self.value.as_ref()
            }

            pub fn set_value(&mut self, value: Option<$value>) -> &mut Self {
                self.value = value;
                self
            }

            pub fn has_value(&self) -> bool {
                !Base::is_empty(self)
            }
        }

        impl Base for $name {
            fn fhir_type(&self) -> &'static str {
                $fhir
            }

            fn is_empty(&self) -> bool {
                self.primitive_value()
                    .map_or(true, |text| text.trim().is_empty())
            }

            fn equals_deep(&self, other: &dyn Base) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .is_some_and(|other| other.value == self.value)
            }

            fn equals_shallow(&self, other: &dyn Base) -> bool {
                self.equals_deep(other)
            }

            fn clone_base(&self) -> Box<dyn Base> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn Any> {
                self
            }

            fn is_primitive(&self) -> bool {
                true
            }

            fn primitive_value(&self) -> Option<String> {
                self.value.as_ref().map(|value| value.to_string())
            }
        }

        impl Element for $name {
            const PRIMITIVE: bool = true;

            /// Accepts the same wrapper, or any primitive whose text parses as this type.
            fn cast(
                value: Box<dyn Base>,
                field: &FieldDescriptor,
                _config: &ModelConfig,
            ) -> Result<Self> {
                let found = value.fhir_type();
                let is_primitive = value.is_primitive();
                let text = value.primitive_value();
                match value.into_any().downcast::<Self>() {
                    Ok(own) => Ok(*own),
                    Err(_) if is_primitive => match text {
                        None => Ok(Self::default()),
                        Some(text) => $parse(&text)
                            .map(|value| Self { value: Some(value) })
                            .ok_or_else(|| type_mismatch::<Self>(field, found)),
                    },
                    Err(_) => Err(type_mismatch::<Self>(field, found)),
                }
            }
        }

        impl From<$value> for $name {
            fn from(value: $value) -> Self {
                Self { value: Some(value) }
            }
        }
    };
}

fn parse_text(text: &str) -> Option<String> {
    Some(text.to_string())
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim()).ok()
}

fn parse_boolean(text: &str) -> Option<bool> {
    match text.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

primitive_type!(
    /// A sequence of Unicode characters
    StringType(String) => "string", parse_text
);

primitive_type!(
    /// A string drawn from a controlled set of strings
    CodeType(String) => "code", parse_text
);

primitive_type!(
    /// A uniform resource identifier
    UriType(String) => "uri", parse_text
);

primitive_type!(
    /// Logical id of a resource
    IdType(String) => "id", parse_text
);

primitive_type!(
    /// A rational number with implicit precision
    DecimalType(Decimal) => "decimal", parse_decimal
);

primitive_type!(
    BooleanType(bool) => "boolean", parse_boolean
);

impl StringType {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl CodeType {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl UriType {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl IdType {
    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl From<&str> for StringType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CodeType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&str> for UriType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<&str> for IdType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Optional text field setter: blank input clears the field
pub(crate) fn text_or_none<T: From<String>>(value: &str) -> Option<T> {
    if value.trim().is_empty() {
        None
    } else {
        Some(T::from(value.to_string()))
    }
}
