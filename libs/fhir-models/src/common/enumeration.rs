//! Closed code enumerations
//!
//! A [`CodedEnum`] is a closed set of symbols, each mapped to a wire code, a
//! code system, a display label and a definition. [`Enumeration`] is the
//! `code` primitive that stores one symbol inside a node; a wrapper holding no
//! symbol is the null value produced by blank input or lenient parsing.

use crate::config::ModelConfig;
use crate::element::slot::type_mismatch;
use crate::element::{Base, Element, FieldDescriptor};
use crate::error::{Error, Result};
use std::any::Any;
use std::fmt;

pub trait CodedEnum: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Name of the code list (`InventoryItemStatusCodes`)
    const NAME: &'static str;
    /// Canonical URI of the code system
    const CODE_SYSTEM: &'static str;
    /// Every symbol, in definition order
    const VARIANTS: &'static [Self];

    fn code(self) -> &'static str;

    fn display(self) -> &'static str;

    fn definition(self) -> &'static str;

    fn system(self) -> &'static str {
        Self::CODE_SYSTEM
    }

    /// Exact-match lookup of a wire code
    fn from_code(code: &str) -> Option<Self>;

    /// Parse a wire code.
    ///
    /// Absent or blank input is the null value. Unknown codes fail with
    /// [`Error::UnknownCode`] unless `config` enables lenient parsing, in which
    /// case they also become the null value.
    fn parse(code: Option<&str>, config: &ModelConfig) -> Result<Option<Self>> {
        let Some(code) = code.filter(|code| !code.trim().is_empty()) else {
            return Ok(None);
        };
        if let Some(symbol) = Self::from_code(code) {
            return Ok(Some(symbol));
        }
        if config.is_lenient() {
            tracing::warn!(
                code_system = Self::NAME,
                code,
                "unknown code, storing null value"
            );
            return Ok(None);
        }
        Err(Error::UnknownCode {
            code_system: Self::NAME.to_string(),
            code: code.to_string(),
        })
    }
}

/// Coded primitive holding at most one symbol of `E`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Enumeration<E: CodedEnum> {
    value: Option<E>,
}

impl<E: CodedEnum> Enumeration<E> {
    pub fn new(value: E) -> Self {
        Self { value: Some(value) }
    }

    /// The null value
    pub fn null() -> Self {
        Self { value: None }
    }

    pub fn value(&self) -> Option<E> {
        self.value
    }

    pub fn set_value(&mut self, value: Option<E>) -> &mut Self {
        self.value = value;
        self
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Wire code, absent for the null value
    pub fn code(&self) -> Option<&'static str> {
        self.value.map(E::code)
    }

    pub fn system(&self) -> Option<&'static str> {
        self.value.map(E::system)
    }

    pub fn display(&self) -> Option<&'static str> {
        self.value.map(E::display)
    }

    /// Parse a wire code into a wrapper, see [`CodedEnum::parse`]
    pub fn parse(code: Option<&str>, config: &ModelConfig) -> Result<Self> {
        Ok(Self {
            value: E::parse(code, config)?,
        })
    }
}

impl<E: CodedEnum> Default for Enumeration<E> {
    fn default() -> Self {
        Self::null()
    }
}

impl<E: CodedEnum> From<E> for Enumeration<E> {
    fn from(value: E) -> Self {
        Self::new(value)
    }
}

impl<E: CodedEnum> fmt::Debug for Enumeration<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "Enumeration({}#{})", E::NAME, value.code()),
            None => write!(f, "Enumeration({}#null)", E::NAME),
        }
    }
}

impl<E: CodedEnum> Base for Enumeration<E> {
    fn fhir_type(&self) -> &'static str {
        "code"
    }

    fn is_empty(&self) -> bool {
        self.value.is_none()
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
        Box::new(*self)
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
        self.code().map(str::to_string)
    }
}

impl<E: CodedEnum> Element for Enumeration<E> {
    const PRIMITIVE: bool = true;

    /// Accepts the same wrapper, or any textual primitive parsed under `config`.
    fn cast(value: Box<dyn Base>, field: &FieldDescriptor, config: &ModelConfig) -> Result<Self> {
        if let Some(own) = value.downcast_ref::<Self>() {
            return Ok(*own);
        }
        if !value.is_primitive() {
            return Err(type_mismatch::<Self>(field, value.fhir_type()));
        }
        Self::parse(value.primitive_value().as_deref(), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
    }

    impl CodedEnum for Light {
        const NAME: &'static str = "LightCodes";
        const CODE_SYSTEM: &'static str = "http://example.org/light";
        const VARIANTS: &'static [Self] = &[Light::Red, Light::Green];

        fn code(self) -> &'static str {
            match self {
                Light::Red => "red",
                Light::Green => "green",
            }
        }

        fn display(self) -> &'static str {
            match self {
                Light::Red => "Red",
                Light::Green => "Green",
            }
        }

        fn definition(self) -> &'static str {
            "A light."
        }

        fn from_code(code: &str) -> Option<Self> {
            Self::VARIANTS.iter().copied().find(|v| v.code() == code)
        }
    }

    #[test]
    fn test_blank_input_is_null() {
        let strict = ModelConfig::strict();
        assert_eq!(Light::parse(None, &strict).unwrap(), None);
        assert_eq!(Light::parse(Some(""), &strict).unwrap(), None);
        assert_eq!(Light::parse(Some("  "), &strict).unwrap(), None);
    }

    #[test]
    fn test_unknown_code_depends_on_mode() {
        let err = Light::parse(Some("blue"), &ModelConfig::strict()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown LightCodes code 'blue'");
        assert_eq!(
            Light::parse(Some("blue"), &ModelConfig::lenient()).unwrap(),
            None
        );
    }

    #[test]
    fn test_null_renders_absent() {
        let null = Enumeration::<Light>::null();
        assert!(null.is_empty());
        assert_eq!(null.code(), None);
        assert_eq!(null.primitive_value(), None);
        assert_eq!(format!("{null:?}"), "Enumeration(LightCodes#null)");
    }

    #[test]
    fn test_wrapper_equality() {
        let red = Enumeration::new(Light::Red);
        assert!(red.equals_deep(&Enumeration::new(Light::Red)));
        assert!(!red.equals_deep(&Enumeration::new(Light::Green)));
        assert!(!red.equals_deep(&Enumeration::<Light>::null()));
        assert_eq!(red.system(), Some("http://example.org/light"));
    }
}
