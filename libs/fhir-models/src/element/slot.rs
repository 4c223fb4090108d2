//! Field storage
//!
//! A node stores each field either as `Option<T>` (0..1, 1..1) or `Vec<T>`
//! (0..*, 1..*). [`Slot`] is implemented once for both shapes; every
//! per-field behavior of the generic access surface comes from here.

use super::schema::FieldDescriptor;
use super::{Base, Values};
use crate::config::{AutoCreate, ModelConfig};
use crate::error::{Error, Result};

/// Static side of a value type that can live in a slot
pub trait Element: Base + Clone + Default {
    /// Primitive values cannot be added as fresh singleton children
    const PRIMITIVE: bool = false;

    /// Convert a generic value into this type for a write to `field`.
    fn cast(
        value: Box<dyn Base>,
        field: &FieldDescriptor,
        _config: &ModelConfig,
    ) -> Result<Self> {
        downcast(value, field)
    }
}

/// Take ownership of `value` as `T`, or fail with a type mismatch
pub fn downcast<T: Element>(value: Box<dyn Base>, field: &FieldDescriptor) -> Result<T> {
    let found = value.fhir_type();
    value
        .into_any()
        .downcast::<T>()
        .map(|value| *value)
        .map_err(|_| type_mismatch::<T>(field, found))
}

pub(crate) fn type_mismatch<T: Element>(field: &FieldDescriptor, found: &str) -> Error {
    let expected = if field.types.is_empty() {
        T::default().fhir_type().to_string()
    } else {
        field.types.join("|")
    };
    Error::TypeMismatch {
        path: field.path.to_string(),
        expected,
        found: found.to_string(),
    }
}

/// Accessor-style read of a singular value, honoring [`AutoCreate`].
pub fn auto_create<'a, T: Element>(
    slot: &'a mut Option<T>,
    path: &str,
    config: &ModelConfig,
) -> Result<Option<&'a mut T>> {
    if slot.is_some() {
        return Ok(slot.as_mut());
    }
    match config.auto_create {
        AutoCreate::Forbidden => Err(Error::ConfigurationViolation {
            path: path.to_string(),
        }),
        AutoCreate::Disabled => Ok(None),
        AutoCreate::Enabled => {
            tracing::trace!(path, "auto-creating absent value");
            Ok(Some(slot.insert(T::default())))
        }
    }
}

/// Storage of one field, seen through the generic surface
pub trait Slot {
    /// Current values in order; absent values are omitted
    fn values(&self) -> Values<'_>;

    /// True when no stored value carries content
    fn is_vacant(&self) -> bool;

    /// Number of stored values that carry content
    fn present_count(&self) -> usize;

    /// Replace (singular) or append (repeated)
    fn assign(
        &mut self,
        field: &FieldDescriptor,
        value: Box<dyn Base>,
        config: &ModelConfig,
    ) -> Result<()>;

    /// Fresh element for composites and lists; the existing wrapper for primitives
    fn make(&mut self, field: &FieldDescriptor, config: &ModelConfig) -> Result<&mut dyn Base>;

    /// Fresh element; singular primitives are not constructible
    fn add(&mut self, field: &FieldDescriptor) -> Result<&mut dyn Base>;

    /// Accessor-style read that may materialize an empty value
    fn materialize(
        &mut self,
        field: &FieldDescriptor,
        config: &ModelConfig,
    ) -> Result<Option<&mut dyn Base>>;
}

impl<T: Element> Slot for Option<T> {
    fn values(&self) -> Values<'_> {
        self.iter().map(|value| value as &dyn Base).collect()
    }

    fn is_vacant(&self) -> bool {
        self.as_ref().map_or(true, |value| value.is_empty())
    }

    fn present_count(&self) -> usize {
        usize::from(!self.is_vacant())
    }

    fn assign(
        &mut self,
        field: &FieldDescriptor,
        value: Box<dyn Base>,
        config: &ModelConfig,
    ) -> Result<()> {
        *self = Some(T::cast(value, field, config)?);
        Ok(())
    }

    fn make(&mut self, field: &FieldDescriptor, config: &ModelConfig) -> Result<&mut dyn Base> {
        if !T::PRIMITIVE {
            return Ok(self.insert(T::default()) as &mut dyn Base);
        }
        if self.is_none() {
            if config.auto_create == AutoCreate::Forbidden {
                return Err(Error::ConfigurationViolation {
                    path: field.path.to_string(),
                });
            }
            tracing::trace!(path = field.path, "creating primitive wrapper");
        }
        Ok(self.get_or_insert_with(T::default) as &mut dyn Base)
    }

    fn add(&mut self, field: &FieldDescriptor) -> Result<&mut dyn Base> {
        if T::PRIMITIVE {
            return Err(Error::NotConstructible {
                path: field.path.to_string(),
            });
        }
        Ok(self.insert(T::default()) as &mut dyn Base)
    }

    fn materialize(
        &mut self,
        field: &FieldDescriptor,
        config: &ModelConfig,
    ) -> Result<Option<&mut dyn Base>> {
        let value = auto_create(self, field.path, config)?;
        Ok(value.map(|value| value as &mut dyn Base))
    }
}

impl<T: Element> Slot for Vec<T> {
    fn values(&self) -> Values<'_> {
        self.iter().map(|value| value as &dyn Base).collect()
    }

    fn is_vacant(&self) -> bool {
        self.iter().all(|value| value.is_empty())
    }

    fn present_count(&self) -> usize {
        self.iter().filter(|value| !value.is_empty()).count()
    }

    fn assign(
        &mut self,
        field: &FieldDescriptor,
        value: Box<dyn Base>,
        config: &ModelConfig,
    ) -> Result<()> {
        self.push(T::cast(value, field, config)?);
        Ok(())
    }

    fn make(&mut self, field: &FieldDescriptor, _config: &ModelConfig) -> Result<&mut dyn Base> {
        self.add(field)
    }

    fn add(&mut self, _field: &FieldDescriptor) -> Result<&mut dyn Base> {
        self.push(T::default());
        let last = self.len() - 1;
        Ok(&mut self[last] as &mut dyn Base)
    }

    /// First element, created when the list is empty and auto-create allows it
    fn materialize(
        &mut self,
        field: &FieldDescriptor,
        config: &ModelConfig,
    ) -> Result<Option<&mut dyn Base>> {
        if self.is_empty() {
            match config.auto_create {
                AutoCreate::Forbidden => {
                    return Err(Error::ConfigurationViolation {
                        path: field.path.to_string(),
                    })
                }
                AutoCreate::Disabled => return Ok(None),
                AutoCreate::Enabled => {
                    tracing::trace!(path = field.path, "auto-creating first element");
                    self.push(T::default());
                }
            }
        }
        Ok(self.first_mut().map(|value| value as &mut dyn Base))
    }
}
