//! Typed property tree
//!
//! Every value in a resource implements [`Base`]. Composites additionally
//! implement [`Node`]: they expose a static [`Schema`] and map each declared
//! field to a [`Slot`]. The generic operations used by tree walkers, format
//! converters and path evaluators live in [`NodeExt`] and are written once
//! against those two traits.
//!
//! Supertype fields (e.g. `Resource.id`) are held by an embedded base node.
//! Lookups that miss the node's own schema fall through to that base before
//! failing with [`Error::UnknownField`].

pub mod schema;
pub mod slot;

pub use schema::{property_key, FieldDescriptor, FieldKey, Max, Schema, ValueKind};
pub use slot::{auto_create, downcast, Element, Slot};

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;

/// Values of one field. Most fields hold zero or one value.
pub type Values<'a> = SmallVec<[&'a dyn Base; 4]>;

/// Capabilities shared by every tree value, primitive or composite
pub trait Base: Any + fmt::Debug {
    /// Type name (`string`, `Coding`, `InventoryItem`, `InventoryItem.name`)
    fn fhir_type(&self) -> &'static str;

    /// True iff no content is present, checked recursively
    fn is_empty(&self) -> bool;

    /// Same concrete type and recursively equal content
    fn equals_deep(&self, other: &dyn Base) -> bool;

    /// Same concrete type and equal singular primitive content
    fn equals_shallow(&self, other: &dyn Base) -> bool;

    /// Deep copy behind a fresh box
    fn clone_base(&self) -> Box<dyn Base>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn is_primitive(&self) -> bool {
        false
    }

    /// Textual form of a primitive value
    fn primitive_value(&self) -> Option<String> {
        None
    }

    fn as_node(&self) -> Option<&dyn Node> {
        None
    }

    fn as_node_mut(&mut self) -> Option<&mut dyn Node> {
        None
    }
}

impl dyn Base {
    pub fn downcast_ref<T: Base>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Base>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: Base>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl Clone for Box<dyn Base> {
    fn clone(&self) -> Self {
        self.clone_base()
    }
}

/// A composite with a declared field table
pub trait Node: Base {
    fn schema(&self) -> &'static Schema;

    fn as_base(&self) -> &dyn Base;

    /// Storage of the field at `index` in `schema().fields`
    fn slot(&self, index: usize) -> Option<&dyn Slot>;

    fn slot_mut(&mut self, index: usize) -> Option<&mut dyn Slot>;

    /// Embedded supertype node holding inherited fields
    fn base(&self) -> Option<&dyn Node> {
        None
    }

    fn base_mut(&mut self) -> Option<&mut dyn Node> {
        None
    }
}

/// One field of a node together with its current values
#[derive(Debug)]
pub struct Property<'a> {
    pub field: &'static FieldDescriptor,
    pub values: Values<'a>,
}

impl Property<'_> {
    pub fn name(&self) -> &'static str {
        self.field.name
    }

    pub fn has_values(&self) -> bool {
        self.values.iter().any(|value| !value.is_empty())
    }
}

/// Generic access surface, available on every [`Node`] and on `dyn Node`
pub trait NodeExt: Node {
    /// Schema type name
    fn kind(&self) -> &'static str {
        self.schema().type_name
    }

    /// Resolve a field in this schema or a supertype schema
    fn resolve(&self, key: FieldKey<'_>) -> Option<(&'static FieldDescriptor, &dyn Slot)>;

    fn resolve_mut(
        &mut self,
        key: FieldKey<'_>,
    ) -> Option<(&'static FieldDescriptor, &mut dyn Slot)>;

    /// Every declared field in schema order, supertype fields first.
    /// Absent fields are listed with no values.
    fn list_children(&self) -> Vec<Property<'_>>;

    /// [`NodeExt::list_children`] restricted to summary fields
    fn summary_children(&self) -> Vec<Property<'_>> {
        self.list_children()
            .into_iter()
            .filter(|property| property.field.summary)
            .collect()
    }

    fn field<'k>(&self, key: impl Into<FieldKey<'k>>) -> Option<&'static FieldDescriptor> {
        self.schema().field(key.into())
    }

    fn named_property<'k>(&self, key: impl Into<FieldKey<'k>>) -> Result<Property<'_>>;

    /// Zero or one value for singular fields, all values in order for repeated ones
    fn get_property<'k>(&self, key: impl Into<FieldKey<'k>>) -> Result<Values<'_>>;

    /// True when the field holds at least one non-empty value
    fn has_property<'k>(&self, key: impl Into<FieldKey<'k>>) -> Result<bool>;

    /// Number of non-empty values of the field
    fn count_present<'k>(&self, key: impl Into<FieldKey<'k>>) -> Result<usize>;

    /// Replace a singular value or append to a repeated field
    fn set_property<'k>(
        &mut self,
        key: impl Into<FieldKey<'k>>,
        value: Box<dyn Base>,
        config: &ModelConfig,
    ) -> Result<()>;

    /// Install and return a fresh element; singular primitives return their
    /// existing wrapper, created on demand
    fn make_property<'k>(
        &mut self,
        key: impl Into<FieldKey<'k>>,
        config: &ModelConfig,
    ) -> Result<&mut dyn Base>;

    /// Install and return a fresh element; singular primitives fail with
    /// [`Error::NotConstructible`]
    fn add_child<'k>(&mut self, key: impl Into<FieldKey<'k>>) -> Result<&mut dyn Base>;

    /// Accessor-style read honoring the auto-create mode
    fn get_or_create<'k>(
        &mut self,
        key: impl Into<FieldKey<'k>>,
        config: &ModelConfig,
    ) -> Result<Option<&mut dyn Base>>;

    /// Accepted value type names for a field
    fn types_for_property<'k>(
        &self,
        key: impl Into<FieldKey<'k>>,
    ) -> Result<&'static [&'static str]>;
}

impl<N: Node + ?Sized> NodeExt for N {
    fn resolve(&self, key: FieldKey<'_>) -> Option<(&'static FieldDescriptor, &dyn Slot)> {
        let schema = self.schema();
        if let Some(index) = schema.position(key) {
            let field = &schema.fields[index];
            return self.slot(index).map(|slot| (field, slot));
        }
        let base = self.base()?;
        tracing::debug!(
            type_name = schema.type_name,
            %key,
            base = base.schema().type_name,
            "field not declared, trying supertype"
        );
        base.resolve(key)
    }

    fn resolve_mut(
        &mut self,
        key: FieldKey<'_>,
    ) -> Option<(&'static FieldDescriptor, &mut dyn Slot)> {
        let schema = self.schema();
        if let Some(index) = schema.position(key) {
            let field = &schema.fields[index];
            return self.slot_mut(index).map(|slot| (field, slot));
        }
        let base = self.base_mut()?;
        tracing::debug!(
            type_name = schema.type_name,
            %key,
            base = base.schema().type_name,
            "field not declared, trying supertype"
        );
        base.resolve_mut(key)
    }

    fn list_children(&self) -> Vec<Property<'_>> {
        let mut children = self
            .base()
            .map(|base| base.list_children())
            .unwrap_or_default();
        let fields: &'static [FieldDescriptor] = self.schema().fields;
        for (index, field) in fields.iter().enumerate() {
            let values = self.slot(index).map(|slot| slot.values()).unwrap_or_default();
            children.push(Property { field, values });
        }
        children
    }

    fn named_property<'k>(&self, key: impl Into<FieldKey<'k>>) -> Result<Property<'_>> {
        let key = key.into();
        let (field, slot) = self
            .resolve(key)
            .ok_or_else(|| unknown_field(self.fhir_type(), key))?;
        Ok(Property {
            field,
            values: slot.values(),
        })
    }

    fn get_property<'k>(&self, key: impl Into<FieldKey<'k>>) -> Result<Values<'_>> {
        let key = key.into();
        let (_, slot) = self
            .resolve(key)
            .ok_or_else(|| unknown_field(self.fhir_type(), key))?;
        Ok(slot.values())
    }

    fn has_property<'k>(&self, key: impl Into<FieldKey<'k>>) -> Result<bool> {
        let key = key.into();
        let (_, slot) = self
            .resolve(key)
            .ok_or_else(|| unknown_field(self.fhir_type(), key))?;
        Ok(!slot.is_vacant())
    }

    fn count_present<'k>(&self, key: impl Into<FieldKey<'k>>) -> Result<usize> {
        let key = key.into();
        let (_, slot) = self
            .resolve(key)
            .ok_or_else(|| unknown_field(self.fhir_type(), key))?;
        Ok(slot.present_count())
    }

    fn set_property<'k>(
        &mut self,
        key: impl Into<FieldKey<'k>>,
        value: Box<dyn Base>,
        config: &ModelConfig,
    ) -> Result<()> {
        let key = key.into();
        let type_name = self.fhir_type();
        let (field, slot) = self
            .resolve_mut(key)
            .ok_or_else(|| unknown_field(type_name, key))?;
        slot.assign(field, value, config)
    }

    fn make_property<'k>(
        &mut self,
        key: impl Into<FieldKey<'k>>,
        config: &ModelConfig,
    ) -> Result<&mut dyn Base> {
        let key = key.into();
        let type_name = self.fhir_type();
        let (field, slot) = self
            .resolve_mut(key)
            .ok_or_else(|| unknown_field(type_name, key))?;
        slot.make(field, config)
    }

    fn add_child<'k>(&mut self, key: impl Into<FieldKey<'k>>) -> Result<&mut dyn Base> {
        let key = key.into();
        let type_name = self.fhir_type();
        let (field, slot) = self
            .resolve_mut(key)
            .ok_or_else(|| unknown_field(type_name, key))?;
        slot.add(field)
    }

    fn get_or_create<'k>(
        &mut self,
        key: impl Into<FieldKey<'k>>,
        config: &ModelConfig,
    ) -> Result<Option<&mut dyn Base>> {
        let key = key.into();
        let type_name = self.fhir_type();
        let (field, slot) = self
            .resolve_mut(key)
            .ok_or_else(|| unknown_field(type_name, key))?;
        slot.materialize(field, config)
    }

    fn types_for_property<'k>(
        &self,
        key: impl Into<FieldKey<'k>>,
    ) -> Result<&'static [&'static str]> {
        let key = key.into();
        self.field(key)
            .map(|field| field.types)
            .ok_or_else(|| unknown_field(self.fhir_type(), key))
    }
}

fn unknown_field(type_name: &str, key: FieldKey<'_>) -> Error {
    Error::UnknownField {
        type_name: type_name.to_string(),
        key: key.to_string(),
    }
}

pub(crate) fn node_is_empty(node: &dyn Node) -> bool {
    let own_empty = (0..node.schema().fields.len())
        .all(|index| node.slot(index).map_or(true, |slot| slot.is_vacant()));
    own_empty && node.base().map_or(true, |base| base.is_empty())
}

pub(crate) fn node_equals_deep(node: &dyn Node, other: &dyn Base) -> bool {
    other
        .as_node()
        .is_some_and(|other| nodes_equal_deep(node, other))
}

pub(crate) fn node_equals_shallow(node: &dyn Node, other: &dyn Base) -> bool {
    other
        .as_node()
        .is_some_and(|other| nodes_equal_shallow(node, other))
}

fn nodes_equal_deep(left: &dyn Node, right: &dyn Node) -> bool {
    let schema = left.schema();
    if schema.type_name != right.schema().type_name {
        return false;
    }
    let fields_equal = schema.fields.iter().enumerate().all(|(index, field)| {
        match (left.slot(index), right.slot(index)) {
            (Some(l), Some(r)) => values_equal_deep(field, &l.values(), &r.values()),
            (None, None) => true,
            _ => false,
        }
    });
    fields_equal && bases_equal(left.base(), right.base(), nodes_equal_deep)
}

fn nodes_equal_shallow(left: &dyn Node, right: &dyn Node) -> bool {
    let schema = left.schema();
    if schema.type_name != right.schema().type_name {
        return false;
    }
    let fields_equal = schema
        .fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.kind.is_primitive() && !field.is_repeated())
        .all(|(index, _)| {
            let l = left.slot(index).and_then(|slot| first_text(&slot.values()));
            let r = right.slot(index).and_then(|slot| first_text(&slot.values()));
            l == r
        });
    fields_equal && bases_equal(left.base(), right.base(), nodes_equal_shallow)
}

fn bases_equal(
    left: Option<&dyn Node>,
    right: Option<&dyn Node>,
    compare: fn(&dyn Node, &dyn Node) -> bool,
) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => compare(l, r),
        (None, None) => true,
        _ => false,
    }
}

/// Singular fields treat an absent value and an empty value as equal;
/// repeated fields compare element by element, in order.
fn values_equal_deep(field: &FieldDescriptor, left: &[&dyn Base], right: &[&dyn Base]) -> bool {
    if !field.is_repeated() {
        let left_blank = left.iter().all(|value| value.is_empty());
        let right_blank = right.iter().all(|value| value.is_empty());
        if left_blank && right_blank {
            return true;
        }
    }
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(l, r)| l.equals_deep(*r))
}

fn first_text(values: &[&dyn Base]) -> Option<String> {
    values
        .first()
        .and_then(|value| value.primitive_value())
        .filter(|text| !text.is_empty())
}

/// Implements [`Base`], [`Node`] and [`Element`] for a composite whose slots
/// are listed in schema order.
macro_rules! impl_node {
    ($ty:ty, $schema:ident, [$($field:ident),* $(,)?] $(, base = $base:ident)?) => {
        impl $crate::element::Base for $ty {
            fn fhir_type(&self) -> &'static str {
                $schema.type_name
            }

            fn is_empty(&self) -> bool {
                $crate::element::node_is_empty(self)
            }

            fn equals_deep(&self, other: &dyn $crate::element::Base) -> bool {
                $crate::element::node_equals_deep(self, other)
            }

            fn equals_shallow(&self, other: &dyn $crate::element::Base) -> bool {
                $crate::element::node_equals_shallow(self, other)
            }

            fn clone_base(&self) -> Box<dyn $crate::element::Base> {
                Box::new(self.clone())
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }

            fn into_any(self: Box<Self>) -> Box<dyn std::any::Any> {
                self
            }

            fn as_node(&self) -> Option<&dyn $crate::element::Node> {
                Some(self as &dyn $crate::element::Node)
            }

            fn as_node_mut(&mut self) -> Option<&mut dyn $crate::element::Node> {
                Some(self as &mut dyn $crate::element::Node)
            }
        }

        impl $crate::element::Node for $ty {
            fn schema(&self) -> &'static $crate::element::Schema {
                &$schema
            }

            fn as_base(&self) -> &dyn $crate::element::Base {
                self
            }

            fn slot(&self, index: usize) -> Option<&dyn $crate::element::Slot> {
                let slots: &[&dyn $crate::element::Slot] =
                    &[$(&self.$field as &dyn $crate::element::Slot),*];
                slots.get(index).copied()
            }

            fn slot_mut(&mut self, index: usize) -> Option<&mut dyn $crate::element::Slot> {
                [$(&mut self.$field as &mut dyn $crate::element::Slot),*]
                    .into_iter()
                    .nth(index)
            }

            $(
                fn base(&self) -> Option<&dyn $crate::element::Node> {
                    Some(&self.$base as &dyn $crate::element::Node)
                }

                fn base_mut(&mut self) -> Option<&mut dyn $crate::element::Node> {
                    Some(&mut self.$base as &mut dyn $crate::element::Node)
                }
            )?
        }

        impl $crate::element::Element for $ty {}
    };
}

pub(crate) use impl_node;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ElementBase, ResourceBase};
    use crate::resources::InventoryItemName;

    #[test]
    fn test_resolve_mut_without_supertype() {
        let mut element = ElementBase::default();
        assert!(element.resolve_mut("language".into()).is_none());
        assert!(element.resolve_mut("id".into()).is_some());

        let mut resource = ResourceBase::default();
        assert!(resource.resolve_mut("name".into()).is_none());
    }

    #[test]
    fn test_resolve_mut_falls_through_to_supertype() {
        let mut name = InventoryItemName::default();
        let (field, _) = name.resolve_mut("id".into()).expect("Element.id");
        assert_eq!(field.path, "Element.id");
        let (field, _) = name.resolve_mut("name".into()).expect("own field");
        assert_eq!(field.path, "InventoryItem.name.name");
        assert!(name.resolve_mut("language".into()).is_none());
    }
}
