//! Struct descriptors: the immutable, variant-independent declaration of a
//! fixed-length struct.

use std::{collections::HashMap, sync::Arc};

use crate::{
    errors::{Error, Result},
    field::ConcreteField,
    per_variant::PerVariant,
    value::Value,
    variant::Variant,
};

/// A named field whose layout may differ, or be missing, per variant.
#[derive(Debug, Clone)]
pub struct LogicalField<V: Variant> {
    name: String,
    layouts: PerVariant<V, ConcreteField<V>>,
    default: Option<Value>,
    alternate: bool,
}

impl<V: Variant> LogicalField<V> {
    pub fn new(name: impl Into<String>, layouts: impl Into<PerVariant<V, ConcreteField<V>>>) -> Self {
        Self {
            name: name.into(),
            layouts: layouts.into(),
            default: None,
            alternate: false,
        }
    }

    /// Value written into freshly constructed instances.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Marks the field as a second view over bytes another field already
    /// covers. Alternate fields stay readable but are left out of `Display`.
    pub fn alternate(mut self) -> Self {
        self.alternate = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layouts(&self) -> &PerVariant<V, ConcreteField<V>> {
        &self.layouts
    }

    pub fn layout(&self, variant: V) -> Option<&ConcreteField<V>> {
        self.layouts.get(variant)
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_alternate(&self) -> bool {
        self.alternate
    }
}

/// Declaration of one struct: its per-variant length, optional block
/// terminator, and its logical fields in declaration order.
///
/// Geometry is checked lazily. A field that does not fit inside the struct
/// only fails when it is accessed, see [`StructDescriptor::validate`] for
/// the eager check.
#[derive(Debug)]
pub struct StructDescriptor<V: Variant> {
    name: String,
    fields: Vec<LogicalField<V>>,
    index: HashMap<String, usize>,
    length: PerVariant<V, usize>,
    terminator: PerVariant<V, Vec<u8>>,
}

impl<V: Variant> StructDescriptor<V> {
    pub fn builder(name: impl Into<String>) -> DescriptorBuilder<V> {
        DescriptorBuilder {
            name: name.into(),
            length: PerVariant::empty(),
            terminator: PerVariant::uniform(Vec::new()),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size in bytes of one struct in `variant`.
    pub fn length(&self, variant: V) -> Result<usize> {
        self.length
            .get(variant)
            .copied()
            .ok_or_else(|| self.unsupported("length", variant))
    }

    /// Byte sequence that ends an array of this struct in `variant`. Empty
    /// unless declared.
    pub fn block_terminator(&self, variant: V) -> Result<&[u8]> {
        self.terminator
            .get(variant)
            .map(Vec::as_slice)
            .ok_or_else(|| self.unsupported("terminator", variant))
    }

    /// Whether the struct exists at all in `variant`.
    pub fn supports(&self, variant: V) -> bool {
        self.length.is_defined_for(variant)
    }

    pub fn fields(&self) -> &[LogicalField<V>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&LogicalField<V>> {
        self.index.get(name).map(|i| &self.fields[*i])
    }

    /// Fields with a layout in `variant`, in declaration order.
    pub fn fields_for(&self, variant: V) -> impl Iterator<Item = (&str, &ConcreteField<V>)> {
        self.fields
            .iter()
            .filter_map(move |field| Some((field.name(), field.layout(variant)?)))
    }

    /// Looks up the concrete layout of `name` in `variant`, checking that it
    /// fits inside the struct.
    pub fn resolve(&self, variant: V, name: &str) -> Result<(&LogicalField<V>, &ConcreteField<V>)> {
        let field = self.field(name).ok_or_else(|| Error::UnknownField {
            structure: self.name.clone(),
            field: name.to_owned(),
        })?;

        let layout = field
            .layout(variant)
            .ok_or_else(|| Error::FieldNotAvailableInVariant {
                structure: self.name.clone(),
                field: name.to_owned(),
                variant: variant.name(),
            })?;

        self.check_bounds(variant, name, layout)?;
        Ok((field, layout))
    }

    /// Checks every field available in `variant` against the struct length.
    pub fn validate(&self, variant: V) -> Result<()> {
        for (name, layout) in self.fields_for(variant) {
            self.check_bounds(variant, name, layout)?;
        }

        Ok(())
    }

    fn check_bounds(&self, variant: V, name: &str, layout: &ConcreteField<V>) -> Result<()> {
        let length = self.length(variant)?;
        if layout.end() > length {
            return Err(Error::FieldOutOfRange {
                structure: self.name.clone(),
                field: name.to_owned(),
                variant: variant.name(),
                end: layout.end(),
                length,
            });
        }

        Ok(())
    }

    fn unsupported(&self, property: &'static str, variant: V) -> Error {
        Error::UnsupportedVariant {
            structure: self.name.clone(),
            property,
            variant: variant.name(),
        }
    }
}

/// Collects a struct declaration. See [`StructDescriptor::builder`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder<V: Variant> {
    name: String,
    length: PerVariant<V, usize>,
    terminator: PerVariant<V, Vec<u8>>,
    fields: Vec<LogicalField<V>>,
}

impl<V: Variant> DescriptorBuilder<V> {
    pub fn length(mut self, length: impl Into<PerVariant<V, usize>>) -> Self {
        self.length = length.into();
        self
    }

    pub fn terminator(mut self, terminator: impl Into<PerVariant<V, Vec<u8>>>) -> Self {
        self.terminator = terminator.into();
        self
    }

    pub fn field(
        self,
        name: impl Into<String>,
        layouts: impl Into<PerVariant<V, ConcreteField<V>>>,
    ) -> Self {
        self.logical_field(LogicalField::new(name, layouts))
    }

    pub fn field_with_default(
        self,
        name: impl Into<String>,
        layouts: impl Into<PerVariant<V, ConcreteField<V>>>,
        default: impl Into<Value>,
    ) -> Self {
        self.logical_field(LogicalField::new(name, layouts).with_default(default))
    }

    pub fn logical_field(mut self, field: LogicalField<V>) -> Self {
        self.fields.push(field);
        self
    }

    /// Finishes the declaration. Fails if a field name is declared twice.
    pub fn build(self) -> Result<Arc<StructDescriptor<V>>> {
        let mut index = HashMap::with_capacity(self.fields.len());

        for (i, field) in self.fields.iter().enumerate() {
            if index.insert(field.name.clone(), i).is_some() {
                return Err(Error::DuplicateField {
                    structure: self.name,
                    field: field.name.clone(),
                });
            }
        }

        Ok(Arc::new(StructDescriptor {
            name: self.name,
            fields: self.fields,
            index,
            length: self.length,
            terminator: self.terminator,
        }))
    }
}
