//! Struct instances: an owned byte buffer viewed through a descriptor.

use std::{fmt, sync::Arc};

use crate::{
    descriptor::StructDescriptor,
    errors::{Error, Result},
    value::Value,
    variant::Variant,
};

/// One struct in one variant.
///
/// Field writes go straight into the buffer, so [`StructInstance::save`] is a
/// plain copy. Cloning copies the buffer; clones never share storage.
#[derive(Debug, Clone)]
pub struct StructInstance<V: Variant> {
    descriptor: Arc<StructDescriptor<V>>,
    variant: V,
    data: Vec<u8>,
}

impl<V: Variant> StructInstance<V> {
    /// A zero-filled instance with every declared default applied.
    pub fn new(descriptor: Arc<StructDescriptor<V>>, variant: V) -> Result<Self> {
        let length = descriptor.length(variant)?;
        let mut instance = Self {
            descriptor,
            variant,
            data: vec![0; length],
        };

        let descriptor = Arc::clone(&instance.descriptor);
        for field in descriptor.fields() {
            if let (Some(default), Some(_)) = (field.default_value(), field.layout(variant)) {
                instance.set(field.name(), default.clone())?;
            }
        }

        Ok(instance)
    }

    /// [`StructInstance::new`] followed by a `set` per pair.
    pub fn with_values<S, T>(
        descriptor: Arc<StructDescriptor<V>>,
        variant: V,
        values: impl IntoIterator<Item = (S, T)>,
    ) -> Result<Self>
    where
        S: AsRef<str>,
        T: Into<Value>,
    {
        let mut instance = Self::new(descriptor, variant)?;
        for (name, value) in values {
            instance.set(name.as_ref(), value)?;
        }

        Ok(instance)
    }

    /// Wraps a copy of `bytes`. Fields are decoded on access, so a field
    /// that cannot be decoded only fails when it is read.
    pub fn load(descriptor: Arc<StructDescriptor<V>>, variant: V, bytes: &[u8]) -> Result<Self> {
        let expected = descriptor.length(variant)?;
        if bytes.len() != expected {
            return Err(Error::LengthMismatch {
                structure: descriptor.name().to_owned(),
                variant: variant.name(),
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            descriptor,
            variant,
            data: bytes.to_vec(),
        })
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        let (_, layout) = self.descriptor.resolve(self.variant, name)?;
        layout
            .load(self.variant, &self.data)
            .map_err(|e| e.in_field(name))
    }

    /// Writes `value` into the buffer. On failure the buffer is unchanged.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let (_, layout) = self.descriptor.resolve(self.variant, name)?;
        layout
            .store(self.variant, &mut self.data, value.into())
            .map_err(|e| e.in_field(name))
    }

    /// A copy of the raw buffer.
    pub fn save(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn variant(&self) -> V {
        self.variant
    }

    pub fn descriptor(&self) -> &Arc<StructDescriptor<V>> {
        &self.descriptor
    }

    /// Every field available in this variant with its current value, in
    /// declaration order.
    pub fn values(&self) -> Result<Vec<(&str, Value)>> {
        self.descriptor
            .fields_for(self.variant)
            .map(|(name, _)| Ok((name, self.get(name)?)))
            .collect()
    }

    /// What `name` holds in a fresh instance: the declared default, or the
    /// value decoded from zeroed bytes.
    fn default_of(&self, name: &str) -> Option<Value> {
        let (field, layout) = self.descriptor.resolve(self.variant, name).ok()?;
        match field.default_value() {
            Some(default) => Some(default.clone()),
            None => layout.load(self.variant, &vec![0; self.data.len()]).ok(),
        }
    }
}

impl<V: Variant> PartialEq for StructInstance<V> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.descriptor, &other.descriptor)
            && self.variant == other.variant
            && self.data == other.data
    }
}

/// `<Name field=value ...>`, listing only fields that differ from their default.
impl<V: Variant> fmt::Display for StructInstance<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.descriptor.name())?;

        for field in self.descriptor.fields() {
            if field.is_alternate() || field.layout(self.variant).is_none() {
                continue;
            }

            match self.get(field.name()) {
                Ok(value) if Some(&value) == self.default_of(field.name()).as_ref() => {}
                Ok(value) => write!(f, " {}={value}", field.name())?,
                Err(_) => write!(f, " {}=<invalid>", field.name())?,
            }
        }

        f.write_str(">")
    }
}
