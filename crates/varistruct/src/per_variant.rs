//! Per-variant value maps: a default plus explicit per-variant overrides.

use std::collections::BTreeMap;

use crate::variant::Variant;

/// A value that may differ from one variant to the next.
///
/// Lookups return the explicit value for the variant if there is one, then
/// the map-wide default, then `None`. Absence is always a missing key, never a
/// stored null.
#[derive(Debug, Clone, PartialEq)]
pub struct PerVariant<V: Variant, T> {
    default: Option<T>,
    values: BTreeMap<V, T>,
}

impl<V: Variant, T> PerVariant<V, T> {
    /// A map with no values at all: every lookup is absent.
    pub fn empty() -> Self {
        Self {
            default: None,
            values: BTreeMap::new(),
        }
    }

    /// The same value for every variant.
    pub fn uniform(value: T) -> Self {
        Self {
            default: Some(value),
            values: BTreeMap::new(),
        }
    }

    pub fn builder() -> PerVariantBuilder<V, T> {
        PerVariantBuilder::default()
    }

    /// Resolves the value for `variant`. Never fails.
    pub fn get(&self, variant: V) -> Option<&T> {
        self.values.get(&variant).or(self.default.as_ref())
    }

    pub fn is_defined_for(&self, variant: V) -> bool {
        self.get(variant).is_some()
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// Explicit per-variant entries, in variant order. The default is not included.
    pub fn explicit(&self) -> impl Iterator<Item = (V, &T)> {
        self.values.iter().map(|(variant, value)| (*variant, value))
    }

    /// Converts every stored value, keeping the same shape.
    pub fn try_map<U, E>(self, mut f: impl FnMut(T) -> Result<U, E>) -> Result<PerVariant<V, U>, E> {
        let default = self.default.map(&mut f).transpose()?;
        let mut values = BTreeMap::new();
        for (variant, value) in self.values {
            values.insert(variant, f(value)?);
        }

        Ok(PerVariant { default, values })
    }
}

impl<V: Variant, T> Default for PerVariant<V, T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<V: Variant, T> From<T> for PerVariant<V, T> {
    fn from(value: T) -> Self {
        Self::uniform(value)
    }
}

/// Collects default, group, and per-variant assignments for a [`PerVariant`].
///
/// Source order does not matter: group expansions are applied first and
/// individual variant assignments override them.
#[derive(Debug, Clone)]
pub struct PerVariantBuilder<V: Variant, T> {
    default: Option<T>,
    groups: Vec<(V::Group, T)>,
    variants: Vec<(V, T)>,
}

impl<V: Variant, T> Default for PerVariantBuilder<V, T> {
    fn default() -> Self {
        Self {
            default: None,
            groups: Vec::new(),
            variants: Vec::new(),
        }
    }
}

impl<V: Variant, T: Clone> PerVariantBuilder<V, T> {
    /// Value used by every variant without an explicit assignment.
    pub fn default_value(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with(mut self, variant: V, value: T) -> Self {
        self.variants.push((variant, value));
        self
    }

    /// Assigns `value` to every variant that is a member of `group`.
    pub fn with_group(mut self, group: V::Group, value: T) -> Self {
        self.groups.push((group, value));
        self
    }

    pub fn build(self) -> PerVariant<V, T> {
        let mut values = BTreeMap::new();

        for (group, value) in self.groups {
            for variant in V::all().iter().copied() {
                if variant.is_member_of(group) {
                    values.insert(variant, value.clone());
                }
            }
        }

        for (variant, value) in self.variants {
            values.insert(variant, value);
        }

        PerVariant {
            default: self.default,
            values,
        }
    }
}
