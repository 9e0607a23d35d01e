//! Enumerations whose integer representation differs per variant.

use crate::{
    errors::{Error, Result},
    per_variant::PerVariant,
    variant::Variant,
};

/// One named member of a [`VariantEnum`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember<V: Variant> {
    name: String,
    values: PerVariant<V, i128>,
    semantic: Option<f64>,
}

impl<V: Variant> EnumMember<V> {
    pub fn new(name: impl Into<String>, values: impl Into<PerVariant<V, i128>>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
            semantic: None,
        }
    }

    /// Attaches an immutable semantic value, such as the scroll rate a raw code stands for.
    pub fn with_semantic(mut self, semantic: f64) -> Self {
        self.semantic = Some(semantic);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw representation in `variant`, if the member exists there.
    pub fn value_in(&self, variant: V) -> Option<i128> {
        self.values.get(variant).copied()
    }

    pub fn semantic(&self) -> Option<f64> {
        self.semantic
    }
}

/// A closed set of members, each with a per-variant raw value.
///
/// Members may be absent from some variants. Loading an unrecognized raw value
/// is always an error: there is no catch-all member.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantEnum<V: Variant> {
    name: String,
    members: Vec<EnumMember<V>>,
}

impl<V: Variant> VariantEnum<V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Adds a member. Declaration order decides which member wins when two
    /// share a raw value in the same variant.
    pub fn member(self, name: impl Into<String>, values: impl Into<PerVariant<V, i128>>) -> Self {
        self.with_member(EnumMember::new(name, values))
    }

    pub fn with_member(mut self, member: EnumMember<V>) -> Self {
        self.members.push(member);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[EnumMember<V>] {
        &self.members
    }

    pub fn get(&self, name: &str) -> Option<&EnumMember<V>> {
        self.members.iter().find(|member| member.name == name)
    }

    /// Finds the first member whose representation in `variant` is `raw`.
    pub fn load(&self, variant: V, raw: i128) -> Result<&EnumMember<V>> {
        self.members
            .iter()
            .find(|member| member.value_in(variant) == Some(raw))
            .ok_or_else(|| Error::UnknownEnumValue {
                enumeration: self.name.clone(),
                variant: variant.name(),
                value: raw,
            })
    }

    /// Raw representation of the member called `name` in `variant`.
    pub fn save(&self, variant: V, name: &str) -> Result<i128> {
        let member = self
            .get(name)
            .ok_or_else(|| Error::invalid_value(format!("a member of {}", self.name), name))?;

        member
            .value_in(variant)
            .ok_or_else(|| Error::NoRepresentationForVariant {
                enumeration: self.name.clone(),
                member: member.name.clone(),
                variant: variant.name(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::testing::{Family, Release};

    fn transition() -> VariantEnum<Release> {
        VariantEnum::new("Transition")
            .member("DEFAULT", 0)
            .member(
                "FADE",
                PerVariant::builder().with_group(Family::Successor, 1).build(),
            )
            .member(
                "WAVES",
                PerVariant::builder()
                    .with(Release::A, 1)
                    .with_group(Family::Successor, 6)
                    .build(),
            )
    }

    #[test]
    fn test_load_differs_per_variant() {
        let e = transition();
        assert_eq!(e.load(Release::A, 1).unwrap().name(), "WAVES");
        assert_eq!(e.load(Release::B, 1).unwrap().name(), "FADE");
        assert_eq!(e.load(Release::C, 6).unwrap().name(), "WAVES");
    }

    #[test]
    fn test_load_unknown_value() {
        assert_eq!(
            transition().load(Release::A, 6).unwrap_err(),
            Error::UnknownEnumValue {
                enumeration: "Transition".to_string(),
                variant: "A",
                value: 6,
            }
        );
    }

    #[test]
    fn test_save_without_representation() {
        assert_eq!(
            transition().save(Release::A, "FADE").unwrap_err(),
            Error::NoRepresentationForVariant {
                enumeration: "Transition".to_string(),
                member: "FADE".to_string(),
                variant: "A",
            }
        );
    }

    #[test]
    fn test_save_unknown_member() {
        assert!(matches!(
            transition().save(Release::B, "SPIN"),
            Err(Error::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_round_trip_every_member() {
        let e = transition();
        for variant in Release::all().iter().copied() {
            for member in e.members() {
                if let Ok(raw) = e.save(variant, member.name()) {
                    assert_eq!(e.load(variant, raw).unwrap().name(), member.name());
                }
            }
        }
    }

    #[test]
    fn test_semantic_value() {
        let rate = EnumMember::<Release>::new("RATE_0_25", 2).with_semantic(0.25);
        assert_eq!(rate.semantic(), Some(0.25));
        assert_eq!(rate.value_in(Release::C), Some(2));
    }
}
