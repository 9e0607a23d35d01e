//! JSON-deserializable API definitions.
//!
//! These types describe structs and enums as they appear in a versioned
//! definition file. They carry strings and numbers only; see
//! [`crate::schema::VersionedApi`] for turning them into descriptors.
//!
//! ```json
//! {
//!   "default_endianness": "big",
//!   "enums": {
//!     "Transition": { "DEFAULT": 0, "FADE": { "value": 1, "semantic_value": 0.5 } }
//!   },
//!   "structs": {
//!     "Entrance": {
//!       "_length": { "default": 20, "nsmbu": 24 },
//!       "_terminator": "ffff",
//!       "x": "u16 @ 0",
//!       "transition": ["u8 @ 0x13", "enum Transition"],
//!       "id": { "def": "u8 @ 8", "default": 1 }
//!     }
//!   }
//! }
//! ```

use std::{fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};

use crate::variant::Endianness;

/// A JSON object kept in document order.
///
/// Declaration order matters for struct fields and enum members, and
/// `serde_json` maps are sorted by key unless its `preserve_order` feature
/// is enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct Entries<T>(pub Vec<(String, T)>);

impl<T> Entries<T> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for Entries<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> IntoIterator for Entries<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Entries<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
            type Value = Entries<T>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

/// Top-level definition file.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiDef {
    /// Byte order pinned on numeric fields without an explicit `le`/`be`.
    /// Without it, such fields follow the variant's byte order.
    #[serde(default)]
    pub default_endianness: Option<Endianness>,
    /// Enum name to members, in declaration order.
    #[serde(default)]
    pub enums: Entries<Entries<EnumMemberDef>>,
    #[serde(default)]
    pub structs: Entries<StructDef>,
}

/// A value that is either the same everywhere, or keyed by variant name,
/// group name, or `"default"`.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PerVariantDef<T> {
    Uniform(T),
    Split(Entries<T>),
}

/// One enum member: a raw value, optionally with a semantic value.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum EnumMemberDef {
    Detailed {
        #[serde(alias = "struct_value")]
        value: PerVariantDef<i64>,
        #[serde(default)]
        semantic_value: Option<f64>,
    },
    Value(PerVariantDef<i64>),
}

/// A field layout: `"u16 @ 0"`, or `["u16 @ 0", ">> 12"]` with transforms.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum LayoutDef {
    Spec(String),
    Chain(Vec<String>),
}

/// Everything that can appear as the value of a field key.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum FieldDef {
    Layout(LayoutDef),
    Detailed(DetailedFieldDef),
    PerVariant(Entries<LayoutDef>),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DetailedFieldDef {
    pub def: PerVariantDef<LayoutDef>,
    /// Value written into fresh instances.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    /// Second view over bytes another field covers.
    #[serde(default)]
    pub alternate: bool,
}

/// One struct. Keys starting with `_` are reserved; every other key is a field.
#[derive(Debug, Deserialize, Clone)]
pub struct StructDef {
    #[serde(rename = "_length")]
    pub length: PerVariantDef<usize>,
    /// Hex string such as `"ffffffff"`.
    #[serde(rename = "_terminator", default)]
    pub terminator: Option<PerVariantDef<String>>,
    #[serde(flatten)]
    pub entries: Entries<serde_json::Value>,
}

impl StructDef {
    /// Field definitions in declaration order, skipping reserved keys.
    pub fn fields(&self) -> Result<Vec<(&str, FieldDef)>, serde_json::Error> {
        self.entries
            .iter()
            .filter(|(key, _)| !key.starts_with('_'))
            .map(|(key, value)| Ok((key, FieldDef::deserialize(value)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_document_order() {
        let entries: Entries<u8> = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = entries.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_per_variant_def_forms() {
        let uniform: PerVariantDef<usize> = serde_json::from_str("12").unwrap();
        assert_eq!(uniform, PerVariantDef::Uniform(12));

        let split: PerVariantDef<usize> = serde_json::from_str(r#"{"default": 12, "wiiu": 16}"#).unwrap();
        assert_eq!(
            split,
            PerVariantDef::Split(Entries(vec![("default".to_string(), 12), ("wiiu".to_string(), 16)]))
        );
    }

    #[test]
    fn test_field_def_forms() {
        let def: FieldDef = serde_json::from_str(r#""u8 @ 0""#).unwrap();
        assert_eq!(def, FieldDef::Layout(LayoutDef::Spec("u8 @ 0".to_string())));

        let def: FieldDef = serde_json::from_str(r#"["u16 @ 0", ">> 12"]"#).unwrap();
        assert!(matches!(def, FieldDef::Layout(LayoutDef::Chain(ref chain)) if chain.len() == 2));

        let def: FieldDef = serde_json::from_str(r#"{"def": "u8 @ 4", "default": 1}"#).unwrap();
        assert!(matches!(def, FieldDef::Detailed(DetailedFieldDef { alternate: false, .. })));

        let def: FieldDef = serde_json::from_str(r#"{"nsmbw": "u8 @ 0xc"}"#).unwrap();
        assert!(matches!(def, FieldDef::PerVariant(ref entries) if entries.len() == 1));
    }

    #[test]
    fn test_enum_member_forms() {
        let member: EnumMemberDef = serde_json::from_str("3").unwrap();
        assert_eq!(member, EnumMemberDef::Value(PerVariantDef::Uniform(3)));

        let member: EnumMemberDef =
            serde_json::from_str(r#"{"struct_value": 2, "semantic_value": 0.25}"#).unwrap();
        assert_eq!(
            member,
            EnumMemberDef::Detailed {
                value: PerVariantDef::Uniform(2),
                semantic_value: Some(0.25),
            }
        );
    }

    #[test]
    fn test_struct_def_skips_reserved_keys() {
        let def: StructDef = serde_json::from_str(
            r#"{"_length": 4, "_comment": "ignored", "b": "u16 @ 2", "a": "u16 @ 0"}"#,
        )
        .unwrap();

        let names: Vec<_> = def.fields().unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(def.length, PerVariantDef::Uniform(4));
        assert!(def.terminator.is_none());
    }
}
