//! Descriptors and enums built at runtime from versioned JSON definitions.
//!
//! A definition directory holds `api_versions_whitelist.txt` (one version
//! per line) and one `api_{version}.json` per listed version. Versions that
//! are not whitelisted are rejected before any file is read.

use std::{collections::HashMap, fs, path::Path, sync::Arc};

use thiserror::Error;
use tracing::debug;

use crate::{
    descriptor::{LogicalField, StructDescriptor},
    enumeration::{EnumMember, VariantEnum},
    errors::Error,
    field::{ConcreteField, NumericKind, TextEncoding},
    per_variant::PerVariant,
    serde::{ApiDef, DetailedFieldDef, EnumMemberDef, FieldDef, LayoutDef, PerVariantDef, StructDef},
    transform::Transform,
    value::Value,
    variant::{Endianness, Variant, VariantGroup},
};

pub const WHITELIST_FILE: &str = "api_versions_whitelist.txt";

/// Problems with a definition file, as opposed to with the data it describes.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unrecognized API version \"{0}\"")]
    UnknownVersion(String),

    #[error("invalid field spec \"{spec}\": {reason}")]
    InvalidFieldSpec { spec: String, reason: String },

    #[error("unknown transform \"{0}\"")]
    UnknownTransform(String),

    #[error("unknown enum \"{0}\"")]
    UnknownEnum(String),

    #[error("\"{0}\" is neither a variant, a variant group, nor \"default\"")]
    UnknownVariantKey(String),

    #[error("invalid terminator \"{0}\", expected hex bytes")]
    InvalidTerminator(String),

    #[error("invalid default for field \"{field}\": {value}")]
    InvalidDefault { field: String, value: String },

    #[error(transparent)]
    Struct(#[from] Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

type Result<T, E = SchemaError> = std::result::Result<T, E>;

/// Every struct and enum of one API version.
#[derive(Debug, Clone)]
pub struct VersionedApi<V: Variant> {
    version: String,
    enums: HashMap<String, Arc<VariantEnum<V>>>,
    structs: HashMap<String, Arc<StructDescriptor<V>>>,
    struct_order: Vec<String>,
}

impl<V: Variant> VersionedApi<V> {
    /// Reads `version` from a definition directory.
    pub fn load(dir: impl AsRef<Path>, version: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let whitelist = load_whitelist(dir)?;
        if !whitelist.iter().any(|allowed| allowed == version) {
            return Err(SchemaError::UnknownVersion(version.to_owned()));
        }

        let json = fs::read_to_string(dir.join(format!("api_{version}.json")))?;
        Self::from_json(version, &json)
    }

    pub fn from_json(version: &str, json: &str) -> Result<Self> {
        let def: ApiDef = serde_json::from_str(json)?;
        Self::from_def(version, def)
    }

    /// Builds every enum first, then every struct, so structs can refer to
    /// any enum regardless of declaration order.
    pub fn from_def(version: &str, def: ApiDef) -> Result<Self> {
        let mut enums = HashMap::with_capacity(def.enums.len());
        for (name, members) in def.enums {
            let mut enumeration = VariantEnum::new(name.clone());
            for (member, member_def) in members {
                enumeration = enumeration.with_member(enum_member(member, member_def)?);
            }
            enums.insert(name, Arc::new(enumeration));
        }

        let mut structs = HashMap::with_capacity(def.structs.len());
        let mut struct_order = Vec::with_capacity(def.structs.len());
        for (name, struct_def) in def.structs {
            let descriptor = build_struct(&name, &struct_def, &enums, def.default_endianness)?;
            structs.insert(name.clone(), descriptor);
            struct_order.push(name);
        }

        debug!(
            version,
            structs = structs.len(),
            enums = enums.len(),
            "loaded API definition"
        );

        Ok(Self {
            version: version.to_owned(),
            enums,
            structs,
            struct_order,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn structure(&self, name: &str) -> Option<&Arc<StructDescriptor<V>>> {
        self.structs.get(name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&Arc<VariantEnum<V>>> {
        self.enums.get(name)
    }

    /// Struct names in declaration order.
    pub fn struct_names(&self) -> impl Iterator<Item = &str> {
        self.struct_order.iter().map(String::as_str)
    }
}

/// Versions listed in `dir`'s whitelist file. Blank lines are ignored.
pub fn load_whitelist(dir: impl AsRef<Path>) -> Result<Vec<String>> {
    let text = fs::read_to_string(dir.as_ref().join(WHITELIST_FILE))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect())
}

fn enum_member<V: Variant>(name: String, def: EnumMemberDef) -> Result<EnumMember<V>> {
    let (values, semantic) = match def {
        EnumMemberDef::Detailed {
            value,
            semantic_value,
        } => (value, semantic_value),
        EnumMemberDef::Value(value) => (value, None),
    };

    let values: PerVariant<V, i128> = per_variant(values, |v| Ok(i128::from(v)))?;
    let member = EnumMember::new(name, values);
    Ok(match semantic {
        Some(semantic) => member.with_semantic(semantic),
        None => member,
    })
}

fn build_struct<V: Variant>(
    name: &str,
    def: &StructDef,
    enums: &HashMap<String, Arc<VariantEnum<V>>>,
    default_endianness: Option<Endianness>,
) -> Result<Arc<StructDescriptor<V>>> {
    let length: PerVariant<V, usize> = per_variant(def.length.clone(), Ok)?;
    let mut builder = StructDescriptor::builder(name).length(length);

    if let Some(terminator) = &def.terminator {
        let terminator: PerVariant<V, Vec<u8>> =
            per_variant(terminator.clone(), |hex| parse_terminator(&hex))?;
        builder = builder.terminator(terminator);
    }

    let layout = |layout_def: LayoutDef| parse_layout(&layout_def, enums, default_endianness);

    for (field_name, field_def) in def.fields()? {
        let field = match field_def {
            FieldDef::Layout(layout_def) => LogicalField::new(field_name, layout(layout_def)?),
            FieldDef::PerVariant(entries) => {
                let layouts: PerVariant<V, ConcreteField<V>> =
                    per_variant(PerVariantDef::Split(entries), layout)?;
                LogicalField::new(field_name, layouts)
            }
            FieldDef::Detailed(DetailedFieldDef {
                def: layout_defs,
                default,
                alternate,
            }) => {
                let layouts: PerVariant<V, ConcreteField<V>> = per_variant(layout_defs, layout)?;
                let mut field = LogicalField::new(field_name, layouts);
                if let Some(default) = default {
                    let value = default_value(field_name, &field, default)?;
                    field = field.with_default(value);
                }
                if alternate {
                    field = field.alternate();
                }
                field
            }
        };

        builder = builder.logical_field(field);
    }

    Ok(builder.build()?)
}

/// Resolves a per-variant definition. Group keys expand first and variant
/// keys override them, whatever their order in the file.
fn per_variant<V: Variant, T, U: Clone>(
    def: PerVariantDef<T>,
    mut convert: impl FnMut(T) -> Result<U>,
) -> Result<PerVariant<V, U>> {
    let entries = match def {
        PerVariantDef::Uniform(value) => return Ok(PerVariant::uniform(convert(value)?)),
        PerVariantDef::Split(entries) => entries,
    };

    let mut builder = PerVariant::builder();
    for (key, value) in entries {
        let value = convert(value)?;
        builder = if key == "default" {
            builder.default_value(value)
        } else if let Some(variant) = V::from_name(&key) {
            builder.with(variant, value)
        } else if let Some(group) = V::Group::from_name(&key) {
            builder.with_group(group, value)
        } else {
            return Err(SchemaError::UnknownVariantKey(key));
        };
    }

    Ok(builder.build())
}

fn parse_layout<V: Variant>(
    def: &LayoutDef,
    enums: &HashMap<String, Arc<VariantEnum<V>>>,
    default_endianness: Option<Endianness>,
) -> Result<ConcreteField<V>> {
    let (spec, transforms): (&str, &[String]) = match def {
        LayoutDef::Spec(spec) => (spec.as_str(), &[]),
        LayoutDef::Chain(chain) => match chain.split_first() {
            Some((spec, transforms)) => (spec.as_str(), transforms),
            None => return Err(invalid_spec("[]", "empty field definition")),
        },
    };

    transforms
        .iter()
        .try_fold(parse_spec(spec, default_endianness)?, |field, transform| {
            apply_transform(field, transform, enums)
        })
}

/// `[le|be] TYPE @ HEX`, `bytestring LEN @ HEX`, or `string LEN ENCODING @ HEX`.
fn parse_spec<V: Variant>(spec: &str, default_endianness: Option<Endianness>) -> Result<ConcreteField<V>> {
    let (layout, offset) = spec
        .split_once('@')
        .ok_or_else(|| invalid_spec(spec, "missing \"@ OFFSET\""))?;
    let offset = parse_hex(offset.trim()).ok_or_else(|| invalid_spec(spec, "offset is not hex"))?;

    let mut words: Vec<&str> = layout.split_whitespace().collect();
    let endianness = match words.first() {
        Some(&"le") => Some(Endianness::Little),
        Some(&"be") => Some(Endianness::Big),
        _ => None,
    };
    if endianness.is_some() {
        words.remove(0);
    }

    let length = |word: &&str| {
        parse_int(word)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| invalid_spec(spec, "length is not a number"))
    };

    match words.as_slice() {
        ["bytestring", len] => Ok(ConcreteField::bytes(offset, length(len)?)),
        ["string", len, encoding] => {
            let encoding = TextEncoding::from_name(encoding)
                .ok_or_else(|| invalid_spec(spec, "unknown text encoding"))?;
            Ok(ConcreteField::text(offset, length(len)?, encoding))
        }
        [kind] => {
            let kind = NumericKind::from_name(kind).ok_or_else(|| invalid_spec(spec, "unknown type"))?;
            let field = ConcreteField::numeric(kind, offset);
            Ok(match endianness.or(default_endianness) {
                Some(endianness) => field.with_endianness(endianness),
                None => field,
            })
        }
        _ => Err(invalid_spec(spec, "unrecognized layout")),
    }
}

/// `& MASK`, `<< N`, `>> N`, `bool`, `mask_bool BIT`, or `enum NAME`.
fn apply_transform<V: Variant>(
    field: ConcreteField<V>,
    text: &str,
    enums: &HashMap<String, Arc<VariantEnum<V>>>,
) -> Result<ConcreteField<V>> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let number = |word: &&str| parse_int(word).ok_or_else(|| invalid_spec(text, "argument is not a number"));
    let shift = |word: &&str| {
        number(word).and_then(|n| u32::try_from(n).map_err(|_| invalid_spec(text, "bad shift amount")))
    };

    match words.as_slice() {
        ["&", mask] => Ok(field.mask(i128::from(number(mask)?))),
        ["<<", n] => Ok(field.lshift(shift(n)?)),
        [">>", n] => Ok(field.rshift(shift(n)?)),
        ["bool"] => Ok(field.boolean()),
        ["mask_bool", bit] => match u64::try_from(number(bit)?) {
            Ok(bit) if bit.count_ones() == 1 => Ok(field.mask_bool(bit)),
            _ => Err(invalid_spec(text, "mask_bool needs a single-bit mask")),
        },
        ["enum", name] => enums
            .get(*name)
            .map(|e| field.enumeration(Arc::clone(e)))
            .ok_or_else(|| SchemaError::UnknownEnum((*name).to_owned())),
        _ => Err(SchemaError::UnknownTransform(text.to_owned())),
    }
}

fn parse_terminator(hex: &str) -> Result<Vec<u8>> {
    let digits: Vec<char> = hex.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Err(SchemaError::InvalidTerminator(hex.to_owned()));
    }

    digits
        .chunks(2)
        .map(|pair| {
            let byte: String = pair.iter().collect();
            u8::from_str_radix(&byte, 16).map_err(|_| SchemaError::InvalidTerminator(hex.to_owned()))
        })
        .collect()
}

/// Converts a JSON default into the value kind the field's layouts produce.
fn default_value<V: Variant>(name: &str, field: &LogicalField<V>, json: serde_json::Value) -> Result<Value> {
    let ends_in = |wanted: fn(&Transform<V>) -> bool| {
        field
            .layouts()
            .explicit()
            .map(|(_, layout)| layout)
            .chain(field.layouts().default_value())
            .any(|layout| layout.transforms().last().is_some_and(wanted))
    };
    let ends_in_enum = ends_in(|t| matches!(t, Transform::Enum(_)));
    let ends_in_bool = ends_in(|t| matches!(t, Transform::Bool));

    let invalid = |json: &serde_json::Value| SchemaError::InvalidDefault {
        field: name.to_owned(),
        value: json.to_string(),
    };

    match json {
        serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_json::Value::Number(ref n) => {
            if let Some(i) = n.as_i64() {
                Ok(if ends_in_bool { Value::Bool(i != 0) } else { Value::Int(i128::from(i)) })
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Int(i128::from(u)))
            } else {
                n.as_f64().map(Value::Float64).ok_or_else(|| invalid(&json))
            }
        }
        serde_json::Value::String(s) if ends_in_enum => Ok(Value::Enum(s)),
        serde_json::Value::String(s) => Ok(Value::Str(s)),
        serde_json::Value::Array(ref items) => items
            .iter()
            .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
            .collect::<Option<Vec<u8>>>()
            .map(Value::Bytes)
            .ok_or_else(|| invalid(&json)),
        other => Err(invalid(&other)),
    }
}

fn parse_hex(text: &str) -> Option<usize> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    usize::from_str_radix(digits, 16).ok()
}

/// Decimal, or hex/binary/octal with a `0x`/`0b`/`0o` prefix.
fn parse_int(text: &str) -> Option<i64> {
    let lower = text.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else {
        (lower.as_str(), 10)
    };

    i64::from_str_radix(digits, radix).ok()
}

fn invalid_spec(spec: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidFieldSpec {
        spec: spec.to_owned(),
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{field::FieldKind, variant::testing::Release};

    fn field(def: &str) -> Result<ConcreteField<Release>> {
        let def: LayoutDef = serde_json::from_str(def)?;
        parse_layout(&def, &HashMap::new(), None)
    }

    #[test]
    fn test_numeric_spec() {
        let f = field(r#""be s16 @ 0x0A""#).unwrap();
        assert_eq!(f.offset(), 10);
        assert_eq!(f.width(), 2);
        assert_eq!(f.endianness(Release::A), Endianness::Big);

        let f = field(r#""u32 @ 14""#).unwrap();
        assert_eq!(f.offset(), 0x14);
        assert_eq!(f.endianness(Release::B), Endianness::Big);
        assert_eq!(f.endianness(Release::A), Endianness::Little);
    }

    #[test]
    fn test_default_endianness_is_pinned() {
        let def = LayoutDef::Spec("u16 @ 0".to_string());
        let f: ConcreteField<Release> = parse_layout(&def, &HashMap::new(), Some(Endianness::Big)).unwrap();
        assert_eq!(f.endianness(Release::A), Endianness::Big);
    }

    #[test]
    fn test_byte_and_string_specs() {
        assert_eq!(field(r#""bytestring 0x6 @ 6""#).unwrap().end(), 12);

        let f = field(r#""string 32 utf-8 @ 0x10""#).unwrap();
        assert!(matches!(
            f.kind(),
            FieldKind::Text { length: 32, encoding: TextEncoding::Utf8 }
        ));
    }

    #[test]
    fn test_transform_chain() {
        let f = field(r#"["u8 @ 0", "mask_bool 0x20"]"#).unwrap();
        assert_eq!(f.bitmask(Release::A), 0x20);

        let f = field(r#"["u16 @ 0", "& 0xfff"]"#).unwrap();
        assert_eq!(f.bitmask(Release::A), 0xFFF);
    }

    #[test]
    fn test_bad_specs() {
        assert!(matches!(field(r#""u24 @ 0""#), Err(SchemaError::InvalidFieldSpec { .. })));
        assert!(matches!(field(r#""u8 0""#), Err(SchemaError::InvalidFieldSpec { .. })));
        assert!(matches!(field(r#"["u8 @ 0", "mask_bool 3"]"#), Err(SchemaError::InvalidFieldSpec { .. })));
        assert!(matches!(field(r#"["u8 @ 0", "spin"]"#), Err(SchemaError::UnknownTransform(_))));
        assert!(matches!(field(r#"["u8 @ 0", "enum Nope"]"#), Err(SchemaError::UnknownEnum(_))));
    }

    #[test]
    fn test_terminator_hex() {
        assert_eq!(parse_terminator("ffff").unwrap(), vec![0xFF, 0xFF]);
        assert_eq!(parse_terminator("FF FF FF FF").unwrap(), vec![0xFF; 4]);
        assert!(parse_terminator("fff").is_err());
        assert!(parse_terminator("zz").is_err());
    }

    #[test]
    fn test_parse_int_prefixes() {
        assert_eq!(parse_int("12"), Some(12));
        assert_eq!(parse_int("0x1F"), Some(31));
        assert_eq!(parse_int("0b101"), Some(5));
        assert_eq!(parse_int("0o17"), Some(15));
        assert_eq!(parse_int("x"), None);
    }
}
