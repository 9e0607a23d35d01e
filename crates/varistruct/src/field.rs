//! Concrete fields: a raw slot at a fixed offset and width, plus the
//! transform chain between that slot and the logical value.

use std::sync::Arc;

use crate::{
    bits,
    enumeration::VariantEnum,
    errors::{Error, Result},
    transform::{NO_MASK, Transform},
    value::Value,
    variant::{Endianness, Variant},
};

/// Width, signedness, and float-ness of a numeric slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericKind {
    U8,
    S8,
    U16,
    S16,
    U32,
    S32,
    U64,
    S64,
    F32,
    F64,
}

impl NumericKind {
    pub const ALL: [NumericKind; 10] = [
        NumericKind::U8,
        NumericKind::S8,
        NumericKind::U16,
        NumericKind::S16,
        NumericKind::U32,
        NumericKind::S32,
        NumericKind::U64,
        NumericKind::S64,
        NumericKind::F32,
        NumericKind::F64,
    ];

    /// Width in bytes.
    pub fn width(self) -> usize {
        match self {
            NumericKind::U8 | NumericKind::S8 => 1,
            NumericKind::U16 | NumericKind::S16 => 2,
            NumericKind::U32 | NumericKind::S32 | NumericKind::F32 => 4,
            NumericKind::U64 | NumericKind::S64 | NumericKind::F64 => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            NumericKind::S8 | NumericKind::S16 | NumericKind::S32 | NumericKind::S64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumericKind::F32 | NumericKind::F64)
    }

    pub fn name(self) -> &'static str {
        match self {
            NumericKind::U8 => "u8",
            NumericKind::S8 => "s8",
            NumericKind::U16 => "u16",
            NumericKind::S16 => "s16",
            NumericKind::U32 => "u32",
            NumericKind::S32 => "s32",
            NumericKind::U64 => "u64",
            NumericKind::S64 => "s64",
            NumericKind::F32 => "f32",
            NumericKind::F64 => "f64",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

/// Character encoding of a fixed-length, NUL-padded string slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Ascii,
    Latin1,
    Utf8,
}

impl TextEncoding {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "ascii" => Some(TextEncoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" => Some(TextEncoding::Latin1),
            "utf-8" | "utf8" => Some(TextEncoding::Utf8),
            _ => None,
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|b| char::from(*b)).collect()),
            TextEncoding::Latin1 => Some(bytes.iter().map(|b| char::from(*b)).collect()),
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec()).ok(),
        }
    }

    pub fn encode(self, text: &str) -> Option<Vec<u8>> {
        match self {
            TextEncoding::Ascii => text.is_ascii().then(|| text.as_bytes().to_vec()),
            TextEncoding::Latin1 => text.chars().map(|c| u8::try_from(c).ok()).collect(),
            TextEncoding::Utf8 => Some(text.as_bytes().to_vec()),
        }
    }
}

/// What occupies a concrete field's bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// An integer or float. `None` endianness inherits the variant's.
    Numeric {
        kind: NumericKind,
        endianness: Option<Endianness>,
    },
    /// Raw bytes, returned as-is.
    Bytes { length: usize },
    /// A NUL-padded string.
    Text {
        length: usize,
        encoding: TextEncoding,
    },
}

/// A fully resolved field layout for one variant.
///
/// Built with the fluent helpers, e.g. `ConcreteField::u16(0x00).rshift(12)`.
/// Transforms only apply to numeric slots.
#[derive(Debug, Clone)]
pub struct ConcreteField<V: Variant> {
    offset: usize,
    kind: FieldKind,
    transforms: Vec<Transform<V>>,
}

impl<V: Variant> ConcreteField<V> {
    pub fn new(offset: usize, kind: FieldKind) -> Self {
        Self {
            offset,
            kind,
            transforms: Vec::new(),
        }
    }

    pub fn numeric(kind: NumericKind, offset: usize) -> Self {
        Self::new(
            offset,
            FieldKind::Numeric {
                kind,
                endianness: None,
            },
        )
    }

    pub fn u8(offset: usize) -> Self {
        Self::numeric(NumericKind::U8, offset)
    }

    pub fn s8(offset: usize) -> Self {
        Self::numeric(NumericKind::S8, offset)
    }

    pub fn u16(offset: usize) -> Self {
        Self::numeric(NumericKind::U16, offset)
    }

    pub fn s16(offset: usize) -> Self {
        Self::numeric(NumericKind::S16, offset)
    }

    pub fn u32(offset: usize) -> Self {
        Self::numeric(NumericKind::U32, offset)
    }

    pub fn s32(offset: usize) -> Self {
        Self::numeric(NumericKind::S32, offset)
    }

    pub fn u64(offset: usize) -> Self {
        Self::numeric(NumericKind::U64, offset)
    }

    pub fn s64(offset: usize) -> Self {
        Self::numeric(NumericKind::S64, offset)
    }

    pub fn f32(offset: usize) -> Self {
        Self::numeric(NumericKind::F32, offset)
    }

    pub fn f64(offset: usize) -> Self {
        Self::numeric(NumericKind::F64, offset)
    }

    pub fn bytes(offset: usize, length: usize) -> Self {
        Self::new(offset, FieldKind::Bytes { length })
    }

    pub fn text(offset: usize, length: usize, encoding: TextEncoding) -> Self {
        Self::new(offset, FieldKind::Text { length, encoding })
    }

    /// Pins the byte order instead of inheriting the variant's. No effect on
    /// byte and string slots.
    pub fn with_endianness(mut self, pinned: Endianness) -> Self {
        if let FieldKind::Numeric { endianness, .. } = &mut self.kind {
            *endianness = Some(pinned);
        }
        self
    }

    pub fn big_endian(self) -> Self {
        self.with_endianness(Endianness::Big)
    }

    pub fn little_endian(self) -> Self {
        self.with_endianness(Endianness::Little)
    }

    pub fn transform(mut self, transform: Transform<V>) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn mask(self, mask: i128) -> Self {
        self.transform(Transform::Mask(mask))
    }

    pub fn lshift(self, amount: u32) -> Self {
        self.transform(Transform::ShiftLeft(amount))
    }

    pub fn rshift(self, amount: u32) -> Self {
        self.transform(Transform::ShiftRight(amount))
    }

    pub fn boolean(self) -> Self {
        self.transform(Transform::Bool)
    }

    /// Isolates one flag bit as a bool: `rshift(n).mask(1).boolean()` for
    /// `bit == 1 << n`.
    ///
    /// # Panics
    ///
    /// If `bit` does not have exactly one bit set.
    pub fn mask_bool(self, bit: u64) -> Self {
        assert!(
            bit.count_ones() == 1,
            "mask_bool needs a single-bit mask, got {bit:#x}"
        );
        self.rshift(bit.trailing_zeros()).mask(1).boolean()
    }

    pub fn enumeration(self, enumeration: Arc<VariantEnum<V>>) -> Self {
        self.transform(Transform::Enum(enumeration))
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn transforms(&self) -> &[Transform<V>] {
        &self.transforms
    }

    /// Width in bytes.
    pub fn width(&self) -> usize {
        match &self.kind {
            FieldKind::Numeric { kind, .. } => kind.width(),
            FieldKind::Bytes { length } | FieldKind::Text { length, .. } => *length,
        }
    }

    /// One past the last byte this field touches.
    pub fn end(&self) -> usize {
        self.offset + self.width()
    }

    pub fn endianness(&self, variant: V) -> Endianness {
        match &self.kind {
            FieldKind::Numeric {
                endianness: Some(pinned),
                ..
            } => *pinned,
            _ => variant.endianness(),
        }
    }

    /// Raw bits owned by this field, or [`NO_MASK`] if it owns the whole slot.
    pub fn bitmask(&self, variant: V) -> i128 {
        let mask = self
            .transforms
            .iter()
            .rev()
            .fold(NO_MASK, |mask, t| t.effective_bitmask(variant, mask));

        if mask == NO_MASK {
            NO_MASK
        } else {
            mask & bits::width_mask(self.width())
        }
    }

    /// Decodes this field from the full struct buffer. Callers check
    /// `end() <= data.len()` beforehand.
    pub(crate) fn load(&self, variant: V, data: &[u8]) -> Result<Value> {
        let bytes = &data[self.offset..self.end()];

        let value = match &self.kind {
            FieldKind::Numeric { kind, .. } => {
                let raw = bits::read_uint(bytes, self.endianness(variant));
                match kind {
                    NumericKind::F32 => Value::Float32(f32::from_bits(raw as u32)),
                    NumericKind::F64 => Value::Float64(f64::from_bits(raw)),
                    kind => Value::Int(int_from_raw(*kind, raw)),
                }
            }
            FieldKind::Bytes { .. } => Value::Bytes(bytes.to_vec()),
            FieldKind::Text { encoding, .. } => decode_text(bytes, *encoding),
        };

        self.transforms
            .iter()
            .try_fold(value, |value, t| t.apply(variant, value))
    }

    /// Encodes `value` into the full struct buffer, keeping every raw bit
    /// outside this field's mask. Nothing is written unless encoding succeeds.
    pub(crate) fn store(&self, variant: V, data: &mut [u8], value: Value) -> Result<()> {
        let raw = self
            .transforms
            .iter()
            .rev()
            .try_fold(value, |value, t| t.unapply(variant, value))?;

        match &self.kind {
            FieldKind::Numeric { kind, .. } => {
                let packed = self.pack(*kind, variant, data, raw)?;
                let endianness = self.endianness(variant);
                bits::write_uint(&mut data[self.offset..self.end()], packed, endianness);
            }
            FieldKind::Bytes { length } => {
                let bytes = match raw {
                    Value::Bytes(bytes) => bytes,
                    other => return Err(Error::invalid_value("bytes", format!("{other:?}"))),
                };
                if bytes.len() != *length {
                    return Err(Error::EncodingError {
                        field: None,
                        value: Value::Bytes(bytes).to_string(),
                        width: *length,
                    });
                }
                data[self.offset..self.end()].copy_from_slice(&bytes);
            }
            FieldKind::Text { length, encoding } => {
                let bytes = encode_text(raw, *length, *encoding)?;
                data[self.offset..self.end()].copy_from_slice(&bytes);
            }
        }

        Ok(())
    }

    fn pack(&self, kind: NumericKind, variant: V, data: &[u8], raw: Value) -> Result<u64> {
        match (kind, raw) {
            (NumericKind::F32, value) => float(value).map(|f| u64::from((f as f32).to_bits())),
            (NumericKind::F64, value) => float(value).map(f64::to_bits),
            (kind, Value::Int(value)) => {
                let mask = self.bitmask(variant);
                let value = if mask == NO_MASK {
                    value
                } else {
                    let current = self.read_int(kind, variant, data);
                    tracing::trace!(offset = self.offset, mask, current, "merging masked write");
                    let merged = (value & mask) | (current & !mask);
                    if kind.is_signed() {
                        i128::from(bits::sign_extend(merged as u64, 8 * kind.width()))
                    } else {
                        merged
                    }
                };

                if !bits::fits(value, kind.width(), kind.is_signed()) {
                    return Err(Error::EncodingError {
                        field: None,
                        value: value.to_string(),
                        width: kind.width(),
                    });
                }

                Ok(value as u64)
            }
            (_, other) => Err(Error::invalid_value("an integer", format!("{other:?}"))),
        }
    }

    fn read_int(&self, kind: NumericKind, variant: V, data: &[u8]) -> i128 {
        let raw = bits::read_uint(&data[self.offset..self.end()], self.endianness(variant));
        int_from_raw(kind, raw)
    }
}

fn int_from_raw(kind: NumericKind, raw: u64) -> i128 {
    if kind.is_signed() {
        i128::from(bits::sign_extend(raw, 8 * kind.width()))
    } else {
        i128::from(raw)
    }
}

fn float(value: Value) -> Result<f64> {
    match value {
        Value::Float32(f) => Ok(f64::from(f)),
        Value::Float64(f) => Ok(f),
        Value::Int(i) => Ok(i as f64),
        other => Err(Error::invalid_value("a number", format!("{other:?}"))),
    }
}

/// Decodes up to the first NUL. Undecodable data comes back as bytes with
/// trailing NULs removed.
fn decode_text(bytes: &[u8], encoding: TextEncoding) -> Value {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());

    match encoding.decode(&bytes[..end]) {
        Some(text) => Value::Str(text),
        None => {
            let trimmed = bytes.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
            Value::Bytes(bytes[..trimmed].to_vec())
        }
    }
}

fn encode_text(value: Value, length: usize, encoding: TextEncoding) -> Result<Vec<u8>> {
    let mut bytes = match value {
        Value::Str(text) => encoding.encode(&text).ok_or_else(|| {
            Error::invalid_value(format!("text encodable as {encoding:?}"), &text)
        })?,
        Value::Bytes(bytes) => bytes,
        other => return Err(Error::invalid_value("a string", format!("{other:?}"))),
    };

    if bytes.len() > length {
        return Err(Error::EncodingError {
            field: None,
            value: Value::Bytes(bytes).to_string(),
            width: length,
        });
    }

    bytes.resize(length, 0);
    Ok(bytes)
}
