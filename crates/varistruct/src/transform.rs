//! A [`Transform`] is one reversible step between a raw integer slot and a
//! field's logical value:
//! - **Mask**: `raw & m`, undone by masking again.
//! - **Shifts**: `raw << n` / `raw >> n`, undone by the opposite shift.
//! - **Bool**: `raw != 0`, undone as `0` or `1`. Without a mask in front it
//!   owns the whole slot, so writing `false` clears every bit it reads.
//! - **Enum**: raw value to member of a [`VariantEnum`], per variant.
//!
//! ## Transform order
//!
//! A field applies its transforms first to last when loading and undoes them
//! last to first when saving. While saving, the same reverse fold over
//! [`Transform::effective_bitmask`] works out which raw bits the field owns,
//! starting from [`NO_MASK`].

use std::sync::Arc;

use crate::{
    enumeration::VariantEnum,
    errors::{Error, Result},
    value::Value,
    variant::Variant,
};

/// Sentinel bitmask meaning "every bit", i.e. no restriction.
pub const NO_MASK: i128 = -1;

#[derive(Debug, Clone)]
pub enum Transform<V: Variant> {
    Mask(i128),
    ShiftLeft(u32),
    ShiftRight(u32),
    Bool,
    Enum(Arc<VariantEnum<V>>),
}

impl<V: Variant> Transform<V> {
    /// Load direction.
    pub fn apply(&self, variant: V, value: Value) -> Result<Value> {
        match self {
            Transform::Bool => Ok(Value::Bool(int(&value, "an integer")? != 0)),
            Transform::Enum(enumeration) => {
                let raw = int(&value, "an integer")?;
                let member = enumeration.load(variant, raw)?;
                Ok(Value::Enum(member.name().to_owned()))
            }
            _ => self.apply_int(int(&value, "an integer")?).map(Value::Int),
        }
    }

    /// Save direction. Fails with [`Error::InvalidValue`] for values outside
    /// the transform's logical type rather than guessing a raw value.
    pub fn unapply(&self, variant: V, value: Value) -> Result<Value> {
        match self {
            Transform::Mask(mask) => Ok(Value::Int(int(&value, "an integer")? & mask)),
            Transform::ShiftLeft(n) => Ok(Value::Int(int(&value, "an integer")? >> (*n).min(127))),
            Transform::ShiftRight(n) => shl(int(&value, "an integer")?, *n).map(Value::Int),
            Transform::Bool => match value {
                Value::Bool(b) => Ok(Value::Int(i128::from(b))),
                Value::Int(raw) => Ok(Value::Int(i128::from(raw != 0))),
                other => Err(Error::invalid_value("a bool", format!("{other:?}"))),
            },
            Transform::Enum(enumeration) => match value {
                Value::Enum(name) => enumeration.save(variant, &name).map(Value::Int),
                other => Err(Error::invalid_value(
                    format!("a member of {}", enumeration.name()),
                    format!("{other:?}"),
                )),
            },
        }
    }

    /// Narrows `incoming` to the raw bits this step reaches, seen from the
    /// step before it.
    pub fn effective_bitmask(&self, _variant: V, incoming: i128) -> i128 {
        match self {
            Transform::Mask(mask) => incoming & mask,
            Transform::ShiftLeft(n) => incoming >> (*n).min(127),
            Transform::ShiftRight(n) => incoming.checked_shl(*n).unwrap_or(0),
            Transform::Bool | Transform::Enum(_) => incoming,
        }
    }

    fn apply_int(&self, raw: i128) -> Result<i128> {
        match self {
            Transform::Mask(mask) => Ok(raw & mask),
            Transform::ShiftLeft(n) => shl(raw, *n),
            Transform::ShiftRight(n) => Ok(raw >> (*n).min(127)),
            Transform::Bool | Transform::Enum(_) => Ok(raw),
        }
    }
}

fn int(value: &Value, expected: &str) -> Result<i128> {
    value
        .as_int()
        .ok_or_else(|| Error::invalid_value(expected, format!("{value:?}")))
}

fn shl(value: i128, n: u32) -> Result<i128> {
    value
        .checked_shl(n)
        .filter(|shifted| *shifted >> n == value)
        .ok_or_else(|| Error::invalid_value(format!("a value that survives << {n}"), value))
}
