//! Logical field values as seen by callers of `get` and `set`.

use std::fmt;

/// A decoded field value.
///
/// Integers of every width and signedness share [`Value::Int`]; `i128` holds
/// the full range of both `u64` and `i64`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Int(i128),
    Float32(f32),
    Float64(f64),
    Bool(bool),
    /// Name of a member of a variant-scoped enum.
    Enum(String),
    /// Raw bytes, or a fixed string that failed to decode.
    Bytes(Vec<u8>),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i128> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float32(v) => Some(f64::from(*v)),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&str> {
        match self {
            Value::Enum(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Builds an enum value from a member name.
    pub fn member(name: impl Into<String>) -> Self {
        Value::Enum(name.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float32(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Enum(name) => f.write_str(name),
            Value::Bytes(bytes) => {
                f.write_str("b'")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                f.write_str("'")
            }
            Value::Str(s) => write!(f, "{s:?}"),
        }
    }
}

macro_rules! int_into_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i128::from(value))
                }
            }
        )*
    };
}

int_into_value!(u8, i8, u16, i16, u32, i32, u64, i64, i128);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float32(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float64(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_conversions_share_one_kind() {
        assert_eq!(Value::from(255u8), Value::Int(255));
        assert_eq!(Value::from(-1i16), Value::Int(-1));
        assert_eq!(Value::from(u64::MAX), Value::Int(u64::MAX as i128));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Bytes(vec![0x00, 0xab]).to_string(), "b'00ab'");
        assert_eq!(Value::member("NORMAL").to_string(), "NORMAL");
        assert_eq!(Value::from("W1").to_string(), "\"W1\"");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Float32(0.5).as_f64(), Some(0.5));
        assert_eq!(Value::Int(3).as_bool(), None);
        assert_eq!(Value::member("X").as_enum(), Some("X"));
    }
}
