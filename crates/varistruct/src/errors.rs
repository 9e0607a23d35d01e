//! Error types for struct access, array framing, and enum conversion.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure the struct engine can report.
///
/// All of these are local, recoverable conditions. A failed write never
/// leaves a partially updated buffer behind, and a failed array load never
/// returns a partial array.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A descriptor-level property (length, terminator) has no value for the variant.
    #[error("{structure} has no {property} defined for {variant}")]
    UnsupportedVariant {
        structure: String,
        property: &'static str,
        variant: &'static str,
    },

    /// The field name is not declared by the descriptor at all.
    #[error("\"{field}\" is not a field of {structure}")]
    UnknownField { structure: String, field: String },

    /// The field is declared, but has no layout in this variant.
    #[error("field \"{field}\" of {structure} is not available in {variant}")]
    FieldNotAvailableInVariant {
        structure: String,
        field: String,
        variant: &'static str,
    },

    /// Source bytes do not match the struct length for the variant.
    #[error("{structure} is {expected} bytes long in {variant}, got {actual} bytes")]
    LengthMismatch {
        structure: String,
        variant: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A block item was built from another descriptor or for another variant.
    #[error("cannot save a {item_structure} item for {item_variant} in a block of {structure} for {variant}")]
    ForeignItem {
        structure: String,
        variant: &'static str,
        item_structure: String,
        item_variant: &'static str,
    },

    /// An array body is not a whole number of items.
    #[error("array of {structure} ends with {remainder} stray bytes (item length {item_length})")]
    TruncatedArray {
        structure: String,
        item_length: usize,
        remainder: usize,
    },

    /// An array does not end with its required terminator.
    #[error("array of {structure} does not end with terminator {terminator:02X?}")]
    MissingTerminator {
        structure: String,
        terminator: Vec<u8>,
    },

    /// A value cannot be packed into the field's width.
    #[error("{}value {value} does not fit in {width} bytes", field_prefix(.field))]
    EncodingError {
        field: Option<String>,
        value: String,
        width: usize,
    },

    /// No enum member is represented by the raw value in this variant.
    #[error("{enumeration} has no member with value {value} in {variant}")]
    UnknownEnumValue {
        enumeration: String,
        variant: &'static str,
        value: i128,
    },

    /// The enum member exists, but has no raw value in this variant.
    #[error("{enumeration}::{member} has no value in {variant}")]
    NoRepresentationForVariant {
        enumeration: String,
        member: String,
        variant: &'static str,
    },

    /// A value is not a member of the field's logical type.
    #[error("{}invalid value {value}, expected {expected}", field_prefix(.field))]
    InvalidValue {
        field: Option<String>,
        expected: String,
        value: String,
    },

    /// A field's layout reaches past the end of the struct for the variant.
    #[error("field \"{field}\" of {structure} ends at byte {end}, past the {length}-byte struct in {variant}")]
    FieldOutOfRange {
        structure: String,
        field: String,
        variant: &'static str,
        end: usize,
        length: usize,
    },

    /// A descriptor declares the same field name twice.
    #[error("{structure} declares field \"{field}\" more than once")]
    DuplicateField { structure: String, field: String },
}

impl Error {
    /// Attaches a field name to value-level errors raised below the field layer.
    pub(crate) fn in_field(self, name: &str) -> Self {
        match self {
            Error::EncodingError {
                field: None,
                value,
                width,
            } => Error::EncodingError {
                field: Some(name.to_owned()),
                value,
                width,
            },
            Error::InvalidValue {
                field: None,
                expected,
                value,
            } => Error::InvalidValue {
                field: Some(name.to_owned()),
                expected,
                value,
            },
            other => other,
        }
    }

    pub(crate) fn invalid_value(expected: impl Into<String>, value: impl ToString) -> Self {
        Error::InvalidValue {
            field: None,
            expected: expected.into(),
            value: value.to_string(),
        }
    }
}

fn field_prefix(field: &Option<String>) -> String {
    match field {
        Some(name) => format!("field \"{name}\": "),
        None => String::new(),
    }
}
