//! # varistruct
//!
//! Declarative binary struct descriptors for data formats whose layout
//! changes from one release to the next.
//!
//! A [`StructDescriptor`] declares each field once, with a layout per
//! [`Variant`]: offset, width, byte order, and a chain of reversible
//! transforms (masks, shifts, bool and enum casts). A [`StructInstance`]
//! owns the raw bytes and decodes fields lazily on access. Writes only touch
//! the bits a field owns, so fields sharing a byte with unrelated flags
//! survive a load/modify/save cycle bit for bit.
//!
//! ## Example
//!
//! ```
//! use varistruct::{
//!     ConcreteField, Endianness, NoGroup, PerVariant, StructDescriptor, StructInstance, Value,
//!     Variant,
//! };
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! enum Release {
//!     Handheld,
//!     Console,
//! }
//!
//! impl Variant for Release {
//!     type Group = NoGroup;
//!
//!     fn all() -> &'static [Self] {
//!         &[Release::Handheld, Release::Console]
//!     }
//!
//!     fn name(self) -> &'static str {
//!         match self {
//!             Release::Handheld => "handheld",
//!             Release::Console => "console",
//!         }
//!     }
//!
//!     fn endianness(self) -> Endianness {
//!         match self {
//!             Release::Handheld => Endianness::Little,
//!             Release::Console => Endianness::Big,
//!         }
//!     }
//!
//!     fn is_member_of(self, group: NoGroup) -> bool {
//!         match group {}
//!     }
//! }
//!
//! let sprite = StructDescriptor::builder("Sprite")
//!     .length(PerVariant::builder().with(Release::Handheld, 12).with(Release::Console, 16).build())
//!     .field("type", ConcreteField::u16(0))
//!     .field("zone_id", PerVariant::builder().with(Release::Console, ConcreteField::u8(12)).build())
//!     .build()
//!     .unwrap();
//!
//! let mut bytes = vec![0u8; 16];
//! bytes[1] = 0x2A;
//! bytes[12] = 3;
//!
//! let mut instance = StructInstance::load(sprite.clone(), Release::Console, &bytes).unwrap();
//! assert_eq!(instance.get("type").unwrap(), Value::Int(0x2A));
//! assert_eq!(instance.get("zone_id").unwrap(), Value::Int(3));
//!
//! instance.set("zone_id", 4).unwrap();
//! assert_eq!(instance.save()[12], 4);
//!
//! let handheld = StructInstance::new(sprite, Release::Handheld).unwrap();
//! assert!(handheld.get("zone_id").is_err());
//! ```
//!
//! ## Features
//!
//! - `serde`: JSON API definitions ([`schema::VersionedApi`]) and
//!   `Serialize`/`Deserialize` for [`Value`] and [`Endianness`].

pub mod array;
pub mod bits;
pub mod descriptor;
pub mod enumeration;
pub mod errors;
pub mod field;
pub mod instance;
pub mod per_variant;
pub mod transform;
pub mod value;
pub mod variant;

#[cfg(feature = "serde")]
pub mod schema;
#[cfg(feature = "serde")]
pub mod serde;

pub use array::{TerminatorPolicy, load_array, load_block, save_array, save_block};
pub use descriptor::{DescriptorBuilder, LogicalField, StructDescriptor};
pub use enumeration::{EnumMember, VariantEnum};
pub use errors::{Error, Result};
pub use field::{ConcreteField, FieldKind, NumericKind, TextEncoding};
pub use instance::StructInstance;
pub use per_variant::{PerVariant, PerVariantBuilder};
pub use transform::{NO_MASK, Transform};
pub use value::Value;
pub use variant::{Endianness, NoGroup, Variant, VariantGroup};
