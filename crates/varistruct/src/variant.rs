//! Variant selectors: the axis along which struct layouts vary.
//!
//! A variant is one supported release or format generation. The set of
//! variants is small, closed, and known up front, so implementations are
//! expected to be fieldless enums.

use std::fmt::Debug;
use std::hash::Hash;

/// Byte order of a multi-byte numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Endianness {
    Big,
    Little,
}

/// A named predicate over a variant set, used as shorthand when assigning
/// one value to several variants at once.
pub trait VariantGroup: Copy + Eq + Debug + 'static {
    /// Every group, in declaration order.
    fn all() -> &'static [Self];

    /// Name used in declarative definitions.
    fn name(self) -> &'static str;

    /// Looks a group up by name, ignoring ASCII case.
    fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|group| group.name().eq_ignore_ascii_case(name))
    }
}

/// One supported release of a data format.
///
/// The `Ord` bound only gives per-variant maps a stable iteration order;
/// it carries no meaning about which release came first.
pub trait Variant: Copy + Eq + Ord + Hash + Debug + 'static {
    /// Groups this variant set can be addressed by. Use [`NoGroup`] if none.
    type Group: VariantGroup;

    /// Every variant, in declaration order.
    fn all() -> &'static [Self];

    /// Short name used in errors and declarative definitions.
    fn name(self) -> &'static str;

    /// Byte order for fields that do not pin their own.
    fn endianness(self) -> Endianness;

    /// Whether this variant belongs to `group`.
    fn is_member_of(self, group: Self::Group) -> bool;

    /// Looks a variant up by name, ignoring ASCII case.
    fn from_name(name: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|variant| variant.name().eq_ignore_ascii_case(name))
    }
}

/// Group type for variant sets that define no groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoGroup {}

impl VariantGroup for NoGroup {
    fn all() -> &'static [Self] {
        &[]
    }

    fn name(self) -> &'static str {
        match self {}
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Three-release variant set shared by the unit tests.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub enum Release {
        A,
        B,
        C,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Family {
        /// B and C share a successor engine.
        Successor,
    }

    impl VariantGroup for Family {
        fn all() -> &'static [Self] {
            &[Family::Successor]
        }

        fn name(self) -> &'static str {
            match self {
                Family::Successor => "successor",
            }
        }
    }

    impl Variant for Release {
        type Group = Family;

        fn all() -> &'static [Self] {
            &[Release::A, Release::B, Release::C]
        }

        fn name(self) -> &'static str {
            match self {
                Release::A => "A",
                Release::B => "B",
                Release::C => "C",
            }
        }

        fn endianness(self) -> Endianness {
            match self {
                Release::A | Release::C => Endianness::Little,
                Release::B => Endianness::Big,
            }
        }

        fn is_member_of(self, group: Family) -> bool {
            match group {
                Family::Successor => matches!(self, Release::B | Release::C),
            }
        }
    }
}
