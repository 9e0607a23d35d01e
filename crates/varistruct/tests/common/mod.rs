#![allow(dead_code)]

use std::sync::Arc;

use varistruct::{
    ConcreteField, Endianness, PerVariant, StructDescriptor, VariantEnum, Variant, VariantGroup,
};

/// Three releases: A is little endian, B big endian, C little endian again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Release {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Modern,
}

impl VariantGroup for Engine {
    fn all() -> &'static [Self] {
        &[Engine::Modern]
    }

    fn name(self) -> &'static str {
        "modern"
    }
}

impl Variant for Release {
    type Group = Engine;

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
            Release::B => Endianness::Big,
            Release::A | Release::C => Endianness::Little,
        }
    }

    fn is_member_of(self, group: Engine) -> bool {
        match group {
            Engine::Modern => matches!(self, Release::B | Release::C),
        }
    }
}

pub fn facing() -> Arc<VariantEnum<Release>> {
    Arc::new(
        VariantEnum::new("Facing")
            .member("LEFT", 0)
            .member("RIGHT", 1)
            .member(
                "UP",
                PerVariant::builder().with_group(Engine::Modern, 2).build(),
            ),
    )
}

/// 12 bytes in A, 16 in B and C. `zone_id` only exists in B and C.
pub fn sprite() -> Arc<StructDescriptor<Release>> {
    StructDescriptor::builder("Sprite")
        .length(
            PerVariant::builder()
                .with(Release::A, 12)
                .with_group(Engine::Modern, 16)
                .build(),
        )
        .terminator(vec![0xFF, 0xFF, 0xFF, 0xFF])
        .field("type", ConcreteField::u16(0))
        .field("x", ConcreteField::u16(2))
        .field("y", ConcreteField::u16(4))
        .field("data", ConcreteField::bytes(6, 6))
        .field("flag", ConcreteField::u8(6).mask_bool(0x01))
        .field("facing", ConcreteField::u8(7).rshift(4).mask(0x3).enumeration(facing()))
        .field(
            "zone_id",
            PerVariant::builder()
                .with_group(Engine::Modern, ConcreteField::u8(12))
                .build(),
        )
        .build()
        .expect("sprite descriptor")
}
