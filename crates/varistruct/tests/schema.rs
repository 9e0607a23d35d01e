#![cfg(feature = "serde")]

mod common;

use std::fs;

use common::Release;
use varistruct::{
    Error, StructInstance, Value,
    schema::{SchemaError, VersionedApi, load_whitelist},
};

const API: &str = r#"{
    "enums": {
        "Facing": {
            "LEFT": 0,
            "RIGHT": 1,
            "UP": { "value": { "modern": 2 }, "semantic_value": 90 }
        }
    },
    "structs": {
        "Sprite": {
            "_length": { "A": 12, "modern": 16 },
            "_terminator": "ffffffff",
            "_comment": "reserved keys never become fields",
            "type": "u16 @ 0",
            "x": "u16 @ 2",
            "data": "bytestring 6 @ 6",
            "flag": ["u8 @ 6", "mask_bool 1"],
            "facing": ["u8 @ 7", ">> 4", "& 3", "enum Facing"],
            "zone_id": { "modern": "u8 @ 0xC" }
        },
        "Zone": {
            "_length": 8,
            "width": { "def": "be u16 @ 0", "default": 512 },
            "name": { "def": "string 4 ascii @ 2", "default": "W1" },
            "facing": { "def": ["u8 @ 6", "enum Facing"], "default": "RIGHT" },
            "raw_width": { "def": "be u16 @ 0", "alternate": true }
        }
    }
}"#;

fn api() -> VersionedApi<Release> {
    VersionedApi::from_json("test", API).unwrap()
}

#[test]
fn test_struct_names_keep_declaration_order() {
    let api = api();
    assert_eq!(api.struct_names().collect::<Vec<_>>(), vec!["Sprite", "Zone"]);
    assert_eq!(api.version(), "test");
}

#[test]
fn test_sprite_from_json_matches_releases() {
    let sprite = api().structure("Sprite").unwrap().clone();

    assert_eq!(sprite.length(Release::A).unwrap(), 12);
    assert_eq!(sprite.length(Release::C).unwrap(), 16);
    assert_eq!(sprite.block_terminator(Release::B).unwrap(), &[0xFF; 4]);
    assert!(sprite.field("_comment").is_none());

    let a = StructInstance::new(sprite.clone(), Release::A).unwrap();
    assert!(matches!(a.get("zone_id"), Err(Error::FieldNotAvailableInVariant { .. })));

    let mut b = StructInstance::new(sprite, Release::B).unwrap();
    b.set("facing", Value::member("UP")).unwrap();
    b.set("flag", true).unwrap();
    assert_eq!(&b.as_bytes()[6..8], &[0x01, 0x20]);
}

#[test]
fn test_enum_semantic_values() {
    let api = api();
    let facing = api.enumeration("Facing").unwrap();

    assert_eq!(facing.get("UP").unwrap().semantic(), Some(90.0));
    assert_eq!(facing.get("LEFT").unwrap().semantic(), None);
    assert!(facing.save(Release::A, "UP").is_err());
}

#[test]
fn test_defaults_from_json() {
    let zone = StructInstance::new(api().structure("Zone").unwrap().clone(), Release::A).unwrap();

    assert_eq!(zone.get("width").unwrap(), Value::Int(512));
    assert_eq!(zone.get("name").unwrap(), Value::from("W1"));
    assert_eq!(zone.get("facing").unwrap(), Value::member("RIGHT"));
    assert_eq!(zone.save(), vec![0x02, 0x00, b'W', b'1', 0, 0, 1, 0]);
    assert_eq!(zone.to_string(), "<Zone>");
}

#[test]
fn test_unknown_variant_key() {
    let json = r#"{ "structs": { "S": { "_length": { "Z": 4 } } } }"#;
    assert!(matches!(
        VersionedApi::<Release>::from_json("bad", json),
        Err(SchemaError::UnknownVariantKey(key)) if key == "Z"
    ));
}

#[test]
fn test_bad_default() {
    let json = r#"{ "structs": { "S": { "_length": 4, "x": { "def": "u8 @ 0", "default": {} } } } }"#;
    assert!(matches!(
        VersionedApi::<Release>::from_json("bad", json),
        Err(SchemaError::InvalidDefault { .. })
    ));
}

#[test]
fn test_load_respects_whitelist() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("api_versions_whitelist.txt"), "\n1.0\n\n  2.0  \n").unwrap();
    fs::write(dir.path().join("api_1.0.json"), API).unwrap();

    assert_eq!(load_whitelist(dir.path()).unwrap(), vec!["1.0", "2.0"]);

    let api = VersionedApi::<Release>::load(dir.path(), "1.0").unwrap();
    assert!(api.structure("Zone").is_some());

    assert!(matches!(
        VersionedApi::<Release>::load(dir.path(), "3.0"),
        Err(SchemaError::UnknownVersion(v)) if v == "3.0"
    ));
    assert!(matches!(
        VersionedApi::<Release>::load(dir.path(), "2.0"),
        Err(SchemaError::Io(_))
    ));
}
