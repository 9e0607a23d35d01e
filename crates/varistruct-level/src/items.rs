//! Descriptors for every item a course file stores.
//!
//! Each descriptor is built on first use and shared afterwards; the
//! accessors hand out clones of the same `Arc`.

use std::sync::{Arc, LazyLock};

use varistruct::{ConcreteField, PerVariant, Result, StructDescriptor, TextEncoding};

use crate::{enums, game::Game, macros::varies};

type Field = ConcreteField<Game>;
type Shared = LazyLock<Result<Arc<StructDescriptor<Game>>>>;

macro_rules! shared_descriptor {
    ($(#[$meta:meta])* $vis:vis fn $name:ident = $cell:ident($build:ident);) => {
        static $cell: Shared = LazyLock::new($build);

        $(#[$meta])*
        $vis fn $name() -> Result<Arc<StructDescriptor<Game>>> {
            $cell.clone()
        }
    };
}

shared_descriptor! {
    /// One object in a bgdat (tile layer) file. `tileset_id` and `type`
    /// share the first u16.
    pub fn level_object = LEVEL_OBJECT(build_level_object);
}

fn build_level_object() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelObject")
        .length(varies!(nsmb = 10, nsmbw = 10, nsmb2 = 16, like_nsmbu = 16))
        .terminator(vec![0xFF, 0xFF])
        .field("tileset_id", Field::u16(0x00).rshift(12))
        .field("type", Field::u16(0x00).mask(0xFFF))
        .field("x", Field::s16(0x02))
        .field("y", Field::s16(0x04))
        .field("width", Field::s16(0x06))
        .field("height", Field::s16(0x08))
        .field("contents", varies!(like_nsmbu = Field::u8(0x0A)))
        .build()
}

shared_descriptor! {
    pub fn level_options = LEVEL_OPTIONS(build_level_options);
}

fn build_level_options() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelOptions")
        .length(varies!(nsmb = 32, nsmbw = 20, nsmb2 = 24, like_nsmbu = 24))
        .field(
            "initial_event_ids",
            varies!(
                nsmb = Field::u16(0x18),
                nsmbw = Field::u32(0x00),
                nsmb2 = Field::u64(0x00),
                like_nsmbu = Field::u64(0x00),
            ),
        )
        .field(
            "wrap_across_edges",
            varies!(
                nsmb = Field::u16(0x02).mask_bool(0x20),
                nsmbw = Field::u16(0x08).mask_bool(0x01),
                like_nsmbu = Field::u16(0x08).mask_bool(0x01),
            ),
        )
        .field(
            "unk_flag_8",
            varies!(nsmb = Field::u16(0x02).mask_bool(0x08), default = Field::u16(0x08).mask_bool(0x08)),
        )
        .field("start_as_mini_mario", varies!(nsmb = Field::u16(0x02).mask_bool(0x01)))
        .field("force_mini_mario_physics", varies!(nsmb = Field::u16(0x02).mask_bool(0x02)))
        .field(
            "initial_time_limit",
            varies!(nsmb = Field::s16(0x04), default = Field::u16(0x0A)),
        )
        .field("coin_rush_time_limit", varies!(nsmb2 = Field::u16(0x14)))
        .field("checkpoint_time_limit_1", varies!(like_nsmbu = Field::u16(0x14)))
        .field("checkpoint_time_limit_2", varies!(like_nsmbu = Field::u16(0x16)))
        .field("is_credits", varies!(nsmbw = Field::u8(0x0C).mask_bool(0x01)))
        .field("unk_0d", varies!(nsmbw = Field::u8(0x0D), nsmb2 = Field::u8(0x0D), like_nsmbu = Field::u8(0x0D)))
        .field("unk_0e", varies!(nsmbw = Field::u8(0x0E), nsmb2 = Field::u8(0x0E), like_nsmbu = Field::u8(0x0E)))
        .field("unk_0f", varies!(nsmbw = Field::u8(0x0F), nsmb2 = Field::u8(0x0F), like_nsmbu = Field::u8(0x0F)))
        .field(
            "initial_entrance_id",
            varies!(nsmb = Field::u8(0x00), default = Field::u8(0x10)),
        )
        .field(
            "coin_battle_boost_rush_entrance_id",
            varies!(like_nsmbu = Field::u8(0x13)),
        )
        .field("checkpoint_entrance_id", varies!(nsmb = Field::u8(0x01)))
        .field("is_ambush", varies!(nsmbw = Field::u8(0x11).mask_bool(0x01)))
        .field(
            "level_type_1",
            varies!(
                nsmbw = Field::u8(0x12).enumeration(enums::nsmbw_level_type()),
                nsmb2 = Field::u8(0x12).enumeration(enums::nsmb2_level_type_1()),
            ),
        )
        .field(
            "level_type_2",
            varies!(nsmb2 = Field::u8(0x13).enumeration(enums::nsmb2_level_type_2())),
        )
        .field("background_b_id_1", varies!(nsmb = Field::s16(0x06)))
        .field("background_b_id_2", varies!(nsmb = Field::s16(0x08)))
        .field("background_b_id_3", varies!(nsmb = Field::s16(0x0A)))
        .field("tileset_id_1", varies!(nsmb = Field::s16(0x0C)))
        .field("tileset_id_2", varies!(nsmb = Field::s16(0x0E)))
        .field("tileset_id_3", varies!(nsmb = Field::s16(0x10)))
        .field("background_a_id_1", varies!(nsmb = Field::s16(0x12)))
        .field("background_a_id_2", varies!(nsmb = Field::s16(0x14)))
        .field("background_a_id_3", varies!(nsmb = Field::s16(0x16)))
        .field("sound_group", varies!(nsmb = Field::u16(0x1A)))
        .field("two_d_sprite_properties", varies!(nsmb = Field::u16(0x1C)))
        .field(
            "mega_mario_groundpound_behavior",
            varies!(nsmb = Field::u16(0x1E).enumeration(enums::mega_mario_groundpound_behavior())),
        )
        .field("nsmb2_unk_11", varies!(nsmb2 = Field::u8(0x11)))
        .build()
}

shared_descriptor! {
    pub fn level_zone_bounds = LEVEL_ZONE_BOUNDS(build_level_zone_bounds);
}

fn build_level_zone_bounds() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelZoneBounds")
        .length(varies!(nsmb = 24, nsmbw = 24, nsmb2 = 28, like_nsmbu = 28))
        .field("upper", Field::s32(0x00))
        .field("lower", Field::s32(0x04))
        // used instead of upper/lower while climbing in NSMB and NSMB2
        .field("upper_2", Field::s32(0x08))
        .field("lower_2", Field::s32(0x0C))
        .field("id", Field::u32(0x10))
        .field("vertical_scroll_limit", Field::u32(0x12))
        .build()
}

shared_descriptor! {
    /// One layer of a two-layer (bgA/bgB) background. NSMB and NSMBW only.
    pub fn level_background_layer = LEVEL_BACKGROUND_LAYER(build_level_background_layer);
}

fn build_level_background_layer() -> Result<Arc<StructDescriptor<Game>>> {
    let rate = enums::background_scroll_rate();

    StructDescriptor::builder("LevelBackgroundLayer")
        .length(varies!(nsmb = 20, nsmbw = 24))
        .field("id", varies!(nsmb = Field::u16(0x00), nsmbw = Field::u16(0x00)))
        .field("tilemap_file_id", varies!(nsmb = Field::s16(0x02)))
        .field("palette_file_id", varies!(nsmb = Field::s16(0x04)))
        .field("image_file_id", varies!(nsmb = Field::s16(0x06)))
        .field("nsmb_unk_08", varies!(nsmb = Field::s16(0x08)))
        .field("nsmb_unk_0e", varies!(nsmb = Field::s16(0x0E)))
        .field("x", varies!(nsmbw = Field::s16(0x06)))
        .field("y", varies!(nsmbw = Field::s16(0x08)))
        .field(
            "x_scroll_rate",
            varies!(
                nsmb = Field::u8(0x0A).mask(0x0F).enumeration(Arc::clone(&rate)),
                nsmbw = Field::s16(0x02).enumeration(Arc::clone(&rate)),
            ),
        )
        .field(
            "y_scroll_rate",
            varies!(
                nsmb = Field::u8(0x0C).mask(0x0F).enumeration(Arc::clone(&rate)),
                nsmbw = Field::s16(0x04).enumeration(rate),
            ),
        )
        .field("move_downwards", varies!(nsmb = Field::u8(0x0C).mask_bool(0x80)))
        .field("file_id_1", varies!(nsmbw = Field::u16(0x0A)))
        .field("file_id_2", varies!(nsmbw = Field::u16(0x0C)))
        .field("file_id_3", varies!(nsmbw = Field::u16(0x0E)))
        .field(
            "zoom",
            varies!(nsmbw = Field::u8(0x13).enumeration(enums::background_zoom())),
        )
        .build()
}

shared_descriptor! {
    /// Tileset information. NSMB only.
    pub fn level_tileset_info = LEVEL_TILESET_INFO(build_level_tileset_info);
}

fn build_level_tileset_info() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelTilesetInfo")
        .length(varies!(nsmb = 20))
        .field("id", Field::u16(0x00))
        .field("tilemap_file_id", Field::s16(0x02))
        .field("palette_file_id", Field::s16(0x04))
        .field("image_file_id", Field::s16(0x06))
        .build()
}

shared_descriptor! {
    /// A "DistantView" background. NSMB2 and later.
    pub fn level_background = LEVEL_BACKGROUND(build_level_background);
}

fn build_level_background() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelBackground")
        .length(varies!(nsmb2 = 28, like_nsmbu = 28))
        .field("id", Field::u16(0x00))
        .field("x", varies!(nsmb2 = Field::u16(0x04)))
        .field("y", varies!(nsmb2 = Field::u16(0x02)))
        .field("name", Field::text(0x08, 0x10, TextEncoding::Latin1))
        .field(
            "parallax_mode",
            varies!(nsmb2 = Field::u16(0x18).enumeration(enums::nsmb2_parallax_mode())),
        )
        .field("nsmbu_unk_02", varies!(nsmbu = Field::u16(0x02)))
        .field("nsmbu_unk_04", varies!(nsmbu = Field::u16(0x04)))
        .field("nsmbu_unk_06", varies!(nsmbu = Field::u16(0x06)))
        .field("nsmbu_unk_18", varies!(nsmbu = Field::u16(0x18)))
        .build()
}

shared_descriptor! {
    /// The four tileset names of an area. Absent in NSMB.
    pub fn level_tileset_names = LEVEL_TILESET_NAMES(build_level_tileset_names);
}

fn build_level_tileset_names() -> Result<Arc<StructDescriptor<Game>>> {
    let name = |offset| Field::text(offset, 0x20, TextEncoding::Latin1);

    StructDescriptor::builder("LevelTilesetNames")
        .length(varies!(nsmbw = 0x80, nsmb2 = 0x80, like_nsmbu = 0x80))
        .field("tileset_0", name(0x00))
        .field("tileset_1", name(0x20))
        .field("tileset_2", name(0x40))
        .field("tileset_3", name(0x60))
        .build()
}

shared_descriptor! {
    pub fn level_entrance = LEVEL_ENTRANCE(build_level_entrance);
}

fn build_level_entrance() -> Result<Arc<StructDescriptor<Game>>> {
    let transition = enums::transition();

    StructDescriptor::builder("LevelEntrance")
        .length(varies!(nsmb = 20, nsmbw = 20, nsmb2 = 24, like_nsmbu = 24))
        .field("x", Field::u16(0x00))
        .field("y", Field::u16(0x02))
        .field(
            "camera_x",
            varies!(nsmb = Field::s16(0x04), nsmb2 = Field::s16(0x04), like_nsmbu = Field::s16(0x04)),
        )
        .field(
            "camera_y",
            varies!(nsmb = Field::s16(0x06), nsmb2 = Field::s16(0x06), like_nsmbu = Field::s16(0x06)),
        )
        .field("id", Field::u8(0x08))
        // doubles as "is direct pipe end" in NSMB
        .field("destination_area", Field::u8(0x09))
        // doubles as the direct pipe path id in NSMB
        .field("destination_level", varies!(nsmb = Field::u8(0x0A)))
        .field(
            "destination_id",
            varies!(nsmb = Field::u8(0x0C), default = Field::u8(0x0A)),
        )
        .field("destination_world", varies!(nsmb = Field::u8(0x0B)))
        .field("destination_world_map_node", varies!(nsmb = Field::u8(0x13)))
        .field("type", varies!(nsmb = Field::u8(0x0E), default = Field::u8(0x0B)))
        .field("zone_id", varies!(nsmb = Field::u8(0x12), default = Field::u8(0x0D)))
        .field("layer", varies!(nsmbw = Field::u8(0x0E)))
        .field("zoom", varies!(nsmb = Field::u8(0x0D)))
        .field("suppress_player_1", varies!(like_nsmbu = Field::u8(0x0C).mask_bool(0x01)))
        .field("suppress_player_2", varies!(like_nsmbu = Field::u8(0x0C).mask_bool(0x02)))
        .field("suppress_player_3", varies!(like_nsmbu = Field::u8(0x0C).mask_bool(0x04)))
        .field("suppress_player_4", varies!(like_nsmbu = Field::u8(0x0C).mask_bool(0x08)))
        // tiles between players = 1 + value / 2
        .field("distance_between_players", varies!(like_nsmbu = Field::u8(0x0F)))
        .field("baby_yoshi_entrance_id", varies!(like_nsmbu = Field::u8(0x12)))
        .field("coin_edit_order", varies!(like_nsmbu = Field::u8(0x13)))
        .field("autoscroll_path_id", varies!(like_nsmbu = Field::u8(0x14)))
        .field("autoscroll_path_node_index", varies!(like_nsmbu = Field::u8(0x15)))
        .field("nsmbw_direct_pipe_path_id", varies!(nsmbw = Field::u8(0x0F)))
        .field("nsmbw_direct_pipe_direction", varies!(nsmbw = Field::u8(0x13)))
        .field("appear_on_bottom_screen", varies!(nsmb = Field::u8(0x0F).mask_bool(0x01)))
        .field(
            "is_direct_pipe",
            varies!(nsmb = Field::u8(0x0F).mask_bool(0x08), nsmbw = Field::u16(0x10).mask_bool(0x08)),
        )
        .field(
            "transition",
            varies!(
                nsmb = Field::u8(0x0F).rshift(4).mask(0x1).enumeration(Arc::clone(&transition)),
                like_nsmbu = Field::u8(0x16).enumeration(transition),
            ),
        )
        .field(
            "non_enterable",
            varies!(nsmb = Field::u8(0x0F).mask_bool(0x80), default = Field::u16(0x10).mask_bool(0x80)),
        )
        .field("nsmbw_is_direct_pipe_end", varies!(nsmbw = Field::u16(0x10).mask_bool(0x01)))
        .field("nsmbw_flags_unk_mask_2", varies!(nsmbw = Field::u16(0x10).mask_bool(0x02)))
        .field("is_forward_pipe", varies!(nsmbw = Field::u16(0x10).mask_bool(0x04)))
        .field("nsmb2_flags_unk_mask_1", varies!(nsmb2 = Field::u16(0x10).mask_bool(0x01)))
        .field("return_to_world_map", varies!(nsmb2 = Field::u16(0x10).mask_bool(0x10)))
        .field("nsmb2_flags_unk_mask_40", varies!(nsmb2 = Field::u16(0x10).mask_bool(0x40)))
        .field("player_spawns_facing_left", varies!(like_nsmbu = Field::u16(0x10).mask_bool(0x01)))
        .field("nsmb_unk_10", varies!(nsmb = Field::u8(0x10)))
        .field("nsmb_unk_11", varies!(nsmb = Field::u8(0x11)))
        .field("nsmb2_unk_14", varies!(nsmb2 = Field::u8(0x14)))
        .field("nsmb2_unk_15", varies!(nsmb2 = Field::u8(0x15)))
        .build()
}

shared_descriptor! {
    /// One sprite. NSMB sprites have no zone or layer field.
    pub fn level_sprite = LEVEL_SPRITE(build_level_sprite);
}

fn build_level_sprite() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelSprite")
        .length(varies!(nsmb = 12, nsmbw = 16, nsmb2 = 24, like_nsmbu = 24))
        .terminator(vec![0xFF, 0xFF, 0xFF, 0xFF])
        .field("type", Field::u16(0x00))
        .field("x", Field::u16(0x02))
        .field("y", Field::u16(0x04))
        .field(
            "data_1",
            varies!(
                nsmb = Field::bytes(0x06, 6),
                nsmbw = Field::bytes(0x06, 6),
                nsmb2 = Field::bytes(0x06, 10),
                like_nsmbu = Field::bytes(0x06, 10),
            ),
        )
        .field(
            "zone_id",
            varies!(nsmbw = Field::u8(0x0C), nsmb2 = Field::u8(0x10), like_nsmbu = Field::u8(0x10)),
        )
        .field(
            "layer",
            varies!(nsmbw = Field::u8(0x0D), nsmb2 = Field::u8(0x11), like_nsmbu = Field::u8(0x11)),
        )
        .field(
            "data_2",
            varies!(nsmb2 = Field::bytes(0x12, 2), like_nsmbu = Field::bytes(0x12, 2)),
        )
        .field("initial_state", varies!(like_nsmbu = Field::u8(0x14)))
        .build()
}

shared_descriptor! {
    pub fn level_zone = LEVEL_ZONE(build_level_zone);
}

fn build_level_zone() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelZone")
        .length(varies!(nsmb = 16, nsmbw = 24, nsmb2 = 28, like_nsmbu = 28))
        .field("x", Field::s16(0x00))
        .field("y", Field::s16(0x02))
        .field_with_default("width", Field::s16(0x04), 512)
        .field_with_default("height", Field::s16(0x06), 256)
        .field(
            "theme",
            varies!(nsmb = Field::u8(0x0E), nsmbw = Field::u16(0x08), like_nsmbu = Field::u16(0x08)),
        )
        .field(
            "lighting",
            varies!(nsmbw = Field::u16(0x0A), like_nsmbu = Field::u16(0x0A)),
        )
        .field("nsmb2_unk_08", varies!(nsmb2 = Field::u16(0x0A)))
        .field_with_default(
            "id",
            varies!(nsmb = Field::u8(0x08), default = Field::u8(0x0C)),
            1,
        )
        .field("bounds_id", varies!(nsmb = Field::u8(0x09), default = Field::u8(0x0D)))
        .field(
            "tracking_settings",
            varies!(nsmbw = Field::u8(0x0E), like_nsmbu = Field::u8(0x0E)),
        )
        .field("zoom", varies!(nsmbw = Field::u8(0x0F), like_nsmbu = Field::u8(0x0F)))
        .field(
            "visibility",
            varies!(nsmbw = Field::u8(0x11), like_nsmbu = Field::u8(0x11)),
        )
        .field("bga_block_id", varies!(nsmb = Field::u8(0x0D), nsmbw = Field::u8(0x12)))
        .field("bgb_block_id", varies!(nsmb = Field::u8(0x0B), nsmbw = Field::u8(0x13)))
        .field(
            "bg_block_id",
            varies!(nsmb2 = Field::u8(0x18), like_nsmbu = Field::u8(0x12)),
        )
        .field("tileset_block_id", varies!(nsmb = Field::u8(0x0C)))
        .field(
            "multiplayer_tracking",
            varies!(nsmbw = Field::u8(0x14), nsmb2 = Field::u8(0x14), like_nsmbu = Field::u8(0x14)),
        )
        .field(
            "progress_path_id",
            varies!(nsmb = Field::u8(0x0F), nsmb2 = Field::u8(0x15)),
        )
        .field("music", varies!(nsmb = Field::u8(0x0A), default = Field::u8(0x16)))
        .field(
            "sound_modulation",
            varies!(nsmbw = Field::u8(0x17), like_nsmbu = Field::u8(0x17)),
        )
        // camera and toad-house flags
        .field("nsmbu_flags", varies!(like_nsmbu = Field::u8(0x19)))
        .build()
}

shared_descriptor! {
    pub fn level_location = LEVEL_LOCATION(build_level_location);
}

fn build_level_location() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelLocation")
        .length(PerVariant::uniform(12))
        .field("x", Field::u16(0x00))
        .field("y", Field::u16(0x02))
        .field_with_default("width", Field::u16(0x04), 128)
        .field_with_default("height", Field::u16(0x06), 128)
        .field_with_default("id", Field::u8(0x08), 1)
        .build()
}

shared_descriptor! {
    pub fn level_path = LEVEL_PATH(build_level_path);
}

fn build_level_path() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelPath")
        .length(varies!(nsmb = 8, nsmbw = 8, nsmb2 = 12, like_nsmbu = 12))
        .field_with_default("id", Field::u8(0x00), 1)
        .field("start_node_index", Field::u16(0x02))
        .field("num_nodes", Field::u16(0x04))
        // loops when 2
        .field("loop_flag", Field::u16(0x06))
        .build()
}

shared_descriptor! {
    /// A path node. Speed and acceleration are integers in NSMB and
    /// floats everywhere else.
    pub fn level_path_node = LEVEL_PATH_NODE(build_level_path_node);
}

fn build_level_path_node() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelPathNode")
        .length(varies!(nsmb = 16, nsmbw = 16, nsmb2 = 20, like_nsmbu = 20))
        .field("x", Field::u16(0x00))
        .field("y", Field::u16(0x02))
        .field("speed", varies!(nsmb = Field::s32(0x04), default = Field::f32(0x04)))
        .field(
            "acceleration",
            varies!(nsmb = Field::s32(0x08), default = Field::f32(0x08)),
        )
        .field("delay", Field::s16(0x0C))
        .field("user_data", varies!(nsmb = Field::s16(0x0E)))
        .build()
}

shared_descriptor! {
    pub fn level_progress_path = LEVEL_PROGRESS_PATH(build_level_progress_path);
}

fn build_level_progress_path() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelProgressPath")
        .length(varies!(nsmb = 8, nsmbw = 8, nsmb2 = 12, like_nsmbu = 12))
        .field_with_default("id", Field::u8(0x00), 1)
        .field("start_node_index", Field::u16(0x02))
        .field("num_nodes", Field::u16(0x04))
        .build()
}

shared_descriptor! {
    pub fn level_progress_path_node = LEVEL_PROGRESS_PATH_NODE(build_level_progress_path_node);
}

fn build_level_progress_path_node() -> Result<Arc<StructDescriptor<Game>>> {
    StructDescriptor::builder("LevelProgressPathNode")
        .length(varies!(nsmb = 16, nsmbw = 16, nsmb2 = 20, like_nsmbu = 20))
        .field("x", Field::u16(0x00))
        .field("y", Field::u16(0x02))
        .build()
}

/// Every descriptor in this module, for bulk checks.
pub fn all() -> Result<Vec<Arc<StructDescriptor<Game>>>> {
    Ok(vec![
        level_object()?,
        level_options()?,
        level_zone_bounds()?,
        level_background_layer()?,
        level_tileset_info()?,
        level_background()?,
        level_tileset_names()?,
        level_entrance()?,
        level_sprite()?,
        level_zone()?,
        level_location()?,
        level_path()?,
        level_path_node()?,
        level_progress_path()?,
        level_progress_path_node()?,
    ])
}

#[cfg(test)]
mod tests {
    use varistruct::{StructInstance, Value, Variant};

    use super::*;

    #[test]
    fn test_every_layout_fits_its_length() {
        for descriptor in all().unwrap() {
            for &game in Game::all() {
                if descriptor.supports(game) {
                    descriptor
                        .validate(game)
                        .unwrap_or_else(|e| panic!("{} in {game:?}: {e}", descriptor.name()));
                }
            }
        }
    }

    #[test]
    fn test_descriptors_are_shared() {
        assert!(Arc::ptr_eq(&level_sprite().unwrap(), &level_sprite().unwrap()));
    }

    #[test]
    fn test_zone_defaults() {
        let zone = StructInstance::new(level_zone().unwrap(), Game::Nsmbw).unwrap();

        assert_eq!(zone.get("width").unwrap(), Value::Int(512));
        assert_eq!(zone.get("height").unwrap(), Value::Int(256));
        assert_eq!(zone.get("id").unwrap(), Value::Int(1));
        assert_eq!(zone.as_bytes()[0x0C], 1);
        assert_eq!(zone.to_string(), "<LevelZone>");
    }

    #[test]
    fn test_options_flags_share_a_slot() {
        let mut options = StructInstance::new(level_options().unwrap(), Game::Nsmbu).unwrap();

        options.set("wrap_across_edges", true).unwrap();
        options.set("unk_flag_8", true).unwrap();
        assert_eq!(&options.as_bytes()[0x08..0x0A], &[0x00, 0x09]);

        options.set("wrap_across_edges", false).unwrap();
        assert_eq!(options.get("unk_flag_8").unwrap(), Value::Bool(true));
    }

    #[test]
    fn test_path_node_speed_kind_per_game() {
        let descriptor = level_path_node().unwrap();

        let mut nsmb = StructInstance::new(Arc::clone(&descriptor), Game::Nsmb).unwrap();
        nsmb.set("speed", -3).unwrap();
        assert_eq!(nsmb.get("speed").unwrap(), Value::Int(-3));

        let mut nsmbw = StructInstance::new(descriptor, Game::Nsmbw).unwrap();
        nsmbw.set("speed", 1.5).unwrap();
        assert_eq!(&nsmbw.as_bytes()[4..8], &1.5f32.to_be_bytes());
    }

    #[test]
    fn test_tileset_names() {
        let mut names = StructInstance::new(level_tileset_names().unwrap(), Game::Nsmbw).unwrap();
        names.set("tileset_0", "Pa0_jyotyu").unwrap();

        assert_eq!(&names.as_bytes()[..11], b"Pa0_jyotyu\0");
        assert_eq!(names.get("tileset_0").unwrap(), Value::Str("Pa0_jyotyu".to_string()));
        assert!(StructInstance::new(level_tileset_names().unwrap(), Game::Nsmb).is_err());
    }
}
