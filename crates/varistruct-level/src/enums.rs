//! Enums used by level item fields.
//!
//! Each is built once and shared by every descriptor that casts to it.

use std::sync::{Arc, LazyLock};

use varistruct::{EnumMember, PerVariant, VariantEnum};

use crate::{game::Game, macros::varies};

fn scaled(name: &str, values: PerVariant<Game, i128>, semantic: f64) -> EnumMember<Game> {
    EnumMember::new(name, values).with_semantic(semantic)
}

static TRANSITION: LazyLock<Arc<VariantEnum<Game>>> = LazyLock::new(|| {
    Arc::new(
        VariantEnum::new("Transition")
            .member("DEFAULT", 0)
            .member("FORCE_FADE", varies!(like_nsmbu = 1))
            .member("FORCE_MARIO_HEAD", varies!(like_nsmbu = 2))
            .member("FORCE_CIRCLE_TOWARDS_CENTER", varies!(like_nsmbu = 3))
            .member("FORCE_BOWSER_HEAD", varies!(like_nsmbu = 4))
            .member("FORCE_CIRCLE_TOWARDS_ENTRANCE_1", varies!(like_nsmbu = 5))
            .member("FORCE_WAVES_DOWN", varies!(nsmb = 1, like_nsmbu = 6))
            // down on fade-out, up on fade-in
            .member("FORCE_WAVES_DOWN_UP", varies!(like_nsmbu = 7))
            .member("FORCE_WAVES_UP_DOWN", varies!(like_nsmbu = 8))
            .member("FORCE_MUSHROOM", varies!(like_nsmbu = 9))
            .member("FORCE_CIRCLE_TOWARDS_ENTRANCE_2", varies!(like_nsmbu = 10))
            .member("FORCE_NONE", varies!(like_nsmbu = 11)),
    )
});

/// How the screen transitions when a player enters through an entrance.
pub fn transition() -> Arc<VariantEnum<Game>> {
    Arc::clone(&TRANSITION)
}

static GROUNDPOUND_BEHAVIOR: LazyLock<Arc<VariantEnum<Game>>> = LazyLock::new(|| {
    Arc::new(
        VariantEnum::new("MegaMarioGroundpoundBehavior")
            .member("SPAWN_GOOMBAS_AND_COINS", varies!(nsmb = 0))
            .member("SPAWN_COINS", varies!(nsmb = 1))
            .member("SPAWN_NOTHING", varies!(nsmb = 2)),
    )
});

pub fn mega_mario_groundpound_behavior() -> Arc<VariantEnum<Game>> {
    Arc::clone(&GROUNDPOUND_BEHAVIOR)
}

static NSMBW_LEVEL_TYPE: LazyLock<Arc<VariantEnum<Game>>> = LazyLock::new(|| {
    Arc::new(
        VariantEnum::new("NSMBWLevelType")
            .member("NORMAL", varies!(nsmbw = 0))
            .member("YELLOW_TOAD_HOUSE", varies!(nsmbw = 1))
            .member("RED_TOAD_HOUSE", varies!(nsmbw = 2))
            .member("GREEN_TOAD_HOUSE", varies!(nsmbw = 3)),
    )
});

pub fn nsmbw_level_type() -> Arc<VariantEnum<Game>> {
    Arc::clone(&NSMBW_LEVEL_TYPE)
}

static NSMB2_LEVEL_TYPE_1: LazyLock<Arc<VariantEnum<Game>>> = LazyLock::new(|| {
    Arc::new(
        VariantEnum::new("NSMB2LevelType1")
            .member("NORMAL", varies!(nsmb2 = 0))
            .member("RED_OR_YELLOW_TOAD_HOUSE", varies!(nsmb2 = 2))
            .member("GREEN_TOAD_HOUSE", varies!(nsmb2 = 3))
            .member("RAINBOW_COURSE", varies!(nsmb2 = 4))
            .member("CREDITS", varies!(nsmb2 = 5))
            .member("CANNON", varies!(nsmb2 = 6))
            .member("FROZEN_TIMER", varies!(nsmb2 = 7)),
    )
});

pub fn nsmb2_level_type_1() -> Arc<VariantEnum<Game>> {
    Arc::clone(&NSMB2_LEVEL_TYPE_1)
}

static NSMB2_LEVEL_TYPE_2: LazyLock<Arc<VariantEnum<Game>>> = LazyLock::new(|| {
    Arc::new(
        VariantEnum::new("NSMB2LevelType2")
            .member("NORMAL", varies!(nsmb2 = 0))
            .member("GHOST_HOUSE", varies!(nsmb2 = 1))
            .member("REZNOR_BATTLE", varies!(nsmb2 = 7)),
    )
});

pub fn nsmb2_level_type_2() -> Arc<VariantEnum<Game>> {
    Arc::clone(&NSMB2_LEVEL_TYPE_2)
}

static BACKGROUND_SCROLL_RATE: LazyLock<Arc<VariantEnum<Game>>> = LazyLock::new(|| {
    Arc::new(
        VariantEnum::new("BackgroundScrollRate")
            .with_member(scaled("RATE_0_0", varies!(nsmbw = 0), 0.0))
            .with_member(scaled("RATE_0_0_ALT", varies!(nsmbw = 9), 0.0))
            .with_member(scaled("RATE_0_0625", varies!(nsmb = 6), 0.0625))
            .with_member(scaled("RATE_0_09375", varies!(nsmb = 7), 0.09375))
            .with_member(scaled("RATE_0_125", varies!(nsmb = 3, nsmbw = 1), 0.125))
            .with_member(scaled("RATE_0_203125", varies!(nsmb = 8, nsmbw = 1), 0.203125))
            .with_member(scaled("RATE_0_25", varies!(nsmb = 2, nsmbw = 2), 0.25))
            .with_member(scaled("RATE_0_375", varies!(nsmbw = 3), 0.375))
            .with_member(scaled("RATE_0_5", varies!(nsmb = 1, nsmbw = 4), 0.5))
            .with_member(scaled("RATE_0_625", varies!(nsmbw = 5), 0.625))
            .with_member(scaled("RATE_0_75", varies!(nsmb = 5, nsmbw = 6), 0.75))
            .with_member(scaled("RATE_0_875", varies!(nsmbw = 7), 0.875))
            .with_member(scaled("RATE_1_0", varies!(nsmb = 0, nsmbw = 8), 1.0))
            .with_member(scaled("RATE_1_0_ALT_1", varies!(nsmb = 9), 1.0))
            .with_member(scaled("RATE_1_0_ALT_2", varies!(nsmb = 10), 1.0))
            .with_member(scaled("RATE_1_0_ALT_3", varies!(nsmb = 11), 1.0))
            .with_member(scaled("RATE_1_0_ALT_4", varies!(nsmb = 12), 1.0))
            .with_member(scaled("RATE_1_2", varies!(nsmb = 4, nsmbw = 10), 1.2))
            .with_member(scaled("RATE_1_5", varies!(nsmbw = 11), 1.5))
            .with_member(scaled("RATE_2_0", varies!(nsmb = 13, nsmbw = 12), 2.0))
            .with_member(scaled("RATE_4_0", varies!(nsmb = 14, nsmbw = 13), 4.0))
            .with_member(scaled("RATE_8_0", varies!(nsmb = 15), 8.0)),
    )
});

/// Background scroll rates. The semantic value is the rate relative to
/// the foreground.
pub fn background_scroll_rate() -> Arc<VariantEnum<Game>> {
    Arc::clone(&BACKGROUND_SCROLL_RATE)
}

static BACKGROUND_ZOOM: LazyLock<Arc<VariantEnum<Game>>> = LazyLock::new(|| {
    Arc::new(
        VariantEnum::new("BackgroundZoom")
            .with_member(scaled("ZOOM_100_0", varies!(nsmbw = 0), 100.0))
            .with_member(scaled("ZOOM_125_0", varies!(nsmbw = 1), 125.0))
            .with_member(scaled("ZOOM_150_0", varies!(nsmbw = 2), 150.0))
            .with_member(scaled("ZOOM_200_0", varies!(nsmbw = 3), 200.0)),
    )
});

/// Background zoom levels, in percent.
pub fn background_zoom() -> Arc<VariantEnum<Game>> {
    Arc::clone(&BACKGROUND_ZOOM)
}

static NSMB2_PARALLAX_MODE: LazyLock<Arc<VariantEnum<Game>>> = LazyLock::new(|| {
    Arc::new(
        VariantEnum::new("NSMB2ParallaxMode")
            // ignores the background's y field
            .member("PARALLAX_X_Y_IGNORE_Y_OFFSET", varies!(nsmb2 = 0))
            .member("PARALLAX_X_Y", varies!(nsmb2 = 1))
            .member("PARALLAX_NONE", varies!(nsmb2 = 2))
            .member("PARALLAX_X", varies!(nsmb2 = 3))
            .member("PARALLAX_Y", varies!(nsmb2 = 4))
            .member("UNKNOWN_5", varies!(nsmb2 = 5)),
    )
});

pub fn nsmb2_parallax_mode() -> Arc<VariantEnum<Game>> {
    Arc::clone(&NSMB2_PARALLAX_MODE)
}

/// Every level enum.
pub fn all() -> Vec<Arc<VariantEnum<Game>>> {
    vec![
        transition(),
        mega_mario_groundpound_behavior(),
        nsmbw_level_type(),
        nsmb2_level_type_1(),
        nsmb2_level_type_2(),
        background_scroll_rate(),
        background_zoom(),
        nsmb2_parallax_mode(),
    ]
}
