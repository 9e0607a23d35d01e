//! What each block of a course file holds, per game.

use crate::game::Game;

/// The contents of one course file block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    /// One `LevelTilesetNames` struct.
    TilesetNames,
    /// One `LevelOptions` struct.
    Options,
    ZoneBounds,
    BackgroundsA,
    BackgroundsB,
    TilesetInfos,
    Backgrounds,
    Entrances,
    Sprites,
    /// Sprite types in use, a u16 and two bytes of padding each.
    UsedSpriteIds,
    Zones,
    Locations,
    Paths,
    PathNodes,
    ProgressPaths,
    ProgressPathNodes,
    /// Exactly 16 sprite set choices.
    SpriteSets,
    /// Kept as bytes, cut into entries of `split` bytes when given.
    Raw { split: Option<usize> },
}

use Block::*;

const NSMB: [Block; 14] = [
    Options,
    ZoneBounds,
    BackgroundsB,
    TilesetInfos,
    BackgroundsA,
    Entrances,
    Sprites,
    Zones,
    Locations,
    ProgressPaths,
    Paths,
    ProgressPathNodes,
    PathNodes,
    SpriteSets,
];

const NSMBW: [Block; 14] = [
    TilesetNames,
    Options,
    ZoneBounds,
    Raw { split: Some(8) },
    BackgroundsA,
    BackgroundsB,
    Entrances,
    Sprites,
    UsedSpriteIds,
    Zones,
    Locations,
    Raw { split: None },
    Paths,
    PathNodes,
];

const NSMB2: [Block; 17] = [
    TilesetNames,
    Options,
    ZoneBounds,
    Raw { split: Some(8) },
    Backgrounds,
    Raw { split: None },
    Entrances,
    Sprites,
    UsedSpriteIds,
    Zones,
    Locations,
    Raw { split: None },
    Raw { split: None },
    Paths,
    PathNodes,
    ProgressPaths,
    ProgressPathNodes,
];

const LIKE_NSMBU: [Block; 15] = [
    TilesetNames,
    Options,
    ZoneBounds,
    Raw { split: Some(8) },
    Backgrounds,
    Raw { split: Some(10) },
    Entrances,
    Sprites,
    UsedSpriteIds,
    Zones,
    Locations,
    Raw { split: None },
    Raw { split: None },
    Paths,
    PathNodes,
];

/// The blocks of a course file in `game`, in file order.
pub fn layout(game: Game) -> &'static [Block] {
    match game {
        Game::Nsmb => &NSMB,
        Game::Nsmbw => &NSMBW,
        Game::Nsmb2 => &NSMB2,
        Game::Nsmbu | Game::Nslu | Game::Nsmbudx => &LIKE_NSMBU,
    }
}

/// How many blocks a course file has in `game`.
pub fn block_count(game: Game) -> usize {
    layout(game).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_counts() {
        let counts: Vec<_> = Game::ALL.into_iter().map(block_count).collect();
        assert_eq!(counts, [14, 14, 17, 15, 15, 15]);
    }

    #[test]
    fn test_sprites_move_after_nsmb() {
        assert_eq!(layout(Game::Nsmb)[6], Sprites);
        for game in [Game::Nsmbw, Game::Nsmb2, Game::Nsmbu] {
            assert_eq!(layout(game)[7], Sprites);
            assert_eq!(layout(game)[8], UsedSpriteIds);
        }
    }

    #[test]
    fn test_only_nsmb_has_sprite_sets() {
        for game in Game::ALL {
            assert_eq!(layout(game).contains(&SpriteSets), game == Game::Nsmb);
            assert_eq!(layout(game).contains(&TilesetNames), game != Game::Nsmb);
        }
    }
}
