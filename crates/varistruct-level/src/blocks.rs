//! Loading and saving whole blocks of level items.

use varistruct::{Result, StructInstance, load_block, save_block};

use crate::{game::Game, items};

/// Reads a bgdat file: level objects followed by `FF FF`.
pub fn load_bgdat(game: Game, data: &[u8]) -> Result<Vec<StructInstance<Game>>> {
    load_block(&items::level_object()?, game, data)
}

pub fn save_bgdat(game: Game, objects: &[StructInstance<Game>]) -> Result<Vec<u8>> {
    save_block(&items::level_object()?, game, objects)
}

/// Reads a sprites block: sprites followed by `FF FF FF FF`.
pub fn load_sprites(game: Game, data: &[u8]) -> Result<Vec<StructInstance<Game>>> {
    load_block(&items::level_sprite()?, game, data)
}

pub fn save_sprites(game: Game, sprites: &[StructInstance<Game>]) -> Result<Vec<u8>> {
    save_block(&items::level_sprite()?, game, sprites)
}
