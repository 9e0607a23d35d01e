//! Course files: the block table and the typed course built on it.
//!
//! A course file opens with one `(offset, size)` pair of u32s per block,
//! in the game's byte order. Anything between that table and the first
//! block is kept as opaque metadata. Blocks are 4-byte aligned.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;
use varistruct::{StructInstance, Variant, bits, load_block, save_block};

use crate::{
    errors::{LevelError, Result},
    game::Game,
    geometry::{PositionAndSize, integer},
    items,
    layout::{Block, block_count, layout},
};

const ENTRY_SIZE: usize = 8;
const ALIGNMENT: usize = 4;
const USED_SPRITE_ID_SIZE: usize = 4;
const SPRITE_SETS_LENGTH: usize = 16;

/// A course file split into raw blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseBlocks {
    pub blocks: Vec<Vec<u8>>,
    /// Bytes between the block table and the first block.
    pub metadata: Vec<u8>,
}

impl CourseBlocks {
    pub fn load(game: Game, data: &[u8]) -> Result<Self> {
        let count = block_count(game);
        let header = count * ENTRY_SIZE;
        if data.len() < header {
            return Err(LevelError::TruncatedHeader {
                blocks: count,
                length: data.len(),
            });
        }

        let endianness = game.endianness();
        let mut first_start = None;
        let blocks = data[..header]
            .chunks_exact(ENTRY_SIZE)
            .enumerate()
            .map(|(index, entry)| {
                let start = bits::read_uint(&entry[..4], endianness) as usize;
                let size = bits::read_uint(&entry[4..], endianness) as usize;
                first_start.get_or_insert(start);

                start
                    .checked_add(size)
                    .and_then(|end| data.get(start..end))
                    .map(<[u8]>::to_vec)
                    .ok_or(LevelError::BlockOutOfRange {
                        index,
                        start,
                        size,
                        length: data.len(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let metadata = match first_start {
            Some(start) if start > header => data[header..start].to_vec(),
            _ => Vec::new(),
        };

        debug!(game = game.name(), blocks = blocks.len(), metadata = metadata.len(), "split course file");
        Ok(Self { blocks, metadata })
    }

    pub fn save(&self, game: Game) -> Result<Vec<u8>> {
        let expected = block_count(game);
        if self.blocks.len() != expected {
            return Err(LevelError::BlockCount {
                game: game.name(),
                expected,
                actual: self.blocks.len(),
            });
        }

        let endianness = game.endianness();
        let mut data = vec![0; self.blocks.len() * ENTRY_SIZE];
        data.extend_from_slice(&self.metadata);
        pad(&mut data);

        for (index, block) in self.blocks.iter().enumerate() {
            let entry = index * ENTRY_SIZE;
            let start = data.len() as u64;
            bits::write_uint(&mut data[entry..entry + 4], start, endianness);
            bits::write_uint(&mut data[entry + 4..entry + 8], block.len() as u64, endianness);

            data.extend_from_slice(block);
            pad(&mut data);
        }

        debug!(game = game.name(), length = data.len(), "joined course file");
        Ok(data)
    }
}

fn pad(data: &mut Vec<u8>) {
    data.resize(data.len().next_multiple_of(ALIGNMENT), 0);
}

/// A course file with every block decoded into items.
///
/// Fields for blocks a game does not have stay empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Course {
    pub tileset_names: Option<StructInstance<Game>>,
    pub options: Option<StructInstance<Game>>,
    pub zone_bounds: Vec<StructInstance<Game>>,
    pub backgrounds_a: Vec<StructInstance<Game>>,
    pub backgrounds_b: Vec<StructInstance<Game>>,
    pub tileset_infos: Vec<StructInstance<Game>>,
    pub backgrounds: Vec<StructInstance<Game>>,
    pub entrances: Vec<StructInstance<Game>>,
    pub sprites: Vec<StructInstance<Game>>,
    pub used_sprite_ids: BTreeSet<u16>,
    pub zones: Vec<StructInstance<Game>>,
    pub locations: Vec<StructInstance<Game>>,
    pub paths: Vec<StructInstance<Game>>,
    pub path_nodes: Vec<StructInstance<Game>>,
    pub progress_paths: Vec<StructInstance<Game>>,
    pub progress_path_nodes: Vec<StructInstance<Game>>,
    /// NSMB only.
    pub sprite_sets: Vec<u8>,
    /// Blocks without a decoder, by block index. Each is cut into
    /// fixed-size entries where the format has them, otherwise it is a
    /// single entry.
    pub unparsed_blocks: BTreeMap<usize, Vec<Vec<u8>>>,
    pub metadata: Vec<u8>,
}

/// Fix-ups [`Course::prepare_for_saving`] applies. All are on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavePreparation {
    /// Point every sprite at the zone containing it, or the nearest one.
    pub update_sprite_zone_ids: bool,
    pub sort_sprites_by_zone: bool,
    pub update_used_sprite_ids: bool,
}

impl Default for SavePreparation {
    fn default() -> Self {
        Self {
            update_sprite_zone_ids: true,
            sort_sprites_by_zone: true,
            update_used_sprite_ids: true,
        }
    }
}

impl Course {
    /// An empty course that saves as-is in `game`.
    pub fn new(game: Game) -> Result<Self> {
        let mut course = Self::default();
        for (index, block) in layout(game).iter().enumerate() {
            match *block {
                Block::TilesetNames => {
                    course.tileset_names = Some(StructInstance::new(items::level_tileset_names()?, game)?);
                }
                Block::Options => course.options = Some(StructInstance::new(items::level_options()?, game)?),
                Block::SpriteSets => course.sprite_sets = vec![0; SPRITE_SETS_LENGTH],
                Block::Raw { split } => {
                    course.unparsed_blocks.insert(index, split_raw(&[], split));
                }
                _ => {}
            }
        }
        Ok(course)
    }

    pub fn load(game: Game, data: &[u8]) -> Result<Self> {
        let CourseBlocks { blocks, metadata } = CourseBlocks::load(game, data)?;
        let mut course = Self {
            metadata,
            ..Self::default()
        };

        for (index, (block, data)) in layout(game).iter().zip(&blocks).enumerate() {
            course.decode_block(game, index, *block, data)?;
        }

        debug!(
            game = game.name(),
            sprites = course.sprites.len(),
            zones = course.zones.len(),
            "loaded course"
        );
        Ok(course)
    }

    pub fn save(&self, game: Game) -> Result<Vec<u8>> {
        let blocks = layout(game)
            .iter()
            .enumerate()
            .map(|(index, block)| self.encode_block(game, index, *block))
            .collect::<Result<Vec<_>>>()?;

        CourseBlocks {
            blocks,
            metadata: self.metadata.clone(),
        }
        .save(game)
    }

    fn decode_block(&mut self, game: Game, index: usize, block: Block, data: &[u8]) -> Result<()> {
        match block {
            Block::TilesetNames => {
                self.tileset_names = Some(StructInstance::load(items::level_tileset_names()?, game, data)?);
            }
            Block::Options => self.options = Some(StructInstance::load(items::level_options()?, game, data)?),
            Block::ZoneBounds => self.zone_bounds = load_block(&items::level_zone_bounds()?, game, data)?,
            Block::BackgroundsA => self.backgrounds_a = load_block(&items::level_background_layer()?, game, data)?,
            Block::BackgroundsB => self.backgrounds_b = load_block(&items::level_background_layer()?, game, data)?,
            Block::TilesetInfos => self.tileset_infos = load_block(&items::level_tileset_info()?, game, data)?,
            Block::Backgrounds => self.backgrounds = load_block(&items::level_background()?, game, data)?,
            Block::Entrances => self.entrances = load_block(&items::level_entrance()?, game, data)?,
            Block::Sprites => self.sprites = load_block(&items::level_sprite()?, game, data)?,
            Block::UsedSpriteIds => self.used_sprite_ids = load_used_sprite_ids(game, data),
            Block::Zones => self.zones = load_block(&items::level_zone()?, game, data)?,
            Block::Locations => self.locations = load_block(&items::level_location()?, game, data)?,
            Block::Paths => self.paths = load_block(&items::level_path()?, game, data)?,
            Block::PathNodes => self.path_nodes = load_block(&items::level_path_node()?, game, data)?,
            Block::ProgressPaths => self.progress_paths = load_block(&items::level_progress_path()?, game, data)?,
            Block::ProgressPathNodes => {
                self.progress_path_nodes = load_block(&items::level_progress_path_node()?, game, data)?;
            }
            Block::SpriteSets => {
                if data.len() != SPRITE_SETS_LENGTH {
                    return Err(LevelError::SpriteSets { length: data.len() });
                }
                self.sprite_sets = data.to_vec();
            }
            Block::Raw { split } => {
                self.unparsed_blocks.insert(index, split_raw(data, split));
            }
        }
        Ok(())
    }

    fn encode_block(&self, game: Game, index: usize, block: Block) -> Result<Vec<u8>> {
        let missing = || LevelError::MissingBlock {
            block,
            game: game.name(),
        };

        let data = match block {
            Block::TilesetNames => {
                let names = self.tileset_names.as_ref().ok_or_else(missing)?;
                save_block(&items::level_tileset_names()?, game, std::slice::from_ref(names))?
            }
            Block::Options => {
                let options = self.options.as_ref().ok_or_else(missing)?;
                save_block(&items::level_options()?, game, std::slice::from_ref(options))?
            }
            Block::ZoneBounds => save_block(&items::level_zone_bounds()?, game, &self.zone_bounds)?,
            Block::BackgroundsA => save_block(&items::level_background_layer()?, game, &self.backgrounds_a)?,
            Block::BackgroundsB => save_block(&items::level_background_layer()?, game, &self.backgrounds_b)?,
            Block::TilesetInfos => save_block(&items::level_tileset_info()?, game, &self.tileset_infos)?,
            Block::Backgrounds => save_block(&items::level_background()?, game, &self.backgrounds)?,
            Block::Entrances => save_block(&items::level_entrance()?, game, &self.entrances)?,
            Block::Sprites => save_block(&items::level_sprite()?, game, &self.sprites)?,
            Block::UsedSpriteIds => save_used_sprite_ids(game, &self.used_sprite_ids),
            Block::Zones => save_block(&items::level_zone()?, game, &self.zones)?,
            Block::Locations => save_block(&items::level_location()?, game, &self.locations)?,
            Block::Paths => save_block(&items::level_path()?, game, &self.paths)?,
            Block::PathNodes => save_block(&items::level_path_node()?, game, &self.path_nodes)?,
            Block::ProgressPaths => save_block(&items::level_progress_path()?, game, &self.progress_paths)?,
            Block::ProgressPathNodes => {
                save_block(&items::level_progress_path_node()?, game, &self.progress_path_nodes)?
            }
            Block::SpriteSets => {
                if self.sprite_sets.len() != SPRITE_SETS_LENGTH {
                    return Err(LevelError::SpriteSets {
                        length: self.sprite_sets.len(),
                    });
                }
                self.sprite_sets.clone()
            }
            Block::Raw { .. } => self.unparsed_blocks.get(&index).ok_or_else(missing)?.concat(),
        };
        Ok(data)
    }

    /// The first zone containing `(x, y)`, edges included, or else the
    /// nearest one. `None` only when there are no zones.
    pub fn zone_at(&self, x: i32, y: i32) -> varistruct::Result<Option<&StructInstance<Game>>> {
        let mut nearest: Option<(f64, &StructInstance<Game>)> = None;
        for zone in &self.zones {
            let (left, top, width, height) = zone.dimensions()?;
            let dx = outside(x, left, left + width);
            let dy = outside(y, top, top + height);
            if dx == 0 && dy == 0 {
                return Ok(Some(zone));
            }

            let distance = f64::from(dx).hypot(f64::from(dy));
            if nearest.is_none_or(|(best, _)| distance < best) {
                nearest = Some((distance, zone));
            }
        }
        Ok(nearest.map(|(_, zone)| zone))
    }

    /// Brings sprite bookkeeping in line with the sprites themselves.
    ///
    /// Zone steps are skipped in games whose sprites have no zone id.
    /// Sprites fall back to zone 0 when the course has no zones.
    pub fn prepare_for_saving(&mut self, game: Game, steps: SavePreparation) -> Result<()> {
        let has_zone_ids = items::level_sprite()?
            .field("zone_id")
            .is_some_and(|field| field.layout(game).is_some());

        if steps.update_sprite_zone_ids && has_zone_ids {
            let zone_ids = self
                .sprites
                .iter()
                .map(|sprite| {
                    let (x, y) = sprite.position()?;
                    match self.zone_at(x, y)? {
                        Some(zone) => integer::<i128>(zone, "id"),
                        None => Ok(0),
                    }
                })
                .collect::<varistruct::Result<Vec<_>>>()?;

            for (sprite, zone_id) in self.sprites.iter_mut().zip(zone_ids) {
                sprite.set("zone_id", zone_id)?;
            }
        }

        if steps.sort_sprites_by_zone && has_zone_ids {
            let keys = self
                .sprites
                .iter()
                .map(|sprite| integer::<i128>(sprite, "zone_id"))
                .collect::<varistruct::Result<Vec<_>>>()?;
            let mut keyed: Vec<_> = keys.into_iter().zip(std::mem::take(&mut self.sprites)).collect();
            keyed.sort_by_key(|(key, _)| *key);
            self.sprites = keyed.into_iter().map(|(_, sprite)| sprite).collect();
        }

        if steps.update_used_sprite_ids {
            self.used_sprite_ids = self
                .sprites
                .iter()
                .map(|sprite| integer::<u16>(sprite, "type"))
                .collect::<varistruct::Result<_>>()?;
        }

        debug!(game = game.name(), sprites = self.sprites.len(), "prepared course for saving");
        Ok(())
    }
}

/// How far `point` lies outside `start..=end`.
fn outside(point: i32, start: i32, end: i32) -> i32 {
    if point < start {
        start - point
    } else if point > end {
        point - end
    } else {
        0
    }
}

fn split_raw(data: &[u8], split: Option<usize>) -> Vec<Vec<u8>> {
    match split {
        Some(size) => data.chunks(size).map(<[u8]>::to_vec).collect(),
        None => vec![data.to_vec()],
    }
}

fn load_used_sprite_ids(game: Game, data: &[u8]) -> BTreeSet<u16> {
    data.chunks_exact(USED_SPRITE_ID_SIZE)
        .map(|entry| bits::read_uint(&entry[..2], game.endianness()) as u16)
        .collect()
}

fn save_used_sprite_ids(game: Game, ids: &BTreeSet<u16>) -> Vec<u8> {
    let mut data = vec![0; ids.len() * USED_SPRITE_ID_SIZE];
    for (entry, id) in data.chunks_exact_mut(USED_SPRITE_ID_SIZE).zip(ids) {
        bits::write_uint(&mut entry[..2], u64::from(*id), game.endianness());
    }
    data
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use varistruct::Value;

    use super::*;

    fn blocks(game: Game) -> CourseBlocks {
        CourseBlocks {
            blocks: (0..block_count(game)).map(|i| vec![i as u8; i % 6]).collect(),
            metadata: vec![0xAB; 3],
        }
    }

    #[test]
    fn test_round_trip() {
        for game in [Game::Nsmb, Game::Nsmbw, Game::Nsmb2, Game::Nsmbudx] {
            let course = blocks(game);
            let data = course.save(game).unwrap();

            assert_eq!(data.len() % 4, 0);
            assert_eq!(CourseBlocks::load(game, &data).unwrap().blocks, course.blocks);
        }
    }

    #[test]
    fn test_header_uses_game_byte_order() {
        let data = blocks(Game::Nsmbw).save(Game::Nsmbw).unwrap();

        // 14 entries, 3 bytes of metadata padded to 4
        assert_eq!(&data[..4], &[0, 0, 0, 116]);
        assert_eq!(&data[112..116], &[0xAB, 0xAB, 0xAB, 0]);

        let data = blocks(Game::Nsmb).save(Game::Nsmb).unwrap();
        assert_eq!(&data[..4], &[116, 0, 0, 0]);
    }

    #[test]
    fn test_metadata_keeps_padding() {
        let course = blocks(Game::Nsmb2);
        let data = course.save(Game::Nsmb2).unwrap();

        assert_eq!(CourseBlocks::load(Game::Nsmb2, &data).unwrap().metadata, vec![0xAB, 0xAB, 0xAB, 0]);
    }

    #[test]
    fn test_truncated_header() {
        assert_eq!(
            CourseBlocks::load(Game::Nsmbu, &[0; 16]).unwrap_err(),
            LevelError::TruncatedHeader { blocks: 15, length: 16 }
        );
    }

    #[test]
    fn test_block_out_of_range() {
        let mut data = blocks(Game::Nsmbu).save(Game::Nsmbu).unwrap();
        data[8 + 7] = 0xF0; // size of block 1

        assert!(matches!(
            CourseBlocks::load(Game::Nsmbu, &data),
            Err(LevelError::BlockOutOfRange { index: 1, size: 0xF0, .. })
        ));
    }

    #[test]
    fn test_wrong_block_count() {
        assert!(matches!(
            blocks(Game::Nsmb).save(Game::Nsmb2),
            Err(LevelError::BlockCount { expected: 17, actual: 14, .. })
        ));
    }

    fn populated(game: Game) -> Course {
        let mut course = Course::new(game).unwrap();
        let sprite = items::level_sprite().unwrap();
        course.sprites = vec![
            StructInstance::with_values(Arc::clone(&sprite), game, [("type", 20), ("x", 32)]).unwrap(),
            StructInstance::with_values(sprite, game, [("type", 3), ("y", 48)]).unwrap(),
        ];
        course.zones = vec![StructInstance::new(items::level_zone().unwrap(), game).unwrap()];
        course.locations =
            vec![StructInstance::with_values(items::level_location().unwrap(), game, [("x", 16), ("id", 2)]).unwrap()];
        course.entrances =
            vec![StructInstance::with_values(items::level_entrance().unwrap(), game, [("id", 1)]).unwrap()];
        course.paths = vec![StructInstance::new(items::level_path().unwrap(), game).unwrap(); 2];
        course.metadata = vec![0x5A; 8];

        for (index, block) in layout(game).iter().enumerate() {
            match *block {
                Block::UsedSpriteIds => course.used_sprite_ids = BTreeSet::from([3, 20]),
                Block::SpriteSets => course.sprite_sets[5] = 2,
                Block::Raw { split } => {
                    course.unparsed_blocks.insert(index, split_raw(&[index as u8; 20], split));
                }
                _ => {}
            }
        }
        course
    }

    #[test]
    fn test_course_round_trip_in_every_game() {
        for game in Game::ALL {
            let course = populated(game);
            let data = course.save(game).unwrap();
            let loaded = Course::load(game, &data).unwrap();

            assert_eq!(loaded, course, "{game}");
            assert_eq!(loaded.save(game).unwrap(), data, "{game}");
        }
    }

    #[test]
    fn test_raw_blocks_keep_their_entries() {
        let data = populated(Game::Nsmbu).save(Game::Nsmbu).unwrap();
        let course = Course::load(Game::Nsmbu, &data).unwrap();

        let lengths = |index: usize| -> Vec<usize> { course.unparsed_blocks[&index].iter().map(Vec::len).collect() };
        assert_eq!(lengths(3), [8, 8, 4]);
        assert_eq!(lengths(5), [10, 10]);
        assert_eq!(lengths(11), [20]);
    }

    #[test]
    fn test_used_sprite_ids_are_sorted_in_game_byte_order() {
        let ids = BTreeSet::from([0x0102, 3]);

        assert_eq!(save_used_sprite_ids(Game::Nsmbw, &ids), [0, 3, 0, 0, 1, 2, 0, 0]);
        assert_eq!(save_used_sprite_ids(Game::Nsmb2, &ids), [3, 0, 0, 0, 2, 1, 0, 0]);
        // a trailing partial entry is ignored
        assert_eq!(load_used_sprite_ids(Game::Nsmb2, &[3, 0, 0, 0, 2, 1, 0, 0, 9]), ids);
    }

    #[test]
    fn test_sprite_sets_must_be_sixteen_bytes() {
        let mut course = Course::new(Game::Nsmb).unwrap();
        course.sprite_sets.pop();

        assert_eq!(course.save(Game::Nsmb).unwrap_err(), LevelError::SpriteSets { length: 15 });
    }

    #[test]
    fn test_missing_options_block() {
        let mut course = Course::new(Game::Nsmbu).unwrap();
        course.options = None;

        assert_eq!(
            course.save(Game::Nsmbu).unwrap_err(),
            LevelError::MissingBlock {
                block: Block::Options,
                game: "NSMBU",
            }
        );
    }

    #[test]
    fn test_course_items_belong_to_one_game() {
        let course = populated(Game::Nsmbu);

        assert!(matches!(
            course.save(Game::Nsmbudx),
            Err(LevelError::Struct(varistruct::Error::ForeignItem { .. }))
        ));
    }

    #[test]
    fn test_zone_at_prefers_containing_then_nearest() {
        let zone = items::level_zone().unwrap();
        let mut course = Course::new(Game::Nsmbw).unwrap();
        course.zones = vec![
            StructInstance::with_values(Arc::clone(&zone), Game::Nsmbw, [("x", 0), ("id", 0)]).unwrap(),
            StructInstance::with_values(zone, Game::Nsmbw, [("x", 1024), ("id", 1)]).unwrap(),
        ];

        let id = |x, y| course.zone_at(x, y).unwrap().map(|zone| zone.get("id").unwrap());
        assert_eq!(id(512, 256), Some(Value::Int(0)));
        assert_eq!(id(900, 10), Some(Value::Int(1)));
        assert_eq!(id(600, 300), Some(Value::Int(0)));
        assert_eq!(Course::default().zone_at(0, 0).unwrap(), None);
    }

    #[test]
    fn test_prepare_for_saving_assigns_and_sorts_by_zone() {
        let game = Game::Nsmb2;
        let mut course = Course::new(game).unwrap();
        let zone = items::level_zone().unwrap();
        course.zones = vec![
            StructInstance::with_values(Arc::clone(&zone), game, [("x", 0), ("id", 4)]).unwrap(),
            StructInstance::with_values(zone, game, [("x", 2048), ("id", 2)]).unwrap(),
        ];
        let sprite = items::level_sprite().unwrap();
        course.sprites = vec![
            StructInstance::with_values(Arc::clone(&sprite), game, [("type", 30), ("x", 16)]).unwrap(),
            StructInstance::with_values(sprite, game, [("type", 7), ("x", 2100)]).unwrap(),
        ];

        course.prepare_for_saving(game, SavePreparation::default()).unwrap();

        let placed: Vec<_> = course
            .sprites
            .iter()
            .map(|sprite| (sprite.get("type").unwrap(), sprite.get("zone_id").unwrap()))
            .collect();
        assert_eq!(placed, [(Value::Int(7), Value::Int(2)), (Value::Int(30), Value::Int(4))]);
        assert_eq!(course.used_sprite_ids, BTreeSet::from([7, 30]));
    }

    #[test]
    fn test_nsmb_sprites_keep_their_order() {
        let game = Game::Nsmb;
        let mut course = Course::new(game).unwrap();
        let sprite = items::level_sprite().unwrap();
        course.sprites = vec![
            StructInstance::with_values(Arc::clone(&sprite), game, [("type", 9)]).unwrap(),
            StructInstance::with_values(sprite, game, [("type", 4)]).unwrap(),
        ];

        course.prepare_for_saving(game, SavePreparation::default()).unwrap();

        assert_eq!(course.sprites[0].get("type").unwrap(), Value::Int(9));
        assert_eq!(course.used_sprite_ids, BTreeSet::from([4, 9]));
    }
}
