use proptest::prelude::*;
use varistruct::{StructInstance, Value};
use varistruct_level::{CourseBlocks, Game, block_count, items, load_sprites, save_sprites};

fn any_game() -> impl Strategy<Value = Game> {
    prop::sample::select(Game::ALL.to_vec())
}

proptest! {
    #[test]
    fn sprites_round_trip(game in any_game(), seed in prop::collection::vec(any::<u8>(), 0..96)) {
        let length = items::level_sprite().unwrap().length(game).unwrap();
        let mut data = seed[..seed.len() - seed.len() % length].to_vec();
        data.extend_from_slice(&[0xFF; 4]);

        let sprites = load_sprites(game, &data).unwrap();
        prop_assert_eq!(sprites.len(), (data.len() - 4) / length);
        prop_assert_eq!(save_sprites(game, &sprites).unwrap(), data);
    }

    #[test]
    fn object_type_keeps_tileset(game in any_game(), tileset in 0..16i32, kind in 0..0x1000i32, raw in any::<[u8; 16]>()) {
        let descriptor = items::level_object().unwrap();
        let length = descriptor.length(game).unwrap();
        let mut object = StructInstance::load(descriptor, game, &raw[..length]).unwrap();

        object.set("tileset_id", tileset).unwrap();
        object.set("type", kind).unwrap();

        prop_assert_eq!(object.get("tileset_id").unwrap(), Value::from(tileset));
        prop_assert_eq!(object.get("type").unwrap(), Value::from(kind));
        prop_assert_eq!(&object.as_bytes()[2..], &raw[2..length]);
    }

    #[test]
    fn course_blocks_round_trip(
        game in any_game(),
        sizes in prop::collection::vec(0usize..40, 17),
        metadata in prop::collection::vec(any::<u8>(), 0..8),
    ) {
        let blocks: Vec<Vec<u8>> = sizes[..block_count(game)]
            .iter()
            .enumerate()
            .map(|(i, &size)| vec![i as u8; size])
            .collect();
        let course = CourseBlocks { blocks, metadata };

        let data = course.save(game).unwrap();
        let loaded = CourseBlocks::load(game, &data).unwrap();

        prop_assert_eq!(&loaded.blocks, &course.blocks);
        prop_assert!(loaded.metadata.starts_with(&course.metadata));
        prop_assert_eq!(loaded.save(game).unwrap(), data);
    }
}
