//! # varistruct-level
//!
//! Level file structures of the New Super Mario Bros. series, declared once
//! for all six games with [`varistruct`].
//!
//! ```
//! use varistruct::{StructInstance, Value};
//! use varistruct_level::{Game, items};
//!
//! let sprite = items::level_sprite().unwrap();
//!
//! let nsmb = StructInstance::load(sprite.clone(), Game::Nsmb, &[0; 12]).unwrap();
//! assert!(nsmb.get("zone_id").is_err());
//!
//! let mut bytes = [0u8; 16];
//! bytes[0x0C] = 2;
//! let mut nsmbw = StructInstance::load(sprite, Game::Nsmbw, &bytes).unwrap();
//! assert_eq!(nsmbw.get("zone_id").unwrap(), Value::Int(2));
//!
//! nsmbw.set("layer", 1).unwrap();
//! assert_eq!(nsmbw.save()[0x0D], 1);
//! ```

mod macros;

pub mod blocks;
pub mod course;
pub mod enums;
pub mod errors;
pub mod game;
pub mod geometry;
pub mod items;
pub mod layout;

pub use blocks::{load_bgdat, load_sprites, save_bgdat, save_sprites};
pub use course::{Course, CourseBlocks, SavePreparation};
pub use errors::{LevelError, Result};
pub use game::{Game, GameGroup};
pub use geometry::PositionAndSize;
pub use layout::{Block, block_count};
