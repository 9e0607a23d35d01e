use thiserror::Error;

use crate::layout::Block;

pub type Result<T, E = LevelError> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error(transparent)]
    Struct(#[from] varistruct::Error),

    #[error("course file of {length} bytes is too short for a {blocks}-block header")]
    TruncatedHeader { blocks: usize, length: usize },

    #[error("block {index} at {start:#x} with size {size:#x} runs past the end of a {length}-byte course file")]
    BlockOutOfRange {
        index: usize,
        start: usize,
        size: usize,
        length: usize,
    },

    #[error("{game} course files have {expected} blocks, got {actual}")]
    BlockCount {
        game: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{game} course has no {block:?} block to save")]
    MissingBlock { block: Block, game: &'static str },

    #[error("sprite sets take exactly 16 bytes, got {length}")]
    SpriteSets { length: usize },
}
