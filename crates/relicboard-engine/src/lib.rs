//! Item definitions, catalog, and board representation for relic boards.
//!
//! This crate holds the data side of the optimizer:
//!
//! - [`catalog`] - Artifact and slate definitions and the immutable [`ItemCatalog`]
//!   that resolves item ids to them
//! - [`core`] - The [`Board`] grid, [`PlacedItem`] cells, and slate [`Rotation`]s
//!
//! Scoring lives in `relicboard-evaluator` and the placement search in
//! `relicboard-search`; both only borrow the types defined here.

pub use self::{catalog::*, core::*};

pub mod catalog;
pub mod core;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardShapeError {
    #[display("board of {width}x{height} exceeds the limit of {} cells", MAX_BOARD_CELLS)]
    TooLarge { width: usize, height: usize },
    #[display("board has {actual} rows, expected height {expected}")]
    RowCount { expected: usize, actual: usize },
    #[display("board row {row} has {actual} cells, expected width {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}
