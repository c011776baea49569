//! Score evaluation for relic boards.
//!
//! Scoring runs in two ordered passes over the board, row-major with the top row first:
//!
//! 1. **Slate propagation** ([`slate_propagation`]) - Every slate whose own condition holds
//!    adds its buff magnitudes to a level map and records special effect tags in an effect
//!    map. A slate violating its condition costs a flat penalty and projects nothing.
//!
//! 2. **Artifact scoring** ([`score_evaluator`]) - Every artifact takes the level map value
//!    of its cell, adds its upgrade level and any item-specific bonus ([`bonus`]), loses a
//!    flat penalty if its placement condition is violated ([`eligibility`]), and contributes
//!    `level × rarity weight × priority` when the resulting level is non-negative.
//!
//! # Architecture
//!
//! ```text
//! ScoreEvaluator (total score, per-cell breakdown)
//!     ↓ uses
//! Slate Propagation (level map + effect map)
//! Eligibility Rules (condition checks)
//! Bonus Registry (item id → bonus rule)
//! ```
//!
//! # Example
//!
//! ```
//! use relicboard_engine::{ArtifactDefinition, Board, ItemCatalog, PlacedItem, Position};
//! use relicboard_evaluator::{BoardEvaluator as _, score_evaluator::ScoreEvaluator};
//!
//! let artifact: ArtifactDefinition =
//!     serde_json::from_str(r#"{ "id": "a", "name": "Relic", "rarity": "Legendary" }"#).unwrap();
//! let catalog = ItemCatalog::new([artifact], []);
//!
//! let mut board = Board::new(1, 1);
//! board.place(
//!     Position::new(0, 0),
//!     PlacedItem::new("a").with_upgrade_level(2).with_priority_weight(2.0),
//! );
//!
//! let evaluator = ScoreEvaluator::new(&catalog);
//! assert_eq!(evaluator.evaluate_board(&board), 10.0);
//! ```

use relicboard_engine::{Board, ItemCatalog};

pub use self::score_evaluator::{BoardEvaluator, ScoreEvaluator, ScoreRules};

pub mod bonus;
pub mod eligibility;
pub mod score_evaluator;
pub mod slate_propagation;

/// Scores a board with the default rules and bonus registry.
#[must_use]
pub fn calculate_score(board: &Board, catalog: &ItemCatalog) -> f64 {
    ScoreEvaluator::new(catalog).calculate_score(board)
}
