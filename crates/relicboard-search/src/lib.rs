//! Placement search for relic boards.
//!
//! [`PlacementSearcher`] looks for a high-scoring arrangement of a list of items on a
//! fixed-size board by greedy ascent: starting from a random placement, it repeatedly
//! proposes a random swap or slate rotation and keeps the candidate only when the
//! evaluator scores it strictly higher. See [`placement_searcher`] for the move
//! distribution.
//!
//! All randomness is drawn from a caller-supplied generator. [`SearchSeed`] builds a
//! deterministic one, so a run can be replayed from its seed.
//!
//! # Example
//!
//! ```
//! use relicboard_engine::{ItemCatalog, PlacedItem};
//! use relicboard_evaluator::ScoreEvaluator;
//! use relicboard_search::{PlacementSearcher, SearchSeed};
//!
//! let catalog = ItemCatalog::empty();
//! let evaluator = ScoreEvaluator::new(&catalog);
//! let searcher = PlacementSearcher::new(&catalog, &evaluator);
//!
//! let seed: SearchSeed = "000000000000000000000000000000ff".parse().unwrap();
//! let outcome = searcher.find_optimal_placement(
//!     vec![PlacedItem::new("unknown")],
//!     3,
//!     3,
//!     100,
//!     &mut seed.rng(),
//! );
//! assert_eq!(outcome.board.item_count(), 1);
//! assert_eq!(outcome.score, 0.0);
//! ```

pub use self::{
    placement_searcher::{
        DEFAULT_ITERATIONS, PlacementSearcher, SearchAction, SearchOutcome, SearchParams,
        SearchStep, initial_board,
    },
    search_seed::{ParseSeedError, SearchSeed},
};

pub mod placement_searcher;
mod search_seed;
