//! Greedy-ascent random search over item placements.
//!
//! A search starts from a uniformly shuffled placement and then, for a fixed number
//! of iterations, proposes a random move on a copy of the best board so far:
//!
//! - **Swap** (probability 3/4) - exchange the contents of two occupied cells, drawn
//!   with replacement (drawing the same cell twice is a no-op)
//! - **Rotate** (probability 1/4) - give the item in one occupied cell a random
//!   rotation if it is a rotatable slate (otherwise a no-op)
//!
//! The candidate is rescored from scratch and replaces the best board only if its
//! score is strictly greater. There is no early termination and no acceptance of
//! worse or equal moves, so a run may end in a local optimum.

use rand::{
    Rng,
    seq::{IndexedRandom as _, SliceRandom as _},
};
use relicboard_engine::{Board, ItemCatalog, PlacedItem, Position, Rotation};
use relicboard_evaluator::BoardEvaluator;
use tracing::{debug, info};

/// Iteration count used when none is configured.
pub const DEFAULT_ITERATIONS: usize = 10_000;

const SWAP_RATIO: (u32, u32) = (3, 4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub iterations: usize,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

/// A move proposed in one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    Swap(Position, Position),
    /// The new rotation, or `None` if the cell holds no rotatable slate.
    Rotate(Position, Option<Rotation>),
    /// The board holds no items, so there is nothing to move.
    Idle,
}

/// What happened in one iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchStep {
    /// Zero-based iteration index.
    pub iteration: usize,
    pub action: SearchAction,
    pub candidate_score: f64,
    /// Best score after this iteration.
    pub best_score: f64,
    pub accepted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub board: Board,
    pub score: f64,
    /// Score of the shuffled starting placement.
    pub initial_score: f64,
    pub accepted_moves: usize,
    pub iterations: usize,
}

/// Places items on uniformly shuffled cells, in input order, at rotation 0.
///
/// Items beyond the board's capacity are dropped.
///
/// # Panics
///
/// Panics if the board would exceed
/// [`MAX_BOARD_CELLS`](relicboard_engine::MAX_BOARD_CELLS); callers taking sizes
/// from user input check them with [`Board::check_size`] first.
#[must_use]
pub fn initial_board<I, R>(items: I, width: usize, height: usize, rng: &mut R) -> Board
where
    I: IntoIterator<Item = PlacedItem>,
    R: Rng + ?Sized,
{
    let mut board = Board::new(width, height);
    let mut positions = board.positions().collect::<Vec<_>>();
    positions.shuffle(rng);
    for (pos, item) in positions.into_iter().zip(items) {
        board.place(pos, item.with_rotation(Rotation::Deg0));
    }
    board
}

/// Runs placement searches against one catalog and evaluator.
#[derive(Debug)]
pub struct PlacementSearcher<'a, E>
where
    E: BoardEvaluator + ?Sized,
{
    catalog: &'a ItemCatalog,
    evaluator: &'a E,
}

impl<'a, E> PlacementSearcher<'a, E>
where
    E: BoardEvaluator + ?Sized,
{
    #[must_use]
    pub fn new(catalog: &'a ItemCatalog, evaluator: &'a E) -> Self {
        Self { catalog, evaluator }
    }

    /// Searches for a high-scoring placement of `items`.
    ///
    /// # Panics
    ///
    /// Panics if the board would exceed [`MAX_BOARD_CELLS`](relicboard_engine::MAX_BOARD_CELLS).
    pub fn find_optimal_placement<R>(
        &self,
        items: Vec<PlacedItem>,
        width: usize,
        height: usize,
        iterations: usize,
        rng: &mut R,
    ) -> SearchOutcome
    where
        R: Rng + ?Sized,
    {
        self.search_with_observer(items, width, height, iterations, rng, |_| {})
    }

    /// Like [`Self::find_optimal_placement`], but reports every iteration to `observer`.
    pub fn search_with_observer<R, F>(
        &self,
        items: Vec<PlacedItem>,
        width: usize,
        height: usize,
        iterations: usize,
        rng: &mut R,
        mut observer: F,
    ) -> SearchOutcome
    where
        R: Rng + ?Sized,
        F: FnMut(&SearchStep),
    {
        let mut best = initial_board(items, width, height, rng);
        let mut best_score = self.evaluator.evaluate_board(&best);
        let initial_score = best_score;
        let mut accepted_moves = 0;

        // Swaps and rotations never change which cells are occupied.
        let occupied = best.occupied().map(|(pos, _)| pos).collect::<Vec<_>>();

        for iteration in 0..iterations {
            let mut candidate = best.clone();
            let action = self.apply_random_action(&mut candidate, &occupied, rng);
            let candidate_score = self.evaluator.evaluate_board(&candidate);

            let accepted = candidate_score > best_score;
            if accepted {
                best = candidate;
                best_score = candidate_score;
                accepted_moves += 1;
                debug!(iteration, ?action, score = best_score, "accepted improvement");
            }

            observer(&SearchStep {
                iteration,
                action,
                candidate_score,
                best_score,
                accepted,
            });
        }

        info!(
            iterations,
            accepted_moves, initial_score, score = best_score, "placement search finished"
        );

        SearchOutcome {
            board: best,
            score: best_score,
            initial_score,
            accepted_moves,
            iterations,
        }
    }

    fn apply_random_action<R>(
        &self,
        board: &mut Board,
        occupied: &[Position],
        rng: &mut R,
    ) -> SearchAction
    where
        R: Rng + ?Sized,
    {
        if rng.random_ratio(SWAP_RATIO.0, SWAP_RATIO.1) {
            let (Some(&a), Some(&b)) = (occupied.choose(rng), occupied.choose(rng)) else {
                return SearchAction::Idle;
            };
            board.swap(a, b);
            SearchAction::Swap(a, b)
        } else {
            let Some(&pos) = occupied.choose(rng) else {
                return SearchAction::Idle;
            };
            let rotation = board
                .get_mut(pos)
                .filter(|item| self.catalog.is_rotatable_slate(item.item_id()))
                .map(|item| {
                    let rotation = rng.random::<Rotation>();
                    item.set_rotation(rotation);
                    rotation
                });
            SearchAction::Rotate(pos, rotation)
        }
    }
}
