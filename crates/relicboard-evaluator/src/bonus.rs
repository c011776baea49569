//! Item-specific bonus rules.
//!
//! Some artifacts carry hard-wired scoring rules on top of the generic model. They are
//! kept out of the evaluator's control flow in a [`BonusRegistry`] mapping an item id to
//! a [`BonusRule`]; the evaluator asks the registry for the bonus of every artifact cell
//! and adds it to the artifact's level before eligibility penalties are applied.
//!
//! The built-in rule is [`TelescopeBonus`]: +1000 levels for every planet-tagged
//! artifact in the 8 surrounding cells.
//!
//! # Adding a Rule
//!
//! Any `Fn(&BonusContext) -> i64` closure is a rule:
//!
//! ```
//! use relicboard_evaluator::bonus::{BonusContext, BonusRegistry};
//!
//! let mut registry = BonusRegistry::new();
//! // A lone relic: +5 when nothing sits directly below it.
//! registry.register("lonely_relic", |ctx: &BonusContext<'_>| {
//!     let below = ctx.board.offset_position(ctx.position, 0, -1);
//!     if below.is_some_and(|p| ctx.board.is_occupied(p)) { 0 } else { 5 }
//! });
//! assert!(registry.contains("lonely_relic"));
//! ```

use std::{collections::BTreeMap, fmt, sync::Arc};

use arrayvec::ArrayVec;
use relicboard_engine::{ArtifactDefinition, Board, ItemCatalog, PlacedItem, Position};

/// Levels granted per planet next to a telescope.
pub const PLANET_NEIGHBOR_BONUS: i64 = 1000;

/// Everything a bonus rule may inspect about the artifact being scored.
#[derive(Debug, Clone, Copy)]
pub struct BonusContext<'a> {
    pub board: &'a Board,
    pub catalog: &'a ItemCatalog,
    pub position: Position,
    pub item: &'a PlacedItem,
    pub artifact: &'a ArtifactDefinition,
}

/// A scoring rule attached to one item id.
pub trait BonusRule: Send + Sync {
    /// Returns the level bonus (may be negative) for the artifact in `ctx`.
    fn bonus_level(&self, ctx: &BonusContext<'_>) -> i64;
}

impl<F> BonusRule for F
where
    F: Fn(&BonusContext<'_>) -> i64 + Send + Sync,
{
    fn bonus_level(&self, ctx: &BonusContext<'_>) -> i64 {
        self(ctx)
    }
}

/// Returns the in-bounds cells of the 8-connected neighborhood of `pos`.
#[must_use]
pub fn neighborhood(board: &Board, pos: Position) -> ArrayVec<Position, 8> {
    let mut neighbors = ArrayVec::new();
    for dy in -1..=1 {
        for dx in -1..=1 {
            if (dx, dy) == (0, 0) {
                continue;
            }
            if let Some(neighbor) = board.offset_position(pos, dx, dy) {
                neighbors.push(neighbor);
            }
        }
    }
    neighbors
}

/// +[`PLANET_NEIGHBOR_BONUS`] for each neighboring artifact carrying the planet tag.
#[derive(Debug, Clone)]
pub struct TelescopeBonus {
    planet_tag: String,
}

impl TelescopeBonus {
    #[must_use]
    pub fn new(planet_tag: impl Into<String>) -> Self {
        Self {
            planet_tag: planet_tag.into(),
        }
    }
}

impl BonusRule for TelescopeBonus {
    fn bonus_level(&self, ctx: &BonusContext<'_>) -> i64 {
        neighborhood(ctx.board, ctx.position)
            .into_iter()
            .filter_map(|pos| ctx.board.get(pos))
            .filter_map(|item| ctx.catalog.artifact(item.item_id()))
            .filter(|artifact| artifact.has_tag(&self.planet_tag))
            .map(|_| PLANET_NEIGHBOR_BONUS)
            .sum()
    }
}

/// Table of item id → bonus rule.
#[derive(Clone, Default)]
pub struct BonusRegistry {
    rules: BTreeMap<String, Arc<dyn BonusRule>>,
}

impl fmt::Debug for BonusRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.rules.keys()).finish()
    }
}

impl BonusRegistry {
    /// Creates a registry with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in telescope rule.
    #[must_use]
    pub fn with_telescope(telescope_id: impl Into<String>, planet_tag: impl Into<String>) -> Self {
        let mut registry = Self::new();
        registry.register(telescope_id, TelescopeBonus::new(planet_tag));
        registry
    }

    /// Attaches a rule to an item id, replacing any previous rule for that id.
    pub fn register<R>(&mut self, item_id: impl Into<String>, rule: R)
    where
        R: BonusRule + 'static,
    {
        self.rules.insert(item_id.into(), Arc::new(rule));
    }

    #[must_use]
    pub fn contains(&self, item_id: &str) -> bool {
        self.rules.contains_key(item_id)
    }

    /// Returns the bonus for the artifact in `ctx`, or 0 if its id has no rule.
    #[must_use]
    pub fn bonus_level(&self, ctx: &BonusContext<'_>) -> i64 {
        self.rules
            .get(ctx.item.item_id())
            .map_or(0, |rule| rule.bonus_level(ctx))
    }
}
