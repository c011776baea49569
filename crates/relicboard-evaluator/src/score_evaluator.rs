//! Board scoring: combining slate buffs, upgrades, bonuses and eligibility.
//!
//! # How It Works
//!
//! [`ScoreEvaluator::calculate_score`] runs the slate pass
//! ([`BuffField::from_board`]) and then visits every artifact cell, top row first:
//!
//! ```text
//! level = buff_level + upgrade_level + bonus
//! level -= 1000                          if the artifact's condition is violated
//! score += level × rarity_weight × priority   if level >= 0 (else the cell adds 0)
//! score -= 500                           for every slate violating its own condition
//! ```
//!
//! Items whose ids resolve to no definition are inert in both passes.
//!
//! # Explaining a Score
//!
//! [`ScoreEvaluator::explain`] performs the same computation and also reports every
//! artifact cell's level and contribution, so callers can show why a board scores
//! the way it does.

use std::fmt;

use relicboard_engine::{Board, ItemCatalog, Position};
use serde::Serialize;

use crate::{
    bonus::{BonusContext, BonusRegistry},
    eligibility::{self, ArtifactSurroundings},
    slate_propagation::BuffField,
};

/// Score lost by each slate whose own condition is violated.
pub const SLATE_CONDITION_PENALTY: f64 = 500.0;

/// Levels lost by an artifact whose condition is violated.
pub const ARTIFACT_CONDITION_PENALTY: i64 = 1000;

pub const DEFAULT_GRIMOIRE_TAG: &str = "grimoire";
pub const DEFAULT_TELESCOPE_ID: &str = "telescope";
pub const DEFAULT_PLANET_TAG: &str = "planet";

/// Ids and tags the built-in rules refer to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRules {
    /// Tag required on the right neighbor by `requires_grimoire_right`.
    pub grimoire_tag: String,
    /// Item id receiving the telescope bonus.
    pub telescope_id: String,
    /// Tag the telescope bonus counts.
    pub planet_tag: String,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            grimoire_tag: DEFAULT_GRIMOIRE_TAG.to_owned(),
            telescope_id: DEFAULT_TELESCOPE_ID.to_owned(),
            planet_tag: DEFAULT_PLANET_TAG.to_owned(),
        }
    }
}

/// Assigns a score to a whole board (higher is better).
pub trait BoardEvaluator: fmt::Debug + Send + Sync {
    fn evaluate_board(&self, board: &Board) -> f64;
}

/// Scoring breakdown of a single artifact cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellScore {
    pub position: Position,
    pub item_id: String,
    /// Final level after buffs, upgrades, bonus and penalty.
    pub level: i64,
    /// Part of `level` granted by the item's bonus rule.
    pub bonus: i64,
    pub violated: bool,
    /// Amount added to the total (0 when `level` is negative).
    pub contribution: f64,
}

/// Scoring breakdown of a whole board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub total: f64,
    /// Score lost to slates violating their own condition (a positive amount).
    pub slate_penalties: f64,
    pub cells: Vec<CellScore>,
}

/// The two-pass board evaluator.
///
/// Borrows the catalog; many evaluators may share one catalog.
#[derive(Debug, Clone)]
pub struct ScoreEvaluator<'a> {
    catalog: &'a ItemCatalog,
    rules: ScoreRules,
    bonuses: BonusRegistry,
}

impl<'a> ScoreEvaluator<'a> {
    /// Creates an evaluator with the default rules and the telescope bonus.
    #[must_use]
    pub fn new(catalog: &'a ItemCatalog) -> Self {
        Self::with_rules(catalog, ScoreRules::default())
    }

    /// Creates an evaluator with custom rules; the telescope bonus follows `rules`.
    #[must_use]
    pub fn with_rules(catalog: &'a ItemCatalog, rules: ScoreRules) -> Self {
        let bonuses = BonusRegistry::with_telescope(&*rules.telescope_id, &*rules.planet_tag);
        Self {
            catalog,
            rules,
            bonuses,
        }
    }

    /// Replaces the bonus registry.
    #[must_use]
    pub fn with_bonus_registry(mut self, bonuses: BonusRegistry) -> Self {
        self.bonuses = bonuses;
        self
    }

    #[must_use]
    pub fn calculate_score(&self, board: &Board) -> f64 {
        self.score_with(board, |_| {}, |_| {})
    }

    #[must_use]
    pub fn explain(&self, board: &Board) -> ScoreBreakdown {
        let mut cells = Vec::new();
        let mut slate_penalties = 0.0;
        let total = self.score_with(board, |penalty| slate_penalties = penalty, |cell| {
            cells.push(cell);
        });
        ScoreBreakdown {
            total,
            slate_penalties,
            cells,
        }
    }

    fn score_with<P, C>(&self, board: &Board, on_slate_penalties: P, mut on_cell: C) -> f64
    where
        P: FnOnce(f64),
        C: FnMut(CellScore),
    {
        let field = BuffField::from_board(board, self.catalog);
        #[expect(clippy::cast_precision_loss)]
        let slate_penalties = field.violated_slates() as f64 * SLATE_CONDITION_PENALTY;
        on_slate_penalties(slate_penalties);
        let mut total = -slate_penalties;

        let surroundings = ArtifactSurroundings {
            board,
            catalog: self.catalog,
            grimoire_tag: &self.rules.grimoire_tag,
        };

        for (pos, item) in board.occupied() {
            let Some(artifact) = self.catalog.artifact(item.item_id()) else {
                continue;
            };

            let bonus = self.bonuses.bonus_level(&BonusContext {
                board,
                catalog: self.catalog,
                position: pos,
                item,
                artifact,
            });
            let mut level = field.level(pos) + i64::from(item.upgrade_level()) + bonus;

            let violated = artifact.condition.is_some_and(|condition| {
                eligibility::artifact_condition_violated(
                    condition,
                    field.effect(pos),
                    &surroundings,
                    pos,
                )
            });
            if violated {
                level -= ARTIFACT_CONDITION_PENALTY;
            }

            #[expect(clippy::cast_precision_loss)]
            let contribution = if level >= 0 {
                level as f64 * artifact.rarity.weight() * item.priority_weight()
            } else {
                0.0
            };
            total += contribution;

            on_cell(CellScore {
                position: pos,
                item_id: item.item_id().to_owned(),
                level,
                bonus,
                violated,
                contribution,
            });
        }

        total
    }
}

impl BoardEvaluator for ScoreEvaluator<'_> {
    fn evaluate_board(&self, board: &Board) -> f64 {
        self.calculate_score(board)
    }
}
