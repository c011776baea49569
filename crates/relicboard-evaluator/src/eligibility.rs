//! Placement condition checks for slates and artifacts.
//!
//! Slates only honor `top_row`, `bottom_row` and `horizontal_ends`; artifacts honor
//! `top_row`, `bottom_row`, `edge`, `inner`, `adjacent_horizontal_empty` and
//! `requires_grimoire_right`. Any other condition is never violated.
//!
//! Note that `adjacent_horizontal_empty` is violated when a horizontal neighbor is
//! *occupied*.

use relicboard_engine::{Board, Condition, ConditionKind, EffectTag, ItemCatalog, Position};

/// Returns `true` if a slate at `pos` violates its own condition.
#[must_use]
pub fn slate_condition_violated(kind: ConditionKind, board: &Board, pos: Position) -> bool {
    match kind {
        ConditionKind::BottomRow => pos.y + 1 != board.height(),
        ConditionKind::TopRow => pos.y != 0,
        ConditionKind::HorizontalEnds => pos.x != 0 && pos.x + 1 != board.width(),
        ConditionKind::Edge
        | ConditionKind::Inner
        | ConditionKind::AdjacentHorizontalEmpty
        | ConditionKind::RequiresGrimoireRight
        | ConditionKind::Unrecognized => false,
    }
}

/// Inputs an artifact condition may depend on besides its position.
#[derive(Debug, Clone, Copy)]
pub struct ArtifactSurroundings<'a> {
    pub board: &'a Board,
    pub catalog: &'a ItemCatalog,
    pub grimoire_tag: &'a str,
}

/// Returns `true` if an artifact at `pos` violates its condition.
///
/// An unlockable structured condition is treated as satisfied when the cell's
/// effect is `limitUnlock`.
#[must_use]
pub fn artifact_condition_violated(
    condition: Condition,
    effect: Option<&EffectTag>,
    surroundings: &ArtifactSurroundings<'_>,
    pos: Position,
) -> bool {
    if condition.is_unlockable() && effect == Some(&EffectTag::LimitUnlock) {
        return false;
    }
    artifact_kind_violated(condition.kind(), surroundings, pos)
}

fn artifact_kind_violated(
    kind: ConditionKind,
    surroundings: &ArtifactSurroundings<'_>,
    pos: Position,
) -> bool {
    let board = surroundings.board;
    match kind {
        ConditionKind::TopRow => pos.y != 0,
        ConditionKind::BottomRow => pos.y + 1 != board.height(),
        ConditionKind::Edge => !board.is_on_border(pos),
        ConditionKind::Inner => board.is_on_border(pos),
        ConditionKind::AdjacentHorizontalEmpty => [-1, 1]
            .into_iter()
            .filter_map(|dx| board.offset_position(pos, dx, 0))
            .any(|neighbor| board.is_occupied(neighbor)),
        ConditionKind::RequiresGrimoireRight => !board
            .offset_position(pos, 1, 0)
            .and_then(|right| board.get(right))
            .and_then(|item| surroundings.catalog.artifact(item.item_id()))
            .is_some_and(|artifact| artifact.has_tag(surroundings.grimoire_tag)),
        ConditionKind::HorizontalEnds | ConditionKind::Unrecognized => false,
    }
}
