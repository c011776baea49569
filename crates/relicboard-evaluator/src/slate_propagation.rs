//! First scoring pass: projecting slate buffs onto the board.
//!
//! Every occupied cell whose id resolves to a slate is visited in row-major order.
//! A slate whose own condition is violated is counted once in
//! [`BuffField::violated_slates`] and emits nothing. Otherwise each buff entry
//! `(dx, dy, magnitude, effect)` targets `(x + dx, y - dy)`; in-bounds targets gain
//! `magnitude` levels, and non-`none` effects are written to the target's effect slot.
//!
//! A cell holds at most one effect tag: a later buff overwrites an earlier one.

use relicboard_engine::{Board, Condition, EffectTag, ItemCatalog, Position};

use crate::eligibility;

/// Level and effect contributions accumulated from all slates on a board.
#[derive(Debug, Clone, PartialEq)]
pub struct BuffField {
    width: usize,
    levels: Vec<i64>,
    effects: Vec<Option<EffectTag>>,
    violated_slates: usize,
}

impl BuffField {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            levels: vec![0; width * height],
            effects: vec![None; width * height],
            violated_slates: 0,
        }
    }

    /// Runs the slate pass over a board.
    #[must_use]
    pub fn from_board(board: &Board, catalog: &ItemCatalog) -> Self {
        let mut field = Self::new(board.width(), board.height());

        for (pos, item) in board.occupied() {
            let Some(slate) = catalog.slate(item.item_id()) else {
                continue;
            };
            // Slates only honor bare condition tags; the structured form never applies.
            if matches!(
                slate.condition,
                Some(Condition::Bare(kind)) if eligibility::slate_condition_violated(kind, board, pos)
            ) {
                field.violated_slates += 1;
                continue;
            }
            for buff in slate.buffs(item.rotation()) {
                let Some(target) = board.offset_position(pos, buff.dx, buff.dy) else {
                    continue;
                };
                let index = field.index(target);
                field.levels[index] += i64::from(buff.magnitude);
                if buff.effect != EffectTag::None {
                    field.effects[index] = Some(buff.effect.clone());
                }
            }
        }

        field
    }

    fn index(&self, pos: Position) -> usize {
        pos.y * self.width + pos.x
    }

    /// Accumulated buff level at a position (0 outside the board).
    #[must_use]
    pub fn level(&self, pos: Position) -> i64 {
        if pos.x >= self.width {
            return 0;
        }
        self.levels.get(self.index(pos)).copied().unwrap_or(0)
    }

    /// The last effect tag written to a position, if any.
    #[must_use]
    pub fn effect(&self, pos: Position) -> Option<&EffectTag> {
        if pos.x >= self.width {
            return None;
        }
        self.effects.get(self.index(pos)).and_then(Option::as_ref)
    }

    /// Number of slates whose own condition was violated.
    #[must_use]
    pub fn violated_slates(&self) -> usize {
        self.violated_slates
    }
}

#[cfg(test)]
mod tests {
    use relicboard_engine::{PlacedItem, Rotation, SlateDefinition};
    use serde_json::json;

    use super::*;

    fn catalog() -> ItemCatalog {
        let slates: Vec<SlateDefinition> = serde_json::from_value(json!([
            {
                "id": "cross",
                "name": "Cross",
                "buffcoords": [[0, 1, 1, "none"], [0, -1, 2, "none"], [1, 0, 3, "none"], [-1, 0, 4, "none"]]
            },
            {
                "id": "floor",
                "name": "Floor",
                "condition": "bottom_row",
                "buffcoords": [[0, 1, 5, "none"]]
            },
            {
                "id": "roof",
                "name": "Roof",
                "condition": { "type": "bottom_row" },
                "buffcoords": [[0, -1, 2, "none"]]
            },
            {
                "id": "dial",
                "name": "Dial",
                "rotatable": true,
                "buffcoords": {
                    "0": [[0, 1, 1, "none"]],
                    "90": [[1, 0, 1, "none"]],
                    "180": [[0, -1, 1, "none"]]
                }
            },
            {
                "id": "key",
                "name": "Key",
                "buffcoords": [[1, 0, 0, "limitUnlock"], [1, 0, 1, "sparkle"]]
            },
            {
                "id": "unlock",
                "name": "Unlock",
                "buffcoords": [[-1, 0, 0, "limitUnlock"]]
            }
        ]))
        .unwrap();
        ItemCatalog::new([], slates)
    }

    #[test]
    fn test_buffs_follow_y_flip_and_bounds() {
        let catalog = catalog();
        let mut board = Board::new(3, 3);
        board.place(Position::new(1, 1), PlacedItem::new("cross"));

        let field = BuffField::from_board(&board, &catalog);
        assert_eq!(field.level(Position::new(1, 0)), 1);
        assert_eq!(field.level(Position::new(1, 2)), 2);
        assert_eq!(field.level(Position::new(2, 1)), 3);
        assert_eq!(field.level(Position::new(0, 1)), 4);
        assert_eq!(field.level(Position::new(1, 1)), 0);

        let mut corner = Board::new(3, 3);
        corner.place(Position::new(0, 0), PlacedItem::new("cross"));
        let field = BuffField::from_board(&corner, &catalog);
        assert_eq!(field.level(Position::new(0, 1)), 2);
        assert_eq!(field.level(Position::new(1, 0)), 3);
        let total: i64 = corner.positions().map(|p| field.level(p)).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_violated_slate_emits_nothing() {
        let catalog = catalog();
        let mut board = Board::new(2, 2);
        board.place(Position::new(0, 0), PlacedItem::new("floor"));

        let field = BuffField::from_board(&board, &catalog);
        assert_eq!(field.violated_slates(), 1);
        assert!(board.positions().all(|p| field.level(p) == 0));

        let mut board = Board::new(2, 2);
        board.place(Position::new(0, 1), PlacedItem::new("floor"));
        let field = BuffField::from_board(&board, &catalog);
        assert_eq!(field.violated_slates(), 0);
        assert_eq!(field.level(Position::new(0, 0)), 5);
    }

    #[test]
    fn test_structured_slate_condition_is_ignored() {
        let catalog = catalog();
        let mut board = Board::new(2, 2);
        board.place(Position::new(0, 0), PlacedItem::new("roof"));

        let field = BuffField::from_board(&board, &catalog);
        assert_eq!(field.violated_slates(), 0);
        assert_eq!(field.level(Position::new(0, 1)), 2);
    }

    #[test]
    fn test_rotation_selects_buff_list() {
        let catalog = catalog();
        let center = Position::new(1, 1);
        let level_at = |rotation: Rotation, target: Position| {
            let mut board = Board::new(3, 3);
            board.place(center, PlacedItem::new("dial").with_rotation(rotation));
            BuffField::from_board(&board, &catalog).level(target)
        };

        assert_eq!(level_at(Rotation::Deg0, Position::new(1, 0)), 1);
        assert_eq!(level_at(Rotation::Deg90, Position::new(2, 1)), 1);
        assert_eq!(level_at(Rotation::Deg90, Position::new(1, 0)), 0);
        assert_eq!(level_at(Rotation::Deg180, Position::new(1, 2)), 1);
        // 270° has no entry and falls back to the 0° list.
        assert_eq!(level_at(Rotation::Deg270, Position::new(1, 0)), 1);
    }

    #[test]
    fn test_effects_last_write_wins() {
        let catalog = catalog();
        let mut board = Board::new(2, 1);
        board.place(Position::new(0, 0), PlacedItem::new("key"));

        let field = BuffField::from_board(&board, &catalog);
        assert_eq!(
            field.effect(Position::new(1, 0)),
            Some(&EffectTag::Other("sparkle".to_owned()))
        );
        assert_eq!(field.level(Position::new(1, 0)), 1);
        assert_eq!(field.effect(Position::new(0, 0)), None);
    }

    #[test]
    fn test_later_slate_overwrites_effect_in_scan_order() {
        let catalog = catalog();
        let mut board = Board::new(3, 1);
        board.place(Position::new(0, 0), PlacedItem::new("key"));
        board.place(Position::new(2, 0), PlacedItem::new("unlock"));

        let field = BuffField::from_board(&board, &catalog);
        assert_eq!(
            field.effect(Position::new(1, 0)),
            Some(&EffectTag::LimitUnlock)
        );
    }

    #[test]
    fn test_unknown_ids_are_inert() {
        let catalog = catalog();
        let mut board = Board::new(2, 2);
        board.place(Position::new(0, 0), PlacedItem::new("ghost"));

        let field = BuffField::from_board(&board, &catalog);
        assert_eq!(field.violated_slates(), 0);
        assert!(board.positions().all(|p| field.level(p) == 0 && field.effect(p).is_none()));
    }
}
