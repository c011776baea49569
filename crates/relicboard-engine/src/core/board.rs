use serde::{Deserialize, Serialize};

use crate::{BoardShapeError, Rotation};

/// Largest number of cells a board may have.
pub const MAX_BOARD_CELLS: usize = 10_000;

/// A cell coordinate on the board.
///
/// `x` grows to the right, `y` grows downward (row 0 is the top row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

const fn default_priority_weight() -> f64 {
    1.0
}

/// An item occupying a single board cell, with its per-placement settings.
///
/// The serialized form is the snapshot exchanged with clients:
/// `{ "id": ..., "upgrade": 0, "priority": 1.0, "rotation": 0 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    #[serde(rename = "id")]
    item_id: String,
    #[serde(rename = "upgrade", default)]
    upgrade_level: u32,
    #[serde(rename = "priority", default = "default_priority_weight")]
    priority_weight: f64,
    #[serde(default)]
    rotation: Rotation,
}

impl PlacedItem {
    /// Creates a placed item with no upgrades, priority 1.0 and rotation 0°.
    #[must_use]
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            upgrade_level: 0,
            priority_weight: default_priority_weight(),
            rotation: Rotation::Deg0,
        }
    }

    #[must_use]
    pub fn with_upgrade_level(mut self, upgrade_level: u32) -> Self {
        self.upgrade_level = upgrade_level;
        self
    }

    #[must_use]
    pub fn with_priority_weight(mut self, priority_weight: f64) -> Self {
        self.priority_weight = priority_weight;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    #[must_use]
    pub fn upgrade_level(&self) -> u32 {
        self.upgrade_level
    }

    #[must_use]
    pub fn priority_weight(&self) -> f64 {
        self.priority_weight
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }
}

/// A `width × height` grid holding at most one [`PlacedItem`] per cell.
///
/// Cells are stored row-major with the top row first, which is also the order
/// [`Board::positions`] and [`Board::occupied`] visit them in.
///
/// # Coordinate System
///
/// Positions are `(x, y)` with `y = 0` at the top. Buff offsets use the opposite
/// vertical convention (positive `dy` points toward the top row), so
/// [`Board::offset_position`] maps an offset `(dx, dy)` to `(x + dx, y - dy)`.
/// Every lookup is bounds-checked; out-of-range positions simply read as empty.
///
/// # Example
///
/// ```
/// use relicboard_engine::{Board, PlacedItem, Position};
///
/// let mut board = Board::new(3, 2);
/// board.place(Position::new(0, 1), PlacedItem::new("artifact_1"));
///
/// // One step "up" from the bottom-left cell is the top-left cell.
/// let up = board.offset_position(Position::new(0, 1), 0, 1);
/// assert_eq!(up, Some(Position::new(0, 0)));
/// assert_eq!(board.offset_position(Position::new(0, 1), -1, 0), None);
/// assert_eq!(board.item_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Option<PlacedItem>>,
}

impl Board {
    /// Checks that a `width × height` board fits in [`MAX_BOARD_CELLS`] and returns
    /// its cell count.
    pub fn check_size(width: usize, height: usize) -> Result<usize, BoardShapeError> {
        width
            .checked_mul(height)
            .filter(|&cells| cells <= MAX_BOARD_CELLS)
            .ok_or(BoardShapeError::TooLarge { width, height })
    }

    /// Creates an empty board, rejecting sizes over [`MAX_BOARD_CELLS`].
    pub fn try_new(width: usize, height: usize) -> Result<Self, BoardShapeError> {
        let cell_count = Self::check_size(width, height)?;
        Ok(Self {
            width,
            height,
            cells: vec![None; cell_count],
        })
    }

    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics if the board has more than [`MAX_BOARD_CELLS`] cells.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::try_new(width, height).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Builds a board from rows of cells (top row first).
    pub fn from_rows(
        width: usize,
        height: usize,
        rows: Vec<Vec<Option<PlacedItem>>>,
    ) -> Result<Self, BoardShapeError> {
        let cell_count = Self::check_size(width, height)?;
        if rows.len() != height {
            return Err(BoardShapeError::RowCount {
                expected: height,
                actual: rows.len(),
            });
        }
        let mut cells = Vec::with_capacity(cell_count);
        for (row, cells_in_row) in rows.into_iter().enumerate() {
            if cells_in_row.len() != width {
                return Err(BoardShapeError::RowWidth {
                    row,
                    expected: width,
                    actual: cells_in_row.len(),
                });
            }
            cells.extend(cells_in_row);
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Returns `true` if the position lies on the outermost ring of the board.
    #[must_use]
    pub fn is_on_border(&self, pos: Position) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x + 1 == self.width || pos.y + 1 == self.height
    }

    /// Applies a buff-style offset to a position.
    ///
    /// Positive `dy` moves toward the top row. Returns `None` when the target
    /// falls outside the board.
    #[must_use]
    pub fn offset_position(&self, pos: Position, dx: i32, dy: i32) -> Option<Position> {
        let x = pos.x.checked_add_signed(isize::try_from(dx).ok()?)?;
        let y = pos.y.checked_add_signed(isize::try_from(dy).ok()?.checked_neg()?)?;
        let target = Position::new(x, y);
        self.contains(target).then_some(target)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| pos.y * self.width + pos.x)
    }

    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&PlacedItem> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    #[must_use]
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut PlacedItem> {
        self.index(pos).and_then(|i| self.cells[i].as_mut())
    }

    #[must_use]
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.get(pos).is_some()
    }

    /// Puts an item on a cell, returning the item previously there.
    ///
    /// # Panics
    ///
    /// Panics if `pos` is outside the board.
    pub fn place(&mut self, pos: Position, item: PlacedItem) -> Option<PlacedItem> {
        let index = self
            .index(pos)
            .unwrap_or_else(|| panic!("position {pos:?} outside {}x{} board", self.width, self.height));
        self.cells[index].replace(item)
    }

    /// Removes and returns the item on a cell.
    pub fn take(&mut self, pos: Position) -> Option<PlacedItem> {
        let index = self.index(pos)?;
        self.cells[index].take()
    }

    /// Exchanges the contents of two cells. Swapping a cell with itself is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if either position is outside the board.
    pub fn swap(&mut self, a: Position, b: Position) {
        let (Some(i), Some(j)) = (self.index(a), self.index(b)) else {
            panic!(
                "swap {a:?} <-> {b:?} outside {}x{} board",
                self.width, self.height
            );
        };
        self.cells.swap(i, j);
    }

    /// Returns every position in row-major order, top row first.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)))
    }

    /// Returns the occupied cells in row-major order, top row first.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &PlacedItem)> + '_ {
        self.positions()
            .zip(&self.cells)
            .filter_map(|(pos, cell)| cell.as_ref().map(|item| (pos, item)))
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Returns an iterator over the rows, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<PlacedItem>]> {
        (0..self.height).map(move |y| &self.cells[y * self.width..(y + 1) * self.width])
    }
}

#[derive(Serialize)]
struct BoardRowsRef<'a> {
    width: usize,
    height: usize,
    rows: Vec<&'a [Option<PlacedItem>]>,
}

#[derive(Deserialize)]
struct BoardRows {
    width: usize,
    height: usize,
    rows: Vec<Vec<Option<PlacedItem>>>,
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        BoardRowsRef {
            width: self.width,
            height: self.height,
            rows: self.rows().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let BoardRows {
            width,
            height,
            rows,
        } = BoardRows::deserialize(deserializer)?;
        Board::from_rows(width, height, rows).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(3, 3);
        assert!(board.is_empty());
        assert_eq!(board.cell_count(), 9);
        assert_eq!(board.item_count(), 0);
        assert_eq!(board.occupied().count(), 0);
    }

    #[test]
    fn test_board_size_limit() {
        assert_eq!(Board::check_size(5, 5), Ok(25));
        assert_eq!(Board::check_size(0, 7), Ok(0));
        assert_eq!(Board::check_size(100, 100), Ok(MAX_BOARD_CELLS));
        assert_eq!(
            Board::check_size(1_000_000, 1_000_000),
            Err(BoardShapeError::TooLarge {
                width: 1_000_000,
                height: 1_000_000
            })
        );
        assert!(Board::check_size(1 << 33, 1 << 33).is_err());
        assert!(Board::check_size(usize::MAX, 2).is_err());
        assert!(Board::try_new(MAX_BOARD_CELLS + 1, 1).is_err());
        assert_eq!(Board::try_new(4, 3).unwrap().cell_count(), 12);
    }

    #[test]
    #[should_panic(expected = "exceeds the limit")]
    fn test_new_panics_on_oversized_board() {
        let _ = Board::new(1 << 33, 1 << 33);
    }

    #[test]
    fn test_positions_are_row_major_top_first() {
        let board = Board::new(2, 2);
        let positions: Vec<_> = board.positions().collect();
        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(1, 0),
                Position::new(0, 1),
                Position::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_offset_position_flips_y() {
        let board = Board::new(3, 3);
        let center = Position::new(1, 1);
        assert_eq!(board.offset_position(center, 0, 1), Some(Position::new(1, 0)));
        assert_eq!(board.offset_position(center, 0, -1), Some(Position::new(1, 2)));
        assert_eq!(board.offset_position(center, 1, 0), Some(Position::new(2, 1)));
        assert_eq!(board.offset_position(center, -1, 1), Some(Position::new(0, 0)));
        assert_eq!(board.offset_position(center, 2, 0), None);
        assert_eq!(board.offset_position(center, 0, 2), None);
        assert_eq!(board.offset_position(Position::new(0, 2), 0, -1), None);
    }

    #[test]
    fn test_out_of_bounds_reads_are_empty() {
        let mut board = Board::new(2, 2);
        board.place(Position::new(1, 1), PlacedItem::new("a"));
        assert!(board.get(Position::new(2, 1)).is_none());
        assert!(board.get(Position::new(1, 5)).is_none());
        assert!(board.take(Position::new(9, 9)).is_none());
    }

    #[test]
    fn test_place_swap_take() {
        let mut board = Board::new(2, 1);
        let a = Position::new(0, 0);
        let b = Position::new(1, 0);
        assert!(board.place(a, PlacedItem::new("a")).is_none());

        board.swap(a, b);
        assert!(board.get(a).is_none());
        assert_eq!(board.get(b).map(PlacedItem::item_id), Some("a"));

        board.swap(b, b);
        assert_eq!(board.get(b).map(PlacedItem::item_id), Some("a"));

        let taken = board.take(b).unwrap();
        assert_eq!(taken.item_id(), "a");
        assert!(board.is_empty());
    }

    #[test]
    fn test_is_on_border() {
        let board = Board::new(3, 3);
        assert!(board.is_on_border(Position::new(0, 1)));
        assert!(board.is_on_border(Position::new(2, 1)));
        assert!(board.is_on_border(Position::new(1, 0)));
        assert!(board.is_on_border(Position::new(1, 2)));
        assert!(!board.is_on_border(Position::new(1, 1)));

        let single = Board::new(1, 1);
        assert!(single.is_on_border(Position::new(0, 0)));
    }

    #[test]
    fn test_placed_item_defaults() {
        let item: PlacedItem = serde_json::from_str(r#"{ "id": "slate_2" }"#).unwrap();
        assert_eq!(item.item_id(), "slate_2");
        assert_eq!(item.upgrade_level(), 0);
        assert!((item.priority_weight() - 1.0).abs() < f64::EPSILON);
        assert_eq!(item.rotation(), Rotation::Deg0);
    }

    #[test]
    fn test_board_serialization_shape() {
        let mut board = Board::new(2, 1);
        board.place(
            Position::new(1, 0),
            PlacedItem::new("slate_7").with_rotation(Rotation::Deg90),
        );

        let value = serde_json::to_value(&board).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "width": 2,
                "height": 1,
                "rows": [[null, { "id": "slate_7", "upgrade": 0, "priority": 1.0, "rotation": 90 }]]
            })
        );

        let parsed: Board = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_board_deserialization_checks_shape() {
        let too_few_rows = serde_json::json!({ "width": 1, "height": 2, "rows": [[null]] });
        assert!(serde_json::from_value::<Board>(too_few_rows).is_err());

        let ragged = serde_json::json!({ "width": 2, "height": 2, "rows": [[null, null], [null]] });
        assert!(serde_json::from_value::<Board>(ragged).is_err());

        let oversized = serde_json::json!({ "width": 1_000_000_000_000_u64, "height": 1, "rows": [[null]] });
        assert!(serde_json::from_value::<Board>(oversized).is_err());

        assert!(matches!(
            Board::from_rows(2, 1, vec![vec![None]]),
            Err(BoardShapeError::RowWidth {
                row: 0,
                expected: 2,
                actual: 1
            })
        ));
    }
}
