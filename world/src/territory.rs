//! Dense ownership grid backing every claimed cell.

use claimfield_core::{CellCoord, TerritoryView, Token, MAX_BOARD_CELLS};

/// Row-major grid recording which token, if any, owns each cell.
#[derive(Clone, Debug)]
pub struct TerritoryMap {
    columns: u32,
    rows: u32,
    cells: Vec<Option<Token>>,
}

impl TerritoryMap {
    /// Creates an unowned grid with the provided dimensions.
    ///
    /// Callers pass dimensions from a validated configuration, so the cell
    /// count never exceeds [`MAX_BOARD_CELLS`].
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let capacity = columns as usize * rows as usize;
        debug_assert!(capacity as u64 <= MAX_BOARD_CELLS);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    /// Returns the owner of `cell`, treating cells outside the grid as unowned.
    #[must_use]
    pub fn owner_of(&self, cell: CellCoord) -> Option<Token> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether `cell` lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Counts the cells owned by `token` with a full scan of the grid.
    #[must_use]
    pub fn count_owned(&self, token: Token) -> u32 {
        self.view().count_owned(token)
    }

    /// Captures a read-only view for systems and renderers.
    #[must_use]
    pub fn view(&self) -> TerritoryView<'_> {
        TerritoryView::new(&self.cells, self.columns, self.rows)
    }

    /// Assigns `cell` to `token`. Cells outside the grid are ignored.
    pub(crate) fn set_owner(&mut self, cell: CellCoord, token: Token) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = Some(token);
            }
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column < self.columns && row < self.rows {
            let row = usize::try_from(row).ok()?;
            let column = usize::try_from(column).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_map_is_entirely_unowned() {
        let map = TerritoryMap::new(4, 3);
        assert!(map.view().iter().all(|(_, owner)| owner.is_none()));
        assert_eq!(map.view().iter().count(), 12);
    }

    #[test]
    fn out_of_range_reads_are_unowned_and_writes_are_ignored() {
        let mut map = TerritoryMap::new(3, 3);
        let token = Token::new(2);

        map.set_owner(CellCoord::new(-1, 0), token);
        map.set_owner(CellCoord::new(3, 1), token);
        map.set_owner(CellCoord::new(1, 3), token);

        assert_eq!(map.count_owned(token), 0);
        assert_eq!(map.owner_of(CellCoord::new(-1, 0)), None);
        assert_eq!(map.owner_of(CellCoord::new(3, 1)), None);
        assert!(!map.contains(CellCoord::new(1, 3)));
    }

    #[test]
    fn later_writes_replace_the_previous_owner() {
        let mut map = TerritoryMap::new(3, 3);
        let cell = CellCoord::new(1, 2);

        map.set_owner(cell, Token::new(0));
        map.set_owner(cell, Token::new(1));

        assert_eq!(map.owner_of(cell), Some(Token::new(1)));
        assert_eq!(map.count_owned(Token::new(0)), 0);
        assert_eq!(map.count_owned(Token::new(1)), 1);
    }
}
